//! Lazily constructed, per-language cache of OCR engines.
//!
//! Engines are built from factories registered per [`EngineKind`]; each
//! [`Language`] is routed to a kind. The first request for a language builds and
//! initializes its engine, concurrent requests wait for that initialization,
//! and later requests get the cached instance. A failed initialization is not
//! cached.

use std::collections::HashMap;
use std::sync::Arc;

use panel_ocr::{Device, EngineKind, Language, OcrEngine};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::error::{ExtractError, Result};

/// Builds a fresh, uninitialized engine.
pub type EngineFactory = Arc<dyn Fn() -> Box<dyn OcrEngine> + Send + Sync>;

pub struct EngineRegistryBuilder {
    device: Device,
    factories: HashMap<EngineKind, EngineFactory>,
    routes: HashMap<Language, EngineKind>,
}

impl EngineRegistryBuilder {
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Registers the constructor used for every language routed to `kind`.
    pub fn register<F, E>(mut self, kind: EngineKind, factory: F) -> Self
    where
        F: Fn() -> E + Send + Sync + 'static,
        E: OcrEngine + 'static,
    {
        let factory: EngineFactory = Arc::new(move || Box::new(factory()) as Box<dyn OcrEngine>);
        self.factories.insert(kind, factory);
        self
    }

    /// Sends `language` to a different engine family than its default.
    pub fn route(mut self, language: Language, kind: EngineKind) -> Self {
        self.routes.insert(language, kind);
        self
    }

    pub fn build(self) -> EngineRegistry {
        EngineRegistry {
            device: self.device,
            factories: self.factories,
            routes: self.routes,
            engines: std::array::from_fn(|_| OnceCell::new()),
        }
    }
}

pub struct EngineRegistry {
    device: Device,
    factories: HashMap<EngineKind, EngineFactory>,
    routes: HashMap<Language, EngineKind>,
    // indexed by `Language as usize`, same order as `Language::ALL`
    engines: [OnceCell<Arc<dyn OcrEngine>>; Language::ALL.len()],
}

impl EngineRegistry {
    pub fn builder() -> EngineRegistryBuilder {
        EngineRegistryBuilder {
            device: Device::Cpu,
            factories: HashMap::new(),
            routes: HashMap::new(),
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Engine family that serves `language`.
    pub fn route(&self, language: Language) -> EngineKind {
        self.routes
            .get(&language)
            .copied()
            .unwrap_or_else(|| language.engine_kind())
    }

    /// Returns the engine for `language`, building and initializing it on first use.
    pub async fn get(&self, language: Language) -> Result<Arc<dyn OcrEngine>> {
        let cell = &self.engines[language as usize];
        let engine = cell.get_or_try_init(|| self.initialize(language)).await?;
        Ok(Arc::clone(engine))
    }

    /// Languages whose engines are initialized, in `Language::ALL` order.
    pub fn loaded_languages(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|lang| self.engines[*lang as usize].initialized())
            .collect()
    }

    async fn initialize(&self, language: Language) -> Result<Arc<dyn OcrEngine>> {
        let kind = self.route(language);
        let factory = self.factories.get(&kind).ok_or_else(|| {
            ExtractError::EngineInitialization {
                language,
                kind,
                reason: "no engine registered for this kind".to_string(),
            }
        })?;

        info!(%language, engine = %kind, device = %self.device, "initializing OCR engine");
        let mut engine = factory();
        if let Err(e) = engine.initialize(self.device).await {
            warn!(%language, engine = %kind, "OCR engine initialization failed: {}", e);
            return Err(ExtractError::EngineInitialization {
                language,
                kind,
                reason: e.to_string(),
            });
        }
        info!(%language, engine = engine.name(), "OCR engine ready");

        Ok(Arc::from(engine))
    }
}
