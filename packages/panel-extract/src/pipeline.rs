//! The extraction pipeline: detect, order, recognise, assemble.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use panel_ocr::{Device, EngineKind, Language, OcrEngine, OcrError, PageImage, TextDetector};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::artifacts::{ArtifactError, ArtifactStore, StoredArtifact};
use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::output::{ExtractionResult, OutputTarget};
use crate::reading_order::sort_regions;
use crate::registry::{EngineRegistry, EngineRegistryBuilder};

/// Result of [`Extractor::process_raw_bytes`]. The extraction succeeded; `artifact`
/// reports whether its transcript could also be stored for later retrieval.
#[derive(Debug)]
pub struct RawExtraction {
    pub result: ExtractionResult,
    pub artifact: std::result::Result<StoredArtifact, ArtifactError>,
}

impl RawExtraction {
    pub fn file_id(&self) -> Option<Uuid> {
        self.artifact.as_ref().ok().map(|artifact| artifact.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStatus {
    pub device: Device,
    pub loaded_languages: Vec<Language>,
    pub artifact_dir: PathBuf,
    pub artifact_dir_writable: bool,
}

pub struct ExtractorBuilder {
    config: ExtractorConfig,
    detector: Arc<dyn TextDetector>,
    engines: EngineRegistryBuilder,
    gpu_available: bool,
}

impl ExtractorBuilder {
    pub fn config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether the engine backends can actually use a GPU on this machine.
    pub fn gpu_available(mut self, available: bool) -> Self {
        self.gpu_available = available;
        self
    }

    pub fn register<F, E>(mut self, kind: EngineKind, factory: F) -> Self
    where
        F: Fn() -> E + Send + Sync + 'static,
        E: OcrEngine + 'static,
    {
        self.engines = self.engines.register(kind, factory);
        self
    }

    pub fn route(mut self, language: Language, kind: EngineKind) -> Self {
        self.engines = self.engines.route(language, kind);
        self
    }

    pub fn build(self) -> Extractor {
        let device = Device::select(self.config.use_gpu, self.gpu_available);
        if self.config.use_gpu && device == Device::Cpu {
            warn!("GPU requested but not available, falling back to CPU");
        }
        info!(%device, "using device");

        let artifacts = ArtifactStore::new(self.config.artifact_dir.clone());
        Extractor {
            inner: Arc::new(Inner {
                config: self.config,
                detector: self.detector,
                registry: self.engines.device(device).build(),
                artifacts,
            }),
        }
    }
}

struct Inner {
    config: ExtractorConfig,
    detector: Arc<dyn TextDetector>,
    registry: EngineRegistry,
    artifacts: ArtifactStore,
}

/// Turns page images into ordered text blocks and transcripts.
///
/// Cloning is cheap and clones share the engine cache, so one extractor can
/// serve concurrent requests.
#[derive(Clone)]
pub struct Extractor {
    inner: Arc<Inner>,
}

impl Extractor {
    pub fn builder(detector: impl TextDetector + 'static) -> ExtractorBuilder {
        ExtractorBuilder {
            config: ExtractorConfig::default(),
            detector: Arc::new(detector),
            engines: EngineRegistry::builder(),
            gpu_available: false,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.inner.registry
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.inner.artifacts
    }

    /// Extracts the text of one decoded page, optionally writing it to `output`.
    ///
    /// A failed write is logged and does not fail the call.
    pub async fn process_image(
        &self,
        image: &PageImage,
        language: &str,
        output: Option<&OutputTarget>,
    ) -> Result<ExtractionResult> {
        let language: Language = language.parse()?;
        let result = self.extract(image, language).await?;
        if let Some(target) = output {
            self.persist(&result, target).await;
        }
        Ok(result)
    }

    /// Reads and decodes an image file, then runs [`Extractor::process_image`].
    pub async fn process_file(
        &self,
        path: &Path,
        language: &str,
        output: Option<&OutputTarget>,
    ) -> Result<ExtractionResult> {
        let language: Language = language.parse()?;
        let image = read_page(path).await?;
        let result = self.extract(&image, language).await?;
        if let Some(target) = output {
            self.persist(&result, target).await;
        }
        Ok(result)
    }

    /// Decodes uploaded bytes, extracts the page and stores the transcript
    /// under a new id.
    pub async fn process_raw_bytes(
        &self,
        bytes: &[u8],
        filename: &str,
        language: &str,
    ) -> Result<RawExtraction> {
        let language: Language = language.parse()?;
        debug!(filename, size = bytes.len(), "decoding uploaded image");
        let image = decode_page(filename, bytes)?;
        let result = self.extract(&image, language).await?;

        let artifact = self.inner.artifacts.save(&result.transcript).await;
        match &artifact {
            Ok(stored) => info!(file_id = %stored.id, path = %stored.path.display(), "stored transcript"),
            Err(e) => warn!(filename, "failed to store transcript: {}", e),
        }
        Ok(RawExtraction { result, artifact })
    }

    /// Fetches a transcript stored by [`Extractor::process_raw_bytes`].
    pub async fn load_artifact(&self, file_id: &str) -> Result<String> {
        Ok(self.inner.artifacts.load(file_id).await?)
    }

    pub async fn status(&self) -> PipelineStatus {
        PipelineStatus {
            device: self.inner.registry.device(),
            loaded_languages: self.inner.registry.loaded_languages(),
            artifact_dir: self.inner.artifacts.dir().to_path_buf(),
            artifact_dir_writable: self.inner.artifacts.probe_writable().await,
        }
    }

    pub(crate) async fn extract(&self, image: &PageImage, language: Language) -> Result<ExtractionResult> {
        let name = image.name();
        info!(
            image = name,
            width = image.width(),
            height = image.height(),
            channels = image.channels(),
            %language,
            "processing image"
        );

        let regions = self.inner.detector.detect(image).await.map_err(|e| {
            error!(image = name, "text detection failed: {}", e);
            ExtractError::Detection(e.to_string())
        })?;
        debug!(image = name, regions = regions.len(), "detected text regions");

        if regions.is_empty() {
            info!(image = name, "no text detected");
            return Ok(ExtractionResult::empty(name));
        }

        let mut regions = sort_regions(regions, language.reading_direction());
        for region in &mut regions {
            region.source_lang = Some(language);
        }

        let engine = self.inner.registry.get(language).await?;
        debug!(image = name, engine = engine.name(), "recognizing text");
        engine.process(image, &mut regions).await.map_err(|e| {
            error!(image = name, engine = engine.name(), "text recognition failed: {}", e);
            ExtractError::Recognition(e.to_string())
        })?;

        let result = ExtractionResult::from_regions(name, &regions);
        info!(image = name, blocks = result.blocks.len(), "extraction complete");
        Ok(result)
    }

    pub(crate) async fn persist(&self, result: &ExtractionResult, target: &OutputTarget) {
        match target.write(result).await {
            Ok(()) => info!(path = %target.path.display(), "saved transcript"),
            Err(e) => warn!(path = %target.path.display(), "failed to save transcript: {}", e),
        }
    }
}

pub(crate) fn decode_page(name: &str, bytes: &[u8]) -> Result<PageImage> {
    PageImage::decode(name, bytes).map_err(|e| match e {
        OcrError::InvalidInput(msg) => ExtractError::InvalidImage(msg),
        other => ExtractError::InvalidImage(other.to_string()),
    })
}

pub(crate) async fn read_page(path: &Path) -> Result<PageImage> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string());
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        ExtractError::InvalidImage(format!("failed to read {}: {}", path.display(), e))
    })?;
    decode_page(&name, &bytes)
}
