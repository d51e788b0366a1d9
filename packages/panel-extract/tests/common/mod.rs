//! Deterministic stand-ins for the detector and recognition backends.
#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbImage};
use panel_extract::{
    BoundingBox, Device, EngineKind, Extractor, ExtractorBuilder, ExtractorConfig, OcrEngine,
    OcrError, PageImage, TextDetector, TextRegion,
};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns fixed boxes per image name and counts how often it runs.
#[derive(Clone, Default)]
pub struct StubDetector {
    pub regions: Arc<HashMap<String, Vec<BoundingBox>>>,
    pub failing: Arc<HashSet<String>>,
    pub calls: Arc<AtomicUsize>,
}

impl StubDetector {
    pub fn new(pages: &[(&str, Vec<BoundingBox>)]) -> Self {
        Self {
            regions: Arc::new(
                pages
                    .iter()
                    .map(|(name, boxes)| (name.to_string(), boxes.clone()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, names: &[&str]) -> Self {
        self.failing = Arc::new(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextDetector for StubDetector {
    async fn detect(&self, image: &PageImage) -> Result<Vec<TextRegion>, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(image.name()) {
            return Err(OcrError::EngineError("detector model crashed".to_string()));
        }
        Ok(self
            .regions
            .get(image.name())
            .map(|boxes| boxes.iter().copied().map(TextRegion::new).collect())
            .unwrap_or_default())
    }
}

/// Shared state observed by every [`StubEngine`] built from one [`EngineTally`].
#[derive(Clone, Default)]
pub struct EngineTally {
    /// Text to return, keyed by the region's integer box
    pub texts: Arc<HashMap<[i32; 4], String>>,
    pub inits: Arc<AtomicUsize>,
    pub process_calls: Arc<AtomicUsize>,
    pub fail_init_attempts: usize,
    pub failing_pages: Arc<HashSet<String>>,
    pub seen_codes: Arc<Mutex<Vec<String>>>,
    pub devices: Arc<Mutex<Vec<Device>>>,
}

impl EngineTally {
    pub fn with_texts(texts: &[([i32; 4], &str)]) -> Self {
        Self {
            texts: Arc::new(texts.iter().map(|(bbox, text)| (*bbox, text.to_string())).collect()),
            ..Default::default()
        }
    }

    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn process_calls(&self) -> usize {
        self.process_calls.load(Ordering::SeqCst)
    }

    pub fn engine(&self, name: &'static str) -> StubEngine {
        StubEngine {
            name,
            tally: self.clone(),
        }
    }
}

pub struct StubEngine {
    name: &'static str,
    tally: EngineTally,
}

#[async_trait]
impl OcrEngine for StubEngine {
    fn name(&self) -> &str {
        self.name
    }

    async fn initialize(&mut self, device: Device) -> Result<(), OcrError> {
        let attempt = self.tally.inits.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.tally.fail_init_attempts {
            return Err(OcrError::Initialization("model weights missing".to_string()));
        }
        self.tally.devices.lock().unwrap().push(device);
        Ok(())
    }

    async fn process(&self, image: &PageImage, regions: &mut [TextRegion]) -> Result<(), OcrError> {
        self.tally.process_calls.fetch_add(1, Ordering::SeqCst);
        if self.tally.failing_pages.contains(image.name()) {
            return Err(OcrError::EngineError("out of memory".to_string()));
        }
        for region in regions.iter_mut() {
            if let Some(lang) = region.source_lang {
                self.tally.seen_codes.lock().unwrap().push(lang.code().to_string());
            }
            region.text = self.tally.texts.get(&region.bounding_box.to_pixels()).cloned();
            region.confidence = region.text.as_ref().map(|_| 0.9);
        }
        Ok(())
    }
}

/// Builder with every engine kind served by stubs sharing `tally`.
pub fn builder(detector: StubDetector, tally: &EngineTally, config: ExtractorConfig) -> ExtractorBuilder {
    let (manga, pororo, paddle, doc) = (tally.clone(), tally.clone(), tally.clone(), tally.clone());
    Extractor::builder(detector)
        .config(config)
        .register(EngineKind::Manga, move || manga.engine("manga-ocr"))
        .register(EngineKind::Pororo, move || pororo.engine("pororo"))
        .register(EngineKind::Paddle, move || paddle.engine("paddleocr"))
        .register(EngineKind::Document, move || doc.engine("doctr"))
}

pub fn extractor(detector: StubDetector, tally: &EngineTally, config: ExtractorConfig) -> Extractor {
    builder(detector, tally, config).build()
}

pub fn bbox(x1: f32, y1: f32, x2: f32, y2: f32) -> BoundingBox {
    BoundingBox::from_xyxy(x1, y1, x2, y2)
}

pub fn page(name: &str) -> PageImage {
    PageImage::new(name, DynamicImage::ImageRgb8(RgbImage::new(200, 200))).unwrap()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn config_in(dir: &std::path::Path) -> ExtractorConfig {
    ExtractorConfig {
        artifact_dir: dir.join("artifacts"),
        ..Default::default()
    }
}
