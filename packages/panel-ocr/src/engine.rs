use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::page::PageImage;
use crate::region::TextRegion;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("unsupported operation")]
    Unsupported,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("engine initialization failed: {0}")]
    Initialization(String),
    #[error("engine error: {0}")]
    EngineError(String),
}

/// Compute device an engine loads its model onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Cpu,
    Cuda,
}

impl Device {
    /// CUDA only when it was asked for and the backend can provide it.
    pub fn select(use_gpu: bool, gpu_available: bool) -> Self {
        if use_gpu && gpu_available {
            Device::Cuda
        } else {
            Device::Cpu
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Families of recognition engines. Each language is routed to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// Vertical Japanese manga text.
    Manga,
    /// Korean.
    Pororo,
    /// Chinese.
    Paddle,
    /// General purpose document OCR for Latin and Cyrillic scripts.
    Document,
}

impl EngineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Manga => "manga-ocr",
            EngineKind::Pororo => "pororo",
            EngineKind::Paddle => "paddleocr",
            EngineKind::Document => "doctr",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finds candidate text areas on a page. Returned regions carry geometry only.
#[async_trait]
pub trait TextDetector: Send + Sync {
    async fn detect(&self, image: &PageImage) -> Result<Vec<TextRegion>, OcrError>;
}

/// Recognises the text inside regions produced by a [`TextDetector`].
///
/// `initialize` is called exactly once, before the engine is shared. `process`
/// receives every region of a page in reading order and fills in `text` and,
/// when the backend reports it, `confidence`. It must not reorder, add or
/// drop regions.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn initialize(&mut self, device: Device) -> Result<(), OcrError>;

    async fn process(&self, image: &PageImage, regions: &mut [TextRegion]) -> Result<(), OcrError>;
}
