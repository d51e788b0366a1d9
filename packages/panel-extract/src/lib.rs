//! # panel-extract
//!
//! Text extraction for comic and manga pages with mixed-language speech balloons.
//!
//! ## Features
//!
//! - **Per-language engines**: Japanese, Korean and Chinese pages go to specialised recognisers, everything else to a document OCR engine
//! - **Engine cache**: each language's engine is built and initialized once, even under concurrent requests
//! - **Reading order**: regions are grouped into rows and read left-to-right, or right-to-left for Japanese
//! - **Stable output**: ordered blocks with ids, boxes and confidences, plus a `//<filename>` headed transcript
//! - **Batches**: lists of pages or whole directories, processed concurrently with per-page failures
//! - **Artifacts**: transcripts from uploaded bytes are stored under a UUID for later download
//!
//! The text detector and the recognition engines live outside this crate and are
//! plugged in through the [`TextDetector`] and [`OcrEngine`] traits.
//!
//! ## Quick Start
//!
//! ```ignore
//! use panel_extract::prelude::*;
//!
//! let extractor = Extractor::builder(MyDetector::new())
//!     .register(EngineKind::Manga, MangaEngine::new)
//!     .register(EngineKind::Document, DocumentEngine::new)
//!     .build();
//!
//! let result = extractor
//!     .process_file(Path::new("manga1.jpg"), "Japanese", None)
//!     .await?;
//! println!("{}", result.transcript);
//! ```

pub mod artifacts;
pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod reading_order;
pub mod registry;

pub use artifacts::{ArtifactError, ArtifactStore, StoredArtifact};
pub use batch::{BatchEntry, BatchReport, COMBINED_TRANSCRIPT};
pub use config::ExtractorConfig;
pub use error::{ExtractError, Result};
pub use output::{ExtractionResult, OutputTarget, TextBlock, NO_TEXT_MARKER};
pub use pipeline::{Extractor, ExtractorBuilder, PipelineStatus, RawExtraction};
pub use reading_order::sort_regions;
pub use registry::{EngineFactory, EngineRegistry, EngineRegistryBuilder};

pub use panel_ocr::{
    BoundingBox, Device, EngineKind, Language, OcrEngine, OcrError, PageImage, ReadingDirection,
    TextDetector, TextRegion,
};

/// Names of the languages a request may ask for.
pub fn supported_languages() -> Vec<&'static str> {
    Language::ALL.iter().map(|lang| lang.name()).collect()
}

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```ignore
/// use panel_extract::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        supported_languages, BatchReport, BoundingBox, Device, EngineKind, ExtractError,
        ExtractionResult, Extractor, ExtractorConfig, Language, OcrEngine, OcrError, OutputTarget,
        PageImage, TextBlock, TextDetector, TextRegion,
    };
}
