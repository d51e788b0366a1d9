//! Contracts shared by the extraction pipeline and the detection/recognition
//! backends it drives: page images, text regions, languages and the
//! [`TextDetector`] / [`OcrEngine`] traits.

pub mod engine;
pub mod language;
pub mod page;
pub mod region;

pub use engine::{Device, EngineKind, OcrEngine, OcrError, TextDetector};
pub use language::{Language, ReadingDirection, UnsupportedLanguage};
pub use page::{PageImage, MIN_IMAGE_SIDE};
pub use region::{BoundingBox, TextRegion};
