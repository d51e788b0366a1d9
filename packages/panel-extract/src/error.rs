use std::path::PathBuf;

use panel_ocr::{EngineKind, Language, UnsupportedLanguage};
use thiserror::Error;

use crate::artifacts::ArtifactError;

/// Failure of a single extraction request. In a batch each image carries its own.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    InvalidLanguage(#[from] UnsupportedLanguage),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("text detection failed: {0}")]
    Detection(String),

    #[error("text recognition failed: {0}")]
    Recognition(String),

    #[error("failed to initialize {kind} engine for {language}: {reason}")]
    EngineInitialization {
        language: Language,
        kind: EngineKind,
        reason: String,
    },

    #[error("{} is not a directory", .0.display())]
    InvalidDirectory(PathBuf),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
