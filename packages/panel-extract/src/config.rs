//! Extractor configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};

/// Image file extensions picked up by directory runs
const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Load engines onto the GPU when the backend has one
    pub use_gpu: bool,

    /// Where raw-byte requests persist their transcripts
    pub artifact_dir: PathBuf,

    /// Upper bound on images processed at once in a batch
    pub max_concurrent_images: usize,

    /// Lowercase extensions, without the dot
    pub image_extensions: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            use_gpu: false,
            artifact_dir: std::env::temp_dir().join("panel-ocr"),
            max_concurrent_images: 4,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ExtractorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| ExtractError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            ExtractError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    /// True when `path` has one of the configured image extensions, ignoring case.
    pub fn is_image_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.image_extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }

    pub(crate) fn concurrency(&self) -> usize {
        self.max_concurrent_images.max(1)
    }
}
