use image::{DynamicImage, GenericImageView};

use crate::engine::OcrError;

/// Smallest accepted width or height, in pixels.
pub const MIN_IMAGE_SIDE: u32 = 10;

/// A decoded page together with the file name it came from.
///
/// Construction enforces [`MIN_IMAGE_SIDE`], so every `PageImage` handed to a
/// detector or engine is large enough to process.
#[derive(Debug, Clone)]
pub struct PageImage {
    name: String,
    pixels: DynamicImage,
}

impl PageImage {
    pub fn new(name: impl Into<String>, pixels: DynamicImage) -> Result<Self, OcrError> {
        let (width, height) = pixels.dimensions();
        if width < MIN_IMAGE_SIDE || height < MIN_IMAGE_SIDE {
            return Err(OcrError::InvalidInput(format!(
                "image is too small: {}x{} (minimum {}x{})",
                width, height, MIN_IMAGE_SIDE, MIN_IMAGE_SIDE
            )));
        }
        Ok(Self {
            name: name.into(),
            pixels,
        })
    }

    /// Decodes an encoded image (PNG, JPEG, WebP, ...) from memory.
    pub fn decode(name: impl Into<String>, bytes: &[u8]) -> Result<Self, OcrError> {
        if bytes.is_empty() {
            return Err(OcrError::InvalidInput("image data is empty".to_string()));
        }
        let pixels = image::load_from_memory(bytes)
            .map_err(|e| OcrError::InvalidInput(format!("failed to decode image: {}", e)))?;
        Self::new(name, pixels)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn channels(&self) -> u8 {
        self.pixels.color().channel_count()
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }
}
