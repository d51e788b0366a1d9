use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Axis-aligned box in image pixel space, stored as corner coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    /// Builds a box from two corners, normalising them so `min <= max` on both axes.
    pub fn from_xyxy(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x_min: x1.min(x2),
            y_min: y1.min(y2),
            x_max: x1.max(x2),
            y_max: y1.max(y2),
        }
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    pub fn center_y(&self) -> f32 {
        (self.y_min + self.y_max) / 2.0
    }

    /// Integer corners, truncated toward zero.
    pub fn to_pixels(&self) -> [i32; 4] {
        [
            self.x_min as i32,
            self.y_min as i32,
            self.x_max as i32,
            self.y_max as i32,
        ]
    }
}

/// A detected text area. Detectors fill in the geometry; engines fill in
/// `text` and `confidence`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    pub bounding_box: BoundingBox,
    pub text: Option<String>,
    pub confidence: Option<f32>,
    pub source_lang: Option<Language>,
}

impl TextRegion {
    pub fn new(bounding_box: BoundingBox) -> Self {
        Self {
            bounding_box,
            text: None,
            confidence: None,
            source_lang: None,
        }
    }

    /// Recognised text as a single line, or `None` when the engine produced
    /// nothing usable. Line breaks inside the text become spaces.
    pub fn recognized_text(&self) -> Option<String> {
        let text = self.text.as_deref()?;
        let line = text
            .lines()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!line.is_empty()).then_some(line)
    }
}
