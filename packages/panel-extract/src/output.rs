//! Result schema returned to callers and the text artifacts rendered from it.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;

use panel_ocr::TextRegion;

/// Second transcript line when a page has no readable text.
pub const NO_TEXT_MARKER: &str = "No text detected";

/// One recognised text block, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: usize,
    pub text: String,
    pub bbox: [i32; 4],
    pub confidence: Option<f32>,
}

/// Everything extracted from one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub blocks: Vec<TextBlock>,
    pub transcript: String,
    pub filename: String,
}

impl ExtractionResult {
    /// Result for a page on which the detector found nothing.
    pub fn empty(filename: impl Into<String>) -> Self {
        Self::from_blocks(filename.into(), Vec::new())
    }

    /// Builds blocks from recognised regions that are already in reading order.
    /// Regions without text are dropped and ids are assigned to the rest.
    pub fn from_regions(filename: impl Into<String>, regions: &[TextRegion]) -> Self {
        let blocks = regions
            .iter()
            .filter_map(|region| {
                region
                    .recognized_text()
                    .map(|text| (text, region.bounding_box, region.confidence))
            })
            .enumerate()
            .map(|(id, (text, bbox, confidence))| TextBlock {
                id,
                text,
                bbox: bbox.to_pixels(),
                confidence,
            })
            .collect();
        Self::from_blocks(filename.into(), blocks)
    }

    fn from_blocks(filename: String, blocks: Vec<TextBlock>) -> Self {
        let transcript = render_transcript(&filename, &blocks);
        Self {
            blocks,
            transcript,
            filename,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Human readable per-block report.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Extraction Results for {}", self.filename);
        let _ = writeln!(out, "{}", "=".repeat(50));
        out.push('\n');

        if self.blocks.is_empty() {
            let _ = writeln!(out, "{}", NO_TEXT_MARKER);
            return out;
        }

        for block in &self.blocks {
            let [x1, y1, x2, y2] = block.bbox;
            let _ = writeln!(out, "Block {}:", block.id);
            let _ = writeln!(out, "Text: {}", block.text);
            let _ = writeln!(out, "Position: [{}, {}, {}, {}]", x1, y1, x2, y2);
            if let Some(confidence) = block.confidence {
                let _ = writeln!(out, "Confidence: {:.2}", confidence);
            }
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the transcript to `path`, creating parent directories.
    pub async fn write_transcript(&self, path: &Path) -> std::io::Result<()> {
        write_creating_parent(path, &self.transcript).await
    }

    pub async fn write_listing(&self, path: &Path) -> std::io::Result<()> {
        write_creating_parent(path, &self.listing()).await
    }
}

/// Where a single page's output should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    /// Also write the per-block listing next to the transcript
    pub verbose: bool,
}

impl OutputTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// `page1.txt` lists to `page1.blocks.txt`.
    pub fn listing_path(&self) -> PathBuf {
        self.path.with_extension("blocks.txt")
    }

    pub async fn write(&self, result: &ExtractionResult) -> std::io::Result<()> {
        result.write_transcript(&self.path).await?;
        if self.verbose {
            result.write_listing(&self.listing_path()).await?;
        }
        Ok(())
    }
}

fn render_transcript(filename: &str, blocks: &[TextBlock]) -> String {
    let mut lines = Vec::with_capacity(blocks.len() + 1);
    lines.push(format!("//{}", filename));
    if blocks.is_empty() {
        lines.push(NO_TEXT_MARKER.to_string());
    } else {
        lines.extend(blocks.iter().map(|block| block.text.clone()));
    }
    lines.join("\n")
}

pub(crate) async fn write_creating_parent(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, contents).await
}
