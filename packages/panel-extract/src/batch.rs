//! Multi-page runs: a list of decoded pages, or every image in a directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use panel_ocr::{Language, PageImage};
use tokio::fs;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{ExtractError, Result};
use crate::output::{write_creating_parent, ExtractionResult, OutputTarget};
use crate::pipeline::{read_page, Extractor};

/// File name of the combined transcript written into a batch output directory.
pub const COMBINED_TRANSCRIPT: &str = "all_results.txt";

/// A page waiting for its turn: already decoded, or a file still to be read.
enum BatchInput {
    Decoded(PageImage),
    File(PathBuf),
}

impl BatchInput {
    async fn into_page(self) -> Result<PageImage> {
        match self {
            BatchInput::Decoded(image) => Ok(image),
            BatchInput::File(path) => read_page(&path).await,
        }
    }
}

/// Outcome for one page of a batch.
#[derive(Debug)]
pub struct BatchEntry {
    pub name: String,
    pub outcome: Result<ExtractionResult>,
}

/// Per-page outcomes, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Result<ExtractionResult>> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.outcome)
    }

    pub fn successes(&self) -> impl Iterator<Item = &ExtractionResult> {
        self.entries.iter().filter_map(|entry| entry.outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ExtractError)> {
        self.entries.iter().filter_map(|entry| match &entry.outcome {
            Ok(_) => None,
            Err(e) => Some((entry.name.as_str(), e)),
        })
    }

    /// Transcripts of every successful page, separated by a blank line.
    pub fn combined_transcript(&self) -> String {
        self.successes()
            .map(|result| result.transcript.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Extractor {
    /// Processes `images` independently. A failing page is recorded in its
    /// entry and does not stop the others.
    ///
    /// With `output_dir`, each page's transcript goes to `<stem>.txt` and all
    /// successful transcripts to [`COMBINED_TRANSCRIPT`]. When two pages share a
    /// stem, the later one is written to `<file name>.txt` instead.
    pub async fn process_batch(
        &self,
        images: Vec<PageImage>,
        language: &str,
        output_dir: Option<&Path>,
    ) -> Result<BatchReport> {
        let language: Language = language.parse()?;
        let inputs = images
            .into_iter()
            .map(|image| (image.name().to_string(), BatchInput::Decoded(image)))
            .collect();
        self.run_batch(inputs, language, output_dir).await
    }

    /// Processes every image file directly inside `dir`, in file name order.
    /// Files are read and decoded only once their page gets a worker slot.
    pub async fn process_directory(
        &self,
        dir: &Path,
        language: &str,
        output_dir: Option<&Path>,
    ) -> Result<BatchReport> {
        let language: Language = language.parse()?;
        if !dir.is_dir() {
            return Err(ExtractError::InvalidDirectory(dir.to_path_buf()));
        }

        let files: Vec<_> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file() && self.config().is_image_file(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        if files.is_empty() {
            info!(dir = %dir.display(), "no images found");
            return Ok(BatchReport::default());
        }
        info!(dir = %dir.display(), images = files.len(), "processing directory");

        let inputs = files
            .into_iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (name, BatchInput::File(path))
            })
            .collect();
        self.run_batch(inputs, language, output_dir).await
    }

    async fn run_batch(
        &self,
        inputs: Vec<(String, BatchInput)>,
        language: Language,
        output_dir: Option<&Path>,
    ) -> Result<BatchReport> {
        if let Some(dir) = output_dir {
            fs::create_dir_all(dir).await?;
        }

        let mut file_names =
            transcript_file_names(inputs.iter().map(|(name, _)| name.as_str())).into_iter();
        let semaphore = Arc::new(Semaphore::new(self.config().concurrency()));
        let mut tasks = Vec::with_capacity(inputs.len());

        for (name, input) in inputs {
            let file_name = file_names.next();
            let target = output_dir
                .zip(file_name)
                .map(|(dir, file_name)| OutputTarget::new(dir.join(file_name)));
            let semaphore = Arc::clone(&semaphore);
            let extractor = self.clone();

            let task = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| ExtractError::Task(e.to_string()))?;
                let image = input.into_page().await?;
                let result = extractor.extract(&image, language).await?;
                if let Some(target) = target {
                    extractor.persist(&result, &target).await;
                }
                Ok::<_, ExtractError>(result)
            });
            tasks.push((name, task));
        }

        let mut entries = Vec::with_capacity(tasks.len());
        for (name, task) in tasks {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ExtractError::Task(e.to_string())),
            };
            if let Err(e) = &outcome {
                warn!(image = %name, "failed to process image: {}", e);
            }
            entries.push(BatchEntry { name, outcome });
        }
        let report = BatchReport { entries };

        if let Some(dir) = output_dir {
            let path = dir.join(COMBINED_TRANSCRIPT);
            match write_creating_parent(&path, &report.combined_transcript()).await {
                Ok(()) => info!(path = %path.display(), "saved combined transcript"),
                Err(e) => warn!(path = %path.display(), "failed to save combined transcript: {}", e),
            }
        }

        Ok(report)
    }
}

/// `page1.jpg` is written as `page1.txt`.
fn transcript_file_name(image_name: &str) -> String {
    let stem = Path::new(image_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(image_name);
    format!("{}.txt", stem)
}

/// Per-page transcript names for a batch, in input order. A name already taken
/// (by an earlier page or by [`COMBINED_TRANSCRIPT`]) falls back to the full
/// image name, then to a numbered suffix.
fn transcript_file_names<'a>(image_names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::from([COMBINED_TRANSCRIPT.to_string()]);
    image_names
        .into_iter()
        .map(|name| {
            let mut candidate = transcript_file_name(name);
            if taken.contains(&candidate) {
                candidate = format!("{}.txt", name);
            }
            let mut suffix = 2;
            while taken.contains(&candidate) {
                candidate = format!("{}.{}.txt", name, suffix);
                suffix += 1;
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}
