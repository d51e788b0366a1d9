//! Transcript storage for raw-byte requests, addressed by UUID so a result can
//! be fetched again later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

use crate::output::write_creating_parent;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("invalid artifact id '{0}'")]
    InvalidId(String),

    #[error("artifact {0} not found")]
    NotFound(Uuid),

    #[error("artifact storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Record of a saved transcript, in the shape an upload response returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredArtifact {
    pub id: Uuid,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.txt", id))
    }

    pub async fn save(&self, transcript: &str) -> Result<StoredArtifact, ArtifactError> {
        let id = Uuid::new_v4();
        let path = self.path_for(id);
        write_creating_parent(&path, transcript).await?;
        Ok(StoredArtifact {
            id,
            path,
            created_at: Utc::now(),
        })
    }

    /// Reads a stored transcript. Only ids that parse as UUIDs are accepted, which keeps
    /// lookups inside the store directory.
    pub async fn load(&self, id: &str) -> Result<String, ArtifactError> {
        let id = Uuid::parse_str(id).map_err(|_| ArtifactError::InvalidId(id.to_string()))?;
        match fs::read_to_string(self.path_for(id)).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ArtifactError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Checks that the store directory can be created and written to.
    pub async fn probe_writable(&self) -> bool {
        let probe = self.dir.join(format!(".probe-{}", Uuid::new_v4()));
        if write_creating_parent(&probe, "probe").await.is_err() {
            return false;
        }
        fs::remove_file(&probe).await.is_ok()
    }
}
