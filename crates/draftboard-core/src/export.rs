// Export of the available-player list and the full board.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::draft::{DraftError, DraftSnapshot, DraftState};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export to {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize draft board: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub destination: String,
    pub bytes: usize,
}

/// Destination for exported text.
#[async_trait]
pub trait ExportSink: Send + Sync {
    async fn export(&self, text: &str) -> Result<ExportReceipt, ExportError>;
}

/// Writes exports to a file, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct FileExport {
    path: PathBuf,
}

impl FileExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileExport { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ExportSink for FileExport {
    async fn export(&self, text: &str) -> Result<ExportReceipt, ExportError> {
        let io_err = |source| ExportError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&self.path, text).await.map_err(io_err)?;

        info!("Exported {} bytes to {}", text.len(), self.path.display());
        Ok(ExportReceipt {
            destination: self.path.display().to_string(),
            bytes: text.len(),
        })
    }
}

/// Newline-separated names of players that are available and unassigned.
///
/// An empty list is a soft failure so the caller can tell the user instead
/// of writing an empty file.
pub fn available_players_text(state: &DraftState) -> Result<String, DraftError> {
    let names = state.available_unassigned();
    if names.is_empty() {
        return Err(DraftError::NothingToExport);
    }
    Ok(names.join("\n"))
}

/// Pretty-printed JSON of the whole board.
pub fn board_json(snapshot: &DraftSnapshot) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}
