use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{HistoryBackend, StoreError};
use crate::models::HistoryDocument;

/// Keeps the history document as a pretty-printed JSON file.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "price_history.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl HistoryBackend for JsonFileBackend {
    async fn load(&self) -> Result<HistoryDocument, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No history file at {}, starting empty", self.path.display());
                return Ok(HistoryDocument::new());
            }
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    async fn save(&self, document: &HistoryDocument) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }

        // Write aside then rename so readers never observe a half-written record
        let temp = self.temp_path();
        tokio::fs::write(&temp, body)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(())
    }
}
