use async_trait::async_trait;
use parking_lot::Mutex;

use super::{HistoryBackend, StoreError};
use crate::models::HistoryDocument;

/// Process-local backend. Holds the document in its serialized form so it behaves
/// like a durable record, corrupt contents included.
#[derive(Default)]
pub struct MemoryBackend {
    raw: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Mutex::new(Some(raw.to_string())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().clone()
    }
}

#[async_trait]
impl HistoryBackend for MemoryBackend {
    async fn load(&self) -> Result<HistoryDocument, StoreError> {
        match self.raw.lock().as_deref() {
            Some(raw) => serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string())),
            None => Ok(HistoryDocument::new()),
        }
    }

    async fn save(&self, document: &HistoryDocument) -> Result<(), StoreError> {
        let body = serde_json::to_string(document)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        *self.raw.lock() = Some(body);
        Ok(())
    }
}
