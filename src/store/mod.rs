//! Durable price history keyed by product URL.
//!
//! The whole store is one document: it is loaded completely for every price-track
//! request and written back completely after each upsert. Backends only move that
//! document in and out of a medium; [`HistoryStore`] owns the read-modify-write
//! cycle and serializes it so two requests for the same product cannot interleave.

mod json_file;
mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::models::{HistoryDocument, PricePoint};

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(String),

    #[error("corrupt history document: {0}")]
    Corrupt(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("history store timed out")]
    Timeout,
}

/// Medium holding the serialized history document.
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    /// Reads the full document. A record that does not exist yet is an empty document.
    async fn load(&self) -> Result<HistoryDocument, StoreError>;

    /// Replaces the full document.
    async fn save(&self, document: &HistoryDocument) -> Result<(), StoreError>;
}

pub struct HistoryStore {
    backend: Arc<dyn HistoryBackend>,
    write_gate: Mutex<()>,
    timeout: Duration,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn HistoryBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            write_gate: Mutex::new(()),
            timeout,
        }
    }

    /// Loads the document, treating unreadable or corrupt state as empty.
    pub async fn load(&self) -> HistoryDocument {
        match tokio::time::timeout(self.timeout, self.backend.load()).await {
            Ok(Ok(document)) => document,
            Ok(Err(e)) => {
                warn!("Price history unreadable, starting from an empty store: {}", e);
                HistoryDocument::new()
            }
            Err(_) => {
                warn!("Price history load timed out after {:?}, starting from an empty store", self.timeout);
                HistoryDocument::new()
            }
        }
    }

    /// Loads the document for a write. Only a corrupt record is recovered from (as
    /// empty); unreadable or slow storage aborts the write so nothing is overwritten.
    async fn load_for_write(&self) -> Result<HistoryDocument, StoreError> {
        let loaded = tokio::time::timeout(self.timeout, self.backend.load())
            .await
            .map_err(|_| StoreError::Timeout)?;

        match loaded {
            Err(StoreError::Corrupt(e)) => {
                warn!("Price history corrupt, replacing it with a fresh document: {}", e);
                Ok(HistoryDocument::new())
            }
            other => other,
        }
    }

    // Callers must hold `write_gate`.
    async fn save(&self, document: &HistoryDocument) -> Result<(), StoreError> {
        tokio::time::timeout(self.timeout, self.backend.save(document))
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    /// Read-only view of one product's history.
    pub async fn history(&self, url: &str) -> Vec<PricePoint> {
        self.load().await.remove(url).unwrap_or_default()
    }

    /// Upserts `price` for `date` into the history of `url` and persists the document.
    ///
    /// Returns the product's updated history, sorted ascending by date.
    pub async fn record_price(
        &self,
        url: &str,
        date: NaiveDate,
        price: f64,
    ) -> Result<Vec<PricePoint>, StoreError> {
        let _guard = self.write_gate.lock().await;

        let mut document = self.load_for_write().await?;
        let history = document.remove(url).unwrap_or_default();
        let history = upsert(history, date, price);
        document.insert(url.to_string(), history.clone());

        self.save(&document).await?;
        debug!("Recorded {} for {} on {} ({} points)", price, url, date, history.len());

        Ok(history)
    }
}

/// Replaces the price already recorded for `date`, or appends a new point, then sorts
/// the history ascending by date.
pub fn upsert(mut history: Vec<PricePoint>, date: NaiveDate, price: f64) -> Vec<PricePoint> {
    match history.iter_mut().find(|p| p.date == date) {
        Some(existing) => existing.price = price,
        None => history.push(PricePoint::new(date, price)),
    }
    history.sort_by_key(|p| p.date);
    history
}
