use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::page_fetcher::PageFetcher;
use crate::models::{PriceTrackResponse, ProductInfo, CURRENCY_INR};
use crate::services::event_service::EventScout;
use crate::services::extraction_service::FieldExtractor;
use crate::services::forecasting_service::{forecast, DEFAULT_HORIZON};
use crate::services::site_classifier::classify;
use crate::store::HistoryStore;

/// Classify -> fetch -> extract -> record -> forecast -> sale events, for one product URL.
///
/// Only classification, the page fetch and price extraction can fail the request, and
/// all three run before the History Store is touched. Sale-event lookups degrade to an
/// empty list.
pub struct PriceTracker {
    fetcher: Arc<dyn PageFetcher>,
    extractor: FieldExtractor,
    store: Arc<HistoryStore>,
    scout: EventScout,
    fetch_timeout: Duration,
}

impl PriceTracker {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<HistoryStore>,
        scout: EventScout,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            extractor: FieldExtractor::new(),
            store,
            scout,
            fetch_timeout,
        }
    }

    pub async fn track(&self, url: &str, today: NaiveDate) -> Result<PriceTrackResponse, AppError> {
        let url = url.trim();

        let site = classify(url).ok_or_else(|| {
            warn!("Rejected unsupported product URL: {}", url);
            AppError::UnsupportedSite(url.to_string())
        })?;

        let html = self.fetcher.fetch(url, self.fetch_timeout).await.map_err(|e| {
            error!("Failed to fetch {} page {}: {}", site, url, e);
            AppError::from(e)
        })?;

        let extraction = self.extractor.extract(site, &html);
        let price = extraction.price.ok_or_else(|| {
            warn!("No price marker matched on {} page {}", site, url);
            AppError::NotFound(format!(
                "Could not find a price on this {} page. The listing may be unavailable or its layout changed.",
                site.display_name()
            ))
        })?;

        let history = self.store.record_price(url, today, price).await.map_err(|e| {
            error!("Failed to persist price history for {}: {}", url, e);
            AppError::from(e)
        })?;

        let forecast = forecast(&history, DEFAULT_HORIZON);
        let events = self.scout.events(site).await;

        info!(
            "Tracked {} ({}) at {} with {} history points, {} sale events",
            url,
            site,
            price,
            history.len(),
            events.len()
        );

        Ok(PriceTrackResponse {
            product: ProductInfo {
                url: url.to_string(),
                site,
                title: extraction.title,
            },
            currency: CURRENCY_INR.to_string(),
            current_price: price,
            history,
            forecast,
            events,
        })
    }
}
