use std::sync::Arc;

use crate::config::AppConfig;
use crate::external::page_fetcher::{FetchError, HttpPageFetcher, PageFetcher};
use crate::services::event_service::EventScout;
use crate::services::offer_service::OfferAggregator;
use crate::services::price_track_service::PriceTracker;
use crate::store::{HistoryStore, JsonFileBackend};

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<PriceTracker>,
    pub aggregator: Arc<OfferAggregator>,
}

impl AppState {
    pub fn new(tracker: PriceTracker, aggregator: OfferAggregator) -> Self {
        Self {
            tracker: Arc::new(tracker),
            aggregator: Arc::new(aggregator),
        }
    }

    /// Production wiring: live HTTP fetcher, JSON file history, env-gated providers.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new()?);
        let store = Arc::new(HistoryStore::new(
            Arc::new(JsonFileBackend::new(config.history_file.clone())),
            config.store_timeout,
        ));
        let scout = EventScout::new(fetcher.clone(), config.event_fetch_timeout);
        let tracker = PriceTracker::new(fetcher, store, scout, config.page_fetch_timeout);

        Ok(Self::new(tracker, OfferAggregator::from_config(config)))
    }
}
