use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::external::keepa::KeepaProvider;
use crate::external::offer_provider::{OfferProvider, OfferProviderError};
use crate::external::serpapi::SerpApiProvider;
use crate::models::{Offer, ProductSearchResponse};

/// Target merchant -> display-name aliases seen in provider results.
const MERCHANT_ALIASES: &[(&str, &[&str])] = &[
    ("Amazon", &["Amazon", "amazon"]),
    ("Flipkart", &["Flipkart", "flipkart"]),
];

/// Merchant bucket a provider-reported store name belongs to, if any.
///
/// Plain substring test against the registry's casing.
pub fn match_merchant(store: &str) -> Option<&'static str> {
    MERCHANT_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| store.contains(alias)))
        .map(|(merchant, _)| *merchant)
}

struct ProviderSlot {
    id: &'static str,
    /// `None` when the provider's credential is not configured
    provider: Option<Arc<dyn OfferProvider>>,
}

pub struct OfferAggregator {
    slots: Vec<ProviderSlot>,
    timeout: Duration,
}

impl OfferAggregator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            slots: Vec::new(),
            timeout,
        }
    }

    /// Registers a provider slot. Slots are queried, and their results ordered, in
    /// registration order.
    pub fn with_provider(mut self, id: &'static str, provider: Option<Arc<dyn OfferProvider>>) -> Self {
        self.slots.push(ProviderSlot { id, provider });
        self
    }

    /// Keepa and SerpApi, each enabled only when its API key is configured.
    pub fn from_config(config: &AppConfig) -> Self {
        let keepa = config
            .keepa_api_key
            .clone()
            .map(|key| Arc::new(KeepaProvider::new(key)) as Arc<dyn OfferProvider>);
        let serpapi = config
            .serpapi_api_key
            .clone()
            .map(|key| Arc::new(SerpApiProvider::new(key)) as Arc<dyn OfferProvider>);

        Self::new(config.provider_timeout)
            .with_provider("keepa", keepa)
            .with_provider("serpapi", serpapi)
    }

    /// `<provider>_enabled` flags, reported for diagnostics only.
    pub fn sources(&self) -> BTreeMap<String, bool> {
        self.slots
            .iter()
            .map(|slot| (format!("{}_enabled", slot.id), slot.provider.is_some()))
            .collect()
    }

    async fn query_provider(&self, provider: &dyn OfferProvider, query: &str) -> Result<Vec<Offer>, OfferProviderError> {
        tokio::time::timeout(self.timeout, provider.search(query))
            .await
            .map_err(|_| OfferProviderError::Timeout)?
    }

    /// Queries every enabled provider concurrently and returns the merchant-filtered
    /// offers ranked by ascending price. A failing provider only loses its own results.
    pub async fn search(&self, query: &str) -> ProductSearchResponse {
        let enabled: Vec<&Arc<dyn OfferProvider>> =
            self.slots.iter().filter_map(|slot| slot.provider.as_ref()).collect();

        let outcomes = join_all(
            enabled
                .iter()
                .map(|provider| self.query_provider(&***provider, query)),
        )
        .await;

        let mut offers = Vec::new();
        for (provider, outcome) in enabled.iter().zip(outcomes) {
            match outcome {
                Ok(found) => {
                    info!("{} returned {} offers for '{}'", provider.id(), found.len(), query);
                    offers.extend(found);
                }
                Err(e) => warn!("{} search failed for '{}': {}", provider.id(), query, e),
            }
        }

        let results = rank_offers(offers);
        info!("Product search '{}' -> {} ranked offers", query, results.len());

        ProductSearchResponse {
            query: query.to_string(),
            results,
            sources: self.sources(),
        }
    }
}

/// Keeps offers from recognized merchants with a usable price, sorted by price.
///
/// The sort is stable, so equal prices keep provider order. When the same listing
/// URL is reported more than once only its cheapest entry survives.
pub fn rank_offers(offers: Vec<Offer>) -> Vec<Offer> {
    let mut ranked: Vec<Offer> = offers
        .into_iter()
        .filter(|o| o.price.is_finite() && o.price > 0.0)
        .filter(|o| match_merchant(&o.store).is_some())
        .collect();

    ranked.sort_by(|a, b| a.price.total_cmp(&b.price));

    let mut seen = HashSet::new();
    ranked.retain(|o| seen.insert(o.url.clone()));
    ranked
}
