use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A merchant listing returned by one of the search providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Provider that reported the listing (`keepa`, `serpapi`).
    pub source: String,
    pub store: String,
    pub title: String,
    pub price: f64,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSearchResponse {
    pub query: String,
    pub results: Vec<Offer>,
    /// `<provider>_enabled` -> whether that provider's credential is configured
    pub sources: BTreeMap<String, bool>,
}
