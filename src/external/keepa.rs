use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::external::offer_provider::{check_status, non_blank, OfferProvider, OfferProviderError};
use crate::models::Offer;

const KEEPA_SEARCH_URL: &str = "https://api.keepa.com/search";
// Keepa marketplace code for amazon.in
const KEEPA_DOMAIN_INDIA: &str = "10";
// Indices into `stats.current`
const CSV_AMAZON: usize = 0;
const CSV_NEW: usize = 1;

pub struct KeepaProvider {
    client: reqwest::Client,
    api_key: String,
}

impl KeepaProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct KeepaSearchResponse {
    #[serde(default)]
    products: Option<Vec<KeepaProduct>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct KeepaProduct {
    asin: Option<String>,
    title: Option<String>,
    stats: Option<KeepaStats>,
}

#[derive(Debug, Deserialize)]
struct KeepaStats {
    #[serde(default)]
    current: Vec<Option<i64>>,
}

impl KeepaStats {
    // Keepa reports prices in paise; -1 means no offer of that kind.
    fn current_price(&self) -> Option<f64> {
        [CSV_AMAZON, CSV_NEW]
            .iter()
            .filter_map(|&idx| self.current.get(idx).copied().flatten())
            .find(|&minor| minor > 0)
            .map(|minor| minor as f64 / 100.0)
    }
}

/// Turns a Keepa product search payload into Amazon offers.
pub(crate) fn normalize(body: KeepaSearchResponse) -> Vec<Offer> {
    body.products
        .unwrap_or_default()
        .into_iter()
        .filter_map(|product| {
            let asin = non_blank(product.asin)?;
            let title = non_blank(product.title)?;
            let price = product.stats.as_ref()?.current_price()?;

            Some(Offer {
                source: "keepa".to_string(),
                store: "Amazon".to_string(),
                title,
                price,
                url: format!("https://www.amazon.in/dp/{}", asin),
            })
        })
        .collect()
}

#[async_trait]
impl OfferProvider for KeepaProvider {
    fn id(&self) -> &'static str {
        "keepa"
    }

    async fn search(&self, query: &str) -> Result<Vec<Offer>, OfferProviderError> {
        let resp = self
            .client
            .get(KEEPA_SEARCH_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("domain", KEEPA_DOMAIN_INDIA),
                ("type", "product"),
                ("term", query),
                ("stats", "1"),
            ])
            .send()
            .await?;

        check_status(&resp)?;

        let body: KeepaSearchResponse = resp.json().await?;
        if let Some(err) = &body.error {
            return Err(OfferProviderError::BadResponse(err.to_string()));
        }

        let offers = normalize(body);
        debug!("Keepa returned {} usable offers for '{}'", offers.len(), query);
        Ok(offers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> KeepaSearchResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_uses_amazon_price_in_rupees() {
        let body = parse(json!({
            "products": [{
                "asin": "B0CHX1W1XY",
                "title": "Apple iPhone 15 (128 GB) - Black",
                "stats": { "current": [6990000, 6849900, -1] }
            }]
        }));

        let offers = normalize(body);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].store, "Amazon");
        assert_eq!(offers[0].source, "keepa");
        assert_eq!(offers[0].price, 69900.0);
        assert_eq!(offers[0].url, "https://www.amazon.in/dp/B0CHX1W1XY");
    }

    #[test]
    fn test_normalize_falls_back_to_new_offer_price() {
        let body = parse(json!({
            "products": [{
                "asin": "B0TEST",
                "title": "Kettle",
                "stats": { "current": [-1, 129900] }
            }]
        }));

        assert_eq!(normalize(body)[0].price, 1299.0);
    }

    #[test]
    fn test_normalize_drops_incomplete_products() {
        let body = parse(json!({
            "products": [
                { "asin": "B01", "title": "No stats" },
                { "asin": "B02", "title": "Unavailable", "stats": { "current": [-1, -1] } },
                { "title": "No asin", "stats": { "current": [1000] } },
                { "asin": "B03", "title": "  ", "stats": { "current": [1000] } },
                { "asin": "B04", "title": "Null price", "stats": { "current": [null, null] } }
            ]
        }));

        assert!(normalize(body).is_empty());
    }

    #[test]
    fn test_missing_products_is_empty() {
        let body = parse(json!({ "tokensLeft": 20 }));
        assert!(normalize(body).is_empty());
    }
}
