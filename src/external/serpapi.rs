use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::external::offer_provider::{check_status, non_blank, OfferProvider, OfferProviderError};
use crate::models::Offer;
use crate::utils::normalize_price;

const SERPAPI_SEARCH_URL: &str = "https://serpapi.com/search.json";

pub struct SerpApiProvider {
    client: reqwest::Client,
    api_key: String,
}

impl SerpApiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SerpApiShoppingResponse {
    #[serde(default)]
    shopping_results: Vec<SerpApiShoppingResult>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpApiShoppingResult {
    title: Option<String>,
    /// Merchant display name
    source: Option<String>,
    link: Option<String>,
    product_link: Option<String>,
    price: Option<String>,
    extracted_price: Option<f64>,
}

impl SerpApiShoppingResult {
    fn price(&self) -> Option<f64> {
        self.extracted_price
            .filter(|p| p.is_finite() && *p > 0.0)
            .or_else(|| self.price.as_deref().and_then(normalize_price))
    }
}

/// Turns a Google Shopping payload into offers from whichever merchants it lists.
pub(crate) fn normalize(body: SerpApiShoppingResponse) -> Vec<Offer> {
    body.shopping_results
        .into_iter()
        .filter_map(|result| {
            let price = result.price()?;
            let url = non_blank(result.link).or_else(|| non_blank(result.product_link))?;

            Some(Offer {
                source: "serpapi".to_string(),
                store: non_blank(result.source)?,
                title: non_blank(result.title)?,
                price,
                url,
            })
        })
        .collect()
}

#[async_trait]
impl OfferProvider for SerpApiProvider {
    fn id(&self) -> &'static str {
        "serpapi"
    }

    async fn search(&self, query: &str) -> Result<Vec<Offer>, OfferProviderError> {
        let resp = self
            .client
            .get(SERPAPI_SEARCH_URL)
            .query(&[
                ("engine", "google_shopping"),
                ("q", query),
                ("gl", "in"),
                ("hl", "en"),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        check_status(&resp)?;

        let body: SerpApiShoppingResponse = resp.json().await?;
        if let Some(err) = &body.error {
            // SerpApi reports an empty result page as an error string
            if body.shopping_results.is_empty() && err.contains("hasn't returned any results") {
                return Ok(Vec::new());
            }
            return Err(OfferProviderError::BadResponse(err.clone()));
        }

        let offers = normalize(body);
        debug!("SerpApi returned {} usable offers for '{}'", offers.len(), query);
        Ok(offers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> SerpApiShoppingResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_prefers_extracted_price() {
        let body = parse(json!({
            "shopping_results": [{
                "title": "boAt Airdopes 141",
                "source": "Flipkart",
                "link": "https://www.flipkart.com/boat-airdopes-141/p/itm1",
                "price": "₹1,099.00",
                "extracted_price": 1099.0
            }]
        }));

        let offers = normalize(body);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].store, "Flipkart");
        assert_eq!(offers[0].source, "serpapi");
        assert_eq!(offers[0].price, 1099.0);
    }

    #[test]
    fn test_normalize_parses_price_string_and_product_link() {
        let body = parse(json!({
            "shopping_results": [{
                "title": "Prestige Kettle",
                "source": "Amazon.in",
                "product_link": "https://www.google.com/shopping/product/1",
                "price": "₹1,29,999"
            }]
        }));

        let offers = normalize(body);
        assert_eq!(offers[0].price, 129999.0);
        assert_eq!(offers[0].url, "https://www.google.com/shopping/product/1");
    }

    #[test]
    fn test_normalize_drops_results_missing_required_fields() {
        let body = parse(json!({
            "shopping_results": [
                { "title": "No store", "link": "https://a", "extracted_price": 10.0 },
                { "source": "Croma", "link": "https://b", "extracted_price": 10.0 },
                { "title": "No url", "source": "Croma", "extracted_price": 10.0 },
                { "title": "No price", "source": "Croma", "link": "https://c", "price": "Out of stock" }
            ]
        }));

        assert!(normalize(body).is_empty());
    }
}
