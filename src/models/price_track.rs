use serde::{Deserialize, Serialize};

use super::{ForecastPoint, PricePoint, SaleEvent, SiteId};

pub const CURRENCY_INR: &str = "INR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    pub url: String,
    pub site: SiteId,
    pub title: String,
}

/// Body of `GET /price-track`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTrackResponse {
    pub product: ProductInfo,
    pub currency: String,
    pub current_price: f64,
    pub history: Vec<PricePoint>,
    pub forecast: Vec<ForecastPoint>,
    #[serde(rename = "sales")]
    pub events: Vec<SaleEvent>,
}
