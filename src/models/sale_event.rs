use serde::{Deserialize, Serialize};

/// Promotional sale detected on a site's event page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub name: String,
    pub date: String,
    /// Page the event was scraped from
    pub source: String,
}
