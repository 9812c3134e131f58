use serde::{Deserialize, Serialize};

/// Retail site a product page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteId {
    Amazon,
    Flipkart,
}

impl SiteId {
    pub const ALL: [SiteId; 2] = [SiteId::Amazon, SiteId::Flipkart];

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteId::Amazon => "amazon",
            SiteId::Flipkart => "flipkart",
        }
    }

    /// Human-facing site name, also used for placeholder titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            SiteId::Amazon => "Amazon",
            SiteId::Flipkart => "Flipkart",
        }
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
