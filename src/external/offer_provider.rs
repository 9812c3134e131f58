use async_trait::async_trait;
use thiserror::Error;

use crate::models::Offer;

#[derive(Debug, Error)]
pub enum OfferProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("timed out")]
    Timeout,
}

impl From<reqwest::Error> for OfferProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            OfferProviderError::Timeout
        } else if e.is_decode() {
            OfferProviderError::Parse(e.to_string())
        } else {
            OfferProviderError::Network(e.to_string())
        }
    }
}

/// External product-search service. Each adapter normalizes its own payload shape into
/// [`Offer`]s and drops entries missing a store, title, url or usable price.
#[async_trait]
pub trait OfferProvider: Send + Sync {
    /// Stable identifier, also used as the `source` of every offer it returns.
    fn id(&self) -> &'static str;

    async fn search(&self, query: &str) -> Result<Vec<Offer>, OfferProviderError>;
}

/// Maps a non-success HTTP status to the matching provider error.
pub(crate) fn check_status(resp: &reqwest::Response) -> Result<(), OfferProviderError> {
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(OfferProviderError::RateLimited);
    }
    if !status.is_success() {
        return Err(OfferProviderError::BadResponse(format!("HTTP {}", status)));
    }
    Ok(())
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
