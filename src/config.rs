use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub history_file: PathBuf,
    pub keepa_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub page_fetch_timeout: Duration,
    pub event_fetch_timeout: Duration,
    pub provider_timeout: Duration,
    pub store_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            history_file: PathBuf::from("price_history.json"),
            keepa_api_key: None,
            serpapi_api_key: None,
            page_fetch_timeout: Duration::from_secs(15),
            event_fetch_timeout: Duration::from_secs(8),
            provider_timeout: Duration::from_secs(15),
            store_timeout: Duration::from_secs(5),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so it can be exercised without
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|e| format!("Invalid BIND_ADDR '{}': {}", raw, e))?,
            None => defaults.bind_addr,
        };

        Ok(Self {
            bind_addr,
            history_file: lookup("HISTORY_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.history_file),
            keepa_api_key: credential(&lookup, "KEEPA_API_KEY"),
            serpapi_api_key: credential(&lookup, "SERPAPI_API_KEY"),
            page_fetch_timeout: seconds(&lookup, "PAGE_FETCH_TIMEOUT_SECS", defaults.page_fetch_timeout),
            event_fetch_timeout: seconds(&lookup, "EVENT_FETCH_TIMEOUT_SECS", defaults.event_fetch_timeout),
            provider_timeout: seconds(&lookup, "PROVIDER_TIMEOUT_SECS", defaults.provider_timeout),
            store_timeout: seconds(&lookup, "STORE_TIMEOUT_SECS", defaults.store_timeout),
        })
    }
}

// Empty or whitespace-only keys count as not configured.
fn credential<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn seconds<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!("Ignoring invalid {}='{}', using {}s", key, raw, default.as_secs());
                default
            }
        },
        None => default,
    }
}
