use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use crate::external::page_fetcher::{FetchError, PageFetcher};
use crate::models::{SaleEvent, SiteId};
use crate::services::extraction_service::clean_text;

pub const DATE_NOT_LISTED: &str = "Date not listed";

/// Promotional pages polled per site.
const EVENT_SOURCES: &[(SiteId, &str)] = &[
    (SiteId::Amazon, "https://www.amazon.in/deals"),
    (SiteId::Amazon, "https://www.amazon.in/events/greatindianfestival"),
    (SiteId::Flipkart, "https://www.flipkart.com/big-billion-days-store"),
    (SiteId::Flipkart, "https://www.flipkart.com/big-saving-days-store"),
];

const MONTH: &str = r"(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?";
const DAY: &str = r"\d{1,2}(?:st|nd|rd|th)?";

/// Result of polling a single promotional page.
#[derive(Debug)]
pub enum ScoutOutcome {
    Found(SaleEvent),
    /// Page fetched but carried no usable title.
    Empty,
    Failed(FetchError),
}

pub struct EventScout {
    fetcher: Arc<dyn PageFetcher>,
    timeout: Duration,
}

impl EventScout {
    pub fn new(fetcher: Arc<dyn PageFetcher>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    pub fn sources_for(site: SiteId) -> impl Iterator<Item = &'static str> {
        EVENT_SOURCES
            .iter()
            .filter(move |(s, _)| *s == site)
            .map(|(_, url)| *url)
    }

    pub async fn scout_source(&self, source: &str) -> ScoutOutcome {
        match self.fetcher.fetch(source, self.timeout).await {
            Ok(html) => match parse_event(&html, source) {
                Some(event) => ScoutOutcome::Found(event),
                None => ScoutOutcome::Empty,
            },
            Err(e) => ScoutOutcome::Failed(e),
        }
    }

    /// Sale events currently advertised for `site`. Sources that fail or carry no
    /// title contribute nothing; this never fails as a whole.
    pub async fn events(&self, site: SiteId) -> Vec<SaleEvent> {
        let mut events = Vec::new();

        for source in Self::sources_for(site) {
            match self.scout_source(source).await {
                ScoutOutcome::Found(event) => events.push(event),
                ScoutOutcome::Empty => debug!("No sale title found at {}", source),
                ScoutOutcome::Failed(e) => warn!("Sale source {} skipped: {}", source, e),
            }
        }

        events
    }
}

/// Builds an event from a promotional page: its `<title>` plus the first day-month
/// (range) snippet in the text, if any.
pub fn parse_event(html: &str, source: &str) -> Option<SaleEvent> {
    let name = title_pattern()?
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|t| !t.is_empty())?;

    let date = find_date_range(html).unwrap_or_else(|| DATE_NOT_LISTED.to_string());

    Some(SaleEvent {
        name,
        date,
        source: source.to_string(),
    })
}

fn title_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").ok())
        .as_ref()
}

fn date_range_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        let single = format!(r"{DAY}\s+{MONTH}");
        let pattern = format!(
            r"(?i)\b({single}(?:\s*(?:-|–|to)\s*(?:{single}|{DAY}))?)"
        );
        Regex::new(&pattern).ok()
    })
    .as_ref()
}

fn find_date_range(html: &str) -> Option<String> {
    date_range_pattern()?
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubFetcher {
        pages: HashMap<&'static str, Result<&'static str, u16>>,
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<String, FetchError> {
            match self.pages.get(url) {
                Some(Ok(html)) => Ok(html.to_string()),
                Some(Err(status)) => Err(FetchError::Status(*status)),
                None => Err(FetchError::Timeout),
            }
        }
    }

    fn scout(pages: HashMap<&'static str, Result<&'static str, u16>>) -> EventScout {
        EventScout::new(Arc::new(StubFetcher { pages }), Duration::from_secs(1))
    }

    #[test]
    fn test_parse_event_with_date_range() {
        let html = "<html><head><title>Big Billion Days 2026 | Flipkart</title></head>\
            <body><p>Sale live from 27th Sept - 3rd Oct</p></body></html>";

        let event = parse_event(html, "https://www.flipkart.com/big-billion-days-store").unwrap();
        assert_eq!(event.name, "Big Billion Days 2026 | Flipkart");
        assert_eq!(event.date, "27th Sept - 3rd Oct");
    }

    #[test]
    fn test_parse_event_without_date_keeps_placeholder() {
        let html = "<title>\n  Today's Deals &amp; Offers\n</title><body>Shop now</body>";

        let event = parse_event(html, "https://www.amazon.in/deals").unwrap();
        assert_eq!(event.name, "Today's Deals & Offers");
        assert_eq!(event.date, DATE_NOT_LISTED);
    }

    #[test]
    fn test_parse_event_requires_title() {
        assert!(parse_event("<body>12 Oct to 18 Oct</body>", "x").is_none());
        assert!(parse_event("<title>   </title>", "x").is_none());
    }

    #[test]
    fn test_single_day_date() {
        assert_eq!(find_date_range("Starts 5 October at noon").as_deref(), Some("5 October"));
        assert_eq!(find_date_range("dates: 12 Oct to 18").as_deref(), Some("12 Oct to 18"));
    }

    #[tokio::test]
    async fn test_failed_sources_are_skipped() {
        let pages = HashMap::from([
            ("https://www.amazon.in/deals", Err(503)),
            (
                "https://www.amazon.in/events/greatindianfestival",
                Ok("<title>Great Indian Festival</title> 23 Sep - 1 Oct"),
            ),
        ]);

        let events = scout(pages).events(SiteId::Amazon).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Great Indian Festival");
        assert_eq!(events[0].date, "23 Sep - 1 Oct");
        assert_eq!(events[0].source, "https://www.amazon.in/events/greatindianfestival");
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_empty_list() {
        let events = scout(HashMap::new()).events(SiteId::Flipkart).await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_untitled_page_reports_empty_outcome() {
        let pages = HashMap::from([("https://www.amazon.in/deals", Ok("<body>nothing</body>"))]);

        let outcome = scout(pages).scout_source("https://www.amazon.in/deals").await;
        assert!(matches!(outcome, ScoutOutcome::Empty));
    }

    #[test]
    fn test_every_site_has_sources() {
        for site in SiteId::ALL {
            assert!(EventScout::sources_for(site).count() > 0);
        }
    }

    #[test]
    fn test_event_patterns_compile_once() {
        let title = title_pattern().map(|re| re as *const Regex);
        let range = date_range_pattern().map(|re| re as *const Regex);
        assert!(title.is_some());
        assert!(range.is_some());

        let html = "<title>Summer Sale</title><p>Runs 12 June to 15 June</p>";
        assert_eq!(find_date_range(html).as_deref(), Some("12 June to 15 June"));
        assert_eq!(find_date_range(html).as_deref(), Some("12 June to 15 June"));
        assert_eq!(title_pattern().map(|re| re as *const Regex), title);
        assert_eq!(date_range_pattern().map(|re| re as *const Regex), range);
    }
}
