//! Best-effort title/price extraction from raw product page markup.
//!
//! Each site declares an ordered list of patterns per field. The first pattern whose
//! capture yields a usable value wins, so the order encodes priority between the
//! several places a page may show its price (list price, deal price, sale price).
//! Adapting to a markup change means editing [`RULES`], not the extraction routine.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::models::SiteId;
use crate::utils::normalize_price;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Price,
}

/// (site, field, pattern). Group 1 of each pattern captures the field's raw text.
const RULES: &[(SiteId, Field, &str)] = &[
    (SiteId::Amazon, Field::Title, r#"(?s)id="productTitle"[^>]*>(.*?)</"#),
    (SiteId::Amazon, Field::Price, r#"(?s)id="priceblock_ourprice"[^>]*>([^<]+)<"#),
    (SiteId::Amazon, Field::Price, r#"(?s)id="priceblock_dealprice"[^>]*>([^<]+)<"#),
    (SiteId::Amazon, Field::Price, r#"(?s)id="priceblock_saleprice"[^>]*>([^<]+)<"#),
    (SiteId::Amazon, Field::Price, r#"(?s)id="corePriceDisplay_desktop_feature_div".*?class="a-offscreen"[^>]*>([^<]+)<"#),
    (SiteId::Amazon, Field::Price, r#"class="a-price-whole"[^>]*>([^<]+)<"#),
    (SiteId::Flipkart, Field::Title, r#"(?s)class="[^"]*\bVU-ZEz\b[^"]*"[^>]*>(.*?)</"#),
    (SiteId::Flipkart, Field::Title, r#"(?s)class="[^"]*\bB_NuCI\b[^"]*"[^>]*>(.*?)</"#),
    (SiteId::Flipkart, Field::Price, r#"class="[^"]*\bNx9bqj\b[^"]*"[^>]*>([^<]+)<"#),
    (SiteId::Flipkart, Field::Price, r#"class="[^"]*\b_30jeq3\b[^"]*"[^>]*>([^<]+)<"#),
    (SiteId::Flipkart, Field::Price, r#"class="[^"]*\b_16Jk6d\b[^"]*"[^>]*>([^<]+)<"#),
];

struct CompiledRule {
    site: SiteId,
    field: Field,
    pattern: Regex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub title: String,
    /// `None` when no price rule produced a usable value.
    pub price: Option<f64>,
}

pub struct FieldExtractor {
    rules: Vec<CompiledRule>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor {
    pub fn new() -> Self {
        let rules = RULES
            .iter()
            .filter_map(|(site, field, pattern)| match Regex::new(pattern) {
                Ok(pattern) => Some(CompiledRule { site: *site, field: *field, pattern }),
                Err(e) => {
                    warn!("Skipping invalid {:?} rule for {}: {}", field, site, e);
                    None
                }
            })
            .collect();

        Self { rules }
    }

    fn rules_for(&self, site: SiteId, field: Field) -> impl Iterator<Item = &Regex> {
        self.rules
            .iter()
            .filter(move |r| r.site == site && r.field == field)
            .map(|r| &r.pattern)
    }

    pub fn extract(&self, site: SiteId, html: &str) -> Extraction {
        let title = self
            .rules_for(site, Field::Title)
            .filter_map(|re| capture(re, html))
            .map(|raw| clean_text(&raw))
            .find(|t| !t.is_empty())
            .unwrap_or_else(|| format!("{} Product", site.display_name()));

        let price = self.rules_for(site, Field::Price).enumerate().find_map(|(idx, re)| {
            let value = capture(re, html).and_then(|raw| normalize_price(&raw))?;
            debug!("{} price matched rule #{}: {}", site, idx, value);
            Some(value)
        });

        Extraction { title, price }
    }
}

fn capture(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

fn tag_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").ok()).as_ref()
}

/// Strips nested tags, decodes the common entities and collapses whitespace.
pub(crate) fn clean_text(raw: &str) -> String {
    let without_tags = match tag_pattern() {
        Some(tag_re) => tag_re.replace_all(raw, " ").into_owned(),
        None => raw.to_string(),
    };

    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(FieldExtractor::new().rules.len(), RULES.len());
        assert!(tag_pattern().is_some());
    }

    #[test]
    fn test_clean_text_reuses_tag_pattern() {
        let first = tag_pattern().map(|re| re as *const Regex);
        assert_eq!(clean_text("<b>Deal</b>&nbsp;<i>Day</i>"), "Deal Day");
        assert_eq!(clean_text("<p>  Big   Sale </p>"), "Big Sale");
        assert_eq!(tag_pattern().map(|re| re as *const Regex), first);
    }

    #[test]
    fn test_amazon_title_and_price() {
        let html = r#"<html><span id="productTitle" class="a-size-large">
              Apple iPhone 15 (128 GB) &amp; Case
            </span>
            <span class="a-price"><span class="a-price-whole">69,900</span></span></html>"#;

        let extraction = FieldExtractor::new().extract(SiteId::Amazon, html);
        assert_eq!(extraction.title, "Apple iPhone 15 (128 GB) & Case");
        assert_eq!(extraction.price, Some(69900.0));
    }

    #[test]
    fn test_first_matching_price_rule_wins() {
        let html = r#"<span id="priceblock_dealprice">₹1,199.00</span>
            <span id="priceblock_ourprice">₹1,499.00</span>
            <span class="a-price-whole">999</span>"#;

        let extraction = FieldExtractor::new().extract(SiteId::Amazon, html);
        assert_eq!(extraction.price, Some(1499.0));
    }

    #[test]
    fn test_zero_price_falls_through_to_next_rule() {
        let html = r#"<span id="priceblock_ourprice">₹0.00</span>
            <span id="priceblock_saleprice">₹2,349.00</span>"#;

        let extraction = FieldExtractor::new().extract(SiteId::Amazon, html);
        assert_eq!(extraction.price, Some(2349.0));
    }

    #[test]
    fn test_flipkart_current_and_legacy_markup() {
        let current = r#"<h1 class="_6EBuvT"><span class="VU-ZEz">boAt Airdopes 141</span></h1>
            <div class="Nx9bqj CxhGGd">₹1,099</div>"#;
        let legacy = r#"<span class="B_NuCI">Redmi Note 13</span>
            <div class="_30jeq3 _16Jk6d">₹17,999</div>"#;

        let extractor = FieldExtractor::new();
        let a = extractor.extract(SiteId::Flipkart, current);
        let b = extractor.extract(SiteId::Flipkart, legacy);

        assert_eq!(a, Extraction { title: "boAt Airdopes 141".into(), price: Some(1099.0) });
        assert_eq!(b, Extraction { title: "Redmi Note 13".into(), price: Some(17999.0) });
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let html = r#"<div class="Nx9bqj">₹500</div>"#;

        let extraction = FieldExtractor::new().extract(SiteId::Flipkart, html);
        assert_eq!(extraction.title, "Flipkart Product");
        assert_eq!(extraction.price, Some(500.0));
    }

    #[test]
    fn test_no_price_marker_is_absent_not_zero() {
        let html = "<html><body><p>Currently unavailable</p></body></html>";

        let extraction = FieldExtractor::new().extract(SiteId::Amazon, html);
        assert_eq!(extraction.price, None);
        assert_eq!(extraction.title, "Amazon Product");
    }

    #[test]
    fn test_malformed_markup_does_not_panic() {
        let html = r#"<span id="productTitle" <<< class="a-price-whole">abc</ <div"#;

        let extraction = FieldExtractor::new().extract(SiteId::Amazon, html);
        assert_eq!(extraction.price, None);
    }

    #[test]
    fn test_rules_are_scoped_to_their_site() {
        let html = r#"<div class="Nx9bqj">₹500</div>"#;
        assert_eq!(FieldExtractor::new().extract(SiteId::Amazon, html).price, None);
    }
}
