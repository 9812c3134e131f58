use std::sync::OnceLock;

use regex::Regex;

fn numeric_token() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").ok()).as_ref()
}

/// Parses a displayed price such as `₹1,29,999.00` or `Rs. 499`.
///
/// Thousands separators are dropped, then the first numeric token is taken. Zero,
/// unparseable and non-finite values yield `None` so callers can move on to their
/// next candidate.
pub fn normalize_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let token = numeric_token()?.find(&cleaned)?;
    let value = token.as_str().parse::<f64>().ok()?;

    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        None
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
