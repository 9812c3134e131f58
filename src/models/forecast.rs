use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Single projected point of a price forecast. Derived on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
}
