use chrono::Duration;

use crate::models::{ForecastPoint, PricePoint};
use crate::utils::round2;

pub const DEFAULT_HORIZON: usize = 6;
/// Spacing between projected points.
pub const FORECAST_STEP_DAYS: i64 = 30;

/// Projects `horizon` future prices from a linear trend over the history.
///
/// The fit treats consecutive observations as equally spaced (x = 0..n-1) regardless
/// of the calendar gap between them. Projected points are laid out every
/// [`FORECAST_STEP_DAYS`] after the last observation, clamped at zero and rounded to
/// two decimals.
pub fn forecast(history: &[PricePoint], horizon: usize) -> Vec<ForecastPoint> {
    let Some(last) = history.last() else {
        return Vec::new();
    };

    let (slope, intercept) = linear_fit(history);
    let n = history.len();

    (0..horizon)
        .map(|step| {
            let x = (n + step) as f64;
            let predicted = slope * x + intercept;

            ForecastPoint {
                date: last.date + Duration::days(FORECAST_STEP_DAYS * (step as i64 + 1)),
                price: round2(predicted.max(0.0)),
            }
        })
        .collect()
}

/// Ordinary least squares of price against observation index: y = slope * x + intercept
fn linear_fit(history: &[PricePoint]) -> (f64, f64) {
    let n = history.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = history.iter().map(|p| p.price).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, point) in history.iter().enumerate() {
        let x = i as f64;
        numerator += (x - x_mean) * (point.price - y_mean);
        denominator += (x - x_mean) * (x - x_mean);
    }

    // Single observation: no trend to speak of
    let slope = if denominator == 0.0 { 0.0 } else { numerator / denominator };
    let intercept = y_mean - slope * x_mean;

    (slope, intercept)
}
