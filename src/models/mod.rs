mod site;
mod price_point;
mod forecast;
mod offer;
mod sale_event;
mod price_track;

pub use site::SiteId;
pub use price_point::{HistoryDocument, PricePoint};
pub use forecast::ForecastPoint;
pub use offer::{Offer, ProductSearchResponse};
pub use sale_event::SaleEvent;
pub use price_track::{PriceTrackResponse, ProductInfo, CURRENCY_INR};
