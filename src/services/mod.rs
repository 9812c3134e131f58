pub mod site_classifier;
pub mod extraction_service;
pub mod forecasting_service;
pub mod event_service;
pub mod offer_service;
pub mod price_track_service;
