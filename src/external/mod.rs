pub mod page_fetcher;
pub mod offer_provider;
pub mod keepa;
pub mod serpapi;
