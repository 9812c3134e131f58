pub(crate) mod health;
pub(crate) mod price_track;
pub(crate) mod product_search;
