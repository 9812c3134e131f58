use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::external::page_fetcher::FetchError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported site: {0}")]
    UnsupportedSite(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("External error: {0}")]
    External(String),
    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnsupportedSite(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::External(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::UnsupportedSite(url) => format!(
                "Unsupported site for {url}. Paste an Amazon or Flipkart product link."
            ),
            AppError::NotFound(msg) => msg.clone(),
            AppError::External(msg) => format!("Upstream error: {msg}"),
            AppError::Storage(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}

impl From<FetchError> for AppError {
    fn from(value: FetchError) -> Self {
        AppError::External(value.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::Storage(value)
    }
}
