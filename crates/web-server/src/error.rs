use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection, StringRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use feeds::FeedError;
use ingest::IngestError;
use serde_json::json;
use store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("Invalid survey: {0}")]
    Survey(#[from] IngestError),
    /// An extractor rejected the request, e.g. a malformed id or an oversized body.
    #[error("Rejected request: {message}")]
    Rejected { status: StatusCode, message: String },
}

// Extractor rejections keep their status but get the JSON error body.
macro_rules! from_rejection {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    AppError::Rejected {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )+
    };
}

from_rejection!(PathRejection, QueryRejection, StringRejection);

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Store(StoreError::MissingUploader) => (
                StatusCode::BAD_REQUEST,
                StoreError::MissingUploader.to_string(),
            ),
            AppError::Store(store_err) => {
                tracing::error!(error = ?store_err, "Store error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal store error occurred".to_string(),
                )
            }
            AppError::Feed(feed_err @ FeedError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, feed_err.to_string())
            }
            AppError::Feed(feed_err @ FeedError::UnknownColumn(_)) => {
                (StatusCode::BAD_REQUEST, feed_err.to_string())
            }
            AppError::Survey(ingest_err) => {
                tracing::debug!(error = %ingest_err, "Rejected survey upload.");
                (StatusCode::BAD_REQUEST, ingest_err.to_string())
            }
            AppError::Rejected { status, message } => (status, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
