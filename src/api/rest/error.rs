use axum::http::header::InvalidHeaderValue;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::domain::EntityTagParseError;
use crate::product_actor::ProductError;

/// Everything a product route can fail with.
///
/// Responses carry the status only; details go to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error("If-Match header is required")]
    MissingIfMatch,
    #[error("If-Match header is not a valid entity tag: {0}")]
    InvalidIfMatch(#[from] EntityTagParseError),
    #[error("Response header could not be built: {0}")]
    Header(#[from] InvalidHeaderValue),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Product(ProductError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Product(ProductError::VersionConflict { .. }) => StatusCode::CONFLICT,
            ApiError::Product(ProductError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingIfMatch | ApiError::InvalidIfMatch(_) => StatusCode::BAD_REQUEST,
            ApiError::Header(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }
        status.into_response()
    }
}
