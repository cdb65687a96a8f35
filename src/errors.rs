use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::bookings::BookingError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MissingField(_)
            | BookingError::Invalid(_)
            | BookingError::InvalidStatus(_) => AppError::BadRequest(err.to_string()),
            BookingError::IllegalTransition { .. } | BookingError::Conflict(_) => {
                AppError::Conflict(err.to_string())
            }
            BookingError::NotFound(id) => AppError::NotFound(format!("booking {id}")),
            BookingError::Store(e) => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        if let AppError::Store(e) = &self {
            tracing::error!(error = %e, "request failed on store access");
        }

        let body = serde_json::json!({ "success": false, "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
