//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use rundown_domain::error::{PlaybackError, ShowError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`ShowError`] to an HTTP response with appropriate status code.
pub struct ApiError(ShowError);

impl From<ShowError> for ApiError {
    fn from(err: ShowError) -> Self {
        Self(err)
    }
}

impl From<PlaybackError> for ApiError {
    fn from(err: PlaybackError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ShowError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ShowError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            ShowError::Playback(err) => (StatusCode::CONFLICT, err.to_string()),
            ShowError::Device(err) => {
                tracing::error!(error = %err, "device error");
                (StatusCode::BAD_GATEWAY, "device unavailable".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
