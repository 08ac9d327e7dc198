//! API error envelope
//!
//! Every failure is converted at the endpoint boundary into a JSON
//! `{ "success": false, "message": .. }` body; nothing propagates as
//! an unhandled fault.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gst_core::GstError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error")]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] GstError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Core(err) => match err {
                GstError::InvalidFormat(_) | GstError::Extraction => StatusCode::BAD_REQUEST,
                GstError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                GstError::UpstreamAuth | GstError::Upstream(_) => StatusCode::BAD_GATEWAY,
                GstError::Config(_) | GstError::Ocr(_) | GstError::Http(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        let err = ApiError::Core(GstError::InvalidFormat("bogus".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::Core(GstError::Extraction);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_failures_map_to_gateway_statuses() {
        assert_eq!(
            ApiError::Core(GstError::RateLimited).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Core(GstError::UpstreamAuth).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Core(GstError::Upstream("boom".to_string())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn configuration_and_ocr_failures_are_internal() {
        assert_eq!(
            ApiError::Core(GstError::Config("no key".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Core(GstError::Ocr("bad image".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn authorization_failures_have_distinct_statuses() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
    }
}
