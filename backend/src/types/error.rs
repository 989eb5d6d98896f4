//! Universal error handling for the API

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portfolio_storage::RecordStoreError;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{
    access_guard::AccessError, gallery::GalleryError, media_storage::MediaError,
    testimonials::TestimonialError,
};

/// API error response envelope
#[derive(Debug, Serialize, JsonSchema)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    error: String,
    /// Machine-readable error code
    code: &'static str,
    /// Detail about a failed operation
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                error: msg.into(),
                code,
                details: None,
            },
        }
    }

    /// Attach detail text to the error body
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.inner.details = Some(details.into());
        self
    }

    /// 400 error for caller input that failed validation
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", msg)
    }

    /// 404 error for unmatched routes
    #[must_use]
    pub fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "route_not_found", "Route not found")
    }

    /// 500 error that does not leak internal state
    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Internal server error",
        )
    }

    /// HTTP status of the error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!(
                "Client error: {} - {}",
                self.inner.code,
                self.inner.error
            ),
            500..=599 => tracing::error!(
                "Server error: {} - {} {}",
                self.inner.code,
                self.inner.error,
                self.inner.details.as_deref().unwrap_or_default()
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

impl From<RecordStoreError> for AppError {
    fn from(err: RecordStoreError) -> Self {
        tracing::error!("Record store error: {err}");
        Self::internal()
    }
}

impl From<GalleryError> for AppError {
    fn from(err: GalleryError) -> Self {
        match err {
            GalleryError::Validation(msg) => Self::validation(msg),
            GalleryError::NotFound(id) => {
                tracing::debug!("Image not found: {id}");
                Self::new(StatusCode::NOT_FOUND, "not_found", "Image not found")
            }
            GalleryError::Upload(err) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "upload_failed",
                "Image upload failed",
            )
            .with_details(err.to_string()),
            GalleryError::Staging(err) => {
                tracing::error!("Failed to stage upload: {err}");
                Self::internal()
            }
            GalleryError::Store(err) => err.into(),
        }
    }
}

impl From<TestimonialError> for AppError {
    fn from(err: TestimonialError) -> Self {
        match err {
            TestimonialError::Validation(msg) => Self::validation(msg),
            TestimonialError::NotFound(id) => {
                tracing::debug!("Testimonial not found: {id}");
                Self::new(StatusCode::NOT_FOUND, "not_found", "Testimonial not found")
            }
            TestimonialError::Store(err) => err.into(),
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::MissingToken => Self::new(
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization header must contain a valid Bearer token",
            ),
            AccessError::InvalidToken => Self::new(
                StatusCode::FORBIDDEN,
                "invalid_token",
                "Invalid or expired token",
            ),
            AccessError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid credentials",
            ),
            AccessError::Signing(err) => {
                tracing::error!("Failed to sign token: {err}");
                Self::internal()
            }
            AccessError::PasswordHash(err) => {
                tracing::error!("Password hashing error: {err}");
                Self::internal()
            }
            AccessError::Store(err) => err.into(),
        }
    }
}

/// Media host errors only reach the API when an upload is aborted
impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        GalleryError::Upload(err).into()
    }
}

impl OperationOutput for AppError {
    type Inner = ApiErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ApiErrorResponse>::operation_response(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_upload_failure_carries_details() {
        let error: AppError = MediaError::UploadRejected("quota exceeded".to_string()).into();
        let (status, body) = body_json(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Image upload failed");
        assert_eq!(body["code"], "upload_failed");
        assert!(body["details"].as_str().unwrap().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_store_errors_do_not_leak_details() {
        let error: AppError =
            RecordStoreError::NotInitialized("/srv/secret/database.json".into()).into();
        let (status, body) = body_json(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_auth_errors_status_codes() {
        let missing: AppError = AccessError::MissingToken.into();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let invalid: AppError = AccessError::InvalidToken.into();
        assert_eq!(invalid.status(), StatusCode::FORBIDDEN);

        let wrong_password: AppError = AccessError::InvalidCredentials.into();
        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    }
}
