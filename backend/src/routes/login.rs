use std::sync::Arc;

use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    access_guard::AccessGuard,
    types::{AppError, ValidatedJson},
};

#[derive(Deserialize, JsonSchema, Validate)]
pub struct LoginRequest {
    /// Admin password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for the admin routes
    pub token: String,
    pub message: String,
    /// Token expiration time
    pub expires_at: DateTime<Utc>,
}

/// Exchanges the admin password for a 24 hour bearer token
///
/// # Errors
///
/// - `AppError` 400 - password missing
/// - `AppError` 401 - wrong password
pub async fn login_handler(
    Extension(access_guard): Extension<Arc<AccessGuard>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let issued = access_guard.login(&request.password).await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        message: "Login successful".to_string(),
        expires_at: issued.expires_at,
    }))
}
