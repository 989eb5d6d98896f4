use std::sync::Arc;

use aide::OperationIo;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
    Extension,
};

use crate::{
    access_guard::{AccessError, AccessGuard, AdminIdentity},
    types::AppError,
};

/// Authenticated admin extracted from the bearer token
#[derive(Debug, Clone, OperationIo)]
pub struct AuthenticatedAdmin {
    /// Admin username from the token subject
    pub username: String,
}

impl From<AdminIdentity> for AuthenticatedAdmin {
    fn from(identity: AdminIdentity) -> Self {
        Self {
            username: identity.username,
        }
    }
}

/// Axum extractor for the authenticated admin
///
/// Only available on routes behind [`auth_middleware`]:
/// ```ignore
/// async fn protected_handler(
///     admin: AuthenticatedAdmin,
/// ) -> Result<impl IntoResponse, AppError> {
///     Ok(format!("Hello {}", admin.username))
/// }
/// ```
impl<S> FromRequestParts<S> for AuthenticatedAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AccessError::MissingToken.into())
    }
}

/// Admin authentication middleware
///
/// Extracts the Bearer token from the Authorization header, verifies it with the
/// `AccessGuard` and adds `AuthenticatedAdmin` to the request extensions.
///
/// # Errors
///
/// - 401 when the header is missing or is not a Bearer token
/// - 403 when the token is invalid or expired
pub async fn auth_middleware(
    Extension(access_guard): Extension<Arc<AccessGuard>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AccessError::MissingToken)?;

    let identity = access_guard.verify(token)?;

    request
        .extensions_mut()
        .insert(AuthenticatedAdmin::from(identity));

    Ok(next.run(request).await)
}
