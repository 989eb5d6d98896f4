use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use portfolio_storage::TestimonialRecord;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::instrument;

use super::gallery::MessageResponse;
use crate::{
    middleware::AuthenticatedAdmin,
    testimonials::{NewTestimonial, TestimonialService},
    types::{AppError, Created, JsonBody},
};

#[derive(Debug, Serialize, JsonSchema)]
pub struct SubmitResponse {
    pub message: String,
    pub testimonial: TestimonialRecord,
}

/// Lists testimonials, most recent first
///
/// # Errors
///
/// - `AppError` - the record store could not be read
pub async fn list_testimonials(
    Extension(testimonials): Extension<Arc<TestimonialService>>,
) -> Result<Json<Vec<TestimonialRecord>>, AppError> {
    Ok(Json(testimonials.list().await?))
}

/// Public testimonial form
///
/// # Errors
///
/// - `AppError` 400 - a field breaks its rule after trimming
pub async fn submit_testimonial(
    Extension(testimonials): Extension<Arc<TestimonialService>>,
    JsonBody(testimonial): JsonBody<NewTestimonial>,
) -> Result<Created<SubmitResponse>, AppError> {
    let testimonial = testimonials.submit_public(testimonial).await?;

    Ok(Created(SubmitResponse {
        message: "Thank you for your testimonial".to_string(),
        testimonial,
    }))
}

/// Adds a testimonial on behalf of a client
///
/// # Errors
///
/// - `AppError` 400 - a field breaks its rule
#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn create_testimonial(
    admin: AuthenticatedAdmin,
    Extension(testimonials): Extension<Arc<TestimonialService>>,
    JsonBody(testimonial): JsonBody<NewTestimonial>,
) -> Result<Created<TestimonialRecord>, AppError> {
    Ok(Created(testimonials.submit_admin(testimonial).await?))
}

/// Deletes a testimonial
///
/// # Errors
///
/// - `AppError` 404 - no testimonial has this id
#[instrument(skip(admin, testimonials), fields(admin = %admin.username))]
pub async fn delete_testimonial(
    admin: AuthenticatedAdmin,
    Extension(testimonials): Extension<Arc<TestimonialService>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    testimonials.delete(&id).await?;

    Ok(Json(MessageResponse {
        message: "Testimonial deleted successfully".to_string(),
    }))
}
