//! Custom extractors for request validation

use aide::operation::OperationInput;
use aide::OperationOutput;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::types::error::AppError;

/// JSON extractor that maps rejections into the API error envelope
pub struct JsonBody<T>(pub T);

/// JSON extractor that additionally runs the payload's validation rules
pub struct ValidatedJson<T>(pub T);

/// Describes the first failing field, preferring its custom message
///
/// Fields are visited in name order so the reported error is stable.
#[must_use]
pub fn validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .find_map(|(field, errors)| {
            errors.first().map(|error| {
                error.message.as_ref().map_or_else(
                    || format!("Invalid value for `{field}`"),
                    ToString::to_string,
                )
            })
        })
        .unwrap_or_else(|| "Request validation failed".to_string())
}

fn map_json_rejection(err: &JsonRejection) -> AppError {
    match err {
        JsonRejection::MissingJsonContentType(_) => AppError::new(
            axum::http::StatusCode::BAD_REQUEST,
            "invalid_content_type",
            "Missing Content-Type: application/json header",
        ),
        JsonRejection::JsonDataError(err) => {
            // Missing or mistyped fields
            AppError::validation(err.body_text())
        }
        _ => AppError::new(
            axum::http::StatusCode::BAD_REQUEST,
            "invalid_json",
            "Invalid JSON payload",
        ),
    }
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + JsonSchema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err| map_json_rejection(&err))?;

        Ok(Self(payload))
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + JsonSchema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // First extract JSON
        let JsonBody(payload) = JsonBody::<T>::from_request(req, state).await?;

        // Then validate
        payload
            .validate()
            .map_err(|errors| AppError::validation(validation_message(&errors)))?;

        Ok(Self(payload))
    }
}

impl<T> OperationInput for JsonBody<T>
where
    T: JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        // Delegate to Json<T>'s implementation since JsonBody has the same structure
        Json::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        // Document validation error responses
        AppError::inferred_responses(ctx, operation)
    }
}

impl<T> OperationInput for ValidatedJson<T>
where
    T: JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        JsonBody::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AppError::inferred_responses(ctx, operation)
    }
}
