//! Validated JSON extractor - Schema validation before deserialization.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::validation::{parse_payload, RequestSchema};

/// JSON body checked against the request type's schema.
///
/// The body is first read as an untyped JSON object, validated field by
/// field, and only then deserialized into `T`. Every violating field is
/// reported in one response.
///
/// # Example
///
/// ```rust,ignore
/// use classroom_booking::api::extractors::ValidatedJson;
/// use classroom_booking::validation::InsertClassroom;
///
/// async fn create(ValidatedJson(payload): ValidatedJson<InsertClassroom>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: RequestSchema,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::validation(e.body_text()))?;

        parse_payload(body).map(ValidatedJson)
    }
}
