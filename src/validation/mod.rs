//! Request payload validation.
//!
//! Payloads are checked against an explicit [`Schema`] before any typed
//! deserialization happens, so a malformed request is rejected with the
//! full list of violating fields.

pub mod requests;
pub mod schema;

use serde_json::Value;

use crate::errors::{AppError, AppResult};

pub use requests::*;
pub use schema::{FieldKind, FieldRule, Payload, Schema};

/// Validate a raw JSON body against `T`'s schema and deserialize the
/// coerced result.
pub fn parse_payload<T: RequestSchema>(body: Value) -> AppResult<T> {
    let Value::Object(payload) = body else {
        return Err(AppError::validation("Request body must be a JSON object"));
    };

    let coerced = T::schema()
        .validate(&payload)
        .map_err(AppError::InvalidFields)?;

    serde_json::from_value(Value::Object(coerced)).map_err(|e| AppError::validation(e.to_string()))
}
