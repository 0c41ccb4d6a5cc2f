//! HTTP surface of the booking service.
//!
//! Handlers per resource, bearer-token middleware, the schema-checked JSON
//! extractor, and the generated OpenAPI document.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
