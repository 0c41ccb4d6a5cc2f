//! Classroom booking - Reservation backend for school classrooms
//!
//! Users belong to departments and borrow classrooms for ranges of daily
//! time slots. Accounts carry a role (admin, teacher or student) that gates
//! what they may change.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and password hashing
//! - **validation**: Request schemas and payload parsing
//! - **services**: Application use cases and business logic
//! - **infra**: Database, migrations, query composition and repositories
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;
pub mod validation;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Borrow, Classroom, Department, Password, UserProfile, UserRole};
pub use errors::{AppError, AppResult};
