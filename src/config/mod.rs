//! Configuration: environment-backed settings plus the fixed limits of the
//! booking domain (slot range, roles, defaults).

mod constants;
mod settings;

pub use constants::*;
pub use settings::{Config, PasswordSettings};
