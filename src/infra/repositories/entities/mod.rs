//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod borrowing;
pub mod classroom;
pub mod department;
pub mod user;
