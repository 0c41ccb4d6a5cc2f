//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod borrow;
pub mod classroom;
pub mod department;
pub mod password;
pub mod query;
pub mod user;

pub use borrow::{Borrow, BorrowView, ClassroomName, NewBorrow};
pub use classroom::{Classroom, ClassroomChanges, NewClassroom};
pub use department::{Department, DepartmentChanges, NewDepartment};
pub use password::{CredentialManager, Password};
pub use query::{day_range, UserKey, UserQueryOptions};
pub use user::{
    DeleteOutcome, NewUser, UserChanges, UserCredentials, UserProfile, UserRole,
};
