//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and migrations
//! - Repositories over the SeaORM entities
//! - Conditional read query composition
//! - Unit of Work for repository access

pub mod db;
pub mod query;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    BorrowRepository, BorrowStore, ClassroomRepository, ClassroomStore, DepartmentRepository,
    DepartmentStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockBorrowRepository, MockClassroomRepository, MockDepartmentRepository, MockUserRepository,
};
