//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod borrow_repository;
mod classroom_repository;
mod department_repository;
pub(crate) mod entities;
mod user_repository;

pub use borrow_repository::{BorrowRepository, BorrowStore};
pub use classroom_repository::{ClassroomRepository, ClassroomStore};
pub use department_repository::{DepartmentRepository, DepartmentStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use borrow_repository::MockBorrowRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use classroom_repository::MockClassroomRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use department_repository::MockDepartmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// Drain the statement log of a mock connection no longer shared.
#[cfg(test)]
pub(crate) fn transaction_log(
    db: std::sync::Arc<sea_orm::DatabaseConnection>,
) -> Vec<sea_orm::Transaction> {
    std::sync::Arc::try_unwrap(db)
        .expect("mock connection still shared")
        .into_transaction_log()
}
