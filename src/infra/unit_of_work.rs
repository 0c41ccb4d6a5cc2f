//! Unit of Work pattern implementation.
//!
//! Centralizes access to every repository behind one handle, so services
//! depend on a single abstraction instead of one constructor argument per
//! table. Each operation is a single statement or a read, so no transaction
//! scope is exposed here.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    BorrowRepository, BorrowStore, ClassroomRepository, ClassroomStore, DepartmentRepository,
    DepartmentStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get department repository
    fn departments(&self) -> Arc<dyn DepartmentRepository>;

    /// Get classroom repository
    fn classrooms(&self) -> Arc<dyn ClassroomRepository>;

    /// Get borrow repository
    fn borrows(&self) -> Arc<dyn BorrowRepository>;
}

/// Concrete implementation of UnitOfWork backed by one connection pool.
pub struct Persistence {
    users: Arc<dyn UserRepository>,
    departments: Arc<dyn DepartmentRepository>,
    classrooms: Arc<dyn ClassroomRepository>,
    borrows: Arc<dyn BorrowRepository>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            departments: Arc::new(DepartmentStore::new(db.clone())),
            classrooms: Arc::new(ClassroomStore::new(db.clone())),
            borrows: Arc::new(BorrowStore::new(db)),
        }
    }

    /// Assemble from arbitrary repositories (e.g. mocks).
    pub fn with_repositories(
        users: Arc<dyn UserRepository>,
        departments: Arc<dyn DepartmentRepository>,
        classrooms: Arc<dyn ClassroomRepository>,
        borrows: Arc<dyn BorrowRepository>,
    ) -> Self {
        Self {
            users,
            departments,
            classrooms,
            borrows,
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn departments(&self) -> Arc<dyn DepartmentRepository> {
        self.departments.clone()
    }

    fn classrooms(&self) -> Arc<dyn ClassroomRepository> {
        self.classrooms.clone()
    }

    fn borrows(&self) -> Arc<dyn BorrowRepository> {
        self.borrows.clone()
    }
}
