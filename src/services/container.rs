//! Service Container - Centralized service access.
//!
//! Builds every service over one shared Unit of Work and hands them out as
//! trait objects, so handlers never see concrete implementations.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AuthService, Authenticator, BorrowManager, BorrowService, ClassroomManager, ClassroomService,
    CredentialService, DepartmentManager, DepartmentService, PasswordManager, UserManager,
    UserService,
};
use crate::config::Config;
use crate::domain::CredentialManager;
use crate::errors::AppResult;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get credential service
    fn credentials(&self) -> Arc<dyn CredentialService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get classroom service
    fn classrooms(&self) -> Arc<dyn ClassroomService>;

    /// Get borrow service
    fn borrows(&self) -> Arc<dyn BorrowService>;

    /// Get department service
    fn departments(&self) -> Arc<dyn DepartmentService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub credentials: Arc<dyn CredentialService>,
    pub users: Arc<dyn UserService>,
    pub classrooms: Arc<dyn ClassroomService>,
    pub borrows: Arc<dyn BorrowService>,
    pub departments: Arc<dyn DepartmentService>,
}

impl Services {
    /// Create service container from database connection and config.
    ///
    /// Fails when the password hashing parameters are rejected by Argon2.
    pub fn from_connection(db: Arc<DatabaseConnection>, config: Config) -> AppResult<Self> {
        let uow = Arc::new(Persistence::new(db));
        let hasher = CredentialManager::new(config.password.clone())?;

        let credentials: Arc<dyn CredentialService> =
            Arc::new(PasswordManager::new(uow.clone(), hasher.clone())?);
        let auth = Arc::new(Authenticator::new(credentials.clone(), config));

        Ok(Self {
            auth,
            credentials,
            users: Arc::new(UserManager::new(uow.clone(), hasher)),
            classrooms: Arc::new(ClassroomManager::new(uow.clone())),
            borrows: Arc::new(BorrowManager::new(uow.clone())),
            departments: Arc::new(DepartmentManager::new(uow)),
        })
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn credentials(&self) -> Arc<dyn CredentialService> {
        self.credentials.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn classrooms(&self) -> Arc<dyn ClassroomService> {
        self.classrooms.clone()
    }

    fn borrows(&self) -> Arc<dyn BorrowService> {
        self.borrows.clone()
    }

    fn departments(&self) -> Arc<dyn DepartmentService> {
        self.departments.clone()
    }
}
