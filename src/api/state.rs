//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{
    AuthService, BorrowService, ClassroomService, CredentialService, DepartmentService, Services,
    UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Login and token verification
    pub auth_service: Arc<dyn AuthService>,
    /// Password changes
    pub credential_service: Arc<dyn CredentialService>,
    pub user_service: Arc<dyn UserService>,
    pub classroom_service: Arc<dyn ClassroomService>,
    pub borrow_service: Arc<dyn BorrowService>,
    pub department_service: Arc<dyn DepartmentService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> AppResult<Self> {
        let services = Services::from_connection(database.get_connection(), config)?;
        Ok(Self::from_services(services, database))
    }

    /// Create application state from an already assembled container.
    pub fn from_services(services: Services, database: Arc<Database>) -> Self {
        Self {
            auth_service: services.auth,
            credential_service: services.credentials,
            user_service: services.users,
            classroom_service: services.classrooms,
            borrow_service: services.borrows,
            department_service: services.departments,
            database,
        }
    }
}
