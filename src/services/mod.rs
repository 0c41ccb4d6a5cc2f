//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and reach repositories through the Unit of Work.

mod auth_service;
mod borrow_service;
mod classroom_service;
pub mod container;
mod credential_service;
mod department_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use borrow_service::{BorrowManager, BorrowService};
pub use classroom_service::{ClassroomManager, ClassroomService};
pub use credential_service::{CredentialService, PasswordManager};
pub use department_service::{DepartmentManager, DepartmentService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
