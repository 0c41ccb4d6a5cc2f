//! HTTP request handlers.

pub mod auth_handler;
pub mod borrow_handler;
pub mod classroom_handler;
pub mod department_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use borrow_handler::borrow_routes;
pub use classroom_handler::classroom_routes;
pub use department_handler::department_routes;
pub use user_handler::user_routes;
