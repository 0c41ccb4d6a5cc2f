//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, borrow_handler, classroom_handler, department_handler, user_handler,
};
use crate::domain::{
    Borrow, BorrowView, Classroom, ClassroomName, DeleteOutcome, Department, UserProfile,
    UserRole,
};
use crate::services::TokenResponse;
use crate::types::MessageResponse;
use crate::validation::{
    ChangePassword, DeleteBorrow, DeleteClassroom, DeleteDepartment, DeleteUser, InsertBorrow,
    InsertClassroom, InsertDepartment, InsertUser, LoginRequest, UpdateClassroom,
    UpdateDepartment, UpdateUser,
};

/// OpenAPI documentation for the classroom booking API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Classroom Booking API",
        version = "0.1.0",
        description = "Classroom reservations by time slot, with users, departments and role-based access"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        user_handler::create_user,
        user_handler::list_users,
        user_handler::get_current_user,
        user_handler::get_user,
        user_handler::get_user_by_username,
        user_handler::update_user,
        user_handler::change_password,
        user_handler::delete_user,
        classroom_handler::create_classroom,
        classroom_handler::list_classrooms,
        classroom_handler::get_classroom,
        classroom_handler::update_classroom,
        classroom_handler::delete_classroom,
        borrow_handler::create_borrow,
        borrow_handler::list_borrows,
        borrow_handler::get_borrow,
        borrow_handler::delete_borrow,
        department_handler::create_department,
        department_handler::list_departments,
        department_handler::get_department,
        department_handler::update_department,
        department_handler::delete_department,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserProfile,
            DeleteOutcome,
            Department,
            Classroom,
            Borrow,
            BorrowView,
            ClassroomName,
            // Requests
            LoginRequest,
            InsertUser,
            UpdateUser,
            ChangePassword,
            DeleteUser,
            InsertClassroom,
            UpdateClassroom,
            DeleteClassroom,
            InsertBorrow,
            DeleteBorrow,
            InsertDepartment,
            UpdateDepartment,
            DeleteDepartment,
            // Responses
            TokenResponse,
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login"),
        (name = "Users", description = "Accounts and passwords"),
        (name = "Classrooms", description = "Classroom management"),
        (name = "Borrows", description = "Classroom reservations"),
        (name = "Departments", description = "Department management")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/auth/login",
            "/users",
            "/users/password",
            "/users/by-username/{username}",
            "/classrooms/{id}",
            "/borrows",
            "/departments",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
