//! Request shapes accepted by the API, one per operation, each with its schema.
//!
//! Insert shapes require every field, update shapes require only the
//! identifying key, delete shapes carry nothing but the key.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::ToSchema;

use super::schema::{FieldKind, FieldRule, Schema};
use crate::config::{MAX_SLOT_INDEX, MIN_SLOT_INDEX, VALID_ROLES};
use crate::domain::{ClassroomChanges, DepartmentChanges, UserChanges, UserRole};

/// A request body type with a validation schema.
pub trait RequestSchema: DeserializeOwned {
    fn schema() -> &'static Schema;
}

const TEXT: FieldKind = FieldKind::Text;
const ROLE: FieldKind = FieldKind::OneOf(VALID_ROLES);
const SLOT: FieldKind = FieldKind::Integer {
    min: MIN_SLOT_INDEX,
    max: MAX_SLOT_INDEX,
};
const DATE: FieldKind = FieldKind::Date;

macro_rules! request_schema {
    ($ty:ty, $static_name:ident, [$($rule:expr),* $(,)?]) => {
        static $static_name: Lazy<Schema> = Lazy::new(|| Schema::new(vec![$($rule),*]));

        impl RequestSchema for $ty {
            fn schema() -> &'static Schema {
                &$static_name
            }
        }
    };
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertUser {
    pub department_id: String,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub password: String,
    pub job: String,
    pub extension: String,
    pub role: UserRole,
}

request_schema!(InsertUser, INSERT_USER, [
    FieldRule::required("departmentId", TEXT),
    FieldRule::required("username", TEXT),
    FieldRule::required("email", TEXT),
    FieldRule::required("password", TEXT),
    FieldRule::required("job", TEXT),
    FieldRule::required("extension", TEXT),
    FieldRule::required("role", ROLE),
]);

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub user_id: String,
    pub department_id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub job: Option<String>,
    pub extension: Option<String>,
    pub role: Option<UserRole>,
}

request_schema!(UpdateUser, UPDATE_USER, [
    FieldRule::required("userId", TEXT),
    FieldRule::optional("departmentId", TEXT),
    FieldRule::optional("username", TEXT),
    FieldRule::optional("email", TEXT),
    FieldRule::optional("job", TEXT),
    FieldRule::optional("extension", TEXT),
    FieldRule::optional("role", ROLE),
]);

impl UpdateUser {
    /// Split into the target id and the field changes.
    pub fn into_parts(self) -> (String, UserChanges) {
        let changes = UserChanges {
            department_id: self.department_id,
            username: self.username,
            email: self.email,
            job: self.job,
            extension: self.extension,
            role: self.role,
        };
        (self.user_id, changes)
    }
}

/// Password change. `oldPassword` is the target's own password for a
/// self-service change, and the administrator's password otherwise.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    pub user_id: String,
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: Option<String>,
}

request_schema!(ChangePassword, CHANGE_PASSWORD, [
    FieldRule::required("userId", TEXT),
    FieldRule::required("oldPassword", TEXT),
    FieldRule::required("newPassword", TEXT),
    FieldRule::optional("confirmPassword", TEXT),
]);

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUser {
    pub user_id: String,
}

request_schema!(DeleteUser, DELETE_USER, [FieldRule::required("userId", TEXT)]);

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    pub password: String,
}

request_schema!(LoginRequest, LOGIN, [
    FieldRule::required("username", TEXT),
    FieldRule::required("password", TEXT),
]);

// =============================================================================
// Classrooms
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InsertClassroom {
    #[schema(example = "B201")]
    pub name: String,
    pub place: String,
    pub description: String,
}

request_schema!(InsertClassroom, INSERT_CLASSROOM, [
    FieldRule::required("name", TEXT),
    FieldRule::required("place", TEXT),
    FieldRule::required("description", TEXT),
]);

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassroom {
    pub classroom_id: String,
    pub name: Option<String>,
    pub place: Option<String>,
    pub description: Option<String>,
}

request_schema!(UpdateClassroom, UPDATE_CLASSROOM, [
    FieldRule::required("classroomId", TEXT),
    FieldRule::optional("name", TEXT),
    FieldRule::optional("place", TEXT),
    FieldRule::optional("description", TEXT),
]);

impl UpdateClassroom {
    pub fn into_parts(self) -> (String, ClassroomChanges) {
        let changes = ClassroomChanges {
            name: self.name,
            place: self.place,
            description: self.description,
        };
        (self.classroom_id, changes)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteClassroom {
    pub classroom_id: String,
}

request_schema!(DeleteClassroom, DELETE_CLASSROOM, [
    FieldRule::required("classroomId", TEXT),
]);

// =============================================================================
// Borrows
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertBorrow {
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// First slot index (0-8)
    pub from: i32,
    /// Last slot index (0-8)
    pub to: i32,
    pub classroom_id: String,
}

request_schema!(InsertBorrow, INSERT_BORROW, [
    FieldRule::required("userId", TEXT),
    FieldRule::required("startTime", DATE),
    FieldRule::required("endTime", DATE),
    FieldRule::required("from", SLOT),
    FieldRule::required("to", SLOT),
    FieldRule::required("classroomId", TEXT),
]);

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBorrow {
    pub user_id: String,
    pub borrow_id: String,
}

request_schema!(DeleteBorrow, DELETE_BORROW, [
    FieldRule::required("userId", TEXT),
    FieldRule::required("borrowId", TEXT),
]);

// =============================================================================
// Departments
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InsertDepartment {
    #[schema(example = "Computer Science")]
    pub name: String,
    pub description: String,
    pub location: String,
}

request_schema!(InsertDepartment, INSERT_DEPARTMENT, [
    FieldRule::required("name", TEXT),
    FieldRule::required("description", TEXT),
    FieldRule::required("location", TEXT),
]);

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartment {
    pub department_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

request_schema!(UpdateDepartment, UPDATE_DEPARTMENT, [
    FieldRule::required("departmentId", TEXT),
    FieldRule::optional("name", TEXT),
    FieldRule::optional("description", TEXT),
    FieldRule::optional("location", TEXT),
]);

impl UpdateDepartment {
    pub fn into_parts(self) -> (String, DepartmentChanges) {
        let changes = DepartmentChanges {
            name: self.name,
            description: self.description,
            location: self.location,
        };
        (self.department_id, changes)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDepartment {
    pub department_id: String,
}

request_schema!(DeleteDepartment, DELETE_DEPARTMENT, [
    FieldRule::required("departmentId", TEXT),
]);
