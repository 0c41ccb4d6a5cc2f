//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::borrow::BorrowView;
use super::department::Department;
use super::password::Password;
use crate::config::{ROLE_ADMIN, ROLE_STUDENT, ROLE_TEACHER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Stored/serialized representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Teacher => ROLE_TEACHER,
            UserRole::Student => ROLE_STUDENT,
        }
    }

    /// Parse a stored role value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ROLE_ADMIN => Some(UserRole::Admin),
            ROLE_TEACHER => Some(UserRole::Teacher),
            ROLE_STUDENT => Some(UserRole::Student),
            _ => None,
        }
    }
}

/// Unknown stored values fall back to the least privileged role.
impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        UserRole::parse(s).unwrap_or(UserRole::Student)
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User read projection. Never carries the password.
///
/// `department` and `borrows` are only present when the caller asked for
/// them, and are omitted from the serialized form otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub department_id: String,
    pub username: String,
    pub email: String,
    pub job: String,
    pub extension: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrows: Option<Vec<BorrowView>>,
}

/// Identity plus stored hash, used only by credential flows.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub password: Password,
}

/// Data for a new user row, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub department_id: String,
    pub username: String,
    pub email: String,
    pub password: Password,
    pub job: String,
    pub extension: String,
    pub role: UserRole,
}

/// Partial update of the generic user fields. The password only changes
/// through the credential flows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub department_id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub job: Option<String>,
    pub extension: Option<String>,
    pub role: Option<UserRole>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        *self == UserChanges::default()
    }
}

/// Result of deleting an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    /// Set when the requester deleted their own account
    pub logout_after_succeed: bool,
    pub message: String,
}

impl DeleteOutcome {
    pub fn for_requester(requester_id: &str, deleted_id: &str) -> Self {
        if requester_id == deleted_id {
            Self {
                logout_after_succeed: true,
                message: "You have deleted your account, you have been logged out".to_string(),
            }
        } else {
            Self {
                logout_after_succeed: false,
                message: "Account deleted successfully".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::Teacher, UserRole::Student] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from("JANITOR"), UserRole::Student);
    }

    #[test]
    fn test_role_serializes_uppercase() {
        let json = serde_json::to_string(&UserRole::Student).unwrap();
        assert_eq!(json, "\"STUDENT\"");
    }

    #[test]
    fn test_delete_outcome_flags_self_delete() {
        assert!(DeleteOutcome::for_requester("u1", "u1").logout_after_succeed);
        assert!(!DeleteOutcome::for_requester("admin", "u1").logout_after_succeed);
    }

    #[test]
    fn test_profile_omits_unrequested_relations() {
        let profile = UserProfile {
            id: "u1".into(),
            department_id: "d1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            job: "student".into(),
            extension: "1234".into(),
            role: UserRole::Student,
            department: None,
            borrows: None,
        };

        let value = serde_json::to_value(&profile).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("borrows"));
        assert!(!object.contains_key("department"));
        assert_eq!(object["departmentId"], "d1");
    }

    #[test]
    fn test_empty_changes() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            job: Some("lecturer".into()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
