//! Classroom entity.

use serde::Serialize;
use utoipa::ToSchema;

use super::borrow::Borrow;

/// Classroom with its borrows attached when requested.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Classroom {
    pub id: String,
    pub name: String,
    pub place: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrows: Option<Vec<Borrow>>,
}

#[derive(Debug, Clone)]
pub struct NewClassroom {
    pub name: String,
    pub place: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassroomChanges {
    pub name: Option<String>,
    pub place: Option<String>,
    pub description: Option<String>,
}
