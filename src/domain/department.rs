//! Department entity.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub name: String,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}
