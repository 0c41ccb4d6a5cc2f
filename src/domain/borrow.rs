//! Borrow (classroom reservation) entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A reservation of a classroom by a user for the slot range `from..=to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Borrow {
    pub id: String,
    pub user_id: String,
    pub classroom_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// First slot index (0-8)
    pub from: i32,
    /// Last slot index (0-8)
    pub to: i32,
}

/// Name-only projection of a borrow's classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ClassroomName {
    pub name: String,
}

/// Borrow as loaded under a user, optionally carrying its classroom name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BorrowView {
    #[serde(flatten)]
    pub borrow: Borrow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classroom: Option<ClassroomName>,
}

#[derive(Debug, Clone)]
pub struct NewBorrow {
    pub user_id: String,
    pub classroom_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub from: i32,
    pub to: i32,
}
