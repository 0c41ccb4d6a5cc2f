//! Read options for relation loading.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

/// Unique key a single user can be looked up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKey {
    Id(String),
    Username(String),
}

/// Which relations to load alongside a user.
///
/// `borrows_today` and `include_classroom_name` refine the borrow list and
/// have no effect unless `include_borrows` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct UserQueryOptions {
    /// Load the user's department
    #[serde(rename = "department")]
    pub include_department: bool,
    /// Load the user's borrow history
    #[serde(rename = "borrows")]
    pub include_borrows: bool,
    /// Only borrows starting today
    #[serde(rename = "today")]
    pub borrows_today: bool,
    /// Attach each borrow's classroom name
    #[serde(rename = "classroom")]
    pub include_classroom_name: bool,
}

impl UserQueryOptions {
    /// Borrows with their classroom names, as shown on a user's own page.
    pub fn with_borrows() -> Self {
        Self {
            include_borrows: true,
            include_classroom_name: true,
            ..Self::default()
        }
    }

    /// Whether the today filter actually applies.
    pub fn filters_today(&self) -> bool {
        self.include_borrows && self.borrows_today
    }

    /// Whether classroom names are actually joined in.
    pub fn joins_classroom(&self) -> bool {
        self.include_borrows && self.include_classroom_name
    }
}

/// Half-open UTC range `[day 00:00, next day 00:00)` covering a calendar date.
pub fn day_range(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}
