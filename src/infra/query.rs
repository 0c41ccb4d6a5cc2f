//! Conditional read queries with optional relation loading.
//!
//! Builders return plain SeaORM [`Select`]s so the composed SQL can be
//! inspected without a database. Relations are loaded the way SeaORM's
//! loader does it: the root rows first, then one batched query per
//! requested relation keyed by the root ids.

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};

use super::repositories::entities::{borrowing, classroom, department, user};
use crate::domain::{
    day_range, Borrow, BorrowView, ClassroomName, Department, UserKey, UserProfile,
    UserQueryOptions, UserRole,
};
use crate::errors::AppResult;

/// Alias of the joined classroom name column.
const CLASSROOM_NAME: &str = "classroom_name";

/// User columns without the password.
#[derive(Debug, Clone, FromQueryResult)]
pub struct UserRow {
    pub id: String,
    pub department_id: String,
    pub username: String,
    pub email: String,
    pub job: String,
    pub extension: String,
    pub role: String,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            id: row.id,
            department_id: row.department_id,
            username: row.username,
            email: row.email,
            job: row.job,
            extension: row.extension,
            role: UserRole::from(row.role.as_str()),
            department: None,
            borrows: None,
        }
    }
}

/// Borrow row with its classroom's name joined in.
#[derive(Debug, Clone, FromQueryResult)]
pub struct BorrowWithClassroomRow {
    pub id: String,
    pub user_id: String,
    pub classroom_id: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub from_slot: i32,
    pub to_slot: i32,
    pub classroom_name: Option<String>,
}

impl From<BorrowWithClassroomRow> for BorrowView {
    fn from(row: BorrowWithClassroomRow) -> Self {
        BorrowView {
            borrow: Borrow {
                id: row.id,
                user_id: row.user_id,
                classroom_id: row.classroom_id,
                start_time: row.start_time,
                end_time: row.end_time,
                from: row.from_slot,
                to: row.to_slot,
            },
            classroom: row.classroom_name.map(|name| ClassroomName { name }),
        }
    }
}

/// Every user, projected without the password column.
pub fn user_profiles() -> Select<user::Entity> {
    user::Entity::find()
        .select_only()
        .columns([
            user::Column::Id,
            user::Column::DepartmentId,
            user::Column::Username,
            user::Column::Email,
            user::Column::Job,
            user::Column::Extension,
            user::Column::Role,
        ])
        .order_by_asc(user::Column::Username)
}

/// Predicate selecting a user by unique key.
pub fn user_key_filter(key: &UserKey) -> sea_orm::sea_query::SimpleExpr {
    match key {
        UserKey::Id(id) => user::Column::Id.eq(id.as_str()),
        UserKey::Username(username) => user::Column::Username.eq(username.as_str()),
    }
}

/// One user by key, projected without the password column.
pub fn user_profile_by_key(key: &UserKey) -> Select<user::Entity> {
    user_profiles().filter(user_key_filter(key))
}

/// Borrows owned by any of `user_ids`, optionally narrowed to those starting
/// on `day` (UTC).
pub fn borrows_of_users(user_ids: Vec<String>, day: Option<NaiveDate>) -> Select<borrowing::Entity> {
    let select = borrowing::Entity::find().filter(borrowing::Column::UserId.is_in(user_ids));
    on_day(select, day).order_by_asc(borrowing::Column::StartTime)
}

/// Borrows of any of `classroom_ids`, optionally narrowed to `day`.
pub fn borrows_of_classrooms(
    classroom_ids: Vec<String>,
    day: Option<NaiveDate>,
) -> Select<borrowing::Entity> {
    let select =
        borrowing::Entity::find().filter(borrowing::Column::ClassroomId.is_in(classroom_ids));
    on_day(select, day).order_by_asc(borrowing::Column::StartTime)
}

/// Every borrow, optionally narrowed to `day`.
pub fn all_borrows(day: Option<NaiveDate>) -> Select<borrowing::Entity> {
    on_day(borrowing::Entity::find(), day).order_by_asc(borrowing::Column::StartTime)
}

/// Join the classroom of each borrow and project its name only.
pub fn with_classroom_name(select: Select<borrowing::Entity>) -> Select<borrowing::Entity> {
    select
        .join(JoinType::LeftJoin, borrowing::Relation::Classroom.def())
        .column_as(classroom::Column::Name, CLASSROOM_NAME)
}

/// Departments by id.
pub fn departments_by_ids(ids: Vec<String>) -> Select<department::Entity> {
    department::Entity::find().filter(department::Column::Id.is_in(ids))
}

fn on_day(select: Select<borrowing::Entity>, day: Option<NaiveDate>) -> Select<borrowing::Entity> {
    match day {
        Some(day) => {
            let (start, end) = day_range(day);
            select
                .filter(borrowing::Column::StartTime.gte(start))
                .filter(borrowing::Column::StartTime.lt(end))
        }
        None => select,
    }
}

/// Attach the relations `options` asks for to already loaded profiles.
///
/// `today` is the calendar date the today filter resolves to.
pub async fn load_user_relations(
    db: &DatabaseConnection,
    mut profiles: Vec<UserProfile>,
    options: UserQueryOptions,
    today: NaiveDate,
) -> AppResult<Vec<UserProfile>> {
    if profiles.is_empty() {
        return Ok(profiles);
    }

    if options.include_department {
        let mut ids: Vec<String> = profiles.iter().map(|p| p.department_id.clone()).collect();
        ids.sort();
        ids.dedup();

        let departments: Vec<Department> = departments_by_ids(ids)
            .all(db)
            .await?
            .into_iter()
            .map(Department::from)
            .collect();

        for profile in &mut profiles {
            profile.department = departments
                .iter()
                .find(|d| d.id == profile.department_id)
                .cloned();
        }
    }

    if options.include_borrows {
        let ids = profiles.iter().map(|p| p.id.clone()).collect();
        let day = options.filters_today().then_some(today);
        let select = borrows_of_users(ids, day);

        let borrows: Vec<BorrowView> = if options.joins_classroom() {
            with_classroom_name(select)
                .into_model::<BorrowWithClassroomRow>()
                .all(db)
                .await?
                .into_iter()
                .map(BorrowView::from)
                .collect()
        } else {
            select
                .all(db)
                .await?
                .into_iter()
                .map(|model| BorrowView {
                    borrow: Borrow::from(model),
                    classroom: None,
                })
                .collect()
        };

        for profile in &mut profiles {
            profile.borrows = Some(
                borrows
                    .iter()
                    .filter(|b| b.borrow.user_id == profile.id)
                    .cloned()
                    .collect(),
            );
        }
    }

    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql<E: EntityTrait>(select: Select<E>) -> String {
        select.build(DbBackend::Postgres).to_string()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_user_projection_never_selects_password() {
        let by_id = sql(user_profile_by_key(&UserKey::Id("u1".into())));
        let by_name = sql(user_profile_by_key(&UserKey::Username("alice".into())));
        let listing = sql(user_profiles());

        for query in [&by_id, &by_name, &listing] {
            assert!(!query.contains("password"), "{}", query);
            assert!(query.contains(r#""users"."username""#));
        }
        assert!(by_id.contains(r#""users"."id" = 'u1'"#));
        assert!(by_name.contains(r#""users"."username" = 'alice'"#));
    }

    #[test]
    fn test_today_filter_is_half_open_day() {
        let query = sql(borrows_of_users(vec!["u1".into()], Some(day())));

        assert!(query.contains(r#""borrowings"."user_id" IN ('u1')"#));
        assert!(query.contains(r#""borrowings"."start_time" >= '2026-10-16 00:00:00"#));
        assert!(query.contains(r#""borrowings"."start_time" < '2026-10-17 00:00:00"#));
    }

    #[test]
    fn test_no_date_filter_without_today() {
        let query = sql(borrows_of_users(vec!["u1".into()], None));
        assert!(!query.contains("start_time\" >="));
        assert!(!query.contains("start_time\" <"));
    }

    #[test]
    fn test_classroom_join_projects_name_only() {
        let query = sql(with_classroom_name(borrows_of_users(vec!["u1".into()], None)));

        assert!(query.contains(r#"LEFT JOIN "classrooms""#));
        assert!(query.contains(r#""classrooms"."name" AS "classroom_name""#));
        assert!(!query.contains(r#""classrooms"."place""#));
        assert!(!query.contains(r#""classrooms"."description""#));
    }

    #[test]
    fn test_classroom_borrows_filter() {
        let query = sql(borrows_of_classrooms(vec!["c1".into(), "c2".into()], None));
        assert!(query.contains(r#""borrowings"."classroom_id" IN ('c1', 'c2')"#));
    }

    #[test]
    fn test_borrow_row_maps_classroom_name() {
        let start = day().and_hms_opt(8, 0, 0).unwrap().and_utc();
        let row = BorrowWithClassroomRow {
            id: "b1".into(),
            user_id: "u1".into(),
            classroom_id: "c1".into(),
            start_time: start,
            end_time: start,
            from_slot: 1,
            to_slot: 3,
            classroom_name: Some("B201".into()),
        };

        let view = BorrowView::from(row);
        assert_eq!(view.borrow.from, 1);
        assert_eq!(view.borrow.to, 3);
        assert_eq!(view.classroom.unwrap().name, "B201");
    }
}
