//! User repository implementation.

use async_trait::async_trait;
use std::sync::Arc;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{
    NewUser, Password, UserChanges, UserCredentials, UserKey, UserProfile, UserQueryOptions,
};
use crate::errors::{AppResult, DbResultExt};
use crate::infra::query::{self, UserRow};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const USERNAME_TAKEN: &str = "Username is already taken";
const UNKNOWN_DEPARTMENT: &str = "Department does not exist";

/// User repository trait for dependency injection.
///
/// Profile reads never carry the password; only
/// [`find_credentials`](UserRepository::find_credentials) loads the hash.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find one user by unique key with the requested relations
    async fn find_profile(
        &self,
        key: UserKey,
        options: UserQueryOptions,
    ) -> AppResult<Option<UserProfile>>;

    /// List every user with the requested relations
    async fn list_profiles(&self, options: UserQueryOptions) -> AppResult<Vec<UserProfile>>;

    /// Load identity and stored hash for credential checks
    async fn find_credentials(&self, key: UserKey) -> AppResult<Option<UserCredentials>>;

    /// Insert a user whose password is already hashed
    async fn create(&self, user: NewUser) -> AppResult<UserProfile>;

    /// Apply a partial update; `None` when the user does not exist
    async fn update(&self, id: &str, changes: UserChanges) -> AppResult<Option<UserProfile>>;

    /// Replace the stored hash; `false` when the user does not exist
    async fn update_password(&self, id: &str, password: Password) -> AppResult<bool>;

    /// Delete by id; `false` when the user does not exist
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_profile(
        &self,
        key: UserKey,
        options: UserQueryOptions,
    ) -> AppResult<Option<UserProfile>> {
        let Some(row) = query::user_profile_by_key(&key)
            .into_model::<UserRow>()
            .one(self.db.as_ref())
            .await?
        else {
            return Ok(None);
        };

        let today = Utc::now().date_naive();
        let mut loaded =
            query::load_user_relations(self.db.as_ref(), vec![UserProfile::from(row)], options, today)
                .await?;
        Ok(loaded.pop())
    }

    async fn list_profiles(&self, options: UserQueryOptions) -> AppResult<Vec<UserProfile>> {
        let profiles = query::user_profiles()
            .into_model::<UserRow>()
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(UserProfile::from)
            .collect();

        let today = Utc::now().date_naive();
        query::load_user_relations(self.db.as_ref(), profiles, options, today).await
    }

    async fn find_credentials(&self, key: UserKey) -> AppResult<Option<UserCredentials>> {
        let model = UserEntity::find()
            .filter(query::user_key_filter(&key))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(UserCredentials::from))
    }

    async fn create(&self, user: NewUser) -> AppResult<UserProfile> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            department_id: Set(user.department_id),
            username: Set(user.username),
            email: Set(user.email),
            password: Set(user.password.into_string()),
            job: Set(user.job),
            extension: Set(user.extension),
            role: Set(user.role.as_str().to_string()),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .or_constraint(USERNAME_TAKEN, UNKNOWN_DEPARTMENT)?;
        Ok(profile_of(model))
    }

    async fn update(&self, id: &str, changes: UserChanges) -> AppResult<Option<UserProfile>> {
        let Some(model) = UserEntity::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        if changes.is_empty() {
            return Ok(Some(profile_of(model)));
        }

        let mut active: ActiveModel = model.into();
        if let Some(department_id) = changes.department_id {
            active.department_id = Set(department_id);
        }
        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(job) = changes.job {
            active.job = Set(job);
        }
        if let Some(extension) = changes.extension {
            active.extension = Set(extension);
        }
        if let Some(role) = changes.role {
            active.role = Set(role.as_str().to_string());
        }

        let model = active
            .update(self.db.as_ref())
            .await
            .or_constraint(USERNAME_TAKEN, UNKNOWN_DEPARTMENT)?;
        Ok(Some(profile_of(model)))
    }

    async fn update_password(&self, id: &str, password: Password) -> AppResult<bool> {
        let Some(model) = UserEntity::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(false);
        };

        let mut active: ActiveModel = model.into();
        active.password = Set(password.into_string());
        active.update(self.db.as_ref()).await?;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = UserEntity::delete_many()
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }
}

/// Project a full row to the password-free profile.
fn profile_of(model: user::Model) -> UserProfile {
    UserProfile::from(UserRow {
        id: model.id,
        department_id: model.department_id,
        username: model.username,
        email: model.email,
        job: model.job,
        extension: model.extension,
        role: model.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::entities::department;
    use crate::infra::repositories::transaction_log;
    use crate::domain::UserRole;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction, Value};
    use std::collections::BTreeMap;

    fn model(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.into(),
            department_id: "d1".into(),
            username: username.into(),
            email: format!("{}@example.com", username),
            password: "$argon2id$stored".into(),
            job: "student".into(),
            extension: "1234".into(),
            role: "STUDENT".into(),
        }
    }

    #[tokio::test]
    async fn test_find_profile_without_relations_runs_one_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("u1", "alice")]])
            .into_connection();
        let store = UserStore::new(Arc::new(db));

        let profile = store
            .find_profile(UserKey::Username("alice".into()), UserQueryOptions::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(profile.username, "alice");
        assert_eq!(profile.role, UserRole::Student);
        assert!(profile.borrows.is_none());
        assert!(profile.department.is_none());

        let log = transaction_log(store.db);
        assert_eq!(log.len(), 1);
        let statement = format!("{:?}", log[0]);
        assert!(!statement.contains("password"));
    }

    fn statement_sql(transaction: &Transaction) -> &str {
        &transaction.statements()[0].sql
    }

    #[tokio::test]
    async fn test_find_profile_with_every_relation_batches_three_queries() {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let borrow_row = BTreeMap::from([
            ("id", Value::from("b1")),
            ("user_id", Value::from("u1")),
            ("classroom_id", Value::from("c1")),
            ("start_time", Value::from(start)),
            ("end_time", Value::from(start + chrono::Duration::hours(2))),
            ("from_slot", Value::from(1)),
            ("to_slot", Value::from(2)),
            ("classroom_name", Value::from(Some("A-101".to_string()))),
        ]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("u1", "alice")]])
            .append_query_results([vec![department::Model {
                id: "d1".into(),
                name: "Physics".into(),
                description: "Physics department".into(),
                location: "Building B".into(),
            }]])
            .append_query_results([vec![borrow_row]])
            .into_connection();
        let store = UserStore::new(Arc::new(db));
        let options = UserQueryOptions {
            include_department: true,
            include_borrows: true,
            borrows_today: true,
            include_classroom_name: true,
        };

        let profile = store
            .find_profile(UserKey::Id("u1".into()), options)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(profile.department.as_ref().unwrap().name, "Physics");
        let borrows = profile.borrows.as_ref().unwrap();
        assert_eq!(borrows.len(), 1);
        assert_eq!(borrows[0].borrow.id, "b1");
        assert_eq!(borrows[0].classroom.as_ref().unwrap().name, "A-101");

        let log = transaction_log(store.db);
        assert_eq!(log.len(), 3);
        for transaction in &log {
            assert!(!statement_sql(transaction).contains("password"));
        }
        assert!(statement_sql(&log[1]).contains(r#"FROM "departments""#));
        let borrows_sql = statement_sql(&log[2]);
        assert!(
            borrows_sql.contains(
                r#""borrowings"."start_time" >= $2 AND "borrowings"."start_time" < $3"#
            ),
            "{}",
            borrows_sql
        );
        assert!(borrows_sql.contains(r#""classrooms"."name" AS "classroom_name""#));
    }

    #[tokio::test]
    async fn test_today_without_borrows_loads_nothing_extra() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("u1", "alice")]])
            .into_connection();
        let store = UserStore::new(Arc::new(db));
        let options = UserQueryOptions {
            include_borrows: false,
            borrows_today: true,
            ..UserQueryOptions::default()
        };

        let profile = store
            .find_profile(UserKey::Id("u1".into()), options)
            .await
            .unwrap()
            .unwrap();

        assert!(profile.borrows.is_none());
        assert_eq!(transaction_log(store.db).len(), 1);
    }

    #[tokio::test]
    async fn test_find_profile_missing_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let store = UserStore::new(Arc::new(db));

        let profile = store
            .find_profile(UserKey::Id("nope".into()), UserQueryOptions::with_borrows())
            .await
            .unwrap();

        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let store = UserStore::new(Arc::new(db));

        assert!(!store.delete("nope").await.unwrap());

        let log = transaction_log(store.db);
        assert_eq!(
            log,
            vec![Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"DELETE FROM "users" WHERE "users"."id" = $1"#,
                ["nope".into()]
            )]
        );
    }
}
