//! Borrow repository implementation.

use async_trait::async_trait;
use std::sync::Arc;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::borrowing::{self, ActiveModel, Entity as BorrowEntity};
use crate::domain::{Borrow, NewBorrow};
use crate::errors::{AppResult, DbResultExt};
use crate::infra::query;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BorrowRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Borrow>>;

    /// Borrows of one user or of everyone, optionally only those starting today
    async fn list(&self, user_id: Option<String>, today: bool) -> AppResult<Vec<Borrow>>;

    async fn create(&self, borrow: NewBorrow) -> AppResult<Borrow>;

    /// Delete a borrow owned by `user_id`; `false` when no such borrow exists
    async fn delete(&self, id: &str, user_id: &str) -> AppResult<bool>;
}

pub struct BorrowStore {
    db: Arc<DatabaseConnection>,
}

impl BorrowStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BorrowRepository for BorrowStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Borrow>> {
        let model = BorrowEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Borrow::from))
    }

    async fn list(&self, user_id: Option<String>, today: bool) -> AppResult<Vec<Borrow>> {
        let day = today.then(|| Utc::now().date_naive());
        let select = match user_id {
            Some(user_id) => query::borrows_of_users(vec![user_id], day),
            None => query::all_borrows(day),
        };

        let models = select.all(self.db.as_ref()).await?;
        Ok(models.into_iter().map(Borrow::from).collect())
    }

    async fn create(&self, borrow: NewBorrow) -> AppResult<Borrow> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(borrow.user_id),
            classroom_id: Set(borrow.classroom_id),
            start_time: Set(borrow.start_time),
            end_time: Set(borrow.end_time),
            from_slot: Set(borrow.from),
            to_slot: Set(borrow.to),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .or_bad_request("User or classroom does not exist")?;
        Ok(Borrow::from(model))
    }

    async fn delete(&self, id: &str, user_id: &str) -> AppResult<bool> {
        let result = BorrowEntity::delete_many()
            .filter(borrowing::Column::Id.eq(id))
            .filter(borrowing::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::transaction_log;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    #[tokio::test]
    async fn test_delete_is_scoped_to_owner() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let store = BorrowStore::new(Arc::new(db));

        assert!(store.delete("b1", "u1").await.unwrap());

        assert_eq!(
            transaction_log(store.db),
            vec![Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"DELETE FROM "borrowings" WHERE "borrowings"."id" = $1 AND "borrowings"."user_id" = $2"#,
                ["b1".into(), "u1".into()]
            )]
        );
    }
}
