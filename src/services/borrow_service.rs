//! Borrow service - Classroom reservations.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Borrow, NewBorrow};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::validation::{DeleteBorrow, InsertBorrow};

#[async_trait]
pub trait BorrowService: Send + Sync {
    async fn insert_borrow(&self, request: InsertBorrow) -> AppResult<Borrow>;

    async fn get_borrow(&self, id: &str) -> AppResult<Option<Borrow>>;

    /// All borrows, or those of one user; `today` keeps only borrows
    /// starting on the current UTC date
    async fn list_borrows(&self, user_id: Option<String>, today: bool) -> AppResult<Vec<Borrow>>;

    /// Delete a borrow owned by the request's user
    async fn delete_borrow(&self, request: DeleteBorrow) -> AppResult<()>;
}

pub struct BorrowManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BorrowManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> BorrowService for BorrowManager<U> {
    async fn insert_borrow(&self, request: InsertBorrow) -> AppResult<Borrow> {
        let borrow = self
            .uow
            .borrows()
            .create(NewBorrow {
                user_id: request.user_id,
                classroom_id: request.classroom_id,
                start_time: request.start_time,
                end_time: request.end_time,
                from: request.from,
                to: request.to,
            })
            .await?;

        tracing::info!(
            borrow_id = %borrow.id,
            classroom_id = %borrow.classroom_id,
            from = borrow.from,
            to = borrow.to,
            "Classroom borrowed"
        );
        Ok(borrow)
    }

    async fn get_borrow(&self, id: &str) -> AppResult<Option<Borrow>> {
        self.uow.borrows().find_by_id(id).await
    }

    async fn list_borrows(&self, user_id: Option<String>, today: bool) -> AppResult<Vec<Borrow>> {
        self.uow.borrows().list(user_id, today).await
    }

    async fn delete_borrow(&self, request: DeleteBorrow) -> AppResult<()> {
        let deleted = self
            .uow
            .borrows()
            .delete(&request.borrow_id, &request.user_id)
            .await?;
        if !deleted {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        MockBorrowRepository, MockClassroomRepository, MockDepartmentRepository,
        MockUserRepository, Persistence,
    };
    use chrono::{TimeZone, Utc};

    fn manager(borrows: MockBorrowRepository) -> BorrowManager<Persistence> {
        BorrowManager::new(Arc::new(Persistence::with_repositories(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockDepartmentRepository::new()),
            Arc::new(MockClassroomRepository::new()),
            Arc::new(borrows),
        )))
    }

    #[tokio::test]
    async fn test_insert_keeps_slot_range_as_given() {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        let mut borrows = MockBorrowRepository::new();
        borrows
            .expect_create()
            .withf(|b| b.from == 5 && b.to == 2)
            .returning(|b| {
                Ok(Borrow {
                    id: "b1".into(),
                    user_id: b.user_id,
                    classroom_id: b.classroom_id,
                    start_time: b.start_time,
                    end_time: b.end_time,
                    from: b.from,
                    to: b.to,
                })
            });

        let borrow = manager(borrows)
            .insert_borrow(InsertBorrow {
                user_id: "u1".into(),
                start_time: start,
                end_time: start,
                from: 5,
                to: 2,
                classroom_id: "c1".into(),
            })
            .await
            .unwrap();
        assert_eq!((borrow.from, borrow.to), (5, 2));
    }

    #[tokio::test]
    async fn test_delete_of_foreign_borrow_is_not_found() {
        let mut borrows = MockBorrowRepository::new();
        borrows
            .expect_delete()
            .withf(|id, user_id| id == "b1" && user_id == "u2")
            .returning(|_, _| Ok(false));

        let err = manager(borrows)
            .delete_borrow(DeleteBorrow {
                user_id: "u2".into(),
                borrow_id: "b1".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
