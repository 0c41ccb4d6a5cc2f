//! Classroom service.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Classroom, NewClassroom};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::validation::{DeleteClassroom, InsertClassroom, UpdateClassroom};

#[async_trait]
pub trait ClassroomService: Send + Sync {
    async fn insert_classroom(&self, request: InsertClassroom) -> AppResult<Classroom>;

    /// `None` when absent; borrows attached when `include_borrows` is set
    async fn get_classroom(&self, id: &str, include_borrows: bool)
        -> AppResult<Option<Classroom>>;

    async fn list_classrooms(&self, include_borrows: bool) -> AppResult<Vec<Classroom>>;

    async fn update_classroom(&self, request: UpdateClassroom) -> AppResult<Classroom>;

    async fn delete_classroom(&self, request: DeleteClassroom) -> AppResult<()>;
}

pub struct ClassroomManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ClassroomManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ClassroomService for ClassroomManager<U> {
    async fn insert_classroom(&self, request: InsertClassroom) -> AppResult<Classroom> {
        let classroom = self
            .uow
            .classrooms()
            .create(NewClassroom {
                name: request.name,
                place: request.place,
                description: request.description,
            })
            .await?;

        tracing::info!(classroom_id = %classroom.id, "Classroom created");
        Ok(classroom)
    }

    async fn get_classroom(
        &self,
        id: &str,
        include_borrows: bool,
    ) -> AppResult<Option<Classroom>> {
        self.uow.classrooms().find_by_id(id, include_borrows).await
    }

    async fn list_classrooms(&self, include_borrows: bool) -> AppResult<Vec<Classroom>> {
        self.uow.classrooms().list(include_borrows).await
    }

    async fn update_classroom(&self, request: UpdateClassroom) -> AppResult<Classroom> {
        let (id, changes) = request.into_parts();
        self.uow
            .classrooms()
            .update(&id, changes)
            .await?
            .ok_or_not_found()
    }

    async fn delete_classroom(&self, request: DeleteClassroom) -> AppResult<()> {
        if !self.uow.classrooms().delete(&request.classroom_id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(classroom_id = %request.classroom_id, "Classroom deleted");
        Ok(())
    }
}
