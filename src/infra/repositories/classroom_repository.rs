//! Classroom repository implementation.

use async_trait::async_trait;
use std::sync::Arc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::entities::classroom::{self, ActiveModel, Entity as ClassroomEntity};
use crate::domain::{Borrow, Classroom, ClassroomChanges, NewClassroom};
use crate::errors::{AppResult, DbResultExt};
use crate::infra::query;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ClassroomRepository: Send + Sync {
    /// Find a classroom, with its borrows when `include_borrows` is set
    async fn find_by_id(&self, id: &str, include_borrows: bool) -> AppResult<Option<Classroom>>;

    /// List classrooms, with their borrows when `include_borrows` is set
    async fn list(&self, include_borrows: bool) -> AppResult<Vec<Classroom>>;

    async fn create(&self, classroom: NewClassroom) -> AppResult<Classroom>;

    /// `None` when the classroom does not exist
    async fn update(&self, id: &str, changes: ClassroomChanges) -> AppResult<Option<Classroom>>;

    /// `false` when the classroom does not exist
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

pub struct ClassroomStore {
    db: Arc<DatabaseConnection>,
}

impl ClassroomStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn attach_borrows(&self, mut classrooms: Vec<Classroom>) -> AppResult<Vec<Classroom>> {
        if classrooms.is_empty() {
            return Ok(classrooms);
        }

        let ids = classrooms.iter().map(|c| c.id.clone()).collect();
        let borrows: Vec<Borrow> = query::borrows_of_classrooms(ids, None)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Borrow::from)
            .collect();

        for classroom in &mut classrooms {
            classroom.borrows = Some(
                borrows
                    .iter()
                    .filter(|b| b.classroom_id == classroom.id)
                    .cloned()
                    .collect(),
            );
        }
        Ok(classrooms)
    }
}

#[async_trait]
impl ClassroomRepository for ClassroomStore {
    async fn find_by_id(&self, id: &str, include_borrows: bool) -> AppResult<Option<Classroom>> {
        let Some(model) = ClassroomEntity::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        let classroom = Classroom::from(model);
        if !include_borrows {
            return Ok(Some(classroom));
        }
        Ok(self.attach_borrows(vec![classroom]).await?.pop())
    }

    async fn list(&self, include_borrows: bool) -> AppResult<Vec<Classroom>> {
        let classrooms: Vec<Classroom> = ClassroomEntity::find()
            .order_by_asc(classroom::Column::Name)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Classroom::from)
            .collect();

        if include_borrows {
            self.attach_borrows(classrooms).await
        } else {
            Ok(classrooms)
        }
    }

    async fn create(&self, classroom: NewClassroom) -> AppResult<Classroom> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(classroom.name),
            place: Set(classroom.place),
            description: Set(classroom.description),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .or_bad_request("Classroom could not be created")?;
        Ok(Classroom::from(model))
    }

    async fn update(&self, id: &str, changes: ClassroomChanges) -> AppResult<Option<Classroom>> {
        let Some(model) = ClassroomEntity::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        if changes == ClassroomChanges::default() {
            return Ok(Some(Classroom::from(model)));
        }

        let mut active: ActiveModel = model.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(place) = changes.place {
            active.place = Set(place);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }

        let model = active.update(self.db.as_ref()).await?;
        Ok(Some(Classroom::from(model)))
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = ClassroomEntity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::entities::borrowing;
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn room(id: &str, name: &str) -> classroom::Model {
        classroom::Model {
            id: id.into(),
            name: name.into(),
            place: "Building B".into(),
            description: "Lecture hall".into(),
        }
    }

    fn booking(id: &str, classroom_id: &str) -> borrowing::Model {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        borrowing::Model {
            id: id.into(),
            user_id: "u1".into(),
            classroom_id: classroom_id.into(),
            start_time: start,
            end_time: start,
            from_slot: 0,
            to_slot: 1,
        }
    }

    #[tokio::test]
    async fn test_list_attaches_borrows_per_classroom() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room("c1", "A101"), room("c2", "B201")]])
            .append_query_results([vec![booking("b1", "c2")]])
            .into_connection();
        let store = ClassroomStore::new(Arc::new(db));

        let classrooms = store.list(true).await.unwrap();

        assert_eq!(classrooms[0].borrows.as_deref(), Some(&[][..]));
        let borrows = classrooms[1].borrows.as_ref().unwrap();
        assert_eq!(borrows.len(), 1);
        assert_eq!(borrows[0].id, "b1");
    }

    #[tokio::test]
    async fn test_find_without_borrows_leaves_field_unset() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room("c1", "A101")]])
            .into_connection();
        let store = ClassroomStore::new(Arc::new(db));

        let classroom = store.find_by_id("c1", false).await.unwrap().unwrap();
        assert!(classroom.borrows.is_none());
    }
}
