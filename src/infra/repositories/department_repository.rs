//! Department repository implementation.

use async_trait::async_trait;
use std::sync::Arc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::entities::department::{self, ActiveModel, Entity as DepartmentEntity};
use crate::domain::{Department, DepartmentChanges, NewDepartment};
use crate::errors::{AppResult, DbResultExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Department>>;

    async fn list(&self) -> AppResult<Vec<Department>>;

    async fn create(&self, department: NewDepartment) -> AppResult<Department>;

    /// `None` when the department does not exist
    async fn update(&self, id: &str, changes: DepartmentChanges) -> AppResult<Option<Department>>;

    /// `false` when the department does not exist
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

pub struct DepartmentStore {
    db: Arc<DatabaseConnection>,
}

impl DepartmentStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DepartmentRepository for DepartmentStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Department>> {
        let model = DepartmentEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Department::from))
    }

    async fn list(&self) -> AppResult<Vec<Department>> {
        let models = DepartmentEntity::find()
            .order_by_asc(department::Column::Name)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Department::from).collect())
    }

    async fn create(&self, department: NewDepartment) -> AppResult<Department> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(department.name),
            description: Set(department.description),
            location: Set(department.location),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .or_bad_request("Department could not be created")?;
        Ok(Department::from(model))
    }

    async fn update(&self, id: &str, changes: DepartmentChanges) -> AppResult<Option<Department>> {
        let Some(model) = DepartmentEntity::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        if changes == DepartmentChanges::default() {
            return Ok(Some(Department::from(model)));
        }

        let mut active: ActiveModel = model.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(location) = changes.location {
            active.location = Set(location);
        }

        let model = active.update(self.db.as_ref()).await?;
        Ok(Some(Department::from(model)))
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = DepartmentEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .or_bad_request("Department still has users")?;
        Ok(result.rows_affected > 0)
    }
}
