//! Department service.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Department, NewDepartment};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::validation::{DeleteDepartment, InsertDepartment, UpdateDepartment};

#[async_trait]
pub trait DepartmentService: Send + Sync {
    async fn insert_department(&self, request: InsertDepartment) -> AppResult<Department>;

    async fn get_department(&self, id: &str) -> AppResult<Option<Department>>;

    async fn list_departments(&self) -> AppResult<Vec<Department>>;

    async fn update_department(&self, request: UpdateDepartment) -> AppResult<Department>;

    async fn delete_department(&self, request: DeleteDepartment) -> AppResult<()>;
}

pub struct DepartmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DepartmentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> DepartmentService for DepartmentManager<U> {
    async fn insert_department(&self, request: InsertDepartment) -> AppResult<Department> {
        self.uow
            .departments()
            .create(NewDepartment {
                name: request.name,
                description: request.description,
                location: request.location,
            })
            .await
    }

    async fn get_department(&self, id: &str) -> AppResult<Option<Department>> {
        self.uow.departments().find_by_id(id).await
    }

    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        self.uow.departments().list().await
    }

    async fn update_department(&self, request: UpdateDepartment) -> AppResult<Department> {
        let (id, changes) = request.into_parts();
        self.uow
            .departments()
            .update(&id, changes)
            .await?
            .ok_or_not_found()
    }

    async fn delete_department(&self, request: DeleteDepartment) -> AppResult<()> {
        if !self.uow.departments().delete(&request.department_id).await? {
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

    fn manager(departments: MockDepartmentRepository) -> DepartmentManager<Persistence> {
        DepartmentManager::new(Arc::new(Persistence::with_repositories(
            Arc::new(MockUserRepository::new()),
            Arc::new(departments),
            Arc::new(MockClassroomRepository::new()),
            Arc::new(MockBorrowRepository::new()),
        )))
    }

    #[tokio::test]
    async fn test_delete_with_users_is_bad_request() {
        let mut departments = MockDepartmentRepository::new();
        departments
            .expect_delete()
            .returning(|_| Err(AppError::bad_request("Department still has users")));

        let err = manager(departments)
            .delete_department(DeleteDepartment {
                department_id: "d1".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_applies_changes() {
        let mut departments = MockDepartmentRepository::new();
        departments
            .expect_update()
            .withf(|id, changes| id == "d1" && changes.location.as_deref() == Some("East wing"))
            .returning(|id, changes| {
                Ok(Some(Department {
                    id: id.to_string(),
                    name: "Physics".into(),
                    description: "Physics department".into(),
                    location: changes.location.unwrap_or_default(),
                }))
            });

        let department = manager(departments)
            .update_department(UpdateDepartment {
                department_id: "d1".into(),
                name: None,
                description: None,
                location: Some("East wing".into()),
            })
            .await
            .unwrap();
        assert_eq!(department.location, "East wing");
    }
}
