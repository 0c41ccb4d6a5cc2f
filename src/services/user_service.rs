//! User service - Handles user-related business logic.
//!
//! Orchestrates account creation, lookups with optional relations, partial
//! updates and deletion via Unit of Work. Password changes live in the
//! credential service.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    CredentialManager, DeleteOutcome, NewUser, UserKey, UserProfile, UserQueryOptions,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::validation::{DeleteUser, InsertUser, UpdateUser};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create an account, hashing the password first
    async fn insert_user(&self, request: InsertUser) -> AppResult<UserProfile>;

    /// Look a user up by unique key; `None` when absent
    async fn find_user(
        &self,
        key: UserKey,
        options: UserQueryOptions,
    ) -> AppResult<Option<UserProfile>>;

    /// List every user
    async fn list_users(&self, options: UserQueryOptions) -> AppResult<Vec<UserProfile>>;

    /// Apply a partial update of the generic fields
    async fn update_user(&self, request: UpdateUser) -> AppResult<UserProfile>;

    /// Delete an account on behalf of `requester_id`
    async fn delete_user(&self, requester_id: &str, request: DeleteUser)
        -> AppResult<DeleteOutcome>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    credentials: CredentialManager,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>, credentials: CredentialManager) -> Self {
        Self { uow, credentials }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn insert_user(&self, request: InsertUser) -> AppResult<UserProfile> {
        let password = self.credentials.hash(&request.password).await?;

        let user = self
            .uow
            .users()
            .create(NewUser {
                department_id: request.department_id,
                username: request.username,
                email: request.email,
                password,
                job: request.job,
                extension: request.extension,
                role: request.role,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    async fn find_user(
        &self,
        key: UserKey,
        options: UserQueryOptions,
    ) -> AppResult<Option<UserProfile>> {
        self.uow.users().find_profile(key, options).await
    }

    async fn list_users(&self, options: UserQueryOptions) -> AppResult<Vec<UserProfile>> {
        self.uow.users().list_profiles(options).await
    }

    async fn update_user(&self, request: UpdateUser) -> AppResult<UserProfile> {
        let (id, changes) = request.into_parts();
        self.uow.users().update(&id, changes).await?.ok_or_not_found()
    }

    async fn delete_user(
        &self,
        requester_id: &str,
        request: DeleteUser,
    ) -> AppResult<DeleteOutcome> {
        let deleted = self.uow.users().delete(&request.user_id).await?;
        if !deleted {
            return Err(AppError::NotFound);
        }

        tracing::info!(requester_id, user_id = %request.user_id, "User deleted");
        Ok(DeleteOutcome::for_requester(requester_id, &request.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordSettings;
    use crate::domain::UserRole;
    use crate::infra::{
        MockBorrowRepository, MockClassroomRepository, MockDepartmentRepository,
        MockUserRepository, Persistence,
    };

    fn credentials() -> CredentialManager {
        CredentialManager::new(PasswordSettings::new("test-secret", 1, 1, 1024)).unwrap()
    }

    fn manager(users: MockUserRepository) -> UserManager<Persistence> {
        let uow = Persistence::with_repositories(
            Arc::new(users),
            Arc::new(MockDepartmentRepository::new()),
            Arc::new(MockClassroomRepository::new()),
            Arc::new(MockBorrowRepository::new()),
        );
        UserManager::new(Arc::new(uow), credentials())
    }

    fn alice() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            department_id: "d1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            job: "student".into(),
            extension: "1234".into(),
            role: UserRole::Student,
            department: None,
            borrows: None,
        }
    }

    fn insert_alice() -> InsertUser {
        InsertUser {
            department_id: "d1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "p1".into(),
            job: "student".into(),
            extension: "1234".into(),
            role: UserRole::Student,
        }
    }

    #[tokio::test]
    async fn test_insert_hashes_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .withf(|user| {
                user.username == "alice"
                    && user.password.as_str() != "p1"
                    && credentials().verify_blocking(&user.password, "p1")
            })
            .times(1)
            .returning(|_| Ok(alice()));

        let created = manager(users).insert_user(insert_alice()).await.unwrap();
        assert_eq!(created.username, "alice");
    }

    #[tokio::test]
    async fn test_insert_surfaces_taken_username() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .returning(|_| Err(AppError::bad_request("Username is already taken")));

        let err = manager(users).insert_user(insert_alice()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Username is already taken"));
    }

    #[tokio::test]
    async fn test_find_passes_key_and_options_through() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_profile()
            .withf(|key, options| {
                *key == UserKey::Username("alice".into()) && *options == UserQueryOptions::default()
            })
            .returning(|_, _| Ok(Some(alice())));

        let found = manager(users)
            .find_user(UserKey::Username("alice".into()), UserQueryOptions::default())
            .await
            .unwrap()
            .unwrap();

        let json = serde_json::to_value(&found).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("borrows").is_none());
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let mut users = MockUserRepository::new();
        users.expect_update().returning(|_, _| Ok(None));

        let request = UpdateUser {
            user_id: "ghost".into(),
            department_id: None,
            username: None,
            email: None,
            job: Some("teacher".into()),
            extension: None,
            role: None,
        };
        let err = manager(users).update_user(request).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_flags_self_delete() {
        let mut users = MockUserRepository::new();
        users.expect_delete().returning(|_| Ok(true));
        let service = manager(users);

        let own = service
            .delete_user("u1", DeleteUser { user_id: "u1".into() })
            .await
            .unwrap();
        assert!(own.logout_after_succeed);

        let other = service
            .delete_user("admin", DeleteUser { user_id: "u1".into() })
            .await
            .unwrap();
        assert!(!other.logout_after_succeed);
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let mut users = MockUserRepository::new();
        users.expect_delete().returning(|_| Ok(false));

        let err = manager(users)
            .delete_user("admin", DeleteUser { user_id: "ghost".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
