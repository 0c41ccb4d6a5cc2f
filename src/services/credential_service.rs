//! Credential service - Password changes and login verification.
//!
//! Two distinct change flows exist. A user changing their own password must
//! confirm the new one and prove the old one. An administrator resetting
//! someone else's password proves their own password instead, and the
//! confirmation and no-op checks do not apply.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{CredentialManager, Password, UserCredentials, UserKey};
use crate::errors::{AppError, AppResult, CredentialError, OptionExt};
use crate::infra::UnitOfWork;

/// Plain text hashed once at startup so unknown usernames cost a full verify.
const DUMMY_PASSWORD: &str = "dummy-password-for-timing";

#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Self-service change. Storage is untouched on any violation.
    async fn change_own_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
        confirm_password: Option<&str>,
    ) -> AppResult<()>;

    /// Administrator-assisted reset of another user's password.
    async fn change_other_user_password(
        &self,
        admin_id: &str,
        target_id: &str,
        admin_password: &str,
        new_password: &str,
    ) -> AppResult<()>;

    /// Verify a username and password pair for login.
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<UserCredentials>;
}

/// Concrete implementation of CredentialService using Unit of Work.
pub struct PasswordManager<U: UnitOfWork> {
    uow: Arc<U>,
    credentials: CredentialManager,
    dummy: Password,
}

impl<U: UnitOfWork> PasswordManager<U> {
    pub fn new(uow: Arc<U>, credentials: CredentialManager) -> AppResult<Self> {
        let dummy = credentials.hash_blocking(DUMMY_PASSWORD)?;
        Ok(Self {
            uow,
            credentials,
            dummy,
        })
    }

    async fn store(&self, user_id: &str, new_password: &str) -> AppResult<()> {
        let hashed = self.credentials.hash(new_password).await?;
        let updated = self.uow.users().update_password(user_id, hashed).await?;
        if !updated {
            return Err(AppError::NotFound);
        }
        tracing::info!(user_id, "Password updated");
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> CredentialService for PasswordManager<U> {
    async fn change_own_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
        confirm_password: Option<&str>,
    ) -> AppResult<()> {
        if confirm_password != Some(new_password) {
            return Err(CredentialError::ConfirmationMismatch.into());
        }

        let user = self
            .uow
            .users()
            .find_credentials(UserKey::Id(user_id.to_string()))
            .await?
            .ok_or_not_found()?;

        if !self.credentials.verify(&user.password, old_password).await {
            return Err(CredentialError::WrongOldPassword.into());
        }

        if old_password == new_password {
            return Err(CredentialError::Unchanged.into());
        }

        self.store(&user.id, new_password).await
    }

    async fn change_other_user_password(
        &self,
        admin_id: &str,
        target_id: &str,
        admin_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let admin = self
            .uow
            .users()
            .find_credentials(UserKey::Id(admin_id.to_string()))
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !admin.role.is_admin() {
            return Err(AppError::Forbidden);
        }

        if !self.credentials.verify(&admin.password, admin_password).await {
            return Err(CredentialError::WrongAdminPassword.into());
        }

        tracing::info!(admin_id, target_id, "Administrator password reset");
        self.store(target_id, new_password).await
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<UserCredentials> {
        let user = self
            .uow
            .users()
            .find_credentials(UserKey::Username(username.to_string()))
            .await?;

        // Verify against the dummy hash when the user is unknown so the
        // response time does not reveal which usernames exist.
        let stored = user.as_ref().map_or(&self.dummy, |u| &u.password);
        let valid = self.credentials.verify(stored, password).await;

        match user {
            Some(user) if valid => Ok(user),
            _ => Err(AppError::InvalidCredentials),
        }
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
    use mockall::predicate::eq;

    fn credentials() -> CredentialManager {
        CredentialManager::new(PasswordSettings::new("test-secret", 1, 1, 1024)).unwrap()
    }

    fn account(id: &str, role: UserRole, plain: &str) -> UserCredentials {
        UserCredentials {
            id: id.into(),
            username: format!("{}-name", id),
            role,
            password: credentials().hash_blocking(plain).unwrap(),
        }
    }

    fn manager(users: MockUserRepository) -> PasswordManager<Persistence> {
        let uow = Persistence::with_repositories(
            Arc::new(users),
            Arc::new(MockDepartmentRepository::new()),
            Arc::new(MockClassroomRepository::new()),
            Arc::new(MockBorrowRepository::new()),
        );
        PasswordManager::new(Arc::new(uow), credentials()).unwrap()
    }

    fn expect_lookup(users: &mut MockUserRepository, user: UserCredentials) {
        users
            .expect_find_credentials()
            .with(eq(UserKey::Id(user.id.clone())))
            .returning(move |_| Ok(Some(user.clone())));
    }

    #[tokio::test]
    async fn test_confirmation_mismatch_touches_nothing() {
        // No expectations: any repository call would panic
        let service = manager(MockUserRepository::new());

        let err = service
            .change_own_password("u1", "p1", "p2", Some("p3"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Credential(CredentialError::ConfirmationMismatch)
        ));

        let err = service
            .change_own_password("u1", "p1", "p2", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Credential(CredentialError::ConfirmationMismatch)
        ));
    }

    #[tokio::test]
    async fn test_wrong_old_password() {
        let mut users = MockUserRepository::new();
        expect_lookup(&mut users, account("u1", UserRole::Student, "p1"));
        users.expect_update_password().never();

        let err = manager(users)
            .change_own_password("u1", "nope", "p2", Some("p2"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Credential(CredentialError::WrongOldPassword)
        ));
    }

    #[tokio::test]
    async fn test_unchanged_password_is_rejected() {
        let mut users = MockUserRepository::new();
        expect_lookup(&mut users, account("u1", UserRole::Student, "p1"));
        users.expect_update_password().never();

        let err = manager(users)
            .change_own_password("u1", "p1", "p1", Some("p1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Credential(CredentialError::Unchanged)));
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials()
            .returning(|_| Ok(None));

        let err = manager(users)
            .change_own_password("ghost", "p1", "p2", Some("p2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_own_change_stores_new_hash() {
        let mut users = MockUserRepository::new();
        expect_lookup(&mut users, account("u1", UserRole::Student, "p1"));
        users
            .expect_update_password()
            .withf(|id, password| {
                id == "u1"
                    && password.as_str() != "p2"
                    && credentials().verify_blocking(password, "p2")
            })
            .times(1)
            .returning(|_, _| Ok(true));

        manager(users)
            .change_own_password("u1", "p1", "p2", Some("p2"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_admin_reset_checks_admin_password_only() {
        let mut users = MockUserRepository::new();
        expect_lookup(&mut users, account("admin", UserRole::Admin, "root-pass"));
        users
            .expect_update_password()
            .withf(|id, _| id == "u1")
            .times(1)
            .returning(|_, _| Ok(true));

        // Same old and new, no confirmation: still accepted for admins
        manager(users)
            .change_other_user_password("admin", "u1", "root-pass", "root-pass")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_admin_reset_with_wrong_admin_password() {
        let mut users = MockUserRepository::new();
        expect_lookup(&mut users, account("admin", UserRole::Admin, "root-pass"));
        users.expect_update_password().never();

        let err = manager(users)
            .change_other_user_password("admin", "u1", "guess", "p2")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Credential(CredentialError::WrongAdminPassword)
        ));
    }

    #[tokio::test]
    async fn test_admin_reset_of_missing_target() {
        let mut users = MockUserRepository::new();
        expect_lookup(&mut users, account("admin", UserRole::Admin, "root-pass"));
        users
            .expect_update_password()
            .returning(|_, _| Ok(false));

        let err = manager(users)
            .change_other_user_password("admin", "ghost", "root-pass", "p2")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_reset_others() {
        let mut users = MockUserRepository::new();
        expect_lookup(&mut users, account("u2", UserRole::Teacher, "p1"));

        let err = manager(users)
            .change_other_user_password("u2", "u1", "p1", "p2")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let alice = UserCredentials {
            id: "u1".into(),
            username: "alice".into(),
            role: UserRole::Student,
            password: credentials().hash_blocking("p1").unwrap(),
        };
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials()
            .returning(move |key| match key {
                UserKey::Username(name) if name == "alice" => Ok(Some(alice.clone())),
                _ => Ok(None),
            });
        let service = manager(users);

        assert_eq!(service.authenticate("alice", "p1").await.unwrap().id, "u1");
        assert!(matches!(
            service.authenticate("alice", "wrong").await.unwrap_err(),
            AppError::InvalidCredentials
        ));
        assert!(matches!(
            service.authenticate("bob", "p1").await.unwrap_err(),
            AppError::InvalidCredentials
        ));
    }
}
