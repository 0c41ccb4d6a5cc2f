//! User handlers.
//!
//! Everyone may read, update or delete their own account. Acting on other
//! accounts, creating accounts and changing roles require the admin role.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, put},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, require_self_or_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{DeleteOutcome, UserKey, UserProfile, UserQueryOptions};
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, MessageResponse};
use crate::validation::{ChangePassword, DeleteUser, InsertUser, UpdateUser};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_users)
                .post(create_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route("/me", get(get_current_user))
        .route("/password", put(change_password))
        .route("/by-username/:username", get(get_user_by_username))
        .route("/:id", get(get_user))
}

/// Create a user account (admin only)
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = InsertUser,
    responses(
        (status = 201, description = "User created", body = UserProfile),
        (status = 400, description = "Validation error or username taken"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<InsertUser>,
) -> AppResult<Created<UserProfile>> {
    require_admin(&current_user)?;
    let user = state.user_service.insert_user(payload).await?;
    Ok(Created(user))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(UserQueryOptions),
    responses(
        (status = 200, description = "List of all users", body = Vec<UserProfile>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(options): Query<UserQueryOptions>,
) -> AppResult<Json<Vec<UserProfile>>> {
    require_admin(&current_user)?;
    let users = state.user_service.list_users(options).await?;
    Ok(Json(users))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(UserQueryOptions),
    responses(
        (status = 200, description = "Current user profile", body = UserProfile),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(options): Query<UserQueryOptions>,
) -> AppResult<Json<UserProfile>> {
    let user = state
        .user_service
        .find_user(UserKey::Id(current_user.id), options)
        .await?
        .ok_or_not_found()?;

    Ok(Json(user))
}

/// Get user by ID (own profile or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID"),
        UserQueryOptions
    ),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 403, description = "Forbidden - Can only view own profile unless admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(options): Query<UserQueryOptions>,
) -> AppResult<Json<UserProfile>> {
    require_self_or_admin(&current_user, &id)?;

    let user = state
        .user_service
        .find_user(UserKey::Id(id), options)
        .await?
        .ok_or_not_found()?;

    Ok(Json(user))
}

/// Get user by username (own profile or admin)
#[utoipa::path(
    get,
    path = "/users/by-username/{username}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("username" = String, Path, description = "Username"),
        UserQueryOptions
    ),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 403, description = "Forbidden - Can only view own profile unless admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_username(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(options): Query<UserQueryOptions>,
) -> AppResult<Json<UserProfile>> {
    let user = state
        .user_service
        .find_user(UserKey::Username(username), options)
        .await?;

    // Ownership is decided by id so a renamed account still reaches itself.
    // Non-admins get 403 for names that do not resolve to them, found or not.
    match user {
        Some(user) if user.id == current_user.id => Ok(Json(user)),
        user => {
            require_admin(&current_user)?;
            Ok(Json(user.ok_or_not_found()?))
        }
    }
}

/// Update user fields (own profile, or admin; role changes are admin only)
#[utoipa::path(
    patch,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserProfile),
        (status = 400, description = "Validation error or username taken"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> AppResult<Json<UserProfile>> {
    require_self_or_admin(&current_user, &payload.user_id)?;
    if payload.role.is_some() {
        require_admin(&current_user)?;
    }

    let user = state.user_service.update_user(payload).await?;
    Ok(Json(user))
}

/// Change a password
///
/// Targeting one's own account requires the old password and a matching
/// confirmation. Targeting another account requires the admin role, and
/// `oldPassword` is then the admin's own password.
#[utoipa::path(
    put,
    path = "/users/password",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ChangePassword,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Validation or credential error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_password(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ChangePassword>,
) -> AppResult<Json<MessageResponse>> {
    if payload.user_id == current_user.id {
        state
            .credential_service
            .change_own_password(
                &current_user.id,
                &payload.old_password,
                &payload.new_password,
                payload.confirm_password.as_deref(),
            )
            .await?;
    } else {
        require_admin(&current_user)?;
        state
            .credential_service
            .change_other_user_password(
                &current_user.id,
                &payload.user_id,
                &payload.old_password,
                &payload.new_password,
            )
            .await?;
    }

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

/// Delete a user account (own account or admin)
#[utoipa::path(
    delete,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = DeleteUser,
    responses(
        (status = 200, description = "User deleted", body = DeleteOutcome),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DeleteUser>,
) -> AppResult<Json<DeleteOutcome>> {
    require_self_or_admin(&current_user, &payload.user_id)?;

    let outcome = state
        .user_service
        .delete_user(&current_user.id, payload)
        .await?;

    Ok(Json(outcome))
}
