//! Borrow handlers.
//!
//! Any signed-in user may read the schedule. Creating or cancelling a
//! borrow on behalf of someone else requires the admin role.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_self_or_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::Borrow;
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, NoContent};
use crate::validation::{DeleteBorrow, InsertBorrow};

/// Filters for listing borrows
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BorrowQuery {
    /// Only borrows of this user
    pub user_id: Option<String>,
    /// Only borrows starting on the current UTC date
    pub today: bool,
}

/// Create borrow routes
pub fn borrow_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_borrows).post(create_borrow).delete(delete_borrow),
        )
        .route("/:id", get(get_borrow))
}

/// Reserve a classroom for a slot range
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "Borrows",
    security(("bearer_auth" = [])),
    request_body = InsertBorrow,
    responses(
        (status = 201, description = "Borrow created", body = Borrow),
        (status = 400, description = "Validation error or unknown user/classroom"),
        (status = 403, description = "Forbidden - Can only borrow for yourself unless admin")
    )
)]
pub async fn create_borrow(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<InsertBorrow>,
) -> AppResult<Created<Borrow>> {
    require_self_or_admin(&current_user, &payload.user_id)?;
    let borrow = state.borrow_service.insert_borrow(payload).await?;
    Ok(Created(borrow))
}

#[utoipa::path(
    get,
    path = "/borrows",
    tag = "Borrows",
    security(("bearer_auth" = [])),
    params(BorrowQuery),
    responses(
        (status = 200, description = "Borrows ordered by start time", body = Vec<Borrow>)
    )
)]
pub async fn list_borrows(
    State(state): State<AppState>,
    Query(query): Query<BorrowQuery>,
) -> AppResult<Json<Vec<Borrow>>> {
    let borrows = state
        .borrow_service
        .list_borrows(query.user_id, query.today)
        .await?;
    Ok(Json(borrows))
}

#[utoipa::path(
    get,
    path = "/borrows/{id}",
    tag = "Borrows",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Borrow ID")),
    responses(
        (status = 200, description = "Borrow", body = Borrow),
        (status = 404, description = "Borrow not found")
    )
)]
pub async fn get_borrow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Borrow>> {
    let borrow = state
        .borrow_service
        .get_borrow(&id)
        .await?
        .ok_or_not_found()?;
    Ok(Json(borrow))
}

/// Cancel a borrow owned by `userId`
#[utoipa::path(
    delete,
    path = "/borrows",
    tag = "Borrows",
    security(("bearer_auth" = [])),
    request_body = DeleteBorrow,
    responses(
        (status = 204, description = "Borrow deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Borrow not found for this user")
    )
)]
pub async fn delete_borrow(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DeleteBorrow>,
) -> AppResult<NoContent> {
    require_self_or_admin(&current_user, &payload.user_id)?;
    state.borrow_service.delete_borrow(payload).await?;
    Ok(NoContent)
}
