//! Classroom handlers. Reads are open to every signed-in user, writes are
//! admin only.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::Classroom;
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, NoContent};
use crate::validation::{DeleteClassroom, InsertClassroom, UpdateClassroom};

/// Relation switches for classroom reads
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct ClassroomQuery {
    /// Attach the classroom's borrows
    pub borrows: bool,
}

/// Create classroom routes
pub fn classroom_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_classrooms)
                .post(create_classroom)
                .patch(update_classroom)
                .delete(delete_classroom),
        )
        .route("/:id", get(get_classroom))
}

#[utoipa::path(
    post,
    path = "/classrooms",
    tag = "Classrooms",
    security(("bearer_auth" = [])),
    request_body = InsertClassroom,
    responses(
        (status = 201, description = "Classroom created", body = Classroom),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_classroom(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<InsertClassroom>,
) -> AppResult<Created<Classroom>> {
    require_admin(&current_user)?;
    let classroom = state.classroom_service.insert_classroom(payload).await?;
    Ok(Created(classroom))
}

#[utoipa::path(
    get,
    path = "/classrooms",
    tag = "Classrooms",
    security(("bearer_auth" = [])),
    params(ClassroomQuery),
    responses(
        (status = 200, description = "All classrooms", body = Vec<Classroom>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_classrooms(
    State(state): State<AppState>,
    Query(query): Query<ClassroomQuery>,
) -> AppResult<Json<Vec<Classroom>>> {
    let classrooms = state
        .classroom_service
        .list_classrooms(query.borrows)
        .await?;
    Ok(Json(classrooms))
}

#[utoipa::path(
    get,
    path = "/classrooms/{id}",
    tag = "Classrooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Classroom ID"),
        ClassroomQuery
    ),
    responses(
        (status = 200, description = "Classroom", body = Classroom),
        (status = 404, description = "Classroom not found")
    )
)]
pub async fn get_classroom(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ClassroomQuery>,
) -> AppResult<Json<Classroom>> {
    let classroom = state
        .classroom_service
        .get_classroom(&id, query.borrows)
        .await?
        .ok_or_not_found()?;
    Ok(Json(classroom))
}

#[utoipa::path(
    patch,
    path = "/classrooms",
    tag = "Classrooms",
    security(("bearer_auth" = [])),
    request_body = UpdateClassroom,
    responses(
        (status = 200, description = "Classroom updated", body = Classroom),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Classroom not found")
    )
)]
pub async fn update_classroom(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateClassroom>,
) -> AppResult<Json<Classroom>> {
    require_admin(&current_user)?;
    let classroom = state.classroom_service.update_classroom(payload).await?;
    Ok(Json(classroom))
}

/// Delete a classroom along with its borrows
#[utoipa::path(
    delete,
    path = "/classrooms",
    tag = "Classrooms",
    security(("bearer_auth" = [])),
    request_body = DeleteClassroom,
    responses(
        (status = 204, description = "Classroom deleted"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Classroom not found")
    )
)]
pub async fn delete_classroom(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DeleteClassroom>,
) -> AppResult<NoContent> {
    require_admin(&current_user)?;
    state.classroom_service.delete_classroom(payload).await?;
    Ok(NoContent)
}
