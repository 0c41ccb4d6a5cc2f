//! Department handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::Department;
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, NoContent};
use crate::validation::{DeleteDepartment, InsertDepartment, UpdateDepartment};

/// Create department routes
pub fn department_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_departments)
                .post(create_department)
                .patch(update_department)
                .delete(delete_department),
        )
        .route("/:id", get(get_department))
}

#[utoipa::path(
    post,
    path = "/departments",
    tag = "Departments",
    security(("bearer_auth" = [])),
    request_body = InsertDepartment,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_department(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<InsertDepartment>,
) -> AppResult<Created<Department>> {
    require_admin(&current_user)?;
    let department = state.department_service.insert_department(payload).await?;
    Ok(Created(department))
}

#[utoipa::path(
    get,
    path = "/departments",
    tag = "Departments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All departments", body = Vec<Department>)
    )
)]
pub async fn list_departments(State(state): State<AppState>) -> AppResult<Json<Vec<Department>>> {
    let departments = state.department_service.list_departments().await?;
    Ok(Json(departments))
}

#[utoipa::path(
    get,
    path = "/departments/{id}",
    tag = "Departments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department", body = Department),
        (status = 404, description = "Department not found")
    )
)]
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Department>> {
    let department = state
        .department_service
        .get_department(&id)
        .await?
        .ok_or_not_found()?;
    Ok(Json(department))
}

#[utoipa::path(
    patch,
    path = "/departments",
    tag = "Departments",
    security(("bearer_auth" = [])),
    request_body = UpdateDepartment,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn update_department(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateDepartment>,
) -> AppResult<Json<Department>> {
    require_admin(&current_user)?;
    let department = state.department_service.update_department(payload).await?;
    Ok(Json(department))
}

/// Delete a department. Refused while users still belong to it.
#[utoipa::path(
    delete,
    path = "/departments",
    tag = "Departments",
    security(("bearer_auth" = [])),
    request_body = DeleteDepartment,
    responses(
        (status = 204, description = "Department deleted"),
        (status = 400, description = "Department still has users"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn delete_department(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DeleteDepartment>,
) -> AppResult<NoContent> {
    require_admin(&current_user)?;
    state.department_service.delete_department(payload).await?;
    Ok(NoContent)
}
