//! Login endpoint. The only route reachable without a bearer token besides
//! health and docs.

use axum::{extract::State, response::Json, routing::post, Router};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::validation::LoginRequest;

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Exchange a username and password for a JWT
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Unknown username or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(LoginRequest { username, password }): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    state
        .auth_service
        .login(&username, &password)
        .await
        .map(Json)
}
