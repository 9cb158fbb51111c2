use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    middleware::{
        auth::AuthUser,
        session::{end_session, set_current_user},
    },
    models::User,
    response::ApiResponse,
    services::auth_service::{current_user, login_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; starts a session and returns a bearer token", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&state, payload).await?;
    let data = resp
        .data
        .as_ref()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("login returned no user")))?;
    set_current_user(&session, &AuthUser::try_from(&data.user)?).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session revoked and cookie cleared", body = ApiResponse<serde_json::Value>)
    ),
    tag = "Auth"
)]
pub async fn logout(session: Session) -> Json<ApiResponse<serde_json::Value>> {
    end_session(&session).await;
    Json(ApiResponse::ok("Logged out", serde_json::json!({})))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<User>),
        (status = 401, description = "Not logged in")
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = current_user(&state, &user).await?;
    Ok(Json(resp))
}
