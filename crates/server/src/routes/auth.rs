use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::user::UserInfo;
use services::services::auth::{LoginRequest, RegisterRequest, SessionResponse};
use utils::response::ApiResponse;

use crate::{AppState, auth::AuthUser, error::ApiError};

pub async fn register(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<RegisterRequest>,
) -> Result<ResponseJson<ApiResponse<SessionResponse>>, ApiError> {
    let session = state.auth.register(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(session)))
}

pub async fn login(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<LoginRequest>,
) -> Result<ResponseJson<ApiResponse<SessionResponse>>, ApiError> {
    let session = state.auth.login(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(session)))
}

/// The profile behind the presented token.
pub async fn me(AuthUser(user): AuthUser) -> ResponseJson<ApiResponse<UserInfo>> {
    ResponseJson(ApiResponse::success(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/auth",
        Router::new()
            .route("/register", post(register))
            .route("/login", post(login))
            .route("/me", get(me)),
    )
}
