use std::collections::{HashMap, HashSet};

use axum::{
    Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use chrono::Utc;
use db::models::{pet::Pet, post::Post, task::Task};
use serde::Deserialize;
use services::services::notifications::{Notification, derive_notifications};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// Comma-separated notification ids the session has already dismissed.
    /// The set lives on the client; the server never stores it.
    pub dismissed: Option<String>,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<NotificationQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Notification>>>, ApiError> {
    let dismissed: HashSet<String> = query
        .dismissed
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    let tasks = Task::find_by_owner_id(&state.db.pool, user.id, None).await?;
    let pet_names: HashMap<Uuid, String> = Pet::find_by_owner_id(&state.db.pool, user.id)
        .await?
        .into_iter()
        .map(|pet| (pet.id, pet.name))
        .collect();
    let posts = Post::find_all_with_counts(&state.db.pool, user.id).await?;

    let notifications =
        derive_notifications(Utc::now(), &tasks, &pet_names, &posts, user.id, &dismissed);

    Ok(ResponseJson(ApiResponse::success(notifications)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/notification", get(list_notifications))
}
