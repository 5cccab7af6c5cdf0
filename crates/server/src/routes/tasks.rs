use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::task::{CreateTask, Task, UpdateTask};
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError, routes::pets::owned_pet};

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub pet_id: Option<Uuid>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<TaskListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = Task::find_by_owner_id(&state.db.pool, user.id, query.pet_id).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    axum::Json(payload): axum::Json<CreateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    // The target pet must exist and belong to the caller.
    owned_pet(&state, payload.pet_id, user.id).await?;
    let task = Task::create(&state.db.pool, user.id, &payload, Uuid::new_v4()).await?;
    tracing::info!(task_id = %task.id, pet_id = %task.pet_id, "task created");
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(task_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    owned_task(&state, task_id, user.id).await?;
    let task = Task::update(&state.db.pool, task_id, &payload)
        .await?
        .ok_or(ApiError::NotFound("task"))?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    owned_task(&state, task_id, user.id).await?;
    Task::delete(&state.db.pool, task_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

async fn owned_task(state: &AppState, task_id: Uuid, owner_id: Uuid) -> Result<Task, ApiError> {
    Task::find_by_id(&state.db.pool, task_id)
        .await?
        .filter(|task| task.owner_id == owner_id)
        .ok_or(ApiError::NotFound("task"))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/task",
        Router::new()
            .route("/", get(list_tasks).post(create_task))
            .route("/{task_id}", axum::routing::put(update_task).delete(delete_task)),
    )
}
