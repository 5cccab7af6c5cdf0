use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::pet::{CreatePet, Pet, UpdatePet};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError};

/// Look up a pet and enforce that `owner_id` owns it. A pet belonging to
/// someone else is reported as absent rather than forbidden.
pub async fn owned_pet(
    state: &AppState,
    pet_id: Uuid,
    owner_id: Uuid,
) -> Result<Pet, ApiError> {
    Pet::find_by_id(&state.db.pool, pet_id)
        .await?
        .filter(|pet| pet.owner_id == owner_id)
        .ok_or(ApiError::NotFound("pet"))
}

pub async fn list_pets(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<ResponseJson<ApiResponse<Vec<Pet>>>, ApiError> {
    let pets = Pet::find_by_owner_id(&state.db.pool, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(pets)))
}

pub async fn get_pet(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(pet_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Pet>>, ApiError> {
    let pet = owned_pet(&state, pet_id, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(pet)))
}

pub async fn create_pet(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    axum::Json(payload): axum::Json<CreatePet>,
) -> Result<ResponseJson<ApiResponse<Pet>>, ApiError> {
    let pet = Pet::create(&state.db.pool, user.id, &payload, Uuid::new_v4()).await?;
    tracing::info!(pet_id = %pet.id, owner_id = %user.id, "pet created");
    Ok(ResponseJson(ApiResponse::success(pet)))
}

pub async fn update_pet(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(pet_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdatePet>,
) -> Result<ResponseJson<ApiResponse<Pet>>, ApiError> {
    owned_pet(&state, pet_id, user.id).await?;
    let pet = Pet::update(&state.db.pool, pet_id, &payload)
        .await?
        .ok_or(ApiError::NotFound("pet"))?;
    Ok(ResponseJson(ApiResponse::success(pet)))
}

/// Deleting a pet cascades to its tasks and medical records.
pub async fn delete_pet(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(pet_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    owned_pet(&state, pet_id, user.id).await?;
    Pet::delete(&state.db.pool, pet_id).await?;
    tracing::info!(pet_id = %pet_id, owner_id = %user.id, "pet deleted");
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/pet",
        Router::new()
            .route("/", get(list_pets).post(create_pet))
            .route(
                "/{pet_id}",
                get(get_pet).put(update_pet).delete(delete_pet),
            ),
    )
}
