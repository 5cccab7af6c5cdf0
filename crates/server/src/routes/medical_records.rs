use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get},
};
use db::models::{
    medical_record::{CreateMedicalRecord, MedicalRecord},
    pet::Pet,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError, routes::pets::owned_pet};

pub async fn list_records(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(pet_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<MedicalRecord>>>, ApiError> {
    owned_pet(&state, pet_id, user.id).await?;
    let records = MedicalRecord::find_by_pet_id(&state.db.pool, pet_id).await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

pub async fn create_record(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(pet_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateMedicalRecord>,
) -> Result<ResponseJson<ApiResponse<MedicalRecord>>, ApiError> {
    owned_pet(&state, pet_id, user.id).await?;
    let record =
        MedicalRecord::create(&state.db.pool, pet_id, &payload, Uuid::new_v4()).await?;
    tracing::info!(record_id = %record.id, pet_id = %pet_id, "medical record created");
    Ok(ResponseJson(ApiResponse::success(record)))
}

pub async fn delete_record(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(record_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let record = MedicalRecord::find_by_id(&state.db.pool, record_id)
        .await?
        .ok_or(ApiError::NotFound("medical record"))?;
    // Ownership is established through the pet the record belongs to.
    let pet = Pet::find_by_id(&state.db.pool, record.pet_id)
        .await?
        .ok_or(ApiError::NotFound("medical record"))?;
    if pet.owner_id != user.id {
        return Err(ApiError::NotFound("medical record"));
    }
    MedicalRecord::delete(&state.db.pool, record_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/pet/{pet_id}/medical-record",
            get(list_records).post(create_record),
        )
        .route("/medical-record/{record_id}", delete(delete_record))
}
