//! Admin-only CRUD and dashboard statistics. Every handler requires the
//! admin role via the `AdminUser` guard.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get, post, put},
};
use db::models::{
    pet::Pet,
    post::Post,
    shop::{CreateShop, Shop, UpdateShop},
    user::{User, UserInfo},
};
use services::services::stats::{DashboardStats, dashboard_stats};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::AdminUser, error::ApiError};

pub async fn get_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<ResponseJson<ApiResponse<DashboardStats>>, ApiError> {
    let stats = dashboard_stats(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(stats)))
}

pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<ResponseJson<ApiResponse<Vec<UserInfo>>>, ApiError> {
    let users = User::find_all(&state.db.pool)
        .await?
        .into_iter()
        .map(UserInfo::from)
        .collect();
    Ok(ResponseJson(ApiResponse::success(users)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if user_id == admin.id {
        return Err(ApiError::BadRequest(
            "cannot delete your own account".to_string(),
        ));
    }
    if User::delete(&state.db.pool, user_id).await? == 0 {
        return Err(ApiError::NotFound("user"));
    }
    tracing::info!(user_id = %user_id, admin_id = %admin.id, "user deleted by admin");
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_pets(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<ResponseJson<ApiResponse<Vec<Pet>>>, ApiError> {
    let pets = Pet::find_all(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(pets)))
}

pub async fn delete_pet(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(pet_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if Pet::delete(&state.db.pool, pet_id).await? == 0 {
        return Err(ApiError::NotFound("pet"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(post_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if Post::delete(&state.db.pool, post_id).await? == 0 {
        return Err(ApiError::NotFound("post"));
    }
    tracing::info!(post_id = %post_id, admin_id = %admin.id, "post removed by admin");
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn create_shop(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    axum::Json(payload): axum::Json<CreateShop>,
) -> Result<ResponseJson<ApiResponse<Shop>>, ApiError> {
    let shop = Shop::create(&state.db.pool, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(shop)))
}

pub async fn update_shop(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(shop_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateShop>,
) -> Result<ResponseJson<ApiResponse<Shop>>, ApiError> {
    let shop = Shop::update(&state.db.pool, shop_id, &payload)
        .await?
        .ok_or(ApiError::NotFound("shop"))?;
    Ok(ResponseJson(ApiResponse::success(shop)))
}

pub async fn delete_shop(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(shop_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if Shop::delete(&state.db.pool, shop_id).await? == 0 {
        return Err(ApiError::NotFound("shop"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/admin",
        Router::new()
            .route("/stats", get(get_stats))
            .route("/users", get(list_users))
            .route("/users/{user_id}", delete(delete_user))
            .route("/pets", get(list_pets))
            .route("/pets/{pet_id}", delete(delete_pet))
            .route("/posts/{post_id}", delete(delete_post))
            .route("/shops", post(create_shop))
            .route("/shops/{shop_id}", put(update_shop).delete(delete_shop)),
    )
}
