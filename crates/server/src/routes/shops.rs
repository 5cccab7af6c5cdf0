use axum::{
    Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::shop::{Shop, ShopWithDistance};
use serde::Deserialize;
use utils::response::ApiResponse;

use crate::{AppState, auth::AuthUser, error::ApiError};

const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
}

pub async fn list_shops(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<ResponseJson<ApiResponse<Vec<Shop>>>, ApiError> {
    let shops = Shop::find_all(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(shops)))
}

pub async fn nearby_shops(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(query): Query<NearbyQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<ShopWithDistance>>>, ApiError> {
    if !(-90.0..=90.0).contains(&query.lat) || !(-180.0..=180.0).contains(&query.lng) {
        return Err(ApiError::BadRequest("invalid coordinates".to_string()));
    }
    let radius_km = query.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
    let shops = Shop::find_nearby(&state.db.pool, query.lat, query.lng, radius_km).await?;
    Ok(ResponseJson(ApiResponse::success(shops)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/shop",
        Router::new()
            .route("/", get(list_shops))
            .route("/nearby", get(nearby_shops)),
    )
}
