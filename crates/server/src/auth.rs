//! Bearer-token request guards.
//!
//! `AuthUser` resolves the `Authorization: Bearer <token>` header to a user
//! row or rejects with 401; `AdminUser` additionally requires the admin role
//! (403 otherwise). Handlers downstream never see an unauthenticated request.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use db::models::user::{User, UserRole};
use utils::jwt;

use crate::{AppState, error::ApiError};

pub struct AuthUser(pub User);

pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let user_id =
            jwt::verify_token(&state.jwt_secret, token).map_err(|_| ApiError::Unauthorized)?;

        let user = User::find_by_id(&state.db.pool, user_id)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Ok(AuthUser(user))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
