//! Registration, login and session token issuance.

use db::models::user::{CreateUser, User, UserInfo};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use utils::jwt::{self, JwtError};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidInput(String),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("token error: {0}")]
    Token(#[from] JwtError),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_ttl_hours,
        }
    }

    pub async fn register(
        &self,
        pool: &SqlitePool,
        data: &RegisterRequest,
    ) -> Result<SessionResponse, AuthError> {
        let email = data.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AuthError::InvalidInput("invalid email address".into()));
        }
        if data.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if data.name.trim().is_empty() {
            return Err(AuthError::InvalidInput("name must not be empty".into()));
        }

        if User::find_by_email(pool, &email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = bcrypt::hash(&data.password, bcrypt::DEFAULT_COST)?;
        let user = User::create(
            pool,
            &CreateUser {
                email,
                password_hash,
                name: data.name.trim().to_string(),
                role: None,
            },
            Uuid::new_v4(),
        )
        .await?;

        info!(user_id = %user.id, "registered new user");
        self.session_for(user)
    }

    pub async fn login(
        &self,
        pool: &SqlitePool,
        data: &LoginRequest,
    ) -> Result<SessionResponse, AuthError> {
        let email = data.email.trim().to_lowercase();
        let user = User::find_by_email(pool, &email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !bcrypt::verify(&data.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, "user logged in");
        self.session_for(user)
    }

    fn session_for(&self, user: User) -> Result<SessionResponse, AuthError> {
        let token = jwt::mint_token(&self.jwt_secret, user.id, self.token_ttl_hours)?;
        Ok(SessionResponse {
            token,
            user: user.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use db::test_pool;

    use super::*;

    fn service() -> AuthService {
        AuthService::new("test-secret".into(), 24)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let pool = test_pool().await;
        let auth = service();

        let session = auth
            .register(
                &pool,
                &RegisterRequest {
                    email: "Ana@Example.com".into(),
                    password: "hunter22".into(),
                    name: "Ana".into(),
                },
            )
            .await
            .unwrap();
        // Email is normalized on the way in.
        assert_eq!(session.user.email, "ana@example.com");

        let login = auth
            .login(
                &pool,
                &LoginRequest {
                    email: "ana@example.com".into(),
                    password: "hunter22".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(login.user.id, session.user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let pool = test_pool().await;
        let auth = service();
        auth.register(
            &pool,
            &RegisterRequest {
                email: "bob@example.com".into(),
                password: "hunter22".into(),
                name: "Bob".into(),
            },
        )
        .await
        .unwrap();

        let err = auth
            .login(
                &pool,
                &LoginRequest {
                    email: "bob@example.com".into(),
                    password: "wrong".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = test_pool().await;
        let auth = service();
        let req = RegisterRequest {
            email: "dup@example.com".into(),
            password: "hunter22".into(),
            name: "Dup".into(),
        };
        auth.register(&pool, &req).await.unwrap();
        assert!(matches!(
            auth.register(&pool, &req).await.unwrap_err(),
            AuthError::EmailTaken
        ));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let pool = test_pool().await;
        let err = service()
            .register(
                &pool,
                &RegisterRequest {
                    email: "c@example.com".into(),
                    password: "abc".into(),
                    name: "C".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));
    }
}
