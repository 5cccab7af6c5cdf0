pub mod auth;
pub mod error;
pub mod routes;

use axum::Router;
use db::DbService;
use services::services::auth::AuthService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub db: DbService,
    pub auth: AuthService,
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(db: DbService, jwt_secret: String, token_ttl_hours: i64) -> Self {
        let auth = AuthService::new(jwt_secret.clone(), token_ttl_hours);
        Self {
            db,
            auth,
            jwt_secret,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::auth::router())
        .merge(routes::pets::router())
        .merge(routes::tasks::router())
        .merge(routes::medical_records::router())
        .merge(routes::posts::router())
        .merge(routes::shops::router())
        .merge(routes::notifications::router())
        .merge(routes::admin::router());

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
