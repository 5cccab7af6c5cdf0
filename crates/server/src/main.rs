use anyhow::Context;
use db::DbService;
use server::{AppState, app};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 3001;
const TOKEN_TTL_HOURS: i64 = 24 * 7;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url =
        std::env::var("PETHUB_DATABASE_URL").unwrap_or_else(|_| "sqlite://pethub.db".to_string());
    let jwt_secret = std::env::var("PETHUB_JWT_SECRET").unwrap_or_else(|_| {
        warn!("PETHUB_JWT_SECRET not set, using an insecure development secret");
        "pethub-dev-secret".to_string()
    });
    let port: u16 = std::env::var("PETHUB_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let db = DbService::new(&database_url)
        .await
        .context("failed to open database")?;
    let state = AppState::new(db, jwt_secret, TOKEN_TTL_HOURS);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
