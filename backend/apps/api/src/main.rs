//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail, ensure};
use auth::presentation::AuthAppState;
use auth::{AuthConfig, InMemoryUserRepository, admin_router, auth_router};
use axum::{
    Json, Router, http,
    http::{Method, header},
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose;
use kernel::error::app_error::AppError;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Auth configuration
    let auth_config = load_auth_config()?;
    tracing::info!(
        token_ttl_secs = auth_config.token_ttl.as_secs(),
        pepper = auth_config.pepper().is_some(),
        hash_memory_kib = auth_config.hash_cost.memory_kib,
        "Auth configured"
    );

    let repo = InMemoryUserRepository::new();
    tracing::info!(users = repo.len().await, "User store ready (in-memory)");

    let auth_state = AuthAppState::new(repo, auth_config).context("auth setup failed")?;

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .merge(admin_router(&auth_state))
        .merge(auth_router(auth_state))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build `AuthConfig` from the environment.
///
/// Release builds refuse to start without `AUTH_TOKEN_SECRET`; debug builds
/// fall back to a random secret, so tokens die with the process.
fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig::default()
    };

    match env::var("AUTH_TOKEN_SECRET") {
        Ok(secret_b64) => {
            let secret_bytes = general_purpose::STANDARD
                .decode(secret_b64.trim())
                .context("AUTH_TOKEN_SECRET must be base64")?;
            ensure!(
                secret_bytes.len() == 32,
                "AUTH_TOKEN_SECRET must decode to 32 bytes, got {}",
                secret_bytes.len()
            );
            config.token_secret.copy_from_slice(&secret_bytes);
        }
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("AUTH_TOKEN_SECRET not set, using a random secret");
        }
        Err(_) => bail!("AUTH_TOKEN_SECRET must be set in production"),
    }

    if let Ok(ttl) = env::var("AUTH_TOKEN_TTL_SECS") {
        let secs: u64 = ttl
            .trim()
            .parse()
            .context("AUTH_TOKEN_TTL_SECS must be a whole number of seconds")?;
        ensure!(secs > 0, "AUTH_TOKEN_TTL_SECS must be positive");
        config.token_ttl = Duration::from_secs(secs);
    }

    if let Ok(pepper) = env::var("AUTH_PASSWORD_PEPPER") {
        if !pepper.is_empty() {
            config.password_pepper = Some(pepper.into_bytes());
        }
    }

    Ok(config)
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

/// GET /health
async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn not_found() -> AppError {
    AppError::not_found("Not found")
}
