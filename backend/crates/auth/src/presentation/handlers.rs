//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use kernel::error::app_error::AppError;
use platform::password::PasswordHasher;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenCodec;
use crate::application::{LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{LoginRequest, LoginResponse, ProfileResponse, RegisterRequest};
use crate::presentation::middleware::{AuthContext, AuthMiddlewareState};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub codec: Arc<TokenCodec>,
    pub hasher: Arc<PasswordHasher>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    /// Build the codec and hasher from `config`.
    ///
    /// Fails if the configured hash cost is rejected by Argon2.
    pub fn new(repo: R, config: AuthConfig) -> AuthResult<Self> {
        let hasher = PasswordHasher::new(config.hash_cost, config.password_pepper.clone())?;

        Ok(Self {
            repo: Arc::new(repo),
            codec: Arc::new(TokenCodec::new(config.token_secret)),
            hasher: Arc::new(hasher),
            config: Arc::new(config),
        })
    }

    /// State for `require_auth_token`, sharing this state's codec
    pub fn middleware_state(&self) -> AuthMiddlewareState {
        AuthMiddlewareState {
            codec: Arc::clone(&self.codec),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let use_case = RegisterUseCase::new(state.repo.clone(), state.hasher.clone());

    let input = RegisterInput {
        user_name: req.user_name,
        password: req.password,
        role: req.role,
    };

    use_case.execute(input).await?;

    Ok(StatusCode::CREATED)
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.codec.clone(),
        state.config.token_ttl,
    );

    let input = LoginInput {
        user_name: req.user_name,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(LoginResponse {
        token: output.token,
    }))
}

// ============================================================================
// Profile (requires authentication)
// ============================================================================

/// GET /profile
pub async fn profile(identity: AuthContext) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        user_name: identity.user_name,
        role: identity.user_role.code().to_string(),
    })
}
