//! Auth Middleware
//!
//! Bearer token verification and role gating for protected routes.
//!
//! ```text
//! request -> require_auth_token -> require_role -> handler(AuthContext)
//! ```
//!
//! `require_auth_token` verifies the token and stores an [`AuthContext`] in
//! the request extensions. Handlers take `AuthContext` as an extractor; the
//! role gate reads the same value. Nothing outlives the request.

use std::sync::Arc;

use axum::Router;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{HeaderMap, header, request::Parts};
use axum::middleware::{self, Next};
use axum::response::Response;

use crate::application::token::{Claims, TokenCodec};
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;

// ============================================================================
// Identity Context
// ============================================================================

/// Verified identity of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_name: String,
    pub user_role: UserRole,
    /// Token expiry, seconds since the Unix epoch
    pub expires_at: i64,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_name: claims.username,
            user_role: UserRole::from_code(claims.role),
            expires_at: claims.expires_at,
        }
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

// ============================================================================
// Bearer Token
// ============================================================================

/// Middleware state
#[derive(Debug, Clone)]
pub struct AuthMiddlewareState {
    pub codec: Arc<TokenCodec>,
}

/// `Authorization: Bearer <token>`, scheme compared case-insensitively
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware that requires a valid bearer token
pub async fn require_auth_token(
    State(state): State<AuthMiddlewareState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::MissingBearer)?;
    let claims = state.codec.verify(token)?;

    let context = AuthContext::from(claims);
    tracing::debug!(
        user_name = %context.user_name,
        user_role = %context.user_role,
        expires_at = context.expires_at,
        "Bearer token accepted"
    );

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

// ============================================================================
// Role Gate
// ============================================================================

/// Required role for a group of routes
#[derive(Debug, Clone)]
pub struct RoleGate {
    pub required: UserRole,
}

impl RoleGate {
    pub fn new(required: impl Into<String>) -> Self {
        Self {
            required: UserRole::from_code(required),
        }
    }
}

/// Middleware that requires an exact role match.
///
/// Runs after `require_auth_token`. Without an identity in the request the
/// answer is 401, not 403.
pub async fn require_role(
    State(gate): State<RoleGate>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let context = req
        .extensions()
        .get::<AuthContext>()
        .ok_or(AuthError::Unauthenticated)?;

    if !context.user_role.satisfies(&gate.required) {
        return Err(AuthError::Forbidden {
            required: gate.required.code().to_string(),
            actual: context.user_role.code().to_string(),
        });
    }

    Ok(next.run(req).await)
}

// ============================================================================
// Composition
// ============================================================================

/// Require a valid bearer token on every route already added to `router`
pub fn protect<S>(router: Router<S>, state: AuthMiddlewareState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(state, require_auth_token))
}

/// Require `role` on every route already added to `router`.
///
/// Wrap the result in [`protect`] so the token is checked first.
pub fn restrict_to_role<S>(router: Router<S>, role: impl Into<String>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(RoleGate::new(role), require_role))
}
