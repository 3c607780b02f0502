//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{protect, restrict_to_role};

/// Create the Auth router for any repository implementation.
///
/// `/register` and `/login` are public; `/profile` requires a bearer token.
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let protected = protect(
        Router::new().route("/profile", get(handlers::profile)),
        state.middleware_state(),
    );

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .with_state(state)
        .merge(protected)
}

/// `/admin`: the caller's own identity, for `admin` tokens only
pub fn admin_router<R>(state: &AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let gated = restrict_to_role(
        Router::new().route("/admin", get(handlers::profile)),
        UserRole::ADMIN,
    );

    protect(gated, state.middleware_state())
}
