//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    AuthContext, AuthMiddlewareState, RoleGate, protect, require_auth_token, require_role,
    restrict_to_role,
};
pub use router::{admin_router, auth_router};
