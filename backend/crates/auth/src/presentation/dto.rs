//! API DTOs (Data Transfer Objects)
//!
//! Request types carrying a password do not derive `Debug`.

use serde::{Deserialize, Serialize};

// ============================================================================
// Register
// ============================================================================

/// Register request. Missing fields decode as empty and fail validation.
#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, rename = "username")]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default, rename = "username")]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

/// Login response: the token and nothing else
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

// ============================================================================
// Identity
// ============================================================================

/// Authenticated identity, as returned by `/profile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(rename = "username")]
    pub user_name: String,
    pub role: String,
}
