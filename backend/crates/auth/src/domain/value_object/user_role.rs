//! User Role Value Object
//!
//! Roles are open-ended strings. `user` and `admin` are the two the service
//! itself knows about; any other non-empty code is accepted at registration.
//! Role checks are exact matches with no implied hierarchy.

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRole(String);

impl UserRole {
    pub const USER: &'static str = "user";
    pub const ADMIN: &'static str = "admin";

    pub fn user() -> Self {
        Self(Self::USER.to_string())
    }

    pub fn admin() -> Self {
        Self(Self::ADMIN.to_string())
    }

    /// Role requested at registration; absent or empty falls back to `user`.
    pub fn from_requested(requested: Option<String>) -> Self {
        match requested {
            Some(code) if !code.is_empty() => Self(code),
            _ => Self::default(),
        }
    }

    /// Role carried in already-verified claims
    pub fn from_code(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive comparison; `admin` does not satisfy `user`.
    #[inline]
    pub fn satisfies(&self, required: &UserRole) -> bool {
        self.0 == required.0
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::user()
    }
}
