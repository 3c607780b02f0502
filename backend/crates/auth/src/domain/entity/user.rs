//! User Entity
//!
//! A registered account. Created once by registration and never mutated.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{user_id::UserId, user_name::UserName, user_role::UserRole};

/// User entity
///
/// Holds the password hash only; the clear text never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Generated at creation, never reassigned
    pub user_id: UserId,
    /// Unique across the store, case-sensitive
    pub user_name: UserName,
    pub password_hash: HashedPassword,
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(user_name: UserName, password_hash: HashedPassword, user_role: UserRole) -> Self {
        Self {
            user_id: UserId::new(),
            user_name,
            password_hash,
            user_role,
            created_at: Utc::now(),
        }
    }
}
