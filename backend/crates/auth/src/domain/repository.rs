//! Repository Traits
//!
//! Interfaces for user storage. Implementations live in the infra layer and
//! own their locking; callers never see it.

use platform::password::HashedPassword;

use crate::domain::entity::user::User;
use crate::domain::value_object::{user_name::UserName, user_role::UserRole};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user with a freshly generated ID.
    ///
    /// Fails with `AuthError::UserNameTaken` if the name is already present;
    /// the existing record is left untouched.
    async fn create(
        &self,
        user_name: UserName,
        password_hash: HashedPassword,
        user_role: UserRole,
    ) -> AuthResult<User>;

    /// Fails with `AuthError::UserNotFound` for unknown names.
    async fn get_by_user_name(&self, user_name: &UserName) -> AuthResult<User>;
}
