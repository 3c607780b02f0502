//! Register Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use platform::password::{ClearTextPassword, PasswordHasher};

use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_name::UserName, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

const REQUIRED_FIELDS: &str = "username & password required";

/// Register input
pub struct RegisterInput {
    pub user_name: String,
    pub password: String,
    /// Absent or empty means `user`
    pub role: Option<String>,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: UserId,
    pub user_role: UserRole,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    user_repo: Arc<R>,
    hasher: Arc<PasswordHasher>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(user_repo: Arc<R>, hasher: Arc<PasswordHasher>) -> Self {
        Self { user_repo, hasher }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // Both fields are checked before the store is touched
        let user_name = UserName::new(input.user_name)
            .map_err(|_| AuthError::Validation(REQUIRED_FIELDS.to_string()))?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|_| AuthError::Validation(REQUIRED_FIELDS.to_string()))?;
        let user_role = UserRole::from_requested(input.role);

        // Fast path; `create` is still the authoritative uniqueness check
        match self.user_repo.get_by_user_name(&user_name).await {
            Ok(_) => return Err(AuthError::UserNameTaken),
            Err(AuthError::UserNotFound) => {}
            Err(e) => return Err(e),
        }

        let hasher = Arc::clone(&self.hasher);
        let password_hash =
            tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

        let user = self
            .user_repo
            .create(user_name, password_hash, user_role)
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            user_role = %user.user_role,
            "User registered"
        );

        Ok(RegisterOutput {
            user_id: user.user_id,
            user_role: user.user_role,
        })
    }
}
