//! Login Use Case
//!
//! Verifies credentials and issues a bearer token.

use std::sync::Arc;
use std::time::Duration;

use platform::password::{ClearTextPassword, PasswordHasher};

use crate::application::token::TokenCodec;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_name::UserName;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub token: String,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    user_repo: Arc<R>,
    hasher: Arc<PasswordHasher>,
    codec: Arc<TokenCodec>,
    token_ttl: Duration,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(
        user_repo: Arc<R>,
        hasher: Arc<PasswordHasher>,
        codec: Arc<TokenCodec>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            codec,
            token_ttl,
        }
    }

    /// Unknown user and wrong password both end in `InvalidCredentials`,
    /// after the same amount of hashing work.
    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let user = match UserName::new(input.user_name) {
            Ok(user_name) => match self.user_repo.get_by_user_name(&user_name).await {
                Ok(user) => Some(user),
                Err(AuthError::UserNotFound) => None,
                Err(e) => return Err(e),
            },
            Err(_) => None,
        };

        let hasher = Arc::clone(&self.hasher);
        let stored_hash = user
            .as_ref()
            .map(|u| u.password_hash.as_phc_string().to_string());
        let verified = tokio::task::spawn_blocking(move || match stored_hash {
            Some(phc) => hasher.verify(&password, &phc),
            None => hasher.verify_decoy(&password),
        })
        .await?;

        let user = match user {
            Some(user) if verified => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let token = self.codec.issue(
            user.user_name.as_str(),
            user.user_role.code(),
            self.token_ttl,
        )?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User logged in"
        );

        Ok(LoginOutput { token })
    }
}
