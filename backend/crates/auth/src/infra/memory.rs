//! In-Memory Repository Implementation
//!
//! One `RwLock` around the whole map: writers are exclusive, readers run
//! concurrently. Records live for the lifetime of the process.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use platform::password::HashedPassword;
use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_name::UserName, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Process-local user store keyed by user name
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserName, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(
        &self,
        user_name: UserName,
        password_hash: HashedPassword,
        user_role: UserRole,
    ) -> AuthResult<User> {
        let mut users = self.users.write().await;

        match users.entry(user_name) {
            Entry::Occupied(_) => Err(AuthError::UserNameTaken),
            Entry::Vacant(slot) => {
                let user = User::new(slot.key().clone(), password_hash, user_role);
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn get_by_user_name(&self, user_name: &UserName) -> AuthResult<User> {
        self.users
            .read()
            .await
            .get(user_name)
            .cloned()
            .ok_or(AuthError::UserNotFound)
    }
}
