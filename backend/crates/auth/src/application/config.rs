//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

pub use platform::password::HashCost;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 key for bearer tokens (32 bytes)
    pub token_secret: [u8; 32],
    /// Lifetime of issued tokens (1 hour)
    pub token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Argon2id work factor, fixed for the life of the process
    pub hash_cost: HashCost,
}

impl AuthConfig {
    pub fn new(token_secret: [u8; 32]) -> Self {
        Self {
            token_secret,
            token_ttl: Duration::from_secs(3600),
            password_pepper: None,
            hash_cost: HashCost::default(),
        }
    }

    /// Create config with a random token secret (for development).
    ///
    /// Tokens stop verifying when the process restarts.
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self::new(secret)
    }

    /// Development config: random secret and a lighter hash cost
    pub fn development() -> Self {
        Self {
            hash_cost: HashCost {
                memory_kib: 8_192,
                iterations: 1,
                parallelism: 1,
            },
            ..Self::with_random_secret()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::with_random_secret()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}
