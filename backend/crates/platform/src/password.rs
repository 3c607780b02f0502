//! Password Hashing and Verification
//!
//! Argon2id with a work factor fixed at construction:
//! - PHC string output embeds algorithm, parameters and salt
//! - Clear text is zeroized on drop and redacted from `Debug`
//! - Verification never errors; every failure mode is `false`
//! - Optional pepper (application-wide secret) appended before hashing

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier as _, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::{random_bytes, to_base64url};

// ============================================================================
// Error Types
// ============================================================================

/// Password input rejected before hashing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must not be empty")]
    Empty,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Argon2 rejected the configured cost parameters
    #[error("Invalid hash cost: {0}")]
    InvalidCost(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, so the secret is never silently duplicated.
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("correct horse".to_string()).unwrap();
/// assert!(format!("{password:?}").contains("REDACTED"));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Accepts any non-empty input after NFKC normalization.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let raw = Zeroizing::new(raw);
        let normalized: String = raw.nfkc().collect();

        if normalized.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }

        Ok(Self(normalized))
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Restore from a stored PHC string
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory in KiB
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    /// OWASP recommendation: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// One-way password hasher with a fixed work factor
///
/// ```rust
/// use platform::password::{ClearTextPassword, HashCost, PasswordHasher};
///
/// let cost = HashCost { memory_kib: 64, iterations: 1, parallelism: 1 };
/// let hasher = PasswordHasher::new(cost, None).unwrap();
/// let password = ClearTextPassword::new("hunter2".to_string()).unwrap();
///
/// let hashed = hasher.hash(&password).unwrap();
/// assert!(hasher.verify(&password, hashed.as_phc_string()));
/// ```
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    pepper: Option<Zeroizing<Vec<u8>>>,
    /// Hash of a random secret at this hasher's cost, for [`Self::verify_decoy`]
    decoy: String,
}

impl PasswordHasher {
    pub fn new(cost: HashCost, pepper: Option<Vec<u8>>) -> Result<Self, PasswordHashError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| PasswordHashError::InvalidCost(e.to_string()))?;

        let mut hasher = Self {
            params,
            pepper: pepper.map(Zeroizing::new),
            decoy: String::new(),
        };

        let decoy = ClearTextPassword(to_base64url(&random_bytes(16)));
        hasher.decoy = hasher.hash(&decoy)?.hash;

        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn pepper(&self) -> Option<&[u8]> {
        self.pepper.as_deref().map(Vec::as_slice)
    }

    /// Hash with a fresh 128-bit random salt
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let bytes = password.peppered(self.pepper());
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(&bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Verify `password` against a stored PHC string.
    ///
    /// `false` for a wrong password, an unparseable hash, another algorithm,
    /// or parameters that differ from this hasher's cost.
    pub fn verify(&self, password: &ClearTextPassword, phc: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(phc) else {
            return false;
        };

        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return false;
        }

        let same_cost = Params::try_from(&parsed).is_ok_and(|p| {
            p.m_cost() == self.params.m_cost()
                && p.t_cost() == self.params.t_cost()
                && p.p_cost() == self.params.p_cost()
        });
        if !same_cost {
            return false;
        }

        let bytes = password.peppered(self.pepper());

        // Argon2 uses constant-time comparison internally
        self.argon2().verify_password(&bytes, &parsed).is_ok()
    }

    /// Spend the same time as a real [`Self::verify`] and return `false`.
    ///
    /// Used when there is no stored hash to check against, so that
    /// "no such account" and "wrong password" take equally long.
    pub fn verify_decoy(&self, password: &ClearTextPassword) -> bool {
        let _ = self.verify(password, &self.decoy);
        false
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
