//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain vocabulary:
//! - Cryptographic primitives (base64url, CSPRNG)
//! - Password hashing (Argon2id)

pub mod crypto;
pub mod password;
