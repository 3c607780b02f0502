//! Bearer Token Codec
//!
//! Stateless HS256 tokens in JWT compact form, built on `jsonwebtoken`.
//!
//! Claims are readable by anyone holding the token; only the secret holder
//! can produce a valid signature. Nothing is stored server-side.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, crypto, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a token was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature missing, undecodable or not matching
    #[error("signature verification failed")]
    Invalid,
    /// Valid signature, past `exp`
    #[error("token expired")]
    Expired,
    /// Not three segments, or signed content that is not the expected JSON
    #[error("token is malformed")]
    Malformed,
    /// Could not build a token (never returned by verification)
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            JwtErrorKind::InvalidSignature => Self::Invalid,
            JwtErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

/// Token payload. Registered JWT names on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub username: String,
    pub role: String,
    /// Seconds since the Unix epoch
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Seconds since the Unix epoch
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// Issues and verifies bearer tokens under one secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: [u8; 32]) -> Self {
        // Expiry is checked against a caller-supplied clock in `verify_at`
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            validation,
        }
    }

    /// Issue a token valid from now for `ttl`
    pub fn issue(&self, username: &str, role: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(username, role, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        username: &str,
        role: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let issued_at = now.timestamp();
        let expires_at = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|ttl| issued_at.checked_add(ttl))
            .ok_or_else(|| TokenError::Signing(format!("TTL out of range: {ttl:?}")))?;

        let claims = Claims {
            username: username.to_string(),
            role: role.to_string(),
            issued_at,
            expires_at,
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify against the current time
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify as if the current time were `now`.
    ///
    /// The signature over `header.claims` is checked with HS256 before either
    /// segment is decoded, so a forged or tampered token is `Invalid` whatever
    /// its header or claims say.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(TokenError::Malformed);
        }

        let (signing_input, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
        let signed =
            crypto::verify(signature, signing_input.as_bytes(), &self.decoding_key, ALGORITHM)
                .map_err(|_| TokenError::Invalid)?;
        if !signed {
            return Err(TokenError::Invalid);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;
        if claims.expires_at <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
