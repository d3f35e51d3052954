//! JWT token handling
//!
//! The only place the signing key is referenced. Tokens are compact HS256
//! JWS values carrying `sub`, `iss`, `iat` and `exp`.

use crate::config::JwtConfig;
use crate::domain::Token;
use crate::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (principal email)
    pub sub: String,
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Issued at (Unix timestamp). Older tokens may not carry it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Reasons a token fails verification
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature mismatch")]
    SignatureMismatch,

    #[error("token issuer mismatch (expected {expected}, found {found})")]
    IssuerMismatch { expected: String, found: String },

    #[error("token has expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenCodec {
    issuer: String,
    token_ttl_secs: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            issuer: config.issuer.clone(),
            token_ttl_secs: config.token_ttl_secs,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            clock,
        }
    }

    /// Signature and structure only. Issuer and expiry are checked against
    /// the codec's own settings and clock after decoding.
    fn validation() -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = 0;
        v.validate_exp = false;
        v.validate_aud = false;
        v.required_spec_claims.clear();
        v
    }

    /// Issue a token for the given subject
    pub fn issue(&self, subject: &str) -> Result<Token> {
        let now = self.clock.now();
        let expires_at = Duration::try_seconds(self.token_ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "token lifetime of {}s is out of range",
                    self.token_ttl_secs
                ))
            })?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            iat: Some(now.timestamp()),
            exp: expires_at.timestamp(),
        };

        let value = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(Token::bearer(value))
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> std::result::Result<TokenClaims, TokenError> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &Self::validation())?.claims;

        if claims.iss != self.issuer {
            return Err(TokenError::IssuerMismatch {
                expected: self.issuer.clone(),
                found: claims.iss,
            });
        }

        if self.clock.now().timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
