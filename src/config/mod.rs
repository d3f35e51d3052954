//! Configuration management for Contabills Auth

use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;

/// Default token lifetime: 8 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 8 * 60 * 60;

/// Longest token lifetime accepted from configuration: 30 days.
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Default issuer stamped into every token.
pub const DEFAULT_ISSUER: &str = "Contabills";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Token signing configuration
    pub jwt: JwtConfig,
    /// Route-level access policy
    pub security: SecurityConfig,
    /// Logging configuration
    pub telemetry: TelemetryConfig,
    /// Users registered at startup
    pub seed_users: Vec<SeedUser>,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub token_ttl_secs: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SecurityConfig {
    /// Let every request through the route-level policy (local development only).
    /// Handlers that need a principal still reject anonymous callers.
    pub permit_all: bool,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "plain" or "json"
    pub log_format: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "plain".to_string(),
        }
    }
}

/// A user created at startup from `SEED_USERS`.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedUser")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").context("JWT_SECRET is required")?,
                issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
                token_ttl_secs: parse_token_ttl(env::var("JWT_TOKEN_TTL_SECS").ok().as_deref())
                    .context("Invalid JWT_TOKEN_TTL_SECS")?,
            },
            security: SecurityConfig {
                permit_all: env::var("SECURITY_PERMIT_ALL")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "plain".to_string()),
            },
            seed_users: match env::var("SEED_USERS") {
                Ok(raw) => parse_seed_users(&raw).context("Invalid SEED_USERS")?,
                Err(_) => Vec::new(),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// Token lifetime in seconds, `1..=MAX_TOKEN_TTL_SECS`. Unset means the default.
pub fn parse_token_ttl(raw: Option<&str>) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TOKEN_TTL_SECS);
    };

    let secs: i64 = raw.trim().parse().context("not an integer")?;
    if secs <= 0 {
        bail!("token lifetime must be positive, got {}", secs);
    }
    if secs > MAX_TOKEN_TTL_SECS {
        bail!(
            "token lifetime must not exceed {} seconds, got {}",
            MAX_TOKEN_TTL_SECS,
            secs
        );
    }
    Ok(secs)
}

/// Parse `email:password[:name]` entries separated by commas.
///
/// When the name is omitted the local part of the email is used.
pub fn parse_seed_users(raw: &str) -> Result<Vec<SeedUser>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let email = parts.next().unwrap_or_default().trim();
            let password = parts.next().unwrap_or_default().trim();
            if email.is_empty() || password.is_empty() {
                bail!("seed entry must be email:password[:name], got '{}'", email);
            }
            let name = match parts.next().map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => email.split('@').next().unwrap_or(email).to_string(),
            };
            Ok(SeedUser {
                email: email.to_string(),
                password: password.to_string(),
                name,
            })
        })
        .collect()
}
