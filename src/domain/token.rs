//! Issued session token

use serde::{Deserialize, Serialize};

/// Token kind reported to clients.
pub const TOKEN_KIND: &str = "JWT";

/// Authorization scheme clients must use when presenting the token.
pub const TOKEN_SCHEME: &str = "Bearer";

/// A signed token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub prefix: String,
}

impl Token {
    pub fn bearer(value: String) -> Self {
        Self {
            token: value,
            kind: TOKEN_KIND.to_string(),
            prefix: TOKEN_SCHEME.to_string(),
        }
    }
}
