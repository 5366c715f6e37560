use serde::{Deserialize, Serialize};

use crate::types::db::Role;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Username at issue time
    pub username: String,

    /// Role at issue time
    pub role: Role,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Caller identity resolved from a bearer token.
///
/// Only ever constructed after the token subject has been checked
/// against the users table; holding an `Identity` means the user
/// existed when the request started.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}
