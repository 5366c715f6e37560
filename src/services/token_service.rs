use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::errors::DomainError;
use crate::types::db::user;
use crate::types::internal::auth::Claims;

/// An issued bearer credential, returned to the caller as an opaque
/// string of the form `Bearer <jwt>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub value: String,
}

/// Issues and decodes the signed bearer tokens carrying
/// (user id, username, role).
pub struct TokenService {
    jwt_secret: String,
    expiry_minutes: i64,
}

impl TokenService {
    pub fn new(jwt_secret: String, expiry_minutes: i64) -> Self {
        Self {
            jwt_secret,
            expiry_minutes,
        }
    }

    /// Issue a signed token for the given user.
    pub fn issue(&self, user: &user::Model) -> Result<Token, DomainError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            exp: now + self.expiry_minutes * 60,
            iat: now,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| DomainError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(Token {
            value: format!("Bearer {}", token),
        })
    }

    /// Decode and validate a token, returning its claims.
    /// Expired or malformed tokens are rejected; the caller treats any
    /// failure as "unauthenticated", never as a hard error.
    pub fn decode(&self, token: &str) -> Result<Claims, DomainError> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|_| DomainError::Unauthenticated)?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("expiry_minutes", &self.expiry_minutes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::db::Role;

    fn test_user() -> user::Model {
        user::Model {
            id: "user-1".to_string(),
            name: "Tester".to_string(),
            username: "tester".to_string(),
            password_hash: None,
            role: Role::User,
            created_at: 0,
        }
    }

    fn service() -> TokenService {
        TokenService::new("test-secret-key-minimum-32-characters-long".to_string(), 60)
    }

    #[test]
    fn issued_token_has_bearer_prefix() {
        let token = service().issue(&test_user()).unwrap();
        assert!(token.value.starts_with("Bearer "));
    }

    #[test]
    fn issued_token_decodes_to_same_identity() {
        let service = service();
        let token = service.issue(&test_user()).unwrap();

        let raw = token.value.strip_prefix("Bearer ").unwrap();
        let claims = service.decode(raw).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "tester");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let issuing = service();
        let verifying =
            TokenService::new("wrong-secret-key-minimum-32-characters".to_string(), 60);

        let token = issuing.issue(&test_user()).unwrap();
        let raw = token.value.strip_prefix("Bearer ").unwrap();

        let result = verifying.decode(raw);
        assert!(matches!(result, Err(DomainError::Unauthenticated)));
    }

    #[test]
    fn decode_rejects_expired_token() {
        // Negative expiry issues a token that is already expired
        let service = TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
            -60,
        );
        let token = service.issue(&test_user()).unwrap();
        let raw = token.value.strip_prefix("Bearer ").unwrap();

        assert!(service.decode(raw).is_err());
    }

    #[test]
    fn debug_does_not_expose_secret() {
        let output = format!("{:?}", service());
        assert!(!output.contains("test-secret-key"));
        assert!(output.contains("<redacted>"));
    }
}
