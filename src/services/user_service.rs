use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::errors::DomainError;
use crate::services::crypto;
use crate::services::token_service::{Token, TokenService};
use crate::stores::UserStore;
use crate::types::db::user;
use crate::types::db::Role;

const PASSWORD_MIN_LENGTH: usize = 8;

/// User domain service: signup, the one-shot password-set flow, and
/// login.
///
/// A user's password moves through exactly one transition,
/// unset -> set, via `create_password`. There is no change-password
/// path and no way back to unset.
pub struct UserService {
    db: DatabaseConnection,
    users: Arc<UserStore>,
    tokens: Arc<TokenService>,
}

impl UserService {
    pub fn new(db: DatabaseConnection, users: Arc<UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { db, users, tokens }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<user::Model>, DomainError> {
        self.users.find_by_id(id).await
    }

    /// Exact username match.
    pub async fn find_by_name(&self, username: &str) -> Result<Option<user::Model>, DomainError> {
        self.users.find_by_username(username).await
    }

    pub async fn find_all(&self) -> Result<Vec<user::Model>, DomainError> {
        self.users.find_all().await
    }

    /// Create a user. The password is optional at creation; when
    /// supplied it is length-checked and hashed before persisting.
    /// Username collisions surface as the untranslated store error.
    pub async fn insert(
        &self,
        name: String,
        username: String,
        role: Role,
        password: Option<String>,
    ) -> Result<user::Model, DomainError> {
        let password_hash = match password {
            Some(plaintext) => {
                check_password_length(&plaintext)?;
                Some(crypto::hash_password(&plaintext)?)
            }
            None => None,
        };

        let created = self
            .users
            .insert(&self.db, name, username, role, password_hash)
            .await?;
        tracing::info!(user_id = %created.id, "user created");
        Ok(created)
    }

    /// Set the password for a user that does not have one yet. This is
    /// the only password-setting path; an existing password is never
    /// overwritten. Returns a fresh signed token on success.
    pub async fn create_password(
        &self,
        user_id: &str,
        plaintext: &str,
    ) -> Result<Token, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User does not exist"))?;

        if user.password_hash.is_some() {
            return Err(DomainError::conflict("User already has password"));
        }
        check_password_length(plaintext)?;

        let password_hash = crypto::hash_password(plaintext)?;
        let updated = self
            .users
            .set_password_hash(&self.db, user_id, password_hash)
            .await?;
        if !updated {
            // A concurrent create_password won between our read and
            // the guarded write.
            return Err(DomainError::conflict("User already has password"));
        }

        tracing::info!(user_id = %user.id, "password set");
        self.tokens.issue(&user)
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// A user with no password set fails with the same message as a
    /// wrong password, so account state never leaks through login.
    pub async fn login(&self, username: &str, plaintext: &str) -> Result<Token, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("No user found with username {}", username))
            })?;

        let verified = match &user.password_hash {
            Some(stored_hash) => crypto::verify_password(plaintext, stored_hash),
            None => false,
        };
        if !verified {
            tracing::debug!(username, "login rejected");
            return Err(DomainError::unauthorized("Password not correct"));
        }

        self.tokens.issue(&user)
    }
}

fn check_password_length(plaintext: &str) -> Result<(), DomainError> {
    if plaintext.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(DomainError::conflict(
            "Password min length is 8 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_length_boundary() {
        assert!(check_password_length("1234567").is_err());
        assert!(check_password_length("12345678").is_ok());
    }

    #[test]
    fn short_password_message_is_exact() {
        let err = check_password_length("short").unwrap_err();
        assert_eq!(err.to_string(), "Password min length is 8 characters");
    }
}
