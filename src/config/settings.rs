use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(&'static str),

    #[error("Invalid value for {variable}: {value}")]
    InvalidValue { variable: &'static str, value: String },
}

/// Process-level configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub token_expiry_minutes: i64,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// `JWT_SECRET` is required; everything else has a development
    /// default.
    pub fn from_env() -> Result<Self, SettingsError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://wishlist.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| SettingsError::MissingVariable("JWT_SECRET"))?;

        let bind_addr =
            env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".to_string());

        let token_expiry_minutes = match env::var("TOKEN_EXPIRY_MINUTES") {
            Ok(value) => value.parse().map_err(|_| SettingsError::InvalidValue {
                variable: "TOKEN_EXPIRY_MINUTES",
                value,
            })?,
            Err(_) => 60,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            token_expiry_minutes,
        })
    }
}

impl std::fmt::Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Settings {{ database_url: {}, bind_addr: {}, token_expiry: {}min, jwt_secret: <redacted> }}",
            self.database_url, self.bind_addr, self.token_expiry_minutes
        )
    }
}
