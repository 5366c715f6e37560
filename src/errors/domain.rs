use juniper::{FieldError, IntoFieldError, Object, ScalarValue, Value};
use sea_orm::DbErr;
use thiserror::Error;

/// Closed set of domain error variants raised by the services.
///
/// Resolvers do not catch these; they propagate to the GraphQL boundary
/// where each becomes a response error with its message preserved
/// verbatim and the variant name exposed as a `code` extension.
/// Store-level failures (`Store`) are not translated and surface with
/// their native message.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No valid caller identity where one is required.
    #[error("User must be authenticated")]
    Unauthenticated,

    /// Caller identity present but lacks rights over the target entity.
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity does not exist; message names which one.
    #[error("{0}")]
    NotFound(String),

    /// State precondition violated (already reserved, password already
    /// set, password too short).
    #[error("{0}")]
    Conflict(String),

    /// Credential mismatch during login.
    #[error("{0}")]
    Unauthorized(String),

    /// Untranslated data-store failure (includes uniqueness violations).
    #[error("{0}")]
    Store(#[from] DbErr),

    /// Unexpected lower-level failure outside the data store
    /// (e.g. hashing or token signing).
    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        DomainError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        DomainError::Unauthorized(message.into())
    }

    /// Stable machine-readable code for the `extensions` map.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Unauthenticated => "UNAUTHENTICATED",
            DomainError::Forbidden(_) => "FORBIDDEN",
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::Conflict(_) => "CONFLICT",
            DomainError::Unauthorized(_) => "UNAUTHORIZED",
            DomainError::Store(_) | DomainError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl<S: ScalarValue> IntoFieldError<S> for DomainError {
    fn into_field_error(self) -> FieldError<S> {
        let mut extensions = Object::with_capacity(1);
        extensions.add_field("code", Value::scalar(self.code().to_owned()));
        FieldError::new(self.to_string(), Value::Object(extensions))
    }
}
