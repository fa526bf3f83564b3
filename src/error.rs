//! Error type shared by the auth and book services.
//!
//! Services return [`Error`] directly; the HTTP layer turns each variant into
//! a status code and a JSON body (see `crate::http`). Nothing is retried.

use sea_orm::DbErr;
use thiserror::Error;

/// Failure of a catalog operation.
#[derive(Debug, Error)]
pub enum Error {
    /// A request field is missing or malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// Login identity unknown or password wrong. The two are not told apart.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, unknown, expired or revoked bearer token on a gated route.
    #[error("unauthenticated")]
    Unauthorized,

    /// Logout with a token that is no longer valid.
    #[error("token is not valid")]
    InvalidToken,

    /// Registration with an identity that is already taken.
    #[error("the email {0} has already been taken")]
    DuplicateIdentity(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// A path key that cannot name any record, such as `/books/abc`.
    #[error("{entity} {key:?} not found")]
    UnknownKey { entity: &'static str, key: String },

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Stable machine-readable code, written into error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unauthorized => "unauthorized",
            Self::InvalidToken => "invalid_token",
            Self::DuplicateIdentity(_) => "duplicate_identity",
            Self::NotFound { .. } | Self::UnknownKey { .. } => "not_found",
            Self::Database(_) | Self::PasswordHash(_) => "internal_error",
        }
    }
}

/// Result type alias for catalog operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
