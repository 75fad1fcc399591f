//! Error types
//!
//! Defines domain-specific error types for each module of the daemon core.

use thiserror::Error;

/// Authentication module errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username cannot be empty")]
    EmptyUser,
    #[error("Password cannot be empty")]
    EmptyPasswd,
    /// Returned for both unknown users and wrong passwords.
    #[error("Invalid username or password")]
    InvalidUsernameOrPass,
    #[error("Invalid token format")]
    InvalidTokenFormat,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Unknown user")]
    UnknownUser,
    #[error("Unexpected signing method: {0}")]
    UnexpectedSigningMethod(String),
    #[error("Token validity period is out of range")]
    ValidityOutOfRange,
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Team store errors
///
/// The messages of the token and team variants are compared literally by callers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TeamError {
    #[error("Token cannot be empty")]
    EmptyToken,
    #[error("Unknown team")]
    UnknownTeam,
    #[error("Unknown token")]
    UnknownToken,
    #[error("Team already exists")]
    TeamExists,
    #[error("Token already in use")]
    TokenInUse,
    #[error("Unknown tag: {0}")]
    UnknownTag(String),
    #[error("Invalid tag: {0:?}")]
    InvalidTag(String),
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

/// User lookup errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserStoreError {
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("User already exists: {0}")]
    UserExists(String),
    #[error("Username cannot be empty")]
    EmptyUsername,
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

/// General daemon error that encompasses all error types
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),
    #[error("Team store error: {0}")]
    Team(#[from] TeamError),
    #[error("User store error: {0}")]
    Users(#[from] UserStoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
