//! Error handlers
//!
//! Classifies errors into caller-facing categories and logs them accordingly.

use crate::error::types::{AuthError, DaemonError, TeamError, UserStoreError};
use log::{error, warn};

/// Broad category of a daemon error, used by the transport layer to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Empty username, password, token or a malformed tag.
    InputValidation,
    /// Bad credentials, bad signatures, malformed or expired tokens.
    Credential,
    /// Unknown or duplicate teams, tokens, tags and users.
    StoreConsistency,
    /// Configuration and hashing failures.
    Internal,
}

/// Map an error onto its category
pub fn classify(err: &DaemonError) -> ErrorClass {
    match err {
        DaemonError::Auth(e) => match e {
            AuthError::EmptyUser | AuthError::EmptyPasswd => ErrorClass::InputValidation,
            AuthError::InvalidUsernameOrPass
            | AuthError::InvalidTokenFormat
            | AuthError::TokenExpired
            | AuthError::UnknownUser
            | AuthError::UnexpectedSigningMethod(_)
            | AuthError::Token(_) => ErrorClass::Credential,
            AuthError::ValidityOutOfRange => ErrorClass::Internal,
        },
        DaemonError::Team(e) => match e {
            TeamError::EmptyToken | TeamError::InvalidTag(_) => ErrorClass::InputValidation,
            TeamError::UnknownTeam
            | TeamError::UnknownToken
            | TeamError::TeamExists
            | TeamError::TokenInUse
            | TeamError::UnknownTag(_) => ErrorClass::StoreConsistency,
            TeamError::PasswordHash(_) => ErrorClass::Internal,
        },
        DaemonError::Users(e) => match e {
            UserStoreError::EmptyUsername => ErrorClass::InputValidation,
            UserStoreError::UserNotFound(_) | UserStoreError::UserExists(_) => {
                ErrorClass::StoreConsistency
            }
            UserStoreError::PasswordHash(_) => ErrorClass::Internal,
        },
        DaemonError::Config(_) => ErrorClass::Internal,
    }
}

/// Log a daemon error at a level matching its category
pub fn handle_error(err: &DaemonError) {
    match classify(err) {
        ErrorClass::Internal => error!("Daemon error: {}", err),
        class => warn!("Rejected request ({:?}): {}", class, err),
    }
}
