//! Authentication system
//!
//! Handles session token issuance and verification against a user store.

pub mod authenticator;
pub mod claims;

pub use authenticator::Authenticator;
pub use claims::Claims;
