//! Request session state
//!
//! Carries the caller identity recovered from a session token.

pub mod context;

pub use context::{AuthContext, RequestContext};
