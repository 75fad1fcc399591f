//! Error handling
//!
//! Defines error types and handling for the daemon core.

pub mod handlers;
pub mod types;

pub use handlers::{ErrorClass, classify, handle_error};
pub use types::*;
