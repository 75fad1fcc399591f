//! Utility functions
//!
//! Provides logging, password hashing, and validation utilities.

pub mod logging;
pub mod password;
pub mod validation;
