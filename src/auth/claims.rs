//! Session token claims
//!
//! Wire keys are short: `un` (username), `su` (superuser), `vu` (valid-until, Unix seconds).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AuthError;

pub const USERNAME_KEY: &str = "un";
pub const SUPERUSER_KEY: &str = "su";
pub const VALID_UNTIL_KEY: &str = "vu";

/// Payload signed into a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "un")]
    pub username: String,
    #[serde(rename = "su")]
    pub super_user: bool,
    #[serde(rename = "vu")]
    pub valid_until: i64,
}

/// Claims as decoded from an untrusted token, before field checks.
pub(crate) type RawClaims = Map<String, Value>;

pub(crate) fn username_claim(claims: &RawClaims) -> Result<&str, AuthError> {
    claims
        .get(USERNAME_KEY)
        .and_then(Value::as_str)
        .ok_or(AuthError::InvalidTokenFormat)
}

/// Integral or floating Unix seconds are both accepted.
pub(crate) fn valid_until_claim(claims: &RawClaims) -> Result<i64, AuthError> {
    let value = claims
        .get(VALID_UNTIL_KEY)
        .ok_or(AuthError::InvalidTokenFormat)?;

    value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs as i64))
        .ok_or(AuthError::InvalidTokenFormat)
}
