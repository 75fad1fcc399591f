//! Session token issuance and verification
//!
//! Tokens are HMAC-signed JWTs carrying [`Claims`]. The signing key is shared
//! between the issuing and verifying processes and is handed to the
//! `Authenticator` at construction time.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use log::{debug, warn};
use serde::Deserialize;

use super::claims::{Claims, RawClaims, username_claim, valid_until_claim};
use crate::config::{DEFAULT_TOKEN_VALIDITY_DAYS, DaemonConfig};
use crate::error::AuthError;
use crate::session::{AuthContext, RequestContext};
use crate::store::UserStore;
use crate::utils::validation::normalize_username;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
const ACCEPTED_ALGORITHM_NAMES: [&str; 3] = ["HS256", "HS384", "HS512"];

/// The only header field inspected before the signature is checked.
#[derive(Deserialize)]
struct DeclaredHeader {
    alg: String,
}

/// Reads the raw `alg` of a token header, including names the JWT library
/// does not know (such as `none`).
fn declared_algorithm(token: &str) -> Option<String> {
    let segment = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
    serde_json::from_slice::<DeclaredHeader>(&bytes)
        .ok()
        .map(|header| header.alg)
}

/// Issues and verifies session tokens against a user store.
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: chrono::Duration,
}

impl Authenticator {
    /// Creates an authenticator issuing tokens valid for 31 days.
    pub fn new(users: Arc<dyn UserStore>, key: &str) -> Self {
        Self::with_validity(
            users,
            key,
            chrono::Duration::days(DEFAULT_TOKEN_VALIDITY_DAYS as i64),
        )
    }

    pub fn from_config(users: Arc<dyn UserStore>, config: &DaemonConfig) -> Self {
        Self::with_validity(users, &config.signing_key, config.token_validity())
    }

    fn with_validity(users: Arc<dyn UserStore>, key: &str, validity: chrono::Duration) -> Self {
        Self {
            users,
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validity,
        }
    }

    /// Exchanges a username and password for a signed session token.
    ///
    /// Unknown users and wrong passwords both yield
    /// [`AuthError::InvalidUsernameOrPass`].
    pub async fn token_for_user(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = normalize_username(username);

        if username.is_empty() {
            return Err(AuthError::EmptyUser);
        }

        if password.is_empty() {
            return Err(AuthError::EmptyPasswd);
        }

        let user = match self.users.get_user_by_username(&username).await {
            Ok(user) => user,
            Err(e) => {
                debug!("Login rejected for {}: {}", username, e);
                return Err(AuthError::InvalidUsernameOrPass);
            }
        };

        if !user.is_correct_password(password) {
            debug!("Login rejected for {}: wrong password", username);
            return Err(AuthError::InvalidUsernameOrPass);
        }

        let claims = Claims {
            username: user.username,
            super_user: user.super_user,
            valid_until: Utc::now()
                .checked_add_signed(self.validity)
                .ok_or(AuthError::ValidityOutOfRange)?
                .timestamp(),
        };

        let token = self.sign(&claims)?;
        debug!("Issued session token for {}", claims.username);
        Ok(token)
    }

    /// Verifies a session token and returns `ctx` extended with the caller's identity.
    ///
    /// `ctx` itself is never modified, so on error the caller still holds the
    /// original context.
    pub async fn authenticate_user_by_token(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<RequestContext, AuthError> {
        let claims = self.verify_signature(token)?;

        let username = username_claim(&claims)?;

        let user = match self.users.get_user_by_username(username).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Validly signed token for missing user {}: {}", username, e);
                return Err(AuthError::UnknownUser);
            }
        };

        let valid_until = valid_until_claim(&claims)?;
        if valid_until < Utc::now().timestamp() {
            debug!("Expired session token for {}", user.username);
            return Err(AuthError::TokenExpired);
        }

        Ok(ctx.with_identity(AuthContext::new(user.username, user.super_user)))
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        Ok(encode(
            &Header::new(SIGNING_ALGORITHM),
            claims,
            &self.encoding_key,
        )?)
    }

    /// Checks the declared algorithm, then the signature.
    fn verify_signature(&self, token: &str) -> Result<RawClaims, AuthError> {
        if let Some(alg) = declared_algorithm(token) {
            if !ACCEPTED_ALGORITHM_NAMES.contains(&alg.as_str()) {
                warn!("Rejected session token signed with {}", alg);
                return Err(AuthError::UnexpectedSigningMethod(alg));
            }
        }

        let header = decode_header(token)?;

        let mut validation = Validation::new(header.alg);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data = decode::<RawClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
