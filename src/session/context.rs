//! Module `context`
//!
//! Defines the request-scoped identity produced by token verification and the
//! `RequestContext` that carries it through request handling.

use std::net::SocketAddr;

/// Identity of an authenticated caller.
///
/// Lives for the remainder of one request's processing and is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    username: String,
    super_user: bool,
}

impl AuthContext {
    pub fn new(username: impl Into<String>, super_user: bool) -> Self {
        Self {
            username: username.into(),
            super_user,
        }
    }

    /// Returns the authenticated username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns whether the caller holds superuser privileges.
    pub fn is_super_user(&self) -> bool {
        self.super_user
    }
}

/// State attached to a single caller request.
///
/// Verification never mutates a context in place; it hands back a derived copy
/// via [`RequestContext::with_identity`], so a failed attempt leaves the
/// caller's context exactly as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    peer: Option<SocketAddr>,
    identity: Option<AuthContext>,
}

impl RequestContext {
    /// Creates an unauthenticated context for a request from the given peer.
    pub fn new(peer: Option<SocketAddr>) -> Self {
        Self {
            peer,
            identity: None,
        }
    }

    /// Returns a copy of this context carrying the given identity.
    pub fn with_identity(&self, identity: AuthContext) -> Self {
        Self {
            peer: self.peer,
            identity: Some(identity),
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    /// Returns the peer address of the request if known.
    pub fn peer(&self) -> Option<&SocketAddr> {
        self.peer.as_ref()
    }

    /// Returns the verified identity, if any.
    pub fn identity(&self) -> Option<&AuthContext> {
        self.identity.as_ref()
    }

    /// Returns the authenticated username, if any.
    pub fn username(&self) -> Option<&str> {
        self.identity.as_ref().map(AuthContext::username)
    }

    /// Returns whether the caller is an authenticated superuser.
    pub fn is_super_user(&self) -> bool {
        self.identity.as_ref().is_some_and(AuthContext::is_super_user)
    }

    /// Returns whether a verified identity is attached.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
