//! NTP daemon core
//!
//! Session authentication and team/token bookkeeping for the training daemon:
//! signed session tokens tied to user identities, and an in-memory registry
//! of teams, their session tokens and task completion.

pub mod auth;
pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod utils;

pub use auth::{Authenticator, Claims};
pub use crate::config::DaemonConfig;
pub use error::{AuthError, DaemonError, TeamError, UserStoreError};
pub use session::{AuthContext, RequestContext};
pub use store::{MemoryUserStore, Tag, Task, Team, TeamStore, User, UserStore};
