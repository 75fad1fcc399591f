//! Storage
//!
//! In-memory registries for teams and the user-lookup seam used by authentication.

pub mod model;
pub mod team;
pub mod user;

pub use model::{Tag, Task, Team};
pub use team::TeamStore;
pub use user::{MemoryUserStore, User, UserStore};
