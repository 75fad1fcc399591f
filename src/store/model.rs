//! Team data model
//!
//! Defines teams, the tasks they work on, and the tags that identify a task's flag.

use std::fmt;

use chrono::{DateTime, Utc};
use log::debug;

use crate::error::TeamError;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::is_valid_tag;

/// Identifier of a task's solving flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Validates and wraps a raw tag.
    pub fn new(raw: &str) -> Result<Self, TeamError> {
        if !is_valid_tag(raw) {
            return Err(TeamError::InvalidTag(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Tag {
    type Error = TeamError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Tag::new(raw)
    }
}

/// A task assigned to a team. `completed_at` is set once, when the flag is solved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub flag_tag: Tag,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(flag_tag: Tag) -> Self {
        Self {
            flag_tag,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// A registered team. The email is its unique key inside a [`TeamStore`](super::TeamStore).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub tasks: Vec<Task>,
}

impl Team {
    /// Creates a team, hashing the given plaintext password.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
        tasks: Vec<Task>,
    ) -> Result<Self, TeamError> {
        let hashed_password =
            hash_password(password).map_err(|e| TeamError::PasswordHash(e.to_string()))?;

        Ok(Self {
            name: name.into(),
            email: email.into(),
            hashed_password,
            tasks,
        })
    }

    pub fn is_correct_password(&self, password: &str) -> bool {
        verify_password(password, &self.hashed_password)
    }

    /// Marks the first task carrying `tag` as completed.
    ///
    /// Solving an already completed task succeeds and keeps the original completion time.
    pub fn solve_task_by_tag(&mut self, tag: &Tag) -> Result<(), TeamError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| &task.flag_tag == tag)
            .ok_or_else(|| TeamError::UnknownTag(tag.to_string()))?;

        match task.completed_at {
            Some(at) => debug!("Team {} already solved {} at {}", self.email, tag, at),
            None => {
                let now = Utc::now();
                task.completed_at = Some(now);
                debug!("Team {} solved {} at {}", self.email, tag, now);
            }
        }

        Ok(())
    }
}
