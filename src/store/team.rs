//! Team registry
//!
//! Maps team emails to team records and opaque session tokens to the owning
//! team's email. Both maps sit behind a single lock, and every operation takes
//! it exactly once.

use std::collections::HashMap;

use log::{debug, info, warn};
use tokio::sync::Mutex;

use super::model::{Tag, Task, Team};
use crate::error::TeamError;

#[derive(Default)]
struct Registry {
    teams: HashMap<String, Team>,
    tokens: HashMap<String, String>,
}

impl Registry {
    fn team_by_token(&self, token: &str) -> Result<&Team, TeamError> {
        let email = self.tokens.get(token).ok_or(TeamError::UnknownToken)?;
        self.teams.get(email).ok_or(TeamError::UnknownTeam)
    }
}

/// Thread-safe registry of teams and their session tokens.
#[derive(Default)]
pub struct TeamStore {
    registry: Mutex<Registry>,
}

impl TeamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a team under its email. Fails if the email is already taken.
    pub async fn create_team(&self, team: Team) -> Result<(), TeamError> {
        let mut registry = self.registry.lock().await;

        if registry.teams.contains_key(&team.email) {
            return Err(TeamError::TeamExists);
        }

        info!("Created team {} ({})", team.name, team.email);
        registry.teams.insert(team.email.clone(), team);
        Ok(())
    }

    /// Replaces the record of an already registered team.
    ///
    /// Completion times already recorded for a tag are carried over, so a
    /// stale copy of the team never un-solves a task.
    pub async fn save_team(&self, mut team: Team) -> Result<(), TeamError> {
        let mut registry = self.registry.lock().await;

        match registry.teams.get_mut(&team.email) {
            Some(existing) => {
                keep_completions(&existing.tasks, &mut team.tasks);
                *existing = team;
                Ok(())
            }
            None => Err(TeamError::UnknownTeam),
        }
    }

    pub async fn get_team_by_email(&self, email: &str) -> Result<Team, TeamError> {
        let registry = self.registry.lock().await;
        registry
            .teams
            .get(email)
            .cloned()
            .ok_or(TeamError::UnknownTeam)
    }

    /// Returns all registered teams ordered by email.
    pub async fn get_teams(&self) -> Vec<Team> {
        let registry = self.registry.lock().await;
        let mut teams: Vec<Team> = registry.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.email.cmp(&b.email));
        teams
    }

    /// Assigns `token` to `team`. A team may hold several tokens.
    pub async fn create_token_for_team(&self, token: &str, team: &Team) -> Result<(), TeamError> {
        if token.is_empty() {
            return Err(TeamError::EmptyToken);
        }

        let mut registry = self.registry.lock().await;

        if !registry.teams.contains_key(&team.email) {
            return Err(TeamError::UnknownTeam);
        }

        if let Some(owner) = registry.tokens.get(token) {
            if owner != &team.email {
                warn!("Session token for team {} requested by team {}", owner, team.email);
                return Err(TeamError::TokenInUse);
            }
        }

        registry
            .tokens
            .insert(token.to_string(), team.email.clone());
        debug!("Issued session token for team {}", team.email);
        Ok(())
    }

    /// Returns the current record of the team owning `token`.
    pub async fn get_team_by_token(&self, token: &str) -> Result<Team, TeamError> {
        let registry = self.registry.lock().await;
        registry.team_by_token(token).cloned()
    }

    /// Removes a token mapping. The empty token is always accepted as a no-op.
    pub async fn delete_token(&self, token: &str) -> Result<(), TeamError> {
        if token.is_empty() {
            return Ok(());
        }

        let mut registry = self.registry.lock().await;

        match registry.tokens.remove(token) {
            Some(email) => {
                debug!("Revoked session token for team {}", email);
                Ok(())
            }
            None => Err(TeamError::UnknownToken),
        }
    }

    /// Solves `tag` for the team owning `token` within one critical section.
    pub async fn solve_task_for_team(&self, token: &str, tag: &Tag) -> Result<(), TeamError> {
        let mut registry = self.registry.lock().await;

        let email = registry
            .tokens
            .get(token)
            .cloned()
            .ok_or(TeamError::UnknownToken)?;
        let team = registry
            .teams
            .get_mut(&email)
            .ok_or(TeamError::UnknownTeam)?;

        team.solve_task_by_tag(tag)
    }
}

/// Copies completion times from `stored` onto matching `incoming` tasks.
/// Tasks sharing a tag are paired in order.
fn keep_completions(stored: &[Task], incoming: &mut [Task]) {
    let mut taken = vec![false; stored.len()];

    for task in incoming.iter_mut() {
        let matched = stored
            .iter()
            .enumerate()
            .find(|(i, old)| !taken[*i] && old.flag_tag == task.flag_tag);

        if let Some((i, old)) = matched {
            taken[i] = true;
            if old.completed_at.is_some() {
                task.completed_at = old.completed_at;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::model::Task;

    fn test_team() -> Team {
        Team {
            name: "Test team".into(),
            email: "tkp@tkp.dk".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_duplicate_team() {
        let ts = TeamStore::new();
        ts.create_team(test_team()).await.unwrap();

        let mut other = test_team();
        other.name = "Other team".into();
        assert_eq!(ts.create_team(other).await, Err(TeamError::TeamExists));

        let stored = ts.get_team_by_email("tkp@tkp.dk").await.unwrap();
        assert_eq!(stored.name, "Test team");
        assert_eq!(ts.get_teams().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_token() {
        struct Case {
            name: &'static str,
            team: Option<Team>,
            token: &'static str,
            err: Option<&'static str>,
        }

        let cases = [
            Case {
                name: "Normal",
                team: Some(test_team()),
                token: "some-token",
                err: None,
            },
            Case {
                name: "Empty token",
                team: Some(test_team()),
                token: "",
                err: Some("Token cannot be empty"),
            },
            Case {
                name: "Unknown team",
                team: None,
                token: "some-token",
                err: Some("Unknown team"),
            },
        ];

        for case in cases {
            let ts = TeamStore::new();

            let team = match case.team {
                Some(team) => {
                    ts.create_team(team.clone()).await.unwrap();
                    team
                }
                None => Team::default(),
            };

            let result = ts.create_token_for_team(case.token, &team).await;
            match (result, case.err) {
                (Ok(()), None) => {}
                (Err(e), Some(expected)) => assert_eq!(e.to_string(), expected, "{}", case.name),
                (result, expected) => {
                    panic!("{}: got {:?}, expected {:?}", case.name, result, expected)
                }
            }
        }
    }

    #[tokio::test]
    async fn test_multiple_tokens_per_team() {
        let ts = TeamStore::new();
        let team = test_team();
        ts.create_team(team.clone()).await.unwrap();

        ts.create_token_for_team("first", &team).await.unwrap();
        ts.create_token_for_team("second", &team).await.unwrap();

        ts.delete_token("first").await.unwrap();
        assert_eq!(
            ts.get_team_by_token("first").await,
            Err(TeamError::UnknownToken)
        );
        assert_eq!(
            ts.get_team_by_token("second").await.unwrap().email,
            "tkp@tkp.dk"
        );
    }

    #[tokio::test]
    async fn test_token_cannot_move_to_another_team() {
        let ts = TeamStore::new();
        let a = Team {
            email: "a@x.dk".into(),
            ..Default::default()
        };
        let b = Team {
            email: "b@x.dk".into(),
            ..Default::default()
        };
        ts.create_team(a.clone()).await.unwrap();
        ts.create_team(b.clone()).await.unwrap();

        ts.create_token_for_team("tok", &a).await.unwrap();
        assert_eq!(
            ts.create_token_for_team("tok", &b).await,
            Err(TeamError::TokenInUse)
        );
        assert_eq!(ts.get_team_by_token("tok").await.unwrap().email, "a@x.dk");

        // Same owner again is accepted
        ts.create_token_for_team("tok", &a).await.unwrap();

        // Once deleted, the token is free for another team
        ts.delete_token("tok").await.unwrap();
        ts.create_token_for_team("tok", &b).await.unwrap();
        assert_eq!(ts.get_team_by_token("tok").await.unwrap().email, "b@x.dk");
    }

    #[tokio::test]
    async fn test_save_team_keeps_solved_tasks() {
        let ts = TeamStore::new();
        let tag = Tag::new("abc").unwrap();
        let team = Team {
            name: "Test team".into(),
            email: "tkp@tkp.dk".into(),
            tasks: vec![Task::new(tag.clone()), Task::new(Tag::new("def").unwrap())],
            ..Default::default()
        };
        ts.create_team(team.clone()).await.unwrap();
        ts.create_token_for_team("token", &team).await.unwrap();

        ts.solve_task_for_team("token", &tag).await.unwrap();
        let solved_at = ts.get_team_by_token("token").await.unwrap().tasks[0].completed_at;
        assert!(solved_at.is_some());

        let mut stale = team.clone();
        stale.name = "Renamed".into();
        ts.save_team(stale).await.unwrap();

        let stored = ts.get_team_by_token("token").await.unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.tasks[0].completed_at, solved_at);
        assert!(!stored.tasks[1].is_completed());
    }

    #[tokio::test]
    async fn test_delete_token() {
        let cases = [
            ("Normal", "some_token", None),
            ("Empty token", "", None),
            ("Unknown token", "some_other_token", Some("Unknown token")),
        ];

        for (name, delete_token, err) in cases {
            let ts = TeamStore::new();
            let team = test_team();
            ts.create_team(team.clone()).await.unwrap();
            ts.create_token_for_team("some_token", &team).await.unwrap();

            match (ts.delete_token(delete_token).await, err) {
                (Ok(()), None) => {}
                (Err(e), Some(expected)) => assert_eq!(e.to_string(), expected, "{name}"),
                (result, expected) => panic!("{name}: got {result:?}, expected {expected:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_delete_empty_token_on_empty_store() {
        let ts = TeamStore::new();
        assert!(ts.delete_token("").await.is_ok());
    }

    #[tokio::test]
    async fn test_get_team_by_token_reflects_saved_team() {
        let ts = TeamStore::new();
        let team = test_team();
        ts.create_team(team.clone()).await.unwrap();
        ts.create_token_for_team("token", &team).await.unwrap();

        let mut renamed = team.clone();
        renamed.name = "Renamed".into();
        ts.save_team(renamed).await.unwrap();

        assert_eq!(ts.get_team_by_token("token").await.unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn test_save_unknown_team() {
        let ts = TeamStore::new();
        assert_eq!(ts.save_team(test_team()).await, Err(TeamError::UnknownTeam));
    }

    #[tokio::test]
    async fn test_get_teams_sorted() {
        let ts = TeamStore::new();
        for email in ["c@x.dk", "a@x.dk", "b@x.dk"] {
            ts.create_team(Team {
                email: email.into(),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let emails: Vec<String> = ts.get_teams().await.into_iter().map(|t| t.email).collect();
        assert_eq!(emails, ["a@x.dk", "b@x.dk", "c@x.dk"]);
    }

    #[tokio::test]
    async fn test_solve_task_for_team() {
        let ts = TeamStore::new();
        let tag = Tag::new("abc").unwrap();
        let team = Team {
            tasks: vec![Task::new(tag.clone())],
            ..test_team()
        };
        ts.create_team(team.clone()).await.unwrap();
        ts.create_token_for_team("token", &team).await.unwrap();

        ts.solve_task_for_team("token", &tag).await.unwrap();
        let stored = ts.get_team_by_token("token").await.unwrap();
        assert!(stored.tasks[0].is_completed());

        let unknown = Tag::new("unknown-tag").unwrap();
        assert_eq!(
            ts.solve_task_for_team("token", &unknown).await,
            Err(TeamError::UnknownTag("unknown-tag".into()))
        );
        assert_eq!(
            ts.solve_task_for_team("nope", &tag).await,
            Err(TeamError::UnknownToken)
        );
    }
}
