//! Team, members and the persisted snapshot of a team.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use super::ids::{MemberId, TaskId, TeamId};
use super::task::Task;

/// The scheduling tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

/// A team member. Names are unique within a team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Everything a store knows about one team.
///
/// `tasks` includes soft-deleted tasks so that historical assignments can
/// still be rendered; `assignments` is the full, immutable history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub team: Team,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl TeamSnapshot {
    pub fn new(team: Team) -> Self {
        Self {
            team,
            members: Vec::new(),
            tasks: Vec::new(),
            assignments: Vec::new(),
        }
    }

    /// Tasks that may be scheduled (not soft-deleted).
    pub fn active_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_active())
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Member id → display name.
    pub fn member_names(&self) -> HashMap<MemberId, &str> {
        self.members
            .iter()
            .map(|m| (m.id, m.name.as_str()))
            .collect()
    }

    /// Assignments dated strictly before `date`.
    pub fn history_before(&self, date: NaiveDate) -> Vec<Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.date < date)
            .cloned()
            .collect()
    }
}
