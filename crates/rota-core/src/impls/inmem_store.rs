//! InMemoryAssignmentStore - 開発用・テスト用の正本
//!
//! # 実装詳細
//! - `HashMap<TeamId, TeamSnapshot>` を tokio の Mutex で保護
//! - `regenerate_for_date` は検証 → 置き換えを一つのロック内で行う
//!   （検証に失敗したらその日の割り当ては変更しない）
//! - CLI は JSON の TeamSnapshot から組み立てて、実行後に書き戻す

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{Assignment, TeamId, TeamSnapshot, TimeSlot};
use crate::ports::{AssignmentStore, StoreError};

pub struct InMemoryAssignmentStore {
    teams: Mutex<HashMap<TeamId, TeamSnapshot>>,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self {
            teams: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_snapshots(snapshots: impl IntoIterator<Item = TeamSnapshot>) -> Self {
        let teams = snapshots
            .into_iter()
            .map(|snapshot| (snapshot.team.id, snapshot))
            .collect();
        Self {
            teams: Mutex::new(teams),
        }
    }

    /// Add or replace a team.
    pub async fn put_team(&self, snapshot: TeamSnapshot) {
        self.teams.lock().await.insert(snapshot.team.id, snapshot);
    }

    async fn with_team<T>(
        &self,
        team: TeamId,
        f: impl FnOnce(&TeamSnapshot) -> T,
    ) -> Result<T, StoreError> {
        let teams = self.teams.lock().await;
        let snapshot = teams.get(&team).ok_or(StoreError::TeamNotFound(team))?;
        Ok(f(snapshot))
    }
}

impl Default for InMemoryAssignmentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort key: date, then the task's time slot (unknown tasks last).
fn sort_by_date_and_slot(snapshot: &TeamSnapshot, assignments: &mut [Assignment]) {
    assignments.sort_by_key(|a| {
        let slot = snapshot.task(a.task_id).map(|t| t.time_slot);
        (a.date, slot.unwrap_or(TimeSlot::LAST), slot.is_none())
    });
}

/// Reject batches that would break the per-date invariants.
fn validate_batch(
    snapshot: &TeamSnapshot,
    date: NaiveDate,
    assignments: &[Assignment],
) -> Result<(), StoreError> {
    let mut seen_tasks = HashSet::new();
    for assignment in assignments {
        if assignment.date != date {
            return Err(StoreError::Conflict(format!(
                "{} is dated {} inside a batch for {}",
                assignment.id, assignment.date, date
            )));
        }
        let task = snapshot.task(assignment.task_id).ok_or_else(|| {
            StoreError::Conflict(format!("unknown task {}", assignment.task_id))
        })?;
        if !seen_tasks.insert(assignment.task_id) {
            return Err(StoreError::Conflict(format!(
                "task '{}' assigned twice on {}",
                task.name, date
            )));
        }
        if assignment.members.len() != task.people_needed() {
            return Err(StoreError::Conflict(format!(
                "task '{}' needs {} members, got {}",
                task.name,
                task.people_needed(),
                assignment.members.len()
            )));
        }
        if let Some(unknown) = assignment
            .members
            .iter()
            .find(|m| snapshot.member(**m).is_none())
        {
            return Err(StoreError::Conflict(format!("unknown member {unknown}")));
        }
    }
    Ok(())
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn load_team(&self, team: TeamId) -> Result<TeamSnapshot, StoreError> {
        self.with_team(team, TeamSnapshot::clone).await
    }

    async fn history_before(
        &self,
        team: TeamId,
        date: NaiveDate,
    ) -> Result<Vec<Assignment>, StoreError> {
        self.with_team(team, |snapshot| snapshot.history_before(date))
            .await
    }

    async fn assignments_on(
        &self,
        team: TeamId,
        date: NaiveDate,
    ) -> Result<Vec<Assignment>, StoreError> {
        self.assignments_between(team, Some(date), Some(date)).await
    }

    async fn assignments_between(
        &self,
        team: TeamId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Assignment>, StoreError> {
        self.with_team(team, |snapshot| {
            let mut rows: Vec<Assignment> = snapshot
                .assignments
                .iter()
                .filter(|a| from.is_none_or(|from| a.date >= from))
                .filter(|a| to.is_none_or(|to| a.date <= to))
                .cloned()
                .collect();
            sort_by_date_and_slot(snapshot, &mut rows);
            rows
        })
        .await
    }

    async fn regenerate_for_date(
        &self,
        team: TeamId,
        date: NaiveDate,
        assignments: Vec<Assignment>,
    ) -> Result<(), StoreError> {
        let mut teams = self.teams.lock().await;
        let snapshot = teams.get_mut(&team).ok_or(StoreError::TeamNotFound(team))?;

        validate_batch(snapshot, date, &assignments)?;

        let before = snapshot.assignments.len();
        snapshot.assignments.retain(|a| a.date != date);
        let removed = before - snapshot.assignments.len();
        let inserted = assignments.len();
        snapshot.assignments.extend(assignments);

        debug!(%team, %date, removed, inserted, "regenerated assignments");
        Ok(())
    }
}
