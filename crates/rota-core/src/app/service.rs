//! ScheduleService - ports と DailyScheduler をつなぐアプリケーション層
//!
//! # generate の流れ
//! 1. store からチームのスナップショットを読む
//! 2. 対象日より前の履歴で計画（失敗したら何も書かない）
//! 3. `regenerate_for_date` で対象日を丸ごと置き換える（atomic）
//!
//! 同じ日付の再実行は常に置き換えで、追記にはなりません。

use chrono::NaiveDate;
use tracing::info;

use super::report::{ScheduleRow, WorkloadReport};
use super::scheduler::{DailyAssignmentSet, DailyScheduler, ScheduleRequest};
use crate::domain::{SchedulingError, TeamId};
use crate::ports::{AssignmentStore, Clock, IdGenerator};
use crate::rotation::RotationPolicy;

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, SchedulingError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| SchedulingError::InvalidDate(input.to_string()))
}

pub struct ScheduleService<S, C, G> {
    store: S,
    clock: C,
    ids: G,
    scheduler: DailyScheduler,
}

impl<S, C, G> ScheduleService<S, C, G>
where
    S: AssignmentStore,
    C: Clock,
    G: IdGenerator,
{
    pub fn new(store: S, clock: C, ids: G, policy: RotationPolicy) -> Self {
        Self {
            store,
            clock,
            ids,
            scheduler: DailyScheduler::new(policy),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Plan `date` without writing anything.
    pub async fn preview(
        &self,
        team: TeamId,
        date: NaiveDate,
    ) -> Result<DailyAssignmentSet, SchedulingError> {
        let snapshot = self.store.load_team(team).await?;
        let history = self.store.history_before(team, date).await?;
        let request = ScheduleRequest {
            team,
            date,
            members: &snapshot.members,
            tasks: &snapshot.tasks,
            history: &history,
        };
        self.scheduler.plan(&request)
    }

    /// Plan `date` and replace whatever was stored for it.
    pub async fn generate(
        &self,
        team: TeamId,
        date: NaiveDate,
    ) -> Result<DailyAssignmentSet, SchedulingError> {
        let set = self.preview(team, date).await?;
        let rows = set.to_assignments(&self.ids);
        self.store.regenerate_for_date(team, date, rows).await?;

        info!(
            %team,
            %date,
            assigned = set.scheduled.len(),
            skipped = set.skipped.len(),
            "schedule stored"
        );
        Ok(set)
    }

    /// `generate` for a `YYYY-MM-DD` string.
    pub async fn generate_for(
        &self,
        team: TeamId,
        date: &str,
    ) -> Result<DailyAssignmentSet, SchedulingError> {
        let date = parse_date(date)?;
        self.generate(team, date).await
    }

    /// `generate` for the clock's current date.
    pub async fn generate_today(
        &self,
        team: TeamId,
    ) -> Result<DailyAssignmentSet, SchedulingError> {
        self.generate(team, self.clock.today()).await
    }

    /// Stored assignments of one date, ordered by time slot.
    pub async fn schedule_for_date(
        &self,
        team: TeamId,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleRow>, SchedulingError> {
        let snapshot = self.store.load_team(team).await?;
        let rows = self.store.assignments_on(team, date).await?;
        Ok(rows
            .iter()
            .map(|a| ScheduleRow::from_assignment(&snapshot, a))
            .collect())
    }

    /// Every stored assignment, ordered by date then time slot.
    pub async fn team_schedule(&self, team: TeamId) -> Result<Vec<ScheduleRow>, SchedulingError> {
        let snapshot = self.store.load_team(team).await?;
        let rows = self.store.assignments_between(team, None, None).await?;
        Ok(rows
            .iter()
            .map(|a| ScheduleRow::from_assignment(&snapshot, a))
            .collect())
    }

    pub async fn workload(&self, team: TeamId) -> Result<WorkloadReport, SchedulingError> {
        let snapshot = self.store.load_team(team).await?;
        Ok(WorkloadReport::from_snapshot(&snapshot))
    }
}
