//! AssignmentStore port - チーム・タスク・割り当て履歴の正本
//!
//! # 設計原則
//! - 履歴は追記のみ。過去の割り当てを書き換えない
//! - `regenerate_for_date` は (team, date) 単位で atomic
//!   （削除と挿入が一つの単位。読み手が半端な日を見ることはない）
//! - 同じ (team, date) への同時実行は後勝ち

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Assignment, TeamId, TeamSnapshot};

/// StoreError は永続化層のエラー
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("conflicting write: {0}")]
    Conflict(String),
}

/// AssignmentStore はチームのスナップショットと履歴を管理
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Members, all tasks (soft-deleted included) and the full history.
    async fn load_team(&self, team: TeamId) -> Result<TeamSnapshot, StoreError>;

    /// Assignments dated strictly before `date`.
    async fn history_before(
        &self,
        team: TeamId,
        date: NaiveDate,
    ) -> Result<Vec<Assignment>, StoreError>;

    /// Assignments on `date`, ordered by time slot.
    async fn assignments_on(
        &self,
        team: TeamId,
        date: NaiveDate,
    ) -> Result<Vec<Assignment>, StoreError>;

    /// Assignments in the inclusive range, ordered by date then time slot.
    /// `None` leaves that side open.
    async fn assignments_between(
        &self,
        team: TeamId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Assignment>, StoreError>;

    /// Replace every assignment of (team, date) with `assignments` as one unit.
    ///
    /// If the batch is rejected the date keeps its previous assignments.
    async fn regenerate_for_date(
        &self,
        team: TeamId,
        date: NaiveDate,
        assignments: Vec<Assignment>,
    ) -> Result<(), StoreError>;
}
