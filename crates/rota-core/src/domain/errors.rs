//! Errors - エラー型と分類
//!
//! タスク単位の「割り当て不能」はエラーではありません。
//! `DailyAssignmentSet::skipped` に理由付きで残り、実行は継続します。

use crate::ports::assignment_store::StoreError;

/// ErrorKind はスケジューリング失敗の分類
///
/// - PreconditionFailed: メンバーまたは有効なタスクがない（何も書き込まない）
/// - InvalidDate: 日付の形式が不正（何も書き込まない）
/// - Internal: それ以外（atomic regenerate により部分書き込みは残らない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PreconditionFailed,
    InvalidDate,
    Internal,
}

/// SchedulingError はドメインエラー
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("team has no members")]
    NoMembers,

    #[error("team has no active tasks")]
    NoActiveTasks,

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("time slot must be within 1..=5, got {0}")]
    InvalidTimeSlot(u8),

    #[error("task headcount must be at least 1")]
    InvalidHeadcount,

    #[error("store: {0}")]
    Store(#[from] StoreError),
}

impl SchedulingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SchedulingError::NoMembers | SchedulingError::NoActiveTasks => {
                ErrorKind::PreconditionFailed
            }
            SchedulingError::InvalidDate(_) => ErrorKind::InvalidDate,
            SchedulingError::InvalidTimeSlot(_)
            | SchedulingError::InvalidHeadcount
            | SchedulingError::Store(_) => ErrorKind::Internal,
        }
    }
}
