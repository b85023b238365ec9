//! App - アプリケーション層
//!
//! ports と rotation を組み合わせてユースケースを実装します。
//!
//! # 主要コンポーネント
//! - **DailyScheduler**: 1日分の割り当て計画（純粋な計算）
//! - **ScheduleService**: store からの読み込み → 計画 → atomic な置き換え
//! - **report**: 割り当て表・ワークロードの表示用ビュー

pub mod report;
pub mod scheduler;
pub mod service;

pub use self::report::{ScheduleRow, WorkloadEntry, WorkloadReport};
pub use self::scheduler::{
    DailyAssignmentSet, DailyScheduler, ScheduleRequest, ScheduledTask, SkipReason, SkippedTask,
    date_seed,
};
pub use self::service::{ScheduleService, parse_date};
