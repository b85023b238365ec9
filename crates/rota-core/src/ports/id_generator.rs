//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: Clock のタイムスタンプ + ランダム部分で ULID を生成

use crate::domain::ids::AssignmentId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は割り当て行の ID を生成
///
/// チーム・メンバー・タスクの ID は外部の管理側が払い出します。
pub trait IdGenerator: Send + Sync {
    fn generate_assignment_id(&self) -> AssignmentId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// FixedClock と組み合わせると timestamp 部分が固定されます。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_assignment_id(&self) -> AssignmentId {
        AssignmentId::from(self.next_ulid())
    }
}
