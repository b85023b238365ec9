//! Ports - 抽象化レイヤー
//!
//! 永続化と時刻への依存をここで trait に切り出します。
//! スケジューリングの中核（`rotation`）はどの port にも依存しません。

pub mod assignment_store;
pub mod clock;
pub mod id_generator;

pub use self::assignment_store::{AssignmentStore, StoreError};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
