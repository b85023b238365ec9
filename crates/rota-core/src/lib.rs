//! rota-core
//!
//! Fair-rotation chore scheduling for small teams.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, team, task, assignment, errors）
//! - **rotation**: 割り当てアルゴリズムの中核（history, scorer, selector, cycle など）
//! - **ports**: 抽象化レイヤー（AssignmentStore, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryAssignmentStore）
//! - **app**: アプリケーションロジック（DailyScheduler, ScheduleService, report）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod rotation;
