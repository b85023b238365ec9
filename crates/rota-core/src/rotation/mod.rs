//! Rotation - 公平なローテーション割り当ての中核ロジック
//!
//! # 構成
//! - **history**: 過去の割り当ての読み取り専用ビュー（HistoryIndex, Counters）
//! - **availability**: 同じ時間枠での二重割り当てを防ぐ（SlotBook）
//! - **combinations**: k 人組の列挙
//! - **scorer**: fairness / repetition スコア
//! - **selector**: タスクごとのメンバー選択
//! - **cycle**: 全組み合わせを一巡したかの判定
//! - **policy**: 閾値・重みの設定
//!
//! すべて同期・純粋関数で、永続化や I/O は持ちません。

pub mod availability;
pub mod combinations;
pub mod cycle;
pub mod history;
pub mod policy;
pub mod scorer;
pub mod selector;

pub use availability::SlotBook;
pub use cycle::{CycleDetector, CycleWindow};
pub use history::{Counters, HistoryIndex, MemberPair};
pub use policy::RotationPolicy;
pub use scorer::{Score, Scorer};
pub use selector::{CombinationSelector, Selection, Strategy};
