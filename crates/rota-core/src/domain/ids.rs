//! Domain identifiers (strongly-typed IDs).
//!
//! すべての ID は ULID ベースの `Id<T>` で表現します。
//! `T` は PhantomData のマーカー型で、`MemberId` と `TaskId` を
//! 取り違えるとコンパイルエラーになります。
//!
//! ## シリアライズ
//! JSON 上はプレフィックスなしの ULID 文字列（`#[serde(transparent)]`）。
//! Display ではプレフィックス付き（"member-01H..."）でログに出します。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
pub trait IdMarker: Send + Sync + 'static {
    /// Display で使うプレフィックス（例: "team-", "member-"）
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// Ord は ULID の順序に従います。スケジューラは入力を ID 順に正規化してから
/// シャッフルするので、この順序が決定性の基準になります。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// ULID から Id を作成
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// 内部の ULID を取得
    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Team のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Team {}

impl IdMarker for Team {
    fn prefix() -> &'static str {
        "team-"
    }
}

/// Member のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Member {}

impl IdMarker for Member {
    fn prefix() -> &'static str {
        "member-"
    }
}

/// Task のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {}

impl IdMarker for Task {
    fn prefix() -> &'static str {
        "task-"
    }
}

/// Assignment のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Assignment {}

impl IdMarker for Assignment {
    fn prefix() -> &'static str {
        "assignment-"
    }
}

// ========================================
// Type Alias
// ========================================

/// Identifier of a Team (the scheduling tenant).
pub type TeamId = Id<Team>;

/// Identifier of a team Member.
pub type MemberId = Id<Member>;

/// Identifier of a Task (a recurring chore).
pub type TaskId = Id<Task>;

/// Identifier of one Assignment row (task occurrence on a date).
pub type AssignmentId = Id<Assignment>;
