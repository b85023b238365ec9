//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryAssignmentStore**: JSON スナップショットから組み立てる正本
//!
//! # 本番用実装
//! データベース実装は別クレートに置く想定です。
//! `regenerate_for_date` は一つのトランザクションで削除と挿入を行うこと。

pub mod inmem_store;

pub use self::inmem_store::InMemoryAssignmentStore;
