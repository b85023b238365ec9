//! History index: read-only view over past assignments.
//!
//! Answers "has this member done this task?", "has this group (or a larger
//! group containing it) done this task?" and aggregates the workload
//! counters the scorer works on. Nothing here mutates history.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::domain::{Assignment, MemberId, TaskId};

/// Unordered pair of members, stored smallest id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberPair(MemberId, MemberId);

impl MemberPair {
    pub fn new(a: MemberId, b: MemberId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    pub fn members(&self) -> (MemberId, MemberId) {
        (self.0, self.1)
    }
}

/// Per-run workload counters.
///
/// Rebuilt from history at the start of every scheduling run and updated as
/// the run assigns tasks. Never shared across runs or teams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    task_count: HashMap<MemberId, u32>,
    pair_count: HashMap<MemberPair, u32>,
}

impl Counters {
    /// Zeroed counters for the given roster.
    pub fn new(roster: impl IntoIterator<Item = MemberId>) -> Self {
        Self {
            task_count: roster.into_iter().map(|m| (m, 0)).collect(),
            pair_count: HashMap::new(),
        }
    }

    pub fn task_count(&self, member: MemberId) -> u32 {
        self.task_count.get(&member).copied().unwrap_or(0)
    }

    pub fn pair_count(&self, a: MemberId, b: MemberId) -> u32 {
        self.pair_count
            .get(&MemberPair::new(a, b))
            .copied()
            .unwrap_or(0)
    }

    /// Roster members with their task counts.
    pub fn task_counts(&self) -> &HashMap<MemberId, u32> {
        &self.task_count
    }

    pub fn roster_len(&self) -> usize {
        self.task_count.len()
    }

    /// Record one task performed together by `members`.
    ///
    /// Only roster members gain task counts; pairs are counted for every
    /// unordered pair in the set when it has two or more members.
    pub fn record(&mut self, members: &[MemberId]) {
        for member in members {
            if let Some(count) = self.task_count.get_mut(member) {
                *count += 1;
            }
        }
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                *self.pair_count.entry(MemberPair::new(*a, *b)).or_default() += 1;
            }
        }
    }

    /// Gap between the busiest and the idlest roster member.
    pub fn spread(&self) -> u32 {
        let max = self.task_count.values().max().copied().unwrap_or(0);
        let min = self.task_count.values().min().copied().unwrap_or(0);
        max - min
    }
}

/// Assignments of one team inside a date window, indexed by task.
#[derive(Debug, Default)]
pub struct HistoryIndex<'a> {
    by_task: HashMap<TaskId, Vec<&'a Assignment>>,
    done: HashSet<(TaskId, MemberId)>,
    len: usize,
}

impl<'a> HistoryIndex<'a> {
    /// Every assignment dated strictly before `before`.
    pub fn before(history: &'a [Assignment], before: NaiveDate) -> Self {
        Self::window(history, None, before)
    }

    /// Assignments with `since <= date < before` (no lower bound when `since` is `None`).
    pub fn window(history: &'a [Assignment], since: Option<NaiveDate>, before: NaiveDate) -> Self {
        let mut index = Self::default();
        let in_window = history
            .iter()
            .filter(|a| a.date < before && since.is_none_or(|start| a.date >= start));
        for assignment in in_window {
            index
                .by_task
                .entry(assignment.task_id)
                .or_default()
                .push(assignment);
            for member in &assignment.members {
                index.done.insert((assignment.task_id, *member));
            }
            index.len += 1;
        }
        index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Has `member` performed `task` within the window?
    pub fn has_done(&self, task: TaskId, member: MemberId) -> bool {
        self.done.contains(&(task, member))
    }

    /// Has some past assignment of `task` included every member of `group`?
    pub fn has_done_as_group(&self, task: TaskId, group: &[MemberId]) -> bool {
        match group {
            [] => false,
            [single] => self.has_done(task, *single),
            _ => self
                .assignments_of(task)
                .iter()
                .any(|assignment| assignment.covers(group)),
        }
    }

    pub fn assignments_of(&self, task: TaskId) -> &[&'a Assignment] {
        self.by_task.get(&task).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Workload counters for `roster` aggregated over the window.
    ///
    /// Assignments of soft-deleted tasks count like any other.
    pub fn counters(&self, roster: &[MemberId]) -> Counters {
        let mut counters = Counters::new(roster.iter().copied());
        for assignments in self.by_task.values() {
            for assignment in assignments {
                let members: Vec<MemberId> = assignment.members.iter().copied().collect();
                counters.record(&members);
            }
        }
        counters
    }
}
