//! Assignment records: the historical fact that a set of members performed a
//! task on a date.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{AssignmentId, MemberId, TaskId};

/// One row per task occurrence on a date.
///
/// The member set is unordered. Its size equals the task's headcount at the
/// time of scheduling, which may differ from the task's current headcount if
/// the task was edited later. History is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub date: NaiveDate,
    pub task_id: TaskId,
    pub members: BTreeSet<MemberId>,
}

impl Assignment {
    pub fn new(
        id: AssignmentId,
        date: NaiveDate,
        task_id: TaskId,
        members: impl IntoIterator<Item = MemberId>,
    ) -> Self {
        Self {
            id,
            date,
            task_id,
            members: members.into_iter().collect(),
        }
    }

    pub fn contains(&self, member: MemberId) -> bool {
        self.members.contains(&member)
    }

    /// True if every member of `group` took part in this assignment.
    pub fn covers(&self, group: &[MemberId]) -> bool {
        group.iter().all(|m| self.members.contains(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn member(n: u128) -> MemberId {
        MemberId::from_ulid(Ulid::from_parts(0, n))
    }

    #[test]
    fn covers_checks_superset() {
        let assignment = Assignment::new(
            AssignmentId::from_ulid(Ulid::new()),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            TaskId::from_ulid(Ulid::new()),
            [member(1), member(2), member(3)],
        );

        assert!(assignment.covers(&[member(1), member(3)]));
        assert!(assignment.covers(&[member(2)]));
        assert!(!assignment.covers(&[member(1), member(4)]));
    }

    #[test]
    fn duplicate_members_collapse() {
        let assignment = Assignment::new(
            AssignmentId::from_ulid(Ulid::new()),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            TaskId::from_ulid(Ulid::new()),
            [member(1), member(1)],
        );
        assert_eq!(assignment.members.len(), 1);
    }
}
