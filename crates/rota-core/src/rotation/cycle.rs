//! Cycle reset detection.
//!
//! Once every (active task, member combination) pairing has occurred, the
//! history checks would disqualify every candidate forever. History is
//! therefore cut into cycles: a cycle closes on the first date by which every
//! pairing has occurred within it, and the next cycle starts the day after.
//! Only the open cycle feeds counters and disqualification. Cycles are
//! recomputed from the stored history on every run and nothing is persisted.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use super::combinations::{Combinations, binomial};
use super::policy::RotationPolicy;
use crate::domain::{Assignment, MemberId, Task, TaskId};

/// Result of scanning history for closed cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleWindow {
    /// At least one cycle has closed: the history covers every pairing.
    pub exhausted: bool,
    /// First date of the open cycle. `None` means the whole history.
    pub start: Option<NaiveDate>,
    pub closed_cycles: usize,
}

pub struct CycleDetector<'a> {
    policy: &'a RotationPolicy,
}

impl<'a> CycleDetector<'a> {
    pub fn new(policy: &'a RotationPolicy) -> Self {
        Self { policy }
    }

    /// Scan `history` (dated before `before`) for closed cycles.
    ///
    /// Exhaustion is never reported when a task needs more members than the
    /// roster has, or when a task has more combinations than the policy cap.
    pub fn detect(
        &self,
        roster: &[MemberId],
        active_tasks: &[&Task],
        history: &[Assignment],
        before: NaiveDate,
    ) -> CycleWindow {
        if !self.policy.cycle_reset || active_tasks.is_empty() || roster.is_empty() {
            return CycleWindow::default();
        }

        let mut required: HashMap<TaskId, (usize, usize)> = HashMap::new();
        for task in active_tasks {
            let needed = task.people_needed();
            let total = binomial(roster.len(), needed);
            if total == 0 || total > self.policy.max_candidates as u128 {
                return CycleWindow::default();
            }
            required.insert(task.id, (needed, total as usize));
        }

        let roster: HashSet<MemberId> = roster.iter().copied().collect();
        let mut by_date: BTreeMap<NaiveDate, Vec<&Assignment>> = BTreeMap::new();
        for assignment in history.iter().filter(|a| a.date < before) {
            if required.contains_key(&assignment.task_id) {
                by_date.entry(assignment.date).or_default().push(assignment);
            }
        }

        let mut window = CycleWindow::default();
        let mut covered: HashMap<TaskId, HashSet<Vec<MemberId>>> = HashMap::new();
        for (date, assignments) in by_date {
            for assignment in assignments {
                let Some(&(needed, _)) = required.get(&assignment.task_id) else {
                    continue;
                };
                // BTreeSet iteration is sorted, so each combination has one spelling.
                let present: Vec<MemberId> = assignment
                    .members
                    .iter()
                    .copied()
                    .filter(|m| roster.contains(m))
                    .collect();
                covered
                    .entry(assignment.task_id)
                    .or_default()
                    .extend(Combinations::new(&present, needed));
            }

            let complete = required.iter().all(|(task_id, (_, total))| {
                covered.get(task_id).is_some_and(|seen| seen.len() >= *total)
            });
            if complete {
                window.exhausted = true;
                window.closed_cycles += 1;
                window.start = date.succ_opt();
                covered.clear();
                debug!(%date, cycle = window.closed_cycles, "rotation cycle closed");
            }
        }
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssignmentId, TimeSlot};
    use ulid::Ulid;

    fn member(n: u128) -> MemberId {
        MemberId::from_ulid(Ulid::from_parts(0, n))
    }

    fn task(n: u128, headcount: usize) -> Task {
        let id = TaskId::from_ulid(Ulid::from_parts(1, n));
        Task::new(id, format!("task {n}"), headcount, TimeSlot::FIRST).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn done(date: NaiveDate, task: &Task, members: &[MemberId]) -> Assignment {
        let id = AssignmentId::from_ulid(Ulid::new());
        Assignment::new(id, date, task.id, members.iter().copied())
    }

    #[test]
    fn two_members_one_task_exhaust_after_both_did_it() {
        let chore = task(1, 1);
        let roster = vec![member(1), member(2)];
        let policy = RotationPolicy::default();
        let detector = CycleDetector::new(&policy);

        let history = vec![done(day(1), &chore, &[member(1)])];
        let window = detector.detect(&roster, &[&chore], &history, day(2));
        assert!(!window.exhausted);
        assert_eq!(window.start, None);

        let history = vec![
            done(day(1), &chore, &[member(1)]),
            done(day(2), &chore, &[member(2)]),
        ];
        let window = detector.detect(&roster, &[&chore], &history, day(3));
        assert!(window.exhausted);
        assert_eq!(window.start, Some(day(3)));
        assert_eq!(window.closed_cycles, 1);
    }

    #[test]
    fn every_task_must_be_covered() {
        let a = task(1, 1);
        let b = task(2, 1);
        let roster = vec![member(1), member(2)];
        let policy = RotationPolicy::default();

        let history = vec![
            done(day(1), &a, &[member(1)]),
            done(day(1), &b, &[member(2)]),
            done(day(2), &a, &[member(2)]),
        ];
        let window = CycleDetector::new(&policy).detect(&roster, &[&a, &b], &history, day(3));
        assert!(!window.exhausted);
    }

    #[test]
    fn larger_groups_cover_their_sub_pairs() {
        let chore = task(1, 2);
        let roster = vec![member(1), member(2), member(3)];
        let policy = RotationPolicy::default();

        // One assignment of all three covers every pair of the roster.
        let history = vec![done(day(1), &chore, &[member(1), member(2), member(3)])];
        let window = CycleDetector::new(&policy).detect(&roster, &[&chore], &history, day(2));
        assert!(window.exhausted);
        assert_eq!(window.start, Some(day(2)));
    }

    #[test]
    fn open_cycle_starts_after_the_last_close() {
        let chore = task(1, 1);
        let roster = vec![member(1), member(2)];
        let policy = RotationPolicy::default();

        let history = vec![
            done(day(1), &chore, &[member(1)]),
            done(day(2), &chore, &[member(2)]),
            done(day(3), &chore, &[member(2)]),
            done(day(4), &chore, &[member(1)]),
            done(day(5), &chore, &[member(1)]),
        ];
        let window = CycleDetector::new(&policy).detect(&roster, &[&chore], &history, day(6));
        assert!(window.exhausted);
        assert_eq!(window.closed_cycles, 2);
        assert_eq!(window.start, Some(day(5)));
    }

    #[test]
    fn headcount_above_roster_never_exhausts() {
        let chore = task(1, 3);
        let roster = vec![member(1), member(2)];
        let policy = RotationPolicy::default();

        let history = vec![done(day(1), &chore, &[member(1), member(2)])];
        let window = CycleDetector::new(&policy).detect(&roster, &[&chore], &history, day(2));
        assert_eq!(window, CycleWindow::default());
    }

    #[test]
    fn disabled_policy_never_resets() {
        let chore = task(1, 1);
        let roster = vec![member(1)];
        let policy = RotationPolicy {
            cycle_reset: false,
            ..RotationPolicy::default()
        };

        let history = vec![done(day(1), &chore, &[member(1)])];
        let window = CycleDetector::new(&policy).detect(&roster, &[&chore], &history, day(2));
        assert!(!window.exhausted);
    }
}
