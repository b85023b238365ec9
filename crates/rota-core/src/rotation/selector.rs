//! Combination selector: picks the member set for one task.
//!
//! # 流れ
//! 1. 候補生成（headcount ごとの戦略）
//! 2. 失格判定（過去にこのタスクをやったメンバー / 同じグループ）
//! 3. `(fairness, repetition)` で昇順ソート
//! 4. 最初の「公平」な候補を採用、なければ先頭（best effort）
//! 5. 候補ゼロなら fallback（task count が少ない順、同点はランダム）
//!
//! Pure function of (task, available members, counters, history, rng):
//! no persisted state, safe to retry.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::combinations::{Combinations, binomial};
use super::history::{Counters, HistoryIndex};
use super::policy::RotationPolicy;
use super::scorer::{Score, Scorer};
use crate::domain::{MemberId, Task};

/// How a selection was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The best-ranked candidate that satisfies the fairness predicate.
    Fair,
    /// No candidate was fair; the best-ranked one was taken.
    BestEffort,
    /// Nothing survived disqualification; lowest task counts, random ties.
    LowestLoad,
}

/// Members chosen for a task, with the reasoning behind the choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub members: Vec<MemberId>,
    /// `None` for the lowest-load fallback, which is not scored.
    pub score: Option<Score>,
    pub strategy: Strategy,
    /// Single-member task where everyone had done it already, so history
    /// disqualification was dropped.
    pub relaxed: bool,
    /// Number of candidates that were ranked.
    pub considered: usize,
}

pub struct CombinationSelector<'a, 'h> {
    history: &'a HistoryIndex<'h>,
    policy: &'a RotationPolicy,
    scorer: Scorer<'a>,
}

impl<'a, 'h> CombinationSelector<'a, 'h> {
    pub fn new(history: &'a HistoryIndex<'h>, policy: &'a RotationPolicy) -> Self {
        Self {
            history,
            policy,
            scorer: Scorer::new(policy),
        }
    }

    /// Choose exactly `task.people_needed()` members out of `available`.
    ///
    /// Returns `None` only when the pool is smaller than the headcount.
    pub fn select<R: Rng + ?Sized>(
        &self,
        task: &Task,
        available: &[MemberId],
        counters: &Counters,
        rng: &mut R,
    ) -> Option<Selection> {
        let needed = task.people_needed();
        if available.len() < needed {
            return None;
        }

        let selection = if needed == 1 {
            self.select_single(task, available, counters)
        } else {
            let candidates = self.group_candidates(task, available, needed);
            self.rank(candidates, counters)
                .unwrap_or_else(|| Self::lowest_load(needed, available, counters, rng))
        };

        debug!(
            task = %task.name,
            needed,
            available = available.len(),
            considered = selection.considered,
            strategy = ?selection.strategy,
            relaxed = selection.relaxed,
            score = ?selection.score,
            "selected members"
        );
        Some(selection)
    }

    fn select_single(&self, task: &Task, available: &[MemberId], counters: &Counters) -> Selection {
        let fresh: Vec<Vec<MemberId>> = available
            .iter()
            .filter(|m| !self.history.has_done(task.id, **m))
            .map(|m| vec![*m])
            .collect();

        let relaxed = fresh.is_empty();
        let candidates = if relaxed {
            available.iter().map(|m| vec![*m]).collect()
        } else {
            fresh
        };

        // `available` is non-empty here, so ranking always yields a candidate.
        let mut selection = self
            .rank(candidates, counters)
            .unwrap_or_else(|| Selection {
                members: available[..1].to_vec(),
                score: None,
                strategy: Strategy::LowestLoad,
                relaxed,
                considered: 0,
            });
        selection.relaxed = relaxed;
        selection
    }

    /// Every `needed`-sized combination that passes both history checks.
    ///
    /// Members who already did the task are dropped from the pool before
    /// enumerating, so the cap only ever truncates valid groups.
    fn group_candidates(
        &self,
        task: &Task,
        available: &[MemberId],
        needed: usize,
    ) -> Vec<Vec<MemberId>> {
        let fresh: Vec<MemberId> = available
            .iter()
            .copied()
            .filter(|m| !self.history.has_done(task.id, *m))
            .collect();

        let total = binomial(fresh.len(), needed);
        if total > self.policy.max_candidates as u128 {
            warn!(
                task = %task.name,
                total,
                cap = self.policy.max_candidates,
                "combination count exceeds cap, examining a prefix only"
            );
        }

        Combinations::new(&fresh, needed)
            .filter(|group| !self.history.has_done_as_group(task.id, group))
            .take(self.policy.max_candidates)
            .collect()
    }

    fn rank(&self, candidates: Vec<Vec<MemberId>>, counters: &Counters) -> Option<Selection> {
        let mut scored: Vec<(Score, Vec<MemberId>)> = candidates
            .into_iter()
            .map(|c| (self.scorer.score(&c, counters), c))
            .collect();
        if scored.is_empty() {
            return None;
        }
        // Stable: equal scores keep enumeration (shuffled pool) order.
        scored.sort_by_key(|(score, _)| *score);

        let considered = scored.len();
        let (index, strategy) = match scored
            .iter()
            .position(|(_, c)| self.scorer.is_fair(c, counters))
        {
            Some(i) => (i, Strategy::Fair),
            None => (0, Strategy::BestEffort),
        };
        let (score, members) = scored.swap_remove(index);
        Some(Selection {
            members,
            score: Some(score),
            strategy,
            relaxed: false,
            considered,
        })
    }

    fn lowest_load<R: Rng + ?Sized>(
        needed: usize,
        available: &[MemberId],
        counters: &Counters,
        rng: &mut R,
    ) -> Selection {
        let mut pool = available.to_vec();
        pool.shuffle(rng);
        pool.sort_by_key(|m| counters.task_count(*m));
        pool.truncate(needed);
        Selection {
            members: pool,
            score: None,
            strategy: Strategy::LowestLoad,
            relaxed: false,
            considered: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Assignment, AssignmentId, TaskId, TimeSlot};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;
    use ulid::Ulid;

    fn member(n: u128) -> MemberId {
        MemberId::from_ulid(Ulid::from_parts(0, n))
    }

    fn task(headcount: usize) -> Task {
        let id = TaskId::from_ulid(Ulid::from_parts(1, 1));
        Task::new(id, "Chore", headcount, TimeSlot::FIRST).unwrap()
    }

    fn other_task(headcount: usize) -> Task {
        let id = TaskId::from_ulid(Ulid::from_parts(1, 2));
        Task::new(id, "Other", headcount, TimeSlot::FIRST).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn done(date: NaiveDate, task: &Task, members: &[MemberId]) -> Assignment {
        Assignment::new(
            AssignmentId::from_ulid(Ulid::new()),
            date,
            task.id,
            members.iter().copied(),
        )
    }

    fn roster(n: u128) -> Vec<MemberId> {
        (1..=n).map(member).collect()
    }

    #[test]
    fn single_member_skips_previous_assignee() {
        let chore = task(1);
        let members = roster(3);
        let history = vec![done(day(1), &chore, &[member(1)])];
        let index = HistoryIndex::before(&history, day(2));
        let counters = index.counters(&members);
        let policy = RotationPolicy::default();
        let mut rng = StdRng::seed_from_u64(7);

        let selection = CombinationSelector::new(&index, &policy)
            .select(&chore, &members, &counters, &mut rng)
            .unwrap();

        assert_eq!(selection.members.len(), 1);
        assert_ne!(selection.members[0], member(1));
        assert_eq!(selection.strategy, Strategy::Fair);
        assert!(!selection.relaxed);
    }

    #[test]
    fn single_member_relaxes_when_everyone_has_done_it() {
        let chore = task(1);
        let members = roster(2);
        let history = vec![
            done(day(1), &chore, &[member(1)]),
            done(day(2), &chore, &[member(2)]),
            done(day(3), &chore, &[member(1)]),
        ];
        let index = HistoryIndex::before(&history, day(4));
        let counters = index.counters(&members);
        let policy = RotationPolicy::default();
        let mut rng = StdRng::seed_from_u64(7);

        let selection = CombinationSelector::new(&index, &policy)
            .select(&chore, &members, &counters, &mut rng)
            .unwrap();

        assert!(selection.relaxed);
        // member 2 has fewer tasks, so the ranking prefers them.
        assert_eq!(selection.members, vec![member(2)]);
    }

    #[test]
    fn pair_excludes_members_with_history_and_prefers_fresh_pairs() {
        let chore = task(2);
        let members = roster(4);
        let history = vec![done(day(1), &chore, &[member(1), member(2)])];
        let index = HistoryIndex::before(&history, day(2));
        let counters = index.counters(&members);
        let policy = RotationPolicy::default();
        let mut rng = StdRng::seed_from_u64(1);

        let selection = CombinationSelector::new(&index, &policy)
            .select(&chore, &members, &counters, &mut rng)
            .unwrap();

        let mut chosen = selection.members.clone();
        chosen.sort();
        assert_eq!(chosen, vec![member(3), member(4)]);
        assert_eq!(selection.considered, 1);
    }

    #[test]
    fn pair_falls_back_to_lowest_load_when_nothing_survives() {
        let chore = task(2);
        let members = roster(3);
        let other = other_task(1);
        let history = vec![
            done(day(1), &chore, &[member(1), member(2)]),
            done(day(2), &chore, &[member(2), member(3)]),
            done(day(3), &other, &[member(2)]),
        ];
        let index = HistoryIndex::before(&history, day(4));
        let counters = index.counters(&members);
        let policy = RotationPolicy::default();
        let mut rng = StdRng::seed_from_u64(3);

        let selection = CombinationSelector::new(&index, &policy)
            .select(&chore, &members, &counters, &mut rng)
            .unwrap();

        assert_eq!(selection.strategy, Strategy::LowestLoad);
        assert_eq!(selection.score, None);
        // member 2 carries 3 tasks, members 1 and 3 one each.
        let mut chosen = selection.members.clone();
        chosen.sort();
        assert_eq!(chosen, vec![member(1), member(3)]);
    }

    #[test]
    fn group_of_three_avoids_repeated_pairs() {
        let chore = task(3);
        let other = other_task(2);
        let members = roster(5);
        // Members 1 and 2 were paired twice on another task.
        let history = vec![
            done(day(1), &other, &[member(1), member(2)]),
            done(day(2), &other, &[member(1), member(2)]),
        ];
        let index = HistoryIndex::before(&history, day(3));
        let counters = index.counters(&members);
        let policy = RotationPolicy::default();
        let mut rng = StdRng::seed_from_u64(5);

        let selection = CombinationSelector::new(&index, &policy)
            .select(&chore, &members, &counters, &mut rng)
            .unwrap();

        assert_eq!(selection.members.len(), 3);
        assert!(
            !(selection.members.contains(&member(1)) && selection.members.contains(&member(2))),
            "repeated pair chosen: {:?}",
            selection.members
        );
    }

    #[test]
    fn pool_smaller_than_headcount_yields_none() {
        let chore = task(3);
        let members = roster(2);
        let index = HistoryIndex::default();
        let counters = index.counters(&members);
        let policy = RotationPolicy::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(
            CombinationSelector::new(&index, &policy)
                .select(&chore, &members, &counters, &mut rng)
                .is_none()
        );
    }

    #[test]
    fn unfair_candidates_fall_back_to_best_effort() {
        let chore = task(1);
        let other = other_task(1);
        let members = roster(3);
        // member 1 is heavily loaded, members 2 and 3 already did the chore.
        let history = vec![
            done(day(1), &other, &[member(1)]),
            done(day(2), &other, &[member(1)]),
            done(day(3), &other, &[member(1)]),
            done(day(4), &chore, &[member(2)]),
            done(day(5), &chore, &[member(3)]),
        ];
        let index = HistoryIndex::before(&history, day(6));
        let counters = index.counters(&members);
        let policy = RotationPolicy::default();
        let mut rng = StdRng::seed_from_u64(0);

        let selection = CombinationSelector::new(&index, &policy)
            .select(&chore, &members, &counters, &mut rng)
            .unwrap();

        // Only member 1 is fresh; giving them a fourth task is unfair but
        // still the best of the remaining candidates.
        assert_eq!(selection.members, vec![member(1)]);
        assert_eq!(selection.strategy, Strategy::BestEffort);
    }

    #[test]
    fn group_of_three_falls_back_to_lowest_load() {
        let chore = task(3);
        let other = other_task(1);
        let members = roster(4);
        // Only member 4 is fresh, too few for a group of three.
        let history = vec![
            done(day(1), &chore, &[member(1), member(2), member(3)]),
            done(day(2), &other, &[member(2)]),
        ];
        let index = HistoryIndex::before(&history, day(3));
        let counters = index.counters(&members);
        let policy = RotationPolicy::default();
        let mut rng = StdRng::seed_from_u64(11);

        let selection = CombinationSelector::new(&index, &policy)
            .select(&chore, &members, &counters, &mut rng)
            .unwrap();

        assert_eq!(selection.strategy, Strategy::LowestLoad);
        assert_eq!(selection.considered, 0);
        // member 2 carries two tasks, members 1 and 3 one, member 4 none.
        let mut chosen = selection.members.clone();
        chosen.sort();
        assert_eq!(chosen, vec![member(1), member(3), member(4)]);
    }

    #[rstest]
    #[case::default_cap(RotationPolicy::default())]
    #[case::tight_cap(RotationPolicy { max_candidates: 5, ..RotationPolicy::default() })]
    fn cap_applies_after_members_with_history_are_removed(#[case] policy: RotationPolicy) {
        let chore = task(4);
        let members = roster(30);
        // Members 1..=8 did the chore; they lead the pool order.
        let history = vec![
            done(day(1), &chore, &[member(1), member(2), member(3), member(4)]),
            done(day(2), &chore, &[member(5), member(6), member(7), member(8)]),
        ];
        let index = HistoryIndex::before(&history, day(3));
        let counters = index.counters(&members);
        let mut rng = StdRng::seed_from_u64(2);

        let selection = CombinationSelector::new(&index, &policy)
            .select(&chore, &members, &counters, &mut rng)
            .unwrap();

        assert_ne!(selection.strategy, Strategy::LowestLoad);
        assert!(selection.score.is_some());
        assert!(selection.considered > 0);
        assert!(selection.considered <= policy.max_candidates);
        assert!(selection.members.iter().all(|m| !index.has_done(chore.id, *m)));
    }
}
