//! Combination scorer: fairness and repetition scores of a candidate set.
//!
//! Both scores are "lower is better". Candidates are ranked by
//! `(fairness, repetition)`, which is exactly the derived `Ord` of [`Score`].

use super::history::Counters;
use super::policy::RotationPolicy;
use crate::domain::MemberId;

/// Ranking key of one candidate. Field order matters: fairness first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    pub fairness: u32,
    pub repetition: u32,
}

/// Workload of the whole roster as if the candidate had taken the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Projection {
    max: u32,
    min: u32,
    idle: u32,
}

impl Projection {
    fn spread(&self) -> u32 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    policy: &'a RotationPolicy,
}

impl<'a> Scorer<'a> {
    pub fn new(policy: &'a RotationPolicy) -> Self {
        Self { policy }
    }

    fn project(&self, candidate: &[MemberId], counters: &Counters) -> Projection {
        let mut max = 0;
        let mut min = u32::MAX;
        let mut idle = 0;
        for (member, count) in counters.task_counts() {
            let count = count + u32::from(candidate.contains(member));
            max = max.max(count);
            min = min.min(count);
            if count < 1 {
                idle += 1;
            }
        }
        if min == u32::MAX {
            min = 0;
        }
        Projection { max, min, idle }
    }

    /// Spread after the assignment, plus a penalty per idle member once
    /// somebody reaches the overload threshold.
    pub fn fairness(&self, candidate: &[MemberId], counters: &Counters) -> u32 {
        let p = self.project(candidate, counters);
        let mut score = p.spread();
        if p.max >= self.policy.overload_threshold {
            score += p.idle * self.policy.idle_penalty;
        }
        score
    }

    /// Spread within the limit, and nobody idle while somebody is overloaded.
    pub fn is_fair(&self, candidate: &[MemberId], counters: &Counters) -> bool {
        if candidate.is_empty() {
            return false;
        }
        let p = self.project(candidate, counters);
        p.spread() <= self.policy.max_spread
            && (p.max < self.policy.overload_threshold || p.idle == 0)
    }

    /// Prior task counts of the candidate plus weighted prior co-assignments.
    pub fn repetition(&self, candidate: &[MemberId], counters: &Counters) -> u32 {
        let workload: u32 = candidate.iter().map(|m| counters.task_count(*m)).sum();
        let mut pairs = 0;
        for (i, a) in candidate.iter().enumerate() {
            for b in &candidate[i + 1..] {
                pairs += counters.pair_count(*a, *b);
            }
        }
        workload + self.policy.pair_weight * pairs
    }

    pub fn score(&self, candidate: &[MemberId], counters: &Counters) -> Score {
        Score {
            fairness: self.fairness(candidate, counters),
            repetition: self.repetition(candidate, counters),
        }
    }
}
