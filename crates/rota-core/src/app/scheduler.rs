//! DailyScheduler - 1日分の割り当てを計画する
//!
//! # 流れ
//! 1. 前提条件の検証（メンバー・有効なタスクが 1 件以上）
//! 2. 一巡判定（CycleDetector）→ 履歴ウィンドウと seed を決める
//! 3. seed でメンバー順をシャッフル
//! 4. 時間枠ごと（昇順）に、枠内のタスク順をシャッフルして処理
//! 5. 空きメンバー → CombinationSelector → カウンタ更新
//!
//! 計画は純粋な計算で、保存は `ScheduleService` が行います。
//! 同じ入力・同じ日付なら同じ結果になります。

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{info, info_span, warn};

use crate::domain::{
    Assignment, Member, MemberId, SchedulingError, Task, TaskId, TeamId, TimeSlot,
};
use crate::ports::IdGenerator;
use crate::rotation::{
    CombinationSelector, Counters, CycleDetector, CycleWindow, HistoryIndex, RotationPolicy,
    Score, SlotBook, Strategy,
};

const SEED_MODULUS: u64 = 1_000_000;

/// Deterministic ordering seed for a date.
pub fn date_seed(date: NaiveDate) -> u64 {
    i64::from(date.num_days_from_ce()).rem_euclid(SEED_MODULUS as i64) as u64
}

/// Everything one planning run reads. Loaded by the caller.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleRequest<'a> {
    pub team: TeamId,
    pub date: NaiveDate,
    pub members: &'a [Member],
    /// All tasks of the team; soft-deleted ones are ignored.
    pub tasks: &'a [Task],
    /// Past assignments. Rows dated on or after `date` are ignored.
    pub history: &'a [Assignment],
}

/// A task that received members in this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub task_id: TaskId,
    pub task_name: String,
    pub description: String,
    pub headcount: usize,
    pub time_slot: TimeSlot,
    /// In selection order.
    pub members: Vec<Member>,
    pub strategy: Strategy,
    pub relaxed: bool,
    pub score: Option<Score>,
}

impl ScheduledTask {
    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.iter().map(|m| m.id).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer free members in the slot than the task needs.
    SlotShortfall { available: usize, required: usize },
    /// The selector produced nothing even with a large enough pool.
    NoCandidate,
}

/// A task left out of this run. Not an error: the run carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTask {
    pub task_id: TaskId,
    pub task_name: String,
    pub time_slot: TimeSlot,
    pub reason: SkipReason,
}

/// Output of one scheduling run for a single date.
#[derive(Debug, Clone)]
pub struct DailyAssignmentSet {
    pub team: TeamId,
    pub date: NaiveDate,
    pub seed: u64,
    pub cycle: CycleWindow,
    /// In processing order: slots ascending, shuffled within a slot.
    pub scheduled: Vec<ScheduledTask>,
    pub skipped: Vec<SkippedTask>,
    /// Counters after this run's assignments were applied.
    pub counters: Counters,
}

impl DailyAssignmentSet {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn scheduled_task(&self, task: TaskId) -> Option<&ScheduledTask> {
        self.scheduled.iter().find(|s| s.task_id == task)
    }

    /// Assignment rows ready to be stored for `self.date`.
    pub fn to_assignments(&self, ids: &dyn IdGenerator) -> Vec<Assignment> {
        self.scheduled
            .iter()
            .map(|s| {
                Assignment::new(
                    ids.generate_assignment_id(),
                    self.date,
                    s.task_id,
                    s.member_ids(),
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DailyScheduler {
    policy: RotationPolicy,
}

impl DailyScheduler {
    pub fn new(policy: RotationPolicy) -> Self {
        Self { policy }
    }

    pub fn plan(
        &self,
        request: &ScheduleRequest<'_>,
    ) -> Result<DailyAssignmentSet, SchedulingError> {
        let span = info_span!("schedule_day", team = %request.team, date = %request.date);
        let _guard = span.enter();

        if request.members.is_empty() {
            return Err(SchedulingError::NoMembers);
        }
        let mut active: Vec<&Task> = request.tasks.iter().filter(|t| t.is_active()).collect();
        if active.is_empty() {
            return Err(SchedulingError::NoActiveTasks);
        }

        // Normalize input order so only the seed decides shuffles.
        active.sort_by_key(|t| t.id);
        let mut roster: Vec<MemberId> = request.members.iter().map(|m| m.id).collect();
        roster.sort();
        roster.dedup();
        let by_id: HashMap<MemberId, &Member> =
            request.members.iter().map(|m| (m.id, m)).collect();

        let cycle = CycleDetector::new(&self.policy).detect(
            &roster,
            &active,
            request.history,
            request.date,
        );
        let mut seed = date_seed(request.date);
        if cycle.exhausted {
            seed = (seed + 1) % SEED_MODULUS;
            info!(
                cycles = cycle.closed_cycles,
                window_start = ?cycle.start,
                "every combination has occurred, rotating from a fresh cycle"
            );
        }
        let mut rng = StdRng::seed_from_u64(seed);

        let mut rotation = roster.clone();
        rotation.shuffle(&mut rng);

        let history = HistoryIndex::window(request.history, cycle.start, request.date);
        let mut counters = history.counters(&roster);
        let selector = CombinationSelector::new(&history, &self.policy);

        let mut by_slot: BTreeMap<TimeSlot, Vec<&Task>> = BTreeMap::new();
        for task in active {
            by_slot.entry(task.time_slot).or_default().push(task);
        }

        let mut book = SlotBook::new();
        let mut scheduled = Vec::new();
        let mut skipped = Vec::new();
        for (slot, mut tasks) in by_slot {
            tasks.shuffle(&mut rng);
            for task in tasks {
                let available = book.available(slot, &rotation);
                let required = task.people_needed();
                if available.len() < required {
                    warn!(
                        task = %task.name,
                        slot = slot.get(),
                        available = available.len(),
                        required,
                        "not enough free members in slot, skipping task"
                    );
                    skipped.push(SkippedTask {
                        task_id: task.id,
                        task_name: task.name.clone(),
                        time_slot: slot,
                        reason: SkipReason::SlotShortfall {
                            available: available.len(),
                            required,
                        },
                    });
                    continue;
                }

                let Some(selection) = selector.select(task, &available, &counters, &mut rng) else {
                    warn!(task = %task.name, "no candidate selected, skipping task");
                    skipped.push(SkippedTask {
                        task_id: task.id,
                        task_name: task.name.clone(),
                        time_slot: slot,
                        reason: SkipReason::NoCandidate,
                    });
                    continue;
                };

                book.book(slot, &selection.members);
                counters.record(&selection.members);
                scheduled.push(ScheduledTask {
                    task_id: task.id,
                    task_name: task.name.clone(),
                    description: task.description.clone(),
                    headcount: required,
                    time_slot: slot,
                    members: selection
                        .members
                        .iter()
                        .filter_map(|id| by_id.get(id).map(|m| (*m).clone()))
                        .collect(),
                    strategy: selection.strategy,
                    relaxed: selection.relaxed,
                    score: selection.score,
                });
            }
        }

        info!(
            seed,
            exhausted = cycle.exhausted,
            history = history.len(),
            assigned = scheduled.len(),
            skipped = skipped.len(),
            "schedule planned"
        );

        Ok(DailyAssignmentSet {
            team: request.team,
            date: request.date,
            seed,
            cycle,
            scheduled,
            skipped,
            counters,
        })
    }
}
