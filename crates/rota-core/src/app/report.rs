//! Report - 割り当て表とワークロードの表示用ビュー

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::scheduler::ScheduledTask;
use crate::domain::{Assignment, MemberId, TaskId, TeamSnapshot};
use crate::rotation::HistoryIndex;

/// One rendered assignment: task details plus member names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub date: NaiveDate,
    pub task_id: TaskId,
    pub task: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub headcount: usize,
    pub time_slot: u8,
    pub members: Vec<String>,
}

impl ScheduleRow {
    /// Render a stored assignment. Tasks missing from the snapshot keep
    /// their id as the name.
    pub fn from_assignment(snapshot: &TeamSnapshot, assignment: &Assignment) -> Self {
        let task = snapshot.task(assignment.task_id);
        let names = snapshot.member_names();
        Self {
            date: assignment.date,
            task_id: assignment.task_id,
            task: task.map_or_else(|| assignment.task_id.to_string(), |t| t.name.clone()),
            description: task.map(|t| t.description.clone()).unwrap_or_default(),
            headcount: assignment.members.len(),
            time_slot: task.map_or(0, |t| t.time_slot.get()),
            members: assignment
                .members
                .iter()
                .map(|m| names.get(m).map_or_else(|| m.to_string(), |n| n.to_string()))
                .collect(),
        }
    }

    pub fn from_scheduled(date: NaiveDate, scheduled: &ScheduledTask) -> Self {
        Self {
            date,
            task_id: scheduled.task_id,
            task: scheduled.task_name.clone(),
            description: scheduled.description.clone(),
            headcount: scheduled.headcount,
            time_slot: scheduled.time_slot.get(),
            members: scheduled.members.iter().map(|m| m.name.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadEntry {
    pub member_id: MemberId,
    pub name: String,
    pub tasks: u32,
}

/// Lifetime task counts per member, soft-deleted tasks included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadReport {
    /// Busiest first, then by name.
    pub entries: Vec<WorkloadEntry>,
    pub spread: u32,
}

impl WorkloadReport {
    pub fn from_snapshot(snapshot: &TeamSnapshot) -> Self {
        let roster: Vec<MemberId> = snapshot.members.iter().map(|m| m.id).collect();
        let counters =
            HistoryIndex::before(&snapshot.assignments, NaiveDate::MAX).counters(&roster);

        let mut entries: Vec<WorkloadEntry> = snapshot
            .members
            .iter()
            .map(|m| WorkloadEntry {
                member_id: m.id,
                name: m.name.clone(),
                tasks: counters.task_count(m.id),
            })
            .collect();
        entries.sort_by(|a, b| b.tasks.cmp(&a.tasks).then_with(|| a.name.cmp(&b.name)));

        Self {
            entries,
            spread: counters.spread(),
        }
    }
}
