//! Task definitions: recurring chores with a headcount and a time slot.

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use super::errors::SchedulingError;
use super::ids::TaskId;

/// One of the five mutually exclusive periods of a day.
///
/// A member may hold at most one task per slot per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TimeSlot(u8);

impl TimeSlot {
    pub const FIRST: TimeSlot = TimeSlot(1);
    pub const LAST: TimeSlot = TimeSlot(5);

    pub fn new(slot: u8) -> Result<Self, SchedulingError> {
        if (Self::FIRST.0..=Self::LAST.0).contains(&slot) {
            Ok(Self(slot))
        } else {
            Err(SchedulingError::InvalidTimeSlot(slot))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for TimeSlot {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for TimeSlot {
    type Error = SchedulingError;

    fn try_from(slot: u8) -> Result<Self, Self::Error> {
        Self::new(slot)
    }
}

impl From<TimeSlot> for u8 {
    fn from(slot: TimeSlot) -> Self {
        slot.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A schedulable duty.
///
/// Soft-deleted tasks (`is_deleted`) are never scheduled again, but their
/// historical assignments keep counting towards member workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub headcount: NonZeroUsize,
    #[serde(default)]
    pub time_slot: TimeSlot,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Task {
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        headcount: usize,
        time_slot: TimeSlot,
    ) -> Result<Self, SchedulingError> {
        let headcount = NonZeroUsize::new(headcount).ok_or(SchedulingError::InvalidHeadcount)?;
        Ok(Self {
            id,
            name: name.into(),
            description: String::new(),
            headcount,
            time_slot,
            is_deleted: false,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Number of members this task needs.
    pub fn people_needed(&self) -> usize {
        self.headcount.get()
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
