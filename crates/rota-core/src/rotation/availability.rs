//! Slot availability: who is still free in a time slot on the target date.

use std::collections::{HashMap, HashSet};

use crate::domain::{MemberId, TimeSlot};

/// Bookings made for the target date, per time slot.
///
/// Rows already stored for the target date are replaced, not consulted, so
/// the book only holds what the current run has assigned.
#[derive(Debug, Default)]
pub struct SlotBook {
    booked: HashMap<TimeSlot, HashSet<MemberId>>,
}

impl SlotBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members of `pool` with no booking in `slot`, in pool order.
    pub fn available(&self, slot: TimeSlot, pool: &[MemberId]) -> Vec<MemberId> {
        match self.booked.get(&slot) {
            Some(booked) => pool
                .iter()
                .copied()
                .filter(|m| !booked.contains(m))
                .collect(),
            None => pool.to_vec(),
        }
    }

    pub fn book(&mut self, slot: TimeSlot, members: &[MemberId]) {
        self.booked
            .entry(slot)
            .or_default()
            .extend(members.iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn member(n: u128) -> MemberId {
        MemberId::from_ulid(Ulid::from_parts(0, n))
    }

    fn slot(n: u8) -> TimeSlot {
        TimeSlot::new(n).unwrap()
    }

    #[test]
    fn booked_members_are_filtered_within_the_same_slot() {
        let pool = vec![member(1), member(2), member(3)];
        let mut book = SlotBook::new();
        book.book(slot(1), &[member(2)]);

        assert_eq!(book.available(slot(1), &pool), vec![member(1), member(3)]);
    }

    #[test]
    fn other_slots_are_unaffected() {
        let pool = vec![member(1), member(2)];
        let mut book = SlotBook::new();
        book.book(slot(1), &[member(1), member(2)]);

        assert!(book.available(slot(1), &pool).is_empty());
        assert_eq!(book.available(slot(2), &pool), pool);
    }
}
