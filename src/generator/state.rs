//! Run-scoped mutable generation state.
//!
//! Owned by one generation run and dropped with it: usage counters,
//! facility reservations and the committed slot list never leak across
//! runs or sessions. All accumulators are rebuilt from the pre-existing
//! slots at run start, and lookups that would otherwise be linear scans
//! over the flat slot list go through hash indices instead.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime};

use crate::models::{Facility, SlotAssignment};

/// Mutable accumulators for one generation run.
#[derive(Debug, Default)]
pub(super) struct RunState {
    /// Committed slots: pre-existing first, then generated.
    pub slots: Vec<SlotAssignment>,
    /// Per-(group, activity) usage tallies, for the variety bonus.
    usage: HashMap<(String, String), u32>,
    /// Facilities already claimed per (date, start time).
    reservations: HashMap<(NaiveDate, NaiveTime), HashSet<String>>,
    /// Occupied cells, keyed by (date, group, start time).
    occupied: HashSet<(NaiveDate, String, NaiveTime)>,
}

impl RunState {
    /// Builds run state from the pre-existing slots for the date range.
    pub fn from_existing(existing: &[SlotAssignment]) -> Self {
        let mut state = Self::default();
        for slot in existing {
            state.index(slot);
            state.slots.push(slot.clone());
        }
        state
    }

    /// Whether a cell is already occupied.
    pub fn has_slot(&self, date: NaiveDate, group_id: &str, start_time: NaiveTime) -> bool {
        // Owned key: the set stores (NaiveDate, String, NaiveTime).
        self.occupied
            .contains(&(date, group_id.to_string(), start_time))
    }

    /// How often a group has already been given an activity.
    pub fn usage_count(&self, group_id: &str, activity_id: &str) -> u32 {
        self.usage
            .get(&(group_id.to_string(), activity_id.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// First active facility not yet reserved at the given date/time.
    ///
    /// Returns `None` when every facility is taken or none exist.
    pub fn first_free_facility<'a>(
        &self,
        facilities: &'a [Facility],
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Option<&'a Facility> {
        let reserved = self.reservations.get(&(date, start_time));
        facilities
            .iter()
            .filter(|f| f.active)
            .find(|f| reserved.map_or(true, |r| !r.contains(&f.id)))
    }

    /// Commits a slot and updates every index.
    pub fn commit(&mut self, slot: SlotAssignment) {
        self.index(&slot);
        self.slots.push(slot);
    }

    fn index(&mut self, slot: &SlotAssignment) {
        self.occupied
            .insert((slot.date, slot.group_id.clone(), slot.start_time));
        if let Some(activity_id) = &slot.activity_id {
            *self
                .usage
                .entry((slot.group_id.clone(), activity_id.clone()))
                .or_insert(0) += 1;
        }
        if let Some(facility_id) = &slot.facility_id {
            self.reservations
                .entry((slot.date, slot.start_time))
                .or_default()
                .insert(facility_id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn slot(id: &str, group: &str, h: u32) -> SlotAssignment {
        SlotAssignment::new(id, date(1), group, "T", time(h), time(h + 1))
    }

    #[test]
    fn test_rebuilt_from_existing() {
        let existing = vec![
            slot("a", "G1", 9).with_activity("swim").with_facility("lake"),
            slot("b", "G2", 9).with_activity("crafts"),
        ];
        let state = RunState::from_existing(&existing);

        assert!(state.has_slot(date(1), "G1", time(9)));
        assert!(!state.has_slot(date(1), "G1", time(10)));
        assert_eq!(state.usage_count("G1", "swim"), 1);
        assert_eq!(state.usage_count("G2", "swim"), 0);
        assert_eq!(state.slots.len(), 2);
    }

    #[test]
    fn test_first_free_facility_skips_reserved() {
        let facilities = vec![Facility::new("lake", 30), Facility::new("hall", 40)];
        let mut state = RunState::default();
        state.commit(slot("a", "G1", 9).with_facility("lake"));

        let free = state.first_free_facility(&facilities, date(1), time(9)).unwrap();
        assert_eq!(free.id, "hall");
        // Other hour: everything free again.
        let free = state.first_free_facility(&facilities, date(1), time(10)).unwrap();
        assert_eq!(free.id, "lake");
    }

    #[test]
    fn test_all_facilities_reserved() {
        let facilities = vec![Facility::new("lake", 30)];
        let mut state = RunState::default();
        state.commit(slot("a", "G1", 9).with_facility("lake"));
        assert!(state
            .first_free_facility(&facilities, date(1), time(9))
            .is_none());
    }

    #[test]
    fn test_inactive_facility_never_offered() {
        let facilities = vec![Facility::new("closed", 30).inactive()];
        let state = RunState::default();
        assert!(state
            .first_free_facility(&facilities, date(1), time(9))
            .is_none());
    }

    #[test]
    fn test_usage_accumulates() {
        let mut state = RunState::default();
        state.commit(slot("a", "G1", 9).with_activity("swim"));
        state.commit(slot("b", "G1", 10).with_activity("swim"));
        assert_eq!(state.usage_count("G1", "swim"), 2);
    }
}
