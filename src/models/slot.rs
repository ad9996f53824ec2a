//! Slot assignment model.
//!
//! A slot assignment is the atomic unit the engine reasons about: one
//! (date, group, template slot) cell with an optional activity and facility.
//! Cells without an activity are "unfilled" and show up as info-level
//! conflicts in the audit.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One (date, group, template slot) cell of the timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAssignment {
    /// Unique slot identifier.
    pub id: String,
    /// Calendar day.
    pub date: NaiveDate,
    /// Owning group.
    pub group_id: String,
    /// Template window this cell instantiates.
    pub template_slot_id: String,
    /// Window start.
    pub start_time: NaiveTime,
    /// Window end.
    pub end_time: NaiveTime,
    /// Assigned activity, if any.
    pub activity_id: Option<String>,
    /// Assigned facility, if any.
    pub facility_id: Option<String>,
    /// Whether this slot was produced by the current generation run.
    pub is_new: bool,
}

impl SlotAssignment {
    /// Creates an unfilled cell.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        group_id: impl Into<String>,
        template_slot_id: impl Into<String>,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            group_id: group_id.into(),
            template_slot_id: template_slot_id.into(),
            start_time,
            end_time,
            activity_id: None,
            facility_id: None,
            is_new: false,
        }
    }

    /// Sets the assigned activity.
    pub fn with_activity(mut self, activity_id: impl Into<String>) -> Self {
        self.activity_id = Some(activity_id.into());
        self
    }

    /// Sets the assigned facility.
    pub fn with_facility(mut self, facility_id: impl Into<String>) -> Self {
        self.facility_id = Some(facility_id.into());
        self
    }

    /// Marks the slot as produced by the current run.
    pub fn newly_generated(mut self) -> Self {
        self.is_new = true;
        self
    }

    /// Window length in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
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

    #[test]
    fn test_slot_builder() {
        let s = SlotAssignment::new("SL1", date(1), "G1", "T1", time(9), time(10))
            .with_activity("archery")
            .with_facility("range")
            .newly_generated();
        assert_eq!(s.activity_id.as_deref(), Some("archery"));
        assert_eq!(s.facility_id.as_deref(), Some("range"));
        assert!(s.is_new);
        assert_eq!(s.duration_minutes(), 60);
    }

    #[test]
    fn test_unfilled_cell() {
        let s = SlotAssignment::new("SL1", date(1), "G1", "T1", time(9), time(10));
        assert!(s.activity_id.is_none());
        assert!(s.facility_id.is_none());
        assert!(!s.is_new);
    }
}
