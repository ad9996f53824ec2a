//! Evaluation context for constraint rules.

use chrono::{NaiveDate, NaiveTime};

use crate::models::{Activity, Facility, Group, SlotAssignment};

/// Everything a constraint rule may inspect about one candidate assignment.
///
/// Carries the candidate itself plus three views over the committed slots:
/// the full flat list, the candidate group's same-day slots (sorted by start
/// time), and all of the group's slots regardless of day. The derived views
/// are built once per candidate so individual rules stay allocation-free.
#[derive(Debug)]
pub struct EvalContext<'a> {
    /// Candidate day.
    pub date: NaiveDate,
    /// Candidate group.
    pub group: &'a Group,
    /// Candidate activity.
    pub activity: &'a Activity,
    /// Candidate facility, if one was found.
    pub facility: Option<&'a Facility>,
    /// Candidate window start.
    pub start_time: NaiveTime,
    /// Candidate window end.
    pub end_time: NaiveTime,
    /// All committed slots.
    pub all_slots: &'a [SlotAssignment],
    /// The group's slots on the candidate day, sorted by start time.
    pub day_slots: Vec<&'a SlotAssignment>,
    /// All of the group's slots, any day.
    pub group_slots: Vec<&'a SlotAssignment>,
}

impl<'a> EvalContext<'a> {
    /// Builds a context, deriving the per-group views from the flat list.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        group: &'a Group,
        activity: &'a Activity,
        facility: Option<&'a Facility>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        all_slots: &'a [SlotAssignment],
    ) -> Self {
        let group_slots: Vec<&SlotAssignment> = all_slots
            .iter()
            .filter(|s| s.group_id == group.id)
            .collect();

        let mut day_slots: Vec<&SlotAssignment> = group_slots
            .iter()
            .copied()
            .filter(|s| s.date == date)
            .collect();
        day_slots.sort_by_key(|s| s.start_time);

        Self {
            date,
            group,
            activity,
            facility,
            start_time,
            end_time,
            all_slots,
            day_slots,
            group_slots,
        }
    }

    /// The group's slot immediately preceding the candidate window, if any.
    pub fn preceding_slot(&self) -> Option<&'a SlotAssignment> {
        self.day_slots
            .iter()
            .copied()
            .filter(|s| s.start_time < self.start_time)
            .next_back()
    }

    /// Occurrences of an activity in the group's candidate-day slots.
    pub fn day_occurrences(&self, activity_id: &str) -> usize {
        self.day_slots
            .iter()
            .filter(|s| s.activity_id.as_deref() == Some(activity_id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Group, SlotAssignment};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn slot(id: &str, d: u32, group: &str, h: u32, activity: &str) -> SlotAssignment {
        SlotAssignment::new(id, date(d), group, "T", time(h), time(h + 1))
            .with_activity(activity)
    }

    #[test]
    fn test_views_are_scoped_and_sorted() {
        let group = Group::new("G1", "S1");
        let activity = Activity::new("swim", 60);
        let slots = vec![
            slot("a", 1, "G1", 11, "swim"),
            slot("b", 1, "G1", 9, "crafts"),
            slot("c", 1, "G2", 9, "swim"),
            slot("d", 2, "G1", 9, "swim"),
        ];

        let ctx = EvalContext::new(
            date(1),
            &group,
            &activity,
            None,
            time(14),
            time(15),
            &slots,
        );

        let day_ids: Vec<&str> = ctx.day_slots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(day_ids, vec!["b", "a"]);
        assert_eq!(ctx.group_slots.len(), 3);
        assert_eq!(ctx.day_occurrences("swim"), 1);
    }

    #[test]
    fn test_preceding_slot() {
        let group = Group::new("G1", "S1");
        let activity = Activity::new("swim", 60);
        let slots = vec![
            slot("a", 1, "G1", 9, "crafts"),
            slot("b", 1, "G1", 11, "swim"),
        ];

        let ctx = EvalContext::new(
            date(1),
            &group,
            &activity,
            None,
            time(14),
            time(15),
            &slots,
        );
        assert_eq!(ctx.preceding_slot().unwrap().id, "b");

        let ctx = EvalContext::new(date(1), &group, &activity, None, time(9), time(10), &slots);
        assert!(ctx.preceding_slot().is_none());
    }
}
