//! Post-hoc conflict audit.
//!
//! Pure scan over any slot collection — freshly generated or manually
//! edited — for double-bookings, constraint violations, capacity overruns
//! and unfilled cells. The detector never mutates anything; callers decide
//! what to do with the findings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constraint::{evaluate_all, EvalContext};
use crate::models::{Activity, Constraint, Facility, Group, SlotAssignment};

/// Classification of a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Two or more groups share a facility at the same time.
    FacilityDoubleBooking,
    /// A committed slot violates an active constraint.
    ConstraintViolation,
    /// A group's headcount exceeds its facility's capacity.
    CapacityExceeded,
    /// A cell has no activity assigned.
    MissingActivity,
}

/// How serious a conflict is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; the schedule is still usable.
    Info,
    /// Should be fixed, but does not invalidate the schedule.
    Warning,
    /// Invalidates the schedule.
    Critical,
}

/// One detected conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    /// Stable identifier derived from kind and affected slots.
    pub id: String,
    /// Conflict classification.
    pub kind: ConflictKind,
    /// Severity level.
    pub severity: Severity,
    /// Short human-readable summary.
    pub message: String,
    /// Longer explanation.
    pub description: String,
    /// Slots involved in the conflict.
    pub slot_ids: Vec<String>,
    /// Optional remediation hint.
    pub suggestion: Option<String>,
}

/// Reference data the detector resolves ids against.
#[derive(Debug, Clone, Copy)]
pub struct DetectorInput<'a> {
    /// Participant groups.
    pub groups: &'a [Group],
    /// Activity catalogue.
    pub activities: &'a [Activity],
    /// Facility catalogue.
    pub facilities: &'a [Facility],
    /// Constraint catalogue.
    pub constraints: &'a [Constraint],
}

/// Scans a slot collection for conflicts.
pub fn detect(slots: &[SlotAssignment], input: &DetectorInput<'_>) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    detect_double_bookings(slots, &mut conflicts);
    detect_constraint_violations(slots, input, &mut conflicts);
    detect_capacity_overruns(slots, input, &mut conflicts);
    detect_missing_activities(slots, &mut conflicts);
    conflicts
}

/// Whether a schedule is valid: no critical conflicts.
pub fn is_schedule_valid(conflicts: &[Conflict]) -> bool {
    !conflicts.iter().any(|c| c.severity == Severity::Critical)
}

fn detect_double_bookings(slots: &[SlotAssignment], out: &mut Vec<Conflict>) {
    let mut by_occupancy: HashMap<(_, _, &str), Vec<&SlotAssignment>> = HashMap::new();
    for slot in slots {
        if let Some(facility_id) = slot.facility_id.as_deref() {
            by_occupancy
                .entry((slot.date, slot.start_time, facility_id))
                .or_default()
                .push(slot);
        }
    }

    let mut groups: Vec<_> = by_occupancy.into_iter().collect();
    groups.sort_by_key(|((date, time, facility), _)| (*date, *time, facility.to_string()));

    for ((date, time, facility_id), members) in groups {
        if members.len() < 2 {
            continue;
        }
        let slot_ids: Vec<String> = members.iter().map(|s| s.id.clone()).collect();
        out.push(Conflict {
            id: format!("double-{date}-{time}-{facility_id}"),
            kind: ConflictKind::FacilityDoubleBooking,
            severity: Severity::Critical,
            message: format!("facility {facility_id} double-booked"),
            description: format!(
                "{} groups occupy facility {facility_id} on {date} at {time}",
                members.len()
            ),
            slot_ids,
            suggestion: Some("move one of the slots to a different facility".into()),
        });
    }
}

fn detect_constraint_violations(
    slots: &[SlotAssignment],
    input: &DetectorInput<'_>,
    out: &mut Vec<Conflict>,
) {
    // One shared buffer; the audited slot is swapped out for its own
    // evaluation and swapped back, so the order stays stable.
    let mut rest: Vec<SlotAssignment> = slots.to_vec();

    for (i, slot) in slots.iter().enumerate() {
        let Some(activity_id) = slot.activity_id.as_deref() else {
            continue;
        };
        let Some(group) = input.groups.iter().find(|g| g.id == slot.group_id) else {
            continue;
        };
        let Some(activity) = input.activities.iter().find(|a| a.id == activity_id) else {
            continue;
        };
        let facility = slot
            .facility_id
            .as_deref()
            .and_then(|id| input.facilities.iter().find(|f| f.id == id));

        // Evaluate against the rest of the collection, not the slot itself.
        let audited = rest.swap_remove(i);
        let ctx = EvalContext::new(
            slot.date,
            group,
            activity,
            facility,
            slot.start_time,
            slot.end_time,
            &rest,
        );
        let verdict = evaluate_all(input.constraints, &ctx);
        rest.push(audited);
        let last = rest.len() - 1;
        rest.swap(i, last);

        for violation in verdict.violations {
            out.push(Conflict {
                id: format!("constraint-{}-{}", violation.constraint_id, slot.id),
                kind: ConflictKind::ConstraintViolation,
                severity: if violation.hard {
                    Severity::Critical
                } else {
                    Severity::Warning
                },
                message: format!("{} violated", violation.kind),
                description: violation.message,
                slot_ids: vec![slot.id.clone()],
                suggestion: Some("reassign the slot's activity or facility".into()),
            });
        }
    }
}

fn detect_capacity_overruns(
    slots: &[SlotAssignment],
    input: &DetectorInput<'_>,
    out: &mut Vec<Conflict>,
) {
    for slot in slots {
        let Some(facility_id) = slot.facility_id.as_deref() else {
            continue;
        };
        let Some(facility) = input.facilities.iter().find(|f| f.id == facility_id) else {
            continue;
        };
        let Some(group) = input.groups.iter().find(|g| g.id == slot.group_id) else {
            continue;
        };
        if group.headcount > facility.capacity {
            out.push(Conflict {
                id: format!("capacity-{}", slot.id),
                kind: ConflictKind::CapacityExceeded,
                severity: Severity::Warning,
                message: format!("facility {facility_id} over capacity"),
                description: format!(
                    "group {} has {} participants, facility {facility_id} holds {}",
                    group.id, group.headcount, facility.capacity
                ),
                slot_ids: vec![slot.id.clone()],
                suggestion: Some("assign a larger facility".into()),
            });
        }
    }
}

fn detect_missing_activities(slots: &[SlotAssignment], out: &mut Vec<Conflict>) {
    for slot in slots {
        if slot.activity_id.is_none() {
            out.push(Conflict {
                id: format!("missing-{}", slot.id),
                kind: ConflictKind::MissingActivity,
                severity: Severity::Info,
                message: "cell has no activity".into(),
                description: format!(
                    "group {} on {} at {} has no activity assigned",
                    slot.group_id, slot.date, slot.start_time
                ),
                slot_ids: vec![slot.id.clone()],
                suggestion: Some("fill the cell manually or regenerate".into()),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConstraintRule;
    use chrono::{NaiveDate, NaiveTime};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn slot(id: &str, group: &str, h: u32) -> SlotAssignment {
        SlotAssignment::new(id, date(1), group, "T", time(h), time(h + 1))
    }

    fn empty_input<'a>() -> DetectorInput<'a> {
        DetectorInput {
            groups: &[],
            activities: &[],
            facilities: &[],
            constraints: &[],
        }
    }

    #[test]
    fn test_double_booking_detected_once() {
        let slots = vec![
            slot("a", "G1", 9).with_activity("swim").with_facility("lake"),
            slot("b", "G2", 9).with_activity("kayak").with_facility("lake"),
        ];
        let conflicts = detect(&slots, &empty_input());

        let doubles: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::FacilityDoubleBooking)
            .collect();
        assert_eq!(doubles.len(), 1);
        assert_eq!(doubles[0].severity, Severity::Critical);
        assert_eq!(doubles[0].slot_ids.len(), 2);
        assert!(doubles[0].slot_ids.contains(&"a".to_string()));
        assert!(doubles[0].slot_ids.contains(&"b".to_string()));
        assert!(!is_schedule_valid(&conflicts));
    }

    #[test]
    fn test_same_facility_different_times_is_fine() {
        let slots = vec![
            slot("a", "G1", 9).with_activity("swim").with_facility("lake"),
            slot("b", "G2", 10).with_activity("kayak").with_facility("lake"),
        ];
        let conflicts = detect(&slots, &empty_input());
        assert!(conflicts
            .iter()
            .all(|c| c.kind != ConflictKind::FacilityDoubleBooking));
        assert!(is_schedule_valid(&conflicts));
    }

    #[test]
    fn test_hard_violation_is_critical_soft_is_warning() {
        let groups = vec![Group::new("G1", "S1")];
        let activities = vec![Activity::new("swim", 60)];
        let slots = vec![
            slot("a", "G1", 9).with_activity("swim"),
            slot("b", "G1", 10).with_activity("swim"),
        ];

        let hard = vec![Constraint::hard(
            "cap",
            ConstraintRule::DailyLimit {
                activity_id: "swim".into(),
                max_per_day: 1,
            },
        )];
        let input = DetectorInput {
            groups: &groups,
            activities: &activities,
            facilities: &[],
            constraints: &hard,
        };
        let conflicts = detect(&slots, &input);
        let violations: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::ConstraintViolation)
            .collect();
        assert!(!violations.is_empty());
        assert!(violations.iter().all(|c| c.severity == Severity::Critical));
        assert!(!is_schedule_valid(&conflicts));

        let soft = vec![Constraint::new(
            "cap",
            ConstraintRule::DailyLimit {
                activity_id: "swim".into(),
                max_per_day: 1,
            },
        )];
        let input = DetectorInput {
            groups: &groups,
            activities: &activities,
            facilities: &[],
            constraints: &soft,
        };
        let conflicts = detect(&slots, &input);
        assert!(conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::ConstraintViolation)
            .all(|c| c.severity == Severity::Warning));
        assert!(is_schedule_valid(&conflicts));
    }

    #[test]
    fn test_every_slot_audited_against_all_others() {
        // Three same-day uses under a limit of two: each of the three
        // slots sees the other two and is flagged.
        let groups = vec![Group::new("G1", "S1")];
        let activities = vec![Activity::new("swim", 60)];
        let constraints = vec![Constraint::hard(
            "cap",
            ConstraintRule::DailyLimit {
                activity_id: "swim".into(),
                max_per_day: 2,
            },
        )];
        let slots = vec![
            slot("a", "G1", 9).with_activity("swim"),
            slot("b", "G1", 10).with_activity("swim"),
            slot("c", "G1", 11).with_activity("swim"),
        ];
        let input = DetectorInput {
            groups: &groups,
            activities: &activities,
            facilities: &[],
            constraints: &constraints,
        };
        let conflicts = detect(&slots, &input);
        let flagged: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::ConstraintViolation)
            .collect();
        assert_eq!(flagged.len(), 3);
        for id in ["a", "b", "c"] {
            assert!(flagged.iter().any(|c| c.slot_ids == vec![id.to_string()]));
        }
    }

    #[test]
    fn test_clean_slot_not_flagged_against_itself() {
        // A single slot must not trip a daily limit of 1 by counting itself.
        let groups = vec![Group::new("G1", "S1")];
        let activities = vec![Activity::new("swim", 60)];
        let constraints = vec![Constraint::hard(
            "cap",
            ConstraintRule::DailyLimit {
                activity_id: "swim".into(),
                max_per_day: 1,
            },
        )];
        let slots = vec![slot("a", "G1", 9).with_activity("swim")];
        let input = DetectorInput {
            groups: &groups,
            activities: &activities,
            facilities: &[],
            constraints: &constraints,
        };
        let conflicts = detect(&slots, &input);
        assert!(conflicts
            .iter()
            .all(|c| c.kind != ConflictKind::ConstraintViolation));
    }

    #[test]
    fn test_capacity_overrun_is_warning() {
        let groups = vec![Group::new("G1", "S1").with_size(20, 18)];
        let facilities = vec![Facility::new("den", 10)];
        let slots = vec![slot("a", "G1", 9).with_activity("crafts").with_facility("den")];
        let input = DetectorInput {
            groups: &groups,
            activities: &[],
            facilities: &facilities,
            constraints: &[],
        };
        let conflicts = detect(&slots, &input);
        let overruns: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::CapacityExceeded)
            .collect();
        assert_eq!(overruns.len(), 1);
        assert_eq!(overruns[0].severity, Severity::Warning);
        assert!(is_schedule_valid(&conflicts));
    }

    #[test]
    fn test_missing_activity_is_info() {
        let slots = vec![slot("a", "G1", 9)];
        let conflicts = detect(&slots, &empty_input());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::MissingActivity);
        assert_eq!(conflicts[0].severity, Severity::Info);
        assert!(is_schedule_valid(&conflicts));
    }

    #[test]
    fn test_conflict_ids_are_stable() {
        let slots = vec![
            slot("a", "G1", 9).with_activity("swim").with_facility("lake"),
            slot("b", "G2", 9).with_activity("kayak").with_facility("lake"),
        ];
        let first = detect(&slots, &empty_input());
        let second = detect(&slots, &empty_input());
        let ids = |cs: &[Conflict]| cs.iter().map(|c| c.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }
}
