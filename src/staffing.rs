//! Greedy staff assignment.
//!
//! Chronological bipartite fill: slots sorted by (date, start time), each
//! staffed up to its activity's required headcount by active members who
//! still fit under the daily hour cap and are free at that exact time.
//! Optional workload balancing orders candidates by ascending assigned
//! hours. Shortfalls are warnings; fully unstaffable slots are reported,
//! never fatal.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Activity, SlotAssignment, StaffAssignment, StaffMember, StaffRole};

/// Options for one staffing pass.
#[derive(Debug, Clone)]
pub struct StaffingOptions {
    /// Daily hour cap per staff member.
    pub max_hours_per_day: f64,
    /// Prefer the least-loaded available member for each slot.
    pub balance_workload: bool,
}

impl Default for StaffingOptions {
    fn default() -> Self {
        Self {
            max_hours_per_day: 8.0,
            balance_workload: true,
        }
    }
}

/// Output of one staffing pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffingResult {
    /// Assignments made.
    pub assignments: Vec<StaffAssignment>,
    /// Shortfall descriptions.
    pub warnings: Vec<String>,
    /// Slots that received no staff at all.
    pub unassigned_slot_ids: Vec<String>,
}

/// Per-member workload report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffWorkload {
    /// Staff member.
    pub staff_id: String,
    /// Total assigned hours.
    pub total_hours: f64,
    /// Assigned hours per day.
    pub hours_by_day: HashMap<NaiveDate, f64>,
    /// Assigned slot count per day.
    pub slots_by_day: HashMap<NaiveDate, usize>,
    /// Assigned slot count per activity.
    pub slots_by_activity: HashMap<String, usize>,
}

/// Tracks one member's commitments during a pass.
#[derive(Debug, Default)]
struct Load {
    total_hours: f64,
    hours_by_day: HashMap<NaiveDate, f64>,
    booked: HashSet<(NaiveDate, NaiveTime)>,
}

/// Assigns staff to slots, chronologically greedy.
pub fn assign_staff(
    slots: &[SlotAssignment],
    staff: &[StaffMember],
    activities: &[Activity],
    options: &StaffingOptions,
) -> StaffingResult {
    let mut ordered: Vec<&SlotAssignment> =
        slots.iter().filter(|s| s.activity_id.is_some()).collect();
    ordered.sort_by_key(|s| (s.date, s.start_time));

    let mut loads: HashMap<&str, Load> = staff.iter().map(|s| (s.id.as_str(), Load::default())).collect();
    let mut result = StaffingResult::default();

    for slot in ordered {
        let required = slot
            .activity_id
            .as_deref()
            .and_then(|id| activities.iter().find(|a| a.id == id))
            .map_or(1, |a| a.required_staff.max(1));
        let hours = slot.duration_minutes() as f64 / 60.0;

        let mut candidates: Vec<&StaffMember> = staff
            .iter()
            .filter(|m| m.active)
            .filter(|m| {
                let load = &loads[m.id.as_str()];
                let day_hours = load.hours_by_day.get(&slot.date).copied().unwrap_or(0.0);
                day_hours + hours <= options.max_hours_per_day
                    && !load.booked.contains(&(slot.date, slot.start_time))
            })
            .collect();
        if options.balance_workload {
            candidates.sort_by(|a, b| {
                loads[a.id.as_str()]
                    .total_hours
                    .total_cmp(&loads[b.id.as_str()].total_hours)
            });
        }

        if candidates.is_empty() {
            warn!(slot_id = %slot.id, "no staff available");
            result
                .warnings
                .push(format!("slot {} could not be staffed", slot.id));
            result.unassigned_slot_ids.push(slot.id.clone());
            continue;
        }
        if candidates.len() < required as usize {
            result.warnings.push(format!(
                "slot {} needs {} staff, only {} available",
                slot.id,
                required,
                candidates.len()
            ));
        }

        for (i, member) in candidates.iter().take(required as usize).enumerate() {
            let role = if i == 0 {
                StaffRole::Lead
            } else {
                StaffRole::Assistant
            };
            debug!(slot_id = %slot.id, staff_id = %member.id, ?role, "staff assigned");
            result
                .assignments
                .push(StaffAssignment::new(&slot.id, &member.id, role));

            if let Some(load) = loads.get_mut(member.id.as_str()) {
                load.total_hours += hours;
                *load.hours_by_day.entry(slot.date).or_insert(0.0) += hours;
                load.booked.insert((slot.date, slot.start_time));
            }
        }
    }

    result
}

/// Summarizes per-member workload from existing assignments.
///
/// Assignments whose slot id cannot be resolved are skipped. Output is
/// sorted by staff id for stable reporting.
pub fn workload_summary(
    assignments: &[StaffAssignment],
    slots: &[SlotAssignment],
) -> Vec<StaffWorkload> {
    let by_id: HashMap<&str, &SlotAssignment> =
        slots.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut summaries: HashMap<&str, StaffWorkload> = HashMap::new();
    for assignment in assignments {
        let Some(slot) = by_id.get(assignment.slot_id.as_str()) else {
            continue;
        };
        let hours = slot.duration_minutes() as f64 / 60.0;
        let entry = summaries
            .entry(assignment.staff_id.as_str())
            .or_insert_with(|| StaffWorkload {
                staff_id: assignment.staff_id.clone(),
                total_hours: 0.0,
                hours_by_day: HashMap::new(),
                slots_by_day: HashMap::new(),
                slots_by_activity: HashMap::new(),
            });
        entry.total_hours += hours;
        *entry.hours_by_day.entry(slot.date).or_insert(0.0) += hours;
        *entry.slots_by_day.entry(slot.date).or_insert(0) += 1;
        if let Some(activity_id) = &slot.activity_id {
            *entry
                .slots_by_activity
                .entry(activity_id.clone())
                .or_insert(0) += 1;
        }
    }

    let mut out: Vec<StaffWorkload> = summaries.into_values().collect();
    out.sort_by(|a, b| a.staff_id.cmp(&b.staff_id));
    out
}
