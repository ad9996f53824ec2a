//! Schedule quality score.
//!
//! Four components, each 0-100: constraint health, activity balance,
//! variety, and facility utilization. Constraint and variety are fixed
//! baselines for now — extension points for a future refinement pass —
//! while balance and facility utilization are computed from the run's
//! output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::SlotAssignment;

/// Baseline for the soft-constraint health component.
const CONSTRAINT_BASELINE: f64 = 85.0;
/// Baseline for the variety component.
const VARIETY_BASELINE: f64 = 80.0;

/// Quality score of a generation run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScheduleScore {
    /// Mean of the four components.
    pub total: f64,
    /// Soft-rule health (fixed baseline).
    pub constraint_score: f64,
    /// 100 − 2 × variance of per-activity assignment counts, floored at 0.
    pub balance_score: f64,
    /// Activity variety (fixed baseline).
    pub variety_score: f64,
    /// Percentage of generated slots that received a facility.
    pub facility_utilization: f64,
}

impl ScheduleScore {
    /// Computes the score over the slots generated by the current run.
    pub fn compute(slots: &[SlotAssignment]) -> Self {
        let generated: Vec<&SlotAssignment> = slots.iter().filter(|s| s.is_new).collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for slot in &generated {
            if let Some(activity_id) = slot.activity_id.as_deref() {
                *counts.entry(activity_id).or_insert(0) += 1;
            }
        }

        let balance_score = if counts.is_empty() {
            100.0
        } else {
            let n = counts.len() as f64;
            let mean = counts.values().map(|&c| c as f64).sum::<f64>() / n;
            let variance = counts
                .values()
                .map(|&c| (c as f64 - mean).powi(2))
                .sum::<f64>()
                / n;
            (100.0 - 2.0 * variance).max(0.0)
        };

        let facility_utilization = if generated.is_empty() {
            0.0
        } else {
            let with_facility = generated.iter().filter(|s| s.facility_id.is_some()).count();
            100.0 * with_facility as f64 / generated.len() as f64
        };

        let constraint_score = CONSTRAINT_BASELINE;
        let variety_score = VARIETY_BASELINE;
        let total =
            (constraint_score + balance_score + variety_score + facility_utilization) / 4.0;

        Self {
            total,
            constraint_score,
            balance_score,
            variety_score,
            facility_utilization,
        }
    }
}
