//! The greedy generation loop.

use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::options::{GenerationOptions, OptimizationLevel, Progress};
use super::score::ScheduleScore;
use super::state::RunState;
use crate::constraint::{evaluate_all, EvalContext, RuleViolation};
use crate::feasibility::{self, FeasibilityReport, ScheduleInput};
use crate::models::SlotAssignment;

/// Maximum starting variety bonus for a never-used activity.
const VARIETY_BONUS: f64 = 20.0;
/// Bonus lost per prior use of the activity by the same group.
const VARIETY_DECAY: f64 = 5.0;
/// Score lost per minute of activity/window duration mismatch.
const DURATION_PENALTY_PER_MINUTE: f64 = 0.5;
/// Upper bound of the seeded score jitter.
const JITTER_RANGE: f64 = 5.0;
/// Bonus when the candidate secured a facility and the run prefers that.
const FACILITY_PREFERENCE_BONUS: f64 = 5.0;
/// Survivors considered for the randomized final pick.
const TOP_K: usize = 3;
/// Cells between progress reports and cancellation checks.
const PROGRESS_INTERVAL: usize = 10;

/// Outcome classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// At least half of the theoretical cells were filled.
    Completed,
    /// Some cells were filled, but fewer than half.
    Partial,
    /// No cell could be filled.
    Failed,
}

/// Counters describing what a run did.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Theoretical cell count (days × groups × windows).
    pub total_cells: i64,
    /// Cells filled by this run.
    pub generated: usize,
    /// Cells preserved from pre-existing slots.
    pub preserved: usize,
    /// Cells left without an activity.
    pub unfilled: usize,
    /// Candidate evaluations performed.
    pub candidates_evaluated: usize,
    /// Refinement iterations performed.
    pub iterations: u32,
}

/// Complete result of one generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Whether the run produced a usable timetable.
    pub success: bool,
    /// Outcome classification.
    pub status: RunStatus,
    /// Committed slots: preserved pre-existing plus newly generated.
    pub slots: Vec<SlotAssignment>,
    /// Quality score of the run.
    pub score: ScheduleScore,
    /// Hard-filter violations from cells that ended up unfilled.
    pub violations: Vec<RuleViolation>,
    /// Run counters.
    pub stats: RunStats,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
}

/// Generation was refused before the loop started.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The input set failed the pre-flight feasibility check.
    #[error("input failed {} feasibility check(s)", report.errors.len())]
    Infeasible {
        /// The full pre-flight report.
        report: FeasibilityReport,
    },
}

/// Greedy timetable generator.
///
/// # Example
/// ```
/// use camp_schedule::feasibility::ScheduleInput;
/// use camp_schedule::generator::{GenerationOptions, ScheduleGenerator};
/// use camp_schedule::models::{Activity, DayTemplate, Group, Session, TemplateSlot};
/// use chrono::{NaiveDate, NaiveTime};
///
/// let session = Session::new(
///     "S1",
///     NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 7, 3).unwrap(),
/// );
/// let groups = vec![Group::new("G1", "S1")];
/// let activities = vec![Activity::new("archery", 60), Activity::new("crafts", 60)];
/// let template = DayTemplate::new("default").with_slot(TemplateSlot::new(
///     "am",
///     NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
/// ));
///
/// let input = ScheduleInput {
///     session: &session,
///     groups: &groups,
///     activities: &activities,
///     facilities: &[],
///     template: Some(&template),
///     constraints: &[],
/// };
/// let generator = ScheduleGenerator::new(GenerationOptions::new().with_seed(7));
/// let result = generator.generate(&input, &[]).unwrap();
/// assert_eq!(result.slots.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    options: GenerationOptions,
}

impl ScheduleGenerator {
    /// Creates a generator with the given options.
    pub fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    /// Runs a full generation pass without progress reporting.
    pub fn generate(
        &self,
        input: &ScheduleInput<'_>,
        existing: &[SlotAssignment],
    ) -> Result<GenerationResult, GenerateError> {
        self.generate_with_progress(input, existing, &mut |_| {})
    }

    /// Runs a full generation pass, invoking `on_progress` synchronously
    /// roughly every ten processed cells.
    pub fn generate_with_progress(
        &self,
        input: &ScheduleInput<'_>,
        existing: &[SlotAssignment],
        on_progress: &mut dyn FnMut(&Progress),
    ) -> Result<GenerationResult, GenerateError> {
        let started = Instant::now();

        let report = feasibility::check(input);
        if !report.can_generate {
            return Err(GenerateError::Infeasible { report });
        }
        let total_cells = report.stats.total_slots;

        let mut rng = match self.options.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let groups: Vec<_> = input.groups.iter().filter(|g| g.active).collect();
        let activities: Vec<_> = input.activities.iter().filter(|a| a.active).collect();
        let targets = input
            .template
            .map(|t| t.generation_targets())
            .unwrap_or_default();

        // Without respect_existing every cell this run covers is rebuilt
        // from scratch, so stale pre-existing slots in those cells are
        // dropped up front; keeping them would double-commit the cell.
        let kept: Vec<SlotAssignment> = if self.options.respect_existing {
            existing.to_vec()
        } else {
            let group_ids: HashSet<&str> = groups.iter().map(|g| g.id.as_str()).collect();
            let window_starts: HashSet<_> = targets.iter().map(|w| w.start_time).collect();
            existing
                .iter()
                .filter(|s| {
                    s.date < input.session.start_date
                        || s.date > input.session.end_date
                        || !group_ids.contains(s.group_id.as_str())
                        || !window_starts.contains(&s.start_time)
                })
                .cloned()
                .collect()
        };
        let mut state = RunState::from_existing(&kept);
        let mut stats = RunStats {
            total_cells,
            ..Default::default()
        };
        let mut violations: Vec<RuleViolation> = Vec::new();

        let mut processed = 0usize;
        let mut cancelled = false;

        'run: for date in input.session.days() {
            for window in &targets {
                // Fresh group order per (date, window) so no group always
                // gets first pick of activities and facilities.
                let mut order: Vec<usize> = (0..groups.len()).collect();
                order.shuffle(&mut rng);

                for &group_idx in &order {
                    let group = groups[group_idx];

                    if processed % PROGRESS_INTERVAL == 0 {
                        if let Some(flag) = &self.options.cancel {
                            if flag.load(Ordering::Relaxed) {
                                debug!(%date, "generation cancelled");
                                cancelled = true;
                                break 'run;
                            }
                        }
                        let filled = stats.generated + stats.preserved;
                        on_progress(&Progress {
                            phase: "generating".into(),
                            percentage: if total_cells > 0 {
                                100.0 * processed as f64 / total_cells as f64
                            } else {
                                100.0
                            },
                            current_day: Some(date),
                            current_group: Some(group.id.clone()),
                            slots_generated: filled,
                            total_slots: total_cells as usize,
                            message: format!("{filled} slots committed"),
                        });
                    }
                    processed += 1;

                    if self.options.respect_existing
                        && state.has_slot(date, &group.id, window.start_time)
                    {
                        stats.preserved += 1;
                        continue;
                    }

                    // Evaluate every active activity for this cell.
                    let mut survivors: Vec<(usize, Option<String>, f64)> = Vec::new();
                    let mut cell_violations: Vec<RuleViolation> = Vec::new();

                    for (activity_idx, activity) in activities.iter().enumerate() {
                        let facility = state.first_free_facility(
                            input.facilities,
                            date,
                            window.start_time,
                        );
                        let ctx = EvalContext::new(
                            date,
                            group,
                            activity,
                            facility,
                            window.start_time,
                            window.end_time,
                            &state.slots,
                        );
                        let verdict = evaluate_all(input.constraints, &ctx);
                        stats.candidates_evaluated += 1;

                        if !verdict.satisfied {
                            cell_violations.extend(verdict.violations);
                            continue;
                        }

                        let mut score = verdict.score;
                        if self.options.balance_usage {
                            let usage = state.usage_count(&group.id, &activity.id);
                            score += (VARIETY_BONUS - VARIETY_DECAY * f64::from(usage)).max(0.0);
                        }
                        score -= DURATION_PENALTY_PER_MINUTE
                            * (activity.duration_minutes - window.duration_minutes()).abs()
                                as f64;
                        if self.options.prefer_facility_use && facility.is_some() {
                            score += FACILITY_PREFERENCE_BONUS;
                        }
                        if self.options.seed.is_some() {
                            score -= rng.random_range(0.0..JITTER_RANGE);
                        }

                        survivors.push((
                            activity_idx,
                            facility.map(|f| f.id.clone()),
                            score,
                        ));
                    }

                    if survivors.is_empty() {
                        // Unfillable cell: skip it, keep its violations.
                        stats.unfilled += 1;
                        violations.append(&mut cell_violations);
                        continue;
                    }

                    // Randomized top-K pick among the best survivors.
                    survivors.sort_by(|a, b| {
                        b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal)
                    });
                    let k = survivors.len().min(TOP_K);
                    let (activity_idx, facility_id, _) =
                        survivors.swap_remove(rng.random_range(0..k));
                    let activity = activities[activity_idx];

                    let mut slot = SlotAssignment::new(
                        format!("{date}-{}-{}", window.id, group.id),
                        date,
                        group.id.clone(),
                        window.id.clone(),
                        window.start_time,
                        window.end_time,
                    )
                    .with_activity(activity.id.clone())
                    .newly_generated();
                    if let Some(facility_id) = facility_id {
                        slot = slot.with_facility(facility_id);
                    }
                    state.commit(slot);
                    stats.generated += 1;
                }
            }
        }

        if !cancelled && self.options.optimization == OptimizationLevel::Thorough {
            stats.iterations = self.refine(&mut state);
        }

        let score = ScheduleScore::compute(&state.slots);
        let filled = (stats.generated + stats.preserved) as i64;
        let status = if filled == 0 {
            RunStatus::Failed
        } else if filled * 2 < total_cells {
            RunStatus::Partial
        } else {
            RunStatus::Completed
        };
        let success = status != RunStatus::Failed;

        let duration_ms = started.elapsed().as_millis() as u64;
        on_progress(&Progress {
            phase: "finalizing".into(),
            percentage: 100.0,
            current_day: None,
            current_group: None,
            slots_generated: stats.generated + stats.preserved,
            total_slots: total_cells as usize,
            message: format!("run {status:?}: {} new, {} preserved", stats.generated, stats.preserved),
        });
        info!(
            ?status,
            generated = stats.generated,
            preserved = stats.preserved,
            unfilled = stats.unfilled,
            duration_ms,
            "generation run finished"
        );

        Ok(GenerationResult {
            success,
            status,
            slots: state.slots,
            score,
            violations,
            stats,
            duration_ms,
        })
    }

    /// Thorough-level refinement pass.
    ///
    /// Extension point for local-search improvement; currently counts
    /// iterations without rewriting slots.
    fn refine(&self, _state: &mut RunState) -> u32 {
        let bound = self.options.max_iterations.max(1);
        debug!(iterations = bound, "refinement pass (no rewrites)");
        bound
    }
}
