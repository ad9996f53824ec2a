//! Constraint rule evaluators and aggregate verdict.
//!
//! One evaluator per [`ConstraintRule`] variant. Three kinds are deliberate
//! stubs at candidate time: `DailyMinimum` (a day-level property that cannot
//! be verified per candidate), `StaffLimit` (enforced by the staffing pass)
//! and `WeatherSubstitute` (enforced by the weather pass). Stubs always
//! satisfy.

use tracing::debug;

use super::EvalContext;
use crate::models::{Constraint, ConstraintRule};

/// Score of a fully satisfied rule.
const FULL_SCORE: f64 = 100.0;

/// Result of evaluating one constraint against one candidate.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    /// Whether the rule is satisfied.
    pub satisfied: bool,
    /// Quality score 0-100 (0 when unsatisfied).
    pub score: f64,
    /// Explanation for unsatisfied or degraded outcomes.
    pub message: Option<String>,
}

impl RuleOutcome {
    fn pass(score: f64) -> Self {
        Self {
            satisfied: true,
            score,
            message: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            satisfied: false,
            score: 0.0,
            message: Some(message.into()),
        }
    }
}

/// A constraint a candidate or committed slot failed.
#[derive(Debug, Clone)]
pub struct RuleViolation {
    /// Violated constraint.
    pub constraint_id: String,
    /// Constraint display name.
    pub constraint_name: String,
    /// Rule kind (e.g., "daily_limit").
    pub kind: &'static str,
    /// Whether the violated rule is hard.
    pub hard: bool,
    /// Explanation.
    pub message: String,
}

/// Aggregate result over all applicable constraints.
#[derive(Debug, Clone)]
pub struct Verdict {
    /// False iff any hard constraint was unsatisfied.
    pub satisfied: bool,
    /// Priority-weighted mean of individual scores.
    pub score: f64,
    /// Every unsatisfied constraint, hard or soft.
    pub violations: Vec<RuleViolation>,
}

/// Evaluates one constraint against one candidate.
pub fn evaluate(constraint: &Constraint, ctx: &EvalContext<'_>) -> RuleOutcome {
    match &constraint.rule {
        ConstraintRule::TimeRestriction {
            activity_id,
            allowed_times,
            blocked_times,
        } => {
            if ctx.activity.id != *activity_id {
                return RuleOutcome::pass(FULL_SCORE);
            }
            if blocked_times.contains(&ctx.start_time) {
                return RuleOutcome::fail(format!(
                    "{} is blocked at {}",
                    ctx.activity.id, ctx.start_time
                ));
            }
            if !allowed_times.is_empty() && !allowed_times.contains(&ctx.start_time) {
                return RuleOutcome::fail(format!(
                    "{} is not allowed at {}",
                    ctx.activity.id, ctx.start_time
                ));
            }
            RuleOutcome::pass(FULL_SCORE)
        }

        ConstraintRule::Sequence {
            before_activity_id,
            after_activity_id,
            must_follow,
        } => {
            let Some(prev) = ctx.preceding_slot() else {
                return RuleOutcome::pass(FULL_SCORE);
            };
            let Some(prev_activity) = prev.activity_id.as_deref() else {
                return RuleOutcome::pass(FULL_SCORE);
            };
            if *must_follow {
                if prev_activity == before_activity_id && ctx.activity.id != *after_activity_id {
                    return RuleOutcome::fail(format!(
                        "{before_activity_id} must be followed by {after_activity_id}"
                    ));
                }
            } else if prev_activity == before_activity_id
                && ctx.activity.id == *after_activity_id
            {
                return RuleOutcome::fail(format!(
                    "{after_activity_id} may not follow {before_activity_id}"
                ));
            }
            RuleOutcome::pass(FULL_SCORE)
        }

        ConstraintRule::DailyLimit {
            activity_id,
            max_per_day,
        } => {
            if ctx.activity.id != *activity_id {
                return RuleOutcome::pass(FULL_SCORE);
            }
            let count = ctx.day_occurrences(activity_id) as i32;
            if count + 1 > *max_per_day {
                return RuleOutcome::fail(format!(
                    "{activity_id} already scheduled {count} time(s), daily limit is {max_per_day}"
                ));
            }
            // Graded: approach the cap, lose up to half the score.
            let utilization = f64::from(count) / f64::from((*max_per_day).max(1));
            RuleOutcome::pass(FULL_SCORE - 50.0 * utilization)
        }

        ConstraintRule::DailyMinimum { activity_id, .. } => {
            // Day-level property; not verifiable per candidate.
            debug!(constraint = %constraint.id, activity = %activity_id,
                "daily_minimum is not evaluated per candidate");
            RuleOutcome::pass(FULL_SCORE)
        }

        ConstraintRule::ConsecutiveLimit {
            activity_id,
            max_consecutive,
        } => {
            let target = activity_id.as_deref().unwrap_or(ctx.activity.id.as_str());
            if ctx.activity.id != target {
                return RuleOutcome::pass(FULL_SCORE);
            }
            let mut run = 0;
            for slot in ctx
                .day_slots
                .iter()
                .filter(|s| s.start_time < ctx.start_time)
                .rev()
            {
                if slot.activity_id.as_deref() == Some(target) {
                    run += 1;
                } else {
                    break;
                }
            }
            if run + 1 > *max_consecutive {
                return RuleOutcome::fail(format!(
                    "{target} would run {} times in a row, limit is {max_consecutive}",
                    run + 1
                ));
            }
            RuleOutcome::pass(FULL_SCORE)
        }

        ConstraintRule::StaffLimit => {
            // Enforced by the staffing pass.
            debug!(constraint = %constraint.id, "staff_limit is not evaluated per candidate");
            RuleOutcome::pass(FULL_SCORE)
        }

        ConstraintRule::WeatherSubstitute { .. } => {
            // Enforced by the weather substitution pass.
            debug!(constraint = %constraint.id, "weather_substitute is not evaluated per candidate");
            RuleOutcome::pass(FULL_SCORE)
        }

        ConstraintRule::FacilityExclusive { facility_id } => {
            let Some(facility) = ctx.facility else {
                return RuleOutcome::pass(FULL_SCORE);
            };
            if let Some(target) = facility_id {
                if *target != facility.id {
                    return RuleOutcome::pass(FULL_SCORE);
                }
            }
            let taken = ctx.all_slots.iter().any(|s| {
                s.date == ctx.date
                    && s.start_time == ctx.start_time
                    && s.group_id != ctx.group.id
                    && s.facility_id.as_deref() == Some(facility.id.as_str())
            });
            if taken {
                return RuleOutcome::fail(format!(
                    "facility {} is already occupied at {}",
                    facility.id, ctx.start_time
                ));
            }
            RuleOutcome::pass(FULL_SCORE)
        }

        ConstraintRule::GapRequired {
            activity_id,
            min_gap_minutes,
        } => {
            if ctx.activity.id != *activity_id {
                return RuleOutcome::pass(FULL_SCORE);
            }
            let last_end = ctx
                .day_slots
                .iter()
                .filter(|s| {
                    s.activity_id.as_deref() == Some(activity_id.as_str())
                        && s.end_time <= ctx.start_time
                })
                .map(|s| s.end_time)
                .max();
            if let Some(end) = last_end {
                let gap = (ctx.start_time - end).num_minutes();
                if gap < *min_gap_minutes {
                    return RuleOutcome::fail(format!(
                        "only {gap} min since last {activity_id}, {min_gap_minutes} min required"
                    ));
                }
            }
            RuleOutcome::pass(FULL_SCORE)
        }

        ConstraintRule::GroupSeparation {
            group_ids,
            facility_based,
        } => {
            if !group_ids.iter().any(|g| *g == ctx.group.id) {
                return RuleOutcome::pass(FULL_SCORE);
            }
            let others_here = |pred: &dyn Fn(&crate::models::SlotAssignment) -> bool| {
                ctx.all_slots.iter().any(|s| {
                    s.date == ctx.date
                        && s.start_time == ctx.start_time
                        && s.group_id != ctx.group.id
                        && group_ids.iter().any(|g| *g == s.group_id)
                        && pred(s)
                })
            };
            if *facility_based {
                let Some(facility) = ctx.facility else {
                    return RuleOutcome::pass(FULL_SCORE);
                };
                if others_here(&|s| s.facility_id.as_deref() == Some(facility.id.as_str())) {
                    return RuleOutcome::fail(format!(
                        "separated groups would share facility {}",
                        facility.id
                    ));
                }
            } else if others_here(&|s| s.activity_id.as_deref() == Some(ctx.activity.id.as_str()))
            {
                return RuleOutcome::fail(format!(
                    "separated groups would share activity {}",
                    ctx.activity.id
                ));
            }
            RuleOutcome::pass(FULL_SCORE)
        }
    }
}

/// Evaluates every applicable constraint and combines the outcomes.
///
/// Inactive constraints and constraints whose scope excludes the candidate
/// are skipped. Any unsatisfied hard constraint fails the verdict; the score
/// is the priority-weighted mean of individual scores (100 when no
/// constraint applies).
pub fn evaluate_all(constraints: &[Constraint], ctx: &EvalContext<'_>) -> Verdict {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut satisfied = true;
    let mut violations = Vec::new();

    for constraint in constraints {
        if !constraint.active {
            continue;
        }
        let facility_id = ctx.facility.map(|f| f.id.as_str());
        if !constraint
            .scope
            .covers(&ctx.activity.id, facility_id, &ctx.group.id)
        {
            continue;
        }

        let outcome = evaluate(constraint, ctx);
        let weight = constraint.weight();
        weighted_sum += outcome.score * weight;
        weight_total += weight;

        if !outcome.satisfied {
            if constraint.hard {
                satisfied = false;
            }
            violations.push(RuleViolation {
                constraint_id: constraint.id.clone(),
                constraint_name: constraint.name.clone(),
                kind: constraint.rule.kind_name(),
                hard: constraint.hard,
                message: outcome
                    .message
                    .unwrap_or_else(|| "constraint not satisfied".into()),
            });
        }
    }

    let score = if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        FULL_SCORE
    };

    Verdict {
        satisfied,
        score,
        violations,
    }
}
