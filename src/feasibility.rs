//! Pre-flight feasibility checks for a generation run.
//!
//! Validates the full input set before any generation is attempted and
//! reports categorized errors, advisory warnings, and run-size statistics.
//! Errors block generation; warnings never do.

use serde::{Deserialize, Serialize};

use crate::models::{
    Activity, Constraint, ConstraintRule, DayTemplate, Facility, Group, Session,
};

/// Borrowed view of everything a generation run consumes.
///
/// The caller supplies records already filtered to the right tenant; this
/// engine only distinguishes active from inactive rows.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleInput<'a> {
    /// Session being scheduled.
    pub session: &'a Session,
    /// Participant groups.
    pub groups: &'a [Group],
    /// Available activities.
    pub activities: &'a [Activity],
    /// Available facilities (may be empty).
    pub facilities: &'a [Facility],
    /// Default day template, if one exists.
    pub template: Option<&'a DayTemplate>,
    /// Constraint catalogue.
    pub constraints: &'a [Constraint],
}

/// Categories of feasibility findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Session end date precedes its start date.
    InvalidDateRange,
    /// Session status does not allow generation.
    SessionNotSchedulable,
    /// No active groups to schedule.
    NoActiveGroups,
    /// No active activities to choose from.
    NoActiveActivities,
    /// Only one or two active activities; variety will suffer.
    FewActivities,
    /// No active facilities; slots will carry no space assignment.
    NoActiveFacilities,
    /// No default day template supplied.
    MissingTemplate,
    /// Template has no schedulable activity windows.
    NoSchedulableSlots,
    /// Unusually many active hard constraints.
    ManyHardConstraints,
    /// Hard facility exclusivity with fewer facilities than groups.
    FacilityPressure,
    /// Run would generate a very large number of slots.
    LargeRun,
}

/// One feasibility finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeasibilityIssue {
    /// Finding category.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
}

impl FeasibilityIssue {
    fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Run-size statistics derived from the input set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeasibilityStats {
    /// Inclusive day count of the session.
    pub total_days: i64,
    /// Active group count.
    pub total_groups: usize,
    /// Active activity count.
    pub total_activities: usize,
    /// Active facility count.
    pub total_facilities: usize,
    /// Schedulable activity windows per day.
    pub slots_per_day: usize,
    /// `total_days × total_groups × slots_per_day`.
    pub total_slots: i64,
    /// Active hard constraint count.
    pub hard_constraints: usize,
    /// Active soft constraint count.
    pub soft_constraints: usize,
}

/// Outcome of the pre-flight check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeasibilityReport {
    /// Blocking problems.
    pub errors: Vec<FeasibilityIssue>,
    /// Advisory findings.
    pub warnings: Vec<FeasibilityIssue>,
    /// Run-size statistics.
    pub stats: FeasibilityStats,
    /// True iff no errors were found. Warnings never block.
    pub can_generate: bool,
}

/// Runs every feasibility check over the input set.
pub fn check(input: &ScheduleInput<'_>) -> FeasibilityReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let session = input.session;
    if !session.has_valid_range() {
        errors.push(FeasibilityIssue::new(
            IssueKind::InvalidDateRange,
            format!(
                "session ends {} before it starts {}",
                session.end_date, session.start_date
            ),
        ));
    }
    if !session.can_generate() {
        errors.push(FeasibilityIssue::new(
            IssueKind::SessionNotSchedulable,
            format!("session status {:?} does not allow generation", session.status),
        ));
    }

    let active_groups = input.groups.iter().filter(|g| g.active).count();
    if active_groups == 0 {
        errors.push(FeasibilityIssue::new(
            IssueKind::NoActiveGroups,
            "no active groups to schedule",
        ));
    }

    let active_activities = input.activities.iter().filter(|a| a.active).count();
    if active_activities == 0 {
        errors.push(FeasibilityIssue::new(
            IssueKind::NoActiveActivities,
            "no active activities to choose from",
        ));
    } else if active_activities <= 2 {
        warnings.push(FeasibilityIssue::new(
            IssueKind::FewActivities,
            format!("only {active_activities} active activities; expect a repetitive timetable"),
        ));
    }

    let active_facilities = input.facilities.iter().filter(|f| f.active).count();
    if active_facilities == 0 {
        warnings.push(FeasibilityIssue::new(
            IssueKind::NoActiveFacilities,
            "no active facilities; slots will be generated without space assignment",
        ));
    }

    let slots_per_day = match input.template {
        None => {
            errors.push(FeasibilityIssue::new(
                IssueKind::MissingTemplate,
                "no default day template supplied",
            ));
            0
        }
        Some(template) => {
            let targets = template.generation_targets().len();
            if targets == 0 {
                errors.push(FeasibilityIssue::new(
                    IssueKind::NoSchedulableSlots,
                    format!("template {} has no schedulable activity windows", template.id),
                ));
            }
            targets
        }
    };

    let active_constraints: Vec<&Constraint> =
        input.constraints.iter().filter(|c| c.active).collect();
    let hard_constraints = active_constraints.iter().filter(|c| c.hard).count();
    let soft_constraints = active_constraints.len() - hard_constraints;

    if hard_constraints > 20 {
        warnings.push(FeasibilityIssue::new(
            IssueKind::ManyHardConstraints,
            format!("{hard_constraints} active hard constraints; generation may leave many cells unfilled"),
        ));
    }

    let exclusive_pressure = active_constraints.iter().any(|c| {
        c.hard && matches!(c.rule, ConstraintRule::FacilityExclusive { .. })
    });
    if exclusive_pressure && active_facilities < active_groups {
        warnings.push(FeasibilityIssue::new(
            IssueKind::FacilityPressure,
            format!(
                "hard facility exclusivity with {active_facilities} facilities for {active_groups} groups"
            ),
        ));
    }

    let total_days = session.day_count();
    let total_slots = total_days * active_groups as i64 * slots_per_day as i64;
    if total_slots > 1000 {
        warnings.push(FeasibilityIssue::new(
            IssueKind::LargeRun,
            format!("{total_slots} slots to generate; expect a long run"),
        ));
    }

    let can_generate = errors.is_empty();
    FeasibilityReport {
        errors,
        warnings,
        stats: FeasibilityStats {
            total_days,
            total_groups: active_groups,
            total_activities: active_activities,
            total_facilities: active_facilities,
            slots_per_day,
            total_slots,
            hard_constraints,
            soft_constraints,
        },
        can_generate,
    }
}
