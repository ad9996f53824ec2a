//! Scheduling constraint model.
//!
//! Constraints are the rules a timetable must respect. Each carries a
//! type-specific payload as one variant of [`ConstraintRule`], a hard/soft
//! flag and a priority weight. Hard rules disqualify a candidate outright;
//! soft rules only shape the quality score.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Type-specific payload of a scheduling constraint.
///
/// One variant per supported rule kind. Malformed payloads are rejected at
/// deserialization time instead of surfacing as silent runtime fallthrough.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintRule {
    /// Restrict when an activity may be scheduled.
    ///
    /// The candidate time is rejected if it appears in `blocked_times`, or
    /// if `allowed_times` is non-empty and does not contain it.
    TimeRestriction {
        activity_id: String,
        allowed_times: Vec<NaiveTime>,
        blocked_times: Vec<NaiveTime>,
    },

    /// Control the transition between two activities within a group's day.
    ///
    /// With `must_follow`, a slot immediately after `before_activity_id`
    /// must be `after_activity_id`; without it, that specific transition is
    /// forbidden.
    Sequence {
        before_activity_id: String,
        after_activity_id: String,
        must_follow: bool,
    },

    /// At most `max_per_day` occurrences of an activity per group per day.
    DailyLimit { activity_id: String, max_per_day: i32 },

    /// At least `min_per_day` occurrences of an activity per group per day.
    ///
    /// Not verifiable per-candidate; the evaluator is a stub.
    DailyMinimum { activity_id: String, min_per_day: i32 },

    /// At most `max_consecutive` back-to-back occurrences of an activity.
    ///
    /// With no `activity_id`, the limit applies to whichever activity the
    /// candidate repeats.
    ConsecutiveLimit {
        activity_id: Option<String>,
        max_consecutive: i32,
    },

    /// Staff headcount rule. Enforced by the staffing pass, not per
    /// candidate; the evaluator is a stub.
    StaffLimit,

    /// Maps an activity to its adverse-weather replacement. Enforced by the
    /// weather substitution pass, not per candidate.
    WeatherSubstitute {
        activity_id: String,
        substitute_activity_id: String,
    },

    /// Only one group may occupy a facility at a time.
    ///
    /// With no `facility_id`, the rule covers every facility.
    FacilityExclusive { facility_id: Option<String> },

    /// Minimum rest between same-day occurrences of an activity.
    GapRequired {
        activity_id: String,
        min_gap_minutes: i64,
    },

    /// Keep the listed groups apart: by facility (no shared space at the
    /// same time) or by activity (no shared activity at the same time).
    GroupSeparation {
        group_ids: Vec<String>,
        facility_based: bool,
    },
}

impl ConstraintRule {
    /// Stable machine name of the rule kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::TimeRestriction { .. } => "time_restriction",
            Self::Sequence { .. } => "sequence",
            Self::DailyLimit { .. } => "daily_limit",
            Self::DailyMinimum { .. } => "daily_minimum",
            Self::ConsecutiveLimit { .. } => "consecutive_limit",
            Self::StaffLimit => "staff_limit",
            Self::WeatherSubstitute { .. } => "weather_substitute",
            Self::FacilityExclusive { .. } => "facility_exclusive",
            Self::GapRequired { .. } => "gap_required",
            Self::GroupSeparation { .. } => "group_separation",
        }
    }
}

/// Optional applicability filter for a constraint.
///
/// An empty id set places no restriction on that dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintScope {
    /// Activities the constraint applies to (empty = all).
    pub activity_ids: Vec<String>,
    /// Facilities the constraint applies to (empty = all).
    pub facility_ids: Vec<String>,
    /// Groups the constraint applies to (empty = all).
    pub group_ids: Vec<String>,
}

impl ConstraintScope {
    /// Whether a candidate described by the given ids falls inside scope.
    pub fn covers(&self, activity_id: &str, facility_id: Option<&str>, group_id: &str) -> bool {
        let activity_ok = self.activity_ids.is_empty()
            || self.activity_ids.iter().any(|id| id == activity_id);
        let facility_ok = self.facility_ids.is_empty()
            || facility_id.is_some_and(|f| self.facility_ids.iter().any(|id| id == f));
        let group_ok =
            self.group_ids.is_empty() || self.group_ids.iter().any(|id| id == group_id);
        activity_ok && facility_ok && group_ok
    }
}

/// A scheduling constraint: rule payload plus enforcement metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    /// Unique constraint identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Type-specific rule payload.
    pub rule: ConstraintRule,
    /// Hard rules disqualify candidates; soft rules only score them.
    pub hard: bool,
    /// Weight 1-10 for soft-score aggregation (clamped on construction).
    pub priority: i32,
    /// Whether the constraint participates in evaluation.
    pub active: bool,
    /// Optional applicability filter.
    pub scope: ConstraintScope,
}

impl Constraint {
    /// Creates an active soft constraint with priority 5.
    pub fn new(id: impl Into<String>, rule: ConstraintRule) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            rule,
            hard: false,
            priority: 5,
            active: true,
            scope: ConstraintScope::default(),
        }
    }

    /// Creates an active hard constraint with priority 10.
    pub fn hard(id: impl Into<String>, rule: ConstraintRule) -> Self {
        let mut c = Self::new(id, rule);
        c.hard = true;
        c.priority = 10;
        c
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the priority, clamped to 1-10.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority.clamp(1, 10);
        self
    }

    /// Sets the applicability scope.
    pub fn with_scope(mut self, scope: ConstraintScope) -> Self {
        self.scope = scope;
        self
    }

    /// Marks the constraint inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Aggregation weight derived from priority.
    pub fn weight(&self) -> f64 {
        f64::from(self.priority.clamp(1, 10)) / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_constructor() {
        let c = Constraint::hard(
            "C1",
            ConstraintRule::DailyLimit {
                activity_id: "swim".into(),
                max_per_day: 2,
            },
        );
        assert!(c.hard);
        assert_eq!(c.priority, 10);
        assert!((c.weight() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_priority_clamped() {
        let c = Constraint::new("C1", ConstraintRule::StaffLimit).with_priority(99);
        assert_eq!(c.priority, 10);
        let c = Constraint::new("C2", ConstraintRule::StaffLimit).with_priority(-3);
        assert_eq!(c.priority, 1);
    }

    #[test]
    fn test_scope_covers() {
        let scope = ConstraintScope {
            activity_ids: vec!["swim".into()],
            facility_ids: vec![],
            group_ids: vec!["G1".into(), "G2".into()],
        };
        assert!(scope.covers("swim", None, "G1"));
        assert!(scope.covers("swim", Some("lake"), "G2"));
        assert!(!scope.covers("swim", None, "G3"));
        assert!(!scope.covers("crafts", None, "G1"));
    }

    #[test]
    fn test_empty_scope_covers_everything() {
        let scope = ConstraintScope::default();
        assert!(scope.covers("anything", None, "G9"));
    }

    #[test]
    fn test_facility_scope_requires_facility() {
        let scope = ConstraintScope {
            facility_ids: vec!["hall".into()],
            ..Default::default()
        };
        assert!(scope.covers("a", Some("hall"), "G1"));
        assert!(!scope.covers("a", Some("field"), "G1"));
        assert!(!scope.covers("a", None, "G1"));
    }

    #[test]
    fn test_rule_kind_names() {
        assert_eq!(ConstraintRule::StaffLimit.kind_name(), "staff_limit");
        assert_eq!(
            ConstraintRule::FacilityExclusive { facility_id: None }.kind_name(),
            "facility_exclusive"
        );
    }

    #[test]
    fn test_rule_round_trips_through_json() {
        let rule = ConstraintRule::GapRequired {
            activity_id: "swim".into(),
            min_gap_minutes: 120,
        };
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"type\":\"gap_required\""));
        let back: ConstraintRule = serde_json::from_str(&json).unwrap();
        match back {
            ConstraintRule::GapRequired {
                min_gap_minutes, ..
            } => assert_eq!(min_gap_minutes, 120),
            _ => panic!("wrong variant"),
        }
    }
}
