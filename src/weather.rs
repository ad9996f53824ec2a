//! Weather-driven substitution planning.
//!
//! On an adverse-weather day, slots running weather-dependent activities
//! need a replacement. This pass proposes one per affected slot — from an
//! explicit substitution constraint when one exists, otherwise the first
//! indoor-suitable activity — and never applies anything itself. Callers
//! can apply the proposal list idempotently by overwriting each slot's
//! activity reference.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Activity, Constraint, ConstraintRule, SlotAssignment};

/// Weather classification for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Windy,
    Rain,
    Storm,
    Snow,
    Hail,
    Extreme,
}

impl WeatherCondition {
    /// Whether the condition rules out weather-dependent activities.
    pub fn is_adverse(&self) -> bool {
        matches!(
            self,
            Self::Rain | Self::Storm | Self::Snow | Self::Hail | Self::Extreme
        )
    }
}

/// A proposed activity replacement for one slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSubstitution {
    /// Slot to rewrite.
    pub slot_id: String,
    /// Activity currently assigned.
    pub original_activity_id: String,
    /// Proposed replacement, `None` when no suitable activity exists.
    pub substitute_activity_id: Option<String>,
    /// Why this substitution was proposed.
    pub reason: String,
}

/// Proposes substitutions for weather-dependent slots on an adverse day.
///
/// Returns an empty list when the condition is benign. The substitute for
/// each affected slot comes from an active [`ConstraintRule::WeatherSubstitute`]
/// mapping when one names the original activity; otherwise the first
/// active, non-weather-dependent activity other than the original. A
/// mapped substitute that is itself weather-dependent is rejected and the
/// fallback is used instead.
pub fn plan_substitutions(
    date: NaiveDate,
    condition: WeatherCondition,
    slots: &[SlotAssignment],
    activities: &[Activity],
    constraints: &[Constraint],
) -> Vec<WeatherSubstitution> {
    if !condition.is_adverse() {
        return Vec::new();
    }

    let mut proposals = Vec::new();
    for slot in slots {
        if slot.date != date {
            continue;
        }
        let Some(activity_id) = slot.activity_id.as_deref() else {
            continue;
        };
        let Some(activity) = activities.iter().find(|a| a.id == activity_id) else {
            continue;
        };
        if !activity.weather_dependent {
            continue;
        }

        let (substitute, reason) = match mapped_substitute(activity_id, activities, constraints) {
            Some(substitute) => (
                Some(substitute.id.clone()),
                format!("substitution rule maps {} to {}", activity_id, substitute.id),
            ),
            None => match fallback_substitute(activity_id, activities) {
                Some(substitute) => (
                    Some(substitute.id.clone()),
                    format!("no substitution rule; fell back to {}", substitute.id),
                ),
                None => (None, "no indoor-suitable activity available".to_string()),
            },
        };

        debug!(
            slot_id = %slot.id,
            original = %activity_id,
            substitute = substitute.as_deref().unwrap_or("-"),
            "weather substitution proposed"
        );
        proposals.push(WeatherSubstitution {
            slot_id: slot.id.clone(),
            original_activity_id: activity_id.to_string(),
            substitute_activity_id: substitute,
            reason,
        });
    }
    proposals
}

/// Substitute named by an active weather-substitute constraint, if it
/// resolves to an active activity that is safe to run.
fn mapped_substitute<'a>(
    original_id: &str,
    activities: &'a [Activity],
    constraints: &[Constraint],
) -> Option<&'a Activity> {
    constraints
        .iter()
        .filter(|c| c.active)
        .find_map(|c| match &c.rule {
            ConstraintRule::WeatherSubstitute {
                activity_id,
                substitute_activity_id,
            } if activity_id == original_id => Some(substitute_activity_id.as_str()),
            _ => None,
        })
        .and_then(|id| activities.iter().find(|a| a.id == id))
        .filter(|a| a.active && !a.weather_dependent)
}

fn fallback_substitute<'a>(original_id: &str, activities: &'a [Activity]) -> Option<&'a Activity> {
    activities
        .iter()
        .find(|a| a.active && !a.weather_dependent && a.id != original_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 3).unwrap()
    }

    fn slot(id: &str, activity: &str) -> SlotAssignment {
        SlotAssignment::new(
            id,
            date(),
            "G1",
            "T",
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        )
        .with_activity(activity)
    }

    fn sample_activities() -> Vec<Activity> {
        vec![
            Activity::new("canoe", 60).weather_dependent(),
            Activity::new("hike", 90).weather_dependent(),
            Activity::new("crafts", 60),
            Activity::new("board-games", 45),
        ]
    }

    #[test]
    fn test_benign_day_proposes_nothing() {
        let slots = vec![slot("a", "canoe")];
        let proposals = plan_substitutions(
            date(),
            WeatherCondition::Cloudy,
            &slots,
            &sample_activities(),
            &[],
        );
        assert!(proposals.is_empty());
    }

    #[test]
    fn test_adverse_day_affects_weather_dependent_slots_only() {
        let slots = vec![slot("a", "canoe"), slot("b", "crafts")];
        let proposals = plan_substitutions(
            date(),
            WeatherCondition::Rain,
            &slots,
            &sample_activities(),
            &[],
        );
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].slot_id, "a");
        assert_eq!(proposals[0].original_activity_id, "canoe");
        // Fallback: first active non-weather-dependent activity.
        assert_eq!(proposals[0].substitute_activity_id.as_deref(), Some("crafts"));
    }

    #[test]
    fn test_explicit_mapping_wins_over_fallback() {
        let constraints = vec![Constraint::new(
            "map",
            ConstraintRule::WeatherSubstitute {
                activity_id: "canoe".into(),
                substitute_activity_id: "board-games".into(),
            },
        )];
        let slots = vec![slot("a", "canoe")];
        let proposals = plan_substitutions(
            date(),
            WeatherCondition::Storm,
            &slots,
            &sample_activities(),
            &constraints,
        );
        assert_eq!(
            proposals[0].substitute_activity_id.as_deref(),
            Some("board-games")
        );
    }

    #[test]
    fn test_weather_dependent_mapping_rejected() {
        // Mapping points at another outdoor activity; fallback applies.
        let constraints = vec![Constraint::new(
            "map",
            ConstraintRule::WeatherSubstitute {
                activity_id: "canoe".into(),
                substitute_activity_id: "hike".into(),
            },
        )];
        let slots = vec![slot("a", "canoe")];
        let proposals = plan_substitutions(
            date(),
            WeatherCondition::Hail,
            &slots,
            &sample_activities(),
            &constraints,
        );
        assert_eq!(proposals[0].substitute_activity_id.as_deref(), Some("crafts"));
    }

    #[test]
    fn test_no_substitute_available() {
        let activities = vec![
            Activity::new("canoe", 60).weather_dependent(),
            Activity::new("hike", 90).weather_dependent(),
        ];
        let slots = vec![slot("a", "canoe")];
        let proposals =
            plan_substitutions(date(), WeatherCondition::Extreme, &slots, &activities, &[]);
        assert_eq!(proposals.len(), 1);
        assert!(proposals[0].substitute_activity_id.is_none());
    }

    #[test]
    fn test_other_days_untouched() {
        let other_day = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let mut moved = slot("a", "canoe");
        moved.date = other_day;
        let proposals = plan_substitutions(
            date(),
            WeatherCondition::Rain,
            &[moved],
            &sample_activities(),
            &[],
        );
        assert!(proposals.is_empty());
    }

    #[test]
    fn test_substitute_never_weather_dependent() {
        let slots = vec![slot("a", "canoe"), slot("b", "hike")];
        let activities = sample_activities();
        let proposals =
            plan_substitutions(date(), WeatherCondition::Snow, &slots, &activities, &[]);
        for proposal in &proposals {
            if let Some(sub) = proposal.substitute_activity_id.as_deref() {
                let activity = activities.iter().find(|a| a.id == sub).unwrap();
                assert!(!activity.weather_dependent);
            }
        }
    }
}
