//! Activity model.
//!
//! An activity is a schedulable program offering (archery, swimming, crafts).
//! Its nominal duration is a scoring signal, not a hard filter: an activity
//! whose duration does not match a template slot is penalized, never
//! excluded.

use serde::{Deserialize, Serialize};

/// A program activity that can be placed into a timetable slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Nominal duration (minutes). Used for a score penalty only.
    pub duration_minutes: i64,
    /// Preparation time before the activity (minutes).
    pub setup_minutes: i64,
    /// Cleanup time after the activity (minutes).
    pub cleanup_minutes: i64,
    /// Minimum viable participant count.
    pub min_participants: i32,
    /// Maximum participant count.
    pub max_participants: i32,
    /// Youngest admissible age.
    pub min_age: i32,
    /// Oldest admissible age.
    pub max_age: i32,
    /// Staff members required to run one slot (default 1).
    pub required_staff: i32,
    /// Whether the activity is unusable in adverse weather.
    pub weather_dependent: bool,
    /// Whether the activity is available for scheduling.
    pub active: bool,
}

impl Activity {
    /// Creates an active activity with the given nominal duration.
    pub fn new(id: impl Into<String>, duration_minutes: i64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            duration_minutes,
            setup_minutes: 0,
            cleanup_minutes: 0,
            min_participants: 0,
            max_participants: i32::MAX,
            min_age: 0,
            max_age: i32::MAX,
            required_staff: 1,
            weather_dependent: false,
            active: true,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets setup and cleanup buffers.
    pub fn with_buffers(mut self, setup_minutes: i64, cleanup_minutes: i64) -> Self {
        self.setup_minutes = setup_minutes;
        self.cleanup_minutes = cleanup_minutes;
        self
    }

    /// Sets the participant count range.
    pub fn with_participants(mut self, min: i32, max: i32) -> Self {
        self.min_participants = min;
        self.max_participants = max;
        self
    }

    /// Sets the admissible age range.
    pub fn with_age_range(mut self, min_age: i32, max_age: i32) -> Self {
        self.min_age = min_age;
        self.max_age = max_age;
        self
    }

    /// Sets the required staff headcount.
    pub fn with_required_staff(mut self, count: i32) -> Self {
        self.required_staff = count;
        self
    }

    /// Marks the activity as weather-dependent.
    pub fn weather_dependent(mut self) -> Self {
        self.weather_dependent = true;
        self
    }

    /// Marks the activity inactive (excluded from scheduling).
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
