//! Facility model.
//!
//! A facility is a physical space (field, hall, lake front) a slot can be
//! held in. Facilities are optional: the engine schedules without space
//! assignment when none exist.

use serde::{Deserialize, Serialize};

/// A physical space that slots can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    /// Unique facility identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Maximum headcount the space holds.
    pub capacity: i32,
    /// Whether the space is indoors.
    pub indoor: bool,
    /// Whether the facility is available for scheduling.
    pub active: bool,
}

impl Facility {
    /// Creates an active outdoor facility.
    pub fn new(id: impl Into<String>, capacity: i32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity,
            indoor: false,
            active: true,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the facility as indoor.
    pub fn indoor(mut self) -> Self {
        self.indoor = true;
        self
    }

    /// Marks the facility inactive (excluded from scheduling).
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
