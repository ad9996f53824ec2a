//! Participant group model.
//!
//! A group is one cohort of campers that moves through the timetable as a
//! unit: every generated slot belongs to exactly one group.

use serde::{Deserialize, Serialize};

/// A cohort of participants scheduled as a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier.
    pub id: String,
    /// Owning session identifier.
    pub session_id: String,
    /// Human-readable name.
    pub name: String,
    /// Youngest admissible age.
    pub min_age: i32,
    /// Oldest admissible age.
    pub max_age: i32,
    /// Maximum number of participants.
    pub capacity: i32,
    /// Current number of enrolled participants.
    pub headcount: i32,
    /// Whether the group takes part in scheduling.
    pub active: bool,
}

impl Group {
    /// Creates an active group with an open age range.
    pub fn new(id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            session_id: session_id.into(),
            name: String::new(),
            min_age: 0,
            max_age: i32::MAX,
            capacity: 0,
            headcount: 0,
            active: true,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the admissible age range.
    pub fn with_age_range(mut self, min_age: i32, max_age: i32) -> Self {
        self.min_age = min_age;
        self.max_age = max_age;
        self
    }

    /// Sets capacity and current headcount.
    pub fn with_size(mut self, capacity: i32, headcount: i32) -> Self {
        self.capacity = capacity;
        self.headcount = headcount;
        self
    }

    /// Marks the group inactive (excluded from scheduling).
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_builder() {
        let g = Group::new("G1", "S1")
            .with_name("Foxes")
            .with_age_range(8, 10)
            .with_size(12, 11);
        assert_eq!(g.id, "G1");
        assert_eq!(g.session_id, "S1");
        assert_eq!(g.name, "Foxes");
        assert_eq!((g.min_age, g.max_age), (8, 10));
        assert_eq!((g.capacity, g.headcount), (12, 11));
        assert!(g.active);
    }

    #[test]
    fn test_inactive() {
        assert!(!Group::new("G1", "S1").inactive().active);
    }
}
