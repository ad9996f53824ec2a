//! Staff models.
//!
//! Staff members are assigned to generated slots by the staffing pass; the
//! first pick on each slot leads it, further picks assist.

use serde::{Deserialize, Serialize};

/// A staff member available for slot assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique staff identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether the member is available for assignment.
    pub active: bool,
}

impl StaffMember {
    /// Creates an active staff member.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            active: true,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the member unavailable.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Role a staff member plays on one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Runs the slot.
    Lead,
    /// Supports the lead.
    Assistant,
    /// Oversees without running.
    Supervisor,
}

/// Links one staff member to one slot in a given role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAssignment {
    /// Slot being staffed.
    pub slot_id: String,
    /// Assigned staff member.
    pub staff_id: String,
    /// Role on this slot.
    pub role: StaffRole,
}

impl StaffAssignment {
    /// Creates a staff assignment.
    pub fn new(slot_id: impl Into<String>, staff_id: impl Into<String>, role: StaffRole) -> Self {
        Self {
            slot_id: slot_id.into(),
            staff_id: staff_id.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_builder() {
        let s = StaffMember::new("ST1").with_name("Jo");
        assert!(s.active);
        assert!(!StaffMember::new("ST2").inactive().active);
    }

    #[test]
    fn test_assignment() {
        let a = StaffAssignment::new("SL1", "ST1", StaffRole::Lead);
        assert_eq!(a.role, StaffRole::Lead);
    }
}
