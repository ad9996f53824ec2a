//! Camp scheduling domain models.
//!
//! Core data types shared by every pass of the engine: the session horizon,
//! participant groups, activities, facilities, the daily template, the
//! constraint catalogue, and the slot / staff assignment records the engine
//! produces.

mod activity;
mod constraint;
mod facility;
mod group;
mod session;
mod slot;
mod staff;
mod template;

pub use activity::Activity;
pub use constraint::{Constraint, ConstraintRule, ConstraintScope};
pub use facility::Facility;
pub use group::Group;
pub use session::{Session, SessionStatus};
pub use slot::SlotAssignment;
pub use staff::{StaffAssignment, StaffMember, StaffRole};
pub use template::{DayTemplate, SlotKind, TemplateSlot};
