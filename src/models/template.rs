//! Day template and template slot models.
//!
//! A day template is the repeating daily skeleton: a sorted list of named
//! time windows. Only windows of kind [`SlotKind::Activity`] that are marked
//! schedulable are generation targets; meals, rest and transitions are
//! carried for display but never filled by the generator.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Classification of a template time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// A window the generator fills with an activity.
    Activity,
    /// Meal time.
    Meal,
    /// Rest / quiet time.
    Rest,
    /// Movement between locations.
    Transition,
    /// Unstructured free time.
    Free,
}

/// A named time window in the repeating daily skeleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSlot {
    /// Unique slot identifier.
    pub id: String,
    /// Human-readable name (e.g., "Morning Block 1").
    pub name: String,
    /// Window start.
    pub start_time: NaiveTime,
    /// Window end.
    pub end_time: NaiveTime,
    /// Window classification.
    pub kind: SlotKind,
    /// Whether the generator may fill this window.
    pub schedulable: bool,
    /// Position within the day (ascending).
    pub sort_order: i32,
}

impl TemplateSlot {
    /// Creates a schedulable activity slot.
    pub fn new(id: impl Into<String>, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_time,
            end_time,
            kind: SlotKind::Activity,
            schedulable: true,
            sort_order: 0,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the window classification.
    pub fn with_kind(mut self, kind: SlotKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the sort position.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Marks the window as not schedulable.
    pub fn unschedulable(mut self) -> Self {
        self.schedulable = false;
        self
    }

    /// Window length in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Whether the generator targets this window.
    pub fn is_generation_target(&self) -> bool {
        self.schedulable && self.kind == SlotKind::Activity
    }
}

/// The repeating daily schedule skeleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayTemplate {
    /// Unique template identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Time windows making up the day.
    pub slots: Vec<TemplateSlot>,
}

impl DayTemplate {
    /// Creates an empty template.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            slots: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a time window.
    pub fn with_slot(mut self, slot: TemplateSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Generation-target windows, in sort order.
    pub fn generation_targets(&self) -> Vec<&TemplateSlot> {
        let mut targets: Vec<&TemplateSlot> = self
            .slots
            .iter()
            .filter(|s| s.is_generation_target())
            .collect();
        targets.sort_by_key(|s| s.sort_order);
        targets
    }
}
