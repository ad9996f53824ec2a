//! Camp session model.
//!
//! A session is the outer planning horizon: a contiguous date range with a
//! lifecycle status. Schedule generation is only meaningful while the
//! session is still being planned or is currently running.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a camp session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Session is being prepared; schedules may be generated and edited.
    Planning,
    /// Session is currently running; schedules may still be regenerated.
    Active,
    /// Session has finished.
    Completed,
    /// Session is archived and read-only.
    Archived,
}

/// A camp session: the date range a timetable is generated for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// First day of the session (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the session (inclusive).
    pub end_date: NaiveDate,
    /// Lifecycle status.
    pub status: SessionStatus,
}

impl Session {
    /// Creates a session in `Planning` status.
    pub fn new(id: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_date,
            end_date,
            status: SessionStatus::Planning,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the lifecycle status.
    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the date range is well-formed (end not before start).
    pub fn has_valid_range(&self) -> bool {
        self.end_date >= self.start_date
    }

    /// Whether generation is allowed in the current status.
    pub fn can_generate(&self) -> bool {
        matches!(self.status, SessionStatus::Planning | SessionStatus::Active)
    }

    /// Number of days in the session, inclusive of both endpoints.
    ///
    /// Returns 0 for an inverted range.
    pub fn day_count(&self) -> i64 {
        if !self.has_valid_range() {
            return 0;
        }
        (self.end_date - self.start_date).num_days() + 1
    }

    /// The inclusive, chronologically ordered day sequence.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start_date
            .iter_days()
            .take_while(|d| *d <= self.end_date)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_count_inclusive() {
        let s = Session::new("S1", date(2025, 7, 1), date(2025, 7, 3));
        assert_eq!(s.day_count(), 3);
        assert_eq!(
            s.days(),
            vec![date(2025, 7, 1), date(2025, 7, 2), date(2025, 7, 3)]
        );
    }

    #[test]
    fn test_single_day_session() {
        let s = Session::new("S1", date(2025, 7, 1), date(2025, 7, 1));
        assert_eq!(s.day_count(), 1);
        assert_eq!(s.days().len(), 1);
    }

    #[test]
    fn test_inverted_range() {
        let s = Session::new("S1", date(2025, 7, 3), date(2025, 7, 1));
        assert!(!s.has_valid_range());
        assert_eq!(s.day_count(), 0);
        assert!(s.days().is_empty());
    }

    #[test]
    fn test_can_generate_by_status() {
        let s = Session::new("S1", date(2025, 7, 1), date(2025, 7, 3));
        assert!(s.can_generate());
        assert!(s.clone().with_status(SessionStatus::Active).can_generate());
        assert!(!s
            .clone()
            .with_status(SessionStatus::Completed)
            .can_generate());
        assert!(!s.with_status(SessionStatus::Archived).can_generate());
    }
}
