//! Camp timetable engine.
//!
//! Builds a session-long activity timetable: every (day, time-slot, group)
//! cell gets an activity and a facility, subject to hard rules that are
//! never broken and soft rules that shape a weighted quality score. The
//! generator is a heuristic greedy search with a documented scoring
//! policy, not an optimal solver.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Session`, `Group`, `Activity`,
//!   `Facility`, `DayTemplate`, `Constraint`, `SlotAssignment`, staff types
//! - **`constraint`**: Per-candidate rule evaluation and the weighted
//!   aggregate verdict
//! - **`feasibility`**: Pre-flight input validation with errors, warnings
//!   and run-size stats
//! - **`generator`**: The greedy generation loop, its options, run state
//!   and schedule score
//! - **`conflict`**: Post-hoc audit of any slot collection
//! - **`weather`**: Substitution proposals for adverse-weather days
//! - **`staffing`**: Greedy staff-to-slot assignment under hour caps
//!
//! # Pipeline
//!
//! [`feasibility::check`] gates the run; [`generator::ScheduleGenerator`]
//! fills cells by asking [`constraint::evaluate_all`] to filter candidates;
//! [`conflict::detect`] audits any slot set, generated or hand-edited;
//! [`weather::plan_substitutions`] and [`staffing::assign_staff`] run as
//! optional post-processing passes. All inputs and outputs are in-memory
//! records; persistence belongs to the caller.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Burke et al. (2004), "Applications to Timetabling", Handbook of
//!   Graph Theory

pub mod conflict;
pub mod constraint;
pub mod feasibility;
pub mod generator;
pub mod models;
pub mod staffing;
pub mod weather;
