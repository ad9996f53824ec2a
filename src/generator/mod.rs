//! Greedy timetable generator.
//!
//! The core loop of the engine: for every (date, template window, group)
//! cell it filters candidate activities through the constraint engine,
//! scores the survivors, and commits the best-scoring pick. Hard-constraint
//! failures discard candidates; unfillable cells are skipped and recorded,
//! never fatal.
//!
//! # Algorithm
//!
//! 1. Gate on the feasibility checker.
//! 2. Dates chronologically; template windows in sort order; group order
//!    reshuffled per (date, window) so no group always picks first.
//! 3. Per group: find a free facility, evaluate every active activity,
//!    score survivors (constraint verdict + variety bonus − duration
//!    mismatch − optional jitter), pick uniformly among the top three.
//! 4. Commit the pick and update run-scoped usage / reservation state.
//!
//! The randomized top-3 choice is deliberate: a fully deterministic argmax
//! produces visually repetitive timetables.

mod engine;
mod options;
mod score;
mod state;

pub use engine::{
    GenerateError, GenerationResult, RunStats, RunStatus, ScheduleGenerator,
};
pub use options::{GenerationOptions, OptimizationLevel, Progress};
pub use score::ScheduleScore;
