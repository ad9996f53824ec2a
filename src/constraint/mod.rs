//! Constraint evaluation engine.
//!
//! Pure evaluator for candidate slot assignments: given one candidate
//! (date, group, activity, facility, time window) plus the already-committed
//! slots, each active constraint reports satisfied / score / message, and an
//! aggregate verdict combines them.
//!
//! # Score Convention
//! Each rule scores 0-100 where 100 = fully satisfied. The aggregate score
//! is the priority-weighted mean (weight = priority / 10). Any unsatisfied
//! hard rule fails the whole candidate regardless of score.

mod context;
mod engine;

pub use context::EvalContext;
pub use engine::{evaluate, evaluate_all, RuleOutcome, RuleViolation, Verdict};
