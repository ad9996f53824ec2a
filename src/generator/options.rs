//! Generation run options and progress reporting.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How much work the generator invests per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationLevel {
    /// Single greedy pass.
    Fast,
    /// Single greedy pass (room for mid-tier refinements).
    #[default]
    Balanced,
    /// Greedy pass plus refinement iterations.
    ///
    /// Refinement is currently an extension point: it advances the
    /// iteration counter without rewriting slots.
    Thorough,
}

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Keep pre-existing slots untouched and only fill empty cells.
    pub respect_existing: bool,
    /// Work level.
    pub optimization: OptimizationLevel,
    /// Upper bound on refinement iterations (Thorough only).
    pub max_iterations: u32,
    /// Seed for reproducible runs. Also enables score jitter.
    pub seed: Option<u64>,
    /// Nudge scoring toward candidates that secured a facility.
    pub prefer_facility_use: bool,
    /// Apply the usage-decay variety bonus.
    pub balance_usage: bool,
    /// Cooperative cancellation flag, checked at progress points.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationOptions {
    /// Default options: respect existing slots, balanced level, variety
    /// balancing on.
    pub fn new() -> Self {
        Self {
            respect_existing: true,
            optimization: OptimizationLevel::Balanced,
            max_iterations: 1,
            seed: None,
            prefer_facility_use: false,
            balance_usage: true,
            cancel: None,
        }
    }

    /// Sets whether pre-existing slots are preserved.
    pub fn with_respect_existing(mut self, respect: bool) -> Self {
        self.respect_existing = respect;
        self
    }

    /// Sets the work level.
    pub fn with_optimization(mut self, level: OptimizationLevel) -> Self {
        self.optimization = level;
        self
    }

    /// Sets the refinement iteration bound.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Seeds the run's random generator for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables the facility-preference score nudge.
    pub fn with_facility_preference(mut self) -> Self {
        self.prefer_facility_use = true;
        self
    }

    /// Disables the usage-decay variety bonus.
    pub fn without_usage_balancing(mut self) -> Self {
        self.balance_usage = false;
        self
    }

    /// Attaches a cancellation flag.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// A progress snapshot reported synchronously during the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    /// Current phase ("generating", "refining", "finalizing").
    pub phase: String,
    /// Completion estimate 0-100.
    pub percentage: f64,
    /// Day being processed.
    pub current_day: Option<NaiveDate>,
    /// Group being processed.
    pub current_group: Option<String>,
    /// Slots committed so far (new + preserved).
    pub slots_generated: usize,
    /// Theoretical cell count for the whole run.
    pub total_slots: usize,
    /// Human-readable status line.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_new() {
        let d = GenerationOptions::default();
        assert!(d.respect_existing);
        assert!(d.balance_usage);
        assert!(!d.prefer_facility_use);
        assert_eq!(d.optimization, OptimizationLevel::Balanced);
        assert_eq!(d.max_iterations, 1);
        assert_eq!(d.seed, None);
    }

    #[test]
    fn test_option_builder() {
        let opts = GenerationOptions::new()
            .with_seed(42)
            .with_optimization(OptimizationLevel::Thorough)
            .with_max_iterations(5)
            .without_usage_balancing();
        assert!(opts.respect_existing);
        assert_eq!(opts.seed, Some(42));
        assert_eq!(opts.optimization, OptimizationLevel::Thorough);
        assert_eq!(opts.max_iterations, 5);
        assert!(!opts.balance_usage);
    }
}
