//! Stochastic simulation and comparison of feedback models.
//!
//! This module provides:
//! - GillespieSimulator: Parallel trajectory simulation on a time grid
//! - Ensemble: Trajectory matrix with mean and quantile curves
//! - Comparison: Threshold error of a mutant against a reference
//! - ConditionSimulation: A model run under every metabolic condition

pub mod gillespie;
pub mod ensemble;
pub mod comparison;
pub mod condition;

pub use gillespie::{simulate_ensemble, GillespieSimulator, SimulationConfig};
pub use ensemble::{Ensemble, TimeSeriesSummary, Trajectory};
pub use comparison::{Comparison, ComparisonConfig, Deviation, ErrorFrequency};
pub use condition::{ConditionComparisons, ConditionSimulation};
