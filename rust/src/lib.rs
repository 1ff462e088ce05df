//! Stochastic simulation of repressor pairs under metabolic conditions.
//!
//! A gene expression pathway carries two repressors: one permanent, one
//! that a mutant lacks. For every pair of repressor strengths the mutant is
//! simulated under four metabolic conditions and compared with the full
//! model under normal conditions. The fraction of mutant trajectories that
//! leave the normal range (the threshold error) is collected into one grid
//! per condition and drawn as heatmaps.
//!
//! # Modules
//!
//! - [`network`]      - species, mass-action reactions, `LinearModel`
//! - [`conditions`]   - the four metabolic conditions and their rate scaling
//! - [`simulation`]   - parallel Gillespie ensembles, `Comparison`, `ConditionSimulation`
//! - [`sweep`]        - the (i, j) repressor strength grid
//! - [`persistence`]  - JSON dump and reload of sweep results
//! - [`matrices`]     - per-condition threshold error grids
//! - [`figure`]       - heatmap panels

pub mod conditions;
pub mod error;
pub mod figure;
pub mod matrices;
pub mod network;
pub mod persistence;
pub mod simulation;
pub mod sweep;

#[cfg(feature = "python")]
mod python;

pub use conditions::Condition;
pub use error::{GramError, Result};
pub use matrices::{threshold_error_matrices, ThresholdErrorMatrices};
pub use network::{Feedback, LinearModel, Mechanism, ModelParameters};
pub use simulation::{
    Comparison, ComparisonConfig, ConditionComparisons, ConditionSimulation, ErrorFrequency,
    SimulationConfig,
};
pub use sweep::{PairComparisons, PairSweep, SweepConfig, SweepResults};
