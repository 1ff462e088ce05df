//! Repressor pair sweep.
//!
//! Every ordered pair of strengths (i, j) yields a model with a permanent
//! repressor of strength `strengths[i]` and a removable repressor of strength
//! `strengths[j]`. Each model is run through a `ConditionSimulation`.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::conditions::Condition;
use crate::error::{GramError, Result};
use crate::network::{Feedback, LinearModel, Mechanism, ModelParameters};
use crate::simulation::{
    Comparison, ComparisonConfig, ConditionComparisons, ConditionSimulation, SimulationConfig,
};

/// Grid cell index: (permanent strength index, removed strength index).
pub type Cell = (usize, usize);

/// Condition comparisons for every cell of the grid.
pub type PairComparisons = BTreeMap<Cell, ConditionComparisons>;

/// Configuration for a pair sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Repressor strengths; the grid is strengths.len() squared.
    pub strengths: Vec<f64>,
    /// Mechanism of the repressor kept in the mutant.
    pub permanent: Mechanism,
    /// Mechanism of the repressor removed in the mutant.
    pub removed: Mechanism,
    /// Trajectories per ensemble.
    pub n_trajectories: usize,
    pub seed: u64,
    pub model: ModelParameters,
    pub simulation: SimulationConfig,
    pub comparison: ComparisonConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            strengths: vec![0.01, 0.03, 0.1],
            permanent: Mechanism::Transcription,
            removed: Mechanism::ProteinStability,
            n_trajectories: 1000,
            seed: 42,
            model: ModelParameters::default(),
            simulation: SimulationConfig::default(),
            comparison: ComparisonConfig::default(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.strengths.is_empty() {
            return Err(GramError::invalid("strengths", "need at least one strength"));
        }
        if self.n_trajectories == 0 {
            return Err(GramError::invalid("n_trajectories", "must be at least 1"));
        }
        self.model.validate()?;
        self.simulation.validate()?;
        self.comparison.validate()
    }
}

/// Everything a sweep produces, as persisted to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepResults {
    pub strengths: Vec<f64>,
    pub permanent: Mechanism,
    pub removed: Mechanism,
    pub n_trajectories: usize,
    #[serde(with = "crate::persistence::cells")]
    pub comparisons: PairComparisons,
}

impl SweepResults {
    /// Grid side length.
    pub fn size(&self) -> usize {
        self.strengths.len()
    }

    pub fn get(&self, cell: Cell, condition: Condition) -> Option<&Comparison> {
        self.comparisons.get(&cell)?.get(&condition)
    }
}

/// Runs the repressor pair grid.
#[derive(Clone, Debug)]
pub struct PairSweep {
    config: SweepConfig,
}

impl PairSweep {
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let n = self.config.strengths.len();
        (0..n).flat_map(move |i| (0..n).map(move |j| (i, j)))
    }

    /// Model with permanent strength index `i` and removed strength index `j`.
    pub fn model_for(&self, i: usize, j: usize) -> Result<LinearModel> {
        let strength = |k: usize| {
            self.config
                .strengths
                .get(k)
                .copied()
                .ok_or(GramError::MissingCell { i, j })
        };
        let model = LinearModel::new(self.config.model.clone())?
            .with_feedback(Feedback::single(self.config.permanent, strength(i)?, false)?)
            .with_feedback(Feedback::single(self.config.removed, strength(j)?, true)?);
        Ok(model)
    }

    /// Simulate every cell.
    pub fn run(&self) -> Result<SweepResults> {
        let n_cells = self.config.strengths.len().pow(2);
        let mut comparisons = PairComparisons::new();

        for (index, (i, j)) in self.cells().enumerate() {
            let started = Instant::now();
            let simulation = ConditionSimulation::new(self.model_for(i, j)?)
                .with_simulation_config(self.config.simulation.clone())
                .with_comparison_config(self.config.comparison.clone())
                .with_seed(self.cell_seed(index));
            let cell = simulation.run(self.config.n_trajectories)?;

            info!(
                i,
                j,
                permanent = self.config.strengths[i],
                removed = self.config.strengths[j],
                normal = cell[&Condition::Normal].threshold_error,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "cell {}/{} simulated",
                index + 1,
                n_cells
            );
            comparisons.insert((i, j), cell);
        }

        Ok(SweepResults {
            strengths: self.config.strengths.clone(),
            permanent: self.config.permanent,
            removed: self.config.removed,
            n_trajectories: self.config.n_trajectories,
            comparisons,
        })
    }

    fn cell_seed(&self, index: usize) -> u64 {
        self.config.seed.wrapping_add((index as u64) << 40)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> SweepConfig {
        SweepConfig {
            n_trajectories: 20,
            simulation: SimulationConfig {
                t_max: 6.0,
                n_timepoints: 13,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_default_grid_is_three_by_three() {
        let sweep = PairSweep::new(SweepConfig::default()).unwrap();
        let cells: Vec<Cell> = sweep.cells().collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], (0, 0));
        assert_eq!(cells[1], (0, 1));
        assert_eq!(cells[8], (2, 2));
    }

    #[test]
    fn test_model_for_pairs_strengths() {
        let sweep = PairSweep::new(SweepConfig::default()).unwrap();
        let model = sweep.model_for(2, 0).unwrap();

        assert_eq!(model.feedback.len(), 2);
        let permanent = &model.feedback[0];
        let removed = &model.feedback[1];
        assert!(!permanent.perturbed);
        assert_eq!(permanent.eta0, 0.1);
        assert!(removed.perturbed);
        assert_eq!(removed.eta2, 0.01);
        assert_eq!(removed.eta0, 0.0);
    }

    #[test]
    fn test_model_for_out_of_range() {
        let sweep = PairSweep::new(SweepConfig::default()).unwrap();
        assert!(matches!(
            sweep.model_for(0, 3),
            Err(GramError::MissingCell { i: 0, j: 3 })
        ));
    }

    #[test]
    fn test_empty_strengths_rejected() {
        let config = SweepConfig {
            strengths: vec![],
            ..Default::default()
        };
        assert!(PairSweep::new(config).is_err());
    }

    #[test]
    fn test_confidence_outside_unit_interval_rejected() {
        for confidence in [f64::NAN, 1.5, 7.0] {
            let config = SweepConfig {
                comparison: ComparisonConfig { confidence },
                ..quick_config()
            };
            let err = PairSweep::new(config).unwrap_err();
            assert!(
                matches!(err, GramError::InvalidParameter { ref name, .. } if name == "confidence"),
                "accepted confidence {}",
                confidence
            );
        }
    }

    #[test]
    fn test_run_fills_every_cell() {
        let results = PairSweep::new(quick_config()).unwrap().run().unwrap();
        assert_eq!(results.size(), 3);
        assert_eq!(results.comparisons.len(), 9);
        for comparisons in results.comparisons.values() {
            assert_eq!(comparisons.len(), 4);
        }
        assert!(results.get((1, 2), Condition::CarbonLimited).is_some());
    }

    #[test]
    fn test_partial_config_json_uses_defaults() {
        let json = r#"{"n_trajectories": 5, "removed": "transcript_stability"}"#;
        let config: SweepConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.n_trajectories, 5);
        assert_eq!(config.removed, Mechanism::TranscriptStability);
        assert_eq!(config.strengths, vec![0.01, 0.03, 0.1]);
        assert_eq!(config.simulation, SimulationConfig::default());
    }
}
