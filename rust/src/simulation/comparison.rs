//! Comparison of a mutant ensemble against a reference ensemble.
//!
//! The reference defines a band of normal outcomes at its peak. A compared
//! trajectory is an error if its level at that time falls beyond the band
//! edge on the side the compared mean has shifted to.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ensemble::{band_quantiles, Ensemble, TimeSeriesSummary};
use crate::conditions::Condition;
use crate::error::{GramError, Result};

/// Configuration for ensemble comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Mass of the reference band. Default: 0.8 (10th to 90th percentile)
    pub confidence: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self { confidence: 0.8 }
    }
}

impl ComparisonConfig {
    /// The band mass must be finite and in (0, 1].
    pub fn validate(&self) -> Result<()> {
        let c = self.confidence;
        if !c.is_finite() || c <= 0.0 || c > 1.0 {
            return Err(GramError::invalid(
                "confidence",
                format!("must be in (0, 1], got {}", c),
            ));
        }
        Ok(())
    }
}

/// Side of the reference band the compared ensemble moved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deviation {
    Above,
    Below,
}

impl fmt::Display for Deviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deviation::Above => write!(f, "above"),
            Deviation::Below => write!(f, "below"),
        }
    }
}

/// Anything that carries a scalar error frequency.
pub trait ErrorFrequency {
    fn threshold_error(&self) -> f64;
}

/// Summary of one mutant-versus-reference comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Condition the compared ensemble was simulated under.
    pub condition: Condition,
    /// Time of the reference mean peak.
    pub horizon: f64,
    pub horizon_index: usize,
    pub reference_mean: f64,
    pub compared_mean: f64,
    /// Reference band edges at the horizon.
    pub lower_threshold: f64,
    pub upper_threshold: f64,
    pub deviation: Deviation,
    /// Band edge on the side of `deviation`.
    pub threshold: f64,
    /// Fraction of compared trajectories beyond `threshold`.
    pub threshold_error: f64,
    /// Fraction strictly below the lower edge.
    pub error_below: f64,
    /// Fraction strictly above the upper edge.
    pub error_above: f64,
    pub n_reference: usize,
    pub n_compared: usize,
    pub reference: TimeSeriesSummary,
    pub compared: TimeSeriesSummary,
}

impl Comparison {
    /// Compare `compared` (simulated under `condition`) against `reference`.
    pub fn new(
        reference: &Ensemble,
        compared: &Ensemble,
        condition: Condition,
        config: &ComparisonConfig,
    ) -> Result<Self> {
        config.validate()?;
        if reference.is_empty() {
            return Err(GramError::EmptyEnsemble("reference"));
        }
        if compared.is_empty() {
            return Err(GramError::EmptyEnsemble("compared"));
        }
        if reference.n_timepoints() != compared.n_timepoints() {
            return Err(GramError::GridMismatch {
                reference: reference.n_timepoints(),
                compared: compared.n_timepoints(),
            });
        }

        let reference_curve = reference.mean();
        let horizon_index = peak_index(&reference_curve);
        let horizon = reference.times()[horizon_index];

        let (lo, hi) = band_quantiles(config.confidence);
        let lower_threshold = reference.quantile_at(horizon_index, lo);
        let upper_threshold = reference.quantile_at(horizon_index, hi);

        let reference_mean = reference_curve[horizon_index];
        let compared_mean = compared.mean_at(horizon_index);

        let levels = compared.at(horizon_index);
        let n = levels.len() as f64;
        let error_below = levels.iter().filter(|&&x| x < lower_threshold).count() as f64 / n;
        let error_above = levels.iter().filter(|&&x| x > upper_threshold).count() as f64 / n;

        let (deviation, threshold, threshold_error) = if compared_mean >= reference_mean {
            (Deviation::Above, upper_threshold, error_above)
        } else {
            (Deviation::Below, lower_threshold, error_below)
        };

        Ok(Self {
            condition,
            horizon,
            horizon_index,
            reference_mean,
            compared_mean,
            lower_threshold,
            upper_threshold,
            deviation,
            threshold,
            threshold_error,
            error_below,
            error_above,
            n_reference: reference.n_trajectories(),
            n_compared: compared.n_trajectories(),
            reference: reference.summary(config.confidence),
            compared: compared.summary(config.confidence),
        })
    }
}

impl ErrorFrequency for Comparison {
    fn threshold_error(&self) -> f64 {
        self.threshold_error
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.3} {} threshold {:.1} at t={:.2}",
            self.condition, self.threshold_error, self.deviation, self.threshold, self.horizon
        )
    }
}

/// Index of the first maximum.
fn peak_index(curve: &[f64]) -> usize {
    let mut best = 0;
    for (i, &value) in curve.iter().enumerate() {
        if value > curve[best] {
            best = i;
        }
    }
    best
}
