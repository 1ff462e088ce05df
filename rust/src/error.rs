//! Error types for model construction, simulation, and result handling.

use std::path::PathBuf;

/// Errors raised by the simulation and sweep pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GramError {
    /// A model or configuration parameter is out of range.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A condition name outside the fixed set of four.
    #[error("Unknown metabolic condition: {0}")]
    UnknownCondition(String),

    /// A comparison was requested on an ensemble with no trajectories.
    #[error("Ensemble '{0}' has no trajectories")]
    EmptyEnsemble(&'static str),

    /// Reference and compared ensembles were sampled on different grids.
    #[error("Time grids differ: reference has {reference} points, compared has {compared}")]
    GridMismatch { reference: usize, compared: usize },

    /// A grid cell is absent from the comparison mapping.
    #[error("No comparisons for cell ({i}, {j})")]
    MissingCell { i: usize, j: usize },

    /// A cell lacks a comparison for one of the conditions.
    #[error("Cell ({i}, {j}) has no comparison for condition '{condition}'")]
    MissingCondition {
        i: usize,
        j: usize,
        condition: String,
    },

    /// Figure rendering failed.
    #[error("Failed to render figure: {0}")]
    Render(String),

    /// Reading or writing a results file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A results file could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GramError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        GramError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, GramError>;
