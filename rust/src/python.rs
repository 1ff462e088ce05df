//! Python bindings for running the sweep from a notebook.

use std::path::PathBuf;

use numpy::PyArray2;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::error::GramError;
use crate::figure::{render_heatmaps, HeatmapStyle};
use crate::matrices::{threshold_error_matrices, ThresholdErrorMatrices};
use crate::network::Mechanism;
use crate::persistence;
use crate::simulation::{ComparisonConfig, SimulationConfig};
use crate::sweep::{PairSweep, SweepConfig};

impl From<GramError> for PyErr {
    fn from(err: GramError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn matrices_to_dict<'py>(
    py: Python<'py>,
    matrices: ThresholdErrorMatrices,
) -> PyResult<&'py PyDict> {
    let dict = PyDict::new(py);
    for (condition, grid) in matrices {
        dict.set_item(condition.as_str(), PyArray2::from_owned_array(py, grid))?;
    }
    Ok(dict)
}

/// Run the repressor pair sweep and return threshold-error matrices.
///
/// # Arguments
/// * `strengths` - Repressor strengths (grid side length)
/// * `n_trajectories` - Trajectories per ensemble
/// * `seed` - RNG seed
/// * `permanent` - Mechanism of the kept repressor
/// * `removed` - Mechanism of the removed repressor
/// * `t_max` - Simulation end time
/// * `n_timepoints` - Sampling grid size
/// * `confidence` - Reference band mass
/// * `output` - Optional path to save the full results
///
/// # Returns
/// * Dict mapping condition name to an (n, n) array
#[pyfunction]
#[pyo3(signature = (strengths=vec![0.01, 0.03, 0.1], n_trajectories=1000, seed=42, permanent="transcription", removed="protein_stability", t_max=12.0, n_timepoints=121, confidence=0.8, output=None))]
fn simulate_repressor_pairs<'py>(
    py: Python<'py>,
    strengths: Vec<f64>,
    n_trajectories: usize,
    seed: u64,
    permanent: &str,
    removed: &str,
    t_max: f64,
    n_timepoints: usize,
    confidence: f64,
    output: Option<PathBuf>,
) -> PyResult<&'py PyDict> {
    let config = SweepConfig {
        strengths,
        permanent: permanent.parse::<Mechanism>()?,
        removed: removed.parse::<Mechanism>()?,
        n_trajectories,
        seed,
        simulation: SimulationConfig { t_max, n_timepoints },
        comparison: ComparisonConfig { confidence },
        ..Default::default()
    };
    let sweep = PairSweep::new(config)?;

    let results = py.allow_threads(|| sweep.run())?;
    if let Some(path) = output {
        persistence::save(&results, &path)?;
    }

    let matrices = threshold_error_matrices(&results.comparisons, results.size())?;
    matrices_to_dict(py, matrices)
}

/// Load saved sweep results and return threshold-error matrices.
#[pyfunction]
fn load_threshold_errors<'py>(py: Python<'py>, path: PathBuf) -> PyResult<&'py PyDict> {
    let results = persistence::load(&path)?;
    let matrices = threshold_error_matrices(&results.comparisons, results.size())?;
    matrices_to_dict(py, matrices)
}

/// Render heatmap panels from saved sweep results.
#[pyfunction]
fn plot_threshold_errors(path: PathBuf, figure: PathBuf) -> PyResult<()> {
    let results = persistence::load(&path)?;
    let matrices = threshold_error_matrices(&results.comparisons, results.size())?;
    render_heatmaps(&matrices, &results.strengths, &figure, &HeatmapStyle::default())?;
    Ok(())
}

/// Python module definition
#[pymodule]
fn gram(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate_repressor_pairs, m)?)?;
    m.add_function(wrap_pyfunction!(load_threshold_errors, m)?)?;
    m.add_function(wrap_pyfunction!(plot_threshold_errors, m)?)?;
    Ok(())
}
