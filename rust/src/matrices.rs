//! Per-condition threshold error grids.
//!
//! For every condition c and cell (i, j):
//!     matrices[c][[i, j]] = comparisons[(i, j)][c].threshold_error

use std::collections::BTreeMap;

use ndarray::Array2;

use crate::conditions::Condition;
use crate::error::{GramError, Result};
use crate::simulation::ErrorFrequency;

/// One n × n grid per condition.
pub type ThresholdErrorMatrices = BTreeMap<Condition, Array2<f64>>;

/// Populate the per-condition grids from an (i, j)-keyed comparison mapping.
///
/// # Arguments
/// * `comparisons` - Per-cell comparisons keyed by condition
/// * `n` - Grid side length
///
/// # Returns
/// * A matrix of shape (n, n) for each of the four conditions
pub fn threshold_error_matrices<C: ErrorFrequency>(
    comparisons: &BTreeMap<(usize, usize), BTreeMap<Condition, C>>,
    n: usize,
) -> Result<ThresholdErrorMatrices> {
    let mut matrices = ThresholdErrorMatrices::new();
    for condition in Condition::ALL {
        let mut grid = Array2::<f64>::zeros((n, n));
        for ((i, j), slot) in grid.indexed_iter_mut() {
            let cell = comparisons
                .get(&(i, j))
                .ok_or(GramError::MissingCell { i, j })?;
            let comparison = cell.get(&condition).ok_or_else(|| GramError::MissingCondition {
                i,
                j,
                condition: condition.to_string(),
            })?;
            *slot = comparison.threshold_error();
        }
        matrices.insert(condition, grid);
    }
    Ok(matrices)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stand-in comparison with a known error.
    struct Fixed(f64);

    impl ErrorFrequency for Fixed {
        fn threshold_error(&self) -> f64 {
            self.0
        }
    }

    fn known_value(i: usize, j: usize, k: usize) -> f64 {
        (i * 100 + j * 10 + k) as f64 / 1000.0
    }

    fn synthetic(n: usize) -> BTreeMap<(usize, usize), BTreeMap<Condition, Fixed>> {
        let mut map = BTreeMap::new();
        for i in 0..n {
            for j in 0..n {
                let per_condition = Condition::ALL
                    .into_iter()
                    .enumerate()
                    .map(|(k, c)| (c, Fixed(known_value(i, j, k))))
                    .collect();
                map.insert((i, j), per_condition);
            }
        }
        map
    }

    #[test]
    fn test_every_entry_matches_its_comparison() {
        let comparisons = synthetic(3);
        let matrices = threshold_error_matrices(&comparisons, 3).unwrap();

        assert_eq!(matrices.len(), 4);
        for (k, condition) in Condition::ALL.into_iter().enumerate() {
            let grid: &Array2<f64> = &matrices[&condition];
            assert_eq!(grid.shape(), &[3, 3]);
            for i in 0..3 {
                for j in 0..3 {
                    assert_eq!(grid[[i, j]], comparisons[&(i, j)][&condition].threshold_error());
                    assert_eq!(grid[[i, j]], known_value(i, j, k));
                }
            }
        }
    }

    #[test]
    fn test_rows_are_permanent_index() {
        let matrices = threshold_error_matrices(&synthetic(3), 3).unwrap();
        let normal = &matrices[&Condition::Normal];
        assert_eq!(normal[[2, 0]], 0.2);
        assert_eq!(normal[[0, 2]], 0.02);
    }

    #[test]
    fn test_missing_cell() {
        let mut comparisons = synthetic(3);
        comparisons.remove(&(1, 2));
        let err = threshold_error_matrices(&comparisons, 3).unwrap_err();
        assert!(matches!(err, GramError::MissingCell { i: 1, j: 2 }));
    }

    #[test]
    fn test_missing_condition() {
        let mut comparisons = synthetic(3);
        comparisons.get_mut(&(0, 0)).unwrap().remove(&Condition::Minute);
        let err = threshold_error_matrices(&comparisons, 3).unwrap_err();
        assert!(matches!(
            err,
            GramError::MissingCondition { ref condition, .. } if condition == "minute"
        ));
    }

    #[test]
    fn test_extra_cells_are_ignored() {
        let matrices = threshold_error_matrices(&synthetic(4), 3).unwrap();
        assert_eq!(matrices[&Condition::Diabetic].dim(), (3, 3));
    }
}
