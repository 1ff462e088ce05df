//! Trajectory ensembles and their summary statistics.

use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Protein levels of one trajectory on the sampling grid.
#[derive(Clone, Debug)]
pub struct Trajectory {
    pub levels: Vec<u32>,
    /// Number of reactions fired before t_max.
    pub n_events: u64,
}

/// Many trajectories sampled on a shared time grid.
#[derive(Clone, Debug)]
pub struct Ensemble {
    times: Vec<f64>,
    /// (n_trajectories, n_timepoints)
    levels: Array2<f64>,
}

impl Ensemble {
    pub fn new(times: Vec<f64>, levels: Array2<f64>) -> Self {
        debug_assert_eq!(times.len(), levels.ncols());
        Self { times, levels }
    }

    pub fn from_trajectories(times: Vec<f64>, trajectories: &[Trajectory]) -> Self {
        let mut levels = Array2::zeros((trajectories.len(), times.len()));
        for (mut row, trajectory) in levels.outer_iter_mut().zip(trajectories) {
            for (slot, &level) in row.iter_mut().zip(&trajectory.levels) {
                *slot = level as f64;
            }
        }
        Self { times, levels }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn levels(&self) -> &Array2<f64> {
        &self.levels
    }

    pub fn n_trajectories(&self) -> usize {
        self.levels.nrows()
    }

    pub fn n_timepoints(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.nrows() == 0
    }

    /// Levels of every trajectory at one grid point.
    pub fn at(&self, time_index: usize) -> ArrayView1<'_, f64> {
        self.levels.column(time_index)
    }

    /// Mean level at each grid point.
    pub fn mean(&self) -> Vec<f64> {
        match self.levels.mean_axis(Axis(0)) {
            Some(mean) => mean.to_vec(),
            None => vec![0.0; self.n_timepoints()],
        }
    }

    pub fn mean_at(&self, time_index: usize) -> f64 {
        self.at(time_index).mean().unwrap_or(0.0)
    }

    /// q-quantile at each grid point.
    pub fn quantile(&self, q: f64) -> Vec<f64> {
        (0..self.n_timepoints())
            .map(|t| self.quantile_at(t, q))
            .collect()
    }

    /// q-quantile at one grid point, linearly interpolated between order
    /// statistics.
    pub fn quantile_at(&self, time_index: usize, q: f64) -> f64 {
        let mut values = self.at(time_index).to_vec();
        quantile(&mut values, q)
    }

    /// Mean and central band of the ensemble.
    pub fn summary(&self, confidence: f64) -> TimeSeriesSummary {
        let (lo, hi) = band_quantiles(confidence);
        TimeSeriesSummary {
            times: self.times.clone(),
            mean: self.mean(),
            lower: self.quantile(lo),
            upper: self.quantile(hi),
        }
    }
}

/// Lower and upper quantiles of a central band holding `confidence` of the mass.
pub fn band_quantiles(confidence: f64) -> (f64, f64) {
    let c = confidence.clamp(0.0, 1.0);
    ((1.0 - c) / 2.0, (1.0 + c) / 2.0)
}

/// Quantile of `values` (reordered in place). Empty input gives 0.
pub fn quantile(values: &mut [f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let pos = q.clamp(0.0, 1.0) * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    values[lo] + (values[hi] - values[lo]) * frac
}

/// Mean and band curves retained for plotting dynamics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesSummary {
    pub times: Vec<f64>,
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small_ensemble() -> Ensemble {
        Ensemble::new(
            vec![0.0, 1.0],
            array![[0.0, 1.0], [0.0, 2.0], [0.0, 3.0], [0.0, 10.0]],
        )
    }

    #[test]
    fn test_mean() {
        let ensemble = small_ensemble();
        assert_eq!(ensemble.mean(), vec![0.0, 4.0]);
        assert_eq!(ensemble.mean_at(1), 4.0);
    }

    #[test]
    fn test_quantile_interpolates() {
        let mut values = vec![3.0, 1.0, 2.0, 10.0];
        assert_eq!(quantile(&mut values, 0.0), 1.0);
        assert_eq!(quantile(&mut values, 1.0), 10.0);
        // pos = 0.5 * 3 = 1.5 → between 2 and 3
        assert!((quantile(&mut values, 0.5) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_empty() {
        assert_eq!(quantile(&mut [], 0.5), 0.0);
    }

    #[test]
    fn test_band_quantiles() {
        let (lo, hi) = band_quantiles(0.8);
        assert!((lo - 0.1).abs() < 1e-12);
        assert!((hi - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_summary_band_contains_mean_for_symmetric_data() {
        let ensemble = Ensemble::new(vec![0.0], array![[1.0], [2.0], [3.0]]);
        let summary = ensemble.summary(0.8);
        assert_eq!(summary.mean, vec![2.0]);
        assert!(summary.lower[0] <= 2.0 && summary.upper[0] >= 2.0);
    }

    #[test]
    fn test_from_trajectories() {
        let trajectories = vec![
            Trajectory {
                levels: vec![0, 4],
                n_events: 4,
            },
            Trajectory {
                levels: vec![0, 2],
                n_events: 2,
            },
        ];
        let ensemble = Ensemble::from_trajectories(vec![0.0, 1.0], &trajectories);
        assert_eq!(ensemble.n_trajectories(), 2);
        assert_eq!(ensemble.at(1).to_vec(), vec![4.0, 2.0]);
    }
}
