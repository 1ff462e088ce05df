//! Gillespie simulator for the feedback network with parallel trajectory support.
//!
//! Direct method:
//! - State = SpeciesState
//! - Events = reaction channels with positive propensity
//! - Output = protein level sampled on a uniform time grid
//!
//! Key feature: parallel trajectory simulation using Rayon.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::ensemble::{Ensemble, Trajectory};
use crate::error::{GramError, Result};
use crate::network::ReactionNetwork;

/// Configuration for Gillespie simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation end time.
    pub t_max: f64,
    /// Number of grid points in [0, t_max], both ends included.
    pub n_timepoints: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            t_max: 12.0,
            n_timepoints: 121,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.t_max.is_finite() || self.t_max <= 0.0 {
            return Err(GramError::invalid("t_max", "must be positive and finite"));
        }
        if self.n_timepoints < 2 {
            return Err(GramError::invalid("n_timepoints", "need at least 2 grid points"));
        }
        Ok(())
    }

    /// Uniform sampling times from 0 to t_max.
    pub fn time_grid(&self) -> Vec<f64> {
        let step = self.t_max / (self.n_timepoints - 1) as f64;
        (0..self.n_timepoints).map(|i| i as f64 * step).collect()
    }
}

/// Gillespie simulator for one reaction network.
pub struct GillespieSimulator<'a> {
    network: &'a ReactionNetwork,
    times: Vec<f64>,
}

impl<'a> GillespieSimulator<'a> {
    pub fn new(network: &'a ReactionNetwork, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            network,
            times: config.time_grid(),
        })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Run a single trajectory.
    ///
    /// The level recorded at grid time t is the level holding at t. Once the
    /// total propensity is zero the state is absorbing and is held to the end.
    pub fn simulate(&self, rng: &mut StdRng) -> Trajectory {
        let n = self.times.len();
        let mut levels = Vec::with_capacity(n);
        let mut state = self.network.initial_state.clone();
        let mut propensities = Vec::with_capacity(self.network.n_reactions());
        let mut current_time = 0.0;
        let mut n_events: u64 = 0;

        loop {
            let total_rate = self.network.propensities(&state, &mut propensities);
            if total_rate <= 0.0 {
                break;
            }

            // Exponential waiting time; 1 - U lies in (0, 1]
            let dt = -(1.0 - rng.gen::<f64>()).ln() / total_rate;
            let next_time = current_time + dt;

            while levels.len() < n && self.times[levels.len()] < next_time {
                levels.push(state.protein());
            }
            if levels.len() == n {
                break;
            }

            // Sample channel weighted by propensity
            let u: f64 = rng.gen::<f64>() * total_rate;
            let mut cumsum = 0.0;
            let mut chosen_idx = None;
            for (i, &a) in propensities.iter().enumerate() {
                if a <= 0.0 {
                    continue;
                }
                cumsum += a;
                chosen_idx = Some(i);
                if u < cumsum {
                    break;
                }
            }
            let Some(chosen_idx) = chosen_idx else {
                break;
            };

            state.apply(&self.network.reactions[chosen_idx].change);
            current_time = next_time;
            n_events += 1;
        }

        while levels.len() < n {
            levels.push(state.protein());
        }

        Trajectory { levels, n_events }
    }
}

/// Simulate multiple trajectories in parallel.
///
/// # Arguments
/// * `network` - Reaction network (rates already scaled for the condition)
/// * `config` - Simulation configuration
/// * `n_samples` - Number of trajectories to simulate
/// * `seed` - Base RNG seed (each trajectory gets seed + trajectory_index)
///
/// # Returns
/// * Ensemble of protein levels, one row per trajectory
pub fn simulate_ensemble(
    network: &ReactionNetwork,
    config: &SimulationConfig,
    n_samples: usize,
    seed: u64,
) -> Result<Ensemble> {
    let simulator = GillespieSimulator::new(network, config)?;

    let trajectories: Vec<Trajectory> = (0..n_samples)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            simulator.simulate(&mut rng)
        })
        .collect();

    Ok(Ensemble::from_trajectories(simulator.times().to_vec(), &trajectories))
}
