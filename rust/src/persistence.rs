//! Saving and loading sweep results.
//!
//! Results are written as JSON. The (i, j)-keyed mapping is stored as a list
//! of cells because JSON object keys must be strings.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{GramError, Result};
use crate::sweep::SweepResults;

/// Default results file name.
pub const DEFAULT_RESULTS_FILE: &str = "repressor_pairs.json";

/// Write sweep results to `path`.
pub fn save(results: &SweepResults, path: &Path) -> Result<()> {
    let io_err = |source| GramError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, results)?;
    writer.flush().map_err(io_err)?;
    info!(path = %path.display(), cells = results.comparisons.len(), "saved sweep results");
    Ok(())
}

/// Read sweep results from `path`.
pub fn load(path: &Path) -> Result<SweepResults> {
    let file = File::open(path).map_err(|source| GramError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let results: SweepResults = serde_json::from_reader(BufReader::new(file))?;
    info!(path = %path.display(), cells = results.comparisons.len(), "loaded sweep results");
    Ok(results)
}

/// Serde adapter writing a `PairComparisons` map as `[{i, j, comparisons}]`.
pub mod cells {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::simulation::ConditionComparisons;
    use crate::sweep::PairComparisons;

    #[derive(Serialize)]
    struct CellRef<'a> {
        i: usize,
        j: usize,
        comparisons: &'a ConditionComparisons,
    }

    #[derive(Deserialize)]
    struct CellOwned {
        i: usize,
        j: usize,
        comparisons: ConditionComparisons,
    }

    pub fn serialize<S: Serializer>(
        map: &PairComparisons,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.iter().map(|(&(i, j), comparisons)| CellRef {
            i,
            j,
            comparisons,
        }))
    }

    /// A cell listed twice is an error.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<PairComparisons, D::Error> {
        let cells = Vec::<CellOwned>::deserialize(deserializer)?;
        let mut map = PairComparisons::new();
        for cell in cells {
            if map.insert((cell.i, cell.j), cell.comparisons).is_some() {
                return Err(D::Error::custom(format!(
                    "cell ({}, {}) appears more than once",
                    cell.i, cell.j
                )));
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::Condition;
    use crate::simulation::SimulationConfig;
    use crate::sweep::{PairSweep, SweepConfig};

    fn small_results() -> SweepResults {
        let config = SweepConfig {
            strengths: vec![0.01, 0.1],
            n_trajectories: 10,
            simulation: SimulationConfig {
                t_max: 4.0,
                n_timepoints: 9,
            },
            ..Default::default()
        };
        PairSweep::new(config).unwrap().run().unwrap()
    }

    #[test]
    fn test_save_then_load() {
        let results = small_results();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_RESULTS_FILE);

        save(&results, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.strengths, results.strengths);
        assert_eq!(loaded.comparisons.len(), 4);
        for (cell, comparisons) in &results.comparisons {
            for condition in Condition::ALL {
                assert_eq!(
                    loaded.comparisons[cell][&condition].threshold_error,
                    comparisons[&condition].threshold_error
                );
            }
        }
    }

    #[test]
    fn test_file_uses_condition_names_and_cell_list() {
        let results = small_results();
        let value = serde_json::to_value(&results).unwrap();

        let cells = value["comparisons"].as_array().unwrap();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[1]["i"], 0);
        assert_eq!(cells[1]["j"], 1);
        let per_condition = cells[0]["comparisons"].as_object().unwrap();
        for name in ["normal", "diabetic", "minute", "carbon_limited"] {
            assert!(per_condition.contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_load_rejects_duplicate_cell() {
        let results = small_results();
        let mut value = serde_json::to_value(&results).unwrap();
        let cells = value["comparisons"].as_array_mut().unwrap();
        let repeated = cells[0].clone();
        cells.push(repeated);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duplicate.json");
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, GramError::Serialization(_)));
        assert!(err.to_string().contains("cell (0, 0) appears more than once"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, GramError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load(&path).unwrap_err(), GramError::Serialization(_)));
    }
}
