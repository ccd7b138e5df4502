pub mod analysis;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod simulation;
pub mod transitions;

pub use error::SimError;

#[cfg(feature = "python")]
mod python {
    use pyo3::{exceptions::PyValueError, prelude::*};
    use std::sync::Arc;

    use crate::analysis::series::{series_probability, SeriesGameProbability};
    use crate::config::SimConfig;
    use crate::simulation::batch::{simulate_matchup, SimulationContext};
    use crate::simulation::matchup::MatchupInput;
    use crate::transitions::{BaserunningEngine, TransitionTable};

    fn to_py_err(e: impl std::fmt::Display) -> PyErr {
        PyValueError::new_err(e.to_string())
    }

    /// Simulates a matchup and returns the aggregate results as JSON.
    #[pyfunction]
    #[pyo3(signature = (matchup, table, config = ""))]
    fn simulate(py: Python<'_>, matchup: &str, table: &str, config: &str) -> PyResult<String> {
        let config = SimConfig::from_toml_str(config).map_err(to_py_err)?;
        let input = MatchupInput::from_json(matchup).map_err(to_py_err)?;
        let table = TransitionTable::from_json_str(table).map_err(to_py_err)?;
        let ctx = SimulationContext::from_input(
            BaserunningEngine::new(Arc::new(table)),
            input,
            Arc::new(config.markets.clone()),
        )
        .map_err(to_py_err)?;
        let seed = config.resolve_seed();
        let results = py
            .allow_threads(|| simulate_matchup(&ctx, config.num_games, seed))
            .map_err(to_py_err)?;
        serde_json::to_string(&results).map_err(to_py_err)
    }

    /// Series win and loss probabilities for each side, as JSON, from the
    /// home side's win probability in games 1, 2 and 3.
    #[pyfunction(name = "series_probability")]
    fn py_series_probability(p1: f64, p2: f64, p3: f64) -> PyResult<String> {
        let games = [p1, p2, p3]
            .into_iter()
            .map(SeriesGameProbability::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_py_err)?;
        serde_json::to_string(&series_probability(&games)).map_err(to_py_err)
    }

    /// A Python module implemented in Rust.
    #[pymodule]
    fn ballpark_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(simulate, m)?)?;
        m.add_function(wrap_pyfunction!(py_series_probability, m)?)?;
        Ok(())
    }
}
