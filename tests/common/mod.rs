//! Shared test fixtures for integration tests.

use p2a_sim::config::ScenarioConfig;
use p2a_sim::profile::WindProfile;
use p2a_sim::sim::{Engine, PlantDesign, RunOptions, SimOutput};

/// Default scenario (alkaline preset, one profile year, seed 42).
pub fn default_config() -> ScenarioConfig {
    let mut cfg = ScenarioConfig::ael();
    cfg.simulation.seed = 42;
    cfg
}

/// Derived plant design of the default scenario.
pub fn default_design() -> PlantDesign {
    PlantDesign::from_config(&default_config())
}

/// Runs a scenario over a profile with the trace retained.
pub fn run_traced(cfg: &ScenarioConfig, profile: &WindProfile) -> SimOutput {
    let mut engine = Engine::new(cfg);
    engine.run(
        profile,
        &RunOptions {
            keep_trace: true,
            debug: false,
        },
    )
}

/// Runs a scenario over a constant-wind profile with the trace retained.
pub fn run_constant(cfg: &ScenarioConfig, p_mw: f64, hours: usize) -> SimOutput {
    run_traced(cfg, &WindProfile::constant(p_mw, hours))
}
