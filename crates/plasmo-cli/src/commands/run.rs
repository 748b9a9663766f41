//! Start a fresh simulation.

use anyhow::{Context, Result};
use colored::Colorize;
use plasmo::prelude::*;

use super::drive;
use crate::config::{current_session_path, Config};

/// Command-line values that take precedence over plasmo.toml.
pub struct RunOverrides {
    pub nodes: Option<usize>,
    pub connectivity: Option<f64>,
    pub scenario: Option<Scenario>,
    pub ticks: Option<u64>,
    pub seed: Option<u64>,
}

pub fn run(overrides: RunOverrides, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let nodes = overrides.nodes.unwrap_or(config.run.node_count);
    let connectivity = overrides.connectivity.unwrap_or(config.run.connectivity);
    let scenario = overrides.scenario.unwrap_or(config.run.scenario);
    let ticks = overrides.ticks.unwrap_or(config.run.ticks);

    let mut sim_config = config.simulation;
    if let Some(seed) = overrides.seed {
        sim_config = sim_config.with_seed(seed);
    }

    println!(
        "{} Growing {} nodes at connectivity {:.2}...",
        "→".blue(),
        nodes.to_string().cyan(),
        connectivity
    );
    let mut sim = Simulation::new(sim_config, nodes, connectivity)
        .context("Failed to initialize network")?;
    println!(
        "  Seeded: {} tubes",
        sim.state().tube_count().to_string().cyan()
    );

    sim.apply_scenario(scenario);
    println!(
        "{} Scenario {}, running {} ticks...",
        "→".blue(),
        scenario.to_string().cyan(),
        ticks.to_string().cyan()
    );

    let initial = sim.metrics();
    drive(&mut sim, ticks, verbose);

    let session_path = current_session_path()?;
    save_session(sim.state(), sim.scenario(), &session_path)
        .with_context(|| format!("Failed to save {}", session_path.display()))?;

    let metrics = sim.metrics();
    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    println!(
        "  Tubes: {} → {}",
        initial.tube_count.to_string().yellow(),
        metrics.tube_count.to_string().green()
    );
    println!("  Saved: {}", session_path.display().to_string().dimmed());
    println!();
    print_report(&metrics);

    Ok(())
}
