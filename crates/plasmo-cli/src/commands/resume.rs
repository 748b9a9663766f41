//! Continue the saved simulation.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use plasmo::prelude::*;

use super::drive;
use crate::config::{current_session_path, Config};

pub fn run(ticks: Option<u64>, verbose: bool) -> Result<()> {
    let session_path = current_session_path()?;

    if !session_path.exists() {
        bail!("No session found. Run {} first.", "plasmo run".cyan());
    }

    let config = Config::load()?;
    let ticks = ticks.unwrap_or(config.run.ticks);

    // Load session
    println!("{} Loading session...", "→".blue());
    let state = load_session(&session_path)
        .with_context(|| format!("Failed to load {}", session_path.display()))?;
    let restored = restore_plasmodium(&state);
    println!(
        "  Loaded: {} nodes, {} tubes at {:.2}s",
        restored.node_count().to_string().cyan(),
        restored.tube_count().to_string().cyan(),
        restored.time
    );

    let mut sim = Simulation::from_state(restored, config.simulation, state.metadata.scenario)?;
    let initial = sim.metrics();

    println!(
        "{} Running {} ticks...",
        "→".blue(),
        ticks.to_string().cyan()
    );
    drive(&mut sim, ticks, verbose);

    save_session(sim.state(), sim.scenario(), &session_path)
        .with_context(|| format!("Failed to save {}", session_path.display()))?;

    let metrics = sim.metrics();
    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    println!(
        "  Time:  {:.2}s → {:.2}s",
        initial.time,
        metrics.time
    );
    println!(
        "  Tubes: {} → {}",
        initial.tube_count.to_string().yellow(),
        metrics.tube_count.to_string().green()
    );

    Ok(())
}
