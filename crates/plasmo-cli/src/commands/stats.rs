//! Show network statistics.

use anyhow::{bail, Result};
use colored::Colorize;
use plasmo::prelude::*;

use crate::config::{current_session_path, Config};

pub fn run() -> Result<()> {
    let session_path = current_session_path()?;

    if !session_path.exists() {
        bail!("No session found. Run {} first.", "plasmo run".cyan());
    }

    let config = Config::load()?;
    let state = load_session(&session_path)?;
    let plasmodium = restore_plasmodium(&state);
    let metrics = compute_metrics_with(&plasmodium, &config.simulation);

    println!("{}", "Plasmo Network Statistics".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Session".blue().bold());
    println!("  Id:                {}", state.metadata.session_id.cyan());
    println!(
        "  Scenario:          {}",
        state
            .metadata
            .scenario
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string())
            .cyan()
    );
    println!();

    print_report(&metrics);

    // Thickness distribution
    if !plasmodium.tubes.is_empty() {
        let max = config.simulation.max_thickness;
        let mut buckets = [0usize; 4];
        for tube in plasmodium.tubes.values() {
            let bucket = ((tube.thickness / max) * 4.0).floor() as usize;
            buckets[bucket.min(3)] += 1;
        }
        println!();
        println!("{}", "Thickness".blue().bold());
        for (i, count) in buckets.iter().enumerate() {
            println!(
                "  {:.2}-{:.2}:         {}",
                i as f64 * max / 4.0,
                (i + 1) as f64 * max / 4.0,
                count.to_string().cyan()
            );
        }
    }

    println!();
    println!("{}", "═".repeat(40).dimmed());

    Ok(())
}
