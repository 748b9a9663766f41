//! CLI command implementations.

pub mod init;
pub mod resume;
pub mod run;
pub mod stats;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use plasmo::prelude::*;

/// Run `ticks` ticks behind a progress bar, echoing growth and pruning
/// when `verbose` is set.
pub(crate) fn drive(sim: &mut Simulation, ticks: u64, verbose: bool) {
    let pb = ProgressBar::new(ticks);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ticks")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    for _ in 0..ticks {
        let events = sim.tick();
        if verbose {
            let grown = events
                .iter()
                .filter(|e| matches!(e, NetworkEvent::TubeGrown { .. }))
                .count();
            let pruned = events
                .iter()
                .filter(|e| matches!(e, NetworkEvent::TubePruned { .. }))
                .count();
            if grown + pruned > 0 {
                pb.println(format!(
                    "  tick {}: {} grown, {} pruned",
                    sim.current_tick(),
                    grown.to_string().green(),
                    pruned.to_string().red()
                ));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");
}
