//! Migration updater — a resource peak that travels around the network.
//!
//! The peak circles the centroid in the x/z plane. Nodes near it are well
//! supplied, nodes far from it starve, and the total gradient mass stays
//! fixed at `gradient_baseline × node_count` so the network as a whole is
//! neither enriched nor drained as the peak moves.

use crate::config::SimulationConfig;
use plasmo_core::geometry::{centroid, Point3};
use plasmo_core::types::*;
use std::f64::consts::TAU;
use tracing::debug;

/// Advance the migration peak one tick with the default configuration.
pub fn advance_migration(plasmodium: &Plasmodium) -> Plasmodium {
    advance_migration_with(plasmodium, &SimulationConfig::default())
}

/// Advance the migration peak one tick.
///
/// Moves the stored phase by `migration_speed × tick_duration` and rewrites
/// every node's gradient from the new peak position.
pub fn advance_migration_with(plasmodium: &Plasmodium, config: &SimulationConfig) -> Plasmodium {
    let mut next = plasmodium.clone();
    let phase = if next.migration_phase.is_finite() {
        next.migration_phase
    } else {
        0.0
    };
    next.migration_phase = (phase + config.migration_speed * config.tick_duration).rem_euclid(TAU);
    apply_profile(&mut next, config);
    debug!(phase = next.migration_phase, "migration advanced");
    next
}

/// Where the peak sits for the snapshot's current phase.
pub fn peak_position(plasmodium: &Plasmodium) -> Point3 {
    let (center, radius) = extent(plasmodium);
    let phase = plasmodium.migration_phase;
    center.offset(radius * phase.cos(), 0.0, radius * phase.sin())
}

/// Overwrite every node's gradient with the profile for the stored phase.
pub(crate) fn apply_profile(plasmodium: &mut Plasmodium, config: &SimulationConfig) {
    if plasmodium.nodes.is_empty() {
        return;
    }
    let (_, radius) = extent(plasmodium);
    let peak = peak_position(plasmodium);
    let sigma = config.migration_spread * radius;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let weights: Vec<f64> = plasmodium
        .nodes
        .values()
        .map(|n| {
            let w = (-n.position.distance_squared_to(&peak) / two_sigma_sq).exp();
            if w.is_finite() {
                w
            } else {
                0.0
            }
        })
        .collect();
    let mass = config.gradient_baseline * plasmodium.node_count() as f64;
    let values = water_fill(&weights, mass);

    let now = plasmodium.time;
    for (node, value) in plasmodium.nodes.values_mut().zip(values) {
        node.gradient = ResourceGradient::uniform(value, now);
    }
}

/// Centroid of the node positions and the largest distance from it (1 when
/// every node sits on the centroid).
fn extent(plasmodium: &Plasmodium) -> (Point3, f64) {
    let center = centroid(plasmodium.nodes.values().map(|n| &n.position));
    let radius = plasmodium
        .nodes
        .values()
        .map(|n| n.position.distance_to(&center))
        .filter(|d| d.is_finite())
        .fold(0.0, f64::max);
    (center, if radius > 0.0 { radius } else { 1.0 })
}

/// Split `mass` across slots in proportion to `weights`, never giving a
/// slot more than 1. Excess from capped slots is handed to the rest.
fn water_fill(weights: &[f64], mass: f64) -> Vec<f64> {
    let n = weights.len();
    let mass = mass.clamp(0.0, n as f64);
    let mut values = vec![0.0; n];
    let mut capped = vec![false; n];

    loop {
        let free: Vec<usize> = (0..n).filter(|&i| !capped[i]).collect();
        if free.is_empty() {
            break;
        }
        let remaining = mass - (n - free.len()) as f64;
        let weight_sum: f64 = free.iter().map(|&i| weights[i]).sum();

        let mut newly_capped = false;
        for &i in &free {
            let share = if weight_sum > 0.0 {
                remaining * weights[i] / weight_sum
            } else {
                remaining / free.len() as f64
            };
            if share >= 1.0 {
                capped[i] = true;
                values[i] = 1.0;
                newly_capped = true;
            } else {
                values[i] = share.max(0.0);
            }
        }
        if !newly_capped {
            break;
        }
    }
    values
}
