//! Scenario configurator — named gradient and topology policies.
//!
//! Each scenario rewrites node gradients (and, for *failure* and *growth*,
//! activity or topology) to set up a qualitatively distinct behaviour.
//! Only *failure* is random; every other scenario is a pure function of
//! its input.

use crate::config::SimulationConfig;
use crate::migration;
use plasmo_core::error::{PlasmoError, Result};
use plasmo_core::geometry::centroid;
use plasmo_core::types::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// A named gradient-and-topology policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Every node at the same mid-range gradient.
    Balanced,
    /// One node near-maximal, all others near-minimal.
    Hotspot,
    /// A gradient peak that travels across the network every tick.
    Migration,
    /// One active node goes dark.
    Failure,
    /// Balanced gradients over a deliberately sparse tube set.
    Growth,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Balanced,
        Scenario::Hotspot,
        Scenario::Migration,
        Scenario::Failure,
        Scenario::Growth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Balanced => "balanced",
            Scenario::Hotspot => "hotspot",
            Scenario::Migration => "migration",
            Scenario::Failure => "failure",
            Scenario::Growth => "growth",
        }
    }

    /// Whether the gradient profile must be advanced before every tick.
    pub fn needs_migration(&self) -> bool {
        matches!(self, Scenario::Migration)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = PlasmoError;

    fn from_str(s: &str) -> Result<Self> {
        Scenario::ALL
            .iter()
            .copied()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PlasmoError::invalid_config(
                    "scenario",
                    s,
                    "expected one of balanced, hotspot, migration, failure, growth",
                )
            })
    }
}

/// Apply a scenario with the default configuration and an entropy-seeded RNG.
pub fn apply_scenario(plasmodium: &Plasmodium, scenario: Scenario) -> Plasmodium {
    let config = SimulationConfig::default();
    apply_scenario_with(plasmodium, scenario, &config, &mut config.seeded_rng())
}

/// Apply a scenario, returning a new snapshot.
///
/// `rng` is only consulted by [`Scenario::Failure`].
pub fn apply_scenario_with(
    plasmodium: &Plasmodium,
    scenario: Scenario,
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> Plasmodium {
    let mut next = plasmodium.clone();
    let now = next.time;

    match scenario {
        Scenario::Balanced => set_uniform(&mut next, config.gradient_baseline, now),
        Scenario::Hotspot => {
            let hot = hotspot_node(&next);
            for node in next.nodes.values_mut() {
                let value = if Some(node.id) == hot {
                    config.hotspot_high
                } else {
                    config.hotspot_low
                };
                node.gradient = ResourceGradient::uniform(value, now);
            }
        }
        Scenario::Migration => {
            next.migration_phase = 0.0;
            migration::apply_profile(&mut next, config);
        }
        Scenario::Failure => fail_random_node(&mut next, rng),
        Scenario::Growth => {
            set_uniform(&mut next, config.gradient_baseline, now);
            sparsify(&mut next, config.growth_retain_fraction);
        }
    }

    info!(
        %scenario,
        tubes = next.tube_count(),
        active_nodes = next.active_node_count(),
        "applied scenario"
    );
    next
}

fn set_uniform(plasmodium: &mut Plasmodium, value: f64, now: f64) {
    for node in plasmodium.nodes.values_mut() {
        node.gradient = ResourceGradient::uniform(value, now);
    }
}

/// The node closest to the centroid of all nodes; ties go to the lower id.
pub fn hotspot_node(plasmodium: &Plasmodium) -> Option<NodeId> {
    let center = centroid(plasmodium.nodes.values().map(|n| &n.position));
    plasmodium
        .nodes
        .values()
        .map(|n| (n.id, n.position.distance_squared_to(&center)))
        .min_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        })
        .map(|(id, _)| id)
}

fn fail_random_node(plasmodium: &mut Plasmodium, rng: &mut impl Rng) {
    let active: Vec<NodeId> = plasmodium
        .nodes
        .values()
        .filter(|n| n.is_active)
        .map(|n| n.id)
        .collect();
    if active.is_empty() {
        warn!("failure scenario found no active node to deactivate");
        return;
    }

    let victim = active[rng.random_range(0..active.len())];
    if let Some(node) = plasmodium.node_mut(victim) {
        node.is_active = false;
    }
    for tube in plasmodium.tubes.values_mut() {
        if tube.touches(victim) {
            tube.flow = 0.0;
        }
    }
    info!(node = %victim, "node failed");
}

/// Keep only the thickest `floor(count × fraction)` tubes.
fn sparsify(plasmodium: &mut Plasmodium, fraction: f64) {
    let keep = (plasmodium.tube_count() as f64 * fraction).floor() as usize;
    let mut ranked: Vec<(TubeId, f64)> = plasmodium
        .tubes
        .values()
        .map(|t| (t.id, t.thickness))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    for (id, _) in ranked.into_iter().skip(keep) {
        plasmodium.remove_tube(id);
    }
}
