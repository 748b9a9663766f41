//! Adaptation step — one fixed-duration tick of network dynamics.
//!
//! Each tick, in order:
//! 1. Repair any invariant violations carried in from the input
//! 2. Solve flow on every tube
//! 3. Relax each tube's thickness toward its Murray's-law target
//! 4. Prune tubes that are both thin and past their grace period
//! 5. Grow one tube from each well-supplied, under-connected node
//! 6. Decay every gradient toward the neutral baseline
//! 7. Advance time, tube ages, pulse phases and the cytoplasm total
//!
//! Tubes touching an inactive node skip steps 3 and 4: they carry no flow
//! but keep their thickness until the node is active again.
//!
//! The input snapshot is never modified; the step works on a copy.

use crate::config::SimulationConfig;
use crate::flow::{murray_target, solve_flows};
use plasmo_core::types::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Something that happened to the network during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NetworkEvent {
    /// A node grew a new tube.
    TubeGrown { id: TubeId, source: NodeId, sink: NodeId },
    /// A thin, mature tube was removed.
    TubePruned { id: TubeId, source: NodeId, sink: NodeId, final_thickness: f64 },
    /// A value outside its declared bound was corrected.
    InvariantRepaired { detail: String },
    /// A tick completed.
    TickComplete { time: f64, tubes: usize, active_nodes: usize },
}

/// Advance one tick with the default configuration.
pub fn step(plasmodium: &Plasmodium) -> Plasmodium {
    step_with(plasmodium, &SimulationConfig::default())
}

/// Advance one tick.
pub fn step_with(plasmodium: &Plasmodium, config: &SimulationConfig) -> Plasmodium {
    step_with_events(plasmodium, config).0
}

/// Advance one tick and report what changed.
pub fn step_with_events(
    plasmodium: &Plasmodium,
    config: &SimulationConfig,
) -> (Plasmodium, Vec<NetworkEvent>) {
    let mut next = plasmodium.clone();
    let mut events = Vec::new();

    repair_invariants(&mut next, config, &mut events);
    solve_flows(&mut next, config);
    adapt_thickness(&mut next, config);
    let pruned = prune(&mut next, config, &mut events);
    let grown = grow(&mut next, config, &mut events);
    decay_gradients(&mut next, config);
    advance_clock(&mut next, config);

    debug!(
        time = next.time,
        tubes = next.tube_count(),
        grown,
        pruned,
        "tick complete"
    );
    events.push(NetworkEvent::TickComplete {
        time: next.time,
        tubes: next.tube_count(),
        active_nodes: next.active_node_count(),
    });
    (next, events)
}

/// Correct anything a well-behaved run could never produce: dangling or
/// looped tubes, non-finite or out-of-bound numbers.
pub(crate) fn repair_invariants(
    plasmodium: &mut Plasmodium,
    config: &SimulationConfig,
    events: &mut Vec<NetworkEvent>,
) {
    let mut report = |detail: String| {
        warn!(%detail, "repaired invariant violation");
        events.push(NetworkEvent::InvariantRepaired { detail });
    };

    if !plasmodium.time.is_finite() || plasmodium.time < 0.0 {
        report(format!("elapsed time {} reset to 0", plasmodium.time));
        plasmodium.time = 0.0;
    }

    let dangling: Vec<TubeId> = plasmodium
        .tubes
        .values()
        .filter(|t| t.source == t.sink || !plasmodium.is_anchored(t))
        .map(|t| t.id)
        .collect();
    for id in dangling {
        if let Some(tube) = plasmodium.remove_tube(id) {
            report(format!(
                "removed tube {} with invalid endpoints {} -> {}",
                id, tube.source, tube.sink
            ));
        }
    }

    for tube in plasmodium.tubes.values_mut() {
        if !tube.thickness.is_finite() || tube.thickness < 0.0 {
            report(format!("tube {} thickness {} reset to 0", tube.id, tube.thickness));
            tube.thickness = 0.0;
        } else if tube.thickness > config.max_thickness {
            report(format!(
                "tube {} thickness {} clamped to {}",
                tube.id, tube.thickness, config.max_thickness
            ));
            tube.thickness = config.max_thickness;
        }
        if !tube.flow.is_finite() {
            report(format!("tube {} flow {} reset to 0", tube.id, tube.flow));
            tube.flow = 0.0;
        }
        if !tube.age.is_finite() || tube.age < 0.0 {
            report(format!("tube {} age {} reset to 0", tube.id, tube.age));
            tube.age = 0.0;
        }
    }

    for node in plasmodium.nodes.values_mut() {
        if !node.gradient.is_within_bounds() {
            report(format!("node {} gradient clamped into [0, 1]", node.id));
            node.gradient = node.gradient.clamped();
        }
    }
}

/// Nodes whose incident tubes are held as they are until the node recovers.
fn inactive_nodes(plasmodium: &Plasmodium) -> BTreeSet<NodeId> {
    plasmodium
        .nodes
        .values()
        .filter(|n| !n.is_active)
        .map(|n| n.id)
        .collect()
}

fn adapt_thickness(plasmodium: &mut Plasmodium, config: &SimulationConfig) {
    let relax = 1.0 - (-config.adaptation_rate * config.tick_duration).exp();
    let frozen = inactive_nodes(plasmodium);
    for tube in plasmodium.tubes.values_mut() {
        if frozen.contains(&tube.source) || frozen.contains(&tube.sink) {
            continue;
        }
        let target = murray_target(tube.flow, config);
        let next = tube.thickness + (target - tube.thickness) * relax;
        tube.thickness = next.clamp(0.0, config.max_thickness);
    }
}

fn prune(plasmodium: &mut Plasmodium, config: &SimulationConfig, events: &mut Vec<NetworkEvent>) -> usize {
    let frozen = inactive_nodes(plasmodium);
    let doomed: Vec<TubeId> = plasmodium
        .tubes
        .values()
        .filter(|t| !frozen.contains(&t.source) && !frozen.contains(&t.sink))
        .filter(|t| t.thickness < config.prune_threshold && t.age > config.grace_period)
        .map(|t| t.id)
        .collect();

    for id in &doomed {
        if let Some(tube) = plasmodium.remove_tube(*id) {
            events.push(NetworkEvent::TubePruned {
                id: *id,
                source: tube.source,
                sink: tube.sink,
                final_thickness: tube.thickness,
            });
        }
    }
    doomed.len()
}

fn grow(plasmodium: &mut Plasmodium, config: &SimulationConfig, events: &mut Vec<NetworkEvent>) -> usize {
    if config.target_degree == 0 {
        return 0;
    }

    let mut adjacency: BTreeMap<NodeId, BTreeSet<NodeId>> =
        plasmodium.nodes.keys().map(|id| (*id, BTreeSet::new())).collect();
    let mut degree: BTreeMap<NodeId, usize> = BTreeMap::new();
    for tube in plasmodium.tubes.values() {
        adjacency.entry(tube.source).or_default().insert(tube.sink);
        adjacency.entry(tube.sink).or_default().insert(tube.source);
        *degree.entry(tube.source).or_default() += 1;
        *degree.entry(tube.sink).or_default() += 1;
    }

    let growers: Vec<NodeId> = plasmodium
        .nodes
        .values()
        .filter(|n| n.is_active && combine_gradient(&n.gradient) >= config.growth_threshold)
        .map(|n| n.id)
        .collect();

    let mut grown = 0;
    for id in growers {
        // Parallel tubes each count toward the degree.
        if degree.get(&id).copied().unwrap_or(0) >= config.target_degree {
            continue;
        }
        let neighbours = adjacency.get(&id).cloned().unwrap_or_default();
        let Some(origin) = plasmodium.node(id).map(|n| n.position) else {
            continue;
        };

        let nearest = plasmodium
            .nodes
            .values()
            .filter(|n| n.is_active && n.id != id && !neighbours.contains(&n.id))
            .map(|n| (n.id, origin.distance_squared_to(&n.position)))
            .min_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.0.cmp(&b.0))
            })
            .map(|(target, _)| target);

        let Some(target) = nearest else {
            continue;
        };
        if let Some(tube_id) = plasmodium.connect(id, target, config.growth_thickness) {
            adjacency.entry(id).or_default().insert(target);
            adjacency.entry(target).or_default().insert(id);
            *degree.entry(id).or_default() += 1;
            *degree.entry(target).or_default() += 1;
            events.push(NetworkEvent::TubeGrown {
                id: tube_id,
                source: id,
                sink: target,
            });
            grown += 1;
        }
    }
    grown
}

fn decay_gradients(plasmodium: &mut Plasmodium, config: &SimulationConfig) {
    let keep = (-config.tick_duration / config.decay_time_constant).exp();
    let baseline = config.gradient_baseline;
    for node in plasmodium.nodes.values_mut() {
        node.gradient = node
            .gradient
            .map_components(|c| baseline + (c - baseline) * keep);
    }
}

fn advance_clock(plasmodium: &mut Plasmodium, config: &SimulationConfig) {
    let dt = config.tick_duration;
    let tau = std::f64::consts::TAU;
    plasmodium.time += dt;
    for tube in plasmodium.tubes.values_mut() {
        tube.age += dt;
    }
    for node in plasmodium.nodes.values_mut() {
        node.pulse_phase = (node.pulse_phase + tau * config.pulse_frequency * dt).rem_euclid(tau);
    }
    plasmodium.cytoplasm = plasmodium.total_volume();
}
