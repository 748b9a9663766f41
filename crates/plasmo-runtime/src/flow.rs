//! Flow solver — Hagen–Poiseuille transport along each tube.
//!
//! Each endpoint's gradient collapses to one drive value. Flow along a
//! tube is the drive difference divided by the tube's resistance, which
//! falls with the fourth power of thickness: a tube twice as thick carries
//! sixteen times the flow under the same drive.
//!
//! Flows are solved tube-by-tube from the current drives; there is no
//! global pressure solve.

use crate::config::SimulationConfig;
use plasmo_core::types::*;

/// Resistance of a tube of the given thickness.
///
/// `1 / thickness⁴`, with the fourth power floored at the smallest
/// positive float so a zero-thickness tube never divides by zero, and the
/// result floored at `min_resistance`.
pub fn resistance(thickness: f64, config: &SimulationConfig) -> f64 {
    let t = if thickness.is_finite() { thickness.max(0.0) } else { 0.0 };
    let conductance = t.powi(4).max(f64::MIN_POSITIVE);
    (1.0 / conductance).max(config.min_resistance)
}

/// Flow from source to sink for the given drives and thickness.
pub fn tube_flow(source_drive: f64, sink_drive: f64, thickness: f64, config: &SimulationConfig) -> f64 {
    let q = config.flow_scale * (source_drive - sink_drive) / resistance(thickness, config);
    if q.is_finite() {
        q
    } else {
        0.0
    }
}

/// Largest flow a single tube can carry: maximum thickness under a unit
/// drive difference.
pub fn max_tube_flow(config: &SimulationConfig) -> f64 {
    tube_flow(1.0, 0.0, config.max_thickness, config)
}

/// Murray's-law thickness target for a tube carrying `flow`.
///
/// Proportional to `|flow|^(1/3)`, clamped to `[0, max_thickness]`.
/// Monotonically non-decreasing in `|flow|`.
pub fn murray_target(flow: f64, config: &SimulationConfig) -> f64 {
    if !flow.is_finite() {
        return 0.0;
    }
    (config.murray_scale * flow.abs().cbrt()).clamp(0.0, config.max_thickness)
}

/// Drive of a node, or `None` if the node cannot carry flow.
fn drive(plasmodium: &Plasmodium, id: NodeId) -> Option<f64> {
    plasmodium
        .node(id)
        .filter(|n| n.is_active)
        .map(|n| combine_gradient(&n.gradient))
}

/// Recompute the flow of every tube in place.
///
/// Tubes touching an inactive or missing node carry zero flow.
pub(crate) fn solve_flows(plasmodium: &mut Plasmodium, config: &SimulationConfig) {
    let flows: Vec<(TubeId, f64)> = plasmodium
        .tubes
        .values()
        .map(|tube| {
            let q = match (drive(plasmodium, tube.source), drive(plasmodium, tube.sink)) {
                (Some(a), Some(b)) => tube_flow(a, b, tube.thickness, config),
                _ => 0.0,
            };
            (tube.id, q)
        })
        .collect();

    for (id, q) in flows {
        if let Some(tube) = plasmodium.tube_mut(id) {
            tube.flow = q;
        }
    }
}

/// A copy of `plasmodium` with every tube's flow solved.
pub fn solve(plasmodium: &Plasmodium, config: &SimulationConfig) -> Plasmodium {
    let mut next = plasmodium.clone();
    solve_flows(&mut next, config);
    next
}
