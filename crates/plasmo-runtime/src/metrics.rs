//! Network metrics — summary statistics for one snapshot.
//!
//! Computing metrics never fails and never modifies the snapshot. Values
//! outside their bounds are reported with a warning and then left out or
//! clamped, so every figure stays finite:
//! - tubes with a missing endpoint are skipped entirely
//! - non-finite flows are left out of the flow total
//! - thickness is clamped into `[0, max_thickness]`
//! - a non-finite or negative time or cytoplasm reads as zero

use crate::config::SimulationConfig;
use crate::flow::max_tube_flow;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Undirected;
use plasmo_core::types::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Summary of a network at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkMetrics {
    pub tube_count: usize,
    pub node_count: usize,
    pub active_node_count: usize,
    /// Sum of absolute tube flows.
    pub total_flow: f64,
    /// `total_flow / (tube_count × q_max)`, in `[0, 1]`.
    pub network_efficiency: f64,
    /// Mean combined gradient over active nodes.
    pub avg_gradient: f64,
    pub avg_thickness: f64,
    /// Mean tubes per node.
    pub avg_degree: f64,
    /// Connected components over all nodes (isolated nodes count).
    pub component_count: usize,
    pub cytoplasm: f64,
    pub time: f64,
}

/// Compute metrics with the default configuration.
pub fn compute_metrics(plasmodium: &Plasmodium) -> NetworkMetrics {
    compute_metrics_with(plasmodium, &SimulationConfig::default())
}

/// Compute metrics. `config` supplies the flow ceiling efficiency is
/// normalized against.
pub fn compute_metrics_with(plasmodium: &Plasmodium, config: &SimulationConfig) -> NetworkMetrics {
    let tubes: Vec<&Tube> = plasmodium
        .tubes
        .values()
        .filter(|t| {
            let anchored = plasmodium.is_anchored(t);
            if !anchored {
                warn!(tube = %t.id, source = %t.source, sink = %t.sink, "metrics skip dangling tube");
            }
            anchored
        })
        .collect();

    let node_count = plasmodium.node_count();
    let active: Vec<&Node> = plasmodium.nodes.values().filter(|n| n.is_active).collect();

    let total_flow: f64 = tubes
        .iter()
        .filter_map(|t| {
            if t.flow.is_finite() {
                Some(t.flow.abs())
            } else {
                warn!(tube = %t.id, flow = t.flow, "metrics skip non-finite flow");
                None
            }
        })
        .sum();

    let ceiling = tubes.len() as f64 * max_tube_flow(config);
    let network_efficiency = if ceiling > 0.0 && ceiling.is_finite() {
        (total_flow / ceiling).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let avg_gradient = mean(active.iter().map(|n| combine_gradient(&n.gradient)));
    let avg_thickness = mean(tubes.iter().map(|t| bounded_thickness(t, config)));
    let avg_degree = if node_count > 0 {
        2.0 * tubes.len() as f64 / node_count as f64
    } else {
        0.0
    };

    NetworkMetrics {
        tube_count: tubes.len(),
        node_count,
        active_node_count: active.len(),
        total_flow,
        network_efficiency,
        avg_gradient,
        avg_thickness,
        avg_degree,
        component_count: component_count(plasmodium, &tubes),
        cytoplasm: non_negative("cytoplasm", plasmodium.cytoplasm),
        time: non_negative("time", plasmodium.time),
    }
}

fn bounded_thickness(tube: &Tube, config: &SimulationConfig) -> f64 {
    let thickness = tube.thickness;
    let bounded = if thickness.is_finite() {
        thickness.clamp(0.0, config.max_thickness)
    } else {
        0.0
    };
    if bounded != thickness {
        warn!(tube = %tube.id, thickness, bounded, "metrics clamp tube thickness");
    }
    bounded
}

fn non_negative(field: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!(field, value, "metrics read out-of-bound value as 0");
        0.0
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn component_count(plasmodium: &Plasmodium, tubes: &[&Tube]) -> usize {
    let mut graph: Graph<NodeId, f64, Undirected> = Graph::new_undirected();
    let index: BTreeMap<NodeId, NodeIndex> = plasmodium
        .nodes
        .keys()
        .map(|&id| (id, graph.add_node(id)))
        .collect();
    for tube in tubes {
        if let (Some(&a), Some(&b)) = (index.get(&tube.source), index.get(&tube.sink)) {
            graph.add_edge(a, b, tube.thickness);
        }
    }
    petgraph::algo::connected_components(&graph)
}

/// Print a formatted metrics report to the terminal.
pub fn print_report(metrics: &NetworkMetrics) {
    println!("── Network ─────────────────────────────────────────");
    println!("  Time:                       {:.2}s", metrics.time);
    println!("  Nodes (active / total):     {} / {}",
        metrics.active_node_count,
        metrics.node_count);
    println!("  Tubes:                      {}", metrics.tube_count);
    println!("  Components:                 {}", metrics.component_count);
    println!("  Avg degree:                 {:.2}", metrics.avg_degree);
    println!();
    println!("  Transport:");
    println!("    Total flow:               {:.4}", metrics.total_flow);
    println!("    Efficiency:               {:.1}%",
        metrics.network_efficiency * 100.0);
    println!("    Avg thickness:            {:.3}", metrics.avg_thickness);
    println!("    Cytoplasm volume:         {:.3}", metrics.cytoplasm);
    println!();
    println!("  Resources:");
    println!("    Avg gradient (active):    {:.3}", metrics.avg_gradient);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::solve;
    use plasmo_core::geometry::Point3;

    fn line(gradients: &[f64]) -> Plasmodium {
        let mut p = Plasmodium::new();
        for (i, g) in gradients.iter().enumerate() {
            p.add_node(
                Node::new(NodeId(i as u32), Point3::new(i as f64, 0.0, 0.0), format!("n{}", i))
                    .with_gradient(ResourceGradient::uniform(*g, 0.0)),
            );
        }
        p
    }

    #[test]
    fn empty_network_is_all_zero() {
        let metrics = compute_metrics(&Plasmodium::new());
        assert_eq!(metrics, NetworkMetrics::default());
    }

    #[test]
    fn counts_and_components() {
        let mut p = line(&[0.9, 0.1, 0.5, 0.5]);
        p.connect(NodeId(0), NodeId(1), 0.5);
        p.node_mut(NodeId(3)).unwrap().is_active = false;

        let metrics = compute_metrics(&p);
        assert_eq!(metrics.node_count, 4);
        assert_eq!(metrics.active_node_count, 3);
        assert_eq!(metrics.tube_count, 1);
        assert_eq!(metrics.component_count, 3);
        assert!((metrics.avg_degree - 0.5).abs() < 1e-12);
        assert!((metrics.avg_gradient - 0.5).abs() < 1e-12);
        assert!((metrics.avg_thickness - 0.5).abs() < 1e-12);
    }

    #[test]
    fn efficiency_is_bounded_and_follows_flow() {
        let config = SimulationConfig::default();
        let mut weak = line(&[0.6, 0.4]);
        weak.connect(NodeId(0), NodeId(1), 0.5);
        let mut strong = line(&[1.0, 0.0]);
        strong.connect(NodeId(0), NodeId(1), 0.5);

        let weak = compute_metrics_with(&solve(&weak, &config), &config);
        let strong = compute_metrics_with(&solve(&strong, &config), &config);
        assert!(weak.total_flow > 0.0);
        assert!(strong.total_flow > weak.total_flow);
        assert!(strong.network_efficiency > weak.network_efficiency);
        assert!(strong.network_efficiency <= 1.0);
    }

    #[test]
    fn bad_tubes_are_skipped() {
        let mut p = line(&[0.5, 0.5]);
        let id = p.connect(NodeId(0), NodeId(1), 0.3).unwrap();
        p.tube_mut(id).unwrap().flow = f64::NAN;
        p.restore_tube(Tube {
            id: TubeId(50),
            source: NodeId(0),
            sink: NodeId(42),
            thickness: 0.3,
            flow: 1.0,
            age: 0.0,
        });

        let metrics = compute_metrics(&p);
        assert_eq!(metrics.tube_count, 1);
        assert_eq!(metrics.total_flow, 0.0);
        assert!(metrics.network_efficiency.is_finite());
    }

    #[test]
    fn out_of_bound_values_are_clamped() {
        let config = SimulationConfig::default();
        let mut p = line(&[0.5, 0.5]);
        let id = p.connect(NodeId(0), NodeId(1), 0.3).unwrap();
        p.tube_mut(id).unwrap().thickness = -5.0;
        p.restore_tube(Tube {
            id: TubeId(60),
            source: NodeId(1),
            sink: NodeId(9),
            thickness: 0.8,
            flow: 0.5,
            age: 0.0,
        });
        p.time = f64::NAN;
        p.cytoplasm = -1.0;

        let metrics = compute_metrics_with(&p, &config);
        assert_eq!(metrics.tube_count, 1);
        assert_eq!(metrics.time, 0.0);
        assert_eq!(metrics.cytoplasm, 0.0);
        assert_eq!(metrics.avg_thickness, 0.0);

        p.tube_mut(id).unwrap().thickness = 7.0;
        let metrics = compute_metrics_with(&p, &config);
        assert_eq!(metrics.avg_thickness, config.max_thickness);
        for value in [
            metrics.total_flow,
            metrics.network_efficiency,
            metrics.avg_gradient,
            metrics.avg_degree,
        ] {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn report_prints() {
        let mut p = line(&[0.9, 0.1]);
        p.connect(NodeId(0), NodeId(1), 0.4);
        print_report(&compute_metrics(&p));
    }
}
