//! Topology initializer — node layout and seed tubes.
//!
//! Nodes are placed on a golden-spiral sphere with a small random jitter,
//! so the layout is spread evenly but still differs between seeds. Seed
//! tubes are sampled uniformly from all node pairs until the requested
//! density is reached.

use crate::config::SimulationConfig;
use plasmo_core::error::{PlasmoError, Result};
use plasmo_core::geometry::Point3;
use plasmo_core::types::*;
use rand::Rng;
use tracing::debug;

/// Build a fresh network with the default configuration.
///
/// Uses `SimulationConfig::default()` and an entropy-seeded RNG.
pub fn initialize(node_count: usize, initial_connectivity: f64) -> Result<Plasmodium> {
    let config = SimulationConfig::default();
    initialize_with(&config, node_count, initial_connectivity, &mut config.seeded_rng())
}

/// Build a fresh network.
///
/// Rejects `node_count == 0` and any connectivity outside `[0, 1]`
/// (including NaN) before producing state. The result has exactly
/// `round(connectivity × n(n−1)/2)` tubes, each at `seed_thickness` with
/// zero flow and zero age, and `time == 0`.
pub fn initialize_with(
    config: &SimulationConfig,
    node_count: usize,
    initial_connectivity: f64,
    rng: &mut impl Rng,
) -> Result<Plasmodium> {
    if node_count == 0 {
        return Err(PlasmoError::invalid_config(
            "node_count",
            "0",
            "a network needs at least one node",
        ));
    }
    if !(0.0..=1.0).contains(&initial_connectivity) {
        return Err(PlasmoError::out_of_range(
            "initial_connectivity",
            0.0,
            1.0,
            initial_connectivity,
        ));
    }
    config.validate()?;

    let mut plasmodium = Plasmodium::new();
    for (i, position) in layout(node_count, config, rng).into_iter().enumerate() {
        let id = NodeId(i as u32);
        plasmodium.add_node(Node::new(id, position, format!("node-{}", i)));
    }

    for (a, b) in sample_pairs(node_count, initial_connectivity, rng) {
        plasmodium.connect(NodeId(a as u32), NodeId(b as u32), config.seed_thickness);
    }
    plasmodium.cytoplasm = plasmodium.total_volume();

    debug!(
        nodes = plasmodium.node_count(),
        tubes = plasmodium.tube_count(),
        "initialized network"
    );
    Ok(plasmodium)
}

/// Golden-spiral points on a sphere, each jittered per axis.
fn layout(node_count: usize, config: &SimulationConfig, rng: &mut impl Rng) -> Vec<Point3> {
    let golden_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    let jitter = config.layout_jitter * config.layout_radius;

    (0..node_count)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f64 + 0.5) / node_count as f64;
            let ring = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * i as f64;
            let base = Point3::new(theta.cos() * ring, y, theta.sin() * ring)
                .scale(config.layout_radius);
            if jitter > 0.0 {
                base.offset(
                    rng.random_range(-jitter..=jitter),
                    rng.random_range(-jitter..=jitter),
                    rng.random_range(-jitter..=jitter),
                )
            } else {
                base
            }
        })
        .collect()
}

/// Choose `round(connectivity × n(n−1)/2)` distinct unordered pairs.
fn sample_pairs(node_count: usize, connectivity: f64, rng: &mut impl Rng) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(usize, usize)> = Vec::with_capacity(node_count * node_count / 2);
    for a in 0..node_count {
        for b in (a + 1)..node_count {
            pairs.push((a, b));
        }
    }

    let wanted = ((connectivity * pairs.len() as f64).round() as usize).min(pairs.len());
    // Partial Fisher–Yates: the first `wanted` slots end up a uniform sample.
    for i in 0..wanted {
        let j = rng.random_range(i..pairs.len());
        pairs.swap(i, j);
    }
    pairs.truncate(wanted);
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn init(n: usize, c: f64, seed: u64) -> Result<Plasmodium> {
        let config = SimulationConfig::default();
        initialize_with(&config, n, c, &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn zero_nodes_is_a_config_error() {
        let err = init(0, 0.5, 1).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn connectivity_outside_unit_interval_is_rejected() {
        assert!(init(5, -0.1, 1).unwrap_err().is_config());
        assert!(init(5, 1.01, 1).unwrap_err().is_config());
        assert!(init(5, f64::NAN, 1).unwrap_err().is_config());
    }

    #[test]
    fn nodes_start_neutral_and_active() {
        let p = init(12, 0.3, 3).unwrap();
        assert_eq!(p.node_count(), 12);
        assert_eq!(p.active_node_count(), 12);
        assert_eq!(p.time, 0.0);
        for node in p.nodes.values() {
            assert_eq!(node.gradient, ResourceGradient::neutral());
            assert!(node.position.is_finite());
        }
    }

    #[test]
    fn tube_count_matches_requested_density() {
        assert_eq!(init(10, 0.9, 1).unwrap().tube_count(), 41);
        assert_eq!(init(5, 0.1, 1).unwrap().tube_count(), 1);
        assert_eq!(init(7, 0.0, 1).unwrap().tube_count(), 0);
        assert_eq!(init(7, 1.0, 1).unwrap().tube_count(), 21);
    }

    #[test]
    fn seed_tubes_are_fresh_and_distinct() {
        let p = init(8, 0.6, 11).unwrap();
        let config = SimulationConfig::default();
        let mut seen = std::collections::HashSet::new();
        for tube in p.tubes.values() {
            assert_eq!(tube.thickness, config.seed_thickness);
            assert_eq!(tube.flow, 0.0);
            assert_eq!(tube.age, 0.0);
            assert_ne!(tube.source, tube.sink);
            let key = (tube.source.min(tube.sink), tube.source.max(tube.sink));
            assert!(seen.insert(key), "duplicate tube {:?}", key);
        }
    }

    #[test]
    fn same_seed_same_network() {
        assert_eq!(init(9, 0.4, 99).unwrap(), init(9, 0.4, 99).unwrap());
    }

    #[test]
    fn single_node_network() {
        let p = init(1, 1.0, 5).unwrap();
        assert_eq!(p.node_count(), 1);
        assert_eq!(p.tube_count(), 0);
    }
}
