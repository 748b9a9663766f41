//! Shared types used across all Plasmo crates.
//!
//! The unit of ownership is the [`Plasmodium`]: every runtime operation
//! takes one by reference and returns a new one, so a snapshot handed to a
//! renderer stays valid no matter how many ticks run afterwards.

use crate::geometry::Point3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for a node. Stable for the lifetime of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Unique identifier for a tube. Never reused, even after the tube is pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TubeId(pub u64);

impl fmt::Display for TubeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Normalized resource-availability signals carried by a node.
///
/// All three components live in `[0, 1]`. `freshness` is the simulated
/// time (seconds) at which the signals were last written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceGradient {
    pub compute: f64,
    pub storage: f64,
    pub bandwidth: f64,
    pub freshness: f64,
}

impl ResourceGradient {
    /// Create a gradient, clamping every component into `[0, 1]`.
    pub fn new(compute: f64, storage: f64, bandwidth: f64, freshness: f64) -> Self {
        Self {
            compute: clamp_unit(compute),
            storage: clamp_unit(storage),
            bandwidth: clamp_unit(bandwidth),
            freshness,
        }
    }

    /// A gradient with the same value on every component.
    pub fn uniform(value: f64, freshness: f64) -> Self {
        Self::new(value, value, value, freshness)
    }

    /// The neutral mid-range gradient nodes start with.
    pub fn neutral() -> Self {
        Self::uniform(0.5, 0.0)
    }

    /// Collapse the three components into a single drive value.
    pub fn combined(&self) -> f64 {
        combine_gradient(self)
    }

    pub fn components(&self) -> [f64; 3] {
        [self.compute, self.storage, self.bandwidth]
    }

    /// Whether every component is finite and inside `[0, 1]`.
    pub fn is_within_bounds(&self) -> bool {
        self.components()
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    /// Copy of this gradient with every component forced into `[0, 1]`.
    /// Non-finite components become 0.
    pub fn clamped(&self) -> Self {
        Self::new(self.compute, self.storage, self.bandwidth, self.freshness)
    }

    /// Apply `f` to every component, clamping the result.
    pub fn map_components(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.compute), f(self.storage), f(self.bandwidth), self.freshness)
    }
}

impl Default for ResourceGradient {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Combine a gradient's components into one scalar in `[0, 1]`.
///
/// This is the equally-weighted mean of the three components. Non-finite
/// components count as zero so a corrupted node can never drive flow.
pub fn combine_gradient(gradient: &ResourceGradient) -> f64 {
    let sum: f64 = gradient
        .components()
        .iter()
        .map(|c| if c.is_finite() { *c } else { 0.0 })
        .sum();
    clamp_unit(sum / 3.0)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// A fixed-position, resource-bearing participant in the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Point3,
    pub gradient: ResourceGradient,
    pub label: String,
    pub is_active: bool,
    /// Display hint for renderers. Not read by the simulation.
    pub pulse_phase: f64,
}

impl Node {
    /// An active node with a neutral gradient.
    pub fn new(id: NodeId, position: Point3, label: impl Into<String>) -> Self {
        Self {
            id,
            position,
            gradient: ResourceGradient::neutral(),
            label: label.into(),
            is_active: true,
            pulse_phase: 0.0,
        }
    }

    pub fn with_gradient(mut self, gradient: ResourceGradient) -> Self {
        self.gradient = gradient;
        self
    }
}

/// A tube joining two nodes.
///
/// `source` and `sink` are keys into [`Plasmodium::nodes`]. Positive flow
/// runs from source to sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tube {
    pub id: TubeId,
    pub source: NodeId,
    pub sink: NodeId,
    pub thickness: f64,
    pub flow: f64,
    /// Seconds since the tube was created.
    pub age: f64,
}

impl Tube {
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.sink == node
    }

    /// The endpoint opposite `node`, if `node` is an endpoint at all.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.source == node {
            Some(self.sink)
        } else if self.sink == node {
            Some(self.source)
        } else {
            None
        }
    }

    /// Whether this tube joins `a` and `b` in either direction.
    pub fn joins(&self, a: NodeId, b: NodeId) -> bool {
        (self.source == a && self.sink == b) || (self.source == b && self.sink == a)
    }
}

/// The whole network at one instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Plasmodium {
    pub nodes: BTreeMap<NodeId, Node>,
    pub tubes: BTreeMap<TubeId, Tube>,
    /// Total tube volume, recomputed every tick.
    pub cytoplasm: f64,
    /// Elapsed simulated seconds.
    pub time: f64,
    /// Phase of the travelling migration peak, in radians.
    pub migration_phase: f64,
    next_tube_id: u64,
}

impl Plasmodium {
    /// An empty network at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn tube(&self, id: TubeId) -> Option<&Tube> {
        self.tubes.get(&id)
    }

    pub fn tube_mut(&mut self, id: TubeId) -> Option<&mut Tube> {
        self.tubes.get_mut(&id)
    }

    /// Create a tube with zero flow and zero age. Returns `None` if either
    /// endpoint is missing or the endpoints are the same node.
    pub fn connect(&mut self, source: NodeId, sink: NodeId, thickness: f64) -> Option<TubeId> {
        if source == sink || !self.nodes.contains_key(&source) || !self.nodes.contains_key(&sink) {
            return None;
        }
        let id = TubeId(self.next_tube_id);
        self.next_tube_id += 1;
        self.tubes.insert(
            id,
            Tube {
                id,
                source,
                sink,
                thickness: thickness.max(0.0),
                flow: 0.0,
                age: 0.0,
            },
        );
        Some(id)
    }

    /// Insert a tube under its existing id (used when restoring saved
    /// state). Later allocations never collide with restored ids.
    pub fn restore_tube(&mut self, tube: Tube) {
        self.next_tube_id = self.next_tube_id.max(tube.id.0 + 1);
        self.tubes.insert(tube.id, tube);
    }

    pub fn remove_tube(&mut self, id: TubeId) -> Option<Tube> {
        self.tubes.remove(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    pub fn active_node_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_active).count()
    }

    /// Ids of every tube with `node` as an endpoint.
    pub fn incident_tubes(&self, node: NodeId) -> Vec<TubeId> {
        self.tubes
            .values()
            .filter(|t| t.touches(node))
            .map(|t| t.id)
            .collect()
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.tubes.values().filter(|t| t.touches(node)).count()
    }

    pub fn are_connected(&self, a: NodeId, b: NodeId) -> bool {
        self.tubes.values().any(|t| t.joins(a, b))
    }

    /// Straight-line length of a tube, if both endpoints exist.
    pub fn tube_length(&self, tube: &Tube) -> Option<f64> {
        let a = self.nodes.get(&tube.source)?;
        let b = self.nodes.get(&tube.sink)?;
        Some(a.position.distance_to(&b.position))
    }

    /// Total tube volume: `Σ π·thickness²·length` over tubes with both
    /// endpoints present.
    pub fn total_volume(&self) -> f64 {
        self.tubes
            .values()
            .filter_map(|t| {
                let length = self.tube_length(t)?;
                Some(std::f64::consts::PI * t.thickness * t.thickness * length)
            })
            .filter(|v| v.is_finite())
            .sum()
    }

    /// Whether both endpoints of the tube exist.
    pub fn is_anchored(&self, tube: &Tube) -> bool {
        self.nodes.contains_key(&tube.source) && self.nodes.contains_key(&tube.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_network() -> Plasmodium {
        let mut p = Plasmodium::new();
        p.add_node(Node::new(NodeId(0), Point3::new(0.0, 0.0, 0.0), "a"));
        p.add_node(Node::new(NodeId(1), Point3::new(2.0, 0.0, 0.0), "b"));
        p
    }

    #[test]
    fn gradient_constructor_clamps() {
        let g = ResourceGradient::new(1.5, -0.2, f64::NAN, 3.0);
        assert_eq!(g.compute, 1.0);
        assert_eq!(g.storage, 0.0);
        assert_eq!(g.bandwidth, 0.0);
        assert_eq!(g.freshness, 3.0);
        assert!(g.is_within_bounds());
    }

    #[test]
    fn combined_gradient_is_mean_of_components() {
        let g = ResourceGradient::new(0.9, 0.6, 0.3, 0.0);
        assert!((combine_gradient(&g) - 0.6).abs() < 1e-12);

        let corrupted = ResourceGradient {
            compute: f64::INFINITY,
            storage: 0.3,
            bandwidth: 0.3,
            freshness: 0.0,
        };
        assert!((corrupted.combined() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn connect_allocates_fresh_ids() {
        let mut p = two_node_network();
        let first = p.connect(NodeId(0), NodeId(1), 0.2).unwrap();
        p.remove_tube(first);
        let second = p.connect(NodeId(1), NodeId(0), 0.2).unwrap();
        assert_ne!(first, second);
        assert_eq!(p.tube_count(), 1);
        assert!(p.are_connected(NodeId(0), NodeId(1)));
    }

    #[test]
    fn connect_rejects_missing_or_self_endpoints() {
        let mut p = two_node_network();
        assert!(p.connect(NodeId(0), NodeId(0), 0.2).is_none());
        assert!(p.connect(NodeId(0), NodeId(9), 0.2).is_none());
        assert_eq!(p.tube_count(), 0);
    }

    #[test]
    fn restored_tubes_do_not_collide_with_new_ones() {
        let mut p = two_node_network();
        p.restore_tube(Tube {
            id: TubeId(41),
            source: NodeId(0),
            sink: NodeId(1),
            thickness: 0.3,
            flow: 0.0,
            age: 2.0,
        });
        let id = p.connect(NodeId(0), NodeId(1), 0.1).unwrap();
        assert_eq!(id, TubeId(42));
    }

    #[test]
    fn volume_uses_thickness_and_length() {
        let mut p = two_node_network();
        p.connect(NodeId(0), NodeId(1), 1.0);
        let expected = std::f64::consts::PI * 2.0;
        assert!((p.total_volume() - expected).abs() < 1e-9);
        assert_eq!(p.degree(NodeId(0)), 1);
        assert_eq!(p.incident_tubes(NodeId(1)).len(), 1);
    }
}
