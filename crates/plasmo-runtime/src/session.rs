//! Session persistence — save/load a network snapshot.
//!
//! Serializes nodes, tubes and run metadata to pretty-printed JSON so a
//! simulation can be stopped and resumed later, possibly from a different
//! process.

use crate::scenario::Scenario;
use plasmo_core::error::{PlasmoError, Result};
use plasmo_core::geometry::Point3;
use plasmo_core::types::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Serializable snapshot of a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub nodes: Vec<SerializedNode>,
    pub tubes: Vec<SerializedTube>,
    pub metadata: SessionMetadata,
}

/// Serializable node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedNode {
    pub id: u32,
    pub label: String,
    pub position: Point3,
    pub gradient: ResourceGradient,
    pub is_active: bool,
    #[serde(default)]
    pub pulse_phase: f64,
}

/// Serializable tube.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedTube {
    pub id: u64,
    pub source: u32,
    pub sink: u32,
    pub thickness: f64,
    pub flow: f64,
    #[serde(default)]
    pub age: f64,
}

/// Session metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub session_id: String,
    pub time: f64,
    pub node_count: usize,
    pub tube_count: usize,
    #[serde(default)]
    pub scenario: Option<Scenario>,
    #[serde(default)]
    pub migration_phase: f64,
    #[serde(default)]
    pub cytoplasm: f64,
}

/// Build the serializable form of a snapshot.
pub fn capture(plasmodium: &Plasmodium, scenario: Option<Scenario>) -> SessionState {
    let nodes: Vec<SerializedNode> = plasmodium
        .nodes
        .values()
        .map(|n| SerializedNode {
            id: n.id.0,
            label: n.label.clone(),
            position: n.position,
            gradient: n.gradient,
            is_active: n.is_active,
            pulse_phase: n.pulse_phase,
        })
        .collect();

    let tubes: Vec<SerializedTube> = plasmodium
        .tubes
        .values()
        .map(|t| SerializedTube {
            id: t.id.0,
            source: t.source.0,
            sink: t.sink.0,
            thickness: t.thickness,
            flow: t.flow,
            age: t.age,
        })
        .collect();

    SessionState {
        metadata: SessionMetadata {
            session_id: uuid::Uuid::new_v4().to_string(),
            time: plasmodium.time,
            node_count: nodes.len(),
            tube_count: tubes.len(),
            scenario,
            migration_phase: plasmodium.migration_phase,
            cytoplasm: plasmodium.cytoplasm,
        },
        nodes,
        tubes,
    }
}

/// Save a snapshot to a JSON file, creating parent directories as needed.
pub fn save_session(
    plasmodium: &Plasmodium,
    scenario: Option<Scenario>,
    path: &Path,
) -> Result<SessionMetadata> {
    let state = capture(plasmodium, scenario);
    let json = serde_json::to_string_pretty(&state)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;

    info!(
        session = %state.metadata.session_id,
        path = %path.display(),
        tubes = state.metadata.tube_count,
        "session saved"
    );
    Ok(state.metadata)
}

/// Load a saved session from JSON.
pub fn load_session(path: &Path) -> Result<SessionState> {
    let json = std::fs::read_to_string(path)?;
    let state: SessionState = serde_json::from_str(&json)?;
    if state.nodes.len() != state.metadata.node_count {
        return Err(PlasmoError::Session(format!(
            "{} lists {} nodes but holds {}",
            path.display(),
            state.metadata.node_count,
            state.nodes.len()
        )));
    }
    Ok(state)
}

/// Rebuild a snapshot from saved state.
///
/// Tubes whose endpoints are missing are dropped; the next tick repairs
/// any other out-of-bound value.
pub fn restore_plasmodium(state: &SessionState) -> Plasmodium {
    let mut plasmodium = Plasmodium::new();
    for node in &state.nodes {
        let mut restored = Node::new(NodeId(node.id), node.position, node.label.clone())
            .with_gradient(node.gradient);
        restored.is_active = node.is_active;
        restored.pulse_phase = node.pulse_phase;
        plasmodium.add_node(restored);
    }

    for tube in &state.tubes {
        let (source, sink) = (NodeId(tube.source), NodeId(tube.sink));
        if plasmodium.node(source).is_none() || plasmodium.node(sink).is_none() {
            warn!(tube = tube.id, %source, %sink, "dropping tube with missing endpoint");
            continue;
        }
        plasmodium.restore_tube(Tube {
            id: TubeId(tube.id),
            source,
            sink,
            thickness: tube.thickness,
            flow: tube.flow,
            age: tube.age,
        });
    }

    plasmodium.time = state.metadata.time;
    plasmodium.migration_phase = state.metadata.migration_phase;
    plasmodium.cytoplasm = plasmodium.total_volume();
    plasmodium
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptation::step;
    use crate::config::SimulationConfig;
    use crate::topology::initialize_with;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network() -> Plasmodium {
        let config = SimulationConfig::default();
        let p = initialize_with(&config, 8, 0.5, &mut StdRng::seed_from_u64(6)).unwrap();
        (0..20).fold(p, |p, _| step(&p))
    }

    #[test]
    fn capture_restore_preserves_state() {
        let p = network();
        let restored = restore_plasmodium(&capture(&p, None));
        assert_eq!(restored.nodes, p.nodes);
        assert_eq!(restored.tubes, p.tubes);
        assert_eq!(restored.time, p.time);
    }

    #[test]
    fn restored_ids_never_collide() {
        let p = network();
        let mut restored = restore_plasmodium(&capture(&p, None));
        let max_id = restored.tubes.keys().max().copied();
        let new_id = restored.connect(NodeId(0), NodeId(7), 0.1);
        if let (Some(max_id), Some(new_id)) = (max_id, new_id) {
            assert!(new_id > max_id);
        }
    }

    #[test]
    fn dangling_tubes_are_dropped() {
        let p = network();
        let mut state = capture(&p, None);
        state.tubes.push(SerializedTube {
            id: 999,
            source: 0,
            sink: 77,
            thickness: 0.2,
            flow: 0.0,
            age: 0.0,
        });
        let restored = restore_plasmodium(&state);
        assert_eq!(restored.tube_count(), p.tube_count());
        assert!(restored.tube(TubeId(999)).is_none());
    }

    #[test]
    fn save_and_load_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let p = network();

        let metadata = save_session(&p, Some(Scenario::Hotspot), &path).unwrap();
        assert_eq!(metadata.node_count, 8);

        let state = load_session(&path).unwrap();
        assert_eq!(state.metadata.session_id, metadata.session_id);
        assert_eq!(state.metadata.scenario, Some(Scenario::Hotspot));

        let restored = restore_plasmodium(&state);
        assert_eq!(restored.tube_count(), p.tube_count());
        for (id, tube) in &p.tubes {
            let back = restored.tube(*id).unwrap();
            assert_eq!((back.source, back.sink), (tube.source, tube.sink));
            assert!((back.thickness - tube.thickness).abs() < 1e-12);
        }
    }

    #[test]
    fn malformed_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_session(&path), Err(PlasmoError::Serialization(_))));
        assert!(matches!(
            load_session(&dir.path().join("missing.json")),
            Err(PlasmoError::Io(_))
        ));
    }
}
