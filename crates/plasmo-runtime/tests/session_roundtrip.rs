//! Save a running simulation, load it back and keep going.

use plasmo_runtime::prelude::*;

#[test]
fn resumed_session_continues_where_it_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".plasmo").join("current.json");

    let config = SimulationConfig::default().with_seed(12);
    let mut sim = Simulation::new(config.clone(), 10, 0.4).unwrap();
    sim.apply_scenario(Scenario::Hotspot);
    sim.run(120);
    let before = sim.metrics();

    let metadata = save_session(sim.state(), sim.scenario(), &path).unwrap();
    assert_eq!(metadata.tube_count, before.tube_count);
    assert!(!metadata.session_id.is_empty());

    let state = load_session(&path).unwrap();
    let restored = restore_plasmodium(&state);
    assert_eq!(restored.node_count(), 10);
    assert_eq!(restored.tube_count(), before.tube_count);
    assert!((restored.time - before.time).abs() < 1e-9);

    let mut resumed = Simulation::from_state(restored, config, state.metadata.scenario).unwrap();
    assert_eq!(resumed.scenario(), Some(Scenario::Hotspot));
    resumed.run(60);

    let after = resumed.metrics();
    println!("Time {:.2}s -> {:.2}s, tubes {} -> {}", before.time, after.time, before.tube_count, after.tube_count);
    assert!(after.time > before.time);
    assert_eq!(after.node_count, 10);
}

#[test]
fn every_session_gets_its_own_id() {
    let dir = tempfile::tempdir().unwrap();
    let p = initialize(4, 0.5).unwrap();
    let a = save_session(&p, None, &dir.path().join("a.json")).unwrap();
    let b = save_session(&p, None, &dir.path().join("b.json")).unwrap();
    assert_ne!(a.session_id, b.session_id);
}

#[test]
fn inconsistent_metadata_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let p = initialize(4, 0.5).unwrap();
    save_session(&p, None, &path).unwrap();

    let mut state = load_session(&path).unwrap();
    state.nodes.pop();
    std::fs::write(&path, serde_json::to_string(&state).unwrap()).unwrap();

    let err = load_session(&path).unwrap_err();
    assert!(matches!(err, PlasmoError::Session(_)));
}
