//! Simulation — the driver that threads one snapshot through the tick loop.
//!
//! A `Simulation` owns the live snapshot, the configuration, its RNG and
//! the active scenario. Each tick:
//! 1. Under the migration scenario, the travelling peak advances
//! 2. The adaptation step runs once
//! 3. Events are appended to the history
//!
//! Optionally the last few snapshots are retained so a caller can step
//! backwards with [`Simulation::rewind`].

use crate::adaptation::{step_with_events, NetworkEvent};
use crate::config::SimulationConfig;
use crate::metrics::{compute_metrics_with, NetworkMetrics};
use crate::migration::advance_migration_with;
use crate::scenario::{apply_scenario_with, Scenario};
use crate::topology::initialize_with;
use plasmo_core::error::Result;
use plasmo_core::types::Plasmodium;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use tracing::info;

/// Tick counter.
pub type Tick = u64;

/// A rewind point: the tick counter, scenario and snapshot in force
/// before a change.
#[derive(Debug, Clone)]
struct Retained {
    tick: Tick,
    scenario: Option<Scenario>,
    state: Plasmodium,
}

/// A running network simulation.
pub struct Simulation {
    state: Plasmodium,
    config: SimulationConfig,
    rng: StdRng,
    scenario: Option<Scenario>,
    tick: Tick,
    event_history: Vec<(Tick, NetworkEvent)>,
    history: VecDeque<Retained>,
    history_limit: usize,
}

impl Simulation {
    /// Build a fresh network and wrap it.
    pub fn new(config: SimulationConfig, node_count: usize, connectivity: f64) -> Result<Self> {
        let mut rng = config.seeded_rng();
        let state = initialize_with(&config, node_count, connectivity, &mut rng)?;
        info!(
            nodes = state.node_count(),
            tubes = state.tube_count(),
            seed = ?config.seed,
            "simulation created"
        );
        Ok(Self::assemble(state, config, rng, None))
    }

    /// Wrap an existing snapshot, e.g. one restored from a session.
    pub fn from_state(
        state: Plasmodium,
        config: SimulationConfig,
        scenario: Option<Scenario>,
    ) -> Result<Self> {
        config.validate()?;
        let rng = config.seeded_rng();
        info!(
            nodes = state.node_count(),
            tubes = state.tube_count(),
            time = state.time,
            "simulation resumed"
        );
        Ok(Self::assemble(state, config, rng, scenario))
    }

    fn assemble(
        state: Plasmodium,
        config: SimulationConfig,
        rng: StdRng,
        scenario: Option<Scenario>,
    ) -> Self {
        Self {
            state,
            config,
            rng,
            scenario,
            tick: 0,
            event_history: Vec::new(),
            history: VecDeque::new(),
            history_limit: 0,
        }
    }

    /// Retain up to `limit` previous snapshots for [`Simulation::rewind`].
    pub fn with_history(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self.history.truncate(limit);
        self
    }

    /// Switch scenario. Applies its gradient and topology policy now; the
    /// migration scenario also keeps its peak moving on every later tick.
    pub fn apply_scenario(&mut self, scenario: Scenario) {
        let next = apply_scenario_with(&self.state, scenario, &self.config, &mut self.rng);
        self.replace(next);
        self.scenario = Some(scenario);
        info!(%scenario, tick = self.tick, "scenario changed");
    }

    /// Run one tick.
    pub fn tick(&mut self) -> Vec<NetworkEvent> {
        let base = match self.scenario {
            Some(scenario) if scenario.needs_migration() => {
                advance_migration_with(&self.state, &self.config)
            }
            _ => self.state.clone(),
        };
        let (next, events) = step_with_events(&base, &self.config);
        self.replace(next);
        self.tick += 1;

        for event in &events {
            self.event_history.push((self.tick, event.clone()));
        }
        events
    }

    /// Run the simulation for N ticks.
    pub fn run(&mut self, ticks: u64) -> Vec<Vec<NetworkEvent>> {
        let mut all_events = Vec::new();
        for _ in 0..ticks {
            all_events.push(self.tick());
        }
        all_events
    }

    /// Undo the most recent tick or scenario change. Restores the snapshot,
    /// tick counter and scenario, and drops events recorded after the
    /// restored tick. Returns `false` when nothing is retained.
    pub fn rewind(&mut self) -> bool {
        match self.history.pop_back() {
            Some(previous) => {
                self.state = previous.state;
                self.tick = previous.tick;
                self.scenario = previous.scenario;
                let tick = self.tick;
                self.event_history.retain(|(t, _)| *t <= tick);
                true
            }
            None => false,
        }
    }

    /// Swap in `next`. Call before touching `tick` or `scenario` so the
    /// retained entry describes the outgoing state.
    fn replace(&mut self, next: Plasmodium) {
        let previous = std::mem::replace(&mut self.state, next);
        if self.history_limit > 0 {
            if self.history.len() == self.history_limit {
                self.history.pop_front();
            }
            self.history.push_back(Retained {
                tick: self.tick,
                scenario: self.scenario,
                state: previous,
            });
        }
    }

    /// The live snapshot.
    pub fn state(&self) -> &Plasmodium {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn scenario(&self) -> Option<Scenario> {
        self.scenario
    }

    /// Ticks run since this simulation was created.
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Metrics for the live snapshot.
    pub fn metrics(&self) -> NetworkMetrics {
        compute_metrics_with(&self.state, &self.config)
    }

    /// Every event recorded so far, tagged with the tick it completed on.
    pub fn event_history(&self) -> &[(Tick, NetworkEvent)] {
        &self.event_history
    }

    /// Number of snapshots available to [`Simulation::rewind`].
    pub fn retained(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SimulationConfig {
        SimulationConfig::default().with_seed(17)
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(Simulation::new(seeded(), 0, 0.5).is_err());
        assert!(Simulation::new(seeded(), 5, 2.0).is_err());
        let bad = SimulationConfig {
            tick_duration: -1.0,
            ..seeded()
        };
        assert!(Simulation::from_state(Plasmodium::new(), bad, None).is_err());
    }

    #[test]
    fn run_advances_time_and_records_events() {
        let mut sim = Simulation::new(seeded(), 10, 0.3).unwrap();
        let events = sim.run(30);
        assert_eq!(events.len(), 30);
        assert_eq!(sim.current_tick(), 30);
        assert!((sim.state().time - 30.0 * sim.config().tick_duration).abs() < 1e-9);
        let completes = sim
            .event_history()
            .iter()
            .filter(|(_, e)| matches!(e, NetworkEvent::TickComplete { .. }))
            .count();
        assert_eq!(completes, 30);
    }

    #[test]
    fn same_seed_same_trajectory() {
        let run = || {
            let mut sim = Simulation::new(seeded(), 12, 0.4).unwrap();
            sim.apply_scenario(Scenario::Failure);
            sim.run(50);
            sim.state().clone()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn migration_scenario_moves_the_peak_each_tick() {
        let mut sim = Simulation::new(seeded(), 8, 0.5).unwrap();
        sim.apply_scenario(Scenario::Migration);
        assert_eq!(sim.state().migration_phase, 0.0);
        sim.run(10);
        let expected = 10.0 * sim.config().migration_speed * sim.config().tick_duration;
        assert!((sim.state().migration_phase - expected).abs() < 1e-9);
    }

    #[test]
    fn other_scenarios_leave_the_phase_alone() {
        let mut sim = Simulation::new(seeded(), 8, 0.5).unwrap();
        sim.apply_scenario(Scenario::Hotspot);
        sim.run(10);
        assert_eq!(sim.state().migration_phase, 0.0);
    }

    #[test]
    fn rewind_restores_retained_snapshots() {
        let mut sim = Simulation::new(seeded(), 6, 0.5).unwrap().with_history(3);
        let start = sim.state().clone();
        assert!(!sim.rewind());

        sim.run(5);
        assert_eq!(sim.retained(), 3);
        assert!(sim.rewind());
        assert!(sim.rewind());
        assert!(sim.rewind());
        assert!(!sim.rewind());
        assert_eq!(sim.current_tick(), 2);
        assert!(sim.state().time > start.time);
    }

    #[test]
    fn rewind_across_a_scenario_change() {
        let mut sim = Simulation::new(seeded(), 8, 0.5).unwrap().with_history(10);
        sim.run(3);
        let after_three = sim.state().clone();

        sim.apply_scenario(Scenario::Migration);
        sim.run(2);
        assert_eq!(sim.current_tick(), 5);

        assert!(sim.rewind());
        assert!(sim.rewind());
        assert!(sim.rewind());
        assert_eq!(sim.state(), &after_three);
        assert_eq!(sim.current_tick(), 3);
        assert_eq!(sim.scenario(), None);
        assert!(sim.event_history().iter().all(|(t, _)| *t <= 3));
        let completes = sim
            .event_history()
            .iter()
            .filter(|(_, e)| matches!(e, NetworkEvent::TickComplete { .. }))
            .count();
        assert_eq!(completes, 3);

        // Back without a scenario, the peak must stay put.
        let phase = sim.state().migration_phase;
        sim.tick();
        assert_eq!(sim.state().migration_phase, phase);
        assert_eq!(sim.current_tick(), 4);
    }

    #[test]
    fn metrics_track_the_live_state() {
        let mut sim = Simulation::new(seeded(), 10, 0.5).unwrap();
        sim.apply_scenario(Scenario::Hotspot);
        sim.run(5);
        let metrics = sim.metrics();
        assert_eq!(metrics.node_count, 10);
        assert_eq!(metrics.tube_count, sim.state().tube_count());
        assert!(metrics.total_flow > 0.0);
    }
}
