//! # Plasmo
//!
//! Adaptive transport networks modelled on the plasmodium of a slime mold.
//!
//! A network is a fixed set of nodes, each carrying a resource gradient,
//! joined by tubes. Every tick, flow runs down the gradient difference
//! between a tube's endpoints; tubes that carry flow thicken, idle tubes
//! thin out and are pruned, and well-supplied nodes grow new tubes toward
//! their nearest neighbours. Over time the network settles into a
//! structure shaped by where resources are.
//!
//! ## Quick Start
//!
//! ```rust
//! use plasmo::prelude::*;
//!
//! // Seven nodes, half of all possible tubes
//! let config = SimulationConfig::default().with_seed(42);
//! let mut sim = Simulation::new(config, 7, 0.5).unwrap();
//!
//! // Concentrate resources on one node
//! sim.apply_scenario(Scenario::Hotspot);
//!
//! // Run 100 ticks (1/60 s each)
//! sim.run(100);
//!
//! let metrics = sim.metrics();
//! assert_eq!(metrics.active_node_count, 7);
//! println!("{} tubes, total flow {:.3}", metrics.tube_count, metrics.total_flow);
//! ```
//!
//! The same dynamics are available as pure functions over snapshots:
//!
//! ```rust
//! use plasmo::prelude::*;
//!
//! let p = initialize(10, 0.9).unwrap();
//! let p = apply_scenario(&p, Scenario::Balanced);
//! let next = step(&p);
//!
//! // The input snapshot is untouched
//! assert_eq!(p.time, 0.0);
//! assert!(next.time > 0.0);
//! ```
//!
//! ## Architecture
//!
//! - [`plasmo_core`] - Snapshot types, geometry and errors
//! - [`plasmo_runtime`] - Flow solver, adaptation step, scenarios,
//!   migration, metrics, the `Simulation` driver and sessions
//!
//! ## Key Concepts
//!
//! | Rule | Biological Analog | What It Does |
//! |------|-------------------|--------------|
//! | Flow | Hagen–Poiseuille | Flow ∝ drive difference × thickness⁴ |
//! | Adapt | Murray's law | Thickness relaxes toward the cube root of flow |
//! | Prune | Tube retraction | Thin, mature tubes are removed |
//! | Grow | Pseudopod extension | Supplied nodes reach their nearest neighbour |
//! | Decay | Signal fading | Gradients relax toward a neutral baseline |
//!
//! ## Session Persistence
//!
//! ```rust,ignore
//! use plasmo::prelude::*;
//! use std::path::Path;
//!
//! let sim = Simulation::new(SimulationConfig::default(), 10, 0.4)?;
//! save_session(sim.state(), sim.scenario(), Path::new("session.json"))?;
//!
//! let state = load_session(Path::new("session.json"))?;
//! let restored = restore_plasmodium(&state);
//! ```

// Re-export all subcrates
pub use plasmo_core as core;
pub use plasmo_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use plasmo::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use plasmo_core::types::{
        combine_gradient, Node, NodeId, Plasmodium, ResourceGradient, Tube, TubeId,
    };
    pub use plasmo_core::geometry::{distance, lerp, Point3};

    // Error types
    pub use plasmo_core::error::{ConfigError, PlasmoError, Result};

    // Runtime
    pub use plasmo_runtime::config::SimulationConfig;
    pub use plasmo_runtime::simulation::{Simulation, Tick};
    pub use plasmo_runtime::topology::{initialize, initialize_with};
    pub use plasmo_runtime::scenario::{apply_scenario, apply_scenario_with, Scenario};
    pub use plasmo_runtime::adaptation::{step, step_with, step_with_events, NetworkEvent};
    pub use plasmo_runtime::migration::{advance_migration, advance_migration_with};
    pub use plasmo_runtime::metrics::{compute_metrics, compute_metrics_with, print_report, NetworkMetrics};
    pub use plasmo_runtime::session::{
        save_session, load_session, restore_plasmodium,
        SessionState, SessionMetadata,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
