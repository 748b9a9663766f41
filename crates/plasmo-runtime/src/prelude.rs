//! Plasmo Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use plasmo_runtime::prelude::*;
//! ```

// Re-export simulation driver
pub use crate::simulation::{Simulation, Tick};

// Re-export configuration
pub use crate::config::SimulationConfig;

// Re-export the pure operations
pub use crate::adaptation::{step, step_with, step_with_events, NetworkEvent};
pub use crate::flow::{max_tube_flow, murray_target, resistance, solve, tube_flow};
pub use crate::migration::{advance_migration, advance_migration_with};
pub use crate::scenario::{apply_scenario, apply_scenario_with, Scenario};
pub use crate::topology::{initialize, initialize_with};

// Re-export metrics
pub use crate::metrics::{compute_metrics, compute_metrics_with, print_report, NetworkMetrics};

// Re-export session
pub use crate::session::{
    SessionState, SerializedNode, SerializedTube, SessionMetadata,
    save_session, load_session, restore_plasmodium,
};

// Re-export from core
pub use plasmo_core::prelude::*;
