//! # Plasmo Runtime
//!
//! The tick-based dynamics of an adaptive transport network.
//!
//! Each call to [`adaptation::step`] advances a [`Plasmodium`] by one
//! fixed tick:
//! 1. Flow is solved on every tube from the endpoint drive difference
//! 2. Thickness relaxes toward its Murray's-law target
//! 3. Thin, mature tubes are pruned
//! 4. Well-supplied nodes grow new tubes toward their nearest neighbours
//! 5. Resource signals decay toward the neutral baseline
//! 6. Time and tube ages advance
//!
//! [`Simulation`](simulation::Simulation) wraps the pure functions with an
//! RNG, an active scenario and an event history.
//!
//! [`Plasmodium`]: plasmo_core::types::Plasmodium

pub mod adaptation;
pub mod config;
pub mod flow;
pub mod metrics;
pub mod migration;
pub mod prelude;
pub mod scenario;
pub mod session;
pub mod simulation;
pub mod topology;
