//! Simulation parameters.
//!
//! Every constant the dynamics depend on lives in [`SimulationConfig`].
//! The defaults produce a visually plausible network at 60 ticks per
//! simulated second for a few dozen nodes.

use plasmo_core::error::{PlasmoError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for network dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulated seconds per tick (default: 1/60).
    pub tick_duration: f64,
    /// Proportionality constant between drive difference and flow (default: 8.0).
    pub flow_scale: f64,
    /// Lower bound on tube resistance (default: 1.0).
    pub min_resistance: f64,
    /// Multiplier on the Murray's-law target `|flow|^(1/3)` (default: 1.0).
    pub murray_scale: f64,
    /// Rate (per simulated second) at which thickness relaxes toward its target (default: 1.5).
    pub adaptation_rate: f64,
    /// Upper bound on tube thickness (default: 1.0).
    pub max_thickness: f64,
    /// Thickness below which mature tubes are removed (default: 0.02).
    pub prune_threshold: f64,
    /// Seconds a new tube is protected from pruning (default: 1.0).
    pub grace_period: f64,
    /// Combined gradient at or above which a node grows tubes (default: 0.45).
    pub growth_threshold: f64,
    /// Degree below which a node keeps growing (default: 3).
    pub target_degree: usize,
    /// Thickness of a freshly grown tube (default: 0.15).
    pub growth_thickness: f64,
    /// Thickness of tubes placed at initialization (default: 0.3).
    pub seed_thickness: f64,
    /// Time constant (seconds) of gradient decay toward the baseline (default: 30.0).
    pub decay_time_constant: f64,
    /// Neutral value gradients decay toward (default: 0.5).
    pub gradient_baseline: f64,
    /// Radius of the sphere nodes are laid out on (default: 10.0).
    pub layout_radius: f64,
    /// Random per-axis offset, as a fraction of the radius (default: 0.15).
    pub layout_jitter: f64,
    /// Gradient given to the hotspot node (default: 0.95).
    pub hotspot_high: f64,
    /// Gradient given to every other node under the hotspot scenario (default: 0.05).
    pub hotspot_low: f64,
    /// Fraction of tubes kept by the growth scenario (default: 0.25).
    pub growth_retain_fraction: f64,
    /// Angular speed of the migration peak, radians per second (default: 0.5).
    pub migration_speed: f64,
    /// Width of the migration peak as a fraction of the network radius (default: 0.5).
    pub migration_spread: f64,
    /// Renderer pulse frequency in Hz (default: 1.0).
    pub pulse_frequency: f64,
    /// RNG seed. `None` draws one from entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_duration: 1.0 / 60.0,
            flow_scale: 8.0,
            min_resistance: 1.0,
            murray_scale: 1.0,
            adaptation_rate: 1.5,
            max_thickness: 1.0,
            prune_threshold: 0.02,
            grace_period: 1.0,
            growth_threshold: 0.45,
            target_degree: 3,
            growth_thickness: 0.15,
            seed_thickness: 0.3,
            decay_time_constant: 30.0,
            gradient_baseline: 0.5,
            layout_radius: 10.0,
            layout_jitter: 0.15,
            hotspot_high: 0.95,
            hotspot_low: 0.05,
            growth_retain_fraction: 0.25,
            migration_speed: 0.5,
            migration_spread: 0.5,
            pulse_frequency: 1.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Same configuration with a fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the RNG this configuration asks for.
    pub fn seeded_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        }
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        positive("tick_duration", self.tick_duration)?;
        positive("flow_scale", self.flow_scale)?;
        positive("min_resistance", self.min_resistance)?;
        positive("murray_scale", self.murray_scale)?;
        positive("adaptation_rate", self.adaptation_rate)?;
        positive("max_thickness", self.max_thickness)?;
        positive("decay_time_constant", self.decay_time_constant)?;
        positive("layout_radius", self.layout_radius)?;
        positive("migration_spread", self.migration_spread)?;
        non_negative("prune_threshold", self.prune_threshold)?;
        non_negative("grace_period", self.grace_period)?;
        non_negative("migration_speed", self.migration_speed)?;
        non_negative("pulse_frequency", self.pulse_frequency)?;
        non_negative("layout_jitter", self.layout_jitter)?;
        unit("growth_threshold", self.growth_threshold)?;
        unit("gradient_baseline", self.gradient_baseline)?;
        unit("hotspot_high", self.hotspot_high)?;
        unit("hotspot_low", self.hotspot_low)?;
        unit("growth_retain_fraction", self.growth_retain_fraction)?;
        within("growth_thickness", self.growth_thickness, 0.0, self.max_thickness)?;
        within("seed_thickness", self.seed_thickness, 0.0, self.max_thickness)?;
        if self.growth_thickness <= 0.0 {
            return Err(PlasmoError::invalid_config(
                "growth_thickness",
                self.growth_thickness.to_string(),
                "grown tubes must start with positive thickness",
            ));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlasmoError::invalid_config(field, value.to_string(), "must be positive"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PlasmoError::invalid_config(field, value.to_string(), "must not be negative"))
    }
}

fn unit(field: &str, value: f64) -> Result<()> {
    within(field, value, 0.0, 1.0)
}

fn within(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(PlasmoError::out_of_range(field, min, max, value))
    }
}
