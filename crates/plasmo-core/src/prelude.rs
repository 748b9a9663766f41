//! Plasmo Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use plasmo_core::prelude::*;
//! ```

pub use crate::types::{
    combine_gradient,
    Node, NodeId,
    Plasmodium,
    ResourceGradient,
    Tube, TubeId,
};

pub use crate::geometry::{distance, lerp, Point3};

pub use crate::error::{ConfigError, PlasmoError, Result};
