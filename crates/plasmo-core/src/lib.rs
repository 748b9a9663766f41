//! # Plasmo Core
//!
//! Core types for adaptive transport networks modelled on the plasmodium
//! of a slime mold.
//!
//! A network is a [`Plasmodium`](types::Plasmodium): a fixed set of
//! resource-bearing nodes joined by tubes whose thickness adapts to the
//! flow they carry. This crate only defines the data model, geometry
//! helpers and error types; the dynamics live in `plasmo-runtime`.
//!
//! ## Quick Start
//!
//! ```rust
//! use plasmo_core::prelude::*;
//!
//! let a = Point3::new(0.0, 0.0, 0.0);
//! let b = Point3::new(3.0, 4.0, 0.0);
//! assert_eq!(distance(&a, &b), 5.0);
//!
//! let gradient = ResourceGradient::uniform(0.5, 0.0);
//! assert!((combine_gradient(&gradient) - 0.5).abs() < 1e-12);
//! ```

pub mod error;
pub mod geometry;
pub mod prelude;
pub mod types;
