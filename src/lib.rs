//! Gravity Shooter: a single-screen arcade shooter.
//!
//! Core modules:
//! - `geometry`: rectangles, bounds checks, aiming vectors
//! - `config`: every tunable constant, injected into the simulation
//! - `entities`: game entity types and their per-frame motion rules
//! - `collision`: cross-collection collision and scoring
//! - `compute`: pure step functions driven by the frame loop

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod geometry;

pub use config::GameConfig;
pub use error::GeometryError;
