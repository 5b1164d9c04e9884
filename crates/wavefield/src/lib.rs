//! Wavefield model: a sum of trochoidal (Gerstner) wave components.
//!
//! The model is configured once from a mean sea state and exposes per-component
//! parameters through [`WavefieldSource`]. Values never change after
//! construction.
//!
//! # Invariants
//! - Every per-component slice has exactly `number()` entries.
//! - Component order is canonical: shortest-scaled component first.
//! - Directions are unit vectors.

mod params;
mod wavefield;

pub use params::{WaveParameters, WavefieldConfig};
pub use wavefield::{GRAVITY, MAX_COMPONENTS, Wavefield, WavefieldError, WavefieldSource};
