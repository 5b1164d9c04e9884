//! Wave visual: binds a Gerstner ocean shader onto the scene node of a
//! simulated entity and keeps its time uniform in step with simulation time.
//!
//! The simulation thread writes the latest sim time into a [`ClockBridge`];
//! the render thread runs a [`FrameUpdater`] once per frame, which resolves
//! the entity's node, binds the material, writes the static wave parameters
//! once, and then pushes the time every frame.
//!
//! # Invariants
//! - The only state shared between the two threads is the clock value.
//! - Frame phases only move forward; `Steady` is terminal.
//! - Exactly one material is created per resolved node.
//! - Static uniforms are written once per component lifetime.

mod binder;
mod clock;
mod config;
mod initializer;
mod lookup;
mod resolver;
mod system;
mod updater;

pub use binder::{MaterialBinder, ShaderPrograms};
pub use clock::ClockBridge;
pub use config::{ConfigError, ShaderUris, WaveVisualConfig};
pub use initializer::{MAX_SHADER_WAVES, ParameterInitializer, ShaderWaves, TexturePaths, uniform};
pub use lookup::{FileLookup, RESOURCE_PATH_ENV, as_full_path};
pub use resolver::EntityResolver;
pub use system::WaveVisual;
pub use updater::{FramePhase, FrameUpdater};
