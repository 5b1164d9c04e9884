//! Shared types used across the wave visual crates.

mod types;

pub use glam::{DVec2, Vec2};
pub use types::EntityId;
