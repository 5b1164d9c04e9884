//! Rendering adapter: the scene graph the visual systems write into.
//!
//! # Invariants
//! - Nodes and materials are shared handles (`Arc`); the scene owns their lifetime.
//! - A node tagged with an entity renders that entity; the tag never changes.
//! - Attaching a material to a node stores a private copy unless the node
//!   was built with shared materials.
//! - All handles are `Send + Sync`; the scene is mutated from the render thread.

mod engine;
mod material;
mod node;
mod renderer;
mod scene;

pub use engine::RenderEngine;
pub use material::{
    Material, MaterialHandle, MaterialId, ShaderParam, ShaderParams, ShaderStage, TextureKind,
};
pub use node::{Node, NodeHandle, NodeId, SceneNode};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::Scene;
