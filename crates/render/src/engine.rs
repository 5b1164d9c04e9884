use std::sync::{Arc, PoisonError, RwLock};

use crate::scene::Scene;

/// Registry of scenes owned by the running render engine.
///
/// Systems are configured before the renderer has built anything, so the
/// scene list starts empty and fills in later from the render thread.
#[derive(Debug, Clone, Default)]
pub struct RenderEngine {
    scenes: Arc<RwLock<Vec<Arc<Scene>>>>,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scene(&self, scene: Arc<Scene>) {
        tracing::debug!(scene = scene.name(), "scene registered");
        let mut scenes = self.scenes.write().unwrap_or_else(PoisonError::into_inner);
        scenes.push(scene);
    }

    /// The first scene registered, if any.
    pub fn first_scene(&self) -> Option<Arc<Scene>> {
        let scenes = self.scenes.read().unwrap_or_else(PoisonError::into_inner);
        scenes.first().cloned()
    }

    pub fn scene_count(&self) -> usize {
        let scenes = self.scenes.read().unwrap_or_else(PoisonError::into_inner);
        scenes.len()
    }
}
