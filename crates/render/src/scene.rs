use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use wavevisual_common::EntityId;

use crate::material::{Material, MaterialHandle, MaterialId};
use crate::node::{Node, NodeHandle, NodeId};

/// A scene: one root node plus the materials created through it.
#[derive(Debug)]
pub struct Scene {
    name: String,
    root: NodeHandle,
    unique_materials: bool,
    next_node_id: AtomicU64,
    materials: Mutex<BTreeMap<MaterialId, MaterialHandle>>,
    materials_created: AtomicUsize,
}

impl Scene {
    /// Scene whose nodes copy materials on attach.
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), true)
    }

    /// Scene whose nodes store attached materials as given.
    pub fn with_shared_materials(name: impl Into<String>) -> Self {
        Self::build(name.into(), false)
    }

    fn build(name: String, unique_materials: bool) -> Self {
        let root = Arc::new(Node::new(NodeId(0), "root", None, unique_materials));
        Self {
            name,
            root,
            unique_materials,
            next_node_id: AtomicU64::new(1),
            materials: Mutex::new(BTreeMap::new()),
            materials_created: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> NodeHandle {
        Arc::clone(&self.root)
    }

    /// Create a detached node. Attach it with [`Node::add_child`].
    pub fn create_node(&self, name: impl Into<String>, entity: Option<EntityId>) -> NodeHandle {
        let id = NodeId(self.next_node_id.fetch_add(1, Ordering::Relaxed));
        Arc::new(Node::new(id, name, entity, self.unique_materials))
    }

    /// Create a node and attach it under `parent` in one go.
    pub fn add_node(
        &self,
        parent: &NodeHandle,
        name: impl Into<String>,
        entity: Option<EntityId>,
    ) -> NodeHandle {
        let node = self.create_node(name, entity);
        parent.add_child(Arc::clone(&node));
        node
    }

    pub fn create_material(&self) -> MaterialHandle {
        let count = self.materials_created.fetch_add(1, Ordering::Relaxed) + 1;
        let material = Arc::new(Material::new(format!("{}::material_{count}", self.name)));
        let mut materials = self.materials.lock().unwrap_or_else(PoisonError::into_inner);
        materials.insert(material.id(), Arc::clone(&material));
        tracing::trace!(id = material.id().0, "material created");
        material
    }

    /// Release a material created by this scene. Nodes holding the handle
    /// keep it alive, but it is no longer owned by the scene.
    pub fn destroy_material(&self, material: &MaterialHandle) {
        let mut materials = self.materials.lock().unwrap_or_else(PoisonError::into_inner);
        if materials.remove(&material.id()).is_some() {
            material.mark_destroyed();
            tracing::trace!(id = material.id().0, "material destroyed");
        }
    }

    /// Materials created by this scene and not yet destroyed.
    pub fn live_material_count(&self) -> usize {
        let materials = self.materials.lock().unwrap_or_else(PoisonError::into_inner);
        materials.len()
    }

    /// Total materials ever created by this scene.
    pub fn materials_created(&self) -> usize {
        self.materials_created.load(Ordering::Relaxed)
    }
}
