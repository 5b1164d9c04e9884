use std::sync::{Arc, PoisonError, RwLock};
use wavevisual_common::EntityId;

use crate::material::{Material, MaterialHandle};

/// Scene-unique node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

pub type NodeHandle = Arc<Node>;

/// Minimal view of a scene-graph node needed to search it.
pub trait SceneNode: Sized {
    /// Entity this node renders, if it was created for one.
    fn entity_tag(&self) -> Option<EntityId>;

    /// Direct children in insertion order.
    fn children(&self) -> Vec<Arc<Self>>;
}

/// A node in the scene graph.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    name: String,
    entity: Option<EntityId>,
    unique_materials: bool,
    children: RwLock<Vec<NodeHandle>>,
    material: RwLock<Option<MaterialHandle>>,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        name: impl Into<String>,
        entity: Option<EntityId>,
        unique_materials: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            entity,
            unique_materials,
            children: RwLock::new(Vec::new()),
            material: RwLock::new(None),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    pub fn add_child(&self, child: NodeHandle) {
        let mut children = self.children.write().unwrap_or_else(PoisonError::into_inner);
        children.push(child);
    }

    pub fn child_count(&self) -> usize {
        let children = self.children.read().unwrap_or_else(PoisonError::into_inner);
        children.len()
    }

    pub fn child(&self, index: usize) -> Option<NodeHandle> {
        let children = self.children.read().unwrap_or_else(PoisonError::into_inner);
        children.get(index).cloned()
    }

    /// Attach `material`. Nodes with unique materials store a private copy,
    /// so callers must read back [`Node::material`] to get the attached one.
    pub fn set_material(&self, material: &MaterialHandle) {
        let attached = if self.unique_materials {
            Arc::new(Material::duplicate(material))
        } else {
            Arc::clone(material)
        };
        tracing::trace!(
            node = %self.name,
            given = material.id().0,
            attached = attached.id().0,
            "material attached"
        );
        let mut slot = self.material.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(attached);
    }

    /// Material currently in effect on this node.
    pub fn material(&self) -> Option<MaterialHandle> {
        let slot = self.material.read().unwrap_or_else(PoisonError::into_inner);
        slot.clone()
    }
}

impl SceneNode for Node {
    fn entity_tag(&self) -> Option<EntityId> {
        self.entity
    }

    fn children(&self) -> Vec<Arc<Self>> {
        let children = self.children.read().unwrap_or_else(PoisonError::into_inner);
        children.clone()
    }
}
