//! Minimal deterministic ECS-style component model.
//!
//! Components are stored in BTreeMap for deterministic iteration order.
//! Each component type has its own storage keyed by EntityId.
//!
//! # Invariants
//! - Entity ids are allocated from 1 upwards; `EntityId::NULL` is never issued.
//! - All component mutations produce events.
//! - Iteration order is deterministic (BTreeMap).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use wavevisual_common::EntityId;

/// Human-readable name component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

/// File the entity was loaded from (set on models).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFilePath(pub PathBuf);

/// Link from a child entity (link, visual) to the entity that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentEntity(pub EntityId);

/// Events produced by component mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ComponentEvent {
    Spawned { entity: EntityId },
    NameSet { entity: EntityId, name: String },
    SourceFilePathSet { entity: EntityId, path: PathBuf },
    ParentSet { entity: EntityId, parent: EntityId },
    ModelMarked { entity: EntityId },
    Removed { entity: EntityId },
}

/// Deterministic component storage for all component types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentStore {
    next_id: u64,
    entities: BTreeSet<EntityId>,
    names: BTreeMap<EntityId, Name>,
    source_paths: BTreeMap<EntityId, SourceFilePath>,
    parents: BTreeMap<EntityId, ParentEntity>,
    models: BTreeSet<EntityId>,
    #[serde(skip)]
    events: Vec<ComponentEvent>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh entity id.
    pub fn spawn(&mut self) -> EntityId {
        self.next_id += 1;
        let entity = EntityId(self.next_id);
        self.entities.insert(entity);
        self.events.push(ComponentEvent::Spawned { entity });
        entity
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains(&entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Drain and return all pending component events.
    pub fn drain_events(&mut self) -> Vec<ComponentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[ComponentEvent] {
        &self.events
    }

    // --- Name ---
    pub fn set_name(&mut self, entity: EntityId, name: impl Into<String>) {
        let name = name.into();
        self.events.push(ComponentEvent::NameSet {
            entity,
            name: name.clone(),
        });
        self.names.insert(entity, Name(name));
    }

    pub fn get_name(&self, entity: EntityId) -> Option<&Name> {
        self.names.get(&entity)
    }

    // --- SourceFilePath ---
    pub fn set_source_file_path(&mut self, entity: EntityId, path: impl Into<PathBuf>) {
        let path = path.into();
        self.events.push(ComponentEvent::SourceFilePathSet {
            entity,
            path: path.clone(),
        });
        self.source_paths.insert(entity, SourceFilePath(path));
    }

    pub fn get_source_file_path(&self, entity: EntityId) -> Option<&Path> {
        self.source_paths.get(&entity).map(|p| p.0.as_path())
    }

    // --- Parent ---
    pub fn set_parent(&mut self, entity: EntityId, parent: EntityId) {
        self.events.push(ComponentEvent::ParentSet { entity, parent });
        self.parents.insert(entity, ParentEntity(parent));
    }

    pub fn get_parent(&self, entity: EntityId) -> Option<EntityId> {
        self.parents.get(&entity).map(|p| p.0)
    }

    // --- Model ---
    pub fn mark_model(&mut self, entity: EntityId) {
        self.events.push(ComponentEvent::ModelMarked { entity });
        self.models.insert(entity);
    }

    pub fn is_model(&self, entity: EntityId) -> bool {
        self.models.contains(&entity)
    }

    /// Walk the parent chain and return the outermost model containing
    /// `entity` (which may be `entity` itself). `None` if no model is found.
    pub fn top_level_model(&self, entity: EntityId) -> Option<EntityId> {
        let mut found = None;
        let mut current = Some(entity);
        // Bounded by the entity count so a malformed parent cycle terminates.
        for _ in 0..=self.entities.len() {
            let Some(e) = current else { break };
            if self.is_model(e) {
                found = Some(e);
            }
            current = self.get_parent(e);
        }
        found
    }

    /// Remove an entity and all of its components.
    pub fn remove_entity(&mut self, entity: EntityId) {
        if !self.entities.remove(&entity) {
            return;
        }
        self.names.remove(&entity);
        self.source_paths.remove(&entity);
        self.parents.remove(&entity);
        self.models.remove(&entity);
        tracing::trace!(%entity, "entity removed");
        self.events.push(ComponentEvent::Removed { entity });
    }
}
