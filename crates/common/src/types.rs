use serde::{Deserialize, Serialize};

/// Identifier the simulation assigns to an entity.
///
/// Opaque and stable for the lifetime of the entity. The scene graph tags the
/// nodes it builds for an entity with this same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Sentinel for "no entity". Never handed out by the component store.
    pub const NULL: Self = Self(0);

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_null() {
        assert!(EntityId::default().is_null());
        assert!(!EntityId(7).is_null());
    }

    #[test]
    fn display_uses_hash_prefix() {
        assert_eq!(EntityId(42).to_string(), "#42");
    }
}
