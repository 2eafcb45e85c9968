//! Part registry with original (reset) transform snapshots

use std::collections::HashMap;

use uuid::Uuid;

use crate::part::{Part, PartName, PartTransform};

/// Registry-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("original transforms were already snapshotted")]
    AlreadySnapshotted,
    #[error("no original transform snapshot exists")]
    NoSnapshot,
    #[error("part not found: {0}")]
    PartNotFound(PartName),
}

/// Mapping from part identifier to its current transform and its original
/// (reset) transform
///
/// Parts keep their insertion order, which is also the scene traversal
/// order. The original snapshot is captured exactly once, after the loading
/// subsystem has normalized and centered the assembly, and is read-only
/// thereafter.
#[derive(Debug, Default)]
pub struct PartRegistry {
    parts: Vec<Part>,
    originals: Option<HashMap<PartName, PartTransform>>,
}

impl PartRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a part, replacing any previous part with the same name
    pub fn insert(&mut self, part: Part) {
        if let Some(existing) = self.parts.iter_mut().find(|p| p.name == part.name) {
            *existing = part;
        } else {
            self.parts.push(part);
        }
    }

    /// Get a part by name
    pub fn get(&self, name: PartName) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Get a mutable part by name
    pub fn get_mut(&mut self, name: PartName) -> Option<&mut Part> {
        self.parts.iter_mut().find(|p| p.name == name)
    }

    /// Look up the part owning the given scene node
    pub fn get_by_node(&self, node_id: Uuid) -> Option<&Part> {
        self.parts.iter().find(|p| p.node_id == node_id)
    }

    /// Iterate parts in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Number of registered parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Remove all parts and the original snapshot
    ///
    /// Callers holding a part selection must clear it before teardown.
    pub fn clear(&mut self) {
        self.parts.clear();
        self.originals = None;
    }

    /// Snapshot the current transforms as the original (reset) transforms
    ///
    /// Must be called exactly once, after initial layout.
    pub fn snapshot_originals(&mut self) -> Result<(), RegistryError> {
        if self.originals.is_some() {
            return Err(RegistryError::AlreadySnapshotted);
        }
        self.originals = Some(
            self.parts
                .iter()
                .map(|p| (p.name, p.transform))
                .collect(),
        );
        Ok(())
    }

    /// Get a part's original transform, if snapshotted
    pub fn original(&self, name: PartName) -> Option<&PartTransform> {
        self.originals.as_ref()?.get(&name)
    }

    /// Restore every part's transform from its original snapshot
    pub fn reset_all_parts(&mut self) -> Result<(), RegistryError> {
        let originals = self.originals.as_ref().ok_or(RegistryError::NoSnapshot)?;
        for part in &mut self.parts {
            if let Some(original) = originals.get(&part.name) {
                part.transform = *original;
            }
        }
        Ok(())
    }
}
