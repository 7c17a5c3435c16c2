//! Voxel id to block category mapping
//!
//! Ids are registered once at startup; after that the registry is read-only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Voxel identifier. Zero is always empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct VoxelId(pub u16);

impl VoxelId {
    pub const EMPTY: VoxelId = VoxelId(0);

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

/// Semantic block categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockCategory {
    #[default]
    Empty,
    /// Walkable ground the player must stay above
    Path,
    /// Ends the run when directly ahead of the player
    Obstacle,
}

impl BlockCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockCategory::Empty => "empty",
            BlockCategory::Path => "path",
            BlockCategory::Obstacle => "obstacle",
        }
    }
}

/// Startup configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("voxel id {0} is already registered")]
    DuplicateRegistration(u16),
    #[error("voxel id 0 is reserved for empty")]
    ReservedId,
    #[error("no voxel id registered for category {0}")]
    MissingCategory(&'static str),
}

/// Write-once block registry
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    entries: BTreeMap<VoxelId, BlockCategory>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock runner blocks: 1 = path, 2 = obstacle
    pub fn standard() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(VoxelId(1), BlockCategory::Path)?;
        registry.register(VoxelId(2), BlockCategory::Obstacle)?;
        Ok(registry)
    }

    /// Register `id` under `category`. Each id may be registered once.
    pub fn register(&mut self, id: VoxelId, category: BlockCategory) -> Result<VoxelId, RegistryError> {
        if id.is_empty() {
            return Err(RegistryError::ReservedId);
        }
        if self.entries.contains_key(&id) {
            return Err(RegistryError::DuplicateRegistration(id.0));
        }
        self.entries.insert(id, category);
        log::debug!("Registered voxel {} as {}", id.0, category.as_str());
        Ok(id)
    }

    /// Category of `id`; empty for 0 and anything never registered
    #[inline]
    pub fn category_of(&self, id: VoxelId) -> BlockCategory {
        self.entries.get(&id).copied().unwrap_or(BlockCategory::Empty)
    }

    /// Lowest id registered under `category`
    pub fn id_for(&self, category: BlockCategory) -> Option<VoxelId> {
        self.entries
            .iter()
            .find(|(_, c)| **c == category)
            .map(|(id, _)| *id)
    }

    /// Like `id_for`, but a missing category is a configuration error
    pub fn require(&self, category: BlockCategory) -> Result<VoxelId, RegistryError> {
        self.id_for(category)
            .ok_or(RegistryError::MissingCategory(category.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
