//! Block lookup and reference chunk streaming
//!
//! The simulation only needs `VoxelWorld::block_at`. `ChunkStore` is a small
//! in-memory collaborator that materializes cubic chunks around the player
//! through the terrain generator, for headless play and tests.

use std::collections::HashMap;

use glam::{IVec3, Vec3};

use crate::sim::registry::VoxelId;
use crate::sim::terrain::{ChunkBuffer, Region, TerrainGenerator};
use crate::tuning::Tuning;

/// Read access to materialized voxels
pub trait VoxelWorld {
    /// Voxel at `coord`; empty when the region isn't loaded
    fn block_at(&self, coord: IVec3) -> VoxelId;
}

/// What one streaming pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub loaded: usize,
    pub evicted: usize,
}

/// Chunks keyed by chunk coordinate
#[derive(Debug, Clone)]
pub struct ChunkStore {
    chunk_size: i32,
    add_distance: f32,
    remove_distance: f32,
    chunks: HashMap<IVec3, ChunkBuffer>,
}

impl ChunkStore {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            chunk_size: tuning.chunk_size,
            add_distance: tuning.chunk_add_distance,
            remove_distance: tuning.chunk_remove_distance,
            chunks: HashMap::new(),
        }
    }

    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Chunk coordinate containing a voxel
    #[inline]
    pub fn chunk_of(&self, coord: IVec3) -> IVec3 {
        IVec3::new(
            coord.x.div_euclid(self.chunk_size),
            coord.y.div_euclid(self.chunk_size),
            coord.z.div_euclid(self.chunk_size),
        )
    }

    pub fn is_loaded(&self, chunk: IVec3) -> bool {
        self.chunks.contains_key(&chunk)
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Distance in chunks from a chunk's center to `pos`
    fn chunk_distance(&self, chunk: IVec3, pos: Vec3) -> f32 {
        let center = chunk.as_vec3() + Vec3::splat(0.5);
        (center - pos / self.chunk_size as f32).length()
    }

    /// Load missing chunks within the add distance and drop chunks beyond the
    /// remove distance. Loaded chunks are never regenerated here.
    pub fn stream_around(
        &mut self,
        pos: Vec3,
        generator: &mut TerrainGenerator,
        difficulty: f32,
    ) -> StreamStats {
        let mut stats = StreamStats::default();

        let remove_distance = self.remove_distance;
        let before = self.chunks.len();
        let size = self.chunk_size as f32;
        self.chunks.retain(|chunk, _| {
            let center = chunk.as_vec3() + Vec3::splat(0.5);
            (center - pos / size).length() <= remove_distance
        });
        stats.evicted = before - self.chunks.len();

        let home = self.chunk_of(crate::voxel_at(pos));
        let reach = self.add_distance.ceil() as i32;
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                for dz in -reach..=reach {
                    let chunk = home + IVec3::new(dx, dy, dz);
                    if self.is_loaded(chunk) || self.chunk_distance(chunk, pos) > self.add_distance {
                        continue;
                    }
                    let buffer = ChunkBuffer::new(Region::chunk(chunk, self.chunk_size));
                    let buffer = generator.fill_region(buffer, difficulty);
                    self.chunks.insert(chunk, buffer);
                    stats.loaded += 1;
                }
            }
        }

        if stats.loaded > 0 || stats.evicted > 0 {
            log::debug!(
                "Streamed chunks around {:?}: +{} -{} ({} loaded)",
                home,
                stats.loaded,
                stats.evicted,
                self.chunks.len()
            );
        }
        stats
    }

    /// Drop every chunk so the next stream pass regenerates them
    pub fn reload(&mut self) {
        log::info!("Reloading {} chunks", self.chunks.len());
        self.chunks.clear();
    }
}

impl VoxelWorld for ChunkStore {
    fn block_at(&self, coord: IVec3) -> VoxelId {
        self.chunks
            .get(&self.chunk_of(coord))
            .map(|chunk| chunk.get_world(coord))
            .unwrap_or(VoxelId::EMPTY)
    }
}
