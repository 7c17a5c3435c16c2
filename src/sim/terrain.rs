//! Procedural corridor terrain
//!
//! Every voxel is classified independently from its coordinate and the
//! current difficulty:
//! - `y == 0` and `|x| <= path_half_width`: path (the walkway)
//! - `y == 1` and `z > obstacle_start_z`: obstacle with probability `difficulty`
//! - anything else: empty
//!
//! Obstacle draws are independent per evaluation. Re-requesting a region
//! does not reproduce it unless a fixed seed was configured.

use glam::IVec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::registry::{BlockCategory, BlockRegistry, RegistryError, VoxelId};
use crate::tuning::Tuning;

/// Corridor shape and the ids it is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainLayout {
    pub path_id: VoxelId,
    pub obstacle_id: VoxelId,
    pub path_half_width: i32,
    pub obstacle_start_z: i32,
}

impl TerrainLayout {
    /// Resolve ids from the registry and shape from tuning
    pub fn new(registry: &BlockRegistry, tuning: &Tuning) -> Result<Self, RegistryError> {
        Ok(Self {
            path_id: registry.require(BlockCategory::Path)?,
            obstacle_id: registry.require(BlockCategory::Obstacle)?,
            path_half_width: tuning.path_half_width,
            obstacle_start_z: tuning.obstacle_start_z,
        })
    }
}

/// Classify one voxel. First matching rule wins.
///
/// `rng` is only drawn from for obstacle-eligible coordinates.
pub fn classify<R: Rng + ?Sized>(
    layout: &TerrainLayout,
    coord: IVec3,
    difficulty: f32,
    rng: &mut R,
) -> VoxelId {
    if coord.y == 0 && coord.x.unsigned_abs() <= layout.path_half_width as u32 {
        return layout.path_id;
    }
    if coord.y == 1 && coord.z > layout.obstacle_start_z && rng.random::<f32>() < difficulty {
        return layout.obstacle_id;
    }
    VoxelId::EMPTY
}

/// Axis-aligned block of voxel coordinates: `origin .. origin + shape`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub origin: IVec3,
    pub shape: IVec3,
}

impl Region {
    pub fn new(origin: IVec3, shape: IVec3) -> Self {
        Self { origin, shape }
    }

    /// Cubic chunk at chunk coordinate `chunk`
    pub fn chunk(chunk: IVec3, size: i32) -> Self {
        Self::new(chunk * size, IVec3::splat(size))
    }

    pub fn volume(&self) -> usize {
        (self.shape.x.max(0) as usize) * (self.shape.y.max(0) as usize) * (self.shape.z.max(0) as usize)
    }

    pub fn contains(&self, coord: IVec3) -> bool {
        let local = coord - self.origin;
        local.cmpge(IVec3::ZERO).all() && local.cmplt(self.shape).all()
    }
}

/// Voxel storage for one region
#[derive(Debug, Clone)]
pub struct ChunkBuffer {
    region: Region,
    voxels: Vec<VoxelId>,
}

impl ChunkBuffer {
    /// Empty buffer covering `region`
    pub fn new(region: Region) -> Self {
        Self {
            region,
            voxels: vec![VoxelId::EMPTY; region.volume()],
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    #[inline]
    fn index(&self, i: i32, j: i32, k: i32) -> usize {
        let shape = self.region.shape;
        ((i * shape.y + j) * shape.z + k) as usize
    }

    /// Voxel at local offset (i, j, k)
    pub fn get(&self, i: i32, j: i32, k: i32) -> VoxelId {
        self.voxels[self.index(i, j, k)]
    }

    pub fn set(&mut self, i: i32, j: i32, k: i32, id: VoxelId) {
        let idx = self.index(i, j, k);
        self.voxels[idx] = id;
    }

    /// Voxel at a world coordinate, or empty outside the region
    pub fn get_world(&self, coord: IVec3) -> VoxelId {
        if !self.region.contains(coord) {
            return VoxelId::EMPTY;
        }
        let local = coord - self.region.origin;
        self.get(local.x, local.y, local.z)
    }

    /// Number of voxels holding `id`
    pub fn count(&self, id: VoxelId) -> usize {
        self.voxels.iter().filter(|v| **v == id).count()
    }
}

/// Terrain generator answering chunk-fill requests
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    layout: TerrainLayout,
    rng: Pcg32,
}

impl TerrainGenerator {
    /// Build from the registry and tuning. Without `terrain_seed` the RNG is
    /// seeded from OS entropy.
    pub fn new(registry: &BlockRegistry, tuning: &Tuning) -> Result<Self, RegistryError> {
        let layout = TerrainLayout::new(registry, tuning)?;
        let rng = match tuning.terrain_seed {
            Some(seed) => {
                log::info!("Terrain seeded with {}", seed);
                Pcg32::seed_from_u64(seed)
            }
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        Ok(Self { layout, rng })
    }

    pub fn layout(&self) -> &TerrainLayout {
        &self.layout
    }

    /// Classify a single voxel
    pub fn classify(&mut self, coord: IVec3, difficulty: f32) -> VoxelId {
        classify(&self.layout, coord, difficulty, &mut self.rng)
    }

    /// Populate every voxel of `buffer` and hand it back
    pub fn fill_region(&mut self, mut buffer: ChunkBuffer, difficulty: f32) -> ChunkBuffer {
        let Region { origin, shape } = buffer.region();
        for i in 0..shape.x {
            for j in 0..shape.y {
                for k in 0..shape.z {
                    let id = self.classify(origin + IVec3::new(i, j, k), difficulty);
                    buffer.set(i, j, k, id);
                }
            }
        }
        buffer
    }
}
