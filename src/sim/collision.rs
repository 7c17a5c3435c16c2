//! Single-point collision sampling against the voxel grid
//!
//! Two voxels are checked per tick: the one under the player's feet and the
//! one directly ahead at body height. There is no sweep, so a thin obstacle
//! can be skipped at high speed or low frame rate.

use glam::{IVec3, Vec3};

use super::registry::{BlockCategory, BlockRegistry};
use super::state::FailReason;
use crate::voxel_at;
use crate::world::VoxelWorld;

/// Voxel coordinates sampled for one position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePoints {
    /// Must be path
    pub feet: IVec3,
    /// Must not be an obstacle
    pub ahead: IVec3,
}

impl SamplePoints {
    pub fn at(pos: Vec3) -> Self {
        let cell = voxel_at(pos);
        Self {
            feet: cell - IVec3::Y,
            ahead: cell + IVec3::Z,
        }
    }
}

/// Check `pos` against the world. Falling is checked before obstacles.
pub fn sample_collision<W: VoxelWorld + ?Sized>(
    world: &W,
    registry: &BlockRegistry,
    pos: Vec3,
) -> Option<FailReason> {
    let points = SamplePoints::at(pos);
    if registry.category_of(world.block_at(points.feet)) != BlockCategory::Path {
        return Some(FailReason::Fell);
    }
    if registry.category_of(world.block_at(points.ahead)) == BlockCategory::Obstacle {
        return Some(FailReason::HitObstacle);
    }
    None
}
