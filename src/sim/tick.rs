//! Per-frame gameplay tick
//!
//! Moves the player, samples collisions and grows difficulty. Does nothing
//! unless the run is active; the countdown timer is driven separately.

use glam::IVec3;

use super::collision::sample_collision;
use super::registry::BlockCategory;
use super::state::{GameEvent, GameSession};
use crate::voxel_at;
use crate::world::VoxelWorld;

/// How many voxels ahead the autopilot scans for obstacles
pub const AUTOPILOT_LOOKAHEAD: i32 = 6;

/// Distance from a lane center the autopilot tolerates before correcting
const LANE_DEADZONE: f32 = 0.1;

/// Input flags polled once per tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Strafe toward -X
    pub left: bool,
    /// Strafe toward +X
    pub right: bool,
    /// Idle/demo mode - autopilot steers
    pub idle_mode: bool,
}

/// Advance the session by one frame of `dt` seconds
pub fn tick<W: VoxelWorld + ?Sized>(
    session: &mut GameSession,
    world: &W,
    input: &TickInput,
    dt: f32,
) -> Vec<GameEvent> {
    if !session.lifecycle.is_active() {
        return Vec::new();
    }
    // Time never runs backward; the player must not retreat
    let dt = dt.max(0.0);

    let input = if input.idle_mode {
        autopilot_input(session, world, AUTOPILOT_LOOKAHEAD)
    } else {
        input.clone()
    };

    let forward = session.difficulty.speed * dt;
    let strafe = session.tuning.lateral_speed * dt;
    let pos = &mut session.player.position;
    pos.z += forward;
    // Opposite inputs both apply and cancel out
    if input.left {
        pos.x -= strafe;
    }
    if input.right {
        pos.x += strafe;
    }
    session.distance += forward;
    session.time_ticks += 1;

    if let Some(reason) = sample_collision(world, &session.registry, session.player.position) {
        return session.fail(reason);
    }

    session.difficulty.tick(dt);
    Vec::new()
}

/// Steer around obstacles in the lane ahead while staying on the path
///
/// Picks the nearest lane with no obstacle within `lookahead` voxels and
/// heads for its center.
pub fn autopilot_input<W: VoxelWorld + ?Sized>(
    session: &GameSession,
    world: &W,
    lookahead: i32,
) -> TickInput {
    let pos = session.player.position;
    let cell = voxel_at(pos);
    let half_width = session.tuning.path_half_width;

    let lane_clear = |lane: i32| {
        (1..=lookahead).all(|dz| {
            let coord = IVec3::new(lane, cell.y, cell.z + dz);
            session.registry.category_of(world.block_at(coord)) != BlockCategory::Obstacle
        })
    };

    // Nearest clear lane, left side first on ties
    let current = cell.x.clamp(-half_width, half_width);
    let target = (-half_width..=half_width)
        .filter(|lane| lane_clear(*lane))
        .min_by_key(|lane| (lane.abs_diff(current), *lane))
        .unwrap_or(current);

    let offset = (target as f32 + 0.5) - pos.x;
    TickInput {
        left: offset < -LANE_DEADZONE,
        right: offset > LANE_DEADZONE,
        idle_mode: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use glam::Vec3;

    use crate::sim::lifecycle::RunState;
    use crate::sim::registry::VoxelId;
    use crate::sim::state::FailReason;
    use crate::tuning::Tuning;

    const PATH: VoxelId = VoxelId(1);
    const OBSTACLE: VoxelId = VoxelId(2);

    /// Hand-placed voxels; everything else empty
    #[derive(Default)]
    struct StubWorld {
        voxels: HashMap<IVec3, VoxelId>,
    }

    impl StubWorld {
        fn walkway(len: i32) -> Self {
            let mut world = Self::default();
            for z in -len..=len {
                for x in -2..=2 {
                    world.voxels.insert(IVec3::new(x, 0, z), PATH);
                }
            }
            world
        }

        fn with_obstacle(mut self, x: i32, z: i32) -> Self {
            self.voxels.insert(IVec3::new(x, 1, z), OBSTACLE);
            self
        }
    }

    impl VoxelWorld for StubWorld {
        fn block_at(&self, coord: IVec3) -> VoxelId {
            self.voxels.get(&coord).copied().unwrap_or(VoxelId::EMPTY)
        }
    }

    fn running_session() -> GameSession {
        let mut session = GameSession::new(Tuning::default()).unwrap();
        session.start();
        session.advance_timer(3.0);
        assert_eq!(session.state(), RunState::Running);
        session
    }

    fn assert_reset(session: &GameSession) {
        assert_eq!(session.state(), RunState::Countdown { remaining: 3 });
        assert_eq!(session.difficulty.speed, 5.0);
        assert_eq!(session.difficulty.difficulty, 0.05);
        assert_eq!(session.player.position, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_tick_advances_forward() {
        let world = StubWorld::walkway(100);
        let mut session = running_session();
        session.player.position = Vec3::new(0.0, 1.0, 10.0);
        let speed = session.difficulty.speed;

        let events = tick(&mut session, &world, &TickInput::default(), 0.1);
        assert!(events.is_empty());
        assert_eq!(session.state(), RunState::Running);
        assert!((session.player.position.z - (10.0 + speed * 0.1)).abs() < 1e-5);
        assert_eq!(session.player.position.x, 0.0);
        assert!(session.difficulty.speed > speed);
        assert_eq!(session.time_ticks, 1);
    }

    #[test]
    fn test_tick_falls_off_path() {
        let world = StubWorld::walkway(100);
        let mut session = running_session();
        session.difficulty.tick(100.0);
        session.player.position = Vec3::new(10.0, 1.0, 10.0);

        let events = tick(&mut session, &world, &TickInput::default(), 0.1);
        assert!(matches!(
            events.first(),
            Some(GameEvent::GameOver {
                reason: FailReason::Fell,
                ..
            })
        ));
        assert_reset(&session);
    }

    #[test]
    fn test_tick_hits_obstacle() {
        let world = StubWorld::walkway(100).with_obstacle(0, 11);
        let mut session = running_session();
        session.difficulty.tick(100.0);
        session.player.position = Vec3::new(0.0, 1.0, 10.0);

        let events = tick(&mut session, &world, &TickInput::default(), 0.1);
        assert!(matches!(
            events.first(),
            Some(GameEvent::GameOver {
                reason: FailReason::HitObstacle,
                ..
            })
        ));
        assert_reset(&session);
    }

    #[test]
    fn test_tick_idle_until_go() {
        let world = StubWorld::walkway(100);
        let mut session = GameSession::new(Tuning::default()).unwrap();
        let spawn = session.player.position;

        assert!(tick(&mut session, &world, &TickInput::default(), 0.1).is_empty());
        session.start();
        session.advance_timer(2.0);
        assert!(tick(&mut session, &world, &TickInput::default(), 0.1).is_empty());
        assert_eq!(session.player.position, spawn);
        assert_eq!(session.difficulty.speed, 5.0);

        session.advance_timer(1.0);
        tick(&mut session, &world, &TickInput::default(), 0.1);
        assert!(session.player.position.z > spawn.z);
    }

    #[test]
    fn test_lateral_input() {
        let world = StubWorld::walkway(100);
        let mut session = running_session();
        session.player.position = Vec3::new(0.0, 1.0, 10.0);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut session, &world, &left, 0.1);
        assert!((session.player.position.x + 0.5).abs() < 1e-6);

        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut session, &world, &both, 0.1);
        assert!((session.player.position.x + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_collision_uses_moved_position() {
        // Strafing off the right edge fails on the same tick
        let world = StubWorld::walkway(100);
        let mut session = running_session();
        session.player.position = Vec3::new(2.9, 1.0, 10.0);
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        let events = tick(&mut session, &world, &right, 0.1);
        assert!(matches!(
            events.first(),
            Some(GameEvent::GameOver {
                reason: FailReason::Fell,
                ..
            })
        ));
    }

    #[test]
    fn test_autopilot_dodges_obstacle() {
        let world = StubWorld::walkway(100).with_obstacle(0, 13);
        let mut session = running_session();
        session.player.position = Vec3::new(0.5, 1.0, 10.0);

        let input = autopilot_input(&session, &world, AUTOPILOT_LOOKAHEAD);
        assert!(input.left ^ input.right);
    }

    #[test]
    fn test_autopilot_holds_clear_lane() {
        let world = StubWorld::walkway(100).with_obstacle(1, 12);
        let mut session = running_session();
        session.player.position = Vec3::new(0.5, 1.0, 10.0);

        let input = autopilot_input(&session, &world, AUTOPILOT_LOOKAHEAD);
        assert!(!input.left && !input.right);
    }

    #[test]
    fn test_idle_mode_survives_obstacle_field() {
        let world = StubWorld::walkway(200)
            .with_obstacle(0, 20)
            .with_obstacle(1, 20)
            .with_obstacle(-1, 40)
            .with_obstacle(0, 40);
        let mut session = running_session();
        session.player.position = Vec3::new(0.5, 1.0, 0.5);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..(60 * 12) {
            let events = tick(&mut session, &world, &input, 1.0 / 60.0);
            assert!(events.is_empty(), "autopilot crashed at {:?}", session.player.position);
        }
        assert!(session.player.position.z > 50.0);
    }

    #[test]
    fn test_negative_dt_does_not_move_back() {
        let world = StubWorld::walkway(100);
        let mut session = running_session();
        session.player.position = Vec3::new(0.5, 1.0, 10.0);
        tick(&mut session, &world, &TickInput::default(), 0.1);
        let position = session.player.position;
        let distance = session.distance;
        let speed = session.difficulty.speed;

        let events = tick(&mut session, &world, &TickInput::default(), -1.0);
        assert!(events.is_empty());
        assert_eq!(session.player.position, position);
        assert_eq!(session.distance, distance);
        assert_eq!(session.difficulty.speed, speed);
    }

    #[test]
    fn test_autopilot_on_widest_path() {
        let tuning = Tuning {
            path_half_width: crate::consts::MAX_PATH_HALF_WIDTH,
            ..Default::default()
        };
        let mut session = GameSession::new(tuning).unwrap();
        session.start();
        session.advance_timer(3.0);

        let half_width = session.tuning.path_half_width;
        let mut world = StubWorld::default();
        for z in -5..=60 {
            for x in -half_width..=half_width {
                world.voxels.insert(IVec3::new(x, 0, z), PATH);
            }
        }
        let world = world
            .with_obstacle(59, 13)
            .with_obstacle(60, 13)
            .with_obstacle(61, 13);

        // Both neighbours blocked: two lanes over, left side wins the tie
        session.player.position = Vec3::new(60.5, 1.0, 10.0);
        let input = autopilot_input(&session, &world, AUTOPILOT_LOOKAHEAD);
        assert!(input.left && !input.right);

        // Out past the edge the autopilot heads back toward the outermost lane
        session.player.position = Vec3::new(80.5, 1.0, 10.0);
        let input = autopilot_input(&session, &world, AUTOPILOT_LOOKAHEAD);
        assert!(input.left && !input.right);

        session.player.position = Vec3::new(63.5, 1.0, 0.5);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..60 {
            let events = tick(&mut session, &world, &idle, 1.0 / 60.0);
            assert!(events.is_empty(), "crashed at {:?}", session.player.position);
        }
    }

    #[test]
    fn test_streamed_world_across_reset() {
        use crate::sim::registry::BlockCategory;
        use crate::world::ChunkStore;

        let tuning = Tuning {
            terrain_seed: Some(7),
            chunk_size: 8,
            chunk_add_distance: 2.0,
            chunk_remove_distance: 3.0,
            ..Default::default()
        };
        let mut session = GameSession::new(tuning).unwrap();
        let mut world = ChunkStore::new(session.tuning());
        let spawn = session.player.position;
        let spawn_feet = voxel_at(spawn) - IVec3::Y;
        let spawn_chunk = world.chunk_of(spawn_feet);
        let feet_category = |session: &GameSession, world: &ChunkStore| {
            session.registry().category_of(world.block_at(spawn_feet))
        };

        assert!(session.stream_world(&mut world).loaded > 0);
        assert_eq!(feet_category(&session, &world), BlockCategory::Path);

        session.start();
        session.advance_timer(3.0);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..10 {
            session.stream_world(&mut world);
            assert!(tick(&mut session, &world, &idle, 1.0 / 60.0).is_empty());
        }
        assert!(session.player.position.z > spawn.z);

        // Far off the walkway the spawn chunk gets evicted
        session.player.position = Vec3::new(10.5, 1.0, 200.5);
        assert!(session.stream_world(&mut world).evicted > 0);
        assert!(!world.is_loaded(spawn_chunk));

        let events = tick(&mut session, &world, &idle, 1.0 / 60.0);
        assert!(matches!(
            events.first(),
            Some(GameEvent::GameOver {
                reason: FailReason::Fell,
                ..
            })
        ));
        assert_eq!(session.player.position, spawn);
        assert_eq!(feet_category(&session, &world), BlockCategory::Empty);

        // Streaming after the reset brings the spawn walkway back
        assert!(session.stream_world(&mut world).loaded > 0);
        assert!(world.is_loaded(spawn_chunk));
        assert_eq!(feet_category(&session, &world), BlockCategory::Path);
    }
}
