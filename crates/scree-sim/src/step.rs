use scree_geom::Vec3;
use scree_physics::resolve;
use scree_world::{RenderSink, Voxel, World, normalize};

use crate::config::SimConfig;
use crate::player::Player;

/// Advance the simulation by one frame of `dt` seconds.
///
/// The frame is cut into fixed sub-steps so a fast fall cannot tunnel
/// through a one-cell floor. Each sub-step moves the falling blocks first
/// and the player second, so the player lands on a sand block the same tick
/// it settles. A huge `dt` (window dragged, debugger pause) is clamped
/// rather than integrated.
pub fn step(
    world: &mut World,
    player: &mut Player,
    cfg: &SimConfig,
    dt: f32,
    sink: &mut dyn RenderSink,
) {
    let dt = dt.min(cfg.max_frame_dt);
    let sub = dt / cfg.substeps as f32;
    for _ in 0..cfg.substeps {
        step_falling(world, cfg, sub, sink);
        step_player(world, player, cfg, sub);
    }
}

/// Advance only the airborne blocks, leaving the player untouched. For
/// hosts that take the player out of physics, like a free-fly camera.
pub fn step_blocks(world: &mut World, cfg: &SimConfig, dt: f32, sink: &mut dyn RenderSink) {
    let dt = dt.min(cfg.max_frame_dt);
    let sub = dt / cfg.substeps as f32;
    for _ in 0..cfg.substeps {
        step_falling(world, cfg, sub, sink);
    }
}

/// Integrate every airborne block by one sub-step.
///
/// Each block is pulled out of the grid before its collision query so it
/// cannot collide with itself, then re-inserted at its new position. A
/// coordinate that vanished since the snapshot (displaced by an earlier
/// block this same pass) is skipped.
fn step_falling(world: &mut World, cfg: &SimConfig, dt: f32, sink: &mut dyn RenderSink) {
    for coord in world.falling_coords() {
        let Ok(voxel) = world.remove_block(coord, true, sink) else {
            continue;
        };
        let Some(fall) = voxel.fall else {
            world.add_block(voxel, true, sink);
            continue;
        };
        let velocity = (fall.velocity - cfg.gravity * dt).max(-cfg.terminal_velocity);
        let desired = fall.pos + Vec3::new(0.0, velocity * dt, 0.0);
        let (corrected, contact) = resolve(desired, 1, |c| world.contains(c));
        let next = if contact {
            Voxel::fixed(normalize(corrected), voxel.material)
        } else {
            Voxel::falling(corrected, velocity, voxel.material)
        };
        world.add_block(next, true, sink);
    }
}

fn step_player(world: &World, player: &mut Player, cfg: &SimConfig, dt: f32) {
    player.velocity = (player.velocity - cfg.gravity * dt).max(-cfg.terminal_velocity);
    let displacement =
        (player.motion_vector() * (cfg.walk_speed * dt)).with_y(player.velocity * dt);
    let (corrected, contact) = resolve(
        player.position + displacement,
        cfg.player_height,
        |c| world.contains(c),
    );
    player.position = corrected;
    if contact {
        player.velocity = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scree_blocks::Material;
    use scree_world::{NullSink, VoxelCoord};

    const TICK: f32 = 1.0 / 60.0;

    fn floor(world: &mut World, sink: &mut NullSink) {
        for x in -3..=3 {
            for z in -3..=3 {
                world.add_block(
                    Voxel::fixed(VoxelCoord::new(x, 0, z), Material::Stone),
                    true,
                    sink,
                );
            }
        }
    }

    #[test]
    fn standing_player_stays_put() {
        let mut sink = NullSink::default();
        let mut world = World::new();
        floor(&mut world, &mut sink);
        let mut player = Player::new(Vec3::new(0.0, 1.9, 0.0));
        for _ in 0..120 {
            step(&mut world, &mut player, &SimConfig::default(), TICK, &mut sink);
        }
        assert!((player.position.y - 1.9).abs() < 1e-4);
        assert_eq!(player.velocity, 0.0);
    }

    #[test]
    fn dropped_player_lands_on_the_floor() {
        let mut sink = NullSink::default();
        let mut world = World::new();
        floor(&mut world, &mut sink);
        let mut player = Player::new(Vec3::new(0.0, 8.0, 0.0));
        player.velocity = -1.0;
        for _ in 0..240 {
            step(&mut world, &mut player, &SimConfig::default(), TICK, &mut sink);
        }
        // resting height is the cell above the floor plus the pad
        assert!((player.position.y - 1.9).abs() < 1e-4);
        assert_eq!(player.velocity, 0.0);
    }

    #[test]
    fn jump_arc_returns_to_rest() {
        let cfg = SimConfig::default();
        let mut sink = NullSink::default();
        let mut world = World::new();
        floor(&mut world, &mut sink);
        let mut player = Player::new(Vec3::new(0.0, 1.9, 0.0));
        player.jump(cfg.jump_speed());
        let mut apex = player.position.y;
        for _ in 0..120 {
            step(&mut world, &mut player, &cfg, TICK, &mut sink);
            apex = apex.max(player.position.y);
        }
        // discrete integration undershoots the continuous apex slightly
        assert!(apex > 1.9 + 0.8 * cfg.max_jump_height);
        assert!(apex <= 1.9 + cfg.max_jump_height + 1e-4);
        assert!((player.position.y - 1.9).abs() < 1e-4);
        assert_eq!(player.velocity, 0.0);
    }

    #[test]
    fn oversized_frame_delta_is_clamped() {
        let cfg = SimConfig::default();
        let mut sink = NullSink::default();
        let mut world = World::new();
        let mut player = Player::new(Vec3::new(0.0, 0.0, 0.0));
        step(&mut world, &mut player, &cfg, 1000.0, &mut sink);
        // one clamped frame of free fall, not a thousand seconds of it
        let bound = cfg.terminal_velocity * cfg.max_frame_dt;
        assert!(player.position.y >= -bound);
        assert!(player.position.y < 0.0);
    }

    #[test]
    fn falling_block_settles_into_the_grid() {
        let mut sink = NullSink::default();
        let mut world = World::new();
        floor(&mut world, &mut sink);
        world.add_block(
            Voxel::falling(Vec3::new(0.0, 6.0, 0.0), 0.0, Material::Sand),
            true,
            &mut sink,
        );
        let mut player = Player::new(Vec3::new(50.0, 0.0, 50.0));
        for _ in 0..120 {
            step(&mut world, &mut player, &SimConfig::default(), TICK, &mut sink);
        }
        let rest = VoxelCoord::new(0, 1, 0);
        assert!(world.contains(rest));
        assert!(!world.is_falling(rest));
        assert_eq!(world.get(rest).unwrap().material, Material::Sand);
        assert!(world.falling_coords().is_empty());
    }

    #[test]
    fn walking_into_a_wall_stops_at_the_pad() {
        let mut sink = NullSink::default();
        let mut world = World::new();
        floor(&mut world, &mut sink);
        world.add_block(
            Voxel::fixed(VoxelCoord::new(2, 1, 0), Material::Brick),
            true,
            &mut sink,
        );
        world.add_block(
            Voxel::fixed(VoxelCoord::new(2, 2, 0), Material::Brick),
            true,
            &mut sink,
        );
        let mut player = Player::new(Vec3::new(0.0, 1.9, 0.0));
        // at yaw 0, sidestep intent [0, 1] moves along +x
        player.movement = [0, 1];
        for _ in 0..240 {
            step(&mut world, &mut player, &SimConfig::default(), TICK, &mut sink);
        }
        assert!((player.position.x - 1.1).abs() < 1e-3);
        assert!((player.position.z).abs() < 1e-4);
    }
}
