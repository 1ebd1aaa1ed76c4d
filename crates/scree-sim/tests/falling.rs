//! Falling-block behavior over real simulation frames: settle timing
//! against the closed-form prediction, terminal velocity, and stacking.

use scree_blocks::Material;
use scree_geom::Vec3;
use scree_sim::{Player, SimConfig, step};
use scree_world::{NullSink, Voxel, VoxelCoord, World};

const TICK: f32 = 1.0 / 60.0;

fn parked_player() -> Player {
    Player::new(Vec3::new(100.0, 0.0, 100.0))
}

#[test]
fn drop_settles_when_the_continuous_solution_says_it_should() {
    let cfg = SimConfig::default();
    let mut sink = NullSink::default();
    let mut world = World::new();
    for x in -3..=3 {
        for z in -3..=3 {
            world.add_block(
                Voxel::fixed(VoxelCoord::new(x, 0, z), Material::Stone),
                true,
                &mut sink,
            );
        }
    }
    world.add_block(
        Voxel::falling(Vec3::new(0.0, 6.0, 0.0), 0.0, Material::Sand),
        true,
        &mut sink,
    );
    let mut player = parked_player();

    let mut settled_at = None;
    for frame in 1..=120 {
        step(&mut world, &mut player, &cfg, TICK, &mut sink);
        if world.falling_coords().is_empty() {
            settled_at = Some(frame);
            break;
        }
    }

    // falling from y=6 to a rest height of 0.9 under g=20
    let drop = 6.0 - 0.9;
    let predicted = (2.0 * drop / cfg.gravity).sqrt() / TICK;
    let settled_at = settled_at.expect("block never settled") as f32;
    assert!(
        (settled_at - predicted).abs() <= 1.0,
        "settled at frame {settled_at}, predicted {predicted}"
    );

    let rest = VoxelCoord::new(0, 1, 0);
    let voxel = world.get(rest).expect("block missing after settling");
    assert!(!voxel.is_falling());
    assert_eq!(voxel.material, Material::Sand);
    assert!(world.is_shown(rest));
}

#[test]
fn fall_speed_clamps_at_terminal_velocity() {
    let cfg = SimConfig::default();
    let mut sink = NullSink::default();
    let mut world = World::new();
    world.add_block(
        Voxel::falling(Vec3::new(0.0, 300.0, 0.0), 0.0, Material::Sand),
        true,
        &mut sink,
    );
    let mut player = parked_player();

    // 4 seconds of free fall, well past the 2.5s needed to reach terminal
    for _ in 0..240 {
        step(&mut world, &mut player, &cfg, TICK, &mut sink);
    }

    let coords = world.falling_coords();
    assert_eq!(coords.len(), 1);
    let fall = world.get(coords[0]).unwrap().fall.unwrap();
    assert_eq!(fall.velocity, -cfg.terminal_velocity);
    assert!(fall.pos.y < 300.0 - 100.0);
}

#[test]
fn falling_blocks_stack_on_each_other() {
    let cfg = SimConfig::default();
    let mut sink = NullSink::default();
    let mut world = World::new();
    world.add_block(
        Voxel::fixed(VoxelCoord::new(0, 0, 0), Material::Stone),
        true,
        &mut sink,
    );
    world.add_block(
        Voxel::fixed(VoxelCoord::new(0, 1, 0), Material::Stone),
        true,
        &mut sink,
    );
    world.add_block(
        Voxel::falling(Vec3::new(0.0, 6.0, 0.0), 0.0, Material::Brick),
        true,
        &mut sink,
    );
    let mut player = parked_player();

    for _ in 0..120 {
        step(&mut world, &mut player, &cfg, TICK, &mut sink);
    }

    let top = VoxelCoord::new(0, 2, 0);
    let voxel = world.get(top).expect("block did not stack on the pillar");
    assert!(!voxel.is_falling());
    assert_eq!(voxel.material, Material::Brick);
    assert!(world.falling_coords().is_empty());
}

#[test]
fn two_dropped_blocks_land_in_separate_cells_of_one_column() {
    let cfg = SimConfig::default();
    let mut sink = NullSink::default();
    let mut world = World::new();
    world.add_block(
        Voxel::fixed(VoxelCoord::new(0, 0, 0), Material::Stone),
        true,
        &mut sink,
    );
    world.add_block(
        Voxel::falling(Vec3::new(0.0, 4.0, 0.0), 0.0, Material::Sand),
        true,
        &mut sink,
    );
    world.add_block(
        Voxel::falling(Vec3::new(0.0, 8.0, 0.0), 0.0, Material::Sand),
        true,
        &mut sink,
    );
    let mut player = parked_player();

    for _ in 0..180 {
        step(&mut world, &mut player, &cfg, TICK, &mut sink);
    }

    assert!(world.falling_coords().is_empty());
    assert!(world.contains(VoxelCoord::new(0, 1, 0)));
    assert!(world.contains(VoxelCoord::new(0, 2, 0)));
    assert_eq!(world.len(), 3);
}
