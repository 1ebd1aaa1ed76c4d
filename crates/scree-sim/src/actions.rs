use log::debug;
use scree_blocks::Material;
use scree_geom::Vec3;
use scree_physics::hit_test;
use scree_world::{RenderSink, Voxel, VoxelCoord, World};

use crate::config::SimConfig;
use crate::player::Player;

/// Break the block under the crosshair.
///
/// Returns the removed material, or `None` when nothing breakable is in
/// reach. Stone stays put no matter how hard it is clicked.
pub fn break_block(
    world: &mut World,
    player: &Player,
    cfg: &SimConfig,
    sink: &mut dyn RenderSink,
) -> Option<Material> {
    let ray = hit_test(player.position, player.look_vector(), cfg.reach, |c| {
        world.contains(c)
    })
    .ok()?;
    let hit = ray.hit?;
    let material = world.get(hit)?.material;
    if !material.breakable() {
        return None;
    }
    world.remove_block(hit, true, sink).ok()?;
    debug!("break {:?} at {:?}", material, hit);
    Some(material)
}

/// Place the selected material with the crosshair, returning the cell it
/// landed in.
///
/// A hit ray builds against the struck face, in the empty cell the ray
/// passed through last. Placing into the player's own column while grounded
/// boosts the player on top of the new block. A ray that hits nothing drops
/// the block in free fall at the end of its reach.
pub fn place_block(
    world: &mut World,
    player: &mut Player,
    cfg: &SimConfig,
    sink: &mut dyn RenderSink,
) -> Option<VoxelCoord> {
    let ray = hit_test(player.position, player.look_vector(), cfg.reach, |c| {
        world.contains(c)
    })
    .ok()?;
    let material = player.selected_material();
    let target = ray.previous;
    if ray.hit.is_some() {
        world.add_block(Voxel::fixed(target, material), true, sink);
        debug!("place {:?} at {:?}", material, target);
        if player.stands_over(target) && player.velocity == 0.0 {
            player.position += Vec3::UP;
            player.velocity = cfg.jump_speed();
        }
    } else {
        world.add_block(Voxel::falling(target.center(), 0.0, material), true, sink);
        debug!("drop {:?} at {:?}", material, target);
    }
    Some(target)
}
