use hashbrown::HashMap;
use log::info;
use scree_blocks::Material;
use scree_world::{RenderSink, Voxel, VoxelCoord, World};

/// Terrain shape knobs, mirroring the CLI.
pub struct TerrainParams {
    /// Half-width of the ground slab; the slab spans `2 * half_width + 1`.
    pub half_width: i32,
    /// Skip the hills and generate only the slab.
    pub flat: bool,
}

const HILLS: u32 = 120;

/// Build the starting terrain: a grass-over-stone slab with randomly
/// placed tapering hills.
///
/// Everything is staged in a map first, so overlapping hills overwrite
/// each other cheaply instead of churning the world's replace path, then
/// inserted deferred; the first sector pass reveals the lot in one drain.
pub fn generate(world: &mut World, params: &TerrainParams, sink: &mut dyn RenderSink) {
    let n = params.half_width;
    let mut stage: HashMap<VoxelCoord, Material> = HashMap::new();
    for x in -n..=n {
        for z in -n..=n {
            stage.insert(VoxelCoord::new(x, -2, z), Material::Grass);
            stage.insert(VoxelCoord::new(x, -3, z), Material::Stone);
        }
    }
    if !params.flat {
        // hills stay away from the slab rim
        let o = (n - 10).max(1);
        for _ in 0..HILLS {
            let a = fastrand::i32(-o..=o);
            let b = fastrand::i32(-o..=o);
            let height = fastrand::i32(1..=6);
            let mut s = fastrand::i32(4..=8);
            let material = fastrand::choice([Material::Grass, Material::Sand, Material::Brick])
                .unwrap_or(Material::Grass);
            for y in -1..(height - 1) {
                for x in (a - s)..=(a + s) {
                    for z in (b - s)..=(b + s) {
                        if (x - a).pow(2) + (z - b).pow(2) > (s + 1).pow(2) {
                            continue;
                        }
                        if x.pow(2) + z.pow(2) < 25 {
                            // keep the spawn clearing open
                            continue;
                        }
                        stage.insert(VoxelCoord::new(x, y, z), material);
                    }
                }
                // hills taper toward the top
                s -= 1;
            }
        }
    }
    info!("terrain staged: {} blocks", stage.len());
    for (coord, material) in stage {
        world.add_block(Voxel::fixed(coord, material), false, sink);
    }
}
