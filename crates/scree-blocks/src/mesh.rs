use scree_geom::Vec3;

use crate::material::{FaceTiles, Material};

/// Tiles per row (and per column) of the shared texture atlas.
pub const ATLAS_GRID: u32 = 4;

const HALF: f32 = 0.5;

/// Corner UVs of one atlas tile, wound to match `cube_vertices` corner order.
#[inline]
pub fn tile_uvs(tile: (u32, u32)) -> [f32; 8] {
    let m = 1.0 / ATLAS_GRID as f32;
    let du = tile.0 as f32 * m;
    let dv = tile.1 as f32 * m;
    [du, dv, du + m, dv, du + m, dv + m, du, dv + m]
}

/// Per-corner UVs for all six faces, `cube_vertices` face order.
pub fn tex_coords(material: Material) -> [f32; 48] {
    let FaceTiles { top, bottom, side } = material.tiles();
    let mut out = [0.0f32; 48];
    out[0..8].copy_from_slice(&tile_uvs(top));
    out[8..16].copy_from_slice(&tile_uvs(bottom));
    let side = tile_uvs(side);
    for i in 0..4 {
        out[16 + i * 8..24 + i * 8].copy_from_slice(&side);
    }
    out
}

/// The 24 corner positions of a unit cube centered at `c`, four per face.
///
/// Face order is top, bottom, left, right, front, back; `tex_coords` emits
/// UVs corner-for-corner in the same order.
pub fn cube_vertices(c: Vec3) -> [f32; 72] {
    let (x, y, z) = (c.x, c.y, c.z);
    let n = HALF;
    [
        // top (+y)
        x - n, y + n, z - n, x - n, y + n, z + n, x + n, y + n, z + n, x + n, y + n, z - n,
        // bottom (-y)
        x - n, y - n, z - n, x + n, y - n, z - n, x + n, y - n, z + n, x - n, y - n, z + n,
        // left (-x)
        x - n, y - n, z - n, x - n, y - n, z + n, x - n, y + n, z + n, x - n, y + n, z - n,
        // right (+x)
        x + n, y - n, z + n, x + n, y - n, z - n, x + n, y + n, z - n, x + n, y + n, z + n,
        // front (+z)
        x - n, y - n, z + n, x + n, y - n, z + n, x + n, y + n, z + n, x - n, y + n, z + n,
        // back (-z)
        x + n, y - n, z - n, x - n, y - n, z - n, x - n, y + n, z - n, x + n, y + n, z - n,
    ]
}

/// Geometry for one block, ready for a render sink to upload.
#[derive(Clone, Debug, PartialEq)]
pub struct CubeMesh {
    pub positions: [f32; 72],
    pub uvs: [f32; 48],
}

impl CubeMesh {
    pub fn build(center: Vec3, material: Material) -> Self {
        Self {
            positions: cube_vertices(center),
            uvs: tex_coords(material),
        }
    }
}
