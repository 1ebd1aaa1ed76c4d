//! Block materials, the shared texture atlas layout, and per-block cube geometry.
#![forbid(unsafe_code)]

pub mod material;
pub mod mesh;

pub use material::{FaceTiles, Material};
pub use mesh::{ATLAS_GRID, CubeMesh, cube_vertices, tex_coords, tile_uvs};
