use scree_geom::Vec3;
use scree_world::{VoxelCoord, normalize};
use thiserror::Error;

/// Sub-voxel samples taken per unit of ray distance.
pub const RAY_STEPS_PER_UNIT: u32 = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RayError {
    #[error("ray direction has zero length")]
    DegenerateDirection,
}

/// Outcome of a hit test: the first occupied cell on the ray, if any, and
/// the last empty cell sampled before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayHit {
    pub hit: Option<VoxelCoord>,
    pub previous: VoxelCoord,
}

/// Walk a ray from `origin` along `dir` in fixed 1/8-unit samples and report
/// the first occupied cell, together with the cell sampled just before it.
///
/// `previous` starts as the origin's own cell, so the cell the viewer stands
/// in is never reported and repeated samples inside one cell never
/// re-trigger. A zero `max_distance` therefore yields no hit and
/// `previous == normalize(origin)`. When the ray runs out, `previous` is the
/// last cell visited; callers use it to drop a new block in the air at the
/// end of the ray.
pub fn hit_test<F>(
    origin: Vec3,
    dir: Vec3,
    max_distance: u32,
    mut is_occupied: F,
) -> Result<RayHit, RayError>
where
    F: FnMut(VoxelCoord) -> bool,
{
    if dir.length_squared() < 1e-12 {
        return Err(RayError::DegenerateDirection);
    }
    let step = dir.normalized() / RAY_STEPS_PER_UNIT as f32;
    let mut p = origin;
    let mut previous = normalize(origin);
    for _ in 0..max_distance * RAY_STEPS_PER_UNIT {
        let cell = normalize(p);
        if cell != previous && is_occupied(cell) {
            return Ok(RayHit {
                hit: Some(cell),
                previous,
            });
        }
        previous = cell;
        p += step;
    }
    Ok(RayHit {
        hit: None,
        previous,
    })
}
