use scree_geom::Vec3;
use scree_world::{Face, VoxelCoord, normalize};

/// Overlap, in world units, an entity may keep into a neighboring cell
/// before it is pushed back out. At 0 the slightest touch collides; past
/// 0.5 the entity falls through the grid entirely.
pub const COLLIDE_PAD: f32 = 0.1;

/// Resolve a desired position against the occupied grid.
///
/// `desired` is the entity's top cell (a height-2 player carries its head
/// here; layers scan downward). Each of the six faces is checked on its own
/// axis: when the position overlaps a neighboring occupied cell by more than
/// `COLLIDE_PAD`, it is pushed back along that axis until only the pad
/// remains. At most one corrective push happens per face.
///
/// Returns the corrected position and whether a floor or ceiling was
/// touched. The caller decides what contact means for its vertical
/// velocity; nothing is mutated here.
pub fn resolve<F>(desired: Vec3, height: u32, mut is_occupied: F) -> (Vec3, bool)
where
    F: FnMut(VoxelCoord) -> bool,
{
    let mut p = [desired.x, desired.y, desired.z];
    let np = normalize(desired);
    let cell = [np.x, np.y, np.z];
    let mut contact = false;
    for face in Face::ALL {
        let axis = face.axis();
        let sign = face.sign();
        // overlap past the cell center, measured toward this face
        let d = (p[axis] - cell[axis] as f32) * sign as f32;
        if d < COLLIDE_PAD {
            continue;
        }
        for dy in 0..height {
            let mut probe = cell;
            probe[1] -= dy as i32;
            probe[axis] += sign;
            if !is_occupied(VoxelCoord::new(probe[0], probe[1], probe[2])) {
                continue;
            }
            p[axis] -= (d - COLLIDE_PAD) * sign as f32;
            if face.is_vertical() {
                contact = true;
            }
            break;
        }
    }
    (Vec3::new(p[0], p[1], p[2]), contact)
}
