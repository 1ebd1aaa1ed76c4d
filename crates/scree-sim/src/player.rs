use scree_blocks::Material;
use scree_geom::Vec3;
use scree_world::{VoxelCoord, normalize};

/// Mouse-look sensitivity, degrees per pixel of mouse travel.
const LOOK_SENSITIVITY: f32 = 0.15;

/// The player's point of view, motion intent, and hotbar.
///
/// `position` is the continuous position of the head cell; the collision
/// body hangs downward from it. Look angles are degrees, yaw turning in the
/// xz plane and pitch clamped to straight up/down.
#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub position: Vec3,
    /// Vertical velocity, units per second. Zero exactly when supported.
    pub velocity: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Held movement keys as intent: `[forward/back, left/right]`,
    /// each -1, 0, or 1. Refreshed from input every frame.
    pub movement: [i32; 2],
    hotbar_index: usize,
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            movement: [0, 0],
            hotbar_index: 0,
        }
    }

    /// Walking direction in the xz plane for the current intent, unit
    /// length, or zero when no movement keys are held. Strafe intent is
    /// folded into the heading as an angle so diagonals are not faster.
    pub fn motion_vector(&self) -> Vec3 {
        if self.movement == [0, 0] {
            return Vec3::ZERO;
        }
        let strafe = (self.movement[0] as f32)
            .atan2(self.movement[1] as f32)
            .to_degrees();
        let angle = (self.yaw + strafe).to_radians();
        Vec3::new(angle.cos(), 0.0, angle.sin())
    }

    /// Where the eyes point, unit length.
    pub fn look_vector(&self) -> Vec3 {
        let pitch = self.pitch.to_radians();
        let heading = (self.yaw - 90.0).to_radians();
        Vec3::new(
            heading.cos() * pitch.cos(),
            pitch.sin(),
            heading.sin() * pitch.cos(),
        )
    }

    /// Apply a mouse delta to the look angles.
    pub fn turn(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * LOOK_SENSITIVITY;
        self.pitch = (self.pitch + dy * LOOK_SENSITIVITY).clamp(-90.0, 90.0);
    }

    /// Leave the ground, if on it. Being supported shows up as exactly zero
    /// vertical velocity, so a mid-air press does nothing.
    pub fn jump(&mut self, jump_speed: f32) {
        if self.velocity == 0.0 {
            self.velocity = jump_speed;
        }
    }

    pub fn select_slot(&mut self, index: usize) {
        self.hotbar_index = index % Material::PLACEABLE.len();
    }

    pub fn selected_material(&self) -> Material {
        Material::PLACEABLE[self.hotbar_index]
    }

    /// True when `cell` sits in the xz column the player occupies.
    pub fn stands_over(&self, cell: VoxelCoord) -> bool {
        let head = normalize(self.position);
        cell.x == head.x && cell.z == head.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn forward_intent_walks_where_the_eyes_point() {
        let mut p = Player::new(Vec3::ZERO);
        p.yaw = 37.0;
        p.movement = [-1, 0];
        let m = p.motion_vector();
        let l = p.look_vector();
        assert!(approx(m.x, l.x));
        assert!(approx(m.z, l.z));
        assert_eq!(m.y, 0.0);
    }

    #[test]
    fn idle_intent_is_zero_motion() {
        let p = Player::new(Vec3::ZERO);
        assert_eq!(p.motion_vector(), Vec3::ZERO);
    }

    #[test]
    fn diagonal_motion_is_unit_length() {
        let mut p = Player::new(Vec3::ZERO);
        p.movement = [-1, 1];
        assert!(approx(p.motion_vector().length(), 1.0));
    }

    #[test]
    fn pitch_clamps_at_straight_up_and_down() {
        let mut p = Player::new(Vec3::ZERO);
        p.turn(0.0, 100000.0);
        assert_eq!(p.pitch, 90.0);
        p.turn(0.0, -1000000.0);
        assert_eq!(p.pitch, -90.0);
    }

    #[test]
    fn looking_straight_up_points_up() {
        let mut p = Player::new(Vec3::ZERO);
        p.pitch = 90.0;
        let l = p.look_vector();
        assert!(approx(l.y, 1.0));
        assert!(l.x.abs() < 1e-5);
        assert!(l.z.abs() < 1e-5);
    }

    #[test]
    fn jump_requires_support() {
        let mut p = Player::new(Vec3::ZERO);
        p.jump(6.0);
        assert_eq!(p.velocity, 6.0);
        p.jump(6.0);
        assert_eq!(p.velocity, 6.0);
        p.velocity = -3.0;
        p.jump(6.0);
        assert_eq!(p.velocity, -3.0);
    }

    #[test]
    fn hotbar_selection_wraps() {
        let mut p = Player::new(Vec3::ZERO);
        assert_eq!(p.selected_material(), Material::PLACEABLE[0]);
        p.select_slot(1);
        assert_eq!(p.selected_material(), Material::PLACEABLE[1]);
        p.select_slot(Material::PLACEABLE.len());
        assert_eq!(p.selected_material(), Material::PLACEABLE[0]);
    }

    #[test]
    fn stands_over_ignores_height() {
        let p = Player::new(Vec3::new(0.3, 12.0, -0.4));
        assert!(p.stands_over(VoxelCoord::new(0, 2, 0)));
        assert!(p.stands_over(VoxelCoord::new(0, -5, 0)));
        assert!(!p.stands_over(VoxelCoord::new(1, 2, 0)));
    }
}
