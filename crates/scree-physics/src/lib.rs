//! Grid raycasting and collision resolution against closure-sampled occupancy.
#![forbid(unsafe_code)]

pub mod collide;
pub mod raycast;

pub use collide::{COLLIDE_PAD, resolve};
pub use raycast::{RAY_STEPS_PER_UNIT, RayError, RayHit, hit_test};
