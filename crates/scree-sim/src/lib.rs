//! Player state, the per-frame physics step, and click-driven edit rules.
#![forbid(unsafe_code)]

pub mod actions;
pub mod config;
pub mod player;
pub mod step;

pub use actions::{break_block, place_block};
pub use config::SimConfig;
pub use player::Player;
pub use step::{step, step_blocks};
