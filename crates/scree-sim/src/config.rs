use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use scree_world::{QUEUE_BUDGET, SECTOR_PAD};

/// Physics and streaming tunables.
///
/// Every field has a standalone default, so a partial `scree.toml` works and
/// an absent one means stock behavior.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Downward acceleration, units per second squared.
    pub gravity: f32,
    /// Fastest fall speed, units per second.
    pub terminal_velocity: f32,
    /// Ground movement speed, units per second.
    pub walk_speed: f32,
    /// Height, in cells, a jump clears.
    pub max_jump_height: f32,
    /// Body height of the player, in cells.
    pub player_height: u32,
    /// Physics sub-steps per frame.
    pub substeps: u32,
    /// Longest frame delta the physics integrates in one go, seconds.
    pub max_frame_dt: f32,
    /// Block selection reach, in cells.
    pub reach: u32,
    /// Sector neighborhood radius kept visible around the player.
    pub sector_pad: i32,
    /// Per-frame budget for draining deferred visibility work, microseconds.
    pub queue_budget_us: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 20.0,
            terminal_velocity: 50.0,
            walk_speed: 5.0,
            max_jump_height: 1.0,
            player_height: 2,
            substeps: 8,
            max_frame_dt: 0.2,
            reach: 8,
            sector_pad: SECTOR_PAD,
            queue_budget_us: QUEUE_BUDGET.as_micros() as u64,
        }
    }
}

impl SimConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Ok(toml::from_str(&s)?)
    }

    /// Takeoff speed that tops out at `max_jump_height`.
    #[inline]
    pub fn jump_speed(&self) -> f32 {
        (2.0 * self.gravity * self.max_jump_height).sqrt()
    }

    #[inline]
    pub fn queue_budget(&self) -> Duration {
        Duration::from_micros(self.queue_budget_us)
    }
}
