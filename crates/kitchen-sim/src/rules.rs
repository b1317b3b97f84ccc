use serde::{Deserialize, Serialize};

/// Timers for the world's state transitions, in ticks or interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Chop interactions that turn an unchopped lettuce into a chopped one.
    pub chop_steps: u32,
    /// Ticks on a pan until beef is done.
    pub cook_done: u32,
    /// Ticks on a pan until beef is overcooked.
    pub cook_overcooked: u32,
    /// Ticks on a pan at which an overcooked beef catches fire.
    pub cook_fire: u32,
    /// Extinguisher interactions needed to put out a fire.
    pub fire_put_steps: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            chop_steps: 3,
            cook_done: 10,
            cook_overcooked: 30,
            cook_fire: 45,
            fire_put_steps: 5,
        }
    }
}
