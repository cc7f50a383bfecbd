use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Part transition timing.
pub struct AnimationOptions {
    /// Seconds for a part to travel into its assembled placement.
    #[schemars(title = "Assemble Duration", range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    pub assemble_duration: f32,
    /// Seconds for a part to travel back out to its exploded placement.
    #[schemars(title = "Disassemble Duration", range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    pub disassemble_duration: f32,
    /// Multiplier on each part's authored start delay. 0 disables staggering.
    #[schemars(title = "Stagger", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub delay_scale: f32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            assemble_duration: 2.0,
            disassemble_duration: 1.2,
            delay_scale: 1.0,
        }
    }
}
