use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Frame pacing and clear color.
pub struct DisplayOptions {
    /// Linear RGB clear color.
    #[schemars(skip)]
    pub background: [f32; 3],
    /// Frame rate cap. 0 renders every redraw.
    #[schemars(title = "Target FPS", range(min = 0, max = 240), extend("step" = 1))]
    pub target_fps: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            background: [0.045, 0.05, 0.06],
            target_fps: 60,
        }
    }
}
