use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Static key/fill/rim rig plus ambient and environment terms.
pub struct LightingOptions {
    /// Key light intensity.
    #[schemars(title = "Key Light", range(min = 0.0, max = 3.5), extend("step" = 0.05))]
    pub key_intensity: f32,
    /// Fill light intensity.
    #[schemars(title = "Fill Light", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub fill_intensity: f32,
    /// Rim (back) light intensity.
    #[schemars(title = "Rim Light", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub rim_intensity: f32,
    /// Flat ambient term.
    #[schemars(title = "Ambient", range(min = 0.0, max = 0.7), extend("step" = 0.01))]
    pub ambient: f32,
    /// Strength of the sky/ground environment reflection.
    #[schemars(title = "Environment", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub env_strength: f32,
    /// Fresnel exponent for the rim term.
    #[schemars(title = "Rim Power", range(min = 0.5, max = 10.0), extend("step" = 0.1))]
    pub rim_power: f32,
    /// Direction the key light travels toward (world space).
    #[schemars(skip)]
    pub key_dir: [f32; 3],
    /// Direction the fill light travels toward (world space).
    #[schemars(skip)]
    pub fill_dir: [f32; 3],
    /// Direction the rim light travels toward (world space).
    #[schemars(skip)]
    pub rim_dir: [f32; 3],
    /// Key light color.
    #[schemars(skip)]
    pub key_color: [f32; 3],
    /// Environment color above the horizon.
    #[schemars(skip)]
    pub sky_color: [f32; 3],
    /// Environment color below the horizon.
    #[schemars(skip)]
    pub ground_color: [f32; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            key_intensity: 2.2,
            fill_intensity: 0.7,
            rim_intensity: 0.9,
            ambient: 0.18,
            env_strength: 0.45,
            rim_power: 3.0,
            key_dir: [-0.5, -0.8, -0.4],
            fill_dir: [0.7, -0.3, -0.5],
            rim_dir: [0.1, -0.4, 0.9],
            key_color: [1.0, 0.96, 0.9],
            sky_color: [0.55, 0.6, 0.7],
            ground_color: [0.12, 0.1, 0.09],
        }
    }
}
