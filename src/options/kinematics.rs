use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Kinematics", inline)]
#[serde(default)]
/// Running-state simulation parameters.
pub struct KinematicsOptions {
    /// Primary shaft speed in radians per second.
    #[schemars(title = "Shaft Speed", range(min = 0.0, max = 30.0), extend("step" = 0.5))]
    pub primary_speed: f32,
    /// Seconds over which reciprocating motion fades in after starting.
    #[schemars(title = "Engage Time", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub engage_duration: f32,
}

impl Default for KinematicsOptions {
    fn default() -> Self {
        Self {
            primary_speed: 6.0,
            engage_duration: 0.5,
        }
    }
}
