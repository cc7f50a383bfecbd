use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection, choreography, and user control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Orbit sensitivity multiplier.
    #[schemars(title = "Orbit Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub orbit_speed: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Closest the eye may get to the origin.
    #[schemars(title = "Min Distance", range(min = 1.0, max = 10.0), extend("step" = 0.5))]
    pub min_distance: f32,
    /// Farthest the eye may get from the origin.
    #[schemars(title = "Max Distance", range(min = 5.0, max = 40.0), extend("step" = 0.5))]
    pub max_distance: f32,
    /// Largest user yaw offset either side of the stage pose, in degrees.
    #[schemars(title = "Max Orbit Yaw", range(min = 0.0, max = 180.0), extend("step" = 1.0))]
    pub max_orbit_yaw: f32,
    /// Largest user pitch offset either side of the stage pose, in degrees.
    #[schemars(title = "Max Orbit Pitch", range(min = 0.0, max = 80.0), extend("step" = 1.0))]
    pub max_orbit_pitch: f32,
    /// Whether ambient turntable rotation is on at startup.
    #[schemars(title = "Auto Rotate")]
    pub auto_rotate: bool,
    /// Ambient rotation rate in degrees per second.
    #[schemars(title = "Auto Rotate Speed", range(min = 0.0, max = 20.0), extend("step" = 0.1))]
    pub auto_rotate_speed: f32,
    /// Seconds to ease between stage poses.
    #[schemars(title = "Transition Duration", range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    pub transition_duration: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 40.0,
            znear: 0.1,
            zfar: 200.0,
            orbit_speed: 0.5,
            zoom_speed: 0.1,
            min_distance: 4.0,
            max_distance: 18.0,
            max_orbit_yaw: 35.0,
            max_orbit_pitch: 25.0,
            auto_rotate: true,
            auto_rotate_speed: 0.8,
            transition_duration: 1.5,
        }
    }
}
