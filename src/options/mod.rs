//! Centralized viewer options with TOML preset support.
//!
//! All tweakable settings (camera, part animation, kinematics, lighting,
//! display, keybindings) live here and serialize to/from TOML.

mod animation;
mod camera;
mod display;
mod kinematics;
mod lighting;

use std::path::Path;

pub use animation::AnimationOptions;
pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use kinematics::KinematicsOptions;
pub use lighting::LightingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VizError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection, choreography and control parameters.
    pub camera: CameraOptions,
    /// Part transition timing.
    pub animation: AnimationOptions,
    /// Running-state simulation parameters.
    pub kinematics: KinematicsOptions,
    /// Lighting rig parameters.
    pub lighting: LightingOptions,
    /// Frame pacing and clear color.
    pub display: DisplayOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeyBindings,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`VizError::Io`] if the file cannot be read,
    /// [`VizError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, VizError> {
        let content = std::fs::read_to_string(path).map_err(VizError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`VizError::OptionsParse`] if `content` is not valid options TOML.
    pub fn from_toml(content: &str) -> Result<Self, VizError> {
        toml::from_str(content).map_err(|e| VizError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`VizError::OptionsParse`] if serialization fails, [`VizError::Io`]
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), VizError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VizError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VizError::Io)?;
        }
        std::fs::write(path, content).map_err(VizError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::command::AssemblyCommand;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[animation]
assemble_duration = 3.0
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.animation.assemble_duration, 3.0);
        // Everything else should be default
        assert_eq!(opts.animation.disassemble_duration, 1.2);
        assert_eq!(opts.camera.transition_duration, 1.5);
        assert_eq!(opts.camera.auto_rotate_speed, 0.8);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Options::from_toml("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, VizError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("ArrowRight"),
            Some(AssemblyCommand::NextStage)
        );
        assert_eq!(
            opts.keybindings.lookup("Digit3"),
            Some(AssemblyCommand::SetStage(2))
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn save_then_load_preserves_overrides() {
        let dir = std::env::temp_dir()
            .join(format!("motorviz-options-{}", std::process::id()));
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.kinematics.primary_speed = 9.5;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("animation"));
        assert!(props.contains_key("kinematics"));
        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("display"));
        assert!(!props.contains_key("keybindings"));

        let lighting = &props["lighting"]["properties"];
        assert!(lighting.get("key_intensity").is_some());
        assert!(lighting.get("key_dir").is_none());
    }
}
