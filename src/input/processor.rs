//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! drag state) and the key-binding map. It is the only thing that sits
//! between raw window events and the engine's
//! [`execute`](crate::engine::AssemblyEngine::execute) method.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use crate::engine::command::AssemblyCommand;

/// Maps physical key strings to [`AssemblyCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"ArrowRight"`, `"KeyQ"`, `"Digit3"`, etc. In TOML:
///
/// ```toml
/// [keybindings]
/// ArrowRight = "next_stage"
/// Digit3 = "stage_3"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the subset of [`AssemblyCommand`] that can be
/// key-bound.
///
/// Stored as a `snake_case` string; stage jumps are written `stage_N` with
/// `N` counted from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeyCommandTag {
    /// Step forward one stage.
    NextStage,
    /// Step back one stage.
    PreviousStage,
    /// Jump to the exploded stage.
    FirstStage,
    /// Jump to the fully assembled stage.
    FinalStage,
    /// Jump to a zero-based stage.
    Stage(u8),
    /// Toggle turntable auto-rotation.
    ToggleAutoRotate,
    /// Ease the user orbit and zoom back to neutral.
    ResetView,
}

impl KeyCommandTag {
    /// Convert to the corresponding [`AssemblyCommand`].
    fn to_command(self) -> AssemblyCommand {
        match self {
            Self::NextStage => AssemblyCommand::NextStage,
            Self::PreviousStage => AssemblyCommand::PreviousStage,
            Self::FirstStage => AssemblyCommand::FirstStage,
            Self::FinalStage => AssemblyCommand::FinalStage,
            Self::Stage(index) => AssemblyCommand::SetStage(i64::from(index)),
            Self::ToggleAutoRotate => AssemblyCommand::ToggleAutoRotate,
            Self::ResetView => AssemblyCommand::ResetView,
        }
    }
}

impl fmt::Display for KeyCommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NextStage => f.write_str("next_stage"),
            Self::PreviousStage => f.write_str("previous_stage"),
            Self::FirstStage => f.write_str("first_stage"),
            Self::FinalStage => f.write_str("final_stage"),
            Self::Stage(index) => write!(f, "stage_{}", u16::from(*index) + 1),
            Self::ToggleAutoRotate => f.write_str("toggle_auto_rotate"),
            Self::ResetView => f.write_str("reset_view"),
        }
    }
}

impl FromStr for KeyCommandTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next_stage" => Ok(Self::NextStage),
            "previous_stage" => Ok(Self::PreviousStage),
            "first_stage" => Ok(Self::FirstStage),
            "final_stage" => Ok(Self::FinalStage),
            "toggle_auto_rotate" => Ok(Self::ToggleAutoRotate),
            "reset_view" => Ok(Self::ResetView),
            other => other
                .strip_prefix("stage_")
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|&n| n >= 1)
                .map(|n| Self::Stage(n - 1))
                .ok_or_else(|| format!("unknown key command '{other}'")),
        }
    }
}

impl TryFrom<String> for KeyCommandTag {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyCommandTag> for String {
    fn from(tag: KeyCommandTag) -> Self {
        tag.to_string()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::from([
            ("ArrowRight".into(), KeyCommandTag::NextStage),
            ("ArrowLeft".into(), KeyCommandTag::PreviousStage),
            ("Home".into(), KeyCommandTag::FirstStage),
            ("End".into(), KeyCommandTag::FinalStage),
            ("KeyR".into(), KeyCommandTag::ToggleAutoRotate),
            ("KeyQ".into(), KeyCommandTag::ResetView),
        ]);
        for index in 0..8u8 {
            let _ = bindings
                .insert(format!("Digit{}", index + 1), KeyCommandTag::Stage(index));
        }
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<AssemblyCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, returning the previous binding.
    pub fn bind(
        &mut self,
        key: impl Into<String>,
        tag: KeyCommandTag,
    ) -> Option<KeyCommandTag> {
        self.bindings.insert(key.into(), tag)
    }
}

/// Converts raw window events into [`AssemblyCommand`]s.
///
/// Left-drag orbits, scroll zooms. Drag start and end are reported so the
/// camera can pause auto-rotation while the user holds it.
pub struct InputProcessor {
    /// Last cursor position in physical pixels, if known.
    cursor: Option<Vec2>,
    /// Whether the primary mouse button is currently held.
    mouse_pressed: bool,
    /// Key string → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_bindings(KeyBindings::default())
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            cursor: None,
            mouse_pressed: false,
            key_bindings,
        }
    }

    /// Whether the primary mouse button is pressed.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Replace the key bindings.
    pub fn set_key_bindings(&mut self, key_bindings: KeyBindings) {
        self.key_bindings = key_bindings;
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<AssemblyCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<AssemblyCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                let pos = Vec2::new(x, y);
                let previous = self.cursor.replace(pos);
                match previous {
                    Some(prev) if self.mouse_pressed => {
                        Some(AssemblyCommand::OrbitCamera { delta: pos - prev })
                    }
                    _ => None,
                }
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed,
            } => {
                if pressed == self.mouse_pressed {
                    return None;
                }
                self.mouse_pressed = pressed;
                Some(AssemblyCommand::SetDragging(pressed))
            }
            InputEvent::MouseButton { .. } => None,
            InputEvent::Scroll { delta } => {
                Some(AssemblyCommand::ZoomCamera { delta })
            }
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}
