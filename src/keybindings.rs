//! Customizable keybindings for the paint editor.
//!
//! Keys map to [`EditorCommand`]s. Undo needs Ctrl (or Cmd on macOS) without
//! Shift; every other binding fires only without Ctrl/Alt/Cmd, so Ctrl+E
//! never toggles erase.

use serde::{Deserialize, Serialize};

use crate::tools::ToolMode;

/// Keys the editor can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Enter,
    Escape,
    Space,
    Tab,
    Backspace,
    Delete,
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Cmd on macOS, Windows key elsewhere
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    /// Ctrl or Cmd.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    fn any(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Editor action triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Undo,
    FinishLasso,
    CancelLasso,
    SelectTool(ToolMode),
    ToggleErase,
}

/// Keybinding configuration for the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Undo, pressed together with Ctrl or Cmd
    pub undo: KeyCode,
    /// Close the lasso polygon and fill it
    pub finish_lasso: KeyCode,
    /// Discard the lasso points placed so far
    pub cancel_lasso: KeyCode,
    pub tool_select: KeyCode,
    pub tool_brush: KeyCode,
    pub tool_lasso: KeyCode,
    pub toggle_erase: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            undo: KeyCode::Z,
            finish_lasso: KeyCode::Enter,
            cancel_lasso: KeyCode::Escape,
            tool_select: KeyCode::V,
            tool_brush: KeyCode::B,
            tool_lasso: KeyCode::L,
            toggle_erase: KeyCode::E,
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the command for a key press, if any.
    pub fn command_for(&self, key: KeyCode, modifiers: Modifiers) -> Option<EditorCommand> {
        if modifiers.command() {
            // Shift+Ctrl/Cmd+Z is the platform redo chord
            return (key == self.undo && !modifiers.shift).then_some(EditorCommand::Undo);
        }
        if modifiers.any() {
            return None;
        }

        if key == self.finish_lasso {
            Some(EditorCommand::FinishLasso)
        } else if key == self.cancel_lasso {
            Some(EditorCommand::CancelLasso)
        } else if key == self.toggle_erase {
            Some(EditorCommand::ToggleErase)
        } else {
            self.tool_for_key(key).map(EditorCommand::SelectTool)
        }
    }

    /// Get the tool that corresponds to a key press, if any.
    pub fn tool_for_key(&self, key: KeyCode) -> Option<ToolMode> {
        ToolMode::all()
            .iter()
            .copied()
            .find(|tool| self.key_for_tool(*tool) == key)
    }

    /// Get the hotkey for a specific tool.
    pub fn key_for_tool(&self, tool: ToolMode) -> KeyCode {
        match tool {
            ToolMode::Select => self.tool_select,
            ToolMode::Brush => self.tool_brush,
            ToolMode::Lasso => self.tool_lasso,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_needs_ctrl_or_meta() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.command_for(KeyCode::Z, Modifiers::ctrl()), Some(EditorCommand::Undo));
        assert_eq!(bindings.command_for(KeyCode::Z, Modifiers::meta()), Some(EditorCommand::Undo));
        assert_eq!(bindings.command_for(KeyCode::Z, Modifiers::NONE), None);
    }

    #[test]
    fn test_plain_bindings_ignore_modified_presses() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.command_for(KeyCode::Enter, Modifiers::NONE),
            Some(EditorCommand::FinishLasso)
        );
        assert_eq!(
            bindings.command_for(KeyCode::Escape, Modifiers::NONE),
            Some(EditorCommand::CancelLasso)
        );
        assert_eq!(
            bindings.command_for(KeyCode::B, Modifiers::NONE),
            Some(EditorCommand::SelectTool(ToolMode::Brush))
        );
        assert_eq!(bindings.command_for(KeyCode::E, Modifiers::ctrl()), None);

        let shifted = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        assert_eq!(bindings.command_for(KeyCode::E, shifted), Some(EditorCommand::ToggleErase));
    }

    #[test]
    fn test_shifted_undo_chord_is_not_undo() {
        let bindings = KeyBindings::default();
        let redo_chord = Modifiers {
            shift: true,
            ..Modifiers::ctrl()
        };
        assert_eq!(bindings.command_for(KeyCode::Z, redo_chord), None);
        assert_eq!(
            bindings.command_for(KeyCode::Z, Modifiers { shift: true, ..Modifiers::meta() }),
            None
        );
    }

    #[test]
    fn test_tool_hotkeys() {
        let bindings = KeyBindings {
            tool_lasso: KeyCode::P,
            ..KeyBindings::default()
        };
        assert_eq!(bindings.tool_for_key(KeyCode::P), Some(ToolMode::Lasso));
        assert_eq!(bindings.tool_for_key(KeyCode::L), None);
        assert_eq!(bindings.key_for_tool(ToolMode::Brush), KeyCode::B);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let bindings: KeyBindings = serde_json::from_str(r#"{"tool_brush": "D"}"#).expect("parse");
        assert_eq!(bindings.tool_brush, KeyCode::D);
        assert_eq!(bindings.undo, KeyCode::Z);
    }
}
