//! Configuration file support for the paint editor.
//!
//! This module provides serialization and deserialization of editor settings,
//! allowing users to keep their preferences between sessions.

use serde::{Deserialize, Serialize};

use crate::color::PaintColor;
use crate::compositing::{BlendStyle, CompositeSettings};
use crate::constants::{
    DEFAULT_BRUSH_WIDTH, DEFAULT_COLOR, DEFAULT_HISTORY_DEPTH, DEFAULT_HOVER_OPACITY, DEFAULT_OPACITY,
};
use crate::history::HistoryConfig;
use crate::keybindings::KeyBindings;
use crate::region::OverlayStyle;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration that can be saved and loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindings,
}

fn default_app_name() -> String {
    "Livery".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Color selected in the picker at startup
    pub default_color: PaintColor,
    /// Global paint opacity, 0.0-1.0
    pub opacity: f32,
    pub blend_style: BlendStyle,
    /// Brush width in logical pixels
    pub brush_width: f32,
    /// Reject canvas clicks on detected parts; they are painted from the gallery
    pub lock_detected_parts: bool,
    /// Undo steps to keep; None keeps every step
    pub history_depth: Option<usize>,
    /// Opacity of the hover highlight
    pub hover_opacity: f32,
    pub anti_alias: bool,
    /// Log verbosity level
    pub log_level: LogLevel,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_color: PaintColor::from_hex(DEFAULT_COLOR).unwrap_or(PaintColor::new(0x4f, 0x46, 0xe5)),
            opacity: DEFAULT_OPACITY,
            blend_style: BlendStyle::default(),
            brush_width: DEFAULT_BRUSH_WIDTH,
            lock_detected_parts: true,
            history_depth: Some(DEFAULT_HISTORY_DEPTH),
            hover_opacity: DEFAULT_HOVER_OPACITY,
            anti_alias: true,
            log_level: LogLevel::default(),
        }
    }
}

impl Preferences {
    /// Set the opacity, clamped to 0.0-1.0.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = clamp_unit(opacity, DEFAULT_OPACITY);
    }

    /// Bring loaded values back into range.
    fn normalize(&mut self) {
        self.set_opacity(self.opacity);
        self.hover_opacity = clamp_unit(self.hover_opacity, DEFAULT_HOVER_OPACITY);
        if !(self.brush_width.is_finite() && self.brush_width > 0.0) {
            self.brush_width = DEFAULT_BRUSH_WIDTH;
        }
    }

    pub fn composite_settings(&self) -> CompositeSettings {
        CompositeSettings {
            opacity: self.opacity,
            blend: self.blend_style,
            overlay: OverlayStyle {
                hover_opacity: self.hover_opacity,
                anti_alias: self.anti_alias,
            },
        }
    }

    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            max_depth: self.history_depth,
        }
    }
}

fn clamp_unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

impl EditorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: Preferences::default(),
            keybindings: KeyBindings::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.preferences.normalize();
        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "livery-config.json"
    }

    /// Get the default config file path for auto-load/save.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("livery").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home| {
                home.join(".config")
                    .join("livery")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Try to load configuration from a file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Option<Self> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to(&path)
    }

    /// Save configuration to a file, creating parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::KeyCode;

    #[test]
    fn test_defaults_round_trip() {
        let config = EditorConfig::new();
        let json = config.to_json().expect("serialize");
        assert!(json.contains("\"default_color\": \"#4f46e5\""));
        assert!(json.contains("\"blend_style\": \"matte\""));
        assert_eq!(EditorConfig::from_json(&json).expect("parse"), config);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let json = r#"{"version": 99}"#;
        assert!(matches!(
            EditorConfig::from_json(json),
            Err(ConfigError::VersionTooNew { file_version: 99, .. })
        ));
    }

    #[test]
    fn test_partial_file_fills_defaults_and_clamps() {
        let json = r##"{
            "version": 1,
            "preferences": {"opacity": 4.5, "blend_style": "film", "history_depth": null, "default_color": "#ABC"},
            "keybindings": {"undo": "U"}
        }"##;
        let config = EditorConfig::from_json(json).expect("parse");
        assert_eq!(config.app_name, "Livery");
        assert_eq!(config.preferences.opacity, 1.0);
        assert_eq!(config.preferences.blend_style, BlendStyle::Film);
        assert_eq!(config.preferences.history_depth, None);
        assert_eq!(config.preferences.default_color, PaintColor::new(0xaa, 0xbb, 0xcc));
        assert!(config.preferences.lock_detected_parts);
        assert_eq!(config.keybindings.undo, KeyCode::U);
        assert_eq!(config.keybindings.tool_lasso, KeyCode::L);
    }

    #[test]
    fn test_bad_color_is_a_parse_error() {
        let json = r#"{"version": 1, "preferences": {"default_color": "teal"}}"#;
        assert!(matches!(EditorConfig::from_json(json), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
        assert_eq!(LogLevel::default().name(), "Info");
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("livery-config-test-{}", std::process::id()));
        let path = dir.join("nested").join(EditorConfig::default_filename());

        let mut config = EditorConfig::new();
        config.preferences.set_opacity(0.25);
        config.save_to(&path).expect("save");
        assert_eq!(EditorConfig::load_from(&path), Some(config));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
