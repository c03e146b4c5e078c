//! Configuration types and parsing.
//!
//! This module defines the toastline configuration schema. The Config type
//! is intended to be a stable schema that stays simple and
//! serialization-friendly; derived values (computed palettes, generated CSS)
//! live in `theme`.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use toml::Table;

use crate::error::{Error, Result};

/// Embedded default configuration TOML, compiled into the binary.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../../config.toml");

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Path where config was found, if any.
    pub source: Option<PathBuf>,
    /// Whether defaults were used (no config file found).
    pub used_defaults: bool,
}

/// Screen corner a toast stack is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl Position {
    /// All valid positions, used for validation messages and CLI help.
    pub const ALL: [Position; 4] = [
        Position::TopRight,
        Position::TopLeft,
        Position::BottomRight,
        Position::BottomLeft,
    ];

    /// Whether the stack grows downward from the top edge.
    pub fn is_top(self) -> bool {
        matches!(self, Position::TopRight | Position::TopLeft)
    }

    /// Whether the stack hugs the right edge.
    pub fn is_right(self) -> bool {
        matches!(self, Position::TopRight | Position::BottomRight)
    }

    /// The kebab-case name used in config files and CSS classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Position::TopRight => "top-right",
            Position::TopLeft => "top-left",
            Position::BottomRight => "bottom-right",
            Position::BottomLeft => "bottom-left",
        }
    }

    /// Parse a kebab-case position name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Toast behavior configuration.
    pub toast: ToastConfig,

    /// Theme configuration (colors, typography).
    pub theme: ThemeConfig,
}

impl Config {
    /// Load configuration from the embedded default TOML string.
    pub fn from_default_toml() -> Result<Self> {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, merging with embedded defaults.
    ///
    /// User-provided values override defaults, but any missing sections or
    /// fields fall back to the embedded default config.
    ///
    /// Returns an error if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_with_defaults(&content)
    }

    /// Load configuration from a TOML string, merging with embedded defaults.
    ///
    /// This parses both the default config and user config as TOML tables,
    /// deep-merges them (user values win), then deserializes the result.
    pub fn load_with_defaults(user_toml: &str) -> Result<Self> {
        // This should never fail since it's embedded and tested
        let mut base: Table = toml::from_str(DEFAULT_CONFIG_TOML)
            .expect("embedded DEFAULT_CONFIG_TOML should always be valid");

        let user: Table = toml::from_str(user_toml)?;

        deep_merge_toml(&mut base, user);

        let config: Config = base.try_into()?;
        Ok(config)
    }

    /// Find and load configuration using the XDG lookup chain.
    ///
    /// If `explicit_path` is `Some`, that path is used directly and an error
    /// is returned if it doesn't exist or can't be parsed (no fallback).
    ///
    /// If `explicit_path` is `None`, searches in order:
    /// 1. `$XDG_CONFIG_HOME/toastline/config.toml`
    /// 2. `~/.config/toastline/config.toml`
    /// 3. `./config.toml` (current working directory)
    ///
    /// If no config file is found in the search chain, the embedded default
    /// config is used.
    pub fn find_and_load(explicit_path: Option<&Path>) -> Result<ConfigLoadResult> {
        if let Some(path) = explicit_path {
            let config = Self::load(path)?;
            return Ok(ConfigLoadResult {
                config,
                source: Some(path.to_path_buf()),
                used_defaults: false,
            });
        }

        // No explicit path - search the XDG chain.
        // Rule: if a config file exists but fails to load, that's an error
        // (no silent fallback). Only use defaults when no config files exist.
        let search_paths = Self::config_search_paths();
        let mut first_error: Option<(PathBuf, Error)> = None;

        for path in &search_paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        return Ok(ConfigLoadResult {
                            config,
                            source: Some(path.clone()),
                            used_defaults: false,
                        });
                    }
                    Err(e) => {
                        if first_error.is_none() {
                            first_error = Some((path.clone(), e));
                        }
                    }
                }
            }
        }

        if let Some((path, error)) = first_error {
            tracing::error!("Config file {:?} exists but failed to load: {}", path, error);
            return Err(error);
        }

        tracing::info!("No config file found, using built-in default config");
        tracing::debug!(
            "Searched: {}",
            search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let config = Self::from_default_toml()?;

        Ok(ConfigLoadResult {
            config,
            source: None,
            used_defaults: true,
        })
    }

    /// Get the list of paths to search for config files.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join("toastline/config.toml"));
        }

        if let Ok(home) = env::var("HOME") {
            paths.push(PathBuf::from(home).join(".config/toastline/config.toml"));
        }

        paths.push(PathBuf::from("config.toml"));

        paths
    }

    /// Validate the configuration, returning errors for invalid values.
    ///
    /// This performs strict validation - any invalid value causes an error.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.toast.duration_ms == 0 {
            errors.push("toast.duration_ms: must be greater than 0".to_string());
        }

        if self.toast.fadeout_ms == 0 {
            errors.push("toast.fadeout_ms: must be greater than 0".to_string());
        }

        if self.toast.min_width == 0 {
            errors.push("toast.min_width: must be greater than 0".to_string());
        }

        if !(0.0..=1.0).contains(&self.theme.opacity) {
            errors.push(format!(
                "theme.opacity: invalid value '{}', must be between 0.0 and 1.0",
                self.theme.opacity
            ));
        }

        for (key, value) in [
            ("theme.background_color", &self.theme.background_color),
            ("theme.text_color", &self.theme.text_color),
            ("theme.success_color", &self.theme.success_color),
            ("theme.info_color", &self.theme.info_color),
            ("theme.error_color", &self.theme.error_color),
            ("theme.warning_color", &self.theme.warning_color),
            ("theme.message_color", &self.theme.message_color),
        ] {
            if !is_valid_hex(value) {
                errors.push(format!(
                    "{}: invalid value '{}', expected a hex color like '#3584e4'",
                    key, value
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigValidation(errors))
        }
    }

    /// Check for potential configuration issues and return warnings.
    ///
    /// Unlike `validate()`, these are non-fatal issues that might indicate
    /// mistakes rather than hard errors.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.toast.sticky && self.toast.max_stack > 0 {
            warnings.push(
                "toast.sticky with toast.max_stack: sticky toasts never expire, \
                 so a full stack blocks new toasts until one is closed manually"
                    .to_string(),
            );
        }

        if self.toast.duration_ms < self.toast.fadeout_ms {
            warnings.push(format!(
                "toast.duration_ms ({}) is shorter than toast.fadeout_ms ({}); \
                 toasts will spend most of their life fading out",
                self.toast.duration_ms, self.toast.fadeout_ms
            ));
        }

        warnings
    }

    /// Print a human-readable summary of the configuration.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push("Toast Configuration:".to_string());
        lines.push(format!("  position: {}", self.toast.position));
        lines.push(format!("  duration: {}ms", self.toast.duration_ms));
        lines.push(format!("  fadeout: {}ms", self.toast.fadeout_ms));
        lines.push(format!("  insert: {}ms", self.toast.insert_ms));
        lines.push(format!("  sticky: {}", self.toast.sticky));
        lines.push(format!("  close_on_click: {}", self.toast.close_on_click));
        lines.push(format!("  close_button: {}", self.toast.close_button));
        if self.toast.max_stack > 0 {
            lines.push(format!("  max_stack: {}", self.toast.max_stack));
        } else {
            lines.push("  max_stack: unlimited".to_string());
        }

        lines.push("\nTheme:".to_string());
        lines.push(format!("  background: {}", self.theme.background_color));
        lines.push(format!("  text: {}", self.theme.text_color));
        lines.push(format!("  font_family: {}", self.theme.font_family));
        lines.push(format!("  font_size: {}px", self.theme.font_size));
        lines.push(format!("  opacity: {}", self.theme.opacity));

        lines.join("\n")
    }
}

/// Check that a string is a `#rgb` or `#rrggbb` hex color.
fn is_valid_hex(color: &str) -> bool {
    color.starts_with('#') && {
        let hex = color.trim_start_matches('#');
        (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    }
}

/// Deep merge two TOML tables, with `overlay` values taking precedence.
///
/// For nested tables, recursively merges. For arrays and other values,
/// the overlay value completely replaces the base value.
fn deep_merge_toml(base: &mut Table, overlay: Table) {
    for (key, overlay_value) in overlay {
        match (base.get_mut(&key), overlay_value) {
            // Both are tables: recursively merge
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge_toml(base_table, overlay_table);
            }
            // Otherwise: overlay value wins (insert or replace)
            (_, overlay_value) => {
                base.insert(key, overlay_value);
            }
        }
    }
}

/// Toast behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToastConfig {
    /// Corner where toasts appear.
    pub position: Position,

    /// Time a toast stays on screen before auto-dismissing, in milliseconds.
    pub duration_ms: u32,

    /// Length of the fade-out transition before removal, in milliseconds.
    pub fadeout_ms: u32,

    /// Length of the entry transition, in milliseconds.
    pub insert_ms: u32,

    /// Sticky toasts never auto-dismiss.
    pub sticky: bool,

    /// Clicking anywhere on the toast closes it.
    pub close_on_click: bool,

    /// Show an explicit close button on each toast.
    pub close_button: bool,

    /// Maximum visible toasts per corner stack; 0 means unlimited.
    pub max_stack: u32,

    /// Distance from the screen edges to the stack, in pixels.
    pub margin: u32,

    /// Vertical gap between stacked toasts, in pixels.
    pub gap: u32,

    /// Minimum toast card width, in pixels.
    pub min_width: u32,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            position: Position::TopRight,
            duration_ms: 4000,
            fadeout_ms: 750,
            insert_ms: 250,
            sticky: false,
            close_on_click: true,
            close_button: true,
            max_stack: 0,
            margin: 10,
            gap: 6,
            min_width: 300,
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Card background color (hex).
    pub background_color: String,

    /// Card text color (hex).
    pub text_color: String,

    /// Success accent color (hex).
    pub success_color: String,

    /// Info accent color (hex).
    pub info_color: String,

    /// Error accent color (hex).
    pub error_color: String,

    /// Warning accent color (hex).
    pub warning_color: String,

    /// Neutral message accent color (hex).
    pub message_color: String,

    /// Font family CSS value.
    pub font_family: String,

    /// Base font size in pixels.
    pub font_size: u32,

    /// Card corner radius in pixels.
    pub border_radius: u32,

    /// Card opacity, 0.0 - 1.0.
    pub opacity: f64,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background_color: "#111217".to_string(),
            text_color: "#ffffff".to_string(),
            success_color: "#4a7a4a".to_string(),
            info_color: "#3584e4".to_string(),
            error_color: "#ff6b6b".to_string(),
            warning_color: "#e5c07b".to_string(),
            message_color: "#9a9996".to_string(),
            font_family: "\"Cascadia Mono NF\", monospace".to_string(),
            font_size: 14,
            border_radius: 8,
            opacity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses() {
        let config = Config::from_default_toml().expect("embedded config should parse");
        config.validate().expect("embedded config should validate");
    }

    #[test]
    fn default_toml_matches_typed_defaults() {
        let parsed = Config::from_default_toml().unwrap();
        let typed = Config::default();
        assert_eq!(parsed.toast.duration_ms, typed.toast.duration_ms);
        assert_eq!(parsed.toast.fadeout_ms, typed.toast.fadeout_ms);
        assert_eq!(parsed.toast.position, typed.toast.position);
        assert_eq!(parsed.theme.background_color, typed.theme.background_color);
    }

    #[test]
    fn user_values_override_defaults() {
        let config = Config::load_with_defaults(
            r#"
            [toast]
            duration_ms = 1234
            position = "bottom-left"
            "#,
        )
        .unwrap();

        assert_eq!(config.toast.duration_ms, 1234);
        assert_eq!(config.toast.position, Position::BottomLeft);
        // Untouched fields keep their defaults.
        assert_eq!(config.toast.fadeout_ms, 750);
        assert!(config.toast.close_on_click);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = Config::load_with_defaults(
            r#"
            [toast]
            durationms = 1234
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn invalid_position_is_rejected() {
        let result = Config::load_with_defaults(
            r#"
            [toast]
            position = "center"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut config = Config::default();
        config.toast.duration_ms = 0;
        config.theme.opacity = 1.5;
        config.theme.error_color = "red".to_string();

        let err = config.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("toast.duration_ms"));
        assert!(message.contains("theme.opacity"));
        assert!(message.contains("theme.error_color"));
    }

    #[test]
    fn warnings_flag_short_duration() {
        let mut config = Config::default();
        config.toast.duration_ms = 100;
        config.toast.fadeout_ms = 750;
        let warnings = config.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("duration_ms"));
    }

    #[test]
    fn position_roundtrip() {
        for p in Position::ALL {
            assert_eq!(Position::parse(p.as_str()), Some(p));
        }
        assert_eq!(Position::parse("middle"), None);
    }

    #[test]
    fn summary_contains_sections() {
        let summary = Config::default().summary();
        assert!(summary.contains("Toast Configuration:"));
        assert!(summary.contains("Theme:"));
        assert!(summary.contains("position: top-right"));
    }
}
