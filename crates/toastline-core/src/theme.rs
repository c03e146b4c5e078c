//! Theming for toastline.
//!
//! `ToastPalette` is the single source of truth for theme-derived values.
//! It parses the theme config, computes the foreground hierarchy and
//! per-severity accents, and generates the CSS variable block consumed by
//! the generated stylesheet.

use crate::config::Config;

// Foreground opacity factors for text hierarchy.
const FOREGROUND_MUTED_OPACITY: f64 = 0.7;
const FOREGROUND_FAINT_OPACITY: f64 = 0.4;

// Border opacities (subtle borders that don't compete with content).
const BORDER_OPACITY_DARK: f64 = 0.10;
const BORDER_OPACITY_LIGHT: f64 = 0.12;

// Shadow opacity by background luminance.
const SHADOW_OPACITY_DARK: f64 = 0.40;
const SHADOW_OPACITY_LIGHT: f64 = 0.25;

// Lifespan (countdown) bar track opacity.
const TRACK_OPACITY: f64 = 0.15;

// Fallbacks when a configured color fails to parse. Validation normally
// rejects these earlier; the fallback keeps CSS generation total.
const FALLBACK_BACKGROUND: (u8, u8, u8) = (0x11, 0x12, 0x17);
const FALLBACK_TEXT: (u8, u8, u8) = (0xff, 0xff, 0xff);

/// Parse a hex color string to RGB tuple. Returns None if invalid.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let color = color.trim().trim_start_matches('#');

    // Expand shorthand (e.g., "fff" -> "ffffff")
    let color = if color.len() == 3 {
        color.chars().flat_map(|c| [c, c]).collect::<String>()
    } else {
        color.to_string()
    };

    if color.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&color[0..2], 16).ok()?;
    let g = u8::from_str_radix(&color[2..4], 16).ok()?;
    let b = u8::from_str_radix(&color[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Calculate relative luminance per WCAG formula (0.0 = black, 1.0 = white).
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel(c: u8) -> f64 {
        let c_srgb = c as f64 / 255.0;
        if c_srgb <= 0.03928 {
            c_srgb / 12.92
        } else {
            ((c_srgb + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Whether a hex color reads as dark (luminance below 0.5).
pub fn is_dark_color(color: &str) -> bool {
    match parse_hex_color(color) {
        Some((r, g, b)) => relative_luminance(r, g, b) < 0.5,
        None => true,
    }
}

/// Format an `rgba()` CSS value.
pub fn rgba_str(r: u8, g: u8, b: u8, a: f64) -> String {
    format!("rgba({}, {}, {}, {:.3})", r, g, b, a)
}

/// Format a `#rrggbb` CSS value.
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Computed theme values for toast rendering.
#[derive(Debug, Clone)]
pub struct ToastPalette {
    /// Card background, as configured.
    pub background: String,
    /// Primary foreground.
    pub foreground: String,
    /// Secondary foreground (body text, app name).
    pub foreground_muted: String,
    /// Tertiary foreground (decorative).
    pub foreground_faint: String,
    /// Subtle card border.
    pub border: String,
    /// Card shadow color.
    pub shadow: String,
    /// Lifespan bar track (under the severity-colored fill).
    pub track: String,
    /// Severity accents: success, info, error, warning, message.
    pub success: String,
    pub info: String,
    pub error: String,
    pub warning: String,
    pub message: String,
    /// Font settings, passed through from config.
    pub font_family: String,
    pub font_size: u32,
    pub border_radius: u32,
    pub opacity: f64,
    /// Whether the background reads as dark.
    pub is_dark: bool,
}

impl ToastPalette {
    /// Compute the palette from a loaded config.
    pub fn from_config(config: &Config) -> Self {
        let theme = &config.theme;

        let (bg_r, bg_g, bg_b) =
            parse_hex_color(&theme.background_color).unwrap_or(FALLBACK_BACKGROUND);
        let (fg_r, fg_g, fg_b) = parse_hex_color(&theme.text_color).unwrap_or(FALLBACK_TEXT);

        let is_dark = relative_luminance(bg_r, bg_g, bg_b) < 0.5;

        let border_opacity = if is_dark {
            BORDER_OPACITY_DARK
        } else {
            BORDER_OPACITY_LIGHT
        };
        let shadow_opacity = if is_dark {
            SHADOW_OPACITY_DARK
        } else {
            SHADOW_OPACITY_LIGHT
        };

        Self {
            background: rgb_to_hex(bg_r, bg_g, bg_b),
            foreground: rgb_to_hex(fg_r, fg_g, fg_b),
            foreground_muted: rgba_str(fg_r, fg_g, fg_b, FOREGROUND_MUTED_OPACITY),
            foreground_faint: rgba_str(fg_r, fg_g, fg_b, FOREGROUND_FAINT_OPACITY),
            border: rgba_str(fg_r, fg_g, fg_b, border_opacity),
            shadow: rgba_str(0, 0, 0, shadow_opacity),
            track: rgba_str(fg_r, fg_g, fg_b, TRACK_OPACITY),
            success: theme.success_color.clone(),
            info: theme.info_color.clone(),
            error: theme.error_color.clone(),
            warning: theme.warning_color.clone(),
            message: theme.message_color.clone(),
            font_family: theme.font_family.clone(),
            font_size: theme.font_size,
            border_radius: theme.border_radius,
            opacity: theme.opacity,
            is_dark,
        }
    }

    /// Generate the `--tl-*` CSS variable block.
    ///
    /// GTK CSS supports custom properties at any selector scope; variables
    /// are defined on the toast window class so every toast child can use
    /// them.
    pub fn css_vars_block(&self) -> String {
        format!(
            r#".tl-toast-stack {{
    --tl-background: {background};
    --tl-foreground: {foreground};
    --tl-foreground-muted: {foreground_muted};
    --tl-foreground-faint: {foreground_faint};
    --tl-border: {border};
    --tl-shadow: {shadow};
    --tl-track: {track};
    --tl-success: {success};
    --tl-info: {info};
    --tl-error: {error};
    --tl-warning: {warning};
    --tl-message: {message};
    --tl-font-size: {font_size}px;
    --tl-font-size-sm: {font_size_sm}px;
    --tl-font-size-lg: {font_size_lg}px;
    --tl-radius: {radius}px;
    font-family: {font_family};
}}
"#,
            background = self.background,
            foreground = self.foreground,
            foreground_muted = self.foreground_muted,
            foreground_faint = self.foreground_faint,
            border = self.border,
            shadow = self.shadow,
            track = self.track,
            success = self.success,
            info = self.info,
            error = self.error,
            warning = self.warning,
            message = self.message,
            font_size = self.font_size,
            font_size_sm = (self.font_size.saturating_sub(2)).max(8),
            font_size_lg = self.font_size + 3,
            radius = self.border_radius,
            font_family = self.font_family,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#ffffff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("#000"), Some((0, 0, 0)));
        assert_eq!(parse_hex_color("3584e4"), Some((0x35, 0x84, 0xe4)));
        assert_eq!(parse_hex_color("#xyz"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn luminance_detects_dark_and_light() {
        assert!(is_dark_color("#000000"));
        assert!(is_dark_color("#111217"));
        assert!(!is_dark_color("#ffffff"));
        assert!(!is_dark_color("#e8e8e8"));
    }

    #[test]
    fn rgba_formatting() {
        assert_eq!(rgba_str(255, 0, 0, 0.5), "rgba(255, 0, 0, 0.500)");
        assert_eq!(rgb_to_hex(0x11, 0x12, 0x17), "#111217");
    }

    #[test]
    fn palette_from_default_config() {
        let config = Config::default();
        let palette = ToastPalette::from_config(&config);

        assert!(palette.is_dark);
        assert_eq!(palette.background, "#111217");
        assert_eq!(palette.foreground, "#ffffff");
        assert_eq!(palette.success, "#4a7a4a");

        let vars = palette.css_vars_block();
        assert!(vars.contains("--tl-background: #111217;"));
        assert!(vars.contains("--tl-success: #4a7a4a;"));
        assert!(vars.contains("--tl-font-size: 14px;"));
    }

    #[test]
    fn light_background_flips_derived_values() {
        let mut config = Config::default();
        config.theme.background_color = "#f0f0f0".to_string();
        config.theme.text_color = "#202020".to_string();

        let palette = ToastPalette::from_config(&config);
        assert!(!palette.is_dark);
        assert_eq!(palette.foreground, "#202020");
    }
}
