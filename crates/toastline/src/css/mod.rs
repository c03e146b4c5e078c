//! CSS generation and loading for toastline.
//!
//! CSS is assembled from the theme-derived variable block plus two
//! submodules:
//! - `base` - resets shared by every stack window
//! - `toast` - card, severity accents, lifespan bar, markup elements
//!
//! A user `style.css` (XDG lookup) is loaded on top with a higher priority
//! so overrides always win.

mod base;
mod toast;

use std::path::PathBuf;
use tracing::{debug, warn};

use toastline_core::{Config, ToastPalette};

/// Priority for user CSS, above all internal styles.
const USER_CSS_PRIORITY: u32 = gtk4::STYLE_PROVIDER_PRIORITY_USER + 100;

/// Generate the full stylesheet for the loaded config.
pub fn generate_css(config: &Config, palette: &ToastPalette) -> String {
    let vars = palette.css_vars_block();
    let base = base::css(palette.opacity);
    let toast = toast::css(config);
    format!("{vars}\n{base}\n{toast}")
}

/// Load and apply CSS styling to the application.
pub fn load_css(config: &Config) {
    let provider = gtk4::CssProvider::new();

    let palette = ToastPalette::from_config(config);
    let css = generate_css(config, &palette);
    provider.load_from_string(&css);

    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_USER,
        );
        debug!("CSS loaded and applied (is_dark={})", palette.is_dark);

        load_user_css(&display);
    } else {
        warn!("No default display available, CSS styling not applied");
    }
}

/// Search paths for user style.css, following XDG conventions.
fn user_css_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(xdg_config).join("toastline/style.css"));
    }

    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config/toastline/style.css"));
    }

    paths.push(PathBuf::from("style.css"));

    paths
}

fn find_user_css() -> Option<PathBuf> {
    user_css_search_paths().into_iter().find(|path| path.exists())
}

/// Load user's custom CSS from style.css with highest priority.
fn load_user_css(display: &gtk4::gdk::Display) {
    let Some(path) = find_user_css() else {
        debug!("No user style.css found");
        return;
    };

    match std::fs::read_to_string(&path) {
        Ok(css) => {
            let provider = gtk4::CssProvider::new();
            provider.load_from_string(&css);
            gtk4::style_context_add_provider_for_display(display, &provider, USER_CSS_PRIORITY);
            debug!("User CSS loaded from {}", path.display());
        }
        Err(e) => {
            warn!("Failed to read user style.css at {}: {}", path.display(), e);
        }
    }
}
