//! Shared CSS class constants for toastline.
//!
//! This module centralizes all CSS class names used across the codebase,
//! making them discoverable, avoiding typos, and enabling IDE autocompletion.
//!
//! # Usage
//!
//! ```ignore
//! use crate::styles::{toast, severity, state};
//!
//! card.add_css_class(toast::CARD);
//! card.add_css_class(severity::SUCCESS);
//! card.add_css_class(state::INSERT);
//! ```

/// Structural classes for toast windows and stacks.
pub mod toast {
    /// Per-corner stack window (`.tl-toast-stack`). CSS variables are scoped here.
    pub const STACK: &str = "tl-toast-stack";

    /// Vertical box holding the cards of one corner (`.tl-toast-column`).
    pub const COLUMN: &str = "tl-toast-column";

    /// The toast card itself (`.tl-toast`).
    pub const CARD: &str = "tl-toast";

    /// Title row (`.tl-toast-title`).
    pub const TITLE: &str = "tl-toast-title";

    /// Body container (`.tl-toast-body`).
    pub const BODY: &str = "tl-toast-body";

    /// Inline body text label (`.tl-toast-text`).
    pub const TEXT: &str = "tl-toast-text";

    /// Close button (`.tl-toast-close`).
    pub const CLOSE: &str = "tl-toast-close";

    /// Action button row (`.tl-toast-buttons`).
    pub const BUTTONS: &str = "tl-toast-buttons";

    /// A single action button (`.tl-toast-button`).
    pub const BUTTON: &str = "tl-toast-button";

    /// Attached image (`.tl-toast-image`).
    pub const IMAGE: &str = "tl-toast-image";

    /// Countdown bar (`.tl-lifespan`).
    pub const LIFESPAN: &str = "tl-lifespan";

    /// Cards that dismiss on click (`.tl-clickable`).
    pub const CLICKABLE: &str = "tl-clickable";
}

/// Severity accent classes. One of these is applied per card and drives the
/// accent stripe and lifespan bar color.
pub mod severity {
    pub const SUCCESS: &str = "tl-success";
    pub const INFO: &str = "tl-info";
    pub const ERROR: &str = "tl-error";
    pub const WARNING: &str = "tl-warning";
    pub const MESSAGE: &str = "tl-message";
}

/// Lifecycle animation classes. At most one is present on a card at a time.
pub mod state {
    /// Slide/fade in after insertion (`.tl-insert`).
    pub const INSERT: &str = "tl-insert";

    /// Countdown running, lifespan bar shrinking (`.tl-countdown`).
    pub const COUNTDOWN: &str = "tl-countdown";

    /// Countdown paused by pointer hover (`.tl-paused`).
    pub const PAUSED: &str = "tl-paused";

    /// Fading out before removal (`.tl-fadeout`).
    pub const FADEOUT: &str = "tl-fadeout";
}

/// Markup element classes. These match the class names carried by the
/// builtin tag definitions so custom stylesheets can target both.
pub mod markup {
    pub const BOLD: &str = "tl-bold";
    pub const ITALIC: &str = "tl-italic";
    pub const CODE: &str = "tl-code";
    pub const LINK: &str = "tl-link";
    pub const HEADER: &str = "tl-header";
    pub const HEADER1: &str = "tl-h1";
    pub const HEADER2: &str = "tl-h2";
    pub const HEADER3: &str = "tl-h3";
    pub const SEPARATOR: &str = "tl-separator";
    pub const IMAGE: &str = "tl-image";
}
