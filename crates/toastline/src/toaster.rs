//! The public entry point for spawning toasts.
//!
//! A [`Toaster`] owns the default options (seeded from the loaded config)
//! and the tag registry used to parse body markup. Severity helpers
//! (`success`, `info`, ...) wrap [`Toaster::create`] with the matching
//! accent class, mirroring the config's severity palette.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use toastline_core::markup::{TagDef, TagRegistry};
use toastline_core::{Config, Position};

use crate::stack::StackManager;
use crate::styles::severity;
use crate::toast::{Toast, ToastEvents};

/// Builtin severity levels. Each maps to an accent class that colors the
/// stripe and lifespan bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
    Warning,
    Message,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Success => severity::SUCCESS,
            Severity::Info => severity::INFO,
            Severity::Error => severity::ERROR,
            Severity::Warning => severity::WARNING,
            Severity::Message => severity::MESSAGE,
        }
    }
}

/// An action button rendered at the bottom of a toast.
pub struct ToastButton {
    pub label: String,
    /// Extra CSS classes, e.g. a severity accent.
    pub classes: Vec<String>,
    /// Invoked on click, before the optional dismissal.
    pub on_click: Rc<dyn Fn()>,
    /// Whether clicking the button also closes the toast.
    pub dismiss: bool,
}

/// What a toast displays. A toast with no title, text, image or buttons is
/// empty and is silently dropped by [`Toaster::create`].
#[derive(Default)]
pub struct ToastContent {
    pub title: Option<String>,
    /// Body text, parsed with the toaster's tag registry.
    pub text: Option<String>,
    /// Image source path shown above the body text.
    pub image: Option<String>,
    pub buttons: Vec<ToastButton>,
}

impl ToastContent {
    pub fn is_empty(&self) -> bool {
        self.title.as_deref().is_none_or(str::is_empty)
            && self.text.as_deref().is_none_or(str::is_empty)
            && self.image.as_deref().is_none_or(str::is_empty)
            && self.buttons.is_empty()
    }
}

/// Resolved per-toast options.
#[derive(Clone)]
pub struct ToastOptions {
    pub position: Position,
    /// Countdown length. Ignored when sticky.
    pub duration_ms: u64,
    pub fadeout_ms: u64,
    pub insert_ms: u64,
    /// Sticky toasts never start a countdown; they stay until closed.
    pub sticky: bool,
    pub close_on_click: bool,
    pub close_button: bool,
    pub events: ToastEvents,
}

impl ToastOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            position: config.toast.position,
            duration_ms: u64::from(config.toast.duration_ms),
            fadeout_ms: u64::from(config.toast.fadeout_ms),
            insert_ms: u64::from(config.toast.insert_ms),
            sticky: config.toast.sticky,
            close_on_click: config.toast.close_on_click,
            close_button: config.toast.close_button,
            events: ToastEvents::default(),
        }
    }

    /// Apply per-call overrides on top of these options.
    pub fn merged(&self, overrides: &ToastOverrides) -> Self {
        Self {
            position: overrides.position.unwrap_or(self.position),
            duration_ms: overrides.duration_ms.unwrap_or(self.duration_ms),
            fadeout_ms: overrides.fadeout_ms.unwrap_or(self.fadeout_ms),
            insert_ms: overrides.insert_ms.unwrap_or(self.insert_ms),
            sticky: overrides.sticky.unwrap_or(self.sticky),
            close_on_click: overrides.close_on_click.unwrap_or(self.close_on_click),
            close_button: overrides.close_button.unwrap_or(self.close_button),
            events: overrides.events.clone().unwrap_or_else(|| self.events.clone()),
        }
    }
}

/// Per-call option overrides. `None` fields fall back to the toaster
/// defaults.
#[derive(Clone, Default)]
pub struct ToastOverrides {
    pub position: Option<Position>,
    pub duration_ms: Option<u64>,
    pub fadeout_ms: Option<u64>,
    pub insert_ms: Option<u64>,
    pub sticky: Option<bool>,
    pub close_on_click: Option<bool>,
    pub close_button: Option<bool>,
    pub events: Option<ToastEvents>,
}

/// Spawns toasts into the per-corner stacks.
pub struct Toaster {
    defaults: RefCell<ToastOptions>,
    registry: RefCell<TagRegistry>,
}

impl Toaster {
    pub fn new(config: &Config) -> Self {
        Self {
            defaults: RefCell::new(ToastOptions::from_config(config)),
            registry: RefCell::new(TagRegistry::with_defaults()),
        }
    }

    /// Replace the default options applied to subsequent toasts.
    pub fn set_default_options(&self, options: ToastOptions) {
        *self.defaults.borrow_mut() = options;
    }

    /// Register (or replace) a markup tag for subsequent toasts.
    pub fn add_tag(&self, name: impl Into<String>, def: TagDef) {
        self.registry.borrow_mut().register(name, def);
    }

    pub fn success(&self, content: ToastContent, overrides: ToastOverrides) -> Option<Rc<Toast>> {
        self.custom(&[Severity::Success.css_class()], content, overrides)
    }

    pub fn info(&self, content: ToastContent, overrides: ToastOverrides) -> Option<Rc<Toast>> {
        self.custom(&[Severity::Info.css_class()], content, overrides)
    }

    pub fn error(&self, content: ToastContent, overrides: ToastOverrides) -> Option<Rc<Toast>> {
        self.custom(&[Severity::Error.css_class()], content, overrides)
    }

    pub fn warning(&self, content: ToastContent, overrides: ToastOverrides) -> Option<Rc<Toast>> {
        self.custom(&[Severity::Warning.css_class()], content, overrides)
    }

    pub fn message(&self, content: ToastContent, overrides: ToastOverrides) -> Option<Rc<Toast>> {
        self.custom(&[Severity::Message.css_class()], content, overrides)
    }

    /// Spawn a toast with arbitrary accent classes.
    ///
    /// Returns `None` for empty content; nothing is displayed and no hooks
    /// fire.
    pub fn custom(
        &self,
        classes: &[&str],
        content: ToastContent,
        overrides: ToastOverrides,
    ) -> Option<Rc<Toast>> {
        if content.is_empty() {
            debug!("dropping empty toast");
            return None;
        }

        let options = self.defaults.borrow().merged(&overrides);
        let registry = self.registry.borrow();
        let toast = Toast::build(classes, content, options, &registry);

        StackManager::global().display(&toast);
        Some(toast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_detection() {
        assert!(ToastContent::default().is_empty());
        assert!(
            ToastContent {
                title: Some(String::new()),
                text: Some(String::new()),
                ..Default::default()
            }
            .is_empty()
        );
        assert!(
            !ToastContent {
                title: Some("t".into()),
                ..Default::default()
            }
            .is_empty()
        );
        assert!(
            !ToastContent {
                image: Some("/tmp/a.png".into()),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn overrides_fall_back_to_defaults() {
        let config = Config::default();
        let defaults = ToastOptions::from_config(&config);

        let merged = defaults.merged(&ToastOverrides::default());
        assert_eq!(merged.duration_ms, defaults.duration_ms);
        assert_eq!(merged.position, defaults.position);

        let merged = defaults.merged(&ToastOverrides {
            duration_ms: Some(1000),
            sticky: Some(true),
            position: Some(Position::BottomLeft),
            ..Default::default()
        });
        assert_eq!(merged.duration_ms, 1000);
        assert!(merged.sticky);
        assert_eq!(merged.position, Position::BottomLeft);
        assert_eq!(merged.fadeout_ms, defaults.fadeout_ms);
    }
}
