//! Core types for toastline: the inline markup parser, configuration,
//! theming, and the shared logging/error plumbing.
//!
//! This crate is deliberately free of GTK dependencies so the parser and
//! config machinery stay unit-testable without a display server.

pub mod config;
pub mod error;
pub mod logging;
pub mod markup;
pub mod theme;

pub use config::{Config, ConfigLoadResult, Position, ThemeConfig, ToastConfig};
pub use error::{Error, Result};
pub use markup::{ElementKind, ElementNode, MarkupNode, TagDef, TagRegistry};
pub use theme::ToastPalette;
