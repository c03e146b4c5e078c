//! GTK4 toast notifications for Wayland desktops.
//!
//! Toasts stack in a configurable screen corner, auto-dismiss after a
//! visible countdown (pausable by hovering), and support a small inline
//! markup language in their body text. See [`Toaster`] for the entry point.

pub mod css;
pub mod render;
pub mod stack;
pub mod styles;
pub mod toast;
pub mod toaster;
pub mod transition;

pub use stack::StackManager;
pub use toast::{Toast, ToastEvents, ToastState};
pub use toaster::{Severity, ToastButton, ToastContent, ToastOptions, ToastOverrides, Toaster};
pub use transition::{Transition, TransitionKind};
