//! Per-corner toast stacks and their lifetime management.
//!
//! Each screen corner gets its own layer-shell window holding a vertical
//! column of toast cards, created lazily the first time a toast targets
//! that corner. Cards are appended in arrival order; the column is anchored
//! so top stacks grow downward and bottom stacks grow upward. An empty
//! stack hides its window so it never intercepts input.

use gtk4::prelude::*;
use gtk4::{Align, Application, Box as GtkBox, Orientation, Window};
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

use toastline_core::{Config, Position};

use crate::styles::toast as class;
use crate::toast::Toast;

/// One corner's stack window.
pub struct ToastStack {
    position: Position,
    window: Window,
    column: GtkBox,
    toasts: RefCell<Vec<Rc<Toast>>>,
    max_stack: usize,
}

impl ToastStack {
    fn new(app: &Application, position: Position, config: &Config) -> Rc<Self> {
        let window = Window::builder()
            .application(app)
            .decorated(false)
            .resizable(false)
            .build();
        window.add_css_class(class::STACK);
        window.add_css_class(&format!("tl-{}", position.as_str()));

        window.init_layer_shell();
        window.set_layer(Layer::Overlay);
        window.set_exclusive_zone(0);
        window.set_keyboard_mode(KeyboardMode::None);

        window.set_anchor(Edge::Top, position.is_top());
        window.set_anchor(Edge::Bottom, !position.is_top());
        window.set_anchor(Edge::Right, position.is_right());
        window.set_anchor(Edge::Left, !position.is_right());

        let margin = config.toast.margin as i32;
        let vertical_edge = if position.is_top() { Edge::Top } else { Edge::Bottom };
        let horizontal_edge = if position.is_right() { Edge::Right } else { Edge::Left };
        window.set_margin(vertical_edge, margin);
        window.set_margin(horizontal_edge, margin);

        let column = GtkBox::new(Orientation::Vertical, config.toast.gap as i32);
        column.add_css_class(class::COLUMN);
        column.set_valign(if position.is_top() { Align::Start } else { Align::End });
        column.set_width_request(config.toast.min_width as i32);
        window.set_child(Some(&column));

        debug!("created toast stack for {}", position);

        Rc::new(Self {
            position,
            window,
            column,
            toasts: RefCell::new(Vec::new()),
            max_stack: config.toast.max_stack as usize,
        })
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn len(&self) -> usize {
        self.toasts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.borrow().is_empty()
    }

    /// Append a toast and present the window if it was hidden.
    fn add(self: &Rc<Self>, toast: &Rc<Toast>) {
        self.column.append(toast.widget());
        self.toasts.borrow_mut().push(Rc::clone(toast));
        self.window.present();
        trace!(position = %self.position, count = self.len(), "toast added to stack");

        // Overflowing toasts are dropped oldest-first, outside the borrow
        // since dismiss re-enters remove().
        if self.max_stack > 0 {
            let victims: Vec<Rc<Toast>> = {
                let toasts = self.toasts.borrow();
                let excess = toasts.len().saturating_sub(self.max_stack);
                toasts.iter().take(excess).cloned().collect()
            };
            for victim in victims {
                debug!(id = victim.id(), "stack overflow, dropping oldest toast");
                victim.dismiss();
            }
        }
    }

    /// Detach a toast's card. Called from the toast when it reaches the
    /// removed state.
    pub(crate) fn remove(self: &Rc<Self>, toast: &Toast) {
        self.column.remove(toast.widget());
        self.toasts.borrow_mut().retain(|t| t.id() != toast.id());

        if self.is_empty() {
            self.window.set_visible(false);
        }
        StackManager::global().note_removed();
    }
}

thread_local! {
    static INSTANCE: RefCell<Option<Rc<StackManager>>> = const { RefCell::new(None) };
}

/// Singleton owning the per-corner stacks.
///
/// Initialized once in the GTK activate handler, after CSS has been loaded.
pub struct StackManager {
    app: Application,
    config: Config,
    stacks: RefCell<HashMap<Position, Rc<ToastStack>>>,
    on_empty: RefCell<Option<Box<dyn Fn()>>>,
}

impl StackManager {
    pub fn init_global(app: &Application, config: Config) {
        INSTANCE.with(|instance| {
            *instance.borrow_mut() = Some(Rc::new(Self {
                app: app.clone(),
                config,
                stacks: RefCell::new(HashMap::new()),
                on_empty: RefCell::new(None),
            }));
        });
    }

    /// Get the global instance. Panics if `init_global` has not run.
    pub fn global() -> Rc<Self> {
        INSTANCE.with(|instance| {
            instance
                .borrow()
                .as_ref()
                .cloned()
                .expect("StackManager::init_global must be called first")
        })
    }

    /// Invoked every time the last toast of all stacks disappears.
    pub fn set_on_empty(&self, callback: impl Fn() + 'static) {
        *self.on_empty.borrow_mut() = Some(Box::new(callback));
    }

    /// Total number of live toasts across all corners.
    pub fn active_count(&self) -> usize {
        self.stacks.borrow().values().map(|s| s.len()).sum()
    }

    /// Insert a toast into the stack for its corner, creating the stack on
    /// first use, and start its entry transition.
    pub fn display(self: &Rc<Self>, toast: &Rc<Toast>) {
        let stack = self.stack_for(toast.position());
        stack.add(toast);
        toast.display(&stack);
    }

    fn stack_for(&self, position: Position) -> Rc<ToastStack> {
        self.stacks
            .borrow_mut()
            .entry(position)
            .or_insert_with(|| ToastStack::new(&self.app, position, &self.config))
            .clone()
    }

    pub(crate) fn note_removed(&self) {
        if self.active_count() == 0
            && let Some(callback) = self.on_empty.borrow().as_ref()
        {
            callback();
        }
    }
}
