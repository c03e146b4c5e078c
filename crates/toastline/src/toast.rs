//! A single toast card and its lifecycle.
//!
//! Lifecycle: `Building` -> `Inserted` (entry transition) -> `Active`
//! (countdown, unless sticky) -> `Retiring` (fade out) -> `Removed`.
//! Transitions are driven by [`Transition`] timers; hovering the card pauses
//! the countdown and resuming picks up the banked remaining time. `close`
//! is idempotent: calling it on a retiring or removed toast is a no-op.

use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Button, EventControllerMotion, GestureClick, Image, Label, Orientation,
    ProgressBar,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

use toastline_core::markup::{TagRegistry, parse};

use crate::render;
use crate::stack::ToastStack;
use crate::styles::{state, toast as class};
use crate::toaster::{ToastContent, ToastOptions};
use crate::transition::{Transition, TransitionKind, ease_out_cubic};

/// Lifecycle hook, invoked with the toast it fires for.
pub type ToastHook = Rc<dyn Fn(&Toast)>;

/// Optional lifecycle callbacks.
///
/// `on_create` fires once the card is built, `on_display` when the entry
/// transition finishes, `on_death` when the toast starts retiring, and
/// `on_close` after it has been removed from its stack.
#[derive(Clone, Default)]
pub struct ToastEvents {
    pub on_create: Option<ToastHook>,
    pub on_display: Option<ToastHook>,
    pub on_death: Option<ToastHook>,
    pub on_close: Option<ToastHook>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastState {
    /// Built but not yet in a stack.
    Building,
    /// In a stack, entry transition running.
    Inserted,
    /// Fully visible; countdown running unless sticky.
    Active,
    /// Fade-out running.
    Retiring,
    /// Gone from its stack. Terminal.
    Removed,
}

impl ToastState {
    /// Whether `close` may still start the fade-out from this state.
    fn can_retire(self) -> bool {
        !matches!(self, ToastState::Retiring | ToastState::Removed)
    }
}

/// What `dismiss` does from a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DismissAction {
    /// Already removed, nothing left to do.
    Ignore,
    /// Fade-out underway; skip straight to removal.
    DetachOnly,
    /// Cancel the pending phase, fire the death hook, remove.
    CancelAndDetach,
}

fn dismiss_action(state: ToastState) -> DismissAction {
    match state {
        ToastState::Removed => DismissAction::Ignore,
        ToastState::Retiring => DismissAction::DetachOnly,
        _ => DismissAction::CancelAndDetach,
    }
}

/// Countdown length for a toast. Sticky toasts have none.
fn countdown_duration(options: &ToastOptions) -> Option<u64> {
    (!options.sticky).then_some(options.duration_ms)
}

thread_local! {
    static NEXT_ID: Cell<u64> = const { Cell::new(1) };
}

fn next_id() -> u64 {
    NEXT_ID.with(|c| {
        let id = c.get();
        c.set(id + 1);
        id
    })
}

/// One toast card.
pub struct Toast {
    id: u64,
    card: GtkBox,
    /// Countdown bar; absent for sticky toasts.
    lifespan: Option<ProgressBar>,
    options: ToastOptions,
    state: Cell<ToastState>,
    hovered: Cell<bool>,
    transition: RefCell<Option<Rc<Transition>>>,
    stack: RefCell<Option<Weak<ToastStack>>>,
}

impl Toast {
    /// Build the card widget tree. The toast is not yet visible; the stack
    /// manager inserts it and then calls [`Toast::display`].
    pub(crate) fn build(
        classes: &[&str],
        content: ToastContent,
        options: ToastOptions,
        registry: &TagRegistry,
    ) -> Rc<Self> {
        let card = GtkBox::new(Orientation::Vertical, 4);
        card.add_css_class(class::CARD);
        for c in classes {
            card.add_css_class(c);
        }

        let lifespan = (!options.sticky).then(|| {
            let bar = ProgressBar::new();
            bar.set_fraction(1.0);
            bar.add_css_class(class::LIFESPAN);
            bar.set_valign(Align::End);
            bar
        });

        let toast = Rc::new(Self {
            id: next_id(),
            card,
            lifespan,
            options,
            state: Cell::new(ToastState::Building),
            hovered: Cell::new(false),
            transition: RefCell::new(None),
            stack: RefCell::new(None),
        });

        toast.build_content(&content, registry);
        toast.attach_controllers();

        debug!(id = toast.id, "toast built");
        toast.fire(|e| e.on_create.clone());
        toast
    }

    fn build_content(self: &Rc<Self>, content: &ToastContent, registry: &TagRegistry) {
        let title_text = content.title.as_deref().filter(|t| !t.is_empty());

        if title_text.is_some() || self.options.close_button {
            let header = GtkBox::new(Orientation::Horizontal, 8);

            let title = Label::new(title_text);
            title.add_css_class(class::TITLE);
            title.set_xalign(0.0);
            title.set_hexpand(true);
            title.set_wrap(true);
            title.set_wrap_mode(gtk4::pango::WrapMode::WordChar);
            header.append(&title);

            if self.options.close_button {
                let close = Button::new();
                close.set_has_frame(false);
                close.add_css_class(class::CLOSE);
                close.set_valign(Align::Start);
                close.set_child(Some(&Image::from_icon_name("window-close-symbolic")));

                let weak = Rc::downgrade(self);
                close.connect_clicked(move |_| {
                    if let Some(toast) = weak.upgrade() {
                        toast.close();
                    }
                });
                header.append(&close);
            }

            self.card.append(&header);
        }

        let has_image = content.image.as_deref().is_some_and(|i| !i.is_empty());
        let has_text = content.text.as_deref().is_some_and(|t| !t.is_empty());

        if has_image || has_text {
            let body = GtkBox::new(Orientation::Vertical, 4);
            body.add_css_class(class::BODY);

            if let Some(src) = content.image.as_deref().filter(|i| !i.is_empty()) {
                let image = Image::from_file(src);
                image.set_pixel_size(96);
                image.set_halign(Align::Start);
                image.add_css_class(class::IMAGE);
                body.append(&image);
            }

            if let Some(text) = content.text.as_deref().filter(|t| !t.is_empty()) {
                let nodes = parse(text, registry);
                render::render_body(&body, &nodes, registry);
            }

            self.card.append(&body);
        }

        if !content.buttons.is_empty() {
            let row = GtkBox::new(Orientation::Horizontal, 8);
            row.add_css_class(class::BUTTONS);
            row.set_halign(Align::End);

            for button in &content.buttons {
                let widget = Button::with_label(&button.label);
                widget.add_css_class(class::BUTTON);
                for c in &button.classes {
                    widget.add_css_class(c);
                }

                let on_click = Rc::clone(&button.on_click);
                let dismiss = button.dismiss;
                let weak = Rc::downgrade(self);
                widget.connect_clicked(move |_| {
                    on_click();
                    if dismiss
                        && let Some(toast) = weak.upgrade()
                    {
                        toast.close();
                    }
                });
                row.append(&widget);
            }

            self.card.append(&row);
        }

        if let Some(bar) = &self.lifespan {
            self.card.append(bar);
        }
    }

    fn attach_controllers(self: &Rc<Self>) {
        // Hovering pauses the countdown; leaving resumes it.
        let motion = EventControllerMotion::new();
        {
            let weak = Rc::downgrade(self);
            motion.connect_enter(move |_, _, _| {
                if let Some(toast) = weak.upgrade() {
                    toast.hovered.set(true);
                    toast.pause_countdown();
                }
            });
        }
        {
            let weak = Rc::downgrade(self);
            motion.connect_leave(move |_| {
                if let Some(toast) = weak.upgrade() {
                    toast.hovered.set(false);
                    toast.resume_countdown();
                }
            });
        }
        self.card.add_controller(motion);

        if self.options.close_on_click {
            self.card.add_css_class(class::CLICKABLE);
            let gesture = GestureClick::new();
            gesture.set_button(1);
            let weak = Rc::downgrade(self);
            // connect_pressed so drags that end on the card don't count.
            gesture.connect_pressed(move |gesture, n_press, _, _| {
                if n_press == 1
                    && let Some(toast) = weak.upgrade()
                {
                    gesture.set_state(gtk4::EventSequenceState::Claimed);
                    toast.dismiss();
                }
            });
            self.card.add_controller(gesture);
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> ToastState {
        self.state.get()
    }

    pub fn position(&self) -> toastline_core::Position {
        self.options.position
    }

    pub(crate) fn widget(&self) -> &GtkBox {
        &self.card
    }

    /// Start the entry transition. Called by the stack right after the card
    /// has been appended.
    pub(crate) fn display(self: &Rc<Self>, stack: &Rc<ToastStack>) {
        *self.stack.borrow_mut() = Some(Rc::downgrade(stack));
        self.state.set(ToastState::Inserted);

        self.card.add_css_class(state::INSERT);
        self.card.set_opacity(0.0);

        let transition = Transition::new(TransitionKind::Insert, self.options.insert_ms);
        let card = self.card.clone();
        let weak = Rc::downgrade(self);
        transition.start(
            move |p| card.set_opacity(ease_out_cubic(p)),
            move || {
                if let Some(toast) = weak.upgrade() {
                    toast.card.remove_css_class(state::INSERT);
                    toast.card.set_opacity(1.0);
                    toast.state.set(ToastState::Active);
                    trace!(id = toast.id, "toast displayed");
                    toast.fire(|e| e.on_display.clone());
                    toast.start_countdown();
                }
            },
        );
        *self.transition.borrow_mut() = Some(transition);
    }

    fn start_countdown(self: &Rc<Self>) {
        let Some(duration_ms) = countdown_duration(&self.options) else {
            self.transition.borrow_mut().take();
            return;
        };

        self.card.add_css_class(state::COUNTDOWN);
        let transition = Transition::new(TransitionKind::Countdown, duration_ms);
        let lifespan = self.lifespan.clone();
        let weak = Rc::downgrade(self);
        transition.start(
            move |p| {
                if let Some(bar) = &lifespan {
                    bar.set_fraction(1.0 - p);
                }
            },
            move || {
                if let Some(toast) = weak.upgrade() {
                    trace!(id = toast.id, "countdown elapsed");
                    toast.begin_fadeout();
                }
            },
        );
        // The pointer may already be parked over the card.
        if self.hovered.get() {
            transition.pause();
            self.card.add_css_class(state::PAUSED);
        }
        *self.transition.borrow_mut() = Some(transition);
    }

    fn pause_countdown(&self) {
        if let Some(transition) = self.transition.borrow().as_ref()
            && transition.kind() == TransitionKind::Countdown
        {
            transition.pause();
            self.card.add_css_class(state::PAUSED);
        }
    }

    fn resume_countdown(&self) {
        if let Some(transition) = self.transition.borrow().as_ref()
            && transition.kind() == TransitionKind::Countdown
        {
            transition.resume();
            self.card.remove_css_class(state::PAUSED);
        }
    }

    /// Close with the fade-out transition. Idempotent.
    pub fn close(self: &Rc<Self>) {
        if self.state.get().can_retire() {
            self.begin_fadeout();
        }
    }

    /// Remove immediately, skipping the fade-out.
    pub fn dismiss(self: &Rc<Self>) {
        match dismiss_action(self.state.get()) {
            DismissAction::Ignore => {}
            DismissAction::DetachOnly => self.remove(),
            DismissAction::CancelAndDetach => {
                if let Some(transition) = self.transition.borrow_mut().take() {
                    transition.cancel();
                }
                self.fire(|e| e.on_death.clone());
                self.remove();
            }
        }
    }

    fn begin_fadeout(self: &Rc<Self>) {
        if let Some(transition) = self.transition.borrow_mut().take() {
            transition.cancel();
        }
        self.state.set(ToastState::Retiring);
        self.fire(|e| e.on_death.clone());

        self.card.remove_css_class(state::COUNTDOWN);
        self.card.remove_css_class(state::PAUSED);
        self.card.add_css_class(state::FADEOUT);

        let transition = Transition::new(TransitionKind::FadeOut, self.options.fadeout_ms);
        let card = self.card.clone();
        let weak = Rc::downgrade(self);
        transition.start(
            move |p| card.set_opacity(1.0 - ease_out_cubic(p)),
            move || {
                if let Some(toast) = weak.upgrade() {
                    toast.remove();
                }
            },
        );
        *self.transition.borrow_mut() = Some(transition);
    }

    fn remove(self: &Rc<Self>) {
        if self.state.get() == ToastState::Removed {
            return;
        }
        if let Some(transition) = self.transition.borrow_mut().take() {
            transition.cancel();
        }
        self.state.set(ToastState::Removed);
        debug!(id = self.id, "toast removed");

        if let Some(stack) = self.stack.borrow_mut().take().and_then(|w| w.upgrade()) {
            stack.remove(self);
        }
        self.fire(|e| e.on_close.clone());
    }

    fn fire(&self, pick: impl Fn(&ToastEvents) -> Option<ToastHook>) {
        if let Some(hook) = pick(&self.options.events) {
            hook(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toastline_core::Config;

    fn options(sticky: bool) -> ToastOptions {
        let mut options = ToastOptions::from_config(&Config::default());
        options.sticky = sticky;
        options
    }

    #[test]
    fn sticky_toasts_never_arm_a_countdown() {
        assert_eq!(countdown_duration(&options(true)), None);
        assert_eq!(countdown_duration(&options(false)), Some(4000));
    }

    #[test]
    fn close_only_retires_live_states() {
        assert!(ToastState::Building.can_retire());
        assert!(ToastState::Inserted.can_retire());
        assert!(ToastState::Active.can_retire());
        // Re-closing while fading, or after removal, is a no-op.
        assert!(!ToastState::Retiring.can_retire());
        assert!(!ToastState::Removed.can_retire());
    }

    #[test]
    fn dismiss_detaches_at_most_once() {
        assert_eq!(dismiss_action(ToastState::Active), DismissAction::CancelAndDetach);
        assert_eq!(dismiss_action(ToastState::Inserted), DismissAction::CancelAndDetach);
        // A click during the fade-out cuts it short without a second death hook.
        assert_eq!(dismiss_action(ToastState::Retiring), DismissAction::DetachOnly);
        assert_eq!(dismiss_action(ToastState::Removed), DismissAction::Ignore);
    }
}
