//! Timed transitions driving the toast lifecycle.
//!
//! A [`Transition`] is a glib timer stepped at ~60fps that reports progress
//! in `0.0..=1.0` and fires a completion callback exactly once. The visual
//! side (opacity, lifespan bar fraction) is fed from the tick callback; the
//! completion callback is the authoritative end-of-phase signal, so state
//! changes never depend on CSS animation timing.
//!
//! The countdown transition is pausable: elapsed time is banked across
//! pause/resume cycles, so hovering a toast freezes its remaining lifetime.
//! Completion callbacks may re-enter the transition (the toast's completion
//! handlers cancel the finished phase before arming the next one), so no
//! cell borrow is held while a callback runs.

use gtk4::glib::{self, ControlFlow, SourceId};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::trace;

const STEP_MS: u64 = 16; // ~60fps

/// Which lifecycle phase a transition drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Slide/fade in right after the card is added to its stack.
    Insert,
    /// The visible lifetime countdown.
    Countdown,
    /// Fade out before the card is removed.
    FadeOut,
}

type TickFn = Box<dyn Fn(f64)>;
type DoneFn = Box<dyn FnOnce()>;

/// Elapsed-time bookkeeping for one phase, kept separate from the glib
/// source so the pause/resume math stands on its own.
#[derive(Debug)]
struct PhaseClock {
    duration: Duration,
    /// Time accumulated over completed run stretches.
    banked: Duration,
    /// Start of the current run stretch; `None` while paused.
    started_at: Option<Instant>,
}

impl PhaseClock {
    fn new(duration: Duration) -> Self {
        Self {
            duration,
            banked: Duration::ZERO,
            started_at: None,
        }
    }

    fn reset(&mut self) {
        self.banked = Duration::ZERO;
        self.started_at = None;
    }

    fn resume_at(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Bank the current run stretch. Returns false when already paused.
    fn pause_at(&mut self, now: Instant) -> bool {
        match self.started_at.take() {
            Some(started) => {
                self.banked += now.saturating_duration_since(started);
                true
            }
            None => false,
        }
    }

    /// Fraction of the duration elapsed, clamped to `0.0..=1.0`. A zero
    /// duration is always complete.
    fn progress_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let running = self
            .started_at
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or(Duration::ZERO);
        let elapsed = self.banked + running;
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

/// A pausable timer for one lifecycle phase.
pub struct Transition {
    kind: TransitionKind,
    clock: RefCell<PhaseClock>,
    source: RefCell<Option<SourceId>>,
    on_tick: RefCell<Option<TickFn>>,
    on_done: RefCell<Option<DoneFn>>,
}

impl Transition {
    pub fn new(kind: TransitionKind, duration_ms: u64) -> Rc<Self> {
        Rc::new(Self {
            kind,
            clock: RefCell::new(PhaseClock::new(Duration::from_millis(duration_ms))),
            source: RefCell::new(None),
            on_tick: RefCell::new(None),
            on_done: RefCell::new(None),
        })
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Fraction of the duration that has elapsed, clamped to `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        self.clock.borrow().progress_at(Instant::now())
    }

    /// Start the transition. A zero duration completes on the first tick.
    pub fn start(self: &Rc<Self>, on_tick: impl Fn(f64) + 'static, on_done: impl FnOnce() + 'static) {
        self.install(Box::new(on_tick), Box::new(on_done));
        self.clock.borrow_mut().reset();
        self.resume();
    }

    fn install(&self, on_tick: TickFn, on_done: DoneFn) {
        *self.on_tick.borrow_mut() = Some(on_tick);
        *self.on_done.borrow_mut() = Some(on_done);
    }

    /// Pause the timer, banking the elapsed time. No-op when not running.
    pub fn pause(&self) {
        if let Some(source) = self.source.borrow_mut().take() {
            source.remove();
        }
        if self.clock.borrow_mut().pause_at(Instant::now()) {
            trace!(kind = ?self.kind, progress = self.progress(), "transition paused");
        }
    }

    /// Resume after a pause. No-op when already running or finished.
    pub fn resume(self: &Rc<Self>) {
        if self.source.borrow().is_some() || self.on_done.borrow().is_none() {
            return;
        }
        self.clock.borrow_mut().resume_at(Instant::now());

        let weak = Rc::downgrade(self);
        let source = glib::timeout_add_local(Duration::from_millis(STEP_MS), move || {
            let Some(transition) = weak.upgrade() else {
                return ControlFlow::Break;
            };
            transition.tick()
        });
        *self.source.borrow_mut() = Some(source);
    }

    fn tick(self: &Rc<Self>) -> ControlFlow {
        let progress = self.progress();
        if let Some(on_tick) = self.on_tick.borrow().as_ref() {
            on_tick(progress);
        }
        if progress >= 1.0 {
            // The source returns Break below, so glib removes it itself.
            self.source.borrow_mut().take();
            self.clock.borrow_mut().pause_at(Instant::now());
            // Move the callback out before invoking it: completion handlers
            // cancel this transition while arming the next phase, which
            // re-enters the callback cells.
            let on_done = self.on_done.borrow_mut().take();
            if let Some(on_done) = on_done {
                trace!(kind = ?self.kind, "transition complete");
                on_done();
            }
            ControlFlow::Break
        } else {
            ControlFlow::Continue
        }
    }

    /// Stop the timer and drop the callbacks without firing completion.
    pub fn cancel(&self) {
        self.pause();
        self.on_tick.borrow_mut().take();
        self.on_done.borrow_mut().take();
    }
}

impl Drop for Transition {
    fn drop(&mut self) {
        if let Some(source) = self.source.borrow_mut().take() {
            source.remove();
        }
    }
}

/// Ease-out cubic, used for insert/fade opacity curves.
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
    }

    #[test]
    fn ease_out_cubic_front_loads_motion() {
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn clock_progress_advances_while_running() {
        let t0 = Instant::now();
        let mut clock = PhaseClock::new(Duration::from_millis(100));
        clock.resume_at(t0);

        assert_eq!(clock.progress_at(t0), 0.0);
        assert!((clock.progress_at(t0 + Duration::from_millis(50)) - 0.5).abs() < 1e-9);
        assert_eq!(clock.progress_at(t0 + Duration::from_secs(10)), 1.0);
    }

    #[test]
    fn clock_freezes_while_paused_and_banks_on_resume() {
        let t0 = Instant::now();
        let mut clock = PhaseClock::new(Duration::from_millis(100));
        clock.resume_at(t0);

        assert!(clock.pause_at(t0 + Duration::from_millis(40)));
        // Paused time does not count, however long it lasts.
        assert!((clock.progress_at(t0 + Duration::from_secs(5)) - 0.4).abs() < 1e-9);
        // A second pause is a no-op.
        assert!(!clock.pause_at(t0 + Duration::from_secs(5)));

        clock.resume_at(t0 + Duration::from_secs(5));
        let later = t0 + Duration::from_secs(5) + Duration::from_millis(30);
        assert!((clock.progress_at(later) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_clock_is_always_complete() {
        let t0 = Instant::now();
        let clock = PhaseClock::new(Duration::ZERO);
        assert_eq!(clock.progress_at(t0), 1.0);
    }

    #[test]
    fn clock_reset_discards_banked_time() {
        let t0 = Instant::now();
        let mut clock = PhaseClock::new(Duration::from_millis(100));
        clock.resume_at(t0);
        clock.pause_at(t0 + Duration::from_millis(80));

        clock.reset();
        assert_eq!(clock.progress_at(t0 + Duration::from_secs(1)), 0.0);
    }

    #[test]
    fn completion_callback_may_cancel_the_transition() {
        // The toast's phase handlers cancel the finished transition while
        // swapping in the next one; completion must tolerate that re-entry.
        let transition = Transition::new(TransitionKind::Countdown, 0);
        let fired = Rc::new(Cell::new(0u32));

        let weak = Rc::downgrade(&transition);
        let fired_in = Rc::clone(&fired);
        transition.install(
            Box::new(|_| {}),
            Box::new(move || {
                fired_in.set(fired_in.get() + 1);
                if let Some(t) = weak.upgrade() {
                    t.cancel();
                }
            }),
        );

        assert!(matches!(transition.tick(), ControlFlow::Break));
        assert_eq!(fired.get(), 1);

        // A later tick finds no pending completion and stays inert.
        assert!(matches!(transition.tick(), ControlFlow::Break));
        assert_eq!(fired.get(), 1);
    }
}
