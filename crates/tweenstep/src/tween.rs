//! Tween driver
//!
//! A [`Tween`] interpolates a value from `from` to `to` over a fixed
//! duration, stepping once per frame of an injected
//! [`FrameScheduler`](crate::scheduler::FrameScheduler). Each step computes
//! the elapsed time, asks the easing curve for a progress ratio, clamps it,
//! and hands the interpolated value to the step callback. When the unclamped
//! ratio reaches 1 the completion callback fires exactly once and the
//! session ends.
//!
//! Sessions are independent: any number of tweens may run interleaved on one
//! scheduler without coordination. The model is single-threaded and
//! cooperative, so session state lives in `Rc<RefCell<..>>`.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::easing::Easing;
use crate::error::{Result, TweenError};
use crate::scheduler::{FrameRequestId, FrameScheduler};

/// Per-frame step callback
pub type StepFn = Box<dyn FnMut(f64)>;
/// One-shot completion callback
pub type DoneFn = Box<dyn FnOnce()>;

const DEFAULT_DURATION_MS: f64 = 500.0;

/// Builder for a single from → to interpolation
pub struct Tween {
    from: f64,
    to: f64,
    duration_ms: f64,
    easing: Easing,
    on_step: StepFn,
    on_done: Option<DoneFn>,
}

impl Tween {
    /// Create a tween with the default duration (500 ms) and easing
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::default(),
            on_step: Box::new(|_| {}),
            on_done: None,
        }
    }

    /// Set the duration in milliseconds
    pub fn duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the easing curve
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Invoke `callback` with the current value on every frame, the
    /// terminal one included
    pub fn on_step<F: FnMut(f64) + 'static>(mut self, callback: F) -> Self {
        self.on_step = Box::new(callback);
        self
    }

    /// Invoke `callback` once when the tween reaches its end
    pub fn on_done<F: FnOnce() + 'static>(mut self, callback: F) -> Self {
        self.on_done = Some(Box::new(callback));
        self
    }

    /// Start stepping on `scheduler`.
    ///
    /// Captures the start time, runs the first step synchronously, and
    /// returns a handle that cancels further stepping. The duration must be
    /// finite and greater than zero.
    pub fn start<S>(self, scheduler: &Rc<S>) -> Result<TweenHandle>
    where
        S: FrameScheduler + 'static,
    {
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(TweenError::InvalidDuration(self.duration_ms));
        }

        let scheduler: Rc<dyn FrameScheduler> = Rc::<S>::clone(scheduler);
        let start_ms = scheduler.now();
        debug!(
            from = self.from,
            to = self.to,
            duration_ms = self.duration_ms,
            "tween start"
        );

        let session = Rc::new(RefCell::new(Session {
            from: self.from,
            span: self.to - self.from,
            duration_ms: self.duration_ms,
            easing: self.easing,
            start_ms,
            stopped: false,
            finished: false,
            pending: None,
            on_step: self.on_step,
            on_done: self.on_done,
            scheduler,
        }));
        step(&session, start_ms);

        Ok(TweenHandle { session })
    }
}

/// Mutable session record for one running tween.
///
/// Invariant: at most one frame request is pending at any time. `pending`
/// is cleared when the step fires and repopulated only if another frame is
/// requested.
struct Session {
    from: f64,
    span: f64,
    duration_ms: f64,
    easing: Easing,
    start_ms: f64,
    stopped: bool,
    finished: bool,
    pending: Option<FrameRequestId>,
    on_step: StepFn,
    on_done: Option<DoneFn>,
    scheduler: Rc<dyn FrameScheduler>,
}

/// One frame of the loop.
///
/// User callbacks run with no `RefCell` borrow held, so they may cancel the
/// tween re-entrantly; the stopped flag is re-checked afterwards.
fn step(session: &Rc<RefCell<Session>>, now_ms: f64) {
    let (value, finished, mut on_step) = {
        let mut s = session.borrow_mut();
        if s.stopped {
            return;
        }
        s.pending = None;
        let elapsed = now_ms - s.start_ms;
        let ratio = s.easing.apply(elapsed, 0.0, 1.0, s.duration_ms);
        let value = s.span * ratio.clamp(0.0, 1.0) + s.from;
        let on_step = mem::replace(&mut s.on_step, Box::new(|_| {}));
        (value, ratio >= 1.0, on_step)
    };

    trace!(value, now_ms, "tween step");
    on_step(value);

    let mut s = session.borrow_mut();
    s.on_step = on_step;
    if s.stopped {
        return;
    }

    if finished {
        s.finished = true;
        let on_done = s.on_done.take();
        drop(s);
        debug!("tween complete");
        if let Some(on_done) = on_done {
            on_done();
        }
    } else {
        let scheduler = Rc::clone(&s.scheduler);
        drop(s);
        let strong = Rc::clone(session);
        let id = scheduler.request_frame(Box::new(move |now| step(&strong, now)));
        session.borrow_mut().pending = Some(id);
    }
}

/// Cancellation handle returned by [`Tween::start`].
///
/// Dropping the handle does not stop the tween; the scheduled frame keeps
/// the session alive until it completes or [`cancel`](Self::cancel) is
/// called.
pub struct TweenHandle {
    session: Rc<RefCell<Session>>,
}

impl TweenHandle {
    /// Stop stepping: no further step or completion callback fires.
    ///
    /// Idempotent. Extra calls, or calls after natural completion, are
    /// no-ops.
    pub fn cancel(&self) {
        let (scheduler, pending, was_stopped) = {
            let mut s = self.session.borrow_mut();
            let was_stopped = s.stopped;
            s.stopped = true;
            (Rc::clone(&s.scheduler), s.pending.take(), was_stopped)
        };
        if let Some(id) = pending {
            scheduler.cancel_frame(id);
        }
        if !was_stopped {
            debug!("tween cancelled");
        }
    }

    /// Whether the tween is still stepping
    pub fn is_running(&self) -> bool {
        let s = self.session.borrow();
        !s.stopped && !s.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use std::cell::Cell;

    const FRAME_MS: f64 = 16.0;

    fn drive(scheduler: &Rc<ManualScheduler>, frames: usize) {
        for _ in 0..frames {
            scheduler.advance(FRAME_MS);
        }
    }

    #[test]
    fn runs_to_completion_and_ends_on_the_target() {
        let scheduler = Rc::new(ManualScheduler::new());
        let steps = Rc::new(RefCell::new(Vec::new()));
        let done = Rc::new(Cell::new(0));
        let step_sink = Rc::clone(&steps);
        let done_count = Rc::clone(&done);
        let handle = Tween::new(0.0, 100.0)
            .duration_ms(1000.0)
            .on_step(move |v| step_sink.borrow_mut().push(v))
            .on_done(move || done_count.set(done_count.get() + 1))
            .start(&scheduler)
            .unwrap();

        // First step runs synchronously, before any frame
        assert_eq!(steps.borrow().first().copied(), Some(0.0));
        assert!(handle.is_running());

        drive(&scheduler, 70); // 1120 ms of virtual time
        assert_eq!(done.get(), 1);
        assert_eq!(steps.borrow().last().copied(), Some(100.0));
        assert!(!handle.is_running());
        assert_eq!(scheduler.pending_count(), 0);

        // Nothing left to fire; cancel after completion is a no-op
        handle.cancel();
        drive(&scheduler, 5);
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn cancel_stops_stepping_and_suppresses_completion() {
        let scheduler = Rc::new(ManualScheduler::new());
        let steps = Rc::new(Cell::new(0));
        let done = Rc::new(Cell::new(0));
        let step_count = Rc::clone(&steps);
        let done_count = Rc::clone(&done);
        let handle = Tween::new(0.0, 100.0)
            .duration_ms(1000.0)
            .on_step(move |_| step_count.set(step_count.get() + 1))
            .on_done(move || done_count.set(done_count.get() + 1))
            .start(&scheduler)
            .unwrap();

        scheduler.advance(FRAME_MS);
        let seen = steps.get();
        assert_eq!(seen, 2); // synchronous step + one frame

        handle.cancel();
        assert_eq!(scheduler.pending_count(), 0);
        drive(&scheduler, 80);
        assert_eq!(steps.get(), seen);
        assert_eq!(done.get(), 0);

        // Cancelling twice is indistinguishable from cancelling once
        handle.cancel();
        drive(&scheduler, 5);
        assert_eq!(steps.get(), seen);
        assert_eq!(done.get(), 0);
    }

    #[test]
    fn degenerate_span_still_steps_and_completes() {
        let scheduler = Rc::new(ManualScheduler::new());
        let steps = Rc::new(RefCell::new(Vec::new()));
        let done = Rc::new(Cell::new(0));
        let step_sink = Rc::clone(&steps);
        let done_count = Rc::clone(&done);
        Tween::new(10.0, 10.0)
            .duration_ms(500.0)
            .on_step(move |v| step_sink.borrow_mut().push(v))
            .on_done(move || done_count.set(done_count.get() + 1))
            .start(&scheduler)
            .unwrap();

        drive(&scheduler, 35); // 560 ms of virtual time
        assert!(steps.borrow().iter().all(|&v| v == 10.0));
        assert!(steps.borrow().len() > 1);
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn bounce_tween_ends_exactly_on_the_target() {
        let scheduler = Rc::new(ManualScheduler::new());
        let last = Rc::new(Cell::new(f64::NAN));
        let done = Rc::new(Cell::new(0));
        let last_value = Rc::clone(&last);
        let done_count = Rc::clone(&done);
        Tween::new(0.0, 1.0)
            .duration_ms(500.0)
            .easing(Easing::BounceOut)
            .on_step(move |v| last_value.set(v))
            .on_done(move || done_count.set(done_count.get() + 1))
            .start(&scheduler)
            .unwrap();

        drive(&scheduler, 40);
        assert_eq!(last.get(), 1.0);
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn cancel_from_inside_the_step_callback() {
        let scheduler = Rc::new(ManualScheduler::new());
        let slot: Rc<RefCell<Option<TweenHandle>>> = Rc::new(RefCell::new(None));
        let steps = Rc::new(Cell::new(0));
        let done = Rc::new(Cell::new(0));
        let handle_slot = Rc::clone(&slot);
        let step_count = Rc::clone(&steps);
        let done_count = Rc::clone(&done);
        let handle = Tween::new(0.0, 100.0)
            .duration_ms(1000.0)
            .on_step(move |_| {
                step_count.set(step_count.get() + 1);
                if step_count.get() == 2 {
                    if let Some(handle) = handle_slot.borrow().as_ref() {
                        handle.cancel();
                    }
                }
            })
            .on_done(move || done_count.set(done_count.get() + 1))
            .start(&scheduler)
            .unwrap();
        *slot.borrow_mut() = Some(handle);

        drive(&scheduler, 80);
        assert_eq!(steps.get(), 2);
        assert_eq!(done.get(), 0);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn at_most_one_frame_request_is_pending_per_session() {
        let scheduler = Rc::new(ManualScheduler::new());
        let done = Rc::new(Cell::new(0));
        let done_count = Rc::clone(&done);
        Tween::new(0.0, 1.0)
            .duration_ms(200.0)
            .on_done(move || done_count.set(done_count.get() + 1))
            .start(&scheduler)
            .unwrap();

        while done.get() == 0 {
            assert!(scheduler.pending_count() <= 1);
            scheduler.advance(FRAME_MS);
        }
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn rejects_non_positive_or_non_finite_durations() {
        let scheduler = Rc::new(ManualScheduler::new());
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = Tween::new(0.0, 1.0)
                .duration_ms(bad)
                .start(&scheduler)
                .map(|_| ());
            assert!(matches!(result, Err(TweenError::InvalidDuration(_))));
        }
        assert_eq!(scheduler.pending_count(), 0);
    }
}
