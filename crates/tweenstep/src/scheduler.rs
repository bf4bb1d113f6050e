//! Frame scheduling
//!
//! The animator never talks to a display loop directly. It consumes the
//! host's frame primitives through [`FrameScheduler`]: a wall clock,
//! "call me before the next repaint", and cancellation of a pending
//! request. [`ManualScheduler`] implements the same primitives over a
//! virtual clock so stepping can be driven deterministically in tests and
//! headless hosts.

use std::cell::RefCell;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle for a pending frame request
    pub struct FrameRequestId;
}

/// One-shot frame callback, invoked with the current time in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Host-provided frame primitives
pub trait FrameScheduler {
    /// Milliseconds since an arbitrary epoch, monotonically non-decreasing
    fn now(&self) -> f64;

    /// Schedule `callback` to run before the next frame
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId;

    /// Cancel a pending request. Unknown or already-fired ids are ignored
    fn cancel_frame(&self, id: FrameRequestId);
}

/// Virtual-clock scheduler for deterministic frame stepping
pub struct ManualScheduler {
    inner: RefCell<ManualInner>,
}

struct ManualInner {
    now_ms: f64,
    pending: SlotMap<FrameRequestId, FrameCallback>,
}

impl ManualScheduler {
    /// Create a scheduler with its clock at zero
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(ManualInner {
                now_ms: 0.0,
                pending: SlotMap::with_key(),
            }),
        }
    }

    /// Number of requests waiting for the next frame
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Advance the clock by `dt_ms` and fire one frame.
    ///
    /// Only callbacks that were pending before the advance run. Requests
    /// made while firing wait for the next call, matching display-refresh
    /// granularity.
    pub fn advance(&self, dt_ms: f64) {
        let (now, due) = {
            let mut inner = self.inner.borrow_mut();
            inner.now_ms += dt_ms;
            let now = inner.now_ms;
            let keys: SmallVec<[FrameRequestId; 8]> = inner.pending.keys().collect();
            let mut due: SmallVec<[FrameCallback; 8]> = SmallVec::new();
            for key in keys {
                if let Some(callback) = inner.pending.remove(key) {
                    due.push(callback);
                }
            }
            (now, due)
        };
        // Borrow released: callbacks are free to request the next frame
        for callback in due {
            callback(now);
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn now(&self) -> f64 {
        self.inner.borrow().now_ms
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        self.inner.borrow_mut().pending.insert(callback)
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        self.inner.borrow_mut().pending.remove(id);
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}
