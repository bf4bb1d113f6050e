//! Tweenstep
//!
//! Cancellable, frame-driven value interpolation:
//!
//! - **Easing table**: closed-form curves behind a tagged [`Easing`] enum,
//!   with string-name dispatch that rejects unknown names
//! - **Tween driver**: steps a from → to interpolation once per frame,
//!   invoking a step callback with the current value and a completion
//!   callback exactly once at the end
//! - **Scheduler abstraction**: frame timing is injected through
//!   [`FrameScheduler`], so hosts plug in their display loop and tests drive
//!   a virtual clock with [`ManualScheduler`]
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use tweenstep::{Easing, ManualScheduler, Tween};
//!
//! let scheduler = Rc::new(ManualScheduler::new());
//! let handle = Tween::new(0.0, 100.0)
//!     .duration_ms(1000.0)
//!     .easing(Easing::BounceOut)
//!     .on_step(|value| println!("at {value}"))
//!     .on_done(|| println!("done"))
//!     .start(&scheduler)
//!     .unwrap();
//!
//! // Drive frames deterministically: 16 ms per frame
//! for _ in 0..70 {
//!     scheduler.advance(16.0);
//! }
//! assert!(!handle.is_running());
//! ```

pub mod easing;
pub mod error;
pub mod scheduler;
pub mod tween;

pub use easing::Easing;
pub use error::{Result, TweenError};
pub use scheduler::{FrameCallback, FrameRequestId, FrameScheduler, ManualScheduler};
pub use tween::{DoneFn, StepFn, Tween, TweenHandle};
