//! Easing functions for tweens
//!
//! Each variant evaluates a pure function of `(t, b, c, d)`: `t` is the
//! elapsed time, `b` the base value, `c` the change magnitude and `d` the
//! total duration, times in milliseconds. The animator always passes
//! `b = 0, c = 1` and treats the result as a progress ratio.

use std::str::FromStr;

use crate::error::TweenError;

/// Easing curve selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Symmetric cubic: accelerate to the midpoint, decelerate after it
    #[default]
    InOut,
    /// Four-segment bounce with decreasing amplitude
    BounceOut,
}

impl Easing {
    /// Evaluate the curve at elapsed time `t`
    pub fn apply(&self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        match self {
            Easing::InOut => ease_in_out(t, b, c, d),
            Easing::BounceOut => ease_out_bounce(t, b, c, d),
        }
    }
}

impl FromStr for Easing {
    type Err = TweenError;

    /// Resolve an easing by name, rejecting unknown names at call time
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "easeInOut" => Ok(Easing::InOut),
            "easeOutBounce" => Ok(Easing::BounceOut),
            other => Err(TweenError::UnknownEasing(other.to_string())),
        }
    }
}

fn ease_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let mut t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t * t + b;
    }
    t -= 2.0;
    c / 2.0 * (t * t * t + 2.0) + b
}

fn ease_out_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let mut t = t / d;
    // The terminal endpoint is always exact
    if t >= 1.0 {
        return b + c;
    }
    if t < 1.0 / 2.75 {
        c * (7.5625 * t * t) + b
    } else if t < 2.0 / 2.75 {
        t -= 1.5 / 2.75;
        c * (7.5625 * t * t + 0.75) + b
    } else if t < 2.5 / 2.75 {
        t -= 2.25 / 2.75;
        c * (7.5625 * t * t + 0.9375) + b
    } else {
        t -= 2.625 / 2.75;
        c * (7.5625 * t * t + 0.984375) + b
    }
}
