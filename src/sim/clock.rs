//! Frame clock
//!
//! Turns successive callback timestamps into a delta multiplier relative to
//! the 60 Hz target, so per-frame quantities stay rate independent.

use crate::consts::{MAX_FRAME_DELTA_MS, TARGET_FRAME_MS};

/// Timing for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Wall-clock timestamp of this callback (ms)
    pub now_ms: f64,
    /// Elapsed time normalized to the target frame interval (>= 0)
    pub multiplier: f32,
}

impl Frame {
    /// A frame exactly one target interval long
    pub fn nominal(now_ms: f64) -> Self {
        Self {
            now_ms,
            multiplier: 1.0,
        }
    }

    /// Zero-length frames mutate nothing
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.multiplier <= 0.0
    }
}

/// Tracks the previous callback timestamp
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Forget the previous timestamp; the next frame is nominal.
    ///
    /// Called on start and resume so paused wall time never becomes a delta.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Advance to `now_ms` and return the frame timing
    pub fn advance(&mut self, now_ms: f64) -> Frame {
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            return Frame::nominal(now_ms);
        };

        let delta = now_ms - last;
        if delta <= 0.0 || !delta.is_finite() {
            // Duplicate or out-of-order timestamp: never move time backwards
            return Frame {
                now_ms: last,
                multiplier: 0.0,
            };
        }

        self.last_ms = Some(now_ms);
        let delta = delta.min(MAX_FRAME_DELTA_MS);
        Frame {
            now_ms,
            multiplier: (delta / TARGET_FRAME_MS) as f32,
        }
    }
}
