use std::f64::consts::PI;

use super::{lerp, AnimParams};

/// Completion tick interval (~30 FPS).
pub const TICK_MS: u64 = 33;
/// Total length of the celebration.
pub const DURATION_MS: u64 = 5000;
/// Number of ticks until the animation reports itself finished.
pub const TOTAL_FRAMES: u64 = DURATION_MS.div_ceil(TICK_MS);

/// The fixed 5-second "dizzy" celebration bridging Working and Resting.
/// Created with frame 0 on entering Completing, destroyed when it ends.
#[derive(Debug, Default)]
pub struct CompletionAnimation {
    frame: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionFrame {
    Running(AnimParams),
    Finished,
}

impl CompletionAnimation {
    pub fn new() -> Self {
        Self { frame: 0 }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Fraction of the celebration elapsed, clamped to [0, 1].
    pub fn progress(&self) -> f64 {
        ((self.frame * TICK_MS) as f64 / DURATION_MS as f64).min(1.0)
    }

    /// Advance one 33 ms tick. Yields `Finished` exactly once the elapsed
    /// animation time reaches the full duration.
    pub fn advance(&mut self) -> CompletionFrame {
        self.frame += 1;
        if self.frame * TICK_MS >= DURATION_MS {
            CompletionFrame::Finished
        } else {
            CompletionFrame::Running(params_at(self.progress()))
        }
    }
}

/// Dizzy params as a pure function of celebration progress `p ∈ [0, 1]`.
pub fn params_at(p: f64) -> AnimParams {
    // Scale envelope: rapid growth, plateau at 6x, shrink back
    let base_scale = if p < 0.2 {
        lerp(1.0, 6.0, p / 0.2)
    } else if p < 0.7 {
        6.0
    } else {
        lerp(6.0, 1.0, (p - 0.7) / 0.3)
    };

    // Superimposed wobbles at three frequencies
    let wobble = (p * PI * 18.0).sin() + 0.5 * (p * PI * 28.0).sin() + 0.3 * (p * PI * 40.0).sin();

    AnimParams {
        scale: (base_scale + wobble).clamp(0.5, 7.0),
        // Two full turns plus a swinging overshoot
        rotation_deg: 720.0 * p + 180.0 * (p * PI * 8.0).sin(),
        morph: 0.8 * (p * PI * 12.0).sin(),
        opacity: (0.6 + 0.3 * (p * PI * 15.0).sin() + 0.2 * (p * PI * 25.0).sin()).clamp(0.3, 1.0),
    }
}
