pub mod completion;

use std::f64::consts::PI;
use std::time::Duration;

/// Render parameters produced by an animation regime. Applied to every
/// shape in the scene, pivoted at the widget center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimParams {
    pub scale: f64,
    pub opacity: f64,
    pub rotation_deg: f64,
    /// Circle-to-ellipse distortion in [-1, 1]. Positive widens the
    /// horizontal axis and shrinks the vertical one.
    pub morph: f64,
}

impl AnimParams {
    pub const IDENTITY: AnimParams = AnimParams {
        scale: 1.0,
        opacity: 1.0,
        rotation_deg: 0.0,
        morph: 0.0,
    };
}

impl Default for AnimParams {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The active formula set mapping animation frames to render parameters.
///
/// `Idle` is the Working regime: the progress pie renders undistorted and
/// no animation tick runs at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Idle,
    /// Waiting: slow breathing, ~3 s cycle
    Breathing,
    /// Resting: fast pulse, ~1 s cycle
    Pulse,
}

impl Regime {
    /// Tick interval for this regime, or None when no tick should run.
    pub fn tick_interval(self) -> Option<Duration> {
        match self {
            Regime::Idle => None,
            Regime::Breathing => Some(Duration::from_millis(100)),
            Regime::Pulse => Some(Duration::from_millis(50)),
        }
    }
}

/// Owned animation state: regime, phase-relative frame counter, and the
/// params computed for the current frame.
#[derive(Debug)]
pub struct AnimationState {
    pub regime: Regime,
    pub frame: u64,
    pub params: AnimParams,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationState {
    pub fn new() -> Self {
        Self {
            regime: Regime::Idle,
            frame: 0,
            params: AnimParams::IDENTITY,
        }
    }

    /// Switch regime. The frame counter is phase-relative, so it resets,
    /// and the params snap back to identity.
    pub fn set_regime(&mut self, regime: Regime) {
        self.regime = regime;
        self.frame = 0;
        self.params = AnimParams::IDENTITY;
    }

    /// Advance one animation tick. Params are a pure function of the
    /// frame counter.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        self.params = match self.regime {
            Regime::Idle => AnimParams::IDENTITY,
            Regime::Breathing => breathing(self.frame),
            Regime::Pulse => pulse(self.frame),
        };
    }
}

fn breathing(frame: u64) -> AnimParams {
    let cycle = (frame as f64 * 0.1) % (2.0 * PI);
    AnimParams {
        scale: 1.0 + 0.1 * (cycle * 0.5).sin(),
        opacity: 0.7 + 0.3 * (cycle * 0.5).sin(),
        ..AnimParams::IDENTITY
    }
}

fn pulse(frame: u64) -> AnimParams {
    let cycle = (frame as f64 * 0.05) % (2.0 * PI);
    AnimParams {
        scale: 1.0 + 0.2 * (cycle * 2.0).sin(),
        opacity: 0.6 + 0.4 * (cycle * 2.0).sin(),
        ..AnimParams::IDENTITY
    }
}

/// Linear interpolation
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
