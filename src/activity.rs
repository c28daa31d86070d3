use tracing::debug;

use crate::timer::Phase;

/// Converts raw input events into a single coalesced "activity" signal.
///
/// Armed if and only if the timer is Waiting and no drag is in flight.
/// That invariant lives here alone: callers re-run [`sync`] after every
/// transition and drag edge instead of toggling listeners ad hoc.
///
/// [`sync`]: ActivityDetector::sync
#[derive(Debug, Default)]
pub struct ActivityDetector {
    armed: bool,
    fired: bool,
}

impl ActivityDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed(&self) -> bool {
        self.armed
    }

    /// Recompute the armed state from the current phase and drag flag.
    /// Idempotent; re-arming clears the coalescing latch.
    pub fn sync(&mut self, phase: Phase, dragging: bool) {
        let should_arm = phase == Phase::Waiting && !dragging;
        if should_arm != self.armed {
            debug!(
                "activity detector {}",
                if should_arm { "armed" } else { "disarmed" }
            );
            if should_arm {
                self.fired = false;
            }
        }
        self.armed = should_arm;
    }

    /// Report a raw input event. Returns true at most once per armed
    /// period; further events before the resulting transition coalesce
    /// into nothing.
    pub fn observe(&mut self) -> bool {
        if self.armed && !self.fired {
            self.fired = true;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_while_armed() {
        let mut detector = ActivityDetector::new();
        detector.sync(Phase::Waiting, false);
        assert!(detector.observe());
        assert!(!detector.observe());
        assert!(!detector.observe());
    }

    #[test]
    fn never_fires_outside_waiting() {
        let mut detector = ActivityDetector::new();
        for phase in [Phase::Working, Phase::Resting, Phase::Completing] {
            detector.sync(phase, false);
            assert!(!detector.armed());
            assert!(!detector.observe());
        }
    }

    #[test]
    fn disarmed_while_dragging() {
        let mut detector = ActivityDetector::new();
        detector.sync(Phase::Waiting, true);
        assert!(!detector.observe());

        // Drag released: re-armed, latch cleared
        detector.sync(Phase::Waiting, false);
        assert!(detector.observe());
    }

    #[test]
    fn rearming_clears_the_latch() {
        let mut detector = ActivityDetector::new();
        detector.sync(Phase::Waiting, false);
        assert!(detector.observe());

        detector.sync(Phase::Working, false);
        detector.sync(Phase::Waiting, false);
        assert!(detector.observe());
    }

    #[test]
    fn sync_is_idempotent() {
        let mut detector = ActivityDetector::new();
        detector.sync(Phase::Waiting, false);
        assert!(detector.observe());
        // Same inputs again must not clear the latch
        detector.sync(Phase::Waiting, false);
        assert!(!detector.observe());
    }
}
