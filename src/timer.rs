use tracing::info;

/// Coarse operating mode of the timer.
///
/// `Completing` is the transient celebration bridge between `Working`
/// and `Resting`; it is driven by the completion animation ticks, never
/// by the 1-second state tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Working,
    Resting,
    Completing,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Waiting => "Waiting",
            Phase::Working => "Working",
            Phase::Resting => "Resting",
            Phase::Completing => "Completing",
        }
    }
}

/// A phase change that just fired. Returned to the caller so collaborator
/// side effects (animation regime, sound, listener arming) are applied in
/// one place rather than scattered across handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    BeginWork,
    BeginCompleting,
    BeginResting,
    BeginWaiting,
}

/// The single owned timer state: phase, elapsed counter, pause and
/// drag/lock flags. All mutation goes through the operations below.
#[derive(Debug)]
pub struct PhaseState {
    pub phase: Phase,
    pub elapsed_secs: u32,
    /// Fraction of the timed phase remaining, 1.0 → 0.0.
    /// By convention 1.0 in Waiting (full idle circle).
    pub progress: f64,
    pub paused: bool,
    pub locked: bool,
    pub dragging: bool,
    work_duration: u32,
    rest_duration: u32,
}

impl PhaseState {
    pub fn new(work_duration_secs: u32, rest_duration_secs: u32) -> Self {
        Self {
            phase: Phase::Waiting,
            elapsed_secs: 0,
            progress: 1.0,
            paused: false,
            locked: false,
            dragging: false,
            work_duration: work_duration_secs,
            rest_duration: rest_duration_secs,
        }
    }

    pub fn work_duration_secs(&self) -> u32 {
        self.work_duration
    }

    pub fn rest_duration_secs(&self) -> u32 {
        self.rest_duration
    }

    /// Seconds left in the current timed phase, if in one.
    pub fn remaining_secs(&self) -> Option<u32> {
        match self.phase {
            Phase::Working => Some(self.work_duration.saturating_sub(self.elapsed_secs)),
            Phase::Resting => Some(self.rest_duration.saturating_sub(self.elapsed_secs)),
            Phase::Waiting | Phase::Completing => None,
        }
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.elapsed_secs = 0;
        self.progress = 1.0;
        self.paused = false;
        info!("entering {} phase", phase.label());
    }

    /// Advance the 1-second state tick. No-op while paused or in a phase
    /// without a duration (Waiting, Completing).
    pub fn tick(&mut self) -> Option<Transition> {
        if self.paused || matches!(self.phase, Phase::Waiting | Phase::Completing) {
            return None;
        }
        self.elapsed_secs += 1;
        match self.phase {
            Phase::Working => {
                if self.elapsed_secs >= self.work_duration {
                    self.enter(Phase::Completing);
                    return Some(Transition::BeginCompleting);
                }
                self.progress = remaining_fraction(self.elapsed_secs, self.work_duration);
                None
            }
            Phase::Resting => {
                if self.elapsed_secs >= self.rest_duration {
                    self.enter(Phase::Waiting);
                    return Some(Transition::BeginWaiting);
                }
                self.progress = remaining_fraction(self.elapsed_secs, self.rest_duration);
                None
            }
            Phase::Waiting | Phase::Completing => None,
        }
    }

    /// A coalesced user-activity signal. Only meaningful while idle and
    /// not mid-drag; ignored everywhere else.
    pub fn activity(&mut self) -> Option<Transition> {
        if self.phase == Phase::Waiting && !self.dragging {
            self.enter(Phase::Working);
            Some(Transition::BeginWork)
        } else {
            None
        }
    }

    /// Skip the current timed phase: Working → Completing (same path as
    /// natural completion), Resting → Waiting.
    pub fn skip(&mut self) -> Option<Transition> {
        match self.phase {
            Phase::Working => {
                self.enter(Phase::Completing);
                Some(Transition::BeginCompleting)
            }
            Phase::Resting => {
                self.enter(Phase::Waiting);
                Some(Transition::BeginWaiting)
            }
            Phase::Waiting | Phase::Completing => None,
        }
    }

    /// Freeze the elapsed counter. Valid only in Working/Resting.
    pub fn pause(&mut self) {
        if matches!(self.phase, Phase::Working | Phase::Resting) && !self.paused {
            self.paused = true;
            info!("timer paused at {}s elapsed", self.elapsed_secs);
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            info!("timer resumed");
        }
    }

    /// Restart from any phase, including mid-Completing.
    pub fn restart(&mut self) -> Transition {
        self.paused = false;
        self.enter(Phase::Waiting);
        Transition::BeginWaiting
    }

    /// Called when the completion animation finishes. Ignored outside
    /// Completing so a stale completion tick cannot misfire.
    pub fn completion_finished(&mut self) -> Option<Transition> {
        if self.phase == Phase::Completing {
            self.enter(Phase::Resting);
            Some(Transition::BeginResting)
        } else {
            None
        }
    }

    pub fn toggle_lock(&mut self) -> bool {
        self.locked = !self.locked;
        info!(
            "position {}",
            if self.locked { "locked" } else { "unlocked" }
        );
        self.locked
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }
}

fn remaining_fraction(elapsed: u32, duration: u32) -> f64 {
    if duration == 0 {
        return 0.0;
    }
    (1.0 - elapsed as f64 / duration as f64).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn working_state(work: u32, rest: u32) -> PhaseState {
        let mut state = PhaseState::new(work, rest);
        assert_eq!(state.activity(), Some(Transition::BeginWork));
        state
    }

    #[test]
    fn progress_tracks_elapsed_exactly() {
        let duration = 600;
        let mut state = working_state(duration, 60);
        for n in 1..duration {
            assert_eq!(state.tick(), None);
            let expected = 1.0 - n as f64 / duration as f64;
            assert!((state.progress - expected).abs() < EPS, "at tick {n}");
            assert_eq!(state.elapsed_secs, n);
        }
    }

    #[test]
    fn work_completes_into_completing() {
        let mut state = working_state(3, 60);
        assert_eq!(state.tick(), None);
        assert_eq!(state.tick(), None);
        assert_eq!(state.tick(), Some(Transition::BeginCompleting));
        assert_eq!(state.phase, Phase::Completing);
        assert_eq!(state.elapsed_secs, 0);
        assert!((state.progress - 1.0).abs() < EPS);
    }

    #[test]
    fn pause_freezes_elapsed_and_progress() {
        let mut state = working_state(60, 60);
        state.tick();
        state.tick();
        let frozen_elapsed = state.elapsed_secs;
        let frozen_progress = state.progress;

        state.pause();
        for _ in 0..500 {
            assert_eq!(state.tick(), None);
        }
        assert_eq!(state.elapsed_secs, frozen_elapsed);
        assert!((state.progress - frozen_progress).abs() < EPS);

        state.resume();
        state.tick();
        assert_eq!(state.elapsed_secs, frozen_elapsed + 1);
    }

    #[test]
    fn pause_outside_timed_phases_is_ignored() {
        let mut state = PhaseState::new(60, 60);
        state.pause();
        assert!(!state.paused);

        state.activity();
        state.skip();
        assert_eq!(state.phase, Phase::Completing);
        state.pause();
        assert!(!state.paused);
    }

    #[test]
    fn activity_ignored_outside_waiting_or_while_dragging() {
        let mut state = PhaseState::new(60, 60);
        state.begin_drag();
        assert_eq!(state.activity(), None);
        assert_eq!(state.phase, Phase::Waiting);
        state.end_drag();

        assert_eq!(state.activity(), Some(Transition::BeginWork));
        assert_eq!(state.activity(), None);
        assert_eq!(state.phase, Phase::Working);

        state.skip();
        assert_eq!(state.activity(), None);
        assert_eq!(state.phase, Phase::Completing);
    }

    #[test]
    fn skip_matches_natural_completion() {
        let mut natural = working_state(2, 60);
        natural.tick();
        natural.tick();

        let mut skipped = working_state(2, 60);
        assert_eq!(skipped.skip(), Some(Transition::BeginCompleting));

        assert_eq!(natural.phase, skipped.phase);
        assert_eq!(natural.elapsed_secs, skipped.elapsed_secs);
        assert_eq!(natural.paused, skipped.paused);
    }

    #[test]
    fn skip_from_resting_returns_to_waiting() {
        let mut state = working_state(1, 60);
        state.tick();
        state.completion_finished();
        assert_eq!(state.phase, Phase::Resting);
        assert_eq!(state.skip(), Some(Transition::BeginWaiting));
        assert_eq!(state.phase, Phase::Waiting);
    }

    #[test]
    fn completion_not_driven_by_state_tick() {
        let mut state = working_state(1, 60);
        state.tick();
        assert_eq!(state.phase, Phase::Completing);
        for _ in 0..600 {
            assert_eq!(state.tick(), None);
        }
        assert_eq!(state.phase, Phase::Completing);
        assert_eq!(state.completion_finished(), Some(Transition::BeginResting));
    }

    #[test]
    fn stale_completion_signal_is_ignored() {
        let mut state = working_state(60, 60);
        assert_eq!(state.completion_finished(), None);
        assert_eq!(state.phase, Phase::Working);
    }

    #[test]
    fn restart_from_any_phase() {
        let setups: [fn(&mut PhaseState); 5] = [
            |_state| {},
            |state: &mut PhaseState| {
                state.activity();
            },
            |state: &mut PhaseState| {
                state.activity();
                state.pause();
            },
            |state: &mut PhaseState| {
                state.activity();
                state.skip();
            },
            |state: &mut PhaseState| {
                state.activity();
                state.skip();
                state.completion_finished();
            },
        ];
        for setup in setups {
            let mut state = PhaseState::new(60, 60);
            setup(&mut state);
            assert_eq!(state.restart(), Transition::BeginWaiting);
            assert_eq!(state.phase, Phase::Waiting);
            assert_eq!(state.elapsed_secs, 0);
            assert!((state.progress - 1.0).abs() < EPS);
            assert!(!state.paused);
        }
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut state = working_state(0, 0);
        assert_eq!(state.tick(), Some(Transition::BeginCompleting));
        state.completion_finished();
        assert_eq!(state.phase, Phase::Resting);
        assert_eq!(state.tick(), Some(Transition::BeginWaiting));
    }

    #[test]
    fn lock_survives_transitions() {
        let mut state = PhaseState::new(60, 60);
        state.toggle_lock();
        state.activity();
        state.skip();
        state.restart();
        assert!(state.locked);
        assert!(!state.toggle_lock());
    }
}
