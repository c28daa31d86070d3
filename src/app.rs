use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position as CellPosition, Rect};
use tracing::warn;

use crate::activity::ActivityDetector;
use crate::animation::completion::{CompletionAnimation, CompletionFrame};
use crate::animation::{AnimationState, Regime};
use crate::audio;
use crate::config::{self, Config, Palette, Position};
use crate::event::{Command, Event, Scheduler};
use crate::render::{self, Scene, WidgetView};
use crate::timer::{Phase, PhaseState, Transition};
use crate::ui::menu::MenuState;

// ── Application State ─────────────────────────────────────────────────

pub struct App {
    pub state: PhaseState,
    pub anim: AnimationState,
    pub completion: Option<CompletionAnimation>,
    pub detector: ActivityDetector,
    pub menu: MenuState,

    pub config: Config,
    pub config_path: PathBuf,
    pub palette: Palette,
    pub position: Position,
    pub terminal_size: (u16, u16),
    pub should_quit: bool,

    scheduler: Scheduler,
    /// Pointer offset inside the widget while a drag is in flight
    drag_grab: Option<(u16, u16)>,
}

impl App {
    pub fn new(
        config: Config,
        config_path: PathBuf,
        scheduler: Scheduler,
        start_locked: bool,
    ) -> Self {
        let palette = config.palette();
        let position = config.position.unwrap_or(Position { x: 0, y: 0 });
        let mut state = PhaseState::new(config.work_duration_secs(), config.rest_duration_secs());
        if start_locked {
            state.toggle_lock();
        }

        let mut app = Self {
            state,
            anim: AnimationState::new(),
            completion: None,
            detector: ActivityDetector::new(),
            menu: MenuState::default(),
            config,
            config_path,
            palette,
            position,
            terminal_size: (80, 24),
            should_quit: false,
            scheduler,
            drag_grab: None,
        };
        // The timer starts in Waiting; arm the breathing regime and detector
        app.apply_transition(Transition::BeginWaiting);
        app
    }

    // ── Event routing ─────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::StateTick => {
                if let Some(transition) = self.state.tick() {
                    self.apply_transition(transition);
                }
            }
            Event::AnimTick => self.anim.tick(),
            Event::CompletionTick => self.handle_completion_tick(),
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.terminal_size = (w, h),
        }
    }

    fn handle_completion_tick(&mut self) {
        let Some(completion) = self.completion.as_mut() else {
            // A tick raced a cancel; ignore
            return;
        };
        match completion.advance() {
            CompletionFrame::Running(params) => self.anim.params = params,
            CompletionFrame::Finished => {
                if let Some(transition) = self.state.completion_finished() {
                    self.apply_transition(transition);
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.apply_command(Command::Exit);
            return;
        }
        if self.menu.open {
            if let Some(command) = self.menu.handle_key(key, &self.state) {
                self.apply_command(command);
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.apply_command(Command::Exit),
            KeyCode::Char('m') => self.menu.toggle(),
            // While idle, any other key is user activity
            _ if self.state.phase == Phase::Waiting => self.report_activity(),
            KeyCode::Char(' ') => {
                if self.state.paused {
                    self.apply_command(Command::Resume);
                } else {
                    self.apply_command(Command::Pause);
                }
            }
            KeyCode::Char('s') => self.apply_command(Command::Skip),
            KeyCode::Char('l') => self.apply_command(Command::ToggleLock),
            KeyCode::Char('r') => self.apply_command(Command::Restart),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let area = self.terminal_area();
        let rect = self.widget_rect(area);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.menu.open {
                    self.menu.close();
                    return;
                }
                let inside = rect.contains(CellPosition::new(mouse.column, mouse.row));
                if inside && !self.state.locked {
                    self.state.begin_drag();
                    self.drag_grab = Some((mouse.column - rect.x, mouse.row - rect.y));
                    self.detector.sync(self.state.phase, self.state.dragging);
                } else if !inside {
                    self.report_activity();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.state.dragging && !self.state.locked {
                    if let Some((dx, dy)) = self.drag_grab {
                        self.position = Position {
                            x: mouse
                                .column
                                .saturating_sub(dx)
                                .min(area.width.saturating_sub(rect.width)),
                            y: mouse
                                .row
                                .saturating_sub(dy)
                                .min(area.height.saturating_sub(rect.height)),
                        };
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.state.dragging {
                    self.state.end_drag();
                    self.drag_grab = None;
                    self.detector.sync(self.state.phase, self.state.dragging);
                    if let Err(e) = config::save_position(&self.config_path, self.position) {
                        warn!("failed to save position: {e}");
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                self.menu.open_at(mouse.column, mouse.row);
            }
            MouseEventKind::Moved
            | MouseEventKind::ScrollUp
            | MouseEventKind::ScrollDown
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight => self.report_activity(),
            _ => {}
        }
    }

    /// Coalesced activity path: only fires while the detector is armed.
    fn report_activity(&mut self) {
        if self.detector.observe() {
            if let Some(transition) = self.state.activity() {
                self.apply_transition(transition);
            }
        }
    }

    // ── Commands & transitions ────────────────────────────────────────

    pub fn apply_command(&mut self, command: Command) {
        match command {
            Command::StartWork => {
                if let Some(transition) = self.state.activity() {
                    self.apply_transition(transition);
                }
            }
            Command::Pause => self.state.pause(),
            Command::Resume => self.state.resume(),
            Command::Skip => {
                if let Some(transition) = self.state.skip() {
                    self.apply_transition(transition);
                }
            }
            Command::ToggleLock => {
                self.state.toggle_lock();
            }
            Command::Restart => {
                let transition = self.state.restart();
                self.apply_transition(transition);
            }
            Command::Exit => self.should_quit = true,
        }
        self.menu.close();
    }

    /// Every phase entry funnels through here: animation regime, the
    /// completion timer lifecycle, the notification sound, and the
    /// detector invariant are handled in exactly one place.
    fn apply_transition(&mut self, transition: Transition) {
        match transition {
            Transition::BeginWork => {
                self.scheduler.stop_completion();
                self.completion = None;
                self.anim.set_regime(Regime::Idle);
                self.scheduler.set_animation_interval(None);
            }
            Transition::BeginCompleting => {
                self.anim.set_regime(Regime::Idle);
                self.scheduler.set_animation_interval(None);
                self.completion = Some(CompletionAnimation::new());
                self.scheduler.start_completion();
                audio::play(&self.config.sound_path());
            }
            Transition::BeginResting => {
                self.scheduler.stop_completion();
                self.completion = None;
                self.anim.set_regime(Regime::Pulse);
                self.scheduler
                    .set_animation_interval(Regime::Pulse.tick_interval());
            }
            Transition::BeginWaiting => {
                self.scheduler.stop_completion();
                self.completion = None;
                self.anim.set_regime(Regime::Breathing);
                self.scheduler
                    .set_animation_interval(Regime::Breathing.tick_interval());
            }
        }
        self.detector.sync(self.state.phase, self.state.dragging);
    }

    // ── Render support ────────────────────────────────────────────────

    pub fn scene(&self) -> Scene {
        render::project(&WidgetView {
            phase: self.state.phase,
            progress: self.state.progress,
            completion_progress: self.completion.as_ref().map_or(0.0, |c| c.progress()),
            params: self.anim.params,
            palette: self.palette,
            size: self.config.size as f64,
        })
    }

    pub fn terminal_area(&self) -> Rect {
        Rect::new(0, 0, self.terminal_size.0, self.terminal_size.1)
    }

    /// Widget bounds in terminal cells. A braille cell holds a 2×4 dot
    /// grid, so size/2 × size/4 cells give a visually square widget.
    pub fn widget_rect(&self, area: Rect) -> Rect {
        let width = (self.config.size / 2).max(4).min(area.width.max(1));
        let height = (self.config.size / 4).max(2).min(area.height.max(1));
        let x = self.position.x.min(area.width.saturating_sub(width));
        let y = self.position.y.min(area.height.saturating_sub(height));
        Rect::new(x, y, width, height)
    }

    pub fn time_remaining_text(&self) -> String {
        match self.state.remaining_secs() {
            Some(secs) => format!("{:02}:{:02}", secs / 60, secs % 60),
            None if self.state.phase == Phase::Completing => "Celebration!".into(),
            None => "Waiting for activity...".into(),
        }
    }

    pub fn completion_running(&self) -> bool {
        self.scheduler.completion_running()
    }

    /// Cancel all timers. Idempotent; called on every shutdown path.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }
}
