use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::event::Command;
use crate::timer::{Phase, PhaseState};

/// The right-click command surface. Entry labels and visibility depend
/// on the phase and pause state, so they are rebuilt from the timer on
/// every draw and keypress.
#[derive(Debug, Default)]
pub struct MenuState {
    pub open: bool,
    pub selected: usize,
    pub anchor: (u16, u16),
}

impl MenuState {
    pub fn toggle(&mut self) {
        self.open = !self.open;
        self.selected = 0;
    }

    pub fn open_at(&mut self, x: u16, y: u16) {
        self.open = true;
        self.selected = 0;
        self.anchor = (x, y);
    }

    pub fn close(&mut self) {
        self.open = false;
        self.selected = 0;
    }

    /// Navigate the menu; returns the chosen command on Enter.
    pub fn handle_key(&mut self, key: KeyEvent, state: &PhaseState) -> Option<Command> {
        let items = entries(state);
        if items.is_empty() {
            self.close();
            return None;
        }
        self.selected = self.selected.min(items.len() - 1);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + items.len() - 1) % items.len();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % items.len();
                None
            }
            KeyCode::Enter => {
                let command = items[self.selected].1;
                self.close();
                Some(command)
            }
            KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('q') => {
                self.close();
                None
            }
            _ => None,
        }
    }
}

/// Build the menu entries gated by the current phase and pause state.
pub fn entries(state: &PhaseState) -> Vec<(String, Command)> {
    let mut items = Vec::new();
    match state.phase {
        Phase::Working | Phase::Resting => {
            if state.paused {
                items.push(("Resume".to_string(), Command::Resume));
            } else {
                items.push(("Pause".to_string(), Command::Pause));
            }
            if state.phase == Phase::Working {
                items.push(("Skip to Rest".to_string(), Command::Skip));
            } else {
                items.push(("Skip to Waiting".to_string(), Command::Skip));
            }
        }
        Phase::Waiting => {
            items.push(("Start Work".to_string(), Command::StartWork));
        }
        // No interactive entries while the celebration runs
        Phase::Completing => {}
    }
    if state.locked {
        items.push(("Unlock Position".to_string(), Command::ToggleLock));
    } else {
        items.push(("Lock Position".to_string(), Command::ToggleLock));
    }
    items.push(("Restart".to_string(), Command::Restart));
    items.push(("Exit".to_string(), Command::Exit));
    items
}

pub fn draw(f: &mut Frame, app: &App) {
    let items = entries(&app.state);
    let selected = app.menu.selected.min(items.len().saturating_sub(1));

    let mut phase_text = format!("{} Phase", app.state.phase.label());
    if app.state.paused {
        phase_text.push_str(" (Paused)");
    }

    let mut lines = vec![
        Line::from(Span::styled(
            app.time_remaining_text(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(phase_text, Style::default().fg(Color::DarkGray))),
        Line::from(""),
    ];
    for (i, (label, _)) in items.iter().enumerate() {
        let style = if i == selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(format!(" {label} "), style)));
    }

    let width = lines
        .iter()
        .map(|l| l.width() as u16)
        .max()
        .unwrap_or(10)
        .saturating_add(4);
    let height = lines.len() as u16 + 2;
    let area = anchored_rect(app.menu.anchor, width, height, f.area());

    let block = Block::default()
        .title(" focusdot ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Place the menu at the anchor point, pulled back inside the terminal.
fn anchored_rect(anchor: (u16, u16), width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = anchor.0.min(area.width.saturating_sub(width));
    let y = anchor.1.min(area.height.saturating_sub(height));
    Rect::new(x, y, width, height)
}
