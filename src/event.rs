use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::animation::completion::TICK_MS;

/// Commands dispatched to the state machine, from keyboard shortcuts or
/// the context menu. Out-of-phase commands are silently ignored there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartWork,
    Pause,
    Resume,
    Skip,
    ToggleLock,
    Restart,
    Exit,
}

/// Application-level events
#[derive(Debug, Clone)]
pub enum Event {
    /// User key press
    Key(KeyEvent),
    /// Raw mouse event (drag, menu, activity)
    Mouse(MouseEvent),
    /// The 1-second phase tick
    StateTick,
    /// Variable-rate animation tick (breathing / pulse)
    AnimTick,
    /// 33 ms celebration tick
    CompletionTick,
    /// Terminal resize
    Resize(u16, u16),
}

/// Handles event collection from multiple sources.
///
/// Uses crossterm's async `EventStream` (via `futures::StreamExt`)
/// instead of blocking `event::poll()` / `event::read()`, so no tokio
/// worker thread is ever blocked. The 1-second state tick is spawned
/// here too; the faster animation ticks live in [`Scheduler`] because
/// their lifetime follows the phase.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
    stop: Arc<AtomicBool>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let _tx = tx.clone();
        let stop = Arc::new(AtomicBool::new(false));

        // Async input task — keys and mouse
        let input_tx = tx.clone();
        let input_stop = stop.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            loop {
                if input_stop.load(Ordering::Relaxed) {
                    return;
                }
                let maybe_event = reader.next().await;
                if input_stop.load(Ordering::Relaxed) {
                    return;
                }
                match maybe_event {
                    Some(Ok(CrosstermEvent::Key(key))) => {
                        if key.kind == KeyEventKind::Press
                            && input_tx.send(Event::Key(key)).is_err()
                        {
                            return;
                        }
                    }
                    Some(Ok(CrosstermEvent::Mouse(mouse))) => {
                        if input_tx.send(Event::Mouse(mouse)).is_err() {
                            return;
                        }
                    }
                    Some(Ok(CrosstermEvent::Resize(w, h))) => {
                        if input_tx.send(Event::Resize(w, h)).is_err() {
                            return;
                        }
                    }
                    Some(Err(_)) | None => {
                        // Stream ended or errored — exit gracefully
                        return;
                    }
                    _ => {}
                }
            }
        });

        // Fixed 1-second state tick
        let tick_tx = tx.clone();
        let tick_stop = stop.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await; // the first tick completes immediately
            loop {
                interval.tick().await;
                if tick_stop.load(Ordering::Relaxed) {
                    return;
                }
                if tick_tx.send(Event::StateTick).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx, stop }
    }

    /// Get a clone of the sender for the animation scheduler
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self._tx.clone()
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Signal all background tasks to stop
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the two phase-scoped periodic tasks: the regime animation tick
/// and the 33 ms completion tick. Each is independently cancelable, and
/// every stop is idempotent — phase exits and shutdown can call them
/// unconditionally.
#[derive(Debug)]
pub struct Scheduler {
    tx: mpsc::UnboundedSender<Event>,
    anim: Option<JoinHandle<()>>,
    completion: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            tx,
            anim: None,
            completion: None,
        }
    }

    /// Replace the animation tick task. `None` cancels without starting
    /// a new one (the Working regime has no animation tick).
    pub fn set_animation_interval(&mut self, interval: Option<Duration>) {
        if let Some(task) = self.anim.take() {
            task.abort();
        }
        if let Some(period) = interval {
            let tx = self.tx.clone();
            self.anim = Some(tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.tick().await;
                loop {
                    interval.tick().await;
                    if tx.send(Event::AnimTick).is_err() {
                        return;
                    }
                }
            }));
        }
    }

    pub fn start_completion(&mut self) {
        self.stop_completion();
        let tx = self.tx.clone();
        self.completion = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(Event::CompletionTick).is_err() {
                    return;
                }
            }
        }));
    }

    pub fn stop_completion(&mut self) {
        if let Some(task) = self.completion.take() {
            task.abort();
        }
    }

    pub fn completion_running(&self) -> bool {
        self.completion.is_some()
    }

    pub fn animation_running(&self) -> bool {
        self.anim.is_some()
    }

    /// Cancel everything. Safe to call from any phase, any number of times.
    pub fn shutdown(&mut self) {
        self.set_animation_interval(None);
        self.stop_completion();
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
