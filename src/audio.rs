use std::path::Path;
use std::process::Stdio;

use tracing::{debug, warn};

/// System players tried in order. The first one that spawns wins.
const PLAYERS: &[&str] = &["paplay", "pw-play", "aplay", "afplay", "mpv"];

/// Fire-and-forget playback of the notification sound. A missing file
/// or missing player logs a warning and does nothing else — audio
/// problems never reach the state machine.
pub fn play(path: &Path) {
    if !path.exists() {
        warn!("notification sound not found: {}", path.display());
        return;
    }
    for player in PLAYERS {
        match tokio::process::Command::new(player)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_child) => {
                debug!("playing {} via {player}", path.display());
                return;
            }
            Err(_) => continue,
        }
    }
    warn!("no audio player available, skipping notification sound");
}
