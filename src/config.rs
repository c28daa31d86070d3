use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{FocusdotError, FocusdotResult};

// ─── Config Record ──────────────────────────────────────────────────────

/// Root configuration — parsed from `config.json`. Every field has a
/// default, so a missing or partial file always yields a usable config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub work_time_minutes: u32,
    pub rest_time_minutes: u32,

    /// Widget diameter in pixels (canvas dots)
    pub size: u16,

    pub colors: ColorsConfig,

    /// Last saved widget position, if any
    pub position: Option<Position>,

    /// Notification sound filename, resolved under assets/notification-sound/
    pub notification_sound: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub background: String,
    pub working: String,
    pub resting: String,
    pub waiting: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_time_minutes: 25,
            rest_time_minutes: 5,
            size: 60,
            colors: ColorsConfig::default(),
            position: None,
            notification_sound: "notification.mp3".into(),
        }
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            background: "rgba(50, 50, 50, 100)".into(),
            working: "green".into(),
            resting: "yellow".into(),
            waiting: "blue".into(),
        }
    }
}

impl Config {
    pub fn work_duration_secs(&self) -> u32 {
        self.work_time_minutes * 60
    }

    pub fn rest_duration_secs(&self) -> u32 {
        self.rest_time_minutes * 60
    }

    /// Resolve the notification sound to a concrete path.
    pub fn sound_path(&self) -> PathBuf {
        let p = PathBuf::from(&self.notification_sound);
        if p.is_absolute() {
            p
        } else {
            Path::new("assets").join("notification-sound").join(p)
        }
    }

    /// Parse the configured color strings, falling back per-role on any
    /// unrecognized spec. Never fails.
    pub fn palette(&self) -> Palette {
        let defaults = ColorsConfig::default();
        Palette {
            background: parse_or_default(&self.colors.background, &defaults.background),
            working: parse_or_default(&self.colors.working, &defaults.working),
            resting: parse_or_default(&self.colors.resting, &defaults.resting),
            waiting: parse_or_default(&self.colors.waiting, &defaults.waiting),
        }
    }
}

// ─── Colors ─────────────────────────────────────────────────────────────

/// A resolved RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// The four resolved widget colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgba,
    pub working: Rgba,
    pub resting: Rgba,
    pub waiting: Rgba,
}

fn parse_or_default(spec: &str, default_spec: &str) -> Rgba {
    parse_color(spec).unwrap_or_else(|| {
        warn!("unrecognized color spec {spec:?}, using default {default_spec:?}");
        // The built-in defaults are all valid specs
        parse_color(default_spec).unwrap_or(Rgba::rgb(128, 128, 128))
    })
}

/// Parse a color spec into an [`Rgba`].
/// Supports: named colors, `rgba(r, g, b, a)` with integer components
/// 0–255, and `#RRGGBB` hex.
pub fn parse_color(s: &str) -> Option<Rgba> {
    let s = s.trim().to_lowercase();
    if let Some(body) = s.strip_prefix("rgba(").and_then(|rest| rest.strip_suffix(')')) {
        let values: Vec<&str> = body.split(',').collect();
        if values.len() != 4 {
            return None;
        }
        let mut parsed = [0u8; 4];
        for (slot, value) in parsed.iter_mut().zip(&values) {
            *slot = value.trim().parse().ok()?;
        }
        let [r, g, b, a] = parsed;
        return Some(Rgba { r, g, b, a });
    }
    match s.as_str() {
        "black" => Some(Rgba::rgb(0, 0, 0)),
        "white" => Some(Rgba::rgb(255, 255, 255)),
        "red" => Some(Rgba::rgb(255, 0, 0)),
        "green" => Some(Rgba::rgb(0, 128, 0)),
        "yellow" => Some(Rgba::rgb(255, 255, 0)),
        "blue" => Some(Rgba::rgb(0, 0, 255)),
        "magenta" => Some(Rgba::rgb(255, 0, 255)),
        "cyan" => Some(Rgba::rgb(0, 255, 255)),
        "orange" => Some(Rgba::rgb(255, 165, 0)),
        "gray" | "grey" => Some(Rgba::rgb(128, 128, 128)),
        "darkgray" | "darkgrey" => Some(Rgba::rgb(64, 64, 64)),
        hex if hex.starts_with('#') && hex.len() == 7 => {
            let r = u8::from_str_radix(&hex[1..3], 16).ok()?;
            let g = u8::from_str_radix(&hex[3..5], 16).ok()?;
            let b = u8::from_str_radix(&hex[5..7], 16).ok()?;
            Some(Rgba::rgb(r, g, b))
        }
        _ => None,
    }
}

// ─── Load / Persist ─────────────────────────────────────────────────────

/// Default config file path: ./config.json
pub fn default_path() -> PathBuf {
    PathBuf::from("config.json")
}

/// Load the config record. Missing or corrupt files fall back to the
/// built-in defaults — configuration problems are never fatal.
pub fn load(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(config) => {
                info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("config at {} is not valid JSON ({e}), using defaults", path.display());
                Config::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("no config at {}, using defaults", path.display());
            Config::default()
        }
        Err(e) => {
            warn!("failed to read config at {} ({e}), using defaults", path.display());
            Config::default()
        }
    }
}

/// Persist the widget position by merging it into the existing record
/// and rewriting the file. Unknown fields in the file are preserved.
pub fn save_position(path: &Path, position: Position) -> FocusdotResult<()> {
    let mut root: serde_json::Value = std::fs::read_to_string(path)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or(serde_json::Value::Null);

    if !root.is_object() {
        root = serde_json::to_value(Config::default())
            .map_err(|e| FocusdotError::Config(e.to_string()))?;
    }
    root["position"] = serde_json::json!({ "x": position.x, "y": position.y });

    let text = serde_json::to_string_pretty(&root)
        .map_err(|e| FocusdotError::Config(e.to_string()))?;
    std::fs::write(path, text)?;
    Ok(())
}
