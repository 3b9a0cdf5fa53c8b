use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::game_log::GameLogEntry;

/// Named look-back span a hit rate is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Window {
    L5,
    L10,
    L20,
    H2H,
    #[serde(rename = "season")]
    Season,
}

impl Window {
    pub const ALL: [Window; 5] = [
        Window::L5,
        Window::L10,
        Window::L20,
        Window::H2H,
        Window::Season,
    ];

    pub fn game_count(self) -> usize {
        match self {
            Window::L5 => 5,
            Window::L10 => 10,
            Window::L20 => 20,
            Window::H2H => 5,
            Window::Season => 40,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Window::L5 => "L5",
            Window::L10 => "L10",
            Window::L20 => "L20",
            Window::H2H => "H2H",
            Window::Season => "season",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Window::L5 => "Last 5",
            Window::L10 => "Last 10",
            Window::L20 => "Last 20",
            Window::H2H => "Head to head",
            Window::Season => "Season",
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Window {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l5" => Ok(Window::L5),
            "l10" => Ok(Window::L10),
            "l20" => Ok(Window::L20),
            "h2h" => Ok(Window::H2H),
            "season" => Ok(Window::Season),
            _ => Err(EngineError::UnknownWindow(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub window: Window,
    pub label: &'static str,
    pub games: usize,
    pub hits: usize,
    pub hit_rate: u8,
    pub average: Option<f64>,
}

pub fn hit_count(log: &[GameLogEntry], threshold: f64) -> usize {
    log.iter().filter(|e| e.value >= threshold).count()
}

/// Percentage of games at or above `threshold`, rounded. An empty log is 0%.
pub fn hit_rate(log: &[GameLogEntry], threshold: f64) -> u8 {
    if log.is_empty() {
        return 0;
    }
    let pct = 100.0 * hit_count(log, threshold) as f64 / log.len() as f64;
    pct.round().clamp(0.0, 100.0) as u8
}

pub fn average(log: &[GameLogEntry]) -> Option<f64> {
    if log.is_empty() {
        return None;
    }
    let sum: f64 = log.iter().map(|e| e.value).sum();
    Some(sum / log.len() as f64)
}

pub fn summarize(window: Window, log: &[GameLogEntry], line: f64) -> WindowSummary {
    WindowSummary {
        window,
        label: window.display_name(),
        games: log.len(),
        hits: hit_count(log, line),
        hit_rate: hit_rate(log, line),
        average: average(log),
    }
}
