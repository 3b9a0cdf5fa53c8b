use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::seed::{SeedKey, round_half};

const MIN_SPREAD: f64 = 2.0;
const SPREAD_FACTOR: f64 = 0.7;
const DAYS_BETWEEN_GAMES: u64 = 3;
const PLACEHOLDER_LABEL: &str = "-";

/// One synthetic historical game. Index 0 of a generated log is the most recent game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameLogEntry {
    pub date: NaiveDate,
    pub opponent_label: String,
    pub value: f64,
    pub is_over: bool,
    pub is_home: bool,
    pub final_score_label: String,
    pub opponent_rank: u8,
}

impl GameLogEntry {
    pub fn matchup_label(&self) -> String {
        if self.is_home {
            format!("vs {}", self.opponent_label)
        } else {
            format!("@ {}", self.opponent_label)
        }
    }
}

/// Inclusive value bounds for a line: `[max(0, line - spread), line + spread]`.
pub fn value_bounds(line: f64) -> (f64, f64) {
    let spread = (line * SPREAD_FACTOR).max(MIN_SPREAD);
    ((line - spread).max(0.0), line + spread)
}

/// Synthesize `count` games (at least one) for `key` against `line`.
pub fn generate(
    cfg: &EngineConfig,
    key: &SeedKey,
    line: f64,
    sport: &str,
    count: usize,
) -> Vec<GameLogEntry> {
    let count = count.max(1);
    let line = if line.is_finite() { line } else { 0.0 };
    let (min, max) = value_bounds(line);
    // Half-grid bounds that stay inside [min, max] after rounding.
    let lo = (min * 2.0).ceil() / 2.0;
    let hi = (max * 2.0).floor() / 2.0;

    let opponents = non_empty(cfg.opponents(sport), &cfg.fallback_opponents);
    let scores = non_empty(cfg.score_labels(sport), &cfg.fallback_scores);

    (0..count)
        .map(|i| {
            let o = i as i64;
            let r = key.derive("log", i).draw(o);
            let value = round_half(min + r * (max - min)).clamp(lo, hi.max(lo));

            let opp_idx = key.derive("opp", i).draw_int(o + 100, 0, opponents.len() as i64 - 1);
            let is_home = key.derive("home", i).draw(o + 200) > 0.5;
            let score_idx = key.derive("score", i).draw_int(o + 300, 0, scores.len() as i64 - 1);
            let opponent_rank = key.derive("rank", i).draw_int(o + 400, 1, 30) as u8;

            GameLogEntry {
                date: game_date(cfg.anchor_date, i),
                opponent_label: label_at(opponents, opp_idx),
                value,
                is_over: value >= line,
                is_home,
                final_score_label: label_at(scores, score_idx),
                opponent_rank,
            }
        })
        .collect()
}

fn game_date(anchor: NaiveDate, index: usize) -> NaiveDate {
    let back = index as u64 * DAYS_BETWEEN_GAMES + 1;
    anchor.checked_sub_days(Days::new(back)).unwrap_or(anchor)
}

fn non_empty<'a>(primary: &'a [String], fallback: &'a [String]) -> &'a [String] {
    if primary.is_empty() { fallback } else { primary }
}

fn label_at(pool: &[String], idx: i64) -> String {
    usize::try_from(idx)
        .ok()
        .and_then(|i| pool.get(i))
        .cloned()
        .unwrap_or_else(|| PLACEHOLDER_LABEL.to_string())
}
