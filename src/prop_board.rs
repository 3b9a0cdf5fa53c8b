use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alt_lines::{self, AltLineEntry, Quote};
use crate::config::EngineConfig;
use crate::game_log::{self, GameLogEntry};
use crate::insights;
use crate::line::line_for_key;
use crate::seed::SeedKey;
use crate::window::{Window, WindowSummary, hit_rate, summarize};

const MISSING_JERSEY: u32 = 99;
// (offset, min, max) of the juice shown for each of the first three books.
const BOOK_PRICE_DRAWS: [(i64, i64, i64); 3] = [(60, 110, 135), (70, 108, 130), (80, 112, 138)];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub jersey: Option<u32>,
}

impl RosterEntry {
    pub fn sort_jersey(&self) -> u32 {
        self.jersey.unwrap_or(MISSING_JERSEY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RankTier {
    Favorable,
    Neutral,
    Tough,
}

impl RankTier {
    pub fn from_rank(rank: u8) -> Self {
        if rank <= 10 {
            RankTier::Favorable
        } else if rank >= 20 {
            RankTier::Tough
        } else {
            RankTier::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropLine {
    pub subject_id: String,
    pub subject_label: String,
    pub position: Option<String>,
    pub category: String,
    pub line: f64,
    pub window_percentages: BTreeMap<Window, u8>,
    pub opponent_rank: u8,
    pub rank_tier: RankTier,
    pub implied_prob: u8,
    pub is_trending: bool,
    pub book_prices: Vec<Quote>,
}

/// Single table row for one subject and category.
pub fn prop_row(
    cfg: &EngineConfig,
    subject: &RosterEntry,
    sport: &str,
    category: &str,
) -> PropLine {
    let key = SeedKey::new(&subject.id, sport, category);
    let line = line_for_key(cfg, &key, sport, category);
    let window_percentages = window_percentages(cfg, &key, line, sport);
    let opponent_rank = key.draw_int(1, 1, 30) as u8;

    PropLine {
        subject_id: subject.id.clone(),
        subject_label: subject.display_name.clone(),
        position: subject.position.clone(),
        category: category.to_string(),
        line,
        window_percentages,
        opponent_rank,
        rank_tier: RankTier::from_rank(opponent_rank),
        implied_prob: key.draw_int(2, 42, 80) as u8,
        is_trending: key.draw(90) > 0.7,
        book_prices: book_prices(cfg, &key),
    }
}

/// Over juice from the leading sportsbooks, always a negative American price.
pub fn book_prices(cfg: &EngineConfig, key: &SeedKey) -> Vec<Quote> {
    cfg.sportsbooks
        .iter()
        .zip(BOOK_PRICE_DRAWS)
        .map(|(book, (offset, min, max))| Quote {
            book_name: book.clone(),
            american_price: -(key.draw_int(offset, min, max) as i32),
        })
        .collect()
}

/// Hit rate per window, each from its own window-keyed log against `line`.
pub fn window_percentages(
    cfg: &EngineConfig,
    key: &SeedKey,
    line: f64,
    sport: &str,
) -> BTreeMap<Window, u8> {
    Window::ALL
        .iter()
        .map(|w| {
            let log = game_log::generate(cfg, &key.with_window(*w), line, sport, w.game_count());
            (*w, hit_rate(&log, line))
        })
        .collect()
}

/// Everything the detail modal shows for one prop, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropSnapshot {
    pub subject_id: String,
    pub sport: String,
    pub category: String,
    pub line: f64,
    pub window: Window,
    pub log: Vec<GameLogEntry>,
    pub summaries: Vec<WindowSummary>,
    pub ladder: Vec<AltLineEntry>,
    pub insights: Vec<String>,
}

pub fn snapshot(
    cfg: &EngineConfig,
    subject: &RosterEntry,
    sport: &str,
    category: &str,
    window: Window,
) -> PropSnapshot {
    let key = SeedKey::new(&subject.id, sport, category);
    let line = line_for_key(cfg, &key, sport, category);

    let summaries = Window::ALL
        .iter()
        .map(|w| {
            let log = game_log::generate(cfg, &key.with_window(*w), line, sport, w.game_count());
            summarize(*w, &log, line)
        })
        .collect();
    let log = game_log::generate(cfg, &key.with_window(window), line, sport, window.game_count());
    let label = cfg.category_label(sport, category);
    let insights = insights::compose(&subject.display_name, line, label, &log);

    PropSnapshot {
        subject_id: subject.id.clone(),
        sport: sport.to_string(),
        category: category.to_string(),
        line,
        window,
        ladder: alt_lines::ladder(cfg, line, &key),
        log,
        summaries,
        insights,
    }
}

/// Sort by jersey (missing sorts as 99) then id.
pub fn sorted_roster(roster: &[RosterEntry]) -> Vec<&RosterEntry> {
    let mut out: Vec<&RosterEntry> = roster.iter().collect();
    out.sort_by(|a, b| {
        a.sort_jersey()
            .cmp(&b.sort_jersey())
            .then_with(|| a.id.cmp(&b.id))
    });
    out
}

/// Primary-category row plus one secondary row per player, for the first `limit` players.
pub fn build_board(
    cfg: &EngineConfig,
    roster: &[RosterEntry],
    sport: &str,
    limit: usize,
) -> Vec<PropLine> {
    let categories = cfg.category_codes(sport);
    let Some(primary) = categories.first().copied() else {
        return Vec::new();
    };

    let players: Vec<&RosterEntry> = sorted_roster(roster).into_iter().take(limit).collect();
    let rows: Vec<PropLine> = players
        .par_iter()
        .flat_map_iter(|player| {
            let mut rows = vec![prop_row(cfg, player, sport, primary)];
            if categories.len() > 1 {
                let key = SeedKey::new(&player.id, sport, primary);
                let idx = key.draw_int(11, 1, categories.len() as i64 - 1) as usize;
                rows.push(prop_row(cfg, player, sport, categories[idx]));
            }
            rows
        })
        .collect();

    debug!(sport, players = players.len(), rows = rows.len(), "built prop board");
    rows
}
