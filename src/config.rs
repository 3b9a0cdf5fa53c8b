use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};

pub const CONFIG_ENV: &str = "PICKLABS_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
}

impl StatRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub code: String,
    pub label: String,
    pub range: StatRange,
}

/// Per-sport lookup tables. The first category is the sport's primary prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportTable {
    pub categories: Vec<CategorySpec>,
    pub opponents: Vec<String>,
    pub score_labels: Vec<String>,
}

impl SportTable {
    pub fn category(&self, code: &str) -> Option<&CategorySpec> {
        self.categories
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradingThresholds {
    /// Minimum edge (exclusive) for a market entry to become a pick.
    pub pick: f64,
    /// Edge (exclusive) above which a pick grades A+.
    pub a_plus: f64,
}

impl Default for GradingThresholds {
    fn default() -> Self {
        Self {
            pick: 0.08,
            a_plus: 0.12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Date the synthetic game history counts back from.
    pub anchor_date: NaiveDate,
    pub sports: HashMap<String, SportTable>,
    pub fallback_range: StatRange,
    pub fallback_opponents: Vec<String>,
    pub fallback_scores: Vec<String>,
    pub sportsbooks: Vec<String>,
    pub alt_line_offsets: Vec<f64>,
    pub base_price: i32,
    pub price_step: f64,
    pub grading: GradingThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut sports = HashMap::new();
        sports.insert(
            "NBA".to_string(),
            sport(
                &[
                    ("PTS", "Points", 10.0, 35.0),
                    ("REB", "Rebounds", 3.0, 14.0),
                    ("AST", "Assists", 2.0, 9.0),
                    ("3PM", "Three-Pointers", 0.5, 5.0),
                    ("STL", "Steals", 0.5, 2.5),
                    ("BLK", "Blocks", 0.5, 2.5),
                ],
                &[
                    "BOS", "BKN", "NYK", "PHI", "TOR", "CHI", "CLE", "DET", "IND", "LAL", "GSW",
                    "MIN",
                ],
                &[
                    "112-109", "98-103", "121-115", "89-95", "107-101", "118-112", "88-92",
                    "103-98", "115-119", "101-107",
                ],
            ),
        );
        sports.insert(
            "NFL".to_string(),
            sport(
                &[
                    ("PASS_YDS", "Passing Yards", 180.0, 320.0),
                    ("RUSH_YDS", "Rushing Yards", 40.0, 110.0),
                    ("REC_YDS", "Receiving Yards", 30.0, 100.0),
                    ("REC", "Receptions", 2.0, 9.0),
                    ("TD", "Touchdowns", 0.5, 2.0),
                ],
                &["DAL", "PHI", "NYG", "WAS", "KC", "LV", "DEN", "LAC"],
                &[
                    "27-24", "17-20", "31-28", "13-10", "24-21", "20-23", "34-17", "10-16",
                ],
            ),
        );
        sports.insert(
            "MLB".to_string(),
            sport(
                &[
                    ("H", "Hits", 0.5, 2.5),
                    ("TB", "Total Bases", 1.0, 3.5),
                    ("K", "Strikeouts", 3.0, 9.0),
                    ("RBI", "RBIs", 0.5, 2.0),
                    ("HR", "Home Runs", 0.5, 1.0),
                ],
                &["NYY", "BOS", "TB", "TOR", "BAL", "LAD", "SF", "SD"],
                &["5-3", "2-4", "7-6", "1-0", "4-2", "3-8", "6-5", "0-2"],
            ),
        );
        sports.insert(
            "NHL".to_string(),
            sport(
                &[
                    ("SOG", "Shots on Goal", 1.5, 5.0),
                    ("PTS", "Points", 0.5, 2.0),
                    ("G", "Goals", 0.5, 1.5),
                    ("A", "Assists", 0.5, 1.5),
                    ("SAVES", "Saves", 22.0, 34.0),
                ],
                &["BOS", "TBL", "FLA", "TML", "MTL", "NYR", "CAR", "NJD"],
                &["3-2", "1-4", "5-3", "2-1", "4-3", "0-3", "6-2", "2-5"],
            ),
        );
        sports.insert(
            "Soccer".to_string(),
            sport(
                &[
                    ("SOT", "Shots on Target", 0.5, 3.0),
                    ("SHT", "Shots", 1.5, 4.5),
                    ("G", "Goals", 0.5, 1.5),
                    ("A", "Assists", 0.5, 1.0),
                ],
                &["MCI", "ARS", "LIV", "CHE", "MUN", "TOT", "AVL"],
                &["2-1", "0-0", "3-1", "1-2", "1-1", "4-0", "0-2"],
            ),
        );

        Self {
            anchor_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or(NaiveDate::MIN),
            sports,
            fallback_range: StatRange::new(5.0, 30.0),
            fallback_opponents: strings(&["OPP-A", "OPP-B", "OPP-C", "OPP-D", "OPP-E", "OPP-F"]),
            fallback_scores: strings(&["W 2-1", "L 1-3", "W 3-0", "L 0-2", "W 4-3", "L 2-3"]),
            sportsbooks: strings(&["DraftKings", "FanDuel", "BetMGM", "Caesars", "ESPN BET"]),
            alt_line_offsets: vec![
                -5.0, -4.0, -3.0, -2.0, -1.5, -1.0, -0.5, 0.5, 1.0, 1.5, 2.0, 3.0, 5.0, 7.0,
            ],
            base_price: -110,
            price_step: 70.0,
            grading: GradingThresholds::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: EngineConfig =
            serde_json::from_str(&raw).map_err(|source| EngineError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        debug!(path = %path.display(), sports = cfg.sports.len(), "loaded engine config");
        Ok(cfg)
    }

    /// Load from `PICKLABS_CONFIG` when set, otherwise the built-in tables.
    pub fn from_env() -> Result<Self> {
        match env::var(CONFIG_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_range("fallback", &self.fallback_range)?;
        for (name, table) in &self.sports {
            if table.categories.is_empty() {
                return Err(invalid(format!("sport {name} has no categories")));
            }
            if table.opponents.is_empty() {
                return Err(invalid(format!("sport {name} has an empty opponent pool")));
            }
            if table.score_labels.is_empty() {
                return Err(invalid(format!("sport {name} has an empty score pool")));
            }
            for cat in &table.categories {
                check_range(&format!("{name}/{}", cat.code), &cat.range)?;
            }
        }
        if self.fallback_opponents.is_empty() || self.fallback_scores.is_empty() {
            return Err(invalid("fallback pools must not be empty".to_string()));
        }
        if self.alt_line_offsets.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(invalid(
                "alt_line_offsets must be strictly increasing".to_string(),
            ));
        }
        if !(self.price_step.is_finite() && self.price_step >= 0.0) {
            return Err(invalid("price_step must be finite and non-negative".to_string()));
        }
        if self.grading.a_plus < self.grading.pick {
            return Err(invalid(format!(
                "A+ threshold {} is below pick threshold {}",
                self.grading.a_plus, self.grading.pick
            )));
        }
        Ok(())
    }

    pub fn sport(&self, sport: &str) -> Option<&SportTable> {
        self.sports.get(sport).or_else(|| {
            self.sports
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(sport))
                .map(|(_, table)| table)
        })
    }

    /// Numeric range for a category, falling back when the sport or category is unknown.
    pub fn category_range(&self, sport: &str, category: &str) -> StatRange {
        self.sport(sport)
            .and_then(|t| t.category(category))
            .map(|c| c.range)
            .unwrap_or(self.fallback_range)
    }

    /// Human label for a category code, or the code itself when unknown.
    pub fn category_label<'a>(&'a self, sport: &str, category: &'a str) -> &'a str {
        self.sport(sport)
            .and_then(|t| t.category(category))
            .map(|c| c.label.as_str())
            .unwrap_or(category)
    }

    pub fn opponents(&self, sport: &str) -> &[String] {
        self.sport(sport)
            .map(|t| t.opponents.as_slice())
            .unwrap_or(&self.fallback_opponents)
    }

    pub fn score_labels(&self, sport: &str) -> &[String] {
        self.sport(sport)
            .map(|t| t.score_labels.as_slice())
            .unwrap_or(&self.fallback_scores)
    }

    pub fn category_codes(&self, sport: &str) -> Vec<&str> {
        self.sport(sport)
            .map(|t| t.categories.iter().map(|c| c.code.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Model win probabilities: sport -> subject -> probability in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbabilityTable {
    pub by_sport: HashMap<String, HashMap<String, f64>>,
}

impl ProbabilityTable {
    pub fn empty() -> Self {
        Self {
            by_sport: HashMap::new(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let table: ProbabilityTable =
            serde_json::from_str(&raw).map_err(|source| EngineError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        for (sport, subjects) in &table.by_sport {
            if let Some((subject, p)) = subjects.iter().find(|(_, p)| !(0.0..=1.0).contains(*p)) {
                return Err(invalid(format!(
                    "projection {sport}/{subject} = {p} is outside [0, 1]"
                )));
            }
        }
        Ok(table)
    }

    /// Missing sport or subject reads as zero.
    pub fn model_prob(&self, sport: &str, subject_id: &str) -> f64 {
        self.by_sport
            .get(sport)
            .and_then(|m| m.get(subject_id))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn insert(&mut self, sport: &str, subject_id: &str, prob: f64) {
        self.by_sport
            .entry(sport.to_string())
            .or_default()
            .insert(subject_id.to_string(), prob);
    }
}

impl Default for ProbabilityTable {
    fn default() -> Self {
        let rows: &[(&str, &[(&str, f64)])] = &[
            (
                "NBA",
                &[
                    ("Lakers", 0.62),
                    ("Warriors", 0.38),
                    ("Celtics", 0.71),
                    ("Heat", 0.45),
                    ("Nuggets", 0.67),
                    ("Thunder", 0.64),
                    ("Bucks", 0.53),
                    ("Knicks", 0.49),
                    ("Suns", 0.44),
                    ("Clippers", 0.51),
                ],
            ),
            (
                "NCAAW",
                &[
                    ("South Carolina", 0.88),
                    ("Iowa", 0.12),
                    ("UConn", 0.79),
                    ("LSU", 0.61),
                ],
            ),
            (
                "NFL",
                &[
                    ("Chiefs", 0.72),
                    ("Eagles", 0.61),
                    ("Bills", 0.58),
                    ("Ravens", 0.55),
                    ("49ers", 0.53),
                ],
            ),
            (
                "NHL",
                &[
                    ("Bruins", 0.60),
                    ("Avalanche", 0.65),
                    ("Panthers", 0.58),
                    ("Rangers", 0.52),
                ],
            ),
            (
                "MLB",
                &[
                    ("Dodgers", 0.68),
                    ("Braves", 0.59),
                    ("Astros", 0.57),
                    ("Yankees", 0.54),
                ],
            ),
        ];

        let mut table = Self::empty();
        for (sport, subjects) in rows {
            for (subject, p) in *subjects {
                table.insert(sport, subject, *p);
            }
        }
        table
    }
}

fn sport(
    categories: &[(&str, &str, f64, f64)],
    opponents: &[&str],
    scores: &[&str],
) -> SportTable {
    SportTable {
        categories: categories
            .iter()
            .map(|(code, label, min, max)| CategorySpec {
                code: code.to_string(),
                label: label.to_string(),
                range: StatRange::new(*min, *max),
            })
            .collect(),
        opponents: strings(opponents),
        score_labels: strings(scores),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn check_range(name: &str, range: &StatRange) -> Result<()> {
    let finite = range.min.is_finite() && range.max.is_finite();
    if !finite || range.min <= 0.0 || range.max < range.min {
        return Err(invalid(format!(
            "range {name} must satisfy 0 < min <= max, got [{}, {}]",
            range.min, range.max
        )));
    }
    Ok(())
}

fn invalid(msg: String) -> EngineError {
    EngineError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        EngineConfig::default().validate().expect("defaults validate");
    }

    #[test]
    fn unknown_sport_uses_fallback_tables() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.category_range("Curling", "PTS"), cfg.fallback_range);
        assert_eq!(cfg.opponents("Curling"), cfg.fallback_opponents.as_slice());
        assert_eq!(cfg.category_range("NBA", "nope"), cfg.fallback_range);
        assert_eq!(cfg.category_range("nba", "pts"), StatRange::new(10.0, 35.0));
    }

    #[test]
    fn category_label_falls_back_to_code() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.category_label("NBA", "PTS"), "Points");
        assert_eq!(cfg.category_label("nfl", "rec_yds"), "Receiving Yards");
        assert_eq!(cfg.category_label("NBA", "XYZ"), "XYZ");
        assert_eq!(cfg.category_label("Curling", "PTS"), "PTS");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"sportsbooks":["Only Book"]}"#).expect("parses");
        assert_eq!(cfg.sportsbooks, vec!["Only Book".to_string()]);
        assert_eq!(cfg.alt_line_offsets, EngineConfig::default().alt_line_offsets);
        assert!(cfg.sports.contains_key("NBA"));
    }

    #[test]
    fn validate_rejects_unsorted_offsets() {
        let cfg = EngineConfig {
            alt_line_offsets: vec![-1.0, 1.0, 0.5],
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_inverted_thresholds() {
        let cfg = EngineConfig {
            grading: GradingThresholds {
                pick: 0.10,
                a_plus: 0.05,
            },
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_projection_reads_zero() {
        let table = ProbabilityTable::default();
        assert_eq!(table.model_prob("NBA", "Celtics"), 0.71);
        assert_eq!(table.model_prob("NBA", "Nobody"), 0.0);
        assert_eq!(table.model_prob("Cricket", "Celtics"), 0.0);
    }

    #[test]
    fn probability_table_parses_nested_map() {
        let table: ProbabilityTable =
            serde_json::from_str(r#"{"NBA":{"p-123":0.55}}"#).expect("parses");
        assert_eq!(table.model_prob("NBA", "p-123"), 0.55);
    }
}
