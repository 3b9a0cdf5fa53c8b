use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GradingThresholds, ProbabilityTable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub subject_id: String,
    pub sport: String,
    pub opponent_id: String,
    pub american_odds: i32,
    pub game_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::APlus => "A+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiPick {
    pub subject_id: String,
    pub opponent_id: String,
    pub sport: String,
    pub game_label: String,
    pub edge: f64,
    pub grade: Grade,
    /// Rounded percentage, 0..=100.
    pub model_prob: u8,
    /// Rounded percentage, 0..=100.
    pub market_prob: u8,
    pub american_odds: i32,
}

impl AiPick {
    pub fn edge_label(&self) -> String {
        format!("{:.1}%", self.edge * 100.0)
    }

    /// Unrounded model probability, recovered from the market price and edge.
    pub fn model_probability(&self) -> f64 {
        implied_probability(self.american_odds) + self.edge
    }

    /// Fractional Kelly share of bankroll for this pick.
    pub fn kelly_fraction(&self, safety: f64) -> f64 {
        kelly_fraction(self.model_probability(), self.american_odds, safety)
    }
}

/// Post-grading view filter: sport tab and minimum edge slider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickFilter {
    pub sport: Option<String>,
    pub min_edge: f64,
}

impl PickFilter {
    pub fn matches(&self, pick: &AiPick) -> bool {
        let sport_ok = self
            .sport
            .as_deref()
            .is_none_or(|s| s.eq_ignore_ascii_case(&pick.sport));
        sport_ok && pick.edge >= self.min_edge
    }
}

/// Win probability encoded by an American price. Zero is treated as even money.
pub fn implied_probability(american_odds: i32) -> f64 {
    let odds = f64::from(american_odds);
    if american_odds > 0 {
        100.0 / (odds + 100.0)
    } else if american_odds < 0 {
        odds.abs() / (odds.abs() + 100.0)
    } else {
        0.5
    }
}

/// American price that is fair for `prob`, clamped away from 0 and 1.
pub fn fair_american_odds(prob: f64) -> i32 {
    let p = if prob.is_nan() { 0.5 } else { prob.clamp(0.001, 0.999) };
    if p >= 0.5 {
        -((p / (1.0 - p)) * 100.0).round() as i32
    } else {
        (((1.0 - p) / p) * 100.0).round() as i32
    }
}

/// Net profit per unit staked at an American price. Zero is treated as even money.
pub fn net_payout(american_odds: i32) -> f64 {
    let odds = f64::from(american_odds);
    if american_odds > 0 {
        odds / 100.0
    } else if american_odds < 0 {
        100.0 / odds.abs()
    } else {
        1.0
    }
}

/// Share of bankroll to stake under Kelly, `(b*p - q) / b`, scaled by `safety`
/// (0.25 is quarter Kelly). Zero whenever the price offers no edge.
pub fn kelly_fraction(prob: f64, american_odds: i32, safety: f64) -> f64 {
    if !(prob.is_finite() && safety.is_finite()) || safety <= 0.0 {
        return 0.0;
    }
    let p = prob.clamp(0.0, 1.0);
    let b = net_payout(american_odds);
    let full = (b * p - (1.0 - p)) / b;
    if full > 0.0 { full * safety } else { 0.0 }
}

/// Stake sizing against a fixed bankroll. Every stake is rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetSizer {
    pub bankroll: f64,
}

impl BetSizer {
    /// Largest share of bankroll a target-profit stake may take.
    pub const TARGET_CAP: f64 = 0.10;

    pub fn new(bankroll: f64) -> Self {
        Self { bankroll }
    }

    pub fn kelly_stake(&self, prob: f64, american_odds: i32, safety: f64) -> f64 {
        cents(self.bankroll() * kelly_fraction(prob, american_odds, safety))
    }

    pub fn fixed_unit(&self, unit_share: f64) -> f64 {
        cents(self.bankroll() * unit_share.clamp(0.0, 1.0))
    }

    /// Stake that wins `target` at this price, capped at [`Self::TARGET_CAP`] of bankroll.
    pub fn target_profit(&self, target: f64, american_odds: i32) -> f64 {
        let target = if target.is_finite() { target.max(0.0) } else { 0.0 };
        let stake = target / net_payout(american_odds);
        cents(stake.min(self.bankroll() * Self::TARGET_CAP))
    }

    fn bankroll(&self) -> f64 {
        if self.bankroll.is_finite() { self.bankroll.max(0.0) } else { 0.0 }
    }
}

fn cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Grade every entry against the model table; keep those with edge above the
/// pick threshold, strongest edge first. Entries without a projection have a
/// model probability of zero and never qualify.
pub fn grade_market(
    entries: &[MarketEntry],
    table: &ProbabilityTable,
    thresholds: GradingThresholds,
) -> Vec<AiPick> {
    let mut picks: Vec<AiPick> = entries
        .iter()
        .filter_map(|entry| {
            let market = implied_probability(entry.american_odds);
            let model = table.model_prob(&entry.sport, &entry.subject_id);
            let edge = model - market;
            if !(edge > thresholds.pick) {
                return None;
            }
            Some(AiPick {
                subject_id: entry.subject_id.clone(),
                opponent_id: entry.opponent_id.clone(),
                sport: entry.sport.clone(),
                game_label: entry.game_label.clone(),
                edge,
                grade: if edge > thresholds.a_plus {
                    Grade::APlus
                } else {
                    Grade::A
                },
                model_prob: to_pct(model),
                market_prob: to_pct(market),
                american_odds: entry.american_odds,
            })
        })
        .collect();

    picks.sort_by(|a, b| b.edge.total_cmp(&a.edge));
    debug!(entries = entries.len(), picks = picks.len(), "graded market");
    picks
}

pub fn grade_market_filtered(
    entries: &[MarketEntry],
    table: &ProbabilityTable,
    thresholds: GradingThresholds,
    filter: &PickFilter,
) -> Vec<AiPick> {
    grade_market(entries, table, thresholds)
        .into_iter()
        .filter(|p| filter.matches(p))
        .collect()
}

fn to_pct(p: f64) -> u8 {
    (p * 100.0).round().clamp(0.0, 100.0) as u8
}
