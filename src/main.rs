use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use picklabs_engine::alt_lines;
use picklabs_engine::config::{EngineConfig, ProbabilityTable};
use picklabs_engine::edge::{self, AiPick, BetSizer, MarketEntry, PickFilter};
use picklabs_engine::game_log;
use picklabs_engine::line::line_for_key;
use picklabs_engine::prop_board::{self, RosterEntry};
use picklabs_engine::seed::SeedKey;
use picklabs_engine::window::Window;

#[derive(Debug, Parser)]
#[command(
    name = "picklabs",
    about = "Deterministic prop lines, synthetic game logs and graded market edges"
)]
struct Cli {
    /// Engine tables as JSON. Falls back to PICKLABS_CONFIG, then the built-in tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Line, per-window hit rates, alt ladder and insights for one prop.
    Props {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        sport: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long, default_value = "L10")]
        window: Window,
    },
    /// Synthetic game log for one prop and window.
    Log {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        sport: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "L10")]
        window: Window,
    },
    /// Alternate line ladder around the base line.
    Ladder {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        sport: String,
        #[arg(long)]
        category: String,
    },
    /// Prop table rows for a roster file.
    Board {
        #[arg(long)]
        roster: PathBuf,
        #[arg(long)]
        sport: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Graded moneyline edges for a market file.
    Picks {
        #[arg(long)]
        market: Option<PathBuf>,
        #[arg(long)]
        projections: Option<PathBuf>,
        #[arg(long)]
        sport: Option<String>,
        /// Minimum edge in percentage points.
        #[arg(long, default_value_t = 8.0)]
        min_edge: f64,
        /// Attach a fractional-Kelly stake per pick against this bankroll.
        #[arg(long)]
        bankroll: Option<f64>,
        #[arg(long, default_value_t = 0.25)]
        kelly: f64,
    },
}

#[derive(Debug, Serialize)]
struct SizedPick {
    #[serde(flatten)]
    pick: AiPick,
    stake: f64,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = match cli.config.as_deref() {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::from_env().context("loading engine config from environment")?,
    };

    match cli.command {
        Command::Props {
            subject,
            sport,
            category,
            label,
            window,
        } => {
            let entry = RosterEntry {
                display_name: label.unwrap_or_else(|| subject.clone()),
                id: subject,
                position: None,
                jersey: None,
            };
            let snap = prop_board::snapshot(&cfg, &entry, &sport, &category, window);
            info!(subject = %entry.id, line = snap.line, "built prop snapshot");
            print_json(&snap)
        }
        Command::Log {
            subject,
            sport,
            category,
            window,
        } => {
            let key = SeedKey::new(&subject, &sport, &category);
            let line = line_for_key(&cfg, &key, &sport, &category);
            let window_key = key.with_window(window);
            let log = game_log::generate(&cfg, &window_key, line, &sport, window.game_count());
            print_json(&log)
        }
        Command::Ladder {
            subject,
            sport,
            category,
        } => {
            let key = SeedKey::new(&subject, &sport, &category);
            let line = line_for_key(&cfg, &key, &sport, &category);
            print_json(&alt_lines::ladder(&cfg, line, &key))
        }
        Command::Board {
            roster,
            sport,
            limit,
        } => {
            let roster: Vec<RosterEntry> = read_json(&roster)?;
            let rows = prop_board::build_board(&cfg, &roster, &sport, limit);
            info!(sport = %sport, rows = rows.len(), "built prop board");
            print_json(&rows)
        }
        Command::Picks {
            market,
            projections,
            sport,
            min_edge,
            bankroll,
            kelly,
        } => {
            let market: Vec<MarketEntry> = match market {
                Some(path) => read_json(&path)?,
                None => sample_market(),
            };
            let table = match projections {
                Some(path) => ProbabilityTable::from_path(&path)
                    .with_context(|| format!("loading projections {}", path.display()))?,
                None => ProbabilityTable::default(),
            };
            let filter = PickFilter {
                sport,
                min_edge: (min_edge / 100.0).max(0.0),
            };
            let picks = edge::grade_market_filtered(&market, &table, cfg.grading, &filter);
            info!(market = market.len(), picks = picks.len(), "graded market");
            match bankroll {
                Some(bankroll) => {
                    let sizer = BetSizer::new(bankroll);
                    let sized: Vec<SizedPick> = picks
                        .into_iter()
                        .map(|pick| SizedPick {
                            stake: sizer.kelly_stake(
                                pick.model_probability(),
                                pick.american_odds,
                                kelly,
                            ),
                            pick,
                        })
                        .collect();
                    print_json(&sized)
                }
                None => print_json(&picks),
            }
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{out}");
    Ok(())
}

fn sample_market() -> Vec<MarketEntry> {
    let rows: &[(&str, &str, &str, i32)] = &[
        ("Lakers", "Warriors", "NBA", 110),
        ("Warriors", "Lakers", "NBA", 120),
        ("Celtics", "Heat", "NBA", -150),
        ("Heat", "Celtics", "NBA", 190),
        ("Nuggets", "Suns", "NBA", -140),
        ("Thunder", "Knicks", "NBA", -115),
        ("South Carolina", "Iowa", "NCAAW", -400),
        ("Iowa", "South Carolina", "NCAAW", 300),
        ("Chiefs", "Eagles", "NFL", -140),
        ("Bruins", "Rangers", "NHL", -120),
        ("Dodgers", "Braves", "MLB", -155),
    ];
    rows.iter()
        .map(|(team, opp, sport, odds)| MarketEntry {
            subject_id: team.to_string(),
            sport: sport.to_string(),
            opponent_id: opp.to_string(),
            american_odds: *odds,
            game_label: format!("{team} vs {opp}"),
        })
        .collect()
}
