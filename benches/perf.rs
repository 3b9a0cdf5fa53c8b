use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use picklabs_engine::alt_lines::ladder;
use picklabs_engine::config::{EngineConfig, GradingThresholds, ProbabilityTable};
use picklabs_engine::edge::{MarketEntry, grade_market};
use picklabs_engine::game_log::generate;
use picklabs_engine::prop_board::{RosterEntry, build_board};
use picklabs_engine::seed::{SeedKey, draw};

fn bench_draw(c: &mut Criterion) {
    c.bench_function("seed_draw", |b| {
        b.iter(|| black_box(draw(black_box("p-123/NBA/PTS/log#7"), black_box(7))))
    });
}

fn bench_season_log(c: &mut Criterion) {
    let cfg = EngineConfig::default();
    let key = SeedKey::new("p-123", "NBA", "PTS");
    c.bench_function("game_log_season", |b| {
        b.iter(|| {
            let log = generate(&cfg, black_box(&key), 24.5, "NBA", 40);
            black_box(log.len());
        })
    });
}

fn bench_ladder(c: &mut Criterion) {
    let cfg = EngineConfig::default();
    let key = SeedKey::new("p-123", "NBA", "PTS");
    c.bench_function("alt_line_ladder", |b| {
        b.iter(|| black_box(ladder(&cfg, black_box(24.5), &key)))
    });
}

fn bench_board(c: &mut Criterion) {
    let cfg = EngineConfig::default();
    let roster: Vec<RosterEntry> = (0..15)
        .map(|idx| RosterEntry {
            id: format!("nba-{idx}"),
            display_name: format!("Player {idx}"),
            position: None,
            jersey: if idx % 5 == 0 { None } else { Some(idx) },
        })
        .collect();
    c.bench_function("prop_board_15", |b| {
        b.iter(|| black_box(build_board(&cfg, black_box(&roster), "NBA", 15).len()))
    });
}

fn bench_grading(c: &mut Criterion) {
    let table = ProbabilityTable::default();
    let teams = ["Lakers", "Celtics", "Heat", "Nuggets", "Thunder", "Knicks", "Nobody"];
    let market: Vec<MarketEntry> = (0..500)
        .map(|idx| MarketEntry {
            subject_id: teams[idx % teams.len()].to_string(),
            sport: "NBA".to_string(),
            opponent_id: "OPP".to_string(),
            american_odds: if idx % 2 == 0 {
                -100 - (idx as i32 % 300)
            } else {
                100 + idx as i32 % 300
            },
            game_label: format!("game {idx}"),
        })
        .collect();
    c.bench_function("grade_market_500", |b| {
        b.iter(|| {
            let picks = grade_market(black_box(&market), &table, GradingThresholds::default());
            black_box(picks.len())
        })
    });
}

criterion_group!(
    benches,
    bench_draw,
    bench_season_log,
    bench_ladder,
    bench_board,
    bench_grading
);
criterion_main!(benches);
