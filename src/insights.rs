use crate::game_log::GameLogEntry;
use crate::window::{average, hit_count, hit_rate};

const MIN_SPLIT_GAMES: usize = 2;

/// Popover sentences for a subject's log against `line`.
///
/// Always two sentences (hits, average); a home and a road sentence are added
/// when that split has at least two games.
pub fn compose(
    subject_label: &str,
    line: f64,
    category: &str,
    log: &[GameLogEntry],
) -> Vec<String> {
    let mut out = Vec::with_capacity(4);

    if log.is_empty() {
        out.push(format!(
            "{subject_label} has no recent games logged against the {line} {category} line."
        ));
        out.push(format!("No {category} average is available yet."));
        return out;
    }

    out.push(format!(
        "{subject_label} has gone over {line} {category} in {} of the last {} games ({}%).",
        hit_count(log, line),
        log.len(),
        hit_rate(log, line),
    ));
    if let Some(avg) = average(log) {
        out.push(format!(
            "{subject_label} is averaging {avg:.1} {category} over that span."
        ));
    }

    let (home, away): (Vec<GameLogEntry>, Vec<GameLogEntry>) =
        log.iter().cloned().partition(|e| e.is_home);
    if let Some(s) = split_sentence("At home", subject_label, line, &home) {
        out.push(s);
    }
    if let Some(s) = split_sentence("On the road", subject_label, line, &away) {
        out.push(s);
    }
    out
}

fn split_sentence(
    prefix: &str,
    subject_label: &str,
    line: f64,
    games: &[GameLogEntry],
) -> Option<String> {
    if games.len() < MIN_SPLIT_GAMES {
        return None;
    }
    Some(format!(
        "{prefix}, {subject_label} has cleared {line} in {}/{} games ({}%).",
        hit_count(games, line),
        games.len(),
        hit_rate(games, line),
    ))
}
