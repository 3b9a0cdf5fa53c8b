use crate::config::EngineConfig;
use crate::seed::{SeedKey, round_half};

const LINE_OFFSET: i64 = 99;
const MIN_LINE: f64 = 0.5;

/// Betting line for a subject's stat category. Always a positive multiple of 0.5.
pub fn prop_line(cfg: &EngineConfig, subject_id: &str, sport: &str, category: &str) -> f64 {
    line_for_key(cfg, &SeedKey::new(subject_id, sport, category), sport, category)
}

pub fn line_for_key(cfg: &EngineConfig, key: &SeedKey, sport: &str, category: &str) -> f64 {
    let range = cfg.category_range(sport, category);
    let raw = range.min + key.draw(LINE_OFFSET) * (range.max - range.min);
    let line = round_half(raw);
    if line.is_finite() { line.max(MIN_LINE) } else { MIN_LINE }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatRange;

    #[test]
    fn line_is_stable_and_on_half_grid() {
        let cfg = EngineConfig::default();
        let a = prop_line(&cfg, "p-123", "NBA", "PTS");
        let b = prop_line(&cfg, "p-123", "NBA", "PTS");
        assert_eq!(a.to_bits(), b.to_bits());
        assert_eq!((a * 2.0).fract(), 0.0);
        assert!((10.0..=35.0).contains(&a));
    }

    #[test]
    fn tiny_ranges_still_yield_positive_lines() {
        let mut cfg = EngineConfig::default();
        cfg.fallback_range = StatRange::new(0.1, 0.2);
        for i in 0..50 {
            let line = prop_line(&cfg, &format!("s-{i}"), "Unknown", "X");
            assert!(line >= 0.5);
        }
    }

    #[test]
    fn categories_use_their_own_ranges() {
        let cfg = EngineConfig::default();
        for i in 0..50 {
            let ast = prop_line(&cfg, &format!("p-{i}"), "NBA", "AST");
            assert!((2.0..=9.0).contains(&ast), "{ast}");
        }
    }
}
