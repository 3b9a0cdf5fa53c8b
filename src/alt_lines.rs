use serde::Serialize;

use crate::config::EngineConfig;
use crate::seed::{SeedKey, round_half};

const UNDER_QUOTE_CUTOFF: f64 = 0.35;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub book_name: String,
    pub american_price: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AltLineEntry {
    pub line: f64,
    pub over_quote: Option<Quote>,
    pub under_quote: Option<Quote>,
}

/// Alternate thresholds around `base_line`, strictly increasing and all positive.
///
/// The over price moves `price_step` points per unit of offset away from the base
/// price (cheaper below the base line, dearer above it); the under mirrors it.
/// Roughly two thirds of rungs carry an under quote. With no sportsbooks
/// configured a rung carries no quotes at all.
pub fn ladder(cfg: &EngineConfig, base_line: f64, key: &SeedKey) -> Vec<AltLineEntry> {
    let books = &cfg.sportsbooks;
    let base = f64::from(cfg.base_price);
    let mut out: Vec<AltLineEntry> = Vec::with_capacity(cfg.alt_line_offsets.len());

    for (i, offset) in cfg.alt_line_offsets.iter().copied().enumerate() {
        let candidate = round_half(base_line + offset);
        if !candidate.is_finite() || candidate <= 0.0 {
            continue;
        }
        if out.last().is_some_and(|prev| candidate <= prev.line) {
            continue;
        }

        let o = i as i64;
        let last_book = books.len() as i64 - 1;
        let over_book = pick_book(books, key.derive("ob", i).draw_int(o, 0, last_book));
        let over_quote = over_book.map(|book_name| Quote {
            book_name,
            american_price: (base - offset * cfg.price_step).round() as i32,
        });

        let under_quote = if key.derive("hu", i).draw(o + 50) > UNDER_QUOTE_CUTOFF {
            pick_book(books, key.derive("ub", i).draw_int(o + 75, 0, last_book))
                .map(|book_name| Quote {
                    book_name,
                    american_price: (base + offset * cfg.price_step).round() as i32,
                })
        } else {
            None
        };

        out.push(AltLineEntry {
            line: candidate,
            over_quote,
            under_quote,
        });
    }

    out
}

fn pick_book(books: &[String], idx: i64) -> Option<String> {
    usize::try_from(idx).ok().and_then(|i| books.get(i)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SeedKey {
        SeedKey::new("p-9", "NBA", "REB")
    }

    #[test]
    fn small_base_line_skips_non_positive_rungs() {
        let cfg = EngineConfig::default();
        let rungs = ladder(&cfg, 1.5, &key());
        assert!(rungs.iter().all(|r| r.line > 0.0));
        // -5, -4, -3, -2, -1.5 fall at or below zero.
        assert_eq!(rungs.len(), cfg.alt_line_offsets.len() - 5);
        assert_eq!(rungs[0].line, 0.5);
    }

    #[test]
    fn rungs_strictly_increase() {
        let cfg = EngineConfig::default();
        for base in [0.5, 3.5, 10.0, 24.5, 250.5] {
            let rungs = ladder(&cfg, base, &key());
            assert!(rungs.windows(2).all(|w| w[0].line < w[1].line));
        }
    }

    #[test]
    fn over_prices_follow_offset() {
        let cfg = EngineConfig::default();
        let rungs = ladder(&cfg, 20.5, &key());
        let first = rungs.first().and_then(|r| r.over_quote.as_ref()).unwrap();
        // offset -5 -> -110 + 350
        assert_eq!(first.american_price, 240);
        let last = rungs.last().and_then(|r| r.over_quote.as_ref()).unwrap();
        // offset +7 -> -110 - 490
        assert_eq!(last.american_price, -600);
        for r in &rungs {
            if let Some(u) = &r.under_quote {
                let o = r.over_quote.as_ref().unwrap();
                assert_eq!(o.american_price + u.american_price, -220);
            }
        }
    }

    #[test]
    fn quotes_name_configured_books() {
        let cfg = EngineConfig::default();
        for r in ladder(&cfg, 12.0, &key()) {
            let over = r.over_quote.expect("books configured");
            assert!(cfg.sportsbooks.contains(&over.book_name));
        }
    }

    #[test]
    fn no_books_means_no_quotes() {
        let mut cfg = EngineConfig::default();
        cfg.sportsbooks.clear();
        let rungs = ladder(&cfg, 12.0, &key());
        assert!(!rungs.is_empty());
        assert!(rungs.iter().all(|r| r.over_quote.is_none() && r.under_quote.is_none()));
    }

    #[test]
    fn under_quotes_are_present_on_some_but_not_all_rungs() {
        let cfg = EngineConfig::default();
        let mut with_under = 0;
        let mut total = 0;
        for s in 0..20 {
            let k = SeedKey::new(&format!("p-{s}"), "NBA", "PTS");
            for r in ladder(&cfg, 20.5, &k) {
                total += 1;
                if r.under_quote.is_some() {
                    with_under += 1;
                }
            }
        }
        assert!(with_under > 0 && with_under < total);
    }
}
