use std::fmt;

use crate::window::Window;

const OFFSET_MUL: u32 = 0x9E37_79B1;
const MIX_A: u32 = 0x85EB_CA6B;
const MIX_B: u32 = 0xC2B2_AE35;
// 2^32, so a full-scale hash still lands strictly below 1.0.
const NORM: f64 = 4_294_967_296.0;

/// Deterministic draw in `[0, 1)` for any key and offset.
pub fn draw(key: &str, offset: i64) -> f64 {
    let folded_offset = (offset as u64 ^ ((offset as u64) >> 32)) as u32;
    let mut h = folded_offset.wrapping_mul(OFFSET_MUL);
    for c in key.chars() {
        h ^= c as u32;
        h = h.wrapping_mul(MIX_A);
        h ^= h >> 15;
        h = h.wrapping_mul(MIX_B);
    }
    h ^= h >> 16;
    f64::from(h) / NORM
}

/// Integer in `[min, max]` derived from [`draw`]. Returns `min` when `max < min`.
pub fn draw_int(key: &str, offset: i64, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    // Widened so spans past i64::MAX stay exact.
    let span = (i128::from(max) - i128::from(min) + 1) as f64;
    let step = (draw(key, offset) * span).floor() as i128;
    let v = i128::from(min) + step;
    v.clamp(i128::from(min), i128::from(max)) as i64
}

/// Identity of one logical pseudo-random sequence.
///
/// Built from structured fields; every field is length-prefixed in the canonical
/// text so `("ab", "c")` and `("a", "bc")` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeedKey {
    canonical: String,
}

impl SeedKey {
    pub fn new(subject_id: &str, sport: &str, category: &str) -> Self {
        let cap = subject_id.len() + sport.len() + category.len() + 16;
        let mut canonical = String::with_capacity(cap);
        push_field(&mut canonical, subject_id);
        push_field(&mut canonical, sport);
        push_field(&mut canonical, category);
        Self { canonical }
    }

    /// Wrap arbitrary text as a key. Raw keys live in their own namespace.
    pub fn raw(text: &str) -> Self {
        let mut canonical = String::from("raw");
        push_field(&mut canonical, text);
        Self { canonical }
    }

    pub fn with_window(&self, window: Window) -> Self {
        let mut canonical = self.canonical.clone();
        canonical.push_str("/w=");
        canonical.push_str(window.code());
        Self { canonical }
    }

    /// Sub-sequence for one purpose (log value, opponent pick, book pick, ...) at `index`.
    pub fn derive(&self, tag: &str, index: usize) -> Self {
        let mut canonical = self.canonical.clone();
        canonical.push('/');
        push_field(&mut canonical, tag);
        canonical.push('#');
        canonical.push_str(&index.to_string());
        Self { canonical }
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn draw(&self, offset: i64) -> f64 {
        draw(&self.canonical, offset)
    }

    pub fn draw_int(&self, offset: i64, min: i64, max: i64) -> i64 {
        draw_int(&self.canonical, offset, min, max)
    }
}

impl fmt::Display for SeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

fn push_field(out: &mut String, field: &str) {
    out.push_str(&field.chars().count().to_string());
    out.push(':');
    out.push_str(field);
}

/// Round to the nearest half unit.
pub fn round_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}
