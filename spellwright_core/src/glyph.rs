// Glyph generator.
//
// Produces a small centered block of symbols drawn from the intent's symbol
// set. Layout is a two-step process: the shape decides a slot mask for each
// row (which positions exist and which are filled), then filled slots draw
// symbols. Rows render as slots joined by single spaces and are centered to
// the widest row with spaces (left padding gets the floor of the half), so
// every line has the same display width.
//
// Draw order (part of the determinism contract):
// 1. line count in [3, 7]
// 2. shape index into `GlyphShape::ALL`
// 3. one symbol index per filled slot, row-major

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use spellwright_lexicon::{Corpus, IntentCategory};
use spellwright_prng::SpellRng;

pub const GLYPH_LINES_MIN: usize = 3;
pub const GLYPH_LINES_MAX: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphShape {
    Circle,
    Triangle,
    Line,
    Cross,
}

impl GlyphShape {
    pub const ALL: [GlyphShape; 4] = [
        GlyphShape::Circle,
        GlyphShape::Triangle,
        GlyphShape::Line,
        GlyphShape::Cross,
    ];

    /// Slot mask for row `i` of an `n`-row glyph. `true` = filled.
    fn row_mask(self, i: usize, n: usize) -> Vec<bool> {
        match self {
            GlyphShape::Circle => {
                let d = i.min(n - 1 - i);
                let width = 3 + 2 * d;
                if d == 0 {
                    vec![true; width]
                } else {
                    (0..width).map(|j| j == 0 || j == width - 1).collect()
                }
            }
            GlyphShape::Triangle => vec![true; 2 * i + 1],
            GlyphShape::Line => {
                if i == 0 || i == n - 1 {
                    vec![true; 3]
                } else {
                    vec![true]
                }
            }
            GlyphShape::Cross => {
                let mid = n / 2;
                if i == mid {
                    vec![true; 2 * mid + 1]
                } else {
                    vec![true]
                }
            }
        }
    }
}

/// A rendered glyph block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Glyph {
    /// Rendered rows, all of equal display width.
    pub lines: Vec<String>,
    /// Distinct symbols used, in order of first use.
    pub symbols: Vec<char>,
    pub shape: GlyphShape,
}

impl Glyph {
    /// Display width of each line.
    pub fn line_widths(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().map(|l| l.width())
    }
}

pub fn generate(seed: u64, intent: IntentCategory, corpus: &Corpus) -> Glyph {
    let palette = &corpus.entry(intent).symbols;
    let mut rng = SpellRng::new(seed);

    let n = rng.range_usize_inclusive(GLYPH_LINES_MIN, GLYPH_LINES_MAX);
    let shape = GlyphShape::ALL[rng.index(GlyphShape::ALL.len())];

    let mut symbols = Vec::new();
    let rows: Vec<String> = (0..n)
        .map(|i| {
            shape
                .row_mask(i, n)
                .into_iter()
                .map(|filled| {
                    if filled {
                        let symbol = palette[rng.index(palette.len())];
                        if !symbols.contains(&symbol) {
                            symbols.push(symbol);
                        }
                        symbol
                    } else {
                        ' '
                    }
                })
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    Glyph {
        lines: center_rows(rows),
        symbols,
        shape,
    }
}

/// Pad every row with spaces to the widest row's display width, centered.
fn center_rows(rows: Vec<String>) -> Vec<String> {
    let max = rows.iter().map(|r| r.width()).max().unwrap_or(0);
    rows.into_iter()
        .map(|row| {
            let slack = max - row.width();
            let left = slack / 2;
            format!("{}{}{}", " ".repeat(left), row, " ".repeat(slack - left))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spellwright_lexicon::default_corpus;

    fn mask_str(shape: GlyphShape, n: usize) -> Vec<String> {
        (0..n)
            .map(|i| {
                shape
                    .row_mask(i, n)
                    .iter()
                    .map(|&f| if f { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_circle_masks() {
        assert_eq!(mask_str(GlyphShape::Circle, 3), vec!["###", "#...#", "###"]);
        assert_eq!(
            mask_str(GlyphShape::Circle, 6),
            vec!["###", "#...#", "#.....#", "#.....#", "#...#", "###"]
        );
    }

    #[test]
    fn test_triangle_line_cross_masks() {
        assert_eq!(mask_str(GlyphShape::Triangle, 3), vec!["#", "###", "#####"]);
        assert_eq!(mask_str(GlyphShape::Line, 4), vec!["###", "#", "#", "###"]);
        assert_eq!(mask_str(GlyphShape::Cross, 5), vec!["#", "#", "#####", "#", "#"]);
        assert_eq!(mask_str(GlyphShape::Cross, 4), vec!["#", "#", "#####", "#"]);
    }

    #[test]
    fn test_center_rows() {
        let rows = center_rows(vec!["x".into(), "x x x".into(), "x   x".into()]);
        assert_eq!(rows, vec!["  x  ", "x x x", "x   x"]);
    }

    #[test]
    fn test_generate_bounds_and_width() {
        let corpus = default_corpus().unwrap();
        for seed in 0..200u64 {
            for intent in IntentCategory::ALL {
                let glyph = generate(seed, intent, &corpus);
                assert!((GLYPH_LINES_MIN..=GLYPH_LINES_MAX).contains(&glyph.lines.len()));
                let widths: Vec<usize> = glyph.line_widths().collect();
                assert!(widths.windows(2).all(|w| w[0] == w[1]), "{widths:?}");
                let palette = &corpus.entry(intent).symbols;
                assert!(glyph.symbols.iter().all(|s| palette.contains(s)));
                assert!(!glyph.symbols.is_empty());
            }
        }
    }

    #[test]
    fn test_symbols_in_first_use_order() {
        let corpus = default_corpus().unwrap();
        let glyph = generate(99, IntentCategory::Binding, &corpus);
        let mut seen = Vec::new();
        for c in glyph.lines.iter().flat_map(|l| l.chars()).filter(|c| *c != ' ') {
            if !seen.contains(&c) {
                seen.push(c);
            }
        }
        assert_eq!(seen, glyph.symbols);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let corpus = default_corpus().unwrap();
        let a = generate(0xdead_beef, IntentCategory::Summoning, &corpus);
        let b = generate(0xdead_beef, IntentCategory::Summoning, &corpus);
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_shapes_reachable() {
        let corpus = default_corpus().unwrap();
        let mut shapes: Vec<GlyphShape> = (0..200u64)
            .map(|s| generate(s, IntentCategory::Protection, &corpus).shape)
            .collect();
        shapes.dedup();
        for shape in GlyphShape::ALL {
            assert!(shapes.contains(&shape), "{shape:?} never drawn");
        }
    }
}
