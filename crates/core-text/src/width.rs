//! Display width oracle.
//!
//! Single authority for the column width of an individual code point (and of
//! short strings). Composite units never consult this module for their own
//! width; they sum the widths of the code points they were built from (see
//! `unit.rs`), because terminals that draw composite emoji disagree with the
//! generic tables about the result.
//!
//! Width rules:
//! 1. Baseline: `unicode-width` (standard East Asian Width table).
//! 2. Ambiguous-width characters follow the terminal: narrow unless the
//!    capabilities say the terminal renders them wide (`width_cjk`). The
//!    baseline keeps ambiguous Greek and Cyrillic letters narrow even in CJK
//!    mode; wide terminals draw them in two columns, so they are widened here.
//! 3. Control characters occupy no columns.
//!
//! Invariants:
//! - `char_width` is total and always in `0..=2`.
//! - Same input, same output: the oracle holds no mutable state.

use core_terminal::TerminalCapabilities;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WidthOracle {
    ambiguous_wide: bool,
}

impl WidthOracle {
    pub const fn new(ambiguous_wide: bool) -> Self {
        Self { ambiguous_wide }
    }

    pub fn from_capabilities(caps: &TerminalCapabilities) -> Self {
        Self::new(caps.ambiguous_wide)
    }

    #[inline]
    pub fn ambiguous_wide(&self) -> bool {
        self.ambiguous_wide
    }

    /// Column width of a single code point: 0, 1 or 2.
    #[inline]
    pub fn char_width(&self, c: char) -> u8 {
        let w = if self.ambiguous_wide {
            if is_ambiguous_letter(c) {
                return 2;
            }
            c.width_cjk()
        } else {
            c.width()
        };
        w.unwrap_or(0).min(2) as u8
    }

    /// Column width of a short string as the generic table sees it.
    ///
    /// Diagnostic counterpart to `total_width` over composed units: the two
    /// differ exactly where composites reserve extra columns. Each extended
    /// grapheme cluster counts as the width of its first code point with a
    /// non-zero width, so combining marks and selectors inside a cluster do
    /// not add columns.
    pub fn str_width(&self, s: &str) -> usize {
        s.graphemes(true)
            .map(|g| {
                g.chars()
                    .map(|c| self.char_width(c))
                    .find(|w| *w > 0)
                    .unwrap_or(0) as usize
            })
            .sum()
    }
}

// East Asian Ambiguous Greek and Cyrillic letters.
fn is_ambiguous_letter(c: char) -> bool {
    matches!(
        c,
        '\u{0391}'..='\u{03A1}'
            | '\u{03A3}'..='\u{03A9}'
            | '\u{03B1}'..='\u{03C1}'
            | '\u{03C3}'..='\u{03C9}'
            | '\u{0401}'
            | '\u{0410}'..='\u{044F}'
            | '\u{0451}'
    )
}
