//! Composer: folds a line of text into renderable units.
//!
//! Single left-to-right pass. At each code point:
//! 1. Join control (ZWJ support on), a previous unit exists and another code
//!    point follows: the previous unit becomes `ZWJ(prev, next)` and both the
//!    joiner and the next code point are consumed.
//! 2. Variation-selector-like (variation support on) after a unit: wrap it.
//! 3. Skin tone modifier (modifier support on) after a unit: wrap it.
//! 4. Otherwise: a new bare unit.
//!
//! Nothing is an error. A leading joiner, selector or modifier, a trailing
//! joiner, or any class whose support flag is off simply stays a bare unit.

use crate::codepoint::{is_emoji_modifier, is_join_control, is_variation_selector_like};
use crate::unit::{CodePoint, Unit};
use crate::width::WidthOracle;
use core_terminal::TerminalCapabilities;
use tracing::trace;

#[derive(Debug, Clone, Copy)]
pub struct Composer {
    caps: TerminalCapabilities,
    oracle: WidthOracle,
}

impl Composer {
    pub fn new(caps: &TerminalCapabilities) -> Self {
        Self::with_oracle(caps, WidthOracle::from_capabilities(caps))
    }

    pub fn with_oracle(caps: &TerminalCapabilities, oracle: WidthOracle) -> Self {
        Self {
            caps: *caps,
            oracle,
        }
    }

    #[inline]
    pub fn capabilities(&self) -> &TerminalCapabilities {
        &self.caps
    }

    #[inline]
    pub fn oracle(&self) -> &WidthOracle {
        &self.oracle
    }

    #[inline]
    fn code_point(&self, c: char) -> CodePoint {
        CodePoint::new(c, &self.oracle)
    }

    pub fn compose(&self, text: &str) -> Vec<Unit> {
        let chars: Vec<char> = text.chars().collect();
        let mut units: Vec<Unit> = Vec::with_capacity(chars.len());
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let has_prev = !units.is_empty();
            if has_prev
                && self.caps.zero_width_join_ok()
                && is_join_control(c)
                && i + 1 < chars.len()
            {
                let right = Unit::bare(self.code_point(chars[i + 1]));
                wrap_last(&mut units, |left| Unit::zero_width_join(left, c, right));
                i += 2;
                continue;
            }
            if has_prev && self.caps.variation_sequence_ok() && is_variation_selector_like(c) {
                let selector = self.code_point(c);
                wrap_last(&mut units, |base| Unit::variation(base, selector));
            } else if has_prev && self.caps.modifier_sequence_ok() && is_emoji_modifier(c) {
                let modifier = self.code_point(c);
                wrap_last(&mut units, |base| Unit::modifier(base, modifier));
            } else {
                units.push(Unit::bare(self.code_point(c)));
            }
            i += 1;
        }
        trace!(
            target: "text.compose",
            chars = chars.len(),
            units = units.len(),
            "compose"
        );
        units
    }
}

fn wrap_last(units: &mut Vec<Unit>, wrap: impl FnOnce(Unit) -> Unit) {
    if let Some(last) = units.pop() {
        units.push(wrap(last));
    }
}
