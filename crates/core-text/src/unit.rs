//! Renderable units.
//!
//! A `Unit` is the smallest thing the line editor moves the cursor over: a
//! bare code point, or a composite folded from several code points that the
//! terminal draws as one glyph. Composites own their operands (boxed), and
//! nest left-associatively: the composer always wraps the most recent unit.
//!
//! Width of a composite is computed from its operands, never from the generic
//! width table, so that it matches the terminal's own cursor bookkeeping:
//! * ZWJ: `left + 1 + right` (the joiner reserves a column).
//! * Variation: `base + 1`, except a flag-style base keeps its width.
//! * Modifier: `base + modifier`.

use crate::codepoint::is_flag_base;
use crate::sink::{CountingWriter, WriteError};
use crate::width::WidthOracle;
use std::fmt;
use std::io::{self, Write};

/// A code point with its width resolved once by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodePoint {
    ch: char,
    width: u8,
}

impl CodePoint {
    pub fn new(ch: char, oracle: &WidthOracle) -> Self {
        Self::with_width(ch, oracle.char_width(ch))
    }

    pub const fn with_width(ch: char, width: u8) -> Self {
        Self { ch, width }
    }

    #[inline]
    pub fn ch(&self) -> char {
        self.ch
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Bare,
    ZeroWidthJoin,
    Variation,
    Modifier,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Bare => "bare",
            UnitKind::ZeroWidthJoin => "zwj",
            UnitKind::Variation => "variation",
            UnitKind::Modifier => "modifier",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    Bare(CodePoint),
    /// `left`, joiner, `right`. The joiner is kept verbatim (ZWJ or ZWNJ).
    ZeroWidthJoin {
        left: Box<Unit>,
        joiner: char,
        right: Box<Unit>,
    },
    Variation {
        base: Box<Unit>,
        selector: CodePoint,
    },
    Modifier {
        base: Box<Unit>,
        modifier: CodePoint,
    },
}

impl Unit {
    pub fn bare(cp: CodePoint) -> Self {
        Unit::Bare(cp)
    }

    pub fn zero_width_join(left: Unit, joiner: char, right: Unit) -> Self {
        Unit::ZeroWidthJoin {
            left: Box::new(left),
            joiner,
            right: Box::new(right),
        }
    }

    pub fn variation(base: Unit, selector: CodePoint) -> Self {
        Unit::Variation {
            base: Box::new(base),
            selector,
        }
    }

    pub fn modifier(base: Unit, modifier: CodePoint) -> Self {
        Unit::Modifier {
            base: Box::new(base),
            modifier,
        }
    }

    pub fn kind(&self) -> UnitKind {
        match self {
            Unit::Bare(_) => UnitKind::Bare,
            Unit::ZeroWidthJoin { .. } => UnitKind::ZeroWidthJoin,
            Unit::Variation { .. } => UnitKind::Variation,
            Unit::Modifier { .. } => UnitKind::Modifier,
        }
    }

    /// `true` for a bare code point with flag-style rendering.
    pub fn is_flag_base(&self) -> bool {
        matches!(self, Unit::Bare(cp) if is_flag_base(cp.ch()))
    }

    /// Columns the terminal advances the cursor by for this unit.
    pub fn width(&self) -> usize {
        match self {
            Unit::Bare(cp) => cp.width(),
            Unit::ZeroWidthJoin { left, right, .. } => left.width() + 1 + right.width(),
            Unit::Variation { base, .. } => {
                if base.is_flag_base() {
                    base.width()
                } else {
                    base.width() + 1
                }
            }
            Unit::Modifier { base, modifier } => base.width() + modifier.width(),
        }
    }

    /// Number of code points this unit was built from.
    pub fn len_chars(&self) -> usize {
        match self {
            Unit::Bare(_) => 1,
            Unit::ZeroWidthJoin { left, right, .. } => left.len_chars() + 1 + right.len_chars(),
            Unit::Variation { base, .. } | Unit::Modifier { base, .. } => base.len_chars() + 1,
        }
    }

    /// Append the original code points, in order, to `out`.
    pub fn push_chars(&self, out: &mut String) {
        match self {
            Unit::Bare(cp) => out.push(cp.ch()),
            Unit::ZeroWidthJoin {
                left,
                joiner,
                right,
            } => {
                left.push_chars(out);
                out.push(*joiner);
                right.push_chars(out);
            }
            Unit::Variation {
                base,
                selector: tail,
            }
            | Unit::Modifier {
                base,
                modifier: tail,
            } => {
                base.push_chars(out);
                out.push(tail.ch());
            }
        }
    }

    /// Stream the UTF-8 encoding of the unit's code points, left to right.
    ///
    /// Stops at the first failing write. Callers that need the byte count wrap
    /// `w` in a `CountingWriter` (see `write_to`).
    pub fn encode_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        match self {
            Unit::Bare(cp) => write_char(w, cp.ch()),
            Unit::ZeroWidthJoin {
                left,
                joiner,
                right,
            } => {
                left.encode_to(w)?;
                write_char(w, *joiner)?;
                right.encode_to(w)
            }
            Unit::Variation {
                base,
                selector: tail,
            }
            | Unit::Modifier {
                base,
                modifier: tail,
            } => {
                base.encode_to(w)?;
                write_char(w, tail.ch())
            }
        }
    }

    /// Serialize the unit verbatim. Returns bytes written; on failure the
    /// error carries the bytes that made it out before the failing write.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, WriteError> {
        let mut sink = CountingWriter::new(w);
        let res = self.encode_to(&mut sink);
        sink.finish(res)
    }
}

#[inline]
fn write_char<W: Write + ?Sized>(w: &mut W, c: char) -> io::Result<()> {
    let mut buf = [0u8; 4];
    w.write_all(c.encode_utf8(&mut buf).as_bytes())
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::with_capacity(self.len_chars() * 4);
        self.push_chars(&mut s);
        f.write_str(&s)
    }
}

/// Flatten a unit sequence back into text. Lossless: yields exactly the code
/// points the units were composed from.
pub fn flatten(units: &[Unit]) -> String {
    let mut out = String::new();
    for u in units {
        u.push_chars(&mut out);
    }
    out
}

/// Total display width of a unit sequence.
pub fn total_width(units: &[Unit]) -> usize {
    units.iter().map(Unit::width).sum()
}
