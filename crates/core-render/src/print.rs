//! Interactive printing of a single unit.
//!
//! Terminals frequently disagree with us (and with themselves) about how many
//! columns a ZWJ ligature or a variation sequence occupies. The cursor anchor
//! makes that disagreement harmless:
//!
//! ```text
//! <width spaces> ESC 7 <width backspaces> <unit bytes> ESC 8
//! ```
//!
//! The spaces push the cursor to where the unit should end, `ESC 7` saves that
//! position, the backspaces return to the start, the glyph is drawn with
//! whatever advance the terminal believes in, and `ESC 8` snaps the cursor back
//! to the saved position.
//!
//! Terminals remember a single saved position, so the bracket is never nested:
//! only the outermost composite is anchored and its operands are always
//! serialized with the plain write path. Bare code points and modifier
//! sequences are written directly.

use core_text::{CountingWriter, Unit, UnitKind, WriteError};
use crossterm::Command;
use crossterm::cursor::{RestorePosition, SavePosition};
use std::io::{self, Write};

const SPACE: u8 = b' ';
const BACKSPACE: u8 = 0x08;

/// Interactive output for units.
pub trait PrintUnit {
    /// Print for display, anchoring the cursor where the terminal may miscount.
    /// Returns bytes written; on failure the error carries the partial count.
    fn print_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, WriteError>;
}

impl PrintUnit for Unit {
    fn print_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, WriteError> {
        let mut sink = CountingWriter::new(w);
        let res = if needs_anchor(self) {
            anchored(&mut sink, self.width(), |w| self.encode_to(w))
        } else {
            self.encode_to(&mut sink)
        };
        sink.finish(res)
    }
}

/// Unit kinds whose on-screen advance the terminal may get wrong.
#[inline]
pub fn needs_anchor(unit: &Unit) -> bool {
    matches!(unit.kind(), UnitKind::ZeroWidthJoin | UnitKind::Variation)
}

/// Run `body` inside a cursor anchor `width` columns wide.
pub fn anchored<W, F>(w: &mut W, width: usize, body: F) -> io::Result<()>
where
    W: Write + ?Sized,
    F: FnOnce(&mut W) -> io::Result<()>,
{
    save_cursor_after(w, width)?;
    body(&mut *w)?;
    write_command(w, RestorePosition)
}

fn save_cursor_after<W: Write + ?Sized>(w: &mut W, width: usize) -> io::Result<()> {
    w.write_all(&vec![SPACE; width])?;
    write_command(w, SavePosition)?;
    w.write_all(&vec![BACKSPACE; width])
}

// Always the ANSI form: the anchor depends on the literal ESC 7 / ESC 8 bytes.
fn write_command<W: Write + ?Sized>(w: &mut W, cmd: impl Command) -> io::Result<()> {
    let mut seq = String::new();
    cmd.write_ansi(&mut seq).map_err(io::Error::other)?;
    w.write_all(seq.as_bytes())
}
