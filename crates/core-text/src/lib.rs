//! Glyph composition for a terminal line editor.
//!
//! Turns a line of text into `Unit`s: the visual units a terminal draws as one
//! cell cluster (ZWJ ligatures, variation sequences, skin tone sequences),
//! each with the column width the terminal's cursor logic will actually use.
//!
//! Modules:
//! * `width` – per code point width oracle.
//! * `codepoint` – classes that trigger composition.
//! * `unit` – the `Unit` sum type, widths, verbatim serialization.
//! * `compose` – the folding pass.
//! * `sink` – byte accounting and `WriteError`.

pub mod codepoint;
pub mod compose;
pub mod sink;
pub mod unit;
pub mod width;

pub use compose::Composer;
pub use sink::{CountingWriter, WriteError};
pub use unit::{CodePoint, Unit, UnitKind, flatten, total_width};
pub use width::WidthOracle;
