//! Terminal emission for composed units.
//!
//! Two output paths per unit:
//! - write (`Unit::write_to`, core-text): verbatim UTF-8, no cursor control.
//! - print (`PrintUnit::print_to`): the cursor anchor for units whose advance
//!   the terminal may miscount.
//!
//! `Renderer` walks a unit sequence and picks a path per unit from the unit
//! kind, the render mode and the terminal capabilities.
//!
//! Invariants:
//! - Write failures are never retried; the caller gets the error plus the
//!   number of bytes already emitted.
//! - At most one saved cursor position is live at a time. Callers sharing an
//!   output stream across threads must serialize whole render passes.

pub mod print;
pub mod renderer;

pub use print::{PrintUnit, anchored, needs_anchor};
pub use renderer::{RenderMode, Renderer};
