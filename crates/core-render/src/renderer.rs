//! Line renderer: walks a unit sequence and writes terminal output.
//!
//! Per unit the renderer picks between the direct write path and the
//! anchored print path (`print.rs`). Anchoring is used only in interactive
//! mode, only for unit kinds that need it, and only when the terminal claims
//! support for that kind of sequence; otherwise the bytes go out verbatim.
//!
//! Stateless between units: a render pass either completes or stops at the
//! first failed write, reporting the bytes emitted so far.

use crate::print::{PrintUnit, needs_anchor};
use core_terminal::TerminalCapabilities;
use core_text::{Composer, Unit, UnitKind, WriteError};
use std::io::Write;
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Anchor units whose width the terminal may miscount.
    #[default]
    Interactive,
    /// Verbatim bytes only (pipes, files, logs).
    Direct,
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    composer: Composer,
    mode: RenderMode,
}

impl Renderer {
    pub fn new(caps: &TerminalCapabilities, mode: RenderMode) -> Self {
        Self {
            composer: Composer::new(caps),
            mode,
        }
    }

    #[inline]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    #[inline]
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Whether `unit` will be emitted inside a cursor anchor.
    pub fn anchors(&self, unit: &Unit) -> bool {
        if self.mode != RenderMode::Interactive || !needs_anchor(unit) {
            return false;
        }
        let caps = self.composer.capabilities();
        match unit.kind() {
            UnitKind::ZeroWidthJoin => caps.zero_width_join_ok(),
            UnitKind::Variation => caps.variation_sequence_ok(),
            UnitKind::Bare | UnitKind::Modifier => false,
        }
    }

    /// Render `units` in order. Returns total bytes written.
    pub fn render<W: Write + ?Sized>(&self, units: &[Unit], w: &mut W) -> Result<usize, WriteError> {
        let mut total = 0usize;
        for (idx, unit) in units.iter().enumerate() {
            let res = if self.anchors(unit) {
                unit.print_to(w)
            } else {
                unit.write_to(w)
            };
            match res {
                Ok(n) => total += n,
                Err(e) => {
                    let written = total + e.written;
                    warn!(
                        target: "render.unit",
                        unit = idx,
                        kind = unit.kind().as_str(),
                        written,
                        error = %e.source,
                        "unit_write_failed"
                    );
                    return Err(WriteError::new(written, e.source));
                }
            }
        }
        trace!(target: "render.unit", units = units.len(), bytes = total, mode = ?self.mode, "render_pass");
        Ok(total)
    }

    /// Compose `text` and render the resulting units.
    pub fn render_str<W: Write + ?Sized>(&self, text: &str, w: &mut W) -> Result<usize, WriteError> {
        let units = self.composer.compose(text);
        self.render(&units, w)
    }
}
