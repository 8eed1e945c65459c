//! glyphline entrypoint.
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use core_config::load_from;
use core_render::{RenderMode, Renderer};
use core_terminal::{CapabilityDetector, EnvDetector, TerminalCapabilities};
use core_text::{Unit, total_width};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "glyphline.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Interactive output with cursor anchors around composite glyphs.
    Print,
    /// Verbatim bytes.
    Write,
    /// One line per unit: kind, width, structure; then unit and table totals.
    Inspect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CapsSource {
    /// Detect from the environment (Windows Terminal markers, locale).
    Detect,
    All,
    None,
}

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "glyphline", version, about = "Compose and render emoji-aware terminal lines")]
struct Args {
    /// Text to render. Lines are read from stdin when omitted.
    text: Vec<String>,
    #[arg(long, value_enum, default_value_t = Mode::Print)]
    mode: Mode,
    #[arg(long, value_enum, default_value_t = CapsSource::Detect)]
    caps: CapsSource,
    /// Optional configuration file path (overrides discovery of `glyphline.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

struct App {
    log_guard: Option<WorkerGuard>,
}

impl App {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    fn run(&mut self, args: Args) -> Result<()> {
        self.configure_logging()?;
        Self::install_panic_hook();
        info!(target: "runtime", mode = ?args.mode, caps = ?args.caps, "startup");

        let caps = resolve_capabilities(&args)?;
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());

        if args.text.is_empty() {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = line.context("reading stdin")?;
                emit_line(args.mode, &caps, &line, &mut out)?;
            }
        } else {
            emit_line(args.mode, &caps, &args.text.join(" "), &mut out)?;
        }
        out.flush().context("flushing stdout")?;
        info!(target: "runtime", "shutdown");
        Ok(())
    }
}

fn resolve_capabilities(args: &Args) -> Result<TerminalCapabilities> {
    let detected = match args.caps {
        CapsSource::Detect => EnvDetector::from_process().detect(),
        CapsSource::All => TerminalCapabilities::all(),
        CapsSource::None => TerminalCapabilities::none(),
    };
    let config = load_from(args.config.clone())?;
    Ok(config.apply(detected))
}

fn emit_line<W: Write>(
    mode: Mode,
    caps: &TerminalCapabilities,
    line: &str,
    out: &mut W,
) -> Result<()> {
    match mode {
        Mode::Print | Mode::Write => {
            let render_mode = if mode == Mode::Print {
                RenderMode::Interactive
            } else {
                RenderMode::Direct
            };
            Renderer::new(caps, render_mode)
                .render_str(line, out)
                .context("rendering line")?;
            writeln!(out)?;
        }
        Mode::Inspect => {
            let renderer = Renderer::new(caps, RenderMode::Direct);
            let units = renderer.composer().compose(line);
            for (idx, unit) in units.iter().enumerate() {
                writeln!(
                    out,
                    "{idx}\t{}\t{}\t{}",
                    unit.kind().as_str(),
                    unit.width(),
                    describe(unit)
                )?;
            }
            // unit width next to the generic table's view of the same text
            writeln!(
                out,
                "total\t{}\t{}\t{}",
                units.len(),
                total_width(&units),
                renderer.composer().oracle().str_width(line)
            )?;
        }
    }
    Ok(())
}

/// Structural dump of a unit, e.g. `zwj(U+1F468, U+1F469)`.
fn describe(unit: &Unit) -> String {
    match unit {
        Unit::Bare(cp) => format!("U+{:04X}", cp.ch() as u32),
        Unit::ZeroWidthJoin {
            left,
            joiner,
            right,
        } => format!(
            "zwj({}, U+{:04X}, {})",
            describe(left),
            *joiner as u32,
            describe(right)
        ),
        Unit::Variation { base, selector } => {
            format!("variation({}, U+{:04X})", describe(base), selector.ch() as u32)
        }
        Unit::Modifier { base, modifier } => {
            format!("modifier({}, U+{:04X})", describe(base), modifier.ch() as u32)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    App::new().run(args)
}
