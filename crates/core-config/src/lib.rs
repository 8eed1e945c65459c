//! Configuration loading and parsing.
//!
//! Parses `glyphline.toml` (or an override path provided by the binary). The
//! file lets a user correct capability detection for terminals we guess wrong
//! about:
//!
//! ```toml
//! [capabilities]          # each key optional; absent keeps the detected value
//! zero_width_join = true
//! variation_sequence = false
//! [width]
//! ambiguous = "narrow"    # "auto" | "narrow" | "wide"
//! ```
//!
//! A missing file yields defaults. A file that fails to parse also yields
//! defaults (logged at warn). Unknown fields are ignored.

use anyhow::Result;
use core_terminal::{SequenceSupport, TerminalCapabilities};
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "glyphline.toml";

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityOverrides {
    #[serde(default)]
    pub surrogate_pair: Option<bool>,
    #[serde(default)]
    pub zero_width_join: Option<bool>,
    #[serde(default)]
    pub variation_sequence: Option<bool>,
    #[serde(default)]
    pub modifier_sequence: Option<bool>,
}

impl CapabilityOverrides {
    fn entries(&self) -> [(SequenceSupport, Option<bool>); 4] {
        [
            (SequenceSupport::SURROGATE_PAIR, self.surrogate_pair),
            (SequenceSupport::ZERO_WIDTH_JOIN, self.zero_width_join),
            (SequenceSupport::VARIATION_SEQUENCE, self.variation_sequence),
            (SequenceSupport::MODIFIER_SEQUENCE, self.modifier_sequence),
        ]
    }
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguousWidth {
    /// Keep whatever detection decided.
    #[default]
    Auto,
    Narrow,
    Wide,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WidthConfig {
    #[serde(default)]
    pub ambiguous: AmbiguousWidth,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub capabilities: CapabilityOverrides,
    #[serde(default)]
    pub width: WidthConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("glyphline").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config {
            raw: Some(content),
            file,
        }),
        Err(e) => {
            warn!(target: "config", file = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Apply file overrides on top of detected capabilities.
    pub fn apply(&self, detected: TerminalCapabilities) -> TerminalCapabilities {
        let mut caps = detected;
        for (flag, value) in self.file.capabilities.entries() {
            if let Some(on) = value {
                caps.sequences.set(flag, on);
            }
        }
        match self.file.width.ambiguous {
            AmbiguousWidth::Auto => {}
            AmbiguousWidth::Narrow => caps.ambiguous_wide = false,
            AmbiguousWidth::Wide => caps.ambiguous_wide = true,
        }
        if caps != detected {
            info!(
                target: "config",
                detected = ?detected.sequences,
                effective = ?caps.sequences,
                ambiguous_wide = caps.ambiguous_wide,
                "capability_overrides_applied"
            );
        }
        caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn load_str(content: &str) -> Config {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), content).unwrap();
        load_from(Some(tmp.path().to_path_buf())).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.file.capabilities, CapabilityOverrides::default());
        assert_eq!(cfg.file.width.ambiguous, AmbiguousWidth::Auto);
    }

    #[test]
    fn defaults_leave_detection_untouched() {
        let cfg = Config::default();
        let detected = TerminalCapabilities::new(SequenceSupport::ZERO_WIDTH_JOIN, true);
        assert_eq!(cfg.apply(detected), detected);
    }

    #[test]
    fn parses_capability_overrides() {
        let cfg = load_str("[capabilities]\nzero_width_join = true\nmodifier_sequence = false\n");
        assert!(cfg.raw.is_some());
        assert_eq!(cfg.file.capabilities.zero_width_join, Some(true));
        assert_eq!(cfg.file.capabilities.modifier_sequence, Some(false));
        assert_eq!(cfg.file.capabilities.variation_sequence, None);

        let caps = cfg.apply(TerminalCapabilities::new(
            SequenceSupport::MODIFIER_SEQUENCE | SequenceSupport::VARIATION_SEQUENCE,
            false,
        ));
        assert!(caps.zero_width_join_ok());
        assert!(!caps.modifier_sequence_ok());
        assert!(caps.variation_sequence_ok());
        assert!(!caps.surrogate_pair_ok());
    }

    #[test]
    fn ambiguous_width_override() {
        let wide = load_str("[width]\nambiguous = \"wide\"\n");
        assert!(wide.apply(TerminalCapabilities::all()).ambiguous_wide);
        let narrow = load_str("[width]\nambiguous = \"narrow\"\n");
        let detected = TerminalCapabilities::new(SequenceSupport::empty(), true);
        assert!(!narrow.apply(detected).ambiguous_wide);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let cfg = load_str("[capabilities]\nsurrogate_pair = true\nsparkles = 3\n[other]\nx = 1\n");
        assert_eq!(cfg.file.capabilities.surrogate_pair, Some(true));
    }

    #[test]
    fn parse_error_falls_back_to_defaults_and_warns() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[width]\nambiguous = \"sideways\"\n").unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || {
            load_from(Some(tmp.path().to_path_buf())).unwrap()
        });

        assert!(cfg.raw.is_none());
        assert_eq!(cfg.file.width.ambiguous, AmbiguousWidth::Auto);
        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_failed"));
    }

    #[test]
    fn override_logging_uses_config_target() {
        let cfg = load_str("[capabilities]\nvariation_sequence = true\n");
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let caps = with_default(subscriber, || cfg.apply(TerminalCapabilities::none()));

        assert!(caps.variation_sequence_ok());
        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("capability_overrides_applied"));
    }
}
