//! Terminal capability detection.
//!
//! Records which composite emoji sequences the connected terminal draws
//! correctly, plus how it interprets East Asian ambiguous-width characters.
//! Everything in `core-text` / `core-render` branches on this value; it is
//! built once at startup and passed down explicitly.
//!
//! Detection policy:
//! * Windows Terminal (session + profile markers present, not hosted inside
//!   VS Code) supports every sequence kind and renders ambiguous characters
//!   narrow.
//! * Any other terminal gets no sequence support. Ambiguous width follows the
//!   locale (`LC_ALL`, `LC_CTYPE`, `LANG`; first non-empty wins).
//!
//! Detection never touches the process environment directly: callers hand in
//! an `EnvSnapshot`, so tests can exercise every branch without mutating
//! global state.

use bitflags::bitflags;
use tracing::debug;

bitflags! {
    /// Composite sequence kinds the terminal renders as a single glyph.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SequenceSupport: u8 {
        const SURROGATE_PAIR     = 0b0000_0001; // code points above U+FFFF
        const ZERO_WIDTH_JOIN    = 0b0000_0010;
        const VARIATION_SEQUENCE = 0b0000_0100;
        const MODIFIER_SEQUENCE  = 0b0000_1000; // skin tones
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalCapabilities {
    pub sequences: SequenceSupport,
    /// `true` when East Asian ambiguous-width characters occupy two columns.
    pub ambiguous_wide: bool,
}

impl TerminalCapabilities {
    pub const fn new(sequences: SequenceSupport, ambiguous_wide: bool) -> Self {
        Self {
            sequences,
            ambiguous_wide,
        }
    }

    /// Every sequence kind enabled, ambiguous characters narrow.
    pub const fn all() -> Self {
        Self::new(SequenceSupport::all(), false)
    }

    /// No sequence support, ambiguous characters narrow.
    pub const fn none() -> Self {
        Self::new(SequenceSupport::empty(), false)
    }

    #[inline]
    pub fn surrogate_pair_ok(&self) -> bool {
        self.sequences.contains(SequenceSupport::SURROGATE_PAIR)
    }
    #[inline]
    pub fn zero_width_join_ok(&self) -> bool {
        self.sequences.contains(SequenceSupport::ZERO_WIDTH_JOIN)
    }
    #[inline]
    pub fn variation_sequence_ok(&self) -> bool {
        self.sequences.contains(SequenceSupport::VARIATION_SEQUENCE)
    }
    #[inline]
    pub fn modifier_sequence_ok(&self) -> bool {
        self.sequences.contains(SequenceSupport::MODIFIER_SEQUENCE)
    }
}

/// Source of terminal capabilities. The binary uses `EnvDetector`; tests may
/// plug in anything returning a fixed value.
pub trait CapabilityDetector {
    fn detect(&self) -> TerminalCapabilities;
}

impl CapabilityDetector for TerminalCapabilities {
    fn detect(&self) -> TerminalCapabilities {
        *self
    }
}

/// The handful of environment variables detection looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    pub vscode_pid: Option<String>,
    pub wt_session: Option<String>,
    pub wt_profile_id: Option<String>,
    pub lc_all: Option<String>,
    pub lc_ctype: Option<String>,
    pub lang: Option<String>,
}

impl EnvSnapshot {
    /// Capture the relevant variables from the running process.
    pub fn from_process() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            vscode_pid: var("VSCODE_PID"),
            wt_session: var("WT_SESSION"),
            wt_profile_id: var("WT_PROFILE_ID"),
            lc_all: var("LC_ALL"),
            lc_ctype: var("LC_CTYPE"),
            lang: var("LANG"),
        }
    }

    pub fn is_vscode(&self) -> bool {
        non_empty(&self.vscode_pid).is_some()
    }

    pub fn is_windows_terminal(&self) -> bool {
        non_empty(&self.wt_session).is_some()
            && non_empty(&self.wt_profile_id).is_some()
            && !self.is_vscode()
    }

    /// Effective locale string, honoring the usual POSIX precedence.
    pub fn locale(&self) -> Option<&str> {
        non_empty(&self.lc_all)
            .or_else(|| non_empty(&self.lc_ctype))
            .or_else(|| non_empty(&self.lang))
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default)]
pub struct EnvDetector {
    env: EnvSnapshot,
}

impl EnvDetector {
    pub fn new(env: EnvSnapshot) -> Self {
        Self { env }
    }

    pub fn from_process() -> Self {
        Self::new(EnvSnapshot::from_process())
    }
}

impl CapabilityDetector for EnvDetector {
    fn detect(&self) -> TerminalCapabilities {
        let windows_terminal = self.env.is_windows_terminal();
        let caps = if windows_terminal {
            TerminalCapabilities::all()
        } else {
            TerminalCapabilities::new(
                SequenceSupport::empty(),
                self.env.locale().is_some_and(locale_is_east_asian),
            )
        };
        debug!(
            target: "terminal.caps",
            windows_terminal,
            vscode = self.env.is_vscode(),
            sequences = ?caps.sequences,
            ambiguous_wide = caps.ambiguous_wide,
            "capabilities_detected"
        );
        caps
    }
}

// Multibyte legacy encodings whose terminals draw ambiguous characters wide.
const CJK_CHARSETS: &[&str] = &[
    "eucjp", "euc-jp", "euckr", "euc-kr", "euccn", "euc-cn", "euctw", "euc-tw", "big5",
    "big5hkscs", "gbk", "gb2312", "gb18030", "sjis", "shift_jis", "cp932", "cp936", "cp949",
    "cp950",
];

/// Decide whether a POSIX locale name (`lang[_TERRITORY][.charset][@modifier]`)
/// implies wide rendering of ambiguous-width characters.
pub fn locale_is_east_asian(locale: &str) -> bool {
    if locale == "C" || locale == "POSIX" || locale.starts_with("C.") || locale.starts_with("C-")
    {
        return false;
    }
    let (head, modifier) = match locale.split_once('@') {
        Some((h, m)) => (h, Some(m.to_ascii_lowercase())),
        None => (locale, None),
    };
    if modifier.as_deref() == Some("cjk_narrow") {
        return false;
    }
    let Some((language, charset)) = head.split_once('.') else {
        return false;
    };
    let charset = charset.to_ascii_lowercase();
    if charset == "utf-8" || charset == "utf8" {
        let lang = language.split('_').next().unwrap_or_default();
        return matches!(lang, "ja" | "ko" | "zh");
    }
    CJK_CHARSETS.contains(&charset.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wt_env() -> EnvSnapshot {
        EnvSnapshot {
            wt_session: Some("abc".into()),
            wt_profile_id: Some("{61c54bbd}".into()),
            ..EnvSnapshot::default()
        }
    }

    #[test]
    fn windows_terminal_enables_everything() {
        let caps = EnvDetector::new(wt_env()).detect();
        assert!(caps.surrogate_pair_ok());
        assert!(caps.zero_width_join_ok());
        assert!(caps.variation_sequence_ok());
        assert!(caps.modifier_sequence_ok());
        assert!(!caps.ambiguous_wide);
    }

    #[test]
    fn windows_terminal_forces_narrow_even_with_cjk_locale() {
        let env = EnvSnapshot {
            lang: Some("ja_JP.UTF-8".into()),
            ..wt_env()
        };
        assert!(!EnvDetector::new(env).detect().ambiguous_wide);
    }

    #[test]
    fn vscode_inside_windows_terminal_is_not_windows_terminal() {
        let env = EnvSnapshot {
            vscode_pid: Some("1234".into()),
            ..wt_env()
        };
        let caps = EnvDetector::new(env).detect();
        assert_eq!(caps.sequences, SequenceSupport::empty());
    }

    #[test]
    fn session_without_profile_is_not_windows_terminal() {
        let env = EnvSnapshot {
            wt_session: Some("abc".into()),
            ..EnvSnapshot::default()
        };
        assert_eq!(EnvDetector::new(env).detect(), TerminalCapabilities::none());
    }

    #[test]
    fn empty_markers_count_as_absent() {
        let env = EnvSnapshot {
            wt_session: Some(String::new()),
            wt_profile_id: Some("x".into()),
            ..EnvSnapshot::default()
        };
        assert!(!env.is_windows_terminal());
    }

    #[test]
    fn locale_precedence() {
        let env = EnvSnapshot {
            lc_all: Some(String::new()),
            lc_ctype: Some("ko_KR.UTF-8".into()),
            lang: Some("en_US.UTF-8".into()),
            ..EnvSnapshot::default()
        };
        assert_eq!(env.locale(), Some("ko_KR.UTF-8"));
        assert!(EnvDetector::new(env).detect().ambiguous_wide);
    }

    #[test]
    fn locale_classification() {
        assert!(locale_is_east_asian("ja_JP.UTF-8"));
        assert!(locale_is_east_asian("zh_CN.utf8"));
        assert!(locale_is_east_asian("ja_JP.eucJP"));
        assert!(locale_is_east_asian("en_US.GB18030"));
        assert!(!locale_is_east_asian("ja_JP.UTF-8@cjk_narrow"));
        assert!(!locale_is_east_asian("en_US.UTF-8"));
        assert!(!locale_is_east_asian("C"));
        assert!(!locale_is_east_asian("C.UTF-8"));
        assert!(!locale_is_east_asian("POSIX"));
        assert!(!locale_is_east_asian("ja_JP"));
    }

    #[test]
    fn fixed_capabilities_detect_themselves() {
        let caps = TerminalCapabilities::new(SequenceSupport::ZERO_WIDTH_JOIN, true);
        assert_eq!(caps.detect(), caps);
    }
}
