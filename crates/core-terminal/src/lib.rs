//! Terminal capability flags shared by the composition and rendering crates.
//!
//! The flags are resolved once at startup (see `capabilities`) and threaded
//! through constructors; nothing downstream reads the environment.

pub mod capabilities;
pub use capabilities::{
    CapabilityDetector, EnvDetector, EnvSnapshot, SequenceSupport, TerminalCapabilities,
    locale_is_east_asian,
};
