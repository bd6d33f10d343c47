//! aupcm - Linear PCM Sample Format Conversion
//!
//! Reads and writes raw and WAV PCM streams in twelve integer and float
//! encodings, converting samples to and from any of seven in-memory types.

pub mod audio;
pub mod config;
pub mod error;
pub mod selftest;

pub use audio::{AudioFile, Encoding, FileType, Mode, SampleRepr, StreamInfo};
pub use config::{Args, Command, Config};
pub use error::{AupcmError, MissingField, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Logs to stderr, so that stdout stays free for sample data. `RUST_LOG`
/// takes precedence over `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
