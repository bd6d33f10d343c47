//! Error Types

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::audio::file::Mode;
use crate::audio::format::Encoding;

/// A required piece of stream configuration that was left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Path,
    SampleRate,
    Channels,
    CodecType,
    SampleKind,
    BitWidth,
    ByteOrder,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Path => "path",
            Self::SampleRate => "sample rate",
            Self::Channels => "channels",
            Self::CodecType => "encoding type",
            Self::SampleKind => "sample encoding",
            Self::BitWidth => "bitsize",
            Self::ByteOrder => "byteorder",
        };
        f.write_str(name)
    }
}

/// Main error type
#[derive(Debug, Error)]
pub enum AupcmError {
    #[error("Stream has no {0}")]
    Missing(MissingField),

    #[error("Unsupported encoding {0:#010x} ({0})")]
    UnsupportedFormat(Encoding),

    #[error("Filetype of '{}' cannot be determined", .0.display())]
    UnknownFileType(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Header error: {0}")]
    Header(String),

    #[error("Handle is open for {0}")]
    WrongMode(Mode),

    #[error("Config error: {0}")]
    Config(String),
}

impl AupcmError {
    pub fn missing(field: MissingField) -> Self { Self::Missing(field) }
    pub fn unsupported(encoding: Encoding) -> Self { Self::UnsupportedFormat(encoding) }
    pub fn header<S: Into<String>>(msg: S) -> Self { Self::Header(msg.into()) }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config(msg.into()) }
}

pub type Result<T> = std::result::Result<T, AupcmError>;

impl From<hound::Error> for AupcmError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => Self::Io(e),
            other => Self::header(format!("WAV: {}", other)),
        }
    }
}
