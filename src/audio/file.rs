//! Audio file handles
//!
//! An [`AudioFile`] is a stream opened in one direction with one converter
//! set bound to it. All configuration problems surface from
//! [`AudioFile::open`]; after that, reads and writes only fail on I/O.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::audio::dispatch::{bind, Bound, ConverterSet};
use crate::audio::endpoint::Endpoint;
use crate::audio::filetype::FileType;
use crate::audio::header::{self, HeaderIo};
use crate::audio::info::StreamInfo;
use crate::audio::stream::{read_samples, write_samples};
use crate::error::{AupcmError, MissingField, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Read => f.write_str("reading"),
            Mode::Write => f.write_str("writing"),
        }
    }
}

/// An open audio stream.
///
/// The caller's [`StreamInfo`] stays borrowed for the lifetime of the
/// handle: reading fills it from the header, writing advances its sample
/// count. Dropping a write handle without [`close`](AudioFile::close) leaves
/// container length fields unpatched.
#[derive(Debug)]
pub struct AudioFile<'a> {
    path: PathBuf,
    mode: Mode,
    stream: Endpoint,
    info: &'a mut StreamInfo,
    header: Box<dyn HeaderIo>,
    converters: ConverterSet,
    /// Samples left in the container's data region; `None` reads to end of stream.
    remaining: Option<u64>,
}

impl<'a> AudioFile<'a> {
    /// Opens `path` for `mode`.
    ///
    /// For writing, and for reading headerless raw streams, `info` must
    /// describe the samples completely; this is checked before anything is
    /// created or truncated on disk. When reading a file with a header,
    /// `info` is filled from that header.
    pub fn open<P: AsRef<Path>>(path: P, mode: Mode, info: &'a mut StreamInfo) -> Result<AudioFile<'a>> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(AupcmError::missing(MissingField::Path));
        }

        if info.filetype == FileType::Unknown {
            info.filetype = FileType::from_path(path);
        }
        let mut header = header::for_filetype(info.filetype)
            .ok_or_else(|| AupcmError::UnknownFileType(path.to_path_buf()))?;

        let mut converters = None;
        if info.filetype == FileType::Raw || mode == Mode::Write {
            converters = Some(bind(&info.validate()?, mode)?);
        }
        if mode == Mode::Write {
            header.check_writable(info)?;
        }

        let mut stream = Endpoint::open(path, mode)?;

        match mode {
            Mode::Read => header.read_header(&mut stream, info)?,
            Mode::Write => {
                info.reset_counters();
                header.write_header(&mut stream, info)?;
            }
        }

        let converters = match converters {
            Some(set) => set,
            None => bind(&info.validate()?, mode)?,
        };
        let remaining = match mode {
            Mode::Read => header.data_samples(),
            Mode::Write => None,
        };

        log::debug!("Opened {} for {}: {}", path.display(), mode, info);

        Ok(AudioFile {
            path: path.to_path_buf(),
            mode,
            stream,
            info,
            header,
            converters,
            remaining,
        })
    }

    /// Reads up to `out.len()` samples, converting them to `T`.
    ///
    /// Returns fewer samples than requested only at the end of the stream,
    /// or of the data chunk when the container declares one.
    pub fn read<T: Bound>(&mut self, out: &mut [T]) -> Result<usize> {
        let decode = self.converters.decoder::<T>().ok_or(AupcmError::WrongMode(self.mode))?;
        let want = match self.remaining {
            Some(left) => out.len().min(usize::try_from(left).unwrap_or(usize::MAX)),
            None => out.len(),
        };
        let got = read_samples(&mut self.stream, self.converters.format().width(), decode, &mut out[..want])?;
        if let Some(left) = self.remaining.as_mut() {
            *left -= got as u64;
        }
        Ok(got)
    }

    /// Converts and writes all of `input`.
    pub fn write<T: Bound>(&mut self, input: &[T]) -> Result<usize> {
        let encode = self.converters.encoder::<T>().ok_or(AupcmError::WrongMode(self.mode))?;
        let written = write_samples(&mut self.stream, self.converters.format().width(), encode, input)?;
        self.info.samples += written as u64;
        Ok(written)
    }

    pub fn info(&self) -> &StreamInfo {
        &*self.info
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One line summary, e.g. `take.raw: raw audio, mono, 48000 Hz, PCM, ...`.
    pub fn describe(&self) -> String {
        let name = match self.stream.label() {
            Some(label) => label.to_string(),
            None => self.path.display().to_string(),
        };
        format!("{}: {}", name, self.info)
    }

    /// Finishes the container and releases the stream.
    pub fn close(mut self) -> Result<()> {
        if self.mode == Mode::Write {
            self.header.finish_header(&mut self.stream, &*self.info)?;
        }
        self.stream.flush()?;
        log::debug!("Closed {} ({} samples)", self.path.display(), self.info.samples);
        Ok(())
    }
}

macro_rules! typed_entry_points {
    ($($read:ident, $write:ident, $ty:ty;)*) => {
        impl AudioFile<'_> {
            $(
                #[doc = concat!("[`read`](AudioFile::read) into `", stringify!($ty), "` samples.")]
                pub fn $read(&mut self, out: &mut [$ty]) -> Result<usize> {
                    self.read(out)
                }

                #[doc = concat!("[`write`](AudioFile::write) from `", stringify!($ty), "` samples.")]
                pub fn $write(&mut self, input: &[$ty]) -> Result<usize> {
                    self.write(input)
                }
            )*
        }
    };
}

typed_entry_points! {
    read_s8, write_s8, i8;
    read_u8, write_u8, u8;
    read_s16, write_s16, i16;
    read_u16, write_u16, u16;
    read_s32, write_s32, i32;
    read_u32, write_u32, u32;
    read_f32, write_f32, f32;
}
