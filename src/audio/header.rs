//! Container header collaborators
//!
//! Header I/O brackets all sample I/O: `read_header` runs once right after a
//! file is opened for reading, `write_header` once before the first sample
//! is written, and `finish_header` when a written file is closed.

use std::fmt;

use crate::audio::endpoint::Endpoint;
use crate::audio::filetype::FileType;
use crate::audio::info::StreamInfo;
use crate::audio::wav::WavHeader;
use crate::error::Result;

pub trait HeaderIo: fmt::Debug {
    /// Rejects, before any file is created, stream settings the container cannot hold.
    fn check_writable(&self, _info: &StreamInfo) -> Result<()> {
        Ok(())
    }

    /// Fills `info` from the header and leaves `stream` at the first sample.
    fn read_header(&mut self, stream: &mut Endpoint, info: &mut StreamInfo) -> Result<()>;

    /// Number of samples the header says follow it, when the container
    /// stores more than sample data (padding, trailing chunks).
    fn data_samples(&self) -> Option<u64> {
        None
    }

    fn write_header(&mut self, stream: &mut Endpoint, info: &StreamInfo) -> Result<()>;

    /// Patches length fields once all samples are written, where the stream allows it.
    fn finish_header(&mut self, stream: &mut Endpoint, info: &StreamInfo) -> Result<()>;
}

/// Headerless PCM: byte 0 is the first sample.
#[derive(Debug, Default)]
pub struct RawHeader;

impl HeaderIo for RawHeader {
    fn read_header(&mut self, stream: &mut Endpoint, info: &mut StreamInfo) -> Result<()> {
        // The file length bounds the sample count; pipes report nothing.
        if let Some(file) = stream.as_file_mut() {
            let width = info.validate()?.bytes_per_sample() as u64;
            let len = file.metadata()?.len();
            info.set_sample_count(len / width);
        }
        Ok(())
    }

    fn write_header(&mut self, _stream: &mut Endpoint, _info: &StreamInfo) -> Result<()> {
        Ok(())
    }

    fn finish_header(&mut self, _stream: &mut Endpoint, _info: &StreamInfo) -> Result<()> {
        Ok(())
    }
}

/// Header collaborator for `filetype`, or `None` when the type is unknown.
pub fn for_filetype(filetype: FileType) -> Option<Box<dyn HeaderIo>> {
    match filetype {
        FileType::Raw => Some(Box::new(RawHeader)),
        FileType::Wav => Some(Box::new(WavHeader::default())),
        FileType::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::file::Mode;
    use crate::audio::format::Encoding;
    use tempfile::TempDir;

    #[test]
    fn test_raw_header_counts_samples_from_length() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ten.raw");
        std::fs::write(&path, [0u8; 21]).unwrap();

        let mut info = StreamInfo::new(8000, 1, Encoding::PCM_S16BE);
        let mut stream = Endpoint::open(&path, Mode::Read).unwrap();
        RawHeader.read_header(&mut stream, &mut info).unwrap();
        assert_eq!(info.samples, 10);
        assert_eq!(info.frames, 10);
    }

    #[test]
    fn test_lookup() {
        assert!(for_filetype(FileType::Raw).is_some());
        assert!(for_filetype(FileType::Wav).is_some());
        assert!(for_filetype(FileType::Unknown).is_none());
    }
}
