//! WAV header collaborator
//!
//! The RIFF/WAVE header itself is produced and parsed by `hound`; samples are
//! streamed by the PCM converters directly after it. WAV stores 8-bit samples
//! unsigned and wider samples little-endian, so only those encodings can be
//! written.

use std::io::{Seek, SeekFrom, Write};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::audio::endpoint::Endpoint;
use crate::audio::format::{
    ByteOrder, Encoding, SampleKind, BITSIZE_MASK, ENCODING_FLOAT, ENCODING_SIGNED, ENCODING_UNSIGNED,
    ENCTYPE_PCM, ORDER_LE, ORDER_NONE,
};
use crate::audio::header::HeaderIo;
use crate::audio::info::StreamInfo;
use crate::error::{AupcmError, Result};

/// Offset of the RIFF chunk size field.
const RIFF_SIZE_OFFSET: u64 = 4;

#[derive(Debug, Default)]
pub struct WavHeader {
    /// Byte offset of the first sample, known once the header is written.
    data_offset: Option<u64>,
    /// Length of the data chunk in samples, known once the header is read.
    data_samples: Option<u64>,
}

impl WavHeader {
    pub fn data_offset(&self) -> Option<u64> {
        self.data_offset
    }
}

/// Maps a stream description onto the `hound` spec that stores it.
pub fn wav_spec(info: &StreamInfo) -> Result<WavSpec> {
    let desc = info.validate()?;

    let sample_format = match (desc.kind, desc.order, desc.bits) {
        (SampleKind::Unsigned, ByteOrder::None, 8) => SampleFormat::Int,
        (SampleKind::Signed, ByteOrder::Little, 16 | 32) => SampleFormat::Int,
        (SampleKind::Float, ByteOrder::Little, 32) => SampleFormat::Float,
        _ => return Err(AupcmError::unsupported(info.encoding)),
    };

    Ok(WavSpec {
        channels: info.channels,
        sample_rate: info.sample_rate,
        bits_per_sample: desc.bits as u16,
        sample_format,
    })
}

/// The encoding WAV implies for a header's sample format and width.
pub fn encoding_from_spec(spec: &WavSpec) -> Encoding {
    let bits = u32::from(spec.bits_per_sample) & BITSIZE_MASK;
    let raw = match (spec.sample_format, bits) {
        (SampleFormat::Float, _) => ENCTYPE_PCM | ENCODING_FLOAT | ORDER_LE | bits,
        (SampleFormat::Int, 8) => ENCTYPE_PCM | ENCODING_UNSIGNED | ORDER_NONE | 8,
        (SampleFormat::Int, _) => ENCTYPE_PCM | ENCODING_SIGNED | ORDER_LE | bits,
    };
    Encoding::from_bits(raw)
}

fn seekable(stream: &mut Endpoint) -> Result<&mut std::fs::File> {
    stream
        .as_file_mut()
        .ok_or_else(|| AupcmError::header("WAV needs a seekable file, not a pipe"))
}

impl HeaderIo for WavHeader {
    fn check_writable(&self, info: &StreamInfo) -> Result<()> {
        wav_spec(info).map(|_| ())
    }

    fn read_header(&mut self, stream: &mut Endpoint, info: &mut StreamInfo) -> Result<()> {
        let reader = WavReader::new(&mut *stream)?;
        let spec = reader.spec();
        let samples = reader.len() as u64;
        drop(reader);

        info.sample_rate = spec.sample_rate;
        info.channels = spec.channels;
        info.encoding = encoding_from_spec(&spec);
        info.set_sample_count(samples);
        self.data_samples = Some(samples);

        if let Some(file) = stream.as_file_mut() {
            self.data_offset = Some(file.stream_position()?);
        }

        log::debug!(
            "WAV header: {} Hz, {} channels, {} bits {:?}, {} samples",
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
            spec.sample_format,
            samples
        );
        Ok(())
    }

    fn data_samples(&self) -> Option<u64> {
        self.data_samples
    }

    fn write_header(&mut self, stream: &mut Endpoint, info: &StreamInfo) -> Result<()> {
        let spec = wav_spec(info)?;
        let file = seekable(stream)?;

        file.seek(SeekFrom::Start(0))?;
        WavWriter::new(&mut *file, spec)?.finalize()?;
        let offset = file.seek(SeekFrom::End(0))?;

        log::debug!("WAV header written, samples start at byte {}", offset);
        self.data_offset = Some(offset);
        Ok(())
    }

    fn finish_header(&mut self, stream: &mut Endpoint, info: &StreamInfo) -> Result<()> {
        let Some(offset) = self.data_offset else {
            return Ok(());
        };
        let file = seekable(stream)?;

        let mut end = file.seek(SeekFrom::End(0))?;
        let data_bytes = end - offset;
        let expected = info.samples * info.validate()?.bytes_per_sample() as u64;
        if data_bytes != expected {
            log::warn!("WAV data is {} bytes, {} samples were written ({} bytes)", data_bytes, info.samples, expected);
        }

        // Chunks are word aligned.
        if data_bytes % 2 == 1 {
            file.write_all(&[0])?;
            end += 1;
        }

        let riff_size = u32::try_from(end - 8)
            .map_err(|_| AupcmError::header("WAV file exceeds 4 GiB"))?;
        let data_size = u32::try_from(data_bytes)
            .map_err(|_| AupcmError::header("WAV data exceeds 4 GiB"))?;

        file.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
        file.write_all(&riff_size.to_le_bytes())?;
        file.seek(SeekFrom::Start(offset - 4))?;
        file.write_all(&data_size.to_le_bytes())?;
        file.seek(SeekFrom::End(0))?;

        log::debug!("WAV lengths patched: riff {} bytes, data {} bytes", riff_size, data_size);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::file::Mode;
    use crate::audio::filetype::FileType;
    use tempfile::TempDir;

    fn info(encoding: Encoding) -> StreamInfo {
        StreamInfo::new(16000, 1, encoding).with_filetype(FileType::Wav)
    }

    #[test]
    fn test_wav_compatible_encodings() {
        assert!(wav_spec(&info(Encoding::PCM_U8)).is_ok());
        assert!(wav_spec(&info(Encoding::PCM_S16LE)).is_ok());
        assert!(wav_spec(&info(Encoding::PCM_S32LE)).is_ok());
        assert_eq!(wav_spec(&info(Encoding::PCM_F32LE)).unwrap().sample_format, SampleFormat::Float);

        for encoding in [Encoding::PCM_S8, Encoding::PCM_S16BE, Encoding::PCM_U16LE, Encoding::PCM_F32BE] {
            assert!(matches!(wav_spec(&info(encoding)), Err(AupcmError::UnsupportedFormat(e)) if e == encoding));
        }
    }

    #[test]
    fn test_encoding_from_spec() {
        let spec = |bits, sample_format| WavSpec { channels: 2, sample_rate: 44100, bits_per_sample: bits, sample_format };
        assert_eq!(encoding_from_spec(&spec(8, SampleFormat::Int)), Encoding::PCM_U8);
        assert_eq!(encoding_from_spec(&spec(16, SampleFormat::Int)), Encoding::PCM_S16LE);
        assert_eq!(encoding_from_spec(&spec(32, SampleFormat::Float)), Encoding::PCM_F32LE);
        assert_eq!(encoding_from_spec(&spec(24, SampleFormat::Int)).bit_width(), 24);
    }

    #[test]
    fn test_header_round_trip_through_hound() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");

        let mut written = info(Encoding::PCM_S16LE);
        let mut header = WavHeader::default();
        let mut stream = Endpoint::open(&path, Mode::Write).unwrap();
        header.write_header(&mut stream, &written).unwrap();
        let offset = header.data_offset().unwrap();

        let samples: [i16; 3] = [1, -2, 300];
        for s in samples {
            stream.write_all(&s.to_le_bytes()).unwrap();
        }
        written.samples = samples.len() as u64;
        header.finish_header(&mut stream, &written).unwrap();
        drop(stream);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.len(), 3);
        let back: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(back, samples);

        let mut read = StreamInfo::default();
        let mut header = WavHeader::default();
        let mut stream = Endpoint::open(&path, Mode::Read).unwrap();
        header.read_header(&mut stream, &mut read).unwrap();
        assert_eq!(read.encoding, Encoding::PCM_S16LE);
        assert_eq!(read.sample_rate, 16000);
        assert_eq!(read.channels, 1);
        assert_eq!(read.samples, 3);
        assert_eq!(header.data_offset(), Some(offset));
        assert_eq!(header.data_samples(), Some(3));
    }

    #[test]
    fn test_odd_data_is_padded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("odd.wav");

        let mut written = info(Encoding::PCM_U8);
        let mut header = WavHeader::default();
        let mut stream = Endpoint::open(&path, Mode::Write).unwrap();
        header.write_header(&mut stream, &written).unwrap();
        stream.write_all(&[0x80, 0xff, 0x00]).unwrap();
        written.samples = 3;
        header.finish_header(&mut stream, &written).unwrap();
        drop(stream);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 3);
        let back: Vec<i8> = reader.into_samples::<i8>().map(|s| s.unwrap()).collect();
        assert_eq!(back, [0, 127, -128]);
    }

    #[test]
    fn test_not_a_wav_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junk.wav");
        std::fs::write(&path, b"definitely not a riff header").unwrap();

        let mut stream = Endpoint::open(&path, Mode::Read).unwrap();
        let mut info = StreamInfo::default();
        let err = WavHeader::default().read_header(&mut stream, &mut info).unwrap_err();
        assert!(matches!(err, AupcmError::Header(_)));
    }
}
