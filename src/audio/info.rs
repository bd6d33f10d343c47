//! Stream description shared between the caller and an open file

use std::fmt;

use crate::audio::filetype::FileType;
use crate::audio::format::{Encoding, EncodingDescriptor};
use crate::error::{AupcmError, MissingField, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamInfo {
    pub filetype: FileType,
    pub sample_rate: u32,
    pub encoding: Encoding,
    pub channels: u16,
    pub frames: u64,
    /// Running sample count, advanced by every successful write.
    pub samples: u64,
    pub seconds: f64,
}

impl StreamInfo {
    pub fn new(sample_rate: u32, channels: u16, encoding: Encoding) -> Self {
        Self {
            sample_rate,
            channels,
            encoding,
            ..Default::default()
        }
    }

    pub fn with_filetype(mut self, filetype: FileType) -> Self {
        self.filetype = filetype;
        self
    }

    /// Checks that every field needed to read or write samples is set and
    /// resolves the encoding.
    pub fn validate(&self) -> Result<EncodingDescriptor> {
        if self.sample_rate == 0 {
            return Err(AupcmError::missing(MissingField::SampleRate));
        }

        let desc = self.encoding.resolve()?;

        if self.channels == 0 {
            return Err(AupcmError::missing(MissingField::Channels));
        }

        Ok(desc)
    }

    /// Fills frame count and duration from a known sample count.
    pub fn set_sample_count(&mut self, samples: u64) {
        self.samples = samples;
        self.frames = if self.channels > 0 { samples / self.channels as u64 } else { 0 };
        self.seconds = if self.sample_rate > 0 {
            self.frames as f64 / self.sample_rate as f64
        } else {
            0.0
        };
    }

    pub fn reset_counters(&mut self) {
        self.frames = 0;
        self.samples = 0;
        self.seconds = 0.0;
    }
}

impl fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        if let Some(name) = self.filetype.name() {
            parts.push(name.to_string());
        }
        match self.channels {
            0 => {}
            1 => parts.push("mono".to_string()),
            2 => parts.push("stereo".to_string()),
            n => parts.push(format!("{} channels", n)),
        }
        if self.sample_rate > 0 {
            parts.push(format!("{} Hz", self.sample_rate));
        }
        if !self.encoding.is_unknown() {
            parts.push(self.encoding.to_string());
        }

        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::format::{ENCODING_FLOAT, ENCTYPE_PCM, ORDER_LE};

    #[test]
    fn test_validation_ladder() {
        let missing = |info: &StreamInfo| match info.validate() {
            Err(AupcmError::Missing(field)) => Some(field),
            Ok(_) => None,
            Err(e) => panic!("unexpected error: {}", e),
        };

        let mut info = StreamInfo::default();
        assert_eq!(missing(&info), Some(MissingField::SampleRate));

        info.sample_rate = 48000;
        assert_eq!(missing(&info), Some(MissingField::CodecType));

        info.encoding = Encoding::from_bits(ENCTYPE_PCM);
        assert_eq!(missing(&info), Some(MissingField::SampleKind));

        info.encoding = info.encoding.with(ENCODING_FLOAT);
        assert_eq!(missing(&info), Some(MissingField::BitWidth));

        info.encoding = info.encoding.with(32);
        assert_eq!(missing(&info), Some(MissingField::ByteOrder));

        info.encoding = info.encoding.with(ORDER_LE);
        assert_eq!(missing(&info), Some(MissingField::Channels));

        info.channels = 1;
        assert_eq!(missing(&info), None);
        assert_eq!(info.encoding, Encoding::PCM_F32LE);
    }

    #[test]
    fn test_sample_count_derivations() {
        let mut info = StreamInfo::new(8000, 2, Encoding::PCM_S16LE);
        info.set_sample_count(16000);
        assert_eq!(info.frames, 8000);
        assert!((info.seconds - 1.0).abs() < f64::EPSILON);

        info.reset_counters();
        assert_eq!(info.samples, 0);
        assert_eq!(info.frames, 0);
    }

    #[test]
    fn test_display() {
        let info = StreamInfo::new(48000, 1, Encoding::PCM_F32LE).with_filetype(FileType::Raw);
        assert_eq!(info.to_string(), "raw audio, mono, 48000 Hz, PCM, float, 32 bits, little-endian");

        let info = StreamInfo::new(44100, 6, Encoding::PCM_U8);
        assert_eq!(info.to_string(), "6 channels, 44100 Hz, PCM, unsigned, 8 bits");
    }
}
