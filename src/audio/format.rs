//! Encoding descriptors
//!
//! An encoding is completely described in four bytes: the encoding type,
//! the sample encoding, the byte order and the bit width, e.g. PCM, signed
//! integers, little endian, 16 bits. The first three are constants, the
//! bit width is just a number.

use std::fmt;
use std::str::FromStr;

use crate::error::{AupcmError, MissingField, Result};

pub const ENCTYPE_MASK: u32 = 0xff00_0000;
pub const ENCODING_MASK: u32 = 0x00ff_0000;
pub const ORDER_MASK: u32 = 0x0000_ff00;
pub const BITSIZE_MASK: u32 = 0x0000_00ff;

pub const ENCTYPE_PCM: u32 = 0x0100_0000;

pub const ENCODING_SIGNED: u32 = 0x0001_0000;
pub const ENCODING_UNSIGNED: u32 = 0x0002_0000;
pub const ENCODING_FLOAT: u32 = 0x0003_0000;

pub const ORDER_NONE: u32 = 0x0000_0000;
pub const ORDER_LE: u32 = 0x0000_0100;
pub const ORDER_BE: u32 = 0x0000_0200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecType {
    Pcm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleKind {
    Signed,
    Unsigned,
    Float,
}

impl SampleKind {
    pub fn name(&self) -> &'static str {
        match self {
            SampleKind::Signed => "signed",
            SampleKind::Unsigned => "unsigned",
            SampleKind::Float => "float",
        }
    }
}

/// Byte order of multi-byte samples on disk. `None` is only valid for 8-bit samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    None,
    Little,
    Big,
}

impl ByteOrder {
    pub fn name(&self) -> Option<&'static str> {
        match self {
            ByteOrder::None => None,
            ByteOrder::Little => Some("little-endian"),
            ByteOrder::Big => Some("big-endian"),
        }
    }
}

/// Raw encoding bitmask, as stored in [`StreamInfo`](crate::audio::StreamInfo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Encoding(u32);

impl Encoding {
    pub const UNKNOWN: Encoding = Encoding(0);

    pub const PCM_S8: Encoding = Encoding(ENCTYPE_PCM | ENCODING_SIGNED | ORDER_NONE | 8);
    pub const PCM_U8: Encoding = Encoding(ENCTYPE_PCM | ENCODING_UNSIGNED | ORDER_NONE | 8);
    pub const PCM_S16LE: Encoding = Encoding(ENCTYPE_PCM | ENCODING_SIGNED | ORDER_LE | 16);
    pub const PCM_S16BE: Encoding = Encoding(ENCTYPE_PCM | ENCODING_SIGNED | ORDER_BE | 16);
    pub const PCM_U16LE: Encoding = Encoding(ENCTYPE_PCM | ENCODING_UNSIGNED | ORDER_LE | 16);
    pub const PCM_U16BE: Encoding = Encoding(ENCTYPE_PCM | ENCODING_UNSIGNED | ORDER_BE | 16);
    pub const PCM_S32LE: Encoding = Encoding(ENCTYPE_PCM | ENCODING_SIGNED | ORDER_LE | 32);
    pub const PCM_S32BE: Encoding = Encoding(ENCTYPE_PCM | ENCODING_SIGNED | ORDER_BE | 32);
    pub const PCM_U32LE: Encoding = Encoding(ENCTYPE_PCM | ENCODING_UNSIGNED | ORDER_LE | 32);
    pub const PCM_U32BE: Encoding = Encoding(ENCTYPE_PCM | ENCODING_UNSIGNED | ORDER_BE | 32);
    pub const PCM_F32LE: Encoding = Encoding(ENCTYPE_PCM | ENCODING_FLOAT | ORDER_LE | 32);
    pub const PCM_F32BE: Encoding = Encoding(ENCTYPE_PCM | ENCODING_FLOAT | ORDER_BE | 32);

    /// Every encoding the PCM converters accept, with its short name.
    pub const SUPPORTED: [(Encoding, &'static str); 12] = [
        (Encoding::PCM_S8, "pcm-s08"),
        (Encoding::PCM_U8, "pcm-u08"),
        (Encoding::PCM_S16LE, "pcm-s16le"),
        (Encoding::PCM_S16BE, "pcm-s16be"),
        (Encoding::PCM_U16LE, "pcm-u16le"),
        (Encoding::PCM_U16BE, "pcm-u16be"),
        (Encoding::PCM_S32LE, "pcm-s32le"),
        (Encoding::PCM_S32BE, "pcm-s32be"),
        (Encoding::PCM_U32LE, "pcm-u32le"),
        (Encoding::PCM_U32BE, "pcm-u32be"),
        (Encoding::PCM_F32LE, "pcm-f32le"),
        (Encoding::PCM_F32BE, "pcm-f32be"),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Encoding(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn codec_bits(&self) -> u32 {
        self.0 & ENCTYPE_MASK
    }

    pub const fn kind_bits(&self) -> u32 {
        self.0 & ENCODING_MASK
    }

    pub const fn order_bits(&self) -> u32 {
        self.0 & ORDER_MASK
    }

    pub const fn bit_width(&self) -> u8 {
        (self.0 & BITSIZE_MASK) as u8
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == 0
    }

    /// Returns a copy with the given field bits or-ed in.
    pub const fn with(self, bits: u32) -> Self {
        Encoding(self.0 | bits)
    }

    pub fn name(&self) -> Option<&'static str> {
        Self::SUPPORTED
            .iter()
            .find(|(encoding, _)| encoding == self)
            .map(|(_, name)| *name)
    }

    pub fn resolve(&self) -> Result<EncodingDescriptor> {
        resolve(*self)
    }
}

impl fmt::LowerHex for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(4);

        if self.codec_bits() == ENCTYPE_PCM {
            parts.push("PCM".to_string());
        }
        match self.kind_bits() {
            ENCODING_SIGNED => parts.push("signed".to_string()),
            ENCODING_UNSIGNED => parts.push("unsigned".to_string()),
            ENCODING_FLOAT => parts.push("float".to_string()),
            _ => {}
        }
        parts.push(format!("{} bits", self.bit_width()));
        match self.order_bits() {
            ORDER_NONE => {}
            ORDER_LE => parts.push("little-endian".to_string()),
            ORDER_BE => parts.push("big-endian".to_string()),
            _ => parts.push("unknown byteorder".to_string()),
        }

        write!(f, "{}", parts.join(", "))
    }
}

impl FromStr for Encoding {
    type Err = AupcmError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = match wanted.as_str() {
            "pcm-s8" => "pcm-s08",
            "pcm-u8" => "pcm-u08",
            other => other,
        };

        Self::SUPPORTED
            .iter()
            .find(|(_, name)| *name == wanted)
            .map(|(encoding, _)| *encoding)
            .ok_or_else(|| AupcmError::config(format!("Unknown encoding name: {}", s)))
    }
}

/// Resolved, typed view of an [`Encoding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodingDescriptor {
    pub codec: CodecType,
    pub kind: SampleKind,
    pub order: ByteOrder,
    pub bits: u8,
}

impl EncodingDescriptor {
    pub fn encoding(&self) -> Encoding {
        let codec = match self.codec {
            CodecType::Pcm => ENCTYPE_PCM,
        };
        let kind = match self.kind {
            SampleKind::Signed => ENCODING_SIGNED,
            SampleKind::Unsigned => ENCODING_UNSIGNED,
            SampleKind::Float => ENCODING_FLOAT,
        };
        let order = match self.order {
            ByteOrder::None => ORDER_NONE,
            ByteOrder::Little => ORDER_LE,
            ByteOrder::Big => ORDER_BE,
        };
        Encoding(codec | kind | order | self.bits as u32)
    }

    pub fn bytes_per_sample(&self) -> usize {
        (self.bits as usize).div_ceil(8)
    }
}

/// Splits a raw bitmask into its fields.
///
/// Empty fields are reported as [`AupcmError::Missing`], checked in the order
/// encoding type, sample encoding, bitsize, byteorder. A byteorder is only
/// required for samples wider than 8 bits. Fields holding a value that is not
/// one of the known constants are reported as [`AupcmError::UnsupportedFormat`].
pub fn resolve(raw: Encoding) -> Result<EncodingDescriptor> {
    let codec = match raw.codec_bits() {
        0 => return Err(AupcmError::missing(MissingField::CodecType)),
        ENCTYPE_PCM => CodecType::Pcm,
        _ => return Err(AupcmError::unsupported(raw)),
    };

    let kind = match raw.kind_bits() {
        0 => return Err(AupcmError::missing(MissingField::SampleKind)),
        ENCODING_SIGNED => SampleKind::Signed,
        ENCODING_UNSIGNED => SampleKind::Unsigned,
        ENCODING_FLOAT => SampleKind::Float,
        _ => return Err(AupcmError::unsupported(raw)),
    };

    let bits = raw.bit_width();
    if bits == 0 {
        return Err(AupcmError::missing(MissingField::BitWidth));
    }

    let order = match raw.order_bits() {
        ORDER_NONE if bits > 8 => return Err(AupcmError::missing(MissingField::ByteOrder)),
        ORDER_NONE => ByteOrder::None,
        ORDER_LE => ByteOrder::Little,
        ORDER_BE => ByteOrder::Big,
        _ => return Err(AupcmError::unsupported(raw)),
    };

    Ok(EncodingDescriptor { codec, kind, order, bits })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fields() {
        let desc = resolve(Encoding::PCM_U16BE).unwrap();
        assert_eq!(desc.codec, CodecType::Pcm);
        assert_eq!(desc.kind, SampleKind::Unsigned);
        assert_eq!(desc.order, ByteOrder::Big);
        assert_eq!(desc.bits, 16);
        assert_eq!(desc.bytes_per_sample(), 2);
        assert_eq!(desc.encoding(), Encoding::PCM_U16BE);
    }

    #[test]
    fn test_resolve_reports_missing_field() {
        let missing = |raw: u32| match resolve(Encoding::from_bits(raw)) {
            Err(AupcmError::Missing(field)) => field,
            other => panic!("expected missing field, got {:?}", other),
        };

        assert_eq!(missing(0), MissingField::CodecType);
        assert_eq!(missing(ENCTYPE_PCM), MissingField::SampleKind);
        assert_eq!(missing(ENCTYPE_PCM | ENCODING_FLOAT | ORDER_LE), MissingField::BitWidth);
        assert_eq!(missing(ENCTYPE_PCM | ENCODING_FLOAT | 32), MissingField::ByteOrder);
    }

    #[test]
    fn test_byteorder_optional_for_8_bits() {
        let desc = resolve(Encoding::PCM_S8).unwrap();
        assert_eq!(desc.order, ByteOrder::None);
        assert_eq!(desc.bytes_per_sample(), 1);
    }

    #[test]
    fn test_unknown_field_values_are_unsupported() {
        let raw = Encoding::from_bits(0x0200_0000 | ENCODING_SIGNED | ORDER_LE | 16);
        assert!(matches!(resolve(raw), Err(AupcmError::UnsupportedFormat(e)) if e == raw));

        let raw = Encoding::from_bits(ENCTYPE_PCM | 0x0007_0000 | ORDER_LE | 16);
        assert!(matches!(resolve(raw), Err(AupcmError::UnsupportedFormat(_))));

        let raw = Encoding::from_bits(ENCTYPE_PCM | ENCODING_SIGNED | 0x0000_0300 | 16);
        assert!(matches!(resolve(raw), Err(AupcmError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_unusual_width_still_resolves() {
        // Width validity is decided when converters are bound.
        let desc = resolve(Encoding::from_bits(ENCTYPE_PCM | ENCODING_SIGNED | ORDER_LE | 24)).unwrap();
        assert_eq!(desc.bits, 24);
        assert_eq!(desc.bytes_per_sample(), 3);
    }

    #[test]
    fn test_names_round_trip() {
        for (encoding, name) in Encoding::SUPPORTED {
            assert_eq!(encoding.name(), Some(name));
            assert_eq!(name.parse::<Encoding>().unwrap(), encoding);
        }
        assert_eq!("PCM-S8".parse::<Encoding>().unwrap(), Encoding::PCM_S8);
        assert!("pcm-s24le".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Encoding::PCM_S16LE.to_string(), "PCM, signed, 16 bits, little-endian");
        assert_eq!(Encoding::PCM_U8.to_string(), "PCM, unsigned, 8 bits");
        assert_eq!(Encoding::PCM_F32BE.to_string(), "PCM, float, 32 bits, big-endian");
        assert_eq!(format!("{:#010x}", Encoding::PCM_F32LE), "0x01030120");
    }
}
