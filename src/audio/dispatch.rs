//! Converter binding
//!
//! A file's encoding selects one of twelve on-disk sample layouts. For each
//! layout there is one chunk decoder per in-memory type (reading) and one
//! chunk encoder per in-memory type (writing), all instances of the same
//! generic routines in this module.

use crate::audio::codec::{convert, Sample, SampleRepr};
use crate::audio::file::Mode;
use crate::audio::format::{ByteOrder, CodecType, EncodingDescriptor, SampleKind};
use crate::error::{AupcmError, Result};

/// Decodes `out.len()` packed samples from the front of `bytes`.
pub type DecodeFn<T> = fn(&[u8], &mut [T]);
/// Encodes all of `input` into the front of `out`.
pub type EncodeFn<T> = fn(&[T], &mut [u8]);

/// On-disk sample layout accepted by the converters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskFormat {
    pub repr: SampleRepr,
    pub order: ByteOrder,
}

impl DiskFormat {
    /// Maps a descriptor onto a supported layout.
    pub fn from_descriptor(desc: &EncodingDescriptor) -> Option<DiskFormat> {
        let CodecType::Pcm = desc.codec;

        let repr = match (desc.kind, desc.order, desc.bits) {
            (SampleKind::Signed, ByteOrder::None, 8) => SampleRepr::S8,
            (SampleKind::Unsigned, ByteOrder::None, 8) => SampleRepr::U8,
            (SampleKind::Signed, ByteOrder::Little | ByteOrder::Big, 16) => SampleRepr::S16,
            (SampleKind::Unsigned, ByteOrder::Little | ByteOrder::Big, 16) => SampleRepr::U16,
            (SampleKind::Signed, ByteOrder::Little | ByteOrder::Big, 32) => SampleRepr::S32,
            (SampleKind::Unsigned, ByteOrder::Little | ByteOrder::Big, 32) => SampleRepr::U32,
            (SampleKind::Float, ByteOrder::Little | ByteOrder::Big, 32) => SampleRepr::F32,
            _ => return None,
        };

        Some(DiskFormat { repr, order: desc.order })
    }

    pub fn width(&self) -> usize {
        self.repr.bytes_per_sample()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Decoders {
    pub s8: DecodeFn<i8>,
    pub u8: DecodeFn<u8>,
    pub s16: DecodeFn<i16>,
    pub u16: DecodeFn<u16>,
    pub s32: DecodeFn<i32>,
    pub u32: DecodeFn<u32>,
    pub f32: DecodeFn<f32>,
}

#[derive(Debug, Clone, Copy)]
pub struct Encoders {
    pub s8: EncodeFn<i8>,
    pub u8: EncodeFn<u8>,
    pub s16: EncodeFn<i16>,
    pub u16: EncodeFn<u16>,
    pub s32: EncodeFn<i32>,
    pub u32: EncodeFn<u32>,
    pub f32: EncodeFn<f32>,
}

/// The seven converters of one direction, bound to one on-disk layout.
#[derive(Debug, Clone, Copy)]
pub enum ConverterSet {
    Read { format: DiskFormat, decoders: Decoders },
    Write { format: DiskFormat, encoders: Encoders },
}

impl ConverterSet {
    pub fn format(&self) -> DiskFormat {
        match self {
            ConverterSet::Read { format, .. } | ConverterSet::Write { format, .. } => *format,
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            ConverterSet::Read { .. } => Mode::Read,
            ConverterSet::Write { .. } => Mode::Write,
        }
    }

    pub fn decoder<T: Bound>(&self) -> Option<DecodeFn<T>> {
        match self {
            ConverterSet::Read { decoders, .. } => Some(T::decoder(decoders)),
            ConverterSet::Write { .. } => None,
        }
    }

    pub fn encoder<T: Bound>(&self) -> Option<EncodeFn<T>> {
        match self {
            ConverterSet::Write { encoders, .. } => Some(T::encoder(encoders)),
            ConverterSet::Read { .. } => None,
        }
    }
}

/// In-memory types that have a slot in [`Decoders`] and [`Encoders`].
pub trait Bound: Sample {
    fn decoder(set: &Decoders) -> DecodeFn<Self>;
    fn encoder(set: &Encoders) -> EncodeFn<Self>;
}

macro_rules! bound_slot {
    ($ty:ty, $field:ident) => {
        impl Bound for $ty {
            fn decoder(set: &Decoders) -> DecodeFn<Self> {
                set.$field
            }

            fn encoder(set: &Encoders) -> EncodeFn<Self> {
                set.$field
            }
        }
    };
}

bound_slot!(i8, s8);
bound_slot!(u8, u8);
bound_slot!(i16, s16);
bound_slot!(u16, u16);
bound_slot!(i32, s32);
bound_slot!(u32, u32);
bound_slot!(f32, f32);

fn decode_chunk<S: Sample, D: Sample, const BIG: bool>(bytes: &[u8], out: &mut [D]) {
    let order = if BIG { ByteOrder::Big } else { ByteOrder::Little };
    for (raw, sample) in bytes.chunks_exact(S::WIDTH).zip(out.iter_mut()) {
        *sample = convert::<S, D>(S::unpack(raw, order));
    }
}

fn encode_chunk<S: Sample, D: Sample, const BIG: bool>(input: &[S], out: &mut [u8]) {
    let order = if BIG { ByteOrder::Big } else { ByteOrder::Little };
    for (sample, raw) in input.iter().zip(out.chunks_exact_mut(D::WIDTH)) {
        convert::<S, D>(*sample).pack(order, raw);
    }
}

fn decoders<S: Sample, const BIG: bool>() -> Decoders {
    Decoders {
        s8: decode_chunk::<S, i8, BIG>,
        u8: decode_chunk::<S, u8, BIG>,
        s16: decode_chunk::<S, i16, BIG>,
        u16: decode_chunk::<S, u16, BIG>,
        s32: decode_chunk::<S, i32, BIG>,
        u32: decode_chunk::<S, u32, BIG>,
        f32: decode_chunk::<S, f32, BIG>,
    }
}

fn encoders<D: Sample, const BIG: bool>() -> Encoders {
    Encoders {
        s8: encode_chunk::<i8, D, BIG>,
        u8: encode_chunk::<u8, D, BIG>,
        s16: encode_chunk::<i16, D, BIG>,
        u16: encode_chunk::<u16, D, BIG>,
        s32: encode_chunk::<i32, D, BIG>,
        u32: encode_chunk::<u32, D, BIG>,
        f32: encode_chunk::<f32, D, BIG>,
    }
}

fn decoders_for<const BIG: bool>(repr: SampleRepr) -> Decoders {
    match repr {
        SampleRepr::S8 => decoders::<i8, BIG>(),
        SampleRepr::U8 => decoders::<u8, BIG>(),
        SampleRepr::S16 => decoders::<i16, BIG>(),
        SampleRepr::U16 => decoders::<u16, BIG>(),
        SampleRepr::S32 => decoders::<i32, BIG>(),
        SampleRepr::U32 => decoders::<u32, BIG>(),
        SampleRepr::F32 => decoders::<f32, BIG>(),
    }
}

fn encoders_for<const BIG: bool>(repr: SampleRepr) -> Encoders {
    match repr {
        SampleRepr::S8 => encoders::<i8, BIG>(),
        SampleRepr::U8 => encoders::<u8, BIG>(),
        SampleRepr::S16 => encoders::<i16, BIG>(),
        SampleRepr::U16 => encoders::<u16, BIG>(),
        SampleRepr::S32 => encoders::<i32, BIG>(),
        SampleRepr::U32 => encoders::<u32, BIG>(),
        SampleRepr::F32 => encoders::<f32, BIG>(),
    }
}

/// Selects the converters implied by `desc` for `mode`.
pub fn bind(desc: &EncodingDescriptor, mode: Mode) -> Result<ConverterSet> {
    let format = DiskFormat::from_descriptor(desc)
        .ok_or_else(|| AupcmError::unsupported(desc.encoding()))?;
    let big = format.order == ByteOrder::Big;

    log::debug!(
        "Binding {} converters for {} ({} byte samples)",
        mode,
        desc.encoding(),
        format.width()
    );

    Ok(match (mode, big) {
        (Mode::Read, false) => ConverterSet::Read { format, decoders: decoders_for::<false>(format.repr) },
        (Mode::Read, true) => ConverterSet::Read { format, decoders: decoders_for::<true>(format.repr) },
        (Mode::Write, false) => ConverterSet::Write { format, encoders: encoders_for::<false>(format.repr) },
        (Mode::Write, true) => ConverterSet::Write { format, encoders: encoders_for::<true>(format.repr) },
    })
}
