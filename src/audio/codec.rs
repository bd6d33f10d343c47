//! Sample conversion primitives
//!
//! Every in-memory sample type implements [`Sample`]. Conversion between any
//! two of them goes through one of two paths:
//!
//! * integer to integer: the source is offset to signed (half range) and
//!   left-aligned in an `i32`, then shifted down and offset again for the
//!   destination. Widening fills the low bits with zeros, narrowing drops
//!   them (arithmetic shift, no rounding).
//! * anything involving a float: integers map onto [-1.0, 1.0] with separate
//!   scales for the positive and negative half ranges, so that both extremes
//!   land exactly on ±1.0. The way back multiplies by the same scale and
//!   truncates toward zero.
//!
//! Samples in memory are always host order. Only the on-disk bytes carry an
//! explicit [`ByteOrder`].

use std::fmt;

use crate::audio::format::ByteOrder;

/// In-memory sample representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleRepr {
    S8,
    U8,
    S16,
    U16,
    S32,
    U32,
    F32,
}

impl SampleRepr {
    pub const ALL: [SampleRepr; 7] = [
        SampleRepr::S8,
        SampleRepr::U8,
        SampleRepr::S16,
        SampleRepr::U16,
        SampleRepr::S32,
        SampleRepr::U32,
        SampleRepr::F32,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SampleRepr::S8 => "s8",
            SampleRepr::U8 => "u8",
            SampleRepr::S16 => "s16",
            SampleRepr::U16 => "u16",
            SampleRepr::S32 => "s32",
            SampleRepr::U32 => "u32",
            SampleRepr::F32 => "f32",
        }
    }

    pub fn bytes_per_sample(&self) -> usize {
        match self {
            SampleRepr::S8 | SampleRepr::U8 => 1,
            SampleRepr::S16 | SampleRepr::U16 => 2,
            SampleRepr::S32 | SampleRepr::U32 | SampleRepr::F32 => 4,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleRepr::F32)
    }

    pub fn from_name(name: &str) -> Option<SampleRepr> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|repr| repr.name() == name)
    }
}

impl fmt::Display for SampleRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A sample type that can be held in memory and packed to disk.
pub trait Sample: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    const REPR: SampleRepr;
    /// Number of bytes of one packed sample.
    const WIDTH: usize;

    /// Offset to signed and left-aligned into 32 bits.
    fn to_aligned(self) -> i32;
    fn from_aligned(aligned: i32) -> Self;

    /// Normalized to [-1.0, 1.0].
    fn to_f32(self) -> f32;
    fn from_f32(value: f32) -> Self;

    /// Reads one sample from the first `WIDTH` bytes of `bytes`.
    fn unpack(bytes: &[u8], order: ByteOrder) -> Self;
    /// Writes one sample into the first `WIDTH` bytes of `out`.
    fn pack(self, order: ByteOrder, out: &mut [u8]);
}

/// Converts one sample between any two representations.
#[inline]
pub fn convert<S: Sample, D: Sample>(sample: S) -> D {
    if S::REPR.is_float() || D::REPR.is_float() {
        D::from_f32(sample.to_f32())
    } else {
        D::from_aligned(sample.to_aligned())
    }
}

/// Unpacks a sample stored in `order`, independent of the host byte order.
pub fn unpack<S: Sample>(bytes: &[u8], order: ByteOrder) -> S {
    S::unpack(bytes, order)
}

/// Packs a sample into `out` in `order`, independent of the host byte order.
pub fn pack<S: Sample>(sample: S, order: ByteOrder, out: &mut [u8]) {
    sample.pack(order, out)
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

macro_rules! packed_bytes {
    ($ty:ty, $width:expr) => {
        fn unpack(bytes: &[u8], order: ByteOrder) -> Self {
            let raw = array::<{ $width }>(bytes);
            match order {
                ByteOrder::Big => <$ty>::from_be_bytes(raw),
                ByteOrder::Little | ByteOrder::None => <$ty>::from_le_bytes(raw),
            }
        }

        fn pack(self, order: ByteOrder, out: &mut [u8]) {
            let raw = match order {
                ByteOrder::Big => self.to_be_bytes(),
                ByteOrder::Little | ByteOrder::None => self.to_le_bytes(),
            };
            out[..$width].copy_from_slice(&raw);
        }
    };
}

macro_rules! signed_sample {
    ($ty:ty, $repr:ident, $bits:expr) => {
        impl Sample for $ty {
            const REPR: SampleRepr = SampleRepr::$repr;
            const WIDTH: usize = $bits / 8;

            #[inline]
            fn to_aligned(self) -> i32 {
                (self as i32) << (32 - $bits)
            }

            #[inline]
            fn from_aligned(aligned: i32) -> Self {
                (aligned >> (32 - $bits)) as $ty
            }

            #[inline]
            fn to_f32(self) -> f32 {
                let value = self as f64;
                if self > 0 {
                    (value / <$ty>::MAX as f64) as f32
                } else {
                    (value / -(<$ty>::MIN as f64)) as f32
                }
            }

            #[inline]
            fn from_f32(value: f32) -> Self {
                let value = value as f64;
                if value > 0.0 {
                    (value * <$ty>::MAX as f64) as $ty
                } else {
                    (value * -(<$ty>::MIN as f64)) as $ty
                }
            }

            packed_bytes!($ty, $bits / 8);
        }
    };
}

macro_rules! unsigned_sample {
    ($ty:ty, $signed:ty, $repr:ident, $bits:expr) => {
        impl Sample for $ty {
            const REPR: SampleRepr = SampleRepr::$repr;
            const WIDTH: usize = $bits / 8;

            #[inline]
            fn to_aligned(self) -> i32 {
                ((self ^ (1 << ($bits - 1))) as $signed as i32) << (32 - $bits)
            }

            #[inline]
            fn from_aligned(aligned: i32) -> Self {
                ((aligned >> (32 - $bits)) as $signed as $ty) ^ (1 << ($bits - 1))
            }

            #[inline]
            fn to_f32(self) -> f32 {
                (-1.0 + (2.0 * self as f64) / <$ty>::MAX as f64) as f32
            }

            #[inline]
            fn from_f32(value: f32) -> Self {
                (((1.0 + value as f64) / 2.0) * <$ty>::MAX as f64) as $ty
            }

            packed_bytes!($ty, $bits / 8);
        }
    };
}

signed_sample!(i8, S8, 8);
signed_sample!(i16, S16, 16);
signed_sample!(i32, S32, 32);
unsigned_sample!(u8, i8, U8, 8);
unsigned_sample!(u16, i16, U16, 16);
unsigned_sample!(u32, i32, U32, 32);

impl Sample for f32 {
    const REPR: SampleRepr = SampleRepr::F32;
    const WIDTH: usize = 4;

    fn to_aligned(self) -> i32 {
        i32::from_f32(self)
    }

    fn from_aligned(aligned: i32) -> Self {
        aligned.to_f32()
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    fn unpack(bytes: &[u8], order: ByteOrder) -> Self {
        f32::from_bits(u32::unpack(bytes, order))
    }

    fn pack(self, order: ByteOrder, out: &mut [u8]) {
        self.to_bits().pack(order, out)
    }
}
