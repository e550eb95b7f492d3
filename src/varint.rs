//! Variable-length integer encoding and decoding.
//!
//! # Overview
//!
//! This module implements bincode's prefix-tagged variable-length unsigned
//! integer. A value at most 250 is its own single byte; larger values emit a
//! marker byte followed by a fixed-width payload in the active byte order:
//!
//! | Value range | Emitted bytes |
//! |---|---|
//! | `v <= 250` | `[v]` |
//! | `v <= u16::MAX` | `[251]` + 2 payload bytes |
//! | `v <= u32::MAX` | `[252]` + 4 payload bytes |
//! | `v <= u64::MAX` | `[253]` + 8 payload bytes |
//! | otherwise | `[254]` + 16 payload bytes |
//!
//! Marker 255 is reserved and rejected on read. The payload width is chosen
//! from the value, not from the lane being encoded, so a `u64` holding `42`
//! still costs one byte.
//!
//! Signed lanes go through [`ZigZag`] first, which moves the sign into the
//! least significant bit so that small-magnitude negative values encode
//! compactly. `u8` and `i8` never varint-encode; they are always raw bytes.

use crate::buffer::{Reader, Writer};
use crate::error::Error;

/// Largest value carried directly in the tag byte.
const SINGLE_BYTE_MAX: u128 = 250;

/// Marker for a 2-byte payload.
const U16_MARKER: u8 = 251;

/// Marker for a 4-byte payload.
const U32_MARKER: u8 = 252;

/// Marker for an 8-byte payload.
const U64_MARKER: u8 = 253;

/// Marker for a 16-byte payload.
const U128_MARKER: u8 = 254;

/// Reserved marker, invalid on read.
const RESERVED_MARKER: u8 = 255;

/// Encodes an unsigned integer as a varint.
pub fn write(writer: &mut Writer<'_>, value: u128) -> Result<(), Error> {
    if value <= SINGLE_BYTE_MAX {
        writer.write_u8(value as u8)
    } else if value <= u128::from(u16::MAX) {
        writer.write_u8(U16_MARKER)?;
        writer.write_u16(value as u16)
    } else if value <= u128::from(u32::MAX) {
        writer.write_u8(U32_MARKER)?;
        writer.write_u32(value as u32)
    } else if value <= u128::from(u64::MAX) {
        writer.write_u8(U64_MARKER)?;
        writer.write_u64(value as u64)
    } else {
        writer.write_u8(U128_MARKER)?;
        writer.write_u128(value)
    }
}

/// Decodes a varint into the widest unsigned lane.
///
/// Returns an error if the marker byte is the reserved 255 or the buffer
/// ends inside the payload.
pub fn read(reader: &mut Reader<'_>) -> Result<u128, Error> {
    let tag = reader.read_u8()?;
    match tag {
        U16_MARKER => reader.read_u16().map(u128::from),
        U32_MARKER => reader.read_u32().map(u128::from),
        U64_MARKER => reader.read_u64().map(u128::from),
        U128_MARKER => reader.read_u128(),
        RESERVED_MARKER => Err(Error::BigintOutOfRange("varint marker")),
        single => Ok(u128::from(single)),
    }
}

/// Decodes a varint and narrows it to the target lane.
pub fn read_narrowed<T: TryFrom<u128>>(
    reader: &mut Reader<'_>,
    lane: &'static str,
) -> Result<T, Error> {
    T::try_from(read(reader)?).map_err(|_| Error::BigintOutOfRange(lane))
}

/// The number of bytes needed to encode `value` as a varint.
pub fn size(value: u128) -> usize {
    if value <= SINGLE_BYTE_MAX {
        1
    } else if value <= u128::from(u16::MAX) {
        3
    } else if value <= u128::from(u32::MAX) {
        5
    } else if value <= u128::from(u64::MAX) {
        9
    } else {
        17
    }
}

/// Mapping between signed integers and their unsigned equivalents.
///
/// Encoding moves the sign bit to the least significant bit (shifting all
/// other bits left by one), so values close to zero stay small even when
/// negative. The most negative value of each width maps to the unsigned
/// maximum of that width.
pub trait ZigZag: Copy {
    /// The unsigned lane of the same width.
    type Unsigned: Copy + Into<u128> + TryFrom<u128>;

    /// Converts the signed integer to its zigzag unsigned form.
    fn zigzag(self) -> Self::Unsigned;

    /// Converts a zigzag unsigned form back to the signed integer.
    fn unzigzag(encoded: Self::Unsigned) -> Self;
}

macro_rules! impl_zigzag {
    ($($t:ty => $ut:ty),+ $(,)?) => {
        $(
            impl ZigZag for $t {
                type Unsigned = $ut;

                #[inline]
                fn zigzag(self) -> $ut {
                    let shr = <$t>::BITS as usize - 1;
                    ((self << 1) ^ (self >> shr)) as $ut
                }

                #[inline]
                fn unzigzag(encoded: $ut) -> $t {
                    ((encoded >> 1) as $t) ^ (-((encoded & 1) as $t))
                }
            }
        )+
    };
}

impl_zigzag!(i16 => u16, i32 => u32, i64 => u64, i128 => u128);
