//! Recursive decoding of byte streams driven by a descriptor.
//!
//! [`decode`] walks the descriptor, consuming bytes from a caller-owned
//! buffer and validating every quantity it reads: bool bytes, option tags,
//! enum discriminants, UTF-8 text, and lengths. There is no lookahead; each
//! variable-width quantity is read, validated, then used to drive child
//! decoding. Container pre-allocation is capped by the remaining input so a
//! hostile length prefix cannot force a huge allocation up front.

use crate::buffer::Reader;
use crate::config::{Config, IntEncoding};
use crate::descriptor::{Descriptor, Primitive, Variant};
use crate::error::Error;
use crate::value::Value;
use crate::varint::{self, ZigZag};
use std::collections::{BTreeMap, HashMap};

/// Decodes a value shaped as `descriptor` from `buf[offset..]`.
///
/// Returns the reconstructed value and the offset past the last byte read.
/// Bytes outside `[offset, returned offset)` are never touched.
pub fn decode(
    descriptor: &Descriptor,
    buf: &[u8],
    offset: usize,
    cfg: &Config,
) -> Result<(Value, usize), Error> {
    let mut reader = Reader::new(buf, offset, cfg);
    let value = decode_value(descriptor, &mut reader)?;
    Ok((value, reader.position()))
}

fn decode_value(descriptor: &Descriptor, reader: &mut Reader<'_>) -> Result<Value, Error> {
    match descriptor {
        Descriptor::Primitive(primitive) => decode_primitive(*primitive, reader),
        Descriptor::Tuple(items) => {
            let mut seq = Vec::with_capacity(items.len());
            for shape in items {
                seq.push(decode_value(shape, reader)?);
            }
            Ok(Value::Sequence(seq))
        }
        Descriptor::FixedArray { element, len } => {
            let mut seq = Vec::with_capacity(*len);
            for _ in 0..*len {
                seq.push(decode_value(element, reader)?);
            }
            Ok(Value::Sequence(seq))
        }
        Descriptor::Collection(element) => {
            let len = read_length(reader)?;
            // Cap pre-allocation by the remaining input; a hostile prefix
            // can claim any count, but each element costs at least a byte.
            let mut seq = Vec::with_capacity(len.min(reader.remaining()));
            for _ in 0..len {
                seq.push(decode_value(element, reader)?);
            }
            Ok(Value::Sequence(seq))
        }
        Descriptor::Struct(fields) => {
            let mut map = BTreeMap::new();
            for field in fields {
                let value = decode_value(&field.shape, reader)?;
                if map.insert(field.name.clone(), value).is_some() {
                    return Err(Error::InvalidType("struct", "duplicate field name"));
                }
            }
            Ok(Value::Struct(map))
        }
        Descriptor::Enum(variants) => {
            let index = discriminant_index(variants)?;
            let discriminant = read_discriminant(reader)?;
            let variant = index
                .get(&discriminant)
                .ok_or(Error::InvalidVariant(discriminant))?;
            let payload = match &variant.payload {
                Some(shape) => Some(Box::new(decode_value(shape, reader)?)),
                None => None,
            };
            Ok(Value::Enum {
                variant: variant.name.clone(),
                payload,
            })
        }
        Descriptor::Option(inner) => match reader.read_u8()? {
            0 => Ok(Value::Option(None)),
            1 => Ok(Value::Option(Some(Box::new(decode_value(inner, reader)?)))),
            tag => Err(Error::InvalidOptionVariant(tag)),
        },
        Descriptor::Custom(custom) => custom.decode(reader),
    }
}

/// Builds the transient discriminant index for one enum layer, rejecting
/// descriptors that declare the same discriminant twice.
fn discriminant_index(variants: &[Variant]) -> Result<HashMap<u32, &Variant>, Error> {
    let mut index = HashMap::with_capacity(variants.len());
    for variant in variants {
        if index.insert(variant.discriminant, variant).is_some() {
            return Err(Error::InvalidType("enum", "duplicate discriminant"));
        }
    }
    Ok(index)
}

fn decode_primitive(primitive: Primitive, reader: &mut Reader<'_>) -> Result<Value, Error> {
    let variant_mode = reader.config().int_encoding == IntEncoding::Variant;
    match primitive {
        Primitive::U8 => reader.read_u8().map(Value::U8),
        Primitive::I8 => reader.read_i8().map(Value::I8),
        Primitive::U16 => {
            if variant_mode {
                varint::read_narrowed::<u16>(reader, "u16").map(Value::U16)
            } else {
                reader.read_u16().map(Value::U16)
            }
        }
        Primitive::U32 => {
            if variant_mode {
                varint::read_narrowed::<u32>(reader, "u32").map(Value::U32)
            } else {
                reader.read_u32().map(Value::U32)
            }
        }
        Primitive::U64 => {
            if variant_mode {
                varint::read_narrowed::<u64>(reader, "u64").map(Value::U64)
            } else {
                reader.read_u64().map(Value::U64)
            }
        }
        Primitive::U128 => {
            if variant_mode {
                varint::read(reader).map(Value::U128)
            } else {
                reader.read_u128().map(Value::U128)
            }
        }
        Primitive::I16 => {
            if variant_mode {
                let encoded = varint::read_narrowed::<u16>(reader, "i16")?;
                Ok(Value::I16(i16::unzigzag(encoded)))
            } else {
                reader.read_i16().map(Value::I16)
            }
        }
        Primitive::I32 => {
            if variant_mode {
                let encoded = varint::read_narrowed::<u32>(reader, "i32")?;
                Ok(Value::I32(i32::unzigzag(encoded)))
            } else {
                reader.read_i32().map(Value::I32)
            }
        }
        Primitive::I64 => {
            if variant_mode {
                let encoded = varint::read_narrowed::<u64>(reader, "i64")?;
                Ok(Value::I64(i64::unzigzag(encoded)))
            } else {
                reader.read_i64().map(Value::I64)
            }
        }
        Primitive::I128 => {
            if variant_mode {
                let encoded = varint::read(reader)?;
                Ok(Value::I128(i128::unzigzag(encoded)))
            } else {
                reader.read_i128().map(Value::I128)
            }
        }
        Primitive::F32 => reader.read_f32().map(Value::F32),
        Primitive::F64 => reader.read_f64().map(Value::F64),
        Primitive::F16 => Err(Error::Unimplemented("f16")),
        Primitive::F128 => Err(Error::Unimplemented("f128")),
        Primitive::Bool => match reader.read_u8()? {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            _ => Err(Error::InvalidType("bool", "byte outside 0/1")),
        },
        Primitive::String => {
            let len = read_length(reader)?;
            let raw = reader.take(len)?;
            let text = std::str::from_utf8(raw)
                .map_err(|_| Error::InvalidType("string", "invalid utf-8"))?;
            Ok(Value::String(text.to_owned()))
        }
    }
}

/// Reads a collection or string length written as a `u64` under the active
/// length encoding, and narrows it to a host `usize`.
fn read_length(reader: &mut Reader<'_>) -> Result<usize, Error> {
    let wide = match reader.config().int_encoding {
        IntEncoding::Variant => varint::read(reader)?,
        IntEncoding::Fixed => u128::from(reader.read_u64()?),
    };
    if wide > u128::from(u64::MAX) {
        return Err(Error::InvalidLength(wide));
    }
    usize::try_from(wide).map_err(|_| Error::InvalidLength(wide))
}

/// Reads an enum discriminant written as a `u32` under the active encoding.
fn read_discriminant(reader: &mut Reader<'_>) -> Result<u32, Error> {
    match reader.config().int_encoding {
        IntEncoding::Variant => varint::read_narrowed::<u32>(reader, "u32 discriminant"),
        IntEncoding::Fixed => reader.read_u32(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CFG: Config = Config::standard();

    #[test]
    fn test_invalid_bool() {
        assert!(matches!(
            decode(&Descriptor::BOOL, &[2], 0, &CFG),
            Err(Error::InvalidType("bool", _))
        ));
        assert_eq!(
            decode(&Descriptor::BOOL, &[1], 0, &CFG).unwrap(),
            (Value::Bool(true), 1)
        );
    }

    #[test]
    fn test_invalid_option_tag() {
        let shape = Descriptor::option(Descriptor::U8);
        assert!(matches!(
            decode(&shape, &[2, 7], 0, &CFG),
            Err(Error::InvalidOptionVariant(2))
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        // Length 2, then a bare continuation byte.
        assert!(matches!(
            decode(&Descriptor::STRING, &[2, 0x80, 0x80], 0, &CFG),
            Err(Error::InvalidType("string", "invalid utf-8"))
        ));
    }

    #[test]
    fn test_truncated_input() {
        assert!(matches!(
            decode(&Descriptor::STRING, &[5, b'h', b'i'], 0, &CFG),
            Err(Error::OverflowLimit { .. })
        ));
    }

    #[test]
    fn test_hostile_length_prefix() {
        // Claims u64::MAX elements; must fail on input exhaustion, not
        // exhaust memory while pre-allocating.
        let shape = Descriptor::vec_of(Descriptor::U8);
        let mut input = vec![253];
        input.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            decode(&shape, &input, 0, &CFG),
            Err(Error::OverflowLimit { .. })
        ));
    }

    #[test]
    fn test_narrowed_primitive() {
        // A u64-marked wire value does not fit a u16 lane.
        let mut input = vec![253];
        input.extend_from_slice(&0x1_0000_0000u64.to_le_bytes());
        assert!(matches!(
            decode(&Descriptor::U16, &input, 0, &CFG),
            Err(Error::BigintOutOfRange("u16"))
        ));
    }

    #[test]
    fn test_duplicate_discriminant() {
        let shape = Descriptor::enumeration([Variant::unit("A", 0), Variant::unit("B", 0)]);
        assert!(matches!(
            decode(&shape, &[0], 0, &CFG),
            Err(Error::InvalidType("enum", "duplicate discriminant"))
        ));
    }

    #[test]
    fn test_unimplemented_floats() {
        assert!(matches!(
            decode(&Descriptor::F16, &[0, 0], 0, &CFG),
            Err(Error::Unimplemented("f16"))
        ));
        assert!(matches!(
            decode(&Descriptor::F128, &[0; 16], 0, &CFG),
            Err(Error::Unimplemented("f128"))
        ));
    }

    #[test]
    fn test_length_wider_than_u64() {
        // A 16-byte-marked length prefix is outside the u64 length domain.
        let shape = Descriptor::vec_of(Descriptor::U8);
        let mut input = vec![254];
        input.extend_from_slice(&u128::MAX.to_le_bytes());
        assert!(matches!(
            decode(&shape, &input, 0, &CFG),
            Err(Error::InvalidLength(_))
        ));
    }

    #[test]
    fn test_no_overread() {
        // Trailing bytes past the decoded value are left untouched.
        let (value, end) = decode(&Descriptor::U8, &[9, 0xFF, 0xFF], 0, &CFG).unwrap();
        assert_eq!(value, Value::U8(9));
        assert_eq!(end, 1);
    }
}
