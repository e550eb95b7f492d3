//! Recursive encoding of (descriptor, value) pairs.
//!
//! [`encode`] writes into a caller-owned buffer at an offset and returns the
//! offset past the last byte written. [`encode_size`] computes that byte
//! count without writing, and [`encode_to_vec`] / [`encode_to_bytes`] size
//! an owned buffer first and then fill it exactly.

use crate::buffer::Writer;
use crate::config::{Config, IntEncoding};
use crate::descriptor::{Descriptor, Primitive};
use crate::error::Error;
use crate::value::Value;
use crate::varint::{self, ZigZag};
use bytes::BytesMut;

/// Encodes `value` as `descriptor` into `buf[offset..]`.
///
/// Returns the offset past the last byte written. Fails if the buffer (or
/// the configured limit) is too small, or if the value does not conform to
/// the descriptor. On failure the buffer contents past `offset` are
/// unspecified.
pub fn encode(
    descriptor: &Descriptor,
    value: &Value,
    buf: &mut [u8],
    offset: usize,
    cfg: &Config,
) -> Result<usize, Error> {
    let mut writer = Writer::new(buf, offset, cfg);
    encode_value(descriptor, value, &mut writer)?;
    Ok(writer.position())
}

/// Computes the exact number of bytes [`encode`] would write.
pub fn encode_size(descriptor: &Descriptor, value: &Value, cfg: &Config) -> Result<usize, Error> {
    match descriptor {
        Descriptor::Primitive(primitive) => primitive_size(*primitive, value, cfg),
        Descriptor::Tuple(items) => {
            let seq = expect_arity(value, items.len(), "tuple")?;
            let mut size = 0;
            for (shape, item) in items.iter().zip(seq) {
                size += encode_size(shape, item, cfg)?;
            }
            Ok(size)
        }
        Descriptor::FixedArray { element, len } => {
            let seq = expect_arity(value, *len, "fixed array")?;
            let mut size = 0;
            for item in seq {
                size += encode_size(element, item, cfg)?;
            }
            Ok(size)
        }
        Descriptor::Collection(element) => {
            let seq = value
                .as_sequence()
                .ok_or(mismatch("collection"))?;
            let mut size = length_size(seq.len() as u64, cfg);
            for item in seq {
                size += encode_size(element, item, cfg)?;
            }
            Ok(size)
        }
        Descriptor::Struct(fields) => {
            let map = value.as_struct().ok_or(mismatch("struct"))?;
            let mut size = 0;
            for field in fields {
                let item = map
                    .get(&field.name)
                    .ok_or(Error::InvalidType("struct", "missing field"))?;
                size += encode_size(&field.shape, item, cfg)?;
            }
            Ok(size)
        }
        Descriptor::Enum(variants) => {
            let (name, payload) = value.as_enum().ok_or(mismatch("enum"))?;
            let variant = variants
                .iter()
                .find(|variant| variant.name == name)
                .ok_or(Error::InvalidType("enum", "undeclared variant name"))?;
            let mut size = discriminant_size(variant.discriminant, cfg);
            size += match (&variant.payload, payload) {
                (Some(shape), Some(item)) => encode_size(shape, item, cfg)?,
                (None, None) => 0,
                _ => return Err(Error::InvalidType("enum", "payload mismatch")),
            };
            Ok(size)
        }
        Descriptor::Option(inner) => {
            let carried = value.as_option().ok_or(mismatch("option"))?;
            Ok(match carried {
                Some(item) => 1 + encode_size(inner, item, cfg)?,
                None => 1,
            })
        }
        Descriptor::Custom(custom) => custom.size(value, cfg),
    }
}

/// Sizes, allocates, and encodes into a fresh `Vec<u8>`.
pub fn encode_to_vec(
    descriptor: &Descriptor,
    value: &Value,
    cfg: &Config,
) -> Result<Vec<u8>, Error> {
    let size = encode_size(descriptor, value, cfg)?;
    let mut buf = vec![0u8; size];
    let end = encode(descriptor, value, &mut buf, 0, cfg)?;
    assert_eq!(end, size);
    Ok(buf)
}

/// Sizes, allocates, and encodes into a fresh [`BytesMut`].
pub fn encode_to_bytes(
    descriptor: &Descriptor,
    value: &Value,
    cfg: &Config,
) -> Result<BytesMut, Error> {
    let size = encode_size(descriptor, value, cfg)?;
    let mut buf = BytesMut::zeroed(size);
    let end = encode(descriptor, value, &mut buf[..], 0, cfg)?;
    assert_eq!(end, size);
    Ok(buf)
}

fn mismatch(expected: &'static str) -> Error {
    Error::InvalidType(expected, "value does not match descriptor")
}

fn expect_arity<'v>(
    value: &'v Value,
    arity: usize,
    kind: &'static str,
) -> Result<&'v [Value], Error> {
    let seq = value.as_sequence().ok_or(mismatch(kind))?;
    if seq.len() != arity {
        return Err(Error::InvalidType(kind, "arity mismatch"));
    }
    Ok(seq)
}

fn encode_value(
    descriptor: &Descriptor,
    value: &Value,
    writer: &mut Writer<'_>,
) -> Result<(), Error> {
    match descriptor {
        Descriptor::Primitive(primitive) => encode_primitive(*primitive, value, writer),
        Descriptor::Tuple(items) => {
            let seq = expect_arity(value, items.len(), "tuple")?;
            for (shape, item) in items.iter().zip(seq) {
                encode_value(shape, item, writer)?;
            }
            Ok(())
        }
        Descriptor::FixedArray { element, len } => {
            let seq = expect_arity(value, *len, "fixed array")?;
            for item in seq {
                encode_value(element, item, writer)?;
            }
            Ok(())
        }
        Descriptor::Collection(element) => {
            let seq = value
                .as_sequence()
                .ok_or(mismatch("collection"))?;
            write_length(seq.len() as u64, writer)?;
            for item in seq {
                encode_value(element, item, writer)?;
            }
            Ok(())
        }
        Descriptor::Struct(fields) => {
            let map = value.as_struct().ok_or(mismatch("struct"))?;
            for field in fields {
                let item = map
                    .get(&field.name)
                    .ok_or(Error::InvalidType("struct", "missing field"))?;
                encode_value(&field.shape, item, writer)?;
            }
            Ok(())
        }
        Descriptor::Enum(variants) => {
            let (name, payload) = value.as_enum().ok_or(mismatch("enum"))?;
            let variant = variants
                .iter()
                .find(|variant| variant.name == name)
                .ok_or(Error::InvalidType("enum", "undeclared variant name"))?;
            write_discriminant(variant.discriminant, writer)?;
            match (&variant.payload, payload) {
                (Some(shape), Some(item)) => encode_value(shape, item, writer),
                (None, None) => Ok(()),
                _ => Err(Error::InvalidType("enum", "payload mismatch")),
            }
        }
        Descriptor::Option(inner) => {
            match value.as_option().ok_or(mismatch("option"))? {
                Some(item) => {
                    writer.write_u8(1)?;
                    encode_value(inner, item, writer)
                }
                None => writer.write_u8(0),
            }
        }
        Descriptor::Custom(custom) => custom.encode(value, writer),
    }
}

fn encode_primitive(
    primitive: Primitive,
    value: &Value,
    writer: &mut Writer<'_>,
) -> Result<(), Error> {
    let variant_mode = writer.config().int_encoding == IntEncoding::Variant;
    match primitive {
        // Single-byte lanes never varint-encode.
        Primitive::U8 => writer.write_u8(value.as_u8().ok_or(mismatch("u8"))?),
        Primitive::I8 => writer.write_i8(value.as_i8().ok_or(mismatch("i8"))?),
        Primitive::U16 => {
            let v = value.as_u16().ok_or(mismatch("u16"))?;
            if variant_mode {
                varint::write(writer, u128::from(v))
            } else {
                writer.write_u16(v)
            }
        }
        Primitive::U32 => {
            let v = value.as_u32().ok_or(mismatch("u32"))?;
            if variant_mode {
                varint::write(writer, u128::from(v))
            } else {
                writer.write_u32(v)
            }
        }
        Primitive::U64 => {
            let v = value.as_u64().ok_or(mismatch("u64"))?;
            if variant_mode {
                varint::write(writer, u128::from(v))
            } else {
                writer.write_u64(v)
            }
        }
        Primitive::U128 => {
            let v = value.as_u128().ok_or(mismatch("u128"))?;
            if variant_mode {
                varint::write(writer, v)
            } else {
                writer.write_u128(v)
            }
        }
        Primitive::I16 => {
            let v = value.as_i16().ok_or(mismatch("i16"))?;
            if variant_mode {
                varint::write(writer, u128::from(v.zigzag()))
            } else {
                writer.write_i16(v)
            }
        }
        Primitive::I32 => {
            let v = value.as_i32().ok_or(mismatch("i32"))?;
            if variant_mode {
                varint::write(writer, u128::from(v.zigzag()))
            } else {
                writer.write_i32(v)
            }
        }
        Primitive::I64 => {
            let v = value.as_i64().ok_or(mismatch("i64"))?;
            if variant_mode {
                varint::write(writer, u128::from(v.zigzag()))
            } else {
                writer.write_i64(v)
            }
        }
        Primitive::I128 => {
            let v = value.as_i128().ok_or(mismatch("i128"))?;
            if variant_mode {
                varint::write(writer, v.zigzag())
            } else {
                writer.write_i128(v)
            }
        }
        Primitive::F32 => writer.write_f32(value.as_f32().ok_or(mismatch("f32"))?),
        Primitive::F64 => writer.write_f64(value.as_f64().ok_or(mismatch("f64"))?),
        Primitive::F16 => Err(Error::Unimplemented("f16")),
        Primitive::F128 => Err(Error::Unimplemented("f128")),
        Primitive::Bool => {
            let v = value.as_bool().ok_or(mismatch("bool"))?;
            writer.write_u8(u8::from(v))
        }
        Primitive::String => {
            let text = value.as_str().ok_or(mismatch("string"))?;
            write_length(text.len() as u64, writer)?;
            writer.write_slice(text.as_bytes())
        }
    }
}

fn primitive_size(primitive: Primitive, value: &Value, cfg: &Config) -> Result<usize, Error> {
    let variant_mode = cfg.int_encoding == IntEncoding::Variant;
    Ok(match primitive {
        Primitive::U8 => {
            value.as_u8().ok_or(mismatch("u8"))?;
            1
        }
        Primitive::I8 => {
            value.as_i8().ok_or(mismatch("i8"))?;
            1
        }
        Primitive::U16 => {
            let v = value.as_u16().ok_or(mismatch("u16"))?;
            if variant_mode {
                varint::size(u128::from(v))
            } else {
                2
            }
        }
        Primitive::U32 => {
            let v = value.as_u32().ok_or(mismatch("u32"))?;
            if variant_mode {
                varint::size(u128::from(v))
            } else {
                4
            }
        }
        Primitive::U64 => {
            let v = value.as_u64().ok_or(mismatch("u64"))?;
            if variant_mode {
                varint::size(u128::from(v))
            } else {
                8
            }
        }
        Primitive::U128 => {
            let v = value.as_u128().ok_or(mismatch("u128"))?;
            if variant_mode {
                varint::size(v)
            } else {
                16
            }
        }
        Primitive::I16 => {
            let v = value.as_i16().ok_or(mismatch("i16"))?;
            if variant_mode {
                varint::size(u128::from(v.zigzag()))
            } else {
                2
            }
        }
        Primitive::I32 => {
            let v = value.as_i32().ok_or(mismatch("i32"))?;
            if variant_mode {
                varint::size(u128::from(v.zigzag()))
            } else {
                4
            }
        }
        Primitive::I64 => {
            let v = value.as_i64().ok_or(mismatch("i64"))?;
            if variant_mode {
                varint::size(u128::from(v.zigzag()))
            } else {
                8
            }
        }
        Primitive::I128 => {
            let v = value.as_i128().ok_or(mismatch("i128"))?;
            if variant_mode {
                varint::size(v.zigzag())
            } else {
                16
            }
        }
        Primitive::F32 => {
            value.as_f32().ok_or(mismatch("f32"))?;
            4
        }
        Primitive::F64 => {
            value.as_f64().ok_or(mismatch("f64"))?;
            8
        }
        Primitive::F16 => return Err(Error::Unimplemented("f16")),
        Primitive::F128 => return Err(Error::Unimplemented("f128")),
        Primitive::Bool => {
            value.as_bool().ok_or(mismatch("bool"))?;
            1
        }
        Primitive::String => {
            let text = value.as_str().ok_or(mismatch("string"))?;
            length_size(text.len() as u64, cfg) + text.len()
        }
    })
}

/// Writes a collection or string length as a `u64` under the active length
/// encoding.
fn write_length(len: u64, writer: &mut Writer<'_>) -> Result<(), Error> {
    match writer.config().int_encoding {
        IntEncoding::Variant => varint::write(writer, u128::from(len)),
        IntEncoding::Fixed => writer.write_u64(len),
    }
}

/// Writes an enum discriminant as a `u32` under the active encoding.
fn write_discriminant(discriminant: u32, writer: &mut Writer<'_>) -> Result<(), Error> {
    match writer.config().int_encoding {
        IntEncoding::Variant => varint::write(writer, u128::from(discriminant)),
        IntEncoding::Fixed => writer.write_u32(discriminant),
    }
}

fn length_size(len: u64, cfg: &Config) -> usize {
    match cfg.int_encoding {
        IntEncoding::Variant => varint::size(u128::from(len)),
        IntEncoding::Fixed => 8,
    }
}

fn discriminant_size(discriminant: u32, cfg: &Config) -> usize {
    match cfg.int_encoding {
        IntEncoding::Variant => varint::size(u128::from(discriminant)),
        IntEncoding::Fixed => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Variant;

    const CFG: Config = Config::standard();

    #[test]
    fn test_offset_accounting() {
        let mut buf = [0xAAu8; 8];
        let end = encode(&Descriptor::U32, &Value::U32(300), &mut buf, 2, &CFG).unwrap();
        assert_eq!(end, 5);
        assert_eq!(buf, [0xAA, 0xAA, 251, 44, 1, 0xAA, 0xAA, 0xAA]);
    }

    #[test]
    fn test_size_matches_encode() {
        let descriptor = Descriptor::structure([
            ("id", Descriptor::U64),
            ("tags", Descriptor::vec_of(Descriptor::STRING)),
            ("score", Descriptor::option(Descriptor::F64)),
        ]);
        let value = Value::structure([
            ("id", Value::U64(1_000_000)),
            (
                "tags",
                Value::sequence([Value::from("a"), Value::from("bc")]),
            ),
            ("score", Value::some(Value::F64(98.5))),
        ]);
        for cfg in [Config::standard(), Config::legacy()] {
            let encoded = encode_to_vec(&descriptor, &value, &cfg).unwrap();
            assert_eq!(encoded.len(), encode_size(&descriptor, &value, &cfg).unwrap());
        }
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u8; 2];
        assert!(matches!(
            encode(&Descriptor::STRING, &Value::from("abc"), &mut buf, 0, &CFG),
            Err(Error::OverflowLimit { .. })
        ));
    }

    #[test]
    fn test_value_mismatch() {
        let mut buf = [0u8; 8];
        assert!(matches!(
            encode(&Descriptor::U32, &Value::from("nope"), &mut buf, 0, &CFG),
            Err(Error::InvalidType("u32", _))
        ));

        // Arity is part of the descriptor for tuples and fixed arrays.
        let pair = Descriptor::tuple([Descriptor::U8, Descriptor::U8]);
        assert!(matches!(
            encode(&pair, &Value::sequence([Value::U8(1)]), &mut buf, 0, &CFG),
            Err(Error::InvalidType("tuple", "arity mismatch"))
        ));
    }

    #[test]
    fn test_enum_payload_mismatch() {
        let shape = Descriptor::enumeration([
            Variant::unit("Empty", 0),
            Variant::tuple("Full", 1, [Descriptor::U8]),
        ]);
        let mut buf = [0u8; 8];

        // A payload on a dataless variant is rejected, as is the reverse.
        let bogus = Value::enumeration("Empty", Some(Value::unit()));
        assert!(matches!(
            encode(&shape, &bogus, &mut buf, 0, &CFG),
            Err(Error::InvalidType("enum", "payload mismatch"))
        ));
        let bogus = Value::enumeration("Full", None);
        assert!(matches!(
            encode(&shape, &bogus, &mut buf, 0, &CFG),
            Err(Error::InvalidType("enum", "payload mismatch"))
        ));
        let unknown = Value::enumeration("Missing", None);
        assert!(matches!(
            encode(&shape, &unknown, &mut buf, 0, &CFG),
            Err(Error::InvalidType("enum", "undeclared variant name"))
        ));
    }

    #[test]
    fn test_unimplemented_floats() {
        let mut buf = [0u8; 16];
        assert!(matches!(
            encode(&Descriptor::F16, &Value::F32(1.0), &mut buf, 0, &CFG),
            Err(Error::Unimplemented("f16"))
        ));
        assert!(matches!(
            encode_size(&Descriptor::F128, &Value::F64(1.0), &CFG),
            Err(Error::Unimplemented("f128"))
        ));
    }
}
