//! Runtime descriptors for wire shapes.
//!
//! # Overview
//!
//! A [`Descriptor`] is a tagged tree naming the shape of a value on the
//! wire: primitives, tuples, fixed arrays, variable collections, structs,
//! enums, options, and user-defined formats. The engine interprets the tree
//! recursively; the wire format is driven entirely by the descriptor, which
//! both peers must agree on out of band.
//!
//! Descriptors are immutable after construction and may be shared freely,
//! including across threads. Callers build them explicitly through the
//! constructors below; there is no derivation from native Rust types.
//!
//! # Example
//!
//! ```
//! use bincodec::Descriptor;
//!
//! // struct Person { name: String, age: u8, emails: Vec<String> }
//! let person = Descriptor::structure([
//!     ("name", Descriptor::STRING),
//!     ("age", Descriptor::U8),
//!     ("emails", Descriptor::vec_of(Descriptor::STRING)),
//! ]);
//! ```

use crate::buffer::{Reader, Writer};
use crate::config::Config;
use crate::error::Error;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Primitive shape kinds.
///
/// `F16` and `F128` are reserved; encoding or decoding them always fails
/// with [`Error::Unimplemented`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
    F16,
    F32,
    F64,
    F128,
    Bool,
    String,
}

/// A named field of a struct descriptor.
///
/// Fields are visited in declaration order; names never appear on the wire.
#[derive(Clone, Debug)]
pub struct Field {
    /// Field name, unique within the struct.
    pub name: String,
    /// Shape of the field's value.
    pub shape: Descriptor,
}

/// A named variant of an enum descriptor.
#[derive(Clone, Debug)]
pub struct Variant {
    /// Variant name, used by values to select the variant.
    pub name: String,
    /// Numeric tag written to the wire. Unique within the enum, possibly
    /// non-contiguous.
    pub discriminant: u32,
    /// Payload shape, or `None` for a dataless variant (which emits zero
    /// bytes after the discriminant). By convention a tuple or struct.
    pub payload: Option<Descriptor>,
}

impl Variant {
    /// Creates a variant.
    pub fn new(name: impl Into<String>, discriminant: u32, payload: Option<Descriptor>) -> Self {
        Self {
            name: name.into(),
            discriminant,
            payload,
        }
    }

    /// Creates a dataless variant.
    pub fn unit(name: impl Into<String>, discriminant: u32) -> Self {
        Self::new(name, discriminant, None)
    }

    /// Creates a variant carrying a tuple payload.
    pub fn tuple(
        name: impl Into<String>,
        discriminant: u32,
        items: impl IntoIterator<Item = Descriptor>,
    ) -> Self {
        Self::new(name, discriminant, Some(Descriptor::tuple(items)))
    }

    /// Creates a variant carrying a record payload.
    pub fn record<N: Into<String>>(
        name: impl Into<String>,
        discriminant: u32,
        fields: impl IntoIterator<Item = (N, Descriptor)>,
    ) -> Self {
        Self::new(name, discriminant, Some(Descriptor::structure(fields)))
    }
}

type EncodeFn = dyn Fn(&Value, &mut Writer<'_>) -> Result<(), Error> + Send + Sync;
type DecodeFn = dyn Fn(&mut Reader<'_>) -> Result<Value, Error> + Send + Sync;
type SizeFn = dyn Fn(&Value, &Config) -> Result<usize, Error> + Send + Sync;

/// A user-defined wire format.
///
/// The closures receive the live cursor, which carries the active
/// configuration and enforces the byte limit on every access. They are the
/// only extension point of the engine and are treated as black boxes: the
/// engine trusts them to consume and produce bytes respecting the
/// configuration, and gives up its own guarantees across that boundary.
#[derive(Clone)]
pub struct CustomType {
    encode: Arc<EncodeFn>,
    decode: Arc<DecodeFn>,
    size: Arc<SizeFn>,
}

impl CustomType {
    /// Registers a custom format from its encode, decode, and size closures.
    ///
    /// `size` must return exactly the number of bytes `encode` writes for
    /// the same value and configuration.
    pub fn new(
        encode: impl Fn(&Value, &mut Writer<'_>) -> Result<(), Error> + Send + Sync + 'static,
        decode: impl Fn(&mut Reader<'_>) -> Result<Value, Error> + Send + Sync + 'static,
        size: impl Fn(&Value, &Config) -> Result<usize, Error> + Send + Sync + 'static,
    ) -> Self {
        Self {
            encode: Arc::new(encode),
            decode: Arc::new(decode),
            size: Arc::new(size),
        }
    }

    pub(crate) fn encode(&self, value: &Value, writer: &mut Writer<'_>) -> Result<(), Error> {
        (self.encode)(value, writer)
    }

    pub(crate) fn decode(&self, reader: &mut Reader<'_>) -> Result<Value, Error> {
        (self.decode)(reader)
    }

    pub(crate) fn size(&self, value: &Value, cfg: &Config) -> Result<usize, Error> {
        (self.size)(value, cfg)
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomType")
    }
}

/// Runtime description of a wire shape.
#[derive(Clone, Debug)]
pub enum Descriptor {
    /// A primitive lane.
    Primitive(Primitive),
    /// A finite ordered sequence of child shapes. Arity zero is the unit
    /// shape, which occupies no bytes.
    Tuple(Vec<Descriptor>),
    /// Exactly `len` elements of one shape, no length prefix.
    FixedArray {
        /// Element shape.
        element: Box<Descriptor>,
        /// Element count, part of the descriptor rather than the value.
        len: usize,
    },
    /// A length-prefixed run of elements of one shape.
    Collection(Box<Descriptor>),
    /// Ordered named fields, encoded in declaration order without framing.
    Struct(Vec<Field>),
    /// Named variants selected by a numeric discriminant.
    Enum(Vec<Variant>),
    /// Absent, or exactly one inner value, selected by a one-byte tag.
    Option(Box<Descriptor>),
    /// A user-defined wire format.
    Custom(CustomType),
}

impl Descriptor {
    /// Unsigned 8-bit lane.
    pub const U8: Self = Self::Primitive(Primitive::U8);
    /// Unsigned 16-bit lane.
    pub const U16: Self = Self::Primitive(Primitive::U16);
    /// Unsigned 32-bit lane.
    pub const U32: Self = Self::Primitive(Primitive::U32);
    /// Unsigned 64-bit lane.
    pub const U64: Self = Self::Primitive(Primitive::U64);
    /// Unsigned 128-bit lane.
    pub const U128: Self = Self::Primitive(Primitive::U128);
    /// Signed 8-bit lane.
    pub const I8: Self = Self::Primitive(Primitive::I8);
    /// Signed 16-bit lane.
    pub const I16: Self = Self::Primitive(Primitive::I16);
    /// Signed 32-bit lane.
    pub const I32: Self = Self::Primitive(Primitive::I32);
    /// Signed 64-bit lane.
    pub const I64: Self = Self::Primitive(Primitive::I64);
    /// Signed 128-bit lane.
    pub const I128: Self = Self::Primitive(Primitive::I128);
    /// Reserved half-precision float lane.
    pub const F16: Self = Self::Primitive(Primitive::F16);
    /// IEEE-754 single-precision float lane.
    pub const F32: Self = Self::Primitive(Primitive::F32);
    /// IEEE-754 double-precision float lane.
    pub const F64: Self = Self::Primitive(Primitive::F64);
    /// Reserved quad-precision float lane.
    pub const F128: Self = Self::Primitive(Primitive::F128);
    /// Boolean lane, one byte, strictly 0 or 1.
    pub const BOOL: Self = Self::Primitive(Primitive::Bool);
    /// Length-prefixed UTF-8 string lane.
    pub const STRING: Self = Self::Primitive(Primitive::String);

    /// A finite ordered sequence of shapes.
    pub fn tuple(items: impl IntoIterator<Item = Descriptor>) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    /// The arity-zero tuple. Occupies no bytes.
    pub fn unit() -> Self {
        Self::Tuple(Vec::new())
    }

    /// Exactly `len` elements of `element`, no length prefix.
    pub fn fixed_array(element: Descriptor, len: usize) -> Self {
        Self::FixedArray {
            element: Box::new(element),
            len,
        }
    }

    /// A length-prefixed run of `element`.
    pub fn collection(element: Descriptor) -> Self {
        Self::Collection(Box::new(element))
    }

    /// Alias for [`Descriptor::collection`], matching `Vec<T>`.
    pub fn vec_of(element: Descriptor) -> Self {
        Self::collection(element)
    }

    /// Alias for [`Descriptor::collection`], matching set types. Ordering
    /// and uniqueness are the caller's concern; the wire sees a plain run.
    pub fn set_of(element: Descriptor) -> Self {
        Self::collection(element)
    }

    /// A collection of key-value pairs, matching map types.
    pub fn map_of(key: Descriptor, value: Descriptor) -> Self {
        Self::collection(Self::tuple([key, value]))
    }

    /// A collection of raw bytes, matching `Vec<u8>`.
    pub fn bytes() -> Self {
        Self::collection(Self::U8)
    }

    /// Ordered named fields.
    pub fn structure<N: Into<String>>(fields: impl IntoIterator<Item = (N, Descriptor)>) -> Self {
        Self::Struct(
            fields
                .into_iter()
                .map(|(name, shape)| Field {
                    name: name.into(),
                    shape,
                })
                .collect(),
        )
    }

    /// Named variants selected by a numeric discriminant.
    pub fn enumeration(variants: impl IntoIterator<Item = Variant>) -> Self {
        Self::Enum(variants.into_iter().collect())
    }

    /// Absent or exactly one `inner`.
    pub fn option(inner: Descriptor) -> Self {
        Self::Option(Box::new(inner))
    }

    /// The standard result shape: `Ok = 0` carrying `ok`, `Err = 1`
    /// carrying `err`, each wrapped in a one-element tuple.
    pub fn result(ok: Descriptor, err: Descriptor) -> Self {
        Self::enumeration([
            Variant::tuple("Ok", 0, [ok]),
            Variant::tuple("Err", 1, [err]),
        ])
    }

    /// A user-defined wire format.
    pub fn custom(custom: CustomType) -> Self {
        Self::Custom(custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        let unit = Descriptor::unit();
        assert!(matches!(unit, Descriptor::Tuple(ref items) if items.is_empty()));

        let bytes = Descriptor::bytes();
        let Descriptor::Collection(element) = bytes else {
            panic!("bytes is not a collection");
        };
        assert!(matches!(*element, Descriptor::Primitive(Primitive::U8)));

        let map = Descriptor::map_of(Descriptor::STRING, Descriptor::U32);
        let Descriptor::Collection(entry) = map else {
            panic!("map is not a collection");
        };
        let Descriptor::Tuple(pair) = *entry else {
            panic!("map entry is not a tuple");
        };
        assert_eq!(pair.len(), 2);
    }

    #[test]
    fn test_result_shape() {
        let result = Descriptor::result(Descriptor::U32, Descriptor::STRING);
        let Descriptor::Enum(variants) = result else {
            panic!("result is not an enum");
        };
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].name, "Ok");
        assert_eq!(variants[0].discriminant, 0);
        assert!(variants[0].payload.is_some());
        assert_eq!(variants[1].name, "Err");
        assert_eq!(variants[1].discriminant, 1);
    }

    #[test]
    fn test_variant_helpers() {
        let unit = Variant::unit("Empty", 3);
        assert!(unit.payload.is_none());

        let record = Variant::record("Data", 7, [("content", Descriptor::STRING)]);
        assert!(matches!(record.payload, Some(Descriptor::Struct(_))));
    }

    #[test]
    fn test_shared() {
        // Descriptors clone cheaply enough to share across shapes.
        let inner = Descriptor::structure([("id", Descriptor::U64)]);
        let both = Descriptor::tuple([inner.clone(), Descriptor::option(inner)]);
        assert!(matches!(both, Descriptor::Tuple(ref items) if items.len() == 2));
    }
}
