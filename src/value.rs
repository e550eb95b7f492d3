//! In-memory representation of decoded and encodable data.
//!
//! [`Value`] is the language-neutral form the engine exchanges with callers:
//! integers up to 128 bits, floats, booleans, strings, ordered sequences
//! (tuples, fixed arrays, collections), field-name-keyed structs, enum
//! carriers, and options. A value carries no shape information of its own;
//! the descriptor supplies that, so the same `Sequence` can serve as a
//! tuple, a fixed array, or a collection.

use paste::paste;
use std::collections::BTreeMap;

/// A value conforming to some descriptor.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Unsigned 128-bit integer.
    U128(u128),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Signed 128-bit integer.
    I128(i128),
    /// IEEE-754 single-precision float.
    F32(f32),
    /// IEEE-754 double-precision float.
    F64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 text.
    String(String),
    /// Ordered elements of a tuple, fixed array, or collection.
    Sequence(Vec<Value>),
    /// Struct fields keyed by name.
    Struct(BTreeMap<String, Value>),
    /// An enum carrier. Callers select the variant by name and never touch
    /// the discriminant directly.
    Enum {
        /// Name of the selected variant.
        variant: String,
        /// Payload, present exactly when the descriptor's variant declares
        /// one.
        payload: Option<Box<Value>>,
    },
    /// Absent, or exactly one inner value.
    Option(Option<Box<Value>>),
}

impl Value {
    /// The unit value: an empty sequence.
    pub fn unit() -> Self {
        Self::Sequence(Vec::new())
    }

    /// An ordered sequence of values.
    pub fn sequence(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Sequence(items.into_iter().collect())
    }

    /// A struct value from named fields.
    pub fn structure<N: Into<String>>(fields: impl IntoIterator<Item = (N, Value)>) -> Self {
        Self::Struct(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// An enum carrier selecting `variant`, with an optional payload.
    pub fn enumeration(variant: impl Into<String>, payload: Option<Value>) -> Self {
        Self::Enum {
            variant: variant.into(),
            payload: payload.map(Box::new),
        }
    }

    /// A present option.
    pub fn some(inner: Value) -> Self {
        Self::Option(Some(Box::new(inner)))
    }

    /// An absent option.
    pub fn none() -> Self {
        Self::Option(None)
    }

    /// Borrows the text if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Borrows the elements if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the fields if this is a struct.
    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Borrows the variant name and payload if this is an enum carrier.
    pub fn as_enum(&self) -> Option<(&str, Option<&Value>)> {
        match self {
            Self::Enum { variant, payload } => Some((variant, payload.as_deref())),
            _ => None,
        }
    }

    /// Borrows the inner value (or its absence) if this is an option.
    pub fn as_option(&self) -> Option<Option<&Value>> {
        match self {
            Self::Option(inner) => Some(inner.as_deref()),
            _ => None,
        }
    }
}

// Generates From conversions and copying accessors for the primitive lanes.
macro_rules! impl_value_primitive {
    ($($variant:ident => $t:ty),+ $(,)?) => {
        paste! {
            $(
                impl From<$t> for Value {
                    fn from(value: $t) -> Self {
                        Self::$variant(value)
                    }
                }

                impl Value {
                    #[doc = concat!("Returns the value if this is a `", stringify!($t), "`.")]
                    pub fn [<as_ $t>](&self) -> Option<$t> {
                        match self {
                            Self::$variant(value) => Some(*value),
                            _ => None,
                        }
                    }
                }
            )+
        }
    };
}

impl_value_primitive!(
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    U128 => u128,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    I128 => i128,
    F32 => f32,
    F64 => f64,
    Bool => bool,
);

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::String(text.to_owned())
    }
}
