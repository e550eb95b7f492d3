//! Serialize structured data with the bincode wire format.
//!
//! # Overview
//!
//! A binary codec driven by runtime type descriptors. Given a [`Descriptor`]
//! naming a shape and a [`Value`] conforming to it, [`encode`] produces the
//! exact bytes the reference bincode implementation would, and [`decode`]
//! reconstructs the value from those bytes. The format is deterministic and
//! non-self-describing: both peers must hold the same descriptor and
//! [`Config`].
//!
//! # Supported Shapes
//!
//! - Primitives: `u8`..`u128`, `i8`..`i128`, `f32`, `f64`, `bool`, strings
//! - Tuples, fixed arrays, length-prefixed collections
//! - Structs (ordered named fields), enums (named variants with numeric
//!   discriminants), options
//! - User-defined wire formats via [`CustomType`]
//!
//! Under the standard configuration, multi-byte integers, lengths, and
//! discriminants use a prefix-tagged variable-length encoding with zigzag
//! for signed lanes; the legacy configuration writes raw fixed-width bytes
//! instead. See [`varint`] for the tag scheme.
//!
//! # Example
//!
//! ```
//! use bincodec::{decode, encode_to_vec, Config, Descriptor, Value};
//!
//! // struct Point { x: u32, y: u32 }
//! let point = Descriptor::structure([
//!     ("x", Descriptor::U32),
//!     ("y", Descriptor::U32),
//! ]);
//! let value = Value::structure([
//!     ("x", Value::U32(3)),
//!     ("y", Value::U32(300)),
//! ]);
//!
//! let cfg = Config::standard();
//! let bytes = encode_to_vec(&point, &value, &cfg).unwrap();
//! assert_eq!(bytes, [3, 251, 44, 1]);
//!
//! let (decoded, read) = decode(&point, &bytes, 0, &cfg).unwrap();
//! assert_eq!(read, bytes.len());
//! assert_eq!(decoded, value);
//! ```
//!
//! # Safety Against Untrusted Input
//!
//! Every quantity read from the wire is validated: lengths against the
//! remaining input and the optional byte limit, discriminants against the
//! declared variants, option tags and bool bytes against their domains,
//! text against UTF-8. A failure aborts the whole operation with a single
//! [`Error`] kind; nothing is ever silently truncated.

pub mod buffer;
pub mod config;
pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod error;
pub mod value;
pub mod varint;

// Re-export main types and operations.
pub use buffer::{Reader, Writer};
pub use config::{Config, Endian, IntEncoding};
pub use decode::decode;
pub use descriptor::{CustomType, Descriptor, Field, Primitive, Variant};
pub use encode::{encode, encode_size, encode_to_bytes, encode_to_vec};
pub use error::Error;
pub use value::Value;
