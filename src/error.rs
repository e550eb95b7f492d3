//! Error types returned by encode and decode operations.

use thiserror::Error;

/// Failure modes of the codec.
///
/// Every failure classifies under exactly one kind. An inner failure aborts
/// the whole operation; a corrupted descriptor or stream cannot be safely
/// continued past the first violation, so no recovery is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A descriptor kind that is reserved but not supported (e.g. `f16`).
    #[error("unimplemented: {0}")]
    Unimplemented(&'static str),

    /// A read or write would cross the end of the buffer or the configured
    /// byte limit.
    #[error("access of {needed} bytes at offset {offset} exceeds bound {bound}")]
    OverflowLimit {
        /// Offset at which the access started.
        offset: usize,
        /// Width of the rejected access.
        needed: usize,
        /// First inaccessible byte index (buffer end or configured limit).
        bound: usize,
    },

    /// A length prefix or collection count is nonsensical.
    #[error("invalid length {0}")]
    InvalidLength(u128),

    /// An enum discriminant on the wire matches no declared variant.
    #[error("unknown enum discriminant {0}")]
    InvalidVariant(u32),

    /// An option tag byte is neither `0` nor `1`.
    #[error("invalid option tag {0}")]
    InvalidOptionVariant(u8),

    /// A descriptor or value is malformed, or a primitive byte is outside
    /// its nominal domain.
    #[error("invalid {0}: {1}")]
    InvalidType(&'static str, &'static str),

    /// A varint marker byte is unknown, or a decoded integer exceeds the
    /// range of its target width.
    #[error("value out of range for {0}")]
    BigintOutOfRange(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::OverflowLimit {
            offset: 7,
            needed: 4,
            bound: 8,
        };
        assert_eq!(
            err.to_string(),
            "access of 4 bytes at offset 7 exceeds bound 8"
        );
        assert_eq!(
            Error::InvalidType("bool", "byte outside 0/1").to_string(),
            "invalid bool: byte outside 0/1"
        );
    }
}
