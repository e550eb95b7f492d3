//! Encoding configuration.
//!
//! Three orthogonal knobs control the wire format: byte order, integer
//! encoding mode, and an optional byte limit. [`Config::standard()`] matches
//! the reference bincode "standard" configuration (little endian, variable
//! integer encoding); [`Config::legacy()`] matches the fixed-width legacy
//! configuration. Both peers must agree on the configuration, since the
//! format is not self-describing.

/// Byte order applied to every multi-byte primitive and varint payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    /// Least-significant byte first.
    Little,
    /// Most-significant byte first.
    Big,
}

/// How multi-byte integers, lengths, and discriminants are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntEncoding {
    /// Raw fixed-width bytes, no tagging, no zigzag.
    Fixed,
    /// Prefix-tagged variable-length encoding, zigzag for signed types.
    Variant,
}

/// Configuration for encoding and decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Byte order of multi-byte primitives and varint payloads.
    pub endian: Endian,
    /// Integer encoding mode for widths above 8 bits.
    pub int_encoding: IntEncoding,
    /// Maximum total bytes any single call may touch. `None` means the
    /// buffer bound alone applies.
    pub limit: Option<u64>,
}

impl Config {
    /// The reference bincode standard configuration: little endian, variable
    /// integer encoding, no limit.
    pub const fn standard() -> Self {
        Self {
            endian: Endian::Little,
            int_encoding: IntEncoding::Variant,
            limit: None,
        }
    }

    /// The legacy configuration: little endian, fixed-width integers, no
    /// limit.
    pub const fn legacy() -> Self {
        Self {
            endian: Endian::Little,
            int_encoding: IntEncoding::Fixed,
            limit: None,
        }
    }

    /// Returns the configuration with big-endian byte order.
    pub const fn with_big_endian(mut self) -> Self {
        self.endian = Endian::Big;
        self
    }

    /// Returns the configuration with little-endian byte order.
    pub const fn with_little_endian(mut self) -> Self {
        self.endian = Endian::Little;
        self
    }

    /// Returns the configuration with fixed-width integer encoding.
    pub const fn with_fixed_int_encoding(mut self) -> Self {
        self.int_encoding = IntEncoding::Fixed;
        self
    }

    /// Returns the configuration with variable integer encoding.
    pub const fn with_variant_int_encoding(mut self) -> Self {
        self.int_encoding = IntEncoding::Variant;
        self
    }

    /// Returns the configuration with a byte limit.
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the configuration with no byte limit.
    pub const fn with_no_limit(mut self) -> Self {
        self.limit = None;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard() {
        let cfg = Config::standard();
        assert_eq!(cfg.endian, Endian::Little);
        assert_eq!(cfg.int_encoding, IntEncoding::Variant);
        assert_eq!(cfg.limit, None);
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_legacy() {
        let cfg = Config::legacy();
        assert_eq!(cfg.endian, Endian::Little);
        assert_eq!(cfg.int_encoding, IntEncoding::Fixed);
        assert_eq!(cfg.limit, None);
    }

    #[test]
    fn test_builders() {
        let cfg = Config::standard()
            .with_big_endian()
            .with_fixed_int_encoding()
            .with_limit(16);
        assert_eq!(cfg.endian, Endian::Big);
        assert_eq!(cfg.int_encoding, IntEncoding::Fixed);
        assert_eq!(cfg.limit, Some(16));

        let cfg = cfg
            .with_little_endian()
            .with_variant_int_encoding()
            .with_no_limit();
        assert_eq!(cfg, Config::standard());
    }
}
