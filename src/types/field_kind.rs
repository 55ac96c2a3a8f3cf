//! Field kind definitions

use serde::{Deserialize, Serialize};

/// Size of a fixed-string field in bytes, including the NUL terminator.
pub const FIXED_STRING_LEN: usize = 32;

/// Storage kinds a snapshot field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// 64-bit IEEE float, little-endian
    Float64,
    /// NUL-padded string of [`FIXED_STRING_LEN`] bytes
    FixedString,
}

impl FieldKind {
    /// Returns the size in bytes of this kind on the wire.
    pub const fn size(&self) -> usize {
        match self {
            FieldKind::Float64 => 8,
            FieldKind::FixedString => FIXED_STRING_LEN,
        }
    }

    /// Short name used in error messages.
    pub const fn label(&self) -> &'static str {
        match self {
            FieldKind::Float64 => "float64",
            FieldKind::FixedString => "fixed-string",
        }
    }
}

/// Where a field's value comes from.
///
/// Origins must appear in `Link*, Host*, Derived*` order within a schema so
/// that the host blob maps onto one contiguous byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldOrigin {
    /// Owned by the link itself (the connection flag)
    Link,
    /// Delivered by the simulator every cycle
    Host,
    /// Computed by the engine after the host data arrives
    Derived,
}
