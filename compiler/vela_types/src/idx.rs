//! Type index handle.
//!
//! `Idx` is the canonical type representation: a 32-bit index into the
//! [`Pool`](crate::Pool). Primitive types have fixed indices so the checker
//! can name them without a pool lookup, and type equality is index equality.

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Primitive types (fixed indices, pre-interned at pool creation) ===

    pub const I8: Self = Self(0);
    pub const I16: Self = Self(1);
    pub const I32: Self = Self(2);
    pub const I64: Self = Self(3);
    pub const ISIZE: Self = Self(4);
    pub const U8: Self = Self(5);
    pub const U16: Self = Self(6);
    pub const U32: Self = Self(7);
    pub const U64: Self = Self(8);
    pub const USIZE: Self = Self(9);
    pub const F32: Self = Self(10);
    pub const F64: Self = Self(11);
    pub const CHAR: Self = Self(12);
    pub const BOOL: Self = Self(13);
    pub const UNIT: Self = Self(14);
    /// The poison type: recorded for nodes whose checking failed so that
    /// downstream passes skip them without cascading errors.
    pub const ERROR: Self = Self(15);
    /// The type of the `null` literal, assignable to any `opt` or `ptr`.
    pub const NULL: Self = Self(16);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 17;

    /// First index available for dynamically interned types.
    pub const FIRST_DYNAMIC: u32 = 32;

    /// Sentinel meaning "no type recorded".
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }

    #[inline]
    pub const fn is_unit(self) -> bool {
        self.0 == Self::UNIT.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }

    /// Human-readable name for primitives; `None` for pool types.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("i8"),
            1 => Some("i16"),
            2 => Some("i32"),
            3 => Some("i64"),
            4 => Some("isize"),
            5 => Some("u8"),
            6 => Some("u16"),
            7 => Some("u32"),
            8 => Some("u64"),
            9 => Some("usize"),
            10 => Some("f32"),
            11 => Some("f64"),
            12 => Some("char"),
            13 => Some("bool"),
            14 => Some("unit"),
            15 => Some("{error}"),
            16 => Some("null"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Idx({name})"),
            None if self.is_none() => write!(f, "Idx(NONE)"),
            None => write!(f, "Idx({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_properties() {
        assert!(Idx::I32.is_primitive());
        assert!(Idx::ERROR.is_error());
        assert!(Idx::UNIT.is_unit());
        assert!(Idx::NONE.is_none());
        assert_eq!(Idx::USIZE.name(), Some("usize"));
        assert_eq!(Idx::from_raw(100).name(), None);
    }

    #[test]
    fn equality_is_index_equality() {
        assert_eq!(Idx::I8, Idx::from_raw(0));
        assert_ne!(Idx::I8, Idx::U8);
    }
}
