//! Pre-computed type property flags.
//!
//! Each pool item carries a `TypeFlags` value so property queries are a
//! single bit test instead of a tag walk.

use bitflags::bitflags;

bitflags! {
    /// Properties of a type, computed once at interning time.
    #[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
    pub struct TypeFlags: u16 {
        /// An integer type (any width, either signedness).
        const INTEGER = 1 << 0;
        /// A signed integer type.
        const SIGNED = 1 << 1;
        /// A floating-point type.
        const FLOAT = 1 << 2;
        /// Integer or float.
        const ARITHMETIC = 1 << 3;
        /// Struct, union, or enum.
        const COMPOSITE = 1 << 4;
        /// The type or one of its components is the poison type.
        const HAS_ERROR = 1 << 5;
        /// A reference-category type (`ref ...`).
        const REFERENCE = 1 << 6;
        /// Contains a `mut` modifier at the top of the stripped chain.
        const MUTABLE = 1 << 7;
        /// Vector or matrix extension type.
        const LINEAR = 1 << 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_composition() {
        let flags = TypeFlags::INTEGER | TypeFlags::SIGNED | TypeFlags::ARITHMETIC;
        assert!(flags.contains(TypeFlags::INTEGER));
        assert!(flags.contains(TypeFlags::ARITHMETIC));
        assert!(!flags.contains(TypeFlags::FLOAT));
    }
}
