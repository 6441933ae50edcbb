//! Unified type pool - single source of truth for all types.
//!
//! The pool stores every type descriptor of a compilation unit exactly
//! once. Types are referenced by [`Idx`]; equal structure means equal
//! index, so type equality never walks the graph. Nominal types (struct,
//! union, enum) key on their defining declaration, not on field structure.
//!
//! Modifier legality is exposed through the `can_add_*` predicates, which
//! callers consult before building. Constructors propagate the poison
//! type: wrapping `Idx::ERROR` yields `Idx::ERROR`.

use rustc_hash::FxHashMap;
use vela_ir::{CallConv, DeclId};

use crate::{Idx, TypeFlags};

/// Type constructor tags.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Tag {
    // Primitives (fixed indices)
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Char,
    Bool,
    Unit,
    Error,
    Null,

    // Modifiers
    Mut,
    Const,
    Ptr,
    Ref,
    Opt,

    // Aggregates
    Array,
    Vector,
    Matrix,
    Fun,
    Struct,
    Union,
    Enum,
}

/// One pool entry: a tag plus either a base index (modifiers) or an
/// offset into the extra array (aggregates).
#[derive(Copy, Clone, Debug)]
struct Item {
    tag: Tag,
    data: u32,
}

/// Content key used for deduplication.
#[derive(Clone, Eq, PartialEq, Hash)]
struct ItemKey {
    tag: Tag,
    words: Vec<u32>,
}

/// The type pool.
pub struct Pool {
    items: Vec<Item>,
    flags: Vec<TypeFlags>,
    /// Variable-length payloads for aggregate types.
    extra: Vec<u32>,
    /// Content -> index map for deduplication.
    intern_map: FxHashMap<ItemKey, Idx>,
}

impl Pool {
    pub fn new() -> Self {
        let mut pool = Pool {
            items: Vec::with_capacity(64),
            flags: Vec::with_capacity(64),
            extra: Vec::with_capacity(256),
            intern_map: FxHashMap::default(),
        };
        pool.intern_primitives();
        pool
    }

    fn intern_primitives(&mut self) {
        use Tag as T;
        let prims = [
            (T::I8, Idx::I8),
            (T::I16, Idx::I16),
            (T::I32, Idx::I32),
            (T::I64, Idx::I64),
            (T::Isize, Idx::ISIZE),
            (T::U8, Idx::U8),
            (T::U16, Idx::U16),
            (T::U32, Idx::U32),
            (T::U64, Idx::U64),
            (T::Usize, Idx::USIZE),
            (T::F32, Idx::F32),
            (T::F64, Idx::F64),
            (T::Char, Idx::CHAR),
            (T::Bool, Idx::BOOL),
            (T::Unit, Idx::UNIT),
            (T::Error, Idx::ERROR),
            (T::Null, Idx::NULL),
        ];
        for (tag, expected) in prims {
            let idx = Idx::from_raw(self.items.len() as u32);
            debug_assert_eq!(idx, expected, "primitive index mismatch for {tag:?}");
            self.items.push(Item { tag, data: 0 });
            self.flags.push(Self::primitive_flags(tag));
        }
        // Pad to FIRST_DYNAMIC so dynamic indices never collide with
        // reserved primitive slots.
        while (self.items.len() as u32) < Idx::FIRST_DYNAMIC {
            self.items.push(Item {
                tag: Tag::Error,
                data: 0,
            });
            self.flags.push(TypeFlags::HAS_ERROR);
        }
    }

    fn primitive_flags(tag: Tag) -> TypeFlags {
        use Tag as T;
        match tag {
            T::I8 | T::I16 | T::I32 | T::I64 | T::Isize => {
                TypeFlags::INTEGER | TypeFlags::SIGNED | TypeFlags::ARITHMETIC
            }
            T::U8 | T::U16 | T::U32 | T::U64 | T::Usize => {
                TypeFlags::INTEGER | TypeFlags::ARITHMETIC
            }
            T::F32 | T::F64 => TypeFlags::FLOAT | TypeFlags::ARITHMETIC,
            T::Error => TypeFlags::HAS_ERROR,
            _ => TypeFlags::empty(),
        }
    }

    // --- Interning ---

    fn intern(&mut self, tag: Tag, key_words: Vec<u32>, flags: TypeFlags, extra: &[u32]) -> Idx {
        let key = ItemKey {
            tag,
            words: key_words,
        };
        if let Some(&idx) = self.intern_map.get(&key) {
            return idx;
        }

        let data = if extra.is_empty() {
            // Modifier: the single key word is the base index.
            key.words.first().copied().unwrap_or(0)
        } else {
            let offset = self.extra.len() as u32;
            self.extra.extend_from_slice(extra);
            offset
        };

        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(Item { tag, data });
        self.flags.push(flags);
        self.intern_map.insert(key, idx);
        idx
    }

    fn wrapper_flags(&self, tag: Tag, base: Idx) -> TypeFlags {
        let mut flags = TypeFlags::empty();
        if self.flags(base).contains(TypeFlags::HAS_ERROR) {
            flags |= TypeFlags::HAS_ERROR;
        }
        match tag {
            Tag::Ref => flags | TypeFlags::REFERENCE,
            Tag::Mut => flags | TypeFlags::MUTABLE,
            _ => flags,
        }
    }

    // --- Modifier legality ---

    /// `mut` may only wrap a type that is not already `mut`.
    pub fn can_add_mut(&self, base: Idx) -> bool {
        !matches!(self.tag(base), Tag::Mut | Tag::Ref)
    }

    /// `const` may only wrap a type that is not already `const`.
    pub fn can_add_const(&self, base: Idx) -> bool {
        self.tag(base) != Tag::Const
    }

    /// Pointers may wrap any type.
    pub fn can_add_ptr(&self, _base: Idx) -> bool {
        true
    }

    /// References may wrap any non-reference type.
    pub fn can_add_ref(&self, base: Idx) -> bool {
        self.tag(base) != Tag::Ref
    }

    /// Arrays may wrap any non-optional element.
    pub fn can_add_array(&self, base: Idx) -> bool {
        self.tag(base) != Tag::Opt
    }

    /// Optionals may only wrap non-optional types.
    pub fn can_add_opt(&self, base: Idx) -> bool {
        self.tag(base) != Tag::Opt
    }

    // --- Constructors ---

    pub fn mut_of(&mut self, base: Idx) -> Idx {
        if base.is_error() {
            return Idx::ERROR;
        }
        debug_assert!(self.can_add_mut(base));
        let flags = self.wrapper_flags(Tag::Mut, base);
        self.intern(Tag::Mut, vec![base.raw()], flags, &[])
    }

    pub fn const_of(&mut self, base: Idx) -> Idx {
        if base.is_error() {
            return Idx::ERROR;
        }
        debug_assert!(self.can_add_const(base));
        let flags = self.wrapper_flags(Tag::Const, base);
        self.intern(Tag::Const, vec![base.raw()], flags, &[])
    }

    pub fn ptr_to(&mut self, base: Idx) -> Idx {
        if base.is_error() {
            return Idx::ERROR;
        }
        let flags = self.wrapper_flags(Tag::Ptr, base);
        self.intern(Tag::Ptr, vec![base.raw()], flags, &[])
    }

    pub fn ref_to(&mut self, base: Idx) -> Idx {
        if base.is_error() {
            return Idx::ERROR;
        }
        debug_assert!(self.can_add_ref(base));
        let flags = self.wrapper_flags(Tag::Ref, base);
        self.intern(Tag::Ref, vec![base.raw()], flags, &[])
    }

    pub fn opt_of(&mut self, base: Idx) -> Idx {
        if base.is_error() {
            return Idx::ERROR;
        }
        debug_assert!(self.can_add_opt(base));
        let flags = self.wrapper_flags(Tag::Opt, base);
        self.intern(Tag::Opt, vec![base.raw()], flags, &[])
    }

    pub fn array_of(&mut self, len: u32, elem: Idx) -> Idx {
        if elem.is_error() {
            return Idx::ERROR;
        }
        debug_assert!(self.can_add_array(elem));
        let flags = self.wrapper_flags(Tag::Array, elem) & TypeFlags::HAS_ERROR;
        let words = vec![len, elem.raw()];
        self.intern(Tag::Array, words.clone(), flags, &words)
    }

    pub fn vec_of(&mut self, len: u32, elem: Idx) -> Idx {
        if elem.is_error() {
            return Idx::ERROR;
        }
        let flags = TypeFlags::LINEAR;
        let words = vec![len, elem.raw()];
        self.intern(Tag::Vector, words.clone(), flags, &words)
    }

    pub fn mat_of(&mut self, rows: u32, cols: u32, elem: Idx) -> Idx {
        if elem.is_error() {
            return Idx::ERROR;
        }
        let flags = TypeFlags::LINEAR;
        let words = vec![rows, cols, elem.raw()];
        self.intern(Tag::Matrix, words.clone(), flags, &words)
    }

    /// Function type. Uniqueness includes the calling convention and the
    /// varargs flag.
    pub fn fun_of(&mut self, ret: Idx, params: &[Idx], is_vararg: bool, callconv: CallConv) -> Idx {
        let packed = callconv_code(callconv) | u32::from(is_vararg) << 8;
        let mut words = vec![ret.raw(), packed, params.len() as u32];
        words.extend(params.iter().map(|p| p.raw()));
        self.intern(Tag::Fun, words.clone(), TypeFlags::empty(), &words)
    }

    /// Struct type; identity keys on the defining declaration.
    pub fn struct_of(&mut self, decl: DeclId, fields: &[Idx]) -> Idx {
        let mut words = vec![decl.raw(), fields.len() as u32];
        words.extend(fields.iter().map(|f| f.raw()));
        // Nominal identity: the key is the declaration alone.
        let key = vec![decl.raw()];
        self.intern_nominal(Tag::Struct, key, TypeFlags::COMPOSITE, &words)
    }

    /// Union type; identity keys on the defining declaration.
    pub fn union_of(&mut self, decl: DeclId, fields: &[Idx]) -> Idx {
        let mut words = vec![decl.raw(), fields.len() as u32];
        words.extend(fields.iter().map(|f| f.raw()));
        let key = vec![decl.raw()];
        self.intern_nominal(Tag::Union, key, TypeFlags::COMPOSITE, &words)
    }

    /// Enum type; identity keys on the defining declaration.
    pub fn enum_of(&mut self, decl: DeclId, constant_count: u32) -> Idx {
        let words = vec![decl.raw(), constant_count];
        let key = vec![decl.raw()];
        self.intern_nominal(Tag::Enum, key, TypeFlags::COMPOSITE, &words)
    }

    /// Nominal interning: the dedup key may be narrower than the payload.
    fn intern_nominal(
        &mut self,
        tag: Tag,
        key_words: Vec<u32>,
        flags: TypeFlags,
        extra: &[u32],
    ) -> Idx {
        let key = ItemKey {
            tag,
            words: key_words,
        };
        if let Some(&idx) = self.intern_map.get(&key) {
            return idx;
        }
        let offset = self.extra.len() as u32;
        self.extra.extend_from_slice(extra);
        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(Item { tag, data: offset });
        self.flags.push(flags);
        self.intern_map.insert(key, idx);
        idx
    }

    // --- Accessors ---

    #[inline]
    pub fn tag(&self, idx: Idx) -> Tag {
        self.items[idx.raw() as usize].tag
    }

    #[inline]
    pub fn flags(&self, idx: Idx) -> TypeFlags {
        self.flags[idx.raw() as usize]
    }

    /// The wrapped type of a modifier (`mut`/`const`/`ptr`/`ref`/`opt`).
    pub fn base(&self, idx: Idx) -> Idx {
        debug_assert!(matches!(
            self.tag(idx),
            Tag::Mut | Tag::Const | Tag::Ptr | Tag::Ref | Tag::Opt
        ));
        Idx::from_raw(self.items[idx.raw() as usize].data)
    }

    fn extra_at(&self, idx: Idx) -> &[u32] {
        let offset = self.items[idx.raw() as usize].data as usize;
        &self.extra[offset..]
    }

    /// Array length.
    pub fn array_len(&self, idx: Idx) -> u32 {
        debug_assert_eq!(self.tag(idx), Tag::Array);
        self.extra_at(idx)[0]
    }

    /// Element type of an array or vector.
    pub fn elem_type(&self, idx: Idx) -> Idx {
        match self.tag(idx) {
            Tag::Array | Tag::Vector => Idx::from_raw(self.extra_at(idx)[1]),
            Tag::Matrix => Idx::from_raw(self.extra_at(idx)[2]),
            _ => unreachable!("elem_type on non-sequence type"),
        }
    }

    /// Vector length.
    pub fn vector_len(&self, idx: Idx) -> u32 {
        debug_assert_eq!(self.tag(idx), Tag::Vector);
        self.extra_at(idx)[0]
    }

    /// Matrix dimensions (rows, cols).
    pub fn matrix_dims(&self, idx: Idx) -> (u32, u32) {
        debug_assert_eq!(self.tag(idx), Tag::Matrix);
        let extra = self.extra_at(idx);
        (extra[0], extra[1])
    }

    /// Function return type.
    pub fn fun_return(&self, idx: Idx) -> Idx {
        debug_assert_eq!(self.tag(idx), Tag::Fun);
        Idx::from_raw(self.extra_at(idx)[0])
    }

    /// Function parameter types.
    pub fn fun_params(&self, idx: Idx) -> Vec<Idx> {
        debug_assert_eq!(self.tag(idx), Tag::Fun);
        let extra = self.extra_at(idx);
        let count = extra[2] as usize;
        extra[3..3 + count].iter().map(|&p| Idx::from_raw(p)).collect()
    }

    pub fn fun_is_vararg(&self, idx: Idx) -> bool {
        debug_assert_eq!(self.tag(idx), Tag::Fun);
        self.extra_at(idx)[1] >> 8 & 1 == 1
    }

    pub fn fun_callconv(&self, idx: Idx) -> CallConv {
        debug_assert_eq!(self.tag(idx), Tag::Fun);
        callconv_from_code(self.extra_at(idx)[1] & 0xFF)
    }

    /// Defining declaration of a struct/union/enum.
    pub fn nominal_decl(&self, idx: Idx) -> DeclId {
        debug_assert!(matches!(
            self.tag(idx),
            Tag::Struct | Tag::Union | Tag::Enum
        ));
        DeclId::from_raw(self.extra_at(idx)[0])
    }

    /// Field types of a struct or union.
    pub fn nominal_fields(&self, idx: Idx) -> Vec<Idx> {
        debug_assert!(matches!(self.tag(idx), Tag::Struct | Tag::Union));
        let extra = self.extra_at(idx);
        let count = extra[1] as usize;
        extra[2..2 + count].iter().map(|&f| Idx::from_raw(f)).collect()
    }

    /// Number of constants of an enum.
    pub fn enum_constant_count(&self, idx: Idx) -> u32 {
        debug_assert_eq!(self.tag(idx), Tag::Enum);
        self.extra_at(idx)[1]
    }

    // --- Stripping ---

    /// Remove one `mut` layer, if present.
    pub fn remove_mut(&self, idx: Idx) -> Idx {
        if self.tag(idx) == Tag::Mut {
            self.base(idx)
        } else {
            idx
        }
    }

    /// Remove `const` and `mut` layers.
    pub fn remove_const_mut(&self, mut idx: Idx) -> Idx {
        while matches!(self.tag(idx), Tag::Const | Tag::Mut) {
            idx = self.base(idx);
        }
        idx
    }

    /// Remove `const`/`mut`, then one `ref` layer.
    pub fn remove_const_mut_ref(&self, idx: Idx) -> Idx {
        let stripped = self.remove_const_mut(idx);
        if self.tag(stripped) == Tag::Ref {
            self.base(stripped)
        } else {
            stripped
        }
    }

    /// The value type behind any chain of `const`/`mut`/`ref` modifiers.
    pub fn underlying(&self, mut idx: Idx) -> Idx {
        loop {
            match self.tag(idx) {
                Tag::Const | Tag::Mut | Tag::Ref => idx = self.base(idx),
                _ => return idx,
            }
        }
    }

    /// Check whether an expression type denotes an addressable l-value.
    pub fn is_reference(&self, idx: Idx) -> bool {
        self.tag(self.remove_const_mut(idx)) == Tag::Ref
    }

    /// Check whether a reference's target is mutable: `ref(mut T)`.
    pub fn is_mutable_reference(&self, idx: Idx) -> bool {
        let stripped = self.remove_const_mut(idx);
        self.tag(stripped) == Tag::Ref && self.tag(self.base(stripped)) == Tag::Mut
    }

    // --- Classification ---

    pub fn is_integer(&self, idx: Idx) -> bool {
        self.flags(idx).contains(TypeFlags::INTEGER)
    }

    pub fn is_signed(&self, idx: Idx) -> bool {
        self.flags(idx).contains(TypeFlags::SIGNED)
    }

    pub fn is_float(&self, idx: Idx) -> bool {
        self.flags(idx).contains(TypeFlags::FLOAT)
    }

    pub fn is_arithmetic(&self, idx: Idx) -> bool {
        self.flags(idx).contains(TypeFlags::ARITHMETIC)
    }

    pub fn is_composite(&self, idx: Idx) -> bool {
        self.flags(idx).contains(TypeFlags::COMPOSITE)
    }

    /// Bit width of an integer type; `isize`/`usize` use the 64-bit
    /// target word.
    pub fn int_bit_width(&self, idx: Idx) -> Option<u32> {
        Some(match idx {
            Idx::I8 | Idx::U8 => 8,
            Idx::I16 | Idx::U16 => 16,
            Idx::I32 | Idx::U32 => 32,
            Idx::I64 | Idx::U64 | Idx::ISIZE | Idx::USIZE => 64,
            _ => return None,
        })
    }

    /// Check whether an (unsigned) literal value fits a concrete integer
    /// type. Signed targets lose one bit to the sign.
    pub fn literal_fits(&self, value: u64, idx: Idx) -> bool {
        let Some(width) = self.int_bit_width(idx) else {
            return false;
        };
        let usable = if self.is_signed(idx) { width - 1 } else { width };
        if usable >= 64 {
            return true;
        }
        value < 1u64 << usable
    }

    /// The promoted common type of two arithmetic primitives: floats
    /// dominate integers, wider widths dominate narrower, and equal-width
    /// signed/unsigned promote to signed.
    pub fn promote(&self, a: Idx, b: Idx) -> Idx {
        if a == b {
            return a;
        }
        if self.is_float(a) || self.is_float(b) {
            return if a == Idx::F64 || b == Idx::F64 {
                Idx::F64
            } else if self.is_float(a) {
                a
            } else {
                b
            };
        }
        let (wa, wb) = match (self.int_bit_width(a), self.int_bit_width(b)) {
            (Some(wa), Some(wb)) => (wa, wb),
            _ => return Idx::ERROR,
        };
        match wa.cmp(&wb) {
            std::cmp::Ordering::Greater => a,
            std::cmp::Ordering::Less => b,
            std::cmp::Ordering::Equal => {
                if self.is_signed(a) {
                    a
                } else {
                    b
                }
            }
        }
    }

    // --- Conversion ---

    /// Implicit conversion check: the value of `from` (stripping its
    /// reference category and qualifiers) may initialize a slot of `to`.
    pub fn is_implicitly_convertible(&self, from: Idx, to: Idx) -> bool {
        if from.is_none() || to.is_none() {
            return false;
        }
        let from = self.underlying(from);
        let to = self.remove_const_mut(to);
        // Poison converts both ways so one error does not cascade.
        if from.is_error() || to.is_error() {
            return true;
        }
        if from == to {
            return true;
        }
        // null into any optional or pointer
        if from.is_null() && matches!(self.tag(to), Tag::Opt | Tag::Ptr) {
            return true;
        }
        // T into ?T
        if self.tag(to) == Tag::Opt && self.is_implicitly_convertible(from, self.base(to)) {
            return true;
        }
        // integer widening within one signedness
        if self.is_integer(from) && self.is_integer(to) {
            let (Some(wf), Some(wt)) = (self.int_bit_width(from), self.int_bit_width(to)) else {
                return false;
            };
            return self.is_signed(from) == self.is_signed(to) && wf <= wt;
        }
        // float widening
        if from == Idx::F32 && to == Idx::F64 {
            return true;
        }
        false
    }

    /// Explicit `as`-cast legality: arithmetic to arithmetic (including
    /// char as an integer source/target), pointer to pointer, and enum to
    /// integer.
    pub fn is_explicitly_convertible(&self, from: Idx, to: Idx) -> bool {
        let from = self.underlying(from);
        let to = self.remove_const_mut(to);
        if from.is_error() || to.is_error() {
            return true;
        }
        let arith_like =
            |idx: Idx| self.is_arithmetic(idx) || idx == Idx::CHAR || idx == Idx::BOOL;
        if arith_like(from) && arith_like(to) {
            return true;
        }
        if self.tag(from) == Tag::Ptr && self.tag(to) == Tag::Ptr {
            return true;
        }
        if self.tag(from) == Tag::Enum && self.is_integer(to) {
            return true;
        }
        self.is_implicitly_convertible(from, to)
    }

    /// Total number of interned items (for table sizing and tests).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

fn callconv_code(cc: CallConv) -> u32 {
    match cc {
        CallConv::Cdecl => 0,
        CallConv::Stdcall => 1,
        CallConv::Fastcall => 2,
        CallConv::Thiscall => 3,
        CallConv::Vectorcall => 4,
        CallConv::Win64 => 5,
        CallConv::Sysv64 => 6,
        CallConv::Aapcs => 7,
    }
}

fn callconv_from_code(code: u32) -> CallConv {
    match code {
        1 => CallConv::Stdcall,
        2 => CallConv::Fastcall,
        3 => CallConv::Thiscall,
        4 => CallConv::Vectorcall,
        5 => CallConv::Win64,
        6 => CallConv::Sysv64,
        7 => CallConv::Aapcs,
        _ => CallConv::Cdecl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn interning_dedupes() {
        let mut pool = Pool::new();
        let a = pool.ptr_to(Idx::U8);
        let b = pool.ptr_to(Idx::U8);
        assert_eq!(a, b);
        let c = pool.ptr_to(Idx::U16);
        assert_ne!(a, c);
    }

    #[test]
    fn modifier_chain_round_trips() {
        let mut pool = Pool::new();
        let mut_i32 = pool.mut_of(Idx::I32);
        let ref_mut_i32 = pool.ref_to(mut_i32);
        assert_eq!(pool.tag(ref_mut_i32), Tag::Ref);
        assert_eq!(pool.base(ref_mut_i32), mut_i32);
        assert_eq!(pool.underlying(ref_mut_i32), Idx::I32);
        assert!(pool.is_reference(ref_mut_i32));
        assert!(pool.is_mutable_reference(ref_mut_i32));

        let ref_i32 = pool.ref_to(Idx::I32);
        assert!(pool.is_reference(ref_i32));
        assert!(!pool.is_mutable_reference(ref_i32));
    }

    #[test]
    fn modifier_legality() {
        let mut pool = Pool::new();
        let mut_i32 = pool.mut_of(Idx::I32);
        assert!(!pool.can_add_mut(mut_i32));
        assert!(pool.can_add_mut(Idx::I32));

        let opt_i32 = pool.opt_of(Idx::I32);
        assert!(!pool.can_add_opt(opt_i32));
        assert!(!pool.can_add_array(opt_i32));
        assert!(pool.can_add_array(Idx::I32));
    }

    #[test]
    fn poison_propagates_through_constructors() {
        let mut pool = Pool::new();
        assert!(pool.ptr_to(Idx::ERROR).is_error());
        assert!(pool.opt_of(Idx::ERROR).is_error());
        assert!(pool.array_of(4, Idx::ERROR).is_error());
    }

    #[test]
    fn fun_uniqueness_includes_callconv_and_varargs() {
        let mut pool = Pool::new();
        let a = pool.fun_of(Idx::UNIT, &[Idx::I32], false, CallConv::Cdecl);
        let b = pool.fun_of(Idx::UNIT, &[Idx::I32], false, CallConv::Cdecl);
        assert_eq!(a, b);
        let vararg = pool.fun_of(Idx::UNIT, &[Idx::I32], true, CallConv::Cdecl);
        assert_ne!(a, vararg);
        let stdcall = pool.fun_of(Idx::UNIT, &[Idx::I32], false, CallConv::Stdcall);
        assert_ne!(a, stdcall);

        assert_eq!(pool.fun_return(a), Idx::UNIT);
        assert_eq!(pool.fun_params(a), vec![Idx::I32]);
        assert!(pool.fun_is_vararg(vararg));
        assert_eq!(pool.fun_callconv(stdcall), CallConv::Stdcall);
    }

    #[test]
    fn nominal_identity_keys_on_declaration() {
        let mut pool = Pool::new();
        let decl_a = DeclId::from_raw(1);
        let decl_b = DeclId::from_raw(2);
        // same field structure, different declarations
        let a = pool.struct_of(decl_a, &[Idx::I32]);
        let b = pool.struct_of(decl_b, &[Idx::I32]);
        assert_ne!(a, b);
        // same declaration interns once
        assert_eq!(pool.struct_of(decl_a, &[Idx::I32]), a);
        assert_eq!(pool.nominal_decl(a), decl_a);
        assert_eq!(pool.nominal_fields(a), vec![Idx::I32]);
    }

    #[test]
    fn promotion_lattice() {
        let pool = Pool::new();
        // floats dominate integers
        assert_eq!(pool.promote(Idx::I64, Idx::F32), Idx::F32);
        assert_eq!(pool.promote(Idx::F32, Idx::F64), Idx::F64);
        // wider integers dominate narrower
        assert_eq!(pool.promote(Idx::I64, Idx::I32), Idx::I64);
        assert_eq!(pool.promote(Idx::U8, Idx::U32), Idx::U32);
        // same width, mixed signedness promotes to signed
        assert_eq!(pool.promote(Idx::U32, Idx::I32), Idx::I32);
    }

    #[test]
    fn implicit_conversions() {
        let mut pool = Pool::new();
        assert!(pool.is_implicitly_convertible(Idx::I32, Idx::I64));
        assert!(!pool.is_implicitly_convertible(Idx::I64, Idx::I32));
        assert!(!pool.is_implicitly_convertible(Idx::I32, Idx::U32));
        assert!(pool.is_implicitly_convertible(Idx::F32, Idx::F64));

        // references strip to their value type
        let mut_i32 = pool.mut_of(Idx::I32);
        let ref_mut_i32 = pool.ref_to(mut_i32);
        assert!(pool.is_implicitly_convertible(ref_mut_i32, Idx::I32));

        // null into optionals and pointers
        let opt_i32 = pool.opt_of(Idx::I32);
        let ptr_u8 = pool.ptr_to(Idx::U8);
        assert!(pool.is_implicitly_convertible(Idx::NULL, opt_i32));
        assert!(pool.is_implicitly_convertible(Idx::NULL, ptr_u8));
        assert!(!pool.is_implicitly_convertible(Idx::NULL, Idx::I32));

        // T into ?T
        assert!(pool.is_implicitly_convertible(Idx::I32, opt_i32));

        // poison converts silently
        assert!(pool.is_implicitly_convertible(Idx::ERROR, Idx::I32));
        assert!(pool.is_implicitly_convertible(Idx::I32, Idx::ERROR));
    }

    #[test]
    fn explicit_conversions() {
        let mut pool = Pool::new();
        assert!(pool.is_explicitly_convertible(Idx::I64, Idx::I32));
        assert!(pool.is_explicitly_convertible(Idx::F64, Idx::U8));
        assert!(pool.is_explicitly_convertible(Idx::CHAR, Idx::U32));
        let ptr_a = pool.ptr_to(Idx::U8);
        let ptr_b = pool.ptr_to(Idx::I64);
        assert!(pool.is_explicitly_convertible(ptr_a, ptr_b));
        // struct to integer is illegal
        let s = pool.struct_of(DeclId::from_raw(1), &[Idx::I32]);
        assert!(!pool.is_explicitly_convertible(s, Idx::I32));
    }

    #[test]
    fn literal_fits_width_boundaries() {
        let pool = Pool::new();
        assert!(pool.literal_fits(255, Idx::U8));
        assert!(!pool.literal_fits(256, Idx::U8));
        assert!(pool.literal_fits(127, Idx::I8));
        assert!(!pool.literal_fits(128, Idx::I8));
        assert!(pool.literal_fits(u64::MAX, Idx::U64));
    }

    #[test]
    fn vectors_and_matrices() {
        let mut pool = Pool::new();
        let v4 = pool.vec_of(4, Idx::F32);
        assert_eq!(pool.vector_len(v4), 4);
        assert_eq!(pool.elem_type(v4), Idx::F32);
        assert_eq!(pool.vec_of(4, Idx::F32), v4);
        assert_ne!(pool.vec_of(3, Idx::F32), v4);

        let m = pool.mat_of(2, 3, Idx::F64);
        assert_eq!(pool.matrix_dims(m), (2, 3));
        assert_eq!(pool.elem_type(m), Idx::F64);
    }
}
