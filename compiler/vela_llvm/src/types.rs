//! Type descriptor lowering.
//!
//! Maps pool indices to cached LLVM types. References and pointers both
//! lower to opaque pointers; optionals to `{ i1, T }`; unions to a byte
//! blob sized by the largest member; enums to the smallest integer width
//! that fits the constant count.

use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType, IntType};
use vela_types::{Idx, Tag};

use crate::context::Codegen;

impl<'ll> Codegen<'ll, '_> {
    /// Lower a type descriptor to its LLVM representation.
    pub(crate) fn llvm_type(&mut self, idx: Idx) -> BasicTypeEnum<'ll> {
        if let Some(&cached) = self.type_cache.get(&idx) {
            return cached;
        }
        let lowered = self.lower_type(idx);
        self.type_cache.insert(idx, lowered);
        lowered
    }

    fn lower_type(&mut self, idx: Idx) -> BasicTypeEnum<'ll> {
        match idx {
            Idx::I8 | Idx::U8 => self.llcx.i8_type().into(),
            Idx::I16 | Idx::U16 => self.llcx.i16_type().into(),
            Idx::I32 | Idx::U32 => self.llcx.i32_type().into(),
            Idx::I64 | Idx::U64 => self.llcx.i64_type().into(),
            // isize/usize follow the data layout's pointer width
            Idx::ISIZE | Idx::USIZE => self.isize_type().into(),
            Idx::F32 => self.llcx.f32_type().into(),
            Idx::F64 => self.llcx.f64_type().into(),
            // chars are 32-bit code points
            Idx::CHAR => self.llcx.i32_type().into(),
            Idx::BOOL => self.llcx.bool_type().into(),
            // unit has no runtime representation; an empty struct stands
            // in where a value type is demanded
            Idx::UNIT => self.llcx.struct_type(&[], false).into(),
            Idx::NULL => self.ptr_type.into(),
            _ => self.lower_pool_type(idx),
        }
    }

    fn lower_pool_type(&mut self, idx: Idx) -> BasicTypeEnum<'ll> {
        let pool = &self.analysis.pool;
        match pool.tag(idx) {
            Tag::Mut | Tag::Const => {
                let base = pool.base(idx);
                self.llvm_type(base)
            }
            Tag::Ptr | Tag::Ref | Tag::Fun => self.ptr_type.into(),
            Tag::Opt => {
                let payload = self.llvm_type(pool.base(idx));
                self.llcx
                    .struct_type(&[self.llcx.bool_type().into(), payload], false)
                    .into()
            }
            Tag::Array => {
                let len = pool.array_len(idx);
                let elem = self.llvm_type(pool.elem_type(idx));
                elem.array_type(len).into()
            }
            Tag::Vector => {
                let len = pool.vector_len(idx);
                match self.llvm_type(pool.elem_type(idx)) {
                    BasicTypeEnum::IntType(int) => int.vec_type(len).into(),
                    BasicTypeEnum::FloatType(float) => float.vec_type(len).into(),
                    other => other.array_type(len).into(),
                }
            }
            Tag::Matrix => {
                let (rows, cols) = pool.matrix_dims(idx);
                match self.llvm_type(pool.elem_type(idx)) {
                    BasicTypeEnum::IntType(int) => int.vec_type(cols).array_type(rows).into(),
                    BasicTypeEnum::FloatType(float) => {
                        float.vec_type(cols).array_type(rows).into()
                    }
                    other => other.array_type(cols).array_type(rows).into(),
                }
            }
            Tag::Struct => {
                let decl = pool.nominal_decl(idx);
                let name = self.interner.lookup(self.ast.decl(decl).name);
                let named = self.llcx.opaque_struct_type(name);
                // Cache before lowering fields so self-referential
                // structs (through pointers) terminate.
                self.type_cache.insert(idx, named.into());
                let fields: Vec<BasicTypeEnum<'ll>> = pool
                    .nominal_fields(idx)
                    .into_iter()
                    .map(|field| self.llvm_type(field))
                    .collect();
                named.set_body(&fields, false);
                named.into()
            }
            Tag::Union => {
                // A byte blob sized to the largest member; reads cast the
                // storage pointer to the member type.
                let size = pool
                    .nominal_fields(idx)
                    .into_iter()
                    .map(|field| {
                        let ty = self.llvm_type(field);
                        self.target_data.get_abi_size(&ty)
                    })
                    .max()
                    .unwrap_or(1)
                    .max(1);
                let blob = self.llcx.i8_type().array_type(size as u32);
                self.llcx.struct_type(&[blob.into()], false).into()
            }
            Tag::Enum => self.enum_int_type(idx).into(),
            // poison never reaches the generator on accepted inputs
            _ => self.llcx.i8_type().into(),
        }
    }

    /// The smallest integer width that fits the enum's constant count.
    pub(crate) fn enum_int_type(&self, idx: Idx) -> IntType<'ll> {
        let count = self.analysis.pool.enum_constant_count(idx);
        match count {
            0..=0xFF => self.llcx.i8_type(),
            0x100..=0xFFFF => self.llcx.i16_type(),
            0x1_0000..=0xFFFF_FFFF => self.llcx.i32_type(),
            _ => self.llcx.i64_type(),
        }
    }

    /// Machine word type from the data layout.
    pub(crate) fn isize_type(&self) -> IntType<'ll> {
        self.llcx
            .ptr_sized_int_type(&self.target_data, None)
    }

    /// Lower a function descriptor to an LLVM function type.
    pub(crate) fn llvm_fn_type(&mut self, idx: Idx) -> FunctionType<'ll> {
        debug_assert_eq!(self.analysis.pool.tag(idx), Tag::Fun);
        let ret = self.analysis.pool.fun_return(idx);
        let is_vararg = self.analysis.pool.fun_is_vararg(idx);
        let params: Vec<BasicMetadataTypeEnum<'ll>> = self
            .analysis
            .pool
            .fun_params(idx)
            .into_iter()
            .map(|p| self.llvm_type(p).into())
            .collect();

        let ret = self.analysis.pool.remove_const_mut(ret);
        if ret.is_unit() {
            self.llcx.void_type().fn_type(&params, is_vararg)
        } else {
            self.llvm_type(ret).fn_type(&params, is_vararg)
        }
    }
}

/// LLVM numeric ids for the supported calling conventions.
///
/// Values match `llvm::CallingConv`.
pub(crate) fn callconv_id(cc: vela_ir::CallConv) -> u32 {
    use vela_ir::CallConv;
    match cc {
        CallConv::Cdecl => 0,
        CallConv::Fastcall => 65,
        CallConv::Stdcall => 64,
        CallConv::Thiscall => 70,
        CallConv::Vectorcall => 80,
        CallConv::Win64 => 79,
        CallConv::Sysv64 => 78,
        CallConv::Aapcs => 67,
    }
}
