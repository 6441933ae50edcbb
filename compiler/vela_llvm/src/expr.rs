//! Expression lowering.
//!
//! `gen_expr` produces the natural value of an expression: an address
//! for reference-category expressions (variables, fields, subscripts),
//! a first-class value otherwise. `gen_rvalue` adds the load when the
//! consumer wants a value, and `gen_coerced` additionally inserts the
//! implicit conversion the checker approved.

use inkwell::values::{BasicValueEnum, IntValue};
use inkwell::IntPredicate;
use vela_ir::ast::{DeclKind, ExprKind};
use vela_ir::{ExprId, MemberAccess};
use vela_types::{Idx, Tag};

use crate::context::Codegen;

impl<'ll> Codegen<'ll, '_> {
    /// Lower an expression to its natural (possibly address) value.
    pub(crate) fn gen_expr(&mut self, expr_id: ExprId) -> Option<BasicValueEnum<'ll>> {
        let ty = self.analysis.expr_type(expr_id);
        if ty.is_error() {
            return None;
        }
        match self.ast.expr(expr_id).kind.clone() {
            ExprKind::IntLit { value, .. } => {
                let llvm_ty = self.llvm_type(ty).into_int_type();
                Some(llvm_ty.const_int(value, false).into())
            }
            ExprKind::FloatLit { bits, .. } => {
                let llvm_ty = self.llvm_type(ty).into_float_type();
                Some(llvm_ty.const_float(f64::from_bits(bits)).into())
            }
            ExprKind::StrLit(name) => {
                let text = self.interner.lookup(name);
                let global = self
                    .builder
                    .build_global_string_ptr(text, "str")
                    .unwrap();
                Some(global.as_pointer_value().into())
            }
            ExprKind::CharLit(c) => {
                Some(self.llcx.i32_type().const_int(c as u64, false).into())
            }
            ExprKind::BoolLit(value) => Some(
                self.llcx
                    .bool_type()
                    .const_int(u64::from(value), false)
                    .into(),
            ),
            ExprKind::NullLit => Some(self.ptr_type.const_null().into()),
            ExprKind::Ident(_) => self.gen_ident(expr_id),
            ExprKind::Unary { op, operand } => self.gen_unary(expr_id, op, operand),
            ExprKind::Binary { op, lhs, rhs } => self.gen_binary(expr_id, op, lhs, rhs),
            ExprKind::Call { callee, args } => self.gen_call(callee, args),
            ExprKind::Member { owner, access, .. } => {
                self.gen_member(expr_id, owner, access)
            }
            ExprKind::Index { base, index } => self.gen_index(expr_id, base, index),
            ExprKind::Cast { operand, .. } => {
                let target = self.analysis.expr_type(expr_id);
                self.gen_cast(operand, target)
            }
            ExprKind::SizeOf(ty_expr) => {
                let measured = self.analysis.types.type_expr(ty_expr);
                let llvm_ty = self.llvm_type(self.analysis.pool.remove_const_mut(measured));
                let size = self.target_data.get_abi_size(&llvm_ty);
                Some(self.isize_type().const_int(size, false).into())
            }
            ExprKind::AlignOf(ty_expr) => {
                let measured = self.analysis.types.type_expr(ty_expr);
                let llvm_ty = self.llvm_type(self.analysis.pool.remove_const_mut(measured));
                let align = self.target_data.get_abi_alignment(&llvm_ty);
                Some(self.isize_type().const_int(u64::from(align), false).into())
            }
            ExprKind::VectorLit { elems } => self.gen_vector_lit(expr_id, elems),
            ExprKind::MatrixLit { elems, .. } => self.gen_matrix_lit(expr_id, elems),
            ExprKind::Error => None,
        }
    }

    /// Lower to a first-class value, loading through references.
    pub(crate) fn gen_rvalue(&mut self, expr_id: ExprId) -> Option<BasicValueEnum<'ll>> {
        let value = self.gen_expr(expr_id)?;
        let ty = self.analysis.expr_type(expr_id);
        Some(self.load_if_ref(value, ty))
    }

    /// Lower to a value of the checker-approved target type.
    pub(crate) fn gen_coerced(
        &mut self,
        expr_id: ExprId,
        target: Idx,
    ) -> Option<BasicValueEnum<'ll>> {
        let value = self.gen_rvalue(expr_id)?;
        let from = self.analysis.expr_type(expr_id);
        Some(self.coerce(value, from, target))
    }

    /// Lower a condition expression to an `i1`.
    pub(crate) fn gen_bool(&mut self, expr_id: ExprId) -> IntValue<'ll> {
        match self.gen_rvalue(expr_id) {
            Some(BasicValueEnum::IntValue(i)) => i,
            _ => self.llcx.bool_type().const_zero(),
        }
    }

    /// Insert the load for a reference-category result.
    pub(crate) fn load_if_ref(
        &mut self,
        value: BasicValueEnum<'ll>,
        ty: Idx,
    ) -> BasicValueEnum<'ll> {
        if !self.analysis.pool.is_reference(ty) {
            return value;
        }
        let pointee = self.analysis.pool.underlying(ty);
        let llvm_ty = self.llvm_type(pointee);
        self.builder
            .build_load(llvm_ty, value.into_pointer_value(), "load")
            .unwrap()
    }

    /// Implicit conversion between checker-approved descriptor pairs.
    pub(crate) fn coerce(
        &mut self,
        value: BasicValueEnum<'ll>,
        from: Idx,
        to: Idx,
    ) -> BasicValueEnum<'ll> {
        let pool = &self.analysis.pool;
        let from = pool.underlying(from);
        let to = {
            let stripped = pool.remove_const_mut(to);
            pool.remove_mut(stripped)
        };
        if from == to || to.is_error() || from.is_error() {
            return value;
        }

        // null literal into pointer or optional
        if from.is_null() {
            return match pool.tag(to) {
                Tag::Opt => {
                    let llvm_ty = self.llvm_type(to).into_struct_type();
                    llvm_ty.const_zero().into()
                }
                _ => value,
            };
        }

        // T into ?T: wrap with a present flag
        if pool.tag(to) == Tag::Opt {
            let payload_ty = pool.base(to);
            let payload = self.coerce(value, from, payload_ty);
            let llvm_ty = self.llvm_type(to).into_struct_type();
            let with_flag = self
                .builder
                .build_insert_value(
                    llvm_ty.get_undef(),
                    self.llcx.bool_type().const_int(1, false),
                    0,
                    "opt",
                )
                .unwrap()
                .into_struct_value();
            let wrapped = self
                .builder
                .build_insert_value(with_flag, payload, 1, "opt")
                .unwrap()
                .into_struct_value();
            return wrapped.into();
        }

        // integer widening
        if pool.is_integer(from) && pool.is_integer(to) {
            let target = self.llvm_type(to).into_int_type();
            let int = value.into_int_value();
            let widened = if pool.is_signed(from) {
                self.builder.build_int_s_extend(int, target, "sext")
            } else {
                self.builder.build_int_z_extend(int, target, "zext")
            };
            return widened.unwrap().into();
        }

        // float widening
        if from == Idx::F32 && to == Idx::F64 {
            let target = self.llvm_type(to).into_float_type();
            return self
                .builder
                .build_float_ext(value.into_float_value(), target, "fpext")
                .unwrap()
                .into();
        }

        value
    }

    // --- Identifiers ---

    fn gen_ident(&mut self, expr_id: ExprId) -> Option<BasicValueEnum<'ll>> {
        let decl_id = *self.analysis.resolutions.get(&expr_id)?;
        match &self.ast.decl(decl_id).kind {
            DeclKind::Var { .. } | DeclKind::Param { .. } => {
                if let Some(&slot) = self.locals.get(&decl_id) {
                    Some(slot.into())
                } else {
                    self.globals.get(&decl_id).map(|&g| g.into())
                }
            }
            DeclKind::Fun { .. } => self
                .functions
                .get(&decl_id)
                .map(|f| f.as_global_value().as_pointer_value().into()),
            _ => None,
        }
    }

    // --- Member access ---

    fn gen_member(
        &mut self,
        expr_id: ExprId,
        owner: ExprId,
        access: MemberAccess,
    ) -> Option<BasicValueEnum<'ll>> {
        let Some(&decl_id) = self.analysis.resolutions.get(&expr_id) else {
            return None;
        };

        // Enum constants and module members resolve through declarations.
        match &self.ast.decl(decl_id).kind {
            DeclKind::EnumConstant => {
                let ordinal = *self.analysis.member_indices.get(&expr_id)?;
                let enum_ty = self.analysis.expr_type(expr_id);
                let int_ty = self.enum_int_type(enum_ty);
                return Some(int_ty.const_int(u64::from(ordinal), false).into());
            }
            DeclKind::Var { .. } => {
                if let Some(&global) = self.globals.get(&decl_id) {
                    return Some(global.into());
                }
            }
            DeclKind::Fun { .. } => {
                if let Some(function) = self.functions.get(&decl_id) {
                    return Some(function.as_global_value().as_pointer_value().into());
                }
            }
            _ => {}
        }

        // Struct/union field access.
        let field_index = *self.analysis.member_indices.get(&expr_id)?;
        let owner_ty = self.analysis.expr_type(owner);
        let owner_value = self.gen_expr(owner)?;

        match access {
            MemberAccess::Direct => {
                let composite = self.analysis.pool.underlying(owner_ty);
                if self.analysis.pool.is_reference(owner_ty) {
                    let ptr = owner_value.into_pointer_value();
                    Some(self.field_pointer(ptr, composite, field_index).into())
                } else {
                    let field_ty = self.analysis.expr_type(expr_id);
                    self.field_of_value(owner_value, composite, field_index, field_ty)
                }
            }
            MemberAccess::Indirect => {
                let ptr_value = self.load_if_ref(owner_value, owner_ty);
                let pointee = {
                    let value = self.analysis.pool.underlying(owner_ty);
                    self.analysis.pool.base(value)
                };
                let composite = self.analysis.pool.remove_const_mut(pointee);
                let ptr = ptr_value.into_pointer_value();
                Some(self.field_pointer(ptr, composite, field_index).into())
            }
            MemberAccess::NullSafe => {
                self.gen_null_safe_member(expr_id, owner, owner_ty, field_index)
            }
        }
    }

    /// Address of a field within a composite behind a pointer. Unions use
    /// their storage pointer directly (the blob aliases every member).
    fn field_pointer(
        &mut self,
        ptr: inkwell::values::PointerValue<'ll>,
        composite: Idx,
        field_index: u32,
    ) -> inkwell::values::PointerValue<'ll> {
        match self.analysis.pool.tag(composite) {
            Tag::Union => ptr,
            _ => {
                let llvm_ty = self.llvm_type(composite).into_struct_type();
                self.builder
                    .build_struct_gep(llvm_ty, ptr, field_index, "field")
                    .unwrap()
            }
        }
    }

    /// Field of a by-value composite. Unions spill to a temporary slot so
    /// the member type can be read back from the blob.
    fn field_of_value(
        &mut self,
        value: BasicValueEnum<'ll>,
        composite: Idx,
        field_index: u32,
        field_ty: Idx,
    ) -> Option<BasicValueEnum<'ll>> {
        match self.analysis.pool.tag(composite) {
            Tag::Union => {
                let llvm_ty = self.llvm_type(composite);
                let slot = self.builder.build_alloca(llvm_ty, "union").unwrap();
                self.builder.build_store(slot, value).unwrap();
                let field_llvm = self.llvm_type(self.analysis.pool.underlying(field_ty));
                Some(self.builder.build_load(field_llvm, slot, "field").unwrap())
            }
            _ => Some(
                self.builder
                    .build_extract_value(value.into_struct_value(), field_index, "field")
                    .unwrap(),
            ),
        }
    }

    /// `a?.b` — a present-flag branch producing an optional of the member.
    fn gen_null_safe_member(
        &mut self,
        expr_id: ExprId,
        owner: ExprId,
        owner_ty: Idx,
        field_index: u32,
    ) -> Option<BasicValueEnum<'ll>> {
        let opt_value = self
            .gen_expr(owner)
            .map(|v| self.load_if_ref(v, owner_ty))?
            .into_struct_value();

        let result_ty = self.analysis.expr_type(expr_id);
        let result_llvm = self.llvm_type(result_ty).into_struct_type();
        let owner_opt = self.analysis.pool.underlying(owner_ty);
        let composite = {
            let inner = self.analysis.pool.base(owner_opt);
            self.analysis.pool.remove_const_mut(inner)
        };

        let present = self
            .builder
            .build_extract_value(opt_value, 0, "present")
            .unwrap()
            .into_int_value();

        let some_bb = self.append_block("some");
        let end_bb = self.append_block("end");
        let entry_bb = self.builder.get_insert_block()?;

        self.builder
            .build_conditional_branch(present, some_bb, end_bb)
            .unwrap();

        self.builder.position_at_end(some_bb);
        let payload = self
            .builder
            .build_extract_value(opt_value, 1, "value")
            .unwrap();
        let field_ty = {
            let result_opt = self.analysis.pool.underlying(result_ty);
            self.analysis.pool.base(result_opt)
        };
        let field = self.field_of_value(payload, composite, field_index, field_ty)?;
        // the field wrapped into ?.'s optional result
        let field: BasicValueEnum<'ll> = {
            let wrapped = self
                .builder
                .build_insert_value(
                    result_llvm.get_undef(),
                    self.llcx.bool_type().const_int(1, false),
                    0,
                    "some",
                )
                .unwrap()
                .into_struct_value();
            self.builder
                .build_insert_value(wrapped, field, 1, "some")
                .unwrap()
                .into_struct_value()
                .into()
        };
        let some_end = self.builder.get_insert_block()?;
        self.builder.build_unconditional_branch(end_bb).unwrap();

        self.builder.position_at_end(end_bb);
        let phi = self.builder.build_phi(result_llvm, "opt").unwrap();
        let absent: BasicValueEnum<'ll> = result_llvm.const_zero().into();
        phi.add_incoming(&[(&absent, entry_bb), (&field, some_end)]);
        Some(phi.as_basic_value())
    }

    // --- Indexing ---

    fn gen_index(
        &mut self,
        expr_id: ExprId,
        base: ExprId,
        index: ExprId,
    ) -> Option<BasicValueEnum<'ll>> {
        let base_ty = self.analysis.expr_type(base);
        let base_value = self.gen_expr(base)?;
        let index_value = self.gen_rvalue(index)?.into_int_value();
        let sequence = self.analysis.pool.underlying(base_ty);

        if self.analysis.pool.is_reference(base_ty) {
            let llvm_seq = self.llvm_type(sequence);
            let zero = self.llcx.i32_type().const_zero();
            let ptr = base_value.into_pointer_value();
            // Safety of in-bounds GEP rests on the sequence type itself.
            let elem_ptr = unsafe {
                self.builder
                    .build_in_bounds_gep(llvm_seq, ptr, &[zero, index_value], "elem")
                    .unwrap()
            };
            Some(elem_ptr.into())
        } else if self.analysis.pool.tag(sequence) == Tag::Vector {
            Some(
                self.builder
                    .build_extract_element(base_value.into_vector_value(), index_value, "elem")
                    .unwrap(),
            )
        } else {
            // by-value array: spill, index, load
            let llvm_seq = self.llvm_type(sequence);
            let slot = self.builder.build_alloca(llvm_seq, "seq").unwrap();
            self.builder.build_store(slot, base_value).unwrap();
            let zero = self.llcx.i32_type().const_zero();
            let elem_ptr = unsafe {
                self.builder
                    .build_in_bounds_gep(llvm_seq, slot, &[zero, index_value], "elem")
                    .unwrap()
            };
            let elem_ty = self.analysis.expr_type(expr_id);
            let elem_llvm = self.llvm_type(self.analysis.pool.underlying(elem_ty));
            Some(self.builder.build_load(elem_llvm, elem_ptr, "elem").unwrap())
        }
    }

    // --- Calls ---

    fn gen_call(
        &mut self,
        callee: ExprId,
        args: vela_ir::ExprRange,
    ) -> Option<BasicValueEnum<'ll>> {
        let callee_ty = self.analysis.expr_type(callee);
        let fun_ty = self.analysis.pool.underlying(callee_ty);
        let params = self.analysis.pool.fun_params(fun_ty);

        let arg_ids: Vec<ExprId> = self.ast.exprs_in(args).to_vec();
        let mut lowered = Vec::with_capacity(arg_ids.len());
        for (position, &arg) in arg_ids.iter().enumerate() {
            let value = match params.get(position) {
                Some(&param) => self.gen_coerced(arg, param)?,
                // vararg tail: pass the value unconverted
                None => self.gen_rvalue(arg)?,
            };
            lowered.push(value.into());
        }

        // Direct call when the callee names a function declaration.
        let direct = self
            .analysis
            .resolutions
            .get(&callee)
            .and_then(|decl| self.functions.get(decl))
            .copied();

        let call_site = match direct {
            Some(function) => self.builder.build_call(function, &lowered, "call").unwrap(),
            None => {
                let fn_ptr = self.gen_rvalue(callee)?.into_pointer_value();
                let llvm_fn_ty = self.llvm_fn_type(fun_ty);
                self.builder
                    .build_indirect_call(llvm_fn_ty, fn_ptr, &lowered, "call")
                    .unwrap()
            }
        };
        call_site.set_call_convention(callconv_for(self.analysis, fun_ty));

        match call_site.try_as_basic_value().left() {
            Some(value) => Some(value),
            // unit-returning calls have no value; hand back a unit struct
            None => Some(self.llcx.struct_type(&[], false).const_zero().into()),
        }
    }

    // --- Casts ---

    fn gen_cast(&mut self, operand: ExprId, target: Idx) -> Option<BasicValueEnum<'ll>> {
        let value = self.gen_rvalue(operand)?;
        let from = {
            let ty = self.analysis.expr_type(operand);
            self.analysis.pool.underlying(ty)
        };
        let pool = &self.analysis.pool;
        let to = pool.remove_const_mut(target);
        if from == to {
            return Some(value);
        }

        // enum values are already integers of their width
        let from_int_like = pool.is_integer(from)
            || from == Idx::CHAR
            || from == Idx::BOOL
            || pool.tag(from) == Tag::Enum;
        let to_int_like = pool.is_integer(to) || to == Idx::CHAR;

        let result = if from_int_like && to_int_like {
            let target_ty = self.llvm_type(to).into_int_type();
            let int = value.into_int_value();
            let signed = pool.is_signed(from);
            self.build_int_resize(int, target_ty, signed).into()
        } else if from_int_like && pool.is_float(to) {
            let target_ty = self.llvm_type(to).into_float_type();
            let int = value.into_int_value();
            if pool.is_signed(from) {
                self.builder
                    .build_signed_int_to_float(int, target_ty, "sitofp")
                    .unwrap()
                    .into()
            } else {
                self.builder
                    .build_unsigned_int_to_float(int, target_ty, "uitofp")
                    .unwrap()
                    .into()
            }
        } else if pool.is_float(from) && to_int_like {
            let target_ty = self.llvm_type(to).into_int_type();
            let float = value.into_float_value();
            if pool.is_signed(to) {
                self.builder
                    .build_float_to_signed_int(float, target_ty, "fptosi")
                    .unwrap()
                    .into()
            } else {
                self.builder
                    .build_float_to_unsigned_int(float, target_ty, "fptoui")
                    .unwrap()
                    .into()
            }
        } else if pool.is_float(from) && pool.is_float(to) {
            let target_ty = self.llvm_type(to).into_float_type();
            let float = value.into_float_value();
            if from == Idx::F32 {
                self.builder
                    .build_float_ext(float, target_ty, "fpext")
                    .unwrap()
                    .into()
            } else {
                self.builder
                    .build_float_trunc(float, target_ty, "fptrunc")
                    .unwrap()
                    .into()
            }
        } else {
            // pointer-to-pointer casts are no-ops with opaque pointers
            value
        };
        Some(result)
    }

    pub(crate) fn build_int_resize(
        &mut self,
        value: IntValue<'ll>,
        target: inkwell::types::IntType<'ll>,
        signed: bool,
    ) -> IntValue<'ll> {
        let from_width = value.get_type().get_bit_width();
        let to_width = target.get_bit_width();
        match from_width.cmp(&to_width) {
            std::cmp::Ordering::Equal => value,
            std::cmp::Ordering::Greater => self
                .builder
                .build_int_truncate(value, target, "trunc")
                .unwrap(),
            std::cmp::Ordering::Less => {
                if signed {
                    self.builder.build_int_s_extend(value, target, "sext").unwrap()
                } else {
                    self.builder.build_int_z_extend(value, target, "zext").unwrap()
                }
            }
        }
    }

    // --- Safe unwrap ---

    /// `x!` — abort with `exit(1)` when the optional is absent.
    pub(crate) fn gen_unwrap(&mut self, operand: ExprId) -> Option<BasicValueEnum<'ll>> {
        let opt_value = self.gen_rvalue(operand)?.into_struct_value();

        let present = self
            .builder
            .build_extract_value(opt_value, 0, "present")
            .unwrap()
            .into_int_value();

        let exit_bb = self.append_block("exit");
        let end_bb = self.append_block("end");

        let is_present = self
            .builder
            .build_int_compare(
                IntPredicate::NE,
                present,
                self.llcx.bool_type().const_zero(),
                "cond",
            )
            .unwrap();
        self.builder
            .build_conditional_branch(is_present, end_bb, exit_bb)
            .unwrap();

        // absent: exit(1), then unreachable
        self.builder.position_at_end(exit_bb);
        let exit_fn = self.exit_function();
        let one = self.llcx.i32_type().const_int(1, false);
        self.builder
            .build_call(exit_fn, &[one.into()], "abort")
            .unwrap();
        self.builder.build_unreachable().unwrap();

        self.builder.position_at_end(end_bb);
        Some(
            self.builder
                .build_extract_value(opt_value, 1, "value")
                .unwrap(),
        )
    }

    // --- Vector and matrix literals ---

    fn gen_vector_lit(
        &mut self,
        expr_id: ExprId,
        elems: vela_ir::ExprRange,
    ) -> Option<BasicValueEnum<'ll>> {
        let vec_ty = self.analysis.expr_type(expr_id);
        let elem_ty = self.analysis.pool.elem_type(vec_ty);
        let llvm_vec = self.llvm_type(vec_ty).into_vector_type();

        let mut vector = llvm_vec.const_zero();
        let elem_ids: Vec<ExprId> = self.ast.exprs_in(elems).to_vec();
        for (lane, &elem) in elem_ids.iter().enumerate() {
            let value = self.gen_coerced(elem, elem_ty)?;
            let index = self.llcx.i32_type().const_int(lane as u64, false);
            vector = self
                .builder
                .build_insert_element(vector, value, index, "vec")
                .unwrap();
        }
        Some(vector.into())
    }

    fn gen_matrix_lit(
        &mut self,
        expr_id: ExprId,
        elems: vela_ir::ExprRange,
    ) -> Option<BasicValueEnum<'ll>> {
        let mat_ty = self.analysis.expr_type(expr_id);
        let elem_ty = self.analysis.pool.elem_type(mat_ty);
        let (rows, cols) = self.analysis.pool.matrix_dims(mat_ty);
        let llvm_mat = self.llvm_type(mat_ty).into_array_type();
        let row_ty = llvm_mat.get_element_type().into_vector_type();

        let elem_ids: Vec<ExprId> = self.ast.exprs_in(elems).to_vec();
        let mut matrix = llvm_mat.const_zero();
        for row in 0..rows {
            let mut vector = row_ty.const_zero();
            for col in 0..cols {
                let Some(&elem) = elem_ids.get((row * cols + col) as usize) else {
                    continue;
                };
                let value = self.gen_coerced(elem, elem_ty)?;
                let index = self.llcx.i32_type().const_int(u64::from(col), false);
                vector = self
                    .builder
                    .build_insert_element(vector, value, index, "row")
                    .unwrap();
            }
            matrix = self
                .builder
                .build_insert_value(matrix, vector, row, "mat")
                .unwrap()
                .into_array_value();
        }
        Some(matrix.into())
    }
}

fn callconv_for(analysis: &vela_sema::Analysis, fun_ty: Idx) -> u32 {
    crate::types::callconv_id(analysis.pool.fun_callconv(fun_ty))
}
