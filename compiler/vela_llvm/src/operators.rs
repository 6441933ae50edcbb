//! Operator lowering.
//!
//! Binary and unary operator nodes dispatch on the sub-kind the checker
//! resolved (`OpFamily`), so classification never happens twice. Vectors
//! reuse LLVM's element-wise instructions; matrices apply them row by
//! row. `&&` and `||` short-circuit through dedicated blocks with a phi
//! merge.

use inkwell::values::{ArrayValue, BasicValue, BasicValueEnum, IntValue, VectorValue};
use inkwell::{FloatPredicate, IntPredicate};
use vela_ir::{BinOp, ExprId, UnOp};
use vela_sema::OpFamily;

use crate::context::Codegen;

impl<'ll> Codegen<'ll, '_> {
    // --- Unary ---

    pub(crate) fn gen_unary(
        &mut self,
        expr_id: ExprId,
        op: UnOp,
        operand: ExprId,
    ) -> Option<BasicValueEnum<'ll>> {
        match op {
            UnOp::Pos => self.gen_rvalue(operand),
            UnOp::Neg => {
                let value = self.gen_rvalue(operand)?;
                let family = self.family(expr_id).unwrap_or(OpFamily::SInt);
                Some(match value {
                    BasicValueEnum::IntValue(i) => {
                        self.builder.build_int_neg(i, "neg").unwrap().into()
                    }
                    BasicValueEnum::FloatValue(f) => {
                        self.builder.build_float_neg(f, "neg").unwrap().into()
                    }
                    BasicValueEnum::VectorValue(v) => {
                        let zero = v.get_type().const_zero();
                        if family.is_float() {
                            self.builder
                                .build_float_sub(zero, v, "neg")
                                .unwrap()
                                .into()
                        } else {
                            self.builder.build_int_sub(zero, v, "neg").unwrap().into()
                        }
                    }
                    other => other,
                })
            }
            UnOp::Not => {
                let value = self.gen_rvalue(operand)?.into_int_value();
                Some(self.builder.build_not(value, "not").unwrap().into())
            }
            UnOp::BitNot => {
                let value = self.gen_rvalue(operand)?.into_int_value();
                Some(self.builder.build_not(value, "bnot").unwrap().into())
            }
            // The operand holds a pointer value; loading it yields the
            // pointee's address, which is the reference-category result.
            UnOp::Deref => self.gen_rvalue(operand),
            // The operand's address is the resulting pointer value.
            UnOp::AddrOf => self.gen_expr(operand),
            UnOp::PreInc | UnOp::PreDec | UnOp::PostInc | UnOp::PostDec => {
                self.gen_inc_dec(op, operand)
            }
            UnOp::Unwrap => self.gen_unwrap(operand),
        }
    }

    fn gen_inc_dec(&mut self, op: UnOp, operand: ExprId) -> Option<BasicValueEnum<'ll>> {
        let slot = self.gen_expr(operand)?.into_pointer_value();
        let operand_ty = self.analysis.expr_type(operand);
        let value_ty = self.analysis.pool.underlying(operand_ty);
        let llvm_ty = self.llvm_type(value_ty);
        let old = self.builder.build_load(llvm_ty, slot, "old").unwrap();

        let is_inc = matches!(op, UnOp::PreInc | UnOp::PostInc);
        let new = match old {
            BasicValueEnum::IntValue(i) => {
                let one = i.get_type().const_int(1, false);
                if is_inc {
                    self.builder.build_int_add(i, one, "inc").unwrap().into()
                } else {
                    self.builder.build_int_sub(i, one, "dec").unwrap().into()
                }
            }
            BasicValueEnum::FloatValue(f) => {
                let one = f.get_type().const_float(1.0);
                if is_inc {
                    self.builder.build_float_add(f, one, "inc").unwrap().into()
                } else {
                    self.builder.build_float_sub(f, one, "dec").unwrap().into()
                }
            }
            other => other,
        };
        self.builder.build_store(slot, new).unwrap();

        if matches!(op, UnOp::PreInc | UnOp::PreDec) {
            Some(slot.into()) // pre forms stay l-values
        } else {
            Some(old) // post forms yield the previous value
        }
    }

    // --- Binary ---

    pub(crate) fn gen_binary(
        &mut self,
        expr_id: ExprId,
        op: BinOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Option<BasicValueEnum<'ll>> {
        if op == BinOp::And {
            return self.gen_short_circuit(lhs, rhs, true);
        }
        if op == BinOp::Or {
            return self.gen_short_circuit(lhs, rhs, false);
        }
        if op.is_assign() {
            return self.gen_assign(expr_id, op, lhs, rhs);
        }
        if op.is_comparison() {
            return self.gen_comparison(expr_id, op, lhs, rhs);
        }
        if op == BinOp::Range {
            // ranges only drive `for` loops; a bare range evaluates to
            // its start in expression-statement position
            return self.gen_rvalue(lhs);
        }

        let result_ty = self.analysis.expr_type(expr_id);
        let family = self.family(expr_id).unwrap_or(OpFamily::SInt);

        // Shifts and bitwise ops keep the left operand's type; the rest
        // meet at the promoted result type.
        let (lhs_value, rhs_value) = if op.is_shift() || op.is_bitwise() {
            let left = self.gen_rvalue(lhs)?;
            let right = self.gen_rvalue(rhs)?.into_int_value();
            let resized =
                self.build_int_resize(right, left.into_int_value().get_type(), false);
            (left, resized.into())
        } else {
            (
                self.gen_coerced(lhs, result_ty)?,
                self.gen_coerced(rhs, result_ty)?,
            )
        };

        Some(self.apply_binary(op, family, lhs_value, rhs_value))
    }

    /// Apply an arithmetic/bitwise/shift operator to already-converted
    /// operands of matching shape.
    pub(crate) fn apply_binary(
        &mut self,
        op: BinOp,
        family: OpFamily,
        lhs: BasicValueEnum<'ll>,
        rhs: BasicValueEnum<'ll>,
    ) -> BasicValueEnum<'ll> {
        match (lhs, rhs) {
            (BasicValueEnum::FloatValue(l), BasicValueEnum::FloatValue(r)) => {
                let result = match op {
                    BinOp::Add => self.builder.build_float_add(l, r, "fadd"),
                    BinOp::Sub => self.builder.build_float_sub(l, r, "fsub"),
                    BinOp::Mul => self.builder.build_float_mul(l, r, "fmul"),
                    BinOp::Div => self.builder.build_float_div(l, r, "fdiv"),
                    _ => self.builder.build_float_rem(l, r, "frem"),
                };
                result.unwrap().into()
            }
            (BasicValueEnum::IntValue(l), BasicValueEnum::IntValue(r)) => self
                .int_binary(op, family.is_signed_int(), l, r)
                .as_basic_value_enum(),
            (BasicValueEnum::VectorValue(l), BasicValueEnum::VectorValue(r)) => {
                self.vector_binary(op, family, l, r).as_basic_value_enum()
            }
            (BasicValueEnum::ArrayValue(l), BasicValueEnum::ArrayValue(r)) => {
                self.matrix_binary(op, family, l, r).as_basic_value_enum()
            }
            (other, _) => other,
        }
    }

    fn int_binary(
        &mut self,
        op: BinOp,
        signed: bool,
        l: IntValue<'ll>,
        r: IntValue<'ll>,
    ) -> IntValue<'ll> {
        let result = match op {
            BinOp::Add => self.builder.build_int_add(l, r, "add"),
            BinOp::Sub => self.builder.build_int_sub(l, r, "sub"),
            BinOp::Mul => self.builder.build_int_mul(l, r, "mul"),
            BinOp::Div => {
                if signed {
                    self.builder.build_int_signed_div(l, r, "sdiv")
                } else {
                    self.builder.build_int_unsigned_div(l, r, "udiv")
                }
            }
            BinOp::Rem => {
                if signed {
                    self.builder.build_int_signed_rem(l, r, "srem")
                } else {
                    self.builder.build_int_unsigned_rem(l, r, "urem")
                }
            }
            BinOp::BitAnd => self.builder.build_and(l, r, "and"),
            BinOp::BitOr => self.builder.build_or(l, r, "or"),
            BinOp::BitXor => self.builder.build_xor(l, r, "xor"),
            BinOp::Shl => self.builder.build_left_shift(l, r, "shl"),
            BinOp::Shr => self.builder.build_right_shift(l, r, signed, "shr"),
            _ => self.builder.build_int_add(l, r, "add"),
        };
        result.unwrap()
    }

    /// Element-wise vector arithmetic; LLVM's instructions already apply
    /// lane by lane.
    fn vector_binary(
        &mut self,
        op: BinOp,
        family: OpFamily,
        l: VectorValue<'ll>,
        r: VectorValue<'ll>,
    ) -> VectorValue<'ll> {
        if family.is_float() {
            let result = match op {
                BinOp::Add => self.builder.build_float_add(l, r, "fadd"),
                BinOp::Sub => self.builder.build_float_sub(l, r, "fsub"),
                BinOp::Mul => self.builder.build_float_mul(l, r, "fmul"),
                BinOp::Div => self.builder.build_float_div(l, r, "fdiv"),
                _ => self.builder.build_float_rem(l, r, "frem"),
            };
            return result.unwrap();
        }
        let signed = family.is_signed_int();
        let result = match op {
            BinOp::Add => self.builder.build_int_add(l, r, "add"),
            BinOp::Sub => self.builder.build_int_sub(l, r, "sub"),
            BinOp::Mul => self.builder.build_int_mul(l, r, "mul"),
            BinOp::Div => {
                if signed {
                    self.builder.build_int_signed_div(l, r, "sdiv")
                } else {
                    self.builder.build_int_unsigned_div(l, r, "udiv")
                }
            }
            _ => {
                if signed {
                    self.builder.build_int_signed_rem(l, r, "srem")
                } else {
                    self.builder.build_int_unsigned_rem(l, r, "urem")
                }
            }
        };
        result.unwrap()
    }

    /// Row-wise matrix arithmetic over the array-of-rows representation.
    fn matrix_binary(
        &mut self,
        op: BinOp,
        family: OpFamily,
        l: ArrayValue<'ll>,
        r: ArrayValue<'ll>,
    ) -> ArrayValue<'ll> {
        let rows = l.get_type().len();
        let mut result = l.get_type().const_zero();
        for row in 0..rows {
            let lrow = self
                .builder
                .build_extract_value(l, row, "lrow")
                .unwrap()
                .into_vector_value();
            let rrow = self
                .builder
                .build_extract_value(r, row, "rrow")
                .unwrap()
                .into_vector_value();
            let combined = self.vector_binary(op, family, lrow, rrow);
            result = self
                .builder
                .build_insert_value(result, combined, row, "mrow")
                .unwrap()
                .into_array_value();
        }
        result
    }

    fn gen_comparison(
        &mut self,
        expr_id: ExprId,
        op: BinOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Option<BasicValueEnum<'ll>> {
        let family = self.family(expr_id).unwrap_or(OpFamily::SInt);

        // Compare at the promoted common operand type.
        let lhs_ty = self.analysis.pool.underlying(self.analysis.expr_type(lhs));
        let rhs_ty = self.analysis.pool.underlying(self.analysis.expr_type(rhs));
        let common = if family == OpFamily::Ptr {
            lhs_ty
        } else {
            self.analysis.pool.promote(lhs_ty, rhs_ty)
        };

        let left = self.gen_coerced(lhs, common)?;
        let right = self.gen_coerced(rhs, common)?;

        let result: IntValue<'ll> = if family == OpFamily::Float {
            let predicate = match op {
                BinOp::Eq => FloatPredicate::OEQ,
                BinOp::Ne => FloatPredicate::ONE,
                BinOp::Lt => FloatPredicate::OLT,
                BinOp::Le => FloatPredicate::OLE,
                BinOp::Gt => FloatPredicate::OGT,
                _ => FloatPredicate::OGE,
            };
            self.builder
                .build_float_compare(
                    predicate,
                    left.into_float_value(),
                    right.into_float_value(),
                    "fcmp",
                )
                .unwrap()
        } else {
            let signed = family == OpFamily::SInt;
            let predicate = match op {
                BinOp::Eq => IntPredicate::EQ,
                BinOp::Ne => IntPredicate::NE,
                BinOp::Lt if signed => IntPredicate::SLT,
                BinOp::Lt => IntPredicate::ULT,
                BinOp::Le if signed => IntPredicate::SLE,
                BinOp::Le => IntPredicate::ULE,
                BinOp::Gt if signed => IntPredicate::SGT,
                BinOp::Gt => IntPredicate::UGT,
                _ if signed => IntPredicate::SGE,
                _ => IntPredicate::UGE,
            };
            let (l, r) = if family == OpFamily::Ptr {
                let to_int = self.isize_type();
                (
                    self.builder
                        .build_ptr_to_int(left.into_pointer_value(), to_int, "pl")
                        .unwrap(),
                    self.builder
                        .build_ptr_to_int(right.into_pointer_value(), to_int, "pr")
                        .unwrap(),
                )
            } else {
                (left.into_int_value(), right.into_int_value())
            };
            self.builder
                .build_int_compare(predicate, l, r, "cmp")
                .unwrap()
        };
        Some(result.into())
    }

    fn gen_assign(
        &mut self,
        expr_id: ExprId,
        op: BinOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Option<BasicValueEnum<'ll>> {
        let slot = self.gen_expr(lhs)?.into_pointer_value();
        let target = {
            let lhs_ty = self.analysis.expr_type(lhs);
            self.analysis.pool.underlying(lhs_ty)
        };

        let new_value = match op.compound_base() {
            None => self.gen_coerced(rhs, target)?,
            Some(base) => {
                let llvm_ty = self.llvm_type(target);
                let old = self.builder.build_load(llvm_ty, slot, "old").unwrap();
                let family = self.family(expr_id).unwrap_or(OpFamily::SInt);
                let rhs_value = if base.is_shift() || base.is_bitwise() {
                    let raw = self.gen_rvalue(rhs)?.into_int_value();
                    self.build_int_resize(raw, old.into_int_value().get_type(), false)
                        .into()
                } else {
                    self.gen_coerced(rhs, target)?
                };
                self.apply_binary(base, family, old, rhs_value)
            }
        };

        self.builder.build_store(slot, new_value).unwrap();
        Some(slot.into())
    }

    /// Short-circuit `&&` / `||` with a phi merge.
    fn gen_short_circuit(
        &mut self,
        lhs: ExprId,
        rhs: ExprId,
        is_and: bool,
    ) -> Option<BasicValueEnum<'ll>> {
        let lhs_value = self.gen_bool(lhs);
        let rhs_bb = self.append_block(if is_and { "and_rhs" } else { "or_rhs" });
        let merge_bb = self.append_block(if is_and { "and_merge" } else { "or_merge" });
        let entry_bb = self.builder.get_insert_block()?;

        if is_and {
            // false short-circuits past the right operand
            self.builder
                .build_conditional_branch(lhs_value, rhs_bb, merge_bb)
                .unwrap();
        } else {
            // true short-circuits past the right operand
            self.builder
                .build_conditional_branch(lhs_value, merge_bb, rhs_bb)
                .unwrap();
        }

        self.builder.position_at_end(rhs_bb);
        let rhs_value = self.gen_bool(rhs);
        let rhs_end = self.builder.get_insert_block()?;
        self.builder.build_unconditional_branch(merge_bb).unwrap();

        self.builder.position_at_end(merge_bb);
        let bool_ty = self.llcx.bool_type();
        let short_value = bool_ty.const_int(u64::from(!is_and), false);
        let phi = self.builder.build_phi(bool_ty, "merge").unwrap();
        phi.add_incoming(&[(&short_value, entry_bb), (&rhs_value, rhs_end)]);
        Some(phi.as_basic_value())
    }

    fn family(&self, expr_id: ExprId) -> Option<OpFamily> {
        self.analysis.op_families.get(&expr_id).copied()
    }
}
