//! Type check pass.
//!
//! Post-order traversal that records a type descriptor for every
//! expression, declaration, and type expression. Runs in three stages so
//! forward references work: nominal type registration, function
//! signatures, then bodies.
//!
//! A node whose checking fails is recorded as `Idx::ERROR` (poison);
//! parents seeing a poisoned child propagate it silently, so one mistake
//! produces one diagnostic.

use rustc_hash::FxHashMap;
use tracing::debug;
use vela_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use vela_ir::ast::{DeclKind, ExprKind, StmtKind, TypeExprKind};
use vela_ir::{
    Ast, BinOp, DeclId, DeclRange, ExprId, MemberAccess, Name, PrimType, Span, StmtId,
    StringInterner, TypeExprId, UnOp,
};
use vela_types::{Idx, Pool, Tag, TypeTable};

use crate::nameres::NameResOutput;
use crate::OpFamily;

/// Type-check results consumed by the code generator.
pub(crate) struct TypeCheckOutput {
    pub pool: Pool,
    pub table: TypeTable,
    /// Identifier and member expressions bound to declarations.
    pub resolutions: FxHashMap<ExprId, DeclId>,
    /// Field index (structs/unions) or constant ordinal (enums) for
    /// member expressions.
    pub member_indices: FxHashMap<ExprId, u32>,
    /// Operator sub-kinds resolved for the generator.
    pub op_families: FxHashMap<ExprId, OpFamily>,
}

pub(crate) fn check(
    ast: &Ast,
    interner: &StringInterner,
    diags: &mut DiagnosticQueue,
    nameres: &NameResOutput,
) -> TypeCheckOutput {
    let mut pass = TypeCheck {
        ast,
        interner,
        diags,
        nameres,
        pool: Pool::new(),
        table: TypeTable::for_ast(ast),
        resolutions: nameres.resolutions.clone(),
        member_indices: FxHashMap::default(),
        op_families: FxHashMap::default(),
        fn_returns: Vec::new(),
    };

    pass.register_types(ast.module.decls);
    pass.collect_signatures(ast.module.decls);
    pass.check_bodies(ast.module.decls);

    debug!(types = pass.pool.len(), "type check complete");
    TypeCheckOutput {
        pool: pass.pool,
        table: pass.table,
        resolutions: pass.resolutions,
        member_indices: pass.member_indices,
        op_families: pass.op_families,
    }
}

struct TypeCheck<'a> {
    ast: &'a Ast,
    interner: &'a StringInterner,
    diags: &'a mut DiagnosticQueue,
    nameres: &'a NameResOutput,
    pool: Pool,
    table: TypeTable,
    resolutions: FxHashMap<ExprId, DeclId>,
    member_indices: FxHashMap<ExprId, u32>,
    op_families: FxHashMap<ExprId, OpFamily>,
    /// Return types of the enclosing functions, innermost last.
    fn_returns: Vec<Idx>,
}

impl TypeCheck<'_> {
    // --- Stage 1: nominal types and aliases ---

    fn register_types(&mut self, range: DeclRange) {
        for &decl_id in self.ast.decls_in(range) {
            match &self.ast.decl(decl_id).kind {
                DeclKind::Struct { .. }
                | DeclKind::Union { .. }
                | DeclKind::Enum { .. }
                | DeclKind::TypeAlias { .. } => {
                    self.decl_type(decl_id);
                }
                DeclKind::Mod { decls } => self.register_types(*decls),
                _ => {}
            }
        }
    }

    // --- Stage 2: function signatures ---

    fn collect_signatures(&mut self, range: DeclRange) {
        for &decl_id in self.ast.decls_in(range) {
            match &self.ast.decl(decl_id).kind {
                DeclKind::Fun { .. } => {
                    self.decl_type(decl_id);
                }
                DeclKind::Mod { decls } => self.collect_signatures(*decls),
                _ => {}
            }
        }
    }

    // --- Stage 3: bodies ---

    fn check_bodies(&mut self, range: DeclRange) {
        for &decl_id in self.ast.decls_in(range) {
            match &self.ast.decl(decl_id).kind {
                DeclKind::Fun {
                    params,
                    return_ty,
                    body,
                    ..
                } => {
                    self.check_param_defaults(*params);
                    if let Some(body) = body {
                        let ret = self.type_of_type_expr(*return_ty);
                        self.fn_returns.push(ret);
                        self.visit_stmt(*body);
                        self.fn_returns.pop();
                    }
                }
                DeclKind::Var { .. } => self.check_var_decl(decl_id),
                DeclKind::Mod { decls } => self.check_bodies(*decls),
                _ => {}
            }
        }
    }

    fn check_param_defaults(&mut self, params: DeclRange) {
        for &param in self.ast.decls_in(params) {
            if let DeclKind::Param {
                default: Some(default),
                ..
            } = self.ast.decl(param).kind
            {
                let target = self.decl_type(param);
                self.visit_expr(default);
                self.check_assignable(default, target, ErrorCode::E3015);
            }
        }
    }

    fn check_var_decl(&mut self, decl_id: DeclId) {
        let ty = self.decl_type(decl_id);
        if let DeclKind::Var {
            init: Some(init), ..
        } = self.ast.decl(decl_id).kind
        {
            self.visit_expr(init);
            self.check_assignable(init, ty, ErrorCode::E3015);
        }
    }

    // --- Declaration types ---

    /// Memoized type of a declaration. A sentinel poison entry guards
    /// against cyclic nominal definitions.
    fn decl_type(&mut self, decl_id: DeclId) -> Idx {
        let cached = self.table.decl(decl_id);
        if !cached.is_none() {
            return cached;
        }
        self.table.set_decl(decl_id, Idx::ERROR);

        let ty = match &self.ast.decl(decl_id).kind {
            DeclKind::Var { ty, .. }
            | DeclKind::Field { ty }
            | DeclKind::Param { ty, .. }
            | DeclKind::TypeAlias { ty } => self.type_of_type_expr(*ty),
            DeclKind::Fun {
                params,
                return_ty,
                callconv,
                ..
            } => {
                let mut param_types = Vec::new();
                let mut is_vararg = false;
                for &param in self.ast.decls_in(*params) {
                    if let DeclKind::Param { variadic: true, .. } = self.ast.decl(param).kind {
                        is_vararg = true;
                        continue;
                    }
                    param_types.push(self.decl_type(param));
                }
                let ret = self.type_of_type_expr(*return_ty);
                self.pool.fun_of(ret, &param_types, is_vararg, *callconv)
            }
            DeclKind::Struct { members } => {
                let fields = self.field_types(*members);
                self.pool.struct_of(decl_id, &fields)
            }
            DeclKind::Union { members } => {
                let fields = self.field_types(*members);
                self.pool.union_of(decl_id, &fields)
            }
            DeclKind::Enum { constants } => {
                let ty = self.pool.enum_of(decl_id, constants.len() as u32);
                for &constant in self.ast.decls_in(*constants) {
                    self.table.set_decl(constant, ty);
                }
                ty
            }
            // Constants get their type from the enclosing enum; a bare
            // request means the enum itself failed.
            DeclKind::EnumConstant => Idx::ERROR,
            // Modules are namespaces, not values.
            DeclKind::Mod { .. } => Idx::UNIT,
        };

        self.table.set_decl(decl_id, ty);
        ty
    }

    fn field_types(&mut self, members: DeclRange) -> Vec<Idx> {
        self.ast
            .decls_in(members)
            .to_vec()
            .into_iter()
            .map(|member| self.decl_type(member))
            .collect()
    }

    // --- Type expressions ---

    fn type_of_type_expr(&mut self, ty_id: TypeExprId) -> Idx {
        let cached = self.table.type_expr(ty_id);
        if !cached.is_none() {
            return cached;
        }

        let span = self.ast.type_expr(ty_id).span;
        let ty = match &self.ast.type_expr(ty_id).kind {
            TypeExprKind::Prim(prim) => prim_idx(*prim),
            TypeExprKind::Named(_) | TypeExprKind::Member { .. } => {
                match self.nameres.type_resolutions.get(&ty_id) {
                    Some(&decl) => self.named_decl_type(decl),
                    None => Idx::ERROR, // already reported by name resolution
                }
            }
            TypeExprKind::Mut(base) => {
                let base = self.type_of_type_expr(*base);
                if base.is_error() {
                    Idx::ERROR
                } else if self.pool.can_add_mut(base) {
                    self.pool.mut_of(base)
                } else {
                    self.illegal_modifier(span, "mut", base)
                }
            }
            TypeExprKind::Const(base) => {
                let base = self.type_of_type_expr(*base);
                if base.is_error() {
                    Idx::ERROR
                } else if self.pool.can_add_const(base) {
                    self.pool.const_of(base)
                } else {
                    self.illegal_modifier(span, "const", base)
                }
            }
            TypeExprKind::Ptr(base) => {
                let base = self.type_of_type_expr(*base);
                self.pool.ptr_to(base)
            }
            TypeExprKind::Ref(base) => {
                let base = self.type_of_type_expr(*base);
                if base.is_error() {
                    Idx::ERROR
                } else if self.pool.can_add_ref(base) {
                    self.pool.ref_to(base)
                } else {
                    self.illegal_modifier(span, "&", base)
                }
            }
            TypeExprKind::Opt(base) => {
                let base = self.type_of_type_expr(*base);
                if base.is_error() {
                    Idx::ERROR
                } else if self.pool.can_add_opt(base) {
                    self.pool.opt_of(base)
                } else {
                    self.illegal_modifier(span, "?", base)
                }
            }
            TypeExprKind::Array { len, elem } => {
                let elem_ty = self.type_of_type_expr(*elem);
                let len_value = len.and_then(|len| self.const_len(len));
                match (len_value, elem_ty.is_error()) {
                    (Some(n), false) if self.pool.can_add_array(elem_ty) => {
                        self.pool.array_of(n, elem_ty)
                    }
                    (Some(_), false) => self.illegal_modifier(span, "[]", elem_ty),
                    _ => Idx::ERROR,
                }
            }
            TypeExprKind::Vector { len, elem } => {
                let elem_ty = self.type_of_type_expr(*elem);
                self.linear_elem_check(span, elem_ty);
                self.pool.vec_of(*len, elem_ty)
            }
            TypeExprKind::Matrix { rows, cols, elem } => {
                let elem_ty = self.type_of_type_expr(*elem);
                self.linear_elem_check(span, elem_ty);
                self.pool.mat_of(*rows, *cols, elem_ty)
            }
            TypeExprKind::Fun {
                params,
                ret,
                callconv,
            } => {
                let param_types: Vec<Idx> = self
                    .ast
                    .type_exprs_in(*params)
                    .to_vec()
                    .into_iter()
                    .map(|p| self.type_of_type_expr(p))
                    .collect();
                let ret = self.type_of_type_expr(*ret);
                self.pool.fun_of(ret, &param_types, false, *callconv)
            }
            TypeExprKind::Error => Idx::ERROR,
        };

        self.table.set_type_expr(ty_id, ty);
        ty
    }

    /// Resolve a named type reference to the referenced declaration's
    /// type, following aliases.
    fn named_decl_type(&mut self, decl: DeclId) -> Idx {
        self.decl_type(decl)
    }

    /// Array lengths must be integer literals.
    fn const_len(&mut self, len: ExprId) -> Option<u32> {
        let ty = self.visit_expr(len);
        if ty.is_error() {
            return None;
        }
        if let ExprKind::IntLit { value, .. } = self.ast.expr(len).kind {
            return Some(u32::try_from(value).unwrap_or(u32::MAX));
        }
        let span = self.ast.expr(len).span;
        self.error(
            ErrorCode::E3001,
            "array length must be an integer literal".to_string(),
            span,
            "expected an integer literal",
        );
        None
    }

    fn linear_elem_check(&mut self, span: Span, elem: Idx) {
        if !elem.is_error() && !self.pool.is_arithmetic(elem) {
            self.error(
                ErrorCode::E3002,
                "vector and matrix elements must be arithmetic".to_string(),
                span,
                "element type is not arithmetic",
            );
        }
    }

    fn illegal_modifier(&mut self, span: Span, modifier: &str, base: Idx) -> Idx {
        let base_name = self.display(base);
        self.error(
            ErrorCode::E3015,
            format!("`{modifier}` cannot be applied to `{base_name}`"),
            span,
            "illegal type modifier",
        );
        Idx::ERROR
    }

    // --- Statements ---

    fn visit_stmt(&mut self, stmt_id: StmtId) {
        match &self.ast.stmt(stmt_id).kind {
            StmtKind::Expr(expr) => {
                self.visit_expr(*expr);
            }
            StmtKind::Var(decl) => self.check_var_decl(*decl),
            StmtKind::Block(stmts) => {
                for &stmt in self.ast.stmts_in(*stmts) {
                    self.visit_stmt(stmt);
                }
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.check_bool_cond(*cond);
                self.visit_stmt(*then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_stmt(*else_branch);
                }
            }
            StmtKind::While { cond, body } => {
                self.check_bool_cond(*cond);
                self.visit_stmt(*body);
            }
            StmtKind::DoWhile { body, cond } => {
                self.visit_stmt(*body);
                self.check_bool_cond(*cond);
            }
            StmtKind::For { var, iter, body } => {
                self.check_for(*var, *iter);
                self.visit_stmt(*body);
            }
            StmtKind::Loop { body } => self.visit_stmt(*body),
            StmtKind::Return(value) => self.check_return(stmt_id, *value),
            StmtKind::Defer(body) => self.visit_stmt(*body),
            StmtKind::Break | StmtKind::Continue | StmtKind::Error => {}
        }
    }

    fn check_bool_cond(&mut self, cond: ExprId) {
        let ty = self.visit_expr(cond);
        if ty.is_error() {
            return;
        }
        if self.pool.underlying(ty) != Idx::BOOL {
            let span = self.ast.expr(cond).span;
            let found = self.display(ty);
            self.error(
                ErrorCode::E3003,
                format!("condition must be `bool`, found `{found}`"),
                span,
                "expected `bool`",
            );
        }
    }

    /// `for v: T in a..b` — the iterable must be an integer range whose
    /// endpoints convert to the loop variable's type.
    fn check_for(&mut self, var: DeclId, iter: ExprId) {
        let var_ty = self.decl_type(var);
        let var_value = self.pool.underlying(var_ty);
        if !var_value.is_error() && !self.pool.is_integer(var_value) {
            let span = self.ast.decl(var).span;
            self.error(
                ErrorCode::E3001,
                "loop variables iterate integer ranges".to_string(),
                span,
                "expected an integer type",
            );
        }

        self.visit_expr(iter);
        if let ExprKind::Binary {
            op: BinOp::Range,
            lhs,
            rhs,
        } = self.ast.expr(iter).kind
        {
            self.check_assignable(lhs, var_ty, ErrorCode::E3015);
            self.check_assignable(rhs, var_ty, ErrorCode::E3015);
        } else if !self.table.expr(iter).is_error() {
            let span = self.ast.expr(iter).span;
            self.error(
                ErrorCode::E3001,
                "`for` iterates over a range expression".to_string(),
                span,
                "expected `start..end`",
            );
        }
    }

    fn check_return(&mut self, stmt_id: StmtId, value: Option<ExprId>) {
        let Some(&expected) = self.fn_returns.last() else {
            return;
        };
        match value {
            Some(value) => {
                self.visit_expr(value);
                self.check_assignable(value, expected, ErrorCode::E3012);
            }
            None => {
                if !expected.is_unit() && !expected.is_error() {
                    let span = self.ast.stmt(stmt_id).span;
                    let expected_name = self.display(expected);
                    self.error(
                        ErrorCode::E3012,
                        format!("function returns `{expected_name}`, not `unit`"),
                        span,
                        "missing return value",
                    );
                }
            }
        }
    }

    // --- Expressions ---

    fn visit_expr(&mut self, expr_id: ExprId) -> Idx {
        let cached = self.table.expr(expr_id);
        if !cached.is_none() {
            return cached;
        }
        let ty = self.compute_expr(expr_id);
        self.table.set_expr(expr_id, ty);
        ty
    }

    fn compute_expr(&mut self, expr_id: ExprId) -> Idx {
        let span = self.ast.expr(expr_id).span;
        match self.ast.expr(expr_id).kind.clone() {
            ExprKind::IntLit { value, suffix } => {
                let ty = suffix.map_or(Idx::I32, suffix_idx);
                if !self.pool.literal_fits(value, ty) {
                    let name = self.display(ty);
                    self.error(
                        ErrorCode::E3016,
                        format!("integer literal does not fit in `{name}`"),
                        span,
                        "literal too large for its type",
                    );
                }
                ty
            }
            ExprKind::FloatLit { suffix, .. } => match suffix {
                Some(vela_ir::NumSuffix::F64) => Idx::F64,
                _ => Idx::F32,
            },
            ExprKind::StrLit(_) => self.pool.ptr_to(Idx::U8),
            ExprKind::CharLit(_) => Idx::CHAR,
            ExprKind::BoolLit(_) => Idx::BOOL,
            ExprKind::NullLit => Idx::NULL,
            ExprKind::Ident(_) => self.ident_type(expr_id),
            ExprKind::Unary { op, operand } => self.unary(expr_id, op, operand, span),
            ExprKind::Binary { op, lhs, rhs } => self.binary(expr_id, op, lhs, rhs, span),
            ExprKind::Call { callee, args } => self.call(callee, args, span),
            ExprKind::Member {
                owner,
                access,
                member,
                member_span,
            } => self.member(expr_id, owner, access, member, member_span),
            ExprKind::Index { base, index } => self.index(base, index),
            ExprKind::Cast { operand, ty } => self.cast(operand, ty, span),
            ExprKind::SizeOf(ty) | ExprKind::AlignOf(ty) => {
                self.type_of_type_expr(ty);
                Idx::USIZE
            }
            ExprKind::VectorLit { elems } => self.vector_lit(elems, span),
            ExprKind::MatrixLit { rows, cols, elems } => {
                self.matrix_lit(rows, cols, elems, span)
            }
            ExprKind::Error => Idx::ERROR,
        }
    }

    fn ident_type(&mut self, expr_id: ExprId) -> Idx {
        let Some(&decl_id) = self.resolutions.get(&expr_id) else {
            return Idx::ERROR; // unresolved, already reported
        };
        match &self.ast.decl(decl_id).kind {
            DeclKind::Var { .. } | DeclKind::Param { .. } | DeclKind::Field { .. } => {
                let ty = self.decl_type(decl_id);
                if ty.is_error() {
                    Idx::ERROR
                } else {
                    self.pool.ref_to(ty)
                }
            }
            DeclKind::Fun { .. } => self.decl_type(decl_id),
            // Namespace identifiers only appear as member-access owners;
            // any other use was reported during name resolution.
            _ => Idx::ERROR,
        }
    }

    // --- Operators ---

    fn unary(&mut self, expr_id: ExprId, op: UnOp, operand: ExprId, span: Span) -> Idx {
        let operand_ty = self.visit_expr(operand);
        if operand_ty.is_error() {
            return Idx::ERROR;
        }
        let value = self.pool.underlying(operand_ty);
        let operand_span = self.ast.expr(operand).span;

        match op {
            UnOp::Pos | UnOp::Neg => {
                if let Some(family) = self.family_of(value) {
                    self.op_families.insert(expr_id, family);
                    value
                } else {
                    self.expected_arithmetic(operand_span, value)
                }
            }
            UnOp::BitNot => {
                if self.pool.is_integer(value) {
                    value
                } else {
                    self.expected_integer(operand_span, value)
                }
            }
            UnOp::Not => {
                if value == Idx::BOOL {
                    Idx::BOOL
                } else {
                    let found = self.display(value);
                    self.error(
                        ErrorCode::E3003,
                        format!("`!` needs a `bool` operand, found `{found}`"),
                        operand_span,
                        "expected `bool`",
                    );
                    Idx::ERROR
                }
            }
            UnOp::Deref => {
                if self.pool.tag(value) == Tag::Ptr {
                    let pointee = self.pool.base(value);
                    self.pool.ref_to(pointee)
                } else {
                    let found = self.display(value);
                    self.error(
                        ErrorCode::E3006,
                        format!("cannot dereference `{found}`"),
                        operand_span,
                        "expected a pointer",
                    );
                    Idx::ERROR
                }
            }
            UnOp::AddrOf => {
                if self.pool.is_reference(operand_ty) {
                    let pointee = self.pool.remove_const_mut_ref(operand_ty);
                    self.pool.ptr_to(pointee)
                } else {
                    self.error(
                        ErrorCode::E3008,
                        "`&` needs an addressable operand".to_string(),
                        operand_span,
                        "not an addressable expression",
                    );
                    Idx::ERROR
                }
            }
            UnOp::PreInc | UnOp::PreDec | UnOp::PostInc | UnOp::PostDec => {
                if !self.pool.is_reference(operand_ty) {
                    self.error(
                        ErrorCode::E3008,
                        format!("`{}` needs an addressable operand", op.symbol()),
                        operand_span,
                        "not an addressable expression",
                    );
                    return Idx::ERROR;
                }
                if !self.pool.is_mutable_reference(operand_ty) {
                    self.error(
                        ErrorCode::E3004,
                        format!("`{}` needs a mutable operand", op.symbol()),
                        operand_span,
                        "operand is not mutable",
                    );
                    return Idx::ERROR;
                }
                if !self.pool.is_arithmetic(value) {
                    return self.expected_arithmetic(operand_span, value);
                }
                if let Some(family) = self.family_of(value) {
                    self.op_families.insert(expr_id, family);
                }
                // Pre forms stay l-values; post forms yield the old value.
                if matches!(op, UnOp::PreInc | UnOp::PreDec) {
                    operand_ty
                } else {
                    value
                }
            }
            UnOp::Unwrap => {
                if self.pool.tag(value) == Tag::Opt {
                    self.pool.base(value)
                } else {
                    let found = self.display(value);
                    self.error(
                        ErrorCode::E3005,
                        format!("`!` unwraps optionals, found `{found}`"),
                        operand_span,
                        "expected an optional",
                    );
                    Idx::ERROR
                }
            }
        }
    }

    fn binary(&mut self, expr_id: ExprId, op: BinOp, lhs: ExprId, rhs: ExprId, span: Span) -> Idx {
        if op.is_assign() {
            return self.assign(expr_id, op, lhs, rhs);
        }

        let lhs_ty = self.visit_expr(lhs);
        let rhs_ty = self.visit_expr(rhs);
        if lhs_ty.is_error() || rhs_ty.is_error() {
            return Idx::ERROR;
        }
        let mut lv = self.pool.underlying(lhs_ty);
        let mut rv = self.pool.underlying(rhs_ty);
        let lhs_span = self.ast.expr(lhs).span;
        let rhs_span = self.ast.expr(rhs).span;

        if op.is_arithmetic() {
            // Vector and matrix operands take the element-wise path.
            if self.is_linear(lv) || self.is_linear(rv) {
                return self.linear_binary(expr_id, lv, rv, span);
            }
            lv = self.promote_untyped_literal(lhs, lv, rv);
            rv = self.promote_untyped_literal(rhs, rv, lv);
            if !self.pool.is_arithmetic(lv) {
                return self.expected_arithmetic(lhs_span, lv);
            }
            if !self.pool.is_arithmetic(rv) {
                return self.expected_arithmetic(rhs_span, rv);
            }
            self.warn_mixed_signedness(span, lv, rv);
            let result = self.pool.promote(lv, rv);
            if let Some(family) = self.family_of(result) {
                self.op_families.insert(expr_id, family);
            }
            return result;
        }

        if op.is_bitwise() || op.is_shift() {
            if !self.pool.is_integer(lv) {
                return self.expected_integer(lhs_span, lv);
            }
            if !self.pool.is_integer(rv) {
                return self.expected_integer(rhs_span, rv);
            }
            if let Some(family) = self.family_of(lv) {
                self.op_families.insert(expr_id, family);
            }
            // Both families keep the left operand's type.
            return lv;
        }

        if op.is_logical() {
            for (ty, sp) in [(lv, lhs_span), (rv, rhs_span)] {
                if ty != Idx::BOOL {
                    let found = self.display(ty);
                    self.error(
                        ErrorCode::E3003,
                        format!("logical operands must be `bool`, found `{found}`"),
                        sp,
                        "expected `bool`",
                    );
                    return Idx::ERROR;
                }
            }
            return Idx::BOOL;
        }

        if op.is_comparison() {
            // Pointers compare against pointers of the same pointee.
            if self.pool.tag(lv) == Tag::Ptr && self.pool.tag(rv) == Tag::Ptr {
                self.op_families.insert(expr_id, OpFamily::Ptr);
                return Idx::BOOL;
            }
            lv = self.promote_untyped_literal(lhs, lv, rv);
            rv = self.promote_untyped_literal(rhs, rv, lv);
            if !self.pool.is_arithmetic(lv) {
                return self.expected_arithmetic(lhs_span, lv);
            }
            if !self.pool.is_arithmetic(rv) {
                return self.expected_arithmetic(rhs_span, rv);
            }
            self.warn_mixed_signedness(span, lv, rv);
            let common = self.pool.promote(lv, rv);
            if let Some(family) = self.family_of(common) {
                self.op_families.insert(expr_id, family);
            }
            return Idx::BOOL;
        }

        debug_assert_eq!(op, BinOp::Range);
        if !self.pool.is_integer(lv) {
            return self.expected_integer(lhs_span, lv);
        }
        if !self.pool.is_integer(rv) {
            return self.expected_integer(rhs_span, rv);
        }
        self.pool.promote(lv, rv)
    }

    fn assign(&mut self, expr_id: ExprId, op: BinOp, lhs: ExprId, rhs: ExprId) -> Idx {
        let lhs_ty = self.visit_expr(lhs);
        let rhs_ty = self.visit_expr(rhs);
        if lhs_ty.is_error() || rhs_ty.is_error() {
            return Idx::ERROR;
        }
        let lhs_span = self.ast.expr(lhs).span;

        if !self.pool.is_reference(lhs_ty) {
            self.error(
                ErrorCode::E3008,
                "left side of assignment is not assignable".to_string(),
                lhs_span,
                "expected an addressable expression",
            );
            return Idx::ERROR;
        }
        if !self.pool.is_mutable_reference(lhs_ty) {
            self.error(
                ErrorCode::E3004,
                "cannot assign to an immutable location".to_string(),
                lhs_span,
                "this location is not `mut`",
            );
            return Idx::ERROR;
        }

        let target = self.pool.underlying(lhs_ty);
        if let Some(base) = op.compound_base() {
            let rv = self.pool.underlying(rhs_ty);
            if base.is_arithmetic() {
                if !self.pool.is_arithmetic(target) {
                    return self.expected_arithmetic(lhs_span, target);
                }
            } else if !self.pool.is_integer(target) {
                return self.expected_integer(lhs_span, target);
            }
            if base.is_arithmetic() && !rv.is_error() {
                self.warn_mixed_signedness(self.ast.expr(expr_id).span, target, rv);
            }
            if let Some(family) = self.family_of(target) {
                self.op_families.insert(expr_id, family);
            }
        }

        self.check_assignable(rhs, target, ErrorCode::E3015);
        lhs_ty
    }

    fn linear_binary(&mut self, expr_id: ExprId, lv: Idx, rv: Idx, span: Span) -> Idx {
        let (lt, rt) = (self.pool.tag(lv), self.pool.tag(rv));
        match (lt, rt) {
            (Tag::Vector, Tag::Vector) => {
                if self.pool.vector_len(lv) != self.pool.vector_len(rv) {
                    self.error(
                        ErrorCode::E3017,
                        format!(
                            "vector lengths differ: {} vs {}",
                            self.pool.vector_len(lv),
                            self.pool.vector_len(rv)
                        ),
                        span,
                        "operands must have the same length",
                    );
                    return Idx::ERROR;
                }
                let elem = self
                    .pool
                    .promote(self.pool.elem_type(lv), self.pool.elem_type(rv));
                let result = self.pool.vec_of(self.pool.vector_len(lv), elem);
                if let Some(family) = self.family_of(result) {
                    self.op_families.insert(expr_id, family);
                }
                result
            }
            (Tag::Matrix, Tag::Matrix) => {
                if self.pool.matrix_dims(lv) != self.pool.matrix_dims(rv) {
                    let (lr, lc) = self.pool.matrix_dims(lv);
                    let (rr, rc) = self.pool.matrix_dims(rv);
                    self.error(
                        ErrorCode::E3018,
                        format!("matrix dimensions differ: {lr}x{lc} vs {rr}x{rc}"),
                        span,
                        "operands must have the same dimensions",
                    );
                    return Idx::ERROR;
                }
                let (rows, cols) = self.pool.matrix_dims(lv);
                let elem = self
                    .pool
                    .promote(self.pool.elem_type(lv), self.pool.elem_type(rv));
                let result = self.pool.mat_of(rows, cols, elem);
                if let Some(family) = self.family_of(result) {
                    self.op_families.insert(expr_id, family);
                }
                result
            }
            (Tag::Vector, _) | (_, Tag::Vector) => {
                self.error(
                    ErrorCode::E3009,
                    "both operands must be vectors".to_string(),
                    span,
                    "mixed vector and non-vector operands",
                );
                Idx::ERROR
            }
            _ => {
                self.error(
                    ErrorCode::E3010,
                    "both operands must be matrices".to_string(),
                    span,
                    "mixed matrix and non-matrix operands",
                );
                Idx::ERROR
            }
        }
    }

    // --- Calls, members, indexing, casts ---

    fn call(&mut self, callee: ExprId, args: vela_ir::ExprRange, span: Span) -> Idx {
        let callee_ty = self.visit_expr(callee);
        let arg_ids: Vec<ExprId> = self.ast.exprs_in(args).to_vec();
        for &arg in &arg_ids {
            self.visit_expr(arg);
        }
        if callee_ty.is_error() {
            return Idx::ERROR;
        }

        let fun = self.pool.underlying(callee_ty);
        if self.pool.tag(fun) != Tag::Fun {
            let found = self.display(fun);
            self.error(
                ErrorCode::E3019,
                format!("`{found}` is not callable"),
                self.ast.expr(callee).span,
                "expected a function",
            );
            return Idx::ERROR;
        }

        let params = self.pool.fun_params(fun);
        let is_vararg = self.pool.fun_is_vararg(fun);
        if arg_ids.len() < params.len() {
            self.error(
                ErrorCode::E3014,
                format!(
                    "this call needs {} argument{}, but {} were supplied",
                    params.len(),
                    if params.len() == 1 { "" } else { "s" },
                    arg_ids.len()
                ),
                span,
                "too few arguments",
            );
        } else if arg_ids.len() > params.len() && !is_vararg {
            self.error(
                ErrorCode::E3013,
                format!(
                    "this call takes {} argument{}, but {} were supplied",
                    params.len(),
                    if params.len() == 1 { "" } else { "s" },
                    arg_ids.len()
                ),
                span,
                "too many arguments",
            );
        }

        for (&arg, &param) in arg_ids.iter().zip(params.iter()) {
            self.check_assignable(arg, param, ErrorCode::E3015);
        }

        self.pool.fun_return(fun)
    }

    fn member(
        &mut self,
        expr_id: ExprId,
        owner: ExprId,
        access: MemberAccess,
        member: Name,
        member_span: Span,
    ) -> Idx {
        // Module and enum owners are namespace paths, not values.
        if let Some(ns) = self.try_namespace(owner) {
            return match ns {
                Namespace::Poison => Idx::ERROR,
                Namespace::Module(mod_decl) => {
                    self.module_member(expr_id, mod_decl, member, member_span)
                }
                Namespace::Enum(enum_decl) => {
                    self.enum_member(expr_id, enum_decl, member, member_span)
                }
            };
        }

        let owner_ty = self.visit_expr(owner);
        if owner_ty.is_error() {
            return Idx::ERROR;
        }
        let owner_span = self.ast.expr(owner).span;
        let value = self.pool.underlying(owner_ty);

        match access {
            MemberAccess::Direct => {
                let Some((composite, _)) = self.composite_of(value) else {
                    return self.not_a_composite(owner_span, value);
                };
                let mutable = self.pool.is_mutable_reference(owner_ty);
                let field = self.field_access(expr_id, composite, member, member_span);
                if self.pool.is_reference(owner_ty) {
                    self.make_ref(field, mutable)
                } else {
                    field.value
                }
            }
            MemberAccess::Indirect => {
                if self.pool.tag(value) != Tag::Ptr {
                    let found = self.display(value);
                    self.error(
                        ErrorCode::E3006,
                        format!("`*.` needs a pointer, found `{found}`"),
                        owner_span,
                        "expected a pointer",
                    );
                    return Idx::ERROR;
                }
                let pointee = self.pool.base(value);
                let Some((composite, mutable)) = self.composite_of(pointee) else {
                    return self.not_a_composite(owner_span, pointee);
                };
                let field = self.field_access(expr_id, composite, member, member_span);
                self.make_ref(field, mutable)
            }
            MemberAccess::NullSafe => {
                if self.pool.tag(value) != Tag::Opt {
                    let found = self.display(value);
                    self.error(
                        ErrorCode::E3005,
                        format!("`?.` needs an optional, found `{found}`"),
                        owner_span,
                        "expected an optional",
                    );
                    return Idx::ERROR;
                }
                let inner = self.pool.base(value);
                let Some((composite, _)) = self.composite_of(inner) else {
                    return self.not_a_composite(owner_span, inner);
                };
                let field = self.field_access(expr_id, composite, member, member_span);
                if field.poisoned {
                    Idx::ERROR
                } else {
                    self.pool.opt_of(field.value)
                }
            }
        }
    }

    fn module_member(
        &mut self,
        expr_id: ExprId,
        mod_decl: DeclId,
        member: Name,
        member_span: Span,
    ) -> Idx {
        let Some(&mod_scope) = self.nameres.mod_scopes.get(&mod_decl) else {
            return Idx::ERROR;
        };
        let Some(found) = self.nameres.scopes.lookup_local(mod_scope, member) else {
            self.error(
                ErrorCode::E2006,
                format!("module has no member `{}`", self.interner.lookup(member)),
                member_span,
                "no such member",
            );
            return Idx::ERROR;
        };

        let found_decl = self.ast.decl(found);
        if found_decl.vis != vela_ir::Visibility::Public {
            self.diags.push(
                Diagnostic::error(
                    ErrorCode::E2007,
                    format!("member `{}` is not public", self.interner.lookup(member)),
                )
                .with_label(member_span, "private member")
                .with_secondary(found_decl.name_span, "declared here"),
            );
        }
        self.resolutions.insert(expr_id, found);

        match &found_decl.kind {
            DeclKind::Var { .. } => {
                let ty = self.decl_type(found);
                if ty.is_error() {
                    Idx::ERROR
                } else {
                    self.pool.ref_to(ty)
                }
            }
            DeclKind::Fun { .. } => self.decl_type(found),
            // A nested module as the final path element is not a value;
            // as an owner it is handled by `try_namespace`.
            _ => {
                self.error(
                    ErrorCode::E2003,
                    format!(
                        "`{}` is a {}, not an expression",
                        self.interner.lookup(member),
                        found_decl.kind.describe()
                    ),
                    member_span,
                    "cannot be used as a value",
                );
                Idx::ERROR
            }
        }
    }

    fn enum_member(
        &mut self,
        expr_id: ExprId,
        enum_decl: DeclId,
        member: Name,
        member_span: Span,
    ) -> Idx {
        let DeclKind::Enum { constants } = &self.ast.decl(enum_decl).kind else {
            return Idx::ERROR;
        };
        for (ordinal, &constant) in self.ast.decls_in(*constants).iter().enumerate() {
            if self.ast.decl(constant).name == member {
                self.resolutions.insert(expr_id, constant);
                self.member_indices.insert(expr_id, ordinal as u32);
                return self.decl_type(enum_decl);
            }
        }
        self.error(
            ErrorCode::E2006,
            format!(
                "enum has no constant `{}`",
                self.interner.lookup(member)
            ),
            member_span,
            "no such constant",
        );
        Idx::ERROR
    }

    fn index(&mut self, base: ExprId, index: ExprId) -> Idx {
        let base_ty = self.visit_expr(base);
        let index_ty = self.visit_expr(index);
        if base_ty.is_error() || index_ty.is_error() {
            return Idx::ERROR;
        }

        let index_value = self.pool.underlying(index_ty);
        if !self.pool.is_integer(index_value) {
            let span = self.ast.expr(index).span;
            self.expected_integer(span, index_value);
        }

        let value = self.pool.underlying(base_ty);
        let elem = match self.pool.tag(value) {
            Tag::Array | Tag::Vector => self.pool.elem_type(value),
            _ => {
                let span = self.ast.expr(base).span;
                let found = self.display(value);
                self.error(
                    ErrorCode::E3007,
                    format!("cannot index `{found}`"),
                    span,
                    "expected an array or vector",
                );
                return Idx::ERROR;
            }
        };

        if self.pool.is_reference(base_ty) {
            let mutable = self.pool.is_mutable_reference(base_ty);
            let inner = if mutable { self.pool.mut_of(elem) } else { elem };
            self.pool.ref_to(inner)
        } else {
            elem
        }
    }

    fn cast(&mut self, operand: ExprId, ty: TypeExprId, span: Span) -> Idx {
        let operand_ty = self.visit_expr(operand);
        let target = self.type_of_type_expr(ty);
        if operand_ty.is_error() || target.is_error() {
            return Idx::ERROR;
        }
        if !self.pool.is_explicitly_convertible(operand_ty, target) {
            let from = self.display(operand_ty);
            let to = self.display(target);
            self.error(
                ErrorCode::E3015,
                format!("cannot convert `{from}` to `{to}`"),
                span,
                "illegal conversion",
            );
            return Idx::ERROR;
        }
        self.pool.remove_const_mut(target)
    }

    fn vector_lit(&mut self, elems: vela_ir::ExprRange, span: Span) -> Idx {
        let elem_ids: Vec<ExprId> = self.ast.exprs_in(elems).to_vec();
        if elem_ids.is_empty() {
            self.error(
                ErrorCode::E3009,
                "vector literals need at least one element".to_string(),
                span,
                "empty vector literal",
            );
            return Idx::ERROR;
        }
        let Some(elem) = self.common_element_type(&elem_ids) else {
            return Idx::ERROR;
        };
        self.pool.vec_of(elem_ids.len() as u32, elem)
    }

    fn matrix_lit(&mut self, rows: u16, cols: u16, elems: vela_ir::ExprRange, span: Span) -> Idx {
        let elem_ids: Vec<ExprId> = self.ast.exprs_in(elems).to_vec();
        if rows == 0 || cols == 0 {
            self.error(
                ErrorCode::E3010,
                "matrix literals need at least one element".to_string(),
                span,
                "empty matrix literal",
            );
            return Idx::ERROR;
        }
        let Some(elem) = self.common_element_type(&elem_ids) else {
            return Idx::ERROR;
        };
        self.pool.mat_of(u32::from(rows), u32::from(cols), elem)
    }

    /// The promoted element type of a literal's elements; all must be
    /// arithmetic.
    fn common_element_type(&mut self, elems: &[ExprId]) -> Option<Idx> {
        let mut common = None;
        for &elem in elems {
            let ty = self.visit_expr(elem);
            if ty.is_error() {
                return None;
            }
            let value = self.pool.underlying(ty);
            if !self.pool.is_arithmetic(value) {
                let span = self.ast.expr(elem).span;
                self.expected_arithmetic(span, value);
                return None;
            }
            common = Some(match common {
                None => value,
                Some(prev) => self.pool.promote(prev, value),
            });
        }
        common
    }

    // --- Shared checks ---

    /// Check that `expr` can initialize a slot of type `target`,
    /// reporting with `code` otherwise. Untyped integer literals adopt
    /// the target's width when they fit.
    fn check_assignable(&mut self, expr: ExprId, target: Idx, code: ErrorCode) {
        let expr_ty = self.table.expr(expr);
        if expr_ty.is_error() || expr_ty.is_none() || target.is_error() {
            return;
        }
        let target_value = {
            let stripped = self.pool.remove_const_mut(target);
            self.pool.remove_mut(stripped)
        };

        if let ExprKind::IntLit {
            value,
            suffix: None,
        } = self.ast.expr(expr).kind
        {
            if self.pool.is_integer(target_value) {
                if self.pool.literal_fits(value, target_value) {
                    self.table.set_expr(expr, target_value);
                } else {
                    let span = self.ast.expr(expr).span;
                    let name = self.display(target_value);
                    self.error(
                        ErrorCode::E3016,
                        format!("integer literal does not fit in `{name}`"),
                        span,
                        "literal too large for its type",
                    );
                }
                return;
            }
        }

        if !self.pool.is_implicitly_convertible(expr_ty, target_value) {
            let span = self.ast.expr(expr).span;
            let from = self.display(expr_ty);
            let to = self.display(target_value);
            let (message, label) = if code == ErrorCode::E3012 {
                (
                    format!("return value `{from}` is incompatible with return type `{to}`"),
                    "incompatible return value",
                )
            } else {
                (
                    format!("cannot convert `{from}` to `{to}`"),
                    "illegal conversion",
                )
            };
            self.error(code, message, span, label);
        }
    }

    /// Re-type an untyped `i32` literal to its peer's wider integer type.
    fn promote_untyped_literal(&mut self, expr: ExprId, own: Idx, peer: Idx) -> Idx {
        let ExprKind::IntLit {
            value,
            suffix: None,
        } = self.ast.expr(expr).kind
        else {
            return own;
        };
        if own != Idx::I32 || !self.pool.is_integer(peer) || peer == Idx::I32 {
            return own;
        }
        let wider = self
            .pool
            .int_bit_width(peer)
            .is_some_and(|w| w > 32);
        if !wider {
            return own;
        }
        if self.pool.literal_fits(value, peer) {
            self.table.set_expr(expr, peer);
            peer
        } else {
            own
        }
    }

    fn warn_mixed_signedness(&mut self, span: Span, a: Idx, b: Idx) {
        if self.pool.is_integer(a)
            && self.pool.is_integer(b)
            && self.pool.is_signed(a) != self.pool.is_signed(b)
        {
            self.diags.push(
                Diagnostic::warning(
                    ErrorCode::E3020,
                    "mixing signed and unsigned operands".to_string(),
                )
                .with_label(span, "operands differ in signedness"),
            );
        }
    }

    // --- Composite helpers ---

    /// Strip `const`/`mut` down to a struct or union, also reporting
    /// whether a `mut` wrapper was crossed.
    fn composite_of(&self, value: Idx) -> Option<(Idx, bool)> {
        let mut idx = value;
        let mut mutable = false;
        loop {
            match self.pool.tag(idx) {
                Tag::Mut => {
                    mutable = true;
                    idx = self.pool.base(idx);
                }
                Tag::Const => idx = self.pool.base(idx),
                Tag::Struct | Tag::Union => return Some((idx, mutable)),
                _ => return None,
            }
        }
    }

    fn not_a_composite(&mut self, span: Span, value: Idx) -> Idx {
        let found = self.display(value);
        self.error(
            ErrorCode::E2006,
            format!("`{found}` has no members"),
            span,
            "not a struct or union",
        );
        Idx::ERROR
    }

    /// Find a field by name within a struct/union type.
    fn field_access(
        &mut self,
        expr_id: ExprId,
        composite: Idx,
        member: Name,
        member_span: Span,
    ) -> FieldLookup {
        let decl_id = self.pool.nominal_decl(composite);
        let members = match &self.ast.decl(decl_id).kind {
            DeclKind::Struct { members } | DeclKind::Union { members } => *members,
            _ => return FieldLookup::poison(),
        };
        for (ordinal, &field) in self.ast.decls_in(members).iter().enumerate() {
            if self.ast.decl(field).name == member {
                self.resolutions.insert(expr_id, field);
                self.member_indices.insert(expr_id, ordinal as u32);
                let declared = self.decl_type(field);
                return FieldLookup {
                    value: self.pool.remove_mut(declared),
                    declared_mut: self.pool.tag(declared) == Tag::Mut,
                    poisoned: declared.is_error(),
                };
            }
        }
        let owner_name = self.interner.lookup(self.ast.decl(decl_id).name);
        self.error(
            ErrorCode::E2006,
            format!(
                "`{owner_name}` has no member `{}`",
                self.interner.lookup(member)
            ),
            member_span,
            "no such member",
        );
        FieldLookup::poison()
    }

    fn make_ref(&mut self, field: FieldLookup, owner_mutable: bool) -> Idx {
        if field.poisoned {
            return Idx::ERROR;
        }
        let inner = if owner_mutable || field.declared_mut {
            self.pool.mut_of(field.value)
        } else {
            field.value
        };
        self.pool.ref_to(inner)
    }

    // --- Namespace paths ---

    /// Resolve an expression as a namespace path (`mod` / `mod.mod` /
    /// enum name). Fills in table entries and resolutions for the inner
    /// path nodes so coverage holds.
    fn try_namespace(&mut self, expr: ExprId) -> Option<Namespace> {
        match &self.ast.expr(expr).kind {
            ExprKind::Ident(_) => {
                let decl_id = *self.resolutions.get(&expr)?;
                match self.ast.decl(decl_id).kind {
                    DeclKind::Mod { .. } => {
                        self.table.set_expr(expr, Idx::UNIT);
                        Some(Namespace::Module(decl_id))
                    }
                    DeclKind::Enum { .. } => {
                        self.table.set_expr(expr, Idx::UNIT);
                        Some(Namespace::Enum(decl_id))
                    }
                    _ => None,
                }
            }
            ExprKind::Member {
                owner,
                member,
                member_span,
                ..
            } => {
                let (owner, member, member_span) = (*owner, *member, *member_span);
                let Namespace::Module(mod_decl) = self.try_namespace(owner)? else {
                    return Some(Namespace::Poison);
                };
                let mod_scope = self.nameres.mod_scopes.get(&mod_decl).copied()?;
                let Some(found) = self.nameres.scopes.lookup_local(mod_scope, member) else {
                    self.error(
                        ErrorCode::E2006,
                        format!(
                            "module has no member `{}`",
                            self.interner.lookup(member)
                        ),
                        member_span,
                        "no such member",
                    );
                    self.table.set_expr(expr, Idx::ERROR);
                    return Some(Namespace::Poison);
                };
                match self.ast.decl(found).kind {
                    DeclKind::Mod { .. } => {
                        self.resolutions.insert(expr, found);
                        self.table.set_expr(expr, Idx::UNIT);
                        Some(Namespace::Module(found))
                    }
                    DeclKind::Enum { .. } => {
                        self.resolutions.insert(expr, found);
                        self.table.set_expr(expr, Idx::UNIT);
                        Some(Namespace::Enum(found))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    // --- Diagnostics helpers ---

    fn error(&mut self, code: ErrorCode, message: String, span: Span, label: &str) {
        self.diags
            .push(Diagnostic::error(code, message).with_label(span, label));
    }

    fn expected_arithmetic(&mut self, span: Span, found: Idx) -> Idx {
        let name = self.display(found);
        self.error(
            ErrorCode::E3002,
            format!("expected an arithmetic type, found `{name}`"),
            span,
            "not an arithmetic type",
        );
        Idx::ERROR
    }

    fn expected_integer(&mut self, span: Span, found: Idx) -> Idx {
        let name = self.display(found);
        self.error(
            ErrorCode::E3001,
            format!("expected an integer type, found `{name}`"),
            span,
            "not an integer type",
        );
        Idx::ERROR
    }

    /// Vector or matrix extension type.
    fn is_linear(&self, ty: Idx) -> bool {
        matches!(self.pool.tag(ty), Tag::Vector | Tag::Matrix)
    }

    fn display(&self, ty: Idx) -> String {
        let ast = self.ast;
        let interner = self.interner;
        self.pool.display(ty, &mut |decl| {
            interner.lookup(ast.decl(decl).name).to_string()
        })
    }

    fn family_of(&self, ty: Idx) -> Option<OpFamily> {
        Some(match self.pool.tag(ty) {
            Tag::F32 | Tag::F64 => OpFamily::Float,
            Tag::Vector => match self.family_of(self.pool.elem_type(ty))? {
                OpFamily::Float => OpFamily::VecFloat,
                OpFamily::UInt => OpFamily::VecUInt,
                _ => OpFamily::VecSInt,
            },
            Tag::Matrix => match self.family_of(self.pool.elem_type(ty))? {
                OpFamily::Float => OpFamily::MatFloat,
                OpFamily::UInt => OpFamily::MatUInt,
                _ => OpFamily::MatSInt,
            },
            _ if self.pool.is_integer(ty) => {
                if self.pool.is_signed(ty) {
                    OpFamily::SInt
                } else {
                    OpFamily::UInt
                }
            }
            _ => return None,
        })
    }
}

/// Result of a struct/union field lookup.
#[derive(Copy, Clone)]
struct FieldLookup {
    /// The field's type with any `mut` stripped.
    value: Idx,
    /// Whether the field itself was declared `mut`.
    declared_mut: bool,
    poisoned: bool,
}

impl FieldLookup {
    fn poison() -> Self {
        FieldLookup {
            value: Idx::ERROR,
            declared_mut: false,
            poisoned: true,
        }
    }
}

/// A resolved namespace owner.
enum Namespace {
    Module(DeclId),
    Enum(DeclId),
    /// The path was namespace-shaped but failed to resolve; the error is
    /// already reported.
    Poison,
}

fn prim_idx(prim: PrimType) -> Idx {
    match prim {
        PrimType::I8 => Idx::I8,
        PrimType::I16 => Idx::I16,
        PrimType::I32 => Idx::I32,
        PrimType::I64 => Idx::I64,
        PrimType::Isize => Idx::ISIZE,
        PrimType::U8 => Idx::U8,
        PrimType::U16 => Idx::U16,
        PrimType::U32 => Idx::U32,
        PrimType::U64 => Idx::U64,
        PrimType::Usize => Idx::USIZE,
        PrimType::F32 => Idx::F32,
        PrimType::F64 => Idx::F64,
        PrimType::Char => Idx::CHAR,
        PrimType::Bool => Idx::BOOL,
        PrimType::Unit => Idx::UNIT,
    }
}

fn suffix_idx(suffix: vela_ir::NumSuffix) -> Idx {
    use vela_ir::NumSuffix;
    match suffix {
        NumSuffix::I8 => Idx::I8,
        NumSuffix::I16 => Idx::I16,
        NumSuffix::I32 => Idx::I32,
        NumSuffix::I64 => Idx::I64,
        NumSuffix::Isize => Idx::ISIZE,
        NumSuffix::U8 => Idx::U8,
        NumSuffix::U16 => Idx::U16,
        NumSuffix::U32 => Idx::U32,
        NumSuffix::U64 => Idx::U64,
        NumSuffix::Usize => Idx::USIZE,
        NumSuffix::F32 => Idx::F32,
        NumSuffix::F64 => Idx::F64,
    }
}
