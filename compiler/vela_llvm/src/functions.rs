//! Function declaration and body compilation.
//!
//! Every function is declared first (so calls resolve regardless of
//! order), then bodies are compiled. Stack slots for parameters and local
//! variables are allocated in the entry block before the body is visited.

use inkwell::module::Linkage;
use inkwell::values::FunctionValue;
use vela_ir::ast::{DeclKind, ExprKind, StmtKind};
use vela_ir::{DeclId, DeclRange, StmtId};
use vela_types::Idx;

use crate::context::Codegen;
use crate::types::callconv_id;

impl<'ll> Codegen<'ll, '_> {
    /// Declare every function (prototypes only), walking into modules.
    /// Nested declarations are qualified with their module path.
    pub(crate) fn declare_functions(&mut self, range: DeclRange, prefix: &str) {
        for &decl_id in self.ast.decls_in(range) {
            let decl = self.ast.decl(decl_id);
            match &decl.kind {
                DeclKind::Fun {
                    is_extern,
                    callconv,
                    ..
                } => {
                    let ty = self.analysis.types.decl(decl_id);
                    if ty.is_error() || ty.is_none() {
                        continue;
                    }
                    let fn_type = self.llvm_fn_type(ty);
                    let bare = self.interner.lookup(decl.name);
                    let name = if *is_extern || prefix.is_empty() {
                        bare.to_string()
                    } else {
                        format!("{prefix}{bare}")
                    };
                    let function =
                        self.llmod
                            .add_function(&name, fn_type, Some(Linkage::External));
                    function.set_call_conventions(callconv_id(*callconv));
                    self.functions.insert(decl_id, function);
                }
                DeclKind::Mod { decls } => {
                    let name = self.interner.lookup(decl.name);
                    let nested = format!("{prefix}{name}.");
                    self.declare_functions(*decls, &nested);
                }
                _ => {}
            }
        }
    }

    /// Create module-level variables. Literal initializers become
    /// constant initializers; everything else starts zeroed.
    pub(crate) fn define_globals(&mut self, range: DeclRange) {
        for &decl_id in self.ast.decls_in(range) {
            let decl = self.ast.decl(decl_id);
            match &decl.kind {
                DeclKind::Var { init, .. } => {
                    let ty = self.analysis.types.decl(decl_id);
                    if ty.is_error() || ty.is_none() {
                        continue;
                    }
                    let value_ty = self.analysis.pool.remove_const_mut(ty);
                    let llvm_ty = self.llvm_type(value_ty);
                    let name = self.interner.lookup(decl.name);
                    let global = self.llmod.add_global(llvm_ty, None, name);

                    let initializer = init
                        .and_then(|init| self.const_initializer(init, value_ty))
                        .unwrap_or_else(|| zero_value(llvm_ty));
                    global.set_initializer(&initializer);
                    self.globals.insert(decl_id, global.as_pointer_value());
                }
                DeclKind::Mod { decls } => self.define_globals(*decls),
                _ => {}
            }
        }
    }

    /// Constant initializer for literal global initializers.
    fn const_initializer(
        &mut self,
        init: vela_ir::ExprId,
        ty: Idx,
    ) -> Option<inkwell::values::BasicValueEnum<'ll>> {
        let llvm_ty = self.llvm_type(ty);
        match self.ast.expr(init).kind {
            ExprKind::IntLit { value, .. } => {
                let int_ty = llvm_ty.into_int_type();
                Some(int_ty.const_int(value, false).into())
            }
            ExprKind::FloatLit { bits, .. } => {
                let float_ty = llvm_ty.into_float_type();
                Some(float_ty.const_float(f64::from_bits(bits)).into())
            }
            ExprKind::BoolLit(value) => Some(
                self.llcx
                    .bool_type()
                    .const_int(u64::from(value), false)
                    .into(),
            ),
            ExprKind::CharLit(c) => Some(self.llcx.i32_type().const_int(c as u64, false).into()),
            _ => None,
        }
    }

    /// Compile every function body, walking into modules.
    pub(crate) fn compile_bodies(&mut self, range: DeclRange) {
        for &decl_id in self.ast.decls_in(range) {
            match &self.ast.decl(decl_id).kind {
                DeclKind::Fun {
                    body: Some(body), ..
                } => self.compile_function(decl_id, *body),
                DeclKind::Mod { decls } => self.compile_bodies(*decls),
                _ => {}
            }
        }
    }

    fn compile_function(&mut self, decl_id: DeclId, body: StmtId) {
        let Some(&function) = self.functions.get(&decl_id) else {
            return;
        };
        let DeclKind::Fun { params, .. } = &self.ast.decl(decl_id).kind else {
            return;
        };
        let params = *params;

        self.current_fn = Some(function);
        let fn_ty = self.analysis.types.decl(decl_id);
        self.current_fn_ret = if fn_ty.is_error() || fn_ty.is_none() {
            vela_types::Idx::UNIT
        } else {
            self.analysis.pool.fun_return(fn_ty)
        };
        self.locals.clear();
        self.loops.clear();
        self.defer_stack.clear();

        let entry = self.llcx.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        // Parameter slots: alloca at entry, store the incoming argument.
        let mut arg_index = 0u32;
        for &param in self.ast.decls_in(params) {
            let decl = self.ast.decl(param);
            if matches!(decl.kind, DeclKind::Param { variadic: true, .. }) {
                continue;
            }
            let ty = self.analysis.types.decl(param);
            if ty.is_error() || ty.is_none() {
                continue;
            }
            let llvm_ty = self.llvm_type(self.analysis.pool.remove_const_mut(ty));
            let name = self.interner.lookup(decl.name);
            let slot = self.builder.build_alloca(llvm_ty, name).unwrap();
            if let Some(arg) = function.get_nth_param(arg_index) {
                self.builder.build_store(slot, arg).unwrap();
            }
            self.locals.insert(param, slot);
            arg_index += 1;
        }

        // Local variable slots, also at entry.
        self.alloc_local_slots(body);

        self.gen_stmt(body);

        // Implicit return for functions that fall off the end.
        if !self.block_terminated() {
            self.emit_default_return(function);
        }

        self.current_fn = None;
    }

    /// Walk the body and allocate one stack slot per `var` declaration
    /// (including `for` loop variables) in the entry block.
    fn alloc_local_slots(&mut self, stmt_id: StmtId) {
        match &self.ast.stmt(stmt_id).kind {
            StmtKind::Var(decl) => self.alloc_slot(*decl),
            StmtKind::Block(stmts) => {
                for &stmt in self.ast.stmts_in(*stmts) {
                    self.alloc_local_slots(stmt);
                }
            }
            StmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.alloc_local_slots(*then_branch);
                if let Some(else_branch) = else_branch {
                    self.alloc_local_slots(*else_branch);
                }
            }
            StmtKind::While { body, .. }
            | StmtKind::DoWhile { body, .. }
            | StmtKind::Loop { body } => self.alloc_local_slots(*body),
            StmtKind::For { var, body, .. } => {
                self.alloc_slot(*var);
                self.alloc_local_slots(*body);
            }
            StmtKind::Defer(body) => self.alloc_local_slots(*body),
            StmtKind::Expr(_)
            | StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Return(_)
            | StmtKind::Error => {}
        }
    }

    fn alloc_slot(&mut self, decl_id: DeclId) {
        let ty = self.analysis.types.decl(decl_id);
        if ty.is_error() || ty.is_none() {
            return;
        }
        let llvm_ty = self.llvm_type(self.analysis.pool.remove_const_mut(ty));
        let name = self.interner.lookup(self.ast.decl(decl_id).name);
        let slot = self.builder.build_alloca(llvm_ty, name).unwrap();
        self.locals.insert(decl_id, slot);
    }

    pub(crate) fn emit_default_return(&mut self, function: FunctionValue<'ll>) {
        match function.get_type().get_return_type() {
            None => {
                self.builder.build_return(None).unwrap();
            }
            Some(ret_ty) => {
                let zero = zero_value(ret_ty);
                self.builder.build_return(Some(&zero)).unwrap();
            }
        }
    }
}

/// The all-zero value of a type, used for implicit initialization.
pub(crate) fn zero_value(ty: inkwell::types::BasicTypeEnum<'_>) -> inkwell::values::BasicValueEnum<'_> {
    use inkwell::types::BasicTypeEnum;
    match ty {
        BasicTypeEnum::IntType(t) => t.const_zero().into(),
        BasicTypeEnum::FloatType(t) => t.const_zero().into(),
        BasicTypeEnum::PointerType(t) => t.const_null().into(),
        BasicTypeEnum::StructType(t) => t.const_zero().into(),
        BasicTypeEnum::ArrayType(t) => t.const_zero().into(),
        BasicTypeEnum::VectorType(t) => t.const_zero().into(),
        BasicTypeEnum::ScalableVectorType(t) => t.const_zero().into(),
    }
}
