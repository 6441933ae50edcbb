//! Name resolution pass.
//!
//! One in-order traversal of the AST that builds the scope tree and binds
//! identifiers to declarations. Sibling declarations are inserted into
//! their scope before any body is visited, so self-reference and mutual
//! reference within one scope work. Function, composite, and module
//! bodies push child scopes, as does every block statement.
//!
//! Module member accesses resolve through the module's scope later, in
//! the type-check pass; struct and union field lookups need type
//! information and are also deferred there.

use rustc_hash::FxHashMap;
use tracing::debug;
use vela_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use vela_ir::ast::{DeclKind, ExprKind, StmtKind, TypeExprKind};
use vela_ir::{Ast, DeclId, DeclRange, ExprId, Name, StmtId, StringInterner, TypeExprId};

use crate::scope::{ScopeId, ScopeTree};

/// Everything later passes need from name resolution.
pub(crate) struct NameResOutput {
    pub scopes: ScopeTree,
    /// Identifier expressions bound to their declarations.
    pub resolutions: FxHashMap<ExprId, DeclId>,
    /// Identifier and member types bound to their declarations.
    pub type_resolutions: FxHashMap<TypeExprId, DeclId>,
    /// Module declarations mapped to the scope holding their members.
    pub mod_scopes: FxHashMap<DeclId, ScopeId>,
}

pub(crate) fn resolve(
    ast: &Ast,
    interner: &StringInterner,
    diags: &mut DiagnosticQueue,
) -> NameResOutput {
    let mut pass = NameRes {
        ast,
        interner,
        diags,
        scopes: ScopeTree::new(),
        resolutions: FxHashMap::default(),
        type_resolutions: FxHashMap::default(),
        mod_scopes: FxHashMap::default(),
    };

    pass.declare_all(ScopeId::ROOT, ast.module.decls);
    for &decl in ast.decls_in(ast.module.decls) {
        pass.visit_decl(ScopeId::ROOT, decl);
    }

    debug!(
        scopes = pass.scopes.len(),
        bindings = pass.resolutions.len(),
        "name resolution complete"
    );
    NameResOutput {
        scopes: pass.scopes,
        resolutions: pass.resolutions,
        type_resolutions: pass.type_resolutions,
        mod_scopes: pass.mod_scopes,
    }
}

struct NameRes<'a> {
    ast: &'a Ast,
    interner: &'a StringInterner,
    diags: &'a mut DiagnosticQueue,
    scopes: ScopeTree,
    resolutions: FxHashMap<ExprId, DeclId>,
    type_resolutions: FxHashMap<TypeExprId, DeclId>,
    mod_scopes: FxHashMap<DeclId, ScopeId>,
}

impl NameRes<'_> {
    // --- Declarations ---

    /// Insert every declaration of a scope before visiting any body.
    fn declare_all(&mut self, scope: ScopeId, range: DeclRange) {
        for &decl in self.ast.decls_in(range) {
            self.declare(scope, decl);
        }
    }

    /// Insert one declaration, reporting collisions and shadowing.
    ///
    /// Modules also get their member scope here, ahead of the body visit,
    /// so member types like `m.T` resolve even when `m` is declared later
    /// in the file.
    fn declare(&mut self, scope: ScopeId, decl_id: DeclId) {
        let decl = self.ast.decl(decl_id);
        if decl.name == Name::EMPTY {
            return; // the `...` variadic marker has no name
        }

        if let DeclKind::Mod { decls } = &decl.kind {
            if !self.mod_scopes.contains_key(&decl_id) {
                let mod_scope = self.scopes.push_child(scope);
                self.mod_scopes.insert(decl_id, mod_scope);
                self.declare_all(mod_scope, *decls);
            }
        }

        let shadowed = self.scopes.lookup_outer(scope, decl.name);

        match self.scopes.insert(scope, decl.name, decl_id) {
            Ok(()) => {
                if let Some(outer) = shadowed {
                    let outer_span = self.ast.decl(outer).name_span;
                    self.diags.push(
                        Diagnostic::warning(
                            ErrorCode::E2005,
                            format!(
                                "`{}` shadows an outer declaration",
                                self.interner.lookup(decl.name)
                            ),
                        )
                        .with_label(decl.name_span, "this declaration shadows")
                        .with_secondary(outer_span, "the outer declaration is here"),
                    );
                }
            }
            Err(existing) => {
                let existing_span = self.ast.decl(existing).name_span;
                self.diags.push(
                    Diagnostic::error(
                        ErrorCode::E2001,
                        format!(
                            "`{}` is already declared in this scope",
                            self.interner.lookup(decl.name)
                        ),
                    )
                    .with_label(decl.name_span, "redeclared here")
                    .with_secondary(existing_span, "first declared here"),
                );
            }
        }
    }

    fn visit_decl(&mut self, scope: ScopeId, decl_id: DeclId) {
        let decl = self.ast.decl(decl_id);
        match &decl.kind {
            DeclKind::Var { ty, init } => {
                self.visit_type(scope, *ty);
                if let Some(init) = init {
                    self.visit_expr(scope, *init, false);
                }
            }
            DeclKind::Param { ty, default, .. } => {
                self.visit_type(scope, *ty);
                if let Some(default) = default {
                    self.visit_expr(scope, *default, false);
                }
            }
            DeclKind::Fun {
                params,
                return_ty,
                body,
                ..
            } => {
                self.visit_type(scope, *return_ty);
                let fun_scope = self.scopes.push_child(scope);
                for &param in self.ast.decls_in(*params) {
                    self.declare(fun_scope, param);
                    self.visit_decl(fun_scope, param);
                }
                if let Some(body) = body {
                    self.visit_stmt(fun_scope, *body);
                }
            }
            DeclKind::Field { ty } => self.visit_type(scope, *ty),
            DeclKind::Struct { members } | DeclKind::Union { members } => {
                let member_scope = self.scopes.push_child(scope);
                self.declare_all(member_scope, *members);
                for &member in self.ast.decls_in(*members) {
                    self.visit_decl(member_scope, member);
                }
            }
            DeclKind::Enum { constants } => {
                let constant_scope = self.scopes.push_child(scope);
                self.declare_all(constant_scope, *constants);
            }
            DeclKind::EnumConstant => {}
            DeclKind::Mod { decls } => {
                // The member scope and its bindings were created when this
                // module was declared; only the bodies remain.
                let mod_scope = self
                    .mod_scopes
                    .get(&decl_id)
                    .copied()
                    .unwrap_or(ScopeId::ROOT);
                for &inner in self.ast.decls_in(*decls) {
                    self.visit_decl(mod_scope, inner);
                }
            }
            DeclKind::TypeAlias { ty } => self.visit_type(scope, *ty),
        }
    }

    // --- Statements ---

    fn visit_stmt(&mut self, scope: ScopeId, stmt_id: StmtId) {
        match &self.ast.stmt(stmt_id).kind {
            StmtKind::Expr(expr) => self.visit_expr(scope, *expr, false),
            StmtKind::Var(decl) => {
                self.declare(scope, *decl);
                self.visit_decl(scope, *decl);
            }
            StmtKind::Block(stmts) => {
                let block_scope = self.scopes.push_child(scope);
                for &stmt in self.ast.stmts_in(*stmts) {
                    self.visit_stmt(block_scope, stmt);
                }
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let if_scope = self.scopes.push_child(scope);
                self.visit_expr(if_scope, *cond, false);
                self.visit_stmt(if_scope, *then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_stmt(if_scope, *else_branch);
                }
            }
            StmtKind::While { cond, body } => {
                let while_scope = self.scopes.push_child(scope);
                self.visit_expr(while_scope, *cond, false);
                self.visit_stmt(while_scope, *body);
            }
            StmtKind::DoWhile { body, cond } => {
                let do_scope = self.scopes.push_child(scope);
                self.visit_stmt(do_scope, *body);
                self.visit_expr(do_scope, *cond, false);
            }
            StmtKind::For { var, iter, body } => {
                let for_scope = self.scopes.push_child(scope);
                self.declare(for_scope, *var);
                self.visit_decl(for_scope, *var);
                self.visit_expr(for_scope, *iter, false);
                self.visit_stmt(for_scope, *body);
            }
            StmtKind::Loop { body } => self.visit_stmt(scope, *body),
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.visit_expr(scope, *value, false);
                }
            }
            StmtKind::Defer(body) => self.visit_stmt(scope, *body),
            StmtKind::Break | StmtKind::Continue | StmtKind::Error => {}
        }
    }

    // --- Expressions ---

    /// `namespace_ok` is set for the owner position of a member access,
    /// where module and enum names are legal.
    fn visit_expr(&mut self, scope: ScopeId, expr_id: ExprId, namespace_ok: bool) {
        match &self.ast.expr(expr_id).kind {
            ExprKind::Ident(name) => {
                let span = self.ast.expr(expr_id).span;
                let Some(decl_id) = self.scopes.lookup(scope, *name) else {
                    self.diags.push(
                        Diagnostic::error(
                            ErrorCode::E2002,
                            format!("undefined symbol `{}`", self.interner.lookup(*name)),
                        )
                        .with_label(span, "not found in this scope"),
                    );
                    return;
                };
                self.resolutions.insert(expr_id, decl_id);

                let kind = &self.ast.decl(decl_id).kind;
                let namespace = matches!(kind, DeclKind::Mod { .. } | DeclKind::Enum { .. });
                if !kind.is_expression_symbol() && !(namespace_ok && namespace) {
                    self.diags.push(
                        Diagnostic::error(
                            ErrorCode::E2003,
                            format!(
                                "`{}` is a {}, not an expression",
                                self.interner.lookup(*name),
                                kind.describe()
                            ),
                        )
                        .with_label(span, "cannot be used as a value"),
                    );
                }
            }
            ExprKind::Unary { operand, .. } => self.visit_expr(scope, *operand, false),
            ExprKind::Binary { lhs, rhs, .. } => {
                self.visit_expr(scope, *lhs, false);
                self.visit_expr(scope, *rhs, false);
            }
            ExprKind::Call { callee, args } => {
                self.visit_expr(scope, *callee, false);
                for &arg in self.ast.exprs_in(*args) {
                    self.visit_expr(scope, arg, false);
                }
            }
            ExprKind::Member { owner, .. } => {
                // Field and module member names resolve during type check.
                self.visit_expr(scope, *owner, true);
            }
            ExprKind::Index { base, index } => {
                self.visit_expr(scope, *base, false);
                self.visit_expr(scope, *index, false);
            }
            ExprKind::Cast { operand, ty } => {
                self.visit_expr(scope, *operand, false);
                self.visit_type(scope, *ty);
            }
            ExprKind::SizeOf(ty) | ExprKind::AlignOf(ty) => self.visit_type(scope, *ty),
            ExprKind::VectorLit { elems } | ExprKind::MatrixLit { elems, .. } => {
                for &elem in self.ast.exprs_in(*elems) {
                    self.visit_expr(scope, elem, false);
                }
            }
            ExprKind::IntLit { .. }
            | ExprKind::FloatLit { .. }
            | ExprKind::StrLit(_)
            | ExprKind::CharLit(_)
            | ExprKind::BoolLit(_)
            | ExprKind::NullLit
            | ExprKind::Error => {}
        }
    }

    // --- Types ---

    fn visit_type(&mut self, scope: ScopeId, ty_id: TypeExprId) {
        let ty = self.ast.type_expr(ty_id);
        match &ty.kind {
            TypeExprKind::Named(name) => {
                let Some(decl_id) = self.scopes.lookup(scope, *name) else {
                    self.diags.push(
                        Diagnostic::error(
                            ErrorCode::E2002,
                            format!("undefined symbol `{}`", self.interner.lookup(*name)),
                        )
                        .with_label(ty.span, "not found in this scope"),
                    );
                    return;
                };
                let kind = &self.ast.decl(decl_id).kind;
                if kind.is_typename() {
                    self.type_resolutions.insert(ty_id, decl_id);
                } else {
                    self.diags.push(
                        Diagnostic::error(
                            ErrorCode::E2004,
                            format!(
                                "`{}` is a {}, not a typename",
                                self.interner.lookup(*name),
                                kind.describe()
                            ),
                        )
                        .with_label(ty.span, "expected a type here"),
                    );
                }
            }
            TypeExprKind::Member {
                owner,
                member,
                member_span,
            } => {
                if let Some(mod_decl) = self.resolve_type_namespace(scope, *owner) {
                    let mod_scope = self.mod_scope_of(mod_decl);
                    let Some(found) = mod_scope
                        .and_then(|s| self.scopes.lookup_local(s, *member))
                    else {
                        self.diags.push(
                            Diagnostic::error(
                                ErrorCode::E2006,
                                format!(
                                    "module has no member `{}`",
                                    self.interner.lookup(*member)
                                ),
                            )
                            .with_label(*member_span, "no such member"),
                        );
                        return;
                    };
                    let found_decl = self.ast.decl(found);
                    if found_decl.vis != vela_ir::Visibility::Public {
                        self.diags.push(
                            Diagnostic::error(
                                ErrorCode::E2007,
                                format!(
                                    "member `{}` is not public",
                                    self.interner.lookup(*member)
                                ),
                            )
                            .with_label(*member_span, "private member")
                            .with_secondary(found_decl.name_span, "declared here"),
                        );
                    }
                    if found_decl.kind.is_typename() {
                        self.type_resolutions.insert(ty_id, found);
                    } else {
                        self.diags.push(
                            Diagnostic::error(
                                ErrorCode::E2004,
                                format!(
                                    "`{}` is a {}, not a typename",
                                    self.interner.lookup(*member),
                                    found_decl.kind.describe()
                                ),
                            )
                            .with_label(*member_span, "expected a type here"),
                        );
                    }
                }
            }
            TypeExprKind::Mut(base)
            | TypeExprKind::Const(base)
            | TypeExprKind::Ptr(base)
            | TypeExprKind::Ref(base)
            | TypeExprKind::Opt(base) => self.visit_type(scope, *base),
            TypeExprKind::Array { len, elem } => {
                if let Some(len) = len {
                    self.visit_expr(scope, *len, false);
                }
                self.visit_type(scope, *elem);
            }
            TypeExprKind::Vector { elem, .. } | TypeExprKind::Matrix { elem, .. } => {
                self.visit_type(scope, *elem);
            }
            TypeExprKind::Fun { params, ret, .. } => {
                for &param in self.ast.type_exprs_in(*params) {
                    self.visit_type(scope, param);
                }
                self.visit_type(scope, *ret);
            }
            TypeExprKind::Prim(_) | TypeExprKind::Error => {}
        }
    }

    /// Resolve the owner chain of a member type to a module declaration.
    fn resolve_type_namespace(&mut self, scope: ScopeId, owner: TypeExprId) -> Option<DeclId> {
        let ty = self.ast.type_expr(owner);
        match &ty.kind {
            TypeExprKind::Named(name) => {
                let Some(decl_id) = self.scopes.lookup(scope, *name) else {
                    self.diags.push(
                        Diagnostic::error(
                            ErrorCode::E2002,
                            format!("undefined symbol `{}`", self.interner.lookup(*name)),
                        )
                        .with_label(ty.span, "not found in this scope"),
                    );
                    return None;
                };
                if matches!(self.ast.decl(decl_id).kind, DeclKind::Mod { .. }) {
                    Some(decl_id)
                } else {
                    self.diags.push(
                        Diagnostic::error(
                            ErrorCode::E2004,
                            format!(
                                "`{}` is not a module",
                                self.interner.lookup(*name)
                            ),
                        )
                        .with_label(ty.span, "expected a module here"),
                    );
                    None
                }
            }
            TypeExprKind::Member {
                owner: inner,
                member,
                member_span,
            } => {
                let mod_decl = self.resolve_type_namespace(scope, *inner)?;
                let mod_scope = self.mod_scope_of(mod_decl)?;
                let found = self.scopes.lookup_local(mod_scope, *member);
                match found {
                    Some(found)
                        if matches!(self.ast.decl(found).kind, DeclKind::Mod { .. }) =>
                    {
                        Some(found)
                    }
                    _ => {
                        self.diags.push(
                            Diagnostic::error(
                                ErrorCode::E2006,
                                format!(
                                    "module has no module member `{}`",
                                    self.interner.lookup(*member)
                                ),
                            )
                            .with_label(*member_span, "no such module"),
                        );
                        None
                    }
                }
            }
            _ => None,
        }
    }

    fn mod_scope_of(&self, mod_decl: DeclId) -> Option<ScopeId> {
        self.mod_scopes.get(&mod_decl).copied()
    }
}
