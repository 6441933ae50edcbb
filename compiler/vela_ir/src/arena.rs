//! Arena storage for the AST.
//!
//! All nodes live in flat vectors indexed by typed u32 IDs; child lists are
//! ranges into flattened side arrays. The arena is built once by the parser
//! and borrowed immutably by every later pass, which resolves the source
//! design's cyclic cross-references (break → loop, type → declaration)
//! without any ownership bookkeeping.

use crate::ast::{Decl, Expr, Module, Stmt, TypeExpr};
use crate::{
    DeclId, DeclRange, ExprId, ExprRange, StmtId, StmtRange, TypeExprId, TypeExprRange,
};

/// Panic helper for capacity overflow (cold path, never inlined).
#[cold]
#[inline(never)]
fn panic_capacity_exceeded(value: usize, context: &str, max: u64) -> ! {
    panic!("arena capacity exceeded: {context} has {value} elements, max is {max}")
}

/// Convert usize to u32, panicking with a clear message on overflow.
#[inline]
fn to_u32(value: usize, context: &str) -> u32 {
    u32::try_from(value)
        .unwrap_or_else(|_| panic_capacity_exceeded(value, context, u64::from(u32::MAX)))
}

/// Convert usize to u16, panicking with a clear message on overflow.
#[inline]
fn to_u16(value: usize, context: &str) -> u16 {
    u16::try_from(value)
        .unwrap_or_else(|_| panic_capacity_exceeded(value, context, u64::from(u16::MAX)))
}

/// Contiguous storage for all AST nodes of a compilation unit.
#[derive(Clone, Default)]
pub struct Ast {
    /// The root node.
    pub module: Module,

    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    decls: Vec<Decl>,
    type_exprs: Vec<TypeExpr>,

    /// Flattened child lists (call arguments, vector elements, ...).
    expr_lists: Vec<ExprId>,
    /// Flattened block statement lists.
    stmt_lists: Vec<StmtId>,
    /// Flattened member/parameter/declaration lists.
    decl_lists: Vec<DeclId>,
    /// Flattened function-type parameter lists.
    type_expr_lists: Vec<TypeExprId>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    // --- Allocation ---

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::from_raw(to_u32(self.exprs.len(), "expressions"));
        self.exprs.push(expr);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::from_raw(to_u32(self.stmts.len(), "statements"));
        self.stmts.push(stmt);
        id
    }

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::from_raw(to_u32(self.decls.len(), "declarations"));
        self.decls.push(decl);
        id
    }

    pub fn alloc_type_expr(&mut self, ty: TypeExpr) -> TypeExprId {
        let id = TypeExprId::from_raw(to_u32(self.type_exprs.len(), "type expressions"));
        self.type_exprs.push(ty);
        id
    }

    pub fn alloc_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = to_u32(self.expr_lists.len(), "expression lists");
        let len = to_u16(ids.len(), "expression list");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, len)
    }

    pub fn alloc_stmt_list(&mut self, ids: &[StmtId]) -> StmtRange {
        let start = to_u32(self.stmt_lists.len(), "statement lists");
        let len = to_u16(ids.len(), "statement list");
        self.stmt_lists.extend_from_slice(ids);
        StmtRange::new(start, len)
    }

    pub fn alloc_decl_list(&mut self, ids: &[DeclId]) -> DeclRange {
        let start = to_u32(self.decl_lists.len(), "declaration lists");
        let len = to_u16(ids.len(), "declaration list");
        self.decl_lists.extend_from_slice(ids);
        DeclRange::new(start, len)
    }

    pub fn alloc_type_expr_list(&mut self, ids: &[TypeExprId]) -> TypeExprRange {
        let start = to_u32(self.type_expr_lists.len(), "type expression lists");
        let len = to_u16(ids.len(), "type expression list");
        self.type_expr_lists.extend_from_slice(ids);
        TypeExprRange::new(start, len)
    }

    // --- Access ---

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    #[inline]
    pub fn type_expr(&self, id: TypeExprId) -> &TypeExpr {
        &self.type_exprs[id.index()]
    }

    #[inline]
    pub fn exprs_in(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.indices()]
    }

    #[inline]
    pub fn stmts_in(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.indices()]
    }

    #[inline]
    pub fn decls_in(&self, range: DeclRange) -> &[DeclId] {
        &self.decl_lists[range.indices()]
    }

    #[inline]
    pub fn type_exprs_in(&self, range: TypeExprRange) -> &[TypeExprId] {
        &self.type_expr_lists[range.indices()]
    }

    // --- Counts (used to size parallel side tables) ---

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn type_expr_count(&self) -> usize {
        self.type_exprs.len()
    }

    /// Iterate all declaration IDs in allocation order.
    pub fn decl_ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.decls.len()).map(|i| DeclId::from_raw(i as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, StmtKind};
    use crate::Span;

    fn int_lit(ast: &mut Ast, value: u64) -> ExprId {
        ast.alloc_expr(Expr {
            kind: ExprKind::IntLit {
                value,
                suffix: None,
            },
            span: Span::DUMMY,
        })
    }

    #[test]
    fn alloc_and_access() {
        let mut ast = Ast::new();
        let a = int_lit(&mut ast, 1);
        let b = int_lit(&mut ast, 2);
        assert_ne!(a, b);
        assert!(matches!(
            ast.expr(a).kind,
            ExprKind::IntLit { value: 1, .. }
        ));
        assert_eq!(ast.expr_count(), 2);
    }

    #[test]
    fn ranges_are_contiguous() {
        let mut ast = Ast::new();
        let ids: Vec<ExprId> = (0..5).map(|i| int_lit(&mut ast, i)).collect();
        let range = ast.alloc_expr_list(&ids);
        assert_eq!(range.len(), 5);
        assert_eq!(ast.exprs_in(range), ids.as_slice());
    }

    #[test]
    fn stmt_lists() {
        let mut ast = Ast::new();
        let e = int_lit(&mut ast, 3);
        let s = ast.alloc_stmt(Stmt {
            kind: StmtKind::Expr(e),
            span: Span::DUMMY,
        });
        let range = ast.alloc_stmt_list(&[s]);
        assert_eq!(ast.stmts_in(range), &[s]);
    }
}
