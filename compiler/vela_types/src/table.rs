//! Per-node type table.
//!
//! Parallel arrays keyed by arena IDs. Entries start as `Idx::NONE`; the
//! type-check pass fills them in. The table references pool indices but
//! the pool owns the descriptors.

use vela_ir::{Ast, DeclId, ExprId, TypeExprId};

use crate::Idx;

/// Mapping from AST nodes to type descriptors.
pub struct TypeTable {
    expr_types: Vec<Idx>,
    decl_types: Vec<Idx>,
    type_expr_types: Vec<Idx>,
}

impl TypeTable {
    /// Create a table sized for every node of the arena, all `NONE`.
    pub fn for_ast(ast: &Ast) -> Self {
        TypeTable {
            expr_types: vec![Idx::NONE; ast.expr_count()],
            decl_types: vec![Idx::NONE; ast.decl_count()],
            type_expr_types: vec![Idx::NONE; ast.type_expr_count()],
        }
    }

    pub fn set_expr(&mut self, id: ExprId, ty: Idx) {
        self.expr_types[id.index()] = ty;
    }

    pub fn expr(&self, id: ExprId) -> Idx {
        self.expr_types[id.index()]
    }

    pub fn set_decl(&mut self, id: DeclId, ty: Idx) {
        self.decl_types[id.index()] = ty;
    }

    pub fn decl(&self, id: DeclId) -> Idx {
        self.decl_types[id.index()]
    }

    pub fn set_type_expr(&mut self, id: TypeExprId, ty: Idx) {
        self.type_expr_types[id.index()] = ty;
    }

    pub fn type_expr(&self, id: TypeExprId) -> Idx {
        self.type_expr_types[id.index()]
    }

    /// Expression types as a dense slice (for the code generator).
    pub fn expr_types(&self) -> &[Idx] {
        &self.expr_types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ir::ast::{Expr, ExprKind};
    use vela_ir::Span;

    #[test]
    fn table_records_and_reads() {
        let mut ast = Ast::new();
        let id = ast.alloc_expr(Expr {
            kind: ExprKind::BoolLit(true),
            span: Span::DUMMY,
        });
        let mut table = TypeTable::for_ast(&ast);
        assert!(table.expr(id).is_none());
        table.set_expr(id, Idx::BOOL);
        assert_eq!(table.expr(id), Idx::BOOL);
    }
}
