//! Vela IR - core data structures for the Vela compiler.
//!
//! This crate contains:
//! - Spans for source locations
//! - Interned names and the string interner
//! - Tokens and `TokenList` for lexer output
//! - Operator kinds and the precedence table
//! - AST nodes and the flat arena that owns them
//!
//! # Design
//!
//! - Intern everything: strings become `Name(u32)`
//! - Flatten everything: no `Box<Expr>`, children are `ExprId(u32)` indices
//! - Nodes are annotated by later passes through side tables keyed by ID,
//!   never mutated in place

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod ids;
mod interner;
mod name;
mod op;
mod span;
mod token;

pub use arena::Ast;
pub use ast::{
    CallConv, Decl, DeclKind, Expr, ExprKind, Module, PrimType, Stmt, StmtKind, TypeExpr,
    TypeExprKind, Visibility,
};
pub use ids::{
    DeclId, DeclRange, ExprId, ExprRange, StmtId, StmtRange, TypeExprId, TypeExprRange,
};
pub use interner::StringInterner;
pub use name::Name;
pub use op::{BinOp, MemberAccess, PendingOp, UnOp};
pub use span::Span;
pub use token::{NumSuffix, Token, TokenKind, TokenList};
