//! AST node definitions.
//!
//! Closed sum types per node family. Nodes store only arena IDs and
//! interned names; the arena in [`arena`](crate::arena) owns all of them.

use crate::{
    BinOp, DeclId, DeclRange, ExprId, ExprRange, MemberAccess, Name, NumSuffix, Span, StmtId,
    StmtRange, TypeExprId, TypeExprRange, UnOp,
};

/// Root of a compilation unit: the ordered top-level declarations.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub decls: DeclRange,
}

/// An expression node.
#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Expression kinds.
#[derive(Clone, Debug)]
pub enum ExprKind {
    /// Integer literal with optional width suffix.
    IntLit { value: u64, suffix: Option<NumSuffix> },
    /// Float literal (bits stored for Eq/Hash) with optional width suffix.
    FloatLit { bits: u64, suffix: Option<NumSuffix> },
    /// String literal (escapes already processed).
    StrLit(Name),
    /// Character literal (32-bit code point).
    CharLit(char),
    /// Boolean literal.
    BoolLit(bool),
    /// The null literal.
    NullLit,

    /// Identifier reference.
    Ident(Name),

    /// Unary operator application.
    Unary { op: UnOp, operand: ExprId },
    /// Binary operator application.
    Binary { op: BinOp, lhs: ExprId, rhs: ExprId },
    /// Function call.
    Call { callee: ExprId, args: ExprRange },
    /// Member access `owner.member`, `owner*.member`, `owner?.member`.
    Member {
        owner: ExprId,
        access: MemberAccess,
        member: Name,
        member_span: Span,
    },
    /// Subscript `base[index]`.
    Index { base: ExprId, index: ExprId },
    /// Explicit conversion `operand as Type`.
    Cast { operand: ExprId, ty: TypeExprId },
    /// `sizeof Type`.
    SizeOf(TypeExprId),
    /// `alignof Type`.
    AlignOf(TypeExprId),

    /// Vector literal `[a, b, c]`.
    VectorLit { elems: ExprRange },
    /// Matrix literal `[[a, b], [c, d]]`, row-major.
    MatrixLit {
        rows: u16,
        cols: u16,
        elems: ExprRange,
    },

    /// Placeholder for a failed production; later passes skip it.
    Error,
}

/// A statement node.
#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// Statement kinds.
#[derive(Clone, Debug)]
pub enum StmtKind {
    /// Expression statement `expr;`.
    Expr(ExprId),
    /// Local variable declaration.
    Var(DeclId),
    /// Block `{ ... }`.
    Block(StmtRange),
    /// `if cond then stmt (else stmt)?`
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    /// `while cond do stmt`
    While { cond: ExprId, body: StmtId },
    /// `do stmt while cond;`
    DoWhile { body: StmtId, cond: ExprId },
    /// `for var: T in range do stmt`
    For {
        var: DeclId,
        iter: ExprId,
        body: StmtId,
    },
    /// `loop stmt` — loops forever until `break`.
    Loop { body: StmtId },
    /// `break;`
    Break,
    /// `continue;`
    Continue,
    /// `return expr?;`
    Return(Option<ExprId>),
    /// `defer stmt` — runs on every exit of the enclosing block.
    Defer(StmtId),

    /// Placeholder for a failed production.
    Error,
}

/// Calling convention tag, parsed from the string after `extern` and
/// forwarded to the function type and the LLVM function.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum CallConv {
    #[default]
    Cdecl,
    Stdcall,
    Fastcall,
    Thiscall,
    Vectorcall,
    Win64,
    Sysv64,
    Aapcs,
}

impl CallConv {
    /// Parse a convention from its string form; `None` for unknown strings.
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "cdecl" => CallConv::Cdecl,
            "stdcall" => CallConv::Stdcall,
            "fastcall" => CallConv::Fastcall,
            "thiscall" => CallConv::Thiscall,
            "vectorcall" => CallConv::Vectorcall,
            "win64" => CallConv::Win64,
            "sysv64" => CallConv::Sysv64,
            "aapcs" => CallConv::Aapcs,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CallConv::Cdecl => "cdecl",
            CallConv::Stdcall => "stdcall",
            CallConv::Fastcall => "fastcall",
            CallConv::Thiscall => "thiscall",
            CallConv::Vectorcall => "vectorcall",
            CallConv::Win64 => "win64",
            CallConv::Sysv64 => "sysv64",
            CallConv::Aapcs => "aapcs",
        }
    }
}

/// Declaration visibility. Non-`pub` module members are inaccessible from
/// outside their module.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

/// A declaration node.
#[derive(Clone, Debug)]
pub struct Decl {
    pub kind: DeclKind,
    /// Declared identifier.
    pub name: Name,
    /// Span of the identifier token, used as the primary site of
    /// collision/shadow diagnostics.
    pub name_span: Span,
    /// Span of the whole declaration.
    pub span: Span,
    pub vis: Visibility,
}

/// Declaration kinds.
#[derive(Clone, Debug)]
pub enum DeclKind {
    /// `var name: Type (= init)?;`
    Var {
        ty: TypeExprId,
        init: Option<ExprId>,
    },
    /// Function parameter, possibly defaulted, possibly the `...` marker.
    Param {
        ty: TypeExprId,
        default: Option<ExprId>,
        variadic: bool,
    },
    /// `fun name(params): Type body` or an extern prototype.
    Fun {
        params: DeclRange,
        return_ty: TypeExprId,
        body: Option<StmtId>,
        is_extern: bool,
        callconv: CallConv,
    },
    /// Struct or union member `name: Type;`
    Field { ty: TypeExprId },
    /// `struct Name { fields }`
    Struct { members: DeclRange },
    /// `union Name { fields }`
    Union { members: DeclRange },
    /// `enum Name { A, B, C }`
    Enum { constants: DeclRange },
    /// A single enum constant; its value is its ordinal.
    EnumConstant,
    /// `mod Name { decls }`
    Mod { decls: DeclRange },
    /// `type Name = Type;`
    TypeAlias { ty: TypeExprId },
}

impl DeclKind {
    /// Check if this declaration can be referenced as an expression.
    pub fn is_expression_symbol(&self) -> bool {
        matches!(
            self,
            DeclKind::Var { .. } | DeclKind::Param { .. } | DeclKind::Fun { .. }
        )
    }

    /// Check if this declaration names a type.
    pub fn is_typename(&self) -> bool {
        matches!(
            self,
            DeclKind::Struct { .. }
                | DeclKind::Union { .. }
                | DeclKind::Enum { .. }
                | DeclKind::TypeAlias { .. }
        )
    }

    /// Short description for diagnostics ("function", "variable", ...).
    pub fn describe(&self) -> &'static str {
        match self {
            DeclKind::Var { .. } => "variable",
            DeclKind::Param { .. } => "parameter",
            DeclKind::Fun { .. } => "function",
            DeclKind::Field { .. } => "field",
            DeclKind::Struct { .. } => "struct",
            DeclKind::Union { .. } => "union",
            DeclKind::Enum { .. } => "enum",
            DeclKind::EnumConstant => "enum constant",
            DeclKind::Mod { .. } => "module",
            DeclKind::TypeAlias { .. } => "type alias",
        }
    }
}

/// Primitive type names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PrimType {
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
}

/// A type expression node (the syntactic form; resolved to a type
/// descriptor during the type-check pass).
#[derive(Clone, Debug)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

/// Type expression kinds.
#[derive(Clone, Debug)]
pub enum TypeExprKind {
    /// Primitive type keyword.
    Prim(PrimType),
    /// Named type (struct/union/enum/alias reference).
    Named(Name),
    /// Member type `Module.Name`.
    Member {
        owner: TypeExprId,
        member: Name,
        member_span: Span,
    },
    /// `mut T` — only legal as the outermost modifier.
    Mut(TypeExprId),
    /// `const T`
    Const(TypeExprId),
    /// `*T`
    Ptr(TypeExprId),
    /// `&T`
    Ref(TypeExprId),
    /// `?T`
    Opt(TypeExprId),
    /// `[len]T`; `len` must be an integer literal expression.
    Array {
        len: Option<ExprId>,
        elem: TypeExprId,
    },
    /// `vec[N]T`
    Vector { len: u32, elem: TypeExprId },
    /// `mat[R,C]T`
    Matrix {
        rows: u32,
        cols: u32,
        elem: TypeExprId,
    },
    /// `fun "cc"? (params): Ret`
    Fun {
        params: TypeExprRange,
        ret: TypeExprId,
        callconv: CallConv,
    },

    /// Placeholder for a failed production.
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callconv_strings() {
        assert_eq!(CallConv::from_str("cdecl"), Some(CallConv::Cdecl));
        assert_eq!(CallConv::from_str("sysv64"), Some(CallConv::Sysv64));
        assert_eq!(CallConv::from_str("pascal"), None);
        assert_eq!(CallConv::Stdcall.as_str(), "stdcall");
    }

    #[test]
    fn decl_classification() {
        let fun = DeclKind::Fun {
            params: DeclRange::EMPTY,
            return_ty: TypeExprId::from_raw(0),
            body: None,
            is_extern: false,
            callconv: CallConv::Cdecl,
        };
        assert!(fun.is_expression_symbol());
        assert!(!fun.is_typename());

        let alias = DeclKind::TypeAlias {
            ty: TypeExprId::from_raw(0),
        };
        assert!(alias.is_typename());
        assert!(!alias.is_expression_symbol());
    }
}
