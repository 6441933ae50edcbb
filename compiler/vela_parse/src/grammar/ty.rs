//! Type expression parsing.
//!
//! Prefix modifiers apply outermost-first: `mut`, `const`, then any chain
//! of `*` / `&` / `?` / `[len?]`, then a base type (primitive keyword,
//! identifier or member path, `vec`/`mat` form, or a function type).

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{PrimType, TypeExpr, TypeExprKind};
use vela_ir::{CallConv, Span, TokenKind, TypeExprId};

use crate::Parser;

impl Parser<'_> {
    /// Parse a type expression. Returns `None` after reporting when no
    /// type can start at the current token.
    pub(crate) fn parse_type(&mut self) -> Option<TypeExprId> {
        let start = self.cursor.current_span();

        let kind = match self.cursor.current_kind() {
            TokenKind::KwMut => {
                self.cursor.advance();
                TypeExprKind::Mut(self.parse_type()?)
            }
            TokenKind::KwConst => {
                self.cursor.advance();
                TypeExprKind::Const(self.parse_type()?)
            }
            TokenKind::Star => {
                self.cursor.advance();
                TypeExprKind::Ptr(self.parse_type()?)
            }
            TokenKind::Amp => {
                self.cursor.advance();
                TypeExprKind::Ref(self.parse_type()?)
            }
            TokenKind::Question => {
                self.cursor.advance();
                TypeExprKind::Opt(self.parse_type()?)
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let len = if self.cursor.check(&TokenKind::RBracket) {
                    None
                } else {
                    self.parse_expr()
                };
                if !self.cursor.consume(&TokenKind::RBracket) {
                    self.missing_bracket();
                }
                TypeExprKind::Array {
                    len,
                    elem: self.parse_type()?,
                }
            }
            TokenKind::KwVec => {
                self.cursor.advance();
                let len = self.bracketed_dim()?;
                TypeExprKind::Vector {
                    len,
                    elem: self.parse_type()?,
                }
            }
            TokenKind::KwMat => {
                self.cursor.advance();
                self.expect(&TokenKind::LBracket)?;
                let rows = self.int_dim()?;
                self.expect(&TokenKind::Comma)?;
                let cols = self.int_dim()?;
                if !self.cursor.consume(&TokenKind::RBracket) {
                    self.missing_bracket();
                }
                TypeExprKind::Matrix {
                    rows,
                    cols,
                    elem: self.parse_type()?,
                }
            }
            TokenKind::KwFun => {
                self.cursor.advance();
                self.fun_type()?
            }
            TokenKind::Ident(_) => self.named_type()?,
            kind if kind.is_prim_type() => {
                let prim = prim_for(kind);
                self.cursor.advance();
                TypeExprKind::Prim(prim)
            }
            _ => {
                self.error_expected("a type");
                return None;
            }
        };

        let span = start.merge(self.cursor.previous_span());
        Some(self.ast.alloc_type_expr(TypeExpr { kind, span }))
    }

    /// `Name` or a member chain `Mod.Name`.
    fn named_type(&mut self) -> Option<TypeExprKind> {
        let start = self.cursor.current_span();
        let (name, _span) = self.cursor.consume_ident()?;
        let mut kind = TypeExprKind::Named(name);

        while self.cursor.consume(&TokenKind::Dot) {
            let Some((member, member_span)) = self.cursor.consume_ident() else {
                self.error_expected("a member name");
                return Some(kind);
            };
            let owner_span = start.merge(self.cursor.previous_span());
            let owner = self.ast.alloc_type_expr(TypeExpr {
                kind,
                span: owner_span,
            });
            kind = TypeExprKind::Member {
                owner,
                member,
                member_span,
            };
        }
        Some(kind)
    }

    /// `fun "cc"? (types): Ret`
    fn fun_type(&mut self) -> Option<TypeExprKind> {
        let callconv = self.opt_callconv();
        self.expect(&TokenKind::LParen)?;
        let params = self.delimited(&TokenKind::Comma, &TokenKind::RParen, Self::parse_type);
        if !self.cursor.consume(&TokenKind::RParen) {
            self.missing_paren();
        }
        self.expect(&TokenKind::Colon)?;
        let ret = self.parse_type()?;
        let params = self.ast.alloc_type_expr_list(&params);
        Some(TypeExprKind::Fun {
            params,
            ret,
            callconv,
        })
    }

    /// Optional calling-convention string after `fun`.
    pub(crate) fn opt_callconv(&mut self) -> CallConv {
        if let TokenKind::Str(name) = *self.cursor.current_kind() {
            let span = self.cursor.current_span();
            self.cursor.advance();
            return self.resolve_callconv(name, span);
        }
        CallConv::default()
    }

    /// Map a convention string to its tag, reporting unknown ones.
    pub(crate) fn resolve_callconv(&mut self, name: vela_ir::Name, span: Span) -> CallConv {
        let text = self.interner.lookup(name);
        match CallConv::from_str(text) {
            Some(cc) => cc,
            None => {
                self.error(
                    ErrorCode::E1007,
                    format!("unknown calling convention `{text}`"),
                    span,
                    "not a recognized calling convention",
                );
                CallConv::default()
            }
        }
    }

    /// `[N]` with an integer-literal dimension.
    fn bracketed_dim(&mut self) -> Option<u32> {
        self.expect(&TokenKind::LBracket)?;
        let dim = self.int_dim()?;
        if !self.cursor.consume(&TokenKind::RBracket) {
            self.missing_bracket();
        }
        Some(dim)
    }

    fn int_dim(&mut self) -> Option<u32> {
        if let TokenKind::Int { value, .. } = *self.cursor.current_kind() {
            self.cursor.advance();
            Some(u32::try_from(value).unwrap_or(u32::MAX))
        } else {
            self.error_expected("an integer dimension");
            None
        }
    }

    pub(crate) fn missing_paren(&mut self) {
        let span = self.cursor.current_span();
        let found = self.cursor.current_kind().display_name();
        self.error(
            ErrorCode::E1002,
            format!("expected `)`, found `{found}`"),
            span,
            "missing closing parenthesis",
        );
    }

    pub(crate) fn missing_bracket(&mut self) {
        let span = self.cursor.current_span();
        let found = self.cursor.current_kind().display_name();
        self.error(
            ErrorCode::E1003,
            format!("expected `]`, found `{found}`"),
            span,
            "missing closing bracket",
        );
    }
}

fn prim_for(kind: &TokenKind) -> PrimType {
    match kind {
        TokenKind::KwI8 => PrimType::I8,
        TokenKind::KwI16 => PrimType::I16,
        TokenKind::KwI32 => PrimType::I32,
        TokenKind::KwI64 => PrimType::I64,
        TokenKind::KwIsize => PrimType::Isize,
        TokenKind::KwU8 => PrimType::U8,
        TokenKind::KwU16 => PrimType::U16,
        TokenKind::KwU32 => PrimType::U32,
        TokenKind::KwU64 => PrimType::U64,
        TokenKind::KwUsize => PrimType::Usize,
        TokenKind::KwF32 => PrimType::F32,
        TokenKind::KwF64 => PrimType::F64,
        TokenKind::KwChar => PrimType::Char,
        TokenKind::KwBool => PrimType::Bool,
        TokenKind::KwUnit => PrimType::Unit,
        _ => unreachable!("checked by is_prim_type"),
    }
}
