//! Declaration parsing.
//!
//! A declaration may be preceded by a modifier context: `pub` and
//! `extern "<callconv>"`. The dispatch keyword then selects the
//! production: `var | fun | struct | union | enum | mod | type`.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::ast::{Decl, DeclKind, TypeExpr, TypeExprKind};
use vela_ir::{CallConv, DeclId, Name, Span, TokenKind, Visibility};

use crate::Parser;

/// Modifier context collected before the dispatch keyword.
#[derive(Default)]
struct DeclContext {
    vis: Visibility,
    is_extern: bool,
    callconv: CallConv,
}

impl Parser<'_> {
    /// Parse one declaration, or `None` after reporting.
    pub(crate) fn parse_decl(&mut self) -> Option<DeclId> {
        let mut ctx = DeclContext::default();

        if self.cursor.consume(&TokenKind::KwPub) {
            ctx.vis = Visibility::Public;
        }
        if self.cursor.consume(&TokenKind::KwExtern) {
            ctx.is_extern = true;
            if let TokenKind::Str(name) = *self.cursor.current_kind() {
                let span = self.cursor.current_span();
                self.cursor.advance();
                ctx.callconv = self.resolve_callconv(name, span);
            } else {
                let span = self.cursor.current_span();
                self.error(
                    ErrorCode::E1008,
                    "expected a calling convention string after `extern`".to_string(),
                    span,
                    "expected a string like \"cdecl\"",
                );
            }
        }

        if ctx.is_extern && !self.cursor.check(&TokenKind::KwFun) {
            self.error_expected("`fun` after `extern`");
            return None;
        }

        match self.cursor.current_kind() {
            TokenKind::KwVar => self.decl_var(ctx.vis),
            TokenKind::KwFun => self.decl_fun(&ctx),
            TokenKind::KwStruct => self.decl_composite(ctx.vis, true),
            TokenKind::KwUnion => self.decl_composite(ctx.vis, false),
            TokenKind::KwEnum => self.decl_enum(ctx.vis),
            TokenKind::KwMod => self.decl_mod(ctx.vis),
            TokenKind::KwType => self.decl_type_alias(ctx.vis),
            _ => {
                self.error_expected("a declaration");
                None
            }
        }
    }

    /// `var name: Type (= expr)? ;`
    pub(crate) fn decl_var(&mut self, vis: Visibility) -> Option<DeclId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // var

        let (name, name_span) = self.ident("a variable name")?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;

        let init = if self.cursor.consume(&TokenKind::Eq) {
            self.parse_expr()
        } else {
            None
        };
        let _ = self.expect(&TokenKind::Semicolon);

        Some(self.alloc_decl(
            DeclKind::Var { ty, init },
            name,
            name_span,
            start,
            vis,
        ))
    }

    /// `fun name(params): Type body` — the body is a block statement, or
    /// `;` for an extern prototype.
    fn decl_fun(&mut self, ctx: &DeclContext) -> Option<DeclId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // fun

        let (name, name_span) = self.ident("a function name")?;

        self.expect(&TokenKind::LParen)?;
        let params = self.param_list();
        if !self.cursor.consume(&TokenKind::RParen) {
            self.missing_paren();
        }

        self.expect(&TokenKind::Colon)?;
        let return_ty = self.parse_type().unwrap_or_else(|| self.error_type());

        let body = if self.cursor.consume(&TokenKind::Semicolon) {
            if !ctx.is_extern {
                self.error_expected("a function body");
            }
            None
        } else {
            self.parse_block_stmt()
        };

        let params = self.ast.alloc_decl_list(&params);
        Some(self.alloc_decl(
            DeclKind::Fun {
                params,
                return_ty,
                body,
                is_extern: ctx.is_extern,
                callconv: ctx.callconv,
            },
            name,
            name_span,
            start,
            ctx.vis,
        ))
    }

    /// Comma-delimited parameters; a defaulted parameter must only be
    /// followed by defaulted parameters, and `...` must come last.
    fn param_list(&mut self) -> Vec<DeclId> {
        let mut first_default: Option<Span> = None;

        let mut params = Vec::new();
        loop {
            if self.cursor.check(&TokenKind::RParen) || self.cursor.is_at_end() {
                break;
            }

            if self.cursor.check(&TokenKind::DotDotDot) {
                let span = self.cursor.current_span();
                self.cursor.advance();
                let error_ty = self.error_type();
                params.push(self.alloc_decl(
                    DeclKind::Param {
                        ty: error_ty,
                        default: None,
                        variadic: true,
                    },
                    Name::EMPTY,
                    span,
                    span,
                    Visibility::Private,
                ));
                break;
            }

            match self.param(&mut first_default) {
                Some(param) => params.push(param),
                None => {
                    // resync at the next comma or the closing paren
                    while !self.cursor.is_at_end()
                        && !self.cursor.check(&TokenKind::Comma)
                        && !self.cursor.check(&TokenKind::RParen)
                    {
                        self.cursor.advance();
                    }
                }
            }
            if !self.cursor.consume(&TokenKind::Comma) {
                break;
            }
        }
        params
    }

    /// `name: Type (= expr)?`
    fn param(&mut self, first_default: &mut Option<Span>) -> Option<DeclId> {
        let start = self.cursor.current_span();
        let (name, name_span) = self.ident("a parameter name")?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;

        let default = if self.cursor.consume(&TokenKind::Eq) {
            self.parse_expr()
        } else {
            None
        };

        match (default.is_some(), *first_default) {
            (true, None) => *first_default = Some(start.merge(self.cursor.previous_span())),
            (false, Some(default_span)) => {
                self.diags.push(
                    Diagnostic::error(
                        ErrorCode::E1009,
                        format!("parameter `{}` has no default value", self.interner.lookup(name)),
                    )
                    .with_label(name_span, "all parameters after a defaulted one need defaults")
                    .with_secondary(default_span, "first defaulted parameter is here"),
                );
            }
            _ => {}
        }

        Some(self.alloc_decl(
            DeclKind::Param {
                ty,
                default,
                variadic: false,
            },
            name,
            name_span,
            start,
            Visibility::Private,
        ))
    }

    /// `struct Name { fields }` / `union Name { fields }`
    fn decl_composite(&mut self, vis: Visibility, is_struct: bool) -> Option<DeclId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // struct / union

        let (name, name_span) = self.ident("a type name")?;
        self.expect(&TokenKind::LBrace)?;
        let members = self.terminated(&TokenKind::RBrace, Self::field);
        let _ = self.expect(&TokenKind::RBrace);

        let members = self.ast.alloc_decl_list(&members);
        let kind = if is_struct {
            DeclKind::Struct { members }
        } else {
            DeclKind::Union { members }
        };
        Some(self.alloc_decl(kind, name, name_span, start, vis))
    }

    /// `name: Type;`
    fn field(&mut self) -> Option<DeclId> {
        let start = self.cursor.current_span();
        let (name, name_span) = self.ident("a field name")?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let _ = self.expect(&TokenKind::Semicolon);
        Some(self.alloc_decl(
            DeclKind::Field { ty },
            name,
            name_span,
            start,
            Visibility::Public,
        ))
    }

    /// `enum Name { A, B, C }`
    fn decl_enum(&mut self, vis: Visibility) -> Option<DeclId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // enum

        let (name, name_span) = self.ident("a type name")?;
        self.expect(&TokenKind::LBrace)?;
        let constants = self.delimited(&TokenKind::Comma, &TokenKind::RBrace, |p| {
            let (name, name_span) = p.ident("an enum constant name")?;
            Some(p.alloc_decl(
                DeclKind::EnumConstant,
                name,
                name_span,
                name_span,
                Visibility::Public,
            ))
        });
        let _ = self.expect(&TokenKind::RBrace);

        let constants = self.ast.alloc_decl_list(&constants);
        Some(self.alloc_decl(DeclKind::Enum { constants }, name, name_span, start, vis))
    }

    /// `mod Name { decls }`
    fn decl_mod(&mut self, vis: Visibility) -> Option<DeclId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // mod

        let (name, name_span) = self.ident("a module name")?;
        self.expect(&TokenKind::LBrace)?;
        let decls = self.terminated(&TokenKind::RBrace, Self::parse_decl);
        let _ = self.expect(&TokenKind::RBrace);

        let decls = self.ast.alloc_decl_list(&decls);
        Some(self.alloc_decl(DeclKind::Mod { decls }, name, name_span, start, vis))
    }

    /// `type Name = Type;`
    fn decl_type_alias(&mut self, vis: Visibility) -> Option<DeclId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // type

        let (name, name_span) = self.ident("a type alias name")?;
        self.expect(&TokenKind::Eq)?;
        let ty = self.parse_type()?;
        let _ = self.expect(&TokenKind::Semicolon);
        Some(self.alloc_decl(DeclKind::TypeAlias { ty }, name, name_span, start, vis))
    }

    // --- Helpers ---

    pub(crate) fn ident(&mut self, what: &str) -> Option<(Name, Span)> {
        let result = self.cursor.consume_ident();
        if result.is_none() {
            self.error_expected(what);
        }
        result
    }

    fn alloc_decl(
        &mut self,
        kind: DeclKind,
        name: Name,
        name_span: Span,
        start: Span,
        vis: Visibility,
    ) -> DeclId {
        let span = start.merge(self.cursor.previous_span());
        self.ast.alloc_decl(Decl {
            kind,
            name,
            name_span,
            span,
            vis,
        })
    }

    /// Allocate an `Error` type-expression placeholder.
    pub(crate) fn error_type(&mut self) -> vela_ir::TypeExprId {
        self.ast.alloc_type_expr(TypeExpr {
            kind: TypeExprKind::Error,
            span: self.cursor.current_span(),
        })
    }
}
