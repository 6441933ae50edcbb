//! Statement parsing.

use vela_ir::ast::{DeclKind, Stmt, StmtKind};
use vela_ir::{Span, StmtId, TokenKind, Visibility};

use crate::Parser;

impl Parser<'_> {
    /// Parse one statement, or `None` after reporting.
    pub(crate) fn parse_stmt(&mut self) -> Option<StmtId> {
        match self.cursor.current_kind() {
            TokenKind::KwIf => self.stmt_if(),
            TokenKind::KwWhile => self.stmt_while(),
            TokenKind::KwDo => self.stmt_do_while(),
            TokenKind::KwFor => self.stmt_for(),
            TokenKind::KwLoop => self.stmt_loop(),
            TokenKind::KwBreak => self.stmt_keyword(StmtKind::Break),
            TokenKind::KwContinue => self.stmt_keyword(StmtKind::Continue),
            TokenKind::KwReturn => self.stmt_return(),
            TokenKind::KwDefer => self.stmt_defer(),
            TokenKind::LBrace => self.parse_block_stmt(),
            TokenKind::KwVar => {
                let start = self.cursor.current_span();
                let decl = self.decl_var(Visibility::Private)?;
                Some(self.alloc_stmt(StmtKind::Var(decl), start))
            }
            _ => self.stmt_expr(),
        }
    }

    /// `{ stmt* }`
    pub(crate) fn parse_block_stmt(&mut self) -> Option<StmtId> {
        let start = self.cursor.current_span();
        self.expect(&TokenKind::LBrace)?;
        let stmts = self.terminated(&TokenKind::RBrace, Self::parse_stmt);
        let _ = self.expect(&TokenKind::RBrace);
        let range = self.ast.alloc_stmt_list(&stmts);
        Some(self.alloc_stmt(StmtKind::Block(range), start))
    }

    /// `if cond then stmt (else stmt)?`
    fn stmt_if(&mut self) -> Option<StmtId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // if

        let cond = self.parse_expr()?;
        self.expect(&TokenKind::KwThen)?;
        let then_branch = self.parse_stmt()?;
        let else_branch = if self.cursor.consume(&TokenKind::KwElse) {
            self.parse_stmt()
        } else {
            None
        };

        Some(self.alloc_stmt(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            start,
        ))
    }

    /// `while cond do stmt`
    fn stmt_while(&mut self) -> Option<StmtId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // while

        let cond = self.parse_expr()?;
        self.expect(&TokenKind::KwDo)?;
        let body = self.parse_stmt()?;
        Some(self.alloc_stmt(StmtKind::While { cond, body }, start))
    }

    /// `do stmt while cond;`
    fn stmt_do_while(&mut self) -> Option<StmtId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // do

        let body = self.parse_stmt()?;
        self.expect(&TokenKind::KwWhile)?;
        let cond = self.parse_expr()?;
        let _ = self.expect(&TokenKind::Semicolon);
        Some(self.alloc_stmt(StmtKind::DoWhile { body, cond }, start))
    }

    /// `for name: Type in range do stmt`
    fn stmt_for(&mut self) -> Option<StmtId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // for

        let var_start = self.cursor.current_span();
        let (name, name_span) = self.ident("a loop variable name")?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let var_span = var_start.merge(self.cursor.previous_span());
        let var = self.ast.alloc_decl(vela_ir::Decl {
            kind: DeclKind::Var { ty, init: None },
            name,
            name_span,
            span: var_span,
            vis: Visibility::Private,
        });

        self.expect(&TokenKind::KwIn)?;
        let iter = self.parse_expr()?;
        self.expect(&TokenKind::KwDo)?;
        let body = self.parse_stmt()?;

        Some(self.alloc_stmt(StmtKind::For { var, iter, body }, start))
    }

    /// `loop stmt`
    fn stmt_loop(&mut self) -> Option<StmtId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // loop
        let body = self.parse_stmt()?;
        Some(self.alloc_stmt(StmtKind::Loop { body }, start))
    }

    /// `break;` / `continue;` — the node's span is the keyword itself so
    /// control-flow diagnostics point at it.
    fn stmt_keyword(&mut self, kind: StmtKind) -> Option<StmtId> {
        let kw_span = self.cursor.current_span();
        self.cursor.advance();
        let _ = self.expect(&TokenKind::Semicolon);
        Some(self.ast.alloc_stmt(Stmt { kind, span: kw_span }))
    }

    /// `return expr?;`
    fn stmt_return(&mut self) -> Option<StmtId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // return

        let value = if self.cursor.check(&TokenKind::Semicolon) {
            None
        } else {
            self.parse_expr()
        };
        let _ = self.expect(&TokenKind::Semicolon);
        Some(self.alloc_stmt(StmtKind::Return(value), start))
    }

    /// `defer stmt`
    fn stmt_defer(&mut self) -> Option<StmtId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // defer
        let body = self.parse_stmt()?;
        Some(self.alloc_stmt(StmtKind::Defer(body), start))
    }

    /// `expr;`
    fn stmt_expr(&mut self) -> Option<StmtId> {
        let start = self.cursor.current_span();
        let expr = self.parse_expr()?;
        let _ = self.expect(&TokenKind::Semicolon);
        Some(self.alloc_stmt(StmtKind::Expr(expr), start))
    }

    fn alloc_stmt(&mut self, kind: StmtKind, start: Span) -> StmtId {
        let span = start.merge(self.cursor.previous_span());
        self.ast.alloc_stmt(Stmt { kind, span })
    }
}
