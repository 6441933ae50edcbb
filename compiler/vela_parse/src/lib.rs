//! Recursive descent parser for Vela.
//!
//! Produces a flat [`Ast`] from a [`TokenList`]. Declarations, statements,
//! and types use plain recursive descent; expressions go through the
//! shunting-yard sub-parser in [`shyd`]. Parse errors are appended to the
//! caller's [`DiagnosticQueue`] and the parser resynchronizes at statement
//! or declaration boundaries, so one malformed production never aborts the
//! pass.

mod cursor;
mod grammar;
mod series;
mod shyd;

#[cfg(test)]
mod tests;

use tracing::debug;
use vela_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use vela_ir::{Ast, Span, StringInterner, TokenKind, TokenList};

use cursor::Cursor;

/// Parse a token stream into an AST.
///
/// Always returns an arena, possibly with `Error` placeholder nodes where
/// productions failed; the caller decides based on the queue whether to
/// continue the pipeline.
pub fn parse(
    tokens: &TokenList,
    interner: &StringInterner,
    diags: &mut DiagnosticQueue,
) -> Ast {
    let mut parser = Parser {
        cursor: Cursor::new(tokens),
        ast: Ast::new(),
        interner,
        diags,
    };
    parser.parse_module();
    debug!(
        decls = parser.ast.decl_count(),
        exprs = parser.ast.expr_count(),
        "parse complete"
    );
    parser.ast
}

/// Parser state.
pub(crate) struct Parser<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) ast: Ast,
    pub(crate) interner: &'a StringInterner,
    pub(crate) diags: &'a mut DiagnosticQueue,
}

impl Parser<'_> {
    fn parse_module(&mut self) {
        let mut decls = Vec::new();
        while !self.cursor.is_at_end() {
            match self.parse_decl() {
                Some(decl) => decls.push(decl),
                None => self.synchronize_decl(),
            }
        }
        self.ast.module.decls = self.ast.alloc_decl_list(&decls);
    }

    // --- Errors ---

    pub(crate) fn error(&mut self, code: ErrorCode, message: String, span: Span, label: &str) {
        self.diags
            .push(Diagnostic::error(code, message).with_label(span, label));
    }

    /// Report an `UnexpectedToken` error at the current token.
    pub(crate) fn error_expected(&mut self, expected: &str) {
        let found = self.cursor.current_kind().display_name();
        let span = self.cursor.current_span();
        self.error(
            ErrorCode::E1001,
            format!("expected {expected}, found `{found}`"),
            span,
            &format!("expected {expected}"),
        );
    }

    /// Expect a specific token kind; on mismatch report and return `None`
    /// without advancing, so the caller can resynchronize.
    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Option<Span> {
        if self.cursor.check(kind) {
            let span = self.cursor.current_span();
            self.cursor.advance();
            Some(span)
        } else {
            self.error_expected(&format!("`{}`", kind.display_name()));
            None
        }
    }

    // --- Recovery ---

    /// Skip tokens until a plausible declaration start.
    fn synchronize_decl(&mut self) {
        while !self.cursor.is_at_end() {
            if matches!(
                self.cursor.current_kind(),
                TokenKind::KwVar
                    | TokenKind::KwFun
                    | TokenKind::KwStruct
                    | TokenKind::KwUnion
                    | TokenKind::KwEnum
                    | TokenKind::KwMod
                    | TokenKind::KwType
                    | TokenKind::KwExtern
                    | TokenKind::KwPub
            ) {
                return;
            }
            if self.cursor.consume(&TokenKind::Semicolon)
                || self.cursor.consume(&TokenKind::RBrace)
            {
                return;
            }
            self.cursor.advance();
        }
    }

    /// Skip tokens until a plausible statement boundary.
    pub(crate) fn synchronize_stmt(&mut self) {
        while !self.cursor.is_at_end() {
            if self.cursor.consume(&TokenKind::Semicolon) {
                return;
            }
            if matches!(
                self.cursor.current_kind(),
                TokenKind::RBrace
                    | TokenKind::KwIf
                    | TokenKind::KwWhile
                    | TokenKind::KwDo
                    | TokenKind::KwFor
                    | TokenKind::KwLoop
                    | TokenKind::KwBreak
                    | TokenKind::KwContinue
                    | TokenKind::KwReturn
                    | TokenKind::KwDefer
                    | TokenKind::KwVar
            ) {
                return;
            }
            self.cursor.advance();
        }
    }
}
