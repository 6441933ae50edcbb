//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, one-token lookahead, and consumption
//! methods. The token list always ends in `Eof`, so the cursor always has
//! a current token.

use vela_ir::{Name, Span, Token, TokenKind, TokenList};

/// Cursor for navigating tokens.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        debug_assert!(
            matches!(
                tokens.get(tokens.len().saturating_sub(1)).map(|t| &t.kind),
                Some(TokenKind::Eof)
            ),
            "token list must end with Eof"
        );
        Cursor { tokens, pos: 0 }
    }

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Get the current token's kind.
    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Get the previous token's span (`DUMMY` at the start).
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    /// Peek at the token after the current one.
    #[inline]
    pub fn peek_kind(&self) -> &'a TokenKind {
        let next = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[next].kind
    }

    /// Check if at end of token stream.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind (payloads are
    /// ignored; only the discriminant is compared).
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind().same_kind(kind)
    }

    /// Check if the current token is an identifier.
    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Advance to the next token.
    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    /// Advance past the current token and return it.
    pub fn bump(&mut self) -> &'a Token {
        let token = &self.tokens[self.pos];
        self.advance();
        token
    }

    /// Consume the current token if it matches, returning whether it did.
    pub fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume an identifier, returning its name and span.
    pub fn consume_ident(&mut self) -> Option<(Name, Span)> {
        if let TokenKind::Ident(name) = *self.current_kind() {
            let span = self.current_span();
            self.advance();
            Some((name, span))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ir::Token;

    fn toks(kinds: Vec<TokenKind>) -> TokenList {
        let mut list = TokenList::new();
        for (i, kind) in kinds.into_iter().enumerate() {
            list.push(Token::new(kind, Span::new(i as u32, i as u32 + 1)));
        }
        list.push(Token::new(TokenKind::Eof, Span::point(99)));
        list
    }

    #[test]
    fn check_and_consume() {
        let list = toks(vec![TokenKind::KwFun, TokenKind::LParen]);
        let mut cursor = Cursor::new(&list);
        assert!(cursor.check(&TokenKind::KwFun));
        assert!(cursor.consume(&TokenKind::KwFun));
        assert!(!cursor.consume(&TokenKind::KwFun));
        assert!(cursor.check(&TokenKind::LParen));
    }

    #[test]
    fn eof_is_sticky() {
        let list = toks(vec![]);
        let mut cursor = Cursor::new(&list);
        assert!(cursor.is_at_end());
        cursor.advance();
        assert!(cursor.is_at_end());
    }

    #[test]
    fn payloads_are_ignored_by_check() {
        let list = toks(vec![TokenKind::Int {
            value: 7,
            suffix: None,
        }]);
        let cursor = Cursor::new(&list);
        assert!(cursor.check(&TokenKind::Int {
            value: 0,
            suffix: None
        }));
    }
}
