//! Series helpers: delimited and terminated list parsing.
//!
//! The two core list shapes of the grammar:
//! - *delimited*: items separated by a token, ended by a terminator
//!   (`(a, b, c)`, `[x; y]`, enum constants)
//! - *terminated*: items parsed back-to-back until the terminator
//!   (`{ decl; decl; }`, block statements)
//!
//! Both resynchronize at the separator/terminator when an item fails, so a
//! malformed element costs one diagnostic, not the rest of the list.

use vela_ir::TokenKind;

use crate::Parser;

impl Parser<'_> {
    /// Parse `item (separator item)*` until the terminator. Neither the
    /// terminator nor anything after it is consumed.
    pub(crate) fn delimited<T>(
        &mut self,
        separator: &TokenKind,
        terminator: &TokenKind,
        mut item: impl FnMut(&mut Self) -> Option<T>,
    ) -> Vec<T> {
        let mut items = Vec::new();
        loop {
            if self.cursor.check(terminator) || self.cursor.is_at_end() {
                break;
            }
            match item(self) {
                Some(value) => items.push(value),
                None => self.synchronize_series(separator, terminator),
            }
            if !self.cursor.consume(separator) {
                break;
            }
        }
        items
    }

    /// Parse items until the terminator. The terminator is not consumed.
    pub(crate) fn terminated<T>(
        &mut self,
        terminator: &TokenKind,
        mut item: impl FnMut(&mut Self) -> Option<T>,
    ) -> Vec<T> {
        let mut items = Vec::new();
        while !self.cursor.check(terminator) && !self.cursor.is_at_end() {
            let before = self.cursor.current_span();
            match item(self) {
                Some(value) => items.push(value),
                None => self.synchronize_stmt(),
            }
            // An item that consumed nothing would loop forever; skip one
            // token to guarantee progress.
            if self.cursor.current_span() == before && !self.cursor.check(terminator) {
                self.cursor.advance();
            }
        }
        items
    }

    /// Skip to the next separator or terminator after a failed item.
    fn synchronize_series(&mut self, separator: &TokenKind, terminator: &TokenKind) {
        while !self.cursor.is_at_end()
            && !self.cursor.check(separator)
            && !self.cursor.check(terminator)
        {
            self.cursor.advance();
        }
    }
}
