//! Lexer for the Vela language.
//!
//! Scans a source string into a [`TokenList`], appending diagnostics to the
//! caller's [`DiagnosticQueue`]. Recognition proceeds by a leading-byte
//! dispatch: words, numbers, strings, characters, then longest-match
//! punctuation. Whitespace, line comments, and non-nesting block comments
//! are skipped silently. The final token is always `Eof`.

mod cursor;
mod escape;
mod keywords;

use vela_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use vela_ir::{Name, NumSuffix, Span, StringInterner, Token, TokenKind, TokenList};

use cursor::Cursor;
use escape::{cook_escape, EscapeErrorKind};
use keywords::keyword;

/// Maximum identifier length in bytes.
const MAX_IDENT_LEN: usize = 255;

/// Tokenize `src`, appending tokens to `tokens` and diagnostics to `diags`.
///
/// Tokens appear in source order; errors are reported in discovery order.
/// The list is always terminated with an `Eof` token so the parser has a
/// current token at every position.
pub fn lex(
    src: &str,
    interner: &StringInterner,
    tokens: &mut TokenList,
    diags: &mut DiagnosticQueue,
) {
    let mut lexer = Lexer {
        cursor: Cursor::new(src),
        interner,
        tokens,
        diags,
    };
    lexer.run();
}

struct Lexer<'a> {
    cursor: Cursor<'a>,
    interner: &'a StringInterner,
    tokens: &'a mut TokenList,
    diags: &'a mut DiagnosticQueue,
}

impl Lexer<'_> {
    fn run(&mut self) {
        loop {
            self.skip_trivia();
            if self.cursor.is_eof() {
                let end = self.cursor.pos();
                self.tokens.push(Token::new(TokenKind::Eof, Span::point(end)));
                return;
            }

            let start = self.cursor.pos();
            match self.cursor.current() {
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.word(start),
                b'0'..=b'9' => self.number(start),
                b'"' => self.string(start),
                b'\'' => self.character(start),
                _ => self.punctuation(start),
            }
        }
    }

    fn push(&mut self, kind: TokenKind, start: u32) {
        let span = Span::new(start, self.cursor.pos());
        self.tokens.push(Token::new(kind, span));
    }

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span, label: &str) {
        self.diags
            .push(Diagnostic::error(code, message).with_label(span, label));
    }

    // --- Trivia ---

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' | b'\n' => self.cursor.advance(),
                b'/' if self.cursor.peek() == b'/' => {
                    self.cursor.eat_while(|b| b != b'\n');
                }
                b'/' if self.cursor.peek() == b'*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    // Non-nesting: stop at the first `*/` or at EOF.
                    while !self.cursor.is_eof() {
                        if self.cursor.current() == b'*' && self.cursor.peek() == b'/' {
                            self.cursor.advance();
                            self.cursor.advance();
                            break;
                        }
                        self.cursor.advance();
                    }
                }
                _ => return,
            }
        }
    }

    // --- Words ---

    fn word(&mut self, start: u32) {
        self.cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        let text = self.cursor.slice(start, self.cursor.pos());

        if text.len() > MAX_IDENT_LEN {
            let span = Span::new(start, self.cursor.pos());
            self.error(
                ErrorCode::E0002,
                format!(
                    "identifier is {} bytes long, the maximum is {MAX_IDENT_LEN}",
                    text.len()
                ),
                span,
                "identifier too long",
            );
        }

        let kind = keyword(text).unwrap_or_else(|| TokenKind::Ident(self.interner.intern(text)));
        self.push(kind, start);
    }

    // --- Numbers ---

    fn number(&mut self, start: u32) {
        if self.cursor.current() == b'0' {
            match self.cursor.peek() {
                b'x' | b'X' => return self.radix_number(start, 16),
                b'o' | b'O' => return self.radix_number(start, 8),
                b'b' | b'B' => return self.radix_number(start, 2),
                _ => {}
            }
        }
        self.decimal_number(start);
    }

    fn radix_number(&mut self, start: u32, radix: u32) {
        self.cursor.advance(); // 0
        self.cursor.advance(); // x/o/b
        let digits_start = self.cursor.pos();
        self.cursor.eat_while(|b| match radix {
            16 => b.is_ascii_hexdigit(),
            8 => (b'0'..=b'7').contains(&b),
            _ => b == b'0' || b == b'1',
        });
        let digits = self.cursor.slice(digits_start, self.cursor.pos());
        let suffix = self.scan_suffix(start);

        if digits.is_empty() {
            let span = Span::new(start, self.cursor.pos());
            self.error(
                ErrorCode::E0009,
                "integer literal has no digits",
                span,
                "expected digits after the base prefix",
            );
            self.push(TokenKind::Int { value: 0, suffix }, start);
            return;
        }

        let value = match u64::from_str_radix(digits, radix) {
            Ok(v) => v,
            Err(_) => {
                let span = Span::new(start, self.cursor.pos());
                self.error(
                    ErrorCode::E0009,
                    "integer literal is too large for any integer type",
                    span,
                    "does not fit in 64 bits",
                );
                0
            }
        };
        self.push(TokenKind::Int { value, suffix }, start);
    }

    fn decimal_number(&mut self, start: u32) {
        self.cursor.eat_while(|b| b.is_ascii_digit());

        let mut is_float = false;

        // A fraction needs at least one digit after the dot; `1..10` is a
        // range expression, so a dot followed by a dot is left alone.
        if self.cursor.current() == b'.' {
            if self.cursor.peek().is_ascii_digit() {
                is_float = true;
                self.cursor.advance();
                self.cursor.eat_while(|b| b.is_ascii_digit());
            } else if self.cursor.peek() != b'.' {
                is_float = true;
                self.cursor.advance();
                let span = Span::new(start, self.cursor.pos());
                self.error(
                    ErrorCode::E0010,
                    "float literal has no digits after the decimal point",
                    span,
                    "expected a digit here",
                );
            }
        }

        // Exponent: e/E with an optional sign and required digits.
        if matches!(self.cursor.current(), b'e' | b'E') {
            let after_sign = if matches!(self.cursor.peek(), b'+' | b'-') {
                self.cursor.peek2()
            } else {
                self.cursor.peek()
            };
            if after_sign.is_ascii_digit() {
                is_float = true;
                self.cursor.advance(); // e
                if matches!(self.cursor.current(), b'+' | b'-') {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|b| b.is_ascii_digit());
            }
        }

        let body_end = self.cursor.pos();
        let suffix = self.scan_suffix(start);

        let text = self.cursor.slice(start, body_end);
        if is_float || suffix.is_some_and(NumSuffix::is_float) {
            let bits = text.parse::<f64>().unwrap_or(0.0).to_bits();
            self.push(TokenKind::Float { bits, suffix }, start);
        } else {
            let value = match text.parse::<u64>() {
                Ok(v) => v,
                Err(_) => {
                    let span = Span::new(start, body_end);
                    self.error(
                        ErrorCode::E0009,
                        "integer literal is too large for any integer type",
                        span,
                        "does not fit in 64 bits",
                    );
                    0
                }
            };
            self.push(TokenKind::Int { value, suffix }, start);
        }
    }

    /// Scan a trailing suffix word after a numeric literal, if any.
    fn scan_suffix(&mut self, literal_start: u32) -> Option<NumSuffix> {
        if !self.cursor.current().is_ascii_alphabetic() {
            return None;
        }
        let suffix_start = self.cursor.pos();
        self.cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        let text = self.cursor.slice(suffix_start, self.cursor.pos());
        match NumSuffix::from_str(text) {
            Some(suffix) => Some(suffix),
            None => {
                let span = Span::new(literal_start, self.cursor.pos());
                self.error(
                    ErrorCode::E0011,
                    format!("unrecognized literal suffix `{text}`"),
                    span,
                    "not a valid numeric suffix",
                );
                None
            }
        }
    }

    // --- Strings ---

    fn string(&mut self, start: u32) {
        self.cursor.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.cursor.current() {
                b'"' => {
                    self.cursor.advance();
                    break;
                }
                0 if self.cursor.is_eof() => {
                    let span = Span::new(start, self.cursor.pos());
                    self.error(
                        ErrorCode::E0004,
                        "unterminated string literal",
                        span,
                        "missing closing `\"`",
                    );
                    break;
                }
                b'\\' => match cook_escape(&mut self.cursor) {
                    Ok(c) => value.push(c),
                    Err(err) => self.escape_error(err),
                },
                _ => {
                    if let Some(c) = self.cursor.bump_char() {
                        value.push(c);
                    }
                }
            }
        }

        let name: Name = self.interner.intern(&value);
        self.push(TokenKind::Str(name), start);
    }

    // --- Characters ---

    fn character(&mut self, start: u32) {
        self.cursor.advance(); // opening quote

        if self.cursor.consume(b'\'') {
            let span = Span::new(start, self.cursor.pos());
            self.error(
                ErrorCode::E0005,
                "empty character literal",
                span,
                "a character literal needs exactly one character",
            );
            self.push(TokenKind::Char('\0'), start);
            return;
        }

        if self.cursor.is_eof() {
            let span = Span::new(start, self.cursor.pos());
            self.error(
                ErrorCode::E0003,
                "unterminated character literal",
                span,
                "missing closing `'`",
            );
            self.push(TokenKind::Char('\0'), start);
            return;
        }

        let c = match self.cursor.current() {
            b'\\' => match cook_escape(&mut self.cursor) {
                Ok(c) => c,
                Err(err) => {
                    self.escape_error(err);
                    '\0'
                }
            },
            _ => self.cursor.bump_char().unwrap_or('\0'),
        };

        if !self.cursor.consume(b'\'') {
            // Recover to the closing quote on this line, if there is one.
            self.cursor
                .eat_while(|b| b != b'\'' && b != b'\n');
            self.cursor.consume(b'\'');
            let span = Span::new(start, self.cursor.pos());
            self.error(
                ErrorCode::E0003,
                "unterminated character literal",
                span,
                "missing closing `'`",
            );
        }

        self.push(TokenKind::Char(c), start);
    }

    fn escape_error(&mut self, err: escape::EscapeError) {
        match err.kind {
            EscapeErrorKind::MissingHexDigits => self.error(
                ErrorCode::E0006,
                "`\\x` escape has no hex digits",
                err.span,
                "expected one or two hex digits",
            ),
            EscapeErrorKind::TooManyHexDigits => self.error(
                ErrorCode::E0007,
                "`\\x` escape has more than two hex digits",
                err.span,
                "at most two hex digits are allowed",
            ),
            EscapeErrorKind::Unknown(c) => self.error(
                ErrorCode::E0008,
                format!("unknown escape sequence `\\{c}`"),
                err.span,
                "not a recognized escape",
            ),
        }
    }

    // --- Punctuation ---

    fn punctuation(&mut self, start: u32) {
        use TokenKind as T;

        let kind = match self.cursor.current() {
            b'+' => {
                self.cursor.advance();
                if self.cursor.consume(b'+') {
                    T::PlusPlus
                } else if self.cursor.consume(b'=') {
                    T::PlusEq
                } else {
                    T::Plus
                }
            }
            b'-' => {
                self.cursor.advance();
                if self.cursor.consume(b'-') {
                    T::MinusMinus
                } else if self.cursor.consume(b'=') {
                    T::MinusEq
                } else {
                    T::Minus
                }
            }
            b'*' => {
                self.cursor.advance();
                if self.cursor.consume(b'=') {
                    T::StarEq
                } else if self.cursor.consume(b'.') {
                    T::StarDot
                } else {
                    T::Star
                }
            }
            b'/' => {
                self.cursor.advance();
                if self.cursor.consume(b'=') {
                    T::SlashEq
                } else {
                    T::Slash
                }
            }
            b'%' => {
                self.cursor.advance();
                if self.cursor.consume(b'=') {
                    T::PercentEq
                } else {
                    T::Percent
                }
            }
            b'&' => {
                self.cursor.advance();
                if self.cursor.consume(b'&') {
                    T::AmpAmp
                } else if self.cursor.consume(b'=') {
                    T::AmpEq
                } else {
                    T::Amp
                }
            }
            b'|' => {
                self.cursor.advance();
                if self.cursor.consume(b'|') {
                    T::PipePipe
                } else if self.cursor.consume(b'=') {
                    T::PipeEq
                } else {
                    T::Pipe
                }
            }
            b'^' => {
                self.cursor.advance();
                if self.cursor.consume(b'=') {
                    T::CaretEq
                } else {
                    T::Caret
                }
            }
            b'~' => {
                self.cursor.advance();
                T::Tilde
            }
            b'<' => {
                self.cursor.advance();
                if self.cursor.consume(b'<') {
                    if self.cursor.consume(b'=') {
                        T::ShlEq
                    } else {
                        T::Shl
                    }
                } else if self.cursor.consume(b'=') {
                    T::Le
                } else {
                    T::Lt
                }
            }
            b'>' => {
                self.cursor.advance();
                if self.cursor.consume(b'>') {
                    if self.cursor.consume(b'=') {
                        T::ShrEq
                    } else {
                        T::Shr
                    }
                } else if self.cursor.consume(b'=') {
                    T::Ge
                } else {
                    T::Gt
                }
            }
            b'!' => {
                self.cursor.advance();
                if self.cursor.consume(b'=') {
                    T::BangEq
                } else {
                    T::Bang
                }
            }
            b'.' => {
                self.cursor.advance();
                if self.cursor.consume(b'.') {
                    if self.cursor.consume(b'.') {
                        T::DotDotDot
                    } else {
                        T::DotDot
                    }
                } else {
                    T::Dot
                }
            }
            b'?' => {
                self.cursor.advance();
                if self.cursor.consume(b'.') {
                    T::QuestionDot
                } else {
                    T::Question
                }
            }
            b'=' => {
                self.cursor.advance();
                if self.cursor.consume(b'=') {
                    T::EqEq
                } else {
                    T::Eq
                }
            }
            b',' => {
                self.cursor.advance();
                T::Comma
            }
            b':' => {
                self.cursor.advance();
                T::Colon
            }
            b';' => {
                self.cursor.advance();
                T::Semicolon
            }
            b'(' => {
                self.cursor.advance();
                T::LParen
            }
            b')' => {
                self.cursor.advance();
                T::RParen
            }
            b'[' => {
                self.cursor.advance();
                T::LBracket
            }
            b']' => {
                self.cursor.advance();
                T::RBracket
            }
            b'{' => {
                self.cursor.advance();
                T::LBrace
            }
            b'}' => {
                self.cursor.advance();
                T::RBrace
            }
            _ => {
                let c = self.cursor.bump_char().unwrap_or('\u{FFFD}');
                let span = Span::new(start, self.cursor.pos());
                self.error(
                    ErrorCode::E0001,
                    format!("unexpected character `{c}`"),
                    span,
                    "not a valid token",
                );
                return;
            }
        };
        self.push(kind, start);
    }
}

#[cfg(test)]
mod tests;
