//! Escape sequence cooking, shared by string and character scanning.

use vela_ir::Span;

use crate::cursor::Cursor;

/// Why an escape sequence failed to cook.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum EscapeErrorKind {
    /// `\x` with no hex digits.
    MissingHexDigits,
    /// `\x` with more than two hex digits.
    TooManyHexDigits,
    /// Backslash followed by an unrecognized character.
    Unknown(char),
}

/// A failed escape with the span of the whole sequence.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct EscapeError {
    pub kind: EscapeErrorKind,
    pub span: Span,
}

/// Cook one escape sequence. The cursor must be positioned at the
/// backslash; on return it is past the sequence (also on error, so
/// scanning always makes progress).
///
/// Recognized: `\n \r \t \v \f \a \b \\ \' \" \0 \xHH` (one or two hex
/// digits).
pub fn cook_escape(cursor: &mut Cursor<'_>) -> Result<char, EscapeError> {
    let start = cursor.pos();
    debug_assert_eq!(cursor.current(), b'\\');
    cursor.advance();

    let c = match cursor.current() {
        b'n' => '\n',
        b'r' => '\r',
        b't' => '\t',
        b'v' => '\u{0B}',
        b'f' => '\u{0C}',
        b'a' => '\u{07}',
        b'b' => '\u{08}',
        b'\\' => '\\',
        b'\'' => '\'',
        b'"' => '"',
        b'0' => '\0',
        b'x' => {
            cursor.advance();
            return cook_hex_escape(cursor, start);
        }
        _ => {
            let unknown = cursor.bump_char().unwrap_or('\u{FFFD}');
            return Err(EscapeError {
                kind: EscapeErrorKind::Unknown(unknown),
                span: Span::new(start, cursor.pos()),
            });
        }
    };
    cursor.advance();
    Ok(c)
}

fn cook_hex_escape(cursor: &mut Cursor<'_>, start: u32) -> Result<char, EscapeError> {
    let digits_start = cursor.pos();
    cursor.eat_while(|b| b.is_ascii_hexdigit());
    let digits = cursor.slice(digits_start, cursor.pos());

    let kind = match digits.len() {
        0 => EscapeErrorKind::MissingHexDigits,
        1 | 2 => {
            let value = u8::from_str_radix(digits, 16).unwrap_or(0);
            return Ok(value as char);
        }
        _ => EscapeErrorKind::TooManyHexDigits,
    };
    Err(EscapeError {
        kind,
        span: Span::new(start, cursor.pos()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cook(src: &str) -> Result<char, EscapeError> {
        let mut cursor = Cursor::new(src);
        cook_escape(&mut cursor)
    }

    #[test]
    fn simple_escapes() {
        assert_eq!(cook("\\n"), Ok('\n'));
        assert_eq!(cook("\\t"), Ok('\t'));
        assert_eq!(cook("\\\\"), Ok('\\'));
        assert_eq!(cook("\\0"), Ok('\0'));
        assert_eq!(cook("\\a"), Ok('\u{07}'));
    }

    #[test]
    fn hex_escapes() {
        assert_eq!(cook("\\x1"), Ok('\u{01}'));
        assert_eq!(cook("\\x1F"), Ok('\u{1F}'));
        assert_eq!(cook("\\x7f"), Ok('\u{7F}'));
    }

    #[test]
    fn hex_escape_errors() {
        assert_eq!(
            cook("\\x").map_err(|e| e.kind),
            Err(EscapeErrorKind::MissingHexDigits)
        );
        assert_eq!(
            cook("\\x1FF").map_err(|e| e.kind),
            Err(EscapeErrorKind::TooManyHexDigits)
        );
    }

    #[test]
    fn unknown_escape() {
        assert_eq!(
            cook("\\q").map_err(|e| e.kind),
            Err(EscapeErrorKind::Unknown('q'))
        );
    }
}
