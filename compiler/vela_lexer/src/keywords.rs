//! Keyword table.

use vela_ir::TokenKind;

/// Resolve a scanned word against the keyword table.
///
/// `true`, `false`, and `null` produce literal tokens; unmatched words are
/// identifiers (handled by the caller).
pub fn keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "true" => TokenKind::Bool(true),
        "false" => TokenKind::Bool(false),
        "null" => TokenKind::Null,

        "as" => TokenKind::KwAs,
        "is" => TokenKind::KwIs,
        "sizeof" => TokenKind::KwSizeof,
        "alignof" => TokenKind::KwAlignof,
        "in" => TokenKind::KwIn,
        "var" => TokenKind::KwVar,
        "fun" => TokenKind::KwFun,
        "struct" => TokenKind::KwStruct,
        "union" => TokenKind::KwUnion,
        "enum" => TokenKind::KwEnum,
        "mod" => TokenKind::KwMod,
        "type" => TokenKind::KwType,
        "if" => TokenKind::KwIf,
        "then" => TokenKind::KwThen,
        "else" => TokenKind::KwElse,
        "for" => TokenKind::KwFor,
        "while" => TokenKind::KwWhile,
        "do" => TokenKind::KwDo,
        "loop" => TokenKind::KwLoop,
        "break" => TokenKind::KwBreak,
        "continue" => TokenKind::KwContinue,
        "return" => TokenKind::KwReturn,
        "defer" => TokenKind::KwDefer,
        "mut" => TokenKind::KwMut,
        "const" => TokenKind::KwConst,
        "extern" => TokenKind::KwExtern,
        "pub" => TokenKind::KwPub,
        "vec" => TokenKind::KwVec,
        "mat" => TokenKind::KwMat,

        "i8" => TokenKind::KwI8,
        "i16" => TokenKind::KwI16,
        "i32" => TokenKind::KwI32,
        "i64" => TokenKind::KwI64,
        "isize" => TokenKind::KwIsize,
        "u8" => TokenKind::KwU8,
        "u16" => TokenKind::KwU16,
        "u32" => TokenKind::KwU32,
        "u64" => TokenKind::KwU64,
        "usize" => TokenKind::KwUsize,
        "f32" => TokenKind::KwF32,
        "f64" => TokenKind::KwF64,
        "char" => TokenKind::KwChar,
        "bool" => TokenKind::KwBool,
        "unit" => TokenKind::KwUnit,

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_resolve() {
        assert_eq!(keyword("fun"), Some(TokenKind::KwFun));
        assert_eq!(keyword("usize"), Some(TokenKind::KwUsize));
        assert_eq!(keyword("true"), Some(TokenKind::Bool(true)));
        assert_eq!(keyword("null"), Some(TokenKind::Null));
        assert_eq!(keyword("main"), None);
        // keywords are case-sensitive
        assert_eq!(keyword("Fun"), None);
    }
}
