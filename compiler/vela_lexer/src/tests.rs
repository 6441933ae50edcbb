use pretty_assertions::assert_eq;
use vela_diagnostic::{DiagnosticQueue, ErrorCode};
use vela_ir::{NumSuffix, StringInterner, TokenKind, TokenList};

fn lex_all(src: &str) -> (Vec<TokenKind>, DiagnosticQueue, StringInterner) {
    let interner = StringInterner::new();
    let mut tokens = TokenList::new();
    let mut diags = DiagnosticQueue::new();
    super::lex(src, &interner, &mut tokens, &mut diags);
    let kinds = tokens.iter().map(|t| t.kind.clone()).collect();
    (kinds, diags, interner)
}

fn kinds(src: &str) -> Vec<TokenKind> {
    let (kinds, diags, _) = lex_all(src);
    assert!(!diags.has_errors(), "unexpected lex errors for {src:?}");
    kinds
}

fn first_error(src: &str) -> ErrorCode {
    let (_, diags, _) = lex_all(src);
    diags
        .iter()
        .next()
        .unwrap_or_else(|| panic!("expected a lex error for {src:?}"))
        .code
}

#[test]
fn empty_input_yields_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}

#[test]
fn keywords_and_identifiers() {
    let (toks, _, interner) = lex_all("fun main x_1");
    assert_eq!(toks[0], TokenKind::KwFun);
    let TokenKind::Ident(name) = &toks[1] else {
        panic!("expected identifier");
    };
    assert_eq!(interner.lookup(*name), "main");
    let TokenKind::Ident(name) = &toks[2] else {
        panic!("expected identifier");
    };
    assert_eq!(interner.lookup(*name), "x_1");
}

#[test]
fn literal_keywords() {
    assert_eq!(
        kinds("true false null"),
        vec![
            TokenKind::Bool(true),
            TokenKind::Bool(false),
            TokenKind::Null,
            TokenKind::Eof
        ]
    );
}

#[test]
fn integer_literals() {
    assert_eq!(
        kinds("42 0xFF 0o17 0b1010"),
        vec![
            TokenKind::Int {
                value: 42,
                suffix: None
            },
            TokenKind::Int {
                value: 255,
                suffix: None
            },
            TokenKind::Int {
                value: 15,
                suffix: None
            },
            TokenKind::Int {
                value: 10,
                suffix: None
            },
            TokenKind::Eof
        ]
    );
}

#[test]
fn integer_suffixes() {
    assert_eq!(
        kinds("1u8 2i64 3usize"),
        vec![
            TokenKind::Int {
                value: 1,
                suffix: Some(NumSuffix::U8)
            },
            TokenKind::Int {
                value: 2,
                suffix: Some(NumSuffix::I64)
            },
            TokenKind::Int {
                value: 3,
                suffix: Some(NumSuffix::Usize)
            },
            TokenKind::Eof
        ]
    );
}

#[test]
fn float_literals() {
    assert_eq!(
        kinds("3.25 1e3 2.5e-2 7f64"),
        vec![
            TokenKind::Float {
                bits: 3.25f64.to_bits(),
                suffix: None
            },
            TokenKind::Float {
                bits: 1e3f64.to_bits(),
                suffix: None
            },
            TokenKind::Float {
                bits: 2.5e-2f64.to_bits(),
                suffix: None
            },
            TokenKind::Float {
                bits: 7f64.to_bits(),
                suffix: Some(NumSuffix::F64)
            },
            TokenKind::Eof
        ]
    );
}

#[test]
fn range_is_not_a_fraction() {
    assert_eq!(
        kinds("1..10"),
        vec![
            TokenKind::Int {
                value: 1,
                suffix: None
            },
            TokenKind::DotDot,
            TokenKind::Int {
                value: 10,
                suffix: None
            },
            TokenKind::Eof
        ]
    );
}

#[test]
fn ill_formed_numbers() {
    assert_eq!(first_error("0x"), ErrorCode::E0009);
    assert_eq!(first_error("1."), ErrorCode::E0010);
    assert_eq!(first_error("1u7"), ErrorCode::E0011);
}

#[test]
fn string_literals_with_escapes() {
    let (toks, diags, interner) = lex_all(r#""a\tb\x41\"q""#);
    assert!(!diags.has_errors());
    let TokenKind::Str(name) = &toks[0] else {
        panic!("expected string literal");
    };
    assert_eq!(interner.lookup(*name), "a\tbA\"q");
}

#[test]
fn string_errors() {
    assert_eq!(first_error("\"abc"), ErrorCode::E0004);
    assert_eq!(first_error(r#""\x""#), ErrorCode::E0006);
    assert_eq!(first_error(r#""\x1FF""#), ErrorCode::E0007);
    assert_eq!(first_error(r#""\q""#), ErrorCode::E0008);
}

#[test]
fn char_literals() {
    assert_eq!(
        kinds(r"'a' '\n' '\x41'"),
        vec![
            TokenKind::Char('a'),
            TokenKind::Char('\n'),
            TokenKind::Char('A'),
            TokenKind::Eof
        ]
    );
}

#[test]
fn char_errors() {
    assert_eq!(first_error("''"), ErrorCode::E0005);
    assert_eq!(first_error("'a"), ErrorCode::E0003);
    assert_eq!(first_error("'ab'"), ErrorCode::E0003);
}

#[test]
fn multi_char_punctuation_longest_match() {
    assert_eq!(
        kinds("<<= << <= < >= >> >>= ... .. . ?. *. ++ -- == != && ||"),
        vec![
            TokenKind::ShlEq,
            TokenKind::Shl,
            TokenKind::Le,
            TokenKind::Lt,
            TokenKind::Ge,
            TokenKind::Shr,
            TokenKind::ShrEq,
            TokenKind::DotDotDot,
            TokenKind::DotDot,
            TokenKind::Dot,
            TokenKind::QuestionDot,
            TokenKind::StarDot,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::Eof
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("1 // line comment\n/* block\ncomment */ 2"),
        vec![
            TokenKind::Int {
                value: 1,
                suffix: None
            },
            TokenKind::Int {
                value: 2,
                suffix: None
            },
            TokenKind::Eof
        ]
    );
}

#[test]
fn unexpected_character() {
    assert_eq!(first_error("@"), ErrorCode::E0001);
}

#[test]
fn identifier_length_boundary() {
    // 255 bytes: accepted
    let ok = "a".repeat(255);
    let (_, diags, _) = lex_all(&ok);
    assert!(!diags.has_errors());

    // 256 bytes: IdentifierTooLong
    let long = "a".repeat(256);
    assert_eq!(first_error(&long), ErrorCode::E0002);
}

#[test]
fn token_spans_cover_source() {
    // Concatenating every token's source slice reproduces the
    // non-whitespace, non-comment portion of the input.
    let src = "fun main(): i32 { return 40 + 2; }";
    let interner = StringInterner::new();
    let mut tokens = TokenList::new();
    let mut diags = DiagnosticQueue::new();
    super::lex(src, &interner, &mut tokens, &mut diags);
    assert!(!diags.has_errors());

    let joined: String = tokens
        .iter()
        .take(tokens.len() - 1) // skip Eof
        .map(|t| &src[t.span.to_range()])
        .collect();
    let expected: String = src.split_whitespace().collect();
    assert_eq!(joined, expected);

    // every token's span is non-empty except Eof
    for token in tokens.iter().take(tokens.len() - 1) {
        assert!(token.span.len() >= 1, "empty span for {token:?}");
    }
}

#[test]
fn program_smoke() {
    let src = "fun main(): i32 { var x: i64 = 1; return (x + 2) as i32; }";
    let toks = kinds(src);
    assert_eq!(toks.first(), Some(&TokenKind::KwFun));
    assert_eq!(toks.last(), Some(&TokenKind::Eof));
    assert!(toks.contains(&TokenKind::KwAs));
    assert!(toks.contains(&TokenKind::KwVar));
}
