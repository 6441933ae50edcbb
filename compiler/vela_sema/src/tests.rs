use pretty_assertions::assert_eq;
use vela_diagnostic::{DiagnosticQueue, ErrorCode, Severity};
use vela_ir::ast::ExprKind;
use vela_ir::{Ast, BinOp, ExprId, StringInterner, TokenList, UnOp};
use vela_types::Idx;

use crate::Analysis;

fn analyze_src(src: &str) -> (Ast, Analysis, DiagnosticQueue, StringInterner) {
    let interner = StringInterner::new();
    let mut tokens = TokenList::new();
    let mut diags = DiagnosticQueue::new();
    vela_lexer::lex(src, &interner, &mut tokens, &mut diags);
    let ast = vela_parse::parse(&tokens, &interner, &mut diags);
    assert!(
        !diags.has_errors(),
        "lex/parse errors in test input {src:?}"
    );
    let analysis = crate::analyze(&ast, &interner, &mut diags);
    (ast, analysis, diags, interner)
}

fn analyze_clean(src: &str) -> (Ast, Analysis) {
    let (ast, analysis, diags, _) = analyze_src(src);
    let messages: Vec<_> = diags
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.message.clone())
        .collect();
    assert!(messages.is_empty(), "unexpected errors: {messages:?}");
    (ast, analysis)
}

fn error_codes(src: &str) -> Vec<ErrorCode> {
    let (_, _, diags, _) = analyze_src(src);
    diags
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.code)
        .collect()
}

fn find_expr(ast: &Ast, pred: impl Fn(&ExprKind) -> bool) -> ExprId {
    for i in 0..ast.expr_count() {
        let id = ExprId::from_raw(i as u32);
        if pred(&ast.expr(id).kind) {
            return id;
        }
    }
    panic!("no matching expression");
}

// --- End-to-end scenarios ---

#[test]
fn arithmetic_and_promotion() {
    let src = "fun main(): i32 { var x: i64 = 1; var y: i32 = 2; return (x + y) as i32; }";
    let (ast, analysis, diags, _) = analyze_src(src);
    assert!(!diags.has_errors());
    // same signedness: no mixed-signedness warning
    assert!(diags
        .iter()
        .all(|d| d.severity != Severity::Warning || d.code != ErrorCode::E3020));

    let add = find_expr(&ast, |k| {
        matches!(k, ExprKind::Binary { op: BinOp::Add, .. })
    });
    assert_eq!(analysis.expr_type(add), Idx::I64);

    let cast = find_expr(&ast, |k| matches!(k, ExprKind::Cast { .. }));
    assert_eq!(analysis.expr_type(cast), Idx::I32);
}

#[test]
fn break_outside_loop() {
    let codes = error_codes("fun main(): unit { if true then break; }");
    assert_eq!(codes, vec![ErrorCode::E4001]);
}

#[test]
fn shadowing_warns_with_both_sites() {
    let src = "fun f(): unit { var x: i32 = 0; { var x: i32 = 1; } }";
    let (_, _, diags, _) = analyze_src(src);
    assert!(!diags.has_errors());
    let shadow = diags
        .iter()
        .find(|d| d.code == ErrorCode::E2005)
        .expect("expected a shadow warning");
    assert_eq!(shadow.severity, Severity::Warning);
    assert_eq!(shadow.labels.len(), 2);
    // primary at the inner declaration, secondary at the outer
    let primary = shadow.primary_span().expect("primary span");
    let secondary = shadow
        .labels
        .iter()
        .find(|l| l.style == vela_diagnostic::LabelStyle::Secondary)
        .expect("secondary label")
        .span;
    assert!(primary.start > secondary.start);
}

#[test]
fn optional_unwrap_type_checks() {
    let (ast, analysis) =
        analyze_clean("fun main(): i32 { var o: ?i32 = null; return o!; }");
    let unwrap = find_expr(&ast, |k| {
        matches!(
            k,
            ExprKind::Unary {
                op: UnOp::Unwrap,
                ..
            }
        )
    });
    assert_eq!(analysis.expr_type(unwrap), Idx::I32);
}

#[test]
fn union_member_missing() {
    let codes = error_codes(
        "union U { a: i32; b: f32; } fun main(): unit { var u: U; u.c; }",
    );
    assert_eq!(codes, vec![ErrorCode::E2006]);
}

#[test]
fn symbol_collision_reports_both_sites() {
    let src = "fun f(): unit {} fun f(): unit {}";
    let (_, _, diags, _) = analyze_src(src);
    let collision = diags
        .iter()
        .find(|d| d.code == ErrorCode::E2001)
        .expect("expected a collision error");
    assert_eq!(collision.labels.len(), 2);
    let primary = collision.primary_span().expect("primary span");
    let secondary = collision
        .labels
        .iter()
        .find(|l| l.style == vela_diagnostic::LabelStyle::Secondary)
        .expect("secondary label")
        .span;
    // primary at the second declaration, secondary at the first
    assert!(primary.start > secondary.start);
}

// --- Name resolution ---

#[test]
fn undefined_symbol() {
    assert_eq!(
        error_codes("fun f(): unit { missing; }"),
        vec![ErrorCode::E2002]
    );
}

#[test]
fn typename_misuse() {
    // a function used as a type
    assert!(error_codes("fun g(): unit {} var x: g;").contains(&ErrorCode::E2004));
    // a type used as an expression
    assert!(
        error_codes("struct S { a: i32; } fun f(): unit { S; }")
            .contains(&ErrorCode::E2003)
    );
}

#[test]
fn module_member_resolution_and_privacy() {
    let (ast, analysis) = analyze_clean(
        "mod math { pub fun double(x: i32): i32 { return x + x; } }\n\
         fun main(): i32 { return math.double(21); }",
    );
    let call = find_expr(&ast, |k| matches!(k, ExprKind::Call { .. }));
    assert_eq!(analysis.expr_type(call), Idx::I32);

    let codes = error_codes(
        "mod m { fun hidden(): unit {} }\n\
         fun main(): unit { m.hidden(); }",
    );
    assert!(codes.contains(&ErrorCode::E2007));
}

#[test]
fn function_forward_reference() {
    analyze_clean(
        "fun first(): i32 { return second(); }\n\
         fun second(): i32 { return 1; }",
    );
}

// --- Type checking ---

#[test]
fn assignment_requires_mutable() {
    assert!(
        error_codes("fun f(): unit { var x: i32 = 0; x = 1; }").contains(&ErrorCode::E3004)
    );
    analyze_clean("fun f(): unit { var x: mut i32 = 0; x = 1; x += 2; }");
}

#[test]
fn call_arity_errors() {
    let src = "fun g(a: i32): i32 { return a; }";
    assert!(error_codes(&format!("{src} fun f(): i32 {{ return g(); }}"))
        .contains(&ErrorCode::E3014));
    assert!(
        error_codes(&format!("{src} fun f(): i32 {{ return g(1, 2); }}"))
            .contains(&ErrorCode::E3013)
    );
}

#[test]
fn variadic_calls_allow_extra_arguments() {
    analyze_clean(
        "extern \"cdecl\" fun printf(fmt: *u8, ...): i32;\n\
         fun f(): unit { printf(\"%d %d\", 1, 2); }",
    );
}

#[test]
fn illegal_conversion() {
    assert!(
        error_codes("fun f(): unit { var x: i32 = true; }").contains(&ErrorCode::E3015)
    );
    assert!(
        error_codes("struct S { a: i32; } fun f(): unit { var s: S; s as i32; }")
            .contains(&ErrorCode::E3015)
    );
}

#[test]
fn integer_literal_width_boundaries() {
    // 2^8 - 1 fits u8; 2^8 does not
    analyze_clean("fun f(): unit { var x: u8 = 255; }");
    assert!(error_codes("fun f(): unit { var x: u8 = 256; }").contains(&ErrorCode::E3016));
}

#[test]
fn untyped_literal_promotes_to_peer_width() {
    let (ast, analysis) = analyze_clean("fun f(x: i64): i64 { return x + 1; }");
    let add = find_expr(&ast, |k| {
        matches!(k, ExprKind::Binary { op: BinOp::Add, .. })
    });
    assert_eq!(analysis.expr_type(add), Idx::I64);
    // the literal itself was re-typed to the peer width
    let lit = find_expr(&ast, |k| matches!(k, ExprKind::IntLit { value: 1, .. }));
    assert_eq!(analysis.expr_type(lit), Idx::I64);
}

#[test]
fn mixed_signedness_warns() {
    let (_, _, diags, _) =
        analyze_src("fun f(a: i32, b: u32): unit { a + b; }");
    assert!(!diags.has_errors());
    assert!(diags.iter().any(|d| d.code == ErrorCode::E3020));
}

#[test]
fn logical_and_comparison_types() {
    let (ast, analysis) =
        analyze_clean("fun f(a: i32, b: i32): bool { return a < b && a != 0; }");
    let cmp = find_expr(&ast, |k| {
        matches!(k, ExprKind::Binary { op: BinOp::Lt, .. })
    });
    assert_eq!(analysis.expr_type(cmp), Idx::BOOL);

    assert!(error_codes("fun f(a: i32): bool { return a && true; }")
        .contains(&ErrorCode::E3003));
}

#[test]
fn condition_must_be_bool() {
    assert!(error_codes("fun f(): unit { if 1 then {} }").contains(&ErrorCode::E3003));
}

#[test]
fn return_type_compatibility() {
    assert!(error_codes("fun f(): i32 { return true; }").contains(&ErrorCode::E3012));
    assert!(error_codes("fun f(): i32 { return; }").contains(&ErrorCode::E3012));
    analyze_clean("fun f(): unit { return; }");
}

#[test]
fn pointer_operations() {
    let (ast, analysis) = analyze_clean(
        "fun f(): unit { var x: mut i32 = 1; var p: *mut i32 = &x; *p = 2; }",
    );
    let addr = find_expr(&ast, |k| {
        matches!(
            k,
            ExprKind::Unary {
                op: UnOp::AddrOf,
                ..
            }
        )
    });
    let ty = analysis.expr_type(addr);
    assert_eq!(analysis.pool.tag(ty), vela_types::Tag::Ptr);
}

#[test]
fn string_and_char_literal_types() {
    let (ast, analysis) = analyze_clean(
        "fun f(): unit { var s: *u8 = \"hi\"; var c: char = 'x'; }",
    );
    let string = find_expr(&ast, |k| matches!(k, ExprKind::StrLit(_)));
    let ty = analysis.expr_type(string);
    assert_eq!(analysis.pool.tag(ty), vela_types::Tag::Ptr);
    assert_eq!(analysis.pool.base(ty), Idx::U8);

    let ch = find_expr(&ast, |k| matches!(k, ExprKind::CharLit(_)));
    assert_eq!(analysis.expr_type(ch), Idx::CHAR);
}

#[test]
fn struct_field_access_and_assignment() {
    analyze_clean(
        "struct Point { x: mut i32; y: mut i32; }\n\
         fun f(): i32 { var p: mut Point; p.x = 3; return p.y; }",
    );
}

#[test]
fn enum_constants() {
    let (ast, analysis) = analyze_clean(
        "enum Color { Red, Green, Blue }\n\
         fun f(): unit { var c: Color = Color.Green; }",
    );
    let member = find_expr(&ast, |k| matches!(k, ExprKind::Member { .. }));
    let ty = analysis.expr_type(member);
    assert_eq!(analysis.pool.tag(ty), vela_types::Tag::Enum);
    assert_eq!(analysis.member_indices.get(&member), Some(&1));
}

#[test]
fn vector_dimension_mismatch() {
    assert!(
        error_codes("fun f(): unit { [1.0, 2.0] + [1.0, 2.0, 3.0]; }")
            .contains(&ErrorCode::E3017)
    );
    analyze_clean("fun f(): unit { [1.0, 2.0] + [3.0, 4.0]; }");
}

#[test]
fn sizeof_yields_usize() {
    let (ast, analysis) = analyze_clean("fun f(): usize { return sizeof i64; }");
    let expr = find_expr(&ast, |k| matches!(k, ExprKind::SizeOf(_)));
    assert_eq!(analysis.expr_type(expr), Idx::USIZE);
}

#[test]
fn type_alias_resolution() {
    analyze_clean("type Byte = u8;\nfun f(): unit { var b: Byte = 7; }");
}

// --- Control flow ---

#[test]
fn loop_targets_are_bound() {
    let (ast, analysis) = analyze_clean(
        "fun f(): unit { while true do { if false then break; else continue; } }",
    );
    assert_eq!(analysis.loop_targets.len(), 2);
    // both jumps bind to the same while loop
    let targets: Vec<_> = analysis.loop_targets.values().collect();
    assert_eq!(targets[0], targets[1]);
    let _ = ast;
}

#[test]
fn continue_outside_loop() {
    assert_eq!(
        error_codes("fun f(): unit { continue; }"),
        vec![ErrorCode::E4002]
    );
}

#[test]
fn return_inside_defer() {
    assert!(
        error_codes("fun f(): unit { defer { return; } }").contains(&ErrorCode::E4003)
    );
    // a return next to a defer is fine
    analyze_clean("fun f(): unit { defer { } return; }");
}

#[test]
fn break_does_not_cross_defer() {
    assert!(
        error_codes("fun f(): unit { while true do defer { break; } }")
            .contains(&ErrorCode::E4001)
    );
}

#[test]
fn member_type_path_resolves() {
    analyze_clean(
        "mod geo { pub struct Point { x: i32; y: i32; } }\n\
         fun f(): unit { var p: geo.Point; }",
    );
    assert!(error_codes(
        "mod geo { struct Hidden { x: i32; } }\n\
         fun f(): unit { var p: geo.Hidden; }"
    )
    .contains(&ErrorCode::E2007));
}

#[test]
fn null_safe_member_yields_optional() {
    let (ast, analysis) = analyze_clean(
        "struct S { v: i32; }\n\
         fun f(o: ?S): ?i32 { return o?.v; }",
    );
    let member = find_expr(&ast, |k| matches!(k, ExprKind::Member { .. }));
    let ty = analysis.expr_type(member);
    assert_eq!(analysis.pool.tag(ty), vela_types::Tag::Opt);
    assert_eq!(analysis.pool.base(ty), Idx::I32);
}

#[test]
fn indirect_member_through_pointer() {
    analyze_clean(
        "struct S { v: mut i32; }\n\
         fun f(p: *mut S): i32 { p*.v = 4; return p*.v; }",
    );
    assert!(
        error_codes("struct S { v: i32; } fun f(s: S): unit { s*.v; }")
            .contains(&ErrorCode::E3006)
    );
}

#[test]
fn matrix_arithmetic_dimensions() {
    analyze_clean("fun f(): unit { [[1.0, 2.0], [3.0, 4.0]] + [[1.0, 1.0], [1.0, 1.0]]; }");
    assert!(
        error_codes("fun f(): unit { [[1.0, 2.0]] + [[1.0], [2.0]]; }")
            .contains(&ErrorCode::E3018)
    );
}

#[test]
fn array_indexing() {
    analyze_clean(
        "fun f(): i32 { var a: mut [4]i32; a[0] = 5; return a[1]; }",
    );
    assert!(
        error_codes("fun f(): unit { var a: [4]i32; a[true]; }")
            .contains(&ErrorCode::E3001)
    );
    assert!(error_codes("fun f(x: i32): unit { x[0]; }").contains(&ErrorCode::E3007));
}

#[test]
fn enum_casts_to_integer() {
    analyze_clean("enum E { A, B }\nfun f(): i32 { return E.B as i32; }");
}

#[test]
fn unwrap_requires_optional() {
    assert!(error_codes("fun f(x: i32): i32 { return x!; }").contains(&ErrorCode::E3005));
}

#[test]
fn address_of_requires_lvalue() {
    assert!(error_codes("fun f(): unit { &(1 + 2); }").contains(&ErrorCode::E3008));
}

#[test]
fn increment_requires_mutable_arithmetic() {
    analyze_clean("fun f(): i32 { var x: mut i32 = 0; x++; return ++x; }");
    assert!(error_codes("fun f(): unit { var x: i32 = 0; x++; }").contains(&ErrorCode::E3004));
}

#[test]
fn defer_scopes_do_not_leak_loops() {
    // a loop fully inside the defer makes the break legal
    analyze_clean("fun f(): unit { defer { while true do { break; } } }");
}

#[test]
fn shifts_keep_left_operand_type() {
    let (ast, analysis) = analyze_clean("fun f(x: u8): u8 { return x << 1; }");
    let shift = find_expr(&ast, |k| {
        matches!(k, ExprKind::Binary { op: BinOp::Shl, .. })
    });
    assert_eq!(analysis.expr_type(shift), Idx::U8);
}

#[test]
fn type_annotation_coverage() {
    // after a clean run, every expression node has a recorded type
    let (ast, analysis) = analyze_clean(
        "struct S { v: mut i32; }\n\
         fun helper(x: i32): i32 { return x * 2; }\n\
         fun main(): i32 {\n\
           var s: mut S;\n\
           s.v = helper(4);\n\
           for i: i32 in 0..10 do { s.v += i; }\n\
           return s.v;\n\
         }",
    );
    for i in 0..ast.expr_count() {
        let id = ExprId::from_raw(i as u32);
        assert!(
            !analysis.types.expr(id).is_none(),
            "expression {id:?} has no recorded type"
        );
    }
}
