use inkwell::context::Context;
use vela_diagnostic::DiagnosticQueue;
use vela_ir::{StringInterner, TokenList};

fn compile_ir(src: &str) -> String {
    let interner = StringInterner::new();
    let mut tokens = TokenList::new();
    let mut diags = DiagnosticQueue::new();
    vela_lexer::lex(src, &interner, &mut tokens, &mut diags);
    let ast = vela_parse::parse(&tokens, &interner, &mut diags);
    let analysis = vela_sema::analyze(&ast, &interner, &mut diags);
    assert!(!diags.has_errors(), "front-end errors in {src:?}");

    let llcx = Context::create();
    let module = crate::compile(&llcx, &ast, &interner, &analysis, "test")
        .expect("compilation should succeed");
    module.print_to_string().to_string()
}

#[test]
fn arithmetic_module_verifies() {
    let ir = compile_ir(
        "fun main(): i32 { var x: i64 = 1; var y: i32 = 2; return (x + y) as i32; }",
    );
    assert!(ir.contains("define i32 @main"));
    assert!(ir.contains("sext"));
    assert!(ir.contains("trunc"));
}

#[test]
fn safe_unwrap_aborts_on_absent() {
    let ir = compile_ir("fun main(): i32 { var o: ?i32 = null; return o!; }");
    assert!(ir.contains("call void @exit(i32 1)"));
    assert!(ir.contains("unreachable"));
}

#[test]
fn while_loop_block_wiring() {
    let ir = compile_ir(
        "fun main(): i32 { var i: mut i32 = 0; while i < 10 do { i += 1; } return i; }",
    );
    assert!(ir.contains("cond:"));
    assert!(ir.contains("loop:"));
    assert!(ir.contains("end:"));
}

#[test]
fn break_branches_to_loop_end() {
    let ir = compile_ir(
        "fun main(): unit { loop { break; } }",
    );
    assert!(ir.contains("br label %end"));
}

#[test]
fn extern_prototype_and_vararg_call() {
    let ir = compile_ir(
        "extern \"cdecl\" fun printf(fmt: *u8, ...): i32;\n\
         fun main(): i32 { printf(\"hi %d\", 42); return 0; }",
    );
    assert!(ir.contains("declare i32 @printf(ptr, ...)"));
}

#[test]
fn struct_lowering_and_field_store() {
    let ir = compile_ir(
        "struct Point { x: mut i32; y: mut i32; }\n\
         fun main(): i32 { var p: mut Point; p.x = 3; return p.x; }",
    );
    assert!(ir.contains("%Point = type { i32, i32 }"));
    assert!(ir.contains("getelementptr"));
}

#[test]
fn enum_constants_are_small_integers() {
    let ir = compile_ir(
        "enum Color { Red, Green, Blue }\n\
         fun main(): i32 { var c: Color = Color.Blue; return 0; }",
    );
    // three constants fit in i8
    assert!(ir.contains("i8 2"));
}
