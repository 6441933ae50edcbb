//! Front-end pipeline tests: full source through lex, parse, and
//! semantic analysis, asserting on diagnostics and driver outputs.

use vela_diagnostic::ErrorCode;
use velac::options::Options;

fn codes(src: &str) -> Vec<ErrorCode> {
    let result = velac::front_end("test.vela", src);
    result.diags.iter().map(|d| d.code).collect()
}

#[test]
fn clean_program_has_no_diagnostics() {
    let result = velac::front_end(
        "test.vela",
        "fun main(): i32 { var x: i64 = 1; var y: i32 = 2; return (x + y) as i32; }",
    );
    assert!(!result.diags.has_errors());
    assert_eq!(result.diags.len(), 0);
}

#[test]
fn lex_errors_flow_through_the_queue() {
    assert!(codes("fun f(): unit { '' ; }").contains(&ErrorCode::E0005));
}

#[test]
fn each_pass_contributes_diagnostics() {
    // parse error, name error, type error, and control-flow error in one file
    let src = "\
fun f(a: i32 = 1, b: i32): unit { }\n\
fun g(): unit { missing; }\n\
fun h(): unit { if 1 then {} }\n\
fun k(): unit { break; }\n";
    let codes = codes(src);
    assert!(codes.contains(&ErrorCode::E1009), "parse: {codes:?}");
    assert!(codes.contains(&ErrorCode::E2002), "nameres: {codes:?}");
    assert!(codes.contains(&ErrorCode::E3003), "typecheck: {codes:?}");
    assert!(codes.contains(&ErrorCode::E4001), "ctrlflow: {codes:?}");
}

#[test]
fn compile_file_writes_dumps() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("sample.vela");
    std::fs::write(&input, "fun main(): i32 { return 2 + 3; }").expect("write input");

    let options = Options {
        inputs: vec![input.to_string_lossy().to_string()],
        dump_tokens: true,
        dump_ast: true,
        ..Options::default()
    };
    let clean = velac::compile_file(&options.inputs[0], &options).expect("pipeline runs");
    assert!(clean);

    let tokens = std::fs::read_to_string(dir.path().join("sample.tokens.json"))
        .expect("tokens dump exists");
    assert!(tokens.contains("\"kind\": \"fun\""));
    assert!(tokens.contains("\"kind\": \"integer literal\""));

    let ast =
        std::fs::read_to_string(dir.path().join("sample.ast.json")).expect("ast dump exists");
    assert!(ast.contains("\"kind\": \"DeclFun\""));
    assert!(ast.contains("\"kind\": \"ExprOpBin\""));
}

#[test]
fn ast_dump_is_deterministic() {
    let src = "fun main(): i32 { return f(1) + 2; }\nfun f(x: i32): i32 { return x; }";
    let a = velac::front_end("a.vela", src);
    let b = velac::front_end("b.vela", src);
    assert_eq!(velac::dump::ast_json(&a.ast), velac::dump::ast_json(&b.ast));
}

#[test]
fn missing_input_is_an_error() {
    let options = Options {
        inputs: vec!["does-not-exist.vela".to_string()],
        ..Options::default()
    };
    assert!(velac::compile_file("does-not-exist.vela", &options).is_err());
}

#[test]
fn emit_without_backend_feature_fails_cleanly() {
    if cfg!(feature = "llvm") {
        return; // this test covers the stub path only
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("emit.vela");
    std::fs::write(&input, "fun main(): i32 { return 0; }").expect("write input");

    let options = Options {
        inputs: vec![input.to_string_lossy().to_string()],
        emit_ll: true,
        ..Options::default()
    };
    let result = velac::compile_file(&options.inputs[0], &options);
    assert!(result.is_err());
}
