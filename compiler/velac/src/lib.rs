//! Driver library for the Vela compiler.
//!
//! The pipeline per input file is fixed:
//! lex → parse → name resolution → type check → control flow → codegen.
//! Every pass accumulates into one diagnostic queue; code generation only
//! runs when the front-end produced no errors.

pub mod dump;
pub mod options;
pub mod tracing_setup;

use std::path::{Path, PathBuf};

use tracing::info;
use vela_diagnostic::{emitter, DiagnosticQueue, SourceFile};
use vela_ir::{Ast, StringInterner, TokenList};
use vela_sema::Analysis;

use options::Options;

/// The front-end result for one source file.
pub struct FrontEnd {
    pub file: SourceFile,
    pub tokens: TokenList,
    pub ast: Ast,
    pub interner: StringInterner,
    pub analysis: Analysis,
    pub diags: DiagnosticQueue,
}

/// Run the front-end passes over one source string.
pub fn front_end(path: &str, source: &str) -> FrontEnd {
    let interner = StringInterner::new();
    let mut tokens = TokenList::new();
    let mut diags = DiagnosticQueue::new();

    vela_lexer::lex(source, &interner, &mut tokens, &mut diags);
    let ast = vela_parse::parse(&tokens, &interner, &mut diags);
    let analysis = vela_sema::analyze(&ast, &interner, &mut diags);

    info!(
        path,
        tokens = tokens.len(),
        errors = diags.error_count(),
        "front-end complete"
    );

    FrontEnd {
        file: SourceFile::new(path, source),
        tokens,
        ast,
        interner,
        analysis,
        diags,
    }
}

/// Compile one input file: run the pipeline, write requested dumps and
/// artifacts, and print diagnostics to stdout. Returns `Ok(true)` when
/// the unit was clean.
pub fn compile_file(path: &str, options: &Options) -> Result<bool, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read `{path}`: {e}"))?;

    let result = front_end(path, &source);

    if options.dump_tokens {
        let out = dump::tokens_json(&result.tokens, &result.file);
        write_output(&with_extension(path, "tokens.json"), &out)?;
    }
    if options.dump_ast {
        let out = dump::ast_json(&result.ast);
        write_output(&with_extension(path, "ast.json"), &out)?;
    }

    // Diagnostics go to stdout, pass order preserved.
    print!("{}", emitter::render_all(&result.diags, &result.file));

    if result.diags.has_errors() {
        return Ok(false);
    }

    if options.wants_emit() {
        emit_outputs(path, &result, options)?;
    }
    Ok(true)
}

fn with_extension(path: &str, extension: &str) -> PathBuf {
    Path::new(path).with_extension(extension)
}

fn write_output(path: &Path, contents: &str) -> Result<(), String> {
    std::fs::write(path, contents)
        .map_err(|e| format!("cannot write `{}`: {e}", path.display()))
}

#[cfg(feature = "llvm")]
fn emit_outputs(path: &str, result: &FrontEnd, options: &Options) -> Result<(), String> {
    use vela_llvm::inkwell::context::Context;

    let module_name = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("module");

    let llcx = Context::create();
    let module = vela_llvm::compile(
        &llcx,
        &result.ast,
        &result.interner,
        &result.analysis,
        module_name,
    )
    .map_err(|e| e.to_string())?;

    if options.emit_ll {
        vela_llvm::aot::emit_ll(&module, &with_extension(path, "ll"))
            .map_err(|e| e.to_string())?;
    }
    if options.emit_bc {
        vela_llvm::aot::emit_bc(&module, &with_extension(path, "bc"))
            .map_err(|e| e.to_string())?;
    }
    if options.emit_obj || options.emit_asm {
        let machine = vela_llvm::aot::host_machine().map_err(|e| e.to_string())?;
        if options.emit_obj {
            vela_llvm::aot::emit_obj(&machine, &module, &with_extension(path, "obj"))
                .map_err(|e| e.to_string())?;
        }
        if options.emit_asm {
            vela_llvm::aot::emit_asm(&machine, &module, &with_extension(path, "asm"))
                .map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

#[cfg(not(feature = "llvm"))]
fn emit_outputs(_path: &str, _result: &FrontEnd, _options: &Options) -> Result<(), String> {
    Err(
        "this build has no LLVM backend; rebuild with `cargo build --features llvm`"
            .to_string(),
    )
}
