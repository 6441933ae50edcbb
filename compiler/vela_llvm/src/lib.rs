//! LLVM backend for the Vela compiler.
//!
//! Lowers a type-checked AST into an LLVM module. This is the only crate
//! that links against LLVM; all earlier passes are IR-free. The generator
//! never re-type-checks: every decision that needs a type or an operator
//! family reads the tables produced by `vela_sema`.

pub mod aot;
mod context;
mod control_flow;
mod expr;
mod functions;
mod operators;
mod types;

#[cfg(test)]
mod tests;

use std::fmt;

use inkwell::context::Context;
use inkwell::module::Module;
use tracing::debug;
use vela_ir::{Ast, StringInterner};
use vela_sema::Analysis;

pub use inkwell;

/// Errors surfaced by code generation and emission.
#[derive(Debug, Clone)]
pub enum CodegenError {
    /// Host target initialization or lookup failed.
    Target(String),
    /// The generated module failed LLVM verification.
    Verify(String),
    /// Writing an output artifact failed.
    Emit(String),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::Target(msg) => write!(f, "target setup failed: {msg}"),
            CodegenError::Verify(msg) => write!(f, "module verification failed: {msg}"),
            CodegenError::Emit(msg) => write!(f, "emission failed: {msg}"),
        }
    }
}

impl std::error::Error for CodegenError {}

/// Compile an analyzed compilation unit into an LLVM module.
///
/// The module is configured for the host target and passes the LLVM
/// verifier before it is returned.
pub fn compile<'ll>(
    llcx: &'ll Context,
    ast: &Ast,
    interner: &StringInterner,
    analysis: &Analysis,
    module_name: &str,
) -> Result<Module<'ll>, CodegenError> {
    let machine = aot::host_machine()?;
    let mut cx = context::Codegen::new(llcx, ast, interner, analysis, module_name, &machine);

    cx.declare_functions(ast.module.decls, "");
    cx.define_globals(ast.module.decls);
    cx.compile_bodies(ast.module.decls);

    let module = cx.finish();
    debug!(module = module_name, "codegen complete");

    if let Err(message) = module.verify() {
        return Err(CodegenError::Verify(message.to_string()));
    }
    Ok(module)
}
