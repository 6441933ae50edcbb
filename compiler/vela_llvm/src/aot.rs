//! Ahead-of-time emission: target setup and artifact writing.
//!
//! Verification happens in [`compile`](crate::compile); this module turns
//! the verified module into `.ll`, `.bc`, `.obj`, or `.asm` files through
//! a host `TargetMachine`.

use std::path::Path;

use inkwell::module::Module;
use inkwell::targets::{
    CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine,
};
use inkwell::OptimizationLevel;

use crate::CodegenError;

/// Create a target machine for the host triple.
pub fn host_machine() -> Result<TargetMachine, CodegenError> {
    Target::initialize_native(&InitializationConfig::default())
        .map_err(|e| CodegenError::Target(e.to_string()))?;

    let triple = TargetMachine::get_default_triple();
    let target =
        Target::from_triple(&triple).map_err(|e| CodegenError::Target(e.to_string()))?;
    let cpu = TargetMachine::get_host_cpu_name();
    let features = TargetMachine::get_host_cpu_features();

    target
        .create_target_machine(
            &triple,
            cpu.to_str().unwrap_or("generic"),
            features.to_str().unwrap_or(""),
            OptimizationLevel::None,
            RelocMode::Default,
            CodeModel::Default,
        )
        .ok_or_else(|| CodegenError::Target("no target machine for host triple".to_string()))
}

/// Write textual LLVM IR.
pub fn emit_ll(module: &Module<'_>, path: &Path) -> Result<(), CodegenError> {
    module
        .print_to_file(path)
        .map_err(|e| CodegenError::Emit(e.to_string()))
}

/// Write LLVM bitcode.
pub fn emit_bc(module: &Module<'_>, path: &Path) -> Result<(), CodegenError> {
    if module.write_bitcode_to_path(path) {
        Ok(())
    } else {
        Err(CodegenError::Emit(format!(
            "failed to write bitcode to {}",
            path.display()
        )))
    }
}

/// Write a native object file.
pub fn emit_obj(
    machine: &TargetMachine,
    module: &Module<'_>,
    path: &Path,
) -> Result<(), CodegenError> {
    machine
        .write_to_file(module, FileType::Object, path)
        .map_err(|e| CodegenError::Emit(e.to_string()))
}

/// Write native assembly.
pub fn emit_asm(
    machine: &TargetMachine,
    module: &Module<'_>,
    path: &Path,
) -> Result<(), CodegenError> {
    machine
        .write_to_file(module, FileType::Assembly, path)
        .map_err(|e| CodegenError::Emit(e.to_string()))
}
