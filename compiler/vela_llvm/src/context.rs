//! Codegen context: the LLVM module, builder, caches, and per-function
//! state threaded through every lowering method.

use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::targets::{TargetData, TargetMachine};
use inkwell::types::{BasicTypeEnum, PointerType};
use inkwell::values::{FunctionValue, PointerValue};
use inkwell::AddressSpace;
use rustc_hash::FxHashMap;
use vela_ir::{Ast, DeclId, StmtId, StringInterner};
use vela_sema::Analysis;
use vela_types::Idx;

/// Blocks of one active loop, for `break`/`continue` lowering.
#[derive(Copy, Clone)]
pub(crate) struct LoopBlocks<'ll> {
    /// Where `continue` jumps: the condition (or step) block.
    pub continue_block: BasicBlock<'ll>,
    /// Where `break` jumps.
    pub end_block: BasicBlock<'ll>,
    /// Defer-stack depth at loop entry; jumps replay deeper frames.
    pub defer_depth: usize,
}

/// One block scope's pending `defer` statements.
#[derive(Default)]
pub(crate) struct DeferFrame {
    pub stmts: Vec<StmtId>,
}

/// The code generator.
pub(crate) struct Codegen<'ll, 'a> {
    pub llcx: &'ll Context,
    pub llmod: Module<'ll>,
    pub builder: Builder<'ll>,
    pub target_data: TargetData,
    pub ptr_type: PointerType<'ll>,

    pub ast: &'a Ast,
    pub interner: &'a StringInterner,
    pub analysis: &'a Analysis,

    /// Lowered LLVM type per descriptor.
    pub type_cache: FxHashMap<Idx, BasicTypeEnum<'ll>>,
    /// Declared functions by declaration.
    pub functions: FxHashMap<DeclId, FunctionValue<'ll>>,
    /// Module-level variables by declaration.
    pub globals: FxHashMap<DeclId, PointerValue<'ll>>,

    // --- Per-function state ---
    /// Stack slots for parameters and local variables.
    pub locals: FxHashMap<DeclId, PointerValue<'ll>>,
    /// Active loops keyed by their loop statement.
    pub loops: FxHashMap<StmtId, LoopBlocks<'ll>>,
    /// Pending defers, one frame per open block.
    pub defer_stack: Vec<DeferFrame>,
    pub current_fn: Option<FunctionValue<'ll>>,
    /// Return type descriptor of the function being compiled.
    pub current_fn_ret: Idx,
}

impl<'ll, 'a> Codegen<'ll, 'a> {
    pub fn new(
        llcx: &'ll Context,
        ast: &'a Ast,
        interner: &'a StringInterner,
        analysis: &'a Analysis,
        module_name: &str,
        machine: &TargetMachine,
    ) -> Self {
        let llmod = llcx.create_module(module_name);
        let target_data = machine.get_target_data();
        llmod.set_triple(&machine.get_triple());
        llmod.set_data_layout(&target_data.get_data_layout());

        Codegen {
            llcx,
            llmod,
            builder: llcx.create_builder(),
            target_data,
            ptr_type: llcx.ptr_type(AddressSpace::default()),
            ast,
            interner,
            analysis,
            type_cache: FxHashMap::default(),
            functions: FxHashMap::default(),
            globals: FxHashMap::default(),
            locals: FxHashMap::default(),
            loops: FxHashMap::default(),
            defer_stack: Vec::new(),
            current_fn: None,
            current_fn_ret: Idx::UNIT,
        }
    }

    pub fn finish(self) -> Module<'ll> {
        self.llmod
    }

    /// Append a named basic block to the current function.
    pub fn append_block(&self, name: &str) -> BasicBlock<'ll> {
        let function = self
            .current_fn
            .expect("append_block outside of a function");
        self.llcx.append_basic_block(function, name)
    }

    /// Whether the current insertion block already has a terminator.
    pub fn block_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|b| b.get_terminator())
            .is_some()
    }

    /// Branch to `target` unless the block already terminated.
    pub fn branch(&self, target: BasicBlock<'ll>) {
        if !self.block_terminated() {
            self.builder.build_unconditional_branch(target).unwrap();
        }
    }

    /// The C `exit` prototype used by the safe-unwrap abort path.
    pub fn exit_function(&mut self) -> FunctionValue<'ll> {
        if let Some(existing) = self.llmod.get_function("exit") {
            return existing;
        }
        let fn_type = self
            .llcx
            .void_type()
            .fn_type(&[self.llcx.i32_type().into()], false);
        self.llmod
            .add_function("exit", fn_type, Some(inkwell::module::Linkage::External))
    }
}
