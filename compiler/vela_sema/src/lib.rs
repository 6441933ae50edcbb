//! Semantic analysis for Vela.
//!
//! Three passes over the parsed AST, in order:
//! 1. Name resolution — builds the scope tree and binds identifiers.
//! 2. Type check — records a type for every node, applies conversion and
//!    promotion rules, and tags operator sub-kinds.
//! 3. Control flow — validates `break`/`continue`/`return` placement and
//!    binds loop jumps to their targets.
//!
//! Every pass runs to completion; failed nodes carry the poison type and
//! are skipped downstream.

mod ctrlflow;
mod nameres;
mod scope;
mod typecheck;

#[cfg(test)]
mod tests;

use rustc_hash::FxHashMap;
use vela_diagnostic::DiagnosticQueue;
use vela_ir::{Ast, DeclId, ExprId, StmtId, StringInterner};
use vela_types::{Idx, Pool, TypeTable};

pub use scope::{ScopeId, ScopeTree};

/// Operator sub-kind resolved during type checking, telling the code
/// generator which instruction family applies.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OpFamily {
    SInt,
    UInt,
    Float,
    Ptr,
    VecSInt,
    VecUInt,
    VecFloat,
    MatSInt,
    MatUInt,
    MatFloat,
}

impl OpFamily {
    /// Check if this family operates on floating-point lanes.
    pub fn is_float(self) -> bool {
        matches!(
            self,
            OpFamily::Float | OpFamily::VecFloat | OpFamily::MatFloat
        )
    }

    /// Check if this family operates on signed integer lanes.
    pub fn is_signed_int(self) -> bool {
        matches!(self, OpFamily::SInt | OpFamily::VecSInt | OpFamily::MatSInt)
    }
}

/// The combined result of semantic analysis, everything the code
/// generator needs.
pub struct Analysis {
    /// Hash-consed type descriptors.
    pub pool: Pool,
    /// Per-node types.
    pub types: TypeTable,
    /// Identifier and member expressions bound to declarations.
    pub resolutions: FxHashMap<ExprId, DeclId>,
    /// Field index or enum-constant ordinal per member expression.
    pub member_indices: FxHashMap<ExprId, u32>,
    /// `break`/`continue` statements bound to their loops.
    pub loop_targets: FxHashMap<StmtId, StmtId>,
    /// Operator sub-kinds per operator expression.
    pub op_families: FxHashMap<ExprId, OpFamily>,
}

impl Analysis {
    /// Type of an expression, poison for unrecorded nodes.
    pub fn expr_type(&self, expr: ExprId) -> Idx {
        let ty = self.types.expr(expr);
        if ty.is_none() {
            Idx::ERROR
        } else {
            ty
        }
    }
}

/// Run all three passes. Diagnostics accumulate in `diags`; the caller
/// decides whether the unit is clean enough for code generation.
pub fn analyze(ast: &Ast, interner: &StringInterner, diags: &mut DiagnosticQueue) -> Analysis {
    let nameres = nameres::resolve(ast, interner, diags);
    let checked = typecheck::check(ast, interner, diags, &nameres);
    let loop_targets = ctrlflow::check(ast, diags);

    Analysis {
        pool: checked.pool,
        types: checked.table,
        resolutions: checked.resolutions,
        member_indices: checked.member_indices,
        loop_targets,
        op_families: checked.op_families,
    }
}
