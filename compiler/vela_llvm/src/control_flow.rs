//! Statement lowering: blocks, conditionals, loops, defer, jumps.
//!
//! Every loop allocates its basic blocks up front and registers them so
//! `break`/`continue` (bound to their loop by the control-flow pass) can
//! branch directly. Deferred statements are replayed in reverse order on
//! every exit of their block: fallthrough, `break`/`continue` leaving the
//! block, and `return`.

use inkwell::IntPredicate;
use vela_ir::ast::StmtKind;
use vela_ir::{ExprId, StmtId};

use crate::context::{Codegen, DeferFrame, LoopBlocks};

impl<'ll> Codegen<'ll, '_> {
    pub(crate) fn gen_stmt(&mut self, stmt_id: StmtId) {
        if self.block_terminated() {
            return; // unreachable statement after a jump
        }
        match self.ast.stmt(stmt_id).kind.clone() {
            StmtKind::Expr(expr) => {
                self.gen_expr(expr);
            }
            StmtKind::Var(decl) => self.gen_var_init(decl),
            StmtKind::Block(stmts) => {
                self.defer_stack.push(DeferFrame::default());
                for &stmt in self.ast.stmts_in(stmts) {
                    self.gen_stmt(stmt);
                }
                // Replay this block's defers on normal fallthrough.
                let frame = self.defer_stack.pop().unwrap_or_default();
                if !self.block_terminated() {
                    self.replay_frame(&frame);
                }
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.gen_if(cond, then_branch, else_branch),
            StmtKind::While { cond, body } => self.gen_while(stmt_id, cond, body),
            StmtKind::DoWhile { body, cond } => self.gen_do_while(stmt_id, body, cond),
            StmtKind::For { var, iter, body } => self.gen_for(stmt_id, var, iter, body),
            StmtKind::Loop { body } => self.gen_loop(stmt_id, body),
            StmtKind::Break => self.gen_jump(stmt_id, true),
            StmtKind::Continue => self.gen_jump(stmt_id, false),
            StmtKind::Return(value) => self.gen_return(value),
            StmtKind::Defer(body) => {
                if let Some(frame) = self.defer_stack.last_mut() {
                    frame.stmts.push(body);
                } else {
                    // defer directly in the function body statement
                    self.defer_stack.push(DeferFrame { stmts: vec![body] });
                }
            }
            StmtKind::Error => {}
        }
    }

    fn gen_var_init(&mut self, decl: vela_ir::DeclId) {
        let Some(&slot) = self.locals.get(&decl) else {
            return;
        };
        if let vela_ir::DeclKind::Var {
            init: Some(init), ..
        } = self.ast.decl(decl).kind
        {
            let target = self.analysis.types.decl(decl);
            if let Some(value) = self.gen_coerced(init, target) {
                self.builder.build_store(slot, value).unwrap();
            }
        }
    }

    fn gen_if(&mut self, cond: ExprId, then_branch: StmtId, else_branch: Option<StmtId>) {
        let then_bb = self.append_block("then");
        let else_bb = else_branch.map(|_| self.append_block("else"));
        let end_bb = self.append_block("end");

        let cond_value = self.gen_bool(cond);
        self.builder
            .build_conditional_branch(cond_value, then_bb, else_bb.unwrap_or(end_bb))
            .unwrap();

        self.builder.position_at_end(then_bb);
        self.gen_stmt(then_branch);
        self.branch(end_bb);

        if let (Some(else_bb), Some(else_branch)) = (else_bb, else_branch) {
            self.builder.position_at_end(else_bb);
            self.gen_stmt(else_branch);
            self.branch(end_bb);
        }

        self.builder.position_at_end(end_bb);
    }

    fn gen_while(&mut self, stmt_id: StmtId, cond: ExprId, body: StmtId) {
        let cond_bb = self.append_block("cond");
        let loop_bb = self.append_block("loop");
        let end_bb = self.append_block("end");

        self.loops.insert(
            stmt_id,
            LoopBlocks {
                continue_block: cond_bb,
                end_block: end_bb,
                defer_depth: self.defer_stack.len(),
            },
        );

        self.branch(cond_bb);
        self.builder.position_at_end(cond_bb);
        let cond_value = self.gen_bool(cond);
        self.builder
            .build_conditional_branch(cond_value, loop_bb, end_bb)
            .unwrap();

        self.builder.position_at_end(loop_bb);
        self.gen_stmt(body);
        self.branch(cond_bb);

        self.builder.position_at_end(end_bb);
    }

    fn gen_do_while(&mut self, stmt_id: StmtId, body: StmtId, cond: ExprId) {
        let loop_bb = self.append_block("loop");
        let cond_bb = self.append_block("cond");
        let end_bb = self.append_block("end");

        self.loops.insert(
            stmt_id,
            LoopBlocks {
                continue_block: cond_bb,
                end_block: end_bb,
                defer_depth: self.defer_stack.len(),
            },
        );

        // The body runs once before the condition is first checked.
        self.branch(loop_bb);
        self.builder.position_at_end(loop_bb);
        self.gen_stmt(body);
        self.branch(cond_bb);

        self.builder.position_at_end(cond_bb);
        let cond_value = self.gen_bool(cond);
        self.builder
            .build_conditional_branch(cond_value, loop_bb, end_bb)
            .unwrap();

        self.builder.position_at_end(end_bb);
    }

    /// `for v: T in a..b` — an induction variable stepping to the
    /// exclusive upper bound.
    fn gen_for(&mut self, stmt_id: StmtId, var: vela_ir::DeclId, iter: ExprId, body: StmtId) {
        let vela_ir::ExprKind::Binary {
            op: vela_ir::BinOp::Range,
            lhs,
            rhs,
        } = self.ast.expr(iter).kind
        else {
            return;
        };
        let Some(&slot) = self.locals.get(&var) else {
            return;
        };
        let var_ty = self.analysis.types.decl(var);

        let Some(start) = self.gen_coerced(lhs, var_ty) else {
            return;
        };
        let Some(end) = self.gen_coerced(rhs, var_ty) else {
            return;
        };
        self.builder.build_store(slot, start).unwrap();

        let cond_bb = self.append_block("cond");
        let loop_bb = self.append_block("loop");
        let step_bb = self.append_block("step");
        let end_bb = self.append_block("end");

        self.loops.insert(
            stmt_id,
            LoopBlocks {
                continue_block: step_bb,
                end_block: end_bb,
                defer_depth: self.defer_stack.len(),
            },
        );

        let value_ty = self.analysis.pool.remove_const_mut(var_ty);
        let llvm_ty = self.llvm_type(value_ty).into_int_type();
        let signed = self.analysis.pool.is_signed(self.analysis.pool.underlying(var_ty));
        let predicate = if signed {
            IntPredicate::SLT
        } else {
            IntPredicate::ULT
        };

        self.branch(cond_bb);
        self.builder.position_at_end(cond_bb);
        let current = self
            .builder
            .build_load(llvm_ty, slot, "i")
            .unwrap()
            .into_int_value();
        let keep_going = self
            .builder
            .build_int_compare(predicate, current, end.into_int_value(), "cmp")
            .unwrap();
        self.builder
            .build_conditional_branch(keep_going, loop_bb, end_bb)
            .unwrap();

        self.builder.position_at_end(loop_bb);
        self.gen_stmt(body);
        self.branch(step_bb);

        self.builder.position_at_end(step_bb);
        let current = self
            .builder
            .build_load(llvm_ty, slot, "i")
            .unwrap()
            .into_int_value();
        let next = self
            .builder
            .build_int_add(current, llvm_ty.const_int(1, false), "next")
            .unwrap();
        self.builder.build_store(slot, next).unwrap();
        self.branch(cond_bb);

        self.builder.position_at_end(end_bb);
    }

    fn gen_loop(&mut self, stmt_id: StmtId, body: StmtId) {
        let loop_bb = self.append_block("loop");
        let end_bb = self.append_block("end");

        self.loops.insert(
            stmt_id,
            LoopBlocks {
                continue_block: loop_bb,
                end_block: end_bb,
                defer_depth: self.defer_stack.len(),
            },
        );

        self.branch(loop_bb);
        self.builder.position_at_end(loop_bb);
        self.gen_stmt(body);
        self.branch(loop_bb);

        self.builder.position_at_end(end_bb);
    }

    /// `break` (to the loop's end) or `continue` (to its condition).
    fn gen_jump(&mut self, stmt_id: StmtId, is_break: bool) {
        let Some(&target) = self.analysis.loop_targets.get(&stmt_id) else {
            return; // placement error, already reported
        };
        let Some(&blocks) = self.loops.get(&target) else {
            return;
        };
        self.replay_defers_to(blocks.defer_depth);
        let destination = if is_break {
            blocks.end_block
        } else {
            blocks.continue_block
        };
        self.branch(destination);
    }

    fn gen_return(&mut self, value: Option<ExprId>) {
        let function = self.current_fn.expect("return outside of a function");
        let ret_ty = self.current_fn_ret;
        let return_value = value.and_then(|value| self.gen_coerced(value, ret_ty));

        // All open defer frames replay before leaving the function.
        self.replay_defers_to(0);

        match (return_value, function.get_type().get_return_type()) {
            (Some(value), Some(_)) => {
                self.builder.build_return(Some(&value)).unwrap();
            }
            (_, None) => {
                self.builder.build_return(None).unwrap();
            }
            (None, Some(_)) => self.emit_default_return(function),
        }
    }

    // --- Defer replay ---

    /// Replay every defer frame deeper than `depth`, innermost first.
    /// The frames themselves stay in place; a jump only replays, it does
    /// not close the blocks.
    pub(crate) fn replay_defers_to(&mut self, depth: usize) {
        let pending: Vec<StmtId> = self
            .defer_stack
            .iter()
            .skip(depth)
            .rev()
            .flat_map(|frame| frame.stmts.iter().rev().copied())
            .collect();
        for stmt in pending {
            self.gen_stmt(stmt);
        }
    }

    pub(crate) fn replay_frame(&mut self, frame: &DeferFrame) {
        for &stmt in frame.stmts.iter().rev() {
            self.gen_stmt(stmt);
        }
    }
}
