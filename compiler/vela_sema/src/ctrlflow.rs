//! Control-flow placement pass.
//!
//! Walks statements with a stack of enclosing loop and `defer` entries.
//! `break`/`continue` must find a loop entry that is not separated from
//! them by a `defer`; `return` must not appear under any `defer`. Each
//! valid `break`/`continue` is bound to its target loop for the code
//! generator.

use rustc_hash::FxHashMap;
use vela_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use vela_ir::ast::{DeclKind, StmtKind};
use vela_ir::{Ast, DeclRange, StmtId};

/// Bindings from `break`/`continue` statements to their loops.
pub(crate) type LoopTargets = FxHashMap<StmtId, StmtId>;

pub(crate) fn check(ast: &Ast, diags: &mut DiagnosticQueue) -> LoopTargets {
    let mut pass = CtrlFlow {
        ast,
        diags,
        stack: Vec::new(),
        targets: FxHashMap::default(),
    };
    pass.check_decls(ast.module.decls);
    pass.targets
}

/// One enclosing statement that affects `break`/`continue`/`return`.
#[derive(Copy, Clone)]
enum Entry {
    Loop(StmtId),
    Defer,
}

struct CtrlFlow<'a> {
    ast: &'a Ast,
    diags: &'a mut DiagnosticQueue,
    stack: Vec<Entry>,
    targets: LoopTargets,
}

impl CtrlFlow<'_> {
    fn check_decls(&mut self, range: DeclRange) {
        for &decl in self.ast.decls_in(range) {
            match &self.ast.decl(decl).kind {
                DeclKind::Fun {
                    body: Some(body), ..
                } => {
                    debug_assert!(self.stack.is_empty());
                    self.visit_stmt(*body);
                    self.stack.clear();
                }
                DeclKind::Mod { decls } => self.check_decls(*decls),
                _ => {}
            }
        }
    }

    fn visit_stmt(&mut self, stmt_id: StmtId) {
        match &self.ast.stmt(stmt_id).kind {
            StmtKind::Block(stmts) => {
                for &stmt in self.ast.stmts_in(*stmts) {
                    self.visit_stmt(stmt);
                }
            }
            StmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.visit_stmt(*then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_stmt(*else_branch);
                }
            }
            StmtKind::While { body, .. }
            | StmtKind::DoWhile { body, .. }
            | StmtKind::For { body, .. }
            | StmtKind::Loop { body } => {
                self.stack.push(Entry::Loop(stmt_id));
                self.visit_stmt(*body);
                self.stack.pop();
            }
            StmtKind::Defer(body) => {
                self.stack.push(Entry::Defer);
                self.visit_stmt(*body);
                self.stack.pop();
            }
            StmtKind::Break => self.bind_to_loop(stmt_id, "break", ErrorCode::E4001),
            StmtKind::Continue => self.bind_to_loop(stmt_id, "continue", ErrorCode::E4002),
            StmtKind::Return(_) => {
                if self.stack.iter().any(|e| matches!(e, Entry::Defer)) {
                    let span = self.ast.stmt(stmt_id).span;
                    self.diags.push(
                        Diagnostic::error(
                            ErrorCode::E4003,
                            "`return` is not allowed inside `defer`",
                        )
                        .with_label(span, "returns from inside a deferred statement"),
                    );
                }
            }
            StmtKind::Expr(_) | StmtKind::Var(_) | StmtKind::Error => {}
        }
    }

    /// Find the nearest enclosing loop not separated by a `defer`.
    fn bind_to_loop(&mut self, stmt_id: StmtId, keyword: &str, code: ErrorCode) {
        for entry in self.stack.iter().rev() {
            match entry {
                Entry::Loop(target) => {
                    self.targets.insert(stmt_id, *target);
                    return;
                }
                // A deferred statement cannot jump out of its block.
                Entry::Defer => break,
            }
        }
        let span = self.ast.stmt(stmt_id).span;
        self.diags.push(
            Diagnostic::error(code, format!("`{keyword}` outside of a loop"))
                .with_label(span, "not inside any loop"),
        );
    }
}
