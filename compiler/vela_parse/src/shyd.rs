//! Shunting-yard expression parser.
//!
//! Two stacks: an output queue of elements (terms, type operands, and
//! flushed operators in postfix order) and a stack of pending operators.
//! The `prev_term` flag distinguishes grammar context: after a term,
//! `+`/`-`/`*` are binary and `(`/`[`/`!`/`++`/`--` are postfix forms;
//! otherwise they are prefix operators or literal openers.
//!
//! Postfix constructs that carry extra payload (calls, subscripts, member
//! names, the safe unwrap) bind tightest, so they reduce against the most
//! recent term immediately instead of passing through the queue. A closing
//! parenthesis rebuilds its group into a single term, which is what lets
//! `(a + b)(x)` call a parenthesized callee.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{Expr, ExprKind};
use vela_ir::{
    BinOp, ExprId, MemberAccess, PendingOp, Span, TokenKind, TypeExprId, UnOp,
};

use crate::Parser;

/// Output queue element.
enum Elem {
    Term(ExprId),
    Type(TypeExprId, Span),
    Op(PendingOp, Span),
}

/// Pending operator stack entry.
enum OpEntry {
    Op(PendingOp, Span),
    /// Grouping paren; `out_start` marks where its group begins in the
    /// output queue so the group can be rebuilt into one term.
    ParenOpen { span: Span, out_start: usize },
}

#[derive(Default)]
struct ShydState {
    out: Vec<Elem>,
    ops: Vec<OpEntry>,
    prev_term: bool,
}

impl Parser<'_> {
    /// Parse one expression. Stops (without consuming) at the first token
    /// that cannot continue the expression.
    pub(crate) fn parse_expr(&mut self) -> Option<ExprId> {
        let mut state = ShydState::default();

        loop {
            let more = if state.prev_term {
                self.step_after_term(&mut state)
            } else {
                self.step_expect_term(&mut state)
            };
            if !more {
                break;
            }
        }

        // Flush remaining operators; leftover parens are unclosed.
        while let Some(entry) = state.ops.pop() {
            match entry {
                OpEntry::Op(op, span) => state.out.push(Elem::Op(op, span)),
                OpEntry::ParenOpen { span, .. } => {
                    self.error(
                        ErrorCode::E1002,
                        "unclosed parenthesis".to_string(),
                        span,
                        "this parenthesis is never closed",
                    );
                }
            }
        }

        if state.out.is_empty() {
            self.error_expected("an expression");
            return None;
        }
        self.build_tree(state.out)
    }

    // --- Term position ---

    fn step_expect_term(&mut self, state: &mut ShydState) -> bool {
        let span = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Int { value, suffix } => {
                let kind = ExprKind::IntLit {
                    value: *value,
                    suffix: *suffix,
                };
                self.cursor.advance();
                kind
            }
            TokenKind::Float { bits, suffix } => {
                let kind = ExprKind::FloatLit {
                    bits: *bits,
                    suffix: *suffix,
                };
                self.cursor.advance();
                kind
            }
            TokenKind::Str(name) => {
                let kind = ExprKind::StrLit(*name);
                self.cursor.advance();
                kind
            }
            TokenKind::Char(c) => {
                let kind = ExprKind::CharLit(*c);
                self.cursor.advance();
                kind
            }
            TokenKind::Bool(b) => {
                let kind = ExprKind::BoolLit(*b);
                self.cursor.advance();
                kind
            }
            TokenKind::Null => {
                self.cursor.advance();
                ExprKind::NullLit
            }
            TokenKind::Ident(name) => {
                let kind = ExprKind::Ident(*name);
                self.cursor.advance();
                kind
            }
            TokenKind::LParen => {
                self.cursor.advance();
                state.ops.push(OpEntry::ParenOpen {
                    span,
                    out_start: state.out.len(),
                });
                return true;
            }
            TokenKind::LBracket => {
                let Some(term) = self.bracket_literal() else {
                    return false;
                };
                state.out.push(Elem::Term(term));
                state.prev_term = true;
                return true;
            }
            TokenKind::KwSizeof => {
                self.cursor.advance();
                let Some(ty) = self.parse_type() else {
                    return false;
                };
                ExprKind::SizeOf(ty)
            }
            TokenKind::KwAlignof => {
                self.cursor.advance();
                let Some(ty) = self.parse_type() else {
                    return false;
                };
                ExprKind::AlignOf(ty)
            }

            // Prefix operators
            TokenKind::Plus => return self.push_prefix(state, UnOp::Pos),
            TokenKind::Minus => return self.push_prefix(state, UnOp::Neg),
            TokenKind::Star => return self.push_prefix(state, UnOp::Deref),
            TokenKind::Amp => return self.push_prefix(state, UnOp::AddrOf),
            TokenKind::Bang => return self.push_prefix(state, UnOp::Not),
            TokenKind::Tilde => return self.push_prefix(state, UnOp::BitNot),
            TokenKind::PlusPlus => return self.push_prefix(state, UnOp::PreInc),
            TokenKind::MinusMinus => return self.push_prefix(state, UnOp::PreDec),

            _ => return false,
        };

        let end = self.cursor.previous_span();
        let id = self.ast.alloc_expr(Expr {
            kind,
            span: span.merge(end),
        });
        state.out.push(Elem::Term(id));
        state.prev_term = true;
        true
    }

    fn push_prefix(&mut self, state: &mut ShydState, op: UnOp) -> bool {
        let span = self.cursor.current_span();
        self.cursor.advance();
        state.ops.push(OpEntry::Op(PendingOp::Unary(op), span));
        true
    }

    // --- After a term ---

    fn step_after_term(&mut self, state: &mut ShydState) -> bool {
        let span = self.cursor.current_span();
        match self.cursor.current_kind() {
            // Postfix constructs reduce against the last term directly.
            TokenKind::LParen => {
                self.cursor.advance();
                let args =
                    self.delimited(&TokenKind::Comma, &TokenKind::RParen, Self::parse_expr);
                if !self.cursor.consume(&TokenKind::RParen) {
                    self.missing_paren();
                }
                let Some(callee) = self.pop_last_term(state) else {
                    self.error(
                        ErrorCode::E1006,
                        "call without a callee".to_string(),
                        span,
                        "nothing to call here",
                    );
                    return true;
                };
                let args = self.ast.alloc_expr_list(&args);
                let call_span = self.ast.expr(callee).span.merge(self.cursor.previous_span());
                let id = self.ast.alloc_expr(Expr {
                    kind: ExprKind::Call { callee, args },
                    span: call_span,
                });
                state.out.push(Elem::Term(id));
                true
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let index = self.parse_expr();
                if !self.cursor.consume(&TokenKind::RBracket) {
                    self.missing_bracket();
                }
                let (Some(index), Some(base)) = (index, self.pop_last_term(state)) else {
                    return true;
                };
                let index_span = self.ast.expr(base).span.merge(self.cursor.previous_span());
                let id = self.ast.alloc_expr(Expr {
                    kind: ExprKind::Index { base, index },
                    span: index_span,
                });
                state.out.push(Elem::Term(id));
                true
            }
            TokenKind::Bang => self.postfix_unary(state, UnOp::Unwrap),
            TokenKind::PlusPlus => self.postfix_unary(state, UnOp::PostInc),
            TokenKind::MinusMinus => self.postfix_unary(state, UnOp::PostDec),
            TokenKind::Dot => self.member(state, MemberAccess::Direct),
            TokenKind::StarDot => self.member(state, MemberAccess::Indirect),
            TokenKind::QuestionDot => self.member(state, MemberAccess::NullSafe),

            TokenKind::KwAs => {
                self.cursor.advance();
                let Some(ty) = self.parse_type() else {
                    return true;
                };
                let ty_span = self.ast.type_expr(ty).span;
                self.flush_for(state, PendingOp::Cast);
                state.ops.push(OpEntry::Op(PendingOp::Cast, span));
                state.out.push(Elem::Type(ty, ty_span));
                true
            }

            TokenKind::RParen => {
                if !state
                    .ops
                    .iter()
                    .any(|e| matches!(e, OpEntry::ParenOpen { .. }))
                {
                    // The caller's closing paren; not ours to consume.
                    return false;
                }
                self.cursor.advance();
                self.close_group(state);
                true
            }

            kind => {
                let Some(op) = binary_for(kind) else {
                    return false;
                };
                self.cursor.advance();
                self.flush_for(state, PendingOp::Binary(op));
                state.ops.push(OpEntry::Op(PendingOp::Binary(op), span));
                state.prev_term = false;
                true
            }
        }
    }

    fn postfix_unary(&mut self, state: &mut ShydState, op: UnOp) -> bool {
        let span = self.cursor.current_span();
        self.cursor.advance();
        let Some(operand) = self.pop_last_term(state) else {
            self.error(
                ErrorCode::E1004,
                format!("`{}` has no operand", op.symbol()),
                span,
                "expected an operand before this operator",
            );
            return true;
        };
        let full = self.ast.expr(operand).span.merge(span);
        let id = self.ast.alloc_expr(Expr {
            kind: ExprKind::Unary { op, operand },
            span: full,
        });
        state.out.push(Elem::Term(id));
        true
    }

    fn member(&mut self, state: &mut ShydState, access: MemberAccess) -> bool {
        self.cursor.advance();
        let Some((member, member_span)) = self.cursor.consume_ident() else {
            self.error_expected("a member name");
            return true;
        };
        let Some(owner) = self.pop_last_term(state) else {
            return true;
        };
        let full = self.ast.expr(owner).span.merge(member_span);
        let id = self.ast.alloc_expr(Expr {
            kind: ExprKind::Member {
                owner,
                access,
                member,
                member_span,
            },
            span: full,
        });
        state.out.push(Elem::Term(id));
        true
    }

    /// Pop operators to the queue while they outrank the incoming one:
    /// strictly higher precedence, or equal precedence when the stacked
    /// operator is left-associative.
    fn flush_for(&mut self, state: &mut ShydState, incoming: PendingOp) {
        while let Some(OpEntry::Op(top, _)) = state.ops.last() {
            let pops = top.precedence() > incoming.precedence()
                || (top.precedence() == incoming.precedence() && top.is_left_assoc());
            if !pops {
                break;
            }
            let Some(OpEntry::Op(op, span)) = state.ops.pop() else {
                break;
            };
            state.out.push(Elem::Op(op, span));
        }
    }

    /// Close the innermost grouping paren: flush its operators, then
    /// rebuild the group's queue slice into a single term.
    fn close_group(&mut self, state: &mut ShydState) {
        while let Some(entry) = state.ops.pop() {
            match entry {
                OpEntry::Op(op, span) => state.out.push(Elem::Op(op, span)),
                OpEntry::ParenOpen { out_start, .. } => {
                    let group: Vec<Elem> = state.out.drain(out_start..).collect();
                    if let Some(id) = self.build_tree(group) {
                        state.out.push(Elem::Term(id));
                    }
                    state.prev_term = true;
                    return;
                }
            }
        }
    }

    fn pop_last_term(&mut self, state: &mut ShydState) -> Option<ExprId> {
        match state.out.pop() {
            Some(Elem::Term(id)) => Some(id),
            Some(other) => {
                state.out.push(other);
                None
            }
            None => None,
        }
    }

    // --- Bracket literals ---

    /// `[a, b, c]` vector literal or `[[a, b], [c, d]]` matrix literal.
    fn bracket_literal(&mut self) -> Option<ExprId> {
        let start = self.cursor.current_span();
        self.cursor.advance(); // [

        if self.cursor.check(&TokenKind::LBracket) {
            return self.matrix_literal(start);
        }

        let elems = self.delimited(&TokenKind::Comma, &TokenKind::RBracket, Self::parse_expr);
        if !self.cursor.consume(&TokenKind::RBracket) {
            self.missing_bracket();
        }
        let elems = self.ast.alloc_expr_list(&elems);
        let span = start.merge(self.cursor.previous_span());
        Some(self.ast.alloc_expr(Expr {
            kind: ExprKind::VectorLit { elems },
            span,
        }))
    }

    fn matrix_literal(&mut self, start: Span) -> Option<ExprId> {
        let rows = self.delimited(&TokenKind::Comma, &TokenKind::RBracket, |p| {
            p.expect(&TokenKind::LBracket)?;
            let row = p.delimited(&TokenKind::Comma, &TokenKind::RBracket, Self::parse_expr);
            if !p.cursor.consume(&TokenKind::RBracket) {
                p.missing_bracket();
            }
            Some(row)
        });
        if !self.cursor.consume(&TokenKind::RBracket) {
            self.missing_bracket();
        }
        let span = start.merge(self.cursor.previous_span());

        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            self.error(
                ErrorCode::E1010,
                "matrix rows have inconsistent lengths".to_string(),
                span,
                "every row must have the same number of elements",
            );
        }

        let flat: Vec<ExprId> = rows.iter().flatten().copied().collect();
        let elems = self.ast.alloc_expr_list(&flat);
        Some(self.ast.alloc_expr(Expr {
            kind: ExprKind::MatrixLit {
                rows: rows.len() as u16,
                cols: cols as u16,
                elems,
            },
            span,
        }))
    }

    // --- Tree rebuilding ---

    /// Rebuild a postfix element sequence into a single expression node.
    fn build_tree(&mut self, elems: Vec<Elem>) -> Option<ExprId> {
        let mut stack: Vec<Node> = Vec::new();

        for elem in elems {
            match elem {
                Elem::Term(id) => stack.push(Node::Expr(id)),
                Elem::Type(id, span) => stack.push(Node::Type(id, span)),
                Elem::Op(op, span) => {
                    let node = self.apply_op(op, span, &mut stack);
                    stack.push(Node::Expr(node));
                }
            }
        }

        // A well-formed sequence reduces to exactly one expression.
        loop {
            match stack.pop() {
                Some(Node::Expr(id)) => return Some(id),
                Some(Node::Type(..)) => continue,
                None => return None,
            }
        }
    }

    fn apply_op(&mut self, op: PendingOp, span: Span, stack: &mut Vec<Node>) -> ExprId {
        match op {
            PendingOp::Unary(un) => {
                let Some(operand) = pop_expr(stack) else {
                    return self.missing_operand(ErrorCode::E1004, un.symbol(), span);
                };
                let full = self.ast.expr(operand).span.merge(span);
                self.ast.alloc_expr(Expr {
                    kind: ExprKind::Unary { op: un, operand },
                    span: full,
                })
            }
            PendingOp::Binary(bin) => {
                let rhs = pop_expr(stack);
                let lhs = pop_expr(stack);
                let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
                    return self.missing_operand(ErrorCode::E1005, bin.symbol(), span);
                };
                let full = self.ast.expr(lhs).span.merge(self.ast.expr(rhs).span);
                self.ast.alloc_expr(Expr {
                    kind: ExprKind::Binary { op: bin, lhs, rhs },
                    span: full,
                })
            }
            PendingOp::Cast => {
                let ty = pop_type(stack);
                let operand = pop_expr(stack);
                let (Some((ty, ty_span)), Some(operand)) = (ty, operand) else {
                    return self.missing_operand(ErrorCode::E1005, "as", span);
                };
                let full = self.ast.expr(operand).span.merge(ty_span);
                self.ast.alloc_expr(Expr {
                    kind: ExprKind::Cast { operand, ty },
                    span: full,
                })
            }
            // Member access reduces inline and never reaches the queue.
            PendingOp::Member(_) => self.missing_operand(ErrorCode::E1004, ".", span),
        }
    }

    fn missing_operand(&mut self, code: ErrorCode, symbol: &str, span: Span) -> ExprId {
        let (message, label) = match code {
            ErrorCode::E1004 => (
                format!("`{symbol}` has no operand"),
                "expected an operand for this operator",
            ),
            _ => (
                format!("`{symbol}` is missing an operand"),
                "expected operands on both sides",
            ),
        };
        self.error(code, message, span, label);
        self.ast.alloc_expr(Expr {
            kind: ExprKind::Error,
            span,
        })
    }
}

/// Rebuild stack entry: an expression, or the type operand of a cast.
enum Node {
    Expr(ExprId),
    Type(TypeExprId, Span),
}

fn pop_expr(stack: &mut Vec<Node>) -> Option<ExprId> {
    match stack.last() {
        Some(Node::Expr(id)) => {
            let id = *id;
            stack.pop();
            Some(id)
        }
        _ => None,
    }
}

fn pop_type(stack: &mut Vec<Node>) -> Option<(TypeExprId, Span)> {
    match stack.last() {
        Some(Node::Type(id, span)) => {
            let entry = (*id, *span);
            stack.pop();
            Some(entry)
        }
        _ => None,
    }
}

/// Map a token in binary position to its operator.
fn binary_for(kind: &TokenKind) -> Option<BinOp> {
    Some(match kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Rem,
        TokenKind::Amp => BinOp::BitAnd,
        TokenKind::Pipe => BinOp::BitOr,
        TokenKind::Caret => BinOp::BitXor,
        TokenKind::Shl => BinOp::Shl,
        TokenKind::Shr => BinOp::Shr,
        TokenKind::AmpAmp => BinOp::And,
        TokenKind::PipePipe => BinOp::Or,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::BangEq => BinOp::Ne,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Le => BinOp::Le,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::Ge => BinOp::Ge,
        TokenKind::DotDot => BinOp::Range,
        TokenKind::Eq => BinOp::Assign,
        TokenKind::PlusEq => BinOp::AddAssign,
        TokenKind::MinusEq => BinOp::SubAssign,
        TokenKind::StarEq => BinOp::MulAssign,
        TokenKind::SlashEq => BinOp::DivAssign,
        TokenKind::PercentEq => BinOp::RemAssign,
        TokenKind::AmpEq => BinOp::BitAndAssign,
        TokenKind::PipeEq => BinOp::BitOrAssign,
        TokenKind::CaretEq => BinOp::BitXorAssign,
        TokenKind::ShlEq => BinOp::ShlAssign,
        TokenKind::ShrEq => BinOp::ShrAssign,
        _ => return None,
    })
}
