//! Debug dumps: `<input>.tokens.json` and `<input>.ast.json`.
//!
//! Hand-written JSON with no stability guarantee; the depth-first `kind`
//! sequence of the AST dump is a deterministic function of the source.

use std::fmt::Write as _;

use vela_diagnostic::emitter::escape_json;
use vela_diagnostic::SourceFile;
use vela_ir::ast::{DeclKind, ExprKind, StmtKind, TypeExprKind};
use vela_ir::{Ast, DeclId, ExprId, StmtId, TokenList, TypeExprId};

/// Render the token stream as a JSON array of `{kind, location}` objects.
pub fn tokens_json(tokens: &TokenList, file: &SourceFile) -> String {
    let mut out = String::from("[\n");
    for (index, token) in tokens.iter().enumerate() {
        let pos = file.line_col(token.span.start);
        let text = file.span_text(token.span);
        let _ = write!(
            out,
            "  {{\"kind\": \"{}\", \"text\": \"{}\", \"line\": {}, \"col\": {}, \"length\": {}}}",
            escape_json(token.kind.display_name()),
            escape_json(text),
            pos.line,
            pos.col,
            token.span.len()
        );
        if index + 1 < tokens.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("]\n");
    out
}

/// Render the AST as a recursive tree of `{kind, ...}` objects.
pub fn ast_json(ast: &Ast) -> String {
    let mut dumper = AstDumper {
        ast,
        out: String::new(),
    };
    dumper.out.push_str("{\"kind\": \"Module\", \"decls\": [");
    let decls = ast.decls_in(ast.module.decls);
    for (index, &decl) in decls.iter().enumerate() {
        if index > 0 {
            dumper.out.push_str(", ");
        }
        dumper.decl(decl);
    }
    dumper.out.push_str("]}\n");
    dumper.out
}

struct AstDumper<'a> {
    ast: &'a Ast,
    out: String,
}

impl AstDumper<'_> {
    fn decl(&mut self, id: DeclId) {
        let decl = self.ast.decl(id);
        let _ = write!(self.out, "{{\"kind\": \"{}\"", decl_kind_name(&decl.kind));

        match &decl.kind {
            DeclKind::Var { ty, init } => {
                self.key_type("type", *ty);
                if let Some(init) = init {
                    self.key_expr("init", *init);
                }
            }
            DeclKind::Param { ty, default, .. } => {
                self.key_type("type", *ty);
                if let Some(default) = default {
                    self.key_expr("default", *default);
                }
            }
            DeclKind::Fun {
                params,
                return_ty,
                body,
                ..
            } => {
                self.out.push_str(", \"params\": [");
                for (index, &param) in self.ast.decls_in(*params).iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.decl(param);
                }
                self.out.push(']');
                self.key_type("return", *return_ty);
                if let Some(body) = body {
                    self.key_stmt("body", *body);
                }
            }
            DeclKind::Field { ty } => self.key_type("type", *ty),
            DeclKind::Struct { members }
            | DeclKind::Union { members }
            | DeclKind::Enum { constants: members }
            | DeclKind::Mod { decls: members } => {
                self.out.push_str(", \"members\": [");
                for (index, &member) in self.ast.decls_in(*members).iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.decl(member);
                }
                self.out.push(']');
            }
            DeclKind::EnumConstant => {}
            DeclKind::TypeAlias { ty } => self.key_type("type", *ty),
        }
        self.out.push('}');
    }

    fn stmt(&mut self, id: StmtId) {
        let stmt = self.ast.stmt(id);
        let _ = write!(self.out, "{{\"kind\": \"{}\"", stmt_kind_name(&stmt.kind));

        match &stmt.kind {
            StmtKind::Expr(expr) => self.key_expr("expr", *expr),
            StmtKind::Var(decl) => {
                self.out.push_str(", \"decl\": ");
                self.decl(*decl);
            }
            StmtKind::Block(stmts) => {
                self.out.push_str(", \"stmts\": [");
                for (index, &inner) in self.ast.stmts_in(*stmts).iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.stmt(inner);
                }
                self.out.push(']');
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.key_expr("cond", *cond);
                self.key_stmt("then", *then_branch);
                if let Some(else_branch) = else_branch {
                    self.key_stmt("else", *else_branch);
                }
            }
            StmtKind::While { cond, body } => {
                self.key_expr("cond", *cond);
                self.key_stmt("body", *body);
            }
            StmtKind::DoWhile { body, cond } => {
                self.key_stmt("body", *body);
                self.key_expr("cond", *cond);
            }
            StmtKind::For { var, iter, body } => {
                self.out.push_str(", \"var\": ");
                self.decl(*var);
                self.key_expr("iter", *iter);
                self.key_stmt("body", *body);
            }
            StmtKind::Loop { body } => self.key_stmt("body", *body),
            StmtKind::Return(Some(expr)) => self.key_expr("value", *expr),
            StmtKind::Defer(body) => self.key_stmt("body", *body),
            StmtKind::Return(None)
            | StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Error => {}
        }
        self.out.push('}');
    }

    fn expr(&mut self, id: ExprId) {
        let expr = self.ast.expr(id);
        let _ = write!(self.out, "{{\"kind\": \"{}\"", expr_kind_name(&expr.kind));

        match &expr.kind {
            ExprKind::IntLit { value, .. } => {
                let _ = write!(self.out, ", \"value\": {value}");
            }
            ExprKind::FloatLit { bits, .. } => {
                let _ = write!(self.out, ", \"value\": {}", f64::from_bits(*bits));
            }
            ExprKind::BoolLit(value) => {
                let _ = write!(self.out, ", \"value\": {value}");
            }
            ExprKind::Unary { operand, .. } => self.key_expr("operand", *operand),
            ExprKind::Binary { lhs, rhs, .. } => {
                self.key_expr("lhs", *lhs);
                self.key_expr("rhs", *rhs);
            }
            ExprKind::Call { callee, args } => {
                self.key_expr("callee", *callee);
                self.out.push_str(", \"args\": [");
                for (index, &arg) in self.ast.exprs_in(*args).iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg);
                }
                self.out.push(']');
            }
            ExprKind::Member { owner, .. } => self.key_expr("owner", *owner),
            ExprKind::Index { base, index } => {
                self.key_expr("base", *base);
                self.key_expr("index", *index);
            }
            ExprKind::Cast { operand, ty } => {
                self.key_expr("operand", *operand);
                self.key_type("type", *ty);
            }
            ExprKind::SizeOf(ty) | ExprKind::AlignOf(ty) => self.key_type("type", *ty),
            ExprKind::VectorLit { elems } | ExprKind::MatrixLit { elems, .. } => {
                self.out.push_str(", \"elems\": [");
                for (index, &elem) in self.ast.exprs_in(*elems).iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(elem);
                }
                self.out.push(']');
            }
            ExprKind::StrLit(_)
            | ExprKind::CharLit(_)
            | ExprKind::NullLit
            | ExprKind::Ident(_)
            | ExprKind::Error => {}
        }
        self.out.push('}');
    }

    fn type_expr(&mut self, id: TypeExprId) {
        let ty = self.ast.type_expr(id);
        let _ = write!(self.out, "{{\"kind\": \"{}\"", type_kind_name(&ty.kind));
        match &ty.kind {
            TypeExprKind::Member { owner, .. } => self.key_type("owner", *owner),
            TypeExprKind::Mut(base)
            | TypeExprKind::Const(base)
            | TypeExprKind::Ptr(base)
            | TypeExprKind::Ref(base)
            | TypeExprKind::Opt(base) => self.key_type("base", *base),
            TypeExprKind::Array { elem, .. }
            | TypeExprKind::Vector { elem, .. }
            | TypeExprKind::Matrix { elem, .. } => self.key_type("elem", *elem),
            TypeExprKind::Fun { params, ret, .. } => {
                self.out.push_str(", \"params\": [");
                for (index, &param) in self.ast.type_exprs_in(*params).iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.type_expr(param);
                }
                self.out.push(']');
                self.key_type("return", *ret);
            }
            TypeExprKind::Prim(_) | TypeExprKind::Named(_) | TypeExprKind::Error => {}
        }
        self.out.push('}');
    }

    fn key_expr(&mut self, key: &str, id: ExprId) {
        let _ = write!(self.out, ", \"{key}\": ");
        self.expr(id);
    }

    fn key_stmt(&mut self, key: &str, id: StmtId) {
        let _ = write!(self.out, ", \"{key}\": ");
        self.stmt(id);
    }

    fn key_type(&mut self, key: &str, id: TypeExprId) {
        let _ = write!(self.out, ", \"{key}\": ");
        self.type_expr(id);
    }
}

fn decl_kind_name(kind: &DeclKind) -> &'static str {
    match kind {
        DeclKind::Var { .. } => "DeclVar",
        DeclKind::Param { .. } => "DeclParam",
        DeclKind::Fun { .. } => "DeclFun",
        DeclKind::Field { .. } => "DeclField",
        DeclKind::Struct { .. } => "DeclStruct",
        DeclKind::Union { .. } => "DeclUnion",
        DeclKind::Enum { .. } => "DeclEnum",
        DeclKind::EnumConstant => "DeclEnumConstant",
        DeclKind::Mod { .. } => "DeclMod",
        DeclKind::TypeAlias { .. } => "DeclTypeAlias",
    }
}

fn stmt_kind_name(kind: &StmtKind) -> &'static str {
    match kind {
        StmtKind::Expr(_) => "StmtExpr",
        StmtKind::Var(_) => "StmtVar",
        StmtKind::Block(_) => "StmtBlock",
        StmtKind::If { .. } => "StmtIf",
        StmtKind::While { .. } => "StmtWhile",
        StmtKind::DoWhile { .. } => "StmtDoWhile",
        StmtKind::For { .. } => "StmtFor",
        StmtKind::Loop { .. } => "StmtLoop",
        StmtKind::Break => "StmtBreak",
        StmtKind::Continue => "StmtContinue",
        StmtKind::Return(_) => "StmtReturn",
        StmtKind::Defer(_) => "StmtDefer",
        StmtKind::Error => "StmtError",
    }
}

fn expr_kind_name(kind: &ExprKind) -> &'static str {
    match kind {
        ExprKind::IntLit { .. } => "ExprLitInt",
        ExprKind::FloatLit { .. } => "ExprLitFloat",
        ExprKind::StrLit(_) => "ExprLitStr",
        ExprKind::CharLit(_) => "ExprLitChar",
        ExprKind::BoolLit(_) => "ExprLitBool",
        ExprKind::NullLit => "ExprLitNull",
        ExprKind::Ident(_) => "ExprId",
        ExprKind::Unary { .. } => "ExprOpUn",
        ExprKind::Binary { .. } => "ExprOpBin",
        ExprKind::Call { .. } => "ExprCall",
        ExprKind::Member { .. } => "ExprMember",
        ExprKind::Index { .. } => "ExprIndex",
        ExprKind::Cast { .. } => "ExprCast",
        ExprKind::SizeOf(_) => "ExprSizeOf",
        ExprKind::AlignOf(_) => "ExprAlignOf",
        ExprKind::VectorLit { .. } => "ExprLitVec",
        ExprKind::MatrixLit { .. } => "ExprLitMat",
        ExprKind::Error => "ExprError",
    }
}

fn type_kind_name(kind: &TypeExprKind) -> &'static str {
    match kind {
        TypeExprKind::Prim(_) => "TypePrim",
        TypeExprKind::Named(_) => "TypeId",
        TypeExprKind::Member { .. } => "TypeMember",
        TypeExprKind::Mut(_) => "TypeMut",
        TypeExprKind::Const(_) => "TypeConst",
        TypeExprKind::Ptr(_) => "TypePtr",
        TypeExprKind::Ref(_) => "TypeRef",
        TypeExprKind::Opt(_) => "TypeOpt",
        TypeExprKind::Array { .. } => "TypeArray",
        TypeExprKind::Vector { .. } => "TypeVec",
        TypeExprKind::Matrix { .. } => "TypeMat",
        TypeExprKind::Fun { .. } => "TypeFun",
        TypeExprKind::Error => "TypeError",
    }
}
