use pretty_assertions::assert_eq;
use vela_diagnostic::{DiagnosticQueue, ErrorCode};
use vela_ir::ast::{DeclKind, ExprKind, StmtKind, TypeExprKind};
use vela_ir::{Ast, BinOp, CallConv, ExprId, StringInterner, TokenList, UnOp};

fn parse_src(src: &str) -> (Ast, DiagnosticQueue, StringInterner) {
    let interner = StringInterner::new();
    let mut tokens = TokenList::new();
    let mut diags = DiagnosticQueue::new();
    vela_lexer::lex(src, &interner, &mut tokens, &mut diags);
    assert!(!diags.has_errors(), "lex errors in test input {src:?}");
    let ast = super::parse(&tokens, &interner, &mut diags);
    (ast, diags, interner)
}

fn parse_ok(src: &str) -> (Ast, StringInterner) {
    let (ast, diags, interner) = parse_src(src);
    let messages: Vec<_> = diags.iter().map(|d| d.message.clone()).collect();
    assert!(!diags.has_errors(), "unexpected parse errors: {messages:?}");
    (ast, interner)
}

fn error_codes(src: &str) -> Vec<ErrorCode> {
    let (_, diags, _) = parse_src(src);
    diags.iter().map(|d| d.code).collect()
}

/// The body expression of `fun f(): unit { return <expr>; }` style inputs.
fn body_return_expr(ast: &Ast) -> ExprId {
    let decls = ast.decls_in(ast.module.decls);
    let DeclKind::Fun { body: Some(body), .. } = &ast.decl(decls[0]).kind else {
        panic!("expected a function with a body");
    };
    let StmtKind::Block(stmts) = &ast.stmt(*body).kind else {
        panic!("expected a block body");
    };
    let StmtKind::Return(Some(expr)) = &ast.stmt(ast.stmts_in(*stmts)[0]).kind else {
        panic!("expected a return statement");
    };
    *expr
}

fn expr_of(src_expr: &str) -> (Ast, ExprId) {
    let (ast, _) = parse_ok(&format!("fun f(): unit {{ return {src_expr}; }}"));
    let expr = body_return_expr(&ast);
    (ast, expr)
}

#[test]
fn function_declaration_shape() {
    let (ast, interner) = parse_ok("fun add(a: i32, b: i32): i32 { return a + b; }");
    let decls = ast.decls_in(ast.module.decls);
    assert_eq!(decls.len(), 1);

    let decl = ast.decl(decls[0]);
    assert_eq!(interner.lookup(decl.name), "add");
    let DeclKind::Fun {
        params,
        body,
        is_extern,
        callconv,
        ..
    } = &decl.kind
    else {
        panic!("expected a function");
    };
    assert_eq!(params.len(), 2);
    assert!(body.is_some());
    assert!(!is_extern);
    assert_eq!(*callconv, CallConv::Cdecl);
}

#[test]
fn extern_prototype_with_callconv() {
    let (ast, interner) = parse_ok(r#"extern "stdcall" fun ExitProcess(code: u32): unit;"#);
    let decls = ast.decls_in(ast.module.decls);
    let decl = ast.decl(decls[0]);
    assert_eq!(interner.lookup(decl.name), "ExitProcess");
    let DeclKind::Fun {
        body,
        is_extern,
        callconv,
        ..
    } = &decl.kind
    else {
        panic!("expected a function");
    };
    assert!(body.is_none());
    assert!(is_extern);
    assert_eq!(*callconv, CallConv::Stdcall);
}

#[test]
fn unknown_callconv_is_reported() {
    assert!(error_codes(r#"extern "pascal" fun f(): unit;"#).contains(&ErrorCode::E1007));
}

#[test]
fn missing_callconv_string_is_reported() {
    assert!(error_codes("extern fun f(): unit;").contains(&ErrorCode::E1008));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let (ast, expr) = expr_of("1 + 2 * 3");
    let ExprKind::Binary {
        op: BinOp::Add,
        rhs,
        ..
    } = &ast.expr(expr).kind
    else {
        panic!("expected addition at the root");
    };
    assert!(matches!(
        ast.expr(*rhs).kind,
        ExprKind::Binary { op: BinOp::Mul, .. }
    ));
}

#[test]
fn parens_override_precedence() {
    let (ast, expr) = expr_of("(1 + 2) * 3");
    let ExprKind::Binary {
        op: BinOp::Mul,
        lhs,
        ..
    } = &ast.expr(expr).kind
    else {
        panic!("expected multiplication at the root");
    };
    assert!(matches!(
        ast.expr(*lhs).kind,
        ExprKind::Binary { op: BinOp::Add, .. }
    ));
}

#[test]
fn assignment_is_right_associative() {
    let (ast, _) = parse_ok("fun f(): unit { a = b = c; }");
    let decls = ast.decls_in(ast.module.decls);
    let DeclKind::Fun { body: Some(body), .. } = &ast.decl(decls[0]).kind else {
        panic!("expected function");
    };
    let StmtKind::Block(stmts) = &ast.stmt(*body).kind else {
        panic!("expected block");
    };
    let StmtKind::Expr(expr) = &ast.stmt(ast.stmts_in(*stmts)[0]).kind else {
        panic!("expected expression statement");
    };
    let ExprKind::Binary {
        op: BinOp::Assign,
        rhs,
        ..
    } = &ast.expr(*expr).kind
    else {
        panic!("expected assignment at the root");
    };
    assert!(matches!(
        ast.expr(*rhs).kind,
        ExprKind::Binary {
            op: BinOp::Assign,
            ..
        }
    ));
}

#[test]
fn prefix_operators_by_context() {
    // `*` after `-` is unary indirection; between terms it is binary.
    let (ast, expr) = expr_of("-a * b");
    let ExprKind::Binary {
        op: BinOp::Mul,
        lhs,
        ..
    } = &ast.expr(expr).kind
    else {
        panic!("expected multiplication at the root");
    };
    assert!(matches!(
        ast.expr(*lhs).kind,
        ExprKind::Unary { op: UnOp::Neg, .. }
    ));

    let (ast, expr) = expr_of("a - -b");
    let ExprKind::Binary {
        op: BinOp::Sub,
        rhs,
        ..
    } = &ast.expr(expr).kind
    else {
        panic!("expected subtraction at the root");
    };
    assert!(matches!(
        ast.expr(*rhs).kind,
        ExprKind::Unary { op: UnOp::Neg, .. }
    ));
}

#[test]
fn call_index_member_unwrap_postfix_chain() {
    let (ast, expr) = expr_of("f(1, 2)[0].field!");
    let ExprKind::Unary {
        op: UnOp::Unwrap,
        operand,
    } = &ast.expr(expr).kind
    else {
        panic!("expected unwrap at the root");
    };
    let ExprKind::Member { owner, .. } = &ast.expr(*operand).kind else {
        panic!("expected member access");
    };
    let ExprKind::Index { base, .. } = &ast.expr(*owner).kind else {
        panic!("expected subscript");
    };
    let ExprKind::Call { args, .. } = &ast.expr(*base).kind else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 2);
}

#[test]
fn cast_of_parenthesized_expression() {
    let (ast, expr) = expr_of("(x + y) as i32");
    let ExprKind::Cast { operand, ty } = &ast.expr(expr).kind else {
        panic!("expected cast at the root");
    };
    assert!(matches!(
        ast.expr(*operand).kind,
        ExprKind::Binary { op: BinOp::Add, .. }
    ));
    assert!(matches!(
        ast.type_expr(*ty).kind,
        TypeExprKind::Prim(vela_ir::PrimType::I32)
    ));
}

#[test]
fn sizeof_and_range() {
    let (ast, expr) = expr_of("sizeof i32");
    assert!(matches!(ast.expr(expr).kind, ExprKind::SizeOf(_)));

    let (ast, expr) = expr_of("1..10");
    assert!(matches!(
        ast.expr(expr).kind,
        ExprKind::Binary {
            op: BinOp::Range,
            ..
        }
    ));
}

#[test]
fn vector_and_matrix_literals() {
    let (ast, expr) = expr_of("[1, 2, 3]");
    let ExprKind::VectorLit { elems } = &ast.expr(expr).kind else {
        panic!("expected a vector literal");
    };
    assert_eq!(elems.len(), 3);

    let (ast, expr) = expr_of("[[1, 2], [3, 4]]");
    let ExprKind::MatrixLit { rows, cols, elems } = &ast.expr(expr).kind else {
        panic!("expected a matrix literal");
    };
    assert_eq!((*rows, *cols), (2, 2));
    assert_eq!(elems.len(), 4);
}

#[test]
fn ragged_matrix_is_reported() {
    let codes = error_codes("fun f(): unit { return [[1, 2], [3]]; }");
    assert!(codes.contains(&ErrorCode::E1010));
}

#[test]
fn default_parameter_order_is_enforced() {
    let codes = error_codes("fun f(a: i32 = 1, b: i32): unit {}");
    assert!(codes.contains(&ErrorCode::E1009));
    // and the valid order parses clean
    parse_ok("fun g(a: i32, b: i32 = 2, c: i32 = 3): unit {}");
}

#[test]
fn variadic_marker() {
    let (ast, _) = parse_ok(r#"extern "cdecl" fun printf(fmt: *u8, ...): i32;"#);
    let decls = ast.decls_in(ast.module.decls);
    let DeclKind::Fun { params, .. } = &ast.decl(decls[0]).kind else {
        panic!("expected function");
    };
    let params = ast.decls_in(*params);
    assert_eq!(params.len(), 2);
    assert!(matches!(
        ast.decl(params[1]).kind,
        DeclKind::Param { variadic: true, .. }
    ));
}

#[test]
fn type_modifier_chain() {
    let (ast, _) = parse_ok("var p: mut *?i32;");
    let decls = ast.decls_in(ast.module.decls);
    let DeclKind::Var { ty, .. } = &ast.decl(decls[0]).kind else {
        panic!("expected var");
    };
    let TypeExprKind::Mut(inner) = &ast.type_expr(*ty).kind else {
        panic!("expected mut");
    };
    let TypeExprKind::Ptr(inner) = &ast.type_expr(*inner).kind else {
        panic!("expected ptr");
    };
    assert!(matches!(ast.type_expr(*inner).kind, TypeExprKind::Opt(_)));
}

#[test]
fn array_vector_matrix_and_fun_types() {
    let (ast, _) = parse_ok(
        "var a: [8]u8;\nvar v: vec[4]f32;\nvar m: mat[2,3]f64;\nvar f: fun(i32, bool): unit;",
    );
    let decls = ast.decls_in(ast.module.decls);
    let kinds: Vec<_> = decls
        .iter()
        .map(|&d| {
            let DeclKind::Var { ty, .. } = &ast.decl(d).kind else {
                panic!("expected var");
            };
            ast.type_expr(*ty).kind.clone()
        })
        .collect();
    assert!(matches!(kinds[0], TypeExprKind::Array { .. }));
    assert!(matches!(kinds[1], TypeExprKind::Vector { len: 4, .. }));
    assert!(matches!(
        kinds[2],
        TypeExprKind::Matrix {
            rows: 2,
            cols: 3,
            ..
        }
    ));
    assert!(matches!(kinds[3], TypeExprKind::Fun { .. }));
}

#[test]
fn composite_declarations() {
    let (ast, interner) = parse_ok(
        "struct Point { x: i32; y: i32; }\n\
         union U { a: i32; b: f32; }\n\
         enum Color { Red, Green, Blue }\n\
         mod math { pub fun id(x: i32): i32 { return x; } }\n\
         type Alias = *u8;",
    );
    let decls = ast.decls_in(ast.module.decls);
    assert_eq!(decls.len(), 5);

    let DeclKind::Struct { members } = &ast.decl(decls[0]).kind else {
        panic!("expected struct");
    };
    assert_eq!(members.len(), 2);

    let DeclKind::Enum { constants } = &ast.decl(decls[2]).kind else {
        panic!("expected enum");
    };
    let names: Vec<_> = ast
        .decls_in(*constants)
        .iter()
        .map(|&c| interner.lookup(ast.decl(c).name))
        .collect();
    assert_eq!(names, vec!["Red", "Green", "Blue"]);

    let DeclKind::Mod { decls: inner } = &ast.decl(decls[3]).kind else {
        panic!("expected module");
    };
    assert_eq!(inner.len(), 1);

    assert!(matches!(ast.decl(decls[4]).kind, DeclKind::TypeAlias { .. }));
}

#[test]
fn statement_forms() {
    let (ast, _) = parse_ok(
        "fun f(): unit {\n\
           if true then { } else { }\n\
           while false do { }\n\
           do { } while false;\n\
           for i: i32 in 0..10 do { }\n\
           loop { break; }\n\
           defer { }\n\
           continue;\n\
           return;\n\
         }",
    );
    let decls = ast.decls_in(ast.module.decls);
    let DeclKind::Fun { body: Some(body), .. } = &ast.decl(decls[0]).kind else {
        panic!("expected function");
    };
    let StmtKind::Block(stmts) = &ast.stmt(*body).kind else {
        panic!("expected block");
    };
    let kinds: Vec<_> = ast
        .stmts_in(*stmts)
        .iter()
        .map(|&s| std::mem::discriminant(&ast.stmt(s).kind))
        .collect();
    assert_eq!(kinds.len(), 8);

    let shapes: Vec<bool> = ast
        .stmts_in(*stmts)
        .iter()
        .map(|&s| {
            matches!(
                ast.stmt(s).kind,
                StmtKind::If { .. }
                    | StmtKind::While { .. }
                    | StmtKind::DoWhile { .. }
                    | StmtKind::For { .. }
                    | StmtKind::Loop { .. }
                    | StmtKind::Defer(_)
                    | StmtKind::Continue
                    | StmtKind::Return(None)
            )
        })
        .collect();
    assert!(shapes.iter().all(|&ok| ok), "unexpected statement shapes");
}

#[test]
fn recovery_continues_after_bad_declaration() {
    let (ast, diags, _) = parse_src("fun (): unit { }\nfun ok(): unit { }");
    assert!(diags.has_errors());
    let decls = ast.decls_in(ast.module.decls);
    // the malformed declaration is dropped, the good one survives
    assert_eq!(decls.len(), 1);
}

#[test]
fn member_type_path() {
    let (ast, _) = parse_ok("var x: geometry.Point;");
    let decls = ast.decls_in(ast.module.decls);
    let DeclKind::Var { ty, .. } = &ast.decl(decls[0]).kind else {
        panic!("expected var");
    };
    assert!(matches!(
        ast.type_expr(*ty).kind,
        TypeExprKind::Member { .. }
    ));
}

#[test]
fn null_safe_and_indirect_member_access() {
    let (ast, expr) = expr_of("p?.x");
    assert!(matches!(
        ast.expr(expr).kind,
        ExprKind::Member {
            access: vela_ir::MemberAccess::NullSafe,
            ..
        }
    ));

    let (ast, expr) = expr_of("p*.x");
    assert!(matches!(
        ast.expr(expr).kind,
        ExprKind::Member {
            access: vela_ir::MemberAccess::Indirect,
            ..
        }
    ));
}

#[test]
fn bang_is_not_prefix_and_unwrap_postfix() {
    let (ast, expr) = expr_of("!done");
    assert!(matches!(
        ast.expr(expr).kind,
        ExprKind::Unary { op: UnOp::Not, .. }
    ));

    let (ast, expr) = expr_of("done!");
    assert!(matches!(
        ast.expr(expr).kind,
        ExprKind::Unary {
            op: UnOp::Unwrap,
            ..
        }
    ));
}

#[test]
fn increment_forms_by_context() {
    let (ast, expr) = expr_of("++x");
    assert!(matches!(
        ast.expr(expr).kind,
        ExprKind::Unary {
            op: UnOp::PreInc,
            ..
        }
    ));

    let (ast, expr) = expr_of("x--");
    assert!(matches!(
        ast.expr(expr).kind,
        ExprKind::Unary {
            op: UnOp::PostDec,
            ..
        }
    ));
}

#[test]
fn unclosed_paren_is_reported() {
    let codes = error_codes("fun f(): unit { (1 + 2; }");
    assert!(codes.contains(&ErrorCode::E1002));
}

#[test]
fn call_on_parenthesized_callee() {
    let (ast, expr) = expr_of("(f)(1)");
    let ExprKind::Call { callee, args } = &ast.expr(expr).kind else {
        panic!("expected a call");
    };
    assert!(matches!(ast.expr(*callee).kind, ExprKind::Ident(_)));
    assert_eq!(args.len(), 1);
}

#[test]
fn compound_assignment_operators() {
    for (src, op) in [
        ("a += 1", BinOp::AddAssign),
        ("a <<= 1", BinOp::ShlAssign),
        ("a %= 2", BinOp::RemAssign),
    ] {
        let (ast, _) = parse_ok(&format!("fun f(): unit {{ {src}; }}"));
        let decls = ast.decls_in(ast.module.decls);
        let DeclKind::Fun { body: Some(body), .. } = &ast.decl(decls[0]).kind else {
            panic!("expected function");
        };
        let StmtKind::Block(stmts) = &ast.stmt(*body).kind else {
            panic!("expected block");
        };
        let StmtKind::Expr(expr) = &ast.stmt(ast.stmts_in(*stmts)[0]).kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { op: actual, .. } = &ast.expr(*expr).kind else {
            panic!("expected binary expression");
        };
        assert_eq!(*actual, op, "for {src}");
    }
}
