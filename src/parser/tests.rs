//! Unit tests for the parser module.
//!
//! Expressions are compared through a compact prefix rendering so the
//! shape of the tree (precedence, associativity, postfix chains) is easy
//! to read in the assertions.

use crate::{
    ast::{
        declarations::{Decl, Spec},
        expressions::Expr,
        statements::Stmt,
        types::TypeExpr,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::tokenize, tokens::TokenKind},
    Position,
};

use super::parser::{parse, Parser};

fn parse_ok(source: &str) -> Vec<Decl> {
    let mut parser = Parser::from_source(source);
    match parser.parse() {
        Ok(decls) => decls,
        Err(error) => panic!("failed to parse {:?}: {}", source, error),
    }
}

fn parse_err(source: &str) -> Error {
    Parser::from_source(source)
        .parse()
        .expect_err("expected a syntax error")
}

fn sexpr(expr: &Expr) -> String {
    let list = |exprs: &[Expr]| {
        exprs
            .iter()
            .map(|expr| format!(" {}", sexpr(expr)))
            .collect::<String>()
    };

    match expr {
        Expr::Ident(ident) => ident.name.clone(),
        Expr::BasicLit(lit) => lit.literal.clone(),
        Expr::Binary(binary) => format!(
            "({} {} {})",
            binary.op.symbol().unwrap_or("?"),
            sexpr(&binary.x),
            sexpr(&binary.y)
        ),
        Expr::Unary(unary) => format!("({} {})", unary.op.symbol().unwrap_or("?"), sexpr(&unary.x)),
        Expr::Paren(paren) => format!("(paren {})", sexpr(&paren.x)),
        Expr::Selector(selector) => format!("(. {} {})", sexpr(&selector.x), selector.sel.name),
        Expr::Call(call) => format!("(call {}{})", sexpr(&call.fun), list(&call.args)),
        Expr::Index(index) => format!("(index {} {})", sexpr(&index.x), sexpr(&index.index)),
        Expr::IndexList(index) => format!("(index {}{})", sexpr(&index.x), list(&index.indices)),
        Expr::CompositeLit(lit) => format!(
            "(lit {}{})",
            lit.ty.as_deref().map(sexpr).unwrap_or_else(|| String::from("_")),
            list(&lit.elts)
        ),
        Expr::KeyValue(kv) => format!("(: {} {})", sexpr(&kv.key), sexpr(&kv.value)),
        Expr::FuncLit(_) => String::from("func"),
        Expr::Type(TypeExpr::Array(array)) => format!(
            "([{}]{})",
            array.len.as_deref().map(sexpr).unwrap_or_default(),
            sexpr(&array.elem)
        ),
        Expr::Type(TypeExpr::Struct(_)) => String::from("struct"),
        Expr::Type(TypeExpr::Function(_)) => String::from("functype"),
    }
}

/// First initializer of the first top-level `var`/`const`.
fn first_value(decls: &[Decl]) -> &Expr {
    match &decls[0] {
        Decl::Gen(decl) => match &decl.specs[0] {
            Spec::Value(spec) => &spec.values[0],
            spec => panic!("expected a value spec, got {:?}", spec),
        },
        decl => panic!("expected a general declaration, got {:?}", decl),
    }
}

fn value_sexpr(source: &str) -> String {
    sexpr(first_value(&parse_ok(source)))
}

/// Statements of the body of the first function.
fn body(decls: &[Decl]) -> &[Stmt] {
    match &decls[0] {
        Decl::Func(decl) => &decl.body.as_ref().expect("function has a body").list,
        decl => panic!("expected a function, got {:?}", decl),
    }
}

#[test]
fn test_binary_precedence() {
    assert_eq!(value_sexpr("var x = 1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(value_sexpr("var x = 1 * 2 + 3"), "(+ (* 1 2) 3)");
    assert_eq!(
        value_sexpr("var x = a || b && c == d"),
        "(|| a (&& b (== c d)))"
    );
    assert_eq!(value_sexpr("var x = a | b & c"), "(| a (& b c))");
    assert_eq!(value_sexpr("var x = a << 1 + b"), "(+ (<< a 1) b)");
    assert_eq!(value_sexpr("var x = a &^ b ^ c"), "(^ (&^ a b) c)");
}

#[test]
fn test_binary_left_associative() {
    assert_eq!(value_sexpr("var x = a - b - c"), "(- (- a b) c)");
    assert_eq!(value_sexpr("var x = a / b * c"), "(* (/ a b) c)");
}

#[test]
fn test_unary_binds_tighter() {
    assert_eq!(value_sexpr("var x = -a * b"), "(* (- a) b)");
    assert_eq!(value_sexpr("var x = !a && b"), "(&& (! a) b)");
    assert_eq!(value_sexpr("var x = -a.b"), "(- (. a b))");
    assert_eq!(value_sexpr("var x = ^-a"), "(^ (- a))");
}

#[test]
fn test_parenthesized() {
    assert_eq!(value_sexpr("var x = (1 + 2) * 3"), "(* (paren (+ 1 2)) 3)");
}

#[test]
fn test_postfix_chain() {
    assert_eq!(
        value_sexpr("var x = a.b(c)[d]"),
        "(index (call (. a b) c) d)"
    );
    assert_eq!(value_sexpr("var x = f()()"), "(call (call f))");
    assert_eq!(value_sexpr("var x = f(1, g(2), 3)"), "(call f 1 (call g 2) 3)");
}

#[test]
fn test_call_with_ellipsis() {
    let decls = parse_ok("var x = append(xs, ys...)");
    let Expr::Call(call) = first_value(&decls) else {
        panic!("expected a call");
    };

    assert!(call.has_ellipsis);
    assert_eq!(call.args.len(), 2);
}

#[test]
fn test_index_versus_instantiation() {
    let decls = parse_ok("var x = m[1]");
    assert!(matches!(first_value(&decls), Expr::Index(_)));

    let decls = parse_ok("var x = Pair[int, string]");
    let Expr::IndexList(index) = first_value(&decls) else {
        panic!("expected an index list");
    };
    assert_eq!(index.indices.len(), 2);
}

#[test]
fn test_empty_index() {
    let error = parse_err("var x = a[]");

    assert_eq!(error.get_error(), &ErrorImpl::EmptyIndex);
    assert_eq!(error.get_position(), &Position::new(1, 11));
}

#[test]
fn test_composite_literals() {
    assert_eq!(
        value_sexpr("var p = Point{X: 1, Y: 2}"),
        "(lit Point (: X 1) (: Y 2))"
    );
    assert_eq!(value_sexpr("var a = []int{1, 2, 3}"), "(lit ([]int) 1 2 3)");
    assert_eq!(value_sexpr("var a = [2]int{}"), "(lit ([2]int))");
    assert_eq!(
        value_sexpr("var m = [][]int{{1}, {2, 3},}"),
        "(lit ([]([]int)) (lit _ 1) (lit _ 2 3))"
    );
    assert_eq!(value_sexpr("var p = pkg.T{}"), "(lit (. pkg T))");
}

#[test]
fn test_struct_composite_literal() {
    let decls = parse_ok("var p = struct{ x int }{1}");
    let Expr::CompositeLit(lit) = first_value(&decls) else {
        panic!("expected a composite literal");
    };

    assert!(matches!(
        lit.ty.as_deref(),
        Some(Expr::Type(TypeExpr::Struct(_)))
    ));
    assert_eq!(lit.elts.len(), 1);
}

#[test]
fn test_func_literal() {
    let decls = parse_ok("var f = func(x int) int { return x }");
    let Expr::FuncLit(lit) = first_value(&decls) else {
        panic!("expected a func literal");
    };

    assert_eq!(lit.ty.params.num_fields(), 1);
    assert!(lit.ty.results.is_some());
    assert_eq!(lit.body.list.len(), 1);
}

#[test]
fn test_var_and_const_specs() {
    let decls = parse_ok("const (\n\ta = 1\n\tb\n\tc int = 3\n)\nvar x, y int\nvar z = 4");
    assert_eq!(decls.len(), 3);

    let Decl::Gen(group) = &decls[0] else {
        panic!("expected a general declaration");
    };
    assert_eq!(group.tok, TokenKind::Const);
    assert_eq!(group.specs.len(), 3);

    let Spec::Value(b) = &group.specs[1] else {
        panic!("expected a value spec");
    };
    assert_eq!(b.names[0].name, "b");
    assert!(b.ty.is_none());
    assert!(b.values.is_empty());

    let Spec::Value(c) = &group.specs[2] else {
        panic!("expected a value spec");
    };
    assert!(matches!(&c.ty, Some(Expr::Ident(ident)) if ident.name == "int"));
    assert_eq!(c.values.len(), 1);

    let Decl::Gen(var) = &decls[1] else {
        panic!("expected a general declaration");
    };
    let Spec::Value(xy) = &var.specs[0] else {
        panic!("expected a value spec");
    };
    assert_eq!(xy.names.len(), 2);
    assert!(xy.values.is_empty());
}

#[test]
fn test_var_without_type_or_value() {
    let error = parse_err("func f() {\n\tvar x\n}");

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_position(), &Position::new(3, 1));
}

#[test]
fn test_type_specs() {
    let decls = parse_ok("type A [4]int\ntype List[T any] struct {\n\thead T\n\ttail List[T]\n}");

    let Decl::Gen(array) = &decls[0] else {
        panic!("expected a type declaration");
    };
    let Spec::Type(spec) = &array.specs[0] else {
        panic!("expected a type spec");
    };
    assert!(spec.type_params.is_none());
    assert_eq!(sexpr(&spec.ty), "([4]int)");

    let Decl::Gen(list) = &decls[1] else {
        panic!("expected a type declaration");
    };
    let Spec::Type(spec) = &list.specs[0] else {
        panic!("expected a type spec");
    };
    assert_eq!(spec.type_params.as_ref().map(|params| params.num_fields()), Some(1));
    let Expr::Type(TypeExpr::Struct(ty)) = &spec.ty else {
        panic!("expected a struct type");
    };
    assert_eq!(sexpr(&ty.fields.list[1].ty), "(index List T)");
}

#[test]
fn test_generic_type_spec() {
    let decls = parse_ok("type Pair[K comparable, V any] struct {\n\tkey K\n\tvalue V\n}");
    let Decl::Gen(decl) = &decls[0] else {
        panic!("expected a type declaration");
    };
    let Spec::Type(spec) = &decl.specs[0] else {
        panic!("expected a type spec");
    };

    let params = spec.type_params.as_ref().expect("type parameters");
    assert_eq!(params.num_fields(), 2);
    assert!(spec.assign.is_none());

    let Expr::Type(TypeExpr::Struct(ty)) = &spec.ty else {
        panic!("expected a struct type");
    };
    assert_eq!(ty.fields.num_fields(), 2);
}

#[test]
fn test_type_alias_and_embedded_field() {
    let decls = parse_ok("type (\n\tB = A\n\tS struct {\n\t\tBase\n\t\tx, y int\n\t}\n)");
    let Decl::Gen(decl) = &decls[0] else {
        panic!("expected a type declaration");
    };
    assert_eq!(decl.specs.len(), 2);

    let Spec::Type(alias) = &decl.specs[0] else {
        panic!("expected a type spec");
    };
    assert_eq!(alias.assign, Some(Position::new(2, 4)));

    let Spec::Type(spec) = &decl.specs[1] else {
        panic!("expected a type spec");
    };
    let Expr::Type(TypeExpr::Struct(ty)) = &spec.ty else {
        panic!("expected a struct type");
    };
    assert!(ty.fields.list[0].names.is_empty());
    assert_eq!(sexpr(&ty.fields.list[0].ty), "Base");
    assert_eq!(ty.fields.list[1].names.len(), 2);
}

#[test]
fn test_func_decl_signature() {
    let decls = parse_ok(
        "func Map[T, U any](xs []T, f func(T) U) []U {\n\treturn nil\n}\nfunc div(a, b int) (int, error)\n",
    );
    assert_eq!(decls.len(), 2);

    let Decl::Func(map) = &decls[0] else {
        panic!("expected a function");
    };
    assert_eq!(map.name.name, "Map");
    let type_params = map.ty.type_params.as_ref().expect("type parameters");
    assert_eq!(type_params.list.len(), 1);
    assert_eq!(type_params.num_fields(), 2);
    assert_eq!(map.ty.params.list.len(), 2);
    assert_eq!(sexpr(&map.ty.params.list[0].ty), "([]T)");
    assert_eq!(sexpr(&map.ty.params.list[1].ty), "functype");
    let results = map.ty.results.as_ref().expect("results");
    assert_eq!(sexpr(&results.list[0].ty), "([]U)");

    let Decl::Func(div) = &decls[1] else {
        panic!("expected a function");
    };
    assert!(div.body.is_none());
    assert_eq!(div.ty.params.list.len(), 1);
    assert_eq!(div.ty.params.num_fields(), 2);
    let results = div.ty.results.as_ref().expect("results");
    assert_eq!(results.list.len(), 2);
    assert!(results.list.iter().all(|field| field.names.is_empty()));
}

#[test]
fn test_mixed_named_and_unnamed_params() {
    let error = parse_err("func f(a int, string) {}");
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_package_and_imports() {
    let mut parser = Parser::from_source("package main\n\nimport (\n\t\"fmt\"\n\tm \"math\"\n)\nimport \"os\"\n");
    let decls = parser.parse().expect("imports parse");

    assert_eq!(parser.package().map(|name| name.name.as_str()), Some("main"));
    assert_eq!(decls.len(), 2);

    let Decl::Gen(group) = &decls[0] else {
        panic!("expected an import declaration");
    };
    assert_eq!(group.tok, TokenKind::Import);
    let Spec::Import(math) = &group.specs[1] else {
        panic!("expected an import spec");
    };
    assert_eq!(math.name.as_ref().map(|name| name.name.as_str()), Some("m"));
    assert_eq!(sexpr(&math.path), "\"math\"");
}

#[test]
fn test_simple_statements() {
    let decls = parse_ok("func f() {\n\tx := 1\n\tx += 2; y <<= 3\n\tx++\n\ta, b = b, a\n\tg(x)\n}");
    let stmts = body(&decls);
    assert_eq!(stmts.len(), 6);

    let Stmt::Assign(define) = &stmts[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(define.tok, TokenKind::Define);
    assert_eq!(define.tok_pos, Position::new(2, 4));

    assert!(matches!(&stmts[1], Stmt::Assign(assign) if assign.tok == TokenKind::PlusEquals));
    assert!(matches!(&stmts[2], Stmt::Assign(assign) if assign.tok == TokenKind::ShiftLeftEquals));
    assert!(matches!(&stmts[3], Stmt::IncDec(stmt) if stmt.tok == TokenKind::PlusPlus));
    assert!(matches!(
        &stmts[4],
        Stmt::Assign(assign) if assign.lhs.len() == 2 && assign.rhs.len() == 2
    ));
    assert!(matches!(&stmts[5], Stmt::Expr(_)));
}

#[test]
fn test_non_name_on_left_of_define() {
    let error = parse_err("func f() { a.b := 1 }");

    assert_eq!(
        error.get_error(),
        &ErrorImpl::NonNameOnLeftOfDefine {
            found: String::from("a.b")
        }
    );
    assert_eq!(error.get_position(), &Position::new(1, 12));
}

#[test]
fn test_if_statements() {
    let decls = parse_ok(
        "func f() {\n\tif x {\n\t}\n\tif v := g(); v > 0 {\n\t} else if w {\n\t} else {\n\t\treturn\n\t}\n}",
    );
    let stmts = body(&decls);

    let Stmt::If(plain) = &stmts[0] else {
        panic!("expected an if statement");
    };
    assert!(plain.init.is_none());
    assert_eq!(sexpr(&plain.cond), "x");

    let Stmt::If(chain) = &stmts[1] else {
        panic!("expected an if statement");
    };
    assert!(matches!(chain.init.as_deref(), Some(Stmt::Assign(_))));
    assert_eq!(sexpr(&chain.cond), "(> v 0)");

    let Some(Stmt::If(else_if)) = chain.else_branch.as_deref() else {
        panic!("expected else if");
    };
    assert!(matches!(else_if.else_branch.as_deref(), Some(Stmt::Block(_))));
}

#[test]
fn test_composite_literal_in_if_header() {
    let decls = parse_ok("func f() {\n\tif p == (Point{}) {\n\t}\n}");
    let Stmt::If(stmt) = &body(&decls)[0] else {
        panic!("expected an if statement");
    };

    assert_eq!(sexpr(&stmt.cond), "(== p (paren (lit Point)))");
}

#[test]
fn test_missing_if_condition() {
    let error = parse_err("func f() {\n\tif {\n\t}\n}");

    assert_eq!(
        error.get_error(),
        &ErrorImpl::MissingCondition {
            statement: String::from("if")
        }
    );
    assert_eq!(error.get_position(), &Position::new(2, 5));
}

#[test]
fn test_invalid_if_condition() {
    let error = parse_err("func f() {\n\tif x := 1 {\n\t}\n}");
    assert_eq!(error.get_error_name(), "InvalidCondition");
}

#[test]
fn test_for_statements() {
    let decls = parse_ok(
        "func f() {\n\tfor {\n\t}\n\tfor x < 3 {\n\t}\n\tfor i := 0; i < 10; i++ {\n\t}\n\tfor ; ; {\n\t}\n}",
    );
    let stmts = body(&decls);
    assert_eq!(stmts.len(), 4);

    let Stmt::For(infinite) = &stmts[0] else {
        panic!("expected a for statement");
    };
    assert!(infinite.init.is_none() && infinite.cond.is_none() && infinite.post.is_none());

    let Stmt::For(cond_only) = &stmts[1] else {
        panic!("expected a for statement");
    };
    assert!(cond_only.init.is_none() && cond_only.post.is_none());
    assert_eq!(cond_only.cond.as_ref().map(sexpr).as_deref(), Some("(< x 3)"));

    let Stmt::For(three) = &stmts[2] else {
        panic!("expected a for statement");
    };
    assert!(matches!(three.init.as_deref(), Some(Stmt::Assign(_))));
    assert!(matches!(three.post.as_deref(), Some(Stmt::IncDec(_))));

    let Stmt::For(empty) = &stmts[3] else {
        panic!("expected a for statement");
    };
    assert!(empty.init.is_none() && empty.cond.is_none() && empty.post.is_none());
}

#[test]
fn test_return_reads_results_on_same_line() {
    let decls = parse_ok("func f() (int, int) {\n\treturn 1, 2\n}\nfunc g() {\n\treturn\n\tx++\n}");

    let Stmt::Return(stmt) = &body(&decls)[0] else {
        panic!("expected a return statement");
    };
    assert_eq!(stmt.results.len(), 2);

    let Decl::Func(g) = &decls[1] else {
        panic!("expected a function");
    };
    let list = &g.body.as_ref().expect("body").list;
    assert_eq!(list.len(), 2);
    assert!(matches!(&list[0], Stmt::Return(stmt) if stmt.results.is_empty()));
}

#[test]
fn test_declaration_statements_and_blocks() {
    let decls = parse_ok("func f() {\n\tvar x int\n\tconst c = 1\n\ttype T int\n\t{\n\t\tx = c\n\t}\n}");
    let stmts = body(&decls);

    assert_eq!(stmts.len(), 4);
    assert!(stmts[..3].iter().all(|stmt| matches!(stmt, Stmt::Decl(_))));
    assert!(matches!(&stmts[3], Stmt::Block(block) if block.list.len() == 1));
}

#[test]
fn test_comments_are_skipped() {
    let decls = parse_ok("// leading\nvar x = 1 /* trailing */\n/* block\ncomment */ func f() {}\n");
    assert_eq!(decls.len(), 2);
}

#[test]
fn test_unexpected_token() {
    let error = parse_err("func 1");

    assert_eq!(
        error.get_error(),
        &ErrorImpl::UnexpectedToken {
            expected: String::from("identifier"),
            found: String::from("literal"),
        }
    );
    assert_eq!(error.get_position(), &Position::new(1, 6));
    assert_eq!(error.to_string(), "1:6: expected identifier, found literal");
}

#[test]
fn test_statement_at_top_level() {
    let error = parse_err("x := 1");
    assert_eq!(
        error.get_error(),
        &ErrorImpl::UnexpectedToken {
            expected: String::from("declaration"),
            found: String::from("identifier"),
        }
    );
}

#[test]
fn test_illegal_token_surfaces_lexical_error() {
    let error = parse_err("var x = 2147483649");

    assert_eq!(error.get_error_name(), "IntegerOverflow");
    assert_eq!(error.get_position(), &Position::new(1, 9));
}

#[test]
fn test_unterminated_block() {
    let error = parse_err("func f() {\n\tx := 1\n");
    assert_eq!(
        error.get_error(),
        &ErrorImpl::UnexpectedToken {
            expected: String::from("'}'"),
            found: String::from("EOF"),
        }
    );
}

#[test]
fn test_parse_from_tokens() {
    let tokens = tokenize("func main() {\n\tprintln(\"hi\")\n}\n").expect("valid source");
    let (parser, result) = parse(tokens);

    let decls = result.expect("valid program");
    assert!(parser.package().is_none());
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].span().start, Position::new(1, 1));
}

#[test]
fn test_binary_positions() {
    let decls = parse_ok("var x = a +\n\tb");
    let Expr::Binary(binary) = first_value(&decls) else {
        panic!("expected a binary expression");
    };

    assert_eq!(binary.op_pos, Position::new(1, 11));
    assert_eq!(binary.span.start, Position::new(1, 9));
    assert_eq!(binary.y.pos(), Position::new(2, 2));
}
