use crate::{
    ast::{
        ast::{Binding, Ident, Node},
        declarations::Decl,
        visitor::inspect,
    },
    parser::parser::Parser,
    Position,
};

use super::{
    resolver::resolve,
    scope::{ObjectId, ObjectKind, Scope, ScopeId},
};

fn parse(source: &str) -> Vec<Decl> {
    Parser::from_source(source)
        .parse()
        .expect("source should parse")
}

/// Every identifier spelled `name`, in traversal order.
fn idents<'a>(decls: &'a [Decl], name: &str) -> Vec<&'a Ident> {
    let mut found = vec![];

    for decl in decls {
        inspect(Node::Decl(decl), |node| {
            if let Node::Ident(ident) = node {
                if ident.name == name {
                    found.push(ident);
                }
            }
            true
        });
    }

    found
}

#[test]
fn test_innermost_declaration_wins() {
    let decls = parse(
        "func f() {\n\tx := 1\n\t{\n\t\tx := 2\n\t\t{\n\t\t\tx := 3\n\t\t\tprintln(x)\n\t\t}\n\t}\n}",
    );
    let mut errors = vec![];
    let outcome = resolve(&decls, |pos, message| errors.push((pos, message)));

    assert!(errors.is_empty());

    let x = idents(&decls, "x");
    assert_eq!(x.len(), 4);
    assert_eq!(x[3].object(), x[2].object());
    assert_ne!(x[3].object(), x[1].object());

    let object = outcome.object_of(x[3]).expect("x is bound");
    assert_eq!(object.pos, Position::new(6, 4));
    assert_eq!(object.kind, ObjectKind::Variable);
}

#[test]
fn test_forward_reference_to_later_function() {
    let decls = parse("func main() {\n\thelper()\n}\n\nfunc helper() {}\n");
    let outcome = resolve(&decls, |_, message| panic!("unexpected error: {}", message));

    let helper = idents(&decls, "helper");
    assert_eq!(helper.len(), 2);
    assert_eq!(helper[0].object(), helper[1].object());
    assert!(outcome.unresolved.is_empty());

    let object = outcome.object_of(helper[0]).expect("helper is bound");
    assert_eq!(object.kind, ObjectKind::Function);
    assert_eq!(object.pos, Position::new(5, 6));
    assert!(matches!(object.decl, Node::Decl(Decl::Func(_))));
}

#[test]
fn test_recursive_function() {
    let decls = parse(
        "func fact(n int) int {\n\tif n == 0 {\n\t\treturn 1\n\t}\n\treturn n * fact(n - 1)\n}",
    );
    let outcome = resolve(&decls, |_, _| {});

    let fact = idents(&decls, "fact");
    assert_eq!(fact[1].object(), fact[0].object());

    let n = idents(&decls, "n");
    assert!(n.iter().all(|ident| ident.object() == n[0].object()));
    assert_eq!(outcome.unresolved_names(), vec!["int", "int"]);
}

#[test]
fn test_redeclaration_reported_once() {
    let decls = parse("var a = 1\nvar a = 2\n\nfunc f() int { return a }");
    let mut errors = vec![];
    let outcome = resolve(&decls, |pos, message| errors.push((pos, message)));

    assert_eq!(
        errors,
        vec![(
            Position::new(2, 5),
            String::from("a redeclared in this block\n\tprevious declaration at 1:5")
        )]
    );

    let a = idents(&decls, "a");
    assert_eq!(a.len(), 3);
    assert_eq!(a[2].object(), a[0].object());
    assert_ne!(a[1].object(), a[0].object());
    assert_eq!(outcome.global_scope().lookup("a"), a[0].object());
}

#[test]
fn test_short_declaration_without_new_names() {
    let decls = parse("func f(x int) {\n\tx := x\n}");
    let mut errors = vec![];
    resolve(&decls, |pos, message| errors.push((pos, message)));

    assert_eq!(
        errors,
        vec![(
            Position::new(2, 4),
            String::from("no new variables on left side of :=")
        )]
    );

    let x = idents(&decls, "x");
    assert_eq!(x.len(), 3);
    assert!(x.iter().all(|ident| ident.object() == x[0].object()));
}

#[test]
fn test_short_declaration_reuses_existing_names() {
    let decls = parse("func f() {\n\ta, b := 1, 2\n\ta, c := 3, 4\n}");
    let mut errors = vec![];
    resolve(&decls, |pos, message| errors.push((pos, message)));

    assert!(errors.is_empty());

    let a = idents(&decls, "a");
    assert_eq!(a[1].object(), a[0].object());
    assert!(idents(&decls, "c")[0].object().is_some());
}

#[test]
fn test_blank_identifier() {
    let decls = parse("var _ = 1\nvar _ = 2\n\nfunc f() {\n\t_ := 3\n}");
    let mut errors = vec![];
    let outcome = resolve(&decls, |pos, message| errors.push((pos, message)));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].1, "no new variables on left side of :=");
    assert!(outcome.global_scope().lookup("_").is_none());
}

#[test]
fn test_unresolved_identifiers_are_returned() {
    let decls = parse("import \"fmt\"\n\nfunc f() {\n\tfmt.Println(missing)\n}");
    let outcome = resolve(&decls, |_, _| {});

    assert_eq!(outcome.unresolved_names(), vec!["fmt", "missing"]);
    assert!(outcome
        .unresolved
        .iter()
        .all(|ident| ident.binding() == Binding::Pending));

    let println = idents(&decls, "Println");
    assert_eq!(println[0].binding(), Binding::Unresolved);
}

#[test]
fn test_params_and_results() {
    let decls = parse("func add(a, b int) (sum int) {\n\tsum = a + b\n\treturn\n}");
    let outcome = resolve(&decls, |_, _| {});

    let sum = idents(&decls, "sum");
    assert_eq!(sum[1].object(), sum[0].object());

    let object = outcome.object_of(sum[0]).expect("sum is bound");
    assert_eq!(object.kind, ObjectKind::Variable);
    assert!(matches!(object.decl, Node::Field(_)));
    assert!(outcome.global_scope().lookup("sum").is_none());
}

#[test]
fn test_composite_literal_keys() {
    let decls = parse(
        "type Point struct {\n\tX, Y int\n}\n\nvar y = 1\nvar p = Point{X: y, Y: 2}",
    );
    let outcome = resolve(&decls, |_, _| {});

    assert_eq!(outcome.unresolved_names(), vec!["int"]);

    let keys = idents(&decls, "X");
    assert_eq!(keys[1].binding(), Binding::Unresolved);

    let y = idents(&decls, "y");
    assert_eq!(y[1].object(), y[0].object());

    let point = idents(&decls, "Point");
    assert_eq!(point[1].object(), point[0].object());
    assert_eq!(
        outcome.object_of(point[0]).map(|object| object.kind),
        Some(ObjectKind::Type)
    );
}

#[test]
fn test_type_parameters() {
    let decls = parse(
        "func Map[T any](x T) T {\n\treturn x\n}\n\ntype List[E any] struct {\n\thead E\n}",
    );
    let outcome = resolve(&decls, |_, _| {});

    let t = idents(&decls, "T");
    assert_eq!(t.len(), 3);
    assert!(t.iter().all(|ident| ident.object() == t[0].object()));
    assert_eq!(
        outcome.object_of(t[0]).map(|object| object.kind),
        Some(ObjectKind::Type)
    );

    let e = idents(&decls, "E");
    assert_eq!(e[1].object(), e[0].object());

    assert!(outcome.global_scope().lookup("E").is_none());
    assert!(outcome.global_scope().lookup("List").is_some());
    assert_eq!(outcome.unresolved_names(), vec!["any", "any"]);
}

#[test]
fn test_func_literal_body() {
    let decls = parse("func f() {\n\tg := func(n int) int {\n\t\treturn n * 2\n\t}\n\tg(1)\n}");
    let outcome = resolve(&decls, |_, _| {});

    let n = idents(&decls, "n");
    assert_eq!(n[1].object(), n[0].object());

    let g = idents(&decls, "g");
    assert_eq!(g[1].object(), g[0].object());
    assert_eq!(outcome.unresolved_names(), vec!["int", "int"]);
}

#[test]
fn test_if_and_for_scopes() {
    let decls = parse(
        "func f() {\n\tfor i := 0; i < 3; i++ {\n\t\ti := \"shadow\"\n\t\tprintln(i)\n\t}\n\tif v := 1; v > 0 {\n\t} else {\n\t\tprintln(v)\n\t}\n\tprintln(i)\n}",
    );
    let mut errors = vec![];
    let outcome = resolve(&decls, |pos, message| errors.push((pos, message)));

    assert!(errors.is_empty());

    let i = idents(&decls, "i");
    assert_eq!(i.len(), 6);
    assert_eq!(i[1].object(), i[0].object());
    assert_eq!(i[2].object(), i[0].object());
    assert_eq!(i[4].object(), i[3].object());
    assert_ne!(i[3].object(), i[0].object());
    assert_eq!(i[5].binding(), Binding::Pending);

    let v = idents(&decls, "v");
    assert!(v.iter().all(|ident| ident.object() == v[0].object()));

    assert_eq!(
        outcome.unresolved_names(),
        vec!["println", "println", "println", "i"]
    );
}

#[test]
fn test_global_scope_contents() {
    let decls = parse(
        "const c = 1\nvar v int\ntype T struct{}\nfunc f() {\n\tlocal := 2\n\t_ = local\n}",
    );
    let outcome = resolve(&decls, |_, _| {});

    assert_eq!(outcome.global_scope().names(), vec!["T", "c", "f", "v"]);
    assert_eq!(outcome.global, ScopeId(0));

    let kinds: Vec<ObjectKind> = ["c", "v", "T", "f"]
        .iter()
        .filter_map(|name| outcome.global_scope().lookup(name))
        .map(|id| outcome.object(id).kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ObjectKind::Const,
            ObjectKind::Variable,
            ObjectKind::Type,
            ObjectKind::Function
        ]
    );
}

#[test]
#[should_panic(expected = "bound twice")]
fn test_resolving_twice_panics() {
    let decls = parse("var a = 1");
    resolve(&decls, |_, _| {});
    resolve(&decls, |_, _| {});
}

#[test]
fn test_scope_insert_keeps_first() {
    let mut scope = Scope::new(None, Position::start());

    assert_eq!(scope.insert("x", ObjectId(0)), None);
    assert_eq!(scope.insert("x", ObjectId(1)), Some(ObjectId(0)));
    assert_eq!(scope.lookup("x"), Some(ObjectId(0)));
    assert_eq!(scope.len(), 1);
}

#[test]
fn test_object_kind_display() {
    assert_eq!(ObjectKind::Const.to_string(), "const");
    assert_eq!(ObjectKind::Type.to_string(), "type");
    assert_eq!(ObjectKind::Variable.to_string(), "var");
    assert_eq!(ObjectKind::Function.to_string(), "func");
}
