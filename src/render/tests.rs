use crate::{
    ast::declarations::Decl, lexer::lexer::tokenize, parser::parser::Parser,
    resolver::resolver::resolve,
};

use super::{
    json::render_json,
    listing::{render_resolution, render_tokens},
    tree::{render_tree, Tree},
};

fn parse(source: &str) -> Vec<Decl> {
    Parser::from_source(source)
        .parse()
        .expect("source should parse")
}

#[test]
fn test_tree_layout() {
    let mut tree = Tree::new(".");
    let a = tree.add_branch("a");
    a.add_node("b");
    a.add_node("c");
    tree.add_node("d");

    assert_eq!(tree.to_string(), ".\n├── a\n│   ├── b\n│   └── c\n└── d\n");
}

#[test]
fn test_render_var_decl() {
    let rendered = render_tree(&parse("var x = 1 + 2"));

    let expected = "\
.
└── var
    ├── names
    │   └── x
    ├── type
    └── values
        └── +
            ├── INT 1
            └── INT 2
";
    assert_eq!(rendered, expected);
}

#[test]
fn test_render_func_decl() {
    let rendered = render_tree(&parse("func add(a, b int) int {\n\treturn a + b\n}"));

    let expected = "\
.
└── add
    ├── body
    │   └── return
    │       └── +
    │           ├── a
    │           └── b
    └── type
        ├── params
        │   └── field
        │       ├── names
        │       │   ├── a
        │       │   └── b
        │       └── type
        │           └── int
        └── results
            └── field
                └── type
                    └── int
";
    assert_eq!(rendered, expected);
}

#[test]
fn test_render_one_tree_per_decl() {
    let rendered = render_tree(&parse("var a int\nvar b int"));

    assert_eq!(rendered.matches(".\n").count(), 2);
    assert!(rendered.contains("│   └── a\n"));
    assert!(rendered.contains("│   └── b\n"));
}

#[test]
fn test_render_statements() {
    let rendered = render_tree(&parse(
        "func f() {\n\tfor i := 0; i < 3; i++ {\n\t\tp := Point{X: i}\n\t\tfmt.Println(p)\n\t}\n}",
    ));

    for label in [
        "for",
        "init",
        ":=",
        "condition",
        "post",
        "++",
        "composite_literal",
        "key_value",
        "selector",
        "method",
        "args",
    ] {
        assert!(
            rendered.lines().any(|line| line.ends_with(&format!("── {}", label))),
            "missing {} in\n{}",
            label,
            rendered
        );
    }
}

#[test]
fn test_render_json() {
    let decls = parse("var x = 1");
    let json = render_json(&decls).expect("AST serializes");

    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    let decl = &value[0]["Gen"];
    assert_eq!(decl["tok"], "Var");

    let spec = &decl["specs"][0]["Value"];
    assert_eq!(spec["names"][0]["name"], "x");
    assert_eq!(spec["names"][0]["binding"], "Unresolved");
    assert_eq!(spec["values"][0]["BasicLit"]["value"], 1);
    assert_eq!(spec["values"][0]["BasicLit"]["span"]["start"]["column"], 9);
}

#[test]
fn test_render_tokens() {
    let tokens = tokenize("x := 0x10").expect("source should scan");

    assert_eq!(
        render_tokens(&tokens),
        "1:1\tIdentifier\t\"x\"\tx\n1:3\tDefine\t\t:=\n1:6\tInt\t16\t0x10\n1:9\tEOF\t\t\n"
    );
}

#[test]
fn test_render_resolution() {
    let decls = parse("var a = b\nfunc f() {}");
    let outcome = resolve(&decls, |_, _| {});

    let rendered = render_resolution(&outcome).expect("writing to a string");
    assert_eq!(
        rendered,
        "global scope (2 names)\n\tvar a declared at 1:5\n\tfunc f declared at 2:6\nunresolved (1 identifiers)\n\tb at 1:9\n"
    );
}
