use rye::{parse, tokenize, NodeKind, NodeRef};

fn strip(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parses a one-statement program and returns the statement's subtree.
fn parse_first(src: &str) -> NodeRef {
    let tokens = tokenize(src).expect("lexing failed");
    let root = parse(tokens).expect("parsing failed");
    root.left.clone().expect("empty program")
}

fn check(src: &str, kind: NodeKind, sexpr: &str) {
    let node = parse_first(src);
    assert_eq!(node.kind, kind, "kind mismatch for {:?}", src);
    assert_eq!(
        strip(&node.to_sexpr()),
        strip(sexpr),
        "shape mismatch for {:?}",
        src
    );
}

#[test]
fn parses_atoms() {
    check("x", NodeKind::Identifier, "x");
    check("42", NodeKind::Int, "42");
    check("true", NodeKind::Bool, "true");
    check("fail", NodeKind::Fail, "fail");
    check(r#""foo""#, NodeKind::Str, r#""foo""#);
    check("3.14", NodeKind::Float, "3.14");
    check("_", NodeKind::Underscore, "_");
}

#[test]
fn parses_collections() {
    // lists
    check("[]", NodeKind::List, "[]");
    check("[1]", NodeKind::List, "[1]");
    check("[1,2,3,4]", NodeKind::List, "[1, 2, 3, 4]");
    // sets
    check(r#"{"apple"}"#, NodeKind::SetItem, r#"(set-item "apple")"#);
    check(
        r#"{"apple", "banana"}"#,
        NodeKind::SetItem,
        r#"(set-item "apple" (set-item "banana"))"#,
    );
    // objects
    check("{}", NodeKind::Object, "{}");
    check("{a: 1}", NodeKind::ObjectItem, "(object-item (: a 1))");
    check(
        "{a: 1, b: true}",
        NodeKind::ObjectItem,
        "(object-item (: a 1) (object-item (: b true)))",
    );
}

#[test]
fn parses_primaries() {
    check("f()", NodeKind::Call, "(call f (arg))");
    check("f(1)", NodeKind::Call, "(call f (arg 1))");
    check("f(1, \"two\")", NodeKind::Call, "(call f (arg 1 (arg \"two\")))");

    check(
        "myList[1..]",
        NodeKind::ListSlice,
        "(slice-access myList (slice 1 NIL_PTR))",
    );
    check(
        "myList[..5]",
        NodeKind::ListSlice,
        "(slice-access myList (slice NIL_PTR 5))",
    );
    check(
        "myList[2..x]",
        NodeKind::ListSlice,
        "(slice-access myList (slice 2 x))",
    );

    check(
        "myList[-1]",
        NodeKind::BracketAccess,
        "(bracket-access myList (- 1))",
    );
    check(
        "myObj[\"foo\"]",
        NodeKind::BracketAccess,
        "(bracket-access myObj \"foo\")",
    );
    check("myObj.foo", NodeKind::FieldAccess, "(field-access myObj foo)");

    // chained
    check(
        "hof(1)(2)",
        NodeKind::Call,
        "(call (call hof (arg 1)) (arg 2))",
    );
    check(
        "myMatrix[2][4]",
        NodeKind::BracketAccess,
        "(bracket-access (bracket-access myMatrix 2) 4)",
    );
    check(
        "foo(x).y",
        NodeKind::FieldAccess,
        "(field-access (call foo (arg x)) y)",
    );
}

#[test]
fn parses_unary_operators() {
    check("-3", NodeKind::Neg, "(- 3)");
    check("!false", NodeKind::Not, "(! false)");
    check("#[]", NodeKind::Cardinality, "(# [])");
    check("result?", NodeKind::Maybe, "(? result)");
    check("[...xs]", NodeKind::List, "[(... xs)]");
    // combined
    check("!result?", NodeKind::Not, "(! (? result))");
    check("-#foo", NodeKind::Neg, "(- (# foo))");
    check("!-#foo?", NodeKind::Not, "(! (- (# (? foo))))");
}

#[test]
fn arithmetic_is_left_associative_with_precedence() {
    check("1 + 2 * 3", NodeKind::Add, "(+ 1 (* 2 3))");
    check("1 * 2 + 3", NodeKind::Add, "(+ (* 1 2) 3)");
    check("1 - 2 - 3", NodeKind::Sub, "(- (- 1 2) 3)");
    check("1 + 2 * (3 - 4)", NodeKind::Add, "(+ 1 (* 2 (- 3 4)))");
}

#[test]
fn power_is_right_associative() {
    check("2 ^ 3", NodeKind::Power, "(^ 2 3)");
    check("2 ^ 3 ^ 2", NodeKind::Power, "(^ 2 (^ 3 2))");
}

#[test]
fn comparison_binds_tighter_than_equality_and_logic() {
    check("1 < 2 == true", NodeKind::Equal, "(== (< 1 2) true)");
    check("a and b or c", NodeKind::Or, "(or (and a b) c)");
    check("x in xs and ok", NodeKind::And, "(and (in x xs) ok)");
    check("a | b | c", NodeKind::Fallback, "(| (| a b) c)");
}

#[test]
fn parses_ranges() {
    check("1..5", NodeKind::Range, "(range 1 5)");
    check("..5", NodeKind::Range, "(range NIL_PTR 5)");
}

#[test]
fn parses_declarations_and_assignment() {
    check("x := 1", NodeKind::ConstDecl, "(const x 1)");
    check("var x := 1", NodeKind::VarDecl, "(var x 1)");
    check("x = 2", NodeKind::Assign, "(= x 2)");
    check("x += 1", NodeKind::Assign, "(= x (+ x 1))");
    check("x |= 0", NodeKind::Assign, "(= x (| x 0))");
    check("xs[0] = 1", NodeKind::Assign, "(= (bracket-access xs 0) 1)");
    check(
        "obj.field = 1",
        NodeKind::Assign,
        "(= (field-access obj field) 1)",
    );
}

#[test]
fn parses_lambdas() {
    check("x => x + 1", NodeKind::Lambda, "(lambda (param) (+ x 1))");
    check("() => 1", NodeKind::Lambda, "(lambda (param) 1)");
    check(
        "(a, b) => a",
        NodeKind::Lambda,
        "(lambda (param (param)) a)",
    );
}

#[test]
fn synthesizes_implicit_lambdas() {
    check(
        "ys := _ * _",
        NodeKind::ConstDecl,
        "(const ys (lambda (param) (* _ _)))",
    );
    check(
        "xs map _ + 1",
        NodeKind::Map,
        "(map xs (lambda (param) (+ _ 1)))",
    );
    // an expression without the placeholder is left alone
    check("xs map f", NodeKind::Map, "(map xs f)");
}

#[test]
fn pipelines_are_left_associative() {
    check("xs |> f", NodeKind::Pipe, "(|> xs f)");
    check("xs map f where g", NodeKind::Where, "(where (map xs f) g)");
    check("xs then f", NodeKind::Pipe, "(|> xs f)");
}

#[test]
fn parses_postfix_conditionals() {
    check("\"foo\" if false", NodeKind::If, "(if false \"foo\")");
    check(
        "\"foo\" if ok else \"bar\"",
        NodeKind::If,
        "(if ok (then-branch \"foo\" \"bar\"))",
    );
    check("\"foo\" unless done", NodeKind::If, "(if (! done) \"foo\")");
}

#[test]
fn parses_conditional_statements() {
    check(
        "if c { f() }",
        NodeKind::If,
        "(if c (call f (arg)))",
    );
    check(
        "if c { f() } else { g() }",
        NodeKind::If,
        "(if c (then-branch (call f (arg)) (call g (arg))))",
    );
    check(
        "unless c : f()",
        NodeKind::If,
        "(if (! c) (call f (arg)))",
    );
}

#[test]
fn parses_loops() {
    check(
        "while x < 3 { f() }",
        NodeKind::While,
        "(while (< x 3) (call f (arg)))",
    );
    check(
        "until done { f() }",
        NodeKind::While,
        "(while (! done) (call f (arg)))",
    );
    check(
        "for x <- xs { x }",
        NodeKind::For,
        "(for (const x xs) x)",
    );
}

#[test]
fn parses_imports() {
    check(
        "import \"lib.rye\" as lib",
        NodeKind::Import,
        "(import lib.rye lib)",
    );
    check("import \"lib.rye\"", NodeKind::Import, "(import lib.rye)");
}

#[test]
fn statements_chain_through_terminators() {
    let tokens = tokenize("x := 1; x\ny := 2").expect("lexing failed");
    let root = parse(tokens).expect("parsing failed");

    let mut count = 0;
    let mut curr = Some(root);
    while let Some(n) = curr {
        assert_eq!(n.kind, NodeKind::Stmt);
        count += 1;
        curr = n.right.clone();
    }
    assert_eq!(count, 3);
}

#[test]
fn parsing_is_deterministic() {
    let src = "xs map _ * 2 where _ > 0\nvar total := 0\nfor x <- xs { total += x }";
    let a = parse(tokenize(src).unwrap()).unwrap().to_sexpr();
    let b = parse(tokenize(src).unwrap()).unwrap().to_sexpr();
    assert_eq!(a, b);
}

#[test]
fn reports_syntax_errors_with_the_offending_token() {
    let err = parse(tokenize("total := (1 + ").unwrap()).expect_err("expected a parse error");
    assert_eq!(err.code, "E_PARSE");
}
