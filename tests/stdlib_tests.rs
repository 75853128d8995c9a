use rye::{interpret, parse, root_environment, tokenize, NodeKind, NodeRef, RyeError};

fn strip(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn eval(src: &str) -> Result<NodeRef, RyeError> {
    let tokens = tokenize(src)?;
    let root = parse(tokens)?;
    let env = root_environment();
    interpret(&root, &env)
}

fn check(src: &str, kind: NodeKind, printed: &str) {
    let res = eval(src).unwrap_or_else(|e| panic!("failed to evaluate {:?}: {}", src, e));
    assert_eq!(res.kind, kind, "kind mismatch for {:?}", src);
    assert_eq!(
        strip(&res.to_sexpr()),
        strip(printed),
        "value mismatch for {:?}",
        src
    );
}

#[test]
fn sum_follows_numeric_coercion() {
    check("sum(1, 2, 3)", NodeKind::Int, "6");
    check("sum([1, 2, 3])", NodeKind::Int, "6");
    check("sum(1, 2.5)", NodeKind::Float, "3.5");
    check("sum(1, \"two\")", NodeKind::Fail, "fail");
}

#[test]
fn max_and_min_pick_extremes() {
    check("max(1, 7, 3)", NodeKind::Int, "7");
    check("max([1, 7, 3])", NodeKind::Int, "7");
    check("min(4, 2, 9)", NodeKind::Int, "2");
    check("max(1, 2.5)", NodeKind::Float, "2.5");
    check("min(0.5, 3)", NodeKind::Float, "0.5");
    check("max(5)", NodeKind::Fail, "fail");
    check("max([1, true])", NodeKind::Fail, "fail");
}

#[test]
fn random_is_a_unit_float() {
    check("random() >= 0 and random() < 1", NodeKind::Bool, "true");
    check("typeof(random())", NodeKind::Str, "\"Float\"");
}

#[test]
fn string_builtins() {
    check(
        "split(\"a,b,c\", \",\")",
        NodeKind::List,
        "[\"a\", \"b\", \"c\"]",
    );
    check(
        "join([\"a\", \"b\", \"c\"], \"-\")",
        NodeKind::Str,
        "\"a-b-c\"",
    );
    check("uppercase(\"rye\")", NodeKind::Str, "\"RYE\"");
    check("lowercase(\"RYE\")", NodeKind::Str, "\"rye\"");
    check("split(5, \",\")", NodeKind::Fail, "fail");
    check("join([1], \"-\")", NodeKind::Fail, "fail");
}

#[test]
fn typeof_covers_every_kind() {
    check("typeof(3)", NodeKind::Str, "\"Int\"");
    check("typeof(3.5)", NodeKind::Str, "\"Float\"");
    check("typeof(true)", NodeKind::Str, "\"Bool\"");
    check("typeof(\"x\")", NodeKind::Str, "\"String\"");
    check("typeof(fail)", NodeKind::Str, "\"Result\"");
    check("typeof(success)", NodeKind::Str, "\"Result\"");
    check("typeof(null)", NodeKind::Str, "\"Null\"");
    check("typeof([])", NodeKind::Str, "\"List\"");
    check("typeof({\"a\"})", NodeKind::Str, "\"Set\"");
    check("typeof({})", NodeKind::Str, "\"Object\"");
    check("typeof(x => x)", NodeKind::Str, "\"Lambda\"");
    check("typeof(print)", NodeKind::Str, "\"Lambda\"");
}

#[test]
fn conversions_are_idempotent_on_their_own_kind() {
    check("Int(42)", NodeKind::Int, "42");
    check("Int(3.9)", NodeKind::Int, "3");
    check("Int(\"42\")", NodeKind::Int, "42");
    check("Int(\"4.2\")", NodeKind::Fail, "fail");
    check("Int([])", NodeKind::Fail, "fail");

    check("Float(3)", NodeKind::Float, "3");
    check("Float(3.5)", NodeKind::Float, "3.5");
    check("Float(\"2.5\")", NodeKind::Float, "2.5");

    check("String(\"x\")", NodeKind::Str, "\"x\"");
    check("String(42)", NodeKind::Str, "\"42\"");
    check("String(x => x)", NodeKind::Str, "\"<lambda>\"");

    check("#Set([1, 2, 2, 3])", NodeKind::Int, "3");
    check("Set({\"a\"})", NodeKind::Set, "{\"a\"}");
    check("#List({1, 2, 3})", NodeKind::Int, "3");
    check("List(7)", NodeKind::List, "[7]");
    check("List(1, 2)", NodeKind::List, "[1, 2]");
}

#[test]
fn set_algebra_returns_fresh_sets() {
    check("#union({1, 2}, {2, 3})", NodeKind::Int, "3");
    check("#intersection({1, 2}, {2, 3})", NodeKind::Int, "1");
    check("#difference({1, 2}, {2, 3})", NodeKind::Int, "1");
    check("union({1}, [2])", NodeKind::Fail, "fail");
    check(
        "a := {1, 2}\nb := union(a, {3})\n#a",
        NodeKind::Int,
        "2",
    );
}

#[test]
fn add_and_remove_mutate_in_place() {
    check("s := {\"a\"}\nadd(s, \"b\")\n#s", NodeKind::Int, "2");
    check(
        "s := {\"a\", \"b\"}\nremove(s, \"a\")\n\"a\" in s",
        NodeKind::Bool,
        "false",
    );
    check(
        "s := {\"a\", \"b\"}\nremove(s, \"a\")\n#s",
        NodeKind::Int,
        "1",
    );
    // a tombstoned member does not reappear through set algebra
    check(
        "s := {1, 2}\nremove(s, 1)\n#union(s, {3})",
        NodeKind::Int,
        "2",
    );
}

#[test]
fn object_builtins() {
    check("#keys({a: 1, b: 2})", NodeKind::Int, "2");
    check("\"a\" in keys({a: 1, b: 2})", NodeKind::Bool, "true");
    check("2 in values({a: 1, b: 2})", NodeKind::Bool, "true");
    check("keys([1])", NodeKind::Fail, "fail");
}

#[test]
fn list_builtins() {
    check("flat([[1, 2], [3], 4])", NodeKind::List, "[1, 2, 3, 4]");
    check("find([1, 2, 3], x => x > 1)", NodeKind::Int, "2");
    check("find([1, 2, 3], x => x > 7)", NodeKind::Fail, "fail");
    check("findIndex([1, 2, 3], x => x > 1)", NodeKind::Int, "1");
    check("append([1], 2)", NodeKind::List, "[1, 2]");
    check("reverse([1, 2, 3])", NodeKind::List, "[3, 2, 1]");
    check("reverse(\"abc\")", NodeKind::Fail, "fail");
    // append returns a fresh list
    check("xs := [1]\nys := append(xs, 2)\n#xs", NodeKind::Int, "1");
}

#[test]
fn builtins_enforce_arity() {
    let err = eval("sum()").expect_err("expected an arity error");
    assert_eq!(err.code, "E_ARITY");
    assert!(err.message.contains("\"sum\""));

    let err = eval("uppercase()").expect_err("expected an arity error");
    assert!(err.message.contains("Expected 1"));
}

#[test]
fn read_file_fails_softly_on_missing_paths() {
    check("readFile(\"no_such_file.txt\")", NodeKind::Fail, "fail");
    check("readFile(42)", NodeKind::Fail, "fail");
}

#[test]
fn json_round_trips_through_files() {
    let path = "rye_json_roundtrip_test.json";

    let res = eval(&format!(
        "writeJson(\"{p}\", {{count: 3, items: [1, 2, 3]}})\nreadJson(\"{p}\").count",
        p = path
    ));
    std::fs::remove_file(path).ok();

    let res = res.expect("round trip failed");
    assert_eq!(res.kind, NodeKind::Int);
    assert_eq!(res.to_sexpr(), "3");
}

#[test]
fn read_json_maps_json_onto_language_values() {
    let path = "rye_json_read_test.json";
    std::fs::write(path, r#"{"n": 1.5, "ok": true, "name": "x", "none": null}"#).unwrap();

    let checks = [
        ("n", "\"Float\""),
        ("ok", "\"Bool\""),
        ("name", "\"String\""),
        ("none", "\"Null\""),
    ];
    for (field, expected) in checks {
        let res = eval(&format!("typeof(readJson(\"{}\").{})", path, field))
            .expect("read failed");
        assert_eq!(strip(&res.to_sexpr()), strip(expected));
    }

    std::fs::remove_file(path).ok();
}

#[test]
fn pipelines_compose_with_builtins() {
    check("[3, 1, 2] |> sum", NodeKind::Int, "6");
    check("..5 map _ * 2 |> sum", NodeKind::Int, "20");
    check("[[1], [2, 3]] |> flat |> reverse", NodeKind::List, "[3, 2, 1]");
}
