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
fn evaluates_simple_expressions() {
    check("1", NodeKind::Int, "1");
    check("2 + 2", NodeKind::Int, "4");
    check("2 + 2 == 4", NodeKind::Bool, "true");
    check("2.0 ^ 3 != 8", NodeKind::Bool, "false");
    check("2.0 ^ -3 < .2", NodeKind::Bool, "false");
    check("1 + 2 * (3 - 4) <= 5 / 6.7", NodeKind::Bool, "true");
    check("false and true or true and !null", NodeKind::Bool, "true");
    check("\"foo\" if false", NodeKind::Fail, "fail");
    check("\"foo\" if \"bar\"? else \"baz\"", NodeKind::Str, "\"foo\"");
}

#[test]
fn arithmetic_coerces_numbers() {
    check("1 + 2", NodeKind::Int, "3");
    check("1 + 2.5", NodeKind::Float, "3.5");
    check("10 / 4", NodeKind::Float, "2.5");
    check("10 / 2", NodeKind::Float, "5");
    check("7 % 3", NodeKind::Int, "1");
    check("7 % 0", NodeKind::Fail, "fail");
    check("1 / 0", NodeKind::Fail, "fail");
    check("\"n = \" + 42", NodeKind::Str, "\"n = 42\"");
    check("\"a\" * 2", NodeKind::Fail, "fail");
}

#[test]
fn power_requires_an_integer_exponent() {
    check("2 ^ 10", NodeKind::Int, "1024");
    check("2 ^ -2", NodeKind::Float, "0.25");
    check("2 ^ 0.5", NodeKind::Fail, "fail");
}

#[test]
fn logic_returns_operands() {
    check("5 or 2", NodeKind::Int, "5");
    check("0 or 2", NodeKind::Int, "2");
    check("5 and 2", NodeKind::Int, "2");
    check("0 and 2", NodeKind::Bool, "false");
}

#[test]
fn fallback_passes_everything_but_fail() {
    check("fail | 5", NodeKind::Int, "5");
    check("3 | 5", NodeKind::Int, "3");
    check("fail | fail | 3", NodeKind::Int, "3");
    check("null | 3", NodeKind::Null, "null");
    check("false | 3", NodeKind::Bool, "false");
}

#[test]
fn maybe_converts_to_results() {
    check("\"x\"?", NodeKind::Success, "success");
    check("fail?", NodeKind::Fail, "fail");
    check("0?", NodeKind::Success, "success");
}

#[test]
fn truthiness_and_negation() {
    check("!fail", NodeKind::Bool, "true");
    check("!0", NodeKind::Bool, "true");
    check("!\"\"", NodeKind::Bool, "true");
    check("!5", NodeKind::Bool, "false");
    check("![]", NodeKind::Bool, "false");
}

#[test]
fn equality_on_incomparable_kinds_fails() {
    check("true == 1", NodeKind::Fail, "fail");
    check("[1] == 1", NodeKind::Fail, "fail");
    check("[1, 2] == [1, 2]", NodeKind::Bool, "true");
    check("[1] == [1, 2]", NodeKind::Bool, "false");
    check("\"1\" == 1", NodeKind::Bool, "true");
}

#[test]
fn ordered_comparison_on_non_numbers_fails() {
    check("\"a\" < \"b\"", NodeKind::Fail, "fail");
    check("1 < 2.5", NodeKind::Bool, "true");
}

#[test]
fn evaluates_collections_and_access() {
    check("[1, 2, 3]", NodeKind::List, "[1, 2, 3]");
    check("[1, 2, 3] + [4, 5, 6]", NodeKind::List, "[1, 2, 3, 4, 5, 6]");
    check("#[1, 2, 3]", NodeKind::Int, "3");
    check("[1, 2, 3][5]", NodeKind::Fail, "fail");
    check("[1, 2, 3][-1]", NodeKind::Int, "3");
    check("\"cherry\" in {\"apple\", \"banana\"}", NodeKind::Bool, "false");
    check("{ a: true }.a", NodeKind::Bool, "true");
    check(
        "{ a: [{}, { \"foo\": {\"bar\"} }] }.a[1].foo",
        NodeKind::Set,
        "{ \"bar\" }",
    );
    check("{ a: 1 }.missing", NodeKind::Fail, "fail");
    check("{ a: 1 }[\"a\"]", NodeKind::Int, "1");
}

#[test]
fn evaluates_ranges_and_slices() {
    check("10 in 2..20", NodeKind::Bool, "true");
    check("(..10)[3..7]", NodeKind::List, "[3, 4, 5, 6]");
    check("[3.14][1..]", NodeKind::List, "[]");
    check("\"foobarbaz\"[3..6]", NodeKind::Str, "\"bar\"");
    check("5..2", NodeKind::List, "[]");
    check("(..10)[..20]", NodeKind::List, "[0,1,2,3,4,5,6,7,8,9]");
    check("\"hello\"[1]", NodeKind::Str, "\"e\"");
    check("\"hello\"[-1]", NodeKind::Str, "\"o\"");
    check("#\"hello\"", NodeKind::Int, "5");
}

#[test]
fn range_start_must_be_an_integer() {
    let err = eval("1.5..3").expect_err("expected a hard error");
    assert!(err.message.contains("range"));
}

#[test]
fn evaluates_splats() {
    check("[0, ...[1, 2], 3]", NodeKind::List, "[0, 1, 2, 3]");
    check("#{1, ...[2, 3], 2}", NodeKind::Int, "3");
    check("[...5]", NodeKind::List, "[fail]");
}

#[test]
fn object_keys_may_be_expressions() {
    check("{ (\"a\" + \"b\"): 1 }.ab", NodeKind::Int, "1");
    check("{ \"lit\": 2 }.lit", NodeKind::Int, "2");
}

#[test]
fn evaluates_lambdas_and_calls() {
    check("x => x + 1", NodeKind::Lambda, "(lambda (param) (+ x 1))");
    check("((a, b) => a if a > b else b)(-5, 7)", NodeKind::Int, "7");
    check("(() => 42)()", NodeKind::Int, "42");
    check(
        "createAdder := a => b => a + b\nadd100 := createAdder(100)\nadd100(7)",
        NodeKind::Int,
        "107",
    );
    check("square := _ * _\nsquare(7)", NodeKind::Int, "49");
}

#[test]
fn arity_mismatches_are_hard_errors() {
    let err = eval("f := x => x\nf(1, 2)").expect_err("expected an arity error");
    assert!(err.message.contains("Too many"));
    assert!(err.message.contains("\"f\""));

    let err = eval("f := (a, b) => a\nf(1)").expect_err("expected an arity error");
    assert!(err.message.contains("Too few"));
}

#[test]
fn closures_capture_by_reference() {
    check(
        "makeCounter := () => {
    var count := 0
    () => {
        count += 1
        count
    }
}
counter := makeCounter()
counter()
counter()
counter()",
        NodeKind::Int,
        "3",
    );
}

#[test]
fn destructuring_binds_positionally_and_by_key() {
    check(
        "f := ([a, b, c]) => [a, b, c]\nf([10, 20])",
        NodeKind::List,
        "[10, 20, fail]",
    );
    check(
        "g := ({name: n, age}) => [n, age]\ng({name: \"Ada\", age: 36})",
        NodeKind::List,
        "[\"Ada\", 36]",
    );
    check("[a, b] := [1, 2, 3]\na + b", NodeKind::Int, "3");
    check("{x} := {x: 9}\nx", NodeKind::Int, "9");
}

#[test]
fn declarations_and_assignment() {
    check("x := 1\nx", NodeKind::Int, "1");
    check("var x := 1\nx = \"one\"\nx", NodeKind::Str, "\"one\"");
    check(
        "var x := 1\nx += 2\nx *= 3\nx -= 4\nx /= 2\nx",
        NodeKind::Float,
        "2.5",
    );
    check("var r := fail\nr |= 7\nr", NodeKind::Int, "7");
}

#[test]
fn assignment_errors() {
    let err = eval("x := 1\nx = 2").expect_err("constants are not assignable");
    assert!(err.message.contains("constant"));

    let err = eval("y = 2").expect_err("undefined targets are not assignable");
    assert!(err.message.contains("undefined"));

    let err = eval("x := 1\nx := 2").expect_err("redeclaration is an error");
    assert!(err.message.contains("already defined"));

    let err = eval("nope").expect_err("undefined identifier");
    assert!(err.message.contains("undefined"));
}

#[test]
fn nested_mutation_is_observable_through_the_container() {
    check(
        "var foo := {}\nfoo.bar = [1, 2, 3]\nfoo.bar",
        NodeKind::List,
        "[1, 2, 3]",
    );
    check(
        "var foo := {}\nfoo.bar = [1, 2, 3]\nfoo.bar[1] = 9\nfoo.bar",
        NodeKind::List,
        "[1, 9, 3]",
    );
    check(
        "xs := [1, 2]\nobj := {wrapped: xs}\nobj.wrapped[0] = 5\nxs[0]",
        NodeKind::Int,
        "5",
    );
}

#[test]
fn conditional_statements_and_loops() {
    check(
        "var i := 0\nvar total := 0\nwhile i < 5 {\n  total += i\n  i += 1\n}\ntotal",
        NodeKind::Int,
        "10",
    );
    check("var i := 0\nuntil i >= 3 { i += 1 }\ni", NodeKind::Int, "3");
    check(
        "var total := 0\nfor x <- ..10 {\n  if x == 3 : continue\n  if x > 5 : break\n  total += x\n}\ntotal",
        NodeKind::Int,
        "12",
    );
    check(
        "var hits := 0\nfor k <- {a: 1, b: 2} { hits += 1 }\nhits",
        NodeKind::Int,
        "2",
    );
    check(
        "if 1 > 2 { \"a\" } else { \"b\" }",
        NodeKind::Str,
        "\"b\"",
    );
}

#[test]
fn for_loops_bind_index_and_patterns() {
    check(
        "var last := fail\nfor x <- [\"a\", \"b\", \"c\"] { last = index }\nlast",
        NodeKind::Int,
        "2",
    );
    check(
        "var total := 0\nfor [a, b] <- [[1, 2], [3, 4]] { total += a + b }\ntotal",
        NodeKind::Int,
        "10",
    );
}

#[test]
fn returns_terminate_function_bodies() {
    check(
        "f := x => {\n  if x > 0 : return \"pos\"\n  \"neg\"\n}\nf(5)",
        NodeKind::Str,
        "\"pos\"",
    );
    check(
        "f := x => {\n  if x > 0 : return \"pos\"\n  \"neg\"\n}\nf(-5)",
        NodeKind::Str,
        "\"neg\"",
    );
}

#[test]
fn pipeline_operators() {
    check("..5 map _ * _", NodeKind::List, "[0, 1, 4, 9, 16]");
    check("..10 where _ % 2 == 0", NodeKind::List, "[0, 2, 4, 6, 8]");
    check("[1, 2, 3, 4] find _ > 2", NodeKind::Int, "3");
    check("[1, 2, 3] find _ > 7", NodeKind::Fail, "fail");
    check("5 |> (x => x * 2)", NodeKind::Int, "10");
    check("fail |> (x => x)", NodeKind::Fail, "fail");
    check("5 map _ + 1", NodeKind::Fail, "fail");
    check(
        "double := x => x * 2\n[1, 2] map double map double",
        NodeKind::List,
        "[4, 8]",
    );
    check("..3 map (x => index)", NodeKind::List, "[0, 1, 2]");
}

#[test]
fn fold_threads_an_accumulator() {
    check("[1, 2, 3, 4] fold (a, b) => a + b", NodeKind::Int, "10");
    check("[\"x\"] fold (a, b) => a + b", NodeKind::Str, "\"x\"");
    check("[] fold (a, b) => a", NodeKind::Fail, "fail");
    check("5 fold (a, b) => a", NodeKind::Fail, "fail");
}

#[test]
fn map_works_over_sets() {
    check("#({1, 2, 3} map _ * 0)", NodeKind::Int, "1");
    check("{1, 2, 3} where _ > 1 then List then #_", NodeKind::Int, "2");
}

#[test]
fn atoms_round_trip() {
    check("42", NodeKind::Int, "42");
    check("true", NodeKind::Bool, "true");
    check("false", NodeKind::Bool, "false");
    check("null", NodeKind::Null, "null");
    check("fail", NodeKind::Fail, "fail");
    check("success", NodeKind::Success, "success");
    check("3.14", NodeKind::Float, "3.14");
    check("\"foo\"", NodeKind::Str, "\"foo\"");
}

#[test]
fn modules_bind_into_the_top_scope() {
    let path = "rye_mod_basic_test.rye";
    std::fs::write(path, "exported := 42\nhelper := x => x + 1\n").unwrap();

    let res = eval(&format!(
        "import \"{}\" as m\nm.exported + m.helper(0)",
        path
    ));
    std::fs::remove_file(path).ok();

    let res = res.expect("import failed");
    assert_eq!(res.kind, NodeKind::Int);
    assert_eq!(res.to_sexpr(), "43");
}

#[test]
fn module_internals_stay_isolated() {
    let path = "rye_mod_isolation_test.rye";
    std::fs::write(path, "secret := 7\n").unwrap();

    let err = eval(&format!("import \"{}\" as m\nsecret", path));
    std::fs::remove_file(path).ok();

    let err = err.expect_err("module internals must not leak");
    assert!(err.message.contains("undefined"));
}

#[test]
fn missing_modules_are_hard_errors() {
    let err = eval("import \"no_such_module.rye\"").expect_err("expected an import error");
    assert_eq!(err.code, "E_IMPORT");
    assert!(err.message.contains("no_such_module.rye"));
}

#[test]
fn default_module_name_is_the_basename() {
    let path = "rye_mod_named_test.rye";
    std::fs::write(path, "value := 5\n").unwrap();

    let res = eval(&format!(
        "import \"{}\"\nrye_mod_named_test.value",
        path
    ));
    std::fs::remove_file(path).ok();

    let res = res.expect("import failed");
    assert_eq!(res.to_sexpr(), "5");
}
