use rye::lexer::{tokenize, TokenKind};

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src)
        .expect("lexing failed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn lexemes(src: &str) -> Vec<String> {
    tokenize(src)
        .expect("lexing failed")
        .into_iter()
        .map(|t| t.lexeme)
        .collect()
}

#[test]
fn scans_a_simple_declaration() {
    assert_eq!(
        kinds("x := 1"),
        vec![
            TokenKind::Identifier,
            TokenKind::ColonEqual,
            TokenKind::Int,
            TokenKind::NewLine,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn inserts_a_newline_before_closing_braces() {
    assert_eq!(
        kinds("{}"),
        vec![
            TokenKind::LeftBrace,
            TokenKind::NewLine,
            TokenKind::RightBrace,
            TokenKind::NewLine,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn always_terminates_with_newline_and_eof() {
    assert_eq!(kinds(""), vec![TokenKind::NewLine, TokenKind::Eof]);
}

#[test]
fn skips_line_comments_but_keeps_the_newline() {
    assert_eq!(
        kinds("1 // ignored\n2"),
        vec![
            TokenKind::Int,
            TokenKind::NewLine,
            TokenKind::Int,
            TokenKind::NewLine,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn prefers_two_character_operators() {
    assert_eq!(
        kinds("a <= b != c"),
        vec![
            TokenKind::Identifier,
            TokenKind::LessEqual,
            TokenKind::Identifier,
            TokenKind::BangEqual,
            TokenKind::Identifier,
            TokenKind::NewLine,
            TokenKind::Eof,
        ]
    );

    assert_eq!(kinds("|>")[0], TokenKind::Pipe);
    assert_eq!(kinds("|=")[0], TokenKind::BarEqual);
    assert_eq!(kinds("|")[0], TokenKind::Bar);
    assert_eq!(kinds("=>")[0], TokenKind::Arrow);
    assert_eq!(kinds("<-")[0], TokenKind::LeftArrow);
    assert_eq!(kinds(":=")[0], TokenKind::ColonEqual);
}

#[test]
fn distinguishes_dots_ranges_and_floats() {
    // an integer followed by a range operator must not become a float
    assert_eq!(
        kinds("1..3"),
        vec![
            TokenKind::Int,
            TokenKind::DotDot,
            TokenKind::Int,
            TokenKind::NewLine,
            TokenKind::Eof,
        ]
    );

    assert_eq!(kinds("...")[0], TokenKind::DotDotDot);
    assert_eq!(kinds(".5")[0], TokenKind::Float);
    assert_eq!(kinds("1.5")[0], TokenKind::Float);
    assert_eq!(kinds("a.b")[1], TokenKind::Dot);
}

#[test]
fn float_lexemes_preserve_source_text() {
    assert_eq!(lexemes(".5")[0], ".5");
    assert_eq!(lexemes("3.14")[0], "3.14");
    assert_eq!(lexemes("42")[0], "42");
}

#[test]
fn processes_string_escapes() {
    let toks = tokenize(r#""a\nb""#).expect("lexing failed");
    assert_eq!(toks[0].kind, TokenKind::Str);
    assert_eq!(toks[0].lexeme, "a\nb");

    let toks = tokenize(r#""say \"hi\"""#).expect("lexing failed");
    assert_eq!(toks[0].lexeme, "say \"hi\"");
}

#[test]
fn multiline_strings_advance_the_line_counter() {
    let toks = tokenize("\"a\nb\"\nx").expect("lexing failed");
    // the identifier after the two-line string sits on line 3
    let ident = toks
        .iter()
        .find(|t| t.kind == TokenKind::Identifier)
        .expect("identifier token");
    assert_eq!(ident.line, 3);
}

#[test]
fn tracks_line_numbers() {
    let toks = tokenize("a\nb\nc").expect("lexing failed");
    let lines: Vec<usize> = toks
        .iter()
        .filter(|t| t.kind == TokenKind::Identifier)
        .map(|t| t.line)
        .collect();
    assert_eq!(lines, vec![1, 2, 3]);
}

#[test]
fn recognizes_keywords_and_aliases() {
    assert_eq!(kinds("while")[0], TokenKind::While);
    assert_eq!(kinds("unless")[0], TokenKind::Unless);
    assert_eq!(kinds("fail")[0], TokenKind::Fail);
    assert_eq!(kinds("success")[0], TokenKind::Success);
    assert_eq!(kinds("map")[0], TokenKind::Map);
    assert_eq!(kinds("where")[0], TokenKind::Where);
    assert_eq!(kinds("find")[0], TokenKind::Find);
    assert_eq!(kinds("fold")[0], TokenKind::Fold);
    assert_eq!(kinds("index")[0], TokenKind::Index);

    // aliases collapse onto the same kinds
    assert_eq!(kinds("then")[0], TokenKind::Pipe);
    assert_eq!(kinds("bind")[0], TokenKind::Pipe);
    assert_eq!(kinds("each")[0], TokenKind::Map);
}

#[test]
fn underscore_alone_is_a_placeholder() {
    assert_eq!(kinds("_")[0], TokenKind::Underscore);
    assert_eq!(kinds("_foo")[0], TokenKind::Identifier);
    assert_eq!(lexemes("_foo")[0], "_foo");
}

#[test]
fn rejects_unexpected_characters() {
    let err = tokenize("x @ y").expect_err("expected a lexical error");
    assert_eq!(err.code, "E_LEX");
    assert!(err.message.contains('@'));
}

#[test]
fn rejects_unterminated_strings() {
    let err = tokenize("\"abc").expect_err("expected a lexical error");
    assert_eq!(err.code, "E_LEX");
    assert!(err.message.contains("Unterminated"));
}
