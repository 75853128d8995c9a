/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      scanner.rs
 * Purpose:   Converts raw source text into the token stream consumed by the
 *            parser. Pure function of the input: no I/O, no global state.
 *
 * License:
 * This file is part of the Rye programming language project.
 *
 * Rye is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use crate::error::RyeError;
use crate::lexer::keywords::keyword_kind;
use crate::lexer::token::{Token, TokenKind};

/// Scans `source` into a token sequence terminating in `Eof`.
///
/// A synthetic newline token is emitted before every `}` and once more before
/// `Eof`, so statement terminators are implicit at block ends and at the end
/// of input. An unexpected character or an unterminated string aborts the
/// scan with a lexical error; no partial token stream is returned.
pub fn tokenize(source: &str) -> Result<Vec<Token>, RyeError> {
    let mut lexer = Lexer::new(source);
    lexer.scan_tokens()?;
    Ok(lexer.tokens)
}

struct Lexer {
    chars: Vec<char>,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            current: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    fn scan_tokens(&mut self) -> Result<(), RyeError> {
        while !self.is_at_end() {
            self.scan_token()?;
        }

        self.push(TokenKind::NewLine, "");
        self.push(TokenKind::Eof, "");
        Ok(())
    }

    fn scan_token(&mut self) -> Result<(), RyeError> {
        let c = self.advance();

        match c {
            // whitespace
            '\n' => {
                self.push(TokenKind::NewLine, "");
                self.line += 1;
            }
            '\t' | '\r' | ' ' => {}

            // single character tokens
            '(' | ')' | '{' | '}' | '[' | ']' | ';' | ',' | '?' | '^' | '#' => {
                let kind = one_char_kind(c).expect("single-char token table");
                if kind == TokenKind::RightBrace {
                    // implicit statement terminator at the end of a block
                    self.push(TokenKind::NewLine, "");
                }
                self.push(kind, c.to_string());
            }

            // one- or two-character operators; two-character forms win
            '!' | '=' | '>' | '<' | ':' | '-' | '+' | '/' | '*' | '%' | '|' => {
                let next = self.peek();
                if let Some(kind) = next.and_then(|n| two_char_kind(c, n)) {
                    if kind == TokenKind::Comment {
                        self.skip_comment();
                    } else {
                        let lexeme = format!("{}{}", c, next.unwrap());
                        self.advance();
                        self.push(kind, lexeme);
                    }
                } else if let Some(kind) = one_char_kind(c) {
                    self.push(kind, c.to_string());
                } else {
                    return Err(self.unexpected(c));
                }
            }

            // '.' is the dot operator, '..', '...', or the start of a float
            '.' => match self.peek() {
                Some('.') => {
                    self.advance();
                    if self.peek() == Some('.') {
                        self.advance();
                        self.push(TokenKind::DotDotDot, "...");
                    } else {
                        self.push(TokenKind::DotDot, "..");
                    }
                }
                Some(n) if n.is_ascii_digit() => {
                    let digits = self.scan_digits();
                    self.push(TokenKind::Float, format!(".{}", digits));
                }
                _ => self.push(TokenKind::Dot, "."),
            },

            '"' => self.scan_string()?,

            _ => {
                if c.is_ascii_digit() {
                    self.scan_number(c);
                } else if is_alpha(c) {
                    self.scan_word(c);
                } else {
                    return Err(self.unexpected(c));
                }
            }
        }

        Ok(())
    }

    /// Digit run, optionally followed by `.` and a fractional digit run. If
    /// the dot is itself followed by another dot, the integer is emitted
    /// without consuming the range operator.
    fn scan_number(&mut self, first: char) {
        let mut lexeme = String::from(first);
        lexeme.push_str(&self.scan_digits());

        if self.peek() == Some('.') && self.peek_at(1) != Some('.') {
            self.advance();
            lexeme.push('.');
            lexeme.push_str(&self.scan_digits());
            self.push(TokenKind::Float, lexeme);
        } else {
            self.push(TokenKind::Int, lexeme);
        }
    }

    fn scan_digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.advance();
        }
        digits
    }

    fn scan_word(&mut self, first: char) {
        let mut word = String::from(first);
        while let Some(c) = self.peek() {
            if !is_alpha_numeric(c) {
                break;
            }
            word.push(c);
            self.advance();
        }

        match keyword_kind(&word) {
            Some(kind) => self.push(kind, word),
            None => self.push(TokenKind::Identifier, word),
        }
    }

    /// Strings may span lines; `\` escapes the next character. Reaching the
    /// end of input before the closing quote is a lexical error.
    fn scan_string(&mut self) -> Result<(), RyeError> {
        let start_line = self.line;
        let mut value = String::new();

        while let Some(c) = self.peek() {
            self.advance();
            match c {
                '"' => {
                    self.push(TokenKind::Str, value);
                    return Ok(());
                }
                '\\' => match self.peek() {
                    Some(escaped) => {
                        self.advance();
                        value.push(unescape(escaped));
                        if escaped == '\n' {
                            self.line += 1;
                        }
                    }
                    None => break,
                },
                '\n' => {
                    self.line += 1;
                    value.push(c);
                }
                _ => value.push(c),
            }
        }

        Err(RyeError::lex_error(
            format!("Unterminated string starting on line {}", start_line),
            start_line,
        ))
    }

    /// `//` runs to the end of the line; the newline itself is left for the
    /// main loop so it still terminates the statement.
    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn unexpected(&self, c: char) -> RyeError {
        RyeError::lex_error(
            format!("Unexpected character \"{}\"", c),
            self.line,
        )
    }

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>) {
        self.tokens.push(Token::new(kind, self.line, lexeme));
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.current).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.current + offset).copied()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alpha_numeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

fn one_char_kind(c: char) -> Option<TokenKind> {
    match c {
        '(' => Some(TokenKind::LeftParen),
        ')' => Some(TokenKind::RightParen),
        '{' => Some(TokenKind::LeftBrace),
        '}' => Some(TokenKind::RightBrace),
        '[' => Some(TokenKind::LeftBracket),
        ']' => Some(TokenKind::RightBracket),
        ':' => Some(TokenKind::Colon),
        ',' => Some(TokenKind::Comma),
        '.' => Some(TokenKind::Dot),
        '-' => Some(TokenKind::Minus),
        '+' => Some(TokenKind::Plus),
        ';' => Some(TokenKind::Semicolon),
        '/' => Some(TokenKind::Slash),
        '*' => Some(TokenKind::Star),
        '%' => Some(TokenKind::Modulo),
        '!' => Some(TokenKind::Bang),
        '=' => Some(TokenKind::Equal),
        '>' => Some(TokenKind::Greater),
        '<' => Some(TokenKind::Less),
        '?' => Some(TokenKind::QuestionMark),
        '|' => Some(TokenKind::Bar),
        '#' => Some(TokenKind::Hash),
        '^' => Some(TokenKind::Caret),
        _ => None,
    }
}

fn two_char_kind(a: char, b: char) -> Option<TokenKind> {
    match (a, b) {
        ('=', '>') => Some(TokenKind::Arrow),
        ('<', '-') => Some(TokenKind::LeftArrow),
        ('!', '=') => Some(TokenKind::BangEqual),
        ('=', '=') => Some(TokenKind::EqualEqual),
        ('>', '=') => Some(TokenKind::GreaterEqual),
        ('<', '=') => Some(TokenKind::LessEqual),
        (':', '=') => Some(TokenKind::ColonEqual),
        ('-', '=') => Some(TokenKind::MinusEqual),
        ('+', '=') => Some(TokenKind::PlusEqual),
        ('/', '=') => Some(TokenKind::SlashEqual),
        ('*', '=') => Some(TokenKind::StarEqual),
        ('%', '=') => Some(TokenKind::ModuloEqual),
        ('|', '=') => Some(TokenKind::BarEqual),
        ('|', '>') => Some(TokenKind::Pipe),
        ('/', '/') => Some(TokenKind::Comment),
        _ => None,
    }
}
