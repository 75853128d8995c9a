/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      combinators.rs
 * Purpose:   The higher-order parser constructors. Every grammar rule is a
 *            composition of these; none of them know anything about the Rye
 *            grammar itself.
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

use std::rc::Rc;

use crate::lexer::token::TokenKind;
use crate::parser::state::{token, Build, ParseState, ParserRef};

/// (A B) — run `a`, then `b` on its output. The builder combines both
/// results. Failure of either side restores the input.
pub fn then(a: ParserRef, b: ParserRef, build: Option<Build>) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }

        let res_a = a(curr.clone());
        if !res_a.ok {
            return ParseState::failed(res_a.err, curr.rest);
        }

        let res_b = b(res_a.clone());
        if !res_b.ok {
            return ParseState::failed(res_b.err, curr.rest);
        }

        apply_build(&build, &res_a, &res_b, curr)
    })
}

/// (A B?) — like `then`, but when `b` fails after `a` succeeded, the result
/// is `a`'s state unchanged.
pub fn then_maybe(a: ParserRef, b: ParserRef, build: Option<Build>) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }

        let res_a = a(curr.clone());
        if !res_a.ok {
            return ParseState::failed(res_a.err, curr.rest);
        }

        let res_b = b(res_a.clone());
        if !res_b.ok {
            return res_a;
        }

        apply_build(&build, &res_a, &res_b, curr)
    })
}

/// (A !B) — succeed iff `a` succeeds and `b` immediately fails afterwards.
/// Consumes only what `a` consumed.
pub fn then_not(a: ParserRef, b: ParserRef) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }

        let res_a = a(curr.clone());
        if !res_a.ok {
            return ParseState::failed(res_a.err, curr.rest);
        }

        let res_b = b(res_a.clone());
        if res_b.ok {
            return ParseState::failed("Unexpected token", curr.rest);
        }

        res_a
    })
}

/// (A &B) — succeed iff both succeed, but consume only what `a` consumed.
pub fn then_peek(a: ParserRef, b: ParserRef, build: Option<Build>) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }

        let res_a = a(curr.clone());
        if !res_a.ok {
            return ParseState::failed(res_a.err, curr.rest);
        }

        let res_b = b(res_a.clone());
        if !res_b.ok {
            return ParseState::failed(res_b.err, curr.rest);
        }

        match &build {
            Some(n) => match n(&res_a, &res_b) {
                Some(node) => res_a.with_node(Some(node)),
                None => ParseState::failed("malformed parse result", curr.rest),
            },
            None => res_a,
        }
    })
}

/// (A | B) — first success wins; on both failing, restore the input.
pub fn either(a: ParserRef, b: ParserRef) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }

        let res_a = a(curr.clone());
        if res_a.ok {
            return res_a;
        }

        let res_b = b(curr.clone());
        if res_b.ok {
            return res_b;
        }

        ParseState::failed(String::new(), curr.rest)
    })
}

/// (A | B | C | ...) — ordered choice.
pub fn choice(ps: Vec<ParserRef>) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }

        for p in &ps {
            let res = p(curr.clone());
            if res.ok {
                return res;
            }
        }

        ParseState::failed(String::new(), curr.rest)
    })
}

/// A+ — one or more, left-folding successive results with the builder.
pub fn plus(p: ParserRef, build: Build) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }

        let mut prev = p(curr.clone());
        if !prev.ok {
            return ParseState::failed(prev.err, curr.rest);
        }

        loop {
            let res = p(prev.clone());
            if !res.ok {
                return prev;
            }
            match build(&prev, &res) {
                Some(node) => prev = res.with_node(Some(node)),
                None => return ParseState::failed("malformed parse result", curr.rest),
            }
        }
    })
}

/// A* — zero or more. Always succeeds; with no matches the incoming state
/// passes through untouched.
pub fn star(p: ParserRef, build: Build) -> ParserRef {
    let repeated = plus(p, build);
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }

        let res = repeated(curr.clone());
        if res.ok {
            res
        } else {
            curr
        }
    })
}

/// A? — try `p`; on failure succeed with no node and unchanged input.
pub fn maybe(p: ParserRef) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }

        let res = p(curr.clone());
        if res.ok {
            res
        } else {
            ParseState::succeeded(None, curr.rest)
        }
    })
}

/// &A — succeed iff `p` would, but consume nothing.
pub fn peek(p: ParserRef) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }

        let res = p(curr.clone());
        if res.ok {
            ParseState::succeeded(curr.node.clone(), curr.rest)
        } else {
            ParseState::failed(res.err, curr.rest)
        }
    })
}

/// Skips any leading newline tokens before attempting `p`.
pub fn skip_newlines(p: ParserRef) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return p(curr);
        }

        let mut state = curr;
        state.rest = state.rest.skip_newlines();
        p(state)
    })
}

/// `left` P `right` with newlines transparent just inside the delimiters.
pub fn wrapped(left: TokenKind, target: ParserRef, right: TokenKind) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }

        match curr.rest.first() {
            Some(t) if t.kind == left => {}
            _ => return ParseState::failed(format!("Expected {}", left.descriptor()), curr.rest),
        }

        let inner = ParseState::succeeded(None, curr.rest.advance().skip_newlines());
        let res = target(inner);
        if !res.ok {
            return ParseState::failed(res.err, curr.rest);
        }

        let rest = res.rest.skip_newlines();
        match rest.first() {
            Some(t) if t.kind == right => ParseState::succeeded(res.node, rest.advance()),
            _ => ParseState::failed(format!("Expected {}", right.descriptor()), curr.rest.clone()),
        }
    })
}

pub fn in_parens(p: ParserRef) -> ParserRef {
    wrapped(TokenKind::LeftParen, p, TokenKind::RightParen)
}

pub fn in_braces(p: ParserRef) -> ParserRef {
    wrapped(TokenKind::LeftBrace, p, TokenKind::RightBrace)
}

pub fn in_brackets(p: ParserRef) -> ParserRef {
    wrapped(TokenKind::LeftBracket, p, TokenKind::RightBracket)
}

/// One `p`, then zero or more `(',' p)`. `fold` combines consecutive tail
/// items; `finish` joins the head with the folded tail.
pub fn comma_separated(p: ParserRef, fold: Build, finish: Build) -> ParserRef {
    let tail = plus(
        then(token(TokenKind::Comma, None), p.clone(), Some(take_second_build())),
        fold,
    );
    then_maybe(p, tail, Some(finish))
}

fn take_second_build() -> Build {
    Rc::new(|_a: &ParseState, b: &ParseState| b.node.clone())
}

fn apply_build(
    build: &Option<Build>,
    res_a: &ParseState,
    res_b: &ParseState,
    curr: ParseState,
) -> ParseState {
    match build {
        Some(n) => match n(res_a, res_b) {
            Some(node) => res_b.with_node(Some(node)),
            None => ParseState::failed("malformed parse result", curr.rest),
        },
        None => res_b.clone(),
    }
}
