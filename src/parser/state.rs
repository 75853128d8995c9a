/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      state.rs
 * Purpose:   The parse state threaded through every combinator, plus the
 *            primitive token-level parsers that everything else is built
 *            from.
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

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Node, NodeKind, NodeRef};
use crate::lexer::token::{Token, TokenKind};

/// A parser is a function from parse state to parse state. On success the
/// new state carries an advanced cursor and possibly a built node; on
/// failure it carries an error message and the ORIGINAL cursor, so failed
/// alternatives never consume input.
pub type ParserRef = Rc<dyn Fn(ParseState) -> ParseState>;

/// A result builder: combines the states of two sub-parses into a node.
/// Returning `None` signals a malformed parse result, which the combinators
/// turn into a hard parse failure.
pub type Build = Rc<dyn Fn(&ParseState, &ParseState) -> Option<NodeRef>>;

/// A builder for single-token parses, fed the state whose `consumed` field
/// holds the matched token.
pub type AtomBuild = fn(&ParseState) -> Option<NodeRef>;

/// Cheap cursor over a shared token vector.
#[derive(Clone)]
pub struct TokenStream {
    tokens: Rc<Vec<Token>>,
    pos: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: Rc::new(tokens),
            pos: 0,
        }
    }

    pub fn first(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn advance(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            pos: self.pos + 1,
        }
    }

    pub fn skip_newlines(&self) -> Self {
        let mut pos = self.pos;
        while matches!(self.tokens.get(pos), Some(t) if t.kind == TokenKind::NewLine) {
            pos += 1;
        }
        Self {
            tokens: self.tokens.clone(),
            pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

/// The state threaded through the combinator engine.
#[derive(Clone)]
pub struct ParseState {
    pub ok: bool,
    pub err: String,
    pub node: Option<NodeRef>,
    pub consumed: Option<Token>,
    pub rest: TokenStream,
}

impl ParseState {
    pub fn start(tokens: Vec<Token>) -> Self {
        Self {
            ok: true,
            err: String::new(),
            node: None,
            consumed: None,
            rest: TokenStream::new(tokens),
        }
    }

    pub fn succeeded(node: Option<NodeRef>, rest: TokenStream) -> Self {
        Self {
            ok: true,
            err: String::new(),
            node,
            consumed: None,
            rest,
        }
    }

    pub fn failed(err: impl Into<String>, rest: TokenStream) -> Self {
        Self {
            ok: false,
            err: err.into(),
            node: None,
            consumed: None,
            rest,
        }
    }

    pub fn with_node(&self, node: Option<NodeRef>) -> Self {
        Self {
            node,
            ..self.clone()
        }
    }
}

/// A forward reference to a grammar rule. The grammar has cycles
/// (expression → primary → parenthesized expression → expression), so every
/// cyclic non-terminal gets a slot that is addressable before its body is
/// defined and filled in during grammar construction.
#[derive(Clone, Default)]
pub struct RuleRef {
    slot: Rc<RefCell<Option<ParserRef>>>,
}

impl RuleRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser that defers to the slot's contents at call time.
    pub fn parser(&self) -> ParserRef {
        let slot = self.slot.clone();
        Rc::new(move |state: ParseState| {
            let p = slot
                .borrow()
                .clone()
                .expect("grammar rule used before definition");
            p(state)
        })
    }

    pub fn define(&self, p: ParserRef) {
        *self.slot.borrow_mut() = Some(p);
    }
}

/// Parses a single token of kind `kind`, building a node with `build` when
/// one is supplied.
pub fn token(kind: TokenKind, build: Option<AtomBuild>) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }
        match curr.rest.first() {
            None => ParseState::failed("Tokens exhausted", curr.rest.clone()),
            Some(t) if t.kind == kind => {
                let mut state = ParseState {
                    ok: true,
                    err: String::new(),
                    node: None,
                    consumed: Some(t.clone()),
                    rest: curr.rest.advance(),
                };
                if let Some(n) = build {
                    match n(&state) {
                        Some(node) => state.node = Some(node),
                        None => {
                            return ParseState::failed("malformed parse result", curr.rest.clone())
                        }
                    }
                }
                state
            }
            Some(_) => ParseState::failed(
                format!("Expected {}", kind.descriptor()),
                curr.rest.clone(),
            ),
        }
    })
}

/// Maps binary/statement operator tokens onto the node kind their
/// expression will carry.
fn operator_kind(kind: TokenKind) -> Option<NodeKind> {
    match kind {
        TokenKind::BangEqual => Some(NodeKind::NotEqual),
        TokenKind::DotDot => Some(NodeKind::Range),
        TokenKind::Equal => Some(NodeKind::Assign),
        TokenKind::EqualEqual => Some(NodeKind::Equal),
        TokenKind::Greater => Some(NodeKind::Greater),
        TokenKind::GreaterEqual => Some(NodeKind::GreaterEqual),
        TokenKind::Less => Some(NodeKind::Less),
        TokenKind::LessEqual => Some(NodeKind::LessEqual),
        TokenKind::Bar => Some(NodeKind::Fallback),
        TokenKind::Plus => Some(NodeKind::Add),
        TokenKind::Minus => Some(NodeKind::Sub),
        TokenKind::Star => Some(NodeKind::Mul),
        TokenKind::Slash => Some(NodeKind::Div),
        TokenKind::Modulo => Some(NodeKind::Mod),
        TokenKind::Caret => Some(NodeKind::Power),
        TokenKind::In => Some(NodeKind::In),
        TokenKind::And => Some(NodeKind::And),
        TokenKind::Or => Some(NodeKind::Or),
        TokenKind::Pipe => Some(NodeKind::Pipe),
        TokenKind::Map => Some(NodeKind::Map),
        TokenKind::Where => Some(NodeKind::Where),
        TokenKind::Find => Some(NodeKind::Find),
        TokenKind::Fold => Some(NodeKind::Fold),
        TokenKind::If => Some(NodeKind::If),
        TokenKind::Unless => Some(NodeKind::If),
        TokenKind::Arrow => Some(NodeKind::Lambda),
        TokenKind::ColonEqual => Some(NodeKind::ConstDecl),
        TokenKind::LeftArrow => Some(NodeKind::ConstDecl),
        TokenKind::While => Some(NodeKind::While),
        TokenKind::Until => Some(NodeKind::While),
        TokenKind::For => Some(NodeKind::For),
        TokenKind::Break => Some(NodeKind::Break),
        TokenKind::Continue => Some(NodeKind::Continue),
        TokenKind::Index => Some(NodeKind::Index),
        _ => None,
    }
}

/// Parses a binary or statement operator, producing a bare node of the
/// matching kind for the result builders to flesh out.
pub fn operator(kind: TokenKind) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }
        match curr.rest.first() {
            None => ParseState::failed("Tokens exhausted", curr.rest.clone()),
            Some(t) if t.kind == kind => match operator_kind(kind) {
                Some(nk) => {
                    let node = Node::leaf(nk).with_line(t.line);
                    ParseState {
                        ok: true,
                        err: String::new(),
                        node: Some(node),
                        consumed: Some(t.clone()),
                        rest: curr.rest.advance(),
                    }
                }
                None => ParseState::failed("Unknown operator", curr.rest.clone()),
            },
            Some(_) => ParseState::failed("No match", curr.rest.clone()),
        }
    })
}

fn unary_operator_kind(kind: TokenKind) -> Option<NodeKind> {
    match kind {
        TokenKind::Minus => Some(NodeKind::Neg),
        TokenKind::Bang => Some(NodeKind::Not),
        TokenKind::Hash => Some(NodeKind::Cardinality),
        TokenKind::QuestionMark => Some(NodeKind::Maybe),
        _ => None,
    }
}

/// Parses a unary operator (prefix `- ! #`, postfix `?`).
pub fn operator_unary(kind: TokenKind) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }
        match curr.rest.first() {
            None => ParseState::failed("Tokens exhausted", curr.rest.clone()),
            Some(t) if t.kind == kind => match unary_operator_kind(kind) {
                Some(nk) => {
                    let node = Node::leaf(nk).with_line(t.line);
                    ParseState {
                        ok: true,
                        err: String::new(),
                        node: Some(node),
                        consumed: Some(t.clone()),
                        rest: curr.rest.advance(),
                    }
                }
                None => ParseState::failed("Unknown operator", curr.rest.clone()),
            },
            Some(_) => ParseState::failed("No match", curr.rest.clone()),
        }
    })
}

fn compound_assign_kind(kind: TokenKind) -> Option<NodeKind> {
    match kind {
        TokenKind::MinusEqual => Some(NodeKind::Sub),
        TokenKind::PlusEqual => Some(NodeKind::Add),
        TokenKind::SlashEqual => Some(NodeKind::Div),
        TokenKind::StarEqual => Some(NodeKind::Mul),
        TokenKind::ModuloEqual => Some(NodeKind::Mod),
        TokenKind::BarEqual => Some(NodeKind::Fallback),
        _ => None,
    }
}

/// Parses an assignment operator. Compound forms (`+=` and friends) come
/// back as an assignment node whose right child is the bare underlying
/// binary operator; the assignment builders fill in both operands later.
pub fn assign_operator(kind: TokenKind) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        if !curr.ok {
            return curr;
        }
        match curr.rest.first() {
            None => ParseState::failed("Tokens exhausted", curr.rest.clone()),
            Some(t) if t.kind == kind => {
                let node = if kind == TokenKind::Equal {
                    Node::leaf(NodeKind::Assign).with_line(t.line)
                } else {
                    match compound_assign_kind(kind) {
                        Some(op) => Node::unary(NodeKind::Assign, Some(Node::leaf(op)))
                            .with_line(t.line),
                        None => return ParseState::failed("Unknown operator", curr.rest.clone()),
                    }
                };
                ParseState {
                    ok: true,
                    err: String::new(),
                    node: Some(node),
                    consumed: Some(t.clone()),
                    rest: curr.rest.advance(),
                }
            }
            Some(_) => ParseState::failed("No match", curr.rest.clone()),
        }
    })
}
