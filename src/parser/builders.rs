/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      builders.rs
 * Purpose:   Result builders. Each combinator takes one of these to turn
 *            sub-parse results into AST structure; since nodes are
 *            immutable, the builders rebuild rather than patch.
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

use crate::ast::{Node, NodeKind, NodeRef, Payload};
use crate::parser::state::{Build, ParseState, ParserRef};

// ---------------------------------------------------------------------
// Plumbing
// ---------------------------------------------------------------------

pub fn take_first() -> Build {
    Rc::new(|a: &ParseState, _b: &ParseState| a.node.clone())
}

pub fn take_second() -> Build {
    Rc::new(|_a: &ParseState, b: &ParseState| b.node.clone())
}

/// Wraps the second result in a logical not before handing both to the
/// inner builder. Used to desugar `unless` and `until`.
pub fn invert_second(inner: Build) -> Build {
    Rc::new(move |a: &ParseState, b: &ParseState| {
        let inverted = b.with_node(Some(Node::unary(NodeKind::Not, b.node.clone())));
        inner(a, &inverted)
    })
}

/// Rewrites the kind of whatever `p` produced (e.g. const-decl → var-decl).
pub fn alter_kind(p: ParserRef, kind: NodeKind) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        let res = p(curr);
        match (&res.ok, &res.node) {
            (true, Some(node)) => {
                let rebuilt = node.with_kind(kind);
                res.with_node(Some(rebuilt))
            }
            _ => res,
        }
    })
}

/// Wraps the produced node as the left child of a fresh node of `kind`.
pub fn nest_node(p: ParserRef, kind: NodeKind) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        let res = p(curr);
        if res.ok {
            let node = Node::binary(kind, res.node.clone(), None);
            res.with_node(Some(node))
        } else {
            res
        }
    })
}

/// Wraps the produced node as the right child of a fresh node of `kind`.
pub fn nest_right(p: ParserRef, kind: NodeKind) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        let res = p(curr);
        if res.ok {
            let node = Node::binary(kind, None, res.node.clone());
            res.with_node(Some(node))
        } else {
            res
        }
    })
}

/// Wraps the produced node into a one-element list literal.
pub fn listify(p: ParserRef) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        let res = p(curr);
        match (&res.ok, &res.node) {
            (true, Some(node)) => {
                let list = Rc::new(Node {
                    payload: Payload::Elems(vec![node.clone()]),
                    ..Node::new(NodeKind::List)
                });
                res.with_node(Some(list))
            }
            _ => res,
        }
    })
}

// ---------------------------------------------------------------------
// Atoms
// ---------------------------------------------------------------------

fn consumed_lexeme(state: &ParseState) -> Option<(String, usize)> {
    state
        .consumed
        .as_ref()
        .map(|t| (t.lexeme.clone(), t.line))
}

pub fn n_int(state: &ParseState) -> Option<NodeRef> {
    let (lexeme, line) = consumed_lexeme(state)?;
    let val = lexeme.parse::<i64>().ok()?;
    Some(Node::int(val).with_line(line))
}

pub fn n_float(state: &ParseState) -> Option<NodeRef> {
    let (lexeme, line) = consumed_lexeme(state)?;
    let val = lexeme.parse::<f64>().ok()?;
    Some(Node::float(val).with_line(line))
}

pub fn n_string(state: &ParseState) -> Option<NodeRef> {
    let (lexeme, line) = consumed_lexeme(state)?;
    Some(Node::string(lexeme).with_line(line))
}

pub fn n_identifier(state: &ParseState) -> Option<NodeRef> {
    let (lexeme, line) = consumed_lexeme(state)?;
    let node = Rc::new(Node {
        payload: Payload::Str(lexeme),
        ..Node::new(NodeKind::Identifier)
    });
    Some(node.with_line(line))
}

pub fn n_param(state: &ParseState) -> Option<NodeRef> {
    let (lexeme, line) = consumed_lexeme(state)?;
    let node = Rc::new(Node {
        payload: Payload::Str(lexeme),
        ..Node::new(NodeKind::Param)
    });
    Some(node.with_line(line))
}

pub fn n_true(state: &ParseState) -> Option<NodeRef> {
    let (_, line) = consumed_lexeme(state)?;
    Some(Node::boolean(true).with_line(line))
}

pub fn n_false(state: &ParseState) -> Option<NodeRef> {
    let (_, line) = consumed_lexeme(state)?;
    Some(Node::boolean(false).with_line(line))
}

pub fn n_null(state: &ParseState) -> Option<NodeRef> {
    let (_, line) = consumed_lexeme(state)?;
    Some(Node::null().with_line(line))
}

pub fn n_fail(state: &ParseState) -> Option<NodeRef> {
    let (_, line) = consumed_lexeme(state)?;
    Some(Node::fail().with_line(line))
}

pub fn n_success(state: &ParseState) -> Option<NodeRef> {
    let (_, line) = consumed_lexeme(state)?;
    Some(Node::success().with_line(line))
}

pub fn n_underscore(state: &ParseState) -> Option<NodeRef> {
    let (_, line) = consumed_lexeme(state)?;
    let node = Rc::new(Node {
        payload: Payload::Str(String::from("_")),
        ..Node::new(NodeKind::Underscore)
    });
    Some(node.with_line(line))
}

pub fn n_index(state: &ParseState) -> Option<NodeRef> {
    let (_, line) = consumed_lexeme(state)?;
    let node = Rc::new(Node {
        payload: Payload::Str(String::from("index")),
        ..Node::new(NodeKind::Index)
    });
    Some(node.with_line(line))
}

/// Empty slice marker for the `..end` form: the range operator itself
/// becomes a bare slice node and the builders attach the bounds.
pub fn n_slice_atom(state: &ParseState) -> Option<NodeRef> {
    let (_, line) = consumed_lexeme(state)?;
    Some(Node::leaf(NodeKind::Slice).with_line(line))
}

// ---------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------

/// op + rhs: hang the second result on the operator's right slot, keeping
/// whatever payload or left child the operator node already carries.
pub fn n_rhs() -> Build {
    Rc::new(|op: &ParseState, rhs: &ParseState| {
        let op_node = op.node.as_ref()?;
        let rhs_node = rhs.node.clone()?;
        Some(op_node.with_right(Some(rhs_node)))
    })
}

/// op + lhs-to-be: hang the second result on the operator's LEFT slot.
/// Used for statement heads (`if cond`, `while cond`, `for binding`).
pub fn n_lhs() -> Build {
    Rc::new(|op: &ParseState, lhs: &ParseState| {
        let op_node = op.node.as_ref()?;
        let lhs_node = lhs.node.clone()?;
        Some(op_node.with_left(Some(lhs_node)))
    })
}

/// lhs + partially-built operator: fill the operator's left slot.
pub fn n_binary() -> Build {
    Rc::new(|lhs: &ParseState, rest: &ParseState| {
        let lhs_node = lhs.node.clone()?;
        let rest_node = rest.node.as_ref()?;
        Some(rest_node.with_left(Some(lhs_node)))
    })
}

/// rhs + operator-with-left: fill the operator's RIGHT slot. The postfix
/// conditional parses its value first, so the pieces arrive flipped.
pub fn n_binary_flip() -> Build {
    Rc::new(|rhs: &ParseState, op: &ParseState| {
        let rhs_node = rhs.node.clone()?;
        let op_node = op.node.as_ref()?;
        Some(op_node.with_right(Some(rhs_node)))
    })
}

/// Conditional with an optional else. Without an else the then-node passes
/// through; with one, the two branches nest under a then-branch node.
pub fn n_else() -> Build {
    Rc::new(|cond: &ParseState, fallback: &ParseState| {
        let if_node = cond.node.as_ref()?;
        match &fallback.node {
            None => Some(if_node.clone()),
            Some(else_node) => {
                let branches = Node::binary(
                    NodeKind::ThenBranch,
                    if_node.right.clone(),
                    Some(else_node.clone()),
                );
                Some(Node::binary(
                    NodeKind::If,
                    if_node.left.clone(),
                    Some(branches),
                ))
            }
        }
    })
}

/// Left-associative fold step: the accumulated tree becomes the left child
/// of the newest operator node.
pub fn n_left_assoc() -> Build {
    Rc::new(|prev: &ParseState, rhs: &ParseState| {
        let prev_node = prev.node.clone()?;
        let rhs_node = rhs.node.as_ref()?;
        Some(rhs_node.with_left(Some(prev_node)))
    })
}

/// Grafts the leftmost operand onto a finished left-associative chain by
/// walking down the left spine to the first empty slot.
pub fn n_end_left_assoc() -> Build {
    Rc::new(|lhs: &ParseState, root: &ParseState| {
        let lhs_node = lhs.node.clone()?;
        let root_node = root.node.as_ref()?;
        Some(graft_leftmost(root_node, lhs_node))
    })
}

fn graft_leftmost(root: &NodeRef, lhs: NodeRef) -> NodeRef {
    match &root.left {
        Some(l) => root.with_left(Some(graft_leftmost(l, lhs))),
        None => root.with_left(Some(lhs)),
    }
}

/// Appends the second result at the end of the first result's right-linked
/// chain (params, args, object items, statements).
pub fn n_linked() -> Build {
    Rc::new(|curr: &ParseState, next: &ParseState| {
        let head = curr.node.as_ref()?;
        match &next.node {
            None => Some(head.clone()),
            Some(tail) => Some(append_chain(head, tail.clone())),
        }
    })
}

fn append_chain(node: &NodeRef, tail: NodeRef) -> NodeRef {
    match &node.right {
        Some(r) => node.with_right(Some(append_chain(r, tail))),
        None => node.with_right(Some(tail)),
    }
}

/// Nests a chain of prefix operators: each new operator (or the final
/// operand) slots into the innermost empty right child.
pub fn n_unary_nested() -> Build {
    Rc::new(|curr: &ParseState, next: &ParseState| {
        let head = curr.node.as_ref()?;
        let tail = next.node.clone()?;
        Some(append_chain(head, tail))
    })
}

/// Postfix unary: the operand ends up under the operator.
pub fn n_unary_post() -> Build {
    Rc::new(|lhs: &ParseState, op: &ParseState| {
        let lhs_node = lhs.node.clone()?;
        let op_node = op.node.as_ref()?;
        Some(op_node.with_right(Some(lhs_node)))
    })
}

// ---------------------------------------------------------------------
// Slices and ranges
// ---------------------------------------------------------------------

/// `a..b` or `a..` inside brackets: both bounds (the second may be absent).
pub fn n_slice() -> Build {
    Rc::new(|start: &ParseState, end: &ParseState| {
        let start_node = start.node.clone()?;
        Some(Node::binary(
            NodeKind::Slice,
            Some(start_node),
            end.node.clone(),
        ))
    })
}

pub fn n_range() -> Build {
    Rc::new(|start: &ParseState, end: &ParseState| {
        let start_node = start.node.clone()?;
        let end_node = end.node.clone()?;
        Some(Node::binary(
            NodeKind::Range,
            Some(start_node),
            Some(end_node),
        ))
    })
}

/// `..end` with no start.
pub fn n_range_end() -> Build {
    Rc::new(|_op: &ParseState, end: &ParseState| {
        let end_node = end.node.clone()?;
        Some(Node::unary(NodeKind::Range, Some(end_node)))
    })
}

// ---------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------

pub fn n_kv_pair() -> Build {
    Rc::new(|key: &ParseState, value: &ParseState| {
        let key_node = key.node.clone()?;
        let value_node = value.node.clone()?;
        Some(Node::binary(
            NodeKind::KVPair,
            Some(key_node),
            Some(value_node),
        ))
    })
}

/// Empty object literal.
pub fn n_object() -> Build {
    Rc::new(|_a: &ParseState, _b: &ParseState| Some(Node::leaf(NodeKind::Object)))
}

/// Empty parameter list.
pub fn n_empty_params() -> Build {
    Rc::new(|_a: &ParseState, _b: &ParseState| Some(Node::leaf(NodeKind::Param)))
}

pub fn n_empty_list() -> Build {
    Rc::new(|_a: &ParseState, _b: &ParseState| {
        Some(Rc::new(Node {
            payload: Payload::Elems(Vec::new()),
            ..Node::new(NodeKind::List)
        }))
    })
}

/// Extends a list literal with one more element.
pub fn n_list_tail() -> Build {
    Rc::new(|prev: &ParseState, curr: &ParseState| {
        let prev_node = prev.node.as_ref()?;
        let curr_node = curr.node.clone()?;

        if let Payload::Elems(items) = &prev_node.payload {
            let mut extended = items.clone();
            extended.push(curr_node);
            return Some(Rc::new(Node {
                payload: Payload::Elems(extended),
                ..Node::new(NodeKind::List)
            }));
        }

        Some(Rc::new(Node {
            payload: Payload::Elems(vec![prev_node.clone(), curr_node]),
            ..Node::new(NodeKind::List)
        }))
    })
}

/// Joins the one-element head list with the folded tail.
pub fn n_list_head() -> Build {
    Rc::new(|head: &ParseState, tail: &ParseState| {
        let head_node = head.node.as_ref()?;
        let tail_node = tail.node.as_ref()?;

        let head_items = match &head_node.payload {
            Payload::Elems(items) => items.clone(),
            _ => return None,
        };

        let mut items = head_items;
        match &tail_node.payload {
            Payload::Elems(tail_items) if tail_node.kind == NodeKind::List => {
                items.extend(tail_items.iter().cloned());
            }
            _ => items.push(tail_node.clone()),
        }

        Some(Rc::new(Node {
            payload: Payload::Elems(items),
            ..Node::new(NodeKind::List)
        }))
    })
}

// ---------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------

/// assignment-op + rhs. Compound operators arrive carrying the bare binary
/// operator on their right; the expression slots under it, and the target
/// is filled in by `n_assignment`.
pub fn n_assignment_rhs() -> Build {
    Rc::new(|op: &ParseState, rhs: &ParseState| {
        let op_node = op.node.as_ref()?;
        let rhs_node = rhs.node.clone()?;

        match &op_node.right {
            Some(binop) => {
                let filled = binop.with_right(Some(rhs_node));
                Some(op_node.with_right(Some(filled)))
            }
            None => Some(op_node.with_right(Some(rhs_node))),
        }
    })
}

/// target + assignment. For compound assignment the target doubles as the
/// left operand of the underlying binary operator.
pub fn n_assignment() -> Build {
    Rc::new(|target: &ParseState, op: &ParseState| {
        let target_node = target.node.clone()?;
        let op_node = op.node.as_ref()?;
        let rhs = op_node.right.as_ref()?;

        let rhs = match rhs.kind {
            NodeKind::Add
            | NodeKind::Sub
            | NodeKind::Mul
            | NodeKind::Div
            | NodeKind::Mod
            | NodeKind::Fallback
                if rhs.left.is_none() =>
            {
                rhs.with_left(Some(target_node.clone()))
            }
            _ => rhs.clone(),
        };

        Some(Node::binary(
            NodeKind::Assign,
            Some(target_node),
            Some(rhs),
        ))
    })
}

// ---------------------------------------------------------------------
// Imports
// ---------------------------------------------------------------------

pub fn n_import() -> Build {
    Rc::new(|_kw: &ParseState, path: &ParseState| {
        let path_node = path.node.as_ref()?;
        let path_str = path_node.as_str()?.to_string();
        let node = Rc::new(Node {
            payload: Payload::Str(path_str),
            line: path_node.line,
            ..Node::new(NodeKind::Import)
        });
        Some(node)
    })
}
