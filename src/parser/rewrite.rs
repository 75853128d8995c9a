/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      rewrite.rs
 * Purpose:   The implicit-lambda rewrite. An expression containing the
 *            underscore placeholder, used where a callable is expected,
 *            becomes a one-parameter lambda over that placeholder.
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
use crate::parser::state::{ParseState, ParserRef};

/// Wraps `p` so that a successful parse is examined for the underscore
/// placeholder. If the produced expression contains an underscore atom and
/// no pipeline or statement nodes, it is replaced by a one-parameter lambda
/// whose parameter is the placeholder. A subexpression that already is a
/// lambda is never wrapped again.
pub fn implicit_lambda(p: ParserRef) -> ParserRef {
    Rc::new(move |curr: ParseState| {
        let res = p(curr);
        if !res.ok {
            return res;
        }

        match &res.node {
            Some(node) => match wrap_if_placeholder(node) {
                Some(wrapped) => res.with_node(Some(wrapped)),
                None => res,
            },
            None => res,
        }
    })
}

/// Breadth-first walk over the subtree. Pipeline operators and statement
/// chains disqualify the expression; an underscore anywhere else triggers
/// the wrap.
fn wrap_if_placeholder(root: &NodeRef) -> Option<NodeRef> {
    if root.kind == NodeKind::Lambda {
        return None;
    }

    let mut found_underscore = false;
    let mut queue: Vec<NodeRef> = vec![root.clone()];

    while let Some(n) = queue.pop() {
        match n.kind {
            NodeKind::Map | NodeKind::Where | NodeKind::Pipe | NodeKind::Stmt => return None,
            NodeKind::Underscore => found_underscore = true,
            _ => {}
        }

        if let Some(l) = &n.left {
            queue.push(l.clone());
        }
        if let Some(r) = &n.right {
            queue.push(r.clone());
        }
        if let Payload::Elems(items) = &n.payload {
            queue.extend(items.iter().cloned());
        }
    }

    if !found_underscore {
        return None;
    }

    let param = Rc::new(Node {
        payload: Payload::Str(String::from("_")),
        ..Node::new(NodeKind::Param)
    });

    Some(Node::binary(
        NodeKind::Lambda,
        Some(param),
        Some(root.clone()),
    ))
}
