/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      helpers.rs
 * Purpose:   Shared evaluation machinery: truthiness, numeric coercion,
 *            equality, identifier resolution, and collection iteration.
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

use crate::ast::{Node, NodeKind, NodeRef};
use crate::environment::{EnvRef, Environment};
use crate::error::RyeError;

/// The common kind two operands coerce to before arithmetic or comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    Int,
    Float,
    Str,
    List,
    Bool,
    Success,
    Fail,
    Null,
    Incompatible,
}

/// `fail`, `null`, `false`, `0`, `0.0`, and `""` are falsy; everything else
/// (including empty collections) is truthy.
pub fn is_truthy(n: &NodeRef) -> bool {
    match n.kind {
        NodeKind::Success => true,
        NodeKind::Fail => false,
        NodeKind::Null => false,
        NodeKind::Bool => n.as_bool().unwrap_or(false),
        NodeKind::Int => n.as_int().unwrap_or(0) != 0,
        NodeKind::Float => n.as_float().unwrap_or(0.0) != 0.0,
        NodeKind::Str => !n.as_str().unwrap_or("").is_empty(),
        _ => true,
    }
}

/// Coerces two operands to a common kind: int pairs stay int, mixed numbers
/// promote to float, and a number next to a string takes its printed form.
/// Anything else is incompatible.
pub fn maybe_cast_numbers(a: &NodeRef, b: &NodeRef) -> (NodeRef, NodeRef, CastKind) {
    if a.kind == b.kind {
        let kind = match a.kind {
            NodeKind::Int => CastKind::Int,
            NodeKind::Float => CastKind::Float,
            NodeKind::Str => CastKind::Str,
            NodeKind::List => CastKind::List,
            NodeKind::Bool => CastKind::Bool,
            NodeKind::Success => CastKind::Success,
            NodeKind::Fail => CastKind::Fail,
            NodeKind::Null => CastKind::Null,
            _ => CastKind::Incompatible,
        };
        return (a.clone(), b.clone(), kind);
    }

    match (a.kind, b.kind) {
        (NodeKind::Int, NodeKind::Float) => (
            Node::float(a.as_int().unwrap_or(0) as f64),
            b.clone(),
            CastKind::Float,
        ),
        (NodeKind::Float, NodeKind::Int) => (
            a.clone(),
            Node::float(b.as_int().unwrap_or(0) as f64),
            CastKind::Float,
        ),
        (NodeKind::Str, NodeKind::Int) | (NodeKind::Str, NodeKind::Float) => {
            (a.clone(), Node::string(b.to_sexpr()), CastKind::Str)
        }
        (NodeKind::Int, NodeKind::Str) | (NodeKind::Float, NodeKind::Str) => {
            (Node::string(a.to_sexpr()), b.clone(), CastKind::Str)
        }
        _ => (a.clone(), b.clone(), CastKind::Incompatible),
    }
}

/// Structural equality after numeric coercion. Lists compare element-wise.
/// Incomparable kinds are an error, which callers soften into `fail`.
pub fn eval_equality(a: &NodeRef, b: &NodeRef) -> Result<bool, RyeError> {
    let (l, r, kind) = maybe_cast_numbers(a, b);
    match kind {
        CastKind::Int => Ok(l.as_int() == r.as_int()),
        CastKind::Float => Ok(l.as_float() == r.as_float()),
        CastKind::Str => Ok(l.as_str() == r.as_str()),
        CastKind::Bool => Ok(l.as_bool() == r.as_bool()),
        CastKind::Success | CastKind::Fail | CastKind::Null => Ok(true),
        CastKind::List => {
            let left_items = l.as_list().map(|v| v.borrow().clone()).unwrap_or_default();
            let right_items = r.as_list().map(|v| v.borrow().clone()).unwrap_or_default();
            if left_items.len() != right_items.len() {
                return Ok(false);
            }
            for (x, y) in left_items.iter().zip(right_items.iter()) {
                if !eval_equality(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        CastKind::Incompatible => Err(RyeError::runtime_error("Cannot compare types", 0)),
    }
}

/// Walks the environment chain for the identifier's name.
pub fn resolve_identifier(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let ident = n.name().unwrap_or("");
    match Environment::lookup(env, ident) {
        Some(val) => Ok(val),
        None => Err(RyeError::reference_error(
            format!("\"{}\" is undefined", ident),
            n.line,
        )),
    }
}

pub fn new_scope(parent: &EnvRef) -> EnvRef {
    Environment::new(Some(parent.clone()))
}

/// Snapshots the iterable members of a collection: list elements in order,
/// object keys, or the present members of a set. `None` when the value is
/// not iterable.
pub fn collection_items(n: &NodeRef) -> Option<Vec<NodeRef>> {
    match n.kind {
        NodeKind::List => n.as_list().map(|items| items.borrow().clone()),
        NodeKind::Object => n.as_object().map(|fields| {
            fields
                .borrow()
                .keys()
                .map(|k| k.to_node())
                .collect::<Vec<_>>()
        }),
        NodeKind::Set => n.as_set().map(|members| {
            members
                .borrow()
                .iter()
                .filter(|(_, present)| **present)
                .map(|(k, _)| k.to_node())
                .collect::<Vec<_>>()
        }),
        _ => None,
    }
}
