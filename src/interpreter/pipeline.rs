/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      pipeline.rs
 * Purpose:   The higher-order pipeline operators: |> map where find fold.
 *            All of them resolve their callable once and then re-enter the
 *            evaluator with synthesized calls.
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

use std::collections::HashMap;

use crate::ast::{Node, NodeKind, NodeRef, ValueKey};
use crate::environment::EnvRef;
use crate::error::RyeError;
use crate::interpreter::calls::make_call;
use crate::interpreter::helpers::{collection_items, is_truthy, resolve_identifier};
use crate::interpreter::interpret;

/// Resolves the right operand of a pipeline operator to a callable value.
fn resolve_callable(callee: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    if callee.kind == NodeKind::Identifier {
        resolve_identifier(callee, env)
    } else {
        interpret(callee, env)
    }
}

/// Applies a resolved callable to evaluated argument values.
fn apply(lambda: &NodeRef, args: &[NodeRef], env: &EnvRef) -> Result<NodeRef, RyeError> {
    if let Some(f) = lambda.as_builtin() {
        return f(env, args);
    }
    interpret(&make_call(lambda, args), env)
}

/// Binds the reserved `index` counter in the ambient scope for the duration
/// of a traversal; cleared on completion.
fn set_index(env: &EnvRef, i: usize) {
    env.borrow_mut()
        .consts
        .insert(String::from("index"), Node::int(i as i64));
}

fn clear_index(env: &EnvRef) {
    env.borrow_mut().consts.remove("index");
    env.borrow_mut().consts.remove("_");
}

fn pipeline_parts<'a>(
    n: &'a NodeRef,
    env: &EnvRef,
) -> Result<(NodeRef, &'a NodeRef), RyeError> {
    let lhs_node = n
        .left
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing pipeline operand", n.line))?;
    let callee = n
        .right
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing pipeline callable", n.line))?;
    Ok((interpret(lhs_node, env)?, callee))
}

/// `coll map f` — applies `f` to each element, collecting into a list (for
/// list input) or set (for set input). Anything else fails softly.
pub fn interpret_map(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let (lhs, callee) = pipeline_parts(n, env)?;

    if lhs.kind != NodeKind::List && lhs.kind != NodeKind::Set {
        return Ok(Node::fail());
    }

    let lambda = resolve_callable(callee, env)?;
    if lambda.kind != NodeKind::Lambda {
        return Ok(Node::fail());
    }

    let items = collection_items(&lhs).unwrap_or_default();
    let mut new_list = Vec::new();
    let mut new_set: HashMap<ValueKey, bool> = HashMap::new();

    for (i, item) in items.iter().enumerate() {
        set_index(env, i);
        let mapped = apply(&lambda, &[item.clone()], env)?;

        if lhs.kind == NodeKind::List {
            new_list.push(mapped);
        } else {
            new_set.insert(mapped.to_value_key(), true);
        }
    }
    clear_index(env);

    if lhs.kind == NodeKind::Set {
        Ok(Node::set(new_set))
    } else {
        Ok(Node::list(new_list))
    }
}

/// `coll where f` — keeps the elements for which the application is truthy.
pub fn interpret_where(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let (lhs, callee) = pipeline_parts(n, env)?;

    if lhs.kind != NodeKind::List && lhs.kind != NodeKind::Set {
        return Ok(Node::fail());
    }

    let lambda = resolve_callable(callee, env)?;
    if lambda.kind != NodeKind::Lambda {
        return Ok(Node::fail());
    }

    let items = collection_items(&lhs).unwrap_or_default();
    let mut new_list = Vec::new();
    let mut new_set: HashMap<ValueKey, bool> = HashMap::new();

    for (i, item) in items.iter().enumerate() {
        set_index(env, i);
        let keep = apply(&lambda, &[item.clone()], env)?;

        if is_truthy(&keep) {
            if lhs.kind == NodeKind::List {
                new_list.push(item.clone());
            } else {
                new_set.insert(item.to_value_key(), true);
            }
        }
    }
    clear_index(env);

    if lhs.kind == NodeKind::Set {
        Ok(Node::set(new_set))
    } else {
        Ok(Node::list(new_list))
    }
}

/// `coll find f` — the first element whose application is truthy, or fail.
pub fn interpret_find(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let (lhs, callee) = pipeline_parts(n, env)?;

    if lhs.kind != NodeKind::List && lhs.kind != NodeKind::Set {
        return Ok(Node::fail());
    }

    let lambda = resolve_callable(callee, env)?;
    if lambda.kind != NodeKind::Lambda {
        return Ok(Node::fail());
    }

    let items = collection_items(&lhs).unwrap_or_default();
    for (i, item) in items.iter().enumerate() {
        set_index(env, i);
        let hit = apply(&lambda, &[item.clone()], env)?;
        if is_truthy(&hit) {
            clear_index(env);
            return Ok(item.clone());
        }
    }
    clear_index(env);

    Ok(Node::fail())
}

/// `coll fold f` — threads an accumulator through a two-parameter lambda.
/// The first element seeds the accumulator; an empty collection fails.
pub fn interpret_fold(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let (lhs, callee) = pipeline_parts(n, env)?;

    if lhs.kind != NodeKind::List && lhs.kind != NodeKind::Set {
        return Ok(Node::fail());
    }

    let lambda = resolve_callable(callee, env)?;
    if lambda.kind != NodeKind::Lambda {
        return Ok(Node::fail());
    }

    let items = collection_items(&lhs).unwrap_or_default();
    let mut iter = items.into_iter();
    let mut acc = match iter.next() {
        Some(first) => first,
        None => return Ok(Node::fail()),
    };

    for (i, item) in iter.enumerate() {
        set_index(env, i + 1);
        acc = apply(&lambda, &[acc, item], env)?;
    }
    clear_index(env);

    Ok(acc)
}

/// `a |> f` — threads a single value; `fail` short-circuits.
pub fn interpret_pipe(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let (lhs, callee) = pipeline_parts(n, env)?;

    if lhs.kind == NodeKind::Fail {
        return Ok(lhs);
    }

    let lambda = resolve_callable(callee, env)?;
    apply(&lambda, &[lhs], env)
}
