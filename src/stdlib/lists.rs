/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
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
use crate::environment::EnvRef;
use crate::error::RyeError;
use crate::interpreter::calls::make_call;
use crate::interpreter::helpers::is_truthy;
use crate::interpreter::interpret;
use crate::stdlib::check_arity;

fn list_items(n: &NodeRef) -> Option<Vec<NodeRef>> {
    if n.kind != NodeKind::List {
        return None;
    }
    n.as_list().map(|v| v.borrow().clone())
}

/// Flattens one level of nesting; non-list elements pass through.
pub fn flat(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("flat", args, 1)?;

    let items = match list_items(&args[0]) {
        Some(items) => items,
        None => return Ok(Node::fail()),
    };

    let mut flattened = Vec::new();
    for item in items {
        match list_items(&item) {
            Some(inner) => flattened.extend(inner),
            None => flattened.push(item),
        }
    }

    Ok(Node::list(flattened))
}

/// find(list, predicate) — the first element the predicate accepts.
pub fn find(env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("find", args, 2)?;

    let items = match list_items(&args[0]) {
        Some(items) => items,
        None => return Ok(Node::fail()),
    };

    let predicate = &args[1];
    if predicate.kind != NodeKind::Lambda {
        return Ok(Node::fail());
    }

    for item in &items {
        let hit = interpret(&make_call(predicate, &[item.clone()]), env)?;
        if is_truthy(&hit) {
            return Ok(item.clone());
        }
    }

    Ok(Node::fail())
}

/// findIndex(list, predicate) — the index of the first accepted element.
pub fn find_index(env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("findIndex", args, 2)?;

    let items = match list_items(&args[0]) {
        Some(items) => items,
        None => return Ok(Node::fail()),
    };

    let predicate = &args[1];
    if predicate.kind != NodeKind::Lambda {
        return Ok(Node::fail());
    }

    for (i, item) in items.iter().enumerate() {
        let hit = interpret(&make_call(predicate, &[item.clone()]), env)?;
        if is_truthy(&hit) {
            return Ok(Node::int(i as i64));
        }
    }

    Ok(Node::fail())
}

/// Returns a fresh list with the element appended; the input list is not
/// modified.
pub fn append(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("append", args, 2)?;

    let mut items = match list_items(&args[0]) {
        Some(items) => items,
        None => return Ok(Node::fail()),
    };

    items.push(args[1].clone());
    Ok(Node::list(items))
}

pub fn reverse(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("reverse", args, 1)?;

    let mut items = match list_items(&args[0]) {
        Some(items) => items,
        None => return Ok(Node::fail()),
    };

    items.reverse();
    Ok(Node::list(items))
}
