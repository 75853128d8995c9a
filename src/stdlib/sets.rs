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

use std::collections::HashMap;

use crate::ast::{Node, NodeKind, NodeRef, ValueKey};
use crate::environment::EnvRef;
use crate::error::RyeError;
use crate::stdlib::check_arity;

fn set_pair(
    args: &[NodeRef],
) -> Option<(HashMap<ValueKey, bool>, HashMap<ValueKey, bool>)> {
    if args[0].kind != NodeKind::Set || args[1].kind != NodeKind::Set {
        return None;
    }
    let a = args[0].as_set()?.borrow().clone();
    let b = args[1].as_set()?.borrow().clone();
    Some((a, b))
}

fn present(map: &HashMap<ValueKey, bool>, key: &ValueKey) -> bool {
    *map.get(key).unwrap_or(&false)
}

/// union/intersection/difference return fresh sets; their inputs are not
/// modified. Tombstoned members do not carry over.
pub fn union(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("union", args, 2)?;

    let (a, b) = match set_pair(args) {
        Some(pair) => pair,
        None => return Ok(Node::fail()),
    };

    let mut result: HashMap<ValueKey, bool> = HashMap::new();
    for (k, p) in a.iter().chain(b.iter()) {
        if *p {
            result.insert(k.clone(), true);
        }
    }

    Ok(Node::set(result))
}

pub fn intersection(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("intersection", args, 2)?;

    let (a, b) = match set_pair(args) {
        Some(pair) => pair,
        None => return Ok(Node::fail()),
    };

    let mut result: HashMap<ValueKey, bool> = HashMap::new();
    for (k, p) in &a {
        if *p && present(&b, k) {
            result.insert(k.clone(), true);
        }
    }

    Ok(Node::set(result))
}

pub fn difference(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("difference", args, 2)?;

    let (a, b) = match set_pair(args) {
        Some(pair) => pair,
        None => return Ok(Node::fail()),
    };

    let mut result: HashMap<ValueKey, bool> = HashMap::new();
    for (k, p) in &a {
        if *p && !present(&b, k) {
            result.insert(k.clone(), true);
        }
    }

    Ok(Node::set(result))
}

/// add/remove mutate the set in place; the change is observable through
/// every reference to it. remove tombstones rather than deletes.
pub fn add(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("add", args, 2)?;

    let members = match args[0].as_set() {
        Some(m) if args[0].kind == NodeKind::Set => m,
        _ => return Ok(Node::fail()),
    };

    members.borrow_mut().insert(args[1].to_value_key(), true);
    Ok(args[0].clone())
}

pub fn remove(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("remove", args, 2)?;

    let members = match args[0].as_set() {
        Some(m) if args[0].kind == NodeKind::Set => m,
        _ => return Ok(Node::fail()),
    };

    members.borrow_mut().insert(args[1].to_value_key(), false);
    Ok(args[0].clone())
}
