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
use crate::stdlib::{check_arity, check_arity_at_least};

fn cast_int(n: &NodeRef) -> Option<i64> {
    match n.kind {
        NodeKind::Int => n.as_int(),
        NodeKind::Float => n.as_float().map(|f| f as i64),
        _ => None,
    }
}

fn cast_float(n: &NodeRef) -> Option<f64> {
    match n.kind {
        NodeKind::Float => n.as_float(),
        NodeKind::Int => n.as_int().map(|i| i as f64),
        _ => None,
    }
}

/// Flattens a single list argument into the working argument slice.
fn spread_list_arg(args: &[NodeRef]) -> Vec<NodeRef> {
    if args.len() == 1 && args[0].kind == NodeKind::List {
        if let Some(items) = args[0].as_list() {
            return items.borrow().clone();
        }
    }
    args.to_vec()
}

/// sum of numbers or of one list of numbers; all-integer input stays
/// integer, anything mixed promotes to float.
pub fn sum(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity_at_least("sum", args, 1)?;
    let args = spread_list_arg(args);

    let all_ints = args.iter().all(|n| n.kind == NodeKind::Int);

    if all_ints {
        let mut total: i64 = 0;
        for n in &args {
            match cast_int(n) {
                Some(v) => total += v,
                None => return Ok(Node::fail()),
            }
        }
        return Ok(Node::int(total));
    }

    let mut total: f64 = 0.0;
    for n in &args {
        match cast_float(n) {
            Some(v) => total += v,
            None => return Ok(Node::fail()),
        }
    }
    Ok(Node::float(total))
}

pub fn max(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity_at_least("max", args, 1)?;
    extremum("max", args, |candidate, best| candidate > best)
}

pub fn min(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity_at_least("min", args, 1)?;
    extremum("min", args, |candidate, best| candidate < best)
}

fn extremum(
    _name: &str,
    args: &[NodeRef],
    better: fn(f64, f64) -> bool,
) -> Result<NodeRef, RyeError> {
    if args.len() == 1 && args[0].kind != NodeKind::List {
        return Ok(Node::fail());
    }
    let args = spread_list_arg(args);
    if args.is_empty() {
        return Ok(Node::fail());
    }

    let mut all_ints = true;
    let mut best = match cast_float(&args[0]) {
        Some(v) => {
            if args[0].kind != NodeKind::Int {
                all_ints = false;
            }
            v
        }
        None => return Ok(Node::fail()),
    };

    for n in &args[1..] {
        match cast_float(n) {
            Some(v) => {
                if n.kind != NodeKind::Int {
                    all_ints = false;
                }
                if better(v, best) {
                    best = v;
                }
            }
            None => return Ok(Node::fail()),
        }
    }

    if all_ints {
        Ok(Node::int(best as i64))
    } else {
        Ok(Node::float(best))
    }
}

/// A uniform float in [0, 1).
pub fn random(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("random", args, 0)?;
    Ok(Node::float(rand::random::<f64>()))
}
