/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      expressions.rs
 * Purpose:   Evaluation of operator expressions, ranges, collection
 *            literals, and accessors. Most runtime mismatches degrade into
 *            the `fail` value rather than an error.
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
use crate::interpreter::helpers::{
    eval_equality, is_truthy, maybe_cast_numbers, CastKind,
};
use crate::interpreter::interpret;

fn missing_operand(n: &NodeRef, which: &str) -> RyeError {
    RyeError::runtime_error(
        format!(
            "Missing {} argument for operation \"{}\"",
            which,
            n.kind.descriptor()
        ),
        n.line,
    )
}

fn operands(n: &NodeRef, env: &EnvRef) -> Result<(NodeRef, NodeRef), RyeError> {
    let left = n.left.as_ref().ok_or_else(|| missing_operand(n, "first"))?;
    let right = n.right.as_ref().ok_or_else(|| missing_operand(n, "second"))?;
    Ok((interpret(left, env)?, interpret(right, env)?))
}

// ---------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------

pub fn interpret_math_op(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let (lhs, rhs) = operands(n, env)?;
    let (l, r, kind) = maybe_cast_numbers(&lhs, &rhs);

    match n.kind {
        NodeKind::Add => match kind {
            CastKind::Int => Ok(Node::int(l.as_int().unwrap_or(0) + r.as_int().unwrap_or(0))),
            CastKind::Float => Ok(Node::float(
                l.as_float().unwrap_or(0.0) + r.as_float().unwrap_or(0.0),
            )),
            CastKind::Str => Ok(Node::string(format!(
                "{}{}",
                l.as_str().unwrap_or(""),
                r.as_str().unwrap_or("")
            ))),
            CastKind::List => {
                let mut combined = l.as_list().map(|v| v.borrow().clone()).unwrap_or_default();
                if let Some(extra) = r.as_list() {
                    combined.extend(extra.borrow().iter().cloned());
                }
                Ok(Node::list(combined))
            }
            _ => Ok(Node::fail()),
        },
        NodeKind::Sub => match kind {
            CastKind::Int => Ok(Node::int(l.as_int().unwrap_or(0) - r.as_int().unwrap_or(0))),
            CastKind::Float => Ok(Node::float(
                l.as_float().unwrap_or(0.0) - r.as_float().unwrap_or(0.0),
            )),
            _ => Ok(Node::fail()),
        },
        NodeKind::Mul => match kind {
            CastKind::Int => Ok(Node::int(l.as_int().unwrap_or(0) * r.as_int().unwrap_or(0))),
            CastKind::Float => Ok(Node::float(
                l.as_float().unwrap_or(0.0) * r.as_float().unwrap_or(0.0),
            )),
            _ => Ok(Node::fail()),
        },
        NodeKind::Div => match kind {
            CastKind::Int => {
                let divisor = r.as_int().unwrap_or(0);
                if divisor == 0 {
                    return Ok(Node::fail());
                }
                Ok(Node::float(
                    l.as_int().unwrap_or(0) as f64 / divisor as f64,
                ))
            }
            CastKind::Float => {
                let divisor = r.as_float().unwrap_or(0.0);
                if divisor == 0.0 {
                    return Ok(Node::fail());
                }
                Ok(Node::float(l.as_float().unwrap_or(0.0) / divisor))
            }
            _ => Ok(Node::fail()),
        },
        NodeKind::Mod => match kind {
            CastKind::Int => {
                let divisor = r.as_int().unwrap_or(0);
                if divisor == 0 {
                    return Ok(Node::fail());
                }
                Ok(Node::int(l.as_int().unwrap_or(0) % divisor))
            }
            _ => Ok(Node::fail()),
        },
        _ => Err(RyeError::runtime_error("Unknown binary operator", n.line)),
    }
}

/// `^` requires an integer exponent, computed by repeated multiplication of
/// its absolute value. An integer base with a negative exponent reciprocates
/// into a float.
// TODO: reciprocate negative exponents for float bases as well
pub fn interpret_power(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let (lhs, rhs) = operands(n, env)?;

    let exp = match rhs.kind {
        NodeKind::Int => rhs.as_int().unwrap_or(0),
        _ => return Ok(Node::fail()),
    };
    let reps = exp.abs();

    match lhs.kind {
        NodeKind::Float => {
            let base = lhs.as_float().unwrap_or(0.0);
            let mut total = 1.0;
            for _ in 0..reps {
                total *= base;
            }
            Ok(Node::float(total))
        }
        NodeKind::Int => {
            let base = lhs.as_int().unwrap_or(0);
            let mut total: i64 = 1;
            for _ in 0..reps {
                total *= base;
            }
            if exp < 0 {
                Ok(Node::float(1.0 / total as f64))
            } else {
                Ok(Node::int(total))
            }
        }
        _ => Ok(Node::fail()),
    }
}

// ---------------------------------------------------------------------
// Logic and comparison
// ---------------------------------------------------------------------

pub fn interpret_logic_op(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let (lhs, rhs) = operands(n, env)?;

    match n.kind {
        NodeKind::And => {
            if is_truthy(&lhs) {
                Ok(rhs)
            } else {
                Ok(Node::boolean(false))
            }
        }
        NodeKind::Or => {
            if is_truthy(&lhs) {
                Ok(lhs)
            } else {
                Ok(rhs)
            }
        }
        NodeKind::Fallback => {
            if lhs.kind == NodeKind::Fail {
                Ok(rhs)
            } else {
                Ok(lhs)
            }
        }
        _ => Err(RyeError::runtime_error("Unknown logical operator", n.line)),
    }
}

pub fn interpret_comparison(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let (lhs, rhs) = operands(n, env)?;

    match n.kind {
        NodeKind::Equal => match eval_equality(&lhs, &rhs) {
            Ok(equal) => Ok(Node::boolean(equal)),
            Err(_) => Ok(Node::fail()),
        },
        NodeKind::NotEqual => match eval_equality(&lhs, &rhs) {
            Ok(equal) => Ok(Node::boolean(!equal)),
            Err(_) => Ok(Node::fail()),
        },
        NodeKind::Less | NodeKind::LessEqual | NodeKind::Greater | NodeKind::GreaterEqual => {
            let (l, r, kind) = maybe_cast_numbers(&lhs, &rhs);
            match kind {
                CastKind::Int => {
                    let (a, b) = (l.as_int().unwrap_or(0), r.as_int().unwrap_or(0));
                    Ok(Node::boolean(ordered(n.kind, a, b)))
                }
                CastKind::Float => {
                    let (a, b) = (l.as_float().unwrap_or(0.0), r.as_float().unwrap_or(0.0));
                    Ok(Node::boolean(ordered(n.kind, a, b)))
                }
                _ => Ok(Node::fail()),
            }
        }
        _ => Err(RyeError::runtime_error(
            "Unknown comparison operator",
            n.line,
        )),
    }
}

fn ordered<T: PartialOrd>(kind: NodeKind, a: T, b: T) -> bool {
    match kind {
        NodeKind::Less => a < b,
        NodeKind::LessEqual => a <= b,
        NodeKind::Greater => a > b,
        NodeKind::GreaterEqual => a >= b,
        _ => false,
    }
}

pub fn interpret_in(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let (item, container) = operands(n, env)?;

    match container.kind {
        NodeKind::List => {
            let members = container
                .as_list()
                .map(|v| v.borrow().clone())
                .unwrap_or_default();
            for m in &members {
                if eval_equality(&item, m).unwrap_or(false) {
                    return Ok(Node::boolean(true));
                }
            }
            Ok(Node::boolean(false))
        }
        NodeKind::Set => {
            let present = container
                .as_set()
                .map(|s| *s.borrow().get(&item.to_value_key()).unwrap_or(&false))
                .unwrap_or(false);
            Ok(Node::boolean(present))
        }
        _ => Ok(Node::fail()),
    }
}

// ---------------------------------------------------------------------
// Unary operators
// ---------------------------------------------------------------------

pub fn interpret_un_op(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let operand = n
        .right
        .as_ref()
        .ok_or_else(|| missing_operand(n, "single"))?;
    let arg = interpret(operand, env)?;

    match n.kind {
        NodeKind::Not => Ok(Node::boolean(!is_truthy(&arg))),
        NodeKind::Maybe => {
            if arg.kind == NodeKind::Fail {
                Ok(arg)
            } else {
                Ok(Node::success())
            }
        }
        NodeKind::Cardinality => match arg.kind {
            NodeKind::List => Ok(Node::int(
                arg.as_list().map(|v| v.borrow().len()).unwrap_or(0) as i64,
            )),
            NodeKind::Str => Ok(Node::int(arg.as_str().unwrap_or("").len() as i64)),
            NodeKind::Set => Ok(Node::int(
                arg.as_set()
                    .map(|s| s.borrow().values().filter(|present| **present).count())
                    .unwrap_or(0) as i64,
            )),
            NodeKind::Object => Ok(Node::int(
                arg.as_object().map(|o| o.borrow().len()).unwrap_or(0) as i64,
            )),
            _ => Ok(Node::fail()),
        },
        NodeKind::Neg => match arg.kind {
            NodeKind::Int => Ok(Node::int(-arg.as_int().unwrap_or(0))),
            NodeKind::Float => Ok(Node::float(-arg.as_float().unwrap_or(0.0))),
            _ => Ok(Node::fail()),
        },
        _ => Err(RyeError::runtime_error("Unknown unary operator", n.line)),
    }
}

// ---------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------

/// `a..b` materializes the integers from `a` (inclusive, default 0) to `b`
/// (exclusive) as a list. A non-integer start is a hard error; a
/// non-numeric end fails softly; float ends truncate.
pub fn interpret_range(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let start = match &n.left {
        Some(l) => Some(interpret(l, env)?),
        None => None,
    };

    if let Some(s) = &start {
        if s.kind != NodeKind::Int {
            return Err(RyeError::runtime_error(
                "Invalid start value for range",
                n.line,
            ));
        }
    }

    let end_node = n
        .right
        .as_ref()
        .ok_or_else(|| missing_operand(n, "second"))?;
    let end = interpret(end_node, env)?;

    let mut i = match &start {
        Some(s) => s.as_int().unwrap_or(0),
        None => 0,
    };
    let end_val = match end.kind {
        NodeKind::Int => end.as_int().unwrap_or(0),
        NodeKind::Float => end.as_float().unwrap_or(0.0) as i64,
        _ => return Ok(Node::fail()),
    };

    let mut items = Vec::new();
    while i < end_val {
        items.push(Node::int(i));
        i += 1;
    }
    Ok(Node::list(items))
}

// ---------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------

/// Evaluates a list literal left to right. Splat items spread lists and
/// sets; a splat of anything else contributes `fail`.
pub fn interpret_list_literal(elems: &[NodeRef], env: &EnvRef) -> Result<NodeRef, RyeError> {
    let mut items = Vec::new();

    for elem in elems {
        if elem.kind == NodeKind::Splat {
            spread_into(&mut items, elem, env)?;
        } else {
            items.push(interpret(elem, env)?);
        }
    }

    Ok(Node::list(items))
}

fn spread_into(items: &mut Vec<NodeRef>, splat: &NodeRef, env: &EnvRef) -> Result<(), RyeError> {
    let inner = match &splat.right {
        Some(inner) => interpret(inner, env)?,
        None => Node::fail(),
    };

    match inner.kind {
        NodeKind::List => {
            if let Some(list) = inner.as_list() {
                items.extend(list.borrow().iter().cloned());
            }
        }
        NodeKind::Set => {
            if let Some(set) = inner.as_set() {
                items.extend(
                    set.borrow()
                        .iter()
                        .filter(|(_, present)| **present)
                        .map(|(k, _)| k.to_node()),
                );
            }
        }
        _ => items.push(Node::fail()),
    }
    Ok(())
}

/// Evaluates a set-item chain into a set value.
pub fn interpret_set_items(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let mut members: HashMap<ValueKey, bool> = HashMap::new();

    let mut curr = Some(n.clone());
    while let Some(item) = curr {
        if let Some(elem) = &item.left {
            if elem.kind == NodeKind::Splat {
                let mut spread = Vec::new();
                spread_into(&mut spread, elem, env)?;
                for v in spread {
                    members.insert(v.to_value_key(), true);
                }
            } else {
                let val = interpret(elem, env)?;
                members.insert(val.to_value_key(), true);
            }
        }
        curr = item.right.clone();
    }

    Ok(Node::set(members))
}

/// Evaluates an object-item chain into an object value. Identifier keys use
/// their name; string keys their text; parenthesized keys evaluate first.
pub fn interpret_object_items(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let mut fields: HashMap<ValueKey, NodeRef> = HashMap::new();

    let mut curr = Some(n.clone());
    while let Some(item) = curr {
        if let Some(entry) = &item.left {
            match entry.kind {
                NodeKind::KVPair => {
                    let key = object_key(entry, env)?;
                    let value = match &entry.right {
                        Some(v) => interpret(v, env)?,
                        None => Node::fail(),
                    };
                    fields.insert(key, value);
                }
                NodeKind::Splat => {
                    let inner = match &entry.right {
                        Some(inner) => interpret(inner, env)?,
                        None => Node::fail(),
                    };
                    match inner.as_object() {
                        Some(obj) => {
                            for (k, v) in obj.borrow().iter() {
                                fields.insert(k.clone(), v.clone());
                            }
                        }
                        None => {
                            fields.insert(ValueKey::Result(false), Node::fail());
                        }
                    }
                }
                _ => {}
            }
        }
        curr = item.right.clone();
    }

    Ok(Node::object(fields))
}

fn object_key(kv: &NodeRef, env: &EnvRef) -> Result<ValueKey, RyeError> {
    let key_node = match &kv.left {
        Some(k) => k.clone(),
        None => return Ok(ValueKey::Result(false)),
    };

    match key_node.kind {
        NodeKind::Identifier | NodeKind::Str => Ok(key_node.to_value_key()),
        _ => Ok(interpret(&key_node, env)?.to_value_key()),
    }
}

// ---------------------------------------------------------------------
// Accessors and slicing
// ---------------------------------------------------------------------

pub fn interpret_bracket_access(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let (src, accessor) = operands(n, env)?;

    match src.kind {
        NodeKind::List | NodeKind::Str => get_by_index(&src, &accessor),
        NodeKind::Object => get_by_key(&src, &accessor),
        _ => Ok(Node::fail()),
    }
}

/// Integer (or truncated float) index, negative counting from the end.
/// Strings index to single-byte strings; out of range is `fail`.
pub fn get_by_index(src: &NodeRef, idx_node: &NodeRef) -> Result<NodeRef, RyeError> {
    let idx = match idx_node.kind {
        NodeKind::Int => idx_node.as_int().unwrap_or(0),
        NodeKind::Float => idx_node.as_float().unwrap_or(0.0) as i64,
        _ => return Ok(Node::fail()),
    };

    let length = match src.kind {
        NodeKind::List => src.as_list().map(|v| v.borrow().len()).unwrap_or(0) as i64,
        NodeKind::Str => src.as_str().unwrap_or("").len() as i64,
        _ => 0,
    };

    if idx >= length || (idx < 0 && -idx > length) {
        return Ok(Node::fail());
    }

    let at = if idx < 0 { length + idx } else { idx } as usize;

    match src.kind {
        NodeKind::Str => {
            let byte = src.as_str().unwrap_or("").as_bytes()[at];
            Ok(Node::string((byte as char).to_string()))
        }
        _ => {
            let items = src.as_list().map(|v| v.borrow().clone()).unwrap_or_default();
            Ok(items[at].clone())
        }
    }
}

fn get_by_key(src: &NodeRef, key_node: &NodeRef) -> Result<NodeRef, RyeError> {
    let fields = match src.as_object() {
        Some(f) => f,
        None => return Ok(Node::fail()),
    };

    match fields.borrow().get(&key_node.to_value_key()) {
        Some(val) => Ok(val.clone()),
        None => Ok(Node::fail()),
    }
}

/// `x.field` on objects and modules. Other receivers yield `fail`.
pub fn interpret_field_access(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let src = n.left.as_ref().ok_or_else(|| missing_operand(n, "first"))?;
    let field = n
        .right
        .as_ref()
        .ok_or_else(|| missing_operand(n, "second"))?;

    let obj = interpret(src, env)?;

    match obj.kind {
        NodeKind::Object => {
            let fields = match obj.as_object() {
                Some(f) => f,
                None => return Ok(Node::fail()),
            };
            let found = fields.borrow().get(&field.to_value_key()).cloned();
            match found {
                Some(val) => Ok(val),
                None => Ok(Node::fail()),
            }
        }
        NodeKind::Module => {
            let name = field.name().unwrap_or("");
            let scope = match &obj.scope {
                Some(s) => s.clone(),
                None => return Ok(Node::fail()),
            };
            let found = scope.borrow().consts.get(name).cloned();
            match found {
                Some(val) => Ok(val),
                None => Ok(Node::fail()),
            }
        }
        _ => Ok(Node::fail()),
    }
}

/// `x[a..b]` on lists and strings; bounds default to the ends and clamp
/// into range, a start past the end clamps to an empty result.
pub fn interpret_list_slice(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let src_node = n.left.as_ref().ok_or_else(|| missing_operand(n, "first"))?;
    let src = interpret(src_node, env)?;

    if src.kind != NodeKind::List && src.kind != NodeKind::Str {
        return Err(RyeError::runtime_error(
            "Value is not a list and cannot be sliced",
            n.line,
        ));
    }

    let slice = n
        .right
        .as_ref()
        .ok_or_else(|| missing_operand(n, "second"))?;

    let length = match src.kind {
        NodeKind::List => src.as_list().map(|v| v.borrow().len()).unwrap_or(0) as i64,
        _ => src.as_str().unwrap_or("").len() as i64,
    };

    let mut start: i64 = 0;
    let mut end: i64 = length;

    if let Some(start_node) = &slice.left {
        let val = interpret(start_node, env)?;
        start = match val.kind {
            NodeKind::Int => val.as_int().unwrap_or(0),
            NodeKind::Float => val.as_float().unwrap_or(0.0) as i64,
            _ => return Ok(Node::fail()),
        };
    }
    if let Some(end_node) = &slice.right {
        let val = interpret(end_node, env)?;
        end = match val.kind {
            NodeKind::Int => val.as_int().unwrap_or(0),
            NodeKind::Float => val.as_float().unwrap_or(0.0) as i64,
            _ => return Ok(Node::fail()),
        };
    }

    // clamp both bounds into [0, length], empty when start passes end
    start = start.clamp(0, length);
    end = end.clamp(0, length);
    if start > end {
        start = end;
    }

    match src.kind {
        NodeKind::Str => {
            let bytes = src.as_str().unwrap_or("").as_bytes();
            let sub = &bytes[start as usize..end as usize];
            Ok(Node::string(String::from_utf8_lossy(sub).to_string()))
        }
        _ => {
            let items = src.as_list().map(|v| v.borrow().clone()).unwrap_or_default();
            Ok(Node::list(items[start as usize..end as usize].to_vec()))
        }
    }
}
