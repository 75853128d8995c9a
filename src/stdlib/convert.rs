/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * Type inspection and conversion. The conversion callables are idempotent
 * on their own kind; failed conversions yield `fail`.
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
use crate::stdlib::{check_arity, check_arity_at_least};

/// The closed set of type names:
/// Int, Float, Bool, String, Result, Null, List, Set, Object, Lambda, Module.
pub fn type_of(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("typeof", args, 1)?;

    let name = match args[0].kind {
        NodeKind::Lambda => "Lambda",
        NodeKind::List => "List",
        NodeKind::Set => "Set",
        NodeKind::Object => "Object",
        NodeKind::Success | NodeKind::Fail => "Result",
        NodeKind::Float => "Float",
        NodeKind::Int => "Int",
        NodeKind::Bool => "Bool",
        NodeKind::Str => "String",
        NodeKind::Null => "Null",
        NodeKind::Module => "Module",
        _ => return Ok(Node::fail()),
    };

    Ok(Node::string(name))
}

pub fn to_int(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("Int", args, 1)?;

    match args[0].kind {
        NodeKind::Int => Ok(args[0].clone()),
        NodeKind::Float => Ok(Node::int(args[0].as_float().unwrap_or(0.0) as i64)),
        NodeKind::Str => match args[0].as_str().unwrap_or("").trim().parse::<i64>() {
            Ok(v) => Ok(Node::int(v)),
            Err(_) => Ok(Node::fail()),
        },
        _ => Ok(Node::fail()),
    }
}

pub fn to_float(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("Float", args, 1)?;

    match args[0].kind {
        NodeKind::Float => Ok(args[0].clone()),
        NodeKind::Int => Ok(Node::float(args[0].as_int().unwrap_or(0) as f64)),
        NodeKind::Str => match args[0].as_str().unwrap_or("").trim().parse::<f64>() {
            Ok(v) => Ok(Node::float(v)),
            Err(_) => Ok(Node::fail()),
        },
        _ => Ok(Node::fail()),
    }
}

pub fn to_string(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("String", args, 1)?;

    match args[0].kind {
        NodeKind::Str => Ok(args[0].clone()),
        NodeKind::Lambda => Ok(Node::string("<lambda>")),
        _ => Ok(Node::string(args[0].to_sexpr())),
    }
}

pub fn to_set(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("Set", args, 1)?;

    let mut members: HashMap<ValueKey, bool> = HashMap::new();

    match args[0].kind {
        NodeKind::Set => Ok(args[0].clone()),
        NodeKind::List => {
            let items = args[0]
                .as_list()
                .map(|v| v.borrow().clone())
                .unwrap_or_default();
            for item in &items {
                members.insert(item.to_value_key(), true);
            }
            Ok(Node::set(members))
        }
        NodeKind::Int
        | NodeKind::Float
        | NodeKind::Str
        | NodeKind::Bool
        | NodeKind::Success
        | NodeKind::Fail => {
            members.insert(args[0].to_value_key(), true);
            Ok(Node::set(members))
        }
        _ => Ok(Node::fail()),
    }
}

pub fn to_list(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity_at_least("List", args, 1)?;

    if args.len() > 1 {
        return Ok(Node::list(args.to_vec()));
    }

    match args[0].kind {
        NodeKind::List => Ok(args[0].clone()),
        NodeKind::Set => {
            let items: Vec<NodeRef> = args[0]
                .as_set()
                .map(|s| {
                    s.borrow()
                        .iter()
                        .filter(|(_, present)| **present)
                        .map(|(k, _)| k.to_node())
                        .collect()
                })
                .unwrap_or_default();
            Ok(Node::list(items))
        }
        _ => Ok(Node::list(vec![args[0].clone()])),
    }
}
