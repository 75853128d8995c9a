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
use crate::stdlib::check_arity;

pub fn split(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("split", args, 2)?;

    let (text, sep) = match (args[0].as_str(), args[1].as_str()) {
        (Some(t), Some(s)) => (t, s),
        _ => return Ok(Node::fail()),
    };

    let parts: Vec<NodeRef> = if sep.is_empty() {
        text.chars().map(|c| Node::string(c.to_string())).collect()
    } else {
        text.split(sep).map(Node::string).collect()
    };

    Ok(Node::list(parts))
}

pub fn join(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("join", args, 2)?;

    if args[0].kind != NodeKind::List {
        return Ok(Node::fail());
    }
    let sep = match args[1].as_str() {
        Some(s) => s,
        None => return Ok(Node::fail()),
    };

    let items = args[0]
        .as_list()
        .map(|v| v.borrow().clone())
        .unwrap_or_default();

    let mut parts = Vec::new();
    for item in &items {
        match item.as_str() {
            Some(s) => parts.push(s.to_string()),
            None => return Ok(Node::fail()),
        }
    }

    Ok(Node::string(parts.join(sep)))
}

pub fn uppercase(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("uppercase", args, 1)?;

    match args[0].as_str() {
        Some(s) => Ok(Node::string(s.to_uppercase())),
        None => Ok(Node::fail()),
    }
}

pub fn lowercase(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("lowercase", args, 1)?;

    match args[0].as_str() {
        Some(s) => Ok(Node::string(s.to_lowercase())),
        None => Ok(Node::fail()),
    }
}
