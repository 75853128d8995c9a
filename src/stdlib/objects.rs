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

pub fn keys(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("keys", args, 1)?;

    let fields = match args[0].as_object() {
        Some(f) if args[0].kind == NodeKind::Object => f,
        _ => return Ok(Node::fail()),
    };

    let names: Vec<NodeRef> = fields.borrow().keys().map(|k| k.to_node()).collect();
    Ok(Node::list(names))
}

pub fn values(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("values", args, 1)?;

    let fields = match args[0].as_object() {
        Some(f) if args[0].kind == NodeKind::Object => f,
        _ => return Ok(Node::fail()),
    };

    let vals: Vec<NodeRef> = fields.borrow().values().cloned().collect();
    Ok(Node::list(vals))
}
