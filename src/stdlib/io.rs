/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * Built-in I/O:
 *   - print(...)                 -> success
 *   - readInput(prompt)          -> string
 *   - readFile(path)             -> string
 *   - readJson(path)             -> any
 *   - writeJson(path, value, pretty?) -> success
 *
 * File paths are interpreted relative to the process working directory
 * unless absolute paths are provided.
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
use std::io::{BufRead, Write};

use serde_json::Value as JsonValue;

use crate::ast::{Node, NodeKind, NodeRef, ValueKey};
use crate::environment::EnvRef;
use crate::error::RyeError;
use crate::interpreter::display::print_form;
use crate::stdlib::check_arity;

/// Prints its arguments space-separated. Strings print raw, everything
/// else by its literal shape.
pub fn print(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    let parts: Vec<String> = args.iter().map(print_form).collect();
    println!("{}", parts.join(" "));
    Ok(Node::success())
}

pub fn read_input(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("readInput", args, 1)?;

    let prompt = match args[0].as_str() {
        Some(p) => p,
        None => return Ok(Node::fail()),
    };

    print!("{}", prompt);
    if std::io::stdout().flush().is_err() {
        return Ok(Node::fail());
    }

    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => Ok(Node::fail()),
        Ok(_) => Ok(Node::string(line)),
    }
}

pub fn read_file(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("readFile", args, 1)?;

    let path = match args[0].as_str() {
        Some(p) => p,
        None => return Ok(Node::fail()),
    };

    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Node::string(text)),
        Err(_) => Ok(Node::fail()),
    }
}

pub fn read_json(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    check_arity("readJson", args, 1)?;

    let path = match args[0].as_str() {
        Some(p) => p,
        None => return Ok(Node::fail()),
    };

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => return Ok(Node::fail()),
    };

    match serde_json::from_str::<JsonValue>(&text) {
        Ok(json) => Ok(json_to_node(&json)),
        Err(_) => Ok(Node::fail()),
    }
}

/// writeJson(path, value, pretty?). Values without a JSON form fail.
pub fn write_json(_env: &EnvRef, args: &[NodeRef]) -> Result<NodeRef, RyeError> {
    if args.len() != 2 && args.len() != 3 {
        return Err(RyeError::arity_error(
            format!(
                "Wrong number of arguments for \"writeJson\". Expected 2-3, received {}.",
                args.len()
            ),
            0,
        ));
    }

    let path = match args[0].as_str() {
        Some(p) => p.to_string(),
        None => return Ok(Node::fail()),
    };

    let json = match node_to_json(&args[1]) {
        Some(json) => json,
        None => return Ok(Node::fail()),
    };

    let pretty = args
        .get(2)
        .map(|n| n.as_bool().unwrap_or(false))
        .unwrap_or(false);

    let text = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };

    match text {
        Ok(text) => match std::fs::write(path, text) {
            Ok(()) => Ok(Node::success()),
            Err(_) => Ok(Node::fail()),
        },
        Err(_) => Ok(Node::fail()),
    }
}

fn json_to_node(json: &JsonValue) -> NodeRef {
    match json {
        JsonValue::Null => Node::null(),
        JsonValue::Bool(b) => Node::boolean(*b),
        JsonValue::Number(num) => {
            if let Some(i) = num.as_i64() {
                Node::int(i)
            } else {
                Node::float(num.as_f64().unwrap_or(0.0))
            }
        }
        JsonValue::String(s) => Node::string(s.clone()),
        JsonValue::Array(items) => Node::list(items.iter().map(json_to_node).collect()),
        JsonValue::Object(fields) => {
            let mut map: HashMap<ValueKey, NodeRef> = HashMap::new();
            for (k, v) in fields {
                map.insert(ValueKey::Str(k.clone()), json_to_node(v));
            }
            Node::object(map)
        }
    }
}

fn node_to_json(n: &NodeRef) -> Option<JsonValue> {
    match n.kind {
        NodeKind::Null => Some(JsonValue::Null),
        NodeKind::Bool => Some(JsonValue::Bool(n.as_bool()?)),
        NodeKind::Int => Some(JsonValue::from(n.as_int()?)),
        NodeKind::Float => Some(JsonValue::from(n.as_float()?)),
        NodeKind::Str => Some(JsonValue::String(n.as_str()?.to_string())),
        NodeKind::Success => Some(JsonValue::Bool(true)),
        NodeKind::Fail => Some(JsonValue::Bool(false)),
        NodeKind::List => {
            let items = n.as_list()?.borrow().clone();
            let mut arr = Vec::new();
            for item in &items {
                arr.push(node_to_json(item)?);
            }
            Some(JsonValue::Array(arr))
        }
        NodeKind::Set => {
            let members = n.as_set()?.borrow().clone();
            let mut arr = Vec::new();
            for (key, present) in &members {
                if *present {
                    arr.push(node_to_json(&key.to_node())?);
                }
            }
            Some(JsonValue::Array(arr))
        }
        NodeKind::Object => {
            let fields = n.as_object()?.borrow().clone();
            let mut map = serde_json::Map::new();
            for (key, value) in &fields {
                let name = match key {
                    ValueKey::Str(s) => s.clone(),
                    other => other.to_node().to_sexpr(),
                };
                map.insert(name, node_to_json(value)?);
            }
            Some(JsonValue::Object(map))
        }
        _ => None,
    }
}
