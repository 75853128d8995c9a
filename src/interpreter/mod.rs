/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * Interpreter Entry & Runtime Bootstrap
 * -------------------------------------
 * The tree-walking evaluator. This module owns the central dispatch and
 * the runtime bootstrap (root environment + standard library); everything
 * else is delegated:
 *
 *  - expressions.rs → operators, ranges, literals, accessors
 *  - statements.rs  → declarations, assignment, conditionals, loops
 *  - calls.rs       → invocation, argument binding, closures
 *  - pipeline.rs    → |> map where find fold
 *  - helpers.rs     → coercion, truthiness, equality, iteration
 *  - display.rs     → value formatting
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

pub mod calls;
pub mod display;
pub mod expressions;
pub mod helpers;
pub mod pipeline;
pub mod statements;

use std::path::PathBuf;
use std::rc::Rc;

use crate::ast::{Node, NodeKind, NodeRef, Payload};
use crate::environment::{EnvRef, Environment};
use crate::error::RyeError;
use crate::lexer::tokenize;
use crate::parser::parse;

use calls::interpret_call;
use expressions::{
    interpret_bracket_access, interpret_comparison, interpret_field_access, interpret_in,
    interpret_list_literal, interpret_list_slice, interpret_logic_op, interpret_math_op,
    interpret_object_items, interpret_power, interpret_range, interpret_set_items,
    interpret_un_op,
};
use helpers::resolve_identifier;
use pipeline::{interpret_find, interpret_fold, interpret_map, interpret_pipe, interpret_where};
use statements::{
    assign_var, declare_var, interpret_for, interpret_if, interpret_stmt, interpret_while,
};

/// Builds the environment a program runs in: a fresh scope whose parent
/// carries the standard library.
pub fn root_environment() -> EnvRef {
    let stdlib_env = Environment::new(None);
    crate::stdlib::install(&stdlib_env);
    Environment::new(Some(stdlib_env))
}

/// Runs a source string through the full pipeline in a fresh environment.
pub fn run_source(source: &str) -> Result<NodeRef, RyeError> {
    let tokens = tokenize(source)?;
    let root = parse(tokens)?;
    let env = root_environment();
    interpret(&root, &env)
}

/// The central dispatch. Every node visits here; evaluation of a value
/// node is idempotent and identity-preserving for collections.
pub fn interpret(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    match n.kind {
        NodeKind::Stmt => interpret_stmt(n, env),

        // binary operations
        NodeKind::Add | NodeKind::Sub | NodeKind::Div | NodeKind::Mul | NodeKind::Mod => {
            interpret_math_op(n, env)
        }
        NodeKind::Power => interpret_power(n, env),
        NodeKind::And | NodeKind::Or | NodeKind::Fallback => interpret_logic_op(n, env),
        NodeKind::Equal
        | NodeKind::NotEqual
        | NodeKind::Less
        | NodeKind::LessEqual
        | NodeKind::Greater
        | NodeKind::GreaterEqual => interpret_comparison(n, env),
        NodeKind::In => interpret_in(n, env),

        // unary operations
        NodeKind::Not | NodeKind::Maybe | NodeKind::Cardinality | NodeKind::Neg => {
            interpret_un_op(n, env)
        }

        // identifiers
        NodeKind::Identifier | NodeKind::Underscore | NodeKind::Index => {
            resolve_identifier(n, env)
        }

        // scalar values evaluate to themselves
        NodeKind::Int
        | NodeKind::Float
        | NodeKind::Bool
        | NodeKind::Str
        | NodeKind::Fail
        | NodeKind::Success
        | NodeKind::Null
        | NodeKind::Set
        | NodeKind::Module
        | NodeKind::Break
        | NodeKind::Continue => Ok(n.clone()),

        // a lambda value captures the scope in effect when it is evaluated
        NodeKind::Lambda => match &n.scope {
            Some(_) => Ok(n.clone()),
            None => Ok(n.with_scope(Some(env.clone()))),
        },

        NodeKind::List => match &n.payload {
            Payload::Elems(items) => interpret_list_literal(items, env),
            _ => Ok(n.clone()),
        },
        NodeKind::Object => match &n.payload {
            Payload::Object(_) => Ok(n.clone()),
            _ => Ok(Node::object(Default::default())),
        },
        NodeKind::KVPair => {
            // a bare key-value pair is a one-entry object literal
            let item = Node::binary(NodeKind::ObjectItem, Some(n.clone()), None);
            interpret_object_items(&item, env)
        }
        NodeKind::ObjectItem => interpret_object_items(n, env),
        NodeKind::SetItem => interpret_set_items(n, env),

        NodeKind::ConstDecl | NodeKind::VarDecl => declare_var(n, env),
        NodeKind::Assign => assign_var(n, env),
        NodeKind::If => interpret_if(n, env),
        NodeKind::Call => interpret_call(n, env),
        NodeKind::Return => {
            let val = match &n.right {
                Some(r) => Some(interpret(r, env)?),
                None => None,
            };
            Ok(Node::binary(NodeKind::Return, None, val))
        }

        NodeKind::Map => interpret_map(n, env),
        NodeKind::Where => interpret_where(n, env),
        NodeKind::Pipe => interpret_pipe(n, env),
        NodeKind::Find => interpret_find(n, env),
        NodeKind::Fold => interpret_fold(n, env),

        NodeKind::BracketAccess => interpret_bracket_access(n, env),
        NodeKind::FieldAccess => interpret_field_access(n, env),
        NodeKind::ListSlice => interpret_list_slice(n, env),

        NodeKind::While => interpret_while(n, env),
        NodeKind::For => interpret_for(n, env),
        NodeKind::Range => interpret_range(n, env),

        NodeKind::Import => import_module(n, env),

        _ => Err(RyeError::runtime_error(
            format!("Unknown node type \"{}\"", n.kind.descriptor()),
            n.line,
        )),
    }
}

// ---------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------

/// `import "path" as alias`. The module file is lexed, parsed, and executed
/// in a fresh environment whose parent is a fresh root carrying the
/// standard library, so the module can neither observe nor pollute the
/// importing program's scope. The module value is bound into the top-most
/// environment of the importing program. Imports are not cached; importing
/// the same path twice re-executes the file.
fn import_module(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let top = Environment::top_most(env);

    let raw_path = match &n.payload {
        Payload::Str(p) => p.clone(),
        _ => return Err(RyeError::import_error("Missing import path", n.line)),
    };

    let path = resolve_module_path(&raw_path)
        .map_err(|e| RyeError::import_error(
            format!("Failed to import from path \"{}\": {}", raw_path, e),
            n.line,
        ))?;

    let source = std::fs::read_to_string(&path).map_err(|e| {
        RyeError::import_error(
            format!("Failed to import from path \"{}\": {}", path.display(), e),
            n.line,
        )
    })?;

    let tokens = tokenize(&source).map_err(|e| {
        RyeError::import_error(
            format!("Failed to parse module at path \"{}\": {}", path.display(), e),
            n.line,
        )
    })?;
    let mod_root = crate::parser::parse(tokens).map_err(|e| {
        RyeError::import_error(
            format!("Failed to parse module at path \"{}\": {}", path.display(), e),
            n.line,
        )
    })?;

    let mod_env = root_environment();
    interpret(&mod_root, &mod_env).map_err(|e| {
        RyeError::import_error(
            format!("Encountered error while importing \"{}\": {}", path.display(), e),
            n.line,
        )
    })?;

    let mod_name = match &n.right {
        Some(alias) => alias.name().unwrap_or("").to_string(),
        None => module_name(&raw_path),
    };

    // the module's exports are the module environment's constants
    let exports = Environment::new(None);
    exports.borrow_mut().consts = mod_env.borrow().consts.clone();

    let module = Rc::new(Node {
        payload: Payload::Str(mod_name.clone()),
        scope: Some(exports),
        ..Node::new(NodeKind::Module)
    });

    top.borrow_mut().consts.insert(mod_name, module);

    Ok(Node::success())
}

/// Module paths resolve relative to the process working directory; `.`
/// path elements are skipped.
fn resolve_module_path(raw: &str) -> Result<PathBuf, std::io::Error> {
    let mut path = std::env::current_dir()?;
    for elem in raw.split('/') {
        if elem == "." || elem.is_empty() {
            continue;
        }
        path.push(elem);
    }
    Ok(path)
}

/// The default module name is the path's basename without extension.
fn module_name(path: &str) -> String {
    let filename = path.rsplit('/').next().unwrap_or("");
    filename.split('.').next().unwrap_or("").to_string()
}
