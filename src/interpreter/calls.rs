/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      calls.rs
 * Purpose:   Function invocation: arity checking, argument binding with
 *            destructuring, body execution, and closure capture.
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
use crate::environment::{EnvRef, Environment};
use crate::error::RyeError;
use crate::interpreter::helpers::resolve_identifier;
use crate::interpreter::interpret;

/// Builds a synthesized call of `callee` applied to already-evaluated
/// argument values. Used by the pipeline operators and by builtins that
/// re-enter the evaluator (`find`, `findIndex`).
pub fn make_call(callee: &NodeRef, args: &[NodeRef]) -> NodeRef {
    let mut chain: Option<NodeRef> = None;
    for arg in args.iter().rev() {
        chain = Some(Node::binary(NodeKind::Arg, Some(arg.clone()), chain));
    }

    Node::binary(NodeKind::Call, Some(callee.clone()), chain)
}

fn count_params(params: &Option<NodeRef>) -> usize {
    let mut count = 0;
    let mut curr = params.clone();
    while let Some(p) = curr {
        if p.name().is_none() && p.left.is_none() {
            break;
        }
        count += 1;
        curr = p.right.clone();
    }
    count
}

fn count_args(args: &Option<NodeRef>) -> usize {
    let mut count = 0;
    let mut curr = args.clone();
    while let Some(a) = curr {
        if a.left.is_none() {
            break;
        }
        count += 1;
        curr = a.right.clone();
    }
    count
}

pub fn interpret_call(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let callee = n
        .left
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing callee", n.line))?;

    let lambda = if callee.kind == NodeKind::Identifier {
        resolve_identifier(callee, env)?
    } else {
        interpret(callee, env)?
    };

    // built-ins receive the evaluated arguments directly
    if let Some(f) = lambda.as_builtin() {
        let mut args = Vec::new();
        let mut curr = n.right.clone();
        while let Some(arg) = curr {
            match &arg.left {
                Some(expr) => args.push(interpret(expr, env)?),
                None => break,
            }
            curr = arg.right.clone();
        }
        return f(env, &args);
    }

    let scope = Environment::new(Some(match &lambda.scope {
        Some(captured) => captured.clone(),
        None => env.clone(),
    }));

    let param_count = count_params(&lambda.left);
    let arg_count = count_args(&n.right);
    if param_count != arg_count {
        let problem = if param_count > arg_count {
            "Too few"
        } else {
            "Too many"
        };
        let message = if callee.kind == NodeKind::Identifier {
            format!(
                "{} arguments provided to function \"{}\". Expected {}, received {}.",
                problem,
                callee.name().unwrap_or(""),
                param_count,
                arg_count
            )
        } else {
            format!(
                "{} arguments provided to anonymous function. Expected {}, received {}.",
                problem, param_count, arg_count
            )
        };
        return Err(RyeError::arity_error(message, n.line));
    }

    // evaluate arguments in the caller's scope, bind them in the callee's
    let mut param = lambda.left.clone();
    let mut arg = n.right.clone();
    while let (Some(p), Some(a)) = (param.clone(), arg.clone()) {
        if (p.name().is_none() && p.left.is_none()) || a.left.is_none() {
            break;
        }
        let val = match &a.left {
            Some(expr) => interpret(expr, env)?,
            None => break,
        };
        assign_arg(&val, &p, &scope);
        param = p.right.clone();
        arg = a.right.clone();
    }

    let body = lambda
        .right
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing function body", n.line))?;

    let res = if body.kind == NodeKind::Stmt {
        interpret_function_body(body, &scope)?
    } else {
        interpret(body, &scope)?
    };

    // a lambda escaping the call captures the just-completed call scope
    if res.kind == NodeKind::Lambda && res.as_builtin().is_none() {
        return Ok(res.with_scope(Some(scope)));
    }
    Ok(res)
}

/// Runs a statement-chain function body; a `return` terminates early with
/// its value, otherwise the last statement's value is the result.
pub fn interpret_function_body(start: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let mut result = Node::success();

    let mut curr = Some(start.clone());
    while let Some(n) = curr {
        if let Some(body) = &n.left {
            if body.kind == NodeKind::Stmt {
                result = interpret(body, &Environment::new(Some(env.clone())))?;
            } else {
                result = interpret(body, env)?;
            }
        }

        if result.kind == NodeKind::Return {
            return Ok(result.right.clone().unwrap_or_else(Node::success));
        }

        curr = n.right.clone();
    }

    Ok(result)
}

/// Binds one evaluated argument to one parameter, respecting destructuring.
///
/// Parameter shapes:
///   identifier:  Param { payload: name,          right: next }
///   list:        Param { left: list of idents,   right: next }
///   object:      Param { left: object-item chain, right: next }
pub fn assign_arg(arg: &NodeRef, param: &NodeRef, scope: &EnvRef) {
    if param.name().is_none() && param.left.is_none() {
        return;
    }

    // plain parameter
    if let Some(name) = param.name() {
        scope
            .borrow_mut()
            .vars
            .insert(name.to_string(), arg.clone());
        return;
    }

    if let Some(pattern) = &param.left {
        bind_pattern(pattern, arg, scope, false);
    }
}

/// Binds every identifier in a destructuring pattern. List patterns bind
/// positionally; object patterns bind by key, with `{field: alias}`
/// renaming. Identifiers with no matching source element bind `fail`.
/// Declarations bind constants, argument binding binds variables.
pub fn bind_pattern(pattern: &NodeRef, value: &NodeRef, scope: &EnvRef, constant: bool) {
    let mut insert = |name: String, val: NodeRef| {
        if constant {
            scope.borrow_mut().consts.insert(name, val);
        } else {
            scope.borrow_mut().vars.insert(name, val);
        }
    };

    match pattern.kind {
        NodeKind::List => {
            let names = pattern_names(pattern);
            let items = match value.as_list() {
                Some(items) if value.kind == NodeKind::List => items.borrow().clone(),
                _ => {
                    for name in names {
                        insert(name, Node::fail());
                    }
                    return;
                }
            };

            for (i, name) in names.into_iter().enumerate() {
                match items.get(i) {
                    Some(item) => insert(name, item.clone()),
                    None => insert(name, Node::fail()),
                }
            }
        }
        NodeKind::ObjectItem => {
            let fields = value.as_object().filter(|_| value.kind == NodeKind::Object);

            let mut curr = Some(pattern.clone());
            while let Some(item) = curr {
                if let Some(entry) = &item.left {
                    let (source_name, bound_name) = match entry.kind {
                        NodeKind::KVPair => {
                            let source = entry
                                .left
                                .as_ref()
                                .and_then(|k| k.name().map(str::to_string))
                                .unwrap_or_default();
                            let renamed = entry
                                .right
                                .as_ref()
                                .and_then(|r| r.name().map(str::to_string))
                                .unwrap_or_else(|| source.clone());
                            (source, renamed)
                        }
                        _ => {
                            let name = entry.name().unwrap_or("").to_string();
                            (name.clone(), name)
                        }
                    };

                    let val = fields
                        .and_then(|f| {
                            f.borrow()
                                .get(&crate::ast::ValueKey::Str(source_name.clone()))
                                .cloned()
                        })
                        .unwrap_or_else(Node::fail);
                    insert(bound_name, val);
                }
                curr = item.right.clone();
            }
        }
        _ => {}
    }
}

fn pattern_names(pattern: &NodeRef) -> Vec<String> {
    match &pattern.payload {
        crate::ast::Payload::Elems(items) => items
            .iter()
            .filter_map(|n| n.name().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
