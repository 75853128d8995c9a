/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      statements.rs
 * Purpose:   Statement execution: statement chains, declarations,
 *            assignment targeting, conditionals, and loops.
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

use crate::ast::{Node, NodeKind, NodeRef, Payload};
use crate::environment::EnvRef;
use crate::error::RyeError;
use crate::interpreter::calls::bind_pattern;
use crate::interpreter::helpers::{collection_items, is_truthy, new_scope};
use crate::interpreter::interpret;

/// One closure that writes a value into its resolved destination.
type AssignFn = Box<dyn FnOnce(NodeRef) -> Result<(), RyeError>>;

/// Executes a statement chain. A nested chain gets its own scope.
pub fn interpret_stmt(root: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let mut result = Node::success();

    let mut curr = Some(root.clone());
    while let Some(n) = curr {
        if let Some(body) = &n.left {
            if body.kind == NodeKind::Stmt {
                result = interpret(body, &new_scope(env))?;
            } else {
                result = interpret(body, env)?;
            }
        }

        // control-flow values cut the chain short and propagate up
        if matches!(
            result.kind,
            NodeKind::Return | NodeKind::Break | NodeKind::Continue
        ) {
            return Ok(result);
        }

        curr = n.right.clone();
    }

    Ok(result)
}

// ---------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------

/// `:=` / `var :=`. The target may be an identifier or a destructuring
/// pattern; re-declaring a name in the same scope is an error.
pub fn declare_var(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let rhs = n
        .right
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing declaration value", n.line))?;
    let val = interpret(rhs, env)?;

    let target = n
        .left
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing declaration target", n.line))?;
    let constant = n.kind == NodeKind::ConstDecl;

    match target.kind {
        NodeKind::Identifier => {
            let ident = target.name().unwrap_or("").to_string();
            {
                let scope = env.borrow();
                if scope.consts.contains_key(&ident) || scope.vars.contains_key(&ident) {
                    return Err(RyeError::reference_error(
                        format!("\"{}\" is already defined", ident),
                        n.line,
                    ));
                }
            }
            if constant {
                env.borrow_mut().consts.insert(ident, val);
            } else {
                env.borrow_mut().vars.insert(ident, val);
            }
        }
        _ => bind_pattern(target, &val, env, constant),
    }

    Ok(Node::success())
}

// ---------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------

pub fn assign_var(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let target = n
        .left
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Invalid assignment target.", n.line))?;
    let assign = assignment_target(target, env)?;

    let rhs = n
        .right
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing assignment value", n.line))?;
    let val = interpret(rhs, env)?;

    assign(val)?;
    Ok(Node::success())
}

/// Resolves an assignment target into a write closure. Bare identifiers
/// update the scope where they live; bracket and field targets write into
/// the shared collection payload, so the update is observable through every
/// reference to the container.
fn assignment_target(lhs: &NodeRef, env: &EnvRef) -> Result<AssignFn, RyeError> {
    if lhs.left.is_none() && lhs.kind == NodeKind::Identifier {
        let ident = lhs.name().unwrap_or("").to_string();
        let line = lhs.line;

        let mut current = Some(env.clone());
        while let Some(e) = current {
            if e.borrow().consts.contains_key(&ident) {
                return Err(RyeError::reference_error(
                    format!("Cannot assign to constant variable \"{}\"", ident),
                    line,
                ));
            }
            if e.borrow().vars.contains_key(&ident) {
                let holder = e.clone();
                return Ok(Box::new(move |val: NodeRef| {
                    holder.borrow_mut().vars.insert(ident, val);
                    Ok(())
                }));
            }
            current = e.borrow().parent.clone();
        }

        return Err(RyeError::reference_error(
            format!("Cannot assign to undefined variable \"{}\"", ident),
            line,
        ));
    }

    nested_assignment_target(lhs, env)
}

fn nested_assignment_target(lhs: &NodeRef, env: &EnvRef) -> Result<AssignFn, RyeError> {
    let src = lhs
        .left
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Invalid assignment target.", lhs.line))?;
    let container = interpret(src, env)?;

    match &container.payload {
        Payload::List(items) => {
            let key = lhs
                .right
                .as_ref()
                .ok_or_else(|| RyeError::runtime_error("Invalid assignment target.", lhs.line))?;
            let idx_node = interpret(key, env)?;

            let mut idx = match idx_node.kind {
                NodeKind::Int => idx_node.as_int().unwrap_or(0),
                NodeKind::Float => idx_node.as_float().unwrap_or(0.0) as i64,
                _ => {
                    return Err(RyeError::runtime_error(
                        "Cannot assign to list index. Invalid index.",
                        lhs.line,
                    ))
                }
            };

            let length = items.borrow().len() as i64;
            if idx < 0 {
                idx += length;
            }
            if idx >= length || idx < 0 {
                return Err(RyeError::runtime_error(
                    "Cannot assign to list. Index out of range.",
                    lhs.line,
                ));
            }

            let holder = items.clone();
            Ok(Box::new(move |val: NodeRef| {
                holder.borrow_mut()[idx as usize] = val;
                Ok(())
            }))
        }
        Payload::Object(fields) => {
            let key_node = lhs
                .right
                .as_ref()
                .ok_or_else(|| RyeError::runtime_error("Invalid assignment target.", lhs.line))?;

            let key = if lhs.kind == NodeKind::FieldAccess {
                key_node.to_value_key()
            } else {
                interpret(key_node, env)?.to_value_key()
            };

            let holder = fields.clone();
            Ok(Box::new(move |val: NodeRef| {
                holder.borrow_mut().insert(key, val);
                Ok(())
            }))
        }
        _ => Err(RyeError::runtime_error(
            "Invalid assignment target.",
            lhs.line,
        )),
    }
}

// ---------------------------------------------------------------------
// Conditionals
// ---------------------------------------------------------------------

/// `if` in both statement and expression form. A conditional expression
/// without an else evaluates to `fail` when the condition is falsy.
pub fn interpret_if(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let cond = n
        .left
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing condition", n.line))?;
    let result = n
        .right
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing conditional body", n.line))?;

    let cond_val = interpret(cond, env)?;

    if is_truthy(&cond_val) {
        if result.kind == NodeKind::ThenBranch {
            match &result.left {
                Some(then_branch) => interpret(then_branch, env),
                None => Ok(Node::fail()),
            }
        } else {
            interpret(result, env)
        }
    } else if result.kind == NodeKind::ThenBranch {
        match &result.right {
            Some(else_branch) => interpret(else_branch, env),
            None => Ok(Node::fail()),
        }
    } else {
        Ok(Node::fail())
    }
}

// ---------------------------------------------------------------------
// Loops
// ---------------------------------------------------------------------

/// Runs one pass over a loop body, honoring break/continue/return.
enum BodySignal {
    Normal(NodeRef),
    Break(NodeRef),
    Return(NodeRef),
}

fn run_loop_body(body: &NodeRef, scope: &EnvRef) -> Result<BodySignal, RyeError> {
    let mut result = Node::success();

    let mut curr = Some(body.clone());
    while let Some(n) = curr {
        let res = if n.kind == NodeKind::Stmt {
            match &n.left {
                Some(inner) => interpret(inner, scope)?,
                None => Node::success(),
            }
        } else {
            interpret(&n, scope)?
        };

        match res.kind {
            NodeKind::Break => return Ok(BodySignal::Break(res)),
            NodeKind::Continue => return Ok(BodySignal::Normal(res)),
            NodeKind::Return => {
                let val = res.right.clone().unwrap_or_else(Node::success);
                return Ok(BodySignal::Return(val));
            }
            _ => result = res,
        }

        curr = n.right.clone();
    }

    Ok(BodySignal::Normal(result))
}

pub fn interpret_while(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let cond = n
        .left
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing loop condition", n.line))?;
    let body = n
        .right
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing loop body", n.line))?;

    let mut result = Node::success();
    loop {
        let cond_val = interpret(cond, env)?;
        if !is_truthy(&cond_val) {
            break;
        }

        let scope = new_scope(env);
        match run_loop_body(body, &scope)? {
            BodySignal::Normal(res) => result = res,
            BodySignal::Break(res) => {
                result = res;
                break;
            }
            BodySignal::Return(val) => return Ok(val),
        }
    }

    Ok(result)
}

/// `for target <- src { body }`. Iterates lists in order, objects by key,
/// sets by present member; each iteration gets a fresh scope binding the
/// target (identifier or pattern) and the reserved `index` counter.
pub fn interpret_for(n: &NodeRef, env: &EnvRef) -> Result<NodeRef, RyeError> {
    let binding = n
        .left
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing loop binding", n.line))?;
    let body = n
        .right
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing loop body", n.line))?;

    let iteratee = binding
        .right
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing loop iteratee", n.line))?;
    let src = interpret(iteratee, env)?;

    let items = match collection_items(&src) {
        Some(items) => items,
        None => return Ok(Node::fail()),
    };

    let target = binding
        .left
        .as_ref()
        .ok_or_else(|| RyeError::runtime_error("Missing loop target", n.line))?;

    let mut result = Node::success();
    for (i, item) in items.into_iter().enumerate() {
        let scope = new_scope(env);

        match target.kind {
            NodeKind::Identifier => {
                let name = target.name().unwrap_or("").to_string();
                scope.borrow_mut().consts.insert(name, item);
            }
            _ => bind_pattern(target, &item, &scope, true),
        }
        scope
            .borrow_mut()
            .consts
            .insert(String::from("index"), Node::int(i as i64));

        match run_loop_body(body, &scope)? {
            BodySignal::Normal(res) => result = res,
            BodySignal::Break(res) => {
                result = res;
                break;
            }
            BodySignal::Return(val) => return Ok(val),
        }
    }

    Ok(result)
}
