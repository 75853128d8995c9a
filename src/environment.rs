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

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::NodeRef;

pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope. A name lives in exactly one of `consts` or `vars`;
/// lookup walks the `parent` chain. Lambdas hold an `EnvRef` to the scope
/// they captured, which keeps that scope (and its ancestors) alive for as
/// long as the lambda is reachable.
#[derive(Debug)]
pub struct Environment {
    pub parent: Option<EnvRef>,
    pub consts: HashMap<String, NodeRef>,
    pub vars: HashMap<String, NodeRef>,
}

impl Environment {
    pub fn new(parent: Option<EnvRef>) -> EnvRef {
        Rc::new(RefCell::new(Self {
            parent,
            consts: HashMap::new(),
            vars: HashMap::new(),
        }))
    }

    /// Walks the scope chain looking for `name`, constants before variables.
    pub fn lookup(env: &EnvRef, name: &str) -> Option<NodeRef> {
        let mut current = Some(env.clone());
        while let Some(e) = current {
            let scope = e.borrow();
            if let Some(val) = scope.consts.get(name) {
                return Some(val.clone());
            }
            if let Some(val) = scope.vars.get(name) {
                return Some(val.clone());
            }
            current = scope.parent.clone();
        }
        None
    }

    /// True when `name` is declared somewhere in the chain.
    pub fn is_defined(env: &EnvRef, name: &str) -> bool {
        Environment::lookup(env, name).is_some()
    }

    /// The outermost environment in the chain. Modules are bound here so an
    /// import anywhere in a program is visible everywhere in it.
    pub fn top_most(env: &EnvRef) -> EnvRef {
        let mut current = env.clone();
        loop {
            let parent = current.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => return current,
            }
        }
    }
}
