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

use crate::ast::{NodeKind, NodeRef};

/// The REPL-facing form of a value: atoms by their literal form, structural
/// values by their pretty-printed shape, lambdas as `<lambda>`, and
/// anything non-value (a declaration, an import) as plain `success`.
pub fn display(n: &NodeRef) -> String {
    match n.kind {
        NodeKind::Int
        | NodeKind::Float
        | NodeKind::Bool
        | NodeKind::Str
        | NodeKind::Identifier
        | NodeKind::List
        | NodeKind::Object
        | NodeKind::Set
        | NodeKind::Null
        | NodeKind::Underscore
        | NodeKind::Fail
        | NodeKind::Success
        | NodeKind::Module => n.to_sexpr(),
        NodeKind::Lambda => String::from("<lambda>"),
        _ => String::from("success"),
    }
}

/// The `print` builtin's form: strings print raw, everything else prints
/// its literal shape.
pub fn print_form(n: &NodeRef) -> String {
    match n.kind {
        NodeKind::Str => n.as_str().unwrap_or("").to_string(),
        _ => n.to_sexpr(),
    }
}
