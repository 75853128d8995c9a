/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * Standard Library Root
 * ---------------------
 * Installs the built-in callables into the root environment. A built-in is
 * a host closure bound as a constant; it receives the current environment
 * and the pre-evaluated argument values, and returns a value or a hard
 * error. Type mismatches yield the `fail` value, wrong argument counts are
 * hard errors.
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

pub mod convert;
pub mod io;
pub mod lists;
pub mod math;
pub mod objects;
pub mod sets;
pub mod strings;

use std::rc::Rc;

use crate::ast::{Node, NodeRef};
use crate::environment::EnvRef;
use crate::error::RyeError;

/// Binds every built-in into `env`'s constants.
pub fn install(env: &EnvRef) {
    // I/O
    register(env, "print", io::print);
    register(env, "readInput", io::read_input);
    register(env, "readFile", io::read_file);
    register(env, "readJson", io::read_json);
    register(env, "writeJson", io::write_json);

    // math
    register(env, "sum", math::sum);
    register(env, "max", math::max);
    register(env, "min", math::min);
    register(env, "random", math::random);

    // strings
    register(env, "split", strings::split);
    register(env, "join", strings::join);
    register(env, "uppercase", strings::uppercase);
    register(env, "lowercase", strings::lowercase);

    // type inspection and conversion
    register(env, "typeof", convert::type_of);
    register(env, "Int", convert::to_int);
    register(env, "Float", convert::to_float);
    register(env, "String", convert::to_string);
    register(env, "Set", convert::to_set);
    register(env, "List", convert::to_list);

    // sets
    register(env, "union", sets::union);
    register(env, "intersection", sets::intersection);
    register(env, "difference", sets::difference);
    register(env, "add", sets::add);
    register(env, "remove", sets::remove);

    // objects
    register(env, "keys", objects::keys);
    register(env, "values", objects::values);

    // lists
    register(env, "flat", lists::flat);
    register(env, "find", lists::find);
    register(env, "findIndex", lists::find_index);
    register(env, "append", lists::append);
    register(env, "reverse", lists::reverse);
}

fn register(
    env: &EnvRef,
    name: &str,
    f: fn(&EnvRef, &[NodeRef]) -> Result<NodeRef, RyeError>,
) {
    env.borrow_mut()
        .consts
        .insert(name.to_string(), Node::builtin(Rc::new(f)));
}

/// Hard error when the argument count is off.
pub(crate) fn check_arity(name: &str, args: &[NodeRef], expected: usize) -> Result<(), RyeError> {
    if args.len() != expected {
        return Err(RyeError::arity_error(
            format!(
                "Wrong number of arguments for \"{}\". Expected {}, received {}.",
                name,
                expected,
                args.len()
            ),
            0,
        ));
    }
    Ok(())
}

pub(crate) fn check_arity_at_least(
    name: &str,
    args: &[NodeRef],
    minimum: usize,
) -> Result<(), RyeError> {
    if args.len() < minimum {
        return Err(RyeError::arity_error(
            format!(
                "Wrong number of arguments for \"{}\". Expected {}+, received {}.",
                name,
                minimum,
                args.len()
            ),
            0,
        ));
    }
    Ok(())
}
