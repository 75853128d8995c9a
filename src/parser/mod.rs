/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * Parser Combinator Engine & Grammar
 * ----------------------------------
 * Turns the token stream into an AST. The implementation is split across:
 *
 *  - state.rs       → ParseState and the primitive token parsers
 *  - combinators.rs → Then/Either/Plus/... higher-order constructors
 *  - builders.rs    → result builders that assemble the tree
 *  - rewrite.rs     → the implicit-lambda (underscore) rewrite
 *  - grammar.rs     → the Rye grammar itself and the parse() entry point
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

pub mod builders;
pub mod combinators;
pub mod grammar;
pub mod rewrite;
pub mod state;

pub use grammar::parse;
pub use state::{ParseState, ParserRef};
