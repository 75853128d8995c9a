//! Rye is a small dynamically-typed, functional-leaning scripting language
//! with imperative escape hatches. The crate is the interpreter core:
//! a lexer, a parser-combinator engine over a sixteen-level expression
//! grammar, and a tree-walking evaluator with a result-oriented failure
//! model (`fail` / `success`).
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → Interpreter → Value
//! ```

pub mod ast;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod stdlib;

pub use ast::{Node, NodeKind, NodeRef, Payload, ValueKey};
pub use diagnostics::DiagnosticPrinter;
pub use environment::{EnvRef, Environment};
pub use error::RyeError;
pub use interpreter::{interpret, root_environment, run_source};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::parse;
