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

use std::fmt;

/// A hard error. Hard errors abort evaluation and propagate out of every
/// enclosing construct; soft failures are the in-band `fail` value and never
/// take this path.
#[derive(Debug, Clone)]
pub struct RyeError {
    /// Stable error code (E_LEX, E_PARSE, E_RUNTIME, ...)
    pub code: &'static str,

    /// Human-readable error message
    pub message: String,

    /// 1-based source line; 0 when unknown
    pub line: usize,

    /// Optional note / help text
    pub help: Option<String>,
}

impl RyeError {
    /// Generic constructor
    pub fn new(code: &'static str, message: impl Into<String>, line: usize) -> Self {
        Self {
            code,
            message: message.into(),
            line,
            help: None,
        }
    }

    /// Lexical error (unexpected character, unterminated string)
    pub fn lex_error(message: impl Into<String>, line: usize) -> Self {
        Self::new("E_LEX", message, line)
    }

    /// Syntax error raised by the parser
    pub fn parse_error(message: impl Into<String>, line: usize) -> Self {
        Self::new("E_PARSE", message, line)
    }

    /// Runtime error (invalid operation, bad assignment target, ...)
    pub fn runtime_error(message: impl Into<String>, line: usize) -> Self {
        Self::new("E_RUNTIME", message, line)
    }

    /// Reference error (undefined identifier, assignment to a constant)
    pub fn reference_error(message: impl Into<String>, line: usize) -> Self {
        Self::new("E_REFERENCE", message, line)
    }

    /// Wrong number of arguments to a callable
    pub fn arity_error(message: impl Into<String>, line: usize) -> Self {
        Self::new("E_ARITY", message, line)
    }

    /// Failed module load (read, parse, or execution)
    pub fn import_error(message: impl Into<String>, line: usize) -> Self {
        Self::new("E_IMPORT", message, line)
    }

    /// Attach a help message to the error (builder-style).
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for RyeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "Line {}: {}", self.line, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for RyeError {}
