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

use crate::error::RyeError;

/// Renders compiler-style diagnostics for script errors.
///
/// Output is modeled on `rustc`, simplified to line granularity:
///
/// ```text
/// error[E_PARSE]: Unexpected ) token
///   --> example.rye:12
///    |
/// 12 | total := (1 + )
/// help: ...
/// ```
pub struct DiagnosticPrinter {
    /// Full source of the file being interpreted, kept so the offending
    /// line can be shown.
    source: String,

    /// Display name of the source file.
    file_name: String,
}

impl DiagnosticPrinter {
    pub fn new(file_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            source: source.into(),
        }
    }

    /// Prints a formatted diagnostic to stderr.
    pub fn print(&self, error: &RyeError) {
        if error.line == 0 {
            eprintln!("error[{}]: {}", error.code, error.message);
        } else {
            eprintln!(
                "error[{}]: {}\n  --> {}:{}",
                error.code, error.message, self.file_name, error.line
            );

            let lines: Vec<&str> = self.source.lines().collect();
            if let Some(src_line) = lines.get(error.line.saturating_sub(1)) {
                eprintln!("   |");
                eprintln!("{:>3} | {}", error.line, src_line);
            }
        }

        if let Some(help) = &error.help {
            eprintln!("help: {}", help);
        }
    }
}
