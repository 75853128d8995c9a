/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * Command-line driver. With no arguments, an interactive prompt over a
 * persistent environment; with a script path, runs the file and exits
 * nonzero on failure.
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

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rye::interpreter::display::display;
use rye::{interpret, parse, root_environment, tokenize, DiagnosticPrinter};

#[derive(Parser)]
#[command(name = "rye")]
#[command(about = "Rye - a small functional scripting language", version)]
struct Cli {
    /// Script to run; omit for an interactive prompt
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.script {
        Some(path) => run_file(&path),
        None => run_prompt(),
    }
}

fn run_file(path: &PathBuf) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let printer = DiagnosticPrinter::new(path.display().to_string(), source.clone());

    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            printer.print(&e);
            return ExitCode::FAILURE;
        }
    };

    let root = match parse(tokens) {
        Ok(root) => root,
        Err(e) => {
            printer.print(&e);
            return ExitCode::FAILURE;
        }
    };

    let env = root_environment();
    match interpret(&root, &env) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            printer.print(&e);
            ExitCode::FAILURE
        }
    }
}

fn run_prompt() -> ExitCode {
    let env = root_environment();
    let stdin = std::io::stdin();

    loop {
        print!("> ");
        if std::io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return ExitCode::SUCCESS,
            Ok(_) => {}
        }

        if line.trim().is_empty() {
            continue;
        }

        let tokens = match tokenize(&line) {
            Ok(tokens) => tokens,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        let root = match parse(tokens) {
            Ok(root) => root,
            Err(e) => {
                eprintln!("Error: {}", e);
                continue;
            }
        };

        match interpret(&root, &env) {
            Ok(res) => println!("{}", display(&res)),
            Err(e) => eprintln!("{}", e),
        }
    }
}
