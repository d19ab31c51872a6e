pub mod ast_printer;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::rc::Rc;

use log::info;

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::token::Token;

/// The interpreter pipeline: scan → parse → resolve → evaluate.
///
/// The interpreter inside is long-lived, so successive `run` calls share
/// globals and the resolution map; that is what lets the prompt remember
/// definitions from earlier lines.
pub struct Lox {
    interpreter: Interpreter,
    had_error: bool,
    had_runtime_error: bool,
    /// Expression ids already handed out in this session; see
    /// [`Parser::with_first_id`].
    next_expr_id: usize,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    pub fn new() -> Self {
        Lox {
            interpreter: Interpreter::new(),
            had_error: false,
            had_runtime_error: false,
            next_expr_id: 0,
        }
    }

    /// A pipeline whose `print` output goes to `output` instead of stdout.
    pub fn with_output(output: Rc<RefCell<dyn Write>>) -> Self {
        Lox {
            interpreter: Interpreter::with_output(output),
            had_error: false,
            had_runtime_error: false,
            next_expr_id: 0,
        }
    }

    /// True when a scanner, parser, or resolver diagnostic was reported.
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    /// True when evaluation aborted with a runtime error.
    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn run_file(&mut self, path: &Path) -> Result<()> {
        info!("Running file {:?}", path);

        let bytes = std::fs::read(path)?;
        let source = String::from_utf8(bytes)?;

        self.run(&source);

        Ok(())
    }

    /// Interactive mode: one line at a time until end-of-input.
    pub fn run_prompt(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut reader = stdin.lock();

        loop {
            print!("> ");
            io::stdout().flush()?;

            let mut line = String::new();

            if reader.read_line(&mut line)? == 0 {
                // Ctrl-D.
                return Ok(());
            }

            self.run(&line);

            // One bad line must not poison the next.
            self.had_error = false;
            self.had_runtime_error = false;
        }
    }

    /// Run a complete source text through the pipeline.
    ///
    /// Static diagnostics go to stderr and set `had_error`; evaluation only
    /// happens for a clean program.  A runtime error is reported to stderr
    /// and sets `had_runtime_error`.
    pub fn run(&mut self, source: &str) {
        let mut tokens: Vec<Token> = Vec::new();

        for item in Scanner::new(source) {
            match item {
                Ok(token) => tokens.push(token),

                Err(e) => {
                    self.had_error = true;
                    eprintln!("{}", e);
                }
            }
        }

        let mut parser = Parser::with_first_id(tokens, self.next_expr_id);
        let parsed = parser.parse();
        self.next_expr_id = parser.next_expr_id();

        let statements = match parsed {
            Ok(statements) => statements,

            Err(errors) => {
                self.had_error = true;
                for e in &errors {
                    eprintln!("{}", e);
                }
                return;
            }
        };

        // The parse may have succeeded over a token stream with lexical
        // holes; don't evaluate a program the scanner rejected.
        if self.had_error {
            return;
        }

        let resolver = Resolver::new(&mut self.interpreter);

        if let Err(errors) = resolver.resolve(&statements) {
            self.had_error = true;
            for e in &errors {
                eprintln!("{}", e);
            }
            return;
        }

        if let Err(e) = self.interpreter.interpret(&statements) {
            eprintln!("{}", e);
            self.had_runtime_error = true;
        }
    }
}
