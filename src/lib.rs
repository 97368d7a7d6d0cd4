//! Slate is a dynamically typed scripting language with C-like syntax,
//! lexical scoping, first-class functions with closures, and
//! single-inheritance classes. The interpreter is a tree-walk interpreter
//! with a hand-written recursive descent parser, inspired by the
//! [Crafting Interpreters](https://craftinginterpreters.com/) book by Bob
//! Nystrom.
//!
//! The pipeline has four stages, each one a pure transform over the
//! previous stage's output plus error reports:
//!
//! ```text
//! source -> Scanner -> tokens -> Parser -> AST -> Resolver -> Interpreter
//! ```
//!
//! ## Scanning
//! The [`scanner`](scanner) converts the source text into a list of
//! [`tokens`](token::Token). Lexical problems such as an unterminated
//! string or an unexpected character are reported as a
//! [`ScanError`](error::ScanError) as soon as they are encountered, and
//! scanning continues so that a single run surfaces every lexical error in
//! the file.
//!
//! ## Parsing
//! The [`parser`](parser) converts the token list into an abstract syntax
//! tree of [`expressions`](expr::Expr) and [`statements`](stmt::Stmt).
//! Expressions are pieces of code that produce an
//! [`Object`](object::Object); statements perform an action instead. The
//! parser reports a [`ParseError`](error::ParseError) when the tokens do
//! not fit the grammar, then discards tokens until a likely statement
//! boundary and keeps going, so several syntax errors can be reported in
//! one run.
//!
//! ## Resolving
//! The [`resolver`](resolver) walks the finished AST and records, for every
//! use of a local variable, how many scopes lie between the use and the
//! declaration. The interpreter later walks the environment chain by
//! exactly that distance, which is what makes closures capture the scope
//! they were declared in rather than whatever scope happens to be active
//! at call time. The resolver also reports semantic problems that are
//! visible without running the program, like `return` at the top level or
//! `this` outside of a class, as a [`ResolveError`](error::ResolveError).
//!
//! ## Interpreting
//! The [`interpreter`](interpreter) walks the AST and evaluates it.
//! Problems that only show up with live values, like adding a number to a
//! string or calling something that is not callable, are reported as a
//! [`RuntimeError`](error::RuntimeError) and stop the program. Variables
//! live in a chain of [`environments`](environment::Environment), one per
//! scope, shared by every closure that captured them.
//!
//! If any stage reported an error, the later stages do not run: a program
//! with a parse error is never executed.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process;

use rustyline::error::ReadlineError;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use ast::ASTPrinter;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Reads a source file or exits with the conventional I/O failure code.
fn read_source(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Could not read {}: {error}", path.display());
            process::exit(66);
        }
    }
}

/// Prints the tokens of a source file, one per line. All tokens are
/// printed even when the scanner reported errors along the way.
pub fn tokenize_file(path: &Path) {
    let contents = read_source(path);

    let tokens = Scanner::new(&contents).scan_tokens();
    for token in &tokens {
        println!("{token}");
    }

    if error::did_error() {
        process::exit(65);
    }
}

/// Prints the statements of a source file in parenthesised prefix form,
/// one per line.
pub fn parse_file(path: &Path) {
    let contents = read_source(path);

    let tokens = Scanner::new(&contents).scan_tokens();
    if error::did_error() {
        process::exit(65);
    }

    let statements = Parser::new(tokens).parse();
    if error::did_error() {
        process::exit(65);
    }

    let mut printer = ASTPrinter;
    for statement in &statements {
        println!("{}", printer.print(statement));
    }
}

/// The interpreter facade: owns the pipeline and the output sink the
/// interpreted program prints to.
pub struct Slate<'a> {
    interpreter: Interpreter<'a>,
}

impl<'a> Slate<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        Slate {
            interpreter: Interpreter::new(output),
        }
    }

    /// Runs a program from a file. Exits with 65 when a static error was
    /// reported and 70 when a runtime error was.
    pub fn run_file(&mut self, path: &Path) {
        let contents = read_source(path);

        self.run(&contents);

        if error::did_runtime_error() {
            process::exit(70);
        }
        if error::did_error() {
            process::exit(65);
        }
    }

    /// Evaluates a file holding a single expression and prints the result.
    pub fn evaluate_file(&mut self, path: &Path) {
        let contents = read_source(path);

        let tokens = Scanner::new(&contents).scan_tokens();
        if error::did_error() {
            process::exit(65);
        }

        let Some(expression) = Parser::new(tokens).parse_expression() else {
            process::exit(65);
        };

        self.interpreter.interpret_expression(&expression);

        if error::did_runtime_error() {
            process::exit(70);
        }
    }

    /// Runs an interactive prompt. The error flags are reset between lines
    /// so one bad line does not poison the session, and the line history
    /// survives across sessions in the home directory.
    pub fn run_prompt(&mut self) {
        let mut editor = rustyline::DefaultEditor::new()
            .expect("should be able to open a line editor");

        let history = home::home_dir().map(|dir| dir.join(".slate_history"));
        if let Some(history) = &history {
            let _ = editor.load_history(history);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    let _ = editor.add_history_entry(&line);

                    self.run(&line);
                    error::reset_error();
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("Could not read line: {error}");
                    break;
                }
            }
        }

        if let Some(history) = &history {
            let _ = editor.save_history(history);
        }
    }

    /// Runs a program through the full pipeline. Each stage only runs when
    /// the previous stages reported no errors.
    fn run(&mut self, source: &str) {
        let tokens = Scanner::new(source).scan_tokens();

        if error::did_error() {
            return;
        }

        let statements = Parser::new(tokens).parse();

        if error::did_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);

        if error::did_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }
}
