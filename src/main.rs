use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use slate_lang::Slate;

/// Tree-walking interpreter for the Slate scripting language.
#[derive(Parser)]
#[command(name = "slate", version, about)]
struct Cli {
    /// Subcommand to run; starts a REPL when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tokens of a source file, one per line
    Tokenize { file: PathBuf },
    /// Print the parsed syntax tree in parenthesised prefix form
    Parse { file: PathBuf },
    /// Evaluate a file holding a single expression and print the result
    Evaluate { file: PathBuf },
    /// Execute a program
    Run { file: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    let mut stdout = io::stdout();
    let mut slate = Slate::new(&mut stdout);

    match cli.command {
        Some(Command::Tokenize { file }) => slate_lang::tokenize_file(&file),
        Some(Command::Parse { file }) => slate_lang::parse_file(&file),
        Some(Command::Evaluate { file }) => slate.evaluate_file(&file),
        Some(Command::Run { file }) => slate.run_file(&file),
        None => slate.run_prompt(),
    }
}
