//! # Gecco
//! A small scripting language, with two ways to run a script: a
//! tree-walking interpreter, and a bytecode compiler paired with a
//! stack-based virtual machine.

#![allow(clippy::print_stdout)]

mod commands;
mod diagnostics;

use clap::builder::styling::{AnsiColor, Style, Styles};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process;

const STYLES: Styles = Styles::styled()
  .usage(Style::new().italic())
  .header(AnsiColor::BrightYellow.on_default().bold());

fn coloured_header() -> String {
  format!(
    "{} {}",
    "Gecco".green().bold(),
    "(v1.0.0)".italic().dimmed()
  )
}

fn about() -> String {
  format!(
    "{}\nA small scripting language - interpreted, or compiled for a stack VM.",
    coloured_header()
  )
}

#[derive(Parser)]
#[clap(
  name = "gecco",
  version,
  about = about(),
  styles = STYLES,
  disable_help_subcommand = true,
)]
enum App {
  /// Runs a Gecco program with the tree-walking interpreter
  Run {
    /// The file to run
    file: String,
  },

  /// Compiles a Gecco program to a bytecode file
  Compile {
    /// The file to compile
    file: String,
    /// Where to write the bytecode [default: FILE.bc.json]
    #[clap(short, long)]
    output: Option<String>,
  },

  /// Executes a compiled bytecode file on the virtual machine
  Exec {
    /// The bytecode file to execute
    file: String,
  },

  /// Prints debugging information
  Print {
    #[command(subcommand)]
    command: PrintCommand,
  },
}

#[derive(Subcommand)]
enum PrintCommand {
  /// Displays the tokens in the file
  Tokens {
    /// The file to print
    file: String,
  },
  /// Displays the Abstract Syntax Tree
  Ast {
    /// The file to print
    file: String,
  },
  /// Displays the compiled bytecode
  Bytecode {
    /// The file to print
    file: String,
  },
}

fn main() -> process::ExitCode {
  let args = App::parse();

  let result = match args {
    App::Run { file } => commands::run(&file),
    App::Compile { file, output } => commands::compile(&file, output.as_deref()),
    App::Exec { file } => commands::exec(&file),
    App::Print { command } => match command {
      PrintCommand::Tokens { file } => commands::print_tokens(&file),
      PrintCommand::Ast { file } => commands::print_ast(&file),
      PrintCommand::Bytecode { file } => commands::print_bytecode(&file),
    },
  };

  match result {
    Ok(()) => process::ExitCode::SUCCESS,
    Err(()) => process::ExitCode::FAILURE,
  }
}
