use super::diagnostics::{CodeFrame, Message};

use gecco_interpreter::{Chunk, Context, Interpreter, VM};
use gecco_syntax::ast::Program;

use anstream::{eprintln, println};
use std::{fs, io};

fn read_file(filename: &str) -> Result<String, ()> {
  match fs::read_to_string(filename) {
    Ok(file) if file.len() > u32::MAX as usize => {
      eprintln!("{}", Message::error("File too large - max size 4GB".into()));
      Err(())
    }
    Ok(file) => Ok(file),
    Err(_) => {
      eprintln!("{}", Message::error(format!("File not found `{filename}`")));
      Err(())
    }
  }
}

fn parse(filename: &str, source: &str) -> Result<Program, ()> {
  match gecco_syntax::parse(source) {
    Ok(program) => Ok(program),
    Err(error) => {
      eprintln!("{}", Message::from(&error));
      eprintln!("{}", CodeFrame::new(filename, source, error.span()));
      Err(())
    }
  }
}

pub fn run(filename: &str) -> Result<(), ()> {
  let source = read_file(filename)?;
  let program = parse(filename, &source)?;

  let stdout = io::stdout();
  let mut output = stdout.lock();
  let mut context = Context::new(&mut output);

  if let Err(error) = Interpreter::new(&mut context).run(&program) {
    eprintln!("{}", Message::from(&error));
    return Err(());
  }

  Ok(())
}

pub fn compile(filename: &str, output: Option<&str>) -> Result<(), ()> {
  let source = read_file(filename)?;
  let program = parse(filename, &source)?;
  let chunk = gecco_interpreter::compile(&program);

  let output = match output {
    Some(path) => path.to_owned(),
    None => format!("{filename}.bc.json"),
  };

  if fs::write(&output, chunk.to_json_text()).is_err() {
    eprintln!(
      "{}",
      Message::error(format!("Problem writing to file `{output}`"))
    );
    return Err(());
  }

  println!("Wrote {output}");
  Ok(())
}

pub fn exec(filename: &str) -> Result<(), ()> {
  let text = read_file(filename)?;

  let chunk = match Chunk::from_json_text(&text) {
    Ok(chunk) => chunk,
    Err(error) => {
      eprintln!("{}", Message::from(&error));
      return Err(());
    }
  };

  let stdout = io::stdout();
  let mut output = stdout.lock();
  let mut context = Context::new(&mut output);

  if let Err(error) = VM::new(&mut context).run(&chunk) {
    eprintln!("{}", Message::from(&error));
    return Err(());
  }

  Ok(())
}

pub fn print_tokens(filename: &str) -> Result<(), ()> {
  let source = read_file(filename)?;

  let tokens = match gecco_syntax::tokenise(&source) {
    Ok(tokens) => tokens,
    Err(error) => {
      eprintln!("{}", Message::from(&error));
      eprintln!("{}", CodeFrame::new(filename, &source, error.span()));
      return Err(());
    }
  };

  println!("    ╭─[Tokens: {filename}]");
  for token in tokens {
    print!("{:>3} │ {}", token.start, token.kind);
    if !token.kind.has_fixed_length() {
      print!(" (length: {})", token.length);
    }
    println!();
  }
  println!("────╯");

  Ok(())
}

pub fn print_ast(filename: &str) -> Result<(), ()> {
  let source = read_file(filename)?;
  let program = parse(filename, &source)?;

  println!("╭─[Abstract Syntax Tree: {filename}]");
  print!("{program}");
  println!("╯");

  Ok(())
}

pub fn print_bytecode(filename: &str) -> Result<(), ()> {
  let source = read_file(filename)?;
  let program = parse(filename, &source)?;
  let chunk = gecco_interpreter::compile(&program);

  display_chunk(&chunk);

  Ok(())
}

fn display_chunk(chunk: &Chunk) {
  println!("{chunk}");

  for function in chunk.functions() {
    display_chunk(function.chunk());
  }
}
