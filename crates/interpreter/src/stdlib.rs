//! # Standard library
//!
//! The fixed table of native functions, shared by both execution engines.

use crate::{error::ErrorKind, value::Value};
use std::{fmt, io::Write};

/// A function provided by the host rather than defined in a script
pub struct NativeFunction {
  /// The name the function is resolved by
  pub name: &'static str,
  pub(crate) func:
    for<'a> fn(&mut dyn Write, &[Value<'a>]) -> Result<Value<'a>, ErrorKind>,
}
impl NativeFunction {
  pub(crate) fn call<'a>(
    &self,
    output: &mut dyn Write,
    arguments: &[Value<'a>],
  ) -> Result<Value<'a>, ErrorKind> {
    (self.func)(output, arguments)
  }
}
impl fmt::Debug for NativeFunction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "<native function {}>", self.name)
  }
}

/// The native functions available to every run
pub(crate) const STDLIB: &[NativeFunction] = &[NativeFunction {
  name: "print",
  func: print,
}];

/// Write the arguments separated by single spaces, with a trailing newline
fn print<'a>(output: &mut dyn Write, arguments: &[Value<'a>]) -> Result<Value<'a>, ErrorKind> {
  let mut arguments = arguments.iter();

  if let Some(first) = arguments.next() {
    write!(output, "{first}").map_err(output_error)?;
    for argument in arguments {
      write!(output, " {argument}").map_err(output_error)?;
    }
  }
  writeln!(output).map_err(output_error)?;

  Ok(Value::Null)
}

fn output_error(error: std::io::Error) -> ErrorKind {
  ErrorKind::Output(error.to_string())
}
