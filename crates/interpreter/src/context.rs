//! The per-run context: the native-function table and the output sink.
//!
//! Constructed once per run and threaded through evaluation in both engines,
//! rather than living as process-wide state.

use crate::{
  error::{ErrorKind, RuntimeError},
  stdlib::{self, NativeFunction},
  value::Value,
};
use std::io::Write;

/// The environment a program runs against: native functions and output
pub struct Context<'out> {
  natives: &'static [NativeFunction],
  output: &'out mut dyn Write,
}
impl<'out> Context<'out> {
  /// Create a context with the standard native functions, writing to `output`
  pub fn new(output: &'out mut dyn Write) -> Self {
    Self {
      natives: stdlib::STDLIB,
      output,
    }
  }

  /// Look up a native function by name
  pub(crate) fn native(&self, name: &str) -> Option<&'static NativeFunction> {
    self.natives.iter().find(|native| native.name == name)
  }

  /// Invoke a native function against the context's output
  pub(crate) fn call_native<'a>(
    &mut self,
    function: &NativeFunction,
    arguments: &[Value<'a>],
  ) -> Result<Value<'a>, RuntimeError> {
    function.call(self.output, arguments).map_err(RuntimeError::from)
  }

  /// Write a value's display representation followed by a newline
  pub(crate) fn print_value(&mut self, value: &Value) -> Result<(), RuntimeError> {
    writeln!(self.output, "{value}")
      .map_err(|error| RuntimeError::from(ErrorKind::Output(error.to_string())))
  }
}
