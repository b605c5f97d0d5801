//! Runtime errors shared by the tree-walking interpreter and the virtual machine.

use gecco_syntax::ast::{BinaryOperator, UnaryOperator};
use std::{error, fmt};

/// An error whilst executing a program, in either engine
///
/// Every runtime error is an immediate, unrecovered abort of the current run.
#[derive(Clone, Debug)]
pub struct RuntimeError {
  kind: ErrorKind,
}
impl RuntimeError {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> &'static str {
    match self.kind {
      ErrorKind::UndefinedVariable(_) | ErrorKind::UndefinedFunction(_) => "Name Error",
      ErrorKind::NotCallable { .. }
      | ErrorKind::WrongArgumentCount { .. }
      | ErrorKind::UnsupportedUnaryOperand { .. }
      | ErrorKind::UnsupportedOperands { .. } => "Type Error",
      ErrorKind::InvalidBytecode(_) | ErrorKind::Output(_) => "Runtime Error",
    }
  }

  /// The body of the error message describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> String {
    match &self.kind {
      ErrorKind::UndefinedVariable(name) => {
        format!("variable `{name}` is not defined")
      }
      ErrorKind::UndefinedFunction(name) => {
        format!("function `{name}` is not defined")
      }
      ErrorKind::NotCallable { name, type_name } => {
        format!("`{name}` is a {type_name}, and {type_name}s are not callable")
      }
      ErrorKind::WrongArgumentCount {
        function,
        expected,
        got,
      } => {
        format!("`{function}` expects {expected} arguments, but got {got}")
      }
      ErrorKind::UnsupportedUnaryOperand { operator, operand } => {
        format!("unsupported operand type for `{operator}`: `{operand}`")
      }
      ErrorKind::UnsupportedOperands {
        operator,
        left,
        right,
      } => {
        format!("unsupported operand types for `{operator}`: `{left}` and `{right}`")
      }
      ErrorKind::InvalidBytecode(message) => {
        format!("invalid bytecode: {message}")
      }
      ErrorKind::Output(message) => {
        format!("could not write output: {message}")
      }
    }
  }
}
impl From<ErrorKind> for RuntimeError {
  fn from(kind: ErrorKind) -> Self {
    Self { kind }
  }
}
impl fmt::Display for RuntimeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message())
  }
}
impl error::Error for RuntimeError {}

#[derive(Clone, Debug)]
pub(crate) enum ErrorKind {
  /// A variable name which is in neither the environment nor the native table
  UndefinedVariable(String),
  /// A called name which is in neither the environment nor the native table
  UndefinedFunction(String),
  /// A called name which resolved to a value which cannot be invoked
  NotCallable {
    name: String,
    type_name: &'static str,
  },
  /// A function call with the wrong number of arguments
  WrongArgumentCount {
    function: String,
    expected: usize,
    got: usize,
  },
  /// A unary operator applied to a value it doesn't support
  UnsupportedUnaryOperand {
    operator: UnaryOperator,
    operand: &'static str,
  },
  /// A binary operator applied to values it doesn't support
  UnsupportedOperands {
    operator: BinaryOperator,
    left: &'static str,
    right: &'static str,
  },
  /// A problem in the executed bytecode itself, e.g. an out of range index
  InvalidBytecode(String),
  /// The output sink failed
  Output(String),
}
