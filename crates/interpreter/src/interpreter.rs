//! # Tree-walking interpreter
//!
//! Walks the AST directly against the frame-arena environment.

use crate::{
  context::Context,
  environment::{Environment, FrameId},
  error::{ErrorKind, RuntimeError},
  value::{self, Closure, Value},
};
use gecco_syntax::ast::{Expression, Program, Statement};

/// Executes an AST directly, without compiling it first
pub struct Interpreter<'a, 'ctx, 'out> {
  environment: Environment<'a>,
  context: &'ctx mut Context<'out>,
}

/// The result of executing a statement
enum Outcome<'a> {
  /// Execution continues with the next statement
  Continue,
  /// Unwind to the nearest enclosing function call with a value
  Return(Value<'a>),
}

impl<'a, 'ctx, 'out> Interpreter<'a, 'ctx, 'out> {
  /// Create an interpreter for a single run
  pub fn new(context: &'ctx mut Context<'out>) -> Self {
    Self {
      environment: Environment::new(),
      context,
    }
  }

  /// Run a program to completion
  ///
  /// # Errors
  /// Returns an error when evaluation fails; the program is aborted at the
  /// first error.
  pub fn run(&mut self, program: &'a Program) -> Result<(), RuntimeError> {
    let global = self.environment.global();

    // the parser rejects top-level `return`, so the outcome is always Continue
    for statement in &program.statements {
      self.execute(statement, global)?;
    }

    Ok(())
  }

  fn execute(
    &mut self,
    statement: &'a Statement,
    frame: FrameId,
  ) -> Result<Outcome<'a>, RuntimeError> {
    match statement {
      Statement::Print { expression } => {
        let value = self.evaluate(expression, frame)?;
        self.context.print_value(&value)?;
        Ok(Outcome::Continue)
      }
      Statement::If { condition, body } => {
        if self.evaluate(condition, frame)?.is_truthy() {
          self.execute_block(body, frame)
        } else {
          Ok(Outcome::Continue)
        }
      }
      Statement::While { condition, body } => {
        while self.evaluate(condition, frame)?.is_truthy() {
          if let Outcome::Return(value) = self.execute_block(body, frame)? {
            return Ok(Outcome::Return(value));
          }
        }
        Ok(Outcome::Continue)
      }
      Statement::Function(function) => {
        self.environment.define(
          frame,
          function.name.as_str(),
          Value::Function(Closure { function, frame }),
        );
        Ok(Outcome::Continue)
      }
      Statement::Assign { name, value } => {
        let value = self.evaluate(value, frame)?;
        self.environment.define(frame, name.as_str(), value);
        Ok(Outcome::Continue)
      }
      Statement::Return { value } => {
        let value = match value {
          Some(expression) => self.evaluate(expression, frame)?,
          None => Value::Null,
        };
        Ok(Outcome::Return(value))
      }
      Statement::Expression { expression } => {
        self.evaluate(expression, frame)?;
        Ok(Outcome::Continue)
      }
    }
  }

  /// Execute statements in order, short-circuiting on a `return`
  fn execute_block(
    &mut self,
    statements: &'a [Statement],
    frame: FrameId,
  ) -> Result<Outcome<'a>, RuntimeError> {
    for statement in statements {
      if let Outcome::Return(value) = self.execute(statement, frame)? {
        return Ok(Outcome::Return(value));
      }
    }
    Ok(Outcome::Continue)
  }

  fn evaluate(
    &mut self,
    expression: &'a Expression,
    frame: FrameId,
  ) -> Result<Value<'a>, RuntimeError> {
    match expression {
      Expression::Number { value } => Ok(Value::Number(*value)),
      Expression::String { value } => Ok(Value::String(value.as_str().into())),
      Expression::Variable { name } => self.variable(name, frame),
      Expression::Unary { operator, operand } => {
        let operand = self.evaluate(operand, frame)?;
        value::unary_operation(*operator, &operand).map_err(RuntimeError::from)
      }
      Expression::Binary {
        operator,
        left,
        right,
      } => {
        let left = self.evaluate(left, frame)?;
        let right = self.evaluate(right, frame)?;
        value::binary_operation(*operator, &left, &right).map_err(RuntimeError::from)
      }
      Expression::Call {
        function,
        arguments,
      } => {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
          values.push(self.evaluate(argument, frame)?);
        }
        self.call(function, &values, frame)
      }
    }
  }

  /// Resolve a name: the frame chain first, then the native table
  fn variable(&mut self, name: &str, frame: FrameId) -> Result<Value<'a>, RuntimeError> {
    if let Some(value) = self.environment.lookup(frame, name) {
      return Ok(value.clone());
    }
    if let Some(native) = self.context.native(name) {
      return Ok(Value::NativeFunction(native));
    }
    Err(ErrorKind::UndefinedVariable(name.to_owned()).into())
  }

  fn call(
    &mut self,
    name: &str,
    arguments: &[Value<'a>],
    frame: FrameId,
  ) -> Result<Value<'a>, RuntimeError> {
    // for calls the native table wins over user definitions of the same name
    if let Some(native) = self.context.native(name) {
      return self.context.call_native(native, arguments);
    }

    match self.environment.lookup(frame, name).cloned() {
      Some(Value::Function(closure)) => self.call_closure(name, closure, arguments),
      Some(Value::NativeFunction(native)) => self.context.call_native(native, arguments),
      Some(value) => Err(
        ErrorKind::NotCallable {
          name: name.to_owned(),
          type_name: value.type_name(),
        }
        .into(),
      ),
      None => Err(ErrorKind::UndefinedFunction(name.to_owned()).into()),
    }
  }

  fn call_closure(
    &mut self,
    name: &str,
    closure: Closure<'a>,
    arguments: &[Value<'a>],
  ) -> Result<Value<'a>, RuntimeError> {
    let parameters = &closure.function.parameters;
    if parameters.len() != arguments.len() {
      return Err(
        ErrorKind::WrongArgumentCount {
          function: name.to_owned(),
          expected: parameters.len(),
          got: arguments.len(),
        }
        .into(),
      );
    }

    // a child of the frame the function was defined in, not of the caller's
    let call_frame = self.environment.push_frame(closure.frame);
    for (parameter, argument) in parameters.iter().zip(arguments) {
      self
        .environment
        .define(call_frame, parameter.as_str(), argument.clone());
    }

    match self.execute_block(&closure.function.body, call_frame)? {
      Outcome::Return(value) => Ok(value),
      Outcome::Continue => Ok(Value::Null),
    }
  }
}
