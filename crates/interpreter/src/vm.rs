//! # Virtual Machine
//!
//! A stack machine executing compiled chunks against the same frame-arena
//! environment as the tree-walking interpreter.

use crate::{
  bytecode::{Chunk, Constant, Instruction},
  context::Context,
  environment::{Environment, FrameId},
  error::{ErrorKind, RuntimeError},
  value::{self, CompiledClosure, Value},
};

/// A call in progress: where execution continues when the callee returns
struct CallFrame<'a> {
  chunk: &'a Chunk,
  ip: usize,
  frame: FrameId,
}

/// A virtual machine to execute compiled bytecode
pub struct VM<'a, 'ctx, 'out> {
  stack: Vec<Value<'a>>,
  frames: Vec<CallFrame<'a>>,
  environment: Environment<'a>,
  context: &'ctx mut Context<'out>,
}
impl<'a, 'ctx, 'out> VM<'a, 'ctx, 'out> {
  /// Create a VM for a single run
  pub fn new(context: &'ctx mut Context<'out>) -> Self {
    Self {
      stack: Vec::with_capacity(64),
      frames: Vec::new(),
      environment: Environment::new(),
      context,
    }
  }

  fn pop(&mut self) -> Result<Value<'a>, RuntimeError> {
    self
      .stack
      .pop()
      .ok_or_else(|| ErrorKind::InvalidBytecode("the stack is empty".into()).into())
  }

  /// Run a chunk of bytecode to completion
  ///
  /// # Errors
  /// Returns an error if a runtime error is encountered in the bytecode
  /// being executed; execution stops at the first error.
  #[allow(clippy::too_many_lines)]
  pub fn run(&mut self, chunk: &'a Chunk) -> Result<(), RuntimeError> {
    let mut chunk = chunk;
    let mut ip = 0;
    let mut frame = self.environment.global();

    loop {
      let Some(instruction) = chunk.instruction(ip) else {
        // compiled function bodies always end with a return
        if !self.frames.is_empty() {
          return Err(ErrorKind::InvalidBytecode("function ended without a return".into()).into());
        }
        break;
      };

      match instruction {
        Instruction::LoadConstant(index) => {
          let value = match self.constant(chunk, *index)? {
            Constant::Number(value) => Value::Number(*value),
            Constant::String(value) => Value::String(value.as_str().into()),
            Constant::Function(_) => {
              return Err(
                ErrorKind::InvalidBytecode(format!(
                  "constant {index} is a function, it is loaded with MAKE_FUNCTION"
                ))
                .into(),
              );
            }
          };
          self.stack.push(value);
        }
        Instruction::LoadNull => self.stack.push(Value::Null),
        Instruction::LoadName(name) => {
          let value = if let Some(value) = self.environment.lookup(frame, name) {
            value.clone()
          } else if let Some(native) = self.context.native(name) {
            Value::NativeFunction(native)
          } else {
            return Err(ErrorKind::UndefinedVariable(name.to_string()).into());
          };
          self.stack.push(value);
        }
        Instruction::StoreName(name) => {
          let value = self.pop()?;
          self.environment.define(frame, name.clone(), value);
        }
        Instruction::UnaryOperation(operator) => {
          let operand = self.pop()?;
          self.stack.push(value::unary_operation(*operator, &operand)?);
        }
        Instruction::BinaryOperation(operator) => {
          let right = self.pop()?;
          let left = self.pop()?;
          self
            .stack
            .push(value::binary_operation(*operator, &left, &right)?);
        }
        Instruction::Print => {
          let value = self.pop()?;
          self.context.print_value(&value)?;
        }
        Instruction::Pop => {
          self.pop()?;
        }
        Instruction::Call {
          function: name,
          arguments,
        } => {
          if self.stack.len() < *arguments {
            return Err(ErrorKind::InvalidBytecode("the stack is empty".into()).into());
          }
          // popping the arguments together restores left-to-right order
          let values = self.stack.split_off(self.stack.len() - arguments);

          // the native table wins over user definitions of the same name
          if let Some(native) = self.context.native(name) {
            let result = self.context.call_native(native, &values)?;
            self.stack.push(result);
          } else {
            match self.environment.lookup(frame, name).cloned() {
              Some(Value::CompiledFunction(closure)) => {
                let parameters = &closure.function.parameters;
                if parameters.len() != values.len() {
                  return Err(
                    ErrorKind::WrongArgumentCount {
                      function: name.to_string(),
                      expected: parameters.len(),
                      got: values.len(),
                    }
                    .into(),
                  );
                }

                self.frames.push(CallFrame {
                  chunk,
                  ip: ip + 1,
                  frame,
                });

                // a child of the closure's frame, not of the caller's
                let call_frame = self.environment.push_frame(closure.frame);
                for (parameter, argument) in parameters.iter().zip(values) {
                  self.environment.define(call_frame, parameter.clone(), argument);
                }

                chunk = closure.function.chunk();
                ip = 0;
                frame = call_frame;
                continue;
              }
              Some(Value::NativeFunction(native)) => {
                let result = self.context.call_native(native, &values)?;
                self.stack.push(result);
              }
              Some(value) => {
                return Err(
                  ErrorKind::NotCallable {
                    name: name.to_string(),
                    type_name: value.type_name(),
                  }
                  .into(),
                );
              }
              None => return Err(ErrorKind::UndefinedFunction(name.to_string()).into()),
            }
          }
        }
        Instruction::MakeFunction(index) => {
          let Constant::Function(function) = self.constant(chunk, *index)? else {
            return Err(
              ErrorKind::InvalidBytecode(format!("constant {index} is not a function")).into(),
            );
          };
          self
            .stack
            .push(Value::CompiledFunction(CompiledClosure { function, frame }));
        }
        Instruction::Return => {
          let result = self.pop()?;
          let Some(call_frame) = self.frames.pop() else {
            return Err(ErrorKind::InvalidBytecode("return outside a function call".into()).into());
          };

          chunk = call_frame.chunk;
          ip = call_frame.ip;
          frame = call_frame.frame;
          self.stack.push(result);
          continue;
        }
        Instruction::Jump(target) => {
          ip = jump_target(chunk, *target)?;
          continue;
        }
        Instruction::JumpIfFalse(target) => {
          let condition = self.pop()?;
          if !condition.is_truthy() {
            ip = jump_target(chunk, *target)?;
            continue;
          }
        }
      }

      ip += 1;
    }

    Ok(())
  }

  fn constant(&self, chunk: &'a Chunk, index: usize) -> Result<&'a Constant, RuntimeError> {
    chunk
      .constant(index)
      .ok_or_else(|| ErrorKind::InvalidBytecode(format!("no constant at index {index}")).into())
  }
}

/// A jump one past the last instruction halts the chunk, anything further is invalid
fn jump_target(chunk: &Chunk, target: usize) -> Result<usize, RuntimeError> {
  if target <= chunk.len() {
    Ok(target)
  } else {
    Err(ErrorKind::InvalidBytecode(format!("jump target {target} is out of range")).into())
  }
}
