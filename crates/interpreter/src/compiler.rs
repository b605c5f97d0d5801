//! # Bytecode Compiler
//!
//! Lowers an AST into a flat instruction stream with a constant pool.
//!
//! Every node kind is lowered: `if` and `while` become conditional jumps,
//! and function bodies compile into nested function constants entered by the
//! VM through `MakeFunction` and `Call`. Compilation cannot fail, and there
//! is no limit on pool size or instruction count.

use crate::bytecode::{Chunk, Constant, Function, Instruction};
use gecco_syntax::ast::{self, Expression, Program, Statement};

/// Compile an AST into a bytecode chunk
///
/// # Examples
/// ```
/// let program = gecco_syntax::parse("x = 2\nprint x").unwrap();
/// let chunk = gecco_interpreter::compile(&program);
/// ```
pub fn compile(program: &Program) -> Chunk {
  let mut compiler = Compiler::new("main");
  for statement in &program.statements {
    compiler.statement(statement);
  }
  compiler.finish()
}

struct Compiler {
  chunk: Chunk,
}
impl Compiler {
  fn new(name: &str) -> Self {
    Self {
      chunk: Chunk::new(name),
    }
  }

  fn finish(self) -> Chunk {
    self.chunk
  }

  fn statement(&mut self, statement: &Statement) {
    match statement {
      Statement::Print { expression } => {
        self.expression(expression);
        self.chunk.emit(Instruction::Print);
      }
      Statement::If { condition, body } => {
        self.expression(condition);
        let exit = self.chunk.emit(Instruction::JumpIfFalse(usize::MAX));
        for statement in body {
          self.statement(statement);
        }
        let target = self.chunk.len();
        self.chunk.patch_jump(exit, target);
      }
      Statement::While { condition, body } => {
        let start = self.chunk.len();
        self.expression(condition);
        let exit = self.chunk.emit(Instruction::JumpIfFalse(usize::MAX));
        for statement in body {
          self.statement(statement);
        }
        self.chunk.emit(Instruction::Jump(start));
        let target = self.chunk.len();
        self.chunk.patch_jump(exit, target);
      }
      Statement::Function(function) => {
        let constant = self.function(function);
        self.chunk.emit(Instruction::MakeFunction(constant));
        self
          .chunk
          .emit(Instruction::StoreName(function.name.as_str().into()));
      }
      Statement::Assign { name, value } => {
        self.expression(value);
        self.chunk.emit(Instruction::StoreName(name.as_str().into()));
      }
      Statement::Return { value } => {
        match value {
          Some(expression) => self.expression(expression),
          None => {
            self.chunk.emit(Instruction::LoadNull);
          }
        }
        self.chunk.emit(Instruction::Return);
      }
      Statement::Expression { expression } => {
        self.expression(expression);
        self.chunk.emit(Instruction::Pop);
      }
    }
  }

  /// Compile a function body into a function constant, returning its index
  fn function(&mut self, function: &ast::Function) -> usize {
    let mut compiler = Compiler::new(&function.name);
    for statement in &function.body {
      compiler.statement(statement);
    }

    // a body which finishes without an explicit return yields null
    if !matches!(
      compiler.chunk.last_instruction(),
      Some(Instruction::Return)
    ) {
      compiler.chunk.emit(Instruction::LoadNull);
      compiler.chunk.emit(Instruction::Return);
    }

    self.chunk.add_constant(Constant::Function(Function {
      name: function.name.as_str().into(),
      parameters: function
        .parameters
        .iter()
        .map(|parameter| parameter.as_str().into())
        .collect(),
      chunk: compiler.finish(),
    }))
  }

  fn expression(&mut self, expression: &Expression) {
    match expression {
      Expression::Number { value } => {
        let constant = self.chunk.add_constant(Constant::Number(*value));
        self.chunk.emit(Instruction::LoadConstant(constant));
      }
      Expression::String { value } => {
        let constant = self.chunk.add_constant(Constant::String(value.clone()));
        self.chunk.emit(Instruction::LoadConstant(constant));
      }
      Expression::Variable { name } => {
        self.chunk.emit(Instruction::LoadName(name.as_str().into()));
      }
      Expression::Unary { operator, operand } => {
        self.expression(operand);
        self.chunk.emit(Instruction::UnaryOperation(*operator));
      }
      Expression::Binary {
        operator,
        left,
        right,
      } => {
        self.expression(left);
        self.expression(right);
        self.chunk.emit(Instruction::BinaryOperation(*operator));
      }
      Expression::Call {
        function,
        arguments,
      } => {
        for argument in arguments {
          self.expression(argument);
        }
        self.chunk.emit(Instruction::Call {
          function: function.as_str().into(),
          arguments: arguments.len(),
        });
      }
    }
  }
}
