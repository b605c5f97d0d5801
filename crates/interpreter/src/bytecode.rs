//! # Bytecode
//!
//! The flat instruction stream, its constant pool, and the JSON file format
//! the compiler persists.
//!
//! The bytecode file is a JSON object with two fields: `code`, an array of
//! `[opcode-name, operand]` pairs, and `consts`, the constant pool in order.
//! Function constants are nested objects carrying their own `code` and
//! `consts`. The encoding round-trips exactly: decoding an encoded chunk
//! gives an equal chunk.

use crate::collections::String as SmartString;
use gecco_syntax::ast::{BinaryOperator, UnaryOperator};
use serde_json::{Value as Json, json};
use std::{error, fmt};

/// A chunk of bytecode with its constant pool
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
  pub(crate) name: SmartString,
  pub(crate) code: Vec<Instruction>,
  pub(crate) constants: Vec<Constant>,
}
impl Chunk {
  pub(crate) fn new(name: impl Into<SmartString>) -> Self {
    Self {
      name: name.into(),
      code: Vec::with_capacity(32),
      constants: Vec::new(),
    }
  }

  /// The number of instructions in the chunk
  pub(crate) fn len(&self) -> usize {
    self.code.len()
  }

  pub(crate) fn instruction(&self, position: usize) -> Option<&Instruction> {
    self.code.get(position)
  }

  pub(crate) fn last_instruction(&self) -> Option<&Instruction> {
    self.code.last()
  }

  pub(crate) fn constant(&self, index: usize) -> Option<&Constant> {
    self.constants.get(index)
  }

  /// Append an instruction, returning its position
  pub(crate) fn emit(&mut self, instruction: Instruction) -> usize {
    let position = self.code.len();
    self.code.push(instruction);
    position
  }

  /// Intern a constant: an equal constant reuses the existing slot
  pub(crate) fn add_constant(&mut self, constant: Constant) -> usize {
    if let Some(position) = self.constants.iter().position(|existing| *existing == constant) {
      position
    } else {
      let position = self.constants.len();
      self.constants.push(constant);
      position
    }
  }

  /// Point a previously emitted jump at a target instruction
  pub(crate) fn patch_jump(&mut self, position: usize, target: usize) {
    match &mut self.code[position] {
      Instruction::Jump(t) | Instruction::JumpIfFalse(t) => *t = target,
      _ => unreachable!("patched instruction is a jump"),
    }
  }

  /// The function constants of this chunk, for displaying nested bytecode
  pub fn functions(&self) -> impl Iterator<Item = &Function> {
    self.constants.iter().filter_map(|constant| match constant {
      Constant::Function(function) => Some(function),
      _ => None,
    })
  }
}

/// JSON bytecode-file encoding and decoding
impl Chunk {
  /// Encode the chunk as the JSON bytecode object
  #[must_use]
  pub fn to_json(&self) -> Json {
    json!({
      "code": self.code.iter().map(Instruction::to_json).collect::<Vec<_>>(),
      "consts": self.constants.iter().map(Constant::to_json).collect::<Vec<_>>(),
    })
  }

  /// Encode the chunk as the text of a bytecode file
  #[must_use]
  pub fn to_json_text(&self) -> String {
    serde_json::to_string_pretty(&self.to_json()).expect("json values serialise")
  }

  /// Decode a chunk from a JSON bytecode object
  ///
  /// # Errors
  /// If the object doesn't have the bytecode file shape.
  pub fn from_json(json: &Json) -> Result<Self, DecodeError> {
    Self::from_json_named(json, "main")
  }

  /// Decode a chunk from the text of a bytecode file
  ///
  /// # Errors
  /// If the text is not JSON, or doesn't have the bytecode file shape.
  pub fn from_json_text(text: &str) -> Result<Self, DecodeError> {
    let json: Json =
      serde_json::from_str(text).map_err(|error| DecodeError::new(error.to_string()))?;
    Self::from_json(&json)
  }

  fn from_json_named(json: &Json, name: &str) -> Result<Self, DecodeError> {
    let object = json
      .as_object()
      .ok_or_else(|| DecodeError::new("bytecode is not an object"))?;
    let code = object
      .get("code")
      .and_then(Json::as_array)
      .ok_or_else(|| DecodeError::new("bytecode is missing the `code` array"))?;
    let constants = object
      .get("consts")
      .and_then(Json::as_array)
      .ok_or_else(|| DecodeError::new("bytecode is missing the `consts` array"))?;

    Ok(Self {
      name: name.into(),
      code: code
        .iter()
        .map(Instruction::from_json)
        .collect::<Result<_, _>>()?,
      constants: constants
        .iter()
        .map(Constant::from_json)
        .collect::<Result<_, _>>()?,
    })
  }
}

/// A single operation for the virtual machine
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
  /// Push the constant at an index of the pool
  LoadConstant(usize),
  /// Push null
  LoadNull,
  /// Push the value of a name, from the frame chain or the native table
  LoadName(SmartString),
  /// Pop a value and bind it to a name in the current frame
  StoreName(SmartString),
  /// Pop a value, apply an operator, push the result
  UnaryOperation(UnaryOperator),
  /// Pop two values, apply an operator, push the result
  BinaryOperation(BinaryOperator),
  /// Pop a value and write its display representation and a newline
  Print,
  /// Pop a value and discard it
  Pop,
  /// Pop the arguments, invoke a named callable, push its result
  Call {
    /// The name the callable is resolved by
    function: SmartString,
    /// How many arguments to pop
    arguments: usize,
  },
  /// Push a function constant closed over the current frame
  MakeFunction(usize),
  /// Pop the result, leave the function, push the result for the caller
  Return,
  /// Continue from another instruction
  Jump(usize),
  /// Pop a value; when it is falsy, continue from another instruction
  JumpIfFalse(usize),
}
impl Instruction {
  fn to_json(&self) -> Json {
    match self {
      Self::LoadConstant(index) => json!(["LOAD_CONST", index]),
      Self::LoadNull => json!(["LOAD_NULL", null]),
      Self::LoadName(name) => json!(["LOAD_NAME", &**name]),
      Self::StoreName(name) => json!(["STORE_NAME", &**name]),
      Self::UnaryOperation(operator) => json!(["UNARY_OP", operator.to_string()]),
      Self::BinaryOperation(operator) => json!(["BINARY_OP", operator.to_string()]),
      Self::Print => json!(["PRINT", null]),
      Self::Pop => json!(["POP", null]),
      Self::Call {
        function,
        arguments,
      } => json!(["CALL", [&**function, arguments]]),
      Self::MakeFunction(index) => json!(["MAKE_FUNCTION", index]),
      Self::Return => json!(["RETURN", null]),
      Self::Jump(target) => json!(["JUMP", target]),
      Self::JumpIfFalse(target) => json!(["JUMP_IF_FALSE", target]),
    }
  }

  fn from_json(json: &Json) -> Result<Self, DecodeError> {
    let entry = json
      .as_array()
      .filter(|entry| entry.len() == 2)
      .ok_or_else(|| DecodeError::new("instructions are `[opcode, operand]` pairs"))?;
    let opcode = entry[0]
      .as_str()
      .ok_or_else(|| DecodeError::new("opcode names are strings"))?;
    let operand = &entry[1];

    match opcode {
      "LOAD_CONST" => Ok(Self::LoadConstant(index_operand(opcode, operand)?)),
      "LOAD_NULL" => Ok(Self::LoadNull),
      "LOAD_NAME" => Ok(Self::LoadName(name_operand(opcode, operand)?)),
      "STORE_NAME" => Ok(Self::StoreName(name_operand(opcode, operand)?)),
      "UNARY_OP" => {
        let symbol = operand
          .as_str()
          .and_then(UnaryOperator::from_symbol)
          .ok_or_else(|| DecodeError::new(format!("unknown operator `{operand}` for UNARY_OP")))?;
        Ok(Self::UnaryOperation(symbol))
      }
      "BINARY_OP" => {
        let symbol = operand
          .as_str()
          .and_then(BinaryOperator::from_symbol)
          .ok_or_else(|| DecodeError::new(format!("unknown operator `{operand}` for BINARY_OP")))?;
        Ok(Self::BinaryOperation(symbol))
      }
      "PRINT" => Ok(Self::Print),
      "POP" => Ok(Self::Pop),
      "CALL" => {
        let pair = operand
          .as_array()
          .filter(|pair| pair.len() == 2)
          .ok_or_else(|| DecodeError::new("CALL takes a `[name, argument-count]` operand"))?;
        Ok(Self::Call {
          function: name_operand(opcode, &pair[0])?,
          arguments: index_operand(opcode, &pair[1])?,
        })
      }
      "MAKE_FUNCTION" => Ok(Self::MakeFunction(index_operand(opcode, operand)?)),
      "RETURN" => Ok(Self::Return),
      "JUMP" => Ok(Self::Jump(index_operand(opcode, operand)?)),
      "JUMP_IF_FALSE" => Ok(Self::JumpIfFalse(index_operand(opcode, operand)?)),
      _ => Err(DecodeError::new(format!("unknown opcode `{opcode}`"))),
    }
  }
}

fn index_operand(opcode: &str, operand: &Json) -> Result<usize, DecodeError> {
  operand
    .as_u64()
    .and_then(|index| usize::try_from(index).ok())
    .ok_or_else(|| DecodeError::new(format!("{opcode} takes an index operand")))
}

fn name_operand(opcode: &str, operand: &Json) -> Result<SmartString, DecodeError> {
  operand
    .as_str()
    .map(SmartString::from)
    .ok_or_else(|| DecodeError::new(format!("{opcode} takes a name operand")))
}

/// A value stored in a chunk's constant pool
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
  /// A number literal
  Number(f64),
  /// A string literal
  String(String),
  /// A compiled function definition
  Function(Function),
}
impl Constant {
  fn to_json(&self) -> Json {
    match self {
      Self::Number(value) => json!(value),
      Self::String(value) => json!(value),
      Self::Function(function) => {
        let Json::Object(mut object) = function.chunk.to_json() else {
          unreachable!("chunks encode as objects");
        };
        object.insert("name".into(), json!(function.name()));
        object.insert(
          "params".into(),
          json!(
            function
              .parameters
              .iter()
              .map(|parameter| &**parameter)
              .collect::<Vec<_>>()
          ),
        );
        Json::Object(object)
      }
    }
  }

  fn from_json(json: &Json) -> Result<Self, DecodeError> {
    match json {
      Json::Number(value) => {
        let value = value
          .as_f64()
          .ok_or_else(|| DecodeError::new("number constants fit in an f64"))?;
        Ok(Self::Number(value))
      }
      Json::String(value) => Ok(Self::String(value.clone())),
      Json::Object(object) => {
        let name = object
          .get("name")
          .and_then(Json::as_str)
          .ok_or_else(|| DecodeError::new("function constants have a `name`"))?;
        let parameters = object
          .get("params")
          .and_then(Json::as_array)
          .ok_or_else(|| DecodeError::new("function constants have a `params` array"))?
          .iter()
          .map(|parameter| {
            parameter
              .as_str()
              .map(SmartString::from)
              .ok_or_else(|| DecodeError::new("parameter names are strings"))
          })
          .collect::<Result<_, _>>()?;

        Ok(Self::Function(Function {
          name: name.into(),
          parameters,
          chunk: Chunk::from_json_named(json, name)?,
        }))
      }
      _ => Err(DecodeError::new(format!("unsupported constant `{json}`"))),
    }
  }
}
impl fmt::Display for Constant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Number(value) => crate::value::write_number(f, *value),
      Self::String(value) => write!(f, "'{value}'"),
      Self::Function(function) => write!(f, "<function {}>", function.name),
    }
  }
}

/// A compiled function definition: a name, parameters, and a chunk
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
  pub(crate) name: SmartString,
  pub(crate) parameters: Vec<SmartString>,
  pub(crate) chunk: Chunk,
}
impl Function {
  /// The name the function was defined with
  #[must_use]
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The compiled body of the function
  #[must_use]
  pub fn chunk(&self) -> &Chunk {
    &self.chunk
  }
}

impl fmt::Display for Chunk {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "      ╭─[Bytecode: {}]", self.name)?;

    for (position, instruction) in self.code.iter().enumerate() {
      write!(f, " {position:0>4} │ ")?;
      match instruction {
        Instruction::LoadConstant(index) => match self.constant(*index) {
          Some(constant) => write!(f, "LoadConstant {constant} ({index})"),
          None => write!(f, "LoadConstant <invalid> ({index})"),
        },
        Instruction::LoadName(name) => write!(f, "LoadName '{name}'"),
        Instruction::StoreName(name) => write!(f, "StoreName '{name}'"),
        Instruction::UnaryOperation(operator) => write!(f, "UnaryOperation ({operator})"),
        Instruction::BinaryOperation(operator) => write!(f, "BinaryOperation ({operator})"),
        Instruction::Call {
          function,
          arguments,
        } => write!(f, "Call '{function}' ({arguments})"),
        Instruction::MakeFunction(index) => match self.constant(*index) {
          Some(constant) => write!(f, "MakeFunction {constant} ({index})"),
          None => write!(f, "MakeFunction <invalid> ({index})"),
        },
        Instruction::Jump(target) => write!(f, "Jump ({target:0>4})"),
        Instruction::JumpIfFalse(target) => write!(f, "JumpIfFalse ({target:0>4})"),
        Instruction::LoadNull => write!(f, "LoadNull"),
        Instruction::Print => write!(f, "Print"),
        Instruction::Pop => write!(f, "Pop"),
        Instruction::Return => write!(f, "Return"),
      }?;
      writeln!(f)?;
    }

    writeln!(f, "──────╯")
  }
}

/// An error decoding a bytecode file
#[derive(Clone, Debug)]
pub struct DecodeError {
  message: String,
}
impl DecodeError {
  fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> &'static str {
    "Invalid Bytecode"
  }

  /// The body of the error message describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> String {
    self.message.clone()
  }
}
impl fmt::Display for DecodeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message)
  }
}
impl error::Error for DecodeError {}
