//! # Abstract Syntax Tree
//!
//! The structural representation of a parsed program. Built once by the
//! parser and read-only afterwards - both execution engines only walk it.

use std::fmt;
use thin_vec::ThinVec;

/// A parsed program, an ordered block of statements
#[must_use]
#[derive(Clone, Debug)]
pub struct Program {
  /// The top-level statements of the program
  pub statements: ThinVec<Statement>,
}

/// A statement, an action to be executed
#[must_use]
#[derive(Clone, Debug)]
pub enum Statement {
  /// Write a value to the output, e.g. `print x + 1`
  Print {
    /// The expression to print
    expression: Expression,
  },
  /// Execute a block when a condition is truthy, e.g. `if x < 3 ... end`
  If {
    /// The condition deciding if the body runs
    condition: Expression,
    /// The statements to run when the condition is truthy
    body: ThinVec<Statement>,
  },
  /// Execute a block while a condition stays truthy, e.g. `while x < 3 ... end`
  While {
    /// The condition re-evaluated before each iteration
    condition: Expression,
    /// The statements to run each iteration
    body: ThinVec<Statement>,
  },
  /// A function definition, e.g. `def double(x) return x * 2 end`
  Function(Function),
  /// Bind a value to a name, e.g. `x = 5`
  Assign {
    /// The name being bound
    name: String,
    /// The expression for the value to bind
    value: Expression,
  },
  /// Leave the enclosing function with an optional value, e.g. `return x`
  Return {
    /// The value to return, or null when omitted
    value: Option<Expression>,
  },
  /// An expression evaluated for its effects, with the result discarded
  Expression {
    /// The expression to evaluate
    expression: Expression,
  },
}

/// A function definition: a name, parameters, and a body block
#[must_use]
#[derive(Clone, Debug)]
pub struct Function {
  /// The name the function is bound to
  pub name: String,
  /// The ordered parameter names
  pub parameters: ThinVec<String>,
  /// The statements of the function body
  pub body: ThinVec<Statement>,
}

/// An expression, which can be evaluated to a value
#[must_use]
#[derive(Clone, Debug)]
pub enum Expression {
  /// A number literal, e.g. `4`, `2.5`
  Number {
    /// The numeric value
    value: f64,
  },
  /// A string literal with escape sequences decoded, e.g. `"hello"`
  String {
    /// The text value
    value: String,
  },
  /// A variable, e.g. `x`
  Variable {
    /// The name being looked up
    name: String,
  },
  /// A unary expression, e.g. `-x`
  Unary {
    /// The operator applied to the operand
    operator: UnaryOperator,
    /// The expression being operated upon
    operand: Box<Expression>,
  },
  /// A binary expression, e.g. `1 + 2`
  Binary {
    /// The operator combining the two sides
    operator: BinaryOperator,
    /// The left hand side of the operation
    left: Box<Expression>,
    /// The right hand side of the operation
    right: Box<Expression>,
  },
  /// A function call, e.g. `fact(5)`
  Call {
    /// The name of the function being called
    function: String,
    /// The ordered argument expressions
    arguments: ThinVec<Expression>,
  },
}

/// An operator which takes a single operand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
  /// `-`
  Negate,
}
impl UnaryOperator {
  /// The operator for a symbol, as it appears in source code and bytecode
  #[must_use]
  pub fn from_symbol(symbol: &str) -> Option<Self> {
    match symbol {
      "-" => Some(Self::Negate),
      _ => None,
    }
  }
}
impl fmt::Display for UnaryOperator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Negate => write!(f, "-"),
    }
  }
}

/// An operator which combines two operands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
  /// `+`
  Add,
  /// `-`
  Subtract,
  /// `*`
  Multiply,
  /// `/`
  Divide,
  /// `==`
  Equal,
  /// `!=`
  NotEqual,
  /// `<`
  Less,
  /// `<=`
  LessEqual,
  /// `>`
  Greater,
  /// `>=`
  GreaterEqual,
}
impl BinaryOperator {
  /// The operator for a symbol, as it appears in source code and bytecode
  #[must_use]
  pub fn from_symbol(symbol: &str) -> Option<Self> {
    match symbol {
      "+" => Some(Self::Add),
      "-" => Some(Self::Subtract),
      "*" => Some(Self::Multiply),
      "/" => Some(Self::Divide),
      "==" => Some(Self::Equal),
      "!=" => Some(Self::NotEqual),
      "<" => Some(Self::Less),
      "<=" => Some(Self::LessEqual),
      ">" => Some(Self::Greater),
      ">=" => Some(Self::GreaterEqual),
      _ => None,
    }
  }
}
impl fmt::Display for BinaryOperator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Add => write!(f, "+"),
      Self::Subtract => write!(f, "-"),
      Self::Multiply => write!(f, "*"),
      Self::Divide => write!(f, "/"),
      Self::Equal => write!(f, "=="),
      Self::NotEqual => write!(f, "!="),
      Self::Less => write!(f, "<"),
      Self::LessEqual => write!(f, "<="),
      Self::Greater => write!(f, ">"),
      Self::GreaterEqual => write!(f, ">="),
    }
  }
}

impl fmt::Display for Program {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_statements(f, &self.statements, "")
  }
}

fn write_statements(f: &mut fmt::Formatter<'_>, statements: &[Statement], prefix: &str) -> fmt::Result {
  for (index, statement) in statements.iter().enumerate() {
    let last = index + 1 == statements.len();
    write_statement(f, statement, prefix, last)?;
  }
  Ok(())
}

fn write_statement(
  f: &mut fmt::Formatter<'_>,
  statement: &Statement,
  prefix: &str,
  last: bool,
) -> fmt::Result {
  let branch = if last { "╰─ " } else { "├─ " };
  let child_prefix = format!("{prefix}{}", if last { "   " } else { "│  " });

  match statement {
    Statement::Print { expression } => {
      writeln!(f, "{prefix}{branch}Print")?;
      write_expression(f, expression, &child_prefix, true)
    }
    Statement::If { condition, body } => {
      writeln!(f, "{prefix}{branch}If")?;
      write_expression(f, condition, &child_prefix, body.is_empty())?;
      write_statements(f, body, &child_prefix)
    }
    Statement::While { condition, body } => {
      writeln!(f, "{prefix}{branch}While")?;
      write_expression(f, condition, &child_prefix, body.is_empty())?;
      write_statements(f, body, &child_prefix)
    }
    Statement::Function(function) => {
      let parameters = function.parameters.join(", ");
      writeln!(f, "{prefix}{branch}Function '{}' ({parameters})", function.name)?;
      write_statements(f, &function.body, &child_prefix)
    }
    Statement::Assign { name, value } => {
      writeln!(f, "{prefix}{branch}Assign '{name}'")?;
      write_expression(f, value, &child_prefix, true)
    }
    Statement::Return { value: Some(value) } => {
      writeln!(f, "{prefix}{branch}Return")?;
      write_expression(f, value, &child_prefix, true)
    }
    Statement::Return { value: None } => writeln!(f, "{prefix}{branch}Return"),
    Statement::Expression { expression } => {
      writeln!(f, "{prefix}{branch}Expression")?;
      write_expression(f, expression, &child_prefix, true)
    }
  }
}

fn write_expression(
  f: &mut fmt::Formatter<'_>,
  expression: &Expression,
  prefix: &str,
  last: bool,
) -> fmt::Result {
  let branch = if last { "╰─ " } else { "├─ " };
  let child_prefix = format!("{prefix}{}", if last { "   " } else { "│  " });

  match expression {
    Expression::Number { value } => writeln!(f, "{prefix}{branch}Number ({value})"),
    Expression::String { value } => writeln!(f, "{prefix}{branch}String {value:?}"),
    Expression::Variable { name } => writeln!(f, "{prefix}{branch}Variable '{name}'"),
    Expression::Unary { operator, operand } => {
      writeln!(f, "{prefix}{branch}Unary ({operator})")?;
      write_expression(f, operand, &child_prefix, true)
    }
    Expression::Binary {
      operator,
      left,
      right,
    } => {
      writeln!(f, "{prefix}{branch}Binary ({operator})")?;
      write_expression(f, left, &child_prefix, false)?;
      write_expression(f, right, &child_prefix, true)
    }
    Expression::Call {
      function,
      arguments,
    } => {
      writeln!(f, "{prefix}{branch}Call '{function}'")?;
      for (index, argument) in arguments.iter().enumerate() {
        write_expression(f, argument, &child_prefix, index + 1 == arguments.len())?;
      }
      Ok(())
    }
  }
}
