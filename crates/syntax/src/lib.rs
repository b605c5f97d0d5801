//! # Syntax
//! Turn Gecco source code into an Abstract Syntax Tree.
//!
//! The source is first tokenised, then a single-pass recursive descent
//! parser with one token of lookahead builds an owned tree. Whitespace,
//! newlines, and `#` comments never surface as tokens, and the first
//! lex or parse error aborts the pipeline.

pub mod ast;
mod parser;
mod span;
mod tokeniser;

#[cfg(test)]
mod test;

use std::{error, fmt};

/// Parses a source code string into a [`ast::Program`].
///
/// # Examples
/// ```
/// let program = gecco_syntax::parse("print 5 + 3").unwrap();
///
/// assert_eq!(program.statements.len(), 1);
/// ```
///
/// # Errors
/// If the source cannot be tokenised, or a token is unexpected.
pub fn parse(source: &str) -> Result<ast::Program, SyntaxError> {
  let tokens = tokenise(source)?;
  let program = parser::Parser::new(source, tokens).parse()?;
  Ok(program)
}

/// Get the tokens from a source code string, ending with an end-of-file token.
///
/// # Errors
/// If a character which starts no token is found.
pub fn tokenise(source: &str) -> Result<Vec<Token>, LexError> {
  let mut tokens = tokeniser::Tokeniser::from(source).collect::<Result<Vec<_>, _>>()?;

  tokens.push(Token {
    kind: TokenKind::EndOfFile,
    start: u32::try_from(source.len()).expect("source is less than 4GB"),
    length: 0,
  });

  Ok(tokens)
}

/// An error found while turning source code into an AST
#[derive(Clone, Copy, Debug)]
pub enum SyntaxError {
  /// A character which no token pattern matches
  Lex(LexError),
  /// A token which the grammar does not expect
  Parse(ParseError),
}
impl SyntaxError {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> String {
    match self {
      Self::Lex(error) => error.title(),
      Self::Parse(error) => error.title(),
    }
  }

  /// The body of the error message describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> String {
    match self {
      Self::Lex(error) => error.message(),
      Self::Parse(error) => error.message(),
    }
  }

  /// The location of the error
  pub fn span(&self) -> Span {
    match self {
      Self::Lex(error) => error.span(),
      Self::Parse(error) => error.span(),
    }
  }
}
impl From<LexError> for SyntaxError {
  fn from(error: LexError) -> Self {
    Self::Lex(error)
  }
}
impl From<ParseError> for SyntaxError {
  fn from(error: ParseError) -> Self {
    Self::Parse(error)
  }
}
impl fmt::Display for SyntaxError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message())
  }
}
impl error::Error for SyntaxError {}

pub use parser::ParseError;
pub use span::{LineIndex, Span};
pub use tokeniser::{LexError, Token, TokenKind};
