use gecco_syntax::{LineIndex, Span};
use owo_colors::OwoColorize;
use std::fmt;

/// An error message to show to the user
pub struct Message {
  pub title: String,
  pub body: String,
}
impl Message {
  pub fn error(message: String) -> Self {
    Self {
      title: message,
      body: String::new(),
    }
  }
}
impl fmt::Display for Message {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", "✕ Error".bold().red())?;
    writeln!(f, "{} {}", ":".bold(), &self.title.bold())?;

    if !self.body.is_empty() {
      writeln!(f, "{}", &self.body)?;
    }

    Ok(())
  }
}
impl From<&gecco_syntax::SyntaxError> for Message {
  fn from(error: &gecco_syntax::SyntaxError) -> Self {
    Self {
      title: error.title(),
      body: error.message(),
    }
  }
}
impl From<&gecco_syntax::LexError> for Message {
  fn from(error: &gecco_syntax::LexError) -> Self {
    Self {
      title: error.title(),
      body: error.message(),
    }
  }
}
impl From<&gecco_interpreter::RuntimeError> for Message {
  fn from(error: &gecco_interpreter::RuntimeError) -> Self {
    Self {
      title: error.title().to_owned(),
      body: error.message(),
    }
  }
}
impl From<&gecco_interpreter::DecodeError> for Message {
  fn from(error: &gecco_interpreter::DecodeError) -> Self {
    Self {
      title: error.title().to_owned(),
      body: error.message(),
    }
  }
}

/// The lines of source code an error occurred on
pub struct CodeFrame<'a> {
  title: &'a str,
  source: &'a str,
  span: Span,

  lines: LineIndex,
}
impl<'a> CodeFrame<'a> {
  pub fn new(title: &'a str, source: &'a str, span: Span) -> Self {
    Self {
      title,
      source,
      span,
      lines: LineIndex::from_source(source),
    }
  }
}
impl fmt::Display for CodeFrame<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let start_line = self.lines.line(self.span).max(1);
    let end_line = self.lines.final_line(self.span).max(start_line);

    writeln!(
      f,
      "    {}{}{}{}{}",
      "╭─[".dimmed(),
      self.title,
      ":".dimmed(),
      start_line,
      "]".dimmed()
    )?;

    for line in start_line..=end_line {
      let line_text = self.lines.line_span(line).source_text(self.source);
      write!(f, "{line:>3} {}", "│".dimmed())?;
      if !line_text.is_empty() {
        write!(f, " ")?;
      }
      write!(f, "{line_text}")?;
      if !line_text.ends_with('\n') {
        writeln!(f)?;
      }
    }

    write!(f, "{}", "────╯".dimmed())
  }
}
