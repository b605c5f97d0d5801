use crate::{
  SyntaxError, TokenKind,
  ast::{Expression, Program, Statement},
  parse, tokenise,
};
use indoc::indoc;

fn token_kinds(source: &str) -> Vec<TokenKind> {
  tokenise(source)
    .unwrap()
    .iter()
    .map(|token| token.kind)
    .collect()
}

fn parse_to_string(source: &str) -> String {
  parse(source).unwrap().to_string()
}

#[test]
fn tokenises_expression_without_whitespace_tokens() {
  assert_eq!(
    token_kinds("3+4"),
    [
      TokenKind::Number,
      TokenKind::Plus,
      TokenKind::Number,
      TokenKind::EndOfFile
    ]
  );

  assert_eq!(token_kinds("3   +\t4\n"), token_kinds("3+4"));
}

#[test]
fn tokenises_comparison_operators() {
  assert_eq!(
    token_kinds("a == b != c <= d >= e < f > g"),
    [
      TokenKind::Identifier,
      TokenKind::EqualEqual,
      TokenKind::Identifier,
      TokenKind::NotEqual,
      TokenKind::Identifier,
      TokenKind::LessEqual,
      TokenKind::Identifier,
      TokenKind::GreaterEqual,
      TokenKind::Identifier,
      TokenKind::Less,
      TokenKind::Identifier,
      TokenKind::Greater,
      TokenKind::Identifier,
      TokenKind::EndOfFile,
    ]
  );
}

#[test]
fn tokenises_keywords_and_identifiers() {
  assert_eq!(
    token_kinds("def end if while return print ending definition"),
    [
      TokenKind::Def,
      TokenKind::End,
      TokenKind::If,
      TokenKind::While,
      TokenKind::Return,
      TokenKind::Print,
      TokenKind::Identifier,
      TokenKind::Identifier,
      TokenKind::EndOfFile,
    ]
  );
}

#[test]
fn skips_comments() {
  assert_eq!(
    token_kinds("1 # a comment\n2"),
    [
      TokenKind::Number,
      TokenKind::Number,
      TokenKind::EndOfFile
    ]
  );
  assert_eq!(token_kinds("# only a comment"), [TokenKind::EndOfFile]);
}

#[test]
fn empty_source() {
  assert_eq!(token_kinds(""), [TokenKind::EndOfFile]);
  assert!(parse("").unwrap().statements.is_empty());
  assert!(parse("  \n \t \n").unwrap().statements.is_empty());
}

#[test]
fn unknown_character() {
  let error = tokenise("x = £2").unwrap_err();
  assert_eq!(error.character, '£');
  assert_eq!(error.position, 4);

  assert!(tokenise("3 $ 4").is_err());
  assert!(tokenise("!").is_err());
  assert!(matches!(parse("🤗"), Err(SyntaxError::Lex(_))));
}

#[test]
fn unterminated_string() {
  let error = tokenise("\"unterminated").unwrap_err();
  assert_eq!(error.character, '"');
  assert_eq!(error.position, 0);

  // an escaped quote doesn't close the string
  assert!(tokenise(r#""still \" open"#).is_err());
  assert!(tokenise(r#""closed \" fine""#).is_ok());
}

#[test]
fn string_escapes_are_decoded() {
  let program = parse(r#"x = "a\tb\nc\" \q""#).unwrap();
  let Statement::Assign { value, .. } = &program.statements[0] else {
    panic!("expected assignment");
  };
  let Expression::String { value } = value else {
    panic!("expected string literal");
  };

  assert_eq!(value, "a\tb\nc\" \\q");
}

#[test]
fn numbers() {
  let program = parse("4.5").unwrap();
  let Statement::Expression {
    expression: Expression::Number { value },
  } = &program.statements[0]
  else {
    panic!("expected number expression");
  };
  assert_eq!(*value, 4.5);

  // a trailing dot is not part of the number
  assert!(parse("4.").is_err());
}

#[test]
fn multiplication_binds_tighter_than_addition() {
  let ast = parse_to_string("2 + 3 * 4");
  let expected = indoc! {"
    ╰─ Expression
       ╰─ Binary (+)
          ├─ Number (2)
          ╰─ Binary (*)
             ├─ Number (3)
             ╰─ Number (4)
  "};
  assert_eq!(ast, expected);
}

#[test]
fn binary_operators_are_left_associative() {
  let ast = parse_to_string("10 - 2 - 1");
  let expected = indoc! {"
    ╰─ Expression
       ╰─ Binary (-)
          ├─ Binary (-)
          │  ├─ Number (10)
          │  ╰─ Number (2)
          ╰─ Number (1)
  "};
  assert_eq!(ast, expected);
}

#[test]
fn parentheses_group_expressions() {
  let ast = parse_to_string("(2 + 3) * 4");
  let expected = indoc! {"
    ╰─ Expression
       ╰─ Binary (*)
          ├─ Binary (+)
          │  ├─ Number (2)
          │  ╰─ Number (3)
          ╰─ Number (4)
  "};
  assert_eq!(ast, expected);

  assert!(parse("(2 + 3").is_err());
}

#[test]
fn unary_negation() {
  let ast = parse_to_string("--5 * 2");
  let expected = indoc! {"
    ╰─ Expression
       ╰─ Binary (*)
          ├─ Unary (-)
          │  ╰─ Unary (-)
          │     ╰─ Number (5)
          ╰─ Number (2)
  "};
  assert_eq!(ast, expected);
}

#[test]
fn assignment_is_a_single_statement() {
  // a name followed by `=` is an assignment, not two expression statements
  let program = parse("x=1").unwrap();
  assert_eq!(program.statements.len(), 1);
  assert!(matches!(&program.statements[0], Statement::Assign { name, .. } if name == "x"));

  // `==` does not start an assignment
  let program = parse("x == 1").unwrap();
  assert!(matches!(
    &program.statements[0],
    Statement::Expression { .. }
  ));
}

#[test]
fn print_statement() {
  let ast = parse_to_string("print x + 1");
  let expected = indoc! {"
    ╰─ Print
       ╰─ Binary (+)
          ├─ Variable 'x'
          ╰─ Number (1)
  "};
  assert_eq!(ast, expected);
}

#[test]
fn print_in_expression_position() {
  // the native function stays reachable as a value and a call
  let program = parse("x = print(1)\ny = print").unwrap();
  assert!(matches!(
    &program.statements[0],
    Statement::Assign { value: Expression::Call { function, .. }, .. } if function == "print"
  ));
  assert!(matches!(
    &program.statements[1],
    Statement::Assign { value: Expression::Variable { name }, .. } if name == "print"
  ));
}

#[test]
fn if_and_while_blocks() {
  let ast = parse_to_string(indoc! {"
    while x < 3
      if x == 1
        print x
      end
      x = x + 1
    end
  "});
  let expected = indoc! {"
    ╰─ While
       ├─ Binary (<)
       │  ├─ Variable 'x'
       │  ╰─ Number (3)
       ├─ If
       │  ├─ Binary (==)
       │  │  ├─ Variable 'x'
       │  │  ╰─ Number (1)
       │  ╰─ Print
       │     ╰─ Variable 'x'
       ╰─ Assign 'x'
          ╰─ Binary (+)
             ├─ Variable 'x'
             ╰─ Number (1)
  "};
  assert_eq!(ast, expected);
}

#[test]
fn empty_block_is_allowed() {
  let program = parse("if x end").unwrap();
  assert!(matches!(
    &program.statements[0],
    Statement::If { body, .. } if body.is_empty()
  ));
}

#[test]
fn unclosed_block_errors_at_end_of_input() {
  let error = parse("while x\nprint x").unwrap_err();
  assert_eq!(error.title(), "Expected end");
  assert_eq!(error.message(), "expected end but got End of File");

  assert!(parse("if x").is_err());
  assert!(parse("def f()").is_err());
}

#[test]
fn function_definition() {
  let ast = parse_to_string(indoc! {"
    def add(a, b)
      return a + b
    end
  "});
  let expected = indoc! {"
    ╰─ Function 'add' (a, b)
       ╰─ Return
          ╰─ Binary (+)
             ├─ Variable 'a'
             ╰─ Variable 'b'
  "};
  assert_eq!(ast, expected);

  assert!(parse("def f() end").is_ok());
  assert!(parse("def f(a) end").is_ok());
  assert!(parse("def f(a,) end").is_err());
  assert!(parse("def f(a b) end").is_err());
  assert!(parse("def (a) end").is_err());
}

#[test]
fn bare_return_before_end() {
  let program = parse("def f()\nreturn\nend").unwrap();
  let Statement::Function(function) = &program.statements[0] else {
    panic!("expected function definition");
  };
  assert!(matches!(
    &function.body[0],
    Statement::Return { value: None }
  ));
}

#[test]
fn return_outside_function_is_rejected() {
  let error = parse("return 5").unwrap_err();
  assert_eq!(error.title(), "Return Outside of Function");

  // still rejected inside non-function blocks
  assert!(parse("if x\nreturn 5\nend").is_err());

  // allowed through nested blocks inside a function
  assert!(parse("def f()\nif x\nreturn 5\nend\nend").is_ok());
}

#[test]
fn call_arguments() {
  let ast = parse_to_string("f(1, g(2), \"three\")");
  let expected = indoc! {"
    ╰─ Expression
       ╰─ Call 'f'
          ├─ Number (1)
          ├─ Call 'g'
          │  ╰─ Number (2)
          ╰─ String \"three\"
  "};
  assert_eq!(ast, expected);

  assert!(parse("f()").is_ok());
  assert!(parse("f(1,)").is_err());
  assert!(parse("f(1").is_err());
}

#[test]
fn keywords_are_not_expressions() {
  assert!(parse("x = def").is_err());
  assert!(parse("1 + end").is_err());
}

fn assert_expression_statement(program: &Program) {
  assert!(matches!(
    program.statements[0],
    Statement::Expression { .. }
  ));
}

#[test]
fn chained_comparisons_parse() {
  // left associative, like the other binary operators
  let program = parse("1 < 2 < 3").unwrap();
  assert_expression_statement(&program);

  let ast = parse_to_string("1 < 2 < 3");
  let expected = indoc! {"
    ╰─ Expression
       ╰─ Binary (<)
          ├─ Binary (<)
          │  ├─ Number (1)
          │  ╰─ Number (2)
          ╰─ Number (3)
  "};
  assert_eq!(ast, expected);
}
