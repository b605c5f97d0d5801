//! # Tests for the compiler + virtual machine pipeline
//!
//! Includes parity checks: for any program, interpreting the AST directly
//! and compiling then executing on the VM must give identical output.

use gecco_interpreter::{Context, Interpreter, RuntimeError, VM, compile};
use indoc::indoc;

fn run_vm(source: &str) -> Result<String, RuntimeError> {
  let program = gecco_syntax::parse(source).unwrap();
  let chunk = compile(&program);

  let mut output = Vec::new();
  let mut context = Context::new(&mut output);
  VM::new(&mut context).run(&chunk)?;

  Ok(String::from_utf8(output).unwrap())
}

fn run_interpreter(source: &str) -> Result<String, RuntimeError> {
  let program = gecco_syntax::parse(source).unwrap();

  let mut output = Vec::new();
  let mut context = Context::new(&mut output);
  Interpreter::new(&mut context).run(&program)?;

  Ok(String::from_utf8(output).unwrap())
}

fn assert_output(source: &str, expected: &str) {
  assert_eq!(run_vm(source).unwrap(), expected);
}

/// Both engines agree on the output of the program
fn assert_parity(source: &str) -> String {
  let vm = run_vm(source).unwrap();
  let interpreted = run_interpreter(source).unwrap();
  assert_eq!(vm, interpreted);
  vm
}

#[test]
fn assigns_and_prints() {
  assert_output("x = 2\nprint x", "2\n");
}

#[test]
fn arithmetic() {
  assert_output("print 2 + 3 * 4", "14\n");
  assert_output("print -(2 + 3)", "-5\n");
  assert_output("print \"a\" + \"b\"", "ab\n");
}

#[test]
fn straight_line_programs_match_the_interpreter() {
  let output = assert_parity(indoc! {"
    x = 2
    y = x * 21
    print y
    print \"done\"
    z = print(x, y)
    print z
  "});
  assert_eq!(output, "42\ndone\n2 42\nnull\n");
}

#[test]
fn if_and_while_run_on_the_vm() {
  // the compiled path lowers control flow to jumps, so it behaves
  // identically to the interpreter
  let output = assert_parity(indoc! {"
    i = 0
    while i < 5
      if i == 2
        print \"two\"
      end
      print i
      i = i + 1
    end
  "});
  assert_eq!(output, "0\n1\ntwo\n2\n3\n4\n");
}

#[test]
fn falsy_condition_skips_the_body() {
  assert_parity(indoc! {"
    if 0
      print \"skipped\"
    end
    print \"after\"
  "});
}

#[test]
fn calls_function_defined_in_bytecode() {
  // functions defined through the compiled path are callable
  let output = assert_parity(indoc! {"
    def double(x)
      return x * 2
    end
    print double(21)
  "});
  assert_eq!(output, "42\n");
}

#[test]
fn recursive_factorial_on_the_vm() {
  let output = assert_parity(indoc! {"
    def fact(n)
      if n <= 1
        return 1
      end
      return n * fact(n - 1)
    end
    print fact(5)
  "});
  assert_eq!(output, "120\n");
}

#[test]
fn function_calls_nest() {
  let output = assert_parity(indoc! {"
    def square(x)
      return x * x
    end
    def sum_of_squares(a, b)
      return square(a) + square(b)
    end
    print sum_of_squares(3, 4)
  "});
  assert_eq!(output, "25\n");
}

#[test]
fn function_without_return_yields_null() {
  assert_parity(indoc! {"
    def noop()
    end
    print noop()
  "});
}

#[test]
fn return_exits_a_loop_inside_a_function() {
  let output = assert_parity(indoc! {"
    def first_over(limit)
      i = 0
      while 1
        if i > limit
          return i
        end
        i = i + 1
      end
    end
    print first_over(3)
  "});
  assert_eq!(output, "4\n");
}

#[test]
fn assignments_inside_a_call_do_not_leak_out() {
  assert_parity(indoc! {"
    x = 1
    def change()
      x = 2
      return x
    end
    print change()
    print x
  "});
}

#[test]
fn globals_are_visible_inside_calls() {
  assert_parity(indoc! {"
    greeting = \"hello\"
    def greet()
      return greeting
    end
    print greet()
  "});
}

#[test]
fn native_print_resolves_first_for_calls() {
  let output = assert_parity("x = print(1, 2, 3)\nprint x");
  assert_eq!(output, "1 2 3\nnull\n");
}

#[test]
fn undefined_name_is_a_name_error() {
  let error = run_vm("print missing").unwrap_err();
  assert_eq!(error.title(), "Name Error");
  assert!(error.message().contains("missing"));

  let error = run_vm("missing(1)").unwrap_err();
  assert_eq!(error.title(), "Name Error");
}

#[test]
fn wrong_argument_count_is_a_type_error() {
  let error = run_vm("def pair(a, b)\nreturn a\nend\npair(1)").unwrap_err();
  assert_eq!(error.title(), "Type Error");
  assert!(error.message().contains("expects 2 arguments"));
}

#[test]
fn calling_a_number_is_a_type_error() {
  let error = run_vm("x = 5\nx()").unwrap_err();
  assert_eq!(error.title(), "Type Error");
}

#[test]
fn unsupported_operands_are_type_errors() {
  assert_eq!(run_vm("print 1 + \"a\"").unwrap_err().title(), "Type Error");
  assert_eq!(run_vm("print -\"a\"").unwrap_err().title(), "Type Error");
}

#[test]
fn execution_stops_at_the_first_error() {
  let program = gecco_syntax::parse("print 1\nprint missing\nprint 2").unwrap();
  let chunk = compile(&program);

  let mut output = Vec::new();
  let mut context = Context::new(&mut output);
  let result = VM::new(&mut context).run(&chunk);

  assert!(result.is_err());
  assert_eq!(String::from_utf8(output).unwrap(), "1\n");
}

#[test]
fn errors_match_the_interpreter() {
  for source in [
    "print missing",
    "missing(1)",
    "x = 5\nx()",
    "print 1 + \"a\"",
    "def pair(a, b)\nreturn a\nend\npair(1, 2, 3)",
  ] {
    let vm = run_vm(source).unwrap_err();
    let interpreted = run_interpreter(source).unwrap_err();
    assert_eq!(vm.title(), interpreted.title());
    assert_eq!(vm.message(), interpreted.message());
  }
}
