use std::cell::RefCell;
use std::rc::Rc;

use rlox::interpreter::Interpreter;
use rlox::parser::Parser;
use rlox::resolver::Resolver;
use rlox::scanner::Scanner;
use rlox::token::Token;
use rlox::Lox;

/// Run a program and capture everything it printed.
fn run(source: &str) -> String {
    let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    let mut lox = Lox::with_output(buffer.clone());

    lox.run(source);

    assert!(!lox.had_error(), "unexpected static error");
    assert!(!lox.had_runtime_error(), "unexpected runtime error");

    let bytes = buffer.borrow().clone();
    String::from_utf8(bytes).expect("print output is UTF-8")
}

/// Run a program expected to die at runtime; returns the formatted error.
fn runtime_error(source: &str) -> String {
    let tokens: Vec<Token> = Scanner::new(source).filter_map(Result::ok).collect();
    let statements = Parser::new(tokens).parse().expect("expected a clean parse");

    let sink: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    let mut interpreter = Interpreter::with_output(sink);

    Resolver::new(&mut interpreter)
        .resolve(&statements)
        .expect("expected a clean resolve");

    interpreter
        .interpret(&statements)
        .expect_err("expected a runtime error")
        .to_string()
}

// ─────────────────────────────────────────────────────────────────────────
// Expressions & statements
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn arithmetic_follows_precedence() {
    assert_eq!(run("print 1 + 2 * 3;"), "7\n");
}

#[test]
fn integer_valued_numbers_print_without_a_fraction() {
    assert_eq!(run("print 4 / 2;"), "2\n");
    assert_eq!(run("print 0.5 + 0.25;"), "0.75\n");
    assert_eq!(run("print -0.0 - 2.5;"), "-2.5\n");
}

#[test]
fn string_concatenation() {
    assert_eq!(run("print \"foo\" + \"bar\";"), "foobar\n");
}

#[test]
fn comparison_and_equality() {
    assert_eq!(run("print 1 < 2;"), "true\n");
    assert_eq!(run("print 2 <= 1;"), "false\n");
    assert_eq!(run("print 1 == 1.0;"), "true\n");
    assert_eq!(run("print \"a\" == \"b\";"), "false\n");
    assert_eq!(run("print 1 == \"1\";"), "false\n");
    assert_eq!(run("print nil == nil;"), "true\n");
    assert_eq!(run("print nil == false;"), "false\n");
}

#[test]
fn zero_and_empty_string_are_truthy() {
    assert_eq!(run("if (0) print \"yes\";"), "yes\n");
    assert_eq!(run("if (\"\") print \"yes\";"), "yes\n");
    assert_eq!(run("print !nil;"), "true\n");
    assert_eq!(run("print !0;"), "false\n");
}

#[test]
fn logical_operators_return_the_deciding_operand() {
    assert_eq!(run("print nil or \"fallback\";"), "fallback\n");
    assert_eq!(run("print 1 and 2;"), "2\n");
    assert_eq!(run("print false and 2;"), "false\n");
}

#[test]
fn logical_operators_short_circuit() {
    let source = "\
fun side() {
  print \"evaluated\";
  return true;
}
print true or side();
print false and side();
";
    assert_eq!(run(source), "true\nfalse\n");
}

#[test]
fn if_else_branches() {
    assert_eq!(run("if (1 > 2) print \"a\"; else print \"b\";"), "b\n");
}

#[test]
fn while_loops_run_until_falsy() {
    assert_eq!(
        run("var i = 0; while (i < 3) { print i; i = i + 1; }"),
        "0\n1\n2\n"
    );
}

#[test]
fn for_loops_desugar_and_run() {
    assert_eq!(run("for (var i = 0; i < 3; i = i + 1) print i;"), "0\n1\n2\n");
}

// ─────────────────────────────────────────────────────────────────────────
// Scoping & closures
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn blocks_shadow_and_restore() {
    assert_eq!(
        run("var a = 1; { var a = 2; print a; } print a;"),
        "2\n1\n"
    );
}

#[test]
fn assignment_writes_through_to_the_declaring_scope() {
    assert_eq!(run("var a = 1; { a = 2; } print a;"), "2\n");
}

#[test]
fn closures_capture_their_definition_scope() {
    let source = "\
var a = \"global\";
{
  fun showA() {
    print a;
  }

  showA();
  var a = \"block\";
  showA();
}
";
    assert_eq!(run(source), "global\nglobal\n");
}

#[test]
fn closures_share_mutable_state() {
    let source = "\
fun makeCounter() {
  var count = 0;
  fun increment() {
    count = count + 1;
    print count;
  }
  return increment;
}

var counter = makeCounter();
counter();
counter();
";
    assert_eq!(run(source), "1\n2\n");
}

#[test]
fn recursion_works() {
    let source = "\
fun fib(n) {
  if (n < 2) return n;
  return fib(n - 1) + fib(n - 2);
}
print fib(10);
";
    assert_eq!(run(source), "55\n");
}

#[test]
fn return_unwinds_out_of_nested_blocks() {
    let source = "\
fun f() {
  while (true) {
    {
      return \"escaped\";
    }
  }
}
print f();
";
    assert_eq!(run(source), "escaped\n");
}

#[test]
fn function_without_return_yields_nil() {
    assert_eq!(run("fun f() {} print f();"), "nil\n");
}

#[test]
fn resolving_twice_leaves_bindings_unchanged() {
    let source = "var a = 1; { var a = 2; fun f() { print a; } f(); } print a;";

    let tokens: Vec<Token> = Scanner::new(source).filter_map(Result::ok).collect();
    let statements = Parser::new(tokens).parse().expect("expected a clean parse");

    let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    let mut interpreter = Interpreter::with_output(buffer.clone());

    Resolver::new(&mut interpreter)
        .resolve(&statements)
        .expect("first resolve");
    Resolver::new(&mut interpreter)
        .resolve(&statements)
        .expect("second resolve");

    interpreter.interpret(&statements).expect("clean run");

    let output = String::from_utf8(buffer.borrow().clone()).expect("utf8");
    assert_eq!(output, "2\n1\n");
}

// ─────────────────────────────────────────────────────────────────────────
// Classes
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn fields_and_methods_with_this() {
    let source = "\
class Cake {
  taste() {
    print \"The \" + this.flavor + \" cake is delicious!\";
  }
}

var cake = Cake();
cake.flavor = \"chocolate\";
cake.taste();
";
    assert_eq!(run(source), "The chocolate cake is delicious!\n");
}

#[test]
fn initializer_binds_arguments_to_fields() {
    let source = "\
class Point {
  init(x, y) {
    this.x = x;
    this.y = y;
  }
}
print Point(1, 2).x;
";
    assert_eq!(run(source), "1\n");
}

#[test]
fn calling_a_class_yields_the_instance_even_when_init_returns() {
    let source = "\
class Foo {
  init() {
    return;
  }
}

print Foo().init();
";
    assert_eq!(run(source), "Foo instance\n");
}

#[test]
fn bound_methods_remember_their_instance() {
    let source = "\
class Person {
  init(name) {
    this.name = name;
  }
  sayName() {
    print this.name;
  }
}

var jane = Person(\"Jane\");
var method = jane.sayName;
method();
";
    assert_eq!(run(source), "Jane\n");
}

#[test]
fn fields_shadow_methods() {
    let source = "\
class A {
  m() {
    print \"method\";
  }
}

var a = A();
a.m = 1;
print a.m;
";
    assert_eq!(run(source), "1\n");
}

#[test]
fn methods_inherit_through_the_superclass_chain() {
    let source = "\
class A {
  method() {
    print \"A method\";
  }
}

class B < A {
  method() {
    print \"B method\";
  }

  test() {
    super.method();
  }
}

class C < B {}

C().test();
";
    assert_eq!(run(source), "A method\n");
}

#[test]
fn subclasses_see_inherited_methods() {
    let source = "\
class Doughnut {
  cook() {
    print \"Fry until golden brown.\";
  }
}

class BostonCream < Doughnut {}

BostonCream().cook();
";
    assert_eq!(run(source), "Fry until golden brown.\n");
}

#[test]
fn inherited_init_counts_toward_class_arity() {
    let source = "\
class A {
  init(x) {
    this.x = x;
  }
}
class B < A {}
print B(7).x;
";
    assert_eq!(run(source), "7\n");
}

// ─────────────────────────────────────────────────────────────────────────
// Stringification
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn callables_and_instances_stringify() {
    assert_eq!(run("fun f() {} print f;"), "<fn f>\n");
    assert_eq!(run("print clock;"), "<native fn>\n");
    assert_eq!(run("class A {} print A;"), "A\n");
    assert_eq!(run("class A {} print A();"), "A instance\n");
    assert_eq!(run("print nil;"), "nil\n");
    assert_eq!(run("print true;"), "true\n");
}

#[test]
fn clock_returns_a_number() {
    assert_eq!(run("print clock() > 0;"), "true\n");
}

// ─────────────────────────────────────────────────────────────────────────
// Runtime errors
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn arity_mismatch_reports_at_the_call() {
    let source = "\
fun f(a, b) {
  return a + b;
}
f(1);
";
    assert_eq!(
        runtime_error(source),
        "Expected 2 arguments but got 1.\n[line 4]"
    );
}

#[test]
fn undefined_variable_read() {
    assert_eq!(
        runtime_error("print missing;"),
        "Undefined variable 'missing'.\n[line 1]"
    );
}

#[test]
fn assignment_never_creates_a_global() {
    assert_eq!(
        runtime_error("missing = 1;"),
        "Undefined variable 'missing'.\n[line 1]"
    );
}

#[test]
fn unary_minus_requires_a_number() {
    assert_eq!(
        runtime_error("-\"muffin\";"),
        "Operand must be a number.\n[line 1]"
    );
}

#[test]
fn plus_requires_matching_operands() {
    assert_eq!(
        runtime_error("1 + \"a\";"),
        "Operands must be two numbers or two strings.\n[line 1]"
    );
}

#[test]
fn comparison_requires_numbers() {
    assert_eq!(
        runtime_error("1 < \"a\";"),
        "Operands must be numbers.\n[line 1]"
    );
}

#[test]
fn only_functions_and_classes_are_callable() {
    assert_eq!(
        runtime_error("\"not a function\"();"),
        "Can only call functions and classes.\n[line 1]"
    );
}

#[test]
fn only_instances_have_properties() {
    assert_eq!(
        runtime_error("print 4.length;"),
        "Only instances have properties.\n[line 1]"
    );
    assert_eq!(
        runtime_error("4.length = 1;"),
        "Only instances have fields.\n[line 1]"
    );
}

#[test]
fn unknown_property_reads_fail() {
    assert_eq!(
        runtime_error("class A {} print A().missing;"),
        "Undefined property 'missing'.\n[line 1]"
    );
}

#[test]
fn superclass_must_be_a_class() {
    assert_eq!(
        runtime_error("var NotAClass = 1; class A < NotAClass {}"),
        "Superclass must be a class.\n[line 1]"
    );
}

#[test]
fn missing_super_method_fails_at_the_name() {
    let source = "\
class A {}
class B < A {
  m() {
    super.missing();
  }
}
B().m();
";
    assert_eq!(
        runtime_error(source),
        "Undefined property 'missing'.\n[line 4]"
    );
}

#[test]
fn output_before_a_runtime_error_is_kept() {
    let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    let mut lox = Lox::with_output(buffer.clone());

    lox.run("print \"first\"; print missing;");

    assert!(lox.had_runtime_error());
    assert_eq!(
        String::from_utf8(buffer.borrow().clone()).expect("utf8"),
        "first\n"
    );
}

// ─────────────────────────────────────────────────────────────────────────
// Pipeline behavior
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn static_errors_prevent_evaluation() {
    let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    let mut lox = Lox::with_output(buffer.clone());

    lox.run("print \"reached\"; { var a = a; }");

    assert!(lox.had_error());
    assert!(!lox.had_runtime_error());
    assert!(buffer.borrow().is_empty());
}

#[test]
fn state_persists_across_runs() {
    let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    let mut lox = Lox::with_output(buffer.clone());

    lox.run("var a = 1;");
    lox.run("fun twice(n) { return n * 2; }");
    lox.run("print twice(a + 1);");

    assert!(!lox.had_error());
    assert_eq!(
        String::from_utf8(buffer.borrow().clone()).expect("utf8"),
        "4\n"
    );
}
