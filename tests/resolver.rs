use rlox::error::LoxError;
use rlox::interpreter::Interpreter;
use rlox::parser::Parser;
use rlox::resolver::Resolver;
use rlox::scanner::Scanner;
use rlox::token::Token;

fn resolve(source: &str) -> Result<(), Vec<LoxError>> {
    let tokens: Vec<Token> = Scanner::new(source).filter_map(Result::ok).collect();
    let statements = Parser::new(tokens).parse().expect("expected a clean parse");

    let mut interpreter = Interpreter::new();
    Resolver::new(&mut interpreter).resolve(&statements)
}

fn resolve_errors(source: &str) -> Vec<String> {
    match resolve(source) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    }
}

#[test]
fn reading_a_local_in_its_own_initializer_is_an_error() {
    let errors = resolve_errors("{ var a = \"outer\"; { var a = a; } }");

    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Cannot read local variable in its own initializer."));
}

#[test]
fn global_self_reference_is_allowed() {
    // Globals are not tracked by the scope stack; `var a = a;` at top level
    // is a runtime concern, not a static one.
    assert!(resolve("var a = a;").is_ok());
}

#[test]
fn shadowing_an_outer_scope_is_allowed() {
    assert!(resolve("var a = 1; { var a = a; }").is_err());
    assert!(resolve("var a = 1; { var b = a; }").is_ok());
}

#[test]
fn redeclaration_in_the_same_local_scope_is_an_error() {
    let errors = resolve_errors("fun f() { var a = 1; var a = 2; }");

    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Variable with this name already declared in this scope."));
}

#[test]
fn redeclaration_of_a_global_is_allowed() {
    assert!(resolve("var a = 1; var a = 2;").is_ok());
}

#[test]
fn top_level_return_is_an_error() {
    let errors = resolve_errors("return 1;");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0],
        "[line 1] Error at 'return': Cannot return from top-level code."
    );
}

#[test]
fn returning_a_value_from_an_initializer_is_an_error() {
    let errors = resolve_errors("class A { init() { return 1; } }");

    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Cannot return a value from an initializer."));
}

#[test]
fn bare_return_in_an_initializer_is_allowed() {
    assert!(resolve("class A { init() { return; } }").is_ok());
}

#[test]
fn returning_a_value_from_a_method_is_allowed() {
    assert!(resolve("class A { m() { return 1; } }").is_ok());
}

#[test]
fn this_outside_a_class_is_an_error() {
    let errors = resolve_errors("print this;");

    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Cannot use 'this' outside of a class."));
}

#[test]
fn this_in_a_nested_function_inside_a_method_is_allowed() {
    assert!(resolve("class A { m() { fun inner() { print this; } inner(); } }").is_ok());
}

#[test]
fn super_outside_a_class_is_an_error() {
    let errors = resolve_errors("print super.m;");

    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Cannot use 'super' outside of a class."));
}

#[test]
fn super_without_a_superclass_is_an_error() {
    let errors = resolve_errors("class A { m() { super.m(); } }");

    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Cannot use 'super' in a class with no superclass."));
}

#[test]
fn super_with_a_superclass_is_allowed() {
    assert!(resolve("class A {} class B < A { m() { super.m(); } }").is_ok());
}

#[test]
fn a_class_cannot_inherit_from_itself() {
    let errors = resolve_errors("class A < A {}");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0],
        "[line 1] Error at 'A': A class cannot inherit from itself."
    );
}

#[test]
fn diagnostics_accumulate_across_statements() {
    let errors = resolve_errors("return 1;\nprint this;");

    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("Cannot return from top-level code."));
    assert!(errors[1].contains("Cannot use 'this' outside of a class."));
}

#[test]
fn function_parameters_live_in_the_function_scope() {
    assert!(resolve("fun f(a) { print a; }").is_ok());
    assert!(resolve("fun f(a, a) {}").is_err());
}

#[test]
fn recursion_resolves_because_names_define_eagerly() {
    assert!(resolve("fun f(n) { if (n > 0) f(n - 1); }").is_ok());
}
