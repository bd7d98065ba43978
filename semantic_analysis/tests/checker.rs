use std::rc::Rc;

use diagnostic::DiagnosticEngine;
use lexer::Lexer;
use parser::{
  ast::{Program, Variable},
  expr::Expression,
  stmt::{BlockStatement, Statement},
  Parser,
};
use pretty_assertions::assert_eq;
use semantic_analysis::Checker;

fn check(input: &str) -> (Program, DiagnosticEngine) {
  let mut engine = DiagnosticEngine::new();
  let mut parser = Parser::new(Lexer::new(input.to_string()));
  let mut program = parser.parse_program(&mut engine);
  assert!(
    !engine.has_errors(),
    "parser errors for {:?}: {:?}",
    input,
    engine.messages()
  );

  let mut checker = Checker::new();
  checker.check(&mut program, &mut engine);
  (program, engine)
}

#[test]
fn test_checker_errors() {
  let tests: Vec<(&str, Vec<&str>)> = vec![
    ("fn main() {}", vec![]),
    (
      "fn main() { main(1); main(1, 2) }",
      vec![
        "the number of arguments for 'main' is not correct. expect=0, got=1",
        "the number of arguments for 'main' is not correct. expect=0, got=2",
      ],
    ),
    (
      "fn main() { puts z; main(z); }",
      vec![
        "variable 'z' is not defined",
        "the number of arguments for 'main' is not correct. expect=0, got=1",
      ],
    ),
    (
      "fn main() { foo(1, 2); bar(1, 2); } fn foo(x, y) { return x + y; }",
      vec!["function 'bar' is not defined"],
    ),
    (
      // the whole check stops at the first duplicated parameter
      "fn main(x, x) {} fn foo(x, x) { main(1); }",
      vec!["duplicated parameter 'x' in function 'main'"],
    ),
  ];

  for (i, (input, expected)) in tests.iter().enumerate() {
    let (_, engine) = check(input);
    assert_eq!(&engine.messages(), expected, "test-{}", i);
  }
}

#[test]
fn test_parameters_only() {
  let (program, engine) = check("fn add(x, y){ return x + y; }");
  assert!(!engine.has_errors());

  let function = &program.functions[0];
  let names: Vec<&str> = function.variables.iter().map(|v| v.name.as_str()).collect();
  assert_eq!(names, vec!["x", "y"]);
}

#[test]
fn test_variable_creation() {
  let (program, engine) = check("fn main(x, y) { x = y; z = 6; x = z; s = z; }");
  assert!(!engine.has_errors());

  let function = &program.functions[0];

  let names: Vec<&str> = function.variables.iter().map(|v| v.name.as_str()).collect();
  assert_eq!(names, vec!["x", "y", "z", "s"]);

  // parameters are the prefix of the variable table, by identity
  for i in 0..function.parameters.len() {
    assert!(
      Rc::ptr_eq(&function.variables[i], &function.parameters[i]),
      "variables[{}] is not the parameter",
      i
    );
  }
}

#[test]
fn test_flat_function_scope() {
  // branches share the enclosing function's scope
  let (program, engine) = check("fn main() { if (1) { y = 1; } else { puts y; } while (y) { w = y; } }");
  assert!(!engine.has_errors(), "{:?}", engine.messages());

  let function = &program.functions[0];
  let names: Vec<&str> = function.variables.iter().map(|v| v.name.as_str()).collect();
  assert_eq!(names, vec!["y", "w"]);
}

#[test]
fn test_assignment_checks_right_before_binding() {
  // `x = x` reads the yet-unbound x first
  let (_, engine) = check("fn main() { x = x; }");
  assert_eq!(engine.messages(), vec!["variable 'x' is not defined"]);
}

#[test]
fn test_call_arity_error_skips_arguments() {
  // `q` inside the bad call is never reported
  let (_, engine) = check("fn main() { main(q); }");
  assert_eq!(
    engine.messages(),
    vec!["the number of arguments for 'main' is not correct. expect=0, got=1"]
  );
}

#[test]
fn test_identifier_binding() {
  let (program, engine) = check("fn add(x, y) { s = x + y; return s; }");
  assert!(!engine.has_errors());

  let function = &program.functions[0];

  fn assert_bound(expression: &Expression, variables: &[Rc<Variable>]) {
    match expression {
      Expression::Identifier { name, var } => {
        let var = var
          .as_ref()
          .unwrap_or_else(|| panic!("identifier '{}' is unbound", name));
        assert!(
          variables.iter().any(|v| Rc::ptr_eq(v, var)),
          "identifier '{}' is bound outside the variable table",
          name
        );
      },
      Expression::IntegerLiteral(_) => {},
      Expression::Prefix { right, .. } => assert_bound(right, variables),
      Expression::Infix { left, right, .. } => {
        assert_bound(left, variables);
        assert_bound(right, variables);
      },
      Expression::Call { arguments, .. } => {
        for argument in arguments {
          assert_bound(argument, variables);
        }
      },
    }
  }

  fn walk_block(block: &BlockStatement, variables: &[Rc<Variable>]) {
    for statement in &block.statements {
      match statement {
        Statement::Block(block) => walk_block(block, variables),
        Statement::Return(value) | Statement::Puts(value) | Statement::Expression(value) => {
          assert_bound(value, variables)
        },
        Statement::If {
          condition,
          consequence,
          alternative,
        } => {
          assert_bound(condition, variables);
          walk_block(consequence, variables);
          if let Some(alternative) = alternative {
            walk_block(alternative, variables);
          }
        },
        Statement::While { condition, body } => {
          assert_bound(condition, variables);
          walk_block(body, variables);
        },
      }
    }
  }

  walk_block(&function.body, &function.variables);
}

#[test]
fn test_parameter_reference_shares_identity() {
  let (program, engine) = check("fn id(x) { return x; }");
  assert!(!engine.has_errors());

  let function = &program.functions[0];
  let value = match &function.body.statements[0] {
    Statement::Return(value) => value,
    other => panic!("expected return statement, got {}", other),
  };
  let var = match value {
    Expression::Identifier { var, .. } => var.as_ref().unwrap(),
    other => panic!("expected identifier, got {}", other),
  };

  assert!(Rc::ptr_eq(var, &function.parameters[0]));
}
