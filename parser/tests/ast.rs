use std::rc::Rc;

use parser::{
  ast::{Function, Program, Variable},
  expr::{Expression, InfixOp},
  stmt::{BlockStatement, Statement},
};
use pretty_assertions::assert_eq;

#[test]
fn test_canonical_string() {
  let x = Rc::new(Variable::new("x"));
  let y = Rc::new(Variable::new("y"));

  let program = Program {
    functions: vec![Function {
      name: "foo".to_string(),
      parameters: vec![Rc::clone(&x), Rc::clone(&y)],
      body: BlockStatement {
        statements: vec![Statement::Return(Expression::Infix {
          left: Box::new(Expression::Identifier {
            name: "x".to_string(),
            var: None,
          }),
          operator: InfixOp::Add,
          right: Box::new(Expression::Identifier {
            name: "y".to_string(),
            var: None,
          }),
        })],
      },
      variables: Vec::new(),
    }],
  };

  assert_eq!(program.to_string(), "fn foo(x,y){return (x+y);}");
}

#[test]
fn test_statement_strings() {
  let one = || Expression::IntegerLiteral(1);

  let tests: Vec<(Statement, &str)> = vec![
    (Statement::Return(one()), "return 1;"),
    (Statement::Puts(one()), "puts 1;"),
    (Statement::Expression(one()), "1;"),
    (
      Statement::If {
        condition: one(),
        consequence: BlockStatement::default(),
        alternative: None,
      },
      "if(1){}",
    ),
    (
      Statement::If {
        condition: one(),
        consequence: BlockStatement::default(),
        alternative: Some(BlockStatement {
          statements: vec![Statement::Puts(one())],
        }),
      },
      "if(1){}else{puts 1;}",
    ),
    (
      Statement::While {
        condition: one(),
        body: BlockStatement::default(),
      },
      "while(1){}",
    ),
  ];

  for (statement, expected) in tests {
    assert_eq!(statement.to_string(), expected);
  }
}
