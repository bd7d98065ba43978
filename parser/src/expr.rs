use std::fmt;
use std::rc::Rc;

use crate::ast::Variable;

#[derive(Debug, Clone)]
pub enum Expression {
  /// A variable reference; `var` is attached by the checker
  Identifier {
    name: String,
    var: Option<Rc<Variable>>,
  },
  IntegerLiteral(i64),
  Prefix {
    operator: PrefixOp,
    right: Box<Expression>,
  },
  Infix {
    left: Box<Expression>,
    operator: InfixOp,
    right: Box<Expression>,
  },
  Call {
    function: String,
    arguments: Vec<Expression>,
  },
}

impl fmt::Display for Expression {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Expression::Identifier { name, .. } => write!(f, "{}", name),
      Expression::IntegerLiteral(value) => write!(f, "{}", value),
      Expression::Prefix { operator, right } => write!(f, "{}({})", operator, right),
      Expression::Infix {
        left,
        operator,
        right,
      } => write!(f, "({}{}{})", left, operator, right),
      Expression::Call {
        function,
        arguments,
      } => {
        let args: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", function, args.join(","))
      },
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
  Assign,
  And,
  Or,
  Eq,
  Lt,
  Add,
  Sub,
  Mul,
  Div,
}

impl fmt::Display for InfixOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let op = match self {
      InfixOp::Assign => "=",
      InfixOp::And => "&&",
      InfixOp::Or => "||",
      InfixOp::Eq => "==",
      InfixOp::Lt => "<",
      InfixOp::Add => "+",
      InfixOp::Sub => "-",
      InfixOp::Mul => "*",
      InfixOp::Div => "/",
    };
    f.write_str(op)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
  Not,
}

impl fmt::Display for PrefixOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PrefixOp::Not => f.write_str("!"),
    }
  }
}
