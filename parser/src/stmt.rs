use std::fmt;

use crate::expr::Expression;

#[derive(Debug, Clone)]
pub enum Statement {
  Block(BlockStatement),
  Return(Expression),
  Puts(Expression),
  If {
    condition: Expression,
    consequence: BlockStatement,
    alternative: Option<BlockStatement>,
  },
  While {
    condition: Expression,
    body: BlockStatement,
  },
  Expression(Expression),
}

impl fmt::Display for Statement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Statement::Block(block) => write!(f, "{}", block),
      Statement::Return(value) => write!(f, "return {};", value),
      Statement::Puts(value) => write!(f, "puts {};", value),
      Statement::If {
        condition,
        consequence,
        alternative,
      } => {
        write!(f, "if({}){}", condition, consequence)?;
        if let Some(alternative) = alternative {
          write!(f, "else{}", alternative)?;
        }
        Ok(())
      },
      Statement::While { condition, body } => write!(f, "while({}){}", condition, body),
      Statement::Expression(expression) => write!(f, "{};", expression),
    }
  }
}

/// One or more statements between braces; each statement carries its own
/// terminator, so no separators are printed between them.
#[derive(Debug, Clone, Default)]
pub struct BlockStatement {
  pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{{")?;
    for statement in &self.statements {
      write!(f, "{}", statement)?;
    }
    write!(f, "}}")
  }
}
