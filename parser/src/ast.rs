use std::fmt;
use std::rc::Rc;

use crate::stmt::BlockStatement;

/// Root node: the functions of a source file, in source order
#[derive(Debug, Clone, Default)]
pub struct Program {
  pub functions: Vec<Function>,
}

impl fmt::Display for Program {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for function in &self.functions {
      write!(f, "{}", function)?;
    }
    Ok(())
  }
}

/// A top-level `fn` definition.
///
/// `variables` is empty until the checker runs; afterwards it lists every
/// local of the function in declaration order, with the parameters as its
/// prefix (the same `Rc`s as in `parameters`).
#[derive(Debug, Clone)]
pub struct Function {
  pub name: String,
  pub parameters: Vec<Rc<Variable>>,
  pub body: BlockStatement,
  pub variables: Vec<Rc<Variable>>,
}

impl fmt::Display for Function {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let params: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();
    write!(f, "fn {}({}){}", self.name, params.join(","), self.body)
  }
}

/// A function-local variable slot, shared by the function's variable table,
/// its parameter list and every identifier that refers to it.
///
/// Identity matters: consumers compare variables with [`Rc::ptr_eq`], never
/// by name. `offset` is reserved for a downstream code generator and stays 0
/// throughout this pipeline.
#[derive(Debug)]
pub struct Variable {
  pub name: String,
  pub offset: i64,
}

impl Variable {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      offset: 0,
    }
  }
}
