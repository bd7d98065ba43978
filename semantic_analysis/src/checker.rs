use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use parser::{
  ast::{Function, Program, Variable},
  expr::{Expression, InfixOp},
  stmt::{BlockStatement, Statement},
};

/// Two-phase semantic checker.
///
/// Phase 1 collects every function signature (name and arity) and rejects
/// duplicate parameter names. Phase 2 walks each body with a flat
/// per-function scope, materializing `Function.variables` in declaration
/// order and attaching the shared [`Variable`] to every identifier.
pub struct Checker {
  functions: HashMap<String, usize>,
  scope: HashMap<String, Rc<Variable>>,
}

impl Checker {
  pub fn new() -> Self {
    Self {
      functions: HashMap::new(),
      scope: HashMap::new(),
    }
  }

  pub fn check(&mut self, program: &mut Program, engine: &mut DiagnosticEngine) {
    // a duplicated parameter aborts the whole check
    if !self.collect_signatures(program, engine) {
      return;
    }

    for function in &mut program.functions {
      self.check_function(function, engine);
    }
  }

  fn collect_signatures(&mut self, program: &Program, engine: &mut DiagnosticEngine) -> bool {
    for function in &program.functions {
      let mut seen: HashSet<&str> = HashSet::new();

      for parameter in &function.parameters {
        if !seen.insert(parameter.name.as_str()) {
          let diagnostic = Diagnostic::new(
            DiagnosticCode::DuplicateParameter,
            format!(
              "duplicated parameter '{}' in function '{}'",
              parameter.name, function.name
            ),
          );
          engine.emit(diagnostic);
          return false;
        }
      }

      self
        .functions
        .insert(function.name.clone(), function.parameters.len());
    }

    true
  }

  fn check_function(&mut self, function: &mut Function, engine: &mut DiagnosticEngine) {
    self.scope.clear();
    function.variables.clear();

    // parameters occupy the first slots of the variable table
    for parameter in &function.parameters {
      function.variables.push(Rc::clone(parameter));
      self
        .scope
        .insert(parameter.name.clone(), Rc::clone(parameter));
    }

    let mut body = std::mem::take(&mut function.body);
    self.check_block_statement(&mut body, &mut function.variables, engine);
    function.body = body;
  }

  fn check_block_statement(
    &mut self,
    block: &mut BlockStatement,
    variables: &mut Vec<Rc<Variable>>,
    engine: &mut DiagnosticEngine,
  ) {
    for statement in &mut block.statements {
      self.check_statement(statement, variables, engine);
    }
  }

  fn check_statement(
    &mut self,
    statement: &mut Statement,
    variables: &mut Vec<Rc<Variable>>,
    engine: &mut DiagnosticEngine,
  ) {
    match statement {
      Statement::Block(block) => self.check_block_statement(block, variables, engine),
      Statement::Return(value) => self.check_expression(value, variables, engine),
      Statement::Puts(value) => self.check_expression(value, variables, engine),
      Statement::If {
        condition,
        consequence,
        alternative,
      } => {
        self.check_expression(condition, variables, engine);
        self.check_block_statement(consequence, variables, engine);
        if let Some(alternative) = alternative {
          self.check_block_statement(alternative, variables, engine);
        }
      },
      Statement::While { condition, body } => {
        self.check_expression(condition, variables, engine);
        self.check_block_statement(body, variables, engine);
      },
      Statement::Expression(expression) => self.check_expression(expression, variables, engine),
    }
  }

  fn check_expression(
    &mut self,
    expression: &mut Expression,
    variables: &mut Vec<Rc<Variable>>,
    engine: &mut DiagnosticEngine,
  ) {
    match expression {
      Expression::Infix {
        left,
        operator: InfixOp::Assign,
        right,
      } => {
        self.check_expression(right, variables, engine);

        // the left side declares the variable on first sight
        match left.as_mut() {
          Expression::Identifier { name, var } => {
            let variable = match self.scope.get(name.as_str()) {
              Some(variable) => Rc::clone(variable),
              None => {
                let variable = Rc::new(Variable::new(name.clone()));
                variables.push(Rc::clone(&variable));
                self.scope.insert(name.clone(), Rc::clone(&variable));
                variable
              },
            };
            *var = Some(variable);
          },
          _ => unreachable!("the parser rejects non-identifier assignment targets"),
        }
      },
      Expression::Infix { left, right, .. } => {
        self.check_expression(left, variables, engine);
        self.check_expression(right, variables, engine);
      },
      Expression::Prefix { right, .. } => self.check_expression(right, variables, engine),
      Expression::Call {
        function,
        arguments,
      } => {
        let arity = match self.functions.get(function.as_str()) {
          Some(&arity) => arity,
          None => {
            let diagnostic = Diagnostic::new(
              DiagnosticCode::UndefinedFunction,
              format!("function '{}' is not defined", function),
            );
            engine.emit(diagnostic);
            return;
          },
        };

        if arguments.len() != arity {
          let diagnostic = Diagnostic::new(
            DiagnosticCode::WrongNumberOfArguments,
            format!(
              "the number of arguments for '{}' is not correct. expect={}, got={}",
              function,
              arity,
              arguments.len()
            ),
          );
          engine.emit(diagnostic);
          return;
        }

        for argument in arguments {
          self.check_expression(argument, variables, engine);
        }
      },
      Expression::Identifier { name, var } => match self.scope.get(name.as_str()) {
        Some(variable) => *var = Some(Rc::clone(variable)),
        None => {
          let diagnostic = Diagnostic::new(
            DiagnosticCode::UndefinedVariable,
            format!("variable '{}' is not defined", name),
          );
          engine.emit(diagnostic);
        },
      },
      Expression::IntegerLiteral(_) => {},
    }
  }
}

impl Default for Checker {
  fn default() -> Self {
    Self::new()
  }
}
