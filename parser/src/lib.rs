/*
*
* program    -> function*
* function   -> "fn" IDENT "(" params? ")" block
* params     -> IDENT ("," IDENT)*
* block      -> "{" statement* "}"
* statement  -> "return" expression ";"?
*             | "puts" expression ";"?
*             | "if" expression block ("else" block)?
*             | "while" expression block
*             | expression ";"?
*
* Expressions are parsed by precedence climbing; see `Precedence`.
*
*/

use std::rc::Rc;

use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use lexer::{
  token::{Token, TokenKind},
  Lexer,
};

use crate::{
  ast::{Function, Program, Variable},
  expr::{Expression, InfixOp, PrefixOp},
  stmt::{BlockStatement, Statement},
};

pub mod ast;
pub mod expr;
pub mod stmt;

/// Binding power of an operator token, weakest first.
///
/// Every infix operator is left-associative: the right operand is parsed at
/// the operator's own level, so an equal-precedence neighbor re-associates
/// leftward. This also means `x = y = 5` is rejected (the second `=` sees
/// `(x=y)` as its left operand, which is not an identifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
  Lowest,
  Assign,  // =
  AndOr,   // && ||
  Equals,  // ==
  Less,    // <
  Sum,     // + -
  Product, // * /
  Prefix,  // !x
  Call,    // f(x)
}

fn precedence_of(kind: TokenKind) -> Precedence {
  match kind {
    TokenKind::Assign => Precedence::Assign,
    TokenKind::And | TokenKind::Or => Precedence::AndOr,
    TokenKind::Eq => Precedence::Equals,
    TokenKind::Lt => Precedence::Less,
    TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
    TokenKind::Multiply | TokenKind::Divide => Precedence::Product,
    TokenKind::Lparen => Precedence::Call,
    _ => Precedence::Lowest,
  }
}

fn infix_op(kind: TokenKind) -> Option<InfixOp> {
  match kind {
    TokenKind::Assign => Some(InfixOp::Assign),
    TokenKind::And => Some(InfixOp::And),
    TokenKind::Or => Some(InfixOp::Or),
    TokenKind::Eq => Some(InfixOp::Eq),
    TokenKind::Lt => Some(InfixOp::Lt),
    TokenKind::Plus => Some(InfixOp::Add),
    TokenKind::Minus => Some(InfixOp::Sub),
    TokenKind::Multiply => Some(InfixOp::Mul),
    TokenKind::Divide => Some(InfixOp::Div),
    _ => None,
  }
}

/// Pratt parser producing the AST while accumulating diagnostics.
///
/// Recovery is best-effort: a failed subparse returns `None` and the caller
/// carries on with the next statement or function.
pub struct Parser {
  lexer: Lexer,
  cur_token: Token,
  peek_token: Token,
}

impl Parser {
  /// Creates a parser seeded with the first two tokens of the lexer output.
  pub fn new(mut lexer: Lexer) -> Self {
    let cur_token = lexer.next_token();
    let peek_token = lexer.next_token();
    Self {
      lexer,
      cur_token,
      peek_token,
    }
  }

  /// Parses the whole source and returns the AST.
  ///
  /// Consumes functions while the current token is `fn`; anything after the
  /// last function is ignored.
  pub fn parse_program(&mut self, engine: &mut DiagnosticEngine) -> Program {
    let mut functions = Vec::new();

    while self.cur_token_is(TokenKind::Fn) {
      if let Some(function) = self.parse_function(engine) {
        functions.push(function);
      }
      self.next_token();
    }

    Program { functions }
  }

  fn parse_function(&mut self, engine: &mut DiagnosticEngine) -> Option<Function> {
    if !self.expect_peek(TokenKind::Ident, engine) {
      return None;
    }

    let name = self.cur_token.literal.clone();

    if !self.expect_peek(TokenKind::Lparen, engine) {
      return None;
    }

    let parameters = self.parse_function_parameters(engine)?;

    if !self.expect_peek(TokenKind::Lbrace, engine) {
      return None;
    }

    let body = self.parse_block_statement(engine)?;

    Some(Function {
      name,
      parameters,
      body,
      variables: Vec::new(),
    })
  }

  fn parse_function_parameters(
    &mut self,
    engine: &mut DiagnosticEngine,
  ) -> Option<Vec<Rc<Variable>>> {
    let mut parameters = Vec::new();

    if self.peek_token_is(TokenKind::Rparen) {
      self.next_token();
      return Some(parameters);
    }

    if !self.expect_peek(TokenKind::Ident, engine) {
      return None;
    }

    parameters.push(Rc::new(Variable::new(self.cur_token.literal.clone())));

    while self.peek_token_is(TokenKind::Comma) {
      self.next_token();
      if self.expect_peek(TokenKind::Ident, engine) {
        parameters.push(Rc::new(Variable::new(self.cur_token.literal.clone())));
      } else {
        return None;
      }
    }

    if !self.expect_peek(TokenKind::Rparen, engine) {
      return None;
    }

    Some(parameters)
  }

  fn parse_block_statement(&mut self, engine: &mut DiagnosticEngine) -> Option<BlockStatement> {
    let mut statements = Vec::new();

    // skip `{`
    self.next_token();

    while !self.cur_token_is(TokenKind::Rbrace) && !self.cur_token_is(TokenKind::Eof) {
      if let Some(statement) = self.parse_statement(engine) {
        statements.push(statement);
      }
      self.next_token();
    }

    if !self.expect(TokenKind::Rbrace, engine) {
      return None;
    }

    Some(BlockStatement { statements })
  }

  fn parse_statement(&mut self, engine: &mut DiagnosticEngine) -> Option<Statement> {
    match self.cur_token.kind {
      TokenKind::Return => self.parse_return_statement(engine),
      TokenKind::Puts => self.parse_puts_statement(engine),
      TokenKind::While => self.parse_while_statement(engine),
      TokenKind::If => self.parse_if_statement(engine),
      _ => self.parse_expression_statement(engine),
    }
  }

  fn parse_return_statement(&mut self, engine: &mut DiagnosticEngine) -> Option<Statement> {
    // skip `return`
    self.next_token();

    let value = self.parse_expression(Precedence::Lowest, engine);

    // the optional `;` is consumed even after a failed subparse
    if self.peek_token_is(TokenKind::Semicolon) {
      self.next_token();
    }

    Some(Statement::Return(value?))
  }

  fn parse_puts_statement(&mut self, engine: &mut DiagnosticEngine) -> Option<Statement> {
    // skip `puts`
    self.next_token();

    let value = self.parse_expression(Precedence::Lowest, engine);

    if self.peek_token_is(TokenKind::Semicolon) {
      self.next_token();
    }

    Some(Statement::Puts(value?))
  }

  fn parse_if_statement(&mut self, engine: &mut DiagnosticEngine) -> Option<Statement> {
    // skip `if`
    self.next_token();

    let condition = self.parse_expression(Precedence::Lowest, engine)?;

    if !self.expect_peek(TokenKind::Lbrace, engine) {
      return None;
    }

    let consequence = self.parse_block_statement(engine)?;

    let mut alternative = None;
    if self.peek_token_is(TokenKind::Else) {
      self.next_token();
      self.next_token();
      alternative = Some(self.parse_block_statement(engine)?);
    }

    Some(Statement::If {
      condition,
      consequence,
      alternative,
    })
  }

  fn parse_while_statement(&mut self, engine: &mut DiagnosticEngine) -> Option<Statement> {
    // skip `while`
    self.next_token();

    let condition = self.parse_expression(Precedence::Lowest, engine)?;

    if !self.expect_peek(TokenKind::Lbrace, engine) {
      return None;
    }

    let body = self.parse_block_statement(engine)?;

    Some(Statement::While { condition, body })
  }

  fn parse_expression_statement(&mut self, engine: &mut DiagnosticEngine) -> Option<Statement> {
    let expression = self.parse_expression(Precedence::Lowest, engine);

    if self.peek_token_is(TokenKind::Semicolon) {
      self.next_token();
    }

    Some(Statement::Expression(expression?))
  }

  /// The Pratt core: parse a prefix, then fold in infix operators while the
  /// peeked token binds tighter than the caller.
  fn parse_expression(
    &mut self,
    precedence: Precedence,
    engine: &mut DiagnosticEngine,
  ) -> Option<Expression> {
    let mut left = match self.cur_token.kind {
      TokenKind::Ident => Expression::Identifier {
        name: self.cur_token.literal.clone(),
        var: None,
      },
      TokenKind::Int => self.parse_integer_literal(engine)?,
      TokenKind::Not => self.parse_prefix_expression(engine)?,
      TokenKind::Lparen => self.parse_grouped_expression(engine)?,
      _ => {
        self.no_prefix_parse_fn_error(engine);
        return None;
      },
    };

    while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
      left = match self.peek_token.kind {
        TokenKind::Lparen => {
          self.next_token();
          self.parse_call_expression(left, engine)?
        },
        _ => {
          self.next_token();
          self.parse_infix_expression(left, engine)?
        },
      };
    }

    Some(left)
  }

  fn parse_integer_literal(&mut self, engine: &mut DiagnosticEngine) -> Option<Expression> {
    match self.cur_token.literal.parse::<i64>() {
      Ok(value) => Some(Expression::IntegerLiteral(value)),
      Err(_) => {
        let diagnostic = Diagnostic::new(
          DiagnosticCode::InvalidInteger,
          format!("could not parse {:?} as integer", self.cur_token.literal),
        );
        engine.emit(diagnostic);
        None
      },
    }
  }

  fn parse_prefix_expression(&mut self, engine: &mut DiagnosticEngine) -> Option<Expression> {
    // only `!` starts a prefix expression
    self.next_token();

    let right = self.parse_expression(Precedence::Prefix, engine)?;

    Some(Expression::Prefix {
      operator: PrefixOp::Not,
      right: Box::new(right),
    })
  }

  fn parse_grouped_expression(&mut self, engine: &mut DiagnosticEngine) -> Option<Expression> {
    // skip `(`
    self.next_token();

    let expression = self.parse_expression(Precedence::Lowest, engine)?;

    if !self.expect_peek(TokenKind::Rparen, engine) {
      return None;
    }

    Some(expression)
  }

  fn parse_infix_expression(
    &mut self,
    left: Expression,
    engine: &mut DiagnosticEngine,
  ) -> Option<Expression> {
    let operator =
      infix_op(self.cur_token.kind).expect("infix dispatch only fires on operator tokens");

    if operator == InfixOp::Assign && !matches!(left, Expression::Identifier { .. }) {
      let diagnostic = Diagnostic::new(
        DiagnosticCode::InvalidAssignmentTarget,
        "the left hand side of '=' must be identifier".to_string(),
      );
      engine.emit(diagnostic);
      return None;
    }

    let precedence = self.cur_precedence();
    self.next_token();
    let right = self.parse_expression(precedence, engine)?;

    Some(Expression::Infix {
      left: Box::new(left),
      operator,
      right: Box::new(right),
    })
  }

  fn parse_call_expression(
    &mut self,
    function: Expression,
    engine: &mut DiagnosticEngine,
  ) -> Option<Expression> {
    let function = match function {
      Expression::Identifier { name, .. } => name,
      _ => {
        let diagnostic = Diagnostic::new(
          DiagnosticCode::InvalidCallee,
          "only identifier is allowed to call".to_string(),
        );
        engine.emit(diagnostic);
        return None;
      },
    };

    let arguments = self.parse_expression_list(TokenKind::Rparen, engine)?;

    Some(Expression::Call {
      function,
      arguments,
    })
  }

  fn parse_expression_list(
    &mut self,
    end: TokenKind,
    engine: &mut DiagnosticEngine,
  ) -> Option<Vec<Expression>> {
    let mut list = Vec::new();

    if self.peek_token_is(end) {
      self.next_token();
      return Some(list);
    }

    self.next_token();
    list.push(self.parse_expression(Precedence::Lowest, engine)?);

    while self.peek_token_is(TokenKind::Comma) {
      self.next_token();
      self.next_token();
      list.push(self.parse_expression(Precedence::Lowest, engine)?);
    }

    if !self.expect_peek(end, engine) {
      return None;
    }

    Some(list)
  }

  fn no_prefix_parse_fn_error(&mut self, engine: &mut DiagnosticEngine) {
    let diagnostic = Diagnostic::new(
      DiagnosticCode::NoPrefixParseFn,
      format!("no prefix parse function for {} found", self.cur_token.kind),
    );
    engine.emit(diagnostic);
  }

  fn peek_precedence(&self) -> Precedence {
    precedence_of(self.peek_token.kind)
  }

  fn cur_precedence(&self) -> Precedence {
    precedence_of(self.cur_token.kind)
  }

  fn next_token(&mut self) {
    self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
  }

  fn cur_token_is(&self, kind: TokenKind) -> bool {
    self.cur_token.kind == kind
  }

  fn peek_token_is(&self, kind: TokenKind) -> bool {
    self.peek_token.kind == kind
  }

  /// Expects the current token to be `kind`; reports and fails otherwise
  fn expect(&mut self, kind: TokenKind, engine: &mut DiagnosticEngine) -> bool {
    if self.cur_token_is(kind) {
      return true;
    }

    let diagnostic = Diagnostic::new(
      DiagnosticCode::UnexpectedToken,
      format!(
        "expected next token to be {}, got {} instead",
        kind, self.cur_token.kind
      ),
    );
    engine.emit(diagnostic);
    false
  }

  /// Expects the peeked token to be `kind` and consumes it on success
  fn expect_peek(&mut self, kind: TokenKind, engine: &mut DiagnosticEngine) -> bool {
    if self.peek_token_is(kind) {
      self.next_token();
      return true;
    }

    let diagnostic = Diagnostic::new(
      DiagnosticCode::UnexpectedToken,
      format!(
        "expected next token to be {}, got {} instead",
        kind, self.peek_token.kind
      ),
    );
    engine.emit(diagnostic);
    false
  }
}
