use std::rc::Rc;

use parser::{
  ast,
  ast::Variable,
  expr::{Expression, InfixOp, PrefixOp},
  stmt::{BlockStatement, Statement},
};

use crate::{BasicBlock, BlockId, Function, Inst, Program, Reg};

/// Lowers a checked AST into the basic-block IR.
///
/// A cursor points at the block that receives emitted instructions;
/// structured statements allocate their blocks up front, wire them with
/// `BR`/`JMP`, and leave the cursor on their join block. Label and register
/// counters restart at 0 for every function.
pub struct Generator<'ast> {
  program: &'ast ast::Program,
  blocks: Vec<BasicBlock>,
  current: usize,
  next_register: u32,
}

impl<'ast> Generator<'ast> {
  pub fn new(program: &'ast ast::Program) -> Self {
    Self {
      program,
      blocks: Vec::new(),
      current: 0,
      next_register: 0,
    }
  }

  /// Generates IR for every function of the program
  pub fn generate(mut self) -> Program<'ast> {
    let mut functions = Vec::new();

    for node in &self.program.functions {
      self.blocks.clear();
      self.next_register = 0;

      // empty leading block to make downstream analysis easy
      let entry = self.new_basic_block();
      self.set_current_basic_block(entry);
      let body = self.new_basic_block();
      self.jmp(body);

      // actual function entry point
      self.set_current_basic_block(body);
      for (index, parameter) in node.parameters.iter().enumerate() {
        self.store_arg(index, Rc::clone(parameter));
      }
      self.generate_block_statement(&node.body);

      // always return 0 at the end of a function
      let r = self.imm(0);
      self.ret(r);

      functions.push(Function {
        node,
        blocks: std::mem::take(&mut self.blocks),
      });
    }

    Program { functions }
  }

  fn generate_block_statement(&mut self, block: &BlockStatement) {
    for statement in &block.statements {
      self.generate_statement(statement);
    }
  }

  fn generate_statement(&mut self, statement: &Statement) {
    match statement {
      Statement::If {
        condition,
        consequence,
        alternative,
      } => {
        let consequence_block = self.new_basic_block();
        let alternative_block = self.new_basic_block();
        let last = self.new_basic_block();

        let r = self.generate_expression(condition);
        self.br(r, consequence_block, alternative_block);

        self.set_current_basic_block(consequence_block);
        self.generate_block_statement(consequence);
        self.jmp(last);

        self.set_current_basic_block(alternative_block);
        if let Some(alternative) = alternative {
          self.generate_block_statement(alternative);
        }
        self.jmp(last);

        self.set_current_basic_block(last);
      },
      Statement::While { condition, body } => {
        let cond = self.new_basic_block();
        let body_block = self.new_basic_block();
        let last = self.new_basic_block();

        self.jmp(cond);

        self.set_current_basic_block(cond);
        let r = self.generate_expression(condition);
        self.br(r, body_block, last);

        self.set_current_basic_block(body_block);
        self.generate_block_statement(body);
        self.jmp(cond);

        self.set_current_basic_block(last);
      },
      Statement::Expression(expression) => {
        self.generate_expression(expression);
      },
      Statement::Puts(value) => {
        let r = self.generate_expression(value);
        self.puts(r);
      },
      Statement::Return(value) => {
        let r = self.generate_expression(value);
        self.ret(r);
      },
      Statement::Block(block) => self.generate_block_statement(block),
    }
  }

  /// Lowers an expression, yielding the register holding its value.
  ///
  /// Operands are evaluated strictly left to right.
  fn generate_expression(&mut self, expression: &Expression) -> Reg {
    match expression {
      Expression::IntegerLiteral(value) => self.imm(*value),
      Expression::Call {
        function,
        arguments,
      } => {
        let mut registers = Vec::new();
        for argument in arguments {
          registers.push(self.generate_expression(argument));
        }
        self.call(function.clone(), registers)
      },
      Expression::Infix {
        left,
        operator: InfixOp::Assign,
        right,
      } => {
        let from = self.generate_expression(right);
        let to = self.bprel(Self::bound_variable(left));
        self.store(to, from)
      },
      Expression::Infix {
        left,
        operator,
        right,
      } => {
        let r1 = self.generate_expression(left);
        let r2 = self.generate_expression(right);
        self.binop(*operator, r1, r2)
      },
      Expression::Prefix { operator, right } => {
        let r1 = self.generate_expression(right);
        self.unop(*operator, r1)
      },
      Expression::Identifier { .. } => {
        let from = self.bprel(Self::bound_variable(expression));
        self.load(from)
      },
    }
  }

  /// The variable the checker attached to an identifier
  fn bound_variable(expression: &Expression) -> Rc<Variable> {
    match expression {
      Expression::Identifier { var, .. } => {
        Rc::clone(var.as_ref().expect("identifier not bound by the checker"))
      },
      _ => unreachable!("the parser rejects non-identifier assignment targets"),
    }
  }

  fn store_arg(&mut self, index: usize, var: Rc<Variable>) {
    self.emit(Inst::StoreArg { index, var });
  }

  fn store(&mut self, to: Reg, from: Reg) -> Reg {
    self.emit(Inst::Store { r0: to, r1: from });
    to
  }

  fn load(&mut self, from: Reg) -> Reg {
    let r0 = self.new_register();
    self.emit(Inst::Load { r0, r1: from });
    r0
  }

  fn bprel(&mut self, var: Rc<Variable>) -> Reg {
    let r = self.new_register();
    self.emit(Inst::Bprel { r, var });
    r
  }

  fn unop(&mut self, operator: PrefixOp, r1: Reg) -> Reg {
    let r0 = self.new_register();
    self.emit(Inst::UnOp { operator, r0, r1 });
    r0
  }

  fn binop(&mut self, operator: InfixOp, r1: Reg, r2: Reg) -> Reg {
    let r0 = self.new_register();
    self.emit(Inst::BinOp { operator, r0, r1, r2 });
    r0
  }

  fn call(&mut self, function: String, arguments: Vec<Reg>) -> Reg {
    let ret = self.new_register();
    self.emit(Inst::Call {
      function,
      ret,
      arguments,
    });
    ret
  }

  fn br(&mut self, r: Reg, consequence: BlockId, alternative: BlockId) {
    self.emit(Inst::Br {
      r,
      consequence,
      alternative,
    });
  }

  fn imm(&mut self, value: i64) -> Reg {
    let r = self.new_register();
    self.emit(Inst::Imm { r, value });
    r
  }

  fn jmp(&mut self, target: BlockId) {
    self.emit(Inst::Jmp { target });
  }

  fn puts(&mut self, r: Reg) {
    self.emit(Inst::Puts { r });
  }

  /// `RET` ends the block; a fresh successor catches whatever follows
  fn ret(&mut self, r: Reg) {
    self.emit(Inst::Ret { r });
    let next = self.new_basic_block();
    self.set_current_basic_block(next);
  }

  fn new_basic_block(&mut self) -> BlockId {
    let label = self.blocks.len();
    self.blocks.push(BasicBlock {
      label,
      instructions: Vec::new(),
    });
    BlockId(label)
  }

  fn new_register(&mut self) -> Reg {
    let r = Reg(self.next_register);
    self.next_register += 1;
    r
  }

  fn set_current_basic_block(&mut self, block: BlockId) {
    self.current = block.0;
  }

  fn emit(&mut self, instruction: Inst) {
    self.blocks[self.current].instructions.push(instruction);
  }
}
