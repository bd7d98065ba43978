use std::fmt;
use std::rc::Rc;

use parser::{
  ast,
  ast::Variable,
  expr::{InfixOp, PrefixOp},
};

pub mod generator;
pub mod optimizer;

/// An IR program: one [`Function`] per AST function, in source order
#[derive(Debug)]
pub struct Program<'ast> {
  pub functions: Vec<Function<'ast>>,
}

impl fmt::Display for Program<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for function in &self.functions {
      write!(f, "{}", function)?;
    }
    Ok(())
  }
}

/// A lowered function: the originating AST node plus its basic blocks.
///
/// Blocks are stored in creation order, so a block's `label` always equals
/// its index; the first block is the (empty) entry block.
#[derive(Debug)]
pub struct Function<'ast> {
  pub node: &'ast ast::Function,
  pub blocks: Vec<BasicBlock>,
}

impl fmt::Display for Function<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "[{}]", self.node.name)?;
    for block in &self.blocks {
      write!(f, "{}", block)?;
    }
    writeln!(f)
  }
}

/// A straight-line run of instructions with a unique label
#[derive(Debug)]
pub struct BasicBlock {
  pub label: usize,
  pub instructions: Vec<Inst>,
}

impl fmt::Display for BasicBlock {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, ".L{}:", self.label)?;
    for instruction in &self.instructions {
      writeln!(f, "  {}", instruction)?;
    }
    Ok(())
  }
}

/// A virtual register, unique within its function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reg(pub u32);

impl fmt::Display for Reg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "r{}", self.0)
  }
}

/// A basic-block label, the branch/jump target representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockId(pub usize);

impl fmt::Display for BlockId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, ".L{}", self.0)
  }
}

#[derive(Debug, Clone)]
pub enum Inst {
  /// `IMM r, value`
  Imm { r: Reg, value: i64 },
  /// `r0 = r1 op r2`
  BinOp {
    operator: InfixOp,
    r0: Reg,
    r1: Reg,
    r2: Reg,
  },
  /// `r0 = op r1`
  UnOp { operator: PrefixOp, r0: Reg, r1: Reg },
  /// `LOAD r0, [r1]`
  Load { r0: Reg, r1: Reg },
  /// `STORE [r0] r1`
  Store { r0: Reg, r1: Reg },
  /// Prologue move of the index-th incoming argument into its local slot
  StoreArg { index: usize, var: Rc<Variable> },
  /// Address of a local, relative to the frame base
  Bprel { r: Reg, var: Rc<Variable> },
  /// `CALL function arguments...`, result in `ret`
  Call {
    function: String,
    ret: Reg,
    arguments: Vec<Reg>,
  },
  /// Conditional branch: `consequence` when `r` is true, `alternative` otherwise
  Br {
    r: Reg,
    consequence: BlockId,
    alternative: BlockId,
  },
  Jmp { target: BlockId },
  Ret { r: Reg },
  Puts { r: Reg },
  /// `MOV r0, r1`
  Mov { r0: Reg, r1: Reg },
  /// Placeholder keeping indices stable during in-place rewrites
  Nop,
}

impl fmt::Display for Inst {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Inst::Imm { r, value } => write!(f, "IMM {}, {}", r, value),
      Inst::BinOp {
        operator,
        r0,
        r1,
        r2,
      } => write!(f, "{} = {} {} {}", r0, r1, operator, r2),
      Inst::UnOp { operator, r0, r1 } => write!(f, "{} = {} {}", r0, operator, r1),
      Inst::Load { r0, r1 } => write!(f, "LOAD {}, [{}]", r0, r1),
      Inst::Store { r0, r1 } => write!(f, "STORE [{}] {}", r0, r1),
      Inst::StoreArg { index, var } => write!(f, "STORE_ARG {} {}", index, var.name),
      Inst::Bprel { r, var } => write!(f, "BPREL {}, {}@(rbp - {})", r, var.name, var.offset),
      Inst::Call {
        function,
        arguments,
        ..
      } => {
        let args: Vec<String> = arguments.iter().map(|r| r.to_string()).collect();
        write!(f, "CALL {} {}", function, args.join(", "))
      },
      Inst::Br {
        r,
        consequence,
        alternative,
      } => write!(f, "BR {}, {}, {}", r, consequence, alternative),
      Inst::Jmp { target } => write!(f, "JMP {}", target),
      Inst::Ret { r } => write!(f, "RET {}", r),
      Inst::Puts { r } => write!(f, "PUTS {}", r),
      Inst::Mov { r0, r1 } => write!(f, "MOV {}, {}", r0, r1),
      Inst::Nop => write!(f, "NOP"),
    }
  }
}
