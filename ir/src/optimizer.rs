use std::rc::Rc;

use parser::expr::InfixOp;

use crate::{BasicBlock, Inst, Program};

/// Folds `IMM, IMM, BINOP` windows into a single `IMM`.
///
/// The two `IMM`s must be the binop's operands. Instruction count is
/// preserved: the folded slots become `NOP`s for a later elimination pass.
/// Returns whether anything was rewritten.
pub fn constant_folding(program: &mut Program<'_>) -> bool {
  let mut changed = false;

  for function in &mut program.functions {
    for block in &mut function.blocks {
      let instructions = &mut block.instructions;
      let mut i = 0;

      while i + 2 < instructions.len() {
        let folded = match (
          &instructions[i],
          &instructions[i + 1],
          &instructions[i + 2],
        ) {
          (
            Inst::Imm { r: ra, value: v1 },
            Inst::Imm { r: rb, value: v2 },
            Inst::BinOp {
              operator,
              r0,
              r1,
              r2,
            },
          ) if r1 == ra && r2 == rb => fold(*operator, *v1, *v2).map(|value| (*r0, value)),
          _ => None,
        };

        if let Some((r, value)) = folded {
          instructions[i] = Inst::Nop;
          instructions[i + 1] = Inst::Nop;
          instructions[i + 2] = Inst::Imm { r, value };
          changed = true;
        }

        i += 1;
      }
    }
  }

  changed
}

/// Arithmetic only, with i64 wraparound; division by zero is a runtime
/// concern and never folds
fn fold(operator: InfixOp, v1: i64, v2: i64) -> Option<i64> {
  match operator {
    InfixOp::Add => Some(v1.wrapping_add(v2)),
    InfixOp::Sub => Some(v1.wrapping_sub(v2)),
    InfixOp::Mul => Some(v1.wrapping_mul(v2)),
    InfixOp::Div if v2 != 0 => Some(v1.wrapping_div(v2)),
    _ => None,
  }
}

/// Removes every `NOP` from every block
pub fn eliminate_nop(program: &mut Program<'_>) {
  for function in &mut program.functions {
    for block in &mut function.blocks {
      block
        .instructions
        .retain(|instruction| !matches!(instruction, Inst::Nop));
    }
  }
}

/// Rewrites
///
/// ```text
/// BPREL r1, a@(rbp - 0)
/// STORE [r1] r0
/// BPREL r2, a@(rbp - 0)
/// LOAD r3, [r2]
/// ```
///
/// to
///
/// ```text
/// BPREL r1, a@(rbp - 0)
/// STORE [r1] r0
/// NOP
/// MOV r3, r0
/// ```
///
/// The two `BPREL`s must address the same variable, compared by identity.
fn eliminate_redundant_code(block: &mut BasicBlock) {
  let instructions = &mut block.instructions;
  let mut i = 0;

  while i + 3 < instructions.len() {
    let rewrite = match (
      &instructions[i],
      &instructions[i + 1],
      &instructions[i + 2],
      &instructions[i + 3],
    ) {
      (
        Inst::Bprel { r: ra, var: v0 },
        Inst::Store { r0: to, r1: stored },
        Inst::Bprel { r: rb, var: v2 },
        Inst::Load { r0: loaded, r1: from },
      ) if Rc::ptr_eq(v0, v2) && to == ra && from == rb => Some((*loaded, *stored)),
      _ => None,
    };

    if let Some((r0, r1)) = rewrite {
      instructions[i + 2] = Inst::Nop;
      instructions[i + 3] = Inst::Mov { r0, r1 };
    }

    i += 1;
  }
}

/// Collapses store-then-load sequences in every block
pub fn peephole(program: &mut Program<'_>) {
  for function in &mut program.functions {
    for block in &mut function.blocks {
      eliminate_redundant_code(block);
    }
  }
}

/// Runs the local passes to a fixed point
pub fn local_optimize(program: &mut Program<'_>) {
  peephole(program);
  eliminate_nop(program);

  while constant_folding(program) {
    eliminate_nop(program);
  }
}
