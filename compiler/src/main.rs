use colored::*;
use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use ir::{generator::Generator, optimizer};
use lexer::Lexer;
use parser::Parser;
use semantic_analysis::Checker;

fn main() {
  let args: Vec<String> = std::env::args().collect();

  let mut engine = DiagnosticEngine::new();

  if args.len() != 2 {
    println!("{}", "USAGE: drake <file>".cyan().bold());

    let diagnostic = Diagnostic::new(
      DiagnosticCode::InvalidArguments,
      "invalid number of arguments".to_string(),
    );
    engine.emit(diagnostic);
    bail(&engine);
  }

  let source = match std::fs::read_to_string(&args[1]) {
    Ok(content) => content,
    Err(err) => {
      let diagnostic = Diagnostic::new(
        DiagnosticCode::IoError,
        format!("could not read file {}: {}", args[1], err),
      );
      engine.emit(diagnostic);
      bail(&engine);
    },
  };

  // Source to AST
  let mut parser = Parser::new(Lexer::new(source));
  let mut program = parser.parse_program(&mut engine);

  if engine.has_errors() {
    bail(&engine);
  }

  // Resolve identifiers and call arities
  let mut checker = Checker::new();
  checker.check(&mut program, &mut engine);

  if engine.has_errors() {
    bail(&engine);
  }

  // Lower to IR and optimize
  let mut ir_program = Generator::new(&program).generate();
  optimizer::local_optimize(&mut ir_program);

  print!("{}", ir_program);
}

/// Print every error one per line on stdout and exit non-zero
fn bail(engine: &DiagnosticEngine) -> ! {
  engine.print_all();
  engine.print_summary();
  std::process::exit(1);
}
