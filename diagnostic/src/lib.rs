pub mod diagnostic;
pub mod diagnostic_code;

use colored::*;

use crate::diagnostic::Diagnostic;

/// Collector for all diagnostics during compilation.
///
/// Every diagnostic is fatal, so the engine is error-only: any emitted
/// diagnostic fails the compile.
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
  diagnostics: Vec<Diagnostic>,
}

impl DiagnosticEngine {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn emit(&mut self, diagnostic: Diagnostic) {
    self.diagnostics.push(diagnostic);
  }

  pub fn has_errors(&self) -> bool {
    !self.diagnostics.is_empty()
  }

  pub fn error_count(&self) -> usize {
    self.diagnostics.len()
  }

  /// Print every diagnostic message, one per line, to stdout.
  ///
  /// Downstream tooling matches on these lines, so they carry no color
  /// and no code prefix; the human-facing summary goes to stderr via
  /// [`DiagnosticEngine::print_summary`].
  pub fn print_all(&self) {
    for diagnostic in &self.diagnostics {
      println!("{}", diagnostic.message);
    }
  }

  /// Print a colored compile summary to stderr
  pub fn print_summary(&self) {
    if self.has_errors() {
      eprintln!(
        "{}: could not compile due to {} previous {}",
        "error".red().bold(),
        self.error_count().to_string().red().bold(),
        if self.error_count() == 1 {
          "error"
        } else {
          "errors"
        }
      );
    }
  }

  /// Message strings in emission order
  pub fn messages(&self) -> Vec<&str> {
    self.diagnostics.iter().map(|d| d.message.as_str()).collect()
  }

  pub fn get_diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }
}
