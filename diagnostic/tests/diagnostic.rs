use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};

#[test]
fn test_engine_counts_errors() {
  let mut engine = DiagnosticEngine::new();
  assert!(!engine.has_errors());

  engine.emit(Diagnostic::new(
    DiagnosticCode::UndefinedVariable,
    "variable 'z' is not defined".to_string(),
  ));
  engine.emit(Diagnostic::new(
    DiagnosticCode::UndefinedFunction,
    "function 'bar' is not defined".to_string(),
  ));

  assert!(engine.has_errors());
  assert_eq!(engine.error_count(), 2);
}

#[test]
fn test_messages_preserve_emission_order() {
  let mut engine = DiagnosticEngine::new();

  engine.emit(Diagnostic::new(
    DiagnosticCode::UnexpectedToken,
    "expected next token to be ), got , instead".to_string(),
  ));
  engine.emit(Diagnostic::new(
    DiagnosticCode::NoPrefixParseFn,
    "no prefix parse function for } found".to_string(),
  ));

  assert_eq!(
    engine.messages(),
    vec![
      "expected next token to be ), got , instead",
      "no prefix parse function for } found",
    ]
  );
}

#[test]
fn test_diagnostic_carries_code() {
  let diagnostic = Diagnostic::new(
    DiagnosticCode::DuplicateParameter,
    "duplicated parameter 'x' in function 'main'".to_string(),
  );

  assert_eq!(diagnostic.code.code(), "E0203");
}
