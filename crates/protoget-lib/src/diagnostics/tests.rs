use rowan::TextRange;

use super::*;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::SyntaxError, range(0, 5))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.iter().next().unwrap().message(), "syntax error");
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::FieldReadWithoutGetter, range(0, 3))
        .message(r#""t.B" should be "t.GetB()""#)
        .emit();

    assert_eq!(diagnostics.warning_count(), 1);
    assert!(!diagnostics.has_errors());
    insta::assert_snapshot!(
        diagnostics.iter().next().unwrap().message(),
        @r#"proto message field read without getter: "t.B" should be "t.GetB()""#
    );
}

#[test]
fn edits_follow_fixes() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::SyntaxError, range(0, 1))
        .emit();
    diagnostics
        .report(DiagnosticKind::FieldReadWithoutGetter, range(4, 7))
        .fix("replace", "t.GetB()")
        .emit();

    assert_eq!(diagnostics.edits(), vec![Edit::new(range(4, 7), "t.GetB()")]);
}

#[test]
fn sort_orders_by_position() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::FieldReadWithoutGetter, range(9, 12))
        .emit();
    diagnostics
        .report(DiagnosticKind::SyntaxError, range(2, 3))
        .emit();
    diagnostics.sort();

    let starts: Vec<u32> = diagnostics.iter().map(|d| d.range().start().into()).collect();
    assert_eq!(starts, vec![2, 9]);
}

#[test]
fn builder_with_fix() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::FieldReadWithoutGetter, range(0, 5))
        .message("fixable")
        .fix("apply this fix", "fixed")
        .emit();

    let result = diagnostics.printer("hello world").render();
    insta::assert_snapshot!(result, @r"
    warning: proto message field read without getter: fixable
      |
    1 | hello world
      | ^^^^^ proto message field read without getter: fixable
      |
    help: apply this fix
      |
    1 - hello world
    1 + fixed world
      |
    ");
}

#[test]
fn printer_colored() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::FieldReadWithoutGetter, range(0, 5))
        .message("test")
        .emit();

    let result = diagnostics.printer("hello").colored(true).render();
    assert!(result.contains("test"));
    assert!(result.contains('\x1b'));
}

#[test]
fn printer_empty_diagnostics() {
    let diagnostics = Diagnostics::new();
    let result = diagnostics.printer("source").render();
    assert!(result.is_empty());
}

#[test]
fn printer_with_path() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::SyntaxError, range(0, 5))
        .message("test error")
        .emit();

    let result = diagnostics.printer("hello world").path("test.go").render();
    insta::assert_snapshot!(result, @r"
    error: syntax error: test error
     --> test.go:1:1
      |
    1 | hello world
      | ^^^^^ syntax error: test error
    ");
}

#[test]
fn printer_zero_width_span() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::SyntaxError, TextRange::empty(0.into()))
        .message("zero width error")
        .emit();

    let result = diagnostics.printer("hello").render();
    insta::assert_snapshot!(result, @r"
    error: syntax error: zero width error
      |
    1 | hello
      | ^ syntax error: zero width error
    ");
}

#[test]
fn printer_short_form() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::FieldReadWithoutGetter, range(19, 22))
        .message("first")
        .emit();
    diagnostics
        .report(DiagnosticKind::SyntaxError, range(0, 1))
        .emit();

    let source = "package a\n\nvar x = t.B\n";
    let result = diagnostics.printer(source).path("a.go").short(true).render();
    insta::assert_snapshot!(result, @r"
    a.go:3:9: proto message field read without getter: first
    a.go:1:1: syntax error
    ");
}

#[test]
fn printer_without_source() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::FieldReadWithoutGetter, range(19, 22))
        .message("first")
        .fix("replace it", "t.GetB()")
        .emit();

    let result = DiagnosticsPrinter::new(&diagnostics).render();
    insta::assert_snapshot!(
        result,
        @"warning at 19..22: proto message field read without getter: first (fix: replace it)"
    );
}

#[test]
fn json_report_shape() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::FieldReadWithoutGetter, range(19, 22))
        .message("first")
        .fix("replace it", "t.GetB()")
        .emit();

    let mut report = JsonReport::new();
    report.add(
        "example.com/a",
        "getters",
        "a.go",
        "package a\n\nvar x = t.B\n",
        &diagnostics,
    );
    report.add("example.com/b", "getters", "b.go", "", &Diagnostics::new());

    insta::assert_snapshot!(report.to_json().unwrap(), @r#"
    {
      "example.com/a": {
        "getters": [
          {
            "posn": "a.go:3:9",
            "message": "proto message field read without getter: first",
            "suggested_fixes": [
              {
                "message": "replace it",
                "edits": [
                  {
                    "filename": "a.go",
                    "start": 19,
                    "end": 22,
                    "new": "t.GetB()"
                  }
                ]
              }
            ]
          }
        ]
      }
    }
    "#);
}
