//! Diagnostic printing for inference diagnostics.
//!
//! The inference engine only returns diagnostics as data; this module is
//! the presentation half, rendering them as colored source-anchored
//! reports for consumers that want terminal output.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::error::TypeDiagnostic;

/// Print an inference diagnostic with colored source context.
pub fn print_diagnostic(filename: &str, source: &str, diagnostic: &TypeDiagnostic) {
    let span = diagnostic.span();
    let message = diagnostic.to_string();

    let mut report = Report::build(ReportKind::Error, (filename, span.start..span.end))
        .with_message(&message)
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_message(&message)
                .with_color(Color::Red),
        );

    match diagnostic {
        TypeDiagnostic::BadRecursion { name, .. } => {
            report.add_help(format!(
                "`{}` expands to itself; recursion must pass through a union type",
                name
            ));
        }
        TypeDiagnostic::ArityMismatch {
            expected,
            first_extra_arg,
            ..
        } => {
            if let Some(extra) = first_extra_arg {
                report = report.with_label(
                    Label::new((filename, extra.start..extra.end))
                        .with_message("unexpected type argument")
                        .with_color(Color::Yellow),
                );
            }
            report.add_note(format!("the declaration takes {} type arguments", expected));
        }
    }

    report
        .finish()
        .eprint((filename, Source::from(source)))
        .unwrap();
}
