//! Diagnostic types for Frond type expression inference.

use crate::ast::Span;
use thiserror::Error;

/// A diagnostic produced while inferring a type expression.
///
/// Only two kinds originate in this crate; unresolved references and
/// value-level type mismatches are reported by the consumers that call
/// into it. Every diagnostic is recoverable: inference always produces a
/// type alongside whatever it reports.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeDiagnostic {
    /// A type alias (or chain of aliases) expands back to itself with no
    /// union, record, or function in between.
    #[error("infinite recursion in type alias `{module}.{name}`")]
    BadRecursion {
        module: String,
        name: String,
        span: Span,
    },

    /// A parametric type was applied to the wrong number of arguments.
    #[error("wrong number of type arguments for `{name}`: expected {expected}, found {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
        span: Span,
        /// The first argument beyond the declared parameter count, when
        /// too many were supplied.
        first_extra_arg: Option<Span>,
    },
}

impl TypeDiagnostic {
    /// The primary source location of this diagnostic.
    pub fn span(&self) -> Span {
        match self {
            TypeDiagnostic::BadRecursion { span, .. } => *span,
            TypeDiagnostic::ArityMismatch { span, .. } => *span,
        }
    }
}

/// The result of every public inference entry point: the diagnostics
/// accumulated during the call, in emission order, and the inferred value.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult<T> {
    pub diagnostics: Vec<TypeDiagnostic>,
    pub ty: T,
}

impl<T> InferenceResult<T> {
    /// A result with no diagnostics.
    pub fn clean(ty: T) -> Self {
        InferenceResult {
            diagnostics: Vec::new(),
            ty,
        }
    }

    /// True when inference reported nothing.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_span() {
        let diag = TypeDiagnostic::BadRecursion {
            module: "Main".to_string(),
            name: "Loop".to_string(),
            span: Span::new(10, 14),
        };
        assert_eq!(diag.span(), Span::new(10, 14));
    }

    #[test]
    fn test_diagnostic_message() {
        let diag = TypeDiagnostic::ArityMismatch {
            name: "Dict".to_string(),
            expected: 2,
            actual: 3,
            span: Span::new(0, 4),
            first_extra_arg: Some(Span::new(12, 15)),
        };
        assert_eq!(
            diag.to_string(),
            "wrong number of type arguments for `Dict`: expected 2, found 3"
        );
    }

    #[test]
    fn test_clean_result() {
        let result = InferenceResult::clean(42);
        assert!(result.is_clean());
        assert_eq!(result.ty, 42);
    }
}
