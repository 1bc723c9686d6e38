//! Syntax tree definitions for Frond type-level expressions.
//!
//! This crate does not parse source text; a front end hands it the
//! structural tree defined here. The nodes mirror the surface syntax of
//! type annotations and type declarations:
//!
//! - `a -> List a -> ( a, b )` is a [`TypeExpr`] of three segments
//! - `{ r | name : String }` is a [`RecordType`] with an open base row
//! - `type Maybe a = Just a | Nothing` is a [`TypeDeclaration`]
//! - `type alias Point = { x : Int, y : Int }` is a [`TypeAliasDeclaration`]

use std::fmt;

/// A byte range in the original source, for diagnostic attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Combine two spans into one covering both.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A module-qualified type name, the identity of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub module: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        QualifiedName {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

/// A full type expression: an ordered chain of arrow-separated segments.
///
/// `a -> b -> c` has three segments; a single segment is just that type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub segments: Vec<TypeSegment>,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(segments: Vec<TypeSegment>, span: Span) -> Self {
        TypeExpr { segments, span }
    }

    /// A one-segment expression, the common case for annotations.
    pub fn single(segment: TypeSegment) -> Self {
        let span = segment.span();
        TypeExpr {
            segments: vec![segment],
            span,
        }
    }
}

/// One segment of a type expression, or one argument of a type reference.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSegment {
    /// A lowercase type variable like `msg`.
    Variable(TypeVariable),
    /// A record type like `{ x : Int }` or `{ r | x : Int }`.
    Record(RecordType),
    /// A tuple type like `( a, b )`, or the unit type `()`.
    Tuple(TupleType),
    /// A reference to a named type, with any applied arguments.
    Ref(TypeRef),
    /// A parenthesized type expression.
    Group(Box<TypeExpr>),
}

impl TypeSegment {
    pub fn span(&self) -> Span {
        match self {
            TypeSegment::Variable(v) => v.span,
            TypeSegment::Record(r) => r.span,
            TypeSegment::Tuple(t) => t.span,
            TypeSegment::Ref(r) => r.span,
            TypeSegment::Group(e) => e.span,
        }
    }
}

/// A type variable occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeVariable {
    pub name: String,
    pub span: Span,
}

impl TypeVariable {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        TypeVariable {
            name: name.into(),
            span,
        }
    }
}

/// A record type literal. `base` is present for extension records
/// (`{ r | x : Int }`), absent for closed records.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    pub base: Option<TypeVariable>,
    pub fields: Vec<FieldType>,
    pub span: Span,
}

/// One `name : type` field of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldType {
    pub name: String,
    pub ty: TypeExpr,
    pub span: Span,
}

/// A tuple type. Empty `elements` is the unit type `()`; a parser never
/// produces exactly one element (that is a [`TypeSegment::Group`]).
#[derive(Debug, Clone, PartialEq)]
pub struct TupleType {
    pub elements: Vec<TypeExpr>,
    pub span: Span,
}

/// A possibly-qualified reference to a named type, with the argument
/// segments applied at the use site: `Maybe a`, `Dict.Dict String v`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    /// Module qualifier as written, before import-alias resolution.
    pub qualifier: Option<String>,
    pub name: String,
    pub args: Vec<TypeSegment>,
    pub span: Span,
}

impl TypeRef {
    pub fn new(qualifier: Option<&str>, name: impl Into<String>, args: Vec<TypeSegment>) -> Self {
        TypeRef {
            qualifier: qualifier.map(str::to_string),
            name: name.into(),
            args,
            span: Span::default(),
        }
    }
}

/// A tagged-union type declaration: `type Maybe a = Just a | Nothing`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub module: String,
    pub name: String,
    /// Formal type parameter names, in source order.
    pub params: Vec<String>,
    pub variants: Vec<UnionVariant>,
    pub span: Span,
}

impl TypeDeclaration {
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(self.module.clone(), self.name.clone())
    }
}

/// One constructor of a union declaration, with its parameter types.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionVariant {
    pub name: String,
    pub params: Vec<TypeSegment>,
    pub span: Span,
}

/// A type alias declaration: `type alias Model = { count : Int }`.
///
/// The body is `None` when the source is incomplete (`type alias Foo =`).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDeclaration {
    pub module: String,
    pub name: String,
    pub params: Vec<String>,
    pub body: Option<AliasBody>,
    pub span: Span,
}

impl TypeAliasDeclaration {
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(self.module.clone(), self.name.clone())
    }
}

/// The right-hand side of a type alias: the record-literal shorthand or a
/// general type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum AliasBody {
    Record(RecordType),
    Expr(TypeExpr),
}

/// A port signature: `port send : String -> Cmd msg`.
///
/// The annotated expression is `None` when the source is incomplete.
#[derive(Debug, Clone, PartialEq)]
pub struct PortAnnotation {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let a = Span::new(4, 10);
        let b = Span::new(7, 20);
        assert_eq!(a.merge(b), Span::new(4, 20));
        assert_eq!(b.merge(a), Span::new(4, 20));
    }

    #[test]
    fn test_qualified_name_display() {
        let name = QualifiedName::new("Data.Dict", "Dict");
        assert_eq!(name.to_string(), "Data.Dict.Dict");
    }

    #[test]
    fn test_single_expr_span() {
        let var = TypeVariable::new("a", Span::new(3, 4));
        let expr = TypeExpr::single(TypeSegment::Variable(var));
        assert_eq!(expr.span, Span::new(3, 4));
        assert_eq!(expr.segments.len(), 1);
    }
}
