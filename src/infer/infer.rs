//! Core inference for type-level expressions.
//!
//! Assigns a type to every type declaration, type alias, union
//! constructor, port signature, and bare type expression. Value-level
//! inference consumes the results; it does not live here.
//!
//! Most forms are inferred by direct structural recursion. The work is in
//! keeping type variables scoped correctly and in instantiating
//! parametric declarations: a reference like `Dict String v` first infers
//! the referenced declaration in a child context, which yields a type
//! whose parameters are the declaration's own formal variables, and then
//! substitutes the use-site arguments for those variables with
//! [`replace_call`]. Rigid variables are scoped to a single declaration
//! or annotation; within one scope, equal names mean the same variable.
//!
//! Self-referential definitions terminate through two guards threaded
//! along the call chain: the declaration currently being inferred, and
//! the set of aliases currently mid-expansion. A reference back into
//! either becomes a terminal [`TyKind::RecursiveRef`] marker, or a
//! bad-recursion diagnostic when an alias chain is cyclic on its own.

use std::collections::{HashMap, HashSet};

use crate::ast::{
    AliasBody, PortAnnotation, QualifiedName, RecordType, Span, TupleType, TypeAliasDeclaration,
    TypeDeclaration, TypeExpr, TypeRef, TypeSegment, UnionVariant,
};
use crate::error::{InferenceResult, TypeDiagnostic};
use crate::types::{
    replace_call, AliasInfo, Ty, TyKind, TyRecord, TyUnion, TyVar, Variant,
};

use super::env::{TypeRefResolver, TypeTarget};

/// The one built-in type with no declaration behind it.
const LIST_TYPE_NAME: &str = "List";

/// Infer the type of a union type declaration.
pub fn infer_type_declaration(
    resolver: &dyn TypeRefResolver,
    decl: &TypeDeclaration,
) -> InferenceResult<TyUnion> {
    TypeExpression::new(resolver).infer_type_declaration(decl)
}

/// Infer the type of a type alias declaration.
pub fn infer_alias_declaration(
    resolver: &dyn TypeRefResolver,
    decl: &TypeAliasDeclaration,
) -> InferenceResult<Ty> {
    TypeExpression::new(resolver).infer_alias_declaration(decl)
}

/// Infer the type of one union constructor. `variant` must belong to
/// `decl`.
pub fn infer_union_variant(
    resolver: &dyn TypeRefResolver,
    decl: &TypeDeclaration,
    variant: &UnionVariant,
) -> InferenceResult<Ty> {
    TypeExpression::new(resolver).infer_union_variant(decl, variant)
}

/// Infer the type a port annotation declares.
pub fn infer_port_annotation(
    resolver: &dyn TypeRefResolver,
    port: &PortAnnotation,
) -> InferenceResult<Ty> {
    TypeExpression::new(resolver).infer_port_annotation(port)
}

/// Infer the type of a bare type expression.
pub fn infer_type_expr(
    resolver: &dyn TypeRefResolver,
    expr: &TypeExpr,
) -> InferenceResult<Ty> {
    TypeExpression::new(resolver).infer_type_expr(expr)
}

/// The context of one inference invocation.
///
/// Entry points consume the context, so a context is used for exactly one
/// top-level form. Nested declarations are inferred in child contexts
/// that keep the active-alias chain and surrender their diagnostics to
/// the parent, but start a fresh variable scope: an outer scope's
/// variable names never collide with an inner declaration's own formals.
pub struct TypeExpression<'a> {
    resolver: &'a dyn TypeRefResolver,
    /// In-scope rigid variables, interned by name.
    vars: HashMap<String, TyVar>,
    diagnostics: Vec<TypeDiagnostic>,
    /// Aliases currently being expanded along this call chain.
    active_aliases: HashSet<QualifiedName>,
    /// The union declaration currently being inferred, if any.
    active_declaration: Option<QualifiedName>,
}

impl<'a> TypeExpression<'a> {
    pub fn new(resolver: &'a dyn TypeRefResolver) -> Self {
        TypeExpression {
            resolver,
            vars: HashMap::new(),
            diagnostics: Vec::new(),
            active_aliases: HashSet::new(),
            active_declaration: None,
        }
    }

    /// Infer a union type declaration.
    pub fn infer_type_declaration(mut self, decl: &TypeDeclaration) -> InferenceResult<TyUnion> {
        let union = self.declaration_ty(decl);
        self.finish(union)
    }

    /// Infer one union constructor of `decl`.
    pub fn infer_union_variant(
        mut self,
        decl: &TypeDeclaration,
        variant: &UnionVariant,
    ) -> InferenceResult<Ty> {
        let union = Ty::from(self.declaration_ty(decl));
        let params: Vec<Ty> = variant
            .params
            .iter()
            .map(|segment| self.segment_ty(segment))
            .collect();

        let ty = if params.is_empty() {
            // A constructor without parameters is an instance of the
            // type; there are no nullary functions.
            union
        } else {
            Ty::function(params, union)
        };
        self.finish(ty)
    }

    /// Infer a type alias declaration.
    pub fn infer_alias_declaration(mut self, decl: &TypeAliasDeclaration) -> InferenceResult<Ty> {
        let params: Vec<Ty> = decl
            .params
            .iter()
            .map(|name| Ty::from(self.ty_var(name)))
            .collect();

        let name = decl.qualified_name();
        if self.active_aliases.contains(&name) {
            self.diagnostics.push(TypeDiagnostic::BadRecursion {
                module: decl.module.clone(),
                name: decl.name.clone(),
                span: decl.span,
            });
            return self.finish(Ty::unknown());
        }
        self.active_aliases.insert(name);

        let ty = match &decl.body {
            // Incomplete source; the alias has no type yet.
            None => Ty::unknown(),
            Some(AliasBody::Record(record)) => Ty::record(self.record_ty(record)),
            Some(AliasBody::Expr(expr)) => self.expr_ty(expr),
        };

        let info = AliasInfo {
            module: decl.module.clone(),
            name: decl.name.clone(),
            params,
        };
        self.finish(ty.with_alias(info))
    }

    /// Infer the type a port annotation declares. A missing annotation
    /// body is tolerated as unknown, not reported.
    pub fn infer_port_annotation(mut self, port: &PortAnnotation) -> InferenceResult<Ty> {
        let ty = match &port.ty {
            Some(expr) => self.expr_ty(expr),
            None => Ty::unknown(),
        };
        self.finish(ty)
    }

    /// Infer a bare type expression.
    pub fn infer_type_expr(mut self, expr: &TypeExpr) -> InferenceResult<Ty> {
        let ty = self.expr_ty(expr);
        self.finish(ty)
    }

    fn finish<T>(self, ty: T) -> InferenceResult<T> {
        InferenceResult {
            diagnostics: self.diagnostics,
            ty,
        }
    }

    /// A context for inferring a referenced declaration: same resolver
    /// and active-alias chain, fresh variable scope, no active
    /// declaration.
    fn child(&self) -> TypeExpression<'a> {
        TypeExpression {
            resolver: self.resolver,
            vars: HashMap::new(),
            diagnostics: Vec::new(),
            active_aliases: self.active_aliases.clone(),
            active_declaration: None,
        }
    }

    fn infer_child<T>(
        &mut self,
        infer: impl FnOnce(TypeExpression<'a>) -> InferenceResult<T>,
    ) -> T {
        let result = infer(self.child());
        self.diagnostics.extend(result.diagnostics);
        result.ty
    }

    /// The in-scope variable for `name`; first occurrence wins, so a
    /// reused name refers to the same variable.
    fn ty_var(&mut self, name: &str) -> TyVar {
        self.vars
            .entry(name.to_string())
            .or_insert_with(|| TyVar::from(name))
            .clone()
    }

    fn declaration_ty(&mut self, decl: &TypeDeclaration) -> TyUnion {
        if self.active_declaration.is_none() {
            self.active_declaration = Some(decl.qualified_name());
        }

        let params: Vec<Ty> = decl
            .params
            .iter()
            .map(|name| Ty::from(self.ty_var(name)))
            .collect();
        let variants = decl
            .variants
            .iter()
            .map(|variant| Variant {
                name: variant.name.clone(),
                params: variant
                    .params
                    .iter()
                    .map(|segment| self.segment_ty(segment))
                    .collect(),
            })
            .collect();

        TyUnion {
            module: decl.module.clone(),
            name: decl.name.clone(),
            params,
            variants,
        }
    }

    /// The type of an entire arrow-segmented expression.
    fn expr_ty(&mut self, expr: &TypeExpr) -> Ty {
        let mut segments: Vec<Ty> = expr
            .segments
            .iter()
            .map(|segment| self.segment_ty(segment))
            .collect();

        let Some(last) = segments.pop() else {
            // Incomplete source.
            return Ty::unknown();
        };
        if segments.is_empty() {
            return last;
        }

        // A chain of arrows is one flat function. When the final segment
        // is itself a function (a parenthesized tail like
        // `a -> (b -> c)`), its parameters join the chain's.
        let Ty { kind, alias } = last;
        match kind {
            TyKind::Function(func) => {
                segments.extend(func.params);
                Ty::function(segments, *func.ret)
            }
            kind => Ty::function(segments, Ty { kind, alias }),
        }
    }

    /// The type of one segment of an expression, or of one argument of a
    /// type reference.
    fn segment_ty(&mut self, segment: &TypeSegment) -> Ty {
        match segment {
            TypeSegment::Variable(var) => Ty::from(self.ty_var(&var.name)),
            TypeSegment::Record(record) => {
                let record = self.record_ty(record);
                Ty::record(record)
            }
            TypeSegment::Tuple(tuple) => self.tuple_ty(tuple),
            TypeSegment::Ref(reference) => self.type_ref_ty(reference),
            TypeSegment::Group(expr) => self.expr_ty(expr),
        }
    }

    fn record_ty(&mut self, record: &RecordType) -> TyRecord {
        let fields = record
            .fields
            .iter()
            .map(|field| (field.name.as_str().into(), self.expr_ty(&field.ty)))
            .collect();
        // Duplicate field names are the duplicate-declaration checker's
        // concern; the map keeps the last occurrence.
        let base = record.base.as_ref().map(|base| self.ty_var(&base.name));
        TyRecord { fields, base }
    }

    fn tuple_ty(&mut self, tuple: &TupleType) -> Ty {
        match tuple.elements.as_slice() {
            [] => Ty::unit(),
            // A single parenthesized expression is not a tuple.
            [element] => self.expr_ty(element),
            elements => Ty::tuple(elements.iter().map(|e| self.expr_ty(e)).collect()),
        }
    }

    /// The type of a reference to a named type, instantiated with the
    /// arguments applied at the use site.
    fn type_ref_ty(&mut self, reference: &TypeRef) -> Ty {
        let args: Vec<Ty> = reference
            .args
            .iter()
            .map(|arg| self.segment_ty(arg))
            .collect();
        let arg_spans: Vec<Span> = reference.args.iter().map(TypeSegment::span).collect();
        let target = self.resolver.resolve(reference);

        // A reference back into the declaration being inferred, or into
        // an alias mid-expansion while a declaration is active, becomes a
        // terminal marker. The second guard breaks cycles of the form
        // "union variant names an alias that expands back to the union".
        if let Some(target) = target {
            let name = target.qualified_name();
            let recursive = match target {
                TypeTarget::Union(_) => self.active_declaration.as_ref() == Some(&name),
                TypeTarget::Alias(_) => {
                    self.active_declaration.is_some() && self.active_aliases.contains(&name)
                }
            };
            if recursive {
                return Ty::recursive_ref(name.module, name.name);
            }
        }

        let declared = match target {
            Some(TypeTarget::Alias(decl)) => {
                self.infer_child(|child| child.infer_alias_declaration(decl))
            }
            Some(TypeTarget::Union(decl)) => {
                Ty::from(self.infer_child(|child| child.infer_type_declaration(decl)))
            }
            // The list type is built in and has no declaration, so the
            // reference cannot resolve. A user type named List shadows
            // it, which is why this only applies when resolution failed.
            None if reference.name == LIST_TYPE_NAME => Ty::list(Ty::var("a")),
            // Unresolved references belong to the reference checker, not
            // to this engine.
            None => Ty::unknown(),
        };

        if declared.is_unknown() {
            return declared;
        }

        // Parameters of declarations are always inferred as variables;
        // an instantiated alias records its formals in its provenance.
        let params: Vec<Ty> = match (&declared.alias, &declared.kind) {
            (Some(info), _) => info.params.clone(),
            (None, TyKind::Union(union)) => union.params.clone(),
            _ => Vec::new(),
        };

        // A non-parametric target has nothing to substitute into;
        // arguments, if any, are ignored.
        if params.is_empty() {
            return declared;
        }

        let result = replace_call(
            &reference.name,
            reference.span,
            declared,
            &params,
            &args,
            &arg_spans,
        );
        self.diagnostics.extend(result.diagnostics);
        result.ty
    }
}
