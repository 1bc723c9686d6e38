//! Core type definitions for Frond type expression inference.
//!
//! This module defines the type representation produced by inference, with
//! support for:
//! - Rigid type variables scoped to one declaration or annotation
//! - Row polymorphism for structural typing of records
//! - Tagged unions with ordered, typed variants
//! - Alias provenance, so an expanded alias can still print by name

use std::collections::{BTreeMap, HashSet};

/// A rigid type variable, identified by name within one inference scope.
///
/// Two variables with the same name inside one scope denote the same
/// variable; variables never unify with anything in this crate.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TyVar(pub String);

impl TyVar {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TyVar {
    fn from(s: &str) -> Self {
        TyVar(s.to_string())
    }
}

impl From<String> for TyVar {
    fn from(s: String) -> Self {
        TyVar(s)
    }
}

/// Field name in record types.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldName(pub String);

impl From<&str> for FieldName {
    fn from(s: &str) -> Self {
        FieldName(s.to_string())
    }
}

impl From<String> for FieldName {
    fn from(s: String) -> Self {
        FieldName(s)
    }
}

/// Provenance recording that a type was produced by expanding a named,
/// possibly parametric, type alias.
///
/// `params` holds the alias's formal variables right after expansion and
/// the concrete arguments once the use site has been instantiated, so a
/// consumer can print `Dict.Dict String Int` instead of the expansion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasInfo {
    pub module: String,
    pub name: String,
    pub params: Vec<Ty>,
}

/// A tagged-union (sum) type.
///
/// `params` are the declaration's own formal variables in source order;
/// instantiation replaces them with the supplied arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TyUnion {
    pub module: String,
    pub name: String,
    pub params: Vec<Ty>,
    pub variants: Vec<Variant>,
}

/// One constructor of a union type, with its parameter types in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variant {
    pub name: String,
    pub params: Vec<Ty>,
}

/// A structural record row. `base` is the row variable of an open record
/// (`{ r | x : Int }`); a closed record has no base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TyRecord {
    pub fields: BTreeMap<FieldName, Ty>,
    pub base: Option<TyVar>,
}

impl TyRecord {
    /// A closed record with the given fields.
    pub fn closed(fields: BTreeMap<FieldName, Ty>) -> Self {
        TyRecord {
            fields,
            base: None,
        }
    }

    /// An open record extending the row variable `base`.
    pub fn open(fields: BTreeMap<FieldName, Ty>, base: TyVar) -> Self {
        TyRecord {
            fields,
            base: Some(base),
        }
    }

    pub fn field(&self, name: &FieldName) -> Option<&Ty> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &FieldName) -> bool {
        self.fields.contains_key(name)
    }

    pub fn is_open(&self) -> bool {
        self.base.is_some()
    }
}

/// A function type, always fully uncurried: a chain of arrows is one
/// `TyFunction` with all parameters flattened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TyFunction {
    pub params: Vec<Ty>,
    pub ret: Box<Ty>,
}

/// The shape of a type, without provenance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TyKind {
    /// The no-field product type `()`.
    Unit,
    /// A rigid type variable.
    Var(TyVar),
    /// A tagged union.
    Union(TyUnion),
    /// A structural record row.
    Record(TyRecord),
    /// A tuple of two or more types.
    Tuple(Vec<Ty>),
    /// A function type.
    Function(TyFunction),
    /// The built-in list type, not backed by any declaration.
    List(Box<Ty>),
    /// A terminal marker standing in for a type that refers back to itself
    /// or to an alias currently being expanded. Never carries a nested type.
    RecursiveRef { module: String, name: String },
    /// The type could not be determined.
    Unknown,
}

/// A type, as produced by inference: a shape plus optional alias
/// provenance. Immutable and structurally comparable; provenance
/// participates in equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ty {
    pub kind: TyKind,
    pub alias: Option<AliasInfo>,
}

impl Ty {
    // === Constructors ===

    pub fn new(kind: TyKind) -> Self {
        Ty { kind, alias: None }
    }

    pub fn unit() -> Self {
        Ty::new(TyKind::Unit)
    }

    pub fn unknown() -> Self {
        Ty::new(TyKind::Unknown)
    }

    pub fn var(var: impl Into<TyVar>) -> Self {
        Ty::new(TyKind::Var(var.into()))
    }

    pub fn list(element: Ty) -> Self {
        Ty::new(TyKind::List(Box::new(element)))
    }

    pub fn tuple(elements: Vec<Ty>) -> Self {
        Ty::new(TyKind::Tuple(elements))
    }

    pub fn function(params: Vec<Ty>, ret: Ty) -> Self {
        Ty::new(TyKind::Function(TyFunction {
            params,
            ret: Box::new(ret),
        }))
    }

    pub fn record(record: TyRecord) -> Self {
        Ty::new(TyKind::Record(record))
    }

    pub fn recursive_ref(module: impl Into<String>, name: impl Into<String>) -> Self {
        Ty::new(TyKind::RecursiveRef {
            module: module.into(),
            name: name.into(),
        })
    }

    /// Attach alias provenance to this type.
    pub fn with_alias(mut self, alias: AliasInfo) -> Self {
        self.alias = Some(alias);
        self
    }

    // === Predicates ===

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, TyKind::Unknown)
    }

    pub fn is_var(&self) -> bool {
        matches!(self.kind, TyKind::Var(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, TyKind::Function(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, TyKind::Record(_))
    }

    // === Accessors ===

    pub fn as_var(&self) -> Option<&TyVar> {
        match &self.kind {
            TyKind::Var(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&TyUnion> {
        match &self.kind {
            TyKind::Union(union) => Some(union),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&TyRecord> {
        match &self.kind {
            TyKind::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&TyFunction> {
        match &self.kind {
            TyKind::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Collect the free type variables of the structural shape. Alias
    /// provenance parameters are presentation metadata and not included.
    pub fn free_vars(&self) -> HashSet<TyVar> {
        let mut vars = HashSet::new();
        self.collect_free_vars(&mut vars);
        vars
    }

    fn collect_free_vars(&self, vars: &mut HashSet<TyVar>) {
        match &self.kind {
            TyKind::Unit | TyKind::Unknown | TyKind::RecursiveRef { .. } => {}

            TyKind::Var(var) => {
                vars.insert(var.clone());
            }

            TyKind::Union(union) => {
                for param in &union.params {
                    param.collect_free_vars(vars);
                }
                for variant in &union.variants {
                    for param in &variant.params {
                        param.collect_free_vars(vars);
                    }
                }
            }

            TyKind::Record(record) => {
                for ty in record.fields.values() {
                    ty.collect_free_vars(vars);
                }
                if let Some(base) = &record.base {
                    vars.insert(base.clone());
                }
            }

            TyKind::Tuple(elements) => {
                for ty in elements {
                    ty.collect_free_vars(vars);
                }
            }

            TyKind::Function(func) => {
                for param in &func.params {
                    param.collect_free_vars(vars);
                }
                func.ret.collect_free_vars(vars);
            }

            TyKind::List(element) => element.collect_free_vars(vars),
        }
    }
}

impl From<TyUnion> for Ty {
    fn from(union: TyUnion) -> Self {
        Ty::new(TyKind::Union(union))
    }
}

impl From<TyVar> for Ty {
    fn from(var: TyVar) -> Self {
        Ty::new(TyKind::Var(var))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let unit = Ty::unit();
        assert!(!unit.is_unknown());

        let var = Ty::var("a");
        assert!(var.is_var());
        assert_eq!(var.as_var(), Some(&TyVar::from("a")));

        let func = Ty::function(vec![Ty::var("a")], Ty::unit());
        assert!(func.is_function());
        assert_eq!(func.as_function().unwrap().params.len(), 1);
    }

    #[test]
    fn test_with_alias() {
        let alias = AliasInfo {
            module: "Main".to_string(),
            name: "Model".to_string(),
            params: vec![],
        };
        let ty = Ty::record(TyRecord::closed(BTreeMap::new())).with_alias(alias.clone());
        assert_eq!(ty.alias, Some(alias));
        assert!(ty.is_record());
    }

    #[test]
    fn test_alias_participates_in_equality() {
        let plain = Ty::unit();
        let aliased = Ty::unit().with_alias(AliasInfo {
            module: "Main".to_string(),
            name: "Empty".to_string(),
            params: vec![],
        });
        assert_ne!(plain, aliased);
        assert_eq!(plain.kind, aliased.kind);
    }

    #[test]
    fn test_record_rows() {
        let closed = TyRecord::closed(
            [(FieldName::from("x"), Ty::unit())].into_iter().collect(),
        );
        assert!(!closed.is_open());
        assert!(closed.has_field(&"x".into()));
        assert!(!closed.has_field(&"y".into()));

        let open = TyRecord::open(BTreeMap::new(), TyVar::from("r"));
        assert!(open.is_open());
    }

    #[test]
    fn test_free_vars() {
        let func = Ty::function(vec![Ty::var("a"), Ty::var("b")], Ty::var("a"));
        let free = func.free_vars();
        assert_eq!(free.len(), 2);
        assert!(free.contains(&TyVar::from("a")));
        assert!(free.contains(&TyVar::from("b")));
    }

    #[test]
    fn test_free_vars_include_record_base() {
        let record = Ty::record(TyRecord::open(
            [(FieldName::from("x"), Ty::unit())].into_iter().collect(),
            TyVar::from("r"),
        ));
        assert!(record.free_vars().contains(&TyVar::from("r")));
    }

    #[test]
    fn test_recursive_ref_is_terminal() {
        let marker = Ty::recursive_ref("Main", "Tree");
        assert!(marker.free_vars().is_empty());
    }
}
