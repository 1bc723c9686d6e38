//! Substitution for type expression inference.
//!
//! Implements the substitution data structure, the Substitutable trait for
//! applying substitutions to types, and `replace_call`, the entry point
//! that instantiates a declared parametric type with the arguments
//! supplied at a use site.
//!
//! All variables here are rigid, so application is a single simultaneous
//! pass: a replacement is never substituted again. This is what makes a
//! swap like `{a -> b, b -> a}` well-defined.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::ast::Span;
use crate::error::{InferenceResult, TypeDiagnostic};

use super::ty::{AliasInfo, FieldName, Ty, TyFunction, TyKind, TyRecord, TyUnion, TyVar, Variant};

/// A substitution mapping rigid type variables to types.
#[derive(Clone, Debug, Default)]
pub struct Subst {
    map: HashMap<TyVar, Ty>,
}

impl Subst {
    /// Create an empty substitution.
    pub fn empty() -> Self {
        Subst {
            map: HashMap::new(),
        }
    }

    /// Create a singleton substitution.
    pub fn singleton(var: TyVar, ty: Ty) -> Self {
        let mut map = HashMap::new();
        map.insert(var, ty);
        Subst { map }
    }

    /// Check if the substitution is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the replacement for a variable, if present.
    pub fn get(&self, var: &TyVar) -> Option<&Ty> {
        self.map.get(var)
    }

    /// Check if a variable is in the domain.
    pub fn contains(&self, var: &TyVar) -> bool {
        self.map.contains_key(var)
    }

    /// Insert a mapping into the substitution.
    pub fn insert(&mut self, var: TyVar, ty: Ty) {
        self.map.insert(var, ty);
    }

    /// Apply this substitution to a substitutable value.
    pub fn apply<T: Substitutable>(&self, t: &T) -> T {
        t.apply_subst(self)
    }

    /// Iterate over the mappings.
    pub fn iter(&self) -> impl Iterator<Item = (&TyVar, &Ty)> {
        self.map.iter()
    }
}

impl FromIterator<(TyVar, Ty)> for Subst {
    fn from_iter<T: IntoIterator<Item = (TyVar, Ty)>>(iter: T) -> Self {
        Subst {
            map: iter.into_iter().collect(),
        }
    }
}

/// Trait for values that can have substitutions applied.
pub trait Substitutable {
    /// Apply a substitution to this value in a single simultaneous pass.
    fn apply_subst(&self, subst: &Subst) -> Self;

    /// Collect all free type variables.
    fn free_vars(&self) -> HashSet<TyVar>;
}

impl Substitutable for Ty {
    fn apply_subst(&self, subst: &Subst) -> Self {
        let alias = self.alias.as_ref().map(|info| AliasInfo {
            module: info.module.clone(),
            name: info.name.clone(),
            params: info.params.apply_subst(subst),
        });

        let kind = match &self.kind {
            TyKind::Unit | TyKind::Unknown => self.kind.clone(),

            // The marker stands for a type still being expanded; rewriting
            // through it would re-open the cycle it exists to break.
            TyKind::RecursiveRef { .. } => self.kind.clone(),

            TyKind::Var(var) => match subst.get(var) {
                // The replacement is used as-is. When the variable itself
                // recorded alias provenance (an alias whose body is a bare
                // variable), that outer provenance wins.
                Some(replacement) => {
                    return match alias {
                        None => replacement.clone(),
                        Some(_) => Ty {
                            kind: replacement.kind.clone(),
                            alias,
                        },
                    };
                }
                None => TyKind::Var(var.clone()),
            },

            TyKind::Union(union) => TyKind::Union(union.apply_subst(subst)),

            TyKind::Record(record) => TyKind::Record(record.apply_subst(subst)),

            TyKind::Tuple(elements) => TyKind::Tuple(elements.apply_subst(subst)),

            TyKind::Function(func) => TyKind::Function(TyFunction {
                params: func.params.apply_subst(subst),
                ret: Box::new(func.ret.apply_subst(subst)),
            }),

            TyKind::List(element) => TyKind::List(Box::new(element.apply_subst(subst))),
        };

        Ty { kind, alias }
    }

    fn free_vars(&self) -> HashSet<TyVar> {
        Ty::free_vars(self)
    }
}

impl Substitutable for TyUnion {
    fn apply_subst(&self, subst: &Subst) -> Self {
        TyUnion {
            module: self.module.clone(),
            name: self.name.clone(),
            params: self.params.apply_subst(subst),
            variants: self
                .variants
                .iter()
                .map(|variant| Variant {
                    name: variant.name.clone(),
                    params: variant.params.apply_subst(subst),
                })
                .collect(),
        }
    }

    fn free_vars(&self) -> HashSet<TyVar> {
        let mut vars = HashSet::new();
        for param in &self.params {
            vars.extend(param.free_vars());
        }
        for variant in &self.variants {
            for param in &variant.params {
                vars.extend(param.free_vars());
            }
        }
        vars
    }
}

impl Substitutable for TyRecord {
    fn apply_subst(&self, subst: &Subst) -> Self {
        let mut fields: BTreeMap<FieldName, Ty> = self
            .fields
            .iter()
            .map(|(name, ty)| (name.clone(), ty.apply_subst(subst)))
            .collect();

        let base = match &self.base {
            None => None,
            Some(var) => match subst.get(var) {
                None => Some(var.clone()),
                Some(replacement) => match &replacement.kind {
                    // Instantiating an extension record with a concrete
                    // row merges the rows; the extension's own fields win,
                    // and the replacement's tail becomes the new tail.
                    TyKind::Record(row) => {
                        let mut merged = row.fields.clone();
                        merged.append(&mut fields);
                        fields = merged;
                        row.base.clone()
                    }
                    TyKind::Var(new_base) => Some(new_base.clone()),
                    // A non-row replacement cannot become a tail.
                    _ => Some(var.clone()),
                },
            },
        };

        TyRecord { fields, base }
    }

    fn free_vars(&self) -> HashSet<TyVar> {
        let mut vars = HashSet::new();
        for ty in self.fields.values() {
            vars.extend(ty.free_vars());
        }
        if let Some(base) = &self.base {
            vars.insert(base.clone());
        }
        vars
    }
}

impl<T: Substitutable> Substitutable for Vec<T> {
    fn apply_subst(&self, subst: &Subst) -> Self {
        self.iter().map(|t| t.apply_subst(subst)).collect()
    }

    fn free_vars(&self) -> HashSet<TyVar> {
        let mut vars = HashSet::new();
        for t in self {
            vars.extend(t.free_vars());
        }
        vars
    }
}

impl<T: Substitutable> Substitutable for Option<T> {
    fn apply_subst(&self, subst: &Subst) -> Self {
        self.as_ref().map(|t| t.apply_subst(subst))
    }

    fn free_vars(&self) -> HashSet<TyVar> {
        self.as_ref().map(|t| t.free_vars()).unwrap_or_default()
    }
}

/// Instantiate a declared parametric type with the arguments supplied at
/// a use site.
///
/// `params` are the declaration's formal variables in order (anything that
/// is not a variable is skipped); `args` are the already-inferred argument
/// types; `arg_spans` locate each argument for diagnostic attribution.
///
/// An arity mismatch emits exactly one diagnostic against `use_site` and
/// then proceeds best-effort over the zippable prefix, so the caller
/// always gets a type back.
pub fn replace_call(
    name: &str,
    use_site: Span,
    declared: Ty,
    params: &[Ty],
    args: &[Ty],
    arg_spans: &[Span],
) -> InferenceResult<Ty> {
    let mut diagnostics = Vec::new();

    if params.len() != args.len() {
        diagnostics.push(TypeDiagnostic::ArityMismatch {
            name: name.to_string(),
            expected: params.len(),
            actual: args.len(),
            span: use_site,
            first_extra_arg: arg_spans.get(params.len()).copied(),
        });
    }

    let subst: Subst = params
        .iter()
        .zip(args)
        .filter_map(|(param, arg)| param.as_var().map(|var| (var.clone(), arg.clone())))
        .collect();

    InferenceResult {
        diagnostics,
        ty: subst.apply(&declared),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::new(0, 0)
    }

    #[test]
    fn test_empty_subst() {
        let subst = Subst::empty();
        assert!(subst.is_empty());

        let ty = Ty::var("a");
        assert_eq!(subst.apply(&ty), ty);
    }

    #[test]
    fn test_singleton_subst() {
        let subst = Subst::singleton(TyVar::from("a"), Ty::unit());
        assert_eq!(subst.apply(&Ty::var("a")), Ty::unit());
        assert_eq!(subst.apply(&Ty::var("b")), Ty::var("b"));
    }

    #[test]
    fn test_subst_in_function() {
        let subst = Subst::singleton(TyVar::from("a"), Ty::unit());
        let ty = Ty::function(vec![Ty::var("a")], Ty::var("a"));
        assert_eq!(
            subst.apply(&ty),
            Ty::function(vec![Ty::unit()], Ty::unit())
        );
    }

    #[test]
    fn test_simultaneous_swap() {
        // a <-> b must not cascade; one pass means no capture.
        let subst: Subst = [
            (TyVar::from("a"), Ty::var("b")),
            (TyVar::from("b"), Ty::var("a")),
        ]
        .into_iter()
        .collect();

        let ty = Ty::tuple(vec![Ty::var("a"), Ty::var("b")]);
        assert_eq!(
            subst.apply(&ty),
            Ty::tuple(vec![Ty::var("b"), Ty::var("a")])
        );
    }

    #[test]
    fn test_recursive_ref_untouched() {
        let subst = Subst::singleton(TyVar::from("a"), Ty::unit());
        let marker = Ty::recursive_ref("Main", "Tree");
        assert_eq!(subst.apply(&marker), marker);
    }

    #[test]
    fn test_record_base_renamed() {
        let subst = Subst::singleton(TyVar::from("r"), Ty::var("s"));
        let record = TyRecord::open(
            [(FieldName::from("x"), Ty::var("a"))].into_iter().collect(),
            TyVar::from("r"),
        );
        let result = subst.apply(&record);
        assert_eq!(result.base, Some(TyVar::from("s")));
    }

    #[test]
    fn test_record_base_merges_rows() {
        // { r | x : () } with r := { y : a } becomes { x : (), y : a }.
        let concrete = Ty::record(TyRecord::closed(
            [(FieldName::from("y"), Ty::var("a"))].into_iter().collect(),
        ));
        let subst = Subst::singleton(TyVar::from("r"), concrete);

        let extension = TyRecord::open(
            [(FieldName::from("x"), Ty::unit())].into_iter().collect(),
            TyVar::from("r"),
        );
        let result = subst.apply(&extension);

        assert_eq!(result.base, None);
        assert_eq!(result.field(&"x".into()), Some(&Ty::unit()));
        assert_eq!(result.field(&"y".into()), Some(&Ty::var("a")));
    }

    #[test]
    fn test_record_base_merge_keeps_open_tail() {
        // Extending an open row stays open, under the replacement's tail.
        let open = Ty::record(TyRecord::open(BTreeMap::new(), TyVar::from("s")));
        let subst = Subst::singleton(TyVar::from("r"), open);

        let extension = TyRecord::open(
            [(FieldName::from("x"), Ty::unit())].into_iter().collect(),
            TyVar::from("r"),
        );
        let result = subst.apply(&extension);

        assert_eq!(result.base, Some(TyVar::from("s")));
        assert!(result.has_field(&"x".into()));
    }

    #[test]
    fn test_alias_params_rewritten() {
        let declared = Ty::record(TyRecord::closed(
            [(FieldName::from("x"), Ty::var("a"))].into_iter().collect(),
        ))
        .with_alias(AliasInfo {
            module: "Main".to_string(),
            name: "Box".to_string(),
            params: vec![Ty::var("a")],
        });

        let subst = Subst::singleton(TyVar::from("a"), Ty::unit());
        let result = subst.apply(&declared);

        let info = result.alias.as_ref().expect("provenance preserved");
        assert_eq!(info.params, vec![Ty::unit()]);
        assert_eq!(
            result.as_record().unwrap().field(&"x".into()),
            Some(&Ty::unit())
        );
    }

    #[test]
    fn test_replace_call_matching_arity() {
        let declared = Ty::function(vec![Ty::var("a")], Ty::var("b"));
        let result = replace_call(
            "Pipe",
            span(),
            declared,
            &[Ty::var("a"), Ty::var("b")],
            &[Ty::unit(), Ty::var("c")],
            &[span(), span()],
        );

        assert!(result.is_clean());
        assert_eq!(result.ty, Ty::function(vec![Ty::unit()], Ty::var("c")));
    }

    #[test]
    fn test_replace_call_too_many_args() {
        let declared = Ty::tuple(vec![Ty::var("a"), Ty::var("b")]);
        let extra = Span::new(30, 34);
        let result = replace_call(
            "Pair",
            Span::new(0, 4),
            declared,
            &[Ty::var("a"), Ty::var("b")],
            &[Ty::unit(), Ty::unit(), Ty::unit()],
            &[Span::new(10, 12), Span::new(20, 22), extra],
        );

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0],
            TypeDiagnostic::ArityMismatch {
                name: "Pair".to_string(),
                expected: 2,
                actual: 3,
                span: Span::new(0, 4),
                first_extra_arg: Some(extra),
            }
        );
        // Best effort over the zippable prefix.
        assert_eq!(result.ty, Ty::tuple(vec![Ty::unit(), Ty::unit()]));
    }

    #[test]
    fn test_replace_call_too_few_args() {
        let declared = Ty::tuple(vec![Ty::var("a"), Ty::var("b")]);
        let result = replace_call(
            "Pair",
            span(),
            declared,
            &[Ty::var("a"), Ty::var("b")],
            &[Ty::unit()],
            &[span()],
        );

        assert_eq!(result.diagnostics.len(), 1);
        // The unpaired formal stays rigid.
        assert_eq!(result.ty, Ty::tuple(vec![Ty::unit(), Ty::var("b")]));
    }
}
