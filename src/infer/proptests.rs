//! Property-based tests for inference invariants.

use proptest::prelude::*;

use crate::ast::{Span, TypeExpr, TypeSegment, TypeVariable};
use crate::error::TypeDiagnostic;
use crate::infer::{infer_type_expr, ModuleScope};
use crate::types::{replace_call, Subst, Ty};

fn span() -> Span {
    Span::new(0, 0)
}

fn seg(name: &str) -> TypeSegment {
    TypeSegment::Variable(TypeVariable::new(name, span()))
}

// Strategy for valid type variable names
fn var_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,3}").unwrap()
}

// Strategy for structurally interesting types
fn ty_strategy() -> impl Strategy<Value = Ty> {
    let leaf = prop_oneof![
        Just(Ty::unit()),
        Just(Ty::unknown()),
        var_name().prop_map(Ty::var),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(Ty::list),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Ty::tuple),
            (prop::collection::vec(inner.clone(), 1..3), inner)
                .prop_map(|(params, ret)| Ty::function(params, ret)),
        ]
    })
}

proptest! {
    #[test]
    fn empty_subst_is_identity(ty in ty_strategy()) {
        prop_assert_eq!(&Subst::empty().apply(&ty), &ty);
    }

    #[test]
    fn arity_mismatch_reports_exactly_once(
        formals in prop::collection::hash_set(var_name(), 1..5),
        extra in 1usize..4,
    ) {
        let params: Vec<Ty> = formals.iter().cloned().map(Ty::var).collect();
        let args = vec![Ty::unit(); params.len() + extra];
        let arg_spans = vec![span(); args.len()];
        let declared = Ty::function(params.clone(), Ty::unit());

        let result = replace_call("T", span(), declared, &params, &args, &arg_spans);

        prop_assert_eq!(result.diagnostics.len(), 1);
        let is_arity_mismatch = matches!(
            result.diagnostics[0],
            TypeDiagnostic::ArityMismatch { .. }
        );
        prop_assert!(is_arity_mismatch);
    }

    #[test]
    fn full_arity_instantiation_closes_the_type(
        formals in prop::collection::hash_set(var_name(), 1..5),
    ) {
        let params: Vec<Ty> = formals.iter().cloned().map(Ty::var).collect();
        let args = vec![Ty::unit(); params.len()];
        let arg_spans = vec![span(); args.len()];
        let declared = Ty::function(params.clone(), Ty::function(params.clone(), Ty::unit()));

        let result = replace_call("T", span(), declared, &params, &args, &arg_spans);

        prop_assert!(result.is_clean());
        prop_assert!(result.ty.free_vars().is_empty());
    }

    #[test]
    fn arrow_chains_flatten(
        names in prop::collection::vec(var_name(), 3..6),
        cut in any::<prop::sample::Index>(),
    ) {
        let scope = ModuleScope::new();
        // Parenthesizing any tail of the chain must not change the type.
        let cut = 1 + cut.index(names.len() - 2);

        let flat = TypeExpr::new(names.iter().map(|n| seg(n)).collect(), span());

        let tail = TypeExpr::new(names[cut..].iter().map(|n| seg(n)).collect(), span());
        let mut segments: Vec<TypeSegment> = names[..cut].iter().map(|n| seg(n)).collect();
        segments.push(TypeSegment::Group(Box::new(tail)));
        let grouped = TypeExpr::new(segments, span());

        let flat_ty = infer_type_expr(&scope, &flat).ty;
        let grouped_ty = infer_type_expr(&scope, &grouped).ty;

        prop_assert_eq!(&flat_ty, &grouped_ty);
        let func = flat_ty.as_function().expect("arrow chain is a function");
        prop_assert_eq!(func.params.len(), names.len() - 1);
        prop_assert!(func.params.iter().all(Ty::is_var));
    }
}
