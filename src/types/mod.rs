//! Type model for Frond type expression inference.
//!
//! This module provides the core type representation, the substitution
//! implementation used to instantiate parametric declarations, and
//! pretty-printing in Frond surface syntax.

mod pretty;
mod subst;
mod ty;

pub use pretty::format_ty;
pub use subst::{replace_call, Subst, Substitutable};
pub use ty::{
    AliasInfo, FieldName, Ty, TyFunction, TyKind, TyRecord, TyUnion, TyVar, Variant,
};
