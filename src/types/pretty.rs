//! Pretty-printing for types.
//!
//! Renders types in Frond surface syntax. A type carrying alias
//! provenance prints by its alias name and parameters instead of its
//! structural expansion; the module name is kept in [`AliasInfo`] for
//! consumers that want fully qualified output.

use std::fmt::{self, Display, Write};

use super::ty::{Ty, TyKind, TyRecord, TyUnion, TyVar};

/// Where a type is being written, which decides parenthesization.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Top level: never parenthesized.
    Top,
    /// A function parameter: only nested functions need parentheses.
    FnParam,
    /// A type argument: functions and applied types need parentheses.
    Arg,
}

/// Format a type to a string.
pub fn format_ty(ty: &Ty) -> String {
    let mut s = String::new();
    write_ty(&mut s, ty, Position::Top).unwrap();
    s
}

fn write_ty<W: Write>(w: &mut W, ty: &Ty, pos: Position) -> fmt::Result {
    if let Some(info) = &ty.alias {
        return write_applied(w, &info.name, &info.params, pos);
    }

    match &ty.kind {
        TyKind::Unit => write!(w, "()"),
        TyKind::Unknown => write!(w, "unknown"),

        TyKind::Var(var) => write!(w, "{}", var.name()),

        TyKind::Union(union) => write_applied(w, &union.name, &union.params, pos),

        TyKind::Record(record) => write_record(w, record),

        TyKind::Tuple(elements) => {
            write!(w, "( ")?;
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    write!(w, ", ")?;
                }
                write_ty(w, element, Position::Top)?;
            }
            write!(w, " )")
        }

        TyKind::Function(func) => {
            let needs_parens = pos != Position::Top;
            if needs_parens {
                write!(w, "(")?;
            }
            for param in &func.params {
                write_ty(w, param, Position::FnParam)?;
                write!(w, " -> ")?;
            }
            write_ty(w, &func.ret, Position::FnParam)?;
            if needs_parens {
                write!(w, ")")?;
            }
            Ok(())
        }

        TyKind::List(element) => write_applied(w, "List", std::slice::from_ref(&**element), pos),

        TyKind::RecursiveRef { name, .. } => write!(w, "{}", name),
    }
}

/// Write a named type applied to its arguments, e.g. `Maybe a`.
fn write_applied<W: Write>(w: &mut W, name: &str, args: &[Ty], pos: Position) -> fmt::Result {
    let needs_parens = pos == Position::Arg && !args.is_empty();
    if needs_parens {
        write!(w, "(")?;
    }
    write!(w, "{}", name)?;
    for arg in args {
        write!(w, " ")?;
        write_ty(w, arg, Position::Arg)?;
    }
    if needs_parens {
        write!(w, ")")?;
    }
    Ok(())
}

fn write_record<W: Write>(w: &mut W, record: &TyRecord) -> fmt::Result {
    if record.fields.is_empty() && record.base.is_none() {
        return write!(w, "{{}}");
    }

    write!(w, "{{ ")?;
    if let Some(base) = &record.base {
        write!(w, "{} | ", base.name())?;
    }
    for (i, (name, ty)) in record.fields.iter().enumerate() {
        if i > 0 {
            write!(w, ", ")?;
        }
        write!(w, "{} : ", name.0)?;
        write_ty(w, ty, Position::Top)?;
    }
    write!(w, " }}")
}

impl Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ty(f, self, Position::Top)
    }
}

impl Display for TyUnion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_applied(f, &self.name, &self.params, Position::Top)
    }
}

impl Display for TyVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ty::{AliasInfo, FieldName, Variant};

    fn maybe(arg: Ty) -> Ty {
        Ty::from(TyUnion {
            module: "Maybe".to_string(),
            name: "Maybe".to_string(),
            params: vec![arg.clone()],
            variants: vec![
                Variant {
                    name: "Just".to_string(),
                    params: vec![arg],
                },
                Variant {
                    name: "Nothing".to_string(),
                    params: vec![],
                },
            ],
        })
    }

    #[test]
    fn test_atoms() {
        assert_eq!(Ty::unit().to_string(), "()");
        assert_eq!(Ty::unknown().to_string(), "unknown");
        assert_eq!(Ty::var("msg").to_string(), "msg");
        assert_eq!(Ty::recursive_ref("Main", "Tree").to_string(), "Tree");
    }

    #[test]
    fn test_function_is_curried() {
        let func = Ty::function(vec![Ty::var("a"), Ty::var("b")], Ty::var("c"));
        assert_eq!(func.to_string(), "a -> b -> c");
    }

    #[test]
    fn test_function_param_parenthesized() {
        let inner = Ty::function(vec![Ty::var("a")], Ty::var("b"));
        let outer = Ty::function(vec![inner], Ty::var("c"));
        assert_eq!(outer.to_string(), "(a -> b) -> c");
    }

    #[test]
    fn test_applied_argument_parenthesized() {
        let ty = maybe(Ty::list(Ty::var("a")));
        assert_eq!(ty.to_string(), "Maybe (List a)");

        let plain = maybe(Ty::var("a"));
        assert_eq!(plain.to_string(), "Maybe a");
    }

    #[test]
    fn test_record() {
        let closed = Ty::record(TyRecord::closed(
            [
                (FieldName::from("x"), Ty::unit()),
                (FieldName::from("y"), Ty::var("a")),
            ]
            .into_iter()
            .collect(),
        ));
        assert_eq!(closed.to_string(), "{ x : (), y : a }");

        let open = Ty::record(TyRecord::open(
            [(FieldName::from("x"), Ty::unit())].into_iter().collect(),
            TyVar::from("r"),
        ));
        assert_eq!(open.to_string(), "{ r | x : () }");
    }

    #[test]
    fn test_tuple() {
        let pair = Ty::tuple(vec![Ty::var("a"), Ty::unit()]);
        assert_eq!(pair.to_string(), "( a, () )");
    }

    #[test]
    fn test_alias_renders_by_name() {
        let expansion = Ty::record(TyRecord::closed(
            [(FieldName::from("x"), Ty::var("a"))].into_iter().collect(),
        ));
        let aliased = expansion.with_alias(AliasInfo {
            module: "Main".to_string(),
            name: "Box".to_string(),
            params: vec![Ty::var("a")],
        });
        assert_eq!(aliased.to_string(), "Box a");

        // In argument position the applied alias is parenthesized.
        assert_eq!(maybe(aliased).to_string(), "Maybe (Box a)");
    }
}
