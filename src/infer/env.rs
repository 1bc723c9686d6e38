//! Type declaration resolution.
//!
//! Inference never walks modules or imports itself: every named type
//! reference goes through the [`TypeRefResolver`] seam, and whatever
//! qualification, import aliasing, or shadowing rules the host language
//! service implements stay invisible to the engine.
//!
//! [`ModuleScope`] is the in-memory implementation shipped with the
//! crate: one scope per module being inferred, holding the declarations
//! visible from that module.

use std::collections::HashMap;

use crate::ast::{QualifiedName, TypeAliasDeclaration, TypeDeclaration, TypeRef};

/// The declaration a type reference resolves to.
#[derive(Debug, Clone, Copy)]
pub enum TypeTarget<'a> {
    Union(&'a TypeDeclaration),
    Alias(&'a TypeAliasDeclaration),
}

impl TypeTarget<'_> {
    /// The identity of the resolved declaration.
    pub fn qualified_name(&self) -> QualifiedName {
        match self {
            TypeTarget::Union(decl) => decl.qualified_name(),
            TypeTarget::Alias(decl) => decl.qualified_name(),
        }
    }
}

/// Resolves a possibly-qualified type reference to its declaration.
///
/// An implementation is scoped to the module whose source is being
/// inferred; returning `None` means the name does not resolve there.
pub trait TypeRefResolver {
    fn resolve(&self, reference: &TypeRef) -> Option<TypeTarget<'_>>;
}

/// An in-memory declaration index for one module's view of the world.
///
/// Declaring a type registers it under its qualified name and exposes its
/// bare name; a later declaration with the same bare name shadows the
/// earlier one, as a local declaration shadows an imported one.
#[derive(Debug, Clone, Default)]
pub struct ModuleScope {
    /// Local import alias -> canonical module name.
    module_aliases: HashMap<String, String>,
    /// Bare name -> the declaration it currently means.
    exposed: HashMap<String, QualifiedName>,
    unions: HashMap<QualifiedName, TypeDeclaration>,
    aliases: HashMap<QualifiedName, TypeAliasDeclaration>,
}

impl ModuleScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        ModuleScope::default()
    }

    /// Register a union type declaration and expose its bare name.
    pub fn declare_union(&mut self, decl: TypeDeclaration) {
        let name = decl.qualified_name();
        self.exposed.insert(decl.name.clone(), name.clone());
        self.unions.insert(name, decl);
    }

    /// Register a type alias declaration and expose its bare name.
    pub fn declare_alias(&mut self, decl: TypeAliasDeclaration) {
        let name = decl.qualified_name();
        self.exposed.insert(decl.name.clone(), name.clone());
        self.aliases.insert(name, decl);
    }

    /// Map a local module alias to its canonical module name, as written
    /// by `import Data.Dict as Dict`.
    pub fn import_as(&mut self, local: impl Into<String>, module: impl Into<String>) {
        self.module_aliases.insert(local.into(), module.into());
    }

    /// Number of registered declarations.
    pub fn len(&self) -> usize {
        self.unions.len() + self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unions.is_empty() && self.aliases.is_empty()
    }

    fn target_name(&self, reference: &TypeRef) -> Option<QualifiedName> {
        match &reference.qualifier {
            Some(qualifier) => {
                let module = self
                    .module_aliases
                    .get(qualifier)
                    .cloned()
                    .unwrap_or_else(|| qualifier.clone());
                Some(QualifiedName::new(module, reference.name.clone()))
            }
            None => self.exposed.get(&reference.name).cloned(),
        }
    }
}

impl TypeRefResolver for ModuleScope {
    fn resolve(&self, reference: &TypeRef) -> Option<TypeTarget<'_>> {
        let name = self.target_name(reference)?;
        if let Some(decl) = self.unions.get(&name) {
            return Some(TypeTarget::Union(decl));
        }
        self.aliases.get(&name).map(TypeTarget::Alias)
    }
}
