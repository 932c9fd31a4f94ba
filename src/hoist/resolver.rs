/// Symbol resolution seam
///
/// The pass never computes scopes itself. It asks a `Resolver` where an
/// identifier is declared and only trusts imports and module-scope constants.

use std::collections::HashMap;

use crate::hoist::ast::{Declaration, Ident};

pub trait Resolver {
    fn resolve(&self, ident: &Ident) -> Declaration;
}

impl<F> Resolver for F
where
    F: Fn(&Ident) -> Declaration,
{
    fn resolve(&self, ident: &Ident) -> Declaration {
        self(ident)
    }
}

/// Trusts the classification the front end attached to each identifier.
/// Identifiers without one are `Unresolved`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotatedResolver;

impl Resolver for AnnotatedResolver {
    fn resolve(&self, ident: &Ident) -> Declaration {
        ident.decl.unwrap_or(Declaration::Unresolved)
    }
}

/// Name-keyed lookup table
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
    declarations: HashMap<String, Declaration>,
}

impl TableResolver {
    pub fn new() -> Self {
        TableResolver {
            declarations: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, decl: Declaration) {
        self.declarations.insert(name.to_string(), decl);
    }

    pub fn with(mut self, name: &str, decl: Declaration) -> Self {
        self.insert(name, decl);
        self
    }
}

impl From<HashMap<String, Declaration>> for TableResolver {
    fn from(declarations: HashMap<String, Declaration>) -> Self {
        TableResolver { declarations }
    }
}

impl Resolver for TableResolver {
    fn resolve(&self, ident: &Ident) -> Declaration {
        self.declarations
            .get(&ident.name)
            .copied()
            .unwrap_or(Declaration::Unresolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotated_resolver_defaults_to_unresolved() {
        let resolver = AnnotatedResolver;
        assert_eq!(
            resolver.resolve(&Ident::with_decl("React", Declaration::ImportBinding)),
            Declaration::ImportBinding
        );
        assert_eq!(resolver.resolve(&Ident::new("x")), Declaration::Unresolved);
    }

    #[test]
    fn test_table_resolver_ignores_annotations() {
        let resolver = TableResolver::new().with("constant", Declaration::ModuleScopeConstant);
        assert_eq!(
            resolver.resolve(&Ident::new("constant")),
            Declaration::ModuleScopeConstant
        );
        // the table is the only source of truth
        assert_eq!(
            resolver.resolve(&Ident::with_decl("other", Declaration::ImportBinding)),
            Declaration::Unresolved
        );
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |ident: &Ident| {
            if ident.name == "theme" {
                Declaration::Parameter
            } else {
                Declaration::Unresolved
            }
        };
        assert_eq!(resolver.resolve(&Ident::new("theme")), Declaration::Parameter);
    }
}
