/// Appends module-scope bindings for hoisted expressions
///
/// The bindings land after every authored statement. That is safe because
/// hoisted values are only read from inside functions, which run after the
/// module has finished initialising.

use crate::hoist::ast::{Declaration, Declarator, Ident, Module, Pattern, Stmt, VarDecl, VarKind};
use crate::hoist::registry::HoistEntry;

pub fn inject_declarations(mut module: Module, entries: Vec<HoistEntry>) -> Module {
    module
        .body
        .extend(entries.into_iter().map(hoisted_declaration));
    module
}

/// `const <name> = <expression>;`
fn hoisted_declaration(entry: HoistEntry) -> Stmt {
    Stmt::Var(VarDecl {
        kind: VarKind::Const,
        declarators: vec![Declarator {
            pattern: Pattern::Ident(Ident::with_decl(
                &entry.name,
                Declaration::ModuleScopeConstant,
            )),
            init: Some(entry.expression),
        }],
        exported: false,
    })
}
