/// Per-file record of hoisted expressions

use crate::hoist::ast::Expr;

/// Prefix of every generated binding name
pub const HOIST_PREFIX: &str = "__$hoisted_o";

#[derive(Debug, Clone, PartialEq)]
pub struct HoistEntry {
    pub index: usize,
    pub name: String,
    pub expression: Expr,
}

/// Index encoded in a generated name, if `name` is one
pub fn hoisted_index(name: &str) -> Option<usize> {
    name.strip_prefix(HOIST_PREFIX)?.parse().ok()
}

/// Names are `HOIST_PREFIX` followed by the insertion index, so they are
/// dense and ordered by encounter. A registry lives for one file only.
#[derive(Debug, Default)]
pub struct HoistRegistry {
    first_index: usize,
    entries: Vec<HoistEntry>,
}

impl HoistRegistry {
    pub fn new() -> Self {
        HoistRegistry::starting_at(0)
    }

    /// Registry for a file that already declares names below `first_index`
    pub fn starting_at(first_index: usize) -> Self {
        HoistRegistry {
            first_index,
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, expression: Expr) -> String {
        let index = self.first_index + self.entries.len();
        let name = format!("{}{}", HOIST_PREFIX, index);
        self.entries.push(HoistEntry {
            index,
            name: name.clone(),
            expression,
        });
        name
    }

    pub fn drain(&mut self) -> Vec<HoistEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_follow_insertion_order() {
        let mut registry = HoistRegistry::new();
        assert_eq!(registry.register(Expr::str("a")), "__$hoisted_o0");
        assert_eq!(registry.register(Expr::str("b")), "__$hoisted_o1");
        assert_eq!(registry.register(Expr::str("c")), "__$hoisted_o2");
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["__$hoisted_o0", "__$hoisted_o1", "__$hoisted_o2"]
        );
    }

    #[test]
    fn test_drain_empties_and_restarts_numbering() {
        let mut registry = HoistRegistry::new();
        registry.register(Expr::str("a"));
        registry.register(Expr::num(2.0));

        let entries = registry.drain();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, 0);
        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[1].expression, Expr::num(2.0));
        assert!(registry.is_empty());

        assert_eq!(registry.register(Expr::str("c")), "__$hoisted_o0");
    }

    #[test]
    fn test_numbering_continues_after_existing_names() {
        let mut registry = HoistRegistry::starting_at(3);
        assert_eq!(registry.register(Expr::str("a")), "__$hoisted_o3");
        assert_eq!(registry.drain()[0].index, 3);
    }

    #[test]
    fn test_hoisted_index_reads_generated_names_only() {
        assert_eq!(hoisted_index("__$hoisted_o0"), Some(0));
        assert_eq!(hoisted_index("__$hoisted_o12"), Some(12));
        assert_eq!(hoisted_index("__$hoisted_ox"), None);
        assert_eq!(hoisted_index("styles"), None);
    }
}
