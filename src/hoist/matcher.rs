/// Attribute-position matching
///
/// The tree does not keep parent pointers; the walker tells the matcher
/// where an expression sits through a `Slot`.

use regex::Regex;

use crate::hoist::ast::Expr;

/// Syntactic position of an expression, as seen from its parents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    /// `<Comp attr={expr} />`
    AttrValue { attr: &'a str },
    /// `<Comp attr={test ? expr : other} />` (either arm)
    AttrConditionalArm { attr: &'a str },
    /// Anywhere else
    Other,
}

#[derive(Debug, Clone)]
pub struct AttributeMatcher {
    filter: Regex,
}

impl AttributeMatcher {
    pub fn new(filter: Regex) -> Self {
        AttributeMatcher { filter }
    }

    pub fn matches_attr(&self, name: &str) -> bool {
        self.filter.is_match(name)
    }

    /// True when `expr` sits in a matching attribute-value position and is
    /// a kind of expression worth hoisting on its own.
    pub fn is_candidate(&self, expr: &Expr, slot: Slot<'_>) -> bool {
        let attr = match slot {
            Slot::AttrValue { attr } | Slot::AttrConditionalArm { attr } => attr,
            Slot::Other => return false,
        };
        is_hoist_root(expr) && self.matches_attr(attr)
    }
}

impl Default for AttributeMatcher {
    fn default() -> Self {
        AttributeMatcher::new(match_all())
    }
}

pub fn match_all() -> Regex {
    Regex::new(".*").expect("static pattern")
}

/// Expressions that allocate or compute something on every render.
/// Bare identifiers and primitive literals are already free to evaluate.
pub fn is_hoist_root(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Object { .. }
            | Expr::Arrow(_)
            | Expr::Function(_)
            | Expr::Template { .. }
            | Expr::Binary { .. }
    )
}
