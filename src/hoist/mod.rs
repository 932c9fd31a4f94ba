/// Attribute-value hoisting pass
///
/// Moves constant attribute values out of render functions into
/// module-scope `const` bindings:
///
/// ```text
/// const Xyz = () => <Comp css={{ color: 'red' }} />;
/// ```
///
/// becomes
///
/// ```text
/// const Xyz = () => <Comp css={__$hoisted_o0} />;
/// const __$hoisted_o0 = { color: 'red' };
/// ```
pub mod ast;
pub mod codegen;
pub mod injector;
pub mod matcher;
pub mod purity;
pub mod registry;
pub mod resolver;
pub mod rewriter;

use regex::Regex;

use crate::hoist::ast::Module;
use crate::hoist::matcher::{match_all, AttributeMatcher};
use crate::hoist::resolver::Resolver;

pub use crate::hoist::rewriter::Transformed;

/// Pass configuration
#[derive(Debug, Clone)]
pub struct Options {
    /// Only attributes whose name matches are considered
    pub prop_filter: Regex,
}

impl Options {
    pub fn with_prop_filter(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Options {
            prop_filter: Regex::new(pattern)?,
        })
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            prop_filter: match_all(),
        }
    }
}

/// Immutable, shareable pass. Every `run` works on its own registry, so
/// one `HoistPass` can serve many files, from many threads.
#[derive(Debug, Clone)]
pub struct HoistPass {
    matcher: AttributeMatcher,
}

impl HoistPass {
    pub fn new(options: Options) -> Self {
        HoistPass {
            matcher: AttributeMatcher::new(options.prop_filter),
        }
    }

    pub fn run(&self, module: Module, resolver: &dyn Resolver) -> Transformed {
        rewriter::rewrite_file(module, &self.matcher, resolver)
    }
}

impl Default for HoistPass {
    fn default() -> Self {
        HoistPass::new(Options::default())
    }
}

/// Transform one file with the given options
pub fn transform(module: Module, options: &Options, resolver: &dyn Resolver) -> Module {
    HoistPass::new(options.clone()).run(module, resolver).module
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hoist::resolver::AnnotatedResolver;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_pass_is_shareable() {
        assert_send_sync::<HoistPass>();
    }

    #[test]
    fn test_empty_module_is_unchanged() {
        let pass = HoistPass::default();
        let out = pass.run(Module::default(), &AnnotatedResolver);
        assert!(out.hoisted.is_empty());
        assert_eq!(out.module, Module::default());
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        assert!(Options::with_prop_filter("(").is_err());
        assert!(Options::with_prop_filter("^css$").is_ok());
    }
}
