/// Tree walker that replaces hoistable attribute values
///
/// The walk consumes the tree and rebuilds it. At every attribute the
/// matcher and classifier decide whether the value moves to module scope;
/// accepted values are swapped for a generated identifier and never walked
/// again, so nothing inside them is hoisted twice.

use tracing::{debug, trace};

use crate::hoist::ast::{
    Declaration, Declarator, Expr, Function, FunctionBody, Ident, JsxAttr, JsxAttrValue, JsxChild,
    JsxElement, MemberProp, Module, ObjectMember, Pattern, PatternProp, PropKey, Stmt, VarDecl,
};
use crate::hoist::injector::inject_declarations;
use crate::hoist::matcher::{AttributeMatcher, Slot};
use crate::hoist::purity::PurityClassifier;
use crate::hoist::registry::{hoisted_index, HoistRegistry};
use crate::hoist::resolver::Resolver;

/// Result of transforming one file
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub module: Module,
    /// Generated names, in encounter order
    pub hoisted: Vec<String>,
}

/// Rewrite one file: walk, then append the collected declarations.
///
/// Bindings left by an earlier run are kept as they are, and new names
/// continue after the highest one already declared.
pub fn rewrite_file(module: Module, matcher: &AttributeMatcher, resolver: &dyn Resolver) -> Transformed {
    let next_index = module
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Var(var) => Some(var),
            _ => None,
        })
        .flat_map(|var| &var.declarators)
        .filter_map(|declarator| hoisted_binding(&declarator.pattern))
        .max()
        .map_or(0, |index| index + 1);
    let mut registry = HoistRegistry::starting_at(next_index);

    let module = Rewriter::new(matcher, resolver, &mut registry).rewrite_module(module);

    let hoisted: Vec<String> = registry.names().map(str::to_string).collect();
    let module = if registry.is_empty() {
        module
    } else {
        inject_declarations(module, registry.drain())
    };

    debug!(hoisted = hoisted.len(), "file rewritten");
    Transformed { module, hoisted }
}

fn hoisted_binding(pattern: &Pattern) -> Option<usize> {
    match pattern {
        Pattern::Ident(ident) => hoisted_index(&ident.name),
        _ => None,
    }
}

pub struct Rewriter<'a> {
    matcher: &'a AttributeMatcher,
    classifier: PurityClassifier<'a>,
    registry: &'a mut HoistRegistry,
    function_depth: usize,
}

impl<'a> Rewriter<'a> {
    pub fn new(
        matcher: &'a AttributeMatcher,
        resolver: &'a dyn Resolver,
        registry: &'a mut HoistRegistry,
    ) -> Self {
        Rewriter {
            matcher,
            classifier: PurityClassifier::new(resolver),
            registry,
            function_depth: 0,
        }
    }

    pub fn rewrite_module(&mut self, module: Module) -> Module {
        Module {
            body: self.fold_stmts(module.body),
        }
    }

    fn fold_stmts(&mut self, stmts: Vec<Stmt>) -> Vec<Stmt> {
        stmts.into_iter().map(|stmt| self.fold_stmt(stmt)).collect()
    }

    fn fold_stmt(&mut self, stmt: Stmt) -> Stmt {
        match stmt {
            Stmt::Import(import) => Stmt::Import(import),
            Stmt::Var(var) => Stmt::Var(VarDecl {
                kind: var.kind,
                declarators: var
                    .declarators
                    .into_iter()
                    .map(|declarator| {
                        if self.function_depth == 0 && hoisted_binding(&declarator.pattern).is_some() {
                            return declarator;
                        }
                        Declarator {
                            pattern: self.fold_pattern(declarator.pattern),
                            init: declarator.init.map(|init| self.fold_expr(init)),
                        }
                    })
                    .collect(),
                exported: var.exported,
            }),
            Stmt::Function(mut decl) => {
                decl.function = self.fold_function(decl.function);
                Stmt::Function(decl)
            }
            Stmt::Return { argument } => Stmt::Return {
                argument: argument.map(|argument| self.fold_expr(argument)),
            },
            Stmt::If {
                test,
                consequent,
                alternate,
            } => Stmt::If {
                test: self.fold_expr(test),
                consequent: self.fold_stmts(consequent),
                alternate: alternate.map(|alternate| self.fold_stmts(alternate)),
            },
            Stmt::Expr { expr } => Stmt::Expr {
                expr: self.fold_expr(expr),
            },
        }
    }

    fn fold_function(&mut self, function: Function) -> Function {
        self.function_depth += 1;
        let params = function
            .params
            .into_iter()
            .map(|param| self.fold_pattern(param))
            .collect();
        let body = match function.body {
            FunctionBody::Expr { expr } => FunctionBody::Expr {
                expr: self.fold_boxed(expr),
            },
            FunctionBody::Block { body } => FunctionBody::Block {
                body: self.fold_stmts(body),
            },
        };
        self.function_depth -= 1;

        Function {
            name: function.name,
            params,
            body,
        }
    }

    fn fold_pattern(&mut self, pattern: Pattern) -> Pattern {
        match pattern {
            Pattern::Ident(ident) => Pattern::Ident(ident),
            Pattern::Object { props } => Pattern::Object {
                props: props
                    .into_iter()
                    .map(|prop| PatternProp {
                        key: prop.key,
                        value: self.fold_pattern(prop.value),
                    })
                    .collect(),
            },
            Pattern::Array { elements } => Pattern::Array {
                elements: elements
                    .into_iter()
                    .map(|element| element.map(|element| self.fold_pattern(element)))
                    .collect(),
            },
            Pattern::Assign { left, default } => Pattern::Assign {
                left: Box::new(self.fold_pattern(*left)),
                default: self.fold_boxed(default),
            },
            Pattern::Rest { argument } => Pattern::Rest {
                argument: Box::new(self.fold_pattern(*argument)),
            },
        }
    }

    fn fold_boxed(&mut self, expr: Box<Expr>) -> Box<Expr> {
        Box::new(self.fold_expr(*expr))
    }

    fn fold_expr(&mut self, expr: Expr) -> Expr {
        match expr {
            Expr::Ident(_)
            | Expr::Str { .. }
            | Expr::Num { .. }
            | Expr::Bool { .. }
            | Expr::Null => expr,
            Expr::Template { quasis, exprs } => Expr::Template {
                quasis,
                exprs: exprs.into_iter().map(|e| self.fold_expr(e)).collect(),
            },
            Expr::Object { members } => Expr::Object {
                members: members
                    .into_iter()
                    .map(|member| self.fold_member(member))
                    .collect(),
            },
            Expr::Array { elements } => Expr::Array {
                elements: elements
                    .into_iter()
                    .map(|element| element.map(|element| self.fold_expr(element)))
                    .collect(),
            },
            Expr::Binary { op, left, right } => Expr::Binary {
                op,
                left: self.fold_boxed(left),
                right: self.fold_boxed(right),
            },
            Expr::Unary { op, argument } => Expr::Unary {
                op,
                argument: self.fold_boxed(argument),
            },
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => Expr::Conditional {
                test: self.fold_boxed(test),
                consequent: self.fold_boxed(consequent),
                alternate: self.fold_boxed(alternate),
            },
            Expr::Member { object, property } => Expr::Member {
                object: self.fold_boxed(object),
                property: match property {
                    MemberProp::Computed { expr } => MemberProp::Computed {
                        expr: self.fold_boxed(expr),
                    },
                    ident => ident,
                },
            },
            Expr::Call { callee, args } => Expr::Call {
                callee: self.fold_boxed(callee),
                args: args.into_iter().map(|arg| self.fold_expr(arg)).collect(),
            },
            Expr::Assign { target, value } => Expr::Assign {
                target: self.fold_boxed(target),
                value: self.fold_boxed(value),
            },
            Expr::Arrow(function) => Expr::Arrow(self.fold_function(function)),
            Expr::Function(function) => Expr::Function(self.fold_function(function)),
            Expr::Paren { expr } => Expr::Paren {
                expr: self.fold_boxed(expr),
            },
            Expr::Spread { argument } => Expr::Spread {
                argument: self.fold_boxed(argument),
            },
            Expr::Jsx(element) => Expr::Jsx(self.fold_jsx(element)),
        }
    }

    fn fold_member(&mut self, member: ObjectMember) -> ObjectMember {
        match member {
            ObjectMember::KeyValue { key, value } => ObjectMember::KeyValue {
                key: self.fold_prop_key(key),
                value: self.fold_expr(value),
            },
            ObjectMember::Shorthand { ident } => ObjectMember::Shorthand { ident },
            ObjectMember::Method { key, function } => ObjectMember::Method {
                key: self.fold_prop_key(key),
                function: self.fold_function(function),
            },
            ObjectMember::Spread { argument } => ObjectMember::Spread {
                argument: self.fold_expr(argument),
            },
        }
    }

    fn fold_prop_key(&mut self, key: PropKey) -> PropKey {
        match key {
            PropKey::Computed { expr } => PropKey::Computed {
                expr: self.fold_boxed(expr),
            },
            key => key,
        }
    }

    fn fold_jsx(&mut self, element: JsxElement) -> JsxElement {
        JsxElement {
            name: element.name,
            attrs: element
                .attrs
                .into_iter()
                .map(|attr| self.fold_attr(attr))
                .collect(),
            children: element
                .children
                .into_iter()
                .map(|child| match child {
                    JsxChild::Text { value } => JsxChild::Text { value },
                    // content children are never attribute values
                    JsxChild::Expr { expr } => JsxChild::Expr {
                        expr: self.fold_expr(expr),
                    },
                    JsxChild::Element(element) => JsxChild::Element(self.fold_jsx(element)),
                })
                .collect(),
        }
    }

    fn fold_attr(&mut self, attr: JsxAttr) -> JsxAttr {
        match attr {
            JsxAttr::Attr { name, value } => {
                let value = value.map(|value| match value {
                    JsxAttrValue::Expr { expr } => JsxAttrValue::Expr {
                        expr: self.fold_slot(expr, Slot::AttrValue { attr: &name }),
                    },
                    JsxAttrValue::Element(element) => JsxAttrValue::Element(self.fold_jsx(element)),
                    JsxAttrValue::Str { value } => JsxAttrValue::Str { value },
                });
                JsxAttr::Attr { name, value }
            }
            JsxAttr::Spread { argument } => JsxAttr::Spread {
                argument: self.fold_expr(argument),
            },
        }
    }

    /// Fold an expression whose position may make it a candidate.
    fn fold_slot(&mut self, expr: Expr, slot: Slot<'_>) -> Expr {
        if self.should_hoist(&expr, slot) {
            return self.hoist(expr, slot);
        }

        match (slot, expr) {
            (
                Slot::AttrValue { attr },
                Expr::Conditional {
                    test,
                    consequent,
                    alternate,
                },
            ) => {
                let arm = Slot::AttrConditionalArm { attr };
                Expr::Conditional {
                    test: self.fold_boxed(test),
                    consequent: Box::new(self.fold_slot(*consequent, arm)),
                    alternate: Box::new(self.fold_slot(*alternate, arm)),
                }
            }
            (_, expr) => self.fold_expr(expr),
        }
    }

    fn should_hoist(&self, expr: &Expr, slot: Slot<'_>) -> bool {
        if !self.matcher.is_candidate(expr, slot) {
            return false;
        }
        if self.function_depth == 0 {
            trace!(?slot, "candidate outside any function, left in place");
            return false;
        }
        if !self.classifier.is_hoistable(expr) {
            trace!(?slot, "candidate is not pure, left in place");
            return false;
        }
        true
    }

    fn hoist(&mut self, expr: Expr, slot: Slot<'_>) -> Expr {
        let name = self.registry.register(expr);
        debug!(?slot, name = %name, "hoisted attribute value");
        Expr::Ident(Ident::with_decl(&name, Declaration::ModuleScopeConstant))
    }
}
