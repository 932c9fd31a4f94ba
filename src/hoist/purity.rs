/// Purity analysis for hoisting candidates
///
/// Decides whether an expression can be evaluated once at module load and
/// reused by every later render:
/// - Literals, plain object literals, templates and binary expressions recurse
/// - Identifiers must resolve to an import or a module-scope constant
/// - Functions are accepted when every free identifier they read does too
///
/// Anything the classifier does not recognise is rejected.

use std::collections::HashSet;

use crate::hoist::ast::{
    Declaration, Expr, Function, FunctionBody, Ident, JsxAttr, JsxAttrValue, JsxChild, JsxElement,
    MemberProp, ObjectMember, Pattern, PropKey, Stmt, VarKind,
};
use crate::hoist::resolver::Resolver;

pub struct PurityClassifier<'r> {
    resolver: &'r dyn Resolver,
}

impl<'r> PurityClassifier<'r> {
    pub fn new(resolver: &'r dyn Resolver) -> Self {
        PurityClassifier { resolver }
    }

    pub fn is_hoistable(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Str { .. } | Expr::Num { .. } => true,
            Expr::Object { members } => members.iter().all(|member| match member {
                ObjectMember::KeyValue { key, value } => {
                    !matches!(key, PropKey::Computed { .. }) && self.is_hoistable(value)
                }
                _ => false,
            }),
            Expr::Template { exprs, .. } => exprs.iter().all(|e| self.is_hoistable(e)),
            Expr::Binary { left, right, .. } => self.is_hoistable(left) && self.is_hoistable(right),
            Expr::Ident(ident) => self.is_module_level(ident),
            Expr::Arrow(function) | Expr::Function(function) => self.is_pure_enough(function),
            Expr::Paren { expr } => self.is_hoistable(expr),
            _ => false,
        }
    }

    /// Only imports and top-level constants keep their value between renders.
    pub fn is_module_level(&self, ident: &Ident) -> bool {
        matches!(
            self.resolver.resolve(ident),
            Declaration::ImportBinding | Declaration::ModuleScopeConstant
        )
    }

    /// A function is pure enough when every identifier it reads, other than
    /// its own parameters and names declared in its body, is module level.
    pub fn is_pure_enough(&self, function: &Function) -> bool {
        let context = PurityContext::collect(function);
        let pure = context
            .free_identifiers()
            .all(|ident| self.is_module_level(ident));
        pure
    }
}

/// Free identifiers of a single function
///
/// Bindings are tracked lexically: a function pushes a scope holding its
/// parameters and body declarations, a block pushes one for its own
/// declarations. A reference is free when no scope on the stack binds it
/// at the point of use.
#[derive(Debug, Default)]
pub struct PurityContext<'a> {
    scopes: Vec<HashSet<String>>,
    free: Vec<&'a Ident>,
}

impl<'a> PurityContext<'a> {
    pub fn collect(function: &'a Function) -> Self {
        let mut context = PurityContext::default();
        context.visit_function(function);
        context
    }

    /// References that are bound nowhere inside the function.
    pub fn free_identifiers(&self) -> impl Iterator<Item = &'a Ident> + '_ {
        self.free.iter().copied()
    }

    fn is_bound(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains(name))
    }

    fn reference(&mut self, ident: &'a Ident) {
        if !self.is_bound(&ident.name) {
            self.free.push(ident);
        }
    }

    fn visit_function(&mut self, function: &'a Function) {
        let mut names = Vec::new();
        if let Some(name) = &function.name {
            names.push(name.name.clone());
        }
        for param in &function.params {
            param.bound_names(&mut names);
        }
        if let FunctionBody::Block { body } = &function.body {
            block_declarations(body, &mut names);
            var_declarations(body, &mut names);
        }
        self.scopes.push(names.into_iter().collect());

        for param in &function.params {
            self.visit_pattern_defaults(param);
        }
        match &function.body {
            FunctionBody::Expr { expr } => self.visit_expr(expr),
            FunctionBody::Block { body } => self.visit_stmts(body),
        }

        self.scopes.pop();
    }

    fn visit_block(&mut self, stmts: &'a [Stmt]) {
        let mut names = Vec::new();
        block_declarations(stmts, &mut names);
        self.scopes.push(names.into_iter().collect());
        self.visit_stmts(stmts);
        self.scopes.pop();
    }

    fn visit_pattern_defaults(&mut self, pattern: &'a Pattern) {
        match pattern {
            Pattern::Ident(_) => {}
            Pattern::Object { props } => {
                for prop in props {
                    self.visit_pattern_defaults(&prop.value);
                }
            }
            Pattern::Array { elements } => {
                for element in elements.iter().flatten() {
                    self.visit_pattern_defaults(element);
                }
            }
            Pattern::Assign { left, default } => {
                self.visit_pattern_defaults(left);
                self.visit_expr(default);
            }
            Pattern::Rest { argument } => self.visit_pattern_defaults(argument),
        }
    }

    fn visit_stmts(&mut self, stmts: &'a [Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            // imports cannot appear inside a function body
            Stmt::Import(_) => {}
            Stmt::Var(var) => {
                for declarator in &var.declarators {
                    self.visit_pattern_defaults(&declarator.pattern);
                    if let Some(init) = &declarator.init {
                        self.visit_expr(init);
                    }
                }
            }
            Stmt::Function(decl) => self.visit_function(&decl.function),
            Stmt::Return { argument } => {
                if let Some(argument) = argument {
                    self.visit_expr(argument);
                }
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.visit_expr(test);
                self.visit_block(consequent);
                if let Some(alternate) = alternate {
                    self.visit_block(alternate);
                }
            }
            Stmt::Expr { expr } => self.visit_expr(expr),
        }
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        match expr {
            Expr::Ident(ident) => self.reference(ident),
            Expr::Str { .. } | Expr::Num { .. } | Expr::Bool { .. } | Expr::Null => {}
            Expr::Template { exprs, .. } => {
                for e in exprs {
                    self.visit_expr(e);
                }
            }
            Expr::Object { members } => {
                for member in members {
                    match member {
                        ObjectMember::KeyValue { key, value } => {
                            self.visit_prop_key(key);
                            self.visit_expr(value);
                        }
                        ObjectMember::Shorthand { ident } => self.reference(ident),
                        ObjectMember::Method { key, function } => {
                            self.visit_prop_key(key);
                            self.visit_function(function);
                        }
                        ObjectMember::Spread { argument } => self.visit_expr(argument),
                    }
                }
            }
            Expr::Array { elements } => {
                for element in elements.iter().flatten() {
                    self.visit_expr(element);
                }
            }
            Expr::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Unary { argument, .. } => self.visit_expr(argument),
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.visit_expr(test);
                self.visit_expr(consequent);
                self.visit_expr(alternate);
            }
            Expr::Member { object, property } => {
                self.visit_expr(object);
                // `obj.name` reads a property, not a binding
                if let MemberProp::Computed { expr } = property {
                    self.visit_expr(expr);
                }
            }
            Expr::Call { callee, args } => {
                self.visit_expr(callee);
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Expr::Assign { target, value } => {
                self.visit_expr(target);
                self.visit_expr(value);
            }
            Expr::Arrow(function) | Expr::Function(function) => self.visit_function(function),
            Expr::Paren { expr } => self.visit_expr(expr),
            Expr::Spread { argument } => self.visit_expr(argument),
            Expr::Jsx(element) => self.visit_jsx(element),
        }
    }

    fn visit_prop_key(&mut self, key: &'a PropKey) {
        if let PropKey::Computed { expr } = key {
            self.visit_expr(expr);
        }
    }

    fn visit_jsx(&mut self, element: &'a JsxElement) {
        if !element.is_intrinsic() {
            self.reference(&element.name);
        }
        for attr in &element.attrs {
            match attr {
                JsxAttr::Attr { value, .. } => match value {
                    Some(JsxAttrValue::Expr { expr }) => self.visit_expr(expr),
                    Some(JsxAttrValue::Element(element)) => self.visit_jsx(element),
                    Some(JsxAttrValue::Str { .. }) | None => {}
                },
                JsxAttr::Spread { argument } => self.visit_expr(argument),
            }
        }
        for child in &element.children {
            match child {
                JsxChild::Text { .. } => {}
                JsxChild::Expr { expr } => self.visit_expr(expr),
                JsxChild::Element(element) => self.visit_jsx(element),
            }
        }
    }
}

/// Names a block binds for its whole extent: `let`, `const`, `var` and
/// function declarations written directly in it.
fn block_declarations(stmts: &[Stmt], names: &mut Vec<String>) {
    for stmt in stmts {
        match stmt {
            Stmt::Var(var) => {
                for declarator in &var.declarators {
                    declarator.pattern.bound_names(names);
                }
            }
            Stmt::Function(decl) => names.push(decl.name.name.clone()),
            _ => {}
        }
    }
}

/// `var` bindings inside nested blocks belong to the enclosing function.
fn var_declarations(stmts: &[Stmt], names: &mut Vec<String>) {
    for stmt in stmts {
        if let Stmt::If {
            consequent,
            alternate,
            ..
        } = stmt
        {
            for block in std::iter::once(consequent).chain(alternate) {
                for inner in block {
                    if let Stmt::Var(var) = inner {
                        if var.kind == VarKind::Var {
                            for declarator in &var.declarators {
                                declarator.pattern.bound_names(names);
                            }
                        }
                    }
                }
                var_declarations(block, names);
            }
        }
    }
}
