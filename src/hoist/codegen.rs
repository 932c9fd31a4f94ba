/// Source emitter for the rewritten tree
///
/// Prints the tree exactly as structured: parentheses only appear where the
/// tree has a `Paren` node (plus the one place the grammar needs them, an
/// arrow returning an object literal).
use crate::hoist::ast::*;

pub fn emit(module: &Module) -> String {
    CodeGenerator::new().generate(module)
}

pub fn emit_expr(expr: &Expr) -> String {
    CodeGenerator::new().expr(expr)
}

pub struct CodeGenerator {
    indent_level: usize,
}

impl CodeGenerator {
    pub fn new() -> Self {
        CodeGenerator { indent_level: 0 }
    }

    pub fn generate(&mut self, module: &Module) -> String {
        let mut output = String::new();
        for stmt in &module.body {
            output.push_str(&self.stmt(stmt));
            output.push('\n');
        }
        output
    }

    fn stmt(&mut self, stmt: &Stmt) -> String {
        let mut output = self.indent();
        match stmt {
            Stmt::Import(import) => output.push_str(&self.import(import)),
            Stmt::Var(var) => {
                if var.exported {
                    output.push_str("export ");
                }
                output.push_str(&self.var(var));
                output.push(';');
            }
            Stmt::Function(decl) => {
                if decl.exported {
                    output.push_str("export ");
                }
                output.push_str(&self.function_keyword(Some(&decl.name), &decl.function));
            }
            Stmt::Return { argument } => match argument {
                Some(argument) => output.push_str(&format!("return {};", self.expr(argument))),
                None => output.push_str("return;"),
            },
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                output.push_str(&format!("if ({}) {}", self.expr(test), self.block(consequent)));
                if let Some(alternate) = alternate {
                    output.push_str(&format!(" else {}", self.block(alternate)));
                }
            }
            Stmt::Expr { expr } => output.push_str(&format!("{};", self.expr(expr))),
        }
        output
    }

    fn import(&self, import: &ImportDecl) -> String {
        let mut default = None;
        let mut namespace = None;
        let mut named = Vec::new();
        for specifier in &import.specifiers {
            match specifier {
                ImportSpecifier::Default { local } => default = Some(local.name.as_str()),
                ImportSpecifier::Namespace { local } => namespace = Some(local.name.as_str()),
                ImportSpecifier::Named { imported, local } => {
                    if *imported == local.name {
                        named.push(local.name.clone());
                    } else {
                        named.push(format!("{} as {}", imported, local.name));
                    }
                }
            }
        }

        let mut clauses = Vec::new();
        if let Some(default) = default {
            clauses.push(default.to_string());
        }
        if let Some(namespace) = namespace {
            clauses.push(format!("* as {}", namespace));
        }
        if !named.is_empty() {
            clauses.push(format!("{{ {} }}", named.join(", ")));
        }

        if clauses.is_empty() {
            format!("import {};", quote(&import.source))
        } else {
            format!("import {} from {};", clauses.join(", "), quote(&import.source))
        }
    }

    fn var(&mut self, var: &VarDecl) -> String {
        let keyword = match var.kind {
            VarKind::Const => "const",
            VarKind::Let => "let",
            VarKind::Var => "var",
        };
        let declarators: Vec<String> = var
            .declarators
            .iter()
            .map(|declarator| match &declarator.init {
                Some(init) => format!("{} = {}", self.pattern(&declarator.pattern), self.expr(init)),
                None => self.pattern(&declarator.pattern),
            })
            .collect();
        format!("{} {}", keyword, declarators.join(", "))
    }

    fn block(&mut self, body: &[Stmt]) -> String {
        if body.is_empty() {
            return "{}".to_string();
        }
        let mut output = String::from("{\n");
        self.indent_level += 1;
        for stmt in body {
            output.push_str(&self.stmt(stmt));
            output.push('\n');
        }
        self.indent_level -= 1;
        output.push_str(&self.indent());
        output.push('}');
        output
    }

    fn params(&mut self, params: &[Pattern]) -> String {
        let params: Vec<String> = params.iter().map(|p| self.pattern(p)).collect();
        format!("({})", params.join(", "))
    }

    /// `function name(a, b) { ... }`; an expression body becomes a return.
    fn function_keyword(&mut self, name: Option<&Ident>, function: &Function) -> String {
        let name = name.or(function.name.as_ref());
        let head = match name {
            Some(name) => format!("function {}{}", name.name, self.params(&function.params)),
            None => format!("function {}", self.params(&function.params)),
        };
        let body = match &function.body {
            FunctionBody::Block { body } => self.block(body),
            FunctionBody::Expr { expr } => self.block(&[Stmt::Return {
                argument: Some((**expr).clone()),
            }]),
        };
        format!("{} {}", head, body)
    }

    fn arrow(&mut self, function: &Function) -> String {
        let params = self.params(&function.params);
        let body = match &function.body {
            FunctionBody::Expr { expr } => match expr.as_ref() {
                Expr::Object { .. } => format!("({})", self.expr(expr)),
                other => self.expr(other),
            },
            FunctionBody::Block { body } => self.block(body),
        };
        format!("{} => {}", params, body)
    }

    fn pattern(&mut self, pattern: &Pattern) -> String {
        match pattern {
            Pattern::Ident(ident) => ident.name.clone(),
            Pattern::Object { props } => {
                if props.is_empty() {
                    return "{}".to_string();
                }
                let props: Vec<String> = props
                    .iter()
                    .map(|prop| match &prop.value {
                        Pattern::Ident(ident) if ident.name == prop.key => ident.name.clone(),
                        Pattern::Rest { .. } => self.pattern(&prop.value),
                        Pattern::Assign { left, default } if matches!(left.as_ref(), Pattern::Ident(ident) if ident.name == prop.key) => {
                            format!("{} = {}", prop.key, self.expr(default))
                        }
                        value => format!("{}: {}", prop.key, self.pattern(value)),
                    })
                    .collect();
                format!("{{ {} }}", props.join(", "))
            }
            Pattern::Array { elements } => {
                let elements: Vec<String> = elements
                    .iter()
                    .map(|element| match element {
                        Some(element) => self.pattern(element),
                        None => String::new(),
                    })
                    .collect();
                format!("[{}]", elements.join(", "))
            }
            Pattern::Assign { left, default } => {
                format!("{} = {}", self.pattern(left), self.expr(default))
            }
            Pattern::Rest { argument } => format!("...{}", self.pattern(argument)),
        }
    }

    pub fn expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Ident(ident) => ident.name.clone(),
            Expr::Str { value } => quote(value),
            Expr::Num { value } => format_number(*value),
            Expr::Bool { value } => value.to_string(),
            Expr::Null => "null".to_string(),
            Expr::Template { quasis, exprs } => {
                let mut output = String::from("`");
                for (i, quasi) in quasis.iter().enumerate() {
                    output.push_str(&escape_template(quasi));
                    if let Some(e) = exprs.get(i) {
                        output.push_str(&format!("${{{}}}", self.expr(e)));
                    }
                }
                output.push('`');
                output
            }
            Expr::Object { members } => {
                if members.is_empty() {
                    return "{}".to_string();
                }
                let members: Vec<String> = members.iter().map(|m| self.member(m)).collect();
                format!("{{ {} }}", members.join(", "))
            }
            Expr::Array { elements } => {
                let elements: Vec<String> = elements
                    .iter()
                    .map(|element| match element {
                        Some(element) => self.expr(element),
                        None => String::new(),
                    })
                    .collect();
                format!("[{}]", elements.join(", "))
            }
            Expr::Binary { op, left, right } => {
                format!("{} {} {}", self.expr(left), op.as_str(), self.expr(right))
            }
            Expr::Unary { op, argument } => format!("{}{}", op.as_str(), self.expr(argument)),
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => format!(
                "{} ? {} : {}",
                self.expr(test),
                self.expr(consequent),
                self.expr(alternate)
            ),
            Expr::Member { object, property } => match property {
                MemberProp::Ident { name } => format!("{}.{}", self.expr(object), name),
                MemberProp::Computed { expr } => {
                    format!("{}[{}]", self.expr(object), self.expr(expr))
                }
            },
            Expr::Call { callee, args } => {
                let args: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
                format!("{}({})", self.expr(callee), args.join(", "))
            }
            Expr::Assign { target, value } => {
                format!("{} = {}", self.expr(target), self.expr(value))
            }
            Expr::Arrow(function) => self.arrow(function),
            Expr::Function(function) => self.function_keyword(None, function),
            Expr::Paren { expr } => format!("({})", self.expr(expr)),
            Expr::Spread { argument } => format!("...{}", self.expr(argument)),
            Expr::Jsx(element) => self.jsx(element),
        }
    }

    fn member(&mut self, member: &ObjectMember) -> String {
        match member {
            ObjectMember::KeyValue { key, value } => {
                format!("{}: {}", self.prop_key(key), self.expr(value))
            }
            ObjectMember::Shorthand { ident } => ident.name.clone(),
            ObjectMember::Method { key, function } => {
                let key = self.prop_key(key);
                let params = self.params(&function.params);
                let body = match &function.body {
                    FunctionBody::Block { body } => self.block(body),
                    FunctionBody::Expr { expr } => self.block(&[Stmt::Return {
                        argument: Some((**expr).clone()),
                    }]),
                };
                format!("{}{} {}", key, params, body)
            }
            ObjectMember::Spread { argument } => format!("...{}", self.expr(argument)),
        }
    }

    fn prop_key(&mut self, key: &PropKey) -> String {
        match key {
            PropKey::Ident { name } => name.clone(),
            PropKey::Str { value } => quote(value),
            PropKey::Num { value } => format_number(*value),
            PropKey::Computed { expr } => format!("[{}]", self.expr(expr)),
        }
    }

    fn jsx(&mut self, element: &JsxElement) -> String {
        let mut output = format!("<{}", element.name.name);
        for attr in &element.attrs {
            output.push(' ');
            match attr {
                JsxAttr::Attr { name, value } => {
                    output.push_str(name);
                    match value {
                        Some(JsxAttrValue::Str { value }) => {
                            output.push_str(&format!("=\"{}\"", value.replace('"', "&quot;")))
                        }
                        Some(JsxAttrValue::Expr { expr }) => {
                            output.push_str(&format!("={{{}}}", self.expr(expr)))
                        }
                        Some(JsxAttrValue::Element(element)) => {
                            output.push('=');
                            output.push_str(&self.jsx(element));
                        }
                        None => {}
                    }
                }
                JsxAttr::Spread { argument } => {
                    output.push_str(&format!("{{...{}}}", self.expr(argument)))
                }
            }
        }

        if element.children.is_empty() {
            output.push_str(" />");
            return output;
        }

        output.push('>');
        for child in &element.children {
            match child {
                JsxChild::Text { value } => output.push_str(value),
                JsxChild::Expr { expr } => output.push_str(&format!("{{{}}}", self.expr(expr))),
                JsxChild::Element(element) => output.push_str(&self.jsx(element)),
            }
        }
        output.push_str(&format!("</{}>", element.name.name));
        output
    }

    fn indent(&self) -> String {
        "  ".repeat(self.indent_level)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_template(quasi: &str) -> String {
    let mut output = String::with_capacity(quasi.len());
    let mut chars = quasi.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '`' => output.push_str("\\`"),
            '\\' => output.push_str("\\\\"),
            '$' if chars.peek() == Some(&'{') => output.push_str("\\$"),
            ch => output.push(ch),
        }
    }
    output
}

fn quote(value: &str) -> String {
    let mut output = String::with_capacity(value.len() + 2);
    output.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => output.push_str("\\'"),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            ch => output.push(ch),
        }
    }
    output.push('\'');
    output
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
