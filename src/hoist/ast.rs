/// Abstract Syntax Tree consumed and produced by the hoisting pass
///
/// The tree is produced by an external front end and handed over as JSON.
/// Identifiers may carry the declaration classification the front end's
/// symbol service computed for them (see `resolver::AnnotatedResolver`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

/// Where an identifier's declaration lives, as reported by the symbol service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Declaration {
    ImportBinding,
    ModuleScopeConstant,
    Parameter,
    LocalVariable,
    #[serde(alias = "other")]
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decl: Option<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Stmt {
    Import(ImportDecl),
    Var(VarDecl),
    Function(FunctionDecl),
    Return { argument: Option<Expr> },
    If {
        test: Expr,
        consequent: Vec<Stmt>,
        #[serde(default)]
        alternate: Option<Vec<Stmt>>,
    },
    Expr { expr: Expr },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImportSpecifier {
    Default { local: Ident },
    Namespace { local: Ident },
    Named {
        imported: String,
        local: Ident,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarKind {
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarators: Vec<Declarator>,
    #[serde(default)]
    pub exported: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declarator {
    pub pattern: Pattern,
    #[serde(default)]
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Ident,
    pub function: Function,
    #[serde(default)]
    pub exported: bool,
}

/// Shared shape of arrow functions, function expressions and declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub name: Option<Ident>,
    pub params: Vec<Pattern>,
    pub body: FunctionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FunctionBody {
    /// `x => x + 1`
    Expr { expr: Box<Expr> },
    /// `x => { return x + 1; }`
    Block { body: Vec<Stmt> },
}

/// Binding patterns: plain names and destructuring at any depth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    Ident(Ident),
    Object { props: Vec<PatternProp> },
    Array { elements: Vec<Option<Pattern>> },
    Assign {
        left: Box<Pattern>,
        default: Box<Expr>,
    },
    Rest { argument: Box<Pattern> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternProp {
    pub key: String,
    pub value: Pattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    Ident(Ident),
    Str { value: String },
    Num { value: f64 },
    Bool { value: bool },
    Null,
    Template {
        quasis: Vec<String>,
        exprs: Vec<Expr>,
    },
    Object { members: Vec<ObjectMember> },
    Array { elements: Vec<Option<Expr>> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        argument: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: MemberProp,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Arrow(Function),
    Function(Function),
    Paren { expr: Box<Expr> },
    Spread { argument: Box<Expr> },
    Jsx(JsxElement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Rem,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "===")]
    StrictEq,
    #[serde(rename = "!==")]
    StrictNotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "??")]
    Nullish,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Nullish => "??",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "typeof")]
    TypeOf,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::TypeOf => "typeof ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MemberProp {
    /// `obj.name`
    Ident { name: String },
    /// `obj[expr]`
    Computed { expr: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectMember {
    /// `key: value`
    KeyValue { key: PropKey, value: Expr },
    /// `{ name }`
    Shorthand { ident: Ident },
    /// `key() { ... }`
    Method { key: PropKey, function: Function },
    /// `...expr`
    Spread { argument: Expr },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropKey {
    Ident { name: String },
    Str { value: String },
    Num { value: f64 },
    Computed { expr: Box<Expr> },
}

/// A component invocation: `<Name attr={value}>children</Name>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxElement {
    pub name: Ident,
    #[serde(default)]
    pub attrs: Vec<JsxAttr>,
    #[serde(default)]
    pub children: Vec<JsxChild>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsxAttr {
    Attr {
        name: String,
        #[serde(default)]
        value: Option<JsxAttrValue>,
    },
    Spread { argument: Expr },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsxAttrValue {
    /// `name="text"`
    Str { value: String },
    /// `name={expr}`
    Expr { expr: Expr },
    /// `name=<Other />`
    Element(JsxElement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsxChild {
    Text { value: String },
    Expr { expr: Expr },
    Element(JsxElement),
}

impl Ident {
    pub fn new(name: &str) -> Self {
        Ident {
            name: name.to_string(),
            decl: None,
        }
    }

    pub fn with_decl(name: &str, decl: Declaration) -> Self {
        Ident {
            name: name.to_string(),
            decl: Some(decl),
        }
    }
}

impl JsxElement {
    /// Lower-case element names (`div`, `span`) are host elements, not bindings.
    pub fn is_intrinsic(&self) -> bool {
        self.name
            .name
            .chars()
            .next()
            .map(|c| c.is_ascii_lowercase())
            .unwrap_or(true)
    }
}

impl Pattern {
    /// Every name this pattern binds, at any destructuring depth.
    pub fn bound_names(&self, out: &mut Vec<String>) {
        match self {
            Pattern::Ident(ident) => out.push(ident.name.clone()),
            Pattern::Object { props } => {
                for prop in props {
                    prop.value.bound_names(out);
                }
            }
            Pattern::Array { elements } => {
                for element in elements.iter().flatten() {
                    element.bound_names(out);
                }
            }
            Pattern::Assign { left, .. } => left.bound_names(out),
            Pattern::Rest { argument } => argument.bound_names(out),
        }
    }
}

impl Expr {
    pub fn ident(name: &str) -> Self {
        Expr::Ident(Ident::new(name))
    }

    pub fn str(value: &str) -> Self {
        Expr::Str {
            value: value.to_string(),
        }
    }

    pub fn num(value: f64) -> Self {
        Expr::Num { value }
    }
}
