use crate::ast::{BinOp, UnaryOp};
use serde::Serialize;
use serde_json::{Number, Value};

/// Kind tag of a [`Literal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LitKind {
    String,
    Number,
    Boolean,
    Null,
}

/// Literal value shared by expression literals (`BasicLit`) and JSON
/// literals (`jsonLiteral`).
///
/// `raw` is the exact source text, quotes included, so that numeric
/// formatting and escape spelling survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub kind: LitKind,
    pub value: Value,
    pub raw: String,
}

impl Literal {
    pub fn string(value: impl Into<String>, raw: impl Into<String>) -> Self {
        Literal {
            kind: LitKind::String,
            value: Value::String(value.into()),
            raw: raw.into(),
        }
    }

    /// Builds a number literal from its source text.
    ///
    /// Integral text keeps an integer value; everything else becomes a
    /// float. Returns `None` when the text does not fit a finite `f64`.
    pub fn number(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let number = if let Ok(n) = raw.parse::<u64>() {
            Number::from(n)
        } else if let Ok(n) = raw.parse::<i64>() {
            Number::from(n)
        } else {
            Number::from_f64(raw.parse::<f64>().ok()?)?
        };
        Some(Literal {
            kind: LitKind::Number,
            value: Value::Number(number),
            raw,
        })
    }

    pub fn boolean(value: bool, raw: impl Into<String>) -> Self {
        Literal {
            kind: LitKind::Boolean,
            value: Value::Bool(value),
            raw: raw.into(),
        }
    }

    pub fn null(raw: impl Into<String>) -> Self {
        Literal {
            kind: LitKind::Null,
            value: Value::Null,
            raw: raw.into(),
        }
    }

    /// Decoded string content, if this is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match (&self.kind, &self.value) {
            (LitKind::String, Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// Right-hand side of a scope or selector access.
///
/// Serializes as a plain string for static names and as a nested node for
/// computed keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Selector {
    /// Static property name
    ///
    /// # Examples
    /// ```text
    /// $env[something]     // Name("something")
    /// $activity[x].y      // Name("x"), then Name("y")
    /// ```
    Name(String),

    /// Computed key
    ///
    /// # Examples
    /// ```text
    /// obj['prop1']
    /// array[7]
    /// $loop[i]["-marketArea"]
    /// ```
    Expr(Box<Expr>),
}

impl Selector {
    pub fn name(name: impl Into<String>) -> Self {
        Selector::Name(name.into())
    }

    pub fn expr(expr: Expr) -> Self {
        Selector::Expr(Box::new(expr))
    }
}

/// Expression node.
///
/// The `type` tag of each variant is part of the public contract: callers
/// pattern match on the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expr {
    /// Number, string, boolean or null literal
    ///
    /// # Example
    /// ```text
    /// 3
    /// 'b'
    /// true
    /// ```
    BasicLit(Literal),

    /// Bare name
    Identifier { name: String },

    /// Scope access (`$name[sel]`, `$name.sel`, `$.sel`)
    ///
    /// The default scope is named `"."`.
    ScopeResolver { name: String, sel: Selector },

    /// Property or index access chained off another expression
    SelectorExpr { x: Box<Expr>, sel: Selector },

    /// Function call
    ///
    /// # Examples
    /// ```text
    /// somefunc(3)
    /// string.concat(`a`, 'b', "c")
    /// ```
    CallExpr { fun: Box<Expr>, args: Vec<Expr> },

    /// Prefix operation (`!x`, `-x`)
    UnaryExpr { operator: UnaryOp, x: Box<Expr> },

    /// Binary operation (arithmetic, comparison, logical)
    BinaryExpr {
        operator: BinOp,
        x: Box<Expr>,
        y: Box<Expr>,
    },

    /// Conditional (`condition ? consequent : alternate`)
    TernaryExpr {
        condition: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },

    /// Parenthesized expression, kept so the source grouping is visible
    ParenExpr { x: Box<Expr> },
}

impl Expr {
    /// The stable `type` discriminator of this node.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::BasicLit(_) => "BasicLit",
            Expr::Identifier { .. } => "Identifier",
            Expr::ScopeResolver { .. } => "ScopeResolver",
            Expr::SelectorExpr { .. } => "SelectorExpr",
            Expr::CallExpr { .. } => "CallExpr",
            Expr::UnaryExpr { .. } => "UnaryExpr",
            Expr::BinaryExpr { .. } => "BinaryExpr",
            Expr::TernaryExpr { .. } => "TernaryExpr",
            Expr::ParenExpr { .. } => "ParenExpr",
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::Identifier { name: name.into() }
    }

    pub fn scope(name: impl Into<String>, sel: Selector) -> Self {
        Expr::ScopeResolver {
            name: name.into(),
            sel,
        }
    }

    pub fn select(x: Expr, sel: Selector) -> Self {
        Expr::SelectorExpr {
            x: Box::new(x),
            sel,
        }
    }

    pub fn binary(operator: BinOp, x: Expr, y: Expr) -> Self {
        Expr::BinaryExpr {
            operator,
            x: Box::new(x),
            y: Box::new(y),
        }
    }
}
