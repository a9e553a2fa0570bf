use crate::ast::{Expr, JsonNode};
use serde::Serialize;

/// Root of a parsed input.
///
/// Input starting with `{` or `[` is a JSON document; anything else is a
/// single expression statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Document {
    /// JSON document, possibly holding string templates
    #[serde(rename = "json")]
    Json { value: JsonNode },

    /// Bare expression
    ExprStmt { x: Expr },
}

impl Document {
    pub fn type_name(&self) -> &'static str {
        match self {
            Document::Json { .. } => "json",
            Document::ExprStmt { .. } => "ExprStmt",
        }
    }

    /// Root JSON value, if this is a JSON document.
    pub fn json(&self) -> Option<&JsonNode> {
        match self {
            Document::Json { value } => Some(value),
            Document::ExprStmt { .. } => None,
        }
    }

    /// The expression, if this is an expression statement.
    pub fn expression(&self) -> Option<&Expr> {
        match self {
            Document::Json { .. } => None,
            Document::ExprStmt { x } => Some(x),
        }
    }
}
