use crate::ast::{Expr, Literal};
use serde::Serialize;

/// JSON value node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum JsonNode {
    /// Object, properties in source order (duplicates kept)
    #[serde(rename = "jsonObject")]
    Object { children: Vec<JsonProperty> },

    /// Array, elements in source order
    #[serde(rename = "jsonArray")]
    Array { children: Vec<JsonNode> },

    /// Literal string, number, boolean or null
    #[serde(rename = "jsonLiteral")]
    Literal(Literal),

    /// String value that holds an expression
    ///
    /// # Examples
    /// ```text
    /// "{{ $activity[x].y }}"
    /// "=$activity[x].y"
    /// ```
    #[serde(rename = "stringTemplate")]
    StringTemplate { expression: Expr },
}

impl JsonNode {
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonNode::Object { .. } => "jsonObject",
            JsonNode::Array { .. } => "jsonArray",
            JsonNode::Literal(_) => "jsonLiteral",
            JsonNode::StringTemplate { .. } => "stringTemplate",
        }
    }

    /// Looks up the first property named `key` on an object node.
    pub fn get(&self, key: &str) -> Option<&JsonNode> {
        match self {
            JsonNode::Object { children } => children
                .iter()
                .find(|property| property.key == key)
                .map(|property| &property.value),
            _ => None,
        }
    }

    /// Whether this subtree contains any embedded expression.
    pub fn has_templates(&self) -> bool {
        match self {
            JsonNode::Object { children } => children.iter().any(|p| p.value.has_templates()),
            JsonNode::Array { children } => children.iter().any(JsonNode::has_templates),
            JsonNode::Literal(_) => false,
            JsonNode::StringTemplate { .. } => true,
        }
    }
}

/// Object member (`"key": value`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "jsonProperty")]
pub struct JsonProperty {
    pub key: String,
    pub value: JsonNode,
}
