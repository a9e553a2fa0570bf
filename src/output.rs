//! Printing parsed trees back to text.
//!
//! Two kinds of output are provided:
//!
//! - **Source reconstruction** via [`to_source()`] / [`to_source_pretty()`] -
//!   literals are printed from their `raw` text, string templates as
//!   `"=<expression>"`, so parsing the output again yields an equal tree
//! - **Tree dumps** via [`to_json()`] / [`to_json_pretty()`] - the serialized
//!   form of any parse result, `type` tags included
//!
//! # Examples
//!
//! ```
//! use mapping_expr::output::to_source;
//!
//! let doc = mapping_expr::parse(r#"{ "n": 78.910, "t": "{{ $env[x] }}" }"#).ast.unwrap();
//! assert_eq!(to_source(&doc), r#"{"n":78.910,"t":"=$env.x"}"#);
//! ```

use crate::ast::{Document, Expr, JsonNode, Selector};
use crate::parser::DEFAULT_SCOPE;
use serde::Serialize;

pub struct SourcePrinter {
    pretty: bool,
}

impl SourcePrinter {
    pub fn new(pretty: bool) -> Self {
        SourcePrinter { pretty }
    }

    pub fn print(&self, document: &Document) -> String {
        match document {
            Document::Json { value } => self.print_node(value, 0),
            Document::ExprStmt { x } => print_expr(x),
        }
    }

    fn print_node(&self, node: &JsonNode, indent: usize) -> String {
        match node {
            JsonNode::Literal(literal) => literal.raw.clone(),
            JsonNode::StringTemplate { expression } => {
                format!("\"={}\"", escape_string(&print_expr(expression)))
            }
            JsonNode::Array { children } => self.print_array(children, indent),
            JsonNode::Object { children } => {
                let members: Vec<(&str, &JsonNode)> = children
                    .iter()
                    .map(|p| (p.key.as_str(), &p.value))
                    .collect();
                self.print_object(&members, indent)
            }
        }
    }

    fn print_array(&self, arr: &[JsonNode], indent: usize) -> String {
        if arr.is_empty() {
            return "[]".to_string();
        }

        if self.pretty {
            let mut result = "[\n".to_string();
            let items: Vec<String> = arr
                .iter()
                .map(|v| {
                    format!(
                        "{}{}",
                        self.indent(indent + 1),
                        self.print_node(v, indent + 1)
                    )
                })
                .collect();
            result.push_str(&items.join(",\n"));
            result.push('\n');
            result.push_str(&self.indent(indent));
            result.push(']');
            result
        } else {
            let items: Vec<String> = arr.iter().map(|v| self.print_node(v, indent)).collect();
            format!("[{}]", items.join(","))
        }
    }

    /// Members keep source order, duplicates included.
    fn print_object(&self, members: &[(&str, &JsonNode)], indent: usize) -> String {
        if members.is_empty() {
            return "{}".to_string();
        }

        if self.pretty {
            let mut result = "{\n".to_string();
            let items: Vec<String> = members
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}\"{}\": {}",
                        self.indent(indent + 1),
                        escape_string(k),
                        self.print_node(v, indent + 1)
                    )
                })
                .collect();
            result.push_str(&items.join(",\n"));
            result.push('\n');
            result.push_str(&self.indent(indent));
            result.push('}');
            result
        } else {
            let items: Vec<String> = members
                .iter()
                .map(|(k, v)| format!("\"{}\":{}", escape_string(k), self.print_node(v, indent)))
                .collect();
            format!("{{{}}}", items.join(","))
        }
    }

    fn indent(&self, level: usize) -> String {
        "  ".repeat(level)
    }
}

fn escape_string(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            '\n' => vec!['\\', 'n'],
            '\r' => vec!['\\', 'r'],
            '\t' => vec!['\\', 't'],
            c if c.is_control() => format!("\\u{:04x}", c as u32).chars().collect(),
            c => vec![c],
        })
        .collect()
}

fn print_selector(sel: &Selector) -> String {
    match sel {
        Selector::Name(name) => format!(".{}", name),
        Selector::Expr(key) => format!("[{}]", print_expr(key)),
    }
}

/// Canonical source text of an expression.
///
/// Grouping is only what `ParenExpr` nodes record, so the output parses
/// back to the same tree.
pub fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::BasicLit(literal) => literal.raw.clone(),
        Expr::Identifier { name } => name.clone(),
        Expr::ScopeResolver { name, sel } if name == DEFAULT_SCOPE => {
            format!("${}", print_selector(sel))
        }
        Expr::ScopeResolver { name, sel } => format!("${}{}", name, print_selector(sel)),
        Expr::SelectorExpr { x, sel } => format!("{}{}", print_expr(x), print_selector(sel)),
        Expr::CallExpr { fun, args } => {
            let args: Vec<String> = args.iter().map(print_expr).collect();
            format!("{}({})", print_expr(fun), args.join(", "))
        }
        Expr::UnaryExpr { operator, x } => format!("{}{}", operator, print_expr(x)),
        Expr::BinaryExpr { operator, x, y } => {
            format!("{} {} {}", print_expr(x), operator, print_expr(y))
        }
        Expr::TernaryExpr {
            condition,
            consequent,
            alternate,
        } => format!(
            "{} ? {} : {}",
            print_expr(condition),
            print_expr(consequent),
            print_expr(alternate)
        ),
        Expr::ParenExpr { x } => format!("({})", print_expr(x)),
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&print_expr(self))
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_source(self))
    }
}

// Convenience functions

/// Reconstructs compact source text.
pub fn to_source(document: &Document) -> String {
    SourcePrinter::new(false).print(document)
}

/// Reconstructs source text with 2-space indentation, one member per line.
pub fn to_source_pretty(document: &Document) -> String {
    SourcePrinter::new(true).print(document)
}

/// Serializes a tree or [`crate::ParseResult`] to compact JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Serializes a tree or [`crate::ParseResult`] to indented JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
