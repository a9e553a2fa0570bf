//! Public entry points.
//!
//! Both entry points return a [`ParseResult`] instead of a `Result`: callers
//! such as mapping editors and import pipelines check `success` and show
//! `error.message` / `error.offset` to the user. Nothing here panics on bad
//! input.

use crate::{
    ast::{Document, Expr},
    error::ParseError,
    lexer::Lexer,
    options::ParseOptions,
    parser::Parser,
};
use serde::Serialize;
use tracing::debug;

/// Uniform outcome of a parse call.
///
/// Serializes as `{ "success": bool, "ast"?: ..., "error"?: { kind, message, offset } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ParseError>,
}

impl<T> ParseResult<T> {
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn into_result(self) -> Result<T, ParseError> {
        match (self.ast, self.error) {
            (Some(ast), None) => Ok(ast),
            (_, Some(error)) => Err(error),
            (None, None) => Err(ParseError::syntax("input", "nothing", 0)),
        }
    }
}

impl<T> From<Result<T, ParseError>> for ParseResult<T> {
    fn from(result: Result<T, ParseError>) -> Self {
        match result {
            Ok(ast) => ParseResult {
                success: true,
                ast: Some(ast),
                error: None,
            },
            Err(error) => ParseResult {
                success: false,
                ast: None,
                error: Some(error),
            },
        }
    }
}

/// Parses a JSON document that may hold string templates, or a bare
/// expression when the input does not open with `{` or `[`.
///
/// # Examples
///
/// ```
/// let result = mapping_expr::parse(r#"{ "a": "=$activity[x].y" }"#);
/// assert!(result.success);
/// assert_eq!(result.ast.unwrap().type_name(), "json");
/// ```
pub fn parse(text: &str) -> ParseResult<Document> {
    parse_with(text, ParseOptions::default())
}

pub fn parse_with(text: &str, options: ParseOptions) -> ParseResult<Document> {
    debug!(len = text.len(), max_depth = options.max_depth, "parsing document");
    let result = Parser::with_options(Lexer::new(text), options).and_then(|mut p| p.parse_document());
    log_failure(&result);
    result.into()
}

/// Parses a bare expression, typically a single scope resolver such as
/// `$env[something]`.
///
/// # Examples
///
/// ```
/// let result = mapping_expr::parse_resolver("$env[something]");
/// assert_eq!(result.ast.unwrap().type_name(), "ScopeResolver");
/// ```
pub fn parse_resolver(text: &str) -> ParseResult<Expr> {
    parse_resolver_with(text, ParseOptions::default())
}

pub fn parse_resolver_with(text: &str, options: ParseOptions) -> ParseResult<Expr> {
    debug!(len = text.len(), max_depth = options.max_depth, "parsing resolver");
    let result = Parser::with_options(Lexer::new(text), options).and_then(|mut p| p.parse());
    log_failure(&result);
    result.into()
}

fn log_failure<T>(result: &Result<T, ParseError>) {
    if let Err(e) = result {
        debug!(kind = e.kind(), offset = e.offset(), "parse failed: {}", e);
    }
}
