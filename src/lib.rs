pub mod api;
pub mod ast;
pub mod cli;
pub mod error;
pub mod lexer;
pub mod options;
pub mod output;
pub mod parser;
pub mod template;

pub use api::{ParseResult, parse, parse_resolver, parse_resolver_with, parse_with};
pub use ast::{BinOp, Document, Expr, JsonNode, JsonProperty, LitKind, Literal, Selector, Token, TokenKind, UnaryOp};
pub use error::ParseError;
pub use lexer::{Lexer, tokenize};
pub use options::{DEFAULT_MAX_DEPTH, ParseOptions};
pub use output::{to_json, to_json_pretty, to_source, to_source_pretty};
pub use parser::Parser;
