//! CLI support for mapping-expr
//!
//! Provides programmatic access to the `mapx` commands for embedding in
//! other tools (import pipelines, editor integrations).

mod check;
mod format;

pub use check::{execute_check, execute_parse, ParseOutput};
pub use format::{execute_format, execute_tokens};

use crate::ParseOptions;
use std::io;
use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Pass the text as an argument or pipe it to stdin.")]
    NoInput,
}

/// How the input text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// JSON document with templates, or a bare expression
    #[default]
    Document,
    /// Bare expression only
    Resolver,
}

/// Options shared by the commands
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Text to parse
    pub text: String,
    pub mode: Mode,
    /// Indent the output
    pub pretty: bool,
    pub parse: ParseOptions,
}
