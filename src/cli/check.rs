//! Parse and validate input text

use super::{CliError, Mode, RunOptions};
use crate::{output, parse_resolver_with, parse_with};
use serde::Serialize;

/// Serialized parse result and whether it succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutput {
    pub json: String,
    pub success: bool,
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        output::to_json_pretty(value)
    } else {
        output::to_json(value)
    }
}

/// Parses the text and renders the full result object, failures included.
pub fn execute_parse(options: &RunOptions) -> Result<ParseOutput, CliError> {
    let (success, json) = match options.mode {
        Mode::Document => {
            let result = parse_with(&options.text, options.parse);
            (result.success, render(&result, options.pretty)?)
        }
        Mode::Resolver => {
            let result = parse_resolver_with(&options.text, options.parse);
            (result.success, render(&result, options.pretty)?)
        }
    };
    Ok(ParseOutput { json, success })
}

/// Only validates: `Ok(())` when the text parses.
pub fn execute_check(options: &RunOptions) -> Result<(), CliError> {
    match options.mode {
        Mode::Document => {
            parse_with(&options.text, options.parse).into_result()?;
        }
        Mode::Resolver => {
            parse_resolver_with(&options.text, options.parse).into_result()?;
        }
    }
    Ok(())
}
