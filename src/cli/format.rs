//! Reconstruct source text and dump tokens

use super::{CliError, Mode, RunOptions};
use crate::{output, parse_resolver_with, parse_with, tokenize};

/// Parses the text and prints it back in canonical form.
pub fn execute_format(options: &RunOptions) -> Result<String, CliError> {
    match options.mode {
        Mode::Document => {
            let document = parse_with(&options.text, options.parse).into_result()?;
            Ok(if options.pretty {
                output::to_source_pretty(&document)
            } else {
                output::to_source(&document)
            })
        }
        Mode::Resolver => {
            let expr = parse_resolver_with(&options.text, options.parse).into_result()?;
            Ok(output::print_expr(&expr))
        }
    }
}

/// One token per line: offset, kind, raw text.
pub fn execute_tokens(text: &str) -> Result<String, CliError> {
    let lines: Vec<String> = tokenize(text)?.iter().map(ToString::to_string).collect();
    Ok(lines.join("\n"))
}
