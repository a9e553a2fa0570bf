//! Detection of expressions embedded in JSON string values.
//!
//! Two forms are recognised, checked in this order:
//!
//! ```text
//! "=$activity[x].y"          // inline: content starts with '='
//! "{{ $activity[x].y }}"     // block: the trimmed content is exactly one {{ }} span
//! ```
//!
//! Mixed text such as `"prefix {{x}} suffix"` is not a template.

use regex::Regex;
use std::sync::LazyLock;

static BLOCK_TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*\{\{(.*)\}\}\s*$").expect("block template pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedForm {
    Inline,
    Block,
}

/// Expression text found inside a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Embedded<'a> {
    pub form: EmbedForm,
    pub source: &'a str,
    /// Character index of `source` within the decoded string content
    pub start: usize,
}

/// Classifies decoded string content.
pub fn detect(content: &str) -> Option<Embedded<'_>> {
    if let Some(rest) = content.strip_prefix('=') {
        return Some(Embedded {
            form: EmbedForm::Inline,
            source: rest,
            start: 1,
        });
    }

    let inner = BLOCK_TEMPLATE.captures(content)?.get(1)?;
    let source = inner.as_str();
    // A stray brace next to the delimiters (`{{a}}}`, `{{{a}}`) means the
    // span is not exactly one `{{ }}` pair.
    let trimmed = source.trim();
    if source.contains("{{")
        || source.contains("}}")
        || trimmed.starts_with('{')
        || trimmed.ends_with('}')
    {
        return None;
    }
    Some(Embedded {
        form: EmbedForm::Block,
        source,
        start: content[..inner.start()].chars().count(),
    })
}

/// Maps a character index in the decoded content of a double-quoted
/// string back to a character offset within its raw token text.
///
/// `raw` must be a well-formed string token, opening quote included.
pub fn raw_offset(raw: &str, index: usize) -> usize {
    let chars: Vec<char> = raw.chars().collect();
    let mut position = 1; // Skip opening quote
    let mut decoded = 0;

    while decoded < index && position + 1 < chars.len() {
        position += match (chars[position], chars.get(position + 1)) {
            ('\\', Some('u')) => {
                let is_pair = chars.get(position + 6) == Some(&'\\')
                    && chars.get(position + 7) == Some(&'u')
                    && chars
                        .get(position + 2)
                        .is_some_and(|c| matches!(c, 'd' | 'D'))
                    && chars
                        .get(position + 3)
                        .is_some_and(|c| matches!(c, '8' | '9' | 'a' | 'b' | 'A' | 'B'));
                if is_pair { 12 } else { 6 }
            }
            ('\\', Some(_)) => 2,
            _ => 1,
        };
        decoded += 1;
    }

    position.min(chars.len().saturating_sub(1))
}
