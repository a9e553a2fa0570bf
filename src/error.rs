use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// Errors produced while lexing or parsing.
///
/// Every variant records the character offset it was detected at.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    #[error("Unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("Invalid escape sequence '\\{sequence}' at offset {offset}")]
    InvalidEscape { sequence: String, offset: usize },

    #[error("Invalid number '{raw}' at offset {offset}")]
    InvalidNumber { raw: String, offset: usize },

    #[error("Syntax error at offset {offset}: expected {expected}, found {found}")]
    SyntaxError {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("Too deeply nested at offset {offset}: limit is {limit} levels")]
    TooDeeplyNested { limit: usize, offset: usize },
}

impl ParseError {
    pub fn syntax(expected: impl Into<String>, found: impl Into<String>, offset: usize) -> Self {
        ParseError::SyntaxError {
            expected: expected.into(),
            found: found.into(),
            offset,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnexpectedCharacter { offset, .. }
            | ParseError::UnterminatedString { offset }
            | ParseError::InvalidEscape { offset, .. }
            | ParseError::InvalidNumber { offset, .. }
            | ParseError::SyntaxError { offset, .. }
            | ParseError::TooDeeplyNested { offset, .. } => *offset,
        }
    }

    /// Stable name of the error condition.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::UnexpectedCharacter { .. } => "UnexpectedCharacter",
            ParseError::UnterminatedString { .. } => "UnterminatedString",
            ParseError::InvalidEscape { .. } => "InvalidEscape",
            ParseError::InvalidNumber { .. } => "InvalidNumber",
            ParseError::SyntaxError { .. } => "SyntaxError",
            ParseError::TooDeeplyNested { .. } => "TooDeeplyNested",
        }
    }

    /// True for conditions raised by the lexer rather than the grammar.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            ParseError::UnexpectedCharacter { .. }
                | ParseError::UnterminatedString { .. }
                | ParseError::InvalidEscape { .. }
                | ParseError::InvalidNumber { .. }
        )
    }

    /// Rewrites the offset, used to move errors from an embedded
    /// expression into the coordinates of the enclosing document.
    pub(crate) fn relocate(mut self, map: impl Fn(usize) -> usize) -> Self {
        match &mut self {
            ParseError::UnexpectedCharacter { offset, .. }
            | ParseError::UnterminatedString { offset }
            | ParseError::InvalidEscape { offset, .. }
            | ParseError::InvalidNumber { offset, .. }
            | ParseError::SyntaxError { offset, .. }
            | ParseError::TooDeeplyNested { offset, .. } => *offset = map(*offset),
        }
        self
    }
}

/// Serialized as `{ kind, message, offset }`.
impl Serialize for ParseError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParseError", 3)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("offset", &self.offset())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate_moves_offset() {
        let err = ParseError::syntax("']'", "end of input", 4).relocate(|o| o + 10);
        assert_eq!(err.offset(), 14);
        assert_eq!(err.kind(), "SyntaxError");
    }

    #[test]
    fn test_serialized_shape() {
        let err = ParseError::UnexpectedCharacter { ch: '#', offset: 3 };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "UnexpectedCharacter");
        assert_eq!(json["offset"], 3);
        assert_eq!(json["message"], "Unexpected character '#' at offset 3");
    }
}
