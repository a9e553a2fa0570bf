//! Parser configuration.

/// Default nesting limit, see [`ParseOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Knobs for a single parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of expressions and JSON containers, and maximum
    /// height of an expression tree plus the containers around it.
    /// Exceeding it fails with `TooDeeplyNested` instead of exhausting the
    /// stack while parsing, printing or dropping the tree.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
