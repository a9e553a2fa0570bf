use std::fmt;

/// Quote character used to delimit a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    /// `"text"`, the only form accepted as a raw JSON string
    Double,
    /// `'text'`
    Single,
    /// `` `text` ``
    Back,
}

impl Quote {
    pub fn from_char(ch: char) -> Option<Quote> {
        match ch {
            '"' => Some(Quote::Double),
            '\'' => Some(Quote::Single),
            '`' => Some(Quote::Back),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
            Quote::Back => '`',
        }
    }
}

/// Kind of a lexical token, with its decoded payload where one exists.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Numeric literal. The verbatim text lives in [`Token::raw`].
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 78.91
    /// 1.5e-3
    /// ```
    Number,

    /// String literal with its escapes decoded
    ///
    /// # Examples
    /// ```text
    /// "prop1"
    /// 'prop2'
    /// `prop3`
    /// ```
    String { value: String, quote: Quote },

    /// `true` / `false`
    Boolean(bool),

    /// `null` or `nil`
    Null,

    // Names
    /// Bare name
    ///
    /// Must start with a letter or underscore, followed by letters, digits or underscores.
    Identifier(String),

    /// Named scope (`$name`)
    ///
    /// # Examples
    /// ```text
    /// $env
    /// $activity
    /// $loop
    /// ```
    Scope(String),

    /// Lone `$`, the default scope when followed by `.` or `[`
    Dollar,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Exclamation,
    Question,
    Colon,

    // Delimiters
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Dot,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Short human readable description, used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number => "number".to_string(),
            TokenKind::String { .. } => "string".to_string(),
            TokenKind::Boolean(b) => format!("'{}'", b),
            TokenKind::Null => "null".to_string(),
            TokenKind::Identifier(name) => format!("identifier '{}'", name),
            TokenKind::Scope(name) => format!("scope '${}'", name),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    /// Source spelling of operator and delimiter tokens.
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::Dollar => "$",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Exclamation => "!",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            _ => "",
        }
    }
}

/// A token together with the exact source text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Verbatim source text, including quotes for strings
    pub raw: String,
    /// Character offset of the first character of `raw`
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, raw: impl Into<String>, offset: usize) -> Self {
        Token {
            kind,
            raw: raw.into(),
            offset,
        }
    }

    /// Offset one past the last character of the token.
    pub fn end(&self) -> usize {
        self.offset + self.raw.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Eof => write!(f, "{:>5}  Eof", self.offset),
            kind => write!(f, "{:>5}  {:<12} {}", self.offset, kind_name(kind), self.raw),
        }
    }
}

fn kind_name(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::Number => "Number",
        TokenKind::String { .. } => "String",
        TokenKind::Boolean(_) => "Boolean",
        TokenKind::Null => "Null",
        TokenKind::Identifier(_) => "Identifier",
        TokenKind::Scope(_) => "Scope",
        TokenKind::Dollar => "Dollar",
        TokenKind::Eof => "Eof",
        TokenKind::LBrace
        | TokenKind::RBrace
        | TokenKind::LBracket
        | TokenKind::RBracket
        | TokenKind::LParen
        | TokenKind::RParen
        | TokenKind::Comma
        | TokenKind::Dot
        | TokenKind::Colon => "Punctuation",
        _ => "Operator",
    }
}
