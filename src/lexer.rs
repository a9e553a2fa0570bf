use crate::ast::{Quote, Token, TokenKind};
use crate::error::ParseError;

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Reads the whole input, ending with a single `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = vec![];
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn slice(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    /// JSON whitespace only; other Unicode spaces are unexpected characters.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if matches!(ch, ' ' | '\t' | '\n' | '\r') {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_identifier_start(ch: char) -> bool {
        ch.is_alphabetic() || ch == '_'
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: Quote) -> Result<String, ParseError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote.as_char() => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_at = self.position;
                    self.advance(); // Consume backslash
                    let escaped = match self.current_char() {
                        Some(c) if c == quote.as_char() => c,
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => {
                            self.advance();
                            result.push(self.read_unicode_escape(escape_at)?);
                            continue;
                        }
                        Some(other) => {
                            return Err(ParseError::InvalidEscape {
                                sequence: other.to_string(),
                                offset: escape_at,
                            });
                        }
                        None => return Err(ParseError::UnterminatedString { offset: start }),
                    };
                    result.push(escaped);
                    self.advance();
                }
                c if quote == Quote::Double && c < '\u{20}' => {
                    return Err(ParseError::UnexpectedCharacter {
                        ch: c,
                        offset: self.position,
                    });
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(ParseError::UnterminatedString { offset: start })
    }

    /// Reads the four hex digits after `\u`, pairing UTF-16 surrogates.
    fn read_unicode_escape(&mut self, escape_at: usize) -> Result<char, ParseError> {
        let high = self.read_hex4(escape_at)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or_else(|| self.invalid_escape(escape_at));
        }

        if self.current_char() != Some('\\') || self.peek_char(1) != Some('u') {
            return Err(self.invalid_escape(escape_at));
        }
        self.advance();
        self.advance();
        let low = self.read_hex4(escape_at)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(self.invalid_escape(escape_at));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code).ok_or_else(|| self.invalid_escape(escape_at))
    }

    fn read_hex4(&mut self, escape_at: usize) -> Result<u32, ParseError> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = self
                .current_char()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.invalid_escape(escape_at))?;
            code = code * 16 + digit;
            self.advance();
        }
        Ok(code)
    }

    fn invalid_escape(&self, escape_at: usize) -> ParseError {
        let end = self.position.min(self.input.len());
        ParseError::InvalidEscape {
            sequence: self.input[escape_at + 1..end.max(escape_at + 1)]
                .iter()
                .collect(),
            offset: escape_at,
        }
    }

    fn read_digits(&mut self) {
        while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Integer part, optional fraction and optional exponent. The token
    /// keeps the text verbatim.
    fn read_number(&mut self) -> Token {
        let start = self.position;
        self.read_digits();

        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            self.read_digits();
        }

        if matches!(self.current_char(), Some('e' | 'E')) {
            let exponent_digits_at = match self.peek_char(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self
                .peek_char(exponent_digits_at)
                .is_some_and(|c| c.is_ascii_digit())
            {
                for _ in 0..exponent_digits_at {
                    self.advance();
                }
                self.read_digits();
            }
        }

        Token::new(TokenKind::Number, self.slice(start), start)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.position;
        self.advance();
        Token::new(kind, self.slice(start), start)
    }

    /// Emits `double` when the next character is `second`, else `single`.
    fn one_or_two(&mut self, second: char, double: TokenKind, single: TokenKind) -> Token {
        if self.peek_char(1) == Some(second) {
            let start = self.position;
            self.advance();
            self.advance();
            Token::new(double, self.slice(start), start)
        } else {
            self.single(single)
        }
    }

    fn string_token(&mut self, quote: Quote) -> Result<Token, ParseError> {
        let start = self.position;
        let value = self.read_string(quote)?;
        Ok(Token::new(TokenKind::String { value, quote }, self.slice(start), start))
    }

    /// Two-character operator that has no single-character form.
    fn pair(&mut self, first: char, second: char, kind: TokenKind) -> Result<Token, ParseError> {
        if self.peek_char(1) == Some(second) {
            let start = self.position;
            self.advance();
            self.advance();
            Ok(Token::new(kind, self.slice(start), start))
        } else {
            Err(ParseError::UnexpectedCharacter {
                ch: first,
                offset: self.position,
            })
        }
    }

    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();
        let start = self.position;

        let token = match self.current_char() {
            None => Token::new(TokenKind::Eof, "", start),
            Some('$') => {
                if self.peek_char(1).is_some_and(Self::is_identifier_start) {
                    self.advance();
                    let name = self.read_identifier();
                    Token::new(TokenKind::Scope(name), self.slice(start), start)
                } else {
                    self.single(TokenKind::Dollar)
                }
            }
            Some('+') => self.single(TokenKind::Plus),
            Some('-') => self.single(TokenKind::Minus),
            Some('*') => self.single(TokenKind::Star),
            Some('/') => self.single(TokenKind::Slash),
            Some('%') => self.single(TokenKind::Percent),
            Some('?') => self.single(TokenKind::Question),
            Some(':') => self.single(TokenKind::Colon),
            Some(',') => self.single(TokenKind::Comma),
            Some('.') => self.single(TokenKind::Dot),
            Some('{') => self.single(TokenKind::LBrace),
            Some('}') => self.single(TokenKind::RBrace),
            Some('[') => self.single(TokenKind::LBracket),
            Some(']') => self.single(TokenKind::RBracket),
            Some('(') => self.single(TokenKind::LParen),
            Some(')') => self.single(TokenKind::RParen),
            Some('<') => self.one_or_two('=', TokenKind::LtEq, TokenKind::Lt),
            Some('>') => self.one_or_two('=', TokenKind::GtEq, TokenKind::Gt),
            Some('!') => self.one_or_two('=', TokenKind::NotEq, TokenKind::Exclamation),
            Some('=') => self.pair('=', '=', TokenKind::EqEq)?,
            Some('&') => self.pair('&', '&', TokenKind::AndAnd)?,
            Some('|') => self.pair('|', '|', TokenKind::OrOr)?,
            Some('"') => self.string_token(Quote::Double)?,
            Some('\'') => self.string_token(Quote::Single)?,
            Some('`') => self.string_token(Quote::Back)?,
            Some(ch) if Self::is_identifier_start(ch) => {
                let ident = self.read_identifier();
                let kind = match ident.as_str() {
                    "true" => TokenKind::Boolean(true),
                    "false" => TokenKind::Boolean(false),
                    "null" | "nil" => TokenKind::Null,
                    _ => TokenKind::Identifier(ident),
                };
                Token::new(kind, self.slice(start), start)
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) => {
                return Err(ParseError::UnexpectedCharacter {
                    ch,
                    offset: self.position,
                });
            }
        };

        Ok(token)
    }
}

/// Convenience wrapper over [`Lexer::tokenize`].
pub fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(text).tokenize()
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("true false null nil other");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Boolean(true));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Boolean(false));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Null);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Null);
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::Identifier("other".to_string())
    );
}

#[test]
fn test_scope_resolver_tokens() {
    let kinds: Vec<TokenKind> = tokenize("$activity[x].y")
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Scope("activity".to_string()),
            TokenKind::LBracket,
            TokenKind::Identifier("x".to_string()),
            TokenKind::RBracket,
            TokenKind::Dot,
            TokenKind::Identifier("y".to_string()),
            TokenKind::Eof,
        ]
    );
}
