use crate::{
    ast::{BinOp, Document, Expr, JsonNode, JsonProperty, Literal, Quote, Selector, Token, TokenKind, UnaryOp},
    error::ParseError,
    lexer::Lexer,
    options::ParseOptions,
    template,
};
use std::mem;
use tracing::trace;

/// Name of the scope addressed by a bare `$`.
pub const DEFAULT_SCOPE: &str = ".";

/// An expression together with its height in the tree, leaves counting 1.
struct Node {
    expr: Expr,
    height: usize,
}

impl Node {
    fn leaf(expr: Expr) -> Self {
        Node { expr, height: 1 }
    }
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    peeked: Option<Token>,
    options: ParseOptions,
    /// Current recursion depth (expression levels and JSON containers)
    depth: usize,
    /// Depth of the enclosing JSON containers, counted against expression height
    base: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Result<Self, ParseError> {
        Self::with_options(lexer, ParseOptions::default())
    }

    pub fn with_options(lexer: Lexer, options: ParseOptions) -> Result<Self, ParseError> {
        Self::at_depth(lexer, options, 0)
    }

    fn at_depth(mut lexer: Lexer, options: ParseOptions, depth: usize) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            peeked: None,
            options,
            depth,
            base: depth,
        })
    }

    /// Moves to the next token and returns the one just consumed.
    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(mem::replace(&mut self.current_token, next))
    }

    /// Token after the current one, without consuming anything.
    fn peek(&mut self) -> Result<&Token, ParseError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        Ok(self.peeked.as_ref().unwrap_or(&self.current_token))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current_token.kind) == mem::discriminant(kind)
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        if self.check(&expected) {
            self.advance()
        } else {
            Err(self.unexpected(expected.describe()))
        }
    }

    fn expect_eof(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Eof).map(|_| ())
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::syntax(
            expected,
            self.current_token.kind.describe(),
            self.current_token.offset,
        )
    }

    fn too_deep(&self) -> ParseError {
        ParseError::TooDeeplyNested {
            limit: self.options.max_depth,
            offset: self.current_token.offset,
        }
    }

    /// Goes one recursion level deeper, failing once the limit is hit.
    /// A failed parse is abandoned, so callers only step back out on success.
    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.too_deep());
        }
        Ok(())
    }

    /// Builds a node one level above its tallest child.
    ///
    /// Chains such as `a + b + c` or `a.b.c` deepen the tree without
    /// recursing, so the tree height is limited here as well as the
    /// recursion depth in [`Parser::enter`].
    fn build(&self, expr: Expr, child_height: usize) -> Result<Node, ParseError> {
        let height = child_height + 1;
        if self.base + height > self.options.max_depth {
            return Err(self.too_deep());
        }
        Ok(Node { expr, height })
    }

    /// Parse primary expressions: literals, names, scope resolvers, '(' expr ')'
    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = self.advance()?;

        match token.kind {
            // Literals
            TokenKind::Number => Literal::number(token.raw.as_str())
                .map(|literal| Node::leaf(Expr::BasicLit(literal)))
                .ok_or(ParseError::InvalidNumber {
                    raw: token.raw,
                    offset: token.offset,
                }),
            TokenKind::String { value, .. } => {
                Ok(Node::leaf(Expr::BasicLit(Literal::string(value, token.raw))))
            }
            TokenKind::Boolean(b) => Ok(Node::leaf(Expr::BasicLit(Literal::boolean(b, token.raw)))),
            TokenKind::Null => Ok(Node::leaf(Expr::BasicLit(Literal::null(token.raw)))),

            // Names
            TokenKind::Identifier(name) => Ok(Node::leaf(Expr::Identifier { name })),
            TokenKind::Scope(name) => {
                let (sel, height) = self.parse_scope_selector()?;
                self.build(Expr::ScopeResolver { name, sel }, height)
            }
            TokenKind::Dollar => {
                let (sel, height) = self.parse_scope_selector()?;
                self.build(Expr::scope(DEFAULT_SCOPE, sel), height)
            }

            TokenKind::LParen => {
                let inner = self.parse_node()?;
                self.expect(TokenKind::RParen)?;
                self.build(
                    Expr::ParenExpr {
                        x: Box::new(inner.expr),
                    },
                    inner.height,
                )
            }

            kind => Err(ParseError::syntax("expression", kind.describe(), token.offset)),
        }
    }

    /// A scope is always followed by its first selector.
    fn parse_scope_selector(&mut self) -> Result<(Selector, usize), ParseError> {
        if self.check(&TokenKind::Dot) || self.check(&TokenKind::LBracket) {
            self.parse_selector()
        } else {
            Err(self.unexpected("'.' or '[' after scope"))
        }
    }

    /// `.name` or `[key]`, with the height a computed key adds
    fn parse_selector(&mut self) -> Result<(Selector, usize), ParseError> {
        if self.check(&TokenKind::Dot) {
            self.advance()?;
            let token = self.advance()?;
            return match token.kind {
                TokenKind::Identifier(name) => Ok((Selector::Name(name), 0)),
                // Keywords are plain property names after a dot
                TokenKind::Boolean(_) | TokenKind::Null => Ok((Selector::Name(token.raw), 0)),
                kind => Err(ParseError::syntax(
                    "property name after '.'",
                    kind.describe(),
                    token.offset,
                )),
            };
        }

        self.expect(TokenKind::LBracket)?;
        let sel = self.parse_bracket_key()?;
        self.expect(TokenKind::RBracket)?;
        Ok(sel)
    }

    fn parse_bracket_key(&mut self) -> Result<(Selector, usize), ParseError> {
        // Inside brackets, we can have:
        // 1. A lone identifier -> static name (`$env[something]`)
        // 2. Anything else -> computed key (`obj['prop1']`, `array[7]`, `a[b + 1]`)
        if matches!(self.current_token.kind, TokenKind::Identifier(_))
            && self.peek()?.kind == TokenKind::RBracket
        {
            if let TokenKind::Identifier(name) = self.advance()?.kind {
                return Ok((Selector::Name(name), 0));
            }
        }
        let key = self.parse_node()?;
        Ok((Selector::expr(key.expr), key.height))
    }

    /// Arguments up to the closing ')', with the height of the tallest one
    fn parse_arguments(&mut self) -> Result<(Vec<Expr>, usize), ParseError> {
        let mut args = vec![];
        let mut height = 0;

        if self.check(&TokenKind::RParen) {
            self.advance()?;
            return Ok((args, height));
        }

        loop {
            let arg = self.parse_node()?;
            height = height.max(arg.height);
            args.push(arg.expr);

            if self.check(&TokenKind::Comma) {
                self.advance()?;
            } else {
                self.expect(TokenKind::RParen)?;
                return Ok((args, height));
            }
        }
    }

    /// Prefix operators, then a primary with its calls, `.name` and `[key]`
    /// chained left to right. Postfix binds tighter: `-a.b` is `-(a.b)`.
    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        let mut prefixes = vec![];
        loop {
            let operator = match self.current_token.kind {
                TokenKind::Exclamation => UnaryOp::Not,
                TokenKind::Minus => UnaryOp::Negate,
                _ => break,
            };
            self.advance()?;
            prefixes.push(operator);
        }

        let mut node = self.parse_primary()?;
        loop {
            node = match self.current_token.kind {
                TokenKind::LParen => {
                    self.advance()?; // consume '('
                    let (args, height) = self.parse_arguments()?;
                    let call = Expr::CallExpr {
                        fun: Box::new(node.expr),
                        args,
                    };
                    self.build(call, node.height.max(height))?
                }
                TokenKind::Dot | TokenKind::LBracket => {
                    let (sel, height) = self.parse_selector()?;
                    self.build(Expr::select(node.expr, sel), node.height.max(height))?
                }
                _ => break,
            };
        }

        while let Some(operator) = prefixes.pop() {
            let unary = Expr::UnaryExpr {
                operator,
                x: Box::new(node.expr),
            };
            node = self.build(unary, node.height)?;
        }
        Ok(node)
    }

    fn binary_operator(kind: &TokenKind) -> Option<BinOp> {
        match kind {
            TokenKind::OrOr => Some(BinOp::Or),
            TokenKind::AndAnd => Some(BinOp::And),
            TokenKind::EqEq => Some(BinOp::Equal),
            TokenKind::NotEq => Some(BinOp::NotEqual),
            TokenKind::Lt => Some(BinOp::LessThan),
            TokenKind::LtEq => Some(BinOp::LessEqual),
            TokenKind::Gt => Some(BinOp::GreaterThan),
            TokenKind::GtEq => Some(BinOp::GreaterEqual),
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Subtract),
            TokenKind::Star => Some(BinOp::Multiply),
            TokenKind::Slash => Some(BinOp::Divide),
            TokenKind::Percent => Some(BinOp::Modulo),
            _ => None,
        }
    }

    fn combine(&self, operator: BinOp, left: Node, right: Node) -> Result<Node, ParseError> {
        let height = left.height.max(right.height);
        self.build(Expr::binary(operator, left.expr, right.expr), height)
    }

    /// All binary levels in one loop. Pending left operands wait on a stack
    /// while tighter operators follow, so mixing levels does not recurse.
    fn parse_binary(&mut self) -> Result<Node, ParseError> {
        let mut pending: Vec<(Node, BinOp)> = vec![];
        let mut right = self.parse_unary()?;

        while let Some(operator) = Self::binary_operator(&self.current_token.kind) {
            let precedence = operator.precedence();
            while let Some((left, op)) = pending.pop_if(|(_, op)| op.precedence() >= precedence) {
                right = self.combine(op, left, right)?;
            }
            self.advance()?;
            pending.push((right, operator));
            right = self.parse_unary()?;
        }

        while let Some((left, op)) = pending.pop() {
            right = self.combine(op, left, right)?;
        }
        Ok(right)
    }

    /// One expression level: `condition ? consequent : alternate`, right-associative
    fn parse_node(&mut self) -> Result<Node, ParseError> {
        self.enter()?;
        let condition = self.parse_binary()?;

        let node = if self.check(&TokenKind::Question) {
            self.advance()?;
            let consequent = self.parse_node()?;
            self.expect(TokenKind::Colon)?;
            let alternate = self.parse_node()?;

            let height = condition.height.max(consequent.height).max(alternate.height);
            let ternary = Expr::TernaryExpr {
                condition: Box::new(condition.expr),
                consequent: Box::new(consequent.expr),
                alternate: Box::new(alternate.expr),
            };
            self.build(ternary, height)?
        } else {
            condition
        };

        self.depth -= 1;
        Ok(node)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_node().map(|node| node.expr)
    }

    /// Parse a complete expression, requiring the input to end after it.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect_eof()?;
        Ok(expr)
    }

    /// Runs a JSON container parse one nesting level deeper.
    fn nested(
        &mut self,
        f: fn(&mut Self) -> Result<JsonNode, ParseError>,
    ) -> Result<JsonNode, ParseError> {
        self.enter()?;
        let node = f(self)?;
        self.depth -= 1;
        Ok(node)
    }
}

impl Parser {
    /// Parse any input: a JSON document when it opens with `{` or `[`,
    /// otherwise a single expression.
    pub fn parse_document(&mut self) -> Result<Document, ParseError> {
        match self.current_token.kind {
            TokenKind::LBrace | TokenKind::LBracket => Ok(Document::Json {
                value: self.parse_json()?,
            }),
            _ => Ok(Document::ExprStmt { x: self.parse()? }),
        }
    }

    /// Parse a complete JSON value, requiring the input to end after it.
    pub fn parse_json(&mut self) -> Result<JsonNode, ParseError> {
        let value = self.parse_json_value()?;
        self.expect_eof()?;
        Ok(value)
    }

    fn parse_json_value(&mut self) -> Result<JsonNode, ParseError> {
        match &self.current_token.kind {
            TokenKind::LBrace => self.nested(Self::parse_json_object),
            TokenKind::LBracket => self.nested(Self::parse_json_array),
            TokenKind::String { .. } => {
                let (value, token) = self.json_string()?;
                self.string_value(value, token)
            }
            TokenKind::Number => {
                let token = self.advance()?;
                Self::json_number(token.raw, token.offset).map(JsonNode::Literal)
            }
            TokenKind::Minus => {
                let minus = self.advance()?;
                if !self.check(&TokenKind::Number) || self.current_token.offset != minus.end() {
                    return Err(self.unexpected("digits after '-'"));
                }
                let digits = self.advance()?;
                Self::json_number(format!("-{}", digits.raw), minus.offset).map(JsonNode::Literal)
            }
            TokenKind::Boolean(b) => {
                let b = *b;
                let token = self.advance()?;
                Ok(JsonNode::Literal(Literal::boolean(b, token.raw)))
            }
            TokenKind::Null if self.current_token.raw == "null" => {
                let token = self.advance()?;
                Ok(JsonNode::Literal(Literal::null(token.raw)))
            }
            _ => Err(self.unexpected("JSON value")),
        }
    }

    fn parse_json_object(&mut self) -> Result<JsonNode, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut children = vec![];

        if !self.check(&TokenKind::RBrace) {
            loop {
                let (key, _) = self.json_string()?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_json_value()?;
                children.push(JsonProperty { key, value });

                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance()?;
            }
        }

        self.expect(TokenKind::RBrace)?;
        Ok(JsonNode::Object { children })
    }

    fn parse_json_array(&mut self) -> Result<JsonNode, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let mut children = vec![];

        if !self.check(&TokenKind::RBracket) {
            loop {
                children.push(self.parse_json_value()?);

                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance()?;
            }
        }

        self.expect(TokenKind::RBracket)?;
        Ok(JsonNode::Array { children })
    }

    /// Consumes a double-quoted string, returning its decoded value and the
    /// token itself. Other quote styles are not JSON.
    fn json_string(&mut self) -> Result<(String, Token), ParseError> {
        match &self.current_token.kind {
            TokenKind::String {
                quote: Quote::Double,
                ..
            } => {
                let mut token = self.advance()?;
                match mem::replace(&mut token.kind, TokenKind::Eof) {
                    TokenKind::String { value, .. } => Ok((value, token)),
                    kind => Err(ParseError::syntax("double-quoted string", kind.describe(), token.offset)),
                }
            }
            TokenKind::String { quote, .. } => Err(ParseError::syntax(
                "double-quoted string",
                format!("string quoted with {}", quote.as_char()),
                self.current_token.offset,
            )),
            _ => Err(self.unexpected("double-quoted string")),
        }
    }

    /// JSON numbers: no leading zeros, sign already folded into `raw`.
    fn json_number(raw: String, offset: usize) -> Result<Literal, ParseError> {
        let digits = raw.strip_prefix('-').unwrap_or(&raw);
        let integer_part = digits
            .split(|c: char| c == '.' || c == 'e' || c == 'E')
            .next()
            .unwrap_or_default();
        if integer_part.len() > 1 && integer_part.starts_with('0') {
            return Err(ParseError::InvalidNumber { raw, offset });
        }
        match Literal::number(raw.as_str()) {
            Some(literal) => Ok(literal),
            None => Err(ParseError::InvalidNumber { raw, offset }),
        }
    }

    /// Turns a string token into a literal, or into a template when its
    /// content holds an expression.
    fn string_value(&mut self, value: String, token: Token) -> Result<JsonNode, ParseError> {
        let Some(embedded) = template::detect(&value) else {
            return Ok(JsonNode::Literal(Literal::string(value, token.raw)));
        };

        trace!(
            form = ?embedded.form,
            offset = token.offset,
            "parsing embedded expression"
        );

        let raw = token.raw.as_str();
        let relocate = |inner: usize| token.offset + template::raw_offset(raw, embedded.start + inner);

        let expression = Parser::at_depth(Lexer::new(embedded.source), self.options, self.depth)
            .and_then(|mut parser| parser.parse())
            .map_err(|e| e.relocate(relocate))?;

        Ok(JsonNode::StringTemplate { expression })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr(input: &str) -> Expr {
        Parser::new(Lexer::new(input)).unwrap().parse().unwrap()
    }

    #[test]
    fn test_bare_dollar_is_default_scope() {
        assert_eq!(
            parse_expr("$.flow"),
            Expr::scope(DEFAULT_SCOPE, Selector::name("flow"))
        );
    }

    #[test]
    fn test_bracket_identifier_is_static_name() {
        assert_eq!(
            parse_expr("$env[something]"),
            Expr::scope("env", Selector::name("something"))
        );
    }

    #[test]
    fn test_keyword_after_dot_is_a_name() {
        assert_eq!(
            parse_expr("a.null"),
            Expr::select(Expr::identifier("a"), Selector::name("null"))
        );
    }
}
