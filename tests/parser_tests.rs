// tests/parser_tests.rs

use mapping_expr::ast::{BinOp, Expr, LitKind, Literal, Selector, UnaryOp};
use mapping_expr::error::ParseError;
use mapping_expr::lexer::Lexer;
use mapping_expr::options::{DEFAULT_MAX_DEPTH, ParseOptions};
use mapping_expr::parser::Parser;

fn parse(input: &str) -> Expr {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer).unwrap();
    parser.parse().unwrap()
}

fn parse_err(input: &str) -> ParseError {
    Parser::new(Lexer::new(input))
        .and_then(|mut p| p.parse())
        .unwrap_err()
}

fn parse_try(input: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(input)).and_then(|mut p| p.parse())
}

fn ident(name: &str) -> Expr {
    Expr::identifier(name)
}

fn number(raw: &str) -> Expr {
    Expr::BasicLit(Literal::number(raw).unwrap())
}

// ============================================================================
// Simple tests
// ============================================================================

#[test]
fn test_comparison() {
    let expr = parse("$activity[x].price > 100");

    assert!(matches!(
        expr,
        Expr::BinaryExpr {
            operator: BinOp::GreaterThan,
            ..
        }
    ));
}

#[test]
fn test_parentheses() {
    let expr = parse("(a + 2) * 55");

    // Should be: Multiply(Paren(Add(a, 2)), 55)
    match expr {
        Expr::BinaryExpr {
            operator: BinOp::Multiply,
            x,
            y,
        } => {
            match *x {
                Expr::ParenExpr { x: inner } => {
                    assert_eq!(*inner, Expr::binary(BinOp::Add, ident("a"), number("2")));
                }
                other => panic!("Expected parenthesis in left, got {:?}", other),
            }
            assert_eq!(*y, number("55"));
        }
        other => panic!("Expected multiplication, got {:?}", other),
    }
}

#[test]
fn test_arithmetic_precedence() {
    // Should be: Add(1, Multiply(2, 3))
    assert_eq!(
        parse("1 + 2 * 3"),
        Expr::binary(
            BinOp::Add,
            number("1"),
            Expr::binary(BinOp::Multiply, number("2"), number("3"))
        )
    );
}

#[test]
fn test_left_associativity() {
    // Should be: Subtract(Subtract(a, b), c)
    assert_eq!(
        parse("a - b - c"),
        Expr::binary(
            BinOp::Subtract,
            Expr::binary(BinOp::Subtract, ident("a"), ident("b")),
            ident("c")
        )
    );
}

#[test]
fn test_full_precedence_ladder() {
    // || < && < == < relational < additive < multiplicative
    let expr = parse("a || b && c == d < e + f * g");
    let expected = Expr::binary(
        BinOp::Or,
        ident("a"),
        Expr::binary(
            BinOp::And,
            ident("b"),
            Expr::binary(
                BinOp::Equal,
                ident("c"),
                Expr::binary(
                    BinOp::LessThan,
                    ident("d"),
                    Expr::binary(
                        BinOp::Add,
                        ident("e"),
                        Expr::binary(BinOp::Multiply, ident("f"), ident("g")),
                    ),
                ),
            ),
        ),
    );
    assert_eq!(expr, expected);
}

#[test]
fn test_all_binary_operators() {
    let test_cases = vec![
        ("a || b", BinOp::Or),
        ("a && b", BinOp::And),
        ("a == b", BinOp::Equal),
        ("a != b", BinOp::NotEqual),
        ("a < b", BinOp::LessThan),
        ("a <= b", BinOp::LessEqual),
        ("a > b", BinOp::GreaterThan),
        ("a >= b", BinOp::GreaterEqual),
        ("a + b", BinOp::Add),
        ("a - b", BinOp::Subtract),
        ("a * b", BinOp::Multiply),
        ("a / b", BinOp::Divide),
        ("a % b", BinOp::Modulo),
    ];

    for (input, op) in test_cases {
        assert_eq!(
            parse(input),
            Expr::binary(op, ident("a"), ident("b")),
            "Failed for input: {}",
            input
        );
    }
}

// ============================================================================
// Unary and ternary
// ============================================================================

#[test]
fn test_unary_operators() {
    assert_eq!(
        parse("!done"),
        Expr::UnaryExpr {
            operator: UnaryOp::Not,
            x: Box::new(ident("done")),
        }
    );
    assert_eq!(
        parse("-x * 2"),
        Expr::binary(
            BinOp::Multiply,
            Expr::UnaryExpr {
                operator: UnaryOp::Negate,
                x: Box::new(ident("x")),
            },
            number("2")
        )
    );
    assert!(matches!(
        parse("!!a"),
        Expr::UnaryExpr { operator: UnaryOp::Not, x } if matches!(*x, Expr::UnaryExpr { .. })
    ));
}

#[test]
fn test_ternary() {
    let expr = parse("a > b ? true : false");
    match expr {
        Expr::TernaryExpr {
            condition,
            consequent,
            alternate,
        } => {
            assert_eq!(
                *condition,
                Expr::binary(BinOp::GreaterThan, ident("a"), ident("b"))
            );
            assert_eq!(*consequent, Expr::BasicLit(Literal::boolean(true, "true")));
            assert_eq!(*alternate, Expr::BasicLit(Literal::boolean(false, "false")));
        }
        other => panic!("Expected ternary, got {:?}", other),
    }
}

#[test]
fn test_ternary_is_right_associative() {
    // a ? b : (c ? d : e)
    match parse("a ? b : c ? d : e") {
        Expr::TernaryExpr {
            condition,
            alternate,
            ..
        } => {
            assert_eq!(*condition, ident("a"));
            assert!(matches!(*alternate, Expr::TernaryExpr { .. }));
        }
        other => panic!("Expected ternary, got {:?}", other),
    }
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_literals_keep_raw() {
    let test_cases = vec![
        ("3", LitKind::Number, "3"),
        ("78.910", LitKind::Number, "78.910"),
        ("'b'", LitKind::String, "'b'"),
        ("`a`", LitKind::String, "`a`"),
        ("\"c\"", LitKind::String, "\"c\""),
        ("true", LitKind::Boolean, "true"),
        ("nil", LitKind::Null, "nil"),
    ];

    for (input, kind, raw) in test_cases {
        match parse(input) {
            Expr::BasicLit(literal) => {
                assert_eq!(literal.kind, kind, "input: {}", input);
                assert_eq!(literal.raw, raw, "input: {}", input);
            }
            other => panic!("Expected literal for {}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_integer_and_float_values() {
    let Expr::BasicLit(int) = parse("3") else {
        panic!("Expected literal")
    };
    assert_eq!(int.value, serde_json::json!(3));

    let Expr::BasicLit(float) = parse("2.5") else {
        panic!("Expected literal")
    };
    assert_eq!(float.value, serde_json::json!(2.5));
}

// ============================================================================
// Scope resolvers and selectors
// ============================================================================

#[test]
fn test_simple_resolver() {
    assert_eq!(
        parse("$env[something]"),
        Expr::scope("env", Selector::name("something"))
    );
    assert_eq!(
        parse("$env.something"),
        Expr::scope("env", Selector::name("something"))
    );
}

#[test]
fn test_first_selector_belongs_to_the_resolver() {
    assert_eq!(
        parse("$activity[x].y"),
        Expr::select(
            Expr::scope("activity", Selector::name("x")),
            Selector::name("y")
        )
    );
}

#[test]
fn test_default_scope_with_bracket_strings() {
    for input in [r#"$.flow["prop1"]"#, "$.flow['prop1']", "$.flow[`prop1`]"] {
        match parse(input) {
            Expr::SelectorExpr { x, sel } => {
                assert_eq!(*x, Expr::scope(".", Selector::name("flow")));
                match sel {
                    Selector::Expr(key) => match *key {
                        Expr::BasicLit(literal) => {
                            assert_eq!(literal.as_str(), Some("prop1"), "input: {}", input)
                        }
                        other => panic!("Expected literal key, got {:?}", other),
                    },
                    other => panic!("Expected computed key, got {:?}", other),
                }
            }
            other => panic!("Expected selector, got {:?}", other),
        }
    }
}

#[test]
fn test_dynamic_bracket_keys() {
    assert_eq!(
        parse("array[7]"),
        Expr::select(ident("array"), Selector::expr(number("7")))
    );
    assert_eq!(
        parse("a[i + 1]"),
        Expr::select(
            ident("a"),
            Selector::expr(Expr::binary(BinOp::Add, ident("i"), number("1")))
        )
    );
    assert_eq!(
        parse("$loop[i]['-marketArea']"),
        Expr::select(
            Expr::scope("loop", Selector::name("i")),
            Selector::expr(Expr::BasicLit(Literal::string("-marketArea", "'-marketArea'")))
        )
    );
}

#[test]
fn test_nested_resolver_as_key() {
    assert_eq!(
        parse("$flow[$env[key]]"),
        Expr::scope(
            "flow",
            Selector::expr(Expr::scope("env", Selector::name("key")))
        )
    );
}

#[test]
fn test_scope_requires_selector() {
    assert!(matches!(
        parse_err("$env"),
        ParseError::SyntaxError { offset: 4, .. }
    ));
    assert!(matches!(
        parse_err("$ + 1"),
        ParseError::SyntaxError { offset: 2, .. }
    ));
}

// ============================================================================
// Calls
// ============================================================================

#[test]
fn test_calls() {
    assert_eq!(
        parse("somefunc()"),
        Expr::CallExpr {
            fun: Box::new(ident("somefunc")),
            args: vec![],
        }
    );
    assert_eq!(
        parse("somefunc(3)"),
        Expr::CallExpr {
            fun: Box::new(ident("somefunc")),
            args: vec![number("3")],
        }
    );
}

#[test]
fn test_method_style_call_with_three_quote_styles() {
    match parse("string.concat(`a`, 'b', \"c\")") {
        Expr::CallExpr { fun, args } => {
            assert_eq!(
                *fun,
                Expr::select(ident("string"), Selector::name("concat"))
            );
            let values: Vec<Option<&str>> = args
                .iter()
                .map(|a| match a {
                    Expr::BasicLit(l) => l.as_str(),
                    _ => None,
                })
                .collect();
            assert_eq!(values, vec![Some("a"), Some("b"), Some("c")]);
        }
        other => panic!("Expected call, got {:?}", other),
    }
}

#[test]
fn test_chained_calls_and_selectors() {
    // f(1)(2).x[0]
    let expr = parse("f(1)(2).x[0]");
    let expected = Expr::select(
        Expr::select(
            Expr::CallExpr {
                fun: Box::new(Expr::CallExpr {
                    fun: Box::new(ident("f")),
                    args: vec![number("1")],
                }),
                args: vec![number("2")],
            },
            Selector::name("x"),
        ),
        Selector::expr(number("0")),
    );
    assert_eq!(expr, expected);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_operand() {
    assert_eq!(
        parse_err("a +"),
        ParseError::syntax("expression", "end of input", 3)
    );
}

#[test]
fn test_unclosed_bracket_and_paren() {
    assert_eq!(
        parse_err("a[1"),
        ParseError::syntax("']'", "end of input", 3)
    );
    assert_eq!(
        parse_err("(a"),
        ParseError::syntax("')'", "end of input", 2)
    );
    assert_eq!(
        parse_err("f(a,"),
        ParseError::syntax("expression", "end of input", 4)
    );
}

#[test]
fn test_trailing_tokens() {
    assert_eq!(
        parse_err("a b"),
        ParseError::syntax("end of input", "identifier 'b'", 2)
    );
}

#[test]
fn test_ternary_missing_colon() {
    assert_eq!(
        parse_err("a ? b"),
        ParseError::syntax("':'", "end of input", 5)
    );
}

#[test]
fn test_empty_input() {
    assert_eq!(
        parse_err(""),
        ParseError::syntax("expression", "end of input", 0)
    );
}

// ============================================================================
// Nesting limit
// ============================================================================

#[test]
fn test_deep_parentheses_fail_cleanly() {
    let input = format!("{}a{}", "(".repeat(10_000), ")".repeat(10_000));
    assert!(matches!(
        parse_err(&input),
        ParseError::TooDeeplyNested {
            limit: DEFAULT_MAX_DEPTH,
            ..
        }
    ));
}

#[test]
fn test_long_chains_fail_cleanly() {
    let input = format!("a{}", ".b".repeat(10_000));
    assert!(matches!(
        parse_err(&input),
        ParseError::TooDeeplyNested { .. }
    ));

    let input = format!("a{}", " + a".repeat(10_000));
    assert!(matches!(
        parse_err(&input),
        ParseError::TooDeeplyNested { .. }
    ));

    let input = format!("{}a", "!".repeat(10_000));
    assert!(matches!(
        parse_err(&input),
        ParseError::TooDeeplyNested { .. }
    ));
}

#[test]
fn test_custom_depth_limit() {
    let options = ParseOptions::new().with_max_depth(3);
    let parse_with = |input: &str| {
        Parser::with_options(Lexer::new(input), options).and_then(|mut p| p.parse())
    };

    assert!(parse_with("((a))").is_ok());
    assert_eq!(
        parse_with("(((a)))"),
        Err(ParseError::TooDeeplyNested { limit: 3, offset: 3 })
    );
}

fn height(expr: &Expr) -> usize {
    let selector = |sel: &Selector| match sel {
        Selector::Name(_) => 0,
        Selector::Expr(key) => height(key),
    };
    1 + match expr {
        Expr::BasicLit(_) | Expr::Identifier { .. } => 0,
        Expr::ScopeResolver { sel, .. } => selector(sel),
        Expr::SelectorExpr { x, sel } => height(x).max(selector(sel)),
        Expr::CallExpr { fun, args } => args.iter().map(height).fold(height(fun), usize::max),
        Expr::UnaryExpr { x, .. } | Expr::ParenExpr { x } => height(x),
        Expr::BinaryExpr { x, y, .. } => height(x).max(height(y)),
        Expr::TernaryExpr {
            condition,
            consequent,
            alternate,
        } => height(condition).max(height(consequent)).max(height(alternate)),
    }
}

#[test]
fn test_chain_length_counts_toward_limit() {
    // `a` plus n links is n + 1 levels tall
    let links = DEFAULT_MAX_DEPTH - 1;
    assert!(parse_try(&format!("a{}", ".b".repeat(links))).is_ok());
    assert!(parse_try(&format!("a{}", " + a".repeat(links))).is_ok());
    assert!(matches!(
        parse_try(&format!("a{}", ".b".repeat(links + 1))),
        Err(ParseError::TooDeeplyNested { .. })
    ));
    assert!(matches!(
        parse_try(&format!("a{}", " * a".repeat(links + 1))),
        Err(ParseError::TooDeeplyNested { .. })
    ));
}

#[test]
fn test_chains_inside_parentheses_stay_within_limit() {
    // Every level mixes a selector chain with all binary levels
    for depth in [1, 4, 10, 30, 60] {
        for chain in [1, 3, 8, 20, 63] {
            let mut input = "1".to_string();
            for _ in 0..depth {
                input = format!(
                    "({}{} * 1 + 1 < 1 == 1 && 1 || 1)",
                    input,
                    ".a".repeat(chain)
                );
            }

            match parse_try(&input) {
                Ok(expr) => assert!(
                    height(&expr) <= DEFAULT_MAX_DEPTH,
                    "depth {} chain {} built a tree {} levels tall",
                    depth,
                    chain,
                    height(&expr)
                ),
                Err(e) => assert!(
                    matches!(e, ParseError::TooDeeplyNested { .. }),
                    "depth {} chain {}: {:?}",
                    depth,
                    chain,
                    e
                ),
            }
        }
    }
}

#[test]
fn test_deepest_accepted_input_on_small_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| {
            let parens = DEFAULT_MAX_DEPTH - 1;
            let input = format!("{}1{}", "(".repeat(parens), ")".repeat(parens));
            let expr = parse_try(&input).unwrap();
            assert_eq!(height(&expr), DEFAULT_MAX_DEPTH);

            // One more level is refused rather than overflowing
            let input = format!("{}1{}", "(".repeat(parens + 1), ")".repeat(parens + 1));
            assert!(matches!(
                parse_try(&input),
                Err(ParseError::TooDeeplyNested { .. })
            ));

            // Every operator level at every nesting level
            let mut input = "x".to_string();
            for _ in 0..DEFAULT_MAX_DEPTH {
                input = format!("a || b && c == d < e + f * -!({}).g[h](i)", input);
            }
            assert!(matches!(
                parse_try(&input),
                Err(ParseError::TooDeeplyNested { .. })
            ));
        })
        .unwrap();
    handle.join().unwrap();
}
