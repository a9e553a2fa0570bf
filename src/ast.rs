//! # Mapping Expressions - Abstract Syntax Tree
//!
//! This module defines the tree produced when parsing flow mapping
//! descriptors: JSON documents whose string values may hold expressions,
//! and the expressions themselves.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Binary and prefix operators
//! - **[expressions]** - Expression nodes (literals, names, scope access, calls, operations)
//! - **[json]** - JSON nodes, including string templates
//! - **[document]** - The root returned by [`crate::parse`]
//!
//! ## Embedding Forms
//!
//! A JSON string value becomes a `stringTemplate` in two cases:
//!
//! ```text
//! "{{ $activity[x].y }}"      // block template, the whole string is one {{ }} span
//! "=$activity[x].y"           // inline expression, the string starts with '='
//! ```
//!
//! Anything else, including `"prefix {{x}} suffix"`, stays a plain literal.
//!
//! ## Scope Resolvers
//!
//! ```text
//! $env[something]        // ScopeResolver { name: "env", sel: "something" }
//! $activity[x].y         // SelectorExpr { x: ScopeResolver { .. }, sel: "y" }
//! $.flow["prop1"]        // default scope "."; the bracket key is a computed selector
//! ```
//!
//! ## Operator Precedence
//!
//! Lowest to highest: `?:`, `||`, `&&`, `== !=`, `< <= > >=`, `+ -`,
//! `* / %`, prefix `! -`, then postfix call / `.name` / `[key]`.
pub mod document;
pub mod expressions;
pub mod json;
pub mod operators;
pub mod tokens;

pub use document::Document;
pub use expressions::{Expr, LitKind, Literal, Selector};
pub use json::{JsonNode, JsonProperty};
pub use operators::{BinOp, UnaryOp};
pub use tokens::{Quote, Token, TokenKind};
