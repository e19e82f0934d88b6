//! An operator precedence parser for structured math input
//!
//! This crate turns a list of classified tokens into an expression tree that can be evaluated or
//! rendered. Tokens are either plain [`Lexeme`]s (numbers, identifiers, operators, parentheses)
//! or composite tokens that already carry their structure, the way fractions, superscripts,
//! radicals and function applications arrive from math markup. Composite tokens are parsed
//! recursively and act as single operands in the surrounding expression. Flat runs of lexemes go
//! through a shunting-yard engine that honors precedence, associativity, unary signs and
//! function calls.
//!
//! ## Usage
//!
//! ```sh
//! cargo add omath-expr
//! ```
//!
//! then
//!
//! ```
//! use omath_expr::{parse_str, ParseProperties};
//!
//! let node = parse_str("2 + 3 * 4", ParseProperties::standard()).unwrap();
//! assert_eq!(node.evaluate(), Ok(14.0));
//! assert_eq!(node.to_postfix(), "2 3 4 * +");
//! ```
//!
//! ## Tokens
//!
//! Token lists are usually produced by a markup reader, but they're easy to build by hand. All
//! composite constructors take anything convertible into a [`TokenList`].
//!
//! ```
//! use omath_expr::token::{Fraction, Radical};
//! use omath_expr::{parse, Lexeme, ParseProperties, TokenList};
//!
//! // 1 / (sqrt 16)
//! let frac = Fraction::new([Lexeme::number("1")], [Radical::square([Lexeme::number("16")])]);
//! let tokens: TokenList = [frac].into();
//! let node = parse(&tokens, ParseProperties::standard()).unwrap();
//! assert!((node.evaluate().unwrap() - 0.25).abs() < 1e-12);
//! ```
//!
//! Plain text can be turned into lexemes with a [`Tokenizer`], which uses a
//! [`SymbolMap`][symbols::SymbolMap] to find operators and the parse [`Properties`] to tell
//! function names and constants from variables.
//!
//! ## Grammar
//!
//! The engine reads flat token runs with these binding strengths, loosest first:
//!
//! ```txt
//! =          left associative, builds an equation
//! + -        left associative
//! * /        left associative
//! + -        prefix signs, after nothing, an operator, `(`, `=` or `,`
//! ^          right associative
//! ```
//!
//! A function name must be followed by either a `(`-`)` group token or a left parenthesis lexeme.
//! In the latter case the call is deferred until its closing parenthesis and its arguments are
//! counted at each separator.
//!
//! Delimiter group tokens outside of a call group their single element when delimited by `(` `)`
//! or `[` `]`, and take its absolute value when delimited by `|` `|`. Operands and binary
//! operators have to alternate, so postfix input like `1 2 +` is an error. A [`Parser`] also bounds
//! how deeply input nests and how tall the resulting tree grows.
//!
//! ## Environment
//!
//! Identifiers are resolved through a [`Properties`] implementation. Constants are looked up once
//! at parse time, and function bodies are attached to the call nodes, so a parsed tree only
//! needs [`Bindings`] for its free variables.
//!
//! ```
//! use omath_expr::{parse_str, ParseProperties};
//! use std::collections::HashMap;
//!
//! let props = ParseProperties::new()
//!     .with_constant("g", 9.81)
//!     .with_function("half", 1, |args| args[0] / 2.0);
//! let node = parse_str("half(g * t^2)", &props).unwrap();
//! let bindings = HashMap::from([("t", 2.0)]);
//! assert!((node.evaluate_with(&bindings).unwrap() - 19.62).abs() < 1e-9);
//! ```
//!
//! ## Features
//!
//! - `qp-trie` (default) - Use a [trie][symbols::TrieSymbolMap] for the default symbols
//! - `fnv` - Hash names and symbols with `fnv`
#![warn(missing_docs)]
mod error;
mod parse;
mod properties;
pub mod symbols;
pub mod token;
mod tokenizer;
pub mod tree;

pub use error::{EvalError, ParseError};
pub use parse::{parse, parse_str, Parser, DEFAULT_MAX_DEPTH, DEFAULT_MAX_HEIGHT};
pub use properties::{FunctionBody, ParseProperties, Properties};
pub use token::{Lexeme, LexemeKind, Token, TokenList};
pub use tokenizer::Tokenizer;
pub use tree::{Bindings, Node};
