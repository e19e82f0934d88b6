//! Symbol maps find the operator or punctuation that starts a text run
//!
//! The [tokenizer][crate::Tokenizer] asks a [`SymbolMap`] for the longest symbol at the front of
//! the remaining input, so `**` is read as one power operator rather than two multiplications.
//! Two maps are provided: a [`TrieSymbolMap`] backed by `qp-trie` (the default, requires the
//! `qp-trie` feature) and a [`HashSymbolMap`] of length buckets that hashes with `fnv` when the
//! `fnv` feature is enabled.
//!
//! # Example
//!
//! ```
//! use omath_expr::symbols::{HashSymbolMap, SymbolMap, MATH_SYMBOLS};
//! use omath_expr::LexemeKind;
//!
//! let symbols = HashSymbolMap::from_iter(MATH_SYMBOLS);
//! assert_eq!(symbols.longest_symbol("**2"), Some((2, LexemeKind::OpPow)));
//! ```
mod hash;
#[cfg(feature = "qp-trie")]
mod trie;

use crate::token::LexemeKind;
pub use hash::HashSymbolMap;
use lazy_static::lazy_static;
#[cfg(feature = "qp-trie")]
pub use trie::TrieSymbolMap;

/// A map that finds the longest symbol prefixing some input
pub trait SymbolMap {
    /// The byte length and kind of the longest symbol that `inp` starts with
    ///
    /// Empty symbols never match.
    fn longest_symbol(&self, inp: &str) -> Option<(usize, LexemeKind)>;
}

/// The symbols of plain text math, including the unicode operators found in math markup
pub const MATH_SYMBOLS: [(&str, LexemeKind); 17] = [
    ("+", LexemeKind::OpPlus),
    ("-", LexemeKind::OpMinus),
    ("\u{2212}", LexemeKind::OpMinus), // minus sign
    ("*", LexemeKind::OpMul),
    ("\u{d7}", LexemeKind::OpMul),   // multiplication sign
    ("\u{b7}", LexemeKind::OpMul),   // middle dot
    ("\u{22c5}", LexemeKind::OpMul), // dot operator
    ("\u{2062}", LexemeKind::OpMul), // invisible times
    ("/", LexemeKind::OpDiv),
    ("\u{f7}", LexemeKind::OpDiv),  // division sign
    ("\u{2215}", LexemeKind::OpDiv), // division slash
    ("^", LexemeKind::OpPow),
    ("**", LexemeKind::OpPow),
    ("=", LexemeKind::EqSign),
    ("(", LexemeKind::LeftParen),
    (")", LexemeKind::RightParen),
    (",", LexemeKind::ArgumentSeparator),
];

/// The symbol map used by [`Tokenizer::new`][crate::Tokenizer::new], a trie with the `qp-trie`
/// feature
#[cfg(feature = "qp-trie")]
pub type DefaultSymbols = TrieSymbolMap<&'static str>;
/// The symbol map used by [`Tokenizer::new`][crate::Tokenizer::new], a hash map per symbol length
/// without the `qp-trie` feature
#[cfg(not(feature = "qp-trie"))]
pub type DefaultSymbols = HashSymbolMap<&'static str>;

lazy_static! {
    static ref DEFAULT_SYMBOLS: DefaultSymbols = DefaultSymbols::from_iter(MATH_SYMBOLS);
}

/// The shared map of [`MATH_SYMBOLS`]
pub fn default_symbols() -> &'static DefaultSymbols {
    &DEFAULT_SYMBOLS
}
