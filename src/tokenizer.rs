use crate::properties::Properties;
use crate::symbols::{default_symbols, DefaultSymbols, SymbolMap};
use crate::token::{Lexeme, LexemeKind, Token};
use std::iter::FusedIterator;

/// Split a leading run of digits with at most one `.` off `inp`
pub(crate) fn strip_number(inp: &str) -> Option<(&str, &str)> {
    let mut seen_decimal = false;
    let len = inp
        .char_indices()
        .find(|(_, c)| match c {
            '.' if !seen_decimal => {
                seen_decimal = true;
                false
            }
            '0'..='9' => false,
            _ => true,
        })
        .map(|(i, _)| i)
        .unwrap_or(inp.len());
    if len > 1 || (!seen_decimal && len > 0) {
        Some(inp.split_at(len))
    } else {
        None
    }
}

fn strip_identifier(inp: &str) -> Option<(&str, &str)> {
    let mut chars = inp.char_indices();
    match chars.next() {
        Some((_, first)) if first.is_alphabetic() => {
            let len = chars
                .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
                .map(|(i, _)| i)
                .unwrap_or(inp.len());
            Some(inp.split_at(len))
        }
        _ => None,
    }
}

/// A tokenizer for plain text runs of math
///
/// Operators and punctuation come from a [`SymbolMap`], numbers are digit runs with at most one
/// decimal point, and identifier runs are classified as functions, constants or variables through
/// [`Properties`]. Any other character becomes a single character variable.
///
/// # Example
/// ```
/// use omath_expr::{Lexeme, ParseProperties, Token, Tokenizer};
///
/// let props = ParseProperties::standard();
/// let res: Vec<_> = Tokenizer::new("2*pi", props).collect();
/// assert_eq!(
///     res,
///     [
///         Token::Lexeme(Lexeme::number("2")),
///         Token::Lexeme(Lexeme::punct(omath_expr::LexemeKind::OpMul)),
///         Token::Lexeme(Lexeme::constant("pi")),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a, 'b, M, P: ?Sized> {
    remaining: &'a str,
    symbols: &'b M,
    properties: &'b P,
}

impl<'a, 'b, P> Tokenizer<'a, 'b, DefaultSymbols, P>
where
    P: Properties + ?Sized,
{
    /// Create a new tokenizer with the default [symbols][crate::symbols::MATH_SYMBOLS]
    pub fn new(inp: &'a str, properties: &'b P) -> Self {
        Self::with_symbols(inp, default_symbols(), properties)
    }
}

impl<'a, 'b, M, P> Tokenizer<'a, 'b, M, P>
where
    P: ?Sized,
{
    /// Create a new tokenizer with custom symbols
    ///
    /// # Parameters
    /// - `inp`: the text to tokenize
    /// - `symbols`: the operators and punctuation to recognize
    /// - `properties`: the declarations used to classify identifiers
    pub fn with_symbols(inp: &'a str, symbols: &'b M, properties: &'b P) -> Self {
        Tokenizer {
            remaining: inp,
            symbols,
            properties,
        }
    }
}

impl<'a, 'b, M, P> Tokenizer<'a, 'b, M, P>
where
    P: Properties + ?Sized,
{
    fn classify(&self, ident: &str) -> LexemeKind {
        if self.properties.is_function_declared(ident) {
            LexemeKind::FunctionName
        } else if self.properties.is_constant_declared(ident) {
            LexemeKind::ConstIdentifier
        } else {
            LexemeKind::VarIdentifier
        }
    }
}

impl<'a, 'b, M, P> Iterator for Tokenizer<'a, 'b, M, P>
where
    M: SymbolMap,
    P: Properties + ?Sized,
{
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // remove whitespace
        self.remaining = self.remaining.trim_start();
        if let Some((len, kind)) = self.symbols.longest_symbol(self.remaining) {
            let (symbol, rem) = self.remaining.split_at(len);
            self.remaining = rem;
            return Some(Lexeme::new(kind, symbol).into());
        }
        if let Some((num, rem)) = strip_number(self.remaining) {
            self.remaining = rem;
            return Some(Lexeme::number(num).into());
        }
        if let Some((ident, rem)) = strip_identifier(self.remaining) {
            self.remaining = rem;
            return Some(Lexeme::new(self.classify(ident), ident).into());
        }
        // next char
        self.remaining.chars().next().map(|chr| {
            let (raw, rem) = self.remaining.split_at(chr.len_utf8());
            self.remaining = rem;
            Lexeme::var(raw).into()
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining.len()))
    }
}

impl<'a, 'b, M, P> FusedIterator for Tokenizer<'a, 'b, M, P>
where
    M: SymbolMap,
    P: Properties + ?Sized,
{
}
