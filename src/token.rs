//! The input side of the parser: classified lexemes and composite markup tokens
//!
//! - [`Lexeme`] - A minimal classified unit like a number, an identifier or an operator
//! - [`Fraction`] - A fraction that already knows its numerator and denominator
//! - [`Superscript`] - A base with an attached exponent
//! - [`Radical`] - A root with a base and a (possibly empty) degree
//! - [`FunctionApply`] - A function name applied to a delimited argument list
//! - [`DelimiterGroup`] - A bracketed, separated group of expressions
//!
//! Composite tokens hold nested [`TokenList`]s, so a token tree mirrors the layout of the markup
//! it was read from. Lexeme text is borrowed from the source to avoid copies.
use std::fmt;
use std::ops::Deref;

/// The classification of a lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexemeKind {
    /// A numeric literal
    RealValue,
    /// An identifier declared as a constant
    ConstIdentifier,
    /// A free variable
    VarIdentifier,
    /// An identifier declared as a function
    FunctionName,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `+`, binary or unary
    OpPlus,
    /// `-`, binary or unary
    OpMinus,
    /// `*`
    OpMul,
    /// `/`
    OpDiv,
    /// `^`, the infix form of a power
    OpPow,
    /// `=`
    EqSign,
    /// `,` between function arguments
    ArgumentSeparator,
}

impl LexemeKind {
    /// The canonical text of punctuation and operator kinds
    ///
    /// Value and identifier kinds have no canonical text and return `None`.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            LexemeKind::LeftParen => Some("("),
            LexemeKind::RightParen => Some(")"),
            LexemeKind::OpPlus => Some("+"),
            LexemeKind::OpMinus => Some("-"),
            LexemeKind::OpMul => Some("*"),
            LexemeKind::OpDiv => Some("/"),
            LexemeKind::OpPow => Some("^"),
            LexemeKind::EqSign => Some("="),
            LexemeKind::ArgumentSeparator => Some(","),
            LexemeKind::RealValue
            | LexemeKind::ConstIdentifier
            | LexemeKind::VarIdentifier
            | LexemeKind::FunctionName => None,
        }
    }

    /// Whether this kind is an arithmetic operator
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            LexemeKind::OpPlus
                | LexemeKind::OpMinus
                | LexemeKind::OpMul
                | LexemeKind::OpDiv
                | LexemeKind::OpPow
        )
    }
}

/// A classified lexeme with the text it was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'a> {
    /// The lexeme classification
    pub kind: LexemeKind,
    /// The raw text
    pub text: &'a str,
}

impl<'a> Lexeme<'a> {
    /// Create a lexeme from its kind and text
    pub fn new(kind: LexemeKind, text: &'a str) -> Self {
        Lexeme { kind, text }
    }

    /// A numeric literal
    pub fn number(text: &'a str) -> Self {
        Self::new(LexemeKind::RealValue, text)
    }

    /// A free variable
    pub fn var(text: &'a str) -> Self {
        Self::new(LexemeKind::VarIdentifier, text)
    }

    /// A declared constant
    pub fn constant(text: &'a str) -> Self {
        Self::new(LexemeKind::ConstIdentifier, text)
    }

    /// A declared function name
    pub fn function(text: &'a str) -> Self {
        Self::new(LexemeKind::FunctionName, text)
    }

    /// A punctuation or operator lexeme using its canonical text
    ///
    /// Kinds without canonical text get empty text.
    pub fn punct(kind: LexemeKind) -> Self {
        Self::new(kind, kind.symbol().unwrap_or_default())
    }
}

impl fmt::Display for Lexeme<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

/// A fraction with structurally separate numerator and denominator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fraction<'a> {
    /// Tokens above the bar
    pub numerator: TokenList<'a>,
    /// Tokens below the bar
    pub denominator: TokenList<'a>,
}

impl<'a> Fraction<'a> {
    /// Create a fraction from anything convertible to token lists
    pub fn new<N, D>(numerator: N, denominator: D) -> Self
    where
        N: Into<TokenList<'a>>,
        D: Into<TokenList<'a>>,
    {
        Fraction {
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }
}

/// A base raised to a superscript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superscript<'a> {
    /// The base tokens
    pub base: TokenList<'a>,
    /// The exponent tokens
    pub exponent: TokenList<'a>,
}

impl<'a> Superscript<'a> {
    /// Create a superscript from a base and an exponent
    pub fn new<B, E>(base: B, exponent: E) -> Self
    where
        B: Into<TokenList<'a>>,
        E: Into<TokenList<'a>>,
    {
        Superscript {
            base: base.into(),
            exponent: exponent.into(),
        }
    }
}

/// A radical with its base and degree
///
/// An empty degree denotes a square root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Radical<'a> {
    /// The tokens under the root
    pub base: TokenList<'a>,
    /// The degree tokens, empty for a square root
    pub degree: TokenList<'a>,
}

impl<'a> Radical<'a> {
    /// Create a radical with an explicit degree
    pub fn new<B, D>(base: B, degree: D) -> Self
    where
        B: Into<TokenList<'a>>,
        D: Into<TokenList<'a>>,
    {
        Radical {
            base: base.into(),
            degree: degree.into(),
        }
    }

    /// Create a square root
    pub fn square<B>(base: B) -> Self
    where
        B: Into<TokenList<'a>>,
    {
        Self::new(base, TokenList::default())
    }
}

/// A bracketed group of separated elements
///
/// With a single element this is plain grouping, with several it is an argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterGroup<'a> {
    /// The opening character
    pub open: char,
    /// The closing character
    pub close: char,
    /// The element separator
    pub separator: char,
    /// The grouped elements in reading order
    pub elements: Box<[TokenList<'a>]>,
}

impl<'a> DelimiterGroup<'a> {
    /// Create a group with explicit delimiter characters
    pub fn new<T, E>(open: char, elements: T, close: char, separator: char) -> Self
    where
        T: IntoIterator<Item = E>,
        E: Into<TokenList<'a>>,
    {
        DelimiterGroup {
            open,
            close,
            separator,
            elements: elements.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a `(`, `)`, `,` group, the only shape accepted as an argument list
    pub fn parens<T, E>(elements: T) -> Self
    where
        T: IntoIterator<Item = E>,
        E: Into<TokenList<'a>>,
    {
        Self::new('(', elements, ')', ',')
    }

    /// Whether the delimiters are exactly those of a function argument list
    pub fn is_argument_list(&self) -> bool {
        self.open == '(' && self.close == ')' && self.separator == ','
    }
}

/// A function name applied to its arguments
///
/// The name is a token list because it can carry its own superscript, e.g. `sin^2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionApply<'a> {
    /// The tokens naming the function
    pub name: TokenList<'a>,
    /// The argument group
    pub arguments: DelimiterGroup<'a>,
}

impl<'a> FunctionApply<'a> {
    /// Create a function application
    pub fn new<N>(name: N, arguments: DelimiterGroup<'a>) -> Self
    where
        N: Into<TokenList<'a>>,
    {
        FunctionApply {
            name: name.into(),
            arguments,
        }
    }
}

/// A single unit of parser input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// A classified lexeme
    Lexeme(Lexeme<'a>),
    /// A fraction
    Fraction(Fraction<'a>),
    /// A superscript
    Superscript(Superscript<'a>),
    /// A radical
    Radical(Radical<'a>),
    /// A function application
    FunctionApply(FunctionApply<'a>),
    /// A delimited group
    DelimiterGroup(DelimiterGroup<'a>),
}

impl<'a> Token<'a> {
    /// The lexeme if this is one
    pub fn as_lexeme(&self) -> Option<&Lexeme<'a>> {
        match self {
            Token::Lexeme(lexeme) => Some(lexeme),
            _ => None,
        }
    }

    /// The lexeme kind if this is a lexeme
    pub fn lexeme_kind(&self) -> Option<LexemeKind> {
        self.as_lexeme().map(|lexeme| lexeme.kind)
    }
}

// macro to derive from for composite types
macro_rules! token_from {
    ($from:ty => $to:ident) => {
        impl<'a> From<$from> for Token<'a> {
            fn from(inp: $from) -> Self {
                Token::$to(inp)
            }
        }
    };
}

token_from!(Lexeme<'a> => Lexeme);
token_from!(Fraction<'a> => Fraction);
token_from!(Superscript<'a> => Superscript);
token_from!(Radical<'a> => Radical);
token_from!(FunctionApply<'a> => FunctionApply);
token_from!(DelimiterGroup<'a> => DelimiterGroup);

/// A textual rendering used in diagnostics
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Lexeme(lexeme) => write!(f, "{lexeme}"),
            Token::Fraction(frac) => {
                write!(f, "frac{{{}}}{{{}}}", frac.numerator, frac.denominator)
            }
            Token::Superscript(sup) => write!(f, "{{{}}}^{{{}}}", sup.base, sup.exponent),
            Token::Radical(rad) => write!(f, "root{{{}}}{{{}}}", rad.degree, rad.base),
            Token::FunctionApply(func) => write!(f, "{func}"),
            Token::DelimiterGroup(group) => write!(f, "{group}"),
        }
    }
}

impl fmt::Display for FunctionApply<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func{{{}}}{}", self.name, self.arguments)
    }
}

impl fmt::Display for DelimiterGroup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.open)?;
        for (i, elem) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.separator)?;
            }
            write!(f, "{elem}")?;
        }
        write!(f, "{}", self.close)
    }
}

/// An ordered sequence of tokens in reading order
///
/// This Derefs to a slice of tokens.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TokenList<'a>(Box<[Token<'a>]>);

impl<'a> Deref for TokenList<'a> {
    type Target = [Token<'a>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, T> FromIterator<T> for TokenList<'a>
where
    T: Into<Token<'a>>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        TokenList(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> From<Vec<Token<'a>>> for TokenList<'a> {
    fn from(inp: Vec<Token<'a>>) -> Self {
        TokenList(inp.into())
    }
}

impl<'a, T, const N: usize> From<[T; N]> for TokenList<'a>
where
    T: Into<Token<'a>>,
{
    fn from(inp: [T; N]) -> Self {
        inp.into_iter().collect()
    }
}

impl fmt::Display for TokenList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DelimiterGroup, Fraction, FunctionApply, Lexeme, LexemeKind, Token, TokenList};

    #[test]
    fn punct_uses_canonical_text() {
        assert_eq!(Lexeme::punct(LexemeKind::OpMul).text, "*");
        assert_eq!(Lexeme::punct(LexemeKind::RealValue).text, "");
    }

    #[test]
    fn display_nested() {
        let frac = Fraction::new(
            [Lexeme::number("1"), Lexeme::punct(LexemeKind::OpPlus), Lexeme::var("x")],
            [Lexeme::number("2")],
        );
        assert_eq!(Token::from(frac).to_string(), "frac{1 + x}{2}");

        let func = FunctionApply::new(
            [Lexeme::function("f")],
            DelimiterGroup::parens([[Lexeme::var("a")], [Lexeme::var("b")]]),
        );
        assert_eq!(Token::from(func).to_string(), "func{f}(a,b)");
    }

    #[test]
    fn argument_list_shape() {
        let list: TokenList = [Lexeme::number("1")].into();
        assert!(DelimiterGroup::parens([list.clone()]).is_argument_list());
        assert!(!DelimiterGroup::new('[', [list.clone()], ']', ',').is_argument_list());
        assert!(!DelimiterGroup::new('(', [list], ')', ';').is_argument_list());
    }
}
