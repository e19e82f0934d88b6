//! Turning token lists into trees
//!
//! A flat token list is driven through a shunting-yard [engine][engine::Engine]. Composite tokens
//! are parsed recursively, one fresh engine per sub-list, and enter the enclosing expression as
//! single values.
mod composite;
mod engine;

use crate::error::ParseError;
use crate::properties::Properties;
use crate::token::{Lexeme, LexemeKind, Token, TokenList};
use crate::tokenizer::Tokenizer;
use crate::tree::Node;
use engine::Engine;
use log::debug;
use std::fmt;
use std::slice;

/// The default limit on nested composite tokens and parentheses
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// The default limit on the height of a parsed tree
///
/// Long operator chains like `- - - 1` or `1 + 1 + ... + 1` grow a tree one level per operator,
/// and every walk over a tree recurses once per level.
pub const DEFAULT_MAX_HEIGHT: usize = 1024;

/// A configured parser
///
/// Parsers are cheap to copy and hold no state between parses, so one parser can be shared by
/// any number of threads as long as its properties can.
///
/// # Example
/// ```
/// use omath_expr::token::Lexeme;
/// use omath_expr::{LexemeKind, ParseProperties, Parser, TokenList};
///
/// let props = ParseProperties::new();
/// let tokens: TokenList = [
///     Lexeme::number("2"),
///     Lexeme::punct(LexemeKind::OpPlus),
///     Lexeme::number("3"),
///     Lexeme::punct(LexemeKind::OpMul),
///     Lexeme::number("4"),
/// ]
/// .into();
/// let node = Parser::new(&props)
///     .with_max_depth(16)
///     .with_max_height(64)
///     .parse(&tokens)
///     .unwrap();
/// assert_eq!(node.evaluate(), Ok(14.0));
/// ```
pub struct Parser<'p, P: ?Sized> {
    properties: &'p P,
    max_depth: usize,
    max_height: usize,
    depth: usize,
}

impl<'p, P: ?Sized> Clone for Parser<'p, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'p, P: ?Sized> Copy for Parser<'p, P> {}

impl<'p, P: ?Sized> fmt::Debug for Parser<'p, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("max_depth", &self.max_depth)
            .field("max_height", &self.max_height)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl<'p, P> Parser<'p, P>
where
    P: Properties + ?Sized,
{
    /// Create a parser that resolves names with `properties`
    pub fn new(properties: &'p P) -> Self {
        Parser {
            properties,
            max_depth: DEFAULT_MAX_DEPTH,
            max_height: DEFAULT_MAX_HEIGHT,
            depth: 0,
        }
    }

    /// Limit how deeply composite tokens and parentheses may nest
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Parser { max_depth, ..self }
    }

    /// Limit the height of the trees this parser builds
    ///
    /// Parsing fails with [`NestingTooDeep`][ParseError::NestingTooDeep] as soon as a node would
    /// sit more than `max_height` levels above its deepest leaf.
    pub fn with_max_height(self, max_height: usize) -> Self {
        Parser { max_height, ..self }
    }

    /// Parse a token list into a single tree
    ///
    /// # Errors
    /// Any [`ParseError`]; no partial tree is ever returned.
    pub fn parse<'a>(&self, tokens: &[Token<'a>]) -> Result<Node<'a>, ParseError> {
        debug!("parsing {} top level token(s)", tokens.len());
        let root = self.parse_measured(tokens);
        match &root {
            Ok((node, height)) => debug!("parsed {node} with height {height}"),
            Err(err) => debug!("parse failed: {err}"),
        }
        root.map(|(node, _)| node)
    }

    /// Parse a token list into a tree and its height
    fn parse_measured<'a>(&self, tokens: &[Token<'a>]) -> Result<(Node<'a>, usize), ParseError> {
        ListParser::new(*self).run(tokens)
    }

    /// Parse a sub-list one level deeper
    fn nested<'a>(&self, tokens: &[Token<'a>]) -> Result<(Node<'a>, usize), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep(self.max_depth));
        }
        Parser {
            depth: self.depth + 1,
            ..*self
        }
        .parse_measured(tokens)
    }

    /// The height of a node over children of the given heights
    fn grow<I>(&self, children: I) -> Result<usize, ParseError>
    where
        I: IntoIterator<Item = usize>,
    {
        engine::grow(self.max_height, children)
    }
}

/// The driving loop over one flat token list
struct ListParser<'p, 't, 'a, P: ?Sized> {
    parser: Parser<'p, P>,
    engine: Engine<'a>,
    previous: Option<&'t Token<'a>>,
    // nothing since the last operator, `(` or `,` can serve as a left operand
    awaiting_operand: bool,
    open_calls: usize,
    open_parens: usize,
}

impl<'p, 't, 'a, P> ListParser<'p, 't, 'a, P>
where
    P: Properties + ?Sized,
{
    fn new(parser: Parser<'p, P>) -> Self {
        ListParser {
            engine: Engine::new(parser.max_height),
            parser,
            previous: None,
            awaiting_operand: true,
            open_calls: 0,
            open_parens: 0,
        }
    }

    fn previous_kind(&self) -> Option<LexemeKind> {
        self.previous.and_then(Token::lexeme_kind)
    }

    /// Fail unless `token` may start an operand here
    fn operand_position(&self, token: &Token<'a>) -> Result<(), ParseError> {
        if self.awaiting_operand {
            Ok(())
        } else {
            Err(ParseError::MalformedExpression(format!(
                "missing operator before {token}"
            )))
        }
    }

    fn push_value(&mut self, node: Node<'a>, height: usize) {
        self.engine.push_value(node, height);
        self.awaiting_operand = false;
    }

    fn open_paren(&mut self) -> Result<(), ParseError> {
        self.open_parens += 1;
        if self.parser.depth + self.open_parens > self.parser.max_depth {
            Err(ParseError::NestingTooDeep(self.parser.max_depth))
        } else {
            Ok(())
        }
    }

    fn run(mut self, tokens: &'t [Token<'a>]) -> Result<(Node<'a>, usize), ParseError> {
        let mut tokens = tokens.iter();
        while let Some(token) = tokens.next() {
            let lexeme = match token {
                Token::Lexeme(lexeme) => lexeme,
                composite => {
                    self.operand_position(composite)?;
                    let (node, height) = self.parser.value_node(composite)?;
                    self.push_value(node, height);
                    self.previous = Some(token);
                    continue;
                }
            };
            match lexeme.kind {
                LexemeKind::RealValue | LexemeKind::ConstIdentifier | LexemeKind::VarIdentifier => {
                    self.operand_position(token)?;
                    let node = self.parser.leaf(lexeme)?;
                    self.push_value(node, 1);
                }
                LexemeKind::FunctionName => {
                    self.operand_position(token)?;
                    // the argument list becomes the previous token
                    self.previous = Some(self.function_name(lexeme, &mut tokens)?);
                    continue;
                }
                LexemeKind::LeftParen => {
                    self.operand_position(token)?;
                    self.open_paren()?;
                    self.engine.push_left_paren(*lexeme);
                }
                LexemeKind::RightParen => self.right_paren(lexeme)?,
                LexemeKind::ArgumentSeparator => self.separator(lexeme)?,
                LexemeKind::OpPlus
                | LexemeKind::OpMinus
                | LexemeKind::OpMul
                | LexemeKind::OpDiv
                | LexemeKind::OpPow
                | LexemeKind::EqSign => self.operator(lexeme)?,
            }
            self.previous = Some(token);
        }
        if self.awaiting_operand {
            return Err(ParseError::MalformedExpression(match self.previous {
                None => "empty expression".to_owned(),
                Some(last) => format!("missing operand after {last}"),
            }));
        }
        self.engine.finish(self.parser.properties)
    }

    fn operator(&mut self, lexeme: &Lexeme<'a>) -> Result<(), ParseError> {
        // only signs can stand without a left operand
        let unary = self.awaiting_operand;
        if unary && !matches!(lexeme.kind, LexemeKind::OpPlus | LexemeKind::OpMinus) {
            return Err(ParseError::MalformedExpression(format!(
                "operator {lexeme} is missing its left operand"
            )));
        }
        self.engine.push_operator(*lexeme, unary)?;
        self.awaiting_operand = true;
        Ok(())
    }

    fn function_name(
        &mut self,
        name: &Lexeme<'a>,
        tokens: &mut slice::Iter<'t, Token<'a>>,
    ) -> Result<&'t Token<'a>, ParseError> {
        if !self.parser.properties.is_function_declared(name.text) {
            return Err(ParseError::UnrecognizedFunction(name.to_string()));
        }
        match tokens.next() {
            Some(next @ Token::DelimiterGroup(group)) => {
                let (call, height) = self.parser.call(name, group)?;
                self.push_value(call.into(), height);
                Ok(next)
            }
            Some(next @ Token::Lexeme(paren)) if paren.kind == LexemeKind::LeftParen => {
                self.open_paren()?;
                self.open_calls += 1;
                self.engine.push_function(*name, *paren);
                Ok(next)
            }
            Some(next) => Err(ParseError::MissingArgumentList(format!("{name} {next}"))),
            None => Err(ParseError::MissingArgumentList(name.to_string())),
        }
    }

    fn right_paren(&mut self, paren: &Lexeme<'a>) -> Result<(), ParseError> {
        let empty = self.previous_kind() == Some(LexemeKind::LeftParen);
        if self.awaiting_operand && !empty {
            return Err(ParseError::MalformedExpression(format!(
                "missing operand before {paren}"
            )));
        }
        if self.engine.close_paren(paren, empty)? {
            self.open_calls -= 1;
        }
        self.open_parens -= 1;
        self.awaiting_operand = false;
        Ok(())
    }

    fn separator(&mut self, separator: &Lexeme<'a>) -> Result<(), ParseError> {
        if self.open_calls < 1 {
            return Err(ParseError::UnexpectedSeparator(separator.to_string()));
        }
        if self.awaiting_operand {
            return Err(ParseError::MalformedExpression(format!(
                "empty argument before {separator}"
            )));
        }
        self.engine.separate(separator)?;
        self.awaiting_operand = true;
        Ok(())
    }
}

/// Parse a token list with `properties`
///
/// This uses a [`Parser`] with the [default depth limit][DEFAULT_MAX_DEPTH] and the
/// [default height limit][DEFAULT_MAX_HEIGHT].
///
/// # Errors
/// Any [`ParseError`]; no partial tree is ever returned.
pub fn parse<'a, P>(tokens: &[Token<'a>], properties: &P) -> Result<Node<'a>, ParseError>
where
    P: Properties + ?Sized,
{
    Parser::new(properties).parse(tokens)
}

/// Tokenize plain text with the [default symbols][crate::symbols::MATH_SYMBOLS] and parse it
///
/// # Example
/// ```
/// use omath_expr::{parse_str, ParseProperties};
///
/// let node = parse_str("2 * root(27, 3) - 1", ParseProperties::standard()).unwrap();
/// assert!((node.evaluate().unwrap() - 5.0).abs() < 1e-12);
/// ```
///
/// # Errors
/// Any [`ParseError`]; no partial tree is ever returned.
pub fn parse_str<'a, P>(inp: &'a str, properties: &P) -> Result<Node<'a>, ParseError>
where
    P: Properties + ?Sized,
{
    let tokens: TokenList<'a> = Tokenizer::new(inp, properties).collect();
    parse(&tokens, properties)
}
