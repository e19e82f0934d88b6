use super::Parser;
use crate::error::ParseError;
use crate::properties::Properties;
use crate::token::{self, DelimiterGroup, Lexeme, LexemeKind, Token};
use crate::tokenizer::strip_number;
use crate::tree::{ArgumentList, Binary, BinaryKind, Constant, FunctionApply, Node, Power, Radical};
use log::debug;

impl<'p, P> Parser<'p, P>
where
    P: Properties + ?Sized,
{
    /// The node for a value producing token, with its height
    ///
    /// Composite tokens are atomic to the surrounding expression, each of their parts is parsed on
    /// its own.
    pub(super) fn value_node<'a>(&self, token: &Token<'a>) -> Result<(Node<'a>, usize), ParseError> {
        match token {
            Token::Lexeme(lexeme) => Ok((self.leaf(lexeme)?, 1)),
            Token::Fraction(frac) => {
                let (numerator, nh) = self.nested(&frac.numerator)?;
                let (denominator, dh) = self.nested(&frac.denominator)?;
                let height = self.grow([nh, dh])?;
                Ok((Binary::new(BinaryKind::Divide, numerator, denominator).into(), height))
            }
            Token::Superscript(sup) => {
                let (base, bh) = self.nested(&sup.base)?;
                let (exponent, eh) = self.nested(&sup.exponent)?;
                Ok((Power::new(base, exponent).into(), self.grow([bh, eh])?))
            }
            Token::Radical(rad) => {
                let (base, bh) = self.nested(&rad.base)?;
                if rad.degree.is_empty() {
                    Ok((Radical::square(base).into(), self.grow([bh, 1])?))
                } else {
                    let (degree, dh) = self.nested(&rad.degree)?;
                    Ok((Radical::new(base, degree).into(), self.grow([bh, dh])?))
                }
            }
            Token::FunctionApply(func) => self.function_apply(func),
            Token::DelimiterGroup(group) => self.group(group),
        }
    }

    /// A delimited group outside of a call
    ///
    /// Parentheses and brackets only group, bars take the absolute value.
    fn group<'a>(&self, group: &DelimiterGroup<'a>) -> Result<(Node<'a>, usize), ParseError> {
        let absolute = match (group.open, group.close) {
            ('(', ')') | ('[', ']') => false,
            ('|', '|') => true,
            _ => return Err(ParseError::UnsupportedDelimiters(group.to_string())),
        };
        let (node, height) = match &*group.elements {
            [element] => self.nested(element)?,
            [] => {
                return Err(ParseError::MalformedExpression(format!(
                    "empty group {group}"
                )))
            }
            _ => return Err(ParseError::UnexpectedSeparator(group.to_string())),
        };
        if absolute {
            Ok((FunctionApply::absolute(node).into(), self.grow([height])?))
        } else {
            Ok((node, height))
        }
    }

    /// The node for a literal or identifier
    pub(super) fn leaf<'a>(&self, lexeme: &Lexeme<'a>) -> Result<Node<'a>, ParseError> {
        match lexeme.kind {
            LexemeKind::RealValue => {
                let malformed = || ParseError::MalformedLiteral(lexeme.to_string());
                // digits with at most one `.`, the same numbers the tokenizer reads
                let text = lexeme.text.trim();
                match strip_number(text) {
                    Some((_, "")) => text.parse().map(Node::Literal).map_err(|_| malformed()),
                    _ => Err(malformed()),
                }
            }
            LexemeKind::VarIdentifier => Ok(Node::Variable(lexeme.text)),
            LexemeKind::ConstIdentifier => self
                .properties
                .constant_value(lexeme.text)
                .map(|value| Constant::new(lexeme.text, value).into())
                .ok_or_else(|| ParseError::UndeclaredConstant(lexeme.to_string())),
            _ => Err(ParseError::Internal(format!(
                "cannot process {lexeme} as a value"
            ))),
        }
    }

    /// A call with an already grouped argument list, with its height
    pub(super) fn call<'a>(
        &self,
        name: &Lexeme<'a>,
        group: &DelimiterGroup<'a>,
    ) -> Result<(FunctionApply<'a>, usize), ParseError> {
        if !self.properties.is_function_declared(name.text) {
            return Err(ParseError::UnrecognizedFunction(name.to_string()));
        }
        let (arguments, height) = self.argument_list(group)?;
        debug!("calling {name} with {} argument(s)", arguments.len());
        let call = FunctionApply::resolve(name.text, arguments, self.properties)?;
        Ok((call, height))
    }

    fn argument_list<'a>(
        &self,
        group: &DelimiterGroup<'a>,
    ) -> Result<(ArgumentList<'a>, usize), ParseError> {
        if !group.is_argument_list() {
            return Err(ParseError::InvalidArgumentList(group.to_string()));
        }
        let arguments = match &*group.elements {
            // markup writes `f()` as a single empty argument
            [only] if only.is_empty() => Vec::new(),
            elements => elements
                .iter()
                .map(|arg| self.nested(arg))
                .collect::<Result<Vec<_>, _>>()?,
        };
        let height = self.grow(arguments.iter().map(|(_, height)| *height))?;
        Ok((arguments.into_iter().map(|(arg, _)| arg).collect(), height))
    }

    fn function_apply<'a>(
        &self,
        func: &token::FunctionApply<'a>,
    ) -> Result<(Node<'a>, usize), ParseError> {
        let unrecognized = || ParseError::UnrecognizedFunction(func.to_string());
        match &*func.name {
            [Token::Lexeme(name)] if self.properties.is_function_declared(name.text) => {
                let (call, height) = self.call(name, &func.arguments)?;
                Ok((call.into(), height))
            }
            // an exponent on the name, e.g. sin^2(x), applies to the result
            [Token::Superscript(sup)] => match &*sup.base {
                [Token::Lexeme(name)] if self.properties.is_function_declared(name.text) => {
                    let (call, ch) = self.call(name, &func.arguments)?;
                    let (exponent, eh) = self.nested(&sup.exponent)?;
                    Ok((Power::new(call, exponent).into(), self.grow([ch, eh])?))
                }
                _ => Err(unrecognized()),
            },
            _ => Err(unrecognized()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ParseError;
    use crate::properties::ParseProperties;
    use crate::token::{
        DelimiterGroup, Fraction, FunctionApply, Lexeme, LexemeKind, Radical, Superscript, Token,
        TokenList,
    };
    use crate::Parser;
    use std::collections::HashMap;

    fn props() -> ParseProperties {
        ParseProperties::new()
            .with_function("f", 1, |args| args[0] * args[0])
            .with_function("hyp", 2, |args| args[0].hypot(args[1]))
            .with_function("one", 0, |_| 1.0)
            .with_constant("c", 10.0)
    }

    fn parse_one(token: impl Into<Token<'static>>) -> Result<f64, ParseError> {
        let props = props();
        let tokens: TokenList = [token.into()].into();
        let node = Parser::new(&props).parse(&tokens)?;
        Ok(node.evaluate().unwrap())
    }

    #[test]
    fn fraction() {
        let frac = Fraction::new([Lexeme::number("2")], [Lexeme::number("5")]);
        assert_eq!(parse_one(frac), Ok(0.4));
    }

    #[test]
    fn superscript() {
        let sup = Superscript::new([Lexeme::number("2")], [Lexeme::number("3")]);
        assert_eq!(parse_one(sup), Ok(8.0));
    }

    #[test]
    fn radicals() {
        let cube = Radical::new([Lexeme::number("27")], [Lexeme::number("3")]);
        assert!((parse_one(cube).unwrap() - 3.0).abs() < 1e-12);
        let square = Radical::square([Lexeme::number("16")]);
        assert!((parse_one(square).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn function_apply() {
        let func = FunctionApply::new(
            [Lexeme::var("f")],
            DelimiterGroup::parens([[Lexeme::number("4")]]),
        );
        assert_eq!(parse_one(func), Ok(16.0));

        let func = FunctionApply::new(
            [Lexeme::function("hyp")],
            DelimiterGroup::parens([[Lexeme::number("3")], [Lexeme::number("4")]]),
        );
        assert_eq!(parse_one(func), Ok(5.0));

        let func = FunctionApply::new(
            [Lexeme::function("one")],
            DelimiterGroup::parens([TokenList::default()]),
        );
        assert_eq!(parse_one(func), Ok(1.0));
    }

    #[test]
    fn function_arity() {
        let func = FunctionApply::new(
            [Lexeme::function("f")],
            DelimiterGroup::parens([[Lexeme::number("4")], [Lexeme::number("5")]]),
        );
        assert_eq!(
            parse_one(func),
            Err(ParseError::ArityMismatch {
                name: "f".to_owned(),
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn exponentiated_name() {
        // f^c(3) = f(3)^c
        let name = Superscript::new([Lexeme::function("f")], [Lexeme::constant("c")]);
        let func = FunctionApply::new([name], DelimiterGroup::parens([[Lexeme::number("3")]]));
        assert_eq!(parse_one(func), Ok(9f64.powf(10.0)));
    }

    #[test]
    fn unrecognized_names() {
        let func = FunctionApply::new(
            [Lexeme::function("g")],
            DelimiterGroup::parens([[Lexeme::number("1")]]),
        );
        assert!(matches!(
            parse_one(func),
            Err(ParseError::UnrecognizedFunction(_))
        ));

        let func = FunctionApply::new(
            [Lexeme::function("f"), Lexeme::function("f")],
            DelimiterGroup::parens([[Lexeme::number("1")]]),
        );
        assert!(matches!(
            parse_one(func),
            Err(ParseError::UnrecognizedFunction(_))
        ));
    }

    #[test]
    fn invalid_argument_list() {
        let func = FunctionApply::new(
            [Lexeme::function("f")],
            DelimiterGroup::new('[', [[Lexeme::number("1")]], ']', ','),
        );
        assert_eq!(
            parse_one(func),
            Err(ParseError::InvalidArgumentList("[1]".to_owned()))
        );
    }

    #[test]
    fn groups() {
        let group = DelimiterGroup::new(
            '[',
            [[
                Lexeme::number("1"),
                Lexeme::punct(LexemeKind::OpPlus),
                Lexeme::number("2"),
            ]],
            ']',
            ',',
        );
        assert_eq!(parse_one(group), Ok(3.0));

        let pair = DelimiterGroup::parens([[Lexeme::number("1")], [Lexeme::number("2")]]);
        assert_eq!(
            parse_one(pair),
            Err(ParseError::UnexpectedSeparator("(1,2)".to_owned()))
        );

        // |-3|
        let bars = DelimiterGroup::new(
            '|',
            [[Lexeme::punct(LexemeKind::OpMinus), Lexeme::number("3")]],
            '|',
            ',',
        );
        assert_eq!(parse_one(bars), Ok(3.0));

        let braces = DelimiterGroup::new('{', [[Lexeme::number("1")]], '}', ',');
        assert_eq!(
            parse_one(braces),
            Err(ParseError::UnsupportedDelimiters("{1}".to_owned()))
        );
        let unbalanced = DelimiterGroup::new('(', [[Lexeme::number("1")]], ']', ',');
        assert_eq!(
            parse_one(unbalanced),
            Err(ParseError::UnsupportedDelimiters("(1]".to_owned()))
        );
    }

    #[test]
    fn absolute_value_renders_as_abs() {
        let props = ParseProperties::standard();
        let bars = DelimiterGroup::new(
            '|',
            [[
                Lexeme::var("x"),
                Lexeme::punct(LexemeKind::OpMinus),
                Lexeme::number("3"),
            ]],
            '|',
            ',',
        );
        let tokens: TokenList = [
            Token::from(bars),
            Token::from(Lexeme::punct(LexemeKind::OpMul)),
            Token::from(Lexeme::number("2")),
        ]
        .into();
        let node = Parser::new(props).parse(&tokens).unwrap();
        assert_eq!(node.to_infix(), "abs(x - 3) * 2");
        let bindings: HashMap<_, _> = [("x", 1.0)].into_iter().collect();
        assert_eq!(node.evaluate_with(&bindings), Ok(4.0));
    }

    #[test]
    fn leaves() {
        assert_eq!(parse_one(Lexeme::constant("c")), Ok(10.0));
        assert_eq!(
            parse_one(Lexeme::constant("k")),
            Err(ParseError::UndeclaredConstant("k".to_owned()))
        );
        assert_eq!(parse_one(Lexeme::number(" 1.5 ")), Ok(1.5));
        assert_eq!(parse_one(Lexeme::number(".5")), Ok(0.5));
        for text in ["1.2.3", "inf", "NaN", "1e5", "-1", "+2", "."] {
            assert_eq!(
                parse_one(Lexeme::number(text)),
                Err(ParseError::MalformedLiteral(text.to_owned())),
                "accepted {text}"
            );
        }
    }
}
