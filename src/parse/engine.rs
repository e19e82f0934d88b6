//! The shunting-yard core
//!
//! Operators wait on a stack until an operator that binds no tighter (or a closing parenthesis, or
//! the end of input) flushes them to the output queue. The queue ends up in postfix order and is
//! reduced into a single tree by [`Engine::finish`].
use crate::error::ParseError;
use crate::properties::Properties;
use crate::token::{Lexeme, LexemeKind};
use crate::tree::{
    ArgumentList, Binary, BinaryKind, Equation, FunctionApply, Node, Power, Unary, UnaryKind,
};
use log::trace;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Associativity {
    Left,
    Right,
    Prefix,
}

/// An operator as the engine sees it, with unary signs already told apart from binary ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Equals,
    Add,
    Subtract,
    Multiply,
    Divide,
    Plus,
    Minus,
    Power,
}

impl Operator {
    /// The operator for a lexeme, `None` if the lexeme isn't one
    pub(crate) fn from_lexeme(kind: LexemeKind, unary: bool) -> Option<Self> {
        match kind {
            LexemeKind::OpPlus if unary => Some(Operator::Plus),
            LexemeKind::OpMinus if unary => Some(Operator::Minus),
            LexemeKind::OpPlus => Some(Operator::Add),
            LexemeKind::OpMinus => Some(Operator::Subtract),
            LexemeKind::OpMul => Some(Operator::Multiply),
            LexemeKind::OpDiv => Some(Operator::Divide),
            LexemeKind::OpPow => Some(Operator::Power),
            LexemeKind::EqSign => Some(Operator::Equals),
            _ => None,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Operator::Equals => 0,
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
            Operator::Plus | Operator::Minus => 3,
            Operator::Power => 4,
        }
    }

    fn associativity(self) -> Associativity {
        match self {
            Operator::Plus | Operator::Minus => Associativity::Prefix,
            Operator::Power => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Whether `self` on top of the stack is flushed when `incoming` is pushed
    fn yields_to(self, incoming: Operator) -> bool {
        match incoming.associativity() {
            Associativity::Left => self.precedence() >= incoming.precedence(),
            Associativity::Right => self.precedence() > incoming.precedence(),
            // a prefix operator has no left operand, so nothing before it is complete
            Associativity::Prefix => false,
        }
    }
}

/// An entry of the operator stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackEntry<'a> {
    Operator(Operator, Lexeme<'a>),
    LeftParen(Lexeme<'a>),
    /// A function whose arguments are still being read, with the arguments seen so far
    Function { name: Lexeme<'a>, args: usize },
}

/// An entry of the output queue
#[derive(Debug, Clone, PartialEq)]
enum OutputItem<'a> {
    /// A finished value and its height
    Node(Node<'a>, usize),
    Operator(Operator, Lexeme<'a>),
    Call { name: Lexeme<'a>, args: usize },
}

/// The height of a node over children of the given heights
///
/// A node without children has height one.
pub(crate) fn grow<I>(max_height: usize, children: I) -> Result<usize, ParseError>
where
    I: IntoIterator<Item = usize>,
{
    let height = children.into_iter().max().unwrap_or(0) + 1;
    if height > max_height {
        Err(ParseError::NestingTooDeep(max_height))
    } else {
        Ok(height)
    }
}

/// An operator stack and an output queue for one flat token list
#[derive(Debug)]
pub(crate) struct Engine<'a> {
    stack: Vec<StackEntry<'a>>,
    output: VecDeque<OutputItem<'a>>,
    max_height: usize,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(max_height: usize) -> Self {
        Engine {
            stack: Vec::new(),
            output: VecDeque::new(),
            max_height,
        }
    }

    /// Queue a finished value of the given height
    pub(crate) fn push_value(&mut self, node: Node<'a>, height: usize) {
        self.output.push_back(OutputItem::Node(node, height));
    }

    /// Push an operator lexeme, flushing the operators it doesn't bind tighter than
    ///
    /// `unary` selects the sign reading of `+` and `-`. Anything that isn't an operator is an
    /// internal error.
    pub(crate) fn push_operator(&mut self, lexeme: Lexeme<'a>, unary: bool) -> Result<(), ParseError> {
        let op = Operator::from_lexeme(lexeme.kind, unary).ok_or_else(|| {
            ParseError::Internal(format!(
                "cannot push non-operator {lexeme} onto the operator stack"
            ))
        })?;
        while let Some(&StackEntry::Operator(top, top_lexeme)) = self.stack.last() {
            if !top.yields_to(op) {
                break;
            }
            trace!("{top_lexeme} flushed by {lexeme}");
            self.stack.pop();
            self.output.push_back(OutputItem::Operator(top, top_lexeme));
        }
        self.stack.push(StackEntry::Operator(op, lexeme));
        Ok(())
    }

    /// Push a grouping parenthesis
    pub(crate) fn push_left_paren(&mut self, paren: Lexeme<'a>) {
        self.stack.push(StackEntry::LeftParen(paren));
    }

    /// Start a call whose arguments follow as plain lexemes
    pub(crate) fn push_function(&mut self, name: Lexeme<'a>, paren: Lexeme<'a>) {
        trace!("deferring call to {name}");
        self.stack.push(StackEntry::Function { name, args: 1 });
        self.stack.push(StackEntry::LeftParen(paren));
    }

    /// Flush operators down to the matching left parenthesis and drop it
    ///
    /// `empty` means nothing was read since the left parenthesis. Returns whether the parenthesis
    /// closed a deferred call.
    pub(crate) fn close_paren(&mut self, paren: &Lexeme<'a>, empty: bool) -> Result<bool, ParseError> {
        loop {
            match self.stack.pop() {
                None => return Err(ParseError::MismatchedParentheses(paren.to_string())),
                Some(StackEntry::LeftParen(_)) => break,
                Some(StackEntry::Operator(op, lexeme)) => {
                    self.output.push_back(OutputItem::Operator(op, lexeme))
                }
                Some(StackEntry::Function { name, .. }) => {
                    return Err(ParseError::Internal(format!(
                        "deferred call to {name} without its parenthesis"
                    )))
                }
            }
        }
        if let Some(&StackEntry::Function { name, args }) = self.stack.last() {
            self.stack.pop();
            let args = if empty { 0 } else { args };
            trace!("resolved call to {name} with {args} argument(s)");
            self.output.push_back(OutputItem::Call { name, args });
            Ok(true)
        } else if empty {
            Err(ParseError::MalformedExpression(format!(
                "empty parentheses before {paren}"
            )))
        } else {
            Ok(false)
        }
    }

    /// Flush the current argument of a deferred call
    ///
    /// The left parenthesis stays on the stack and the call beneath it counts one more argument.
    pub(crate) fn separate(&mut self, separator: &Lexeme<'a>) -> Result<(), ParseError> {
        loop {
            match self.stack.last() {
                Some(&StackEntry::Operator(op, lexeme)) => {
                    self.stack.pop();
                    self.output.push_back(OutputItem::Operator(op, lexeme));
                }
                Some(StackEntry::LeftParen(_)) => break,
                Some(StackEntry::Function { .. }) | None => {
                    return Err(ParseError::UnexpectedSeparator(separator.to_string()))
                }
            }
        }
        match self.stack.iter_mut().rev().nth(1) {
            Some(StackEntry::Function { args, .. }) => {
                *args += 1;
                Ok(())
            }
            _ => Err(ParseError::UnexpectedSeparator(separator.to_string())),
        }
    }

    /// Drain the stack and reduce the output queue to the root node and its height
    pub(crate) fn finish<P>(mut self, properties: &P) -> Result<(Node<'a>, usize), ParseError>
    where
        P: Properties + ?Sized,
    {
        while let Some(entry) = self.stack.pop() {
            match entry {
                StackEntry::Operator(op, lexeme) => {
                    self.output.push_back(OutputItem::Operator(op, lexeme))
                }
                StackEntry::LeftParen(paren) => {
                    return Err(ParseError::MismatchedParentheses(paren.to_string()))
                }
                StackEntry::Function { name, .. } => {
                    return Err(ParseError::MismatchedParentheses(format!("{name}(")))
                }
            }
        }
        reduce(self.output, self.max_height, properties)
    }
}

fn missing_operand(lexeme: &Lexeme<'_>) -> ParseError {
    ParseError::MalformedExpression(format!("operator {lexeme} is missing an operand"))
}

fn reduce<'a, P>(
    output: VecDeque<OutputItem<'a>>,
    max_height: usize,
    properties: &P,
) -> Result<(Node<'a>, usize), ParseError>
where
    P: Properties + ?Sized,
{
    let mut values: Vec<(Node<'a>, usize)> = Vec::new();
    for item in output {
        let value = match item {
            OutputItem::Node(node, height) => (node, height),
            OutputItem::Operator(op, lexeme) => {
                let (right, rh) = values.pop().ok_or_else(|| missing_operand(&lexeme))?;
                match op {
                    Operator::Plus => (
                        Unary::new(UnaryKind::Plus, right).into(),
                        grow(max_height, [rh])?,
                    ),
                    Operator::Minus => (
                        Unary::new(UnaryKind::Minus, right).into(),
                        grow(max_height, [rh])?,
                    ),
                    _ => {
                        let (left, lh) = values.pop().ok_or_else(|| missing_operand(&lexeme))?;
                        let height = grow(max_height, [lh, rh])?;
                        let node = match op {
                            Operator::Add => Binary::new(BinaryKind::Add, left, right).into(),
                            Operator::Subtract => {
                                Binary::new(BinaryKind::Subtract, left, right).into()
                            }
                            Operator::Multiply => {
                                Binary::new(BinaryKind::Multiply, left, right).into()
                            }
                            Operator::Divide => Binary::new(BinaryKind::Divide, left, right).into(),
                            Operator::Power => Power::new(left, right).into(),
                            Operator::Equals => Equation::new(left, right).into(),
                            Operator::Plus | Operator::Minus => unreachable!("handled above"),
                        };
                        (node, height)
                    }
                }
            }
            OutputItem::Call { name, args } => {
                let start = values.len().checked_sub(args).ok_or_else(|| {
                    ParseError::MalformedExpression(format!("call to {name} is missing arguments"))
                })?;
                let args = values.split_off(start);
                let height = grow(max_height, args.iter().map(|(_, height)| *height))?;
                let arguments: ArgumentList = args.into_iter().map(|(arg, _)| arg).collect();
                let call = FunctionApply::resolve(name.text, arguments, properties)?;
                (call.into(), height)
            }
        };
        values.push(value);
    }
    let (root, height) = values
        .pop()
        .ok_or_else(|| ParseError::MalformedExpression("empty expression".to_owned()))?;
    match values.last() {
        None => Ok((root, height)),
        Some((extra, _)) => Err(ParseError::MalformedExpression(format!(
            "missing operator between {extra} and {root}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{grow, Engine, Operator};
    use crate::parse::DEFAULT_MAX_HEIGHT;
    use crate::error::ParseError;
    use crate::properties::ParseProperties;
    use crate::token::{Lexeme, LexemeKind};
    use crate::tree::Node;

    fn op(kind: LexemeKind) -> Lexeme<'static> {
        Lexeme::punct(kind)
    }

    #[test]
    fn yielding() {
        assert!(Operator::Multiply.yields_to(Operator::Add));
        assert!(Operator::Add.yields_to(Operator::Subtract));
        assert!(!Operator::Add.yields_to(Operator::Multiply));
        assert!(!Operator::Power.yields_to(Operator::Power));
        assert!(Operator::Minus.yields_to(Operator::Multiply));
        assert!(!Operator::Minus.yields_to(Operator::Power));
        assert!(!Operator::Multiply.yields_to(Operator::Minus));
    }

    #[test]
    fn precedence_flush() {
        // 2 - 3 * 4 + 1
        let mut engine = Engine::new(DEFAULT_MAX_HEIGHT);
        engine.push_value(2.0.into(), 1);
        engine.push_operator(op(LexemeKind::OpMinus), false).unwrap();
        engine.push_value(3.0.into(), 1);
        engine.push_operator(op(LexemeKind::OpMul), false).unwrap();
        engine.push_value(4.0.into(), 1);
        engine.push_operator(op(LexemeKind::OpPlus), false).unwrap();
        engine.push_value(1.0.into(), 1);
        let (node, height) = engine.finish(&ParseProperties::new()).unwrap();
        assert_eq!(node.to_postfix(), "2 3 4 * - 1 +");
        assert_eq!(height, 4);
        assert_eq!(node.evaluate(), Ok(-9.0));
    }

    #[test]
    fn right_associative_power() {
        // 2 ^ 3 ^ 2
        let mut engine = Engine::new(DEFAULT_MAX_HEIGHT);
        engine.push_value(2.0.into(), 1);
        engine.push_operator(op(LexemeKind::OpPow), false).unwrap();
        engine.push_value(3.0.into(), 1);
        engine.push_operator(op(LexemeKind::OpPow), false).unwrap();
        engine.push_value(2.0.into(), 1);
        let (node, height) = engine.finish(&ParseProperties::new()).unwrap();
        assert_eq!(node.to_postfix(), "2 3 2 ^ ^");
        assert_eq!(height, 3);
        assert_eq!(node.evaluate(), Ok(512.0));
    }

    #[test]
    fn non_operator_push() {
        let mut engine: Engine = Engine::new(DEFAULT_MAX_HEIGHT);
        assert!(matches!(
            engine.push_operator(Lexeme::number("1"), false),
            Err(ParseError::Internal(_))
        ));
    }

    #[test]
    fn unmatched_close() {
        let mut engine: Engine = Engine::new(DEFAULT_MAX_HEIGHT);
        engine.push_value(Node::Literal(1.0), 1);
        assert_eq!(
            engine.close_paren(&op(LexemeKind::RightParen), false),
            Err(ParseError::MismatchedParentheses(")".to_owned()))
        );
    }

    #[test]
    fn separator_without_call() {
        let mut engine: Engine = Engine::new(DEFAULT_MAX_HEIGHT);
        engine.push_left_paren(op(LexemeKind::LeftParen));
        engine.push_value(Node::Literal(1.0), 1);
        assert_eq!(
            engine.separate(&op(LexemeKind::ArgumentSeparator)),
            Err(ParseError::UnexpectedSeparator(",".to_owned()))
        );
    }

    #[test]
    fn deferred_call_counts_arguments() {
        // max(1, 2 + 3)
        let props =
            ParseProperties::new().with_function("max", 2, |args| args[0].max(args[1]));
        let mut engine = Engine::new(DEFAULT_MAX_HEIGHT);
        engine.push_function(Lexeme::function("max"), op(LexemeKind::LeftParen));
        engine.push_value(1.0.into(), 1);
        engine.separate(&op(LexemeKind::ArgumentSeparator)).unwrap();
        engine.push_value(2.0.into(), 1);
        engine.push_operator(op(LexemeKind::OpPlus), false).unwrap();
        engine.push_value(3.0.into(), 1);
        assert_eq!(engine.close_paren(&op(LexemeKind::RightParen), false), Ok(true));
        let (node, height) = engine.finish(&props).unwrap();
        assert_eq!(node.to_infix(), "max(1, 2 + 3)");
        assert_eq!(height, 3);
        assert_eq!(node.evaluate(), Ok(5.0));
    }

    #[test]
    fn leftover_operands() {
        let mut engine = Engine::new(DEFAULT_MAX_HEIGHT);
        engine.push_value(1.0.into(), 1);
        engine.push_value(2.0.into(), 1);
        assert!(matches!(
            engine.finish(&ParseProperties::new()),
            Err(ParseError::MalformedExpression(_))
        ));
    }

    #[test]
    fn heights() {
        assert_eq!(grow(4, None), Ok(1));
        assert_eq!(grow(4, [1, 3, 2]), Ok(4));
        assert_eq!(grow(4, [4]), Err(ParseError::NestingTooDeep(4)));

        // - - - 1
        let mut engine = Engine::new(3);
        for _ in 0..3 {
            engine.push_operator(op(LexemeKind::OpMinus), true).unwrap();
        }
        engine.push_value(1.0.into(), 1);
        assert_eq!(
            engine.finish(&ParseProperties::new()),
            Err(ParseError::NestingTooDeep(3))
        );
    }
}
