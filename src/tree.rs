//! The structures of a parsed expression tree
//!
//! - [`Node`] - Any node; leaves are literals, variables and constants
//! - [`Binary`] - One of the four arithmetic operations
//! - [`Unary`] - A sign applied to an operand
//! - [`Power`] - A base raised to an exponent
//! - [`Radical`] - A root of a given degree
//! - [`FunctionApply`] - A declared function applied to an [`ArgumentList`]
//! - [`Equation`] - Two sides joined by `=`
//!
//! Every node owns its children, so a tree is finite and has no sharing. Names are borrowed from
//! the tokens the tree was parsed from. Each node evaluates to an `f64` and renders to infix or
//! postfix text.
use crate::error::{EvalError, ParseError};
use crate::properties::{real_root, FunctionBody, Properties};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::{self, Write};
use std::hash::{BuildHasher, Hash};
use std::ops::Deref;
use std::sync::Arc;

// infix binding strength, tighter is higher
const EQUATION: u8 = 0;
const SUM: u8 = 1;
const PRODUCT: u8 = 2;
const SIGN: u8 = 3;
const POWER: u8 = 4;
const ATOM: u8 = 5;

/// Variable values supplied at evaluation time
pub trait Bindings {
    /// The value bound to `name`
    fn value(&self, name: &str) -> Option<f64>;
}

/// No bindings at all
impl Bindings for () {
    fn value(&self, _: &str) -> Option<f64> {
        None
    }
}

impl<K, S> Bindings for HashMap<K, f64, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn value(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// The four arithmetic operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryKind {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
}

impl BinaryKind {
    /// The operator symbol
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryKind::Add => "+",
            BinaryKind::Subtract => "-",
            BinaryKind::Multiply => "*",
            BinaryKind::Divide => "/",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryKind::Add | BinaryKind::Subtract => SUM,
            BinaryKind::Multiply | BinaryKind::Divide => PRODUCT,
        }
    }

    fn apply(self, left: f64, right: f64) -> Result<f64, EvalError> {
        match self {
            BinaryKind::Add => Ok(left + right),
            BinaryKind::Subtract => Ok(left - right),
            BinaryKind::Multiply => Ok(left * right),
            BinaryKind::Divide if right == 0.0 => Err(EvalError::DivisionByZero),
            BinaryKind::Divide => Ok(left / right),
        }
    }
}

/// The two signs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryKind {
    /// `+x`
    Plus,
    /// `-x`
    Minus,
}

impl UnaryKind {
    /// The infix symbol
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryKind::Plus => "+",
            UnaryKind::Minus => "-",
        }
    }

    /// The postfix symbol, distinct from the binary operators
    pub fn postfix_symbol(self) -> &'static str {
        match self {
            UnaryKind::Plus => "pos",
            UnaryKind::Minus => "neg",
        }
    }
}

/// A constant identifier with the value it had when parsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant<'a> {
    /// The identifier
    pub name: &'a str,
    /// The resolved value
    pub value: f64,
}

impl<'a> Constant<'a> {
    /// Create a resolved constant
    pub fn new(name: &'a str, value: f64) -> Self {
        Constant { name, value }
    }
}

/// An arithmetic operation on two operands
#[derive(Debug, Clone, PartialEq)]
pub struct Binary<'a> {
    /// The operation
    pub kind: BinaryKind,
    left: Box<Node<'a>>,
    right: Box<Node<'a>>,
}

impl<'a> Binary<'a> {
    /// Create an operation with both operands
    pub fn new<L, R>(kind: BinaryKind, left: L, right: R) -> Self
    where
        L: Into<Node<'a>>,
        R: Into<Node<'a>>,
    {
        Binary {
            kind,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }

    /// The left operand
    pub fn left(&self) -> &Node<'a> {
        &self.left
    }

    /// The right operand
    pub fn right(&self) -> &Node<'a> {
        &self.right
    }
}

/// A sign applied to an operand
#[derive(Debug, Clone, PartialEq)]
pub struct Unary<'a> {
    /// The sign
    pub kind: UnaryKind,
    operand: Box<Node<'a>>,
}

impl<'a> Unary<'a> {
    /// Create a signed operand
    pub fn new<O>(kind: UnaryKind, operand: O) -> Self
    where
        O: Into<Node<'a>>,
    {
        Unary {
            kind,
            operand: Box::new(operand.into()),
        }
    }

    /// The operand
    pub fn operand(&self) -> &Node<'a> {
        &self.operand
    }
}

/// A base raised to an exponent
#[derive(Debug, Clone, PartialEq)]
pub struct Power<'a> {
    base: Box<Node<'a>>,
    exponent: Box<Node<'a>>,
}

impl<'a> Power<'a> {
    /// Create a power
    pub fn new<B, E>(base: B, exponent: E) -> Self
    where
        B: Into<Node<'a>>,
        E: Into<Node<'a>>,
    {
        Power {
            base: Box::new(base.into()),
            exponent: Box::new(exponent.into()),
        }
    }

    /// The base
    pub fn base(&self) -> &Node<'a> {
        &self.base
    }

    /// The exponent
    pub fn exponent(&self) -> &Node<'a> {
        &self.exponent
    }
}

/// A root of some degree
#[derive(Debug, Clone, PartialEq)]
pub struct Radical<'a> {
    base: Box<Node<'a>>,
    degree: Box<Node<'a>>,
}

impl<'a> Radical<'a> {
    /// Create a root
    pub fn new<B, D>(base: B, degree: D) -> Self
    where
        B: Into<Node<'a>>,
        D: Into<Node<'a>>,
    {
        Radical {
            base: Box::new(base.into()),
            degree: Box::new(degree.into()),
        }
    }

    /// Create a square root
    pub fn square<B>(base: B) -> Self
    where
        B: Into<Node<'a>>,
    {
        Self::new(base, Node::Literal(2.0))
    }

    /// The radicand
    pub fn base(&self) -> &Node<'a> {
        &self.base
    }

    /// The degree
    pub fn degree(&self) -> &Node<'a> {
        &self.degree
    }
}

/// The arguments of a function call in order
///
/// This Derefs to a slice of nodes.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ArgumentList<'a>(Box<[Node<'a>]>);

impl<'a> Deref for ArgumentList<'a> {
    type Target = [Node<'a>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, N> FromIterator<N> for ArgumentList<'a>
where
    N: Into<Node<'a>>,
{
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = N>,
    {
        ArgumentList(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> From<Vec<Node<'a>>> for ArgumentList<'a> {
    fn from(inp: Vec<Node<'a>>) -> Self {
        ArgumentList(inp.into())
    }
}

/// A declared function applied to its arguments
///
/// The argument count always equals the declared arity, which is checked once by
/// [`resolve`][FunctionApply::resolve].
#[derive(Clone)]
pub struct FunctionApply<'a> {
    /// The function name
    pub name: &'a str,
    arguments: ArgumentList<'a>,
    definition: FunctionBody,
}

impl<'a> FunctionApply<'a> {
    /// Look up `name` and attach its definition to the arguments
    ///
    /// # Errors
    /// [`UnrecognizedFunction`][ParseError::UnrecognizedFunction] when `name` isn't declared, and
    /// [`ArityMismatch`][ParseError::ArityMismatch] when the argument count differs from the
    /// declared one.
    pub fn resolve<P>(
        name: &'a str,
        arguments: ArgumentList<'a>,
        properties: &P,
    ) -> Result<Self, ParseError>
    where
        P: Properties + ?Sized,
    {
        let (expected, definition) = properties
            .function_arity(name)
            .zip(properties.function_definition(name))
            .ok_or_else(|| ParseError::UnrecognizedFunction(name.to_owned()))?;
        if arguments.len() != expected {
            return Err(ParseError::ArityMismatch {
                name: name.to_owned(),
                expected,
                found: arguments.len(),
            });
        }
        Ok(FunctionApply {
            name,
            arguments,
            definition,
        })
    }

    /// The absolute value of `argument`, written `|x|` in markup
    ///
    /// The call is named `abs` and doesn't depend on any environment.
    pub fn absolute<N>(argument: N) -> Self
    where
        N: Into<Node<'a>>,
    {
        FunctionApply {
            name: "abs",
            arguments: [argument].into_iter().collect(),
            definition: Arc::new(|args: &[f64]| args[0].abs()),
        }
    }

    /// The arguments
    pub fn arguments(&self) -> &ArgumentList<'a> {
        &self.arguments
    }
}

impl fmt::Debug for FunctionApply<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionApply")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Calls compare by name and arguments, definitions are opaque
impl PartialEq for FunctionApply<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arguments == other.arguments
    }
}

/// Two sides of an equation
#[derive(Debug, Clone, PartialEq)]
pub struct Equation<'a> {
    left: Box<Node<'a>>,
    right: Box<Node<'a>>,
}

impl<'a> Equation<'a> {
    /// Create an equation
    pub fn new<L, R>(left: L, right: R) -> Self
    where
        L: Into<Node<'a>>,
        R: Into<Node<'a>>,
    {
        Equation {
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }

    /// The left side
    pub fn left(&self) -> &Node<'a> {
        &self.left
    }

    /// The right side
    pub fn right(&self) -> &Node<'a> {
        &self.right
    }
}

/// A node of a parsed expression
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    /// A number
    Literal(f64),
    /// A free variable, bound at evaluation time
    Variable(&'a str),
    /// A constant resolved at parse time
    Constant(Constant<'a>),
    /// An arithmetic operation
    Binary(Binary<'a>),
    /// A signed operand
    Unary(Unary<'a>),
    /// A power
    Power(Power<'a>),
    /// A root
    Radical(Radical<'a>),
    /// A function call
    Function(FunctionApply<'a>),
    /// An equation
    Equation(Equation<'a>),
}

// macro to derive from for component types
macro_rules! node_from {
    ($from:ty => $to:ident) => {
        impl<'a> From<$from> for Node<'a> {
            fn from(inp: $from) -> Self {
                Node::$to(inp)
            }
        }
    };
}

node_from!(f64 => Literal);
node_from!(Constant<'a> => Constant);
node_from!(Binary<'a> => Binary);
node_from!(Unary<'a> => Unary);
node_from!(Power<'a> => Power);
node_from!(Radical<'a> => Radical);
node_from!(FunctionApply<'a> => Function);
node_from!(Equation<'a> => Equation);

impl<'a> Node<'a> {
    /// Evaluate without any variable bindings
    ///
    /// # Errors
    /// See [`evaluate_with`][Node::evaluate_with].
    pub fn evaluate(&self) -> Result<f64, EvalError> {
        self.evaluate_with(&())
    }

    /// Evaluate with values for free variables
    ///
    /// An equation evaluates to the difference of its sides, zero when it holds.
    ///
    /// # Errors
    /// [`UnboundVariable`][EvalError::UnboundVariable] for a variable without a binding, and
    /// [`DivisionByZero`][EvalError::DivisionByZero] for a zero divisor. A root of degree zero is
    /// NaN, the same as the `root` function gives.
    pub fn evaluate_with<B>(&self, bindings: &B) -> Result<f64, EvalError>
    where
        B: Bindings + ?Sized,
    {
        match self {
            Node::Literal(value) => Ok(*value),
            Node::Variable(name) => bindings
                .value(name)
                .ok_or_else(|| EvalError::UnboundVariable((*name).to_owned())),
            Node::Constant(constant) => Ok(constant.value),
            Node::Binary(binary) => binary.kind.apply(
                binary.left.evaluate_with(bindings)?,
                binary.right.evaluate_with(bindings)?,
            ),
            Node::Unary(unary) => {
                let operand = unary.operand.evaluate_with(bindings)?;
                Ok(match unary.kind {
                    UnaryKind::Plus => operand,
                    UnaryKind::Minus => -operand,
                })
            }
            Node::Power(power) => Ok(power
                .base
                .evaluate_with(bindings)?
                .powf(power.exponent.evaluate_with(bindings)?)),
            Node::Radical(radical) => {
                let base = radical.base.evaluate_with(bindings)?;
                Ok(real_root(base, radical.degree.evaluate_with(bindings)?))
            }
            Node::Function(func) => {
                let args = func
                    .arguments
                    .iter()
                    .map(|arg| arg.evaluate_with(bindings))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((func.definition)(&args))
            }
            Node::Equation(eq) => {
                Ok(eq.left.evaluate_with(bindings)? - eq.right.evaluate_with(bindings)?)
            }
        }
    }

    /// Render as infix text with only the necessary parentheses
    pub fn to_infix(&self) -> String {
        let mut out = String::new();
        self.write_infix(&mut out);
        out
    }

    /// Render as whitespace separated postfix text
    ///
    /// Signs are written as `pos` and `neg` to keep them apart from the binary operators.
    pub fn to_postfix(&self) -> String {
        let mut out = String::new();
        self.write_postfix(&mut out);
        out
    }

    fn precedence(&self) -> u8 {
        match self {
            Node::Literal(value) if value.is_sign_negative() => SIGN,
            Node::Literal(_)
            | Node::Variable(_)
            | Node::Constant(_)
            | Node::Radical(_)
            | Node::Function(_) => ATOM,
            Node::Binary(binary) => binary.kind.precedence(),
            Node::Unary(_) => SIGN,
            Node::Power(_) => POWER,
            Node::Equation(_) => EQUATION,
        }
    }

    fn write_operand(&self, out: &mut String, parenthesize: bool) {
        if parenthesize {
            out.push('(');
            self.write_infix(out);
            out.push(')');
        } else {
            self.write_infix(out);
        }
    }

    fn write_infix(&self, out: &mut String) {
        let prec = self.precedence();
        match self {
            // NOTE writing to a string never fails
            Node::Literal(value) => {
                let _ = write!(out, "{value}");
            }
            Node::Variable(name) => out.push_str(name),
            Node::Constant(constant) => out.push_str(constant.name),
            Node::Binary(Binary { kind, left, right }) => {
                left.write_operand(out, left.precedence() < prec);
                let _ = write!(out, " {} ", kind.symbol());
                right.write_operand(out, right.precedence() <= prec);
            }
            Node::Equation(Equation { left, right }) => {
                left.write_operand(out, left.precedence() < prec);
                out.push_str(" = ");
                right.write_operand(out, right.precedence() <= prec);
            }
            Node::Unary(unary) => {
                out.push_str(unary.kind.symbol());
                unary.operand.write_operand(out, unary.operand.precedence() < prec);
            }
            Node::Power(Power { base, exponent }) => {
                base.write_operand(out, base.precedence() <= prec);
                out.push('^');
                exponent.write_operand(out, exponent.precedence() < prec);
            }
            Node::Radical(Radical { base, degree }) => {
                out.push_str("root(");
                base.write_infix(out);
                out.push_str(", ");
                degree.write_infix(out);
                out.push(')');
            }
            Node::Function(func) => {
                out.push_str(func.name);
                out.push('(');
                for (i, arg) in func.arguments.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    arg.write_infix(out);
                }
                out.push(')');
            }
        }
    }

    fn write_postfix(&self, out: &mut String) {
        match self {
            Node::Literal(value) => push_word(out, &value.to_string()),
            Node::Variable(name) => push_word(out, name),
            Node::Constant(constant) => push_word(out, constant.name),
            Node::Binary(Binary { kind, left, right }) => {
                left.write_postfix(out);
                right.write_postfix(out);
                push_word(out, kind.symbol());
            }
            Node::Equation(Equation { left, right }) => {
                left.write_postfix(out);
                right.write_postfix(out);
                push_word(out, "=");
            }
            Node::Unary(unary) => {
                unary.operand.write_postfix(out);
                push_word(out, unary.kind.postfix_symbol());
            }
            Node::Power(Power { base, exponent }) => {
                base.write_postfix(out);
                exponent.write_postfix(out);
                push_word(out, "^");
            }
            Node::Radical(Radical { base, degree }) => {
                base.write_postfix(out);
                degree.write_postfix(out);
                push_word(out, "root");
            }
            Node::Function(func) => {
                for arg in func.arguments.iter() {
                    arg.write_postfix(out);
                }
                push_word(out, func.name);
            }
        }
    }
}

fn push_word(out: &mut String, word: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(word);
}

/// Nodes display as infix
impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_infix())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ArgumentList, Binary, BinaryKind, Constant, Equation, FunctionApply, Node, Power, Radical,
        Unary, UnaryKind,
    };
    use crate::error::{EvalError, ParseError};
    use crate::properties::ParseProperties;
    use std::collections::HashMap;

    fn sum_of_product() -> Node<'static> {
        // 2 + 3 * 4
        Binary::new(
            BinaryKind::Add,
            2.0,
            Binary::new(BinaryKind::Multiply, 3.0, 4.0),
        )
        .into()
    }

    #[test]
    fn evaluate_arithmetic() {
        assert_eq!(sum_of_product().evaluate(), Ok(14.0));
        let neg: Node = Unary::new(UnaryKind::Minus, Power::new(2.0, 3.0)).into();
        assert_eq!(neg.evaluate(), Ok(-8.0));
    }

    #[test]
    fn division_by_zero() {
        let node: Node = Binary::new(BinaryKind::Divide, 1.0, 0.0).into();
        assert_eq!(node.evaluate(), Err(EvalError::DivisionByZero));
        let root: Node = Radical::new(8.0, 0.0).into();
        assert!(root.evaluate().unwrap().is_nan());
    }

    #[test]
    fn variables_need_bindings() {
        let node: Node = Binary::new(BinaryKind::Subtract, Node::Variable("x"), 1.0).into();
        assert_eq!(
            node.evaluate(),
            Err(EvalError::UnboundVariable("x".to_owned()))
        );
        let bindings = HashMap::from([("x", 5.0)]);
        assert_eq!(node.evaluate_with(&bindings), Ok(4.0));
    }

    #[test]
    fn constants_keep_parsed_value() {
        let node: Node = Binary::new(BinaryKind::Multiply, Constant::new("c", 3.0), 2.0).into();
        assert_eq!(node.evaluate(), Ok(6.0));
        assert_eq!(node.to_infix(), "c * 2");
    }

    #[test]
    fn function_arity_is_checked() {
        let props = ParseProperties::new().with_function("sq", 1, |args| args[0] * args[0]);
        let args: ArgumentList = [4.0].into_iter().collect();
        let node: Node = FunctionApply::resolve("sq", args, &props).unwrap().into();
        assert_eq!(node.evaluate(), Ok(16.0));

        let args: ArgumentList = [4.0, 5.0].into_iter().collect();
        assert_eq!(
            FunctionApply::resolve("sq", args, &props),
            Err(ParseError::ArityMismatch {
                name: "sq".to_owned(),
                expected: 1,
                found: 2
            })
        );
        assert!(matches!(
            FunctionApply::resolve("cube", ArgumentList::default(), &props),
            Err(ParseError::UnrecognizedFunction(_))
        ));
    }

    #[test]
    fn infix_minimal_parens() {
        assert_eq!(sum_of_product().to_infix(), "2 + 3 * 4");

        let node: Node = Binary::new(
            BinaryKind::Multiply,
            Binary::new(BinaryKind::Add, 2.0, 3.0),
            4.0,
        )
        .into();
        assert_eq!(node.to_infix(), "(2 + 3) * 4");

        let node: Node = Binary::new(
            BinaryKind::Subtract,
            8.0,
            Binary::new(BinaryKind::Subtract, 4.0, 2.0),
        )
        .into();
        assert_eq!(node.to_infix(), "8 - (4 - 2)");

        let node: Node = Power::new(Power::new(2.0, 3.0), Unary::new(UnaryKind::Minus, 1.0)).into();
        assert_eq!(node.to_infix(), "(2^3)^(-1)");

        let node: Node = Binary::new(BinaryKind::Multiply, 3.0, Unary::new(UnaryKind::Minus, 2.0))
            .into();
        assert_eq!(node.to_infix(), "3 * -2");
    }

    #[test]
    fn infix_composites() {
        let props = ParseProperties::standard();
        let args: ArgumentList = [Node::Variable("x")].into_iter().collect();
        let sin = FunctionApply::resolve("sin", args, props).unwrap();
        let node: Node = Equation::new(
            Node::Variable("y"),
            Binary::new(BinaryKind::Add, sin, Radical::square(2.0)),
        )
        .into();
        assert_eq!(node.to_infix(), "y = sin(x) + root(2, 2)");
        assert_eq!(node.to_string(), node.to_infix());
    }

    #[test]
    fn postfix() {
        assert_eq!(sum_of_product().to_postfix(), "2 3 4 * +");
        let node: Node = Binary::new(
            BinaryKind::Divide,
            Unary::new(UnaryKind::Minus, 0.5),
            Power::new(Node::Variable("x"), 2.0),
        )
        .into();
        assert_eq!(node.to_postfix(), "0.5 neg x 2 ^ /");
    }

    #[test]
    fn equation_residual() {
        let node: Node = Equation::new(6.0, Binary::new(BinaryKind::Multiply, 2.0, 3.0)).into();
        assert_eq!(node.evaluate(), Ok(0.0));
        assert_eq!(node.to_postfix(), "6 2 3 * =");
    }
}
