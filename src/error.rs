use thiserror::Error;

/// A failure to turn a token list into a tree
///
/// Every variant aborts the parse of the whole expression. Messages carry the textual form of the
/// offending token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A value lexeme whose text is not a number
    #[error("couldn't parse literal value: {0}")]
    MalformedLiteral(String),
    /// A constant identifier the environment doesn't declare
    #[error("undeclared constant: {0}")]
    UndeclaredConstant(String),
    /// An undeclared function, or a function name in an unsupported shape
    #[error("can't process function name: {0}")]
    UnrecognizedFunction(String),
    /// A call with the wrong number of arguments
    #[error("function {name} takes {expected} argument(s) but {found} were given")]
    ArityMismatch {
        /// The function name
        name: String,
        /// The declared arity
        expected: usize,
        /// The number of arguments parsed
        found: usize,
    },
    /// An argument group not delimited by `(`, `)` and `,`
    #[error("{0} cannot be used as an argument list for a function call")]
    InvalidArgumentList(String),
    /// A closing parenthesis without an opening one, or the reverse
    #[error("mismatched parentheses at {0}")]
    MismatchedParentheses(String),
    /// A group whose delimiters are neither parentheses, brackets nor bars
    #[error("unsupported delimiter group: {0}")]
    UnsupportedDelimiters(String),
    /// An argument separator outside of a call
    #[error("unexpected function argument separator: {0}")]
    UnexpectedSeparator(String),
    /// A function name not followed by its arguments
    #[error("missing argument list for function call: {0}")]
    MissingArgumentList(String),
    /// Operators and operands that don't reduce to a single tree
    #[error("malformed expression: {0}")]
    MalformedExpression(String),
    /// Input nested deeper, or a tree taller, than the parser allows
    #[error("expression nested deeper than {0} levels")]
    NestingTooDeep(usize),
    /// A broken parser invariant
    #[error("internal parser error: {0}")]
    Internal(String),
}

/// A failure while evaluating a tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A division with a zero divisor
    #[error("division by zero")]
    DivisionByZero,
    /// A variable without a binding
    #[error("unbound variable: {0}")]
    UnboundVariable(String),
}
