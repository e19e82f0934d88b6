//! The environment a parse runs in: declared constants and functions
//!
//! Parsing consults a [`Properties`] implementation to classify identifiers, to resolve constant
//! values once at parse time, and to attach function bodies to call nodes. [`ParseProperties`] is
//! a map backed implementation, and [`ParseProperties::standard`] offers the usual elementary
//! functions.
//!
//! # Example
//! ```
//! use omath_expr::{ParseProperties, Properties};
//!
//! let props = ParseProperties::new()
//!     .with_constant("g", 9.81)
//!     .with_function("sq", 1, |args| args[0] * args[0]);
//! assert_eq!(props.function_arity("sq"), Some(1));
//! ```
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "fnv")]
type NameMap<V> = HashMap<String, V, fnv::FnvBuildHasher>;
#[cfg(not(feature = "fnv"))]
type NameMap<V> = HashMap<String, V>;

/// An opaque function definition
///
/// It's always called with exactly the declared number of arguments.
pub type FunctionBody = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// The declarations a parse can look up
pub trait Properties {
    /// Whether `name` is a declared function
    fn is_function_declared(&self, name: &str) -> bool;

    /// The declared number of arguments of a function
    fn function_arity(&self, name: &str) -> Option<usize>;

    /// The body of a declared function
    fn function_definition(&self, name: &str) -> Option<FunctionBody>;

    /// The value of a declared constant
    fn constant_value(&self, name: &str) -> Option<f64>;

    /// Whether `name` is a declared constant
    fn is_constant_declared(&self, name: &str) -> bool {
        self.constant_value(name).is_some()
    }
}

#[derive(Clone)]
struct FunctionDecl {
    arity: usize,
    body: FunctionBody,
}

/// A map backed set of declarations
#[derive(Default, Clone)]
pub struct ParseProperties {
    functions: NameMap<FunctionDecl>,
    constants: NameMap<f64>,
}

impl ParseProperties {
    /// An environment without any declarations
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared standard environment
    ///
    /// Declares `pi`, `π` and `e`, the one argument functions `sin`, `cos`, `tan`, `asin`,
    /// `acos`, `atan`, `sinh`, `cosh`, `tanh`, `exp`, `ln`, `log`, `abs` and `sqrt`, and the
    /// two argument `root(x, n)`.
    pub fn standard() -> &'static ParseProperties {
        &STANDARD
    }

    /// Declare a function
    ///
    /// Redeclaring a name replaces the previous declaration.
    pub fn with_function<F>(mut self, name: impl Into<String>, arity: usize, body: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.functions.insert(
            name.into(),
            FunctionDecl {
                arity,
                body: Arc::new(body),
            },
        );
        self
    }

    /// Declare a constant
    pub fn with_constant(mut self, name: impl Into<String>, value: f64) -> Self {
        self.constants.insert(name.into(), value);
        self
    }
}

impl Properties for ParseProperties {
    fn is_function_declared(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    fn function_arity(&self, name: &str) -> Option<usize> {
        self.functions.get(name).map(|decl| decl.arity)
    }

    fn function_definition(&self, name: &str) -> Option<FunctionBody> {
        self.functions.get(name).map(|decl| decl.body.clone())
    }

    fn constant_value(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }
}

impl fmt::Debug for ParseProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut functions: Vec<_> = self
            .functions
            .iter()
            .map(|(name, decl)| (name.as_str(), decl.arity))
            .collect();
        functions.sort_unstable();
        let mut constants: Vec<_> = self.constants.iter().collect();
        constants.sort_unstable_by(|(left, _), (right, _)| left.cmp(right));
        f.debug_struct("ParseProperties")
            .field("functions", &functions)
            .field("constants", &constants)
            .finish()
    }
}

/// n-th root that keeps odd roots of negative numbers real
///
/// A root of degree zero is undefined and gives NaN.
pub(crate) fn real_root(base: f64, degree: f64) -> f64 {
    if degree == 0.0 {
        f64::NAN
    } else if base < 0.0 && degree.fract() == 0.0 && degree % 2.0 != 0.0 {
        -(-base).powf(degree.recip())
    } else {
        base.powf(degree.recip())
    }
}

lazy_static! {
    static ref STANDARD: ParseProperties = {
        let unary: [(&str, fn(f64) -> f64); 14] = [
            ("sin", f64::sin),
            ("cos", f64::cos),
            ("tan", f64::tan),
            ("asin", f64::asin),
            ("acos", f64::acos),
            ("atan", f64::atan),
            ("sinh", f64::sinh),
            ("cosh", f64::cosh),
            ("tanh", f64::tanh),
            ("exp", f64::exp),
            ("ln", f64::ln),
            ("log", f64::log10),
            ("abs", f64::abs),
            ("sqrt", f64::sqrt),
        ];
        unary
            .into_iter()
            .fold(ParseProperties::new(), |props, (name, func)| {
                props.with_function(name, 1, move |args| func(args[0]))
            })
            .with_function("root", 2, |args| real_root(args[0], args[1]))
            .with_constant("pi", std::f64::consts::PI)
            .with_constant("π", std::f64::consts::PI)
            .with_constant("e", std::f64::consts::E)
    };
}
