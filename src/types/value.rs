//! Runtime values and function values.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::control::Either;
use crate::error::{EvalError, EvalResult};

/// A dynamically shaped runtime value.
///
/// The shape of a value follows its [`Type`](super::Type): products are
/// pairs, sums are `Left`/`Right`, tagged choices are `Tagged`, fields and
/// recursive members carry no wrapper of their own.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    /// The unit value.
    Unit,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A string.
    Str(Arc<str>),
    /// A pair.
    Pair(Box<Value>, Box<Value>),
    /// The left case of a sum.
    Left(Box<Value>),
    /// The right case of a sum.
    Right(Box<Value>),
    /// A list.
    List(Vec<Value>),
    /// A case of a tagged choice.
    Tagged(Arc<str>, Box<Value>),
    /// A function.
    Function(Function),
}

impl Value {
    /// Creates a pair.
    #[must_use]
    pub fn pair(first: Self, second: Self) -> Self {
        Self::Pair(Box::new(first), Box::new(second))
    }

    /// Creates the left case of a sum.
    #[must_use]
    pub fn left(value: Self) -> Self {
        Self::Left(Box::new(value))
    }

    /// Creates the right case of a sum.
    #[must_use]
    pub fn right(value: Self) -> Self {
        Self::Right(Box::new(value))
    }

    /// Creates a tagged case.
    #[must_use]
    pub fn tagged(case: impl Into<Arc<str>>, value: Self) -> Self {
        Self::Tagged(case.into(), Box::new(value))
    }

    /// Creates a string.
    #[must_use]
    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Self::Str(value.into())
    }

    /// Converts an either into a sum value.
    #[must_use]
    pub fn from_either(either: Either<Self, Self>) -> Self {
        either.fold(Self::left, Self::right)
    }

    fn unexpected(&self, expected: &'static str) -> EvalError {
        EvalError::UnexpectedValue {
            expected,
            found: self.to_string(),
        }
    }

    /// Reads an integer.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnexpectedValue`] for any other shape.
    pub fn as_int(&self) -> EvalResult<i64> {
        match self {
            Self::Int(value) => Ok(*value),
            other => Err(other.unexpected("an integer")),
        }
    }

    /// Reads a boolean.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnexpectedValue`] for any other shape.
    pub fn as_bool(&self) -> EvalResult<bool> {
        match self {
            Self::Bool(value) => Ok(*value),
            other => Err(other.unexpected("a boolean")),
        }
    }

    /// Splits a pair.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnexpectedValue`] for any other shape.
    pub fn into_pair(self) -> EvalResult<(Self, Self)> {
        match self {
            Self::Pair(first, second) => Ok((*first, *second)),
            other => Err(other.unexpected("a pair")),
        }
    }

    /// Opens a sum.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnexpectedValue`] for any other shape.
    pub fn into_either(self) -> EvalResult<Either<Self, Self>> {
        match self {
            Self::Left(value) => Ok(Either::Left(*value)),
            Self::Right(value) => Ok(Either::Right(*value)),
            other => Err(other.unexpected("a sum")),
        }
    }

    /// Takes the elements of a list.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnexpectedValue`] for any other shape.
    pub fn into_list(self) -> EvalResult<Vec<Self>> {
        match self {
            Self::List(elements) => Ok(elements),
            other => Err(other.unexpected("a list")),
        }
    }

    /// Opens a tagged case.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnexpectedValue`] for any other shape.
    pub fn into_tagged(self) -> EvalResult<(Arc<str>, Self)> {
        match self {
            Self::Tagged(case, value) => Ok((case, *value)),
            other => Err(other.unexpected("a tagged case")),
        }
    }

    /// Takes a function value.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnexpectedValue`] for any other shape.
    pub fn into_function(self) -> EvalResult<Function> {
        match self {
            Self::Function(function) => Ok(function),
            other => Err(other.unexpected("a function")),
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

impl FromIterator<Self> for Value {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(formatter, "()"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Str(value) => write!(formatter, "{value:?}"),
            Self::Pair(first, second) => write!(formatter, "({first}, {second})"),
            Self::Left(value) => write!(formatter, "Left({value})"),
            Self::Right(value) => write!(formatter, "Right({value})"),
            Self::List(elements) => {
                write!(formatter, "[")?;
                for (position, element) in elements.iter().enumerate() {
                    if position > 0 {
                        write!(formatter, ", ")?;
                    }
                    write!(formatter, "{element}")?;
                }
                write!(formatter, "]")
            }
            Self::Tagged(case, value) => write!(formatter, "{case}({value})"),
            Self::Function(_) => write!(formatter, "<function>"),
        }
    }
}

type FunctionBody = dyn Fn(Value) -> EvalResult<Value> + Send + Sync;

/// A shareable function value.
///
/// Equality is identity of the underlying closure.
///
/// # Examples
///
/// ```rust
/// use datafix::types::{Function, Value};
///
/// let increment = Function::total(|value| match value {
///     Value::Int(n) => Value::Int(n + 1),
///     other => other,
/// });
/// let twice = increment.and_then(&increment);
///
/// assert_eq!(twice.apply(Value::Int(1)), Ok(Value::Int(3)));
/// ```
#[derive(Clone)]
pub struct Function(Arc<FunctionBody>);

static IDENTITY: LazyLock<Function> = LazyLock::new(|| Function::new(Ok));

impl Function {
    /// Wraps a fallible closure.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(Value) -> EvalResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(body))
    }

    /// Wraps an infallible closure.
    pub fn total<F>(body: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::new(move |value| Ok(body(value)))
    }

    /// The identity function. All calls share one closure.
    #[must_use]
    pub fn identity() -> Self {
        IDENTITY.clone()
    }

    /// A function ignoring its input.
    #[must_use]
    pub fn constant(value: Value) -> Self {
        Self::new(move |_| Ok(value.clone()))
    }

    /// Calls the function.
    ///
    /// # Errors
    ///
    /// Returns whatever the wrapped closure returns.
    pub fn apply(&self, value: Value) -> EvalResult<Value> {
        (self.0)(value)
    }

    /// Runs `self`, then `next` on its result.
    #[must_use]
    pub fn and_then(&self, next: &Self) -> Self {
        if self.ptr_eq(&IDENTITY) {
            return next.clone();
        }
        if next.ptr_eq(&IDENTITY) {
            return self.clone();
        }
        let first = self.clone();
        let next = next.clone();
        Self::new(move |value| next.apply(first.apply(value)?))
    }

    /// Returns `true` if both wrap the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("<function>")
    }
}
