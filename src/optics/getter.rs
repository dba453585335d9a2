//! Getter: read-only access to exactly one focus.

use std::fmt;

use crate::error::{EvalResult, SchemaResult};
use crate::profunctor::{
    Capabilities, Cartesian, CartesianOps, Profunctor, ReadOnly, ReadOnlyOps, Representation,
    RepresentationKind, witness,
};
use crate::types::{Function, Value};

/// A getter built from `get: S -> A`. Its write side is phantom.
///
/// Interpreting a getter needs [`ReadOnly`], which no writing representation
/// provides; only [`Getter`] itself does. Optics that never branch (adapters
/// and lenses) can still be read through a getter.
///
/// # Examples
///
/// ```
/// use datafix::optics::standard;
/// use datafix::types::{Type, Value};
///
/// let second = standard::proj2(Type::Int, Type::Str);
/// let getter = second.to_getter().unwrap();
///
/// assert_eq!(
///     getter.get(Value::pair(Value::Int(1), Value::string("x"))),
///     Ok(Value::string("x"))
/// );
/// ```
#[derive(Clone)]
pub struct Getter {
    get: Function,
}

impl Getter {
    /// Creates a getter.
    #[must_use]
    pub const fn new(get: Function) -> Self {
        Self { get }
    }

    /// The getter returning the whole.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Function::identity())
    }

    /// Reads the focus.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn get(&self, whole: Value) -> EvalResult<Value> {
        self.get.apply(whole)
    }

    /// Interprets this getter against `representation`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingCapability`](crate::error::SchemaError)
    /// if `P` is not [`ReadOnly`].
    pub fn eval<P: Representation>(&self, representation: P) -> SchemaResult<P> {
        let ops = witness::<P, _>(P::read_only(), "getter", Capabilities::READ_ONLY)?;
        Ok((ops.read_through)(representation, self.get.clone()))
    }
}

impl Profunctor for Getter {
    fn dimap(self, pre: Function, _post: Function) -> Self {
        Self::new(pre.and_then(&self.get))
    }
}

impl Cartesian for Getter {
    fn first(self) -> Self {
        let get = self.get;
        Self::new(Function::new(move |pair| get.apply(pair.into_pair()?.0)))
    }

    fn second(self) -> Self {
        let get = self.get;
        Self::new(Function::new(move |pair| get.apply(pair.into_pair()?.1)))
    }
}

impl ReadOnly for Getter {
    fn read_through(self, get: Function) -> Self {
        Self::new(get.and_then(&self.get))
    }
}

impl Representation for Getter {
    const KIND: RepresentationKind = RepresentationKind::Getter;

    fn cartesian() -> Option<CartesianOps<Self>> {
        Some(CartesianOps::of())
    }

    fn read_only() -> Option<ReadOnlyOps<Self>> {
        Some(ReadOnlyOps::of())
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Getter").finish_non_exhaustive()
    }
}
