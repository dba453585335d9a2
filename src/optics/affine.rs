//! Affine: zero or one focus, in general position.
//!
//! An affine is what composing a lens with a prism yields: the focus may be
//! absent (like a prism) and, when present, is replaced in context (like a
//! lens).

use std::fmt;
use std::sync::Arc;

use super::{Matcher, Update};
use crate::control::Either;
use crate::error::{EvalResult, SchemaResult};
use crate::profunctor::{
    Capabilities, Cartesian, CartesianOps, Cocartesian, CocartesianOps, Profunctor,
    Representation, RepresentationKind, witness,
};
use crate::types::{Function, Value};

/// An affine built from `preview: S -> Either<T, A>` and `set: (B, S) -> T`.
///
/// Interpreting an affine needs both [`Cartesian`] and [`Cocartesian`].
///
/// # Laws
///
/// 1. if `preview(s) == Right(a)` then `set(a, s) == s`
/// 2. if `preview(s) == Right(_)` then `preview(set(b, s)) == Right(b)`
/// 3. if `preview(s) == Left(t)` then `set(b, s) == t`
#[derive(Clone)]
pub struct Affine {
    preview: Matcher,
    set: Update,
}

impl Affine {
    /// Creates an affine from its preview and set closures.
    pub fn new<V, U>(preview: V, set: U) -> Self
    where
        V: Fn(Value) -> EvalResult<Either<Value, Value>> + Send + Sync + 'static,
        U: Fn(Value, Value) -> EvalResult<Value> + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(preview), Arc::new(set))
    }

    /// Creates an affine from already shared parts.
    #[must_use]
    pub const fn from_parts(preview: Matcher, set: Update) -> Self {
        Self { preview, set }
    }

    /// The affine whose focus is always the whole.
    #[must_use]
    pub fn identity() -> Self {
        Self::from_parts(
            Arc::new(|whole| Ok(Either::Right(whole))),
            Arc::new(|focus, _| Ok(focus)),
        )
    }

    /// Matches the whole: `Right(focus)` when present, `Left(whole)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn matching(&self, whole: Value) -> EvalResult<Either<Value, Value>> {
        (self.preview)(whole)
    }

    /// Reads the focus if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn preview(&self, whole: Value) -> EvalResult<Option<Value>> {
        Ok(self.matching(whole)?.right())
    }

    /// Replaces the focus if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn set(&self, focus: Value, whole: Value) -> EvalResult<Value> {
        (self.set)(focus, whole)
    }

    /// Interprets this affine against `representation`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingCapability`](crate::error::SchemaError)
    /// if `P` lacks either capability.
    pub fn eval<P: Representation>(&self, representation: P) -> SchemaResult<P> {
        let cartesian = witness::<P, _>(P::cartesian(), "affine", Capabilities::AFFINE)?;
        let cocartesian = witness::<P, _>(P::cocartesian(), "affine", Capabilities::AFFINE)?;
        let preview = Arc::clone(&self.preview);
        let set = Arc::clone(&self.set);
        let pre = Function::new(move |whole: Value| match preview(whole.clone())? {
            Either::Left(miss) => Ok(Value::left(miss)),
            Either::Right(focus) => Ok(Value::right(Value::pair(focus, whole))),
        });
        let post = Function::new(move |either: Value| match either.into_either()? {
            Either::Left(miss) => Ok(miss),
            Either::Right(pair) => {
                let (focus, whole) = pair.into_pair()?;
                set(focus, whole)
            }
        });
        let lifted = (cocartesian.right)((cartesian.first)(representation));
        Ok(lifted.dimap(pre, post))
    }
}

impl Profunctor for Affine {
    fn dimap(self, pre: Function, post: Function) -> Self {
        let preview = self.preview;
        let set = self.set;
        let before = pre.clone();
        let rebuild = post.clone();
        Self::from_parts(
            Arc::new(move |whole| {
                preview(before.apply(whole)?)?.try_map_left(|miss| rebuild.apply(miss))
            }),
            Arc::new(move |focus, whole| post.apply(set(focus, pre.apply(whole)?)?)),
        )
    }
}

impl Cartesian for Affine {
    fn first(self) -> Self {
        let preview = self.preview;
        let set = self.set;
        Self::from_parts(
            Arc::new(move |pair: Value| {
                let (whole, rest) = pair.into_pair()?;
                Ok(preview(whole)?.map_left(|miss| Value::pair(miss, rest)))
            }),
            Arc::new(move |focus, pair| {
                let (whole, rest) = pair.into_pair()?;
                Ok(Value::pair(set(focus, whole)?, rest))
            }),
        )
    }

    fn second(self) -> Self {
        let preview = self.preview;
        let set = self.set;
        Self::from_parts(
            Arc::new(move |pair: Value| {
                let (rest, whole) = pair.into_pair()?;
                Ok(preview(whole)?.map_left(|miss| Value::pair(rest, miss)))
            }),
            Arc::new(move |focus, pair| {
                let (rest, whole) = pair.into_pair()?;
                Ok(Value::pair(rest, set(focus, whole)?))
            }),
        )
    }
}

impl Cocartesian for Affine {
    fn left(self) -> Self {
        let preview = self.preview;
        let set = self.set;
        Self::from_parts(
            Arc::new(move |whole: Value| match whole.into_either()? {
                Either::Left(inner) => Ok(preview(inner)?.map_left(Value::left)),
                Either::Right(other) => Ok(Either::Left(Value::right(other))),
            }),
            Arc::new(move |focus, whole: Value| match whole.into_either()? {
                Either::Left(inner) => Ok(Value::left(set(focus, inner)?)),
                Either::Right(other) => Ok(Value::right(other)),
            }),
        )
    }

    fn right(self) -> Self {
        let preview = self.preview;
        let set = self.set;
        Self::from_parts(
            Arc::new(move |whole: Value| match whole.into_either()? {
                Either::Left(other) => Ok(Either::Left(Value::left(other))),
                Either::Right(inner) => Ok(preview(inner)?.map_left(Value::right)),
            }),
            Arc::new(move |focus, whole: Value| match whole.into_either()? {
                Either::Left(other) => Ok(Value::left(other)),
                Either::Right(inner) => Ok(Value::right(set(focus, inner)?)),
            }),
        )
    }
}

impl Representation for Affine {
    const KIND: RepresentationKind = RepresentationKind::Affine;

    fn cartesian() -> Option<CartesianOps<Self>> {
        Some(CartesianOps::of())
    }

    fn cocartesian() -> Option<CocartesianOps<Self>> {
        Some(CocartesianOps::of())
    }
}

impl fmt::Debug for Affine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Affine").finish_non_exhaustive()
    }
}
