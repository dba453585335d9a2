//! Lens: exactly one focus inside a product-like whole.
//!
//! # Laws
//!
//! Every lens must satisfy:
//!
//! 1. **PutGet**: `view(update(b, s)) == b`
//! 2. **GetPut**: `update(view(s), s) == s`
//! 3. **PutPut**: `update(b2, update(b1, s)) == update(b2, s)`
//!
//! # Examples
//!
//! ```
//! use datafix::optics::Lens;
//! use datafix::types::Value;
//!
//! let first = Lens::new(
//!     |whole| Ok(whole.into_pair()?.0),
//!     |focus, whole| Ok(Value::pair(focus, whole.into_pair()?.1)),
//! );
//!
//! let pair = Value::pair(Value::Int(1), Value::Int(2));
//! assert_eq!(first.view(pair.clone()), Ok(Value::Int(1)));
//! assert_eq!(
//!     first.update(Value::Int(9), pair),
//!     Ok(Value::pair(Value::Int(9), Value::Int(2)))
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use super::Update;
use crate::error::{EvalResult, SchemaResult};
use crate::profunctor::{
    Capabilities, Cartesian, CartesianOps, Profunctor, Representation, RepresentationKind,
    witness,
};
use crate::types::{Function, Value};

/// A lens built from `view: S -> A` and `update: (B, S) -> T`.
///
/// Interpreting a lens needs [`Cartesian`]. A `Lens` is also its own
/// representation: `first` and `dimap` are defined from `view` and `update`
/// alone, which is what [`Optic::to_lens`](super::Optic::to_lens) relies on.
#[derive(Clone)]
pub struct Lens {
    view: Function,
    update: Update,
}

impl Lens {
    /// Creates a lens from a view and an update closure.
    pub fn new<V, U>(view: V, update: U) -> Self
    where
        V: Fn(Value) -> EvalResult<Value> + Send + Sync + 'static,
        U: Fn(Value, Value) -> EvalResult<Value> + Send + Sync + 'static,
    {
        Self::from_parts(Function::new(view), Arc::new(update))
    }

    /// Creates a lens from already shared parts.
    #[must_use]
    pub const fn from_parts(view: Function, update: Update) -> Self {
        Self { view, update }
    }

    /// The lens whose focus is the whole.
    #[must_use]
    pub fn identity() -> Self {
        Self::from_parts(Function::identity(), Arc::new(|focus, _| Ok(focus)))
    }

    /// Reads the focus.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn view(&self, whole: Value) -> EvalResult<Value> {
        self.view.apply(whole)
    }

    /// Replaces the focus.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn update(&self, focus: Value, whole: Value) -> EvalResult<Value> {
        (self.update)(focus, whole)
    }

    /// Replaces the focus with `function` applied to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape or
    /// `function` fails.
    pub fn modify(&self, whole: Value, function: &Function) -> EvalResult<Value> {
        let focus = self.view(whole.clone())?;
        self.update(function.apply(focus)?, whole)
    }

    /// Interprets this lens against `representation`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingCapability`](crate::error::SchemaError)
    /// if `P` is not [`Cartesian`].
    pub fn eval<P: Representation>(&self, representation: P) -> SchemaResult<P> {
        let ops = witness::<P, _>(P::cartesian(), "lens", Capabilities::CARTESIAN)?;
        let view = self.view.clone();
        let update = Arc::clone(&self.update);
        let pre = Function::new(move |whole: Value| Ok(Value::pair(view.apply(whole.clone())?, whole)));
        let post = Function::new(move |pair: Value| {
            let (focus, whole) = pair.into_pair()?;
            update(focus, whole)
        });
        Ok((ops.first)(representation).dimap(pre, post))
    }
}

impl Profunctor for Lens {
    fn dimap(self, pre: Function, post: Function) -> Self {
        let view = pre.and_then(&self.view);
        let update = self.update;
        Self::from_parts(
            view,
            Arc::new(move |focus, whole| post.apply(update(focus, pre.apply(whole)?)?)),
        )
    }
}

impl Cartesian for Lens {
    fn first(self) -> Self {
        let view = self.view;
        let update = self.update;
        Self::from_parts(
            Function::new(move |pair| view.apply(pair.into_pair()?.0)),
            Arc::new(move |focus, pair| {
                let (whole, rest) = pair.into_pair()?;
                Ok(Value::pair(update(focus, whole)?, rest))
            }),
        )
    }

    fn second(self) -> Self {
        let view = self.view;
        let update = self.update;
        Self::from_parts(
            Function::new(move |pair| view.apply(pair.into_pair()?.1)),
            Arc::new(move |focus, pair| {
                let (rest, whole) = pair.into_pair()?;
                Ok(Value::pair(rest, update(focus, whole)?))
            }),
        )
    }
}

impl Representation for Lens {
    const KIND: RepresentationKind = RepresentationKind::Lens;

    fn cartesian() -> Option<CartesianOps<Self>> {
        Some(CartesianOps::of())
    }
}

impl fmt::Debug for Lens {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Lens").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn second() -> Lens {
        Lens::new(
            |whole| Ok(whole.into_pair()?.1),
            |focus, whole| Ok(Value::pair(whole.into_pair()?.0, focus)),
        )
    }

    #[rstest]
    fn test_identity_lens() {
        let lens = Lens::identity();

        assert_eq!(lens.view(Value::Int(3)), Ok(Value::Int(3)));
        assert_eq!(lens.update(Value::Int(4), Value::Int(3)), Ok(Value::Int(4)));
    }

    #[rstest]
    fn test_first_keeps_companion() {
        let lifted = second().first();
        let whole = Value::pair(
            Value::pair(Value::Int(1), Value::Int(2)),
            Value::string("rest"),
        );

        assert_eq!(lifted.view(whole.clone()), Ok(Value::Int(2)));
        assert_eq!(
            lifted.update(Value::Int(7), whole),
            Ok(Value::pair(
                Value::pair(Value::Int(1), Value::Int(7)),
                Value::string("rest")
            ))
        );
    }

    #[rstest]
    fn test_modify() {
        let increment = Function::new(|value| Ok(Value::Int(value.as_int()? + 1)));
        let whole = Value::pair(Value::Unit, Value::Int(1));

        assert_eq!(
            second().modify(whole, &increment),
            Ok(Value::pair(Value::Unit, Value::Int(2)))
        );
    }
}
