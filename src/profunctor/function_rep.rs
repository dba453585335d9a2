//! The plain-function representation.

use super::capability::{Cartesian, Closed, Cocartesian, Profunctor, Wander};
use super::representation::{
    CartesianOps, ClosedOps, CocartesianOps, Representation, RepresentationKind, WanderOps,
};
use crate::control::Either;
use crate::error::EvalResult;
use crate::optics::Traversal;
use crate::types::{Function, Value};

/// `P a b = a -> b`.
///
/// Interpreting an optic against `FunctionRep(f)` yields the function that
/// modifies every focus with `f`; this is the representation frozen into
/// [`Term::ProfunctorTransformer`](crate::point_free::Term::ProfunctorTransformer).
///
/// # Examples
///
/// ```rust
/// use datafix::profunctor::{Cartesian, FunctionRep};
/// use datafix::types::{Function, Value};
///
/// let negate = FunctionRep(Function::new(|value| Ok(Value::Bool(!value.as_bool()?))));
/// let on_first = negate.first();
///
/// let pair = Value::pair(Value::Bool(true), Value::Int(1));
/// assert_eq!(
///     on_first.0.apply(pair),
///     Ok(Value::pair(Value::Bool(false), Value::Int(1)))
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionRep(pub Function);

impl FunctionRep {
    /// The identity transformer.
    #[must_use]
    pub fn identity() -> Self {
        Self(Function::identity())
    }

    /// Runs the wrapped function.
    ///
    /// # Errors
    ///
    /// Returns whatever the wrapped function returns.
    pub fn apply(&self, value: Value) -> EvalResult<Value> {
        self.0.apply(value)
    }
}

impl Profunctor for FunctionRep {
    fn dimap(self, pre: Function, post: Function) -> Self {
        Self(pre.and_then(&self.0).and_then(&post))
    }
}

impl Cartesian for FunctionRep {
    fn first(self) -> Self {
        let function = self.0;
        Self(Function::new(move |value| {
            let (focus, rest) = value.into_pair()?;
            Ok(Value::pair(function.apply(focus)?, rest))
        }))
    }

    fn second(self) -> Self {
        let function = self.0;
        Self(Function::new(move |value| {
            let (rest, focus) = value.into_pair()?;
            Ok(Value::pair(rest, function.apply(focus)?))
        }))
    }
}

impl Cocartesian for FunctionRep {
    fn left(self) -> Self {
        let function = self.0;
        Self(Function::new(move |value| match value.into_either()? {
            Either::Left(focus) => Ok(Value::left(function.apply(focus)?)),
            Either::Right(rest) => Ok(Value::right(rest)),
        }))
    }

    fn right(self) -> Self {
        let function = self.0;
        Self(Function::new(move |value| match value.into_either()? {
            Either::Left(rest) => Ok(Value::left(rest)),
            Either::Right(focus) => Ok(Value::right(function.apply(focus)?)),
        }))
    }
}

impl Closed for FunctionRep {
    fn closed(self) -> Self {
        let function = self.0;
        Self(Function::new(move |value| {
            let inner = value.into_function()?;
            Ok(Value::Function(inner.and_then(&function)))
        }))
    }
}

impl Wander for FunctionRep {
    fn wander(self, traversal: &Traversal) -> Self {
        let function = self.0;
        let traversal = traversal.clone();
        Self(Function::new(move |value| {
            let focus = traversal.focus(value)?;
            let mapped = focus
                .foci()
                .iter()
                .cloned()
                .map(|element| function.apply(element))
                .collect::<EvalResult<Vec<_>>>()?;
            focus.rebuild(mapped)
        }))
    }
}

impl Representation for FunctionRep {
    const KIND: RepresentationKind = RepresentationKind::Function;

    fn cartesian() -> Option<CartesianOps<Self>> {
        Some(CartesianOps::of())
    }

    fn cocartesian() -> Option<CocartesianOps<Self>> {
        Some(CocartesianOps::of())
    }

    fn closed() -> Option<ClosedOps<Self>> {
        Some(ClosedOps::of())
    }

    fn wander() -> Option<WanderOps<Self>> {
        Some(WanderOps::of())
    }
}
