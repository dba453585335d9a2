//! Prism: zero or one focus, selected by a sum case.
//!
//! # Laws
//!
//! 1. **MatchBuild**: `matching(build(b)) == Right(b)`
//! 2. **BuildMatch**: if `matching(s) == Right(a)` then `build(a) == s`
//!
//! # Examples
//!
//! ```
//! use datafix::optics::Prism;
//! use datafix::types::Value;
//!
//! let right = Prism::new(
//!     |whole| Ok(whole.into_either()?.map_left(Value::left)),
//!     |focus| Ok(Value::right(focus)),
//! );
//!
//! assert_eq!(right.preview(Value::right(Value::Int(1))), Ok(Some(Value::Int(1))));
//! assert_eq!(right.preview(Value::left(Value::Unit)), Ok(None));
//! assert_eq!(right.build(Value::Int(2)), Ok(Value::right(Value::Int(2))));
//! ```

use std::fmt;
use std::sync::Arc;

use super::Matcher;
use crate::control::Either;
use crate::error::{EvalResult, SchemaResult};
use crate::profunctor::{
    Capabilities, Cocartesian, CocartesianOps, Profunctor, Representation, RepresentationKind,
    witness,
};
use crate::types::{Function, Value};

/// A prism built from `match: S -> Either<T, A>` and `build: B -> T`.
///
/// Interpreting a prism needs [`Cocartesian`].
#[derive(Clone)]
pub struct Prism {
    matcher: Matcher,
    build: Function,
}

impl Prism {
    /// Creates a prism from a matcher and a builder.
    pub fn new<M, B>(matcher: M, build: B) -> Self
    where
        M: Fn(Value) -> EvalResult<Either<Value, Value>> + Send + Sync + 'static,
        B: Fn(Value) -> EvalResult<Value> + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(matcher), Function::new(build))
    }

    /// Creates a prism from already shared parts.
    #[must_use]
    pub const fn from_parts(matcher: Matcher, build: Function) -> Self {
        Self { matcher, build }
    }

    /// The prism that always matches.
    #[must_use]
    pub fn identity() -> Self {
        Self::from_parts(Arc::new(|whole| Ok(Either::Right(whole))), Function::identity())
    }

    /// Matches the whole: `Right(focus)` when present, `Left(whole)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn matching(&self, whole: Value) -> EvalResult<Either<Value, Value>> {
        (self.matcher)(whole)
    }

    /// Reads the focus if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn preview(&self, whole: Value) -> EvalResult<Option<Value>> {
        Ok(self.matching(whole)?.right())
    }

    /// Builds a whole from a focus.
    ///
    /// # Errors
    ///
    /// Returns whatever the builder returns.
    pub fn build(&self, focus: Value) -> EvalResult<Value> {
        self.build.apply(focus)
    }

    /// Interprets this prism against `representation`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingCapability`](crate::error::SchemaError)
    /// if `P` is not [`Cocartesian`].
    pub fn eval<P: Representation>(&self, representation: P) -> SchemaResult<P> {
        let ops = witness::<P, _>(P::cocartesian(), "prism", Capabilities::COCARTESIAN)?;
        let matcher = Arc::clone(&self.matcher);
        let build = self.build.clone();
        let pre = Function::new(move |whole| Ok(Value::from_either(matcher(whole)?)));
        let post = Function::new(move |either: Value| match either.into_either()? {
            Either::Left(whole) => Ok(whole),
            Either::Right(focus) => build.apply(focus),
        });
        Ok((ops.right)(representation).dimap(pre, post))
    }
}

impl Profunctor for Prism {
    fn dimap(self, pre: Function, post: Function) -> Self {
        let matcher = self.matcher;
        let rebuild = post.clone();
        Self::from_parts(
            Arc::new(move |whole| matcher(pre.apply(whole)?)?.try_map_left(|miss| rebuild.apply(miss))),
            self.build.and_then(&post),
        )
    }
}

impl Cocartesian for Prism {
    fn left(self) -> Self {
        let matcher = self.matcher;
        let build = self.build;
        Self::from_parts(
            Arc::new(move |whole: Value| match whole.into_either()? {
                Either::Left(inner) => Ok(matcher(inner)?.map_left(Value::left)),
                Either::Right(other) => Ok(Either::Left(Value::right(other))),
            }),
            Function::new(move |focus| Ok(Value::left(build.apply(focus)?))),
        )
    }

    fn right(self) -> Self {
        let matcher = self.matcher;
        let build = self.build;
        Self::from_parts(
            Arc::new(move |whole: Value| match whole.into_either()? {
                Either::Left(other) => Ok(Either::Left(Value::left(other))),
                Either::Right(inner) => Ok(matcher(inner)?.map_left(Value::right)),
            }),
            Function::new(move |focus| Ok(Value::right(build.apply(focus)?))),
        )
    }
}

impl Representation for Prism {
    const KIND: RepresentationKind = RepresentationKind::Prism;

    fn cocartesian() -> Option<CocartesianOps<Self>> {
        Some(CocartesianOps::of())
    }
}

impl fmt::Debug for Prism {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Prism").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn even() -> Prism {
        Prism::new(
            |whole| {
                let number = whole.as_int()?;
                Ok(if number % 2 == 0 {
                    Either::Right(Value::Int(number / 2))
                } else {
                    Either::Left(whole)
                })
            },
            |half| Ok(Value::Int(half.as_int()? * 2)),
        )
    }

    #[rstest]
    #[case(Value::Int(4), Some(Value::Int(2)))]
    #[case(Value::Int(3), None)]
    fn test_preview(#[case] whole: Value, #[case] expected: Option<Value>) {
        assert_eq!(even().preview(whole), Ok(expected));
    }

    #[rstest]
    fn test_right_passes_other_case_through() {
        let lifted = even().right();

        assert_eq!(
            lifted.matching(Value::left(Value::string("x"))),
            Ok(Either::Left(Value::left(Value::string("x"))))
        );
        assert_eq!(
            lifted.matching(Value::right(Value::Int(3))),
            Ok(Either::Left(Value::right(Value::Int(3))))
        );
        assert_eq!(lifted.build(Value::Int(5)), Ok(Value::right(Value::Int(10))));
    }

    #[rstest]
    fn test_build_match_law() {
        let prism = even();
        let focus = prism.preview(Value::Int(8)).unwrap().unwrap();

        assert_eq!(prism.build(focus), Ok(Value::Int(8)));
    }
}
