//! Traversal: zero or more foci.
//!
//! A traversal splits a whole into its foci plus a way to rebuild it from
//! replacement foci. Running an effect over the foci (collecting them,
//! rewriting them all, or rewriting them under `Option`/`Result`) is then a
//! matter of what happens between the split and the rebuild; every
//! representation that implements [`Wander`] is a specialization of this.
//!
//! # Examples
//!
//! ```
//! use datafix::optics::Traversal;
//! use datafix::types::{Function, Value};
//!
//! let elements = Traversal::elements();
//! let list = Value::from_iter([Value::Int(1), Value::Int(2)]);
//!
//! assert_eq!(elements.to_list(list.clone()), Ok(vec![Value::Int(1), Value::Int(2)]));
//!
//! let double = Function::new(|value| Ok(Value::Int(value.as_int()? * 2)));
//! assert_eq!(
//!     elements.modify_all(list, &double),
//!     Ok(Value::from_iter([Value::Int(2), Value::Int(4)]))
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use crate::control::Either;
use crate::error::{EvalError, EvalResult, SchemaResult};
use crate::profunctor::{
    Capabilities, Cartesian, CartesianOps, Cocartesian, CocartesianOps, Profunctor,
    Representation, RepresentationKind, Wander, WanderOps, witness,
};
use crate::types::{Function, Value};

type Rebuild = Arc<dyn Fn(Vec<Value>) -> EvalResult<Value> + Send + Sync>;
type Split = Arc<dyn Fn(Value) -> EvalResult<Focus> + Send + Sync>;

/// The foci of one whole, together with the way to put replacements back.
#[derive(Clone)]
pub struct Focus {
    foci: Vec<Value>,
    rebuild: Rebuild,
}

impl Focus {
    /// Creates a focus set.
    ///
    /// `rebuild` is only ever called with exactly `foci.len()` values.
    pub fn new<R>(foci: Vec<Value>, rebuild: R) -> Self
    where
        R: Fn(Vec<Value>) -> EvalResult<Value> + Send + Sync + 'static,
    {
        Self {
            foci,
            rebuild: Arc::new(rebuild),
        }
    }

    /// Exactly one focus: the value itself.
    #[must_use]
    pub fn single(value: Value) -> Self {
        Self::new(vec![value], |mut values| {
            values.pop().ok_or(EvalError::FocusCount {
                expected: 1,
                found: 0,
            })
        })
    }

    /// No focus: rebuilding always yields `whole`.
    #[must_use]
    pub fn empty(whole: Value) -> Self {
        Self::new(Vec::new(), move |_| Ok(whole.clone()))
    }

    /// The current foci, in traversal order.
    #[must_use]
    pub fn foci(&self) -> &[Value] {
        &self.foci
    }

    /// Number of foci.
    #[must_use]
    pub fn len(&self) -> usize {
        self.foci.len()
    }

    /// Returns `true` if there is nothing to focus on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foci.is_empty()
    }

    /// Consumes the focus set, returning the foci.
    #[must_use]
    pub fn into_foci(self) -> Vec<Value> {
        self.foci
    }

    /// Rebuilds the whole from replacement foci.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::FocusCount`] if `values` does not hold exactly one
    /// replacement per focus.
    pub fn rebuild(&self, values: Vec<Value>) -> EvalResult<Value> {
        if values.len() != self.foci.len() {
            return Err(EvalError::FocusCount {
                expected: self.foci.len(),
                found: values.len(),
            });
        }
        (self.rebuild)(values)
    }

    fn map_rebuild<F>(self, post: F) -> Self
    where
        F: Fn(Value) -> EvalResult<Value> + Send + Sync + 'static,
    {
        let rebuild = self.rebuild;
        Self {
            foci: self.foci,
            rebuild: Arc::new(move |values| post(rebuild(values)?)),
        }
    }
}

impl fmt::Debug for Focus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Focus")
            .field("foci", &self.foci)
            .finish_non_exhaustive()
    }
}

/// A traversal built from `focus: S -> Focus`.
///
/// Interpreting a traversal needs [`Wander`].
#[derive(Clone)]
pub struct Traversal {
    split: Split,
}

impl Traversal {
    /// Creates a traversal from its split function.
    pub fn new<F>(split: F) -> Self
    where
        F: Fn(Value) -> EvalResult<Focus> + Send + Sync + 'static,
    {
        Self {
            split: Arc::new(split),
        }
    }

    /// The traversal with the whole as its single focus.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|whole| Ok(Focus::single(whole)))
    }

    /// The traversal over every element of a list.
    #[must_use]
    pub fn elements() -> Self {
        Self::new(|whole| Ok(Focus::new(whole.into_list()?, |values| Ok(Value::List(values)))))
    }

    /// Splits a whole into its foci.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn focus(&self, whole: Value) -> EvalResult<Focus> {
        (self.split)(whole)
    }

    /// Collects every focus.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn to_list(&self, whole: Value) -> EvalResult<Vec<Value>> {
        Ok(self.focus(whole)?.into_foci())
    }

    /// Replaces every focus with `function` applied to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape or
    /// `function` fails.
    pub fn modify_all(&self, whole: Value, function: &Function) -> EvalResult<Value> {
        let focus = self.focus(whole)?;
        let values = focus
            .foci()
            .iter()
            .cloned()
            .map(|value| function.apply(value))
            .collect::<EvalResult<Vec<_>>>()?;
        focus.rebuild(values)
    }

    /// Replaces every focus, or returns `None` as soon as `function` does.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn traverse_option<F>(&self, whole: Value, function: F) -> EvalResult<Option<Value>>
    where
        F: Fn(Value) -> Option<Value>,
    {
        let focus = self.focus(whole)?;
        let Some(values) = focus
            .foci()
            .iter()
            .cloned()
            .map(function)
            .collect::<Option<Vec<_>>>()
        else {
            return Ok(None);
        };
        focus.rebuild(values).map(Some)
    }

    /// Replaces every focus, or returns the first error `function` reports.
    ///
    /// The outer result carries structural failures; the inner one carries
    /// the caller's error.
    ///
    /// # Errors
    ///
    /// Returns an error if the whole does not have the expected shape.
    pub fn traverse_result<E, F>(&self, whole: Value, function: F) -> EvalResult<Result<Value, E>>
    where
        F: Fn(Value) -> Result<Value, E>,
    {
        let focus = self.focus(whole)?;
        match focus
            .foci()
            .iter()
            .cloned()
            .map(function)
            .collect::<Result<Vec<_>, E>>()
        {
            Ok(values) => focus.rebuild(values).map(Ok),
            Err(error) => Ok(Err(error)),
        }
    }

    /// Interprets this traversal against `representation`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingCapability`](crate::error::SchemaError)
    /// if `P` is not [`Wander`].
    pub fn eval<P: Representation>(&self, representation: P) -> SchemaResult<P> {
        let ops = witness::<P, _>(P::wander(), "traversal", Capabilities::TRAVERSAL)?;
        Ok((ops.wander)(representation, self))
    }
}

impl Profunctor for Traversal {
    fn dimap(self, pre: Function, post: Function) -> Self {
        let split = self.split;
        Self::new(move |whole| {
            let post = post.clone();
            Ok(split(pre.apply(whole)?)?.map_rebuild(move |value| post.apply(value)))
        })
    }
}

impl Cartesian for Traversal {
    fn first(self) -> Self {
        let split = self.split;
        Self::new(move |pair| {
            let (whole, rest) = pair.into_pair()?;
            Ok(split(whole)?.map_rebuild(move |rebuilt| Ok(Value::pair(rebuilt, rest.clone()))))
        })
    }

    fn second(self) -> Self {
        let split = self.split;
        Self::new(move |pair| {
            let (rest, whole) = pair.into_pair()?;
            Ok(split(whole)?.map_rebuild(move |rebuilt| Ok(Value::pair(rest.clone(), rebuilt))))
        })
    }
}

impl Cocartesian for Traversal {
    fn left(self) -> Self {
        let split = self.split;
        Self::new(move |whole| match whole.into_either()? {
            Either::Left(inner) => Ok(split(inner)?.map_rebuild(|rebuilt| Ok(Value::left(rebuilt)))),
            Either::Right(other) => Ok(Focus::empty(Value::right(other))),
        })
    }

    fn right(self) -> Self {
        let split = self.split;
        Self::new(move |whole| match whole.into_either()? {
            Either::Left(other) => Ok(Focus::empty(Value::left(other))),
            Either::Right(inner) => {
                Ok(split(inner)?.map_rebuild(|rebuilt| Ok(Value::right(rebuilt))))
            }
        })
    }
}

impl Wander for Traversal {
    fn wander(self, outer: &Traversal) -> Self {
        let inner = self.split;
        let outer = outer.clone();
        Self::new(move |whole| {
            let outer_focus = outer.focus(whole)?;
            let inner_foci = outer_focus
                .foci()
                .iter()
                .cloned()
                .map(|value| inner(value))
                .collect::<EvalResult<Vec<Focus>>>()?;
            let foci = inner_foci
                .iter()
                .flat_map(|focus| focus.foci().iter().cloned())
                .collect();
            Ok(Focus::new(foci, move |values| {
                let mut values = values.into_iter();
                let rebuilt = inner_foci
                    .iter()
                    .map(|focus| focus.rebuild(values.by_ref().take(focus.len()).collect()))
                    .collect::<EvalResult<Vec<_>>>()?;
                outer_focus.rebuild(rebuilt)
            }))
        })
    }
}

impl Representation for Traversal {
    const KIND: RepresentationKind = RepresentationKind::Traversal;

    fn cartesian() -> Option<CartesianOps<Self>> {
        Some(CartesianOps::of())
    }

    fn cocartesian() -> Option<CocartesianOps<Self>> {
        Some(CocartesianOps::of())
    }

    fn wander() -> Option<WanderOps<Self>> {
        Some(WanderOps::of())
    }
}

impl fmt::Debug for Traversal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Traversal").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn list(values: &[i64]) -> Value {
        values.iter().copied().map(Value::Int).collect()
    }

    #[rstest]
    fn test_rebuild_checks_focus_count() {
        let focus = Traversal::elements().focus(list(&[1, 2])).unwrap();

        assert_eq!(
            focus.rebuild(vec![Value::Int(1)]),
            Err(EvalError::FocusCount {
                expected: 2,
                found: 1,
            })
        );
    }

    #[rstest]
    fn test_wander_flattens_nested_lists() {
        let nested = Traversal::elements().wander(&Traversal::elements());
        let whole = Value::from_iter([list(&[1, 2]), list(&[]), list(&[3])]);

        assert_eq!(nested.to_list(whole.clone()), Ok(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));

        let negate = Function::new(|value| Ok(Value::Int(-value.as_int()?)));
        assert_eq!(
            nested.modify_all(whole, &negate),
            Ok(Value::from_iter([list(&[-1, -2]), list(&[]), list(&[-3])]))
        );
    }

    #[rstest]
    fn test_right_of_left_case_has_no_focus() {
        let traversal = Traversal::identity().right();

        assert_eq!(traversal.to_list(Value::left(Value::Unit)), Ok(Vec::new()));
        assert_eq!(traversal.to_list(Value::right(Value::Int(1))), Ok(vec![Value::Int(1)]));
    }

    #[rstest]
    #[case(&[1, 2, 3], Some(list(&[2, 3, 4])))]
    #[case(&[1, -2, 3], None)]
    fn test_traverse_option(#[case] input: &[i64], #[case] expected: Option<Value>) {
        let positive_increment = |value: Value| match value {
            Value::Int(number) if number > 0 => Some(Value::Int(number + 1)),
            _ => None,
        };

        assert_eq!(
            Traversal::elements().traverse_option(list(input), positive_increment),
            Ok(expected)
        );
    }

    #[rstest]
    fn test_traverse_result_reports_first_error() {
        let result = Traversal::elements().traverse_result(list(&[1, 2, 3]), |value| match value {
            Value::Int(2) => Err("two"),
            other => Ok(other),
        });

        assert_eq!(result, Ok(Err("two")));
    }
}
