//! Adapter: an isomorphism between the whole and the focus.

use std::fmt;

use crate::error::{EvalResult, SchemaResult};
use crate::profunctor::{Profunctor, Representation, RepresentationKind};
use crate::types::{Function, Value};

/// An adapter converts the whole into the focus (`from: S -> A`) and a new
/// focus back into a whole (`to: B -> T`).
///
/// It needs nothing beyond [`Profunctor`] to be interpreted.
///
/// # Laws
///
/// 1. `to(from(s)) == s`
/// 2. `from(to(b)) == b`
#[derive(Clone)]
pub struct Adapter {
    from: Function,
    to: Function,
}

impl Adapter {
    /// Creates an adapter from its two conversions.
    #[must_use]
    pub const fn new(from: Function, to: Function) -> Self {
        Self { from, to }
    }

    /// The adapter that converts nothing.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Function::identity(), Function::identity())
    }

    /// Converts a whole into its focus.
    ///
    /// # Errors
    ///
    /// Returns whatever the conversion returns.
    pub fn from(&self, whole: Value) -> EvalResult<Value> {
        self.from.apply(whole)
    }

    /// Converts a focus back into a whole.
    ///
    /// # Errors
    ///
    /// Returns whatever the conversion returns.
    pub fn to(&self, focus: Value) -> EvalResult<Value> {
        self.to.apply(focus)
    }

    /// Interprets this adapter against `representation`.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the other shapes.
    pub fn eval<P: Representation>(&self, representation: P) -> SchemaResult<P> {
        Ok(representation.dimap(self.from.clone(), self.to.clone()))
    }
}

impl Profunctor for Adapter {
    fn dimap(self, pre: Function, post: Function) -> Self {
        Self::new(pre.and_then(&self.from), self.to.and_then(&post))
    }
}

impl Representation for Adapter {
    const KIND: RepresentationKind = RepresentationKind::Adapter;
}

impl fmt::Debug for Adapter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Adapter").finish_non_exhaustive()
    }
}
