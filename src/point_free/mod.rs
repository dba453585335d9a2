//! The point-free expression IR.
//!
//! A [`PointFree`] term denotes "given a backend, a value of its type";
//! function-typed terms denote functions. Terms are immutable and compared
//! structurally, so rewrite rules can match on them and caches can key on
//! them. Each term memoizes its compiled evaluator: the first evaluation
//! builds a closure tree, later ones reuse it.
//!
//! # Example
//!
//! ```rust
//! use datafix::point_free::PointFree;
//! use datafix::types::{Type, Value, no_backend};
//!
//! let double = PointFree::lift("double", Type::Int, Type::Int, |value| {
//!     Ok(Value::Int(value.as_int()? * 2))
//! });
//! let term = PointFree::comp(double.clone(), PointFree::id(Type::Int)).unwrap();
//!
//! // The identity is dropped at construction.
//! assert_eq!(term, double);
//! assert_eq!(term.call(&no_backend(), Value::Int(21)), Ok(Value::Int(42)));
//! ```

use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::error::EvalResult;
use crate::types::{BackendHandle, Type, Value};

mod constructors;
mod evaluate;
mod printer;
mod term;
mod traverse;

pub use term::{Primitive, PrimitiveBody, Term};

/// A compiled term: produces the term's value from a backend.
pub type Evaluator = Arc<dyn Fn(&BackendHandle) -> EvalResult<Value> + Send + Sync>;

/// An immutable, shareable point-free term.
#[derive(Clone)]
pub struct PointFree(Arc<Node>);

struct Node {
    term: Term,
    ty: Type,
    hash: u64,
    evaluator: OnceLock<Evaluator>,
}

impl PointFree {
    /// Wraps a term whose type has already been checked.
    pub(crate) fn from_parts(term: Term, ty: Type) -> Self {
        let hash = std::hash::BuildHasherDefault::<crate::CacheHasher>::default().hash_one(&term);
        Self(Arc::new(Node {
            term,
            ty,
            hash,
            evaluator: OnceLock::new(),
        }))
    }

    /// The node.
    #[must_use]
    pub fn term(&self) -> &Term {
        &self.0.term
    }

    /// The term's type.
    #[must_use]
    pub fn ty(&self) -> &Type {
        &self.0.ty
    }

    /// Input and output types, for function-typed terms.
    #[must_use]
    pub fn signature(&self) -> Option<(&Type, &Type)> {
        self.ty().as_function()
    }

    /// Returns `true` for an `Id` node.
    #[must_use]
    pub fn is_id(&self) -> bool {
        matches!(self.term(), Term::Id(_))
    }

    /// Returns `true` for an `In` node.
    #[must_use]
    pub fn is_roll(&self) -> bool {
        matches!(self.term(), Term::In(_))
    }

    /// Returns `true` if both handles share one node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The compiled evaluator, built on first use.
    ///
    /// Concurrent first calls wait for a single compilation.
    #[must_use]
    pub fn evaluator(&self) -> Evaluator {
        Arc::clone(self.0.evaluator.get_or_init(|| evaluate::compile(self)))
    }

    /// Evaluates the term against `backend`.
    ///
    /// # Errors
    ///
    /// Returns whatever evaluation fails with.
    pub fn evaluate(&self, backend: &BackendHandle) -> EvalResult<Value> {
        (self.evaluator())(backend)
    }

    /// Evaluates a function-typed term and applies it to `value`.
    ///
    /// # Errors
    ///
    /// Returns whatever evaluation fails with, or
    /// [`EvalError::UnexpectedValue`](crate::error::EvalError) if the term
    /// does not evaluate to a function.
    pub fn call(&self, backend: &BackendHandle, value: Value) -> EvalResult<Value> {
        self.evaluate(backend)?.into_function()?.apply(value)
    }
}

impl PartialEq for PointFree {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.0.hash == other.0.hash && self.0.ty == other.0.ty && self.0.term == other.0.term)
    }
}

impl Eq for PointFree {}

impl Hash for PointFree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl fmt::Display for PointFree {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.to_string_at(0))
    }
}

impl fmt::Debug for PointFree {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "PointFree({} : {})", self.to_string_at(0), self.ty())
    }
}
