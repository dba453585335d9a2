//! # datafix
//!
//! Typed optics, a point-free transformation IR and an algebraic rewriter,
//! for migrating structured records across schema versions.
//!
//! ## Overview
//!
//! - **Optics**: Adapter, Lens, Prism, Affine, Getter and Traversal, composed
//!   into inspectable chains and interpreted against profunctor
//!   representations
//! - **Point-free IR**: transformations as data (`Id`, `Bang`, `Apply`,
//!   `Comp`, primitives, frozen optics, `In`/`Out` and `Fold`), with
//!   memoized evaluation
//! - **Rewriting**: strategy combinators and a catalog of simplification and
//!   fusion rules, including fusion of nested catamorphisms
//! - **Recursive families**: mutually recursive type groups and their folds
//!
//! ## Feature Flags
//!
//! - `fxhash` (default): the fold and rewrite caches hash with `FxHasher`
//! - `serde`: serialization for type descriptors and index sets
//! - `full`: everything
//!
//! ## Example
//!
//! ```rust
//! use datafix::prelude::*;
//!
//! // Modify the first component of a pair, then optimize the term.
//! let negate = PointFree::lift("negate", Type::Int, Type::Int, |value| {
//!     Ok(Value::Int(-value.as_int()?))
//! });
//! let first = standard::proj1(Type::Int, Type::Str);
//! let term = PointFree::over(first, PointFree::id(Type::Int)).unwrap();
//! let term = PointFree::comp(term, PointFree::over(standard::proj1(Type::Int, Type::Str), negate).unwrap()).unwrap();
//!
//! let optimized = Optimizer::standard().optimize(&term);
//! assert!(optimized.to_string().len() <= term.to_string().len());
//!
//! let pair = Value::pair(Value::Int(3), Value::string("x"));
//! assert_eq!(
//!     optimized.call(&no_backend(), pair),
//!     Ok(Value::pair(Value::Int(-3), Value::string("x")))
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

use std::hash::BuildHasherDefault;

use static_assertions::assert_impl_all;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use datafix::prelude::*;
/// ```
pub mod prelude {
    pub use crate::control::Either;
    pub use crate::error::{EvalError, EvalResult, SchemaError, SchemaResult};
    pub use crate::family::{
        Algebra, Fold, FoldCache, FoldMap, IndexSet, RecursiveTypeFamily, RewriteResult,
    };
    pub use crate::optics::{
        Adapter, Affine, Element, Getter, Lens, Optic, Prism, Signature, Traversal, standard,
    };
    pub use crate::point_free::{PointFree, Term};
    pub use crate::profunctor::{Capabilities, FunctionRep, Representation};
    pub use crate::rewrite::{Optimizer, PointFreeRule, Rule};
    pub use crate::types::{BackendHandle, Function, Type, Value, no_backend};
}

pub mod control;
pub mod error;
pub mod family;
pub mod optics;
pub mod point_free;
pub mod profunctor;
pub mod rewrite;
pub mod types;

#[cfg(feature = "fxhash")]
type CacheHasher = rustc_hash::FxHasher;

#[cfg(not(feature = "fxhash"))]
type CacheHasher = std::collections::hash_map::DefaultHasher;

/// The map behind every append-only cache in the crate.
pub(crate) type CacheMap<K, V> =
    std::collections::HashMap<K, V, BuildHasherDefault<CacheHasher>>;

assert_impl_all!(optics::Optic: Send, Sync);
assert_impl_all!(point_free::PointFree: Send, Sync);
assert_impl_all!(family::Algebra: Send, Sync);
assert_impl_all!(family::RecursiveTypeFamily: Send, Sync);
assert_impl_all!(family::FoldCache: Send, Sync);
assert_impl_all!(rewrite::Optimizer: Send, Sync);
