//! Optics: composable, typed accessors between a whole and its focus.
//!
//! # Shapes
//!
//! ```text
//! Adapter <: Lens   <: Affine <: Traversal
//! Adapter <: Prism  <: Affine
//! Lens    ~> Getter (read-only)
//! ```
//!
//! | Shape         | Needs                    | Accessors                         | Foci   |
//! |---------------|--------------------------|-----------------------------------|--------|
//! | [`Adapter`]   | profunctor               | `from`, `to`                      | 1      |
//! | [`Lens`]      | `Cartesian`              | `view`, `update`                  | 1      |
//! | [`Prism`]     | `Cocartesian`            | `matching`, `build`               | 0 or 1 |
//! | [`Affine`]    | `Cartesian + Cocartesian`| `preview`, `set`                  | 0 or 1 |
//! | [`Getter`]    | `ReadOnly`               | `get`                             | 1      |
//! | [`Traversal`] | `Wander`                 | `to_list`, `modify_all`, ...      | 0..N   |
//!
//! Each shape is also a representation: interpreting an optic against a
//! shape's identity yields that shape, which is how [`Optic::to_lens`] and
//! its siblings work.
//!
//! # Composed optics
//!
//! An [`Optic`] is a chain of elemental optics ([`Element`]): projections,
//! injections, named fields, tagged cases, list elements, or a
//! [`CustomOptic`]. Chains are data so that rewrite rules can compare and
//! fuse them.
//!
//! # Example
//!
//! ```
//! use datafix::optics::standard;
//! use datafix::types::{Type, Value};
//!
//! let either = Type::sum(Type::Int, Type::Str);
//! let optic = standard::proj2(Type::Bool, either)
//!     .compose(&standard::inj1(Type::Int, Type::Str))
//!     .unwrap();
//!
//! assert!(optic.to_lens().is_err());
//! let affine = optic.to_affine().unwrap();
//!
//! let hit = Value::pair(Value::Bool(true), Value::left(Value::Int(1)));
//! let miss = Value::pair(Value::Bool(true), Value::right(Value::string("x")));
//! assert_eq!(affine.preview(hit), Ok(Some(Value::Int(1))));
//! assert_eq!(affine.preview(miss), Ok(None));
//! ```

use std::sync::Arc;

use crate::control::Either;
use crate::error::EvalResult;
use crate::types::Value;

mod adapter;
mod affine;
mod element;
mod getter;
mod lens;
mod optic;
mod prism;
pub mod standard_optics;
mod traversal;

pub use adapter::Adapter;
pub use affine::Affine;
pub use element::{CustomOptic, Element, Shape, Signature};
pub use getter::Getter;
pub use lens::Lens;
pub use optic::Optic;
pub use prism::Prism;
pub use standard_optics as standard;
pub use traversal::{Focus, Traversal};

/// `(B, S) -> T`: writes a focus back into a whole.
pub type Update = Arc<dyn Fn(Value, Value) -> EvalResult<Value> + Send + Sync>;

/// `S -> Either<T, A>`: finds the focus, or rebuilds the whole at its write
/// type.
pub type Matcher = Arc<dyn Fn(Value) -> EvalResult<Either<Value, Value>> + Send + Sync>;
