//! Profunctor capabilities and their concrete representations.
//!
//! Optics are interpreted by running them against a *representation* of
//! "transformers from `a` to `b`". The capability traits describe the
//! operations a representation may support; [`Representation`] ties a
//! concrete type to the capability set it provides.
//!
//! The set of representations is closed: [`FunctionRep`] here, plus the six
//! optic shapes in [`crate::optics`], each of which is its own instance.
//!
//! # Example
//!
//! ```rust
//! use datafix::optics::standard;
//! use datafix::profunctor::{FunctionRep, Representation};
//! use datafix::types::{Function, Type, Value};
//!
//! let first = standard::proj1(Type::Int, Type::Str);
//! assert!(FunctionRep::capabilities().contains(first.required()));
//!
//! let negate = FunctionRep(Function::new(|value| Ok(Value::Int(-value.as_int()?))));
//! let lifted = first.eval(negate).unwrap();
//! assert_eq!(
//!     lifted.apply(Value::pair(Value::Int(4), Value::string("x"))),
//!     Ok(Value::pair(Value::Int(-4), Value::string("x")))
//! );
//! ```

mod capability;
mod function_rep;
mod representation;

pub use capability::{
    Capabilities, Cartesian, Closed, Cocartesian, Profunctor, ReadOnly, Wander,
};
pub use function_rep::FunctionRep;
pub use representation::{
    CartesianOps, ClosedOps, CocartesianOps, ReadOnlyOps, Representation, RepresentationKind,
    WanderOps, ensure_capabilities,
};
pub(crate) use representation::witness;
