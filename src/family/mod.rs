//! Recursive type families, algebras and catamorphisms.
//!
//! A [`RecursiveTypeFamily`] is a small group of mutually recursive types
//! addressed by index. An [`Algebra`] says what to do at each member, and
//! [`RecursiveTypeFamily::fold`] turns it into one [`Fold`] node per member.
//! Fold construction is memoized in an explicit [`FoldCache`].
//!
//! # Example
//!
//! ```rust
//! use datafix::control::Either;
//! use datafix::family::{Algebra, FoldCache, IndexSet, RecursiveTypeFamily, RewriteResult};
//! use datafix::point_free::PointFree;
//! use datafix::types::{Type, Value, no_backend};
//!
//! // List<Int> = Nil | Cons(Int, List<Int>)
//! let list = RecursiveTypeFamily::new(
//!     "IntList",
//!     vec![Type::sum(Type::Unit, Type::product(Type::Int, Type::RecursivePoint(0)))],
//! ).unwrap();
//!
//! let sum = PointFree::lift(
//!     "sum",
//!     Type::sum(Type::Unit, Type::product(Type::Int, Type::Int)),
//!     Type::Int,
//!     |layer| Ok(match layer.into_either()? {
//!         Either::Left(_) => Value::Int(0),
//!         Either::Right(cons) => {
//!             let (head, tail) = cons.into_pair()?;
//!             Value::Int(head.as_int()? + tail.as_int()?)
//!         }
//!     }),
//! );
//! let algebra = Algebra::new("sum", vec![RewriteResult::new(sum, IndexSet::singleton(0))]);
//!
//! let cache = FoldCache::new();
//! let total = PointFree::fold(&list, &algebra, 0, &cache).unwrap();
//!
//! let items = Value::right(Value::pair(
//!     Value::Int(1),
//!     Value::right(Value::pair(Value::Int(2), Value::left(Value::Unit))),
//! ));
//! assert_eq!(total.call(&no_backend(), items), Ok(Value::Int(3)));
//! ```

mod algebra;
mod fold;
mod index_set;
mod recursive_family;

pub use algebra::{Algebra, RewriteResult};
pub use fold::{Fold, FoldCache, FoldCacheStats, FoldMap};
pub use index_set::IndexSet;
pub use recursive_family::RecursiveTypeFamily;
