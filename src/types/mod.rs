//! Type descriptors, runtime values and the backend handle.
//!
//! These are the narrow stand-ins for the collaborators the core consumes:
//!
//! - [`Type`]: structural type descriptors with equality and case lookup
//! - [`Value`] and [`Function`]: the runtime data optics and terms act on
//! - [`Backend`]: the opaque handle forwarded to primitives

mod backend;
mod ty;
mod value;

pub use backend::{Backend, BackendHandle, no_backend};
pub use ty::{FamilyTemplate, TaggedChoice, Type};
pub use value::{Function, Value};
