//! The opaque backend handle.
//!
//! Every point-free evaluation is threaded a backend (the serialization layer
//! reading and writing primitive values). The core never looks inside it; it
//! only hands it to primitives wrapped with
//! [`PointFree::wrap`](crate::point_free::PointFree::wrap), which may downcast
//! it to the concrete type they expect.

use std::any::Any;
use std::sync::Arc;

/// Marker for values usable as a backend.
///
/// Implemented for every `Send + Sync + 'static` type.
pub trait Backend: Any + Send + Sync {}

impl<T: Any + Send + Sync> Backend for T {}

impl dyn Backend {
    /// Downcasts to a concrete backend type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datafix::types::{Backend, BackendHandle};
    /// use std::sync::Arc;
    ///
    /// let backend: BackendHandle = Arc::new(7_u32);
    /// assert_eq!(backend.downcast_ref::<u32>(), Some(&7));
    /// assert_eq!(backend.downcast_ref::<String>(), None);
    /// ```
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }
}

/// A shared backend handle.
pub type BackendHandle = Arc<dyn Backend>;

/// A backend carrying nothing, for transformations that need no primitives.
#[must_use]
pub fn no_backend() -> BackendHandle {
    Arc::new(())
}
