//! Control structures shared by the optics and the rewrite engine.
//!
//! - [`Either`]: the tagged result of matching a sum focus

mod either;

pub use either::Either;
