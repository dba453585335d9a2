//! Either type - the result of matching a prism or affine focus.
//!
//! A prism's `match` and an affine's `preview` both answer "is the focus
//! there?" with an `Either<T, A>`: `Right(a)` carries the focus, `Left(t)`
//! carries the whole, already rebuilt at the write-result type, for the case
//! where there is nothing to focus on.
//!
//! # Examples
//!
//! ```rust
//! use datafix::control::Either;
//!
//! let hit: Either<&str, i32> = Either::Right(42);
//! let miss: Either<&str, i32> = Either::Left("nothing");
//!
//! assert_eq!(hit.map_right(|x| x + 1), Either::Right(43));
//! assert_eq!(miss.fold(|s| s.len() as i32, |x| x), 7);
//! ```

use std::fmt;

/// A value that can be one of two types.
///
/// By convention `Right` is the focused case and `Left` is the pass-through.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Either<L, R> {
    /// The pass-through case.
    Left(L),
    /// The focused case.
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Returns `true` if this is a `Left` value.
    #[inline]
    pub const fn is_left(&self) -> bool {
        matches!(self, Self::Left(_))
    }

    /// Returns `true` if this is a `Right` value.
    #[inline]
    pub const fn is_right(&self) -> bool {
        matches!(self, Self::Right(_))
    }

    /// Converts into an `Option<L>`, discarding a right value.
    #[inline]
    pub fn left(self) -> Option<L> {
        match self {
            Self::Left(value) => Some(value),
            Self::Right(_) => None,
        }
    }

    /// Converts into an `Option<R>`, discarding a left value.
    #[inline]
    pub fn right(self) -> Option<R> {
        match self {
            Self::Left(_) => None,
            Self::Right(value) => Some(value),
        }
    }

    /// Applies `function` to a left value.
    #[inline]
    pub fn map_left<T, F>(self, function: F) -> Either<T, R>
    where
        F: FnOnce(L) -> T,
    {
        match self {
            Self::Left(value) => Either::Left(function(value)),
            Self::Right(value) => Either::Right(value),
        }
    }

    /// Applies `function` to a right value.
    #[inline]
    pub fn map_right<T, F>(self, function: F) -> Either<L, T>
    where
        F: FnOnce(R) -> T,
    {
        match self {
            Self::Left(value) => Either::Left(value),
            Self::Right(value) => Either::Right(function(value)),
        }
    }

    /// Applies a fallible `function` to a left value, propagating its error.
    ///
    /// # Errors
    ///
    /// Returns whatever `function` returns on failure.
    #[inline]
    pub fn try_map_left<T, E, F>(self, function: F) -> Result<Either<T, R>, E>
    where
        F: FnOnce(L) -> Result<T, E>,
    {
        match self {
            Self::Left(value) => function(value).map(Either::Left),
            Self::Right(value) => Ok(Either::Right(value)),
        }
    }

    /// Applies a fallible `function` to a right value, propagating its error.
    ///
    /// # Errors
    ///
    /// Returns whatever `function` returns on failure.
    #[inline]
    pub fn try_map_right<T, E, F>(self, function: F) -> Result<Either<L, T>, E>
    where
        F: FnOnce(R) -> Result<T, E>,
    {
        match self {
            Self::Left(value) => Ok(Either::Left(value)),
            Self::Right(value) => function(value).map(Either::Right),
        }
    }

    /// Collapses both cases into one result.
    #[inline]
    pub fn fold<T, F, G>(self, left_function: F, right_function: G) -> T
    where
        F: FnOnce(L) -> T,
        G: FnOnce(R) -> T,
    {
        match self {
            Self::Left(value) => left_function(value),
            Self::Right(value) => right_function(value),
        }
    }
}

impl<T> Either<T, T> {
    /// Extracts the value when both cases carry the same type.
    #[inline]
    pub fn merge(self) -> T {
        match self {
            Self::Left(value) | Self::Right(value) => value,
        }
    }
}

impl<L: fmt::Debug, R: fmt::Debug> fmt::Debug for Either<L, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left(value) => formatter.debug_tuple("Left").field(value).finish(),
            Self::Right(value) => formatter.debug_tuple("Right").field(value).finish(),
        }
    }
}
