//! Capability traits and the capability set.
//!
//! A representation `P` is "a transformer from `a` to `b`" for some notion of
//! transformer (a plain function, a getter, a lens, ...). Optics are
//! interpreted by asking `P` for the operations below; each optic shape needs
//! a different subset.
//!
//! | Trait         | Operation                          | Needed by         |
//! |---------------|------------------------------------|-------------------|
//! | `Profunctor`  | `dimap` (pre/post-compose)          | every optic       |
//! | `Cartesian`   | `first`/`second` (pair focus)       | lens, affine      |
//! | `Cocartesian` | `left`/`right` (sum focus)          | prism, affine     |
//! | `Closed`      | `closed` (focus under a function)   | function lifting  |
//! | `ReadOnly`    | `read_through` (forget the write)   | getter            |
//! | `Wander`      | `wander` (many foci)                | traversal         |

use std::fmt;
use std::ops::BitOr;

use crate::optics::Traversal;
use crate::types::Function;

/// Pre- and post-composition with plain functions.
pub trait Profunctor: Sized {
    /// Turns `P a b` into `P s t` given `pre: s -> a` and `post: b -> t`.
    #[must_use]
    fn dimap(self, pre: Function, post: Function) -> Self;
}

/// Lifting through the components of a pair.
pub trait Cartesian: Profunctor {
    /// Turns `P a b` into `P (a, c) (b, c)`, leaving `c` untouched.
    #[must_use]
    fn first(self) -> Self;

    /// Turns `P a b` into `P (c, a) (c, b)`, leaving `c` untouched.
    #[must_use]
    fn second(self) -> Self;
}

/// Lifting through the cases of a sum.
pub trait Cocartesian: Profunctor {
    /// Turns `P a b` into `P (Either a c) (Either b c)`.
    #[must_use]
    fn left(self) -> Self;

    /// Turns `P a b` into `P (Either c a) (Either c b)`.
    #[must_use]
    fn right(self) -> Self;
}

/// Lifting under a function arrow.
pub trait Closed: Profunctor {
    /// Turns `P a b` into `P (x -> a) (x -> b)`.
    #[must_use]
    fn closed(self) -> Self;
}

/// Read-only pre-composition, forgetting the write side.
pub trait ReadOnly: Profunctor {
    /// Turns `P a _` into `P s _` given `get: s -> a`.
    #[must_use]
    fn read_through(self, get: Function) -> Self;
}

/// Lifting over every focus of a traversal.
pub trait Wander: Cartesian + Cocartesian {
    /// Turns `P a b` into `P s t` for a traversal from `s` to its foci.
    #[must_use]
    fn wander(self, traversal: &Traversal) -> Self;
}

/// A set of capabilities beyond plain [`Profunctor`].
///
/// The empty set means "profunctor only".
///
/// # Examples
///
/// ```rust
/// use datafix::profunctor::Capabilities;
///
/// let affine = Capabilities::CARTESIAN | Capabilities::COCARTESIAN;
/// assert_eq!(affine, Capabilities::AFFINE);
/// assert!(Capabilities::TRAVERSAL.contains(affine));
/// assert_eq!(affine.to_string(), "{Cartesian, Cocartesian}");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

const NAMES: [(Capabilities, &str); 5] = [
    (Capabilities::CARTESIAN, "Cartesian"),
    (Capabilities::COCARTESIAN, "Cocartesian"),
    (Capabilities::CLOSED, "Closed"),
    (Capabilities::READ_ONLY, "ReadOnly"),
    (Capabilities::WANDER, "Wander"),
];

impl Capabilities {
    /// Plain profunctor: no extra capability.
    pub const PROFUNCTOR: Self = Self(0);
    /// Pair focus.
    pub const CARTESIAN: Self = Self(1);
    /// Sum focus.
    pub const COCARTESIAN: Self = Self(1 << 1);
    /// Function focus.
    pub const CLOSED: Self = Self(1 << 2);
    /// Write-forgetting.
    pub const READ_ONLY: Self = Self(1 << 3);
    /// Multiple foci.
    pub const WANDER: Self = Self(1 << 4);
    /// Zero-or-one focus: pair and sum.
    pub const AFFINE: Self = Self(Self::CARTESIAN.0 | Self::COCARTESIAN.0);
    /// Zero-or-more foci.
    pub const TRAVERSAL: Self = Self(Self::AFFINE.0 | Self::WANDER.0);

    /// Union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if every capability of `other` is in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The capabilities of `required` absent from `self`.
    #[must_use]
    pub const fn missing(self, required: Self) -> Self {
        Self(required.0 & !self.0)
    }

    /// Returns `true` for the plain-profunctor set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        self.union(other)
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(formatter, "{{Profunctor}}");
        }
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(capability, _)| self.contains(*capability))
            .map(|(_, name)| *name)
            .collect();
        write!(formatter, "{{{}}}", names.join(", "))
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Capabilities{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Capabilities::PROFUNCTOR, "{Profunctor}")]
    #[case(Capabilities::READ_ONLY, "{ReadOnly}")]
    #[case(Capabilities::TRAVERSAL, "{Cartesian, Cocartesian, Wander}")]
    fn test_capabilities_display(#[case] capabilities: Capabilities, #[case] expected: &str) {
        assert_eq!(capabilities.to_string(), expected);
    }

    #[rstest]
    fn test_missing() {
        let provided = Capabilities::CARTESIAN | Capabilities::READ_ONLY;

        assert_eq!(provided.missing(Capabilities::AFFINE), Capabilities::COCARTESIAN);
        assert!(provided.missing(Capabilities::CARTESIAN).is_empty());
    }

    #[rstest]
    fn test_everything_contains_profunctor() {
        assert!(Capabilities::READ_ONLY.contains(Capabilities::PROFUNCTOR));
        assert!(Capabilities::PROFUNCTOR.contains(Capabilities::PROFUNCTOR));
    }
}
