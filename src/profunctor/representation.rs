//! The closed set of concrete representations.
//!
//! A composed [`Optic`](crate::optics::Optic) is data, so which capabilities
//! it needs is only known once it is built. A [`Representation`] therefore
//! exposes its capability implementations as witnesses: a witness is
//! `Some` exactly when the representation implements the corresponding trait,
//! and holds that trait's methods as plain function pointers. An optic checks
//! the witnesses it needs up front and fails with
//! [`SchemaError::MissingCapability`] before interpreting anything.

use std::fmt;

use super::capability::{
    Capabilities, Cartesian, Closed, Cocartesian, Profunctor, ReadOnly, Wander,
};
use crate::error::{SchemaError, SchemaResult};
use crate::optics::Traversal;
use crate::types::Function;

/// The kinds of concrete representation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RepresentationKind {
    /// Plain functions, used to modify through an optic.
    Function,
    /// Adapter (isomorphism) pairs.
    Adapter,
    /// Lens view/update pairs.
    Lens,
    /// Prism match/build pairs.
    Prism,
    /// Affine preview/set pairs.
    Affine,
    /// Read-only getters.
    Getter,
    /// Traversals.
    Traversal,
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Function => "Function",
            Self::Adapter => "Adapter",
            Self::Lens => "Lens",
            Self::Prism => "Prism",
            Self::Affine => "Affine",
            Self::Getter => "Getter",
            Self::Traversal => "Traversal",
        };
        formatter.write_str(name)
    }
}

/// Witness of a [`Cartesian`] implementation.
pub struct CartesianOps<P> {
    /// [`Cartesian::first`].
    pub first: fn(P) -> P,
    /// [`Cartesian::second`].
    pub second: fn(P) -> P,
}

impl<P: Cartesian> CartesianOps<P> {
    /// Captures `P`'s implementation.
    #[must_use]
    pub fn of() -> Self {
        Self {
            first: P::first,
            second: P::second,
        }
    }
}

/// Witness of a [`Cocartesian`] implementation.
pub struct CocartesianOps<P> {
    /// [`Cocartesian::left`].
    pub left: fn(P) -> P,
    /// [`Cocartesian::right`].
    pub right: fn(P) -> P,
}

impl<P: Cocartesian> CocartesianOps<P> {
    /// Captures `P`'s implementation.
    #[must_use]
    pub fn of() -> Self {
        Self {
            left: P::left,
            right: P::right,
        }
    }
}

/// Witness of a [`Closed`] implementation.
pub struct ClosedOps<P> {
    /// [`Closed::closed`].
    pub closed: fn(P) -> P,
}

impl<P: Closed> ClosedOps<P> {
    /// Captures `P`'s implementation.
    #[must_use]
    pub fn of() -> Self {
        Self { closed: P::closed }
    }
}

/// Witness of a [`ReadOnly`] implementation.
pub struct ReadOnlyOps<P> {
    /// [`ReadOnly::read_through`].
    pub read_through: fn(P, Function) -> P,
}

impl<P: ReadOnly> ReadOnlyOps<P> {
    /// Captures `P`'s implementation.
    #[must_use]
    pub fn of() -> Self {
        Self {
            read_through: P::read_through,
        }
    }
}

/// Witness of a [`Wander`] implementation.
pub struct WanderOps<P> {
    /// [`Wander::wander`].
    pub wander: fn(P, &Traversal) -> P,
}

impl<P: Wander> WanderOps<P> {
    /// Captures `P`'s implementation.
    #[must_use]
    pub fn of() -> Self {
        Self { wander: P::wander }
    }
}

/// A concrete representation an optic can be interpreted against.
///
/// Implementors override the witness methods for the capabilities they
/// implement; [`capabilities`](Self::capabilities) is derived from them.
pub trait Representation: Profunctor + Clone + Send + Sync + 'static {
    /// Which representation this is.
    const KIND: RepresentationKind;

    /// The [`Cartesian`] witness, if implemented.
    fn cartesian() -> Option<CartesianOps<Self>> {
        None
    }

    /// The [`Cocartesian`] witness, if implemented.
    fn cocartesian() -> Option<CocartesianOps<Self>> {
        None
    }

    /// The [`Closed`] witness, if implemented.
    fn closed() -> Option<ClosedOps<Self>> {
        None
    }

    /// The [`ReadOnly`] witness, if implemented.
    fn read_only() -> Option<ReadOnlyOps<Self>> {
        None
    }

    /// The [`Wander`] witness, if implemented.
    fn wander() -> Option<WanderOps<Self>> {
        None
    }

    /// Every capability this representation provides.
    fn capabilities() -> Capabilities {
        let mut capabilities = Capabilities::PROFUNCTOR;
        if Self::cartesian().is_some() {
            capabilities = capabilities | Capabilities::CARTESIAN;
        }
        if Self::cocartesian().is_some() {
            capabilities = capabilities | Capabilities::COCARTESIAN;
        }
        if Self::closed().is_some() {
            capabilities = capabilities | Capabilities::CLOSED;
        }
        if Self::read_only().is_some() {
            capabilities = capabilities | Capabilities::READ_ONLY;
        }
        if Self::wander().is_some() {
            capabilities = capabilities | Capabilities::WANDER;
        }
        capabilities
    }
}

/// Checks that `P` provides `required` for the optic rendered as `optic`.
///
/// # Errors
///
/// Returns [`SchemaError::MissingCapability`] naming the optic otherwise.
pub fn ensure_capabilities<P: Representation>(
    optic: &dyn fmt::Display,
    required: Capabilities,
) -> SchemaResult<()> {
    let provided = P::capabilities();
    if provided.contains(required) {
        Ok(())
    } else {
        Err(SchemaError::MissingCapability {
            optic: optic.to_string(),
            representation: P::KIND,
            required,
            provided,
        })
    }
}

/// Unwraps a witness, reporting the capability it stands for when absent.
pub(crate) fn witness<P: Representation, W>(
    found: Option<W>,
    optic: &str,
    required: Capabilities,
) -> SchemaResult<W> {
    found.ok_or_else(|| SchemaError::MissingCapability {
        optic: optic.to_string(),
        representation: P::KIND,
        required,
        provided: P::capabilities(),
    })
}
