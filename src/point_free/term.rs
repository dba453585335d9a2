//! Term shapes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::PointFree;
use crate::error::EvalResult;
use crate::family::Fold;
use crate::optics::Optic;
use crate::types::{BackendHandle, Type, Value};

/// The body of a primitive: produces its value from the backend.
pub type PrimitiveBody = Arc<dyn Fn(&BackendHandle) -> EvalResult<Value> + Send + Sync>;

/// An externally supplied primitive.
///
/// Two primitives are equal when they share name, type and body closure.
#[derive(Clone)]
pub struct Primitive {
    name: Arc<str>,
    ty: Type,
    body: PrimitiveBody,
}

impl Primitive {
    pub(crate) fn new(name: Arc<str>, ty: Type, body: PrimitiveBody) -> Self {
        Self { name, ty, body }
    }

    /// The primitive's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The primitive's type.
    #[must_use]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    pub(crate) fn body(&self) -> PrimitiveBody {
        Arc::clone(&self.body)
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body) && self.name == other.name && self.ty == other.ty
    }
}

impl Eq for Primitive {}

impl Hash for Primitive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.ty.hash(state);
        Arc::as_ptr(&self.body).cast::<()>().hash(state);
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Primitive")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

/// The node kinds of the point-free IR.
///
/// Terms are built through the checked constructors on [`PointFree`]; a
/// `Term` on its own is only ever inspected.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Term {
    /// `id : A -> A`.
    Id(Type),
    /// `! : A -> ()`.
    Bang(Type),
    /// `func arg`.
    Apply {
        /// The applied function.
        func: PointFree,
        /// Its argument.
        arg: PointFree,
    },
    /// `first ∘ second`: runs `second`, then `first`.
    Comp {
        /// Runs last.
        first: PointFree,
        /// Runs first.
        second: PointFree,
    },
    /// An opaque primitive.
    FunctionWrapper(Primitive),
    /// An optic frozen against the function representation:
    /// `(A -> B) -> (S -> T)`.
    ProfunctorTransformer(Optic),
    /// Rolls one layer of a recursive member: `unfold(i) -> member(i)`.
    In(Type),
    /// Unrolls one layer: `member(i) -> unfold(i)`.
    Out(Type),
    /// A catamorphism.
    Fold(Fold),
}

impl Term {
    /// A short name for the node kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Bang(_) => "bang",
            Self::Apply { .. } => "apply",
            Self::Comp { .. } => "comp",
            Self::FunctionWrapper(_) => "primitive",
            Self::ProfunctorTransformer(_) => "optic",
            Self::In(_) => "in",
            Self::Out(_) => "out",
            Self::Fold(_) => "fold",
        }
    }
}
