//! Algebras: what a fold does at each family member.

use std::fmt;
use std::sync::Arc;

use super::{IndexSet, RecursiveTypeFamily};
use crate::error::SchemaResult;
use crate::point_free::PointFree;
use crate::types::Type;

/// One case of an algebra: a transformation and the family indices whose
/// data it reads.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RewriteResult {
    function: PointFree,
    dependencies: IndexSet,
}

impl RewriteResult {
    /// Creates a case.
    #[must_use]
    pub const fn new(function: PointFree, dependencies: IndexSet) -> Self {
        Self {
            function,
            dependencies,
        }
    }

    /// The case that leaves member `index` untouched: `In(member index)`.
    ///
    /// # Errors
    ///
    /// Fails if `index` is out of range.
    pub fn nop(family: &RecursiveTypeFamily, index: usize) -> SchemaResult<Self> {
        let roll = PointFree::roll(family.member(index)?)?;
        Ok(Self::new(roll, IndexSet::new()))
    }

    /// The transformation.
    #[must_use]
    pub const fn function(&self) -> &PointFree {
        &self.function
    }

    /// The indices whose data the transformation reads.
    #[must_use]
    pub const fn dependencies(&self) -> &IndexSet {
        &self.dependencies
    }

    /// Returns `true` for the untouched case.
    #[must_use]
    pub fn is_nop(&self) -> bool {
        self.function.is_roll()
    }

    pub(crate) fn map_function(&self, function: impl FnOnce(&PointFree) -> PointFree) -> Self {
        Self::new(function(&self.function), self.dependencies.clone())
    }
}

/// A finite mapping from family index to [`RewriteResult`].
///
/// Case `i` maps member `i`'s unfolded layer, with every recursive point `j`
/// already folded to case `j`'s result type, to case `i`'s result type.
/// Algebras are cache keys, so equality and hashing look at the cases only;
/// the name is for display.
///
/// # Examples
///
/// ```rust
/// use datafix::family::{Algebra, RecursiveTypeFamily};
/// use datafix::types::Type;
///
/// let nat = RecursiveTypeFamily::new(
///     "Nat",
///     vec![Type::sum(Type::Unit, Type::RecursivePoint(0))],
/// ).unwrap();
///
/// let untouched = Algebra::identity(&nat).unwrap();
/// assert!(untouched.modified().is_empty());
/// assert!(untouched.is_type_preserving(&nat));
/// ```
#[derive(Clone)]
pub struct Algebra(Arc<AlgebraInner>);

struct AlgebraInner {
    name: Arc<str>,
    cases: Vec<RewriteResult>,
}

impl Algebra {
    /// Creates an algebra from its cases, in index order.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, cases: Vec<RewriteResult>) -> Self {
        Self(Arc::new(AlgebraInner {
            name: name.into(),
            cases,
        }))
    }

    /// The algebra leaving every member untouched.
    ///
    /// # Errors
    ///
    /// Never fails for a well-formed family.
    pub fn identity(family: &RecursiveTypeFamily) -> SchemaResult<Self> {
        let cases = (0..family.size())
            .map(|index| RewriteResult::nop(family, index))
            .collect::<SchemaResult<_>>()?;
        Ok(Self::new("id", cases))
    }

    /// The algebra's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Number of cases.
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.cases.len()
    }

    /// Case `index`.
    #[must_use]
    pub fn case(&self, index: usize) -> Option<&RewriteResult> {
        self.0.cases.get(index)
    }

    /// Every case, in index order.
    #[must_use]
    pub fn cases(&self) -> &[RewriteResult] {
        &self.0.cases
    }

    /// The output type of case `index`.
    #[must_use]
    pub fn result_type(&self, index: usize) -> Option<&Type> {
        self.case(index)
            .and_then(|case| case.function().signature())
            .map(|(_, output)| output)
    }

    /// Indices whose case does something.
    #[must_use]
    pub fn modified(&self) -> IndexSet {
        self.0
            .cases
            .iter()
            .enumerate()
            .filter(|(_, case)| !case.is_nop())
            .map(|(index, _)| index)
            .collect()
    }

    /// Returns `true` if every case `i` maps into member `i` of `family`, so
    /// the fold rebuilds a value of the same family.
    #[must_use]
    pub fn is_type_preserving(&self, family: &RecursiveTypeFamily) -> bool {
        self.size() == family.size()
            && (0..self.size()).all(|index| {
                family
                    .member(index)
                    .is_ok_and(|member| self.result_type(index) == Some(&member))
            })
    }

    /// The same algebra with different cases.
    pub(crate) fn with_cases(&self, cases: Vec<RewriteResult>) -> Self {
        Self(Arc::new(AlgebraInner {
            name: Arc::clone(&self.0.name),
            cases,
        }))
    }
}

impl PartialEq for Algebra {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.cases == other.0.cases
    }
}

impl Eq for Algebra {}

impl std::hash::Hash for Algebra {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.cases.hash(state);
    }
}

impl fmt::Debug for Algebra {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Algebra")
            .field("name", &self.0.name)
            .field("modified", &self.modified())
            .finish_non_exhaustive()
    }
}
