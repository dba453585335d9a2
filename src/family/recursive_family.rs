//! Recursive type families.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use super::fold::{FoldCache, FoldMap, build_fold_map};
use super::Algebra;
use crate::error::{SchemaError, SchemaResult};
use crate::types::{FamilyTemplate, Type};

/// A finite group of mutually recursive types generated from one template.
///
/// Member `i` is the fixed point of template body `i`, where
/// [`Type::RecursivePoint`]`(j)` stands for member `j`. Members and their
/// one-layer unfoldings are built on first request and kept.
///
/// # Examples
///
/// ```rust
/// use datafix::family::RecursiveTypeFamily;
/// use datafix::types::Type;
///
/// // List<Int> = Nil | Cons(Int, List<Int>)
/// let list = RecursiveTypeFamily::new(
///     "IntList",
///     vec![Type::sum(Type::Unit, Type::product(Type::Int, Type::RecursivePoint(0)))],
/// ).unwrap();
///
/// assert_eq!(list.member(0).unwrap().to_string(), "IntList#0");
/// assert_eq!(list.unfold(0).unwrap().to_string(), "Either<(), (Int, IntList#0)>");
/// ```
#[derive(Clone)]
pub struct RecursiveTypeFamily(Arc<FamilyInner>);

struct FamilyInner {
    template: Arc<FamilyTemplate>,
    members: Vec<OnceLock<Type>>,
    unfolded: Vec<OnceLock<Type>>,
}

impl RecursiveTypeFamily {
    /// Creates a family from its per-member template bodies.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IndexOutOfRange`] if the family is empty or a
    /// body refers to a member that does not exist.
    pub fn new(name: impl Into<Arc<str>>, templates: Vec<Type>) -> SchemaResult<Self> {
        Self::from_template(Arc::new(FamilyTemplate::new(name, templates)))
    }

    /// Creates a family from an existing template.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn from_template(template: Arc<FamilyTemplate>) -> SchemaResult<Self> {
        let size = template.size();
        let out_of_range = |index| SchemaError::IndexOutOfRange {
            family: template.name().to_string(),
            index,
            size,
        };
        if size == 0 {
            return Err(out_of_range(0));
        }
        for index in 0..size {
            if let Some(point) = template.body(index).and_then(Type::max_recursive_point)
                && point >= size
            {
                return Err(out_of_range(point));
            }
        }
        Ok(Self(Arc::new(FamilyInner {
            template,
            members: (0..size).map(|_| OnceLock::new()).collect(),
            unfolded: (0..size).map(|_| OnceLock::new()).collect(),
        })))
    }

    /// The family name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.template.name()
    }

    /// Number of members.
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.template.size()
    }

    /// The generating template.
    #[must_use]
    pub fn templates(&self) -> &Arc<FamilyTemplate> {
        &self.0.template
    }

    fn out_of_range(&self, index: usize) -> SchemaError {
        SchemaError::IndexOutOfRange {
            family: self.name().to_string(),
            index,
            size: self.size(),
        }
    }

    /// The template body of member `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IndexOutOfRange`] for a missing member.
    pub fn template(&self, index: usize) -> SchemaResult<&Type> {
        self.0
            .template
            .body(index)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Member `index`, as a type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IndexOutOfRange`] for a missing member.
    pub fn member(&self, index: usize) -> SchemaResult<Type> {
        let slot = self.0.members.get(index).ok_or_else(|| self.out_of_range(index))?;
        Ok(slot
            .get_or_init(|| Type::Recursive(Arc::clone(&self.0.template), index))
            .clone())
    }

    /// Member `index` unrolled by one layer.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IndexOutOfRange`] for a missing member.
    pub fn unfold(&self, index: usize) -> SchemaResult<Type> {
        let slot = self.0.unfolded.get(index).ok_or_else(|| self.out_of_range(index))?;
        if let Some(unfolded) = slot.get() {
            return Ok(unfolded.clone());
        }
        let unfolded = self
            .0
            .template
            .unfold(index)
            .ok_or_else(|| self.out_of_range(index))?;
        Ok(slot.get_or_init(|| unfolded).clone())
    }

    /// The catamorphisms of `algebra` over every member, memoized in `cache`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::AlgebraMismatch`] if the algebra does not fit
    /// the family, or [`SchemaError::NonPolynomialTemplate`] if a member
    /// recurses under a function arrow.
    pub fn fold(&self, algebra: &Algebra, cache: &FoldCache) -> SchemaResult<FoldMap> {
        cache.fold_map(self, algebra, || build_fold_map(self, algebra, cache))
    }
}

impl PartialEq for RecursiveTypeFamily {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.template == other.0.template
    }
}

impl Eq for RecursiveTypeFamily {}

impl Hash for RecursiveTypeFamily {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.size().hash(state);
    }
}

impl fmt::Debug for RecursiveTypeFamily {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "RecursiveTypeFamily({}, {} members)", self.name(), self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_rejects_dangling_recursive_point() {
        let error = RecursiveTypeFamily::new("Broken", vec![Type::list(Type::RecursivePoint(2))])
            .unwrap_err();

        assert_eq!(
            error,
            SchemaError::IndexOutOfRange {
                family: "Broken".to_string(),
                index: 2,
                size: 1,
            }
        );
    }

    #[rstest]
    fn test_rejects_empty_family() {
        assert!(RecursiveTypeFamily::new("Empty", Vec::new()).is_err());
    }

    #[rstest]
    fn test_members_are_cached() {
        let family = RecursiveTypeFamily::new(
            "Tree",
            vec![
                Type::list(Type::RecursivePoint(1)),
                Type::product(Type::Str, Type::RecursivePoint(0)),
            ],
        )
        .unwrap();

        let member = family.member(1).unwrap();

        assert_eq!(member, family.member(1).unwrap());
        assert_eq!(family.unfold(1).unwrap().to_string(), "(Str, Tree#0)");
        assert!(matches!(
            family.member(2),
            Err(SchemaError::IndexOutOfRange { index: 2, .. })
        ));
    }

    #[rstest]
    fn test_equality_is_structural() {
        let body = vec![Type::sum(Type::Unit, Type::RecursivePoint(0))];
        let first = RecursiveTypeFamily::new("Nat", body.clone()).unwrap();
        let second = RecursiveTypeFamily::new("Nat", body).unwrap();

        assert_eq!(first, second);
    }
}
