//! Catamorphisms and their caches.
//!
//! The fold of an algebra at member `i` is
//!
//! ```text
//! case(i) ∘ layer(i) ∘ out(member i)
//! ```
//!
//! where `layer(i)` maps every recursive occurrence inside member `i`'s
//! template to the fold of the member it refers to. Layers are point-free
//! terms themselves: products and sums are mapped with projections and
//! injections, lists with `elements`, fields and tagged cases with their own
//! optics, and recursive occurrences with sibling `Fold` nodes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{Algebra, RecursiveTypeFamily, RewriteResult};
use crate::CacheMap;
use crate::error::{SchemaError, SchemaResult};
use crate::optics::standard;
use crate::point_free::{PointFree, Term};
use crate::types::Type;

/// The folds of one algebra over every member of a family, by index.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FoldMap(Arc<[RewriteResult]>);

impl FoldMap {
    /// The fold at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RewriteResult> {
        self.0.get(index)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a map built from a family.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the folds in index order.
    pub fn iter(&self) -> impl Iterator<Item = &RewriteResult> {
        self.0.iter()
    }

    /// The same folds, each owning `cache`.
    fn owned_by(&self, cache: &FoldCache) -> Self {
        let folds = self.0.iter().map(|result| match result.function().term() {
            Term::Fold(fold) => RewriteResult::new(
                PointFree::from_fold(Fold {
                    cache: CacheHandle::Owned(cache.clone()),
                    ..fold.clone()
                }),
                result.dependencies().clone(),
            ),
            _ => result.clone(),
        });
        Self(folds.collect())
    }
}

/// How a fold node reaches its cache.
#[derive(Clone)]
enum CacheHandle {
    /// Nodes handed out to callers keep the tables alive.
    Owned(FoldCache),
    /// Nodes stored in the tables point back weakly.
    Shared(Weak<CacheInner>),
}

/// A catamorphism node: folds member `index` of `family` with `algebra`.
///
/// Equality and hashing use `(family, algebra, index)`.
#[derive(Clone)]
pub struct Fold {
    family: RecursiveTypeFamily,
    algebra: Algebra,
    index: usize,
    member: Type,
    result: Type,
    cache: CacheHandle,
}

impl Fold {
    /// The folded family.
    #[must_use]
    pub const fn family(&self) -> &RecursiveTypeFamily {
        &self.family
    }

    /// The algebra.
    #[must_use]
    pub const fn algebra(&self) -> &Algebra {
        &self.algebra
    }

    /// The folded member.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The folded member's type.
    #[must_use]
    pub const fn member(&self) -> &Type {
        &self.member
    }

    /// The algebra's result type at this member.
    #[must_use]
    pub const fn result(&self) -> &Type {
        &self.result
    }

    /// The same fold with its algebra replaced by a same-typed one.
    #[must_use]
    pub(crate) fn with_algebra(&self, algebra: Algebra) -> Self {
        Self {
            algebra,
            ..self.clone()
        }
    }

    /// The cache this fold was built with, or a fresh one if it is gone.
    pub(crate) fn cache(&self) -> FoldCache {
        match &self.cache {
            CacheHandle::Owned(cache) => cache.clone(),
            CacheHandle::Shared(inner) => inner
                .upgrade()
                .map_or_else(FoldCache::new, |inner| FoldCache { inner }),
        }
    }

    /// The one-step unrolled body, `case ∘ layer ∘ out`.
    ///
    /// # Errors
    ///
    /// Fails only if the algebra does not fit the family, which
    /// [`RecursiveTypeFamily::fold`] already rules out.
    pub fn body(&self) -> SchemaResult<PointFree> {
        let cache = self.cache();
        let key = (self.family.clone(), self.algebra.clone(), self.index);
        populate_or_fetch(&cache.inner.specialized, key, "specialized", || {
            let layers = cache.layers(&self.family, &self.algebra)?;
            let case = self
                .algebra
                .case(self.index)
                .ok_or_else(|| SchemaError::IndexOutOfRange {
                    family: self.family.name().to_string(),
                    index: self.index,
                    size: self.family.size(),
                })?;
            let unroll = PointFree::unroll(self.member.clone())?;
            let layer = layers.get(self.index).cloned().flatten();
            let chain = [Some(case.function().clone()), layer, Some(unroll)]
                .into_iter()
                .flatten()
                .collect();
            PointFree::comp_all(chain)
                .map(|body| body.unwrap_or_else(|| PointFree::id(self.member.clone())))
        })
    }
}

impl PartialEq for Fold {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.family == other.family && self.algebra == other.algebra
    }
}

impl Eq for Fold {}

impl Hash for Fold {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.algebra.hash(state);
        self.index.hash(state);
    }
}

impl fmt::Debug for Fold {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Fold")
            .field("family", &self.family.name())
            .field("algebra", &self.algebra.name())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

type Layers = Arc<[Option<PointFree>]>;

#[derive(Default)]
struct CacheInner {
    folds: RwLock<CacheMap<(RecursiveTypeFamily, Algebra), FoldMap>>,
    layers: RwLock<CacheMap<(RecursiveTypeFamily, Algebra), Layers>>,
    specialized: RwLock<CacheMap<(RecursiveTypeFamily, Algebra, usize), PointFree>>,
}

/// Append-only memo tables for fold construction.
///
/// Holds the fold maps and one-layer transforms keyed by
/// `(family, algebra)` and the specialized fold bodies keyed by
/// `(family, algebra, index)`. Clones share the same tables. Entries are
/// never evicted; a value computed twice by racing threads is equal, and the
/// first insert wins.
///
/// Fold nodes returned to callers own the tables, so a fold built with a
/// temporary cache stays memoized. Nodes stored in the tables refer back
/// weakly; the tables are freed once no handle or returned fold remains.
#[derive(Clone, Default)]
pub struct FoldCache {
    inner: Arc<CacheInner>,
}

/// Entry counts of a [`FoldCache`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FoldCacheStats {
    /// Cached fold maps.
    pub folds: usize,
    /// Cached one-layer transforms.
    pub layers: usize,
    /// Cached specialized bodies.
    pub specialized: usize,
}

impl FoldCache {
    /// Creates empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entry counts.
    #[must_use]
    pub fn stats(&self) -> FoldCacheStats {
        FoldCacheStats {
            folds: self.inner.folds.read().len(),
            layers: self.inner.layers.read().len(),
            specialized: self.inner.specialized.read().len(),
        }
    }

    pub(super) fn fold_map<F>(
        &self,
        family: &RecursiveTypeFamily,
        algebra: &Algebra,
        compute: F,
    ) -> SchemaResult<FoldMap>
    where
        F: FnOnce() -> SchemaResult<FoldMap>,
    {
        let key = (family.clone(), algebra.clone());
        let shared = populate_or_fetch(&self.inner.folds, key, "fold map", compute)?;
        Ok(shared.owned_by(self))
    }

    fn layers(&self, family: &RecursiveTypeFamily, algebra: &Algebra) -> SchemaResult<Layers> {
        let key = (family.clone(), algebra.clone());
        populate_or_fetch(&self.inner.layers, key, "layers", || {
            let results = check_algebra(family, algebra)?;
            let builder = LayerBuilder {
                family,
                algebra,
                results: &results,
                cache: self,
            };
            (0..family.size())
                .map(|index| builder.build(family.template(index)?))
                .collect::<SchemaResult<Vec<_>>>()
                .map(Layers::from)
        })
    }
}

impl fmt::Debug for FoldCache {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("FoldCache")
            .field(&self.stats())
            .finish()
    }
}

/// Returns the cached value for `key`, computing and inserting it if absent.
///
/// The lock is not held while computing, since computing may recurse into
/// the cache. Racing threads may compute twice; the first insert wins.
fn populate_or_fetch<K, V, F>(
    table: &RwLock<CacheMap<K, V>>,
    key: K,
    kind: &'static str,
    compute: F,
) -> SchemaResult<V>
where
    K: Eq + Hash,
    V: Clone,
    F: FnOnce() -> SchemaResult<V>,
{
    if let Some(value) = table.read().get(&key) {
        return Ok(value.clone());
    }
    let value = compute()?;
    let mut table = table.write();
    tracing::trace!(kind, entries = table.len() + 1, "populating fold cache");
    Ok(table.entry(key).or_insert(value).clone())
}

/// Checks `algebra` against `family` and returns each case's result type.
fn check_algebra(family: &RecursiveTypeFamily, algebra: &Algebra) -> SchemaResult<Vec<Type>> {
    let mismatch = |reason: String| SchemaError::AlgebraMismatch {
        algebra: algebra.name().to_string(),
        family: family.name().to_string(),
        reason,
    };
    if algebra.size() != family.size() {
        return Err(mismatch(format!(
            "{} cases for {} members",
            algebra.size(),
            family.size()
        )));
    }
    let signatures = algebra
        .cases()
        .iter()
        .enumerate()
        .map(|(index, case)| {
            case.function()
                .signature()
                .ok_or_else(|| mismatch(format!("case {index} is not a function")))
        })
        .collect::<SchemaResult<Vec<_>>>()?;
    let results: Vec<Type> = signatures.iter().map(|(_, output)| (*output).clone()).collect();
    for (index, (input, _)) in signatures.iter().enumerate() {
        let expected = family
            .template(index)?
            .substitute(&|point| results[point].clone());
        if **input != expected {
            return Err(mismatch(format!("case {index} reads {input}, expected {expected}")));
        }
        if let Some(dependency) = algebra.cases()[index].dependencies().iter().last()
            && dependency >= family.size()
        {
            return Err(SchemaError::IndexOutOfRange {
                family: family.name().to_string(),
                index: dependency,
                size: family.size(),
            });
        }
    }
    Ok(results)
}

/// Builds every member's fold node, checking the algebra and building the
/// layers up front so that mismatches surface here rather than on first use.
pub(super) fn build_fold_map(
    family: &RecursiveTypeFamily,
    algebra: &Algebra,
    cache: &FoldCache,
) -> SchemaResult<FoldMap> {
    let results = check_algebra(family, algebra)?;
    cache.layers(family, algebra)?;
    let folds = results
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            let fold = Fold {
                family: family.clone(),
                algebra: algebra.clone(),
                index,
                member: family.member(index)?,
                result,
                cache: CacheHandle::Shared(Arc::downgrade(&cache.inner)),
            };
            Ok(RewriteResult::new(
                PointFree::from_fold(fold),
                algebra.cases()[index].dependencies().clone(),
            ))
        })
        .collect::<SchemaResult<Vec<_>>>()?;
    Ok(FoldMap(folds.into()))
}

/// Builds the map from a template position over the family's members to the
/// same position over the algebra's results.
struct LayerBuilder<'a> {
    family: &'a RecursiveTypeFamily,
    algebra: &'a Algebra,
    results: &'a [Type],
    cache: &'a FoldCache,
}

impl LayerBuilder<'_> {
    fn source(&self, template: &Type) -> Type {
        let family = Arc::clone(self.family.templates());
        template.substitute(&|point| Type::Recursive(Arc::clone(&family), point))
    }

    fn target(&self, template: &Type) -> Type {
        template.substitute(&|point| self.results[point].clone())
    }

    /// `None` if the position holds no recursive occurrence.
    fn build(&self, template: &Type) -> SchemaResult<Option<PointFree>> {
        if !template.contains_recursive_point() {
            return Ok(None);
        }
        match template {
            Type::RecursivePoint(point) => {
                let fold = Fold {
                    family: self.family.clone(),
                    algebra: self.algebra.clone(),
                    index: *point,
                    member: self.family.member(*point)?,
                    result: self.results[*point].clone(),
                    cache: CacheHandle::Shared(Arc::downgrade(&self.cache.inner)),
                };
                Ok(Some(PointFree::from_fold(fold)))
            }
            Type::Product(first, second) => {
                let (source_first, target_first) = (self.source(first), self.target(first));
                let (source_second, target_second) = (self.source(second), self.target(second));
                let first_step = self
                    .build(first)?
                    .map(|layer| {
                        let optic = standard::proj1_to(
                            source_first,
                            target_first.clone(),
                            source_second.clone(),
                        );
                        PointFree::over(optic, layer)
                    })
                    .transpose()?;
                let second_step = self
                    .build(second)?
                    .map(|layer| {
                        let optic = standard::proj2_to(target_first, source_second, target_second);
                        PointFree::over(optic, layer)
                    })
                    .transpose()?;
                sequence([first_step, second_step])
            }
            Type::Sum(left, right) => {
                let (source_left, target_left) = (self.source(left), self.target(left));
                let (source_right, target_right) = (self.source(right), self.target(right));
                let left_step = self
                    .build(left)?
                    .map(|layer| {
                        let optic = standard::inj1_to(
                            source_left,
                            target_left.clone(),
                            source_right.clone(),
                        );
                        PointFree::over(optic, layer)
                    })
                    .transpose()?;
                let right_step = self
                    .build(right)?
                    .map(|layer| {
                        let optic = standard::inj2_to(target_left, source_right, target_right);
                        PointFree::over(optic, layer)
                    })
                    .transpose()?;
                sequence([left_step, right_step])
            }
            Type::List(element) => self.through(element, |source, target| {
                Ok(standard::elements_to(source, target))
            }),
            Type::Field(name, content) => self.through(content, |source, target| {
                Ok(standard::field_to(Arc::clone(name), source, target))
            }),
            Type::TaggedChoice(choice) => {
                let mut whole = self.source(template);
                let mut steps = Vec::new();
                for (name, case) in choice.cases() {
                    let Some(layer) = self.build(case)? else {
                        continue;
                    };
                    let optic = standard::case_to(&whole, name, self.target(case))?;
                    whole = optic.whole_out().clone();
                    steps.push(Some(PointFree::over(optic, layer)?));
                }
                sequence(steps)
            }
            Type::Function(..) => Err(SchemaError::NonPolynomialTemplate {
                family: self.family.name().to_string(),
                template: template.to_string(),
            }),
            Type::Unit
            | Type::Bool
            | Type::Int
            | Type::Str
            | Type::Recursive(..) => Ok(None),
        }
    }

    fn through<F>(&self, inner: &Type, optic: F) -> SchemaResult<Option<PointFree>>
    where
        F: FnOnce(Type, Type) -> SchemaResult<crate::optics::Optic>,
    {
        self.build(inner)?
            .map(|layer| PointFree::over(optic(self.source(inner), self.target(inner))?, layer))
            .transpose()
    }
}

/// Composes steps given in the order they run.
fn sequence(steps: impl IntoIterator<Item = Option<PointFree>>) -> SchemaResult<Option<PointFree>> {
    let mut chain: Vec<PointFree> = steps.into_iter().flatten().collect();
    chain.reverse();
    PointFree::comp_all(chain)
}
