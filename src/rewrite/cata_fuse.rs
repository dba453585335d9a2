//! Fusion of two catamorphisms run one after the other.
//!
//! Both rules match `fold(A) ∘ fold(B)` over the same member of the same
//! family, with both algebras type-preserving, and build a single fold whose
//! algebra combines `A` and `B` per index. They refuse whenever a case of
//! one algebra reads an index the other modifies, since the two passes
//! would then observe each other's output in a different order once fused.

use super::comp_rewrite::{CompRewrite, merged_pair};
use crate::error::SchemaResult;
use crate::family::{Algebra, Fold, IndexSet, RewriteResult};
use crate::point_free::{PointFree, Term};

/// Two compatible folds: `later ∘ earlier`.
struct FoldPair<'a> {
    later: &'a Fold,
    earlier: &'a Fold,
    later_modified: IndexSet,
    earlier_modified: IndexSet,
}

impl<'a> FoldPair<'a> {
    fn new(first: &'a PointFree, second: &'a PointFree) -> Option<Self> {
        let (Term::Fold(later), Term::Fold(earlier)) = (first.term(), second.term()) else {
            return None;
        };
        let family = later.family();
        if family != earlier.family()
            || later.index() != earlier.index()
            || !later.algebra().is_type_preserving(family)
            || !earlier.algebra().is_type_preserving(family)
        {
            return None;
        }
        Some(Self {
            later,
            earlier,
            later_modified: later.algebra().modified(),
            earlier_modified: earlier.algebra().modified(),
        })
    }

    /// Some case of one algebra reads an index the other one modifies.
    fn ordering_sensitive(&self) -> bool {
        let reads_modified = |algebra: &Algebra, modified: &IndexSet| {
            algebra
                .cases()
                .iter()
                .any(|case| case.dependencies().intersects(modified))
        };
        reads_modified(self.later.algebra(), &self.earlier_modified)
            || reads_modified(self.earlier.algebra(), &self.later_modified)
    }

    /// Case `index` of the side that modifies it, or the untouched case.
    fn one_sided(&self, index: usize) -> SchemaResult<RewriteResult> {
        let family = self.later.family();
        let side = if self.later_modified.contains(index) {
            self.later.algebra().case(index)
        } else if self.earlier_modified.contains(index) {
            self.earlier.algebra().case(index)
        } else {
            None
        };
        side.cloned()
            .map_or_else(|| RewriteResult::nop(family, index), Ok)
    }

    /// `later_k ∘ out(member k) ∘ earlier_k`, reading both sides' inputs.
    fn sequenced(&self, index: usize) -> SchemaResult<RewriteResult> {
        let family = self.later.family();
        let (Some(later), Some(earlier)) = (
            self.later.algebra().case(index),
            self.earlier.algebra().case(index),
        ) else {
            return RewriteResult::nop(family, index);
        };
        let unroll = PointFree::unroll(family.member(index)?)?;
        let function = PointFree::comp(
            later.function().clone(),
            PointFree::comp(unroll, earlier.function().clone())?,
        )?;
        let dependencies = later.dependencies().union(earlier.dependencies());
        Ok(RewriteResult::new(function, dependencies))
    }

    /// The fold of the algebra whose case `i` is `case(i)`.
    fn fuse<F>(&self, case: F) -> SchemaResult<PointFree>
    where
        F: Fn(usize) -> SchemaResult<RewriteResult>,
    {
        let family = self.later.family();
        let cases = (0..family.size()).map(case).collect::<SchemaResult<Vec<_>>>()?;
        let name = format!("{}∘{}", self.later.algebra().name(), self.earlier.algebra().name());
        let algebra = Algebra::new(name, cases);
        let folds = family.fold(&algebra, &self.later.cache())?;
        Ok(folds
            .get(self.later.index())
            .map_or_else(|| PointFree::id(self.later.member().clone()), |fold| {
                fold.function().clone()
            }))
    }
}

/// Fuses two folds that both modify exactly one index, the same one.
///
/// At the shared index the fused case runs the earlier case, rolls its
/// result back into one layer, and runs the later case on it. Every other
/// index keeps whichever side modifies it.
#[derive(Clone, Copy, Debug, Default)]
pub struct CataFuseSame;

impl CompRewrite for CataFuseSame {
    fn rewrite_pair(&self, first: &PointFree, second: &PointFree) -> Option<PointFree> {
        let pair = FoldPair::new(first, second)?;
        let shared = pair.later_modified.intersection(&pair.earlier_modified);
        if shared.len() != 1 || pair.ordering_sensitive() {
            return None;
        }
        let result = pair.fuse(|index| {
            if shared.contains(index) {
                pair.sequenced(index)
            } else {
                pair.one_sided(index)
            }
        });
        merged_pair(self.rule_name(), first, second, result)
    }

    fn rule_name(&self) -> &str {
        "cata-fuse-same"
    }
}

/// Fuses two folds modifying disjoint sets of indices: each index keeps the
/// side that modifies it.
#[derive(Clone, Copy, Debug, Default)]
pub struct CataFuseDifferent;

impl CompRewrite for CataFuseDifferent {
    fn rewrite_pair(&self, first: &PointFree, second: &PointFree) -> Option<PointFree> {
        let pair = FoldPair::new(first, second)?;
        if pair.later_modified.intersects(&pair.earlier_modified) || pair.ordering_sensitive() {
            return None;
        }
        let result = pair.fuse(|index| pair.one_sided(index));
        merged_pair(self.rule_name(), first, second, result)
    }

    fn rule_name(&self) -> &str {
        "cata-fuse-different"
    }
}
