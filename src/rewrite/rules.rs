//! Simplification rules and the standard catalog.

use std::sync::Arc;

use super::strategy::{choice, everywhere, many, nop};
use super::{CataFuseDifferent, CataFuseSame, LensComp, PointFreeRule, Rule, SortInj, SortProj, checked};
use crate::point_free::{PointFree, Term};

/// Canonicalizes any function into the unit type as `!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BangEta;

impl PointFreeRule for BangEta {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        if matches!(term.term(), Term::Bang(_)) {
            return None;
        }
        let (input, output) = term.signature()?;
        if !output.is_unit() {
            return None;
        }
        checked(self.name(), term.ty(), Ok(PointFree::bang(input.clone())))
    }

    fn name(&self) -> &str {
        "bang-eta"
    }
}

/// `over(optic, id)` is `id` for a type-preserving optic.
#[derive(Clone, Copy, Debug, Default)]
pub struct LensAppId;

impl PointFreeRule for LensAppId {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        let Term::Apply { func, arg } = term.term() else {
            return None;
        };
        let Term::ProfunctorTransformer(optic) = func.term() else {
            return None;
        };
        if !arg.is_id() || !optic.is_simple() {
            return None;
        }
        checked(self.name(), term.ty(), Ok(PointFree::id(optic.whole().clone())))
    }

    fn name(&self) -> &str {
        "lens-app-id"
    }
}

/// `f (g x)` becomes `(f ∘ g) x`.
///
/// When both `f` and `g` are frozen optics, the optics are composed instead:
/// `over(o1, over(o2, x))` becomes `over(o1 ◦ o2, x)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppNest;

impl PointFreeRule for AppNest {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        let Term::Apply { func: outer, arg } = term.term() else {
            return None;
        };
        let Term::Apply { func: inner, arg } = arg.term() else {
            return None;
        };
        if let (Term::ProfunctorTransformer(outer_optic), Term::ProfunctorTransformer(inner_optic)) =
            (outer.term(), inner.term())
        {
            let fused = outer_optic
                .compose(inner_optic)
                .and_then(PointFree::profunctor_transformer)
                .and_then(|transformer| PointFree::apply(transformer, arg.clone()));
            return checked(self.name(), term.ty(), fused);
        }
        let fused = PointFree::comp(outer.clone(), inner.clone())
            .and_then(|composed| PointFree::apply(composed, arg.clone()));
        checked(self.name(), term.ty(), fused)
    }

    fn name(&self) -> &str {
        "app-nest"
    }
}

/// `f ∘ (g ∘ h)` becomes `(f ∘ g) ∘ h`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompAssocLeft;

impl PointFreeRule for CompAssocLeft {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        let Term::Comp { first, second } = term.term() else {
            return None;
        };
        let Term::Comp {
            first: middle,
            second: last,
        } = second.term()
        else {
            return None;
        };
        let result = PointFree::comp(first.clone(), middle.clone())
            .and_then(|head| PointFree::comp(head, last.clone()));
        checked(self.name(), term.ty(), result)
    }

    fn name(&self) -> &str {
        "comp-assoc-left"
    }
}

/// `(f ∘ g) ∘ h` becomes `f ∘ (g ∘ h)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompAssocRight;

impl PointFreeRule for CompAssocRight {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        let Term::Comp { first, second } = term.term() else {
            return None;
        };
        let Term::Comp {
            first: head,
            second: middle,
        } = first.term()
        else {
            return None;
        };
        let result = PointFree::comp(middle.clone(), second.clone())
            .and_then(|tail| PointFree::comp(head.clone(), tail));
        checked(self.name(), term.ty(), result)
    }

    fn name(&self) -> &str {
        "comp-assoc-right"
    }
}

/// [`BangEta`] as a shared rule.
#[must_use]
pub fn bang_eta() -> Rule {
    Arc::new(BangEta)
}

/// [`LensAppId`] as a shared rule.
#[must_use]
pub fn lens_app_id() -> Rule {
    Arc::new(LensAppId)
}

/// [`AppNest`] as a shared rule.
#[must_use]
pub fn app_nest() -> Rule {
    Arc::new(AppNest)
}

/// [`CompAssocLeft`] as a shared rule.
#[must_use]
pub fn comp_assoc_left() -> Rule {
    Arc::new(CompAssocLeft)
}

/// [`CompAssocRight`] as a shared rule.
#[must_use]
pub fn comp_assoc_right() -> Rule {
    Arc::new(CompAssocRight)
}

/// Every catalog rule, tried in order at one position.
#[must_use]
pub fn catalog() -> Rule {
    choice(vec![
        bang_eta(),
        lens_app_id(),
        app_nest(),
        Arc::new(SortProj),
        Arc::new(SortInj),
        Arc::new(LensComp),
        Arc::new(CataFuseSame),
        Arc::new(CataFuseDifferent),
    ])
}

/// The catalog applied bottom-up across the whole term, repeated until
/// nothing changes.
#[must_use]
pub fn standard() -> Rule {
    many(everywhere(nop(), catalog()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::standard as optics;
    use crate::types::{Type, Value, no_backend};
    use rstest::rstest;

    fn negate() -> PointFree {
        PointFree::lift("negate", Type::Int, Type::Int, |value| {
            Ok(Value::Int(-value.as_int()?))
        })
    }

    #[rstest]
    fn test_bang_eta_skips_bang_and_non_unit() {
        assert_eq!(BangEta.rewrite(&PointFree::bang(Type::Int)), None);
        assert_eq!(BangEta.rewrite(&negate()), None);

        let discard = PointFree::comp(PointFree::bang(Type::Int), negate()).unwrap();
        assert_eq!(BangEta.rewrite(&discard), Some(PointFree::bang(Type::Int)));
    }

    #[rstest]
    fn test_lens_app_id_needs_simple_optic() {
        let simple = PointFree::over(optics::proj1(Type::Int, Type::Str), PointFree::id(Type::Int)).unwrap();

        assert_eq!(
            LensAppId.rewrite(&simple),
            Some(PointFree::id(Type::product(Type::Int, Type::Str)))
        );
        assert_eq!(
            LensAppId.rewrite(&PointFree::over(optics::proj1(Type::Int, Type::Str), negate()).unwrap()),
            None
        );
    }

    #[rstest]
    fn test_app_nest_composes_optics() {
        let pair = Type::product(Type::Int, Type::Bool);
        let outer = optics::proj2(Type::Str, pair.clone());
        let inner = optics::proj1(Type::Int, Type::Bool);
        let nested = PointFree::over(outer.clone(), PointFree::over(inner.clone(), negate()).unwrap()).unwrap();

        let fused = AppNest.rewrite(&nested).unwrap();

        assert_eq!(fused, PointFree::over(outer.compose(&inner).unwrap(), negate()).unwrap());
        let value = Value::pair(Value::string("s"), Value::pair(Value::Int(2), Value::Bool(true)));
        assert_eq!(
            fused.call(&no_backend(), value.clone()),
            nested.call(&no_backend(), value)
        );
    }

    #[rstest]
    fn test_assoc_rules_are_inverse() {
        let term = PointFree::comp(negate(), PointFree::comp(negate(), negate()).unwrap()).unwrap();

        let left = CompAssocLeft.rewrite(&term).unwrap();

        assert_ne!(left, term);
        assert_eq!(CompAssocRight.rewrite(&left), Some(term));
    }
}
