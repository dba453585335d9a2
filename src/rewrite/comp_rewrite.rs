//! Rules that merge adjacent functions of a composition chain.

use super::{PointFreeRule, checked};
use crate::error::SchemaResult;
use crate::optics::{Element, Optic};
use crate::point_free::{PointFree, Term};
use crate::types::Type;

/// A rule over pairs of adjacent functions in a composition chain.
///
/// The chain is flattened (`f1 ∘ f2 ∘ ... ∘ fn`, `fn` running first) and
/// scanned pair by pair. A merged pair replaces both functions with one
/// and the scan restarts from the front, so each merge shortens the chain
/// and the scan terminates. The rule matches if at least one pair merged.
pub trait CompRewrite: Send + Sync {
    /// Merges `first ∘ second` into a single function, or `None`.
    fn rewrite_pair(&self, first: &PointFree, second: &PointFree) -> Option<PointFree>;

    /// A name for logs and debugging.
    fn rule_name(&self) -> &str;
}

impl<R: CompRewrite> PointFreeRule for R {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        if !matches!(term.term(), Term::Comp { .. }) {
            return None;
        }
        let mut chain = term.comp_chain();
        let mut merged = false;
        let mut position = 0;
        while position + 1 < chain.len() {
            match self.rewrite_pair(&chain[position], &chain[position + 1]) {
                Some(result) => {
                    chain.splice(position..=position + 1, [result]);
                    merged = true;
                    position = 0;
                }
                None => position += 1,
            }
        }
        if !merged {
            return None;
        }
        let rebuilt =
            PointFree::comp_all(chain).map(|rebuilt| rebuilt.unwrap_or_else(|| term.clone()));
        checked(self.rule_name(), term.ty(), rebuilt)
    }

    fn name(&self) -> &str {
        self.rule_name()
    }
}

/// Checks a merged pair against the type of `first ∘ second`.
pub(super) fn merged_pair(
    rule: &str,
    first: &PointFree,
    second: &PointFree,
    result: SchemaResult<PointFree>,
) -> Option<PointFree> {
    let (input, _) = second.signature()?;
    let (_, output) = first.signature()?;
    checked(rule, &Type::function(input.clone(), output.clone()), result)
}

/// Splits `over(optic, function)` into its parts.
fn optic_application(term: &PointFree) -> Option<(&Optic, &PointFree)> {
    let Term::Apply { func, arg } = term.term() else {
        return None;
    };
    match func.term() {
        Term::ProfunctorTransformer(optic) => Some((optic, arg)),
        _ => None,
    }
}

/// `over(later, f) ∘ over(earlier, g)` with the two swapped.
///
/// `later` modifies the first slot into `first_out`; `earlier` reads the
/// second slot as `second_in`. Each optic's companion is retyped to what it
/// sees after the swap.
fn swap(
    (later, f): (&Optic, &PointFree),
    (earlier, g): (&Optic, &PointFree),
    first_out: &Type,
    second_in: &Type,
) -> Option<SchemaResult<PointFree>> {
    let runs_first = later.with_outer_companion(second_in.clone())?;
    let runs_second = earlier.with_outer_companion(first_out.clone())?;
    Some(PointFree::over(runs_first, f.clone()).and_then(|now| {
        let then = PointFree::over(runs_second, g.clone())?;
        PointFree::comp(then, now)
    }))
}

/// Orders independent modifications of a pair so the first component is
/// modified first:
///
/// ```text
/// over(π1…, f) ∘ over(π2…, g)  =>  over(π2…, g) ∘ over(π1…, f)
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SortProj;

impl CompRewrite for SortProj {
    fn rewrite_pair(&self, first: &PointFree, second: &PointFree) -> Option<PointFree> {
        let (later, f) = optic_application(first)?;
        let (earlier, g) = optic_application(second)?;
        let (
            Element::Proj1 {
                focus_out: first_out,
                ..
            },
            Element::Proj2 {
                focus: second_in, ..
            },
        ) = (later.outer(), earlier.outer())
        else {
            return None;
        };
        let result = swap((later, f), (earlier, g), first_out, second_in)?;
        merged_pair(self.rule_name(), first, second, result)
    }

    fn rule_name(&self) -> &str {
        "sort-proj"
    }
}

/// [`SortProj`] for sums: the left case is modified before the right one.
///
/// ```text
/// over(ι1…, f) ∘ over(ι2…, g)  =>  over(ι2…, g) ∘ over(ι1…, f)
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SortInj;

impl CompRewrite for SortInj {
    fn rewrite_pair(&self, first: &PointFree, second: &PointFree) -> Option<PointFree> {
        let (later, f) = optic_application(first)?;
        let (earlier, g) = optic_application(second)?;
        let (
            Element::Inj1 {
                focus_out: first_out,
                ..
            },
            Element::Inj2 {
                focus: second_in, ..
            },
        ) = (later.outer(), earlier.outer())
        else {
            return None;
        };
        let result = swap((later, f), (earlier, g), first_out, second_in)?;
        merged_pair(self.rule_name(), first, second, result)
    }

    fn rule_name(&self) -> &str {
        "sort-inj"
    }
}

/// Merges two modifications through optics sharing a leading path.
///
/// With `P` the shared prefix:
///
/// ```text
/// over(P ◦ q, f) ∘ over(P ◦ r, g)  =>  over(P, over(q, f) ∘ over(r, g))
/// over(P, f) ∘ over(P, g)          =>  over(P, f ∘ g)
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct LensComp;

impl CompRewrite for LensComp {
    fn rewrite_pair(&self, first: &PointFree, second: &PointFree) -> Option<PointFree> {
        let (later, f) = optic_application(first)?;
        let (earlier, g) = optic_application(second)?;
        let shared = earlier.shared_prefix(later)?;
        let through = |rest: Option<Optic>, function: &PointFree| match rest {
            Some(rest) => PointFree::over(rest, function.clone()),
            None => Ok(function.clone()),
        };
        let result = through(shared.later_rest, f)
            .and_then(|later| PointFree::comp(later, through(shared.earlier_rest, g)?))
            .and_then(|inner| PointFree::over(shared.prefix, inner));
        merged_pair(self.rule_name(), first, second, result)
    }

    fn rule_name(&self) -> &str {
        "lens-comp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::standard;
    use crate::types::{Value, no_backend};
    use rstest::rstest;

    fn negate() -> PointFree {
        PointFree::lift("negate", Type::Int, Type::Int, |value| {
            Ok(Value::Int(-value.as_int()?))
        })
    }

    fn show() -> PointFree {
        PointFree::lift("show", Type::Int, Type::Str, |value| {
            Ok(Value::string(value.as_int()?.to_string()))
        })
    }

    fn not() -> PointFree {
        PointFree::lift("not", Type::Bool, Type::Bool, |value| {
            Ok(Value::Bool(!value.as_bool()?))
        })
    }

    #[rstest]
    fn test_sort_proj_moves_first_component_first() {
        let second = PointFree::over(standard::proj2_to(Type::Int, Type::Bool, Type::Bool), not()).unwrap();
        let first = PointFree::over(standard::proj1_to(Type::Int, Type::Str, Type::Bool), show()).unwrap();
        let term = PointFree::comp(first, second).unwrap();

        let sorted = SortProj.rewrite(&term).unwrap();

        let chain = sorted.comp_chain();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].to_string(), "(ap optic[π2] not)");
        assert_eq!(chain[1].to_string(), "(ap optic[π1] show)");
        let pair = Value::pair(Value::Int(4), Value::Bool(false));
        assert_eq!(
            sorted.call(&no_backend(), pair.clone()),
            Ok(Value::pair(Value::string("4"), Value::Bool(true)))
        );
        assert_eq!(SortProj.rewrite(&sorted), None);
    }

    #[rstest]
    fn test_sort_inj_retypes_companions() {
        let right = PointFree::over(standard::inj2(Type::Int, Type::Bool), not()).unwrap();
        let left = PointFree::over(standard::inj1_to(Type::Int, Type::Str, Type::Bool), show()).unwrap();
        let term = PointFree::comp(left, right).unwrap();

        let sorted = SortInj.rewrite(&term).unwrap();

        assert_eq!(sorted.ty(), term.ty());
        for value in [Value::left(Value::Int(7)), Value::right(Value::Bool(true))] {
            assert_eq!(
                sorted.call(&no_backend(), value.clone()),
                term.call(&no_backend(), value)
            );
        }
    }

    #[rstest]
    fn test_lens_comp_fuses_equal_paths() {
        let negate = negate();
        let optic = standard::proj1(Type::Int, Type::Str);
        let once = PointFree::over(optic.clone(), negate.clone()).unwrap();
        let term = PointFree::comp(once.clone(), once).unwrap();

        let fused = LensComp.rewrite(&term).unwrap();

        assert_eq!(
            fused,
            PointFree::over(optic, PointFree::comp(negate.clone(), negate).unwrap()).unwrap()
        );
    }

    #[rstest]
    fn test_lens_comp_fuses_identity_optics() {
        let negate = negate();
        let optic = standard::identity(Type::Int);
        let term = PointFree::comp(
            PointFree::over(optic.clone(), negate.clone()).unwrap(),
            PointFree::over(optic.clone(), negate.clone()).unwrap(),
        )
        .unwrap();

        let fused = LensComp.rewrite(&term).unwrap();

        assert_eq!(
            fused,
            PointFree::over(optic, PointFree::comp(negate.clone(), negate).unwrap()).unwrap()
        );
        assert_eq!(fused.call(&no_backend(), Value::Int(3)), Ok(Value::Int(3)));
    }

    #[rstest]
    fn test_lens_comp_splits_diverging_paths() {
        let inner = Type::product(Type::Int, Type::Bool);
        let outer = standard::proj1(inner.clone(), Type::Str);
        let left = outer.compose(&standard::proj1(Type::Int, Type::Bool)).unwrap();
        let right = outer.compose(&standard::proj2(Type::Int, Type::Bool)).unwrap();
        let term = PointFree::comp(
            PointFree::over(left, negate()).unwrap(),
            PointFree::over(right, not()).unwrap(),
        )
        .unwrap();

        let fused = LensComp.rewrite(&term).unwrap();

        assert!(fused.to_string().starts_with("(ap optic[π1] "));
        let value = Value::pair(Value::pair(Value::Int(1), Value::Bool(true)), Value::string("s"));
        assert_eq!(
            fused.call(&no_backend(), value.clone()),
            term.call(&no_backend(), value)
        );
    }

    #[rstest]
    fn test_lens_comp_needs_shared_prefix() {
        let term = PointFree::comp(
            PointFree::over(standard::proj1(Type::Int, Type::Int), negate()).unwrap(),
            PointFree::over(standard::proj2(Type::Int, Type::Int), negate()).unwrap(),
        )
        .unwrap();

        assert_eq!(LensComp.rewrite(&term), None);
    }
}
