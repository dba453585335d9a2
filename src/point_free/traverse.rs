//! The `all` and `one` hooks used by traversal strategies.
//!
//! Rules preserve types, so a parent is rebuilt around rewritten children
//! without re-checking; only the `Id` collapse of `comp` is reapplied.

use super::{PointFree, Term};
use crate::family::{Fold, RewriteResult};
use crate::rewrite::PointFreeRule;

impl PointFree {
    /// Rewrites every direct child with `rule` (children it does not match
    /// stay as they are) and rebuilds.
    ///
    /// The children of a `Fold` are its algebra's case functions.
    #[must_use]
    pub fn all(&self, rule: &dyn PointFreeRule) -> Self {
        match self.term() {
            Term::Apply { func, arg } => {
                self.with_apply(rule.rewrite_or_nop(func), rule.rewrite_or_nop(arg))
            }
            Term::Comp { first, second } => {
                self.with_comp(rule.rewrite_or_nop(first), rule.rewrite_or_nop(second))
            }
            Term::Fold(fold) => {
                let cases = fold
                    .algebra()
                    .cases()
                    .iter()
                    .map(|case| case.map_function(|function| rule.rewrite_or_nop(function)))
                    .collect();
                self.with_fold_cases(fold, cases)
            }
            _ => self.clone(),
        }
    }

    /// Rewrites the first direct child `rule` matches and rebuilds.
    ///
    /// Returns `None` if no child matches.
    #[must_use]
    pub fn one(&self, rule: &dyn PointFreeRule) -> Option<Self> {
        match self.term() {
            Term::Apply { func, arg } => {
                if let Some(func) = rule.rewrite(func) {
                    return Some(self.with_apply(func, arg.clone()));
                }
                rule.rewrite(arg)
                    .map(|arg| self.with_apply(func.clone(), arg))
            }
            Term::Comp { first, second } => {
                if let Some(first) = rule.rewrite(first) {
                    return Some(self.with_comp(first, second.clone()));
                }
                rule.rewrite(second)
                    .map(|second| self.with_comp(first.clone(), second))
            }
            Term::Fold(fold) => {
                let cases = fold.algebra().cases();
                let (position, rewritten) = cases
                    .iter()
                    .enumerate()
                    .find_map(|(position, case)| {
                        rule.rewrite(case.function()).map(|function| (position, function))
                    })?;
                let cases = cases
                    .iter()
                    .enumerate()
                    .map(|(index, case)| {
                        if index == position {
                            RewriteResult::new(rewritten.clone(), case.dependencies().clone())
                        } else {
                            case.clone()
                        }
                    })
                    .collect();
                Some(self.with_fold_cases(fold, cases))
            }
            _ => None,
        }
    }

    fn with_apply(&self, func: Self, arg: Self) -> Self {
        match self.term() {
            Term::Apply {
                func: old_func,
                arg: old_arg,
            } if old_func.ptr_eq(&func) && old_arg.ptr_eq(&arg) => self.clone(),
            _ => Self::from_parts(Term::Apply { func, arg }, self.ty().clone()),
        }
    }

    fn with_comp(&self, first: Self, second: Self) -> Self {
        if first.is_id() {
            return second;
        }
        if second.is_id() {
            return first;
        }
        match self.term() {
            Term::Comp {
                first: old_first,
                second: old_second,
            } if old_first.ptr_eq(&first) && old_second.ptr_eq(&second) => self.clone(),
            _ => Self::from_parts(Term::Comp { first, second }, self.ty().clone()),
        }
    }

    fn with_fold_cases(&self, fold: &Fold, cases: Vec<RewriteResult>) -> Self {
        let unchanged = fold
            .algebra()
            .cases()
            .iter()
            .zip(cases.iter())
            .all(|(old, new)| old.function().ptr_eq(new.function()));
        if unchanged {
            return self.clone();
        }
        Self::from_fold(fold.with_algebra(fold.algebra().with_cases(cases)))
    }
}
