//! Cached rule application.

use std::fmt;

use parking_lot::RwLock;

use super::{Rule, rules};
use crate::CacheMap;
use crate::point_free::PointFree;

/// Runs a rule over terms, remembering the result for every input.
///
/// # Examples
///
/// ```rust
/// use datafix::optics::standard;
/// use datafix::point_free::PointFree;
/// use datafix::rewrite::Optimizer;
/// use datafix::types::Type;
///
/// let untouched = PointFree::over(standard::proj1(Type::Int, Type::Str), PointFree::id(Type::Int))
///     .unwrap();
///
/// let optimizer = Optimizer::standard();
/// assert_eq!(optimizer.optimize(&untouched), PointFree::id(Type::product(Type::Int, Type::Str)));
/// assert_eq!(optimizer.cached(), 1);
/// ```
pub struct Optimizer {
    rule: Rule,
    cache: RwLock<CacheMap<PointFree, PointFree>>,
}

impl Optimizer {
    /// An optimizer running `rule`.
    #[must_use]
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            cache: RwLock::default(),
        }
    }

    /// An optimizer running [`rules::standard`].
    #[must_use]
    pub fn standard() -> Self {
        Self::new(rules::standard())
    }

    /// The rule being run.
    #[must_use]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Number of remembered results.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }

    /// Rewrites `term` with the rule, or returns it unchanged if the rule
    /// does not apply.
    #[must_use]
    pub fn optimize(&self, term: &PointFree) -> PointFree {
        if let Some(optimized) = self.cache.read().get(term) {
            return optimized.clone();
        }
        let rewritten = self.rule.rewrite_or_nop(term);
        let optimized = if rewritten.ty() == term.ty() {
            rewritten
        } else {
            tracing::error!(
                rule = self.rule.name(),
                expected = %term.ty(),
                found = %rewritten.ty(),
                "optimization changed the type of a term; keeping the input"
            );
            term.clone()
        };
        tracing::debug!(
            rule = self.rule.name(),
            changed = optimized != *term,
            "optimized term"
        );
        self.cache
            .write()
            .entry(term.clone())
            .or_insert(optimized)
            .clone()
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Optimizer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Optimizer")
            .field("rule", &self.rule.name())
            .field("cached", &self.cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::strategy;
    use crate::types::{Type, Value};
    use rstest::rstest;

    #[rstest]
    fn test_optimize_caches_by_term() {
        let discard = PointFree::lift("discard", Type::Int, Type::Unit, |_| Ok(Value::Unit));
        let optimizer = Optimizer::new(strategy::everywhere(strategy::nop(), rules::bang_eta()));

        let first = optimizer.optimize(&discard);
        let second = optimizer.optimize(&discard);

        assert_eq!(first, PointFree::bang(Type::Int));
        assert!(first.ptr_eq(&second));
        assert_eq!(optimizer.cached(), 1);
    }

    #[rstest]
    fn test_unmatched_term_is_returned_unchanged() {
        let negate = PointFree::lift("negate", Type::Int, Type::Int, |value| {
            Ok(Value::Int(-value.as_int()?))
        });
        let optimizer = Optimizer::new(rules::bang_eta());

        assert_eq!(optimizer.optimize(&negate), negate);
    }
}
