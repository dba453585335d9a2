//! Strategy combinators.
//!
//! Each combinator builds a [`Rule`] from other rules. The traversals
//! ([`all`], [`one`], [`once`], [`everywhere`]) walk children through the
//! term's own [`PointFree::all`] and [`PointFree::one`] hooks.

use std::sync::Arc;

use super::{PointFreeRule, Rule};
use crate::point_free::PointFree;

fn joined(rules: &[Rule]) -> String {
    rules
        .iter()
        .map(|rule| rule.name())
        .collect::<Vec<_>>()
        .join(", ")
}

struct Nop;

impl PointFreeRule for Nop {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        Some(term.clone())
    }

    fn name(&self) -> &str {
        "nop"
    }
}

/// Always matches and changes nothing.
#[must_use]
pub fn nop() -> Rule {
    Arc::new(Nop)
}

struct Seq {
    rules: Vec<Rule>,
    name: String,
}

impl PointFreeRule for Seq {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        self.rules
            .iter()
            .try_fold(term.clone(), |current, rule| rule.rewrite(&current))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Applies every rule in order, each to the previous one's result.
///
/// Matches only if every step matches.
#[must_use]
pub fn seq(rules: Vec<Rule>) -> Rule {
    let name = format!("seq({})", joined(&rules));
    Arc::new(Seq { rules, name })
}

struct Choice {
    rules: Vec<Rule>,
    name: String,
}

impl PointFreeRule for Choice {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        self.rules.iter().find_map(|rule| rule.rewrite(term))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The first rule that matches wins. No match if none does.
#[must_use]
pub fn choice(rules: Vec<Rule>) -> Rule {
    let name = format!("choice({})", joined(&rules));
    Arc::new(Choice { rules, name })
}

/// `first`, or `second` if `first` does not match.
#[must_use]
pub fn or_else(first: Rule, second: Rule) -> Rule {
    choice(vec![first, second])
}

struct All {
    rule: Rule,
    name: String,
}

impl PointFreeRule for All {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        Some(term.all(self.rule.as_ref()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Rewrites every direct child. Always matches.
#[must_use]
pub fn all(rule: Rule) -> Rule {
    let name = format!("all({})", rule.name());
    Arc::new(All { rule, name })
}

struct One {
    rule: Rule,
    name: String,
}

impl PointFreeRule for One {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        term.one(self.rule.as_ref())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Rewrites the first direct child the rule matches.
#[must_use]
pub fn one(rule: Rule) -> Rule {
    let name = format!("one({})", rule.name());
    Arc::new(One { rule, name })
}

struct Once {
    rule: Rule,
    name: String,
}

impl PointFreeRule for Once {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        self.rule.rewrite(term).or_else(|| term.one(self))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Rewrites the first position, in pre-order, that the rule matches.
#[must_use]
pub fn once(rule: Rule) -> Rule {
    let name = format!("once({})", rule.name());
    Arc::new(Once { rule, name })
}

struct Many {
    rule: Rule,
    name: String,
}

impl PointFreeRule for Many {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        let mut current = term.clone();
        let mut rounds = 0_usize;
        while let Some(next) = self.rule.rewrite(&current) {
            if next == current {
                break;
            }
            current = next;
            rounds += 1;
        }
        tracing::trace!(rule = %self.name, rounds, "fixed point reached");
        Some(current)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Repeats the rule at the root until it stops matching or stops changing
/// the term. Always matches.
#[must_use]
pub fn many(rule: Rule) -> Rule {
    let name = format!("many({})", rule.name());
    Arc::new(Many { rule, name })
}

struct Everywhere {
    top: Rule,
    bottom: Rule,
    name: String,
}

impl PointFreeRule for Everywhere {
    fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
        let term = self.top.rewrite_or_nop(term);
        let term = term.all(self);
        Some(self.bottom.rewrite_or_nop(&term))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Applies `top` at the root, then the whole pass to every child, then
/// `bottom` at the root. Positions a rule does not match stay unchanged, so
/// this always matches.
#[must_use]
pub fn everywhere(top: Rule, bottom: Rule) -> Rule {
    let name = format!("everywhere({}, {})", top.name(), bottom.name());
    Arc::new(Everywhere { top, bottom, name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point_free::Term;
    use crate::types::{Type, Value};
    use rstest::rstest;

    /// Rewrites primitive `from` into primitive `to`.
    struct Rename {
        from: &'static str,
        to: PointFree,
    }

    impl PointFreeRule for Rename {
        fn rewrite(&self, term: &PointFree) -> Option<PointFree> {
            match term.term() {
                Term::FunctionWrapper(primitive) if primitive.name() == self.from => {
                    Some(self.to.clone())
                }
                _ => None,
            }
        }

        fn name(&self) -> &str {
            self.from
        }
    }

    fn primitive(name: &'static str) -> PointFree {
        PointFree::lift(name, Type::Int, Type::Int, Ok)
    }

    fn rename(from: &'static str, to: &PointFree) -> Rule {
        Arc::new(Rename {
            from,
            to: to.clone(),
        })
    }

    #[rstest]
    fn test_seq_requires_every_step() {
        let (a, b, c) = (primitive("a"), primitive("b"), primitive("c"));
        let both = seq(vec![rename("a", &b), rename("b", &c)]);
        let broken = seq(vec![rename("a", &b), rename("a", &c)]);

        assert_eq!(both.rewrite(&a), Some(c));
        assert_eq!(broken.rewrite(&a), None);
    }

    #[rstest]
    fn test_choice_takes_first_match() {
        let (a, b, c) = (primitive("a"), primitive("b"), primitive("c"));
        let rule = choice(vec![rename("x", &c), rename("a", &b), rename("a", &c)]);

        assert_eq!(rule.rewrite(&a), Some(b));
        assert_eq!(choice(Vec::new()).rewrite(&a), None);
        assert_eq!(rule.name(), "choice(x, a, a)");
    }

    #[rstest]
    fn test_once_searches_children() {
        let (a, b, c) = (primitive("a"), primitive("b"), primitive("c"));
        let term = PointFree::comp(c.clone(), PointFree::comp(b.clone(), a.clone()).unwrap()).unwrap();
        let expected = PointFree::comp(c.clone(), PointFree::comp(b.clone(), b.clone()).unwrap()).unwrap();

        assert_eq!(once(rename("a", &b)).rewrite(&term), Some(expected));
        assert_eq!(once(rename("z", &b)).rewrite(&term), None);
    }

    #[rstest]
    fn test_many_reaches_fixed_point() {
        let (a, b, c) = (primitive("a"), primitive("b"), primitive("c"));
        let rule = many(choice(vec![rename("a", &b), rename("b", &c)]));

        assert_eq!(rule.rewrite(&a), Some(c.clone()));
        assert_eq!(rule.rewrite(&c), Some(c));
    }

    #[rstest]
    fn test_everywhere_rewrites_nested_positions() {
        let (a, b) = (primitive("a"), primitive("b"));
        let term = PointFree::comp(a.clone(), PointFree::comp(a.clone(), a.clone()).unwrap()).unwrap();
        let expected = PointFree::comp(b.clone(), PointFree::comp(b.clone(), b.clone()).unwrap()).unwrap();

        assert_eq!(everywhere(nop(), rename("a", &b)).rewrite(&term), Some(expected));
    }

    #[rstest]
    fn test_all_always_matches() {
        let a = primitive("a");
        let value = PointFree::lift("value", Type::Unit, Type::Int, |_| Ok(Value::Int(1)));

        assert_eq!(all(rename("z", &a)).rewrite(&value), Some(value.clone()));
        assert_eq!(one(rename("z", &a)).rewrite(&value), None);
    }
}
