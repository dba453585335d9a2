//! The leveled pretty printer.
//!
//! Leaves print on one line. A composition chain prints one function per
//! line, each prefixed by `◦ ` and indented two spaces per level:
//!
//! ```text
//! (ap optic[π1] negate)
//!   ◦ (ap optic[π2] show)
//! ```

use std::fmt::Write;

use super::{PointFree, Term};

const INDENT: &str = "  ";

impl PointFree {
    /// Renders the term, indenting continuation lines by `level` steps.
    #[must_use]
    pub fn to_string_at(&self, level: usize) -> String {
        let mut out = String::new();
        self.render(level, &mut out);
        out
    }

    fn render(&self, level: usize, out: &mut String) {
        match self.term() {
            Term::Id(_) => out.push_str("id"),
            Term::Bang(_) => out.push('!'),
            Term::FunctionWrapper(primitive) => out.push_str(primitive.name()),
            Term::ProfunctorTransformer(optic) => {
                let _ = write!(out, "optic[{optic}]");
            }
            Term::In(ty) => {
                let _ = write!(out, "in[{ty}]");
            }
            Term::Out(ty) => {
                let _ = write!(out, "out[{ty}]");
            }
            Term::Fold(fold) => {
                let _ = write!(
                    out,
                    "fold[{}#{} {}]",
                    fold.family().name(),
                    fold.index(),
                    fold.algebra().name()
                );
            }
            Term::Apply { func, arg } => {
                out.push_str("(ap ");
                func.render(level, out);
                out.push(' ');
                arg.render(level, out);
                out.push(')');
            }
            Term::Comp { .. } => {
                for (position, function) in self.comp_chain().iter().enumerate() {
                    if position > 0 {
                        out.push('\n');
                        out.push_str(&INDENT.repeat(level + 1));
                        out.push_str("◦ ");
                    }
                    function.render(level + 1, out);
                }
            }
        }
    }

    /// Flattens nested compositions, outermost (last to run) first.
    #[must_use]
    pub fn comp_chain(&self) -> Vec<Self> {
        let mut chain = Vec::new();
        let mut pending = vec![self.clone()];
        while let Some(term) = pending.pop() {
            match term.term() {
                Term::Comp { first, second } => {
                    pending.push(second.clone());
                    pending.push(first.clone());
                }
                _ => chain.push(term),
            }
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::standard;
    use crate::types::{Type, Value};
    use rstest::rstest;

    fn negate() -> PointFree {
        PointFree::lift("negate", Type::Int, Type::Int, |value| {
            Ok(Value::Int(-value.as_int()?))
        })
    }

    #[rstest]
    fn test_leaves() {
        assert_eq!(PointFree::id(Type::Int).to_string(), "id");
        assert_eq!(PointFree::bang(Type::Int).to_string(), "!");
        assert_eq!(negate().to_string(), "negate");
    }

    #[rstest]
    fn test_apply_prints_inline() {
        let term = PointFree::over(standard::proj1(Type::Int, Type::Str), negate()).unwrap();

        assert_eq!(term.to_string(), "(ap optic[π1] negate)");
    }

    #[rstest]
    fn test_comp_prints_one_function_per_line() {
        let term = PointFree::comp(negate(), negate()).unwrap();

        assert_eq!(term.to_string(), "negate\n  ◦ negate");
        assert_eq!(term.to_string_at(1), "negate\n    ◦ negate");
    }

    #[rstest]
    fn test_comp_chain_flattens_both_sides() {
        let left = PointFree::comp(negate(), negate()).unwrap();
        let term = PointFree::comp(left.clone(), left).unwrap();

        assert_eq!(term.comp_chain().len(), 4);
    }
}
