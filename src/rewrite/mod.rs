//! The rewrite engine.
//!
//! A [`PointFreeRule`] maps a term to an equivalent one, or reports that it
//! does not apply by returning `None`. Not applying is never an error.
//! Strategies in [`strategy`] combine rules and walk them through terms;
//! [`rules`] holds the catalog of simplification and fusion rules, and
//! [`Optimizer`] runs a rule with a result cache.
//!
//! # Example
//!
//! ```rust
//! use datafix::point_free::PointFree;
//! use datafix::rewrite::{PointFreeRule, rules, strategy};
//! use datafix::types::{Type, Value};
//!
//! let discard = PointFree::lift("discard", Type::Int, Type::Unit, |_| Ok(Value::Unit));
//! let rule = strategy::once(rules::bang_eta());
//!
//! assert_eq!(rule.rewrite(&discard), Some(PointFree::bang(Type::Int)));
//! ```

use std::sync::Arc;

use crate::error::SchemaResult;
use crate::point_free::PointFree;
use crate::types::Type;

mod cata_fuse;
mod comp_rewrite;
mod optimizer;
pub mod rules;
pub mod strategy;

pub use cata_fuse::{CataFuseDifferent, CataFuseSame};
pub use comp_rewrite::{CompRewrite, LensComp, SortInj, SortProj};
pub use optimizer::Optimizer;

/// A rewrite rule over point-free terms.
///
/// Rules must preserve the type of the term they rewrite.
pub trait PointFreeRule: Send + Sync {
    /// The rewritten term, or `None` if the rule does not apply.
    fn rewrite(&self, term: &PointFree) -> Option<PointFree>;

    /// The rewritten term, or `term` itself if the rule does not apply.
    fn rewrite_or_nop(&self, term: &PointFree) -> PointFree {
        self.rewrite(term).unwrap_or_else(|| term.clone())
    }

    /// A name for logs and debugging.
    fn name(&self) -> &str;
}

/// A shared rule.
pub type Rule = Arc<dyn PointFreeRule>;

/// Accepts a rule's result if it is well-typed and has type `expected`.
///
/// A result failing either check is logged and treated as no match.
pub(crate) fn checked(
    rule: &str,
    expected: &Type,
    result: SchemaResult<PointFree>,
) -> Option<PointFree> {
    match result {
        Ok(rewritten) if rewritten.ty() == expected => {
            tracing::trace!(rule, "rule fired");
            Some(rewritten)
        }
        Ok(rewritten) => {
            tracing::error!(
                rule,
                expected = %expected,
                found = %rewritten.ty(),
                "rewrite changed the type of a term"
            );
            None
        }
        Err(error) => {
            tracing::error!(rule, %error, "rewrite built an ill-typed term");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use rstest::rstest;

    #[rstest]
    fn test_checked_accepts_matching_type() {
        let identity = PointFree::id(Type::Int);

        assert_eq!(
            checked("keep", &Type::function(Type::Int, Type::Int), Ok(identity.clone())),
            Some(identity)
        );
    }

    #[rstest]
    fn test_checked_drops_retyped_result() {
        let result = Ok(PointFree::id(Type::Bool));

        assert_eq!(checked("retype", &Type::function(Type::Int, Type::Int), result), None);
    }

    #[rstest]
    fn test_checked_drops_construction_error() {
        let error = SchemaError::TermMismatch {
            node: "comp",
            expected: "Int".to_string(),
            found: "Bool".to_string(),
        };

        assert_eq!(checked("broken", &Type::Int, Err(error)), None);
    }
}
