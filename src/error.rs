//! Error types.
//!
//! Two categories exist:
//!
//! - [`SchemaError`]: construction-time structural errors. They indicate a
//!   schema-authoring bug (an optic composed against the wrong type, a family
//!   index out of range, a case that does not exist) and are reported when the
//!   offending optic, term or fold is built, never deferred to evaluation.
//! - [`EvalError`]: failures while running an evaluated term against values.
//!
//! Rewrite rules do not have an error type: "no match" is `None`.

use thiserror::Error;

use crate::profunctor::{Capabilities, RepresentationKind};

/// A construction-time structural error.
///
/// Every variant names the element that caused it.
///
/// # Examples
///
/// ```rust
/// use datafix::error::SchemaError;
///
/// let error = SchemaError::UnknownCase {
///     ty: "Shape".to_string(),
///     case: "hexagon".to_string(),
/// };
/// assert_eq!(error.to_string(), "type Shape has no case `hexagon`");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two optics were composed whose focus and whole types differ.
    #[error("cannot compose `{outer}` with `{inner}`: outer focus is {expected}, inner whole is {found}")]
    CompositionMismatch {
        /// Rendering of the outer optic.
        outer: String,
        /// Rendering of the inner optic.
        inner: String,
        /// The focus types of the outer optic.
        expected: String,
        /// The whole types of the inner optic.
        found: String,
    },

    /// An optic was interpreted against a representation lacking a capability.
    #[error("optic `{optic}` requires {required} but the {representation} representation provides {provided}")]
    MissingCapability {
        /// Rendering of the optic.
        optic: String,
        /// The representation it was interpreted against.
        representation: RepresentationKind,
        /// Capabilities the optic requires.
        required: Capabilities,
        /// Capabilities the representation provides.
        provided: Capabilities,
    },

    /// A recursive family was indexed past its size.
    #[error("index {index} is out of range for family `{family}` of size {size}")]
    IndexOutOfRange {
        /// Name of the family.
        family: String,
        /// The requested index.
        index: usize,
        /// Number of members in the family.
        size: usize,
    },

    /// A sum-case lookup did not resolve.
    #[error("type {ty} has no case `{case}`")]
    UnknownCase {
        /// Rendering of the searched type.
        ty: String,
        /// The missing case name.
        case: String,
    },

    /// A field lookup did not resolve.
    #[error("type {ty} has no field `{field}`")]
    UnknownField {
        /// Rendering of the searched type.
        ty: String,
        /// The missing field name.
        field: String,
    },

    /// A point-free term was built from ill-typed parts.
    #[error("{node}: expected {expected}, found {found}")]
    TermMismatch {
        /// The node being constructed.
        node: &'static str,
        /// What the node needed.
        expected: String,
        /// What it was given.
        found: String,
    },

    /// An algebra does not fit the family it is folded over.
    #[error("algebra `{algebra}` does not fit family `{family}`: {reason}")]
    AlgebraMismatch {
        /// Name of the algebra.
        algebra: String,
        /// Name of the family.
        family: String,
        /// What did not fit.
        reason: String,
    },

    /// A family template places a recursive point where it cannot be mapped.
    #[error("template {template} of family `{family}` is not polynomial")]
    NonPolynomialTemplate {
        /// Name of the family.
        family: String,
        /// Rendering of the offending template fragment.
        template: String,
    },
}

/// A failure while running an evaluated transformation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A value did not have the shape its type promised.
    #[error("expected {expected} value, found {found}")]
    UnexpectedValue {
        /// The expected value shape.
        expected: &'static str,
        /// Rendering of the actual value.
        found: String,
    },

    /// A traversal was rebuilt from the wrong number of foci.
    #[error("traversal rebuild expected {expected} foci, received {found}")]
    FocusCount {
        /// Number of foci the traversal produced.
        expected: usize,
        /// Number of foci handed back.
        found: usize,
    },

    /// An externally supplied primitive failed.
    #[error("primitive `{name}` failed: {message}")]
    Primitive {
        /// Name of the primitive.
        name: String,
        /// Its failure message.
        message: String,
    },

    /// A structural error surfaced while building an evaluator.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Result alias for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// Result alias for construction.
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_index_out_of_range_display() {
        let error = SchemaError::IndexOutOfRange {
            family: "List".to_string(),
            index: 3,
            size: 1,
        };

        assert_eq!(
            error.to_string(),
            "index 3 is out of range for family `List` of size 1"
        );
    }

    #[rstest]
    fn test_missing_capability_display() {
        let error = SchemaError::MissingCapability {
            optic: "inj1".to_string(),
            representation: RepresentationKind::Lens,
            required: Capabilities::COCARTESIAN,
            provided: Capabilities::CARTESIAN,
        };

        assert_eq!(
            error.to_string(),
            "optic `inj1` requires {Cocartesian} but the Lens representation provides {Cartesian}"
        );
    }

    #[rstest]
    fn test_schema_error_converts_into_eval_error() {
        let schema = SchemaError::UnknownField {
            ty: "(Int, Str)".to_string(),
            field: "name".to_string(),
        };
        let error: EvalError = schema.clone().into();

        assert_eq!(error, EvalError::Schema(schema));
        assert_eq!(error.to_string(), "type (Int, Str) has no field `name`");
    }
}
