//! Constructors for the elemental optics.
//!
//! The plain forms (`proj1`, `inj2`, `field`, ...) change no type; the `_to`
//! forms take the focus write type separately for migrations that retype a
//! slot.

use std::sync::Arc;

use super::element::{CustomOptic, Element, Shape, Signature};
use super::Optic;
use crate::error::{SchemaError, SchemaResult};
use crate::types::Type;

/// The identity optic on `ty`.
#[must_use]
pub fn identity(ty: Type) -> Optic {
    Optic::new(Element::Identity(ty))
}

/// First component of `(focus, other)`.
#[must_use]
pub fn proj1(focus: Type, other: Type) -> Optic {
    proj1_to(focus.clone(), focus, other)
}

/// First component of `(focus, other)`, written back as `focus_out`.
#[must_use]
pub fn proj1_to(focus: Type, focus_out: Type, other: Type) -> Optic {
    Optic::new(Element::Proj1 {
        focus,
        focus_out,
        other,
    })
}

/// Second component of `(other, focus)`.
#[must_use]
pub fn proj2(other: Type, focus: Type) -> Optic {
    proj2_to(other, focus.clone(), focus)
}

/// Second component of `(other, focus)`, written back as `focus_out`.
#[must_use]
pub fn proj2_to(other: Type, focus: Type, focus_out: Type) -> Optic {
    Optic::new(Element::Proj2 {
        other,
        focus,
        focus_out,
    })
}

/// Left case of `Either<focus, other>`.
#[must_use]
pub fn inj1(focus: Type, other: Type) -> Optic {
    inj1_to(focus.clone(), focus, other)
}

/// Left case of `Either<focus, other>`, written back as `focus_out`.
#[must_use]
pub fn inj1_to(focus: Type, focus_out: Type, other: Type) -> Optic {
    Optic::new(Element::Inj1 {
        focus,
        focus_out,
        other,
    })
}

/// Right case of `Either<other, focus>`.
#[must_use]
pub fn inj2(other: Type, focus: Type) -> Optic {
    inj2_to(other, focus.clone(), focus)
}

/// Right case of `Either<other, focus>`, written back as `focus_out`.
#[must_use]
pub fn inj2_to(other: Type, focus: Type, focus_out: Type) -> Optic {
    Optic::new(Element::Inj2 {
        other,
        focus,
        focus_out,
    })
}

/// Content of the field `name: focus`.
#[must_use]
pub fn field(name: impl Into<Arc<str>>, focus: Type) -> Optic {
    field_to(name, focus.clone(), focus)
}

/// Content of the field `name: focus`, written back as `focus_out`.
#[must_use]
pub fn field_to(name: impl Into<Arc<str>>, focus: Type, focus_out: Type) -> Optic {
    Optic::new(Element::Field {
        name: name.into(),
        focus,
        focus_out,
    })
}

/// Case `name` of the tagged choice `whole`.
///
/// # Errors
///
/// Returns [`SchemaError::UnknownCase`] if `whole` has no such case.
pub fn case(whole: &Type, name: &str) -> SchemaResult<Optic> {
    let focus = whole.case(name)?.clone();
    case_to(whole, name, focus)
}

/// Case `name` of the tagged choice `whole`, written back as `focus_out`.
///
/// # Errors
///
/// Returns [`SchemaError::UnknownCase`] if `whole` has no such case.
pub fn case_to(whole: &Type, name: &str, focus_out: Type) -> SchemaResult<Optic> {
    let focus = whole.case(name)?.clone();
    let whole_out = whole.with_case(name, focus_out.clone())?;
    Ok(Optic::new(Element::Case {
        name: Arc::from(name),
        whole: whole.clone(),
        whole_out,
        focus,
        focus_out,
    }))
}

/// Every element of `[focus]`.
#[must_use]
pub fn elements(focus: Type) -> Optic {
    elements_to(focus.clone(), focus)
}

/// Every element of `[focus]`, written back as `focus_out`.
#[must_use]
pub fn elements_to(focus: Type, focus_out: Type) -> Optic {
    Optic::new(Element::Elements { focus, focus_out })
}

/// A user-supplied optic.
#[must_use]
pub fn custom(name: impl Into<Arc<str>>, signature: Signature, shape: impl Into<Shape>) -> Optic {
    Optic::new(Element::Custom(CustomOptic::new(name, signature, shape.into())))
}

/// The type-preserving path from `ty` to the field `name`, through nested
/// pairs and fields.
///
/// The search is depth-first, first component before second.
///
/// # Errors
///
/// Returns [`SchemaError::UnknownField`] if no such field is reachable.
///
/// # Examples
///
/// ```rust
/// use datafix::optics::standard;
/// use datafix::types::Type;
///
/// let record = Type::product(
///     Type::field("id", Type::Int),
///     Type::product(Type::field("name", Type::Str), Type::field("age", Type::Int)),
/// );
///
/// let path = standard::field_path(&record, "age").unwrap();
/// assert_eq!(path.to_string(), "π2 ◦ π2 ◦ field[age]");
/// assert_eq!(path.focus(), &Type::Int);
/// ```
pub fn field_path(ty: &Type, name: &str) -> SchemaResult<Optic> {
    find_field(ty, name)?.ok_or_else(|| SchemaError::UnknownField {
        ty: ty.to_string(),
        field: name.to_string(),
    })
}

fn find_field(ty: &Type, name: &str) -> SchemaResult<Option<Optic>> {
    match ty {
        Type::Field(field_name, content) if field_name.as_ref() == name => {
            Ok(Some(field(Arc::clone(field_name), Type::clone(content))))
        }
        Type::Field(field_name, content) => find_field(content, name)?
            .map(|inner| field(Arc::clone(field_name), Type::clone(content)).compose(&inner))
            .transpose(),
        Type::Product(first, second) => {
            if let Some(inner) = find_field(first, name)? {
                return proj1(Type::clone(first), Type::clone(second))
                    .compose(&inner)
                    .map(Some);
            }
            find_field(second, name)?
                .map(|inner| proj2(Type::clone(first), Type::clone(second)).compose(&inner))
                .transpose()
        }
        _ => Ok(None),
    }
}
