//! Elemental optics: the named building blocks of a composed [`Optic`].
//!
//! Rewrite rules look inside optics, so the building blocks are data with
//! identity (`π1` is `π1`) rather than opaque shapes. Anything outside the
//! fixed vocabulary is a [`CustomOptic`], identified by name and signature.
//!
//! [`Optic`]: super::Optic

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{Adapter, Affine, Getter, Lens, Prism, Traversal};
use crate::control::Either;
use crate::error::SchemaResult;
use crate::profunctor::{Capabilities, Representation, witness};
use crate::types::{Type, Value};

/// The four types an optic relates.
///
/// An optic from `whole` to `focus` turns a transformer `focus -> focus_out`
/// into a transformer `whole -> whole_out`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Signature {
    /// Read type of the whole (`S`).
    pub whole: Type,
    /// Write-result type of the whole (`T`).
    pub whole_out: Type,
    /// Read type of the focus (`A`).
    pub focus: Type,
    /// Write type of the focus (`B`).
    pub focus_out: Type,
}

impl Signature {
    /// Creates a signature.
    #[must_use]
    pub const fn new(whole: Type, whole_out: Type, focus: Type, focus_out: Type) -> Self {
        Self {
            whole,
            whole_out,
            focus,
            focus_out,
        }
    }

    /// A signature that changes no type.
    #[must_use]
    pub fn simple(whole: Type, focus: Type) -> Self {
        Self::new(whole.clone(), whole, focus.clone(), focus)
    }

    /// Returns `true` if the write types equal the read types.
    #[must_use]
    pub fn is_type_preserving(&self) -> bool {
        self.whole == self.whole_out && self.focus == self.focus_out
    }
}

/// A concrete optic shape.
#[derive(Clone, Debug)]
pub enum Shape {
    /// An isomorphism.
    Adapter(Adapter),
    /// Exactly one focus.
    Lens(Lens),
    /// Zero or one focus, by case.
    Prism(Prism),
    /// Zero or one focus.
    Affine(Affine),
    /// Read-only single focus.
    Getter(Getter),
    /// Zero or more foci.
    Traversal(Traversal),
}

impl Shape {
    /// Capabilities needed to interpret this shape.
    #[must_use]
    pub const fn required(&self) -> Capabilities {
        match self {
            Self::Adapter(_) => Capabilities::PROFUNCTOR,
            Self::Lens(_) => Capabilities::CARTESIAN,
            Self::Prism(_) => Capabilities::COCARTESIAN,
            Self::Affine(_) => Capabilities::AFFINE,
            Self::Getter(_) => Capabilities::READ_ONLY,
            Self::Traversal(_) => Capabilities::TRAVERSAL,
        }
    }

    /// Interprets this shape against `representation`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingCapability`](crate::error::SchemaError)
    /// if `P` lacks a required capability.
    pub fn eval<P: Representation>(&self, representation: P) -> SchemaResult<P> {
        match self {
            Self::Adapter(adapter) => adapter.eval(representation),
            Self::Lens(lens) => lens.eval(representation),
            Self::Prism(prism) => prism.eval(representation),
            Self::Affine(affine) => affine.eval(representation),
            Self::Getter(getter) => getter.eval(representation),
            Self::Traversal(traversal) => traversal.eval(representation),
        }
    }
}

/// A user-supplied optic outside the fixed vocabulary.
///
/// Two custom optics are equal when their names and signatures are; the
/// shape is trusted to match.
#[derive(Clone, Debug)]
pub struct CustomOptic {
    name: Arc<str>,
    signature: Signature,
    shape: Shape,
}

impl CustomOptic {
    /// Creates a custom optic.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, signature: Signature, shape: Shape) -> Self {
        Self {
            name: name.into(),
            signature,
            shape,
        }
    }

    /// The identifying name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The concrete shape.
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl PartialEq for CustomOptic {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.signature == other.signature
    }
}

impl Eq for CustomOptic {}

impl Hash for CustomOptic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.signature.hash(state);
    }
}

/// One link of an optic chain.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Element {
    /// The identity on a type.
    Identity(Type),
    /// First component of a pair.
    Proj1 {
        /// Focus read type.
        focus: Type,
        /// Focus write type.
        focus_out: Type,
        /// The untouched second component.
        other: Type,
    },
    /// Second component of a pair.
    Proj2 {
        /// The untouched first component.
        other: Type,
        /// Focus read type.
        focus: Type,
        /// Focus write type.
        focus_out: Type,
    },
    /// Left case of a sum.
    Inj1 {
        /// Focus read type.
        focus: Type,
        /// Focus write type.
        focus_out: Type,
        /// The untouched right case.
        other: Type,
    },
    /// Right case of a sum.
    Inj2 {
        /// The untouched left case.
        other: Type,
        /// Focus read type.
        focus: Type,
        /// Focus write type.
        focus_out: Type,
    },
    /// The content of a named field.
    Field {
        /// Field name.
        name: Arc<str>,
        /// Content read type.
        focus: Type,
        /// Content write type.
        focus_out: Type,
    },
    /// One case of a tagged choice.
    Case {
        /// Case name.
        name: Arc<str>,
        /// The tagged choice being matched.
        whole: Type,
        /// The tagged choice with the case retyped.
        whole_out: Type,
        /// Case read type.
        focus: Type,
        /// Case write type.
        focus_out: Type,
    },
    /// Every element of a list.
    Elements {
        /// Element read type.
        focus: Type,
        /// Element write type.
        focus_out: Type,
    },
    /// Anything else.
    Custom(CustomOptic),
}

impl Element {
    /// The types this element relates.
    #[must_use]
    pub fn signature(&self) -> Signature {
        match self {
            Self::Identity(ty) => Signature::simple(ty.clone(), ty.clone()),
            Self::Proj1 {
                focus,
                focus_out,
                other,
            } => Signature::new(
                Type::product(focus.clone(), other.clone()),
                Type::product(focus_out.clone(), other.clone()),
                focus.clone(),
                focus_out.clone(),
            ),
            Self::Proj2 {
                other,
                focus,
                focus_out,
            } => Signature::new(
                Type::product(other.clone(), focus.clone()),
                Type::product(other.clone(), focus_out.clone()),
                focus.clone(),
                focus_out.clone(),
            ),
            Self::Inj1 {
                focus,
                focus_out,
                other,
            } => Signature::new(
                Type::sum(focus.clone(), other.clone()),
                Type::sum(focus_out.clone(), other.clone()),
                focus.clone(),
                focus_out.clone(),
            ),
            Self::Inj2 {
                other,
                focus,
                focus_out,
            } => Signature::new(
                Type::sum(other.clone(), focus.clone()),
                Type::sum(other.clone(), focus_out.clone()),
                focus.clone(),
                focus_out.clone(),
            ),
            Self::Field {
                name,
                focus,
                focus_out,
            } => Signature::new(
                Type::field(Arc::clone(name), focus.clone()),
                Type::field(Arc::clone(name), focus_out.clone()),
                focus.clone(),
                focus_out.clone(),
            ),
            Self::Case {
                whole,
                whole_out,
                focus,
                focus_out,
                ..
            } => Signature::new(
                whole.clone(),
                whole_out.clone(),
                focus.clone(),
                focus_out.clone(),
            ),
            Self::Elements { focus, focus_out } => Signature::new(
                Type::list(focus.clone()),
                Type::list(focus_out.clone()),
                focus.clone(),
                focus_out.clone(),
            ),
            Self::Custom(custom) => custom.signature.clone(),
        }
    }

    /// Capabilities needed to interpret this element.
    #[must_use]
    pub const fn required(&self) -> Capabilities {
        match self {
            Self::Identity(_) | Self::Field { .. } => Capabilities::PROFUNCTOR,
            Self::Proj1 { .. } | Self::Proj2 { .. } => Capabilities::CARTESIAN,
            Self::Inj1 { .. } | Self::Inj2 { .. } | Self::Case { .. } => Capabilities::COCARTESIAN,
            Self::Elements { .. } => Capabilities::TRAVERSAL,
            Self::Custom(custom) => custom.shape.required(),
        }
    }

    /// Returns `true` for elements outside the fixed vocabulary.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Interprets this element against `representation`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingCapability`](crate::error::SchemaError)
    /// if `P` lacks a required capability.
    pub fn eval<P: Representation>(&self, representation: P) -> SchemaResult<P> {
        let name = || self.to_string();
        match self {
            Self::Identity(_) | Self::Field { .. } => Ok(representation),
            Self::Proj1 { .. } => {
                let ops = witness::<P, _>(P::cartesian(), &name(), Capabilities::CARTESIAN)?;
                Ok((ops.first)(representation))
            }
            Self::Proj2 { .. } => {
                let ops = witness::<P, _>(P::cartesian(), &name(), Capabilities::CARTESIAN)?;
                Ok((ops.second)(representation))
            }
            Self::Inj1 { .. } => {
                let ops = witness::<P, _>(P::cocartesian(), &name(), Capabilities::COCARTESIAN)?;
                Ok((ops.left)(representation))
            }
            Self::Inj2 { .. } => {
                let ops = witness::<P, _>(P::cocartesian(), &name(), Capabilities::COCARTESIAN)?;
                Ok((ops.right)(representation))
            }
            Self::Case { name: case, .. } => case_prism(case).eval(representation),
            Self::Elements { .. } => Traversal::elements().eval(representation),
            Self::Custom(custom) => custom.shape.eval(representation),
        }
    }

    /// Fuses this element, applied first, with `later`, applied after it at
    /// the same position.
    ///
    /// Returns `None` unless both address the same position and `later`
    /// reads what this element writes.
    #[must_use]
    pub fn then(&self, later: &Self) -> Option<Self> {
        if later.signature().whole != self.signature().whole_out {
            return None;
        }
        let fused = match (self, later) {
            (Self::Identity(ty), Self::Identity(_)) => Self::Identity(ty.clone()),
            (
                Self::Proj1 { focus, other, .. },
                Self::Proj1 { focus_out, .. },
            ) => Self::Proj1 {
                focus: focus.clone(),
                focus_out: focus_out.clone(),
                other: other.clone(),
            },
            (
                Self::Proj2 { other, focus, .. },
                Self::Proj2 { focus_out, .. },
            ) => Self::Proj2 {
                other: other.clone(),
                focus: focus.clone(),
                focus_out: focus_out.clone(),
            },
            (
                Self::Inj1 { focus, other, .. },
                Self::Inj1 { focus_out, .. },
            ) => Self::Inj1 {
                focus: focus.clone(),
                focus_out: focus_out.clone(),
                other: other.clone(),
            },
            (
                Self::Inj2 { other, focus, .. },
                Self::Inj2 { focus_out, .. },
            ) => Self::Inj2 {
                other: other.clone(),
                focus: focus.clone(),
                focus_out: focus_out.clone(),
            },
            (
                Self::Field { name, focus, .. },
                Self::Field {
                    name: later_name,
                    focus_out,
                    ..
                },
            ) if name == later_name => Self::Field {
                name: Arc::clone(name),
                focus: focus.clone(),
                focus_out: focus_out.clone(),
            },
            (
                Self::Case {
                    name, whole, focus, ..
                },
                Self::Case {
                    name: later_name,
                    whole_out,
                    focus_out,
                    ..
                },
            ) if name == later_name => Self::Case {
                name: Arc::clone(name),
                whole: whole.clone(),
                whole_out: whole_out.clone(),
                focus: focus.clone(),
                focus_out: focus_out.clone(),
            },
            (Self::Elements { focus, .. }, Self::Elements { focus_out, .. }) => Self::Elements {
                focus: focus.clone(),
                focus_out: focus_out.clone(),
            },
            (Self::Custom(custom), Self::Custom(later_custom))
                if custom == later_custom && custom.signature.is_type_preserving() =>
            {
                self.clone()
            }
            _ => return None,
        };
        Some(fused)
    }

    /// Retypes the untouched companion of a projection or injection.
    ///
    /// Returns `None` for every other element.
    #[must_use]
    pub fn with_companion(&self, companion: Type) -> Option<Self> {
        match self {
            Self::Proj1 {
                focus, focus_out, ..
            } => Some(Self::Proj1 {
                focus: focus.clone(),
                focus_out: focus_out.clone(),
                other: companion,
            }),
            Self::Proj2 {
                focus, focus_out, ..
            } => Some(Self::Proj2 {
                other: companion,
                focus: focus.clone(),
                focus_out: focus_out.clone(),
            }),
            Self::Inj1 {
                focus, focus_out, ..
            } => Some(Self::Inj1 {
                focus: focus.clone(),
                focus_out: focus_out.clone(),
                other: companion,
            }),
            Self::Inj2 {
                focus, focus_out, ..
            } => Some(Self::Inj2 {
                other: companion,
                focus: focus.clone(),
                focus_out: focus_out.clone(),
            }),
            _ => None,
        }
    }
}

fn case_prism(case: &Arc<str>) -> Prism {
    let matched = Arc::clone(case);
    let built = Arc::clone(case);
    Prism::new(
        move |whole| {
            let (name, value) = whole.into_tagged()?;
            Ok(if name == matched {
                Either::Right(value)
            } else {
                Either::Left(Value::tagged(name, value))
            })
        },
        move |focus| Ok(Value::tagged(Arc::clone(&built), focus)),
    )
}

impl fmt::Display for Element {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity(_) => write!(formatter, "id"),
            Self::Proj1 { .. } => write!(formatter, "π1"),
            Self::Proj2 { .. } => write!(formatter, "π2"),
            Self::Inj1 { .. } => write!(formatter, "ι1"),
            Self::Inj2 { .. } => write!(formatter, "ι2"),
            Self::Field { name, .. } => write!(formatter, "field[{name}]"),
            Self::Case { name, .. } => write!(formatter, "case[{name}]"),
            Self::Elements { .. } => write!(formatter, "elements"),
            Self::Custom(custom) => write!(formatter, "{}", custom.name),
        }
    }
}

impl From<Lens> for Shape {
    fn from(lens: Lens) -> Self {
        Self::Lens(lens)
    }
}

impl From<Prism> for Shape {
    fn from(prism: Prism) -> Self {
        Self::Prism(prism)
    }
}

impl From<Affine> for Shape {
    fn from(affine: Affine) -> Self {
        Self::Affine(affine)
    }
}

impl From<Adapter> for Shape {
    fn from(adapter: Adapter) -> Self {
        Self::Adapter(adapter)
    }
}

impl From<Getter> for Shape {
    fn from(getter: Getter) -> Self {
        Self::Getter(getter)
    }
}

impl From<Traversal> for Shape {
    fn from(traversal: Traversal) -> Self {
        Self::Traversal(traversal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn proj1(focus: Type, focus_out: Type) -> Element {
        Element::Proj1 {
            focus,
            focus_out,
            other: Type::Str,
        }
    }

    #[rstest]
    fn test_proj1_signature() {
        let signature = proj1(Type::Int, Type::Bool).signature();

        assert_eq!(signature.whole, Type::product(Type::Int, Type::Str));
        assert_eq!(signature.whole_out, Type::product(Type::Bool, Type::Str));
        assert!(!signature.is_type_preserving());
    }

    #[rstest]
    fn test_then_chains_write_types() {
        let fused = proj1(Type::Int, Type::Bool).then(&proj1(Type::Bool, Type::Unit));

        assert_eq!(fused, Some(proj1(Type::Int, Type::Unit)));
    }

    #[rstest]
    fn test_then_fuses_identities_of_one_type() {
        let identity = Element::Identity(Type::Int);

        assert_eq!(identity.then(&identity), Some(identity.clone()));
        assert_eq!(identity.then(&Element::Identity(Type::Bool)), None);
    }

    #[rstest]
    fn test_then_refuses_unrelated_positions() {
        let second = Element::Proj2 {
            other: Type::Bool,
            focus: Type::Str,
            focus_out: Type::Str,
        };

        assert_eq!(proj1(Type::Int, Type::Bool).then(&second), None);
        assert_eq!(proj1(Type::Int, Type::Bool).then(&proj1(Type::Int, Type::Int)), None);
    }

    #[rstest]
    fn test_custom_equality_ignores_shape() {
        let signature = Signature::simple(Type::Int, Type::Int);
        let first = CustomOptic::new("negate", signature.clone(), Shape::Lens(Lens::identity()));
        let second = CustomOptic::new("negate", signature, Shape::Adapter(Adapter::identity()));

        assert_eq!(Element::Custom(first), Element::Custom(second));
    }

    #[rstest]
    #[case(Element::Identity(Type::Int), "id")]
    #[case(Element::Elements { focus: Type::Int, focus_out: Type::Int }, "elements")]
    #[case(Element::Field { name: "age".into(), focus: Type::Int, focus_out: Type::Int }, "field[age]")]
    fn test_element_display(#[case] element: Element, #[case] expected: &str) {
        assert_eq!(element.to_string(), expected);
    }
}
