//! Structural type descriptors.
//!
//! A [`Type`] is only ever compared, hashed, printed and looked into; nothing
//! in the crate interprets it beyond that. Children are `Arc`-shared so types
//! can be cloned freely into optics and terms.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{SchemaError, SchemaResult};

/// A structural, immutable type descriptor.
///
/// # Examples
///
/// ```rust
/// use datafix::types::Type;
///
/// let pair = Type::product(Type::Int, Type::Str);
/// assert_eq!(pair.to_string(), "(Int, Str)");
/// assert_eq!(pair, Type::product(Type::Int, Type::Str));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    /// The terminal type.
    Unit,
    /// Booleans.
    Bool,
    /// Signed integers.
    Int,
    /// Strings.
    Str,
    /// A pair `(A, B)`.
    Product(Arc<Type>, Arc<Type>),
    /// A binary sum `Either<A, B>`.
    Sum(Arc<Type>, Arc<Type>),
    /// A homogeneous list.
    List(Arc<Type>),
    /// A function `A -> B`.
    Function(Arc<Type>, Arc<Type>),
    /// A named field. Values of a field type are the values of its content.
    Field(Arc<str>, Arc<Type>),
    /// A sum whose cases are addressed by name.
    TaggedChoice(Arc<TaggedChoice>),
    /// Placeholder for family member `j` inside a family template.
    RecursivePoint(usize),
    /// Member `i` of a recursive family.
    Recursive(Arc<FamilyTemplate>, usize),
}

/// The cases of a [`Type::TaggedChoice`].
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaggedChoice {
    key: Arc<str>,
    cases: BTreeMap<Arc<str>, Type>,
}

impl TaggedChoice {
    /// The name of the discriminating key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Iterates over `(case name, case type)` in name order.
    pub fn cases(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.cases.iter().map(|(name, ty)| (name.as_ref(), ty))
    }
}

/// The generating templates of a recursive type family.
///
/// Member `i` of the family is `members[i]` with every
/// [`Type::RecursivePoint`]`(j)` standing for member `j`. The template never
/// refers back to a built family, so member types can hold it without cycles.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FamilyTemplate {
    name: Arc<str>,
    members: Vec<Type>,
}

impl FamilyTemplate {
    /// Creates a template from its per-member bodies.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, members: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    /// The family name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of members.
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// The template body of member `index`.
    #[must_use]
    pub fn body(&self, index: usize) -> Option<&Type> {
        self.members.get(index)
    }

    /// Unrolls member `index` by one layer.
    #[must_use]
    pub fn unfold(self: &Arc<Self>, index: usize) -> Option<Type> {
        self.members
            .get(index)
            .map(|body| body.substitute(&|point| Type::Recursive(Arc::clone(self), point)))
    }
}

impl Type {
    /// Creates `(first, second)`.
    #[must_use]
    pub fn product(first: Self, second: Self) -> Self {
        Self::Product(Arc::new(first), Arc::new(second))
    }

    /// Creates `Either<left, right>`.
    #[must_use]
    pub fn sum(left: Self, right: Self) -> Self {
        Self::Sum(Arc::new(left), Arc::new(right))
    }

    /// Creates `[element]`.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Arc::new(element))
    }

    /// Creates `input -> output`.
    #[must_use]
    pub fn function(input: Self, output: Self) -> Self {
        Self::Function(Arc::new(input), Arc::new(output))
    }

    /// Creates a named field.
    #[must_use]
    pub fn field(name: impl Into<Arc<str>>, content: Self) -> Self {
        Self::Field(name.into(), Arc::new(content))
    }

    /// Creates a tagged choice from `(case name, case type)` pairs.
    #[must_use]
    pub fn tagged_choice<N, I>(key: impl Into<Arc<str>>, cases: I) -> Self
    where
        N: Into<Arc<str>>,
        I: IntoIterator<Item = (N, Self)>,
    {
        Self::TaggedChoice(Arc::new(TaggedChoice {
            key: key.into(),
            cases: cases
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        }))
    }

    /// Returns `true` for the terminal type.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Splits a function type into its input and output.
    #[must_use]
    pub fn as_function(&self) -> Option<(&Self, &Self)> {
        match self {
            Self::Function(input, output) => Some((input, output)),
            _ => None,
        }
    }

    /// Looks up a case of a tagged choice.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownCase`] if this is not a tagged choice or
    /// has no case `name`.
    pub fn case(&self, name: &str) -> SchemaResult<&Self> {
        match self {
            Self::TaggedChoice(choice) => choice.cases.get(name),
            _ => None,
        }
        .ok_or_else(|| SchemaError::UnknownCase {
            ty: self.to_string(),
            case: name.to_string(),
        })
    }

    /// Returns a copy of this tagged choice with case `name` retyped.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownCase`] if the case does not exist.
    pub fn with_case(&self, name: &str, ty: Self) -> SchemaResult<Self> {
        let choice = match self {
            Self::TaggedChoice(choice) if choice.cases.contains_key(name) => choice,
            _ => {
                return Err(SchemaError::UnknownCase {
                    ty: self.to_string(),
                    case: name.to_string(),
                });
            }
        };
        let mut cases = choice.cases.clone();
        cases.insert(Arc::from(name), ty);
        Ok(Self::TaggedChoice(Arc::new(TaggedChoice {
            key: Arc::clone(&choice.key),
            cases,
        })))
    }

    /// Returns `true` if a [`Type::RecursivePoint`] occurs anywhere inside.
    #[must_use]
    pub fn contains_recursive_point(&self) -> bool {
        match self {
            Self::RecursivePoint(_) => true,
            Self::Product(first, second)
            | Self::Sum(first, second)
            | Self::Function(first, second) => {
                first.contains_recursive_point() || second.contains_recursive_point()
            }
            Self::List(element) | Self::Field(_, element) => element.contains_recursive_point(),
            Self::TaggedChoice(choice) => choice
                .cases
                .values()
                .any(Self::contains_recursive_point),
            Self::Unit | Self::Bool | Self::Int | Self::Str | Self::Recursive(..) => false,
        }
    }

    /// The largest recursive point index occurring inside, if any.
    #[must_use]
    pub fn max_recursive_point(&self) -> Option<usize> {
        match self {
            Self::RecursivePoint(index) => Some(*index),
            Self::Product(first, second)
            | Self::Sum(first, second)
            | Self::Function(first, second) => {
                first.max_recursive_point().max(second.max_recursive_point())
            }
            Self::List(element) | Self::Field(_, element) => element.max_recursive_point(),
            Self::TaggedChoice(choice) => choice
                .cases
                .values()
                .filter_map(Self::max_recursive_point)
                .max(),
            Self::Unit | Self::Bool | Self::Int | Self::Str | Self::Recursive(..) => None,
        }
    }

    /// Replaces every recursive point `j` with `points(j)`.
    #[must_use]
    pub fn substitute(&self, points: &dyn Fn(usize) -> Self) -> Self {
        if !self.contains_recursive_point() {
            return self.clone();
        }
        match self {
            Self::RecursivePoint(index) => points(*index),
            Self::Product(first, second) => {
                Self::product(first.substitute(points), second.substitute(points))
            }
            Self::Sum(left, right) => Self::sum(left.substitute(points), right.substitute(points)),
            Self::Function(input, output) => {
                Self::function(input.substitute(points), output.substitute(points))
            }
            Self::List(element) => Self::list(element.substitute(points)),
            Self::Field(name, content) => {
                Self::Field(Arc::clone(name), Arc::new(content.substitute(points)))
            }
            Self::TaggedChoice(choice) => Self::TaggedChoice(Arc::new(TaggedChoice {
                key: Arc::clone(&choice.key),
                cases: choice
                    .cases
                    .iter()
                    .map(|(name, ty)| (Arc::clone(name), ty.substitute(points)))
                    .collect(),
            })),
            Self::Unit | Self::Bool | Self::Int | Self::Str | Self::Recursive(..) => self.clone(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(formatter, "()"),
            Self::Bool => write!(formatter, "Bool"),
            Self::Int => write!(formatter, "Int"),
            Self::Str => write!(formatter, "Str"),
            Self::Product(first, second) => write!(formatter, "({first}, {second})"),
            Self::Sum(left, right) => write!(formatter, "Either<{left}, {right}>"),
            Self::List(element) => write!(formatter, "[{element}]"),
            Self::Function(input, output) => write!(formatter, "({input} -> {output})"),
            Self::Field(name, content) => write!(formatter, "{name}: {content}"),
            Self::TaggedChoice(choice) => {
                write!(formatter, "{}{{", choice.key)?;
                for (position, (name, ty)) in choice.cases.iter().enumerate() {
                    if position > 0 {
                        write!(formatter, " | ")?;
                    }
                    write!(formatter, "{name}: {ty}")?;
                }
                write!(formatter, "}}")
            }
            Self::RecursivePoint(index) => write!(formatter, "#{index}"),
            Self::Recursive(template, index) => write!(formatter, "{}#{index}", template.name),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Type({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn shape() -> Type {
        Type::tagged_choice("kind", [("circle", Type::Int), ("square", Type::Int)])
    }

    #[rstest]
    #[case(Type::Unit, "()")]
    #[case(Type::list(Type::Bool), "[Bool]")]
    #[case(Type::sum(Type::Unit, Type::Int), "Either<(), Int>")]
    #[case(Type::function(Type::Int, Type::Str), "(Int -> Str)")]
    #[case(Type::field("name", Type::Str), "name: Str")]
    #[case(Type::RecursivePoint(2), "#2")]
    fn test_type_display(#[case] ty: Type, #[case] expected: &str) {
        assert_eq!(ty.to_string(), expected);
    }

    #[rstest]
    fn test_case_lookup() {
        assert_eq!(shape().case("circle"), Ok(&Type::Int));
    }

    #[rstest]
    fn test_case_lookup_names_missing_case() {
        let error = shape().case("hexagon").unwrap_err();

        assert_eq!(
            error,
            SchemaError::UnknownCase {
                ty: "kind{circle: Int | square: Int}".to_string(),
                case: "hexagon".to_string(),
            }
        );
    }

    #[rstest]
    fn test_with_case_retypes_one_case() {
        let retyped = shape().with_case("square", Type::Str).unwrap();

        assert_eq!(retyped.case("square"), Ok(&Type::Str));
        assert_eq!(retyped.case("circle"), Ok(&Type::Int));
    }

    #[rstest]
    fn test_unfold_substitutes_members() {
        let template = Arc::new(FamilyTemplate::new(
            "List",
            vec![Type::sum(
                Type::Unit,
                Type::product(Type::Int, Type::RecursivePoint(0)),
            )],
        ));
        let unfolded = template.unfold(0).unwrap();

        assert_eq!(unfolded.to_string(), "Either<(), (Int, List#0)>");
        assert!(!unfolded.contains_recursive_point());
        assert_eq!(template.unfold(1), None);
    }

    #[rstest]
    fn test_max_recursive_point() {
        let body = Type::product(Type::RecursivePoint(1), Type::list(Type::RecursivePoint(3)));

        assert_eq!(body.max_recursive_point(), Some(3));
        assert_eq!(Type::Int.max_recursive_point(), None);
    }
}
