//! Composed optics.

use std::fmt;
use std::sync::Arc;

use super::element::{Element, Signature};
use super::{Adapter, Affine, Getter, Lens, Prism, Traversal};
use crate::error::{SchemaError, SchemaResult};
use crate::profunctor::{Capabilities, FunctionRep, Representation, ensure_capabilities};
use crate::types::{Function, Type};

/// A typed, non-empty chain of [`Element`]s, outermost first.
///
/// Composition is checked when the chain is built: the outer optic's focus
/// types must equal the inner optic's whole types. The capabilities a
/// composed optic needs are the union of its elements' needs.
///
/// # Examples
///
/// ```rust
/// use datafix::optics::standard;
/// use datafix::types::{Type, Value};
///
/// // ((Int, Bool), Str): the Int slot.
/// let inner = standard::proj1(Type::Int, Type::Bool);
/// let outer = standard::proj1(Type::product(Type::Int, Type::Bool), Type::Str);
/// let path = outer.compose(&inner).unwrap();
///
/// assert_eq!(path.to_string(), "π1 ◦ π1");
///
/// let lens = path.to_lens().unwrap();
/// let whole = Value::pair(Value::pair(Value::Int(1), Value::Bool(true)), Value::string("c"));
/// assert_eq!(lens.view(whole), Ok(Value::Int(1)));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Optic {
    elements: Arc<[Element]>,
    signature: Signature,
}

/// The result of aligning two optics applied one after the other.
#[derive(Clone, Debug)]
pub(crate) struct SharedPrefix {
    /// The fused common prefix.
    pub prefix: Optic,
    /// What remains of the optic applied first.
    pub earlier_rest: Option<Optic>,
    /// What remains of the optic applied second.
    pub later_rest: Option<Optic>,
}

impl Optic {
    /// Creates a single-element optic.
    #[must_use]
    pub fn new(element: Element) -> Self {
        let signature = element.signature();
        Self {
            elements: Arc::from([element]),
            signature,
        }
    }

    fn from_chain(elements: Vec<Element>) -> Option<Self> {
        let whole = elements.first()?.signature();
        let focus = elements.last()?.signature();
        Some(Self {
            elements: elements.into(),
            signature: Signature::new(whole.whole, whole.whole_out, focus.focus, focus.focus_out),
        })
    }

    /// The elements, outermost first.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The outermost element.
    #[must_use]
    pub fn outer(&self) -> &Element {
        &self.elements[0]
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always `false`: an optic has at least one element.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The four types this optic relates.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Read type of the whole.
    #[must_use]
    pub const fn whole(&self) -> &Type {
        &self.signature.whole
    }

    /// Write-result type of the whole.
    #[must_use]
    pub const fn whole_out(&self) -> &Type {
        &self.signature.whole_out
    }

    /// Read type of the focus.
    #[must_use]
    pub const fn focus(&self) -> &Type {
        &self.signature.focus
    }

    /// Write type of the focus.
    #[must_use]
    pub const fn focus_out(&self) -> &Type {
        &self.signature.focus_out
    }

    /// Returns `true` if this is a lone identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        matches!(&*self.elements, [Element::Identity(_)])
    }

    /// Returns `true` if every element is from the fixed vocabulary.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        !self.elements.iter().any(Element::is_custom)
    }

    /// The capabilities needed to interpret this optic.
    #[must_use]
    pub fn required(&self) -> Capabilities {
        self.elements
            .iter()
            .fold(Capabilities::PROFUNCTOR, |acc, element| acc | element.required())
    }

    /// Composes `self` (outer) with `inner`.
    ///
    /// A lone identity on either side is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::CompositionMismatch`] if `inner`'s whole types
    /// are not `self`'s focus types.
    pub fn compose(&self, inner: &Self) -> SchemaResult<Self> {
        if self.focus() != inner.whole() || self.focus_out() != inner.whole_out() {
            return Err(SchemaError::CompositionMismatch {
                outer: self.to_string(),
                inner: inner.to_string(),
                expected: format!("{} / {}", self.focus(), self.focus_out()),
                found: format!("{} / {}", inner.whole(), inner.whole_out()),
            });
        }
        if self.is_identity() {
            return Ok(inner.clone());
        }
        if inner.is_identity() {
            return Ok(self.clone());
        }
        Ok(Self {
            elements: self.elements.iter().chain(inner.elements.iter()).cloned().collect(),
            signature: Signature::new(
                self.whole().clone(),
                self.whole_out().clone(),
                inner.focus().clone(),
                inner.focus_out().clone(),
            ),
        })
    }

    /// Interprets this optic against `representation`, innermost element
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingCapability`] before interpreting anything
    /// if `P` does not provide [`required`](Self::required).
    pub fn eval<P: Representation>(&self, representation: P) -> SchemaResult<P> {
        ensure_capabilities::<P>(self, self.required())?;
        self.elements
            .iter()
            .rev()
            .try_fold(representation, |lifted, element| element.eval(lifted))
    }

    /// Extracts an [`Adapter`].
    ///
    /// # Errors
    ///
    /// Fails unless the optic needs nothing beyond a profunctor.
    pub fn to_adapter(&self) -> SchemaResult<Adapter> {
        self.eval(Adapter::identity())
    }

    /// Extracts a [`Lens`].
    ///
    /// # Errors
    ///
    /// Fails if the optic needs more than [`Capabilities::CARTESIAN`].
    pub fn to_lens(&self) -> SchemaResult<Lens> {
        self.eval(Lens::identity())
    }

    /// Extracts a [`Prism`].
    ///
    /// # Errors
    ///
    /// Fails if the optic needs more than [`Capabilities::COCARTESIAN`].
    pub fn to_prism(&self) -> SchemaResult<Prism> {
        self.eval(Prism::identity())
    }

    /// Extracts an [`Affine`].
    ///
    /// # Errors
    ///
    /// Fails if the optic needs more than [`Capabilities::AFFINE`].
    pub fn to_affine(&self) -> SchemaResult<Affine> {
        self.eval(Affine::identity())
    }

    /// Extracts a [`Getter`].
    ///
    /// # Errors
    ///
    /// Fails if the optic branches or traverses.
    pub fn to_getter(&self) -> SchemaResult<Getter> {
        self.eval(Getter::identity())
    }

    /// Extracts a [`Traversal`].
    ///
    /// # Errors
    ///
    /// Fails if the optic is read-only or needs [`Capabilities::CLOSED`].
    pub fn to_traversal(&self) -> SchemaResult<Traversal> {
        self.eval(Traversal::identity())
    }

    /// The function modifying every focus with `function`.
    ///
    /// # Errors
    ///
    /// Fails if the optic is read-only.
    pub fn over(&self, function: Function) -> SchemaResult<Function> {
        Ok(self.eval(FunctionRep(function))?.0)
    }

    /// Number of leading elements that fuse with `later`'s, `self` applied
    /// first.
    #[must_use]
    pub fn common_prefix(&self, later: &Self) -> usize {
        self.elements
            .iter()
            .zip(later.elements.iter())
            .take_while(|(earlier, later)| earlier.then(later).is_some())
            .count()
    }

    /// Splits into the first `at` elements and the rest.
    ///
    /// Returns `None` unless both halves are non-empty.
    #[must_use]
    pub fn split_at(&self, at: usize) -> Option<(Self, Self)> {
        if at == 0 || at >= self.elements.len() {
            return None;
        }
        let (prefix, suffix) = self.elements.split_at(at);
        Some((Self::from_chain(prefix.to_vec())?, Self::from_chain(suffix.to_vec())?))
    }

    /// Retypes the untouched companion of the outermost projection or
    /// injection.
    ///
    /// Returns `None` if the outermost element is neither.
    #[must_use]
    pub fn with_outer_companion(&self, companion: Type) -> Option<Self> {
        let outer = self.outer().with_companion(companion)?;
        let elements = std::iter::once(outer)
            .chain(self.elements[1..].iter().cloned())
            .collect();
        Self::from_chain(elements)
    }

    /// Aligns `self`, applied first, with `later`: fuses the common prefix
    /// and keeps the diverging rests.
    pub(crate) fn shared_prefix(&self, later: &Self) -> Option<SharedPrefix> {
        let fused: Vec<Element> = self
            .elements
            .iter()
            .zip(later.elements.iter())
            .map_while(|(earlier, later)| earlier.then(later))
            .collect();
        let length = fused.len();
        let rest = |optic: &Self| {
            (length < optic.len()).then(|| Self::from_chain(optic.elements[length..].to_vec()))
        };
        Some(SharedPrefix {
            prefix: Self::from_chain(fused)?,
            earlier_rest: rest(self).flatten(),
            later_rest: rest(later).flatten(),
        })
    }
}

impl From<Element> for Optic {
    fn from(element: Element) -> Self {
        Self::new(element)
    }
}

impl fmt::Display for Optic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, element) in self.elements.iter().enumerate() {
            if position > 0 {
                write!(formatter, " ◦ ")?;
            }
            write!(formatter, "{element}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Optic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Optic({self} : {} -> {})",
            self.signature.whole, self.signature.focus
        )
    }
}
