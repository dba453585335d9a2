//! Checked smart constructors.
//!
//! Every constructor verifies the types of its parts and fails with
//! [`SchemaError::TermMismatch`] naming the node; a term that exists is
//! well-typed.

use std::sync::Arc;

use super::term::{Primitive, Term};
use super::PointFree;
use crate::error::{EvalResult, SchemaError, SchemaResult};
use crate::family::{Algebra, Fold, FoldCache, RecursiveTypeFamily};
use crate::optics::Optic;
use crate::profunctor::{FunctionRep, ensure_capabilities};
use crate::types::{BackendHandle, Function, Type, Value};

fn mismatch(node: &'static str, expected: impl ToString, found: impl ToString) -> SchemaError {
    SchemaError::TermMismatch {
        node,
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

fn function_parts<'a>(node: &'static str, term: &'a PointFree) -> SchemaResult<(&'a Type, &'a Type)> {
    term.signature()
        .ok_or_else(|| mismatch(node, "a function", term.ty()))
}

impl PointFree {
    /// `id : ty -> ty`.
    #[must_use]
    pub fn id(ty: Type) -> Self {
        let function = Type::function(ty.clone(), ty.clone());
        Self::from_parts(Term::Id(ty), function)
    }

    /// `! : ty -> ()`.
    #[must_use]
    pub fn bang(ty: Type) -> Self {
        let function = Type::function(ty.clone(), Type::Unit);
        Self::from_parts(Term::Bang(ty), function)
    }

    /// `func arg`.
    ///
    /// # Errors
    ///
    /// Fails if `func` is not a function or does not accept `arg`'s type.
    pub fn apply(func: Self, arg: Self) -> SchemaResult<Self> {
        let (input, output) = function_parts("apply", &func)?;
        if input != arg.ty() {
            return Err(mismatch("apply", input, arg.ty()));
        }
        let output = output.clone();
        Ok(Self::from_parts(Term::Apply { func, arg }, output))
    }

    /// `first ∘ second`. An `Id` on either side is dropped.
    ///
    /// # Errors
    ///
    /// Fails if either side is not a function or `second`'s output is not
    /// `first`'s input.
    pub fn comp(first: Self, second: Self) -> SchemaResult<Self> {
        let (middle, output) = function_parts("comp", &first)?;
        let (input, produced) = function_parts("comp", &second)?;
        if middle != produced {
            return Err(mismatch("comp", middle, produced));
        }
        if first.is_id() {
            return Ok(second);
        }
        if second.is_id() {
            return Ok(first);
        }
        let function = Type::function(input.clone(), output.clone());
        Ok(Self::from_parts(Term::Comp { first, second }, function))
    }

    /// Composes a chain `f1 ∘ f2 ∘ ... ∘ fn`, right-nested.
    ///
    /// Returns `Ok(None)` for an empty chain.
    ///
    /// # Errors
    ///
    /// Fails if adjacent functions do not line up.
    pub fn comp_all(chain: Vec<Self>) -> SchemaResult<Option<Self>> {
        let mut terms = chain.into_iter().rev();
        let Some(innermost) = terms.next() else {
            return Ok(None);
        };
        terms
            .try_fold(innermost, |composed, outer| Self::comp(outer, composed))
            .map(Some)
    }

    /// Wraps a primitive of type `ty`, computed from the backend.
    pub fn wrap<F>(name: impl Into<Arc<str>>, ty: Type, body: F) -> Self
    where
        F: Fn(&BackendHandle) -> EvalResult<Value> + Send + Sync + 'static,
    {
        let primitive = Primitive::new(name.into(), ty.clone(), Arc::new(body));
        Self::from_parts(Term::FunctionWrapper(primitive), ty)
    }

    /// Wraps a backend-independent function `input -> output`.
    pub fn lift<F>(name: impl Into<Arc<str>>, input: Type, output: Type, function: F) -> Self
    where
        F: Fn(Value) -> EvalResult<Value> + Send + Sync + 'static,
    {
        let function = Function::new(function);
        Self::wrap(name, Type::function(input, output), move |_| {
            Ok(Value::Function(function.clone()))
        })
    }

    /// Freezes `optic` against the function representation:
    /// `(A -> B) -> (S -> T)`.
    ///
    /// # Errors
    ///
    /// Fails with [`SchemaError::MissingCapability`] for read-only optics,
    /// which cannot modify.
    pub fn profunctor_transformer(optic: Optic) -> SchemaResult<Self> {
        ensure_capabilities::<FunctionRep>(&optic, optic.required())?;
        let ty = Type::function(
            Type::function(optic.focus().clone(), optic.focus_out().clone()),
            Type::function(optic.whole().clone(), optic.whole_out().clone()),
        );
        Ok(Self::from_parts(Term::ProfunctorTransformer(optic), ty))
    }

    /// `profunctor_transformer(optic) function`: modifies every focus.
    ///
    /// # Errors
    ///
    /// Fails if the optic is read-only or `function` does not map the
    /// optic's focus types.
    pub fn over(optic: Optic, function: Self) -> SchemaResult<Self> {
        Self::apply(Self::profunctor_transformer(optic)?, function)
    }

    /// `In : unfold(i) -> member(i)`, for `member = Type::Recursive(_, i)`.
    ///
    /// # Errors
    ///
    /// Fails if `member` is not a family member.
    pub fn roll(member: Type) -> SchemaResult<Self> {
        let unfolded = unfold_member("in", &member)?;
        Ok(Self::from_parts(
            Term::In(member.clone()),
            Type::function(unfolded, member),
        ))
    }

    /// `Out : member(i) -> unfold(i)`.
    ///
    /// # Errors
    ///
    /// Fails if `member` is not a family member.
    pub fn unroll(member: Type) -> SchemaResult<Self> {
        let unfolded = unfold_member("out", &member)?;
        Ok(Self::from_parts(
            Term::Out(member.clone()),
            Type::function(member, unfolded),
        ))
    }

    /// The catamorphism of `algebra` over member `index` of `family`.
    ///
    /// # Errors
    ///
    /// Fails if `index` is out of range or the algebra does not fit the
    /// family.
    pub fn fold(
        family: &RecursiveTypeFamily,
        algebra: &Algebra,
        index: usize,
        cache: &FoldCache,
    ) -> SchemaResult<Self> {
        let folds = family.fold(algebra, cache)?;
        folds
            .get(index)
            .map(|result| result.function().clone())
            .ok_or_else(|| SchemaError::IndexOutOfRange {
                family: family.name().to_string(),
                index,
                size: family.size(),
            })
    }

    pub(crate) fn from_fold(fold: Fold) -> Self {
        let ty = Type::function(fold.member().clone(), fold.result().clone());
        Self::from_parts(Term::Fold(fold), ty)
    }
}

fn unfold_member(node: &'static str, member: &Type) -> SchemaResult<Type> {
    match member {
        Type::Recursive(template, index) => template.unfold(*index).ok_or_else(|| {
            SchemaError::IndexOutOfRange {
                family: template.name().to_string(),
                index: *index,
                size: template.size(),
            }
        }),
        other => Err(mismatch(node, "a recursive family member", other)),
    }
}
