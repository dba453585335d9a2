//! Compilation of terms into evaluator closures.
//!
//! Compiling a node compiles (and memoizes) its children first, so a shared
//! subterm is compiled once however many parents it has. Catamorphisms are
//! the exception: their body refers back to the fold itself, so a fold node
//! compiles to a function that builds its body on first call.

use std::sync::{Arc, OnceLock};

use super::{Evaluator, PointFree, Term};
use crate::error::EvalResult;
use crate::family::Fold;
use crate::types::{BackendHandle, Function, Value};

pub(super) fn compile(term: &PointFree) -> Evaluator {
    match term.term() {
        Term::Id(_) | Term::In(_) | Term::Out(_) => {
            Arc::new(|_| Ok(Value::Function(Function::identity())))
        }
        Term::Bang(_) => {
            let bang = Function::constant(Value::Unit);
            Arc::new(move |_| Ok(Value::Function(bang.clone())))
        }
        Term::Apply { func, arg } => {
            let func = func.evaluator();
            let arg = arg.evaluator();
            Arc::new(move |backend| func(backend)?.into_function()?.apply(arg(backend)?))
        }
        Term::Comp { first, second } => {
            let first = first.evaluator();
            let second = second.evaluator();
            Arc::new(move |backend| {
                let second = second(backend)?.into_function()?;
                let first = first(backend)?.into_function()?;
                Ok(Value::Function(second.and_then(&first)))
            })
        }
        Term::FunctionWrapper(primitive) => primitive.body(),
        Term::ProfunctorTransformer(optic) => {
            let transformer = {
                let optic = optic.clone();
                Function::new(move |function| {
                    Ok(Value::Function(optic.over(function.into_function()?)?))
                })
            };
            Arc::new(move |_| Ok(Value::Function(transformer.clone())))
        }
        Term::Fold(fold) => {
            let fold = fold.clone();
            Arc::new(move |backend| Ok(Value::Function(lazy_fold(fold.clone(), backend))))
        }
    }
}

fn lazy_fold(fold: Fold, backend: &BackendHandle) -> Function {
    let backend = Arc::clone(backend);
    let body: OnceLock<Function> = OnceLock::new();
    Function::new(move |value| resolve(&body, &fold, &backend)?.apply(value))
}

fn resolve<'a>(
    body: &'a OnceLock<Function>,
    fold: &Fold,
    backend: &BackendHandle,
) -> EvalResult<&'a Function> {
    if let Some(function) = body.get() {
        return Ok(function);
    }
    let function = fold.body()?.evaluate(backend)?.into_function()?;
    Ok(body.get_or_init(|| function))
}
