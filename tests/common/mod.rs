//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::Once;

use datafix::prelude::*;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a test writer for `tracing`, filtered by `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn negate() -> PointFree {
    PointFree::lift("negate", Type::Int, Type::Int, |value| {
        Ok(Value::Int(value.as_int()?.wrapping_neg()))
    })
}

pub fn increment() -> PointFree {
    PointFree::lift("increment", Type::Int, Type::Int, |value| {
        Ok(Value::Int(value.as_int()?.wrapping_add(1)))
    })
}

pub fn show() -> PointFree {
    PointFree::lift("show", Type::Int, Type::Str, |value| {
        Ok(Value::string(value.as_int()?.to_string()))
    })
}

pub fn not() -> PointFree {
    PointFree::lift("not", Type::Bool, Type::Bool, |value| {
        Ok(Value::Bool(!value.as_bool()?))
    })
}

/// `IntList = Either<(), (Int, IntList)>`.
pub fn int_list() -> RecursiveTypeFamily {
    RecursiveTypeFamily::new(
        "IntList",
        vec![Type::sum(
            Type::Unit,
            Type::product(Type::Int, Type::RecursivePoint(0)),
        )],
    )
    .unwrap()
}

/// Builds an `IntList` value, head first.
pub fn int_list_value(items: &[i64]) -> Value {
    items
        .iter()
        .rev()
        .fold(Value::left(Value::Unit), |tail, item| {
            Value::right(Value::pair(Value::Int(*item), tail))
        })
}
