//! Benchmark for the rewrite engine and fold evaluation.
//!
//! Measures optimization of modification chains, cached re-optimization, and
//! evaluation of folds over lists of growing length.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use datafix::prelude::*;
use std::hint::black_box;

fn negate() -> PointFree {
    PointFree::lift("negate", Type::Int, Type::Int, |value| {
        Ok(Value::Int(-value.as_int()?))
    })
}

fn not() -> PointFree {
    PointFree::lift("not", Type::Bool, Type::Bool, |value| {
        Ok(Value::Bool(!value.as_bool()?))
    })
}

/// `length` modifications alternating between the two slots of a pair.
fn alternating_chain(length: usize) -> PointFree {
    let (negate, not) = (negate(), not());
    let chain = (0..length)
        .map(|index| {
            if index % 2 == 0 {
                PointFree::over(standard::proj1(Type::Int, Type::Bool), negate.clone())
            } else {
                PointFree::over(standard::proj2(Type::Int, Type::Bool), not.clone())
            }
            .unwrap()
        })
        .collect();
    PointFree::comp_all(chain).unwrap().unwrap()
}

fn int_list() -> RecursiveTypeFamily {
    RecursiveTypeFamily::new(
        "IntList",
        vec![Type::sum(
            Type::Unit,
            Type::product(Type::Int, Type::RecursivePoint(0)),
        )],
    )
    .unwrap()
}

fn sum() -> Algebra {
    let case = PointFree::lift(
        "sum",
        Type::sum(Type::Unit, Type::product(Type::Int, Type::Int)),
        Type::Int,
        |layer| match layer.into_either()? {
            Either::Left(_) => Ok(Value::Int(0)),
            Either::Right(cons) => {
                let (head, rest) = cons.into_pair()?;
                Ok(Value::Int(head.as_int()? + rest.as_int()?))
            }
        },
    );
    Algebra::new("sum", vec![RewriteResult::new(case, IndexSet::singleton(0))])
}

fn list_value(length: i64) -> Value {
    (0..length).rev().fold(Value::left(Value::Unit), |tail, item| {
        Value::right(Value::pair(Value::Int(item), tail))
    })
}

// =============================================================================
// Optimizer Benchmarks
// =============================================================================

fn benchmark_optimize_chain(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("optimize_chain");

    for length in [2, 8, 32] {
        let term = alternating_chain(length);
        group.bench_with_input(BenchmarkId::new("cold", length), &term, |bencher, term| {
            bencher.iter(|| black_box(Optimizer::standard().optimize(term)));
        });

        let optimizer = Optimizer::standard();
        let _ = optimizer.optimize(&term);
        group.bench_with_input(BenchmarkId::new("cached", length), &term, |bencher, term| {
            bencher.iter(|| black_box(optimizer.optimize(term)));
        });
    }

    group.finish();
}

// =============================================================================
// Fold Benchmarks
// =============================================================================

fn benchmark_fold_evaluation(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("fold_evaluation");
    let cache = FoldCache::new();
    let fold = PointFree::fold(&int_list(), &sum(), 0, &cache).unwrap();
    let function = fold.evaluate(&no_backend()).unwrap().into_function().unwrap();

    for length in [10, 100, 1000] {
        let value = list_value(length);
        group.bench_with_input(BenchmarkId::new("sum", length), &value, |bencher, value| {
            bencher.iter(|| black_box(function.apply(value.clone())));
        });
    }

    group.bench_function("build_fold_map", |bencher| {
        bencher.iter(|| black_box(int_list().fold(&sum(), &FoldCache::new())));
    });

    group.finish();
}

criterion_group!(benches, benchmark_optimize_chain, benchmark_fold_evaluation);

criterion_main!(benches);
