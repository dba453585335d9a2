//! Property-based tests for the standard optimizer.
//!
//! - **Soundness**: the optimized term behaves like the input
//! - **Type preservation**: the optimized term has the input's type
//! - **Idempotence**: optimizing an optimized term changes nothing

mod common;

use datafix::prelude::*;
use proptest::prelude::*;

// =============================================================================
// Term Generation
// =============================================================================

/// Where a step modifies an `Int` inside
/// `(Either<Int, Int>, (count: Int, ([Int], kind{a: Int, b: Int})))`.
#[derive(Clone, Copy, Debug)]
enum Slot {
    Left,
    Right,
    Count,
    Items,
    CaseA,
    CaseB,
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Negate,
    Increment,
    Identity,
}

struct Functions {
    negate: PointFree,
    increment: PointFree,
}

fn kind() -> Type {
    Type::tagged_choice("kind", [("a", Type::Int), ("b", Type::Int)])
}

fn tail() -> Type {
    Type::product(Type::list(Type::Int), kind())
}

fn rest() -> Type {
    Type::product(Type::field("count", Type::Int), tail())
}

fn either() -> Type {
    Type::sum(Type::Int, Type::Int)
}

fn whole() -> Type {
    Type::product(either(), rest())
}

fn path(outer: &[Optic], inner: Optic) -> Optic {
    outer
        .iter()
        .rev()
        .fold(inner, |inner, outer| outer.compose(&inner).unwrap())
}

fn optic(slot: Slot) -> Optic {
    let first = standard::proj1(either(), rest());
    let second = standard::proj2(either(), rest());
    let tail_of_rest = standard::proj2(Type::field("count", Type::Int), tail());
    match slot {
        Slot::Left => path(&[first], standard::inj1(Type::Int, Type::Int)),
        Slot::Right => path(&[first], standard::inj2(Type::Int, Type::Int)),
        Slot::Count => path(
            &[second, standard::proj1(Type::field("count", Type::Int), tail())],
            standard::field("count", Type::Int),
        ),
        Slot::Items => path(
            &[second, tail_of_rest, standard::proj1(Type::list(Type::Int), kind())],
            standard::elements(Type::Int),
        ),
        Slot::CaseA | Slot::CaseB => {
            let name = if matches!(slot, Slot::CaseA) { "a" } else { "b" };
            path(
                &[second, tail_of_rest, standard::proj2(Type::list(Type::Int), kind())],
                standard::case(&kind(), name).unwrap(),
            )
        }
    }
}

impl Functions {
    fn new() -> Self {
        Self {
            negate: common::negate(),
            increment: common::increment(),
        }
    }

    fn term(&self, slot: Slot, step: Step) -> PointFree {
        let function = match step {
            Step::Negate => self.negate.clone(),
            Step::Increment => self.increment.clone(),
            Step::Identity => PointFree::id(Type::Int),
        };
        PointFree::over(optic(slot), function).unwrap()
    }

    fn chain(&self, steps: &[(Slot, Step)]) -> PointFree {
        let chain = steps
            .iter()
            .map(|(slot, step)| self.term(*slot, *step))
            .collect();
        PointFree::comp_all(chain)
            .unwrap()
            .unwrap_or_else(|| PointFree::id(whole()))
    }
}

fn steps() -> impl Strategy<Value = Vec<(Slot, Step)>> {
    let slot = prop_oneof![
        Just(Slot::Left),
        Just(Slot::Right),
        Just(Slot::Count),
        Just(Slot::Items),
        Just(Slot::CaseA),
        Just(Slot::CaseB),
    ];
    let step = prop_oneof![Just(Step::Negate), Just(Step::Increment), Just(Step::Identity)];
    prop::collection::vec((slot, step), 0..6)
}

fn value() -> impl Strategy<Value = Value> {
    (
        any::<bool>(),
        -1000i64..1000,
        -1000i64..1000,
        prop::collection::vec(-1000i64..1000, 0..4),
        any::<bool>(),
        -1000i64..1000,
    )
        .prop_map(|(left, choice, count, items, is_a, tagged)| {
            let choice = if left {
                Value::left(Value::Int(choice))
            } else {
                Value::right(Value::Int(choice))
            };
            let tagged = Value::tagged(if is_a { "a" } else { "b" }, Value::Int(tagged));
            let items = Value::List(items.into_iter().map(Value::Int).collect());
            Value::pair(choice, Value::pair(Value::Int(count), Value::pair(items, tagged)))
        })
}

// =============================================================================
// Optimizer Laws
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_optimization_is_sound(steps in steps(), value in value()) {
        let term = Functions::new().chain(&steps);
        let optimized = Optimizer::standard().optimize(&term);

        prop_assert_eq!(
            optimized.call(&no_backend(), value.clone()),
            term.call(&no_backend(), value)
        );
    }

    #[test]
    fn prop_optimization_preserves_type(steps in steps()) {
        let term = Functions::new().chain(&steps);
        let optimized = Optimizer::standard().optimize(&term);

        prop_assert_eq!(optimized.ty(), term.ty());
    }

    #[test]
    fn prop_optimization_is_idempotent(steps in steps()) {
        let term = Functions::new().chain(&steps);
        let optimizer = Optimizer::standard();
        let once = optimizer.optimize(&term);
        let twice = optimizer.optimize(&once);

        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_optimization_never_grows_the_chain(steps in steps()) {
        let term = Functions::new().chain(&steps);
        let optimized = Optimizer::standard().optimize(&term);

        prop_assert!(optimized.comp_chain().len() <= term.comp_chain().len());
    }
}
