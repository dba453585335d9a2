//! Integration tests for composed optics and their interpretations.
//!
//! - Lens paths through nested pairs
//! - Prism and affine paths through sums
//! - Traversals over list elements and tagged cases
//! - Capability errors when an optic is read as a weaker shape

mod common;

use datafix::prelude::*;
use rstest::rstest;

// =============================================================================
// Lens Paths
// =============================================================================

fn nested() -> Type {
    Type::product(Type::product(Type::Int, Type::Bool), Type::Str)
}

fn nested_value(first: i64, second: bool, third: &str) -> Value {
    Value::pair(
        Value::pair(Value::Int(first), Value::Bool(second)),
        Value::string(third),
    )
}

fn first_of_first() -> Optic {
    standard::proj1(Type::product(Type::Int, Type::Bool), Type::Str)
        .compose(&standard::proj1(Type::Int, Type::Bool))
        .unwrap()
}

#[rstest]
fn test_nested_projection_views_innermost_slot() {
    let optic = first_of_first();

    assert_eq!(optic.whole(), &nested());
    assert_eq!(optic.focus(), &Type::Int);

    let lens = optic.to_lens().unwrap();
    assert_eq!(lens.view(nested_value(7, true, "c")), Ok(Value::Int(7)));
}

#[rstest]
fn test_nested_projection_update_keeps_siblings() {
    let lens = first_of_first().to_lens().unwrap();

    let updated = lens.update(Value::Int(42), nested_value(7, true, "c"));

    assert_eq!(updated, Ok(nested_value(42, true, "c")));
}

#[rstest]
fn test_over_modifies_through_path() {
    common::init_tracing();
    let negate = common::negate().evaluate(&no_backend()).unwrap().into_function().unwrap();

    let modified = first_of_first().over(negate).unwrap();

    assert_eq!(
        modified.apply(nested_value(3, false, "x")),
        Ok(nested_value(-3, false, "x"))
    );
}

#[rstest]
fn test_retyping_projection_changes_whole_out() {
    let optic = standard::proj1_to(Type::Int, Type::Str, Type::Bool);

    assert_eq!(optic.whole(), &Type::product(Type::Int, Type::Bool));
    assert_eq!(optic.whole_out(), &Type::product(Type::Str, Type::Bool));
}

// =============================================================================
// Sums and Affine Paths
// =============================================================================

#[rstest]
fn test_injection_is_a_prism() {
    let prism = standard::inj1(Type::Int, Type::Str).to_prism().unwrap();

    assert_eq!(prism.preview(Value::left(Value::Int(1))), Ok(Some(Value::Int(1))));
    assert_eq!(prism.preview(Value::right(Value::string("no"))), Ok(None));
    assert_eq!(prism.build(Value::Int(2)), Ok(Value::left(Value::Int(2))));
}

#[rstest]
fn test_injection_is_not_a_lens() {
    let result = standard::inj2(Type::Int, Type::Str).to_lens();

    assert!(matches!(result, Err(SchemaError::MissingCapability { .. })));
}

#[rstest]
fn test_projection_then_injection_is_affine() {
    let either = Type::sum(Type::Int, Type::Str);
    let optic = standard::proj1(either, Type::Bool)
        .compose(&standard::inj2(Type::Int, Type::Str))
        .unwrap();
    let affine = optic.to_affine().unwrap();

    let hit = Value::pair(Value::right(Value::string("a")), Value::Bool(true));
    let miss = Value::pair(Value::left(Value::Int(0)), Value::Bool(true));

    assert_eq!(affine.preview(hit.clone()), Ok(Some(Value::string("a"))));
    assert_eq!(affine.preview(miss.clone()), Ok(None));
    assert_eq!(
        affine.set(Value::string("b"), hit),
        Ok(Value::pair(Value::right(Value::string("b")), Value::Bool(true)))
    );
    assert_eq!(affine.set(Value::string("b"), miss.clone()), Ok(miss));
}

// =============================================================================
// Traversals
// =============================================================================

#[rstest]
fn test_elements_traversal_lists_and_modifies() {
    let traversal = standard::elements(Type::Int).to_traversal().unwrap();
    let list: Value = [1, 2, 3].into_iter().map(Value::Int).collect();
    let increment = common::increment()
        .evaluate(&no_backend())
        .unwrap()
        .into_function()
        .unwrap();

    assert_eq!(
        traversal.to_list(list.clone()),
        Ok(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
    assert_eq!(
        traversal.modify_all(list, &increment),
        Ok([2, 3, 4].into_iter().map(Value::Int).collect())
    );
}

#[rstest]
fn test_elements_traversal_is_not_affine() {
    assert!(matches!(
        standard::elements(Type::Int).to_affine(),
        Err(SchemaError::MissingCapability { .. })
    ));
}

#[rstest]
fn test_tagged_case_previews_matching_case_only() {
    let shape = Type::tagged_choice("kind", [("circle", Type::Int), ("square", Type::Int)]);
    let circle = standard::case(&shape, "circle").unwrap().to_affine().unwrap();

    assert_eq!(
        circle.preview(Value::tagged("circle", Value::Int(3))),
        Ok(Some(Value::Int(3)))
    );
    assert_eq!(circle.preview(Value::tagged("square", Value::Int(3))), Ok(None));
}

#[rstest]
fn test_unknown_case_is_rejected() {
    let shape = Type::tagged_choice("kind", [("circle", Type::Int)]);

    assert!(matches!(
        standard::case(&shape, "hexagon"),
        Err(SchemaError::UnknownCase { .. })
    ));
}

// =============================================================================
// Composition and Field Paths
// =============================================================================

#[rstest]
fn test_misaligned_composition_is_rejected() {
    let outer = standard::proj1(Type::Int, Type::Str);
    let inner = standard::proj1(Type::Bool, Type::Str);

    assert!(matches!(
        outer.compose(&inner),
        Err(SchemaError::CompositionMismatch { .. })
    ));
}

#[rstest]
fn test_field_path_finds_nested_field() {
    let record = Type::product(
        Type::field("id", Type::Int),
        Type::field(
            "profile",
            Type::product(Type::field("name", Type::Str), Type::field("age", Type::Int)),
        ),
    );

    let path = standard::field_path(&record, "age").unwrap();
    let lens = path.to_lens().unwrap();
    let value = Value::pair(
        Value::Int(1),
        Value::pair(Value::string("ada"), Value::Int(36)),
    );

    assert_eq!(path.to_string(), "π2 ◦ field[profile] ◦ π2 ◦ field[age]");
    assert_eq!(lens.view(value), Ok(Value::Int(36)));
    assert!(matches!(
        standard::field_path(&record, "email"),
        Err(SchemaError::UnknownField { .. })
    ));
}
