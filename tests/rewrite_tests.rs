//! Integration tests for strategies and the standard rewrite catalog.

mod common;

use std::sync::Arc;

use datafix::prelude::*;
use datafix::rewrite::{LensComp, SortProj, rules, strategy};
use rstest::rstest;

fn discard() -> PointFree {
    PointFree::lift("discard", Type::Int, Type::Unit, |_| Ok(Value::Unit))
}

fn pair() -> Type {
    Type::product(Type::Int, Type::Bool)
}

fn over_first(function: PointFree) -> PointFree {
    PointFree::over(standard::proj1(Type::Int, Type::Bool), function).unwrap()
}

fn over_second(function: PointFree) -> PointFree {
    PointFree::over(standard::proj2(Type::Int, Type::Bool), function).unwrap()
}

fn same_behaviour(left: &PointFree, right: &PointFree, inputs: &[Value]) {
    for input in inputs {
        assert_eq!(
            left.call(&no_backend(), input.clone()),
            right.call(&no_backend(), input.clone()),
            "on {input}"
        );
    }
}

fn pairs() -> Vec<Value> {
    [(0, true), (3, false), (-8, true)]
        .into_iter()
        .map(|(int, flag)| Value::pair(Value::Int(int), Value::Bool(flag)))
        .collect()
}

// =============================================================================
// Strategies
// =============================================================================

#[rstest]
fn test_seq_needs_every_step() {
    let term = discard();
    let both = strategy::seq(vec![rules::bang_eta(), rules::bang_eta()]);
    let then_nop = strategy::seq(vec![rules::bang_eta(), strategy::nop()]);

    assert_eq!(both.rewrite(&term), None);
    assert_eq!(then_nop.rewrite(&term), Some(PointFree::bang(Type::Int)));
}

#[rstest]
fn test_choice_takes_first_match() {
    let term = discard();
    let rule = strategy::choice(vec![rules::lens_app_id(), rules::bang_eta(), strategy::nop()]);

    assert_eq!(rule.rewrite(&term), Some(PointFree::bang(Type::Int)));
    assert_eq!(strategy::choice(Vec::new()).rewrite(&term), None);
}

#[rstest]
fn test_once_rewrites_a_single_subterm() {
    let modified = over_first(common::negate());
    let term = PointFree::comp(over_first(PointFree::id(Type::Int)), modified.clone()).unwrap();

    let rewritten = strategy::once(rules::lens_app_id()).rewrite(&term).unwrap();

    assert_eq!(rewritten, modified);
}

#[rstest]
fn test_all_keeps_unmatched_children() {
    let negate = common::negate();
    let term = PointFree::comp(discard(), negate.clone()).unwrap();

    let rewritten = strategy::all(rules::bang_eta()).rewrite(&term);

    assert_eq!(rewritten, Some(PointFree::comp(PointFree::bang(Type::Int), negate).unwrap()));
    assert_eq!(strategy::one(rules::bang_eta()).rewrite(&PointFree::id(Type::Unit)), None);
}

#[rstest]
fn test_many_always_succeeds() {
    let term = common::negate();

    assert_eq!(strategy::many(rules::bang_eta()).rewrite(&term), Some(term));
}

#[rstest]
fn test_everywhere_reaches_nested_subterms() {
    let inner = PointFree::comp(discard(), common::negate()).unwrap();
    let term = PointFree::apply(
        PointFree::profunctor_transformer(standard::proj1_to(Type::Int, Type::Unit, Type::Bool))
            .unwrap(),
        inner,
    )
    .unwrap();

    let rewritten = strategy::everywhere(strategy::nop(), rules::bang_eta())
        .rewrite(&term)
        .unwrap();

    assert!(rewritten.to_string().ends_with(" !)"));
    assert_eq!(rewritten.ty(), term.ty());
}

// =============================================================================
// Catalog
// =============================================================================

#[rstest]
fn test_unit_result_collapses_to_bang() {
    common::init_tracing();
    let term = PointFree::comp(discard(), common::negate()).unwrap();

    let optimized = Optimizer::standard().optimize(&term);

    assert_eq!(optimized, PointFree::bang(Type::Int));
}

#[rstest]
fn test_independent_slots_are_sorted() {
    let term = PointFree::comp(over_first(common::negate()), over_second(common::not())).unwrap();

    let optimized = Optimizer::standard().optimize(&term);

    assert_eq!(optimized.to_string(), "(ap optic[π2] not)\n  ◦ (ap optic[π1] negate)");
    same_behaviour(&optimized, &term, &pairs());
}

#[rstest]
fn test_same_slot_modifications_merge() {
    let term = PointFree::comp(over_first(common::negate()), over_first(common::increment())).unwrap();

    let optimized = Optimizer::standard().optimize(&term);

    assert_eq!(optimized.to_string(), "(ap optic[π1] negate\n  ◦ increment)");
    same_behaviour(&optimized, &term, &pairs());
}

#[rstest]
fn test_sorting_exposes_merges() {
    let chain = vec![
        over_first(common::negate()),
        over_second(common::not()),
        over_first(common::increment()),
    ];
    let term = PointFree::comp_all(chain).unwrap().unwrap();

    let optimized = Optimizer::standard().optimize(&term);

    assert_eq!(optimized.comp_chain().len(), 2);
    same_behaviour(&optimized, &term, &pairs());
}

#[rstest]
fn test_nested_paths_are_factored() {
    let outer = standard::proj1(pair(), Type::Str);
    let left = outer.compose(&standard::proj1(Type::Int, Type::Bool)).unwrap();
    let right = outer.compose(&standard::proj2(Type::Int, Type::Bool)).unwrap();
    let term = PointFree::comp(
        PointFree::over(left, common::negate()).unwrap(),
        PointFree::over(right, common::not()).unwrap(),
    )
    .unwrap();

    let optimized = Optimizer::standard().optimize(&term);

    assert!(optimized.to_string().starts_with("(ap optic[π1] "));
    let inputs: Vec<Value> = pairs()
        .into_iter()
        .map(|inner| Value::pair(inner, Value::string("s")))
        .collect();
    same_behaviour(&optimized, &term, &inputs);
}

#[rstest]
fn test_identity_modifications_vanish() {
    let term = PointFree::comp(over_first(PointFree::id(Type::Int)), over_second(PointFree::id(Type::Bool))).unwrap();

    assert_eq!(Optimizer::standard().optimize(&term), PointFree::id(pair()));
}

#[rstest]
fn test_individual_rules_are_usable_alone() {
    let term = PointFree::comp(over_first(common::negate()), over_second(common::not())).unwrap();
    let sort: Rule = Arc::new(SortProj);
    let merge: Rule = Arc::new(LensComp);

    assert!(sort.rewrite(&term).is_some());
    assert_eq!(merge.rewrite(&term), None);
    assert_eq!(sort.name(), "sort-proj");
}
