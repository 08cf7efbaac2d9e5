use std::cell::Cell;

use intrin_constraint::{
    constraint, le, lt, var, BoundArguments, CallArgs, Function, Param, Signature,
    VIOLATION_INDENT,
};
use intrin_core::codes;
use serde_json::json;

fn sum_abc(args: &BoundArguments) -> i64 {
    args.get_i64("a").unwrap() + args.get_i64("b").unwrap() + args.get_i64("c").unwrap()
}

fn checked_example() -> intrin_constraint::ConstrainedFn<fn(&BoundArguments) -> i64> {
    let target = Function::new(
        "constraint_example",
        Signature::of(["a", "b", "c"]),
        sum_abc as fn(&BoundArguments) -> i64,
    );
    let target = constraint(var("a").lt(10), target);
    let target = constraint(lt(0, var("c")), target);
    constraint(le(10, var("b")), target)
}

#[test]
fn satisfied_constraints_return_the_body_result() {
    let f = checked_example();
    let args = CallArgs::new().kwarg("a", 5).kwarg("b", 10).kwarg("c", 1);
    assert_eq!(f.call(&args).expect("constraints hold"), 16);
}

#[test]
fn every_failed_constraint_is_reported() {
    let f = checked_example();
    let args = CallArgs::new().kwarg("a", 15).kwarg("b", 5).kwarg("c", -1);
    let err = f.call(&args).expect_err("all three fail");
    assert!(err.is(codes::CONSTRAINT_VIOLATION));
    assert_eq!(
        err.info().details,
        vec!["a < 10".to_string(), "0 < c".to_string(), "10 <= b".to_string()]
    );
    let indent = " ".repeat(VIOLATION_INDENT);
    assert_eq!(
        err.info().message,
        format!("unsatisfied constraint(s): a < 10,\n{indent}0 < c,\n{indent}10 <= b")
    );
}

#[test]
fn displayed_violations_line_up_under_the_first_constraint() {
    assert_eq!(VIOLATION_INDENT, 45);
    let f = checked_example();
    let err = f
        .call(&CallArgs::new().kwarg("a", 15).kwarg("b", 5).kwarg("c", 1))
        .expect_err("two fail");
    let shown = err.to_string();
    let lines: Vec<&str> = shown.lines().collect();
    assert!(lines[0].starts_with("constraint error: unsatisfied constraint(s): a < 10,"));
    assert_eq!(lines[0].find("a < 10"), Some(VIOLATION_INDENT));
    assert_eq!(lines[1].find("10 <= b"), Some(VIOLATION_INDENT));
    assert!(lines[1][..VIOLATION_INDENT].chars().all(|ch| ch == ' '));
}

#[test]
fn only_failing_constraints_are_listed() {
    let f = checked_example();
    let err = f.call(&CallArgs::positional([5, 5, 1])).expect_err("b too small");
    assert_eq!(err.info().details, vec!["10 <= b".to_string()]);
}

#[test]
fn repeated_application_keeps_a_single_wrapper() {
    let calls = Cell::new(0);
    let target = Function::new("counted", Signature::of(["a", "b"]), |_: &BoundArguments| {
        calls.set(calls.get() + 1);
    });
    let checked = constraint(var("a").lt(5), target);
    let checked = constraint(var("b").lt(5), checked);
    assert_eq!(checked.constraints().len(), 2);

    let err = checked
        .call(&CallArgs::positional([9, 9]))
        .expect_err("both fail");
    assert_eq!(err.info().details.len(), 2);
    assert_eq!(calls.get(), 0);

    checked.call(&CallArgs::positional([1, 1])).expect("both hold");
    assert_eq!(calls.get(), 1);
}

#[test]
fn defaults_take_part_in_constraint_checks() {
    let f = Function::new(
        "tile",
        Signature::of(["m"]).param(Param::new("n").with_default(16)),
        |args: &BoundArguments| args.get_i64("n").unwrap(),
    )
    .constraint(var("m").le(var("n")));
    assert_eq!(f.call(&CallArgs::positional([8])).unwrap(), 16);
    assert!(f.call(&CallArgs::positional([32])).is_err());
    assert_eq!(f.call(&CallArgs::positional([32, 64])).unwrap(), 64);
}

#[test]
fn binding_errors_surface_before_checks() {
    let f = checked_example();
    let err = f
        .call(&CallArgs::positional([1, 2, 3]).kwarg("a", 4))
        .expect_err("a bound twice");
    assert!(err.is(codes::MULTIPLE_VALUES));
    let err = f.call(&CallArgs::positional([1, 2, 3, 4])).expect_err("arity");
    assert!(err.is(codes::TOO_MANY_POSITIONAL));
    let err = f
        .call(&CallArgs::positional([1, 2, 3]).kwarg("d", 4))
        .expect_err("unknown keyword");
    assert!(err.is(codes::UNEXPECTED_KEYWORD));
}

#[test]
fn positional_only_parameters_reject_keywords() {
    let f = Function::new(
        "pos",
        Signature::new([Param::positional_only("x")]),
        |args: &BoundArguments| args.get("x").cloned(),
    );
    assert_eq!(f.call(&CallArgs::positional(["k"])).unwrap(), Some(json!("k")));
    let err = f.call(&CallArgs::new().kwarg("x", 1)).unwrap_err();
    assert!(err.is(codes::POSITIONAL_ONLY));
}

#[test]
fn incomparable_operands_propagate() {
    let f = Function::new("typed", Signature::of(["dtype"]), |_: &BoundArguments| ())
        .constraint(var("dtype").lt(4));
    let err = f.call(&CallArgs::positional(["float16"])).unwrap_err();
    assert!(err.is(codes::INCOMPARABLE));
}

#[test]
fn constraints_on_unknown_names_fail_as_lookups() {
    let f = Function::new("f", Signature::of(["a"]), |_: &BoundArguments| ())
        .constraint(var("z").equals(1));
    let err = f.call(&CallArgs::positional([1])).unwrap_err();
    assert!(err.is(codes::UNBOUND_VARIABLE));
}
