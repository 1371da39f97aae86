use lct_elem::{gross_integral, GrossEvaluator, QuadratureOpts};

fn opts() -> QuadratureOpts {
    QuadratureOpts::default()
}

#[test]
fn degenerate_exponents_cancel_exactly() {
    let value = gross_integral([0, 0, 0, 0], &opts()).expect("integral");
    assert!(value.abs() < 1e-12);
    let value = gross_integral([3, 1, 0, 0], &opts()).expect("integral");
    assert!(value.abs() < 1e-12);
}

#[test]
fn linear_profile_matches_principal_value() {
    // g(y) = y leaves f(x)/(y-x); with signed edge pieces the inner integral
    // is ln((1-x)/x) for every x, so no excision bias survives.
    let value = gross_integral([2, 1, 1, 0], &opts()).expect("integral");
    assert!((value + 1.0 / 24.0).abs() < 1e-6, "value = {value}");
}

#[test]
fn constant_weight_edges_are_signed() {
    // ∫ (1-x) ln((1-x)/x) dx = 1/2, independent of ε.
    let value = gross_integral([0, 1, 1, 0], &opts()).expect("integral");
    assert!((value - 0.5).abs() < 1e-6, "value = {value}");
}

#[test]
fn quadratic_profile_carries_linear_excision_bias() {
    // For (1,1,1,1) the excised strip drops ∫ f(x) g''(x) ε dx = -ε/3 exactly.
    for epsilon in [0.01, 0.005] {
        let value = gross_integral([1, 1, 1, 1], &opts().with_epsilon(epsilon)).expect("integral");
        let expected = -1.0 / 12.0 + epsilon / 3.0;
        assert!((value - expected).abs() < 1e-6, "eps = {epsilon}, value = {value}");
    }
    let value = gross_integral([1, 1, 1, 1], &opts()).expect("integral");
    assert!((value + 0.08).abs() < 1e-6, "value = {value}");
}

#[test]
fn halving_epsilon_moves_the_result_by_less_than_one_percent() {
    let coarse = gross_integral([2, 1, 1, 0], &opts()).expect("integral");
    let fine = gross_integral([2, 1, 1, 0], &opts().with_epsilon(0.005)).expect("integral");
    let relative = ((fine - coarse) / coarse).abs();
    assert!(relative < 0.01, "relative change = {relative}");
}

#[test]
fn operands_can_be_exchanged() {
    // Exchange holds up to O(ε³) terms from the signed edge pieces.
    let forward = gross_integral([1, 2, 2, 1], &opts()).expect("integral");
    let backward = gross_integral([2, 1, 1, 2], &opts()).expect("integral");
    assert!((forward - backward).abs() < 1e-5);
}

#[test]
fn reflection_swaps_both_exponent_pairs() {
    let value = gross_integral([3, 1, 2, 1], &opts()).expect("integral");
    let reflected = gross_integral([1, 3, 1, 2], &opts()).expect("integral");
    assert!((value - reflected).abs() < 1e-6);
}

#[test]
fn starved_budget_reports_tuple_and_tolerance() {
    let starved = QuadratureOpts {
        max_subdivisions: 1,
        ..opts()
    };
    let err = gross_integral([1, 1, 1, 1], &starved).unwrap_err();
    assert_eq!(err.code(), "quadrature-divergence");
    let context = &err.info().context;
    assert_eq!(context.get("exponents").map(String::as_str), Some("(1,1,1,1)"));
    assert!(context.contains_key("stage"));
    assert!(context.contains_key("abs_tol"));
    assert_eq!(context.get("epsilon").map(String::as_str), Some("0.01"));
}

#[test]
fn zero_timeout_is_a_deadline_failure() {
    let hurried = QuadratureOpts {
        timeout_ms: Some(0),
        ..opts()
    };
    let err = gross_integral([1, 1, 1, 1], &hurried).unwrap_err();
    assert_eq!(err.code(), "quadrature-deadline");
}

#[test]
fn invalid_epsilon_is_rejected_before_integrating() {
    let err = gross_integral([1, 1, 1, 1], &opts().with_epsilon(0.7)).unwrap_err();
    assert_eq!(err.code(), "invalid-epsilon");
    assert!(GrossEvaluator::new(opts().with_epsilon(-0.1)).is_err());
}

#[test]
fn relaxed_retry_is_opt_in() {
    let strict = QuadratureOpts {
        abs_tol: 1e-15,
        rel_tol: 1e-15,
        ..opts()
    };
    let err = GrossEvaluator::new(strict.clone())
        .expect("evaluator")
        .evaluate([1, 1, 1, 1])
        .unwrap_err();
    assert_eq!(err.code(), "quadrature-divergence");

    let forgiving = GrossEvaluator::new(QuadratureOpts {
        relaxed_retry_factor: Some(1e7),
        ..strict
    })
    .expect("evaluator");
    let value = forgiving.evaluate([1, 1, 1, 1]).expect("relaxed integral");
    let eps = 0.01;
    assert!((value - (-1.0 / 12.0 + eps / 3.0)).abs() < 2e-4);
}
