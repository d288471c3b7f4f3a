use approx::assert_relative_eq;
use chol_ols::{
    CholeskyFactor, DesignMatrix, OlsError, SolveOptions, build_normal_equations,
    fit_least_squares, solve_least_squares,
};
use nalgebra::{DMatrix, DVector};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

// ============================================================================
// Helpers
// ============================================================================

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Random design with an intercept column and `p - 1` standard-normal predictors.
fn random_design(rng: &mut StdRng, n: usize, p: usize) -> DesignMatrix {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let mut data = Vec::with_capacity(n * p);
    for _ in 0..n {
        data.push(1.0);
        for _ in 1..p {
            data.push(normal.sample(rng));
        }
    }
    DesignMatrix::from_vec(n, p, data).unwrap()
}

/// Least-squares solution from nalgebra's SVD, used as the reference.
fn reference_solution(x: &DesignMatrix, y: &[f64]) -> Vec<f64> {
    let m = DMatrix::from_row_slice(x.nrows(), x.ncols(), x.as_slice());
    let v = DVector::from_column_slice(y);
    let beta = m.svd(true, true).solve(&v, 1e-12).unwrap();
    beta.iter().copied().collect()
}

fn rss(x: &DesignMatrix, y: &[f64], beta: &[f64]) -> f64 {
    x.predict(beta)
        .unwrap()
        .iter()
        .zip(y)
        .map(|(f, o)| (o - f) * (o - f))
        .sum()
}

// ============================================================================
// Correctness vs. reference
// ============================================================================

#[test]
fn matches_svd_reference_on_random_designs() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 0.5).unwrap();

    for &(n, p) in &[(10, 1), (25, 3), (80, 5), (200, 8)] {
        let x = random_design(&mut rng, n, p);
        let y: Vec<f64> = (0..n)
            .map(|k| x.row(k).iter().sum::<f64>() + noise.sample(&mut rng))
            .collect();

        let beta = solve_least_squares(&x, &y).unwrap();
        let reference = reference_solution(&x, &y);
        for (a, b) in beta.iter().zip(&reference) {
            assert_relative_eq!(*a, *b, epsilon = 1e-10, max_relative = 1e-8);
        }
    }
}

#[test]
fn perturbing_the_solution_never_lowers_rss() {
    let mut rng = StdRng::seed_from_u64(7);
    let x = random_design(&mut rng, 40, 4);
    let y: Vec<f64> = (0..40).map(|_| rng.gen_range(-5.0..5.0)).collect();

    let beta = solve_least_squares(&x, &y).unwrap();
    let best = rss(&x, &y, &beta);

    for _ in 0..50 {
        let candidate: Vec<f64> = beta.iter().map(|b| b + rng.gen_range(-0.1..0.1)).collect();
        assert!(rss(&x, &y, &candidate) >= best - 1e-9);
    }
}

// ============================================================================
// Exact recovery
// ============================================================================

#[test]
fn recovers_noiseless_coefficients() {
    let mut rng = StdRng::seed_from_u64(2024);
    let x = random_design(&mut rng, 60, 5);
    let beta_true = [1.5, -2.0, 0.25, 10.0, -0.75];
    let y = x.predict(&beta_true).unwrap();

    let beta = solve_least_squares(&x, &y).unwrap();
    for (a, b) in beta.iter().zip(&beta_true) {
        assert_relative_eq!(*a, *b, epsilon = 1e-10);
    }
}

#[test]
fn square_system_is_solved_exactly() {
    // n == p: least squares reduces to X·β = y.
    let x = DesignMatrix::from_rows(&[[2.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 4.0]]).unwrap();
    let y = [3.0, 5.0, 5.0];
    let beta = solve_least_squares(&x, &y).unwrap();
    for (a, b) in beta.iter().zip(&[1.0, 1.0, 1.0]) {
        assert_relative_eq!(*a, *b, epsilon = 1e-10);
    }
}

// ============================================================================
// Structural invariants
// ============================================================================

#[test]
fn factor_reconstructs_normal_matrix() {
    let mut rng = StdRng::seed_from_u64(99);
    let x = random_design(&mut rng, 50, 6);
    let y = vec![0.0; 50];

    let normal = build_normal_equations(&x, &y, &SolveOptions::default()).unwrap();
    let factor = CholeskyFactor::decompose(&normal.xtx, 1e-10).unwrap();

    assert!(factor.diagonal().iter().all(|d| *d > 0.0));
    let diff = factor.reconstruct().max_abs_diff(&normal.xtx).unwrap();
    assert!(diff < 1e-9, "L·Lᵗ differs from XᵗX by {diff}");
}

#[test]
fn concrete_three_point_scenario() {
    let x = DesignMatrix::from_rows(&[[1.0, 1.0], [1.0, 2.0], [1.0, 3.0]]).unwrap();
    let beta = solve_least_squares(&x, &[2.0, 3.0, 5.0]).unwrap();
    assert_relative_eq!(beta[0], 1.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(beta[1], 1.5, epsilon = 1e-12);
}

#[test]
fn intercept_helper_feeds_solver() {
    let x = DesignMatrix::from_column_slice(4, 1, &[0.0, 1.0, 2.0, 3.0]).unwrap().with_intercept();
    let beta = solve_least_squares(&x, &[1.0, 3.0, 5.0, 7.0]).unwrap();
    assert_relative_eq!(beta[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(beta[1], 2.0, epsilon = 1e-12);
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn overflowing_coefficients_are_reported() {
    // Single observation with a tiny regressor: β = y / x overflows.
    let x = DesignMatrix::from_rows(&[[1e-160]]).unwrap();
    let err = fit_least_squares(&x, &[1e160], &SolveOptions::strict_positive_pivot()).unwrap_err();
    assert_eq!(err, OlsError::NonFiniteCoefficient { index: 0 });
}

#[test]
fn collinear_columns_are_reported_not_returned() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(5);
    let base = random_design(&mut rng, 30, 3);

    // Third column = 2 * second column.
    let mut data = Vec::with_capacity(30 * 4);
    for row in base.rows() {
        data.extend_from_slice(row);
        data.push(2.0 * row[1]);
    }
    let x = DesignMatrix::from_vec(30, 4, data).unwrap();
    let y: Vec<f64> = (0..30).map(|k| k as f64).collect();

    match solve_least_squares(&x, &y) {
        Err(OlsError::NotPositiveDefinite { column, .. }) => assert_eq!(column, 3),
        other => panic!("expected a singular-matrix error, got {other:?}"),
    }
}

#[test]
fn zero_column_is_singular() {
    let x = DesignMatrix::from_rows(&[[1.0, 0.0], [2.0, 0.0], [3.0, 0.0]]).unwrap();
    let err = solve_least_squares(&x, &[1.0, 2.0, 3.0]).unwrap_err();
    assert!(err.is_singular());
    // Also with the bare positivity rule: the pivot is exactly zero.
    let strict = SolveOptions::strict_positive_pivot();
    let err = fit_least_squares(&x, &[1.0, 2.0, 3.0], &strict).unwrap_err();
    assert!(err.is_singular());
}

#[test]
fn invalid_inputs_fail_before_arithmetic() {
    let x = DesignMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 7.0]]).unwrap();

    let err = solve_least_squares(&x, &[1.0, 2.0]).unwrap_err();
    assert!(err.is_invalid_input());

    let err = solve_least_squares(&x, &[1.0, f64::NAN, 2.0]).unwrap_err();
    assert_eq!(err, OlsError::NonFiniteInput { what: "y", index: 1 });
}

#[test]
fn huge_values_overflow_into_an_error() {
    // Squares overflow to +inf inside the builder.
    let x = DesignMatrix::from_rows(&[[1e200], [1e200]]).unwrap();
    let err = solve_least_squares(&x, &[1.0, 1.0]).unwrap_err();
    assert!(matches!(err, OlsError::NonFiniteInput { what: "XtX", index: 0 }), "{err:?}");
}
