use approx::assert_relative_eq;
use nabla::math::{dot, square, sum, sumsq};
use nabla::Var;

type V1 = Var<f64, 1>;

/// Check `f` against its closed-form derivative at `at`.
fn check_chain(name: &str, f: fn(V1) -> V1, scalar: fn(f64) -> f64, deriv: fn(f64) -> f64, at: f64) {
    let r = f(V1::seed(at, 0));
    let want = scalar(at);
    assert!(
        (r.a - want).abs() <= 1e-12 * want.abs().max(1.0),
        "{}: value {} vs {}",
        name,
        r.a,
        want
    );
    let want_d = deriv(at);
    assert!(
        (r.d[0] - want_d).abs() <= 1e-6 * want_d.abs().max(1.0),
        "{}: derivative {} vs {}",
        name,
        r.d[0],
        want_d
    );
}

#[test]
fn chain_rule_for_every_elementary_function() {
    check_chain("sqrt", |x| x.sqrt(), f64::sqrt, |a| 0.5 / a.sqrt(), 2.3);
    check_chain("exp", |x| x.exp(), f64::exp, f64::exp, 0.8);
    check_chain("ln", |x| x.ln(), f64::ln, |a| 1.0 / a, 2.3);
    check_chain("sin", |x| x.sin(), f64::sin, f64::cos, 0.8);
    check_chain("cos", |x| x.cos(), f64::cos, |a| -a.sin(), 0.8);
    check_chain("tan", |x| x.tan(), f64::tan, |a| 1.0 + a.tan() * a.tan(), 0.8);
    check_chain("sinh", |x| x.sinh(), f64::sinh, f64::cosh, 0.8);
    check_chain("cosh", |x| x.cosh(), f64::cosh, f64::sinh, 0.8);
    check_chain(
        "tanh",
        |x| x.tanh(),
        f64::tanh,
        |a| 1.0 - a.tanh() * a.tanh(),
        0.8,
    );
    check_chain(
        "asinh",
        |x| x.asinh(),
        f64::asinh,
        |a| 1.0 / (a * a + 1.0).sqrt(),
        0.8,
    );
    check_chain(
        "acosh",
        |x| x.acosh(),
        f64::acosh,
        |a| 1.0 / (a * a - 1.0).sqrt(),
        2.3,
    );
    check_chain(
        "atanh",
        |x| x.atanh(),
        f64::atanh,
        |a| 1.0 / (1.0 - a * a),
        0.45,
    );
    check_chain("recip", |x| x.recip(), f64::recip, |a| -1.0 / (a * a), 2.3);
    check_chain(
        "square",
        square::<V1>,
        |a| a * a,
        |a| 2.0 * a,
        -1.7,
    );
}

#[test]
fn chain_rule_matches_central_differences() {
    // Independent cross-check of the same table against numeric slopes.
    let h = 1e-6;
    let fns: &[(fn(V1) -> V1, fn(f64) -> f64, f64)] = &[
        (|x| x.sqrt(), f64::sqrt, 2.3),
        (|x| x.exp(), f64::exp, 0.8),
        (|x| x.ln(), f64::ln, 2.3),
        (|x| x.sin(), f64::sin, 0.8),
        (|x| x.tanh(), f64::tanh, 0.8),
        (|x| x.acosh(), f64::acosh, 2.3),
    ];
    for &(f, scalar, at) in fns {
        let slope = (scalar(at + h) - scalar(at - h)) / (2.0 * h);
        let r = f(V1::seed(at, 0));
        assert_relative_eq!(r.d[0], slope, max_relative = 1e-5);
    }
}

#[test]
fn sum_and_sumsq_over_duals() {
    let xs: Vec<Var<f64, 3>> = (0..3).map(|i| Var::seed(i as f64 + 1.0, i)).collect();

    let s = sum(&xs);
    assert_eq!(s.a, 6.0);
    assert_eq!(s.d, [1.0, 1.0, 1.0]);

    let q = sumsq(&xs);
    assert_eq!(q.a, 14.0);
    assert_eq!(q.d, [2.0, 4.0, 6.0]);
}

#[test]
fn dot_of_seeded_vectors() {
    let xs: Vec<Var<f64, 3>> = (0..3).map(|i| Var::seed(i as f64, i)).collect();
    let ys = xs.clone();

    let r = dot(&xs, &ys);
    assert_eq!(r.a, 5.0);
    assert_eq!(r.d, [0.0, 2.0, 4.0]);
}

#[test]
fn dot_mixes_duals_and_scalars() {
    let xs: Vec<Var<f64, 3>> = (0..3).map(|i| Var::seed(i as f64, i)).collect();
    let ys = [0.0, 1.0, 2.0];

    let r: Var<f64, 3> = dot(&xs, &ys);
    assert_eq!(r.a, 5.0);
    assert_eq!(r.d, [0.0, 1.0, 2.0]);

    let flipped: Var<f64, 3> = dot(&ys, &xs);
    assert_eq!(flipped.a, r.a);
    assert_eq!(flipped.d, r.d);
}

#[test]
fn dot_is_linear_in_its_left_argument() {
    let (alpha, beta) = (2.5, -1.25);
    let x = [1.0, -2.0, 0.5, 3.0];
    let y = [0.25, 1.5, -1.0, 2.0];
    let z = [4.0, 0.5, 2.0, -1.5];

    let combined: Vec<f64> = x
        .iter()
        .zip(&y)
        .map(|(&xi, &yi)| alpha * xi + beta * yi)
        .collect();
    let lhs: f64 = dot(&combined, &z);
    let rhs = alpha * dot::<f64, f64, f64>(&x, &z) + beta * dot::<f64, f64, f64>(&y, &z);
    assert_relative_eq!(lhs, rhs, max_relative = 1e-12);

    // Same law with dual elements.
    let xd: Vec<Var<f64, 4>> = (0..4).map(|i| Var::seed(x[i], i)).collect();
    let yd: Vec<Var<f64, 4>> = (0..4).map(|i| Var::seed(y[i], i)).collect();
    let comb: Vec<Var<f64, 4>> = xd
        .iter()
        .zip(&yd)
        .map(|(&xi, &yi)| xi * alpha + yi * beta)
        .collect();
    let lhs: Var<f64, 4> = dot(&comb, &z);
    let rx: Var<f64, 4> = dot(&xd, &z);
    let ry: Var<f64, 4> = dot(&yd, &z);
    let rhs = rx * alpha + ry * beta;
    assert_relative_eq!(lhs.a, rhs.a, max_relative = 1e-12);
    for k in 0..4 {
        assert_relative_eq!(lhs.d[k], rhs.d[k], max_relative = 1e-12);
    }
}

#[test]
fn value_path_agrees_with_plain_floats_on_long_inputs() {
    let n = 37;
    let xs: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin()).collect();
    let ys: Vec<f64> = (0..n).map(|i| 1.0 / (1.0 + i as f64)).collect();
    let plain: f64 = dot(&xs, &ys);

    let xd: Vec<Var<f64, 2>> = xs.iter().map(|&v| Var::constant(v)).collect();
    let dual: Var<f64, 2> = dot(&xd, &ys);
    assert_relative_eq!(dual.a, plain, max_relative = 1e-12);
    assert_eq!(dual.d, [0.0, 0.0]);
}
