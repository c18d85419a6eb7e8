//! Backtracking line searches along a descent direction.
//!
//! Both modes minimize `φ(α) = f(x_p + α·d)` approximately: Armijo enforces
//! sufficient decrease only; Strong Wolfe adds the curvature condition and
//! locates its step by bracketing and zooming (Nocedal & Wright §3.5). The
//! accepted point and its gradient land in caller-owned buffers, so a full
//! search allocates nothing.

use nabla::math::dot;
use nabla::Float;

use crate::cost::Cost;

/// Which acceptance conditions the search enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearchMethod {
    /// Sufficient decrease only: `φ(α) ≤ φ(0) + c1·α·φ′(0)`.
    Armijo,
    /// Armijo plus strong curvature: `|φ′(α)| ≤ c2·|φ′(0)|`.
    StrongWolfe,
}

/// Line search parameters.
#[derive(Debug, Clone)]
pub struct LineSearchOptions<F> {
    pub method: LineSearchMethod,
    /// Budget of cost evaluations per search (default: 100).
    pub max_iterations: usize,
    /// Sufficient-decrease constant (default: 1e-4).
    pub c1: F,
    /// Curvature constant, Strong Wolfe only (default: 0.9).
    pub c2: F,
    /// Backtracking contraction factor in (0, 1) (default: 0.5).
    pub rho: F,
    /// Step floor below which the search gives up (default: 1e-16).
    pub alpha_min: F,
}

impl Default for LineSearchOptions<f64> {
    fn default() -> Self {
        LineSearchOptions {
            method: LineSearchMethod::Armijo,
            max_iterations: 100,
            c1: 1e-4,
            c2: 0.9,
            rho: 0.5,
            alpha_min: 1e-16,
        }
    }
}

impl Default for LineSearchOptions<f32> {
    fn default() -> Self {
        LineSearchOptions {
            method: LineSearchMethod::Armijo,
            max_iterations: 100,
            c1: 1e-4,
            c2: 0.9,
            rho: 0.5,
            alpha_min: 1e-8,
        }
    }
}

/// Outcome of one search.
#[derive(Debug, Clone, Copy)]
pub struct LineSearch<F> {
    /// Whether an acceptable step was found.
    pub success: bool,
    /// Cost evaluations spent.
    pub iterations: usize,
    /// Objective value at the accepted point (the base value on failure).
    pub cost: F,
    /// The accepted step size (zero on failure).
    pub step_size: F,
}

impl<F: Float> LineSearch<F> {
    fn accepted(iterations: usize, cost: F, step_size: F) -> Self {
        LineSearch {
            success: true,
            iterations,
            cost,
            step_size,
        }
    }

    fn gave_up(iterations: usize, base_cost: F) -> Self {
        LineSearch {
            success: false,
            iterations,
            cost: base_cost,
            step_size: F::zero(),
        }
    }
}

/// Search along `dir` from `x_p` (value `f_p`, gradient `g_p`), starting at
/// step `alpha0`.
///
/// On success `x_c`/`g_c` hold the accepted point and its gradient; on
/// failure their contents are unspecified and the caller restores its own
/// state. A non-descent `dir` (`g_p·dir ≥ 0`) fails without evaluating.
#[allow(clippy::too_many_arguments)]
pub fn line_search<F: Float, C: Cost<F>>(
    cost: &mut C,
    x_p: &[F],
    g_p: &[F],
    dir: &[F],
    f_p: F,
    alpha0: F,
    opts: &LineSearchOptions<F>,
    x_c: &mut [F],
    g_c: &mut [F],
) -> LineSearch<F> {
    let g0 = dot(g_p, dir);
    if g0 >= F::zero() {
        return LineSearch::gave_up(0, f_p);
    }
    match opts.method {
        LineSearchMethod::Armijo => armijo(cost, x_p, dir, f_p, g0, alpha0, opts, x_c, g_c),
        LineSearchMethod::StrongWolfe => {
            strong_wolfe(cost, x_p, dir, f_p, g0, alpha0, opts, x_c, g_c)
        }
    }
}

#[inline]
fn probe<F: Float, C: Cost<F>>(
    cost: &mut C,
    x_p: &[F],
    dir: &[F],
    alpha: F,
    x_c: &mut [F],
    g_c: &mut [F],
) -> F {
    for i in 0..x_p.len() {
        x_c[i] = x_p[i] + alpha * dir[i];
    }
    cost.evaluate(x_c, g_c)
}

#[allow(clippy::too_many_arguments)]
fn armijo<F: Float, C: Cost<F>>(
    cost: &mut C,
    x_p: &[F],
    dir: &[F],
    f_p: F,
    g0: F,
    alpha0: F,
    opts: &LineSearchOptions<F>,
    x_c: &mut [F],
    g_c: &mut [F],
) -> LineSearch<F> {
    let mut alpha = alpha0;
    let mut evals = 0;

    while evals < opts.max_iterations && alpha >= opts.alpha_min {
        let f = probe(cost, x_p, dir, alpha, x_c, g_c);
        evals += 1;
        if f <= f_p + opts.c1 * alpha * g0 {
            return LineSearch::accepted(evals, f, alpha);
        }
        alpha = alpha * opts.rho;
    }

    LineSearch::gave_up(evals, f_p)
}

/// Bracketing phase: expand until the minimizer is trapped, accept early
/// when both Wolfe conditions already hold.
#[allow(clippy::too_many_arguments)]
fn strong_wolfe<F: Float, C: Cost<F>>(
    cost: &mut C,
    x_p: &[F],
    dir: &[F],
    f_p: F,
    g0: F,
    alpha0: F,
    opts: &LineSearchOptions<F>,
    x_c: &mut [F],
    g_c: &mut [F],
) -> LineSearch<F> {
    let two = F::one() + F::one();
    let mut alpha_prev = F::zero();
    let mut f_prev = f_p;
    let mut alpha = alpha0;
    let mut evals = 0;

    while evals < opts.max_iterations {
        let f = probe(cost, x_p, dir, alpha, x_c, g_c);
        evals += 1;
        let dphi = dot(g_c, dir);

        if f > f_p + opts.c1 * alpha * g0 || (evals > 1 && f >= f_prev) {
            return zoom(
                cost, x_p, dir, f_p, g0, alpha_prev, f_prev, alpha, opts, x_c, g_c, evals,
            );
        }
        if dphi.abs() <= -opts.c2 * g0 {
            return LineSearch::accepted(evals, f, alpha);
        }
        if dphi >= F::zero() {
            return zoom(cost, x_p, dir, f_p, g0, alpha, f, alpha_prev, opts, x_c, g_c, evals);
        }

        alpha_prev = alpha;
        f_prev = f;
        alpha = alpha * two;
    }

    LineSearch::gave_up(evals, f_p)
}

/// Shrink `[lo, hi]` by bisection until a step satisfies both conditions.
/// `lo` always carries the lowest accepted-Armijo value seen so far; the
/// interval endpoints need not be ordered.
#[allow(clippy::too_many_arguments)]
fn zoom<F: Float, C: Cost<F>>(
    cost: &mut C,
    x_p: &[F],
    dir: &[F],
    f_p: F,
    g0: F,
    mut lo: F,
    mut f_lo: F,
    mut hi: F,
    opts: &LineSearchOptions<F>,
    x_c: &mut [F],
    g_c: &mut [F],
    mut evals: usize,
) -> LineSearch<F> {
    let half = F::from(0.5).unwrap();

    while evals < opts.max_iterations {
        if (hi - lo).abs() < opts.alpha_min {
            break;
        }
        let alpha = (lo + hi) * half;
        let f = probe(cost, x_p, dir, alpha, x_c, g_c);
        evals += 1;
        let dphi = dot(g_c, dir);

        if f > f_p + opts.c1 * alpha * g0 || f >= f_lo {
            hi = alpha;
        } else {
            if dphi.abs() <= -opts.c2 * g0 {
                return LineSearch::accepted(evals, f, alpha);
            }
            if dphi * (hi - lo) >= F::zero() {
                hi = lo;
            }
            lo = alpha;
            f_lo = f;
        }
    }

    LineSearch::gave_up(evals, f_p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::AdCost;
    use nabla::Var;

    // f(x) = 0.5·(x0² + x1²), gradient x.
    fn quadratic() -> AdCost<impl Fn(&[Var<f64, 2>]) -> Var<f64, 2>, 2> {
        AdCost::new(|x: &[Var<f64, 2>]| (x[0] * x[0] + x[1] * x[1]) * 0.5)
    }

    fn setup() -> (Vec<f64>, Vec<f64>, f64) {
        let x = vec![2.0, 3.0];
        let g = x.clone();
        let f = 0.5 * (4.0 + 9.0);
        (x, g, f)
    }

    #[test]
    fn armijo_accepts_descent_step() {
        let mut cost = quadratic();
        let (x, g, f) = setup();
        let d: Vec<f64> = g.iter().map(|&gi| -gi).collect();
        let (mut xc, mut gc) = (vec![0.0; 2], vec![0.0; 2]);

        let opts = LineSearchOptions::default();
        let ls = line_search(&mut cost, &x, &g, &d, f, 1.0, &opts, &mut xc, &mut gc);

        assert!(ls.success);
        assert!(ls.step_size > 0.0);
        assert!(ls.cost < f);
    }

    #[test]
    fn armijo_takes_full_step_on_quadratic() {
        let mut cost = quadratic();
        let (x, g, f) = setup();
        let d: Vec<f64> = g.iter().map(|&gi| -gi).collect();
        let (mut xc, mut gc) = (vec![0.0; 2], vec![0.0; 2]);

        let opts = LineSearchOptions::default();
        let ls = line_search(&mut cost, &x, &g, &d, f, 1.0, &opts, &mut xc, &mut gc);

        // Steepest descent with α = 1 lands exactly on the minimum here.
        assert!((ls.step_size - 1.0).abs() < 1e-12);
        assert!(ls.cost < 1e-12);
    }

    #[test]
    fn ascent_direction_fails_without_evaluating() {
        let mut cost = quadratic();
        let (x, g, f) = setup();
        let d = g.clone();
        let (mut xc, mut gc) = (vec![0.0; 2], vec![0.0; 2]);

        let opts = LineSearchOptions::default();
        let ls = line_search(&mut cost, &x, &g, &d, f, 1.0, &opts, &mut xc, &mut gc);

        assert!(!ls.success);
        assert_eq!(ls.iterations, 0);
        assert_eq!(cost.func_evals(), 0);
    }

    #[test]
    fn strong_wolfe_satisfies_both_conditions() {
        let mut cost = quadratic();
        let (x, g, f) = setup();
        let d: Vec<f64> = g.iter().map(|&gi| -gi).collect();
        let (mut xc, mut gc) = (vec![0.0; 2], vec![0.0; 2]);

        let opts = LineSearchOptions {
            method: LineSearchMethod::StrongWolfe,
            ..Default::default()
        };
        let g0: f64 = g.iter().zip(&d).map(|(a, b)| a * b).sum();
        let ls = line_search(&mut cost, &x, &g, &d, f, 0.1, &opts, &mut xc, &mut gc);

        assert!(ls.success);
        assert!(ls.cost <= f + opts.c1 * ls.step_size * g0);
        let dphi: f64 = gc.iter().zip(&d).map(|(a, b)| a * b).sum();
        assert!(dphi.abs() <= opts.c2 * g0.abs());
    }

    #[test]
    fn armijo_fails_when_budget_exhausted() {
        // Direction is descent at the origin side but the step floor is hit
        // before any α can decrease a function this start overshoots badly.
        let mut cost = AdCost::<_, 1>::new(|x: &[Var<f64, 1>]| x[0] * x[0]);
        let x = vec![1.0];
        let g = vec![2.0];
        let d = vec![-1.0];
        let (mut xc, mut gc) = (vec![0.0], vec![0.0]);

        let opts = LineSearchOptions {
            max_iterations: 3,
            c1: 0.99,
            ..Default::default()
        };
        // Huge initial step: three halvings cannot recover sufficient decrease.
        let ls = line_search(&mut cost, &x, &g, &d, 1.0, 1e12, &opts, &mut xc, &mut gc);

        assert!(!ls.success);
        assert_eq!(ls.iterations, 3);
        assert_eq!(ls.cost, 1.0);
    }
}
