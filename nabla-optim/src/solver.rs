//! The L-BFGS driver.
//!
//! Maintains an implicit inverse-Hessian approximation from the last `m`
//! curvature pairs, held in a circular buffer, and applies it with the
//! standard two-loop recursion. All working vectors and history slots are
//! allocated once at entry; the iteration loop itself allocates nothing.

use nabla::math::dot;
use nabla::Float;

use crate::cost::Cost;
use crate::line_search::{line_search, LineSearchOptions};
use crate::result::{SolverIteration, SolverResult, Termination};

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverOptions<F> {
    /// Outer iteration budget (default: 20).
    pub max_iterations: usize,
    /// Convergence threshold on `‖g‖²` relative to `max(‖x‖², 1)`
    /// (default: 1e-10).
    pub gradient_tolerance: F,
    /// Seed each line search with `1/‖direction‖` instead of a fixed step
    /// (default: false).
    pub estimate_step_size: bool,
    /// Fixed line-search seed when not estimating (default: 1).
    pub initial_step_size: F,
    /// Number of curvature pairs retained; 0 degrades to steepest descent
    /// (default: 6).
    pub memory: usize,
    /// Line search configuration.
    pub line_search: LineSearchOptions<F>,
}

impl Default for SolverOptions<f64> {
    fn default() -> Self {
        SolverOptions {
            max_iterations: 20,
            gradient_tolerance: 1e-10,
            estimate_step_size: false,
            initial_step_size: 1.0,
            memory: 6,
            line_search: LineSearchOptions::default(),
        }
    }
}

impl Default for SolverOptions<f32> {
    fn default() -> Self {
        SolverOptions {
            max_iterations: 20,
            gradient_tolerance: 1e-5,
            estimate_step_size: false,
            initial_step_size: 1.0,
            memory: 6,
            line_search: LineSearchOptions::default(),
        }
    }
}

/// One curvature pair with its cached two-loop scalars.
///
/// Convention: `s = Δx`, `y = Δg`, `rho = 1/(sᵀy)`; `alpha` is scratch for
/// the recursion's first sweep.
struct HistorySlot<F> {
    s: Vec<F>,
    y: Vec<F>,
    alpha: F,
    rho: F,
}

#[inline]
fn norm_sq<F: Float>(v: &[F]) -> F {
    dot(v, v)
}

#[inline]
fn met<F: Float>(g2: F, x2: F, tol: F) -> bool {
    g2 < tol * x2.max(F::one())
}

/// Minimize `cost` from `x`, in place.
///
/// On return `x` holds the best point reached — the last accepted
/// line-search point even when the run did not converge.
pub fn lbfgs<F: Float, C: Cost<F>>(
    cost: &mut C,
    x: &mut [F],
    opts: &SolverOptions<F>,
) -> SolverResult<F> {
    let n = x.len();
    debug_assert_eq!(n, cost.dim());

    let mut gc = vec![F::zero(); n];
    let mut xp = vec![F::zero(); n];
    let mut gp = vec![F::zero(); n];
    let mut sv = vec![F::zero(); n];

    let m = opts.memory;
    let mut history: Vec<HistorySlot<F>> = (0..m)
        .map(|_| HistorySlot {
            s: vec![F::zero(); n],
            y: vec![F::zero(); n],
            alpha: F::zero(),
            rho: F::zero(),
        })
        .collect();
    let mut cursor = 0; // next slot to write
    let mut stored = 0; // valid pairs, ≤ m
    let mut gamma = F::one();

    let mut f = cost.evaluate(x, &mut gc);
    let first_cost = f;

    let mut x2 = norm_sq(x);
    let mut g2 = norm_sq(&gc);
    if met(g2, x2, opts.gradient_tolerance) {
        return SolverResult {
            success: true,
            termination: Termination::Converged,
            first_cost,
            final_cost: f,
            iterations: Vec::new(),
        };
    }

    for i in 0..n {
        sv[i] = -gc[i];
    }
    let mut alpha = if opts.estimate_step_size {
        F::one() / g2.sqrt()
    } else {
        opts.initial_step_size
    };

    let mut iterations = Vec::with_capacity(opts.max_iterations);
    let mut k = 0;

    let (success, termination) = loop {
        xp.copy_from_slice(x);
        gp.copy_from_slice(&gc);
        let f_p = f;

        let ls = line_search(
            cost,
            &xp,
            &gp,
            &sv,
            f_p,
            alpha,
            &opts.line_search,
            x,
            &mut gc,
        );
        if !ls.success {
            x.copy_from_slice(&xp);
            gc.copy_from_slice(&gp);
            iterations.push(SolverIteration {
                success: false,
                line_search_iterations: ls.iterations,
                step_size: F::zero(),
                cost: f_p,
                param_norm: x2.sqrt(),
                gradient_norm: g2.sqrt(),
            });
            break (false, Termination::LineSearchFailed);
        }

        f = ls.cost;
        x2 = norm_sq(x);
        g2 = norm_sq(&gc);
        iterations.push(SolverIteration {
            success: true,
            line_search_iterations: ls.iterations,
            step_size: ls.step_size,
            cost: f,
            param_norm: x2.sqrt(),
            gradient_norm: g2.sqrt(),
        });

        if met(g2, x2, opts.gradient_tolerance) {
            break (true, Termination::Converged);
        }
        k += 1;
        if k >= opts.max_iterations {
            break (false, Termination::MaxIterations);
        }

        if m > 0 {
            let mut ys = F::zero();
            for i in 0..n {
                ys = ys + (x[i] - xp[i]) * (gc[i] - gp[i]);
            }
            if ys == F::zero() {
                break (false, Termination::DegenerateCurvature);
            }
            // Negative curvature can only reach here in Armijo-only mode;
            // such a pair would destroy positive-definiteness, so skip it
            // and leave the stored history untouched.
            if ys > F::zero() {
                let slot = &mut history[cursor];
                let mut yy = F::zero();
                for i in 0..n {
                    slot.s[i] = x[i] - xp[i];
                    slot.y[i] = gc[i] - gp[i];
                    yy = yy + slot.y[i] * slot.y[i];
                }
                slot.rho = F::one() / ys;
                gamma = ys / yy;
                cursor = (cursor + 1) % m;
                if stored < m {
                    stored += 1;
                }
            }

            // Two-loop recursion, in place over sv, newest pair first.
            for i in 0..n {
                sv[i] = -gc[i];
            }
            for back in 0..stored {
                let j = (cursor + m - 1 - back) % m;
                let a = history[j].rho * dot(&history[j].s, &sv);
                history[j].alpha = a;
                for i in 0..n {
                    sv[i] = sv[i] - a * history[j].y[i];
                }
            }
            for i in 0..n {
                sv[i] = sv[i] * gamma;
            }
            for back in (0..stored).rev() {
                let j = (cursor + m - 1 - back) % m;
                let b = history[j].rho * dot(&history[j].y, &sv);
                let a = history[j].alpha;
                for i in 0..n {
                    sv[i] = sv[i] + (a - b) * history[j].s[i];
                }
            }
        } else {
            for i in 0..n {
                sv[i] = -gc[i];
            }
        }

        alpha = if opts.estimate_step_size {
            F::one() / norm_sq(&sv).sqrt()
        } else {
            opts.initial_step_size
        };
    };

    SolverResult {
        success,
        termination,
        first_cost,
        final_cost: f,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::AdCost;
    use nabla::Var;

    fn sphere() -> AdCost<impl Fn(&[Var<f64, 3>]) -> Var<f64, 3>, 3> {
        AdCost::new(|x: &[Var<f64, 3>]| x[0] * x[0] + x[1] * x[1] + x[2] * x[2])
    }

    #[test]
    fn converges_on_sphere() {
        let mut cost = sphere();
        let mut x = [4.0, -2.0, 7.0];
        let result = lbfgs(&mut cost, &mut x, &SolverOptions::default());

        assert!(result.success);
        assert_eq!(result.termination, Termination::Converged);
        for xi in x {
            assert!(xi.abs() < 1e-4, "x = {:?}", xi);
        }
        assert!(result.final_cost < result.first_cost);
    }

    #[test]
    fn zero_memory_is_steepest_descent() {
        let mut cost = sphere();
        let mut x = [1.0, 1.0, -1.0];
        let opts = SolverOptions {
            memory: 0,
            max_iterations: 100,
            ..Default::default()
        };
        let result = lbfgs(&mut cost, &mut x, &opts);

        assert!(result.success, "terminated: {}", result.termination);
    }

    #[test]
    fn starting_at_minimum_returns_immediately() {
        let mut cost = sphere();
        let mut x = [0.0, 0.0, 0.0];
        let result = lbfgs(&mut cost, &mut x, &SolverOptions::default());

        assert!(result.success);
        assert!(result.iterations.is_empty());
        assert_eq!(result.first_cost, result.final_cost);
    }

    #[test]
    fn iteration_trace_is_bounded_and_ordered() {
        let mut cost = AdCost::<_, 2>::new(|x: &[Var<f64, 2>]| {
            let a = Var::constant(1.0) - x[0];
            let b = x[1] - x[0] * x[0];
            a * a + b * b * 100.0
        });
        let mut x = [-1.2, 1.0];
        let opts = SolverOptions {
            max_iterations: 5,
            ..Default::default()
        };
        let result = lbfgs(&mut cost, &mut x, &opts);

        assert!(result.iterations.len() <= 5);
        for w in result.iterations.windows(2) {
            // Accepted steps never increase the objective.
            if w[1].success {
                assert!(w[1].cost <= w[0].cost);
            }
        }
    }
}
