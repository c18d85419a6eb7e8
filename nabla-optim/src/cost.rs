//! The cost-function boundary between user code and the solver.
//!
//! A [`Cost`] answers one question: value and gradient at a point. The two
//! adapters here produce that answer by forward-mode AD ([`AdCost`]) or by
//! central finite differences ([`NumericDiffCost`]).

use nabla::{Float, Var};

/// A differentiable objective `f : Rⁿ → R`.
///
/// Methods take `&mut self` so implementors can keep scratch buffers and
/// evaluation counters; observably, repeated calls at the same `x` must
/// return the same answer.
pub trait Cost<F: num_traits::Float> {
    /// Number of input variables.
    fn dim(&self) -> usize;

    /// Evaluate the objective at `x`, writing `∇f(x)` into `grad`.
    ///
    /// `x` and `grad` must both have length [`dim`](Cost::dim).
    fn evaluate(&mut self, x: &[F], grad: &mut [F]) -> F;
}

/// AD-backed cost: one forward sweep yields value and full gradient.
///
/// Wraps a function polymorphic over its element type, instantiated here at
/// `Var<F, N>`. Each input is seeded with the matching unit tangent, so the
/// returned dual carries all `N` partials at once, entirely on the stack.
pub struct AdCost<FN, const N: usize> {
    f: FN,
    func_evals: usize,
}

impl<FN, const N: usize> AdCost<FN, N> {
    pub fn new(f: FN) -> Self {
        AdCost { f, func_evals: 0 }
    }

    /// Number of objective evaluations performed so far.
    pub fn func_evals(&self) -> usize {
        self.func_evals
    }
}

impl<F, FN, const N: usize> Cost<F> for AdCost<FN, N>
where
    F: Float,
    FN: Fn(&[Var<F, N>]) -> Var<F, N>,
{
    fn dim(&self) -> usize {
        N
    }

    fn evaluate(&mut self, x: &[F], grad: &mut [F]) -> F {
        debug_assert_eq!(x.len(), N);
        debug_assert_eq!(grad.len(), N);
        self.func_evals += 1;

        let seeded: [Var<F, N>; N] = std::array::from_fn(|i| Var::seed(x[i], i));
        let out = (self.f)(&seeded);
        grad.copy_from_slice(&out.d);
        out.a
    }
}

/// Finite-difference cost over a plain-scalar function.
///
/// Approximates each partial by the symmetric central difference
/// `(f(x + h·eᵢ) − f(x − h·eᵢ)) / 2h`. Costs `2n + 1` function calls per
/// evaluation; the probe point is a reused internal buffer.
pub struct NumericDiffCost<F, FN> {
    f: FN,
    dim: usize,
    step: F,
    probe: Vec<F>,
    func_evals: usize,
}

impl<F: Float, FN: Fn(&[F]) -> F> NumericDiffCost<F, FN> {
    /// Central differences with the default step `1e-6`.
    pub fn new(f: FN, dim: usize) -> Self {
        Self::with_step(f, dim, F::from(1e-6).unwrap())
    }

    /// Central differences with an explicit step size.
    pub fn with_step(f: FN, dim: usize, step: F) -> Self {
        NumericDiffCost {
            f,
            dim,
            step,
            probe: vec![F::zero(); dim],
            func_evals: 0,
        }
    }

    /// Number of underlying function calls performed so far.
    pub fn func_evals(&self) -> usize {
        self.func_evals
    }
}

impl<F, FN> Cost<F> for NumericDiffCost<F, FN>
where
    F: Float,
    FN: Fn(&[F]) -> F,
{
    fn dim(&self) -> usize {
        self.dim
    }

    fn evaluate(&mut self, x: &[F], grad: &mut [F]) -> F {
        debug_assert_eq!(x.len(), self.dim);
        debug_assert_eq!(grad.len(), self.dim);

        self.probe.copy_from_slice(x);
        let two_h = self.step + self.step;
        for i in 0..self.dim {
            self.probe[i] = x[i] + self.step;
            let ahead = (self.f)(&self.probe);
            self.probe[i] = x[i] - self.step;
            let behind = (self.f)(&self.probe);
            self.probe[i] = x[i];
            grad[i] = (ahead - behind) / two_h;
        }
        self.func_evals += 2 * self.dim + 1;
        (self.f)(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ad_cost_gradient_of_product() {
        let mut cost = AdCost::<_, 2>::new(|x: &[Var<f64, 2>]| x[0] * x[1]);
        let mut g = [0.0; 2];
        let f = cost.evaluate(&[3.0, 4.0], &mut g);
        assert_eq!(f, 12.0);
        assert_eq!(g, [4.0, 3.0]);
        assert_eq!(cost.func_evals(), 1);
    }

    #[test]
    fn numeric_diff_matches_closed_form() {
        let mut cost = NumericDiffCost::new(|x: &[f64]| x[0] * x[0] + 3.0 * x[1], 2);
        let mut g = [0.0; 2];
        let f = cost.evaluate(&[2.0, 5.0], &mut g);
        assert!((f - 19.0).abs() < 1e-12);
        assert!((g[0] - 4.0).abs() < 1e-6);
        assert!((g[1] - 3.0).abs() < 1e-6);
        assert_eq!(cost.func_evals(), 5);
    }
}
