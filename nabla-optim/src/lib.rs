//! Unconstrained minimization on top of [`nabla`]'s forward-mode AD.
//!
//! The pieces compose bottom-up: a [`Cost`] produces value and gradient at
//! a point (by AD or finite differences), a line search finds an acceptable
//! step along a direction, and the [`lbfgs`] driver turns repeated steps
//! into convergence to a stationary point.
//!
//! ```
//! use nabla::Var;
//! use nabla_optim::{lbfgs, AdCost, SolverOptions};
//!
//! // f(x, y) = (x − 1)² + (y + 2)²
//! let mut cost = AdCost::<_, 2>::new(|x: &[Var<f64, 2>]| {
//!     (x[0] - 1.0) * (x[0] - 1.0) + (x[1] + 2.0) * (x[1] + 2.0)
//! });
//! let mut x = [0.0, 0.0];
//! let result = lbfgs(&mut cost, &mut x, &SolverOptions::default());
//! assert!(result.success);
//! assert!((x[0] - 1.0).abs() < 1e-4 && (x[1] + 2.0).abs() < 1e-4);
//! ```

pub mod cost;
pub mod line_search;
pub mod result;
pub mod solver;

pub use cost::{AdCost, Cost, NumericDiffCost};
pub use line_search::{line_search, LineSearch, LineSearchMethod, LineSearchOptions};
pub use result::{SolverIteration, SolverResult, Termination};
pub use solver::{lbfgs, SolverOptions};
