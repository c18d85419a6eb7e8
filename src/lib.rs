//! Forward-mode automatic differentiation over stack-allocated dual numbers.
//!
//! [`Var<F, N>`] carries a value and its gradient with respect to `N`
//! independent variables, with `N` fixed at compile time so the whole
//! carrier lives in registers and on the stack. `Var` implements the full
//! [`num_traits::Float`] surface; code written against [`Scalar`] evaluates
//! identically with plain floats or with gradients.
//!
//! ```
//! use nabla::Var;
//!
//! let x = Var::<f64, 2>::seed(2.0, 0);
//! let y = Var::<f64, 2>::seed(3.0, 1);
//! let f = x * y + x.sin();
//! assert!((f.d[0] - (3.0 + 2.0_f64.cos())).abs() < 1e-12);
//! assert!((f.d[1] - 2.0).abs() < 1e-12);
//! ```

pub mod float;
pub mod math;
mod numeric;
pub mod scalar;
pub mod var;

pub use float::Float;
pub use scalar::Scalar;
pub use var::Var;

/// `f64` duals with `N` gradient lanes.
pub type Var64<const N: usize> = Var<f64, N>;
/// `f32` duals with `N` gradient lanes.
pub type Var32<const N: usize> = Var<f32, N>;
